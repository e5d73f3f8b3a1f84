use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use navigator_core::{Command, CommandError, Completion, OpId, TimerId};
use navigator_logging::{nav_debug, nav_warn};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::execute::{execute, Backends};
use crate::{CatalogBackend, EngineEvent, EventSink};

type InFlight = Arc<Mutex<HashMap<OpId, CancellationToken>>>;

fn lock(inflight: &InFlight) -> MutexGuard<'_, HashMap<OpId, CancellationToken>> {
    inflight.lock().unwrap_or_else(PoisonError::into_inner)
}

/// One dispatched unit of background work.
#[derive(Debug)]
pub struct UnitHandle {
    pub op: OpId,
    token: CancellationToken,
    join: JoinHandle<()>,
}

impl UnitHandle {
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Waits for the task to end, whether it reported or was cancelled.
    pub async fn join(self) {
        if let Err(err) = self.join.await {
            nav_warn!("unit {:?} task failed: {err}", self.op);
        }
    }
}

/// Runs commands against the configured backends on a tokio runtime.
///
/// Each unit reports exactly one `Completed` event unless it is cancelled
/// first, in which case it reports nothing.
pub struct Dispatcher {
    backends: Backends,
    inflight: InFlight,
    sink: Arc<dyn EventSink>,
    runtime: Handle,
}

impl Dispatcher {
    pub fn new(
        backends: Vec<Arc<dyn CatalogBackend>>,
        sink: Arc<dyn EventSink>,
        runtime: Handle,
    ) -> Self {
        Self {
            backends: Arc::new(backends),
            inflight: Arc::default(),
            sink,
            runtime,
        }
    }

    pub fn dispatch(&self, command: Command) -> UnitHandle {
        let Command {
            op,
            target,
            kind,
            request,
        } = command;
        let token = CancellationToken::new();
        lock(&self.inflight).insert(op, token.clone());
        nav_debug!("dispatch {op:?} ({kind:?}) for screen {target:?}");

        let backends = Arc::clone(&self.backends);
        let inflight = Arc::clone(&self.inflight);
        let sink = Arc::clone(&self.sink);
        let cancelled = token.clone();
        let join = self.runtime.spawn(async move {
            let outcome = tokio::select! {
                biased;
                _ = cancelled.cancelled() => None,
                result = execute(&backends, request) => Some(result),
            };
            lock(&inflight).remove(&op);
            match outcome {
                Some(result) if !cancelled.is_cancelled() => {
                    if let Err(err) = &result {
                        nav_warn!("{op:?} failed: {err}");
                    }
                    nav_debug!("{op:?} completed");
                    sink.emit(EngineEvent::Completed(Completion {
                        op,
                        target,
                        result: result.map_err(CommandError::from),
                    }));
                }
                _ => nav_debug!("{op:?} cancelled, result discarded"),
            }
        });

        UnitHandle { op, token, join }
    }

    /// Returns false if the unit already finished or was never dispatched.
    pub fn cancel(&self, op: OpId) -> bool {
        match lock(&self.inflight).remove(&op) {
            Some(token) => {
                nav_debug!("cancel {op:?}");
                token.cancel();
                true
            }
            None => false,
        }
    }

    pub fn start_timer(&self, timer: TimerId, after: Duration) -> JoinHandle<()> {
        let sink = Arc::clone(&self.sink);
        self.runtime.spawn(async move {
            tokio::time::sleep(after).await;
            sink.emit(EngineEvent::TimerFired(timer));
        })
    }

    pub fn in_flight(&self) -> usize {
        lock(&self.inflight).len()
    }
}
