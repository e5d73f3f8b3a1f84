use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use navigator_core::{Command, OpId, TimerId};
use navigator_logging::{nav_debug, nav_error};

use crate::{CatalogBackend, Dispatcher, EventSink};

enum EngineCommand {
    Dispatch(Command),
    Cancel(OpId),
    StartTimer { timer: TimerId, after: Duration },
}

/// Owns the engine thread and its tokio runtime. Dropping the handle stops
/// the thread once queued commands are drained.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

impl EngineHandle {
    pub fn new(backends: Vec<Arc<dyn CatalogBackend>>, sink: Arc<dyn EventSink>) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();

        thread::spawn(move || {
            let runtime = match tokio::runtime::Runtime::new() {
                Ok(runtime) => runtime,
                Err(err) => {
                    nav_error!("failed to start engine runtime: {err}");
                    return;
                }
            };
            let dispatcher = Dispatcher::new(backends, sink, runtime.handle().clone());
            while let Ok(command) = cmd_rx.recv() {
                match command {
                    EngineCommand::Dispatch(command) => {
                        dispatcher.dispatch(command);
                    }
                    EngineCommand::Cancel(op) => {
                        if !dispatcher.cancel(op) {
                            nav_debug!("cancel of {op:?} ignored, not in flight");
                        }
                    }
                    EngineCommand::StartTimer { timer, after } => {
                        dispatcher.start_timer(timer, after);
                    }
                }
            }
            nav_debug!("engine thread stopping");
        });

        Self { cmd_tx }
    }

    pub fn dispatch(&self, command: Command) {
        let _ = self.cmd_tx.send(EngineCommand::Dispatch(command));
    }

    pub fn cancel(&self, op: OpId) {
        let _ = self.cmd_tx.send(EngineCommand::Cancel(op));
    }

    pub fn start_timer(&self, timer: TimerId, after: Duration) {
        let _ = self.cmd_tx.send(EngineCommand::StartTimer { timer, after });
    }
}
