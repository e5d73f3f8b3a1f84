use std::sync::{mpsc, Arc};

use navigator_core::{Effect, Msg};
use navigator_engine::{CatalogBackend, EngineHandle, EventSink};
use navigator_logging::{nav_debug, nav_info};

/// Hands effects from `update` to the engine. Engine events come back as
/// `Msg`s on the event loop's channel.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(backends: Vec<Arc<dyn CatalogBackend>>, msg_tx: mpsc::Sender<Msg>) -> Self {
        let sink: Arc<dyn EventSink> = Arc::new(msg_tx);
        Self {
            engine: EngineHandle::new(backends, sink),
        }
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Dispatch(command) => {
                    nav_debug!(
                        "Dispatch op={:?} kind={:?} target={:?}",
                        command.op,
                        command.kind,
                        command.target
                    );
                    self.engine.dispatch(command);
                }
                Effect::Cancel { op } => self.engine.cancel(op),
                Effect::StartTimer { timer, after } => self.engine.start_timer(timer, after),
                Effect::Quit => {
                    // The event loop checks `should_quit` after every update.
                    nav_info!("quit effect received");
                }
            }
        }
    }
}
