use std::sync::mpsc;

use navigator_core::{Completion, Msg, TimerId};

/// What the engine reports back to the event loop.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    Completed(Completion),
    TimerFired(TimerId),
}

impl From<EngineEvent> for Msg {
    fn from(event: EngineEvent) -> Self {
        match event {
            EngineEvent::Completed(done) => Msg::Completed(done),
            EngineEvent::TimerFired(timer) => Msg::TimerFired(timer),
        }
    }
}

/// Receives engine events from worker tasks.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

impl EventSink for mpsc::Sender<EngineEvent> {
    fn emit(&self, event: EngineEvent) {
        // The event loop is gone once the receiver drops; nothing left to tell.
        let _ = self.send(event);
    }
}

/// Forwards engine events into the app's `Msg` queue.
impl EventSink for mpsc::Sender<Msg> {
    fn emit(&self, event: EngineEvent) {
        let _ = self.send(event.into());
    }
}
