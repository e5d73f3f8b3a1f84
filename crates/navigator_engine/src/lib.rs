//! Navigator engine: backend adapters and async command execution.
mod backend;
mod dispatcher;
mod engine;
mod error;
mod execute;
mod sonarr;
mod types;

pub use backend::CatalogBackend;
pub use dispatcher::{Dispatcher, UnitHandle};
pub use engine::EngineHandle;
pub use error::BackendError;
pub use execute::execute;
pub use sonarr::{SonarrClient, SonarrSettings};
pub use types::{EngineEvent, EventSink};
