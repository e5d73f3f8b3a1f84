//! Navigator core: pure navigation state machine, result correlation and
//! view-model helpers. No I/O happens here; background work is requested as
//! [`Effect`]s and its results come back as [`Msg`]s.
pub mod catalog;
pub mod correlate;
mod effect;
mod guard;
mod msg;
mod screens;
mod state;
mod status;
mod update;
mod view_model;

pub use catalog::{
    BackendCommand, ClientSummary, DeleteOptions, EntryId, Episode, EpisodeFile, FileQuality,
    LanguageProfile, MediaInfo, MonitorType, QualityDefinition, QualityProfile, QueueItem,
    QueuePage, RootFolder, Season, Series,
};
pub use effect::{ClientId, Command, CommandKind, Effect, OpId, Request, ScreenId, TimerId};
pub use guard::ReloadGuard;
pub use msg::{CommandError, Completion, ErrorKind, Key, Mouse, Msg, Response};
pub use state::{AppState, ClientConfig, ClientsConfig};
pub use status::{Severity, StatusMessage, ERROR_TIMEOUT, INFO_TIMEOUT, PROGRESS_TIMEOUT};
pub use update::update;
pub use view_model::{
    AddSeriesView, AppViewModel, ClientRow, ClientsView, ConfirmDeleteView, ConfirmRemoveView,
    DetailView, DownloadView, EpisodeDetailView, EpisodeFileView, EpisodeView, FormField,
    KeyBinding, MediaInfoRow, ScreenView, SearchRow, SearchView, SeasonRow, SeasonView,
    SeriesListView, SeriesRow,
};
