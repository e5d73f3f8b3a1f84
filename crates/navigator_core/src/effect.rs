use std::time::Duration;

use crate::catalog::{BackendCommand, DeleteOptions, EntryId, Series};

/// Identity of one dispatched unit of background work. `0` is never issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OpId(pub u64);

/// Identity of one screen instance. A screen re-created for the same purpose
/// gets a fresh id, which is what makes late results for the old one stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScreenId(pub u64);

impl ScreenId {
    /// The root controller itself.
    pub const ROOT: ScreenId = ScreenId(0);
}

/// Index of a configured backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClientId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerId {
    /// Expiry of the status message with the given generation.
    StatusExpiry(u64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    Probe,
    Fetch,
    Reload,
    Search,
    Mutation,
    Command,
}

/// A backend call to run off the event loop.
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    /// Ping every configured backend and read its queue size.
    ProbeClients,
    /// Series list plus the quality profile table.
    ListSeries { client: ClientId },
    GetSeries { client: ClientId, id: EntryId },
    UpdateSeries { client: ClientId, series: Box<Series> },
    AddSeries { client: ClientId, series: Box<Series> },
    DeleteSeries { client: ClientId, id: EntryId, options: DeleteOptions },
    LookupSeries { client: ClientId, term: String },
    /// Episodes of one season plus the series' download queue.
    SeasonEpisodes { client: ClientId, series_id: EntryId, season: i32 },
    /// One episode with its file, plus the language profile table.
    EpisodeDetail { client: ClientId, episode_id: EntryId },
    DeleteEpisodeFile { client: ClientId, file_id: EntryId },
    RootFolders { client: ClientId },
    SendCommand { client: ClientId, command: BackendCommand },
}

impl Request {
    pub fn client(&self) -> Option<ClientId> {
        match self {
            Request::ProbeClients => None,
            Request::ListSeries { client }
            | Request::GetSeries { client, .. }
            | Request::UpdateSeries { client, .. }
            | Request::AddSeries { client, .. }
            | Request::DeleteSeries { client, .. }
            | Request::LookupSeries { client, .. }
            | Request::SeasonEpisodes { client, .. }
            | Request::EpisodeDetail { client, .. }
            | Request::DeleteEpisodeFile { client, .. }
            | Request::RootFolders { client }
            | Request::SendCommand { client, .. } => Some(*client),
        }
    }
}

/// An async command unit as requested by a screen: the engine attaches the
/// cancellation handle when it dispatches it.
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    pub op: OpId,
    pub target: ScreenId,
    pub kind: CommandKind,
    pub request: Request,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Dispatch(Command),
    Cancel { op: OpId },
    StartTimer { timer: TimerId, after: Duration },
    Quit,
}
