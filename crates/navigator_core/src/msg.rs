use std::fmt;

use crate::catalog::{
    ClientSummary, Episode, LanguageProfile, QualityProfile, QueueItem, RootFolder, Series,
};
use crate::effect::{OpId, ScreenId, TimerId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Ctrl(char),
    Enter,
    Esc,
    Up,
    Down,
    Left,
    Right,
    Tab,
    BackTab,
    Backspace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mouse {
    WheelUp,
    WheelDown,
    /// Click on a list row (0-based, relative to the list).
    Click { row: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// The event loop is up; kicks off the backend probe.
    Started,
    Key(Key),
    Mouse(Mouse),
    Resized { width: u16, height: u16 },
    /// Render tick, drives spinners.
    Tick,
    TimerFired(TimerId),
    /// Result of an async command unit.
    Completed(Completion),
}

/// The single result message of one async command unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub op: OpId,
    pub target: ScreenId,
    pub result: Result<Response, CommandError>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    Clients(Vec<ClientSummary>),
    SeriesList {
        series: Vec<Series>,
        profiles: Vec<QualityProfile>,
    },
    Series(Series),
    Lookup(Vec<Series>),
    Episodes {
        episodes: Vec<Episode>,
        queue: Vec<QueueItem>,
    },
    EpisodeDetail {
        episode: Box<Episode>,
        /// Empty when the server has no language profiles.
        languages: Vec<LanguageProfile>,
    },
    RootFolders(Vec<RootFolder>),
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Backend unreachable, timed out, TLS failure.
    Transport,
    /// Unexpected payload shape or HTTP status.
    Protocol,
    /// Operation that makes no sense in the current selection.
    Domain,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandError {
    pub kind: ErrorKind,
    pub message: String,
}

impl CommandError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub(crate) fn unexpected(response: &Response) -> Self {
        Self::new(
            ErrorKind::Protocol,
            format!("unexpected response: {}", response.name()),
        )
    }
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for CommandError {}

impl Response {
    fn name(&self) -> &'static str {
        match self {
            Response::Clients(_) => "clients",
            Response::SeriesList { .. } => "series list",
            Response::Series(_) => "series",
            Response::Lookup(_) => "lookup",
            Response::Episodes { .. } => "episodes",
            Response::EpisodeDetail { .. } => "episode",
            Response::RootFolders(_) => "root folders",
            Response::Done => "done",
        }
    }
}
