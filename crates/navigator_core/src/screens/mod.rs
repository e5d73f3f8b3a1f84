//! Screen controllers.
//!
//! Each screen is a small state machine owning its own data. Parents hold
//! their active sub-screen and react to the [`Nav`] it returns; results of
//! background work reach a screen only while its [`ScreenId`] is on the
//! active chain.
mod add_series;
mod clients;
mod confirm;
mod detail;
mod episode;
mod list;
mod search;
mod season;
mod series;

pub(crate) use clients::ClientsScreen;

use std::time::Duration;

use navigator_logging::nav_debug;

use crate::catalog::{EntryId, Episode, Series};
use crate::correlate::{sanitize_overview, sanitize_title};
use crate::effect::{Command, CommandKind, Effect, OpId, Request, ScreenId};
use crate::msg::{Completion, Msg};
use crate::status::{Severity, StatusBar, ERROR_TIMEOUT, INFO_TIMEOUT, PROGRESS_TIMEOUT};
use crate::view_model::{KeyBinding, ScreenView};

use add_series::AddSeriesScreen;
use confirm::{ConfirmDelete, ConfirmRemove};
use detail::SeriesDetail;
use episode::EpisodeScreen;
use search::SearchScreen;
use season::SeasonScreen;
use series::SeriesBrowser;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Screen {
    Clients(ClientsScreen),
    Series(SeriesBrowser),
    Detail(SeriesDetail),
    Season(SeasonScreen),
    Episode(EpisodeScreen),
    Search(SearchScreen),
    AddSeries(AddSeriesScreen),
    ConfirmRemove(ConfirmRemove),
    ConfirmDelete(ConfirmDelete),
}

/// What a screen asks of its parent after handling an event.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Nav {
    Stay,
    Back(Exit),
    Quit,
}

/// What a closing screen changed in memory, so the parent can update its own
/// copy instead of refetching.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Exit {
    Plain,
    SeriesChanged(Box<Series>),
    SeriesRemoved(EntryId),
    OpenSeries(Box<Series>),
    SeriesAdded(Box<Series>),
    EpisodeFileDeleted(EntryId),
}

impl Screen {
    pub(crate) fn id(&self) -> ScreenId {
        match self {
            Screen::Clients(s) => s.id(),
            Screen::Series(s) => s.id(),
            Screen::Detail(s) => s.id(),
            Screen::Season(s) => s.id(),
            Screen::Episode(s) => s.id(),
            Screen::Search(s) => s.id(),
            Screen::AddSeries(s) => s.id(),
            Screen::ConfirmRemove(s) => s.id(),
            Screen::ConfirmDelete(s) => s.id(),
        }
    }

    fn sub(&self) -> Option<&Screen> {
        match self {
            Screen::Clients(s) => s.sub(),
            Screen::Series(s) => s.sub(),
            Screen::Detail(s) => s.sub(),
            Screen::Season(s) => s.sub(),
            Screen::Episode(s) => s.sub(),
            Screen::Search(s) => s.sub(),
            Screen::AddSeries(_) | Screen::ConfirmRemove(_) | Screen::ConfirmDelete(_) => None,
        }
    }

    /// Whether a result for `target` still has a live recipient.
    pub(crate) fn contains(&self, target: ScreenId) -> bool {
        if self.id() == target {
            return true;
        }
        if let Screen::Series(browser) = self {
            if browser.awaits_child(target) {
                return true;
            }
        }
        self.sub().is_some_and(|sub| sub.contains(target))
    }

    /// The innermost screen, the one the user is looking at.
    pub(crate) fn active(&self) -> &Screen {
        match self.sub() {
            Some(sub) => sub.active(),
            None => self,
        }
    }

    pub(crate) fn update(&mut self, cx: &mut Cx<'_>, msg: Msg) -> Nav {
        match self {
            Screen::Clients(s) => s.update(cx, msg),
            Screen::Series(s) => s.update(cx, msg),
            Screen::Detail(s) => s.update(cx, msg),
            Screen::Season(s) => s.update(cx, msg),
            Screen::Episode(s) => s.update(cx, msg),
            Screen::Search(s) => s.update(cx, msg),
            Screen::AddSeries(s) => s.update(cx, msg),
            Screen::ConfirmRemove(s) => s.update(cx, msg),
            Screen::ConfirmDelete(s) => s.update(cx, msg),
        }
    }

    /// View of this screen alone; callers pick the screen via [`Screen::active`].
    pub(crate) fn view(&self) -> ScreenView {
        match self {
            Screen::Clients(s) => s.view(),
            Screen::Series(s) => s.view(),
            Screen::Detail(s) => s.view(),
            Screen::Season(s) => s.view(),
            Screen::Episode(s) => s.view(),
            Screen::Search(s) => s.view(),
            Screen::AddSeries(s) => s.view(),
            Screen::ConfirmRemove(s) => s.view(),
            Screen::ConfirmDelete(s) => s.view(),
        }
    }

    pub(crate) fn bindings(&self) -> Vec<KeyBinding> {
        match self {
            Screen::Clients(s) => s.bindings(),
            Screen::Series(s) => s.bindings(),
            Screen::Detail(s) => s.bindings(),
            Screen::Season(s) => s.bindings(),
            Screen::Episode(s) => s.bindings(),
            Screen::Search(s) => s.bindings(),
            Screen::AddSeries(s) => s.bindings(),
            Screen::ConfirmRemove(s) => s.bindings(),
            Screen::ConfirmDelete(s) => s.bindings(),
        }
    }

    pub(crate) fn busy(&self) -> bool {
        match self {
            Screen::Clients(_) => false,
            Screen::Series(s) => s.busy(),
            Screen::Detail(s) => s.busy(),
            Screen::Season(s) => s.busy(),
            Screen::Episode(s) => s.busy(),
            Screen::Search(s) => s.busy(),
            Screen::AddSeries(s) => s.busy(),
            Screen::ConfirmRemove(s) => s.busy(),
            Screen::ConfirmDelete(s) => s.busy(),
        }
    }

    /// Whether printable keys are going into a text field.
    pub(crate) fn captures_text(&self) -> bool {
        match self {
            Screen::Search(s) => s.captures_text(),
            _ => false,
        }
    }

    /// Name of the backend being browsed, if any.
    pub(crate) fn client_name(&self) -> Option<&str> {
        match self {
            Screen::Series(s) => Some(s.client_name()),
            other => other.sub().and_then(Screen::client_name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct IdAllocator {
    next_op: u64,
    next_screen: u64,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self {
            next_op: 1,
            next_screen: 1,
        }
    }
}

/// Everything a screen may touch besides its own state.
pub(crate) struct Cx<'a> {
    pub(crate) ids: &'a mut IdAllocator,
    pub(crate) status: &'a mut StatusBar,
    pub(crate) effects: &'a mut Vec<Effect>,
}

impl Cx<'_> {
    pub(crate) fn new_screen_id(&mut self) -> ScreenId {
        let id = ScreenId(self.ids.next_screen);
        self.ids.next_screen += 1;
        id
    }

    pub(crate) fn next_op(&mut self) -> OpId {
        let op = OpId(self.ids.next_op);
        self.ids.next_op += 1;
        op
    }

    pub(crate) fn dispatch(&mut self, target: ScreenId, kind: CommandKind, request: Request) -> OpId {
        let op = self.next_op();
        self.dispatch_as(op, target, kind, request);
        op
    }

    /// Dispatches under an id the caller already allocated (and maybe used to
    /// take a reload guard).
    pub(crate) fn dispatch_as(
        &mut self,
        op: OpId,
        target: ScreenId,
        kind: CommandKind,
        request: Request,
    ) {
        nav_debug!("dispatch op={} target={} kind={kind:?}", op.0, target.0);
        self.effects.push(Effect::Dispatch(Command {
            op,
            target,
            kind,
            request,
        }));
    }

    pub(crate) fn cancel(&mut self, op: OpId) {
        nav_debug!("cancel op={}", op.0);
        self.effects.push(Effect::Cancel { op });
    }

    pub(crate) fn info(&mut self, text: impl Into<String>) {
        self.notice(text, Severity::Info, INFO_TIMEOUT);
    }

    /// Short-lived notice for work that is about to finish on its own.
    pub(crate) fn progress(&mut self, text: impl Into<String>) {
        self.notice(text, Severity::Info, PROGRESS_TIMEOUT);
    }

    pub(crate) fn error(&mut self, text: impl Into<String>) {
        self.notice(text, Severity::Error, ERROR_TIMEOUT);
    }

    fn notice(&mut self, text: impl Into<String>, severity: Severity, after: Duration) {
        let timer = self.status.set(text, severity, after);
        self.effects.push(timer);
    }
}

pub(crate) fn drop_stale(done: &Completion) {
    nav_debug!(
        "dropping stale result op={} target={}",
        done.op.0,
        done.target.0
    );
}

pub(crate) fn clean_series(mut series: Series) -> Series {
    series.title = sanitize_title(&series.title);
    series.overview = sanitize_overview(&series.overview);
    series
}

/// `S01E02 - Title`, as shown in confirmations.
pub(crate) fn episode_label(episode: &Episode) -> String {
    format!(
        "S{:02}E{:02} - {}",
        episode.season_number, episode.episode_number, episode.title
    )
}

pub(crate) fn sort_key(series: &Series) -> &str {
    if series.sort_title.is_empty() {
        &series.title
    } else {
        &series.sort_title
    }
}
