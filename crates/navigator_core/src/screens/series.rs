use navigator_logging::nav_debug;

use crate::catalog::{EntryId, QualityProfile, Series};
use crate::correlate::{resolve_profile, sort_by_key};
use crate::effect::{ClientId, CommandKind, OpId, Request, ScreenId};
use crate::guard::ReloadGuard;
use crate::msg::{CommandError, Completion, Key, Msg, Response};
use crate::view_model::{bind, KeyBinding, ScreenView, SeriesListView, SeriesRow};

use super::detail::SeriesDetail;
use super::list::{ListAction, ListCursor};
use super::search::SearchScreen;
use super::{clean_series, drop_stale, sort_key, Cx, Exit, Nav, Screen};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BrowserPhase {
    FetchList,
    ShowList,
    /// Waiting for the detail of `series_id`; the result targets `child`.
    LoadDetail {
        child: ScreenId,
        series_id: EntryId,
        op: OpId,
    },
    ShowDetail,
    Search,
}

/// Series list of one backend and the root of everything opened from it.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SeriesBrowser {
    id: ScreenId,
    client: ClientId,
    client_name: String,
    default_profile: Option<String>,
    phase: BrowserPhase,
    series: Vec<Series>,
    profiles: Vec<QualityProfile>,
    cursor: ListCursor,
    guard: ReloadGuard,
    sub: Option<Box<Screen>>,
}

impl SeriesBrowser {
    pub(crate) fn open(
        cx: &mut Cx<'_>,
        client: ClientId,
        client_name: String,
        default_profile: Option<String>,
    ) -> Self {
        let mut browser = Self {
            id: cx.new_screen_id(),
            client,
            client_name,
            default_profile,
            phase: BrowserPhase::FetchList,
            series: Vec::new(),
            profiles: Vec::new(),
            cursor: ListCursor::default(),
            guard: ReloadGuard::new(),
            sub: None,
        };
        browser.request_list(cx);
        browser
    }

    pub(crate) fn id(&self) -> ScreenId {
        self.id
    }

    pub(crate) fn sub(&self) -> Option<&Screen> {
        self.sub.as_deref()
    }

    pub(crate) fn client_name(&self) -> &str {
        &self.client_name
    }

    pub(crate) fn awaits_child(&self, target: ScreenId) -> bool {
        matches!(self.phase, BrowserPhase::LoadDetail { child, .. } if child == target)
    }

    pub(crate) fn busy(&self) -> bool {
        self.guard.is_held() || matches!(self.phase, BrowserPhase::LoadDetail { .. })
    }

    pub(crate) fn update(&mut self, cx: &mut Cx<'_>, msg: Msg) -> Nav {
        match msg {
            Msg::Completed(done) if done.target == self.id => {
                self.on_list(cx, done);
                Nav::Stay
            }
            Msg::Completed(done) if self.awaits_child(done.target) => {
                self.on_detail(cx, done);
                Nav::Stay
            }
            msg => match self.sub.as_mut() {
                Some(sub) => {
                    let nav = sub.update(cx, msg);
                    self.on_child(cx, nav)
                }
                None => self.on_input(cx, msg),
            },
        }
    }

    /// Dispatches the list unit unless one is already in flight.
    fn request_list(&mut self, cx: &mut Cx<'_>) -> bool {
        let op = cx.next_op();
        if !self.guard.try_acquire(op) {
            return false;
        }
        let kind = if self.phase == BrowserPhase::FetchList {
            CommandKind::Fetch
        } else {
            CommandKind::Reload
        };
        cx.dispatch_as(
            op,
            self.id,
            kind,
            Request::ListSeries {
                client: self.client,
            },
        );
        true
    }

    fn reload(&mut self, cx: &mut Cx<'_>) {
        if self.request_list(cx) {
            cx.progress("Reloading...");
        }
    }

    fn on_list(&mut self, cx: &mut Cx<'_>, done: Completion) {
        if !self.guard.release(done.op) {
            drop_stale(&done);
            return;
        }
        match done.result {
            Ok(Response::SeriesList { series, profiles }) => {
                self.apply_list(series, profiles);
                if self.phase == BrowserPhase::FetchList {
                    self.phase = BrowserPhase::ShowList;
                }
            }
            Ok(other) => cx.error(CommandError::unexpected(&other).to_string()),
            Err(err) => cx.error(format!("Failed to fetch series: {err}")),
        }
    }

    fn apply_list(&mut self, series: Vec<Series>, profiles: Vec<QualityProfile>) {
        let selected = self.selected().map(|s| s.id);
        self.series = series.into_iter().map(clean_series).collect();
        sort_by_key(&mut self.series, sort_key);
        self.profiles = profiles;
        match selected.and_then(|id| self.series.iter().position(|s| s.id == id)) {
            Some(index) => self.cursor.set(index, self.series.len()),
            None => self.cursor.clamp(self.series.len()),
        }
    }

    fn on_detail(&mut self, cx: &mut Cx<'_>, done: Completion) {
        let BrowserPhase::LoadDetail { child, op, .. } = self.phase else {
            return;
        };
        if done.op != op {
            drop_stale(&done);
            return;
        }
        match done.result {
            Ok(Response::Series(series)) => {
                let detail =
                    SeriesDetail::new(child, self.client, clean_series(series), self.profiles.clone());
                self.sub = Some(Box::new(Screen::Detail(detail)));
                self.phase = BrowserPhase::ShowDetail;
            }
            Ok(other) => {
                cx.error(CommandError::unexpected(&other).to_string());
                self.phase = BrowserPhase::ShowList;
            }
            Err(err) => {
                cx.error(format!("Failed to load series: {err}"));
                self.phase = BrowserPhase::ShowList;
            }
        }
    }

    fn on_child(&mut self, cx: &mut Cx<'_>, nav: Nav) -> Nav {
        let exit = match nav {
            Nav::Back(exit) => exit,
            nav => return nav,
        };
        self.sub = None;
        self.phase = BrowserPhase::ShowList;
        match exit {
            Exit::Plain | Exit::EpisodeFileDeleted(_) => {}
            Exit::SeriesChanged(series) => self.upsert(*series),
            Exit::SeriesRemoved(id) => {
                if let Some(index) = self.series.iter().position(|s| s.id == id) {
                    let removed = self.series.remove(index);
                    cx.info(format!("Removed series: {}", removed.title));
                }
                self.cursor.clamp(self.series.len());
            }
            Exit::OpenSeries(series) => {
                if !self.open_series(cx, series.id) {
                    cx.info(format!("{} opens once the list has reloaded", series.title));
                }
            }
            Exit::SeriesAdded(series) => {
                cx.info(format!("Added series: {}", series.title));
                self.upsert(*series);
            }
        }
        Nav::Stay
    }

    /// Replaces the entry with the same id, or inserts it in sort order, and
    /// moves the cursor onto it.
    fn upsert(&mut self, series: Series) {
        let id = series.id;
        match self.series.iter_mut().find(|s| s.id == id) {
            Some(existing) => *existing = series,
            None => self.series.push(series),
        }
        sort_by_key(&mut self.series, sort_key);
        if let Some(index) = self.series.iter().position(|s| s.id == id) {
            self.cursor.set(index, self.series.len());
        }
    }

    fn on_input(&mut self, cx: &mut Cx<'_>, msg: Msg) -> Nav {
        match (self.phase, msg) {
            (_, Msg::Completed(done)) => {
                drop_stale(&done);
                Nav::Stay
            }
            (_, Msg::Key(Key::Char('q'))) => Nav::Quit,
            (BrowserPhase::FetchList, Msg::Key(Key::Esc)) => Nav::Back(Exit::Plain),
            (BrowserPhase::FetchList, Msg::Key(Key::Char('r'))) => {
                self.reload(cx);
                Nav::Stay
            }
            (BrowserPhase::ShowList, Msg::Key(key)) => self.on_list_key(cx, key),
            (BrowserPhase::ShowList, Msg::Mouse(mouse)) => {
                if self.cursor.on_mouse(mouse, self.series.len()) == ListAction::Activate {
                    self.select(cx);
                }
                Nav::Stay
            }
            (BrowserPhase::LoadDetail { series_id, .. }, Msg::Key(Key::Esc)) => {
                nav_debug!("abandoning detail load for series {series_id}");
                self.phase = BrowserPhase::ShowList;
                Nav::Stay
            }
            _ => Nav::Stay,
        }
    }

    fn on_list_key(&mut self, cx: &mut Cx<'_>, key: Key) -> Nav {
        match key {
            Key::Esc => return Nav::Back(Exit::Plain),
            Key::Enter => self.select(cx),
            Key::Char('r') => self.reload(cx),
            Key::Char('a') | Key::Char('/') => {
                let search = SearchScreen::open(
                    cx,
                    self.client,
                    self.profiles.clone(),
                    self.default_profile.clone(),
                );
                self.sub = Some(Box::new(Screen::Search(search)));
                self.phase = BrowserPhase::Search;
            }
            key => {
                self.cursor.on_key(key, self.series.len());
            }
        }
        Nav::Stay
    }

    fn select(&mut self, cx: &mut Cx<'_>) {
        if let Some(id) = self.selected().map(|s| s.id) {
            self.open_series(cx, id);
        }
    }

    /// Starts loading the detail of `series_id`. Refused while the list is
    /// reloading, since the reload would replace the entries the detail
    /// flows back into.
    fn open_series(&mut self, cx: &mut Cx<'_>, series_id: EntryId) -> bool {
        if self.guard.is_held() {
            return false;
        }
        let child = cx.new_screen_id();
        let op = cx.dispatch(
            child,
            CommandKind::Fetch,
            Request::GetSeries {
                client: self.client,
                id: series_id,
            },
        );
        self.phase = BrowserPhase::LoadDetail {
            child,
            series_id,
            op,
        };
        true
    }

    fn selected(&self) -> Option<&Series> {
        self.series.get(self.cursor.index())
    }

    pub(crate) fn view(&self) -> ScreenView {
        let rows = self
            .series
            .iter()
            .map(|s| {
                let stats = s.statistics.as_ref();
                SeriesRow {
                    id: s.id,
                    title: s.title.clone(),
                    year: s.year,
                    network: s.network.clone(),
                    status: s.status.clone(),
                    profile: resolve_profile(&self.profiles, s.quality_profile_id)
                        .name()
                        .to_string(),
                    monitored: s.monitored,
                    seasons: s.seasons.len(),
                    files: stats.map_or(0, |st| st.episode_file_count),
                    episodes: stats.map_or(0, |st| st.episode_count),
                }
            })
            .collect();
        ScreenView::SeriesList(SeriesListView {
            rows,
            cursor: self.cursor.index(),
            loading: self.phase == BrowserPhase::FetchList,
            reloading: self.guard.is_held() && self.phase != BrowserPhase::FetchList,
            opening: matches!(self.phase, BrowserPhase::LoadDetail { .. }),
        })
    }

    pub(crate) fn bindings(&self) -> Vec<KeyBinding> {
        match self.phase {
            BrowserPhase::FetchList => vec![
                bind("r", "retry"),
                bind("esc", "back"),
                bind("q", "quit"),
            ],
            BrowserPhase::LoadDetail { .. } => vec![bind("esc", "cancel"), bind("q", "quit")],
            _ => vec![
                bind("up/k", "move up"),
                bind("down/j", "move down"),
                bind("enter", "open"),
                bind("r", "reload"),
                bind("a", "add series"),
                bind("esc", "back"),
                bind("q", "quit"),
            ],
        }
    }
}
