use crate::catalog::{BackendCommand, QualityProfile, Series};
use crate::correlate::resolve_profile;
use crate::effect::{ClientId, CommandKind, OpId, Request, ScreenId};
use crate::guard::ReloadGuard;
use crate::msg::{CommandError, Completion, Key, Msg, Response};
use crate::view_model::{bind, DetailView, KeyBinding, ScreenView, SeasonRow};

use super::confirm::ConfirmRemove;
use super::list::{ListAction, ListCursor};
use super::season::SeasonScreen;
use super::{clean_series, drop_stale, Cx, Exit, Nav, Screen};

/// One series with its seasons, newest season first.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SeriesDetail {
    id: ScreenId,
    client: ClientId,
    series: Series,
    profiles: Vec<QualityProfile>,
    cursor: ListCursor,
    guard: ReloadGuard,
    pending_update: Option<OpId>,
    commands: Vec<OpId>,
    /// Set once an update succeeded, so the list can pick up the new copy.
    changed: bool,
    sub: Option<Box<Screen>>,
}

impl SeriesDetail {
    pub(crate) fn new(
        id: ScreenId,
        client: ClientId,
        series: Series,
        profiles: Vec<QualityProfile>,
    ) -> Self {
        let mut detail = Self {
            id,
            client,
            series: Series::default(),
            profiles,
            cursor: ListCursor::default(),
            guard: ReloadGuard::new(),
            pending_update: None,
            commands: Vec::new(),
            changed: false,
            sub: None,
        };
        detail.set_series(series);
        detail
    }

    pub(crate) fn id(&self) -> ScreenId {
        self.id
    }

    pub(crate) fn sub(&self) -> Option<&Screen> {
        self.sub.as_deref()
    }

    pub(crate) fn busy(&self) -> bool {
        self.guard.is_held() || self.pending_update.is_some()
    }

    fn set_series(&mut self, series: Series) {
        self.series = clean_series(series);
        self.series
            .seasons
            .sort_by(|a, b| b.season_number.cmp(&a.season_number));
        self.cursor.clamp(self.series.seasons.len());
    }

    pub(crate) fn update(&mut self, cx: &mut Cx<'_>, msg: Msg) -> Nav {
        match msg {
            Msg::Completed(done) if done.target == self.id => {
                self.on_completed(cx, done);
                Nav::Stay
            }
            msg => match self.sub.as_mut() {
                Some(sub) => {
                    let nav = sub.update(cx, msg);
                    self.on_child(nav)
                }
                None => self.on_input(cx, msg),
            },
        }
    }

    fn on_completed(&mut self, cx: &mut Cx<'_>, done: Completion) {
        if self.guard.release(done.op) {
            match done.result {
                Ok(Response::Series(series)) => self.set_series(series),
                Ok(other) => cx.error(CommandError::unexpected(&other).to_string()),
                Err(err) => cx.error(format!("Failed to reload series: {err}")),
            }
        } else if self.pending_update == Some(done.op) {
            self.pending_update = None;
            match done.result {
                Ok(Response::Series(series)) => {
                    self.set_series(series);
                    self.changed = true;
                }
                Ok(other) => cx.error(CommandError::unexpected(&other).to_string()),
                Err(err) => cx.error(format!("Failed to update series: {err}")),
            }
        } else if let Some(index) = self.commands.iter().position(|op| *op == done.op) {
            self.commands.remove(index);
            if let Err(err) = done.result {
                cx.error(format!("Command failed: {err}"));
            }
        } else {
            drop_stale(&done);
        }
    }

    fn on_child(&mut self, nav: Nav) -> Nav {
        let exit = match nav {
            Nav::Back(exit) => exit,
            nav => return nav,
        };
        self.sub = None;
        match exit {
            Exit::SeriesChanged(series) => {
                self.set_series(*series);
                self.changed = true;
            }
            Exit::SeriesRemoved(id) => return Nav::Back(Exit::SeriesRemoved(id)),
            _ => {}
        }
        Nav::Stay
    }

    fn on_input(&mut self, cx: &mut Cx<'_>, msg: Msg) -> Nav {
        match msg {
            Msg::Key(key) => self.on_key(cx, key),
            Msg::Mouse(mouse) => {
                if self.cursor.on_mouse(mouse, self.series.seasons.len()) == ListAction::Activate {
                    self.open_season(cx);
                }
                Nav::Stay
            }
            Msg::Completed(done) => {
                drop_stale(&done);
                Nav::Stay
            }
            _ => Nav::Stay,
        }
    }

    fn on_key(&mut self, cx: &mut Cx<'_>, key: Key) -> Nav {
        match key {
            // The update result has nowhere to land once this screen is gone.
            Key::Esc if self.pending_update.is_some() => {
                cx.info("Waiting for the update to finish...");
            }
            Key::Esc => return Nav::Back(self.exit()),
            Key::Char('q') => return Nav::Quit,
            Key::Enter => self.open_season(cx),
            Key::Char('r') => self.reload(cx),
            Key::Char('m') => self.toggle_season(cx),
            Key::Char('M') => self.toggle_series(cx),
            Key::Ctrl('r') => {
                self.send(
                    cx,
                    BackendCommand::RefreshSeries {
                        series_id: self.series.id,
                    },
                );
                cx.info("Refreshing series...");
            }
            Key::Ctrl('s') => {
                let Some(season_number) = self.selected_season(cx) else {
                    return Nav::Stay;
                };
                self.send(
                    cx,
                    BackendCommand::SeasonSearch {
                        series_id: self.series.id,
                        season_number,
                    },
                );
                cx.info(format!("Searching for season {season_number}..."));
            }
            Key::Ctrl('a') => {
                self.send(
                    cx,
                    BackendCommand::SeriesSearch {
                        series_id: self.series.id,
                    },
                );
                cx.info("Searching for all monitored episodes...");
            }
            Key::Char('d') | Key::Ctrl('d') => {
                let confirm = ConfirmRemove::new(cx.new_screen_id(), self.client, &self.series);
                self.sub = Some(Box::new(Screen::ConfirmRemove(confirm)));
            }
            key => {
                self.cursor.on_key(key, self.series.seasons.len());
            }
        }
        Nav::Stay
    }

    fn exit(&self) -> Exit {
        if self.changed {
            Exit::SeriesChanged(Box::new(self.series.clone()))
        } else {
            Exit::Plain
        }
    }

    fn selected_season(&self, cx: &mut Cx<'_>) -> Option<i32> {
        let number = self
            .series
            .seasons
            .get(self.cursor.index())
            .map(|s| s.season_number);
        if number.is_none() {
            cx.error("No season selected");
        }
        number
    }

    fn open_season(&mut self, cx: &mut Cx<'_>) {
        let Some(season_number) = self.selected_season(cx) else {
            return;
        };
        let season = SeasonScreen::open(cx, self.client, self.series.clone(), season_number);
        self.sub = Some(Box::new(Screen::Season(season)));
    }

    /// No-op while an update is in flight: the reply would carry the series
    /// from before the update and overwrite it.
    fn reload(&mut self, cx: &mut Cx<'_>) {
        if self.pending_update.is_some() {
            return;
        }
        let op = cx.next_op();
        if !self.guard.try_acquire(op) {
            return;
        }
        cx.dispatch_as(
            op,
            self.id,
            CommandKind::Reload,
            Request::GetSeries {
                client: self.client,
                id: self.series.id,
            },
        );
        cx.progress("Reloading...");
    }

    fn toggle_season(&mut self, cx: &mut Cx<'_>) {
        let Some(season_number) = self.selected_season(cx) else {
            return;
        };
        let mut copy = self.series.clone();
        if let Some(season) = copy.season_mut(season_number) {
            season.monitored = !season.monitored;
        }
        self.submit_update(cx, copy);
    }

    fn toggle_series(&mut self, cx: &mut Cx<'_>) {
        let mut copy = self.series.clone();
        copy.monitored = !copy.monitored;
        self.submit_update(cx, copy);
    }

    /// Local state only changes once the backend accepted the copy.
    fn submit_update(&mut self, cx: &mut Cx<'_>, series: Series) {
        if self.pending_update.is_some() {
            cx.error("An update is already in progress");
            return;
        }
        if self.guard.is_held() {
            cx.error("Wait for the reload to finish");
            return;
        }
        let op = cx.dispatch(
            self.id,
            CommandKind::Mutation,
            Request::UpdateSeries {
                client: self.client,
                series: Box::new(series),
            },
        );
        self.pending_update = Some(op);
    }

    fn send(&mut self, cx: &mut Cx<'_>, command: BackendCommand) {
        let op = cx.dispatch(
            self.id,
            CommandKind::Command,
            Request::SendCommand {
                client: self.client,
                command,
            },
        );
        self.commands.push(op);
    }

    pub(crate) fn view(&self) -> ScreenView {
        let s = &self.series;
        ScreenView::Detail(DetailView {
            title: s.title.clone(),
            overview: s.overview.clone(),
            year: s.year,
            network: s.network.clone(),
            status: s.status.clone(),
            profile: resolve_profile(&self.profiles, s.quality_profile_id)
                .name()
                .to_string(),
            path: s.path.clone(),
            monitored: s.monitored,
            seasons: s
                .seasons
                .iter()
                .map(|season| {
                    let stats = season.statistics.as_ref();
                    SeasonRow {
                        number: season.season_number,
                        monitored: season.monitored,
                        files: stats.map_or(0, |st| st.episode_file_count),
                        episodes: stats.map_or(0, |st| st.episode_count),
                    }
                })
                .collect(),
            cursor: self.cursor.index(),
            reloading: self.guard.is_held(),
            updating: self.pending_update.is_some(),
        })
    }

    pub(crate) fn bindings(&self) -> Vec<KeyBinding> {
        vec![
            bind("enter", "open season"),
            bind("r", "reload"),
            bind("m", "toggle season monitor"),
            bind("M", "toggle series monitor"),
            bind("ctrl+r", "refresh & scan"),
            bind("ctrl+s", "search season"),
            bind("ctrl+a", "search all"),
            bind("d", "remove series"),
            bind("esc", "back"),
            bind("q", "quit"),
        ]
    }
}
