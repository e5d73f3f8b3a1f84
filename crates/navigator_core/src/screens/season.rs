use crate::catalog::{BackendCommand, Series};
use crate::correlate::{correlate_queue, download_progress, EpisodeRow};
use crate::effect::{ClientId, CommandKind, OpId, Request, ScreenId};
use crate::guard::ReloadGuard;
use crate::msg::{CommandError, Completion, Key, Msg, Response};
use crate::view_model::{bind, DownloadView, EpisodeView, KeyBinding, ScreenView, SeasonView};

use super::confirm::ConfirmDelete;
use super::episode::EpisodeScreen;
use super::list::{ListAction, ListCursor};
use super::{clean_series, drop_stale, episode_label, Cx, Exit, Nav, Screen};

/// Episodes of one season with their in-progress downloads.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SeasonScreen {
    id: ScreenId,
    client: ClientId,
    series: Series,
    season: i32,
    loaded: bool,
    rows: Vec<EpisodeRow>,
    cursor: ListCursor,
    guard: ReloadGuard,
    pending_update: Option<OpId>,
    commands: Vec<OpId>,
    changed: bool,
    sub: Option<Box<Screen>>,
}

impl SeasonScreen {
    pub(crate) fn open(cx: &mut Cx<'_>, client: ClientId, series: Series, season: i32) -> Self {
        let mut screen = Self {
            id: cx.new_screen_id(),
            client,
            series,
            season,
            loaded: false,
            rows: Vec::new(),
            cursor: ListCursor::default(),
            guard: ReloadGuard::new(),
            pending_update: None,
            commands: Vec::new(),
            changed: false,
            sub: None,
        };
        screen.request_episodes(cx, CommandKind::Fetch);
        screen
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

    fn request_episodes(&mut self, cx: &mut Cx<'_>, kind: CommandKind) -> bool {
        let op = cx.next_op();
        if !self.guard.try_acquire(op) {
            return false;
        }
        cx.dispatch_as(
            op,
            self.id,
            kind,
            Request::SeasonEpisodes {
                client: self.client,
                series_id: self.series.id,
                season: self.season,
            },
        );
        true
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
                    self.on_child(cx, nav)
                }
                None => self.on_input(cx, msg),
            },
        }
    }

    fn on_completed(&mut self, cx: &mut Cx<'_>, done: Completion) {
        if self.guard.release(done.op) {
            match done.result {
                Ok(Response::Episodes { episodes, queue }) => {
                    let mut rows = correlate_queue(episodes, &queue);
                    rows.sort_by(|a, b| b.episode.episode_number.cmp(&a.episode.episode_number));
                    self.rows = rows;
                    self.loaded = true;
                    self.cursor.clamp(self.rows.len());
                }
                Ok(other) => cx.error(CommandError::unexpected(&other).to_string()),
                Err(err) => cx.error(format!("Failed to fetch episodes: {err}")),
            }
        } else if self.pending_update == Some(done.op) {
            self.pending_update = None;
            match done.result {
                Ok(Response::Series(series)) => {
                    self.series = clean_series(series);
                    self.changed = true;
                }
                Ok(other) => cx.error(CommandError::unexpected(&other).to_string()),
                Err(err) => cx.error(format!("Failed to toggle season monitoring: {err}")),
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

    fn on_child(&mut self, cx: &mut Cx<'_>, nav: Nav) -> Nav {
        let exit = match nav {
            Nav::Back(exit) => exit,
            nav => return nav,
        };
        self.sub = None;
        if let Exit::EpisodeFileDeleted(episode_id) = exit {
            if let Some(row) = self.rows.iter_mut().find(|r| r.episode.id == episode_id) {
                row.episode.has_file = false;
                row.episode.episode_file_id = None;
            }
            cx.info("Deleted episode file");
        }
        Nav::Stay
    }

    fn on_input(&mut self, cx: &mut Cx<'_>, msg: Msg) -> Nav {
        match msg {
            Msg::Key(key) => self.on_key(cx, key),
            Msg::Mouse(mouse) => {
                if self.cursor.on_mouse(mouse, self.rows.len()) == ListAction::Activate {
                    self.open_episode(cx);
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
            Key::Esc if self.pending_update.is_some() => {
                cx.info("Waiting for the update to finish...");
            }
            Key::Esc => {
                return Nav::Back(if self.changed {
                    Exit::SeriesChanged(Box::new(self.series.clone()))
                } else {
                    Exit::Plain
                })
            }
            Key::Char('q') => return Nav::Quit,
            Key::Enter => self.open_episode(cx),
            Key::Char('r') => {
                if self.request_episodes(cx, CommandKind::Reload) {
                    cx.progress("Reloading episodes...");
                }
            }
            Key::Char('m') => self.toggle_monitor(cx),
            Key::Char('s') | Key::Ctrl('s') => self.search_episode(cx),
            Key::Char('d') | Key::Ctrl('d') => self.confirm_delete(cx),
            key => {
                self.cursor.on_key(key, self.rows.len());
            }
        }
        Nav::Stay
    }

    fn toggle_monitor(&mut self, cx: &mut Cx<'_>) {
        if self.pending_update.is_some() {
            cx.error("An update is already in progress");
            return;
        }
        let mut copy = self.series.clone();
        let Some(season) = copy.season_mut(self.season) else {
            cx.error(format!("Season {} not found", self.season));
            return;
        };
        season.monitored = !season.monitored;
        let op = cx.dispatch(
            self.id,
            CommandKind::Mutation,
            Request::UpdateSeries {
                client: self.client,
                series: Box::new(copy),
            },
        );
        self.pending_update = Some(op);
    }

    fn open_episode(&mut self, cx: &mut Cx<'_>) {
        let Some(row) = self.rows.get(self.cursor.index()) else {
            return;
        };
        let episode = EpisodeScreen::open(cx, self.client, &self.series, row.episode.clone());
        self.sub = Some(Box::new(Screen::Episode(episode)));
    }

    fn search_episode(&mut self, cx: &mut Cx<'_>) {
        let Some(row) = self.rows.get(self.cursor.index()) else {
            cx.error("No episode selected");
            return;
        };
        let number = row.episode.episode_number;
        let op = cx.dispatch(
            self.id,
            CommandKind::Command,
            Request::SendCommand {
                client: self.client,
                command: BackendCommand::EpisodeSearch {
                    episode_ids: vec![row.episode.id],
                },
            },
        );
        self.commands.push(op);
        cx.info(format!("Searching for episode {number}..."));
    }

    fn confirm_delete(&mut self, cx: &mut Cx<'_>) {
        let Some(row) = self.rows.get(self.cursor.index()) else {
            return;
        };
        let episode = &row.episode;
        let Some(file_id) = episode.episode_file_id.filter(|_| episode.has_file) else {
            cx.error("Episode has no file");
            return;
        };
        let label = episode_label(episode);
        let confirm =
            ConfirmDelete::new(cx.new_screen_id(), self.client, episode.id, file_id, label);
        self.sub = Some(Box::new(Screen::ConfirmDelete(confirm)));
    }

    pub(crate) fn view(&self) -> ScreenView {
        ScreenView::Season(SeasonView {
            series_title: self.series.title.clone(),
            season: self.season,
            monitored: self
                .series
                .season(self.season)
                .is_some_and(|s| s.monitored),
            loading: !self.loaded,
            reloading: self.loaded && self.guard.is_held(),
            rows: self
                .rows
                .iter()
                .map(|row| EpisodeView {
                    number: row.episode.episode_number,
                    title: row.episode.title.clone(),
                    monitored: row.episode.monitored,
                    has_file: row.episode.has_file,
                    download: row.download.as_ref().map(|item| DownloadView {
                        progress: download_progress(item),
                        status: item.status.clone(),
                    }),
                })
                .collect(),
            cursor: self.cursor.index(),
        })
    }

    pub(crate) fn bindings(&self) -> Vec<KeyBinding> {
        vec![
            bind("enter", "open episode"),
            bind("r", "reload"),
            bind("m", "toggle season monitor"),
            bind("s", "search episode"),
            bind("d", "delete episode file"),
            bind("esc", "back"),
            bind("q", "quit"),
        ]
    }
}
