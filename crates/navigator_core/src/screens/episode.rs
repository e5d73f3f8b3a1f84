//! One episode: where its file lives and, on request, what is inside it.
use crate::catalog::{EntryId, Episode, LanguageProfile, MediaInfo, Series};
use crate::correlate::{format_size, resolve_profile, sanitize_overview};
use crate::effect::{ClientId, CommandKind, Request, ScreenId};
use crate::guard::ReloadGuard;
use crate::msg::{CommandError, Completion, Key, Msg, Response};
use crate::view_model::{
    bind, EpisodeDetailView, EpisodeFileView, KeyBinding, MediaInfoRow, ScreenView,
};

use super::confirm::ConfirmDelete;
use super::{drop_stale, episode_label, Cx, Exit, Nav, Screen};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Panel {
    Summary,
    MediaInfo,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct EpisodeScreen {
    id: ScreenId,
    client: ClientId,
    series_title: String,
    network: String,
    language_profile_id: Option<EntryId>,
    /// The season row until the full record arrives.
    episode: Episode,
    languages: Vec<LanguageProfile>,
    loaded: bool,
    guard: ReloadGuard,
    panel: Panel,
    file_deleted: bool,
    sub: Option<Box<Screen>>,
}

impl EpisodeScreen {
    pub(crate) fn open(cx: &mut Cx<'_>, client: ClientId, series: &Series, episode: Episode) -> Self {
        let mut screen = Self {
            id: cx.new_screen_id(),
            client,
            series_title: series.title.clone(),
            network: series.network.clone(),
            language_profile_id: series.language_profile_id,
            episode,
            languages: Vec::new(),
            loaded: false,
            guard: ReloadGuard::new(),
            panel: Panel::Summary,
            file_deleted: false,
            sub: None,
        };
        screen.request(cx, CommandKind::Fetch);
        screen
    }

    pub(crate) fn id(&self) -> ScreenId {
        self.id
    }

    pub(crate) fn sub(&self) -> Option<&Screen> {
        self.sub.as_deref()
    }

    pub(crate) fn busy(&self) -> bool {
        self.guard.is_held()
    }

    fn request(&mut self, cx: &mut Cx<'_>, kind: CommandKind) -> bool {
        let op = cx.next_op();
        if !self.guard.try_acquire(op) {
            return false;
        }
        cx.dispatch_as(
            op,
            self.id,
            kind,
            Request::EpisodeDetail {
                client: self.client,
                episode_id: self.episode.id,
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
        if !self.guard.release(done.op) {
            drop_stale(&done);
            return;
        }
        match done.result {
            Ok(Response::EpisodeDetail { episode, languages }) => {
                let mut episode = *episode;
                episode.overview = sanitize_overview(&episode.overview);
                self.episode = episode;
                self.languages = languages;
                self.loaded = true;
                if !self.has_media_info() {
                    self.panel = Panel::Summary;
                }
            }
            Ok(other) => cx.error(CommandError::unexpected(&other).to_string()),
            Err(err) => cx.error(format!("Failed to load episode: {err}")),
        }
    }

    fn on_child(&mut self, cx: &mut Cx<'_>, nav: Nav) -> Nav {
        let exit = match nav {
            Nav::Back(exit) => exit,
            nav => return nav,
        };
        self.sub = None;
        if let Exit::EpisodeFileDeleted(_) = exit {
            self.episode.has_file = false;
            self.episode.episode_file_id = None;
            self.episode.episode_file = None;
            self.file_deleted = true;
            cx.info("Deleted episode file");
        }
        Nav::Stay
    }

    fn on_input(&mut self, cx: &mut Cx<'_>, msg: Msg) -> Nav {
        match (self.panel, msg) {
            (_, Msg::Completed(done)) => {
                drop_stale(&done);
                Nav::Stay
            }
            (_, Msg::Key(Key::Char('q'))) => Nav::Quit,
            (Panel::MediaInfo, Msg::Key(Key::Esc)) => {
                self.panel = Panel::Summary;
                Nav::Stay
            }
            (Panel::Summary, Msg::Key(key)) => self.on_key(cx, key),
            _ => Nav::Stay,
        }
    }

    fn on_key(&mut self, cx: &mut Cx<'_>, key: Key) -> Nav {
        match key {
            Key::Esc => {
                return Nav::Back(if self.file_deleted {
                    Exit::EpisodeFileDeleted(self.episode.id)
                } else {
                    Exit::Plain
                })
            }
            Key::Enter => {
                if self.has_media_info() {
                    self.panel = Panel::MediaInfo;
                } else if self.guard.is_held() {
                    cx.progress("Loading episode...");
                } else {
                    cx.error("No media info for this episode");
                }
            }
            Key::Char('r') => {
                if self.request(cx, CommandKind::Reload) {
                    cx.progress("Reloading episode...");
                }
            }
            Key::Char('d') | Key::Ctrl('d') => self.confirm_delete(cx),
            _ => {}
        }
        Nav::Stay
    }

    fn file_id(&self) -> Option<EntryId> {
        if !self.episode.has_file {
            return None;
        }
        self.episode
            .episode_file_id
            .or_else(|| self.episode.episode_file.as_ref().map(|f| f.id))
    }

    fn media_info(&self) -> Option<&MediaInfo> {
        self.episode
            .episode_file
            .as_ref()
            .filter(|_| self.episode.has_file)
            .and_then(|file| file.media_info.as_ref())
    }

    fn has_media_info(&self) -> bool {
        self.media_info().is_some()
    }

    fn confirm_delete(&mut self, cx: &mut Cx<'_>) {
        let Some(file_id) = self.file_id() else {
            cx.error("Episode has no file");
            return;
        };
        let confirm = ConfirmDelete::new(
            cx.new_screen_id(),
            self.client,
            self.episode.id,
            file_id,
            episode_label(&self.episode),
        );
        self.sub = Some(Box::new(Screen::ConfirmDelete(confirm)));
    }

    pub(crate) fn view(&self) -> ScreenView {
        let episode = &self.episode;
        let file = episode
            .episode_file
            .as_ref()
            .filter(|_| episode.has_file)
            .map(|file| EpisodeFileView {
                path: file.path.clone(),
                size: format_size(file.size),
                language: resolve_profile(&self.languages, self.language_profile_id)
                    .name()
                    .to_string(),
                quality: file.quality_name().to_string(),
            });
        let media_info = match self.panel {
            Panel::MediaInfo => self.media_info().map(media_info_rows),
            Panel::Summary => None,
        };
        ScreenView::Episode(EpisodeDetailView {
            series_title: self.series_title.clone(),
            season: episode.season_number,
            number: episode.episode_number,
            title: episode.title.clone(),
            airs: episode
                .air_date_utc
                .clone()
                .unwrap_or_else(|| "TBA".to_string()),
            network: self.network.clone(),
            overview: if episode.overview.is_empty() {
                "No episode overview".to_string()
            } else {
                episode.overview.clone()
            },
            loading: !self.loaded && self.guard.is_held(),
            file,
            media_info,
        })
    }

    pub(crate) fn bindings(&self) -> Vec<KeyBinding> {
        match self.panel {
            Panel::MediaInfo => vec![bind("esc", "close"), bind("q", "quit")],
            Panel::Summary => vec![
                bind("enter", "media info"),
                bind("r", "reload"),
                bind("d", "delete file"),
                bind("esc", "back"),
                bind("q", "quit"),
            ],
        }
    }
}

fn media_info_rows(info: &MediaInfo) -> Vec<MediaInfoRow> {
    let row = |label, value: String| MediaInfoRow { label, value };
    vec![
        row("Audio Bitrate", info.audio_bitrate.to_string()),
        row("Audio Channels", info.audio_channels.to_string()),
        row("Audio Codec", info.audio_codec.clone()),
        row("Audio Languages", info.audio_languages.clone()),
        row("Audio Stream Count", info.audio_stream_count.to_string()),
        row("Video Bit Depth", info.video_bit_depth.to_string()),
        row("Video Bitrate", info.video_bitrate.to_string()),
        row("Video Codec", info.video_codec.clone()),
        row("Video Fps", info.video_fps.to_string()),
        row("Resolution", info.resolution.clone()),
        row("Run Time", info.run_time.clone()),
        row("Scan Type", info.scan_type.clone()),
        row("Subtitles", info.subtitles.clone()),
    ]
}
