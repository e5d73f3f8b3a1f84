use crate::catalog::EntryId;
use crate::status::StatusMessage;

const SPINNER: [char; 4] = ['|', '/', '-', '\\'];

pub(crate) fn spinner_frame(ticks: u64) -> char {
    SPINNER[(ticks % SPINNER.len() as u64) as usize]
}

/// One entry of the help line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyBinding {
    pub keys: &'static str,
    pub help: &'static str,
}

pub(crate) const fn bind(keys: &'static str, help: &'static str) -> KeyBinding {
    KeyBinding { keys, help }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppViewModel {
    pub title: String,
    pub body: ScreenView,
    pub bindings: Vec<KeyBinding>,
    pub status: Option<StatusMessage>,
    pub show_help: bool,
    /// Spinner frame while background work is visible on screen.
    pub spinner: Option<char>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScreenView {
    Loading { message: String },
    Error { message: String },
    Clients(ClientsView),
    SeriesList(SeriesListView),
    Detail(DetailView),
    Season(SeasonView),
    Episode(EpisodeDetailView),
    Search(SearchView),
    AddSeries(AddSeriesView),
    ConfirmRemove(ConfirmRemoveView),
    ConfirmDelete(ConfirmDeleteView),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientsView {
    pub rows: Vec<ClientRow>,
    pub cursor: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientRow {
    pub name: String,
    pub available: bool,
    pub queued: u32,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesListView {
    pub rows: Vec<SeriesRow>,
    pub cursor: usize,
    pub loading: bool,
    pub reloading: bool,
    pub opening: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesRow {
    pub id: EntryId,
    pub title: String,
    pub year: i32,
    pub network: String,
    pub status: String,
    pub profile: String,
    pub monitored: bool,
    pub seasons: usize,
    pub files: i32,
    pub episodes: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailView {
    pub title: String,
    pub overview: String,
    pub year: i32,
    pub network: String,
    pub status: String,
    pub profile: String,
    pub path: String,
    pub monitored: bool,
    pub seasons: Vec<SeasonRow>,
    pub cursor: usize,
    pub reloading: bool,
    pub updating: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeasonRow {
    pub number: i32,
    pub monitored: bool,
    pub files: i32,
    pub episodes: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeasonView {
    pub series_title: String,
    pub season: i32,
    pub monitored: bool,
    pub loading: bool,
    pub reloading: bool,
    pub rows: Vec<EpisodeView>,
    pub cursor: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeView {
    pub number: i32,
    pub title: String,
    pub monitored: bool,
    pub has_file: bool,
    pub download: Option<DownloadView>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DownloadView {
    /// Completion fraction in `[0, 1]`.
    pub progress: f64,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodeDetailView {
    pub series_title: String,
    pub season: i32,
    pub number: i32,
    pub title: String,
    /// Air date as sent by the server, `TBA` when unknown.
    pub airs: String,
    pub network: String,
    pub overview: String,
    pub loading: bool,
    pub file: Option<EpisodeFileView>,
    /// Present while the media info panel is open.
    pub media_info: Option<Vec<MediaInfoRow>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodeFileView {
    pub path: String,
    pub size: String,
    pub language: String,
    pub quality: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaInfoRow {
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchView {
    pub input: String,
    pub searching: bool,
    pub showing_results: bool,
    pub results: Vec<SearchRow>,
    pub cursor: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRow {
    pub title: String,
    pub year: i32,
    pub network: String,
    pub in_library: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddSeriesView {
    pub title: String,
    pub year: i32,
    pub loading: bool,
    pub submitting: bool,
    pub fields: Vec<FormField>,
    pub cursor: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmRemoveView {
    pub title: String,
    pub file_count: i32,
    pub delete_files: bool,
    pub add_exclusion: bool,
    pub cursor: usize,
    pub removing: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmDeleteView {
    pub label: String,
    pub yes_selected: bool,
    pub deleting: bool,
}
