//! Catalog data as exchanged with a Sonarr-compatible v3 API.
//!
//! Field names follow the wire format (camelCase). Resources that are sent
//! back to the server on update keep unknown fields in `extra` so a round
//! trip through the client never drops data the server owns.
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Server-assigned identity of a catalog record.
pub type EntryId = i64;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Series {
    pub id: EntryId,
    pub title: String,
    pub sort_title: String,
    pub overview: String,
    pub status: String,
    pub network: String,
    pub year: i32,
    pub path: String,
    pub tvdb_id: i64,
    pub monitored: bool,
    pub season_folder: bool,
    pub series_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root_folder_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality_profile_id: Option<EntryId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language_profile_id: Option<EntryId>,
    pub seasons: Vec<Season>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statistics: Option<SeriesStatistics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub add_options: Option<AddOptions>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Series {
    /// Lookup results that are already in the library carry a non-zero id.
    pub fn in_library(&self) -> bool {
        self.id != 0
    }

    pub fn season(&self, number: i32) -> Option<&Season> {
        self.seasons.iter().find(|s| s.season_number == number)
    }

    pub fn season_mut(&mut self, number: i32) -> Option<&mut Season> {
        self.seasons.iter_mut().find(|s| s.season_number == number)
    }

    /// Number of episode files on disk, used by the remove confirmation.
    pub fn episode_file_count(&self) -> i32 {
        self.statistics
            .as_ref()
            .map(|s| s.episode_file_count)
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Season {
    pub season_number: i32,
    pub monitored: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statistics: Option<SeasonStatistics>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SeasonStatistics {
    pub episode_file_count: i32,
    pub episode_count: i32,
    pub total_episode_count: i32,
    pub size_on_disk: i64,
    pub percent_of_episodes: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SeriesStatistics {
    pub season_count: i32,
    pub episode_file_count: i32,
    pub episode_count: i32,
    pub total_episode_count: i32,
    pub size_on_disk: i64,
    pub percent_of_episodes: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AddOptions {
    pub monitor: MonitorType,
    pub search_for_missing_episodes: bool,
    pub search_for_cutoff_unmet_episodes: bool,
}

/// Which episodes a newly added series starts out monitoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MonitorType {
    #[default]
    All,
    Future,
    Missing,
    Existing,
    FirstSeason,
    LastSeason,
    Pilot,
    None,
}

impl MonitorType {
    pub const ALL: [MonitorType; 8] = [
        MonitorType::All,
        MonitorType::Future,
        MonitorType::Missing,
        MonitorType::Existing,
        MonitorType::FirstSeason,
        MonitorType::LastSeason,
        MonitorType::Pilot,
        MonitorType::None,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MonitorType::All => "All Episodes",
            MonitorType::Future => "Future Episodes",
            MonitorType::Missing => "Missing Episodes",
            MonitorType::Existing => "Existing Episodes",
            MonitorType::FirstSeason => "First Season",
            MonitorType::LastSeason => "Last Season",
            MonitorType::Pilot => "Pilot Episode",
            MonitorType::None => "None",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Episode {
    pub id: EntryId,
    pub series_id: EntryId,
    pub season_number: i32,
    pub episode_number: i32,
    pub title: String,
    pub overview: String,
    pub monitored: bool,
    pub has_file: bool,
    pub episode_file_id: Option<EntryId>,
    pub air_date_utc: Option<String>,
    /// Only filled in when the episode is fetched on its own.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub episode_file: Option<EpisodeFile>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EpisodeFile {
    pub id: EntryId,
    pub path: String,
    pub relative_path: String,
    /// Bytes on disk.
    pub size: i64,
    pub quality: Option<FileQuality>,
    pub media_info: Option<MediaInfo>,
}

impl EpisodeFile {
    pub fn quality_name(&self) -> &str {
        self.quality
            .as_ref()
            .map_or("Unknown", |q| q.quality.name.as_str())
    }
}

/// Quality wrapper as the server nests it: `{"quality": {"id", "name"}}`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FileQuality {
    pub quality: QualityDefinition,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QualityDefinition {
    pub id: EntryId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MediaInfo {
    pub audio_bitrate: i64,
    pub audio_channels: f64,
    pub audio_codec: String,
    pub audio_languages: String,
    pub audio_stream_count: i32,
    pub video_bit_depth: i32,
    pub video_bitrate: i64,
    pub video_codec: String,
    pub video_fps: f64,
    pub resolution: String,
    pub run_time: String,
    pub scan_type: String,
    pub subtitles: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QueueItem {
    pub id: EntryId,
    pub series_id: Option<EntryId>,
    pub episode_id: Option<EntryId>,
    pub title: String,
    pub status: String,
    pub size: f64,
    #[serde(rename = "sizeleft")]
    pub size_left: f64,
    pub timeleft: Option<String>,
}

/// One page of the download queue.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QueuePage {
    pub page: u32,
    pub page_size: u32,
    pub total_records: u32,
    pub records: Vec<QueueItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QualityProfile {
    pub id: EntryId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LanguageProfile {
    pub id: EntryId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RootFolder {
    pub id: EntryId,
    pub path: String,
    pub free_space: Option<i64>,
}

/// Options for removing a series from the library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeleteOptions {
    pub delete_files: bool,
    pub add_import_list_exclusion: bool,
}

/// Server-side commands the client can trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCommand {
    RefreshSeries { series_id: EntryId },
    SeriesSearch { series_id: EntryId },
    SeasonSearch { series_id: EntryId, season_number: i32 },
    EpisodeSearch { episode_ids: Vec<EntryId> },
}

impl BackendCommand {
    /// Command name as the server expects it.
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::RefreshSeries { .. } => "RefreshSeries",
            BackendCommand::SeriesSearch { .. } => "SeriesSearch",
            BackendCommand::SeasonSearch { .. } => "SeasonSearch",
            BackendCommand::EpisodeSearch { .. } => "EpisodeSearch",
        }
    }
}

/// Probe result for one configured backend.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClientSummary {
    pub name: String,
    pub available: bool,
    pub queued: u32,
    pub error: Option<String>,
}
