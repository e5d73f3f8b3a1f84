use navigator_core::{
    BackendCommand, DeleteOptions, EntryId, Episode, LanguageProfile, QualityProfile, QueueItem,
    QueuePage, RootFolder, Series,
};

use crate::BackendError;

/// Typed calls against one remote catalog. Implementations are stateless per
/// call; dropping a returned future abandons the request.
#[async_trait::async_trait]
pub trait CatalogBackend: Send + Sync {
    /// Display name from the config.
    fn name(&self) -> &str;

    async fn ping(&self) -> Result<(), BackendError>;

    async fn list_series(&self) -> Result<Vec<Series>, BackendError>;

    async fn get_series(&self, id: EntryId) -> Result<Series, BackendError>;

    /// Replaces the stored series and returns what the server kept.
    async fn update_series(&self, series: &Series) -> Result<Series, BackendError>;

    async fn delete_series(&self, id: EntryId, options: DeleteOptions)
        -> Result<(), BackendError>;

    async fn lookup_series(&self, term: &str) -> Result<Vec<Series>, BackendError>;

    async fn add_series(&self, series: &Series) -> Result<Series, BackendError>;

    async fn queue(&self) -> Result<QueuePage, BackendError>;

    async fn queue_for_series(&self, series_id: EntryId) -> Result<Vec<QueueItem>, BackendError>;

    async fn quality_profiles(&self) -> Result<Vec<QualityProfile>, BackendError>;

    async fn send_command(&self, command: &BackendCommand) -> Result<(), BackendError>;

    async fn episodes(&self, series_id: EntryId, season: i32)
        -> Result<Vec<Episode>, BackendError>;

    /// A single episode including its file and media info.
    async fn episode(&self, id: EntryId) -> Result<Episode, BackendError>;

    /// Servers without language profiles (Sonarr v4) answer with an error.
    async fn language_profiles(&self) -> Result<Vec<LanguageProfile>, BackendError>;

    async fn delete_episode_file(&self, file_id: EntryId) -> Result<(), BackendError>;

    async fn root_folders(&self) -> Result<Vec<RootFolder>, BackendError>;
}
