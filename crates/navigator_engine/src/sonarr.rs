use std::time::Duration;

use navigator_core::{
    BackendCommand, DeleteOptions, EntryId, Episode, LanguageProfile, QualityProfile, QueueItem,
    QueuePage, RootFolder, Series,
};
use navigator_logging::{nav_trace, nav_warn};
use reqwest::header::{HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::error::map_reqwest_error;
use crate::{BackendError, CatalogBackend};

const API_KEY_HEADER: &str = "X-Api-Key";
const QUEUE_PAGE_SIZE: u32 = 1000;

#[derive(Debug, Clone)]
pub struct SonarrSettings {
    pub name: String,
    /// Base URL, e.g. `http://localhost:8989`.
    pub host: String,
    pub api_key: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl SonarrSettings {
    pub fn new(name: impl Into<String>, host: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            host: host.into(),
            api_key: api_key.into(),
            connect_timeout: Duration::from_secs(5),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// REST adapter for the Sonarr v3 API.
#[derive(Debug, Clone)]
pub struct SonarrClient {
    name: String,
    base: Url,
    api_key: HeaderValue,
    http: reqwest::Client,
}

impl SonarrClient {
    pub fn new(settings: SonarrSettings) -> Result<Self, BackendError> {
        let mut base =
            Url::parse(&settings.host).map_err(|err| BackendError::InvalidUrl(err.to_string()))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let mut api_key = HeaderValue::from_str(&settings.api_key)
            .map_err(|err| BackendError::InvalidUrl(format!("api key: {err}")))?;
        api_key.set_sensitive(true);

        let http = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(map_reqwest_error)?;

        Ok(Self {
            name: settings.name,
            base,
            api_key,
            http,
        })
    }

    fn url(&self, path: &str, query: &[(&str, String)]) -> Result<Url, BackendError> {
        let mut url = self
            .base
            .join(path)
            .map_err(|err| BackendError::InvalidUrl(err.to_string()))?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    async fn request(
        &self,
        method: Method,
        url: Url,
        body: Option<Vec<u8>>,
    ) -> Result<reqwest::Response, BackendError> {
        nav_trace!("{} {} {}", self.name, method, url.path());
        let mut request = self
            .http
            .request(method, url)
            .header(API_KEY_HEADER, self.api_key.clone())
            .header(ACCEPT, "application/json");
        if let Some(body) = body {
            request = request
                .header(CONTENT_TYPE, "application/json")
                .body(body);
        }
        let response = request.send().await.map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            nav_warn!("{}: {} answered {}", self.name, response.url().path(), status);
            return Err(BackendError::HttpStatus(status.as_u16()));
        }
        Ok(response)
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, BackendError> {
        let bytes = response.bytes().await.map_err(map_reqwest_error)?;
        serde_json::from_slice(&bytes).map_err(|err| BackendError::Decode(err.to_string()))
    }

    fn encode<B: Serialize>(body: &B) -> Result<Vec<u8>, BackendError> {
        serde_json::to_vec(body).map_err(|err| BackendError::Decode(err.to_string()))
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, BackendError> {
        let url = self.url(path, query)?;
        let response = self.request(Method::GET, url, None).await?;
        Self::decode(response).await
    }

    async fn send_json<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T, BackendError> {
        let url = self.url(path, &[])?;
        let response = self.request(method, url, Some(Self::encode(body)?)).await?;
        Self::decode(response).await
    }

    async fn delete(&self, path: &str, query: &[(&str, String)]) -> Result<(), BackendError> {
        let url = self.url(path, query)?;
        self.request(Method::DELETE, url, None).await?;
        Ok(())
    }
}

fn command_body(command: &BackendCommand) -> serde_json::Value {
    let name = command.name();
    match command {
        BackendCommand::RefreshSeries { series_id } | BackendCommand::SeriesSearch { series_id } => {
            serde_json::json!({ "name": name, "seriesId": series_id })
        }
        BackendCommand::SeasonSearch {
            series_id,
            season_number,
        } => serde_json::json!({
            "name": name,
            "seriesId": series_id,
            "seasonNumber": season_number,
        }),
        BackendCommand::EpisodeSearch { episode_ids } => {
            serde_json::json!({ "name": name, "episodeIds": episode_ids })
        }
    }
}

#[async_trait::async_trait]
impl CatalogBackend for SonarrClient {
    fn name(&self) -> &str {
        &self.name
    }

    async fn ping(&self) -> Result<(), BackendError> {
        let url = self.url("ping", &[])?;
        self.request(Method::GET, url, None).await?;
        Ok(())
    }

    async fn list_series(&self) -> Result<Vec<Series>, BackendError> {
        self.get("api/v3/series", &[]).await
    }

    async fn get_series(&self, id: EntryId) -> Result<Series, BackendError> {
        self.get(&format!("api/v3/series/{id}"), &[]).await
    }

    async fn update_series(&self, series: &Series) -> Result<Series, BackendError> {
        self.send_json(Method::PUT, &format!("api/v3/series/{}", series.id), series)
            .await
    }

    async fn delete_series(&self, id: EntryId, options: DeleteOptions) -> Result<(), BackendError> {
        self.delete(
            &format!("api/v3/series/{id}"),
            &[
                ("deleteFiles", options.delete_files.to_string()),
                (
                    "addImportListExclusion",
                    options.add_import_list_exclusion.to_string(),
                ),
            ],
        )
        .await
    }

    async fn lookup_series(&self, term: &str) -> Result<Vec<Series>, BackendError> {
        self.get("api/v3/series/lookup", &[("term", term.to_string())])
            .await
    }

    async fn add_series(&self, series: &Series) -> Result<Series, BackendError> {
        self.send_json(Method::POST, "api/v3/series", series).await
    }

    async fn queue(&self) -> Result<QueuePage, BackendError> {
        self.get("api/v3/queue", &[("pageSize", QUEUE_PAGE_SIZE.to_string())])
            .await
    }

    async fn queue_for_series(&self, series_id: EntryId) -> Result<Vec<QueueItem>, BackendError> {
        self.get(
            "api/v3/queue/details",
            &[("seriesId", series_id.to_string())],
        )
        .await
    }

    async fn quality_profiles(&self) -> Result<Vec<QualityProfile>, BackendError> {
        self.get("api/v3/qualityprofile", &[]).await
    }

    async fn send_command(&self, command: &BackendCommand) -> Result<(), BackendError> {
        let _: serde_json::Value = self
            .send_json(Method::POST, "api/v3/command", &command_body(command))
            .await?;
        Ok(())
    }

    async fn episodes(&self, series_id: EntryId, season: i32) -> Result<Vec<Episode>, BackendError> {
        self.get(
            "api/v3/episode",
            &[
                ("seriesId", series_id.to_string()),
                ("seasonNumber", season.to_string()),
            ],
        )
        .await
    }

    async fn episode(&self, id: EntryId) -> Result<Episode, BackendError> {
        self.get(&format!("api/v3/episode/{id}"), &[]).await
    }

    async fn language_profiles(&self) -> Result<Vec<LanguageProfile>, BackendError> {
        self.get("api/v3/languageprofile", &[]).await
    }

    async fn delete_episode_file(&self, file_id: EntryId) -> Result<(), BackendError> {
        self.delete(&format!("api/v3/episodefile/{file_id}"), &[])
            .await
    }

    async fn root_folders(&self) -> Result<Vec<RootFolder>, BackendError> {
        self.get("api/v3/rootfolder", &[]).await
    }
}
