use std::sync::Arc;

use futures_util::future::{join, join_all, try_join};
use navigator_core::{ClientId, ClientSummary, Request, Response};
use navigator_logging::nav_warn;

use crate::{BackendError, CatalogBackend};

pub(crate) type Backends = Arc<Vec<Arc<dyn CatalogBackend>>>;

fn backend(
    backends: &[Arc<dyn CatalogBackend>],
    client: ClientId,
) -> Result<&dyn CatalogBackend, BackendError> {
    backends
        .get(client.0)
        .map(|b| b.as_ref())
        .ok_or(BackendError::UnknownClient(client.0))
}

/// Pings every backend and counts its queue. Failures land in the summary,
/// never in the result.
async fn probe(backend: &dyn CatalogBackend) -> ClientSummary {
    let outcome = async {
        backend.ping().await?;
        backend.queue().await
    }
    .await;
    match outcome {
        Ok(page) => ClientSummary {
            name: backend.name().to_string(),
            available: true,
            queued: page.total_records,
            error: None,
        },
        Err(err) => {
            nav_warn!("probe of {} failed: {err}", backend.name());
            ClientSummary {
                name: backend.name().to_string(),
                available: false,
                queued: 0,
                error: Some(err.to_string()),
            }
        }
    }
}

/// Runs one request against its backend.
pub async fn execute(
    backends: &[Arc<dyn CatalogBackend>],
    request: Request,
) -> Result<Response, BackendError> {
    match request {
        Request::ProbeClients => {
            let summaries = join_all(backends.iter().map(|b| probe(b.as_ref()))).await;
            Ok(Response::Clients(summaries))
        }
        Request::ListSeries { client } => {
            let backend = backend(backends, client)?;
            let (series, profiles) =
                try_join(backend.list_series(), backend.quality_profiles()).await?;
            Ok(Response::SeriesList { series, profiles })
        }
        Request::GetSeries { client, id } => {
            let series = backend(backends, client)?.get_series(id).await?;
            Ok(Response::Series(series))
        }
        Request::UpdateSeries { client, series } => {
            let updated = backend(backends, client)?.update_series(&series).await?;
            Ok(Response::Series(updated))
        }
        Request::AddSeries { client, series } => {
            let added = backend(backends, client)?.add_series(&series).await?;
            Ok(Response::Series(added))
        }
        Request::DeleteSeries {
            client,
            id,
            options,
        } => {
            backend(backends, client)?.delete_series(id, options).await?;
            Ok(Response::Done)
        }
        Request::LookupSeries { client, term } => {
            let results = backend(backends, client)?.lookup_series(&term).await?;
            Ok(Response::Lookup(results))
        }
        Request::SeasonEpisodes {
            client,
            series_id,
            season,
        } => {
            let backend = backend(backends, client)?;
            let (episodes, queue) = try_join(
                backend.episodes(series_id, season),
                backend.queue_for_series(series_id),
            )
            .await?;
            Ok(Response::Episodes { episodes, queue })
        }
        Request::EpisodeDetail { client, episode_id } => {
            let backend = backend(backends, client)?;
            let (episode, languages) =
                join(backend.episode(episode_id), backend.language_profiles()).await;
            // Language names are cosmetic; a server without them still shows the episode.
            let languages = languages.unwrap_or_else(|err| {
                nav_warn!("{}: no language profiles: {err}", backend.name());
                Vec::new()
            });
            Ok(Response::EpisodeDetail {
                episode: Box::new(episode?),
                languages,
            })
        }
        Request::DeleteEpisodeFile { client, file_id } => {
            backend(backends, client)?.delete_episode_file(file_id).await?;
            Ok(Response::Done)
        }
        Request::RootFolders { client } => {
            let folders = backend(backends, client)?.root_folders().await?;
            Ok(Response::RootFolders(folders))
        }
        Request::SendCommand { client, command } => {
            backend(backends, client)?.send_command(&command).await?;
            Ok(Response::Done)
        }
    }
}
