use std::sync::{mpsc, Arc};
use std::time::Duration;

use navigator_core::{
    BackendCommand, ClientId, Command, CommandKind, Completion, DeleteOptions, EntryId, Episode,
    ErrorKind, LanguageProfile, OpId, QualityProfile, QueueItem, QueuePage, Request, Response,
    RootFolder, ScreenId, Series, TimerId,
};
use navigator_engine::{BackendError, CatalogBackend, Dispatcher, EngineEvent, EventSink};
use pretty_assertions::assert_eq;
use tokio::runtime::Handle;

/// In-process backend. `stall` makes every listing hang until dropped.
struct FakeBackend {
    name: String,
    down: bool,
    stall: bool,
}

impl FakeBackend {
    fn up(name: &str) -> Arc<dyn CatalogBackend> {
        Arc::new(Self {
            name: name.to_string(),
            down: false,
            stall: false,
        })
    }

    fn down(name: &str) -> Arc<dyn CatalogBackend> {
        Arc::new(Self {
            name: name.to_string(),
            down: true,
            stall: false,
        })
    }

    fn stalled(name: &str) -> Arc<dyn CatalogBackend> {
        Arc::new(Self {
            name: name.to_string(),
            down: false,
            stall: true,
        })
    }

    fn check(&self) -> Result<(), BackendError> {
        if self.down {
            Err(BackendError::Network("connection refused".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait::async_trait]
impl CatalogBackend for FakeBackend {
    fn name(&self) -> &str {
        &self.name
    }

    async fn ping(&self) -> Result<(), BackendError> {
        self.check()
    }

    async fn list_series(&self) -> Result<Vec<Series>, BackendError> {
        if self.stall {
            std::future::pending::<()>().await;
        }
        self.check()?;
        Ok(vec![Series {
            id: 1,
            title: "Alpha".to_string(),
            ..Series::default()
        }])
    }

    async fn get_series(&self, id: EntryId) -> Result<Series, BackendError> {
        self.check()?;
        Ok(Series {
            id,
            ..Series::default()
        })
    }

    async fn update_series(&self, series: &Series) -> Result<Series, BackendError> {
        self.check()?;
        Ok(series.clone())
    }

    async fn delete_series(&self, _id: EntryId, _options: DeleteOptions) -> Result<(), BackendError> {
        self.check()
    }

    async fn lookup_series(&self, _term: &str) -> Result<Vec<Series>, BackendError> {
        self.check()?;
        Ok(Vec::new())
    }

    async fn add_series(&self, series: &Series) -> Result<Series, BackendError> {
        self.check()?;
        Ok(series.clone())
    }

    async fn queue(&self) -> Result<QueuePage, BackendError> {
        self.check()?;
        Ok(QueuePage {
            total_records: 3,
            ..QueuePage::default()
        })
    }

    async fn queue_for_series(&self, _series_id: EntryId) -> Result<Vec<QueueItem>, BackendError> {
        self.check()?;
        Ok(Vec::new())
    }

    async fn quality_profiles(&self) -> Result<Vec<QualityProfile>, BackendError> {
        self.check()?;
        Ok(vec![QualityProfile {
            id: 1,
            name: "HD".to_string(),
        }])
    }

    async fn send_command(&self, _command: &BackendCommand) -> Result<(), BackendError> {
        self.check()
    }

    async fn episodes(&self, _series_id: EntryId, _season: i32) -> Result<Vec<Episode>, BackendError> {
        self.check()?;
        Ok(Vec::new())
    }

    async fn episode(&self, id: EntryId) -> Result<Episode, BackendError> {
        self.check()?;
        Ok(Episode {
            id,
            ..Episode::default()
        })
    }

    /// Behaves like a server without language profiles.
    async fn language_profiles(&self) -> Result<Vec<LanguageProfile>, BackendError> {
        self.check()?;
        Err(BackendError::HttpStatus(404))
    }

    async fn delete_episode_file(&self, _file_id: EntryId) -> Result<(), BackendError> {
        self.check()
    }

    async fn root_folders(&self) -> Result<Vec<RootFolder>, BackendError> {
        self.check()?;
        Ok(Vec::new())
    }
}

fn dispatcher(backends: Vec<Arc<dyn CatalogBackend>>) -> (Dispatcher, mpsc::Receiver<EngineEvent>) {
    let (tx, rx) = mpsc::channel();
    let sink: Arc<dyn EventSink> = Arc::new(tx);
    (Dispatcher::new(backends, sink, Handle::current()), rx)
}

fn command(op: u64, request: Request) -> Command {
    Command {
        op: OpId(op),
        target: ScreenId(7),
        kind: CommandKind::Fetch,
        request,
    }
}

fn drain(rx: &mpsc::Receiver<EngineEvent>) -> Vec<EngineEvent> {
    rx.try_iter().collect()
}

#[tokio::test]
async fn completed_unit_reports_exactly_once() {
    navigator_logging::initialize_for_tests();
    let (dispatcher, rx) = dispatcher(vec![FakeBackend::up("home")]);

    let unit = dispatcher.dispatch(command(1, Request::ListSeries { client: ClientId(0) }));
    unit.join().await;

    let events = drain(&rx);
    assert_eq!(events.len(), 1);
    let EngineEvent::Completed(Completion { op, target, result }) = &events[0] else {
        panic!("expected a completion, got {events:?}");
    };
    assert_eq!((*op, *target), (OpId(1), ScreenId(7)));
    let Ok(Response::SeriesList { series, profiles }) = result else {
        panic!("unexpected result {result:?}");
    };
    assert_eq!(series.len(), 1);
    assert_eq!(profiles[0].name, "HD");
    assert_eq!(dispatcher.in_flight(), 0);
}

#[tokio::test]
async fn cancelled_unit_reports_nothing() {
    let (dispatcher, rx) = dispatcher(vec![FakeBackend::stalled("slow")]);

    let unit = dispatcher.dispatch(command(2, Request::ListSeries { client: ClientId(0) }));
    assert_eq!(dispatcher.in_flight(), 1);
    assert!(dispatcher.cancel(OpId(2)));
    assert!(unit.is_cancelled());
    unit.join().await;

    assert!(drain(&rx).is_empty());
    assert_eq!(dispatcher.in_flight(), 0);
    assert!(!dispatcher.cancel(OpId(2)), "second cancel is a no-op");
}

#[tokio::test]
async fn unknown_client_is_a_domain_error() {
    let (dispatcher, rx) = dispatcher(vec![FakeBackend::up("home")]);

    dispatcher
        .dispatch(command(3, Request::RootFolders { client: ClientId(4) }))
        .join()
        .await;

    let events = drain(&rx);
    let [EngineEvent::Completed(done)] = events.as_slice() else {
        panic!("expected one completion, got {events:?}");
    };
    let err = done.result.clone().unwrap_err();
    assert_eq!(err.kind, ErrorKind::Domain);
}

#[tokio::test]
async fn backend_failure_is_reported_as_transport() {
    let (dispatcher, rx) = dispatcher(vec![FakeBackend::down("off")]);

    dispatcher
        .dispatch(command(4, Request::GetSeries { client: ClientId(0), id: 9 }))
        .join()
        .await;

    let events = drain(&rx);
    let [EngineEvent::Completed(done)] = events.as_slice() else {
        panic!("expected one completion, got {events:?}");
    };
    let err = done.result.clone().unwrap_err();
    assert_eq!(err.kind, ErrorKind::Transport);
    assert_eq!(err.message, "network error: connection refused");
}

#[tokio::test]
async fn episode_detail_survives_missing_language_profiles() {
    let (dispatcher, rx) = dispatcher(vec![FakeBackend::up("home")]);

    dispatcher
        .dispatch(command(
            6,
            Request::EpisodeDetail {
                client: ClientId(0),
                episode_id: 12,
            },
        ))
        .join()
        .await;

    let events = drain(&rx);
    let [EngineEvent::Completed(done)] = events.as_slice() else {
        panic!("expected one completion, got {events:?}");
    };
    let Ok(Response::EpisodeDetail { episode, languages }) = &done.result else {
        panic!("unexpected result {:?}", done.result);
    };
    assert_eq!(episode.id, 12);
    assert!(languages.is_empty());
}

#[tokio::test]
async fn probe_reports_each_backend() {
    let (dispatcher, rx) = dispatcher(vec![FakeBackend::up("home"), FakeBackend::down("cabin")]);

    dispatcher
        .dispatch(command(5, Request::ProbeClients))
        .join()
        .await;

    let events = drain(&rx);
    let [EngineEvent::Completed(done)] = events.as_slice() else {
        panic!("expected one completion, got {events:?}");
    };
    let Ok(Response::Clients(clients)) = &done.result else {
        panic!("unexpected result {:?}", done.result);
    };
    assert_eq!(clients.len(), 2);
    assert!(clients[0].available);
    assert_eq!(clients[0].queued, 3);
    assert!(!clients[1].available);
    assert_eq!(
        clients[1].error.as_deref(),
        Some("network error: connection refused")
    );
}

#[tokio::test]
async fn timers_fire_after_their_delay() {
    let (dispatcher, rx) = dispatcher(Vec::new());

    let timer = dispatcher.start_timer(TimerId::StatusExpiry(3), Duration::from_millis(10));
    assert!(drain(&rx).is_empty());
    timer.await.expect("timer task");

    assert_eq!(drain(&rx), vec![EngineEvent::TimerFired(TimerId::StatusExpiry(3))]);
}
