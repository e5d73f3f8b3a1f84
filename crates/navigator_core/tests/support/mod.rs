#![allow(dead_code)]

use std::sync::Once;

use navigator_core::{
    update, AppState, ClientConfig, ClientSummary, ClientsConfig, Command, CommandError,
    Completion, Effect, ErrorKind, Key, Msg, QualityProfile, Request, Response, Season, Series,
    StatusMessage,
};

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(navigator_logging::initialize_for_tests);
}

pub fn config() -> ClientsConfig {
    ClientsConfig {
        clients: vec![ClientConfig {
            name: "Sonarr".to_string(),
            default_quality_profile: Some("HD-1080p".to_string()),
        }],
    }
}

pub fn profiles() -> Vec<QualityProfile> {
    vec![
        QualityProfile {
            id: 1,
            name: "Any".to_string(),
        },
        QualityProfile {
            id: 4,
            name: "HD-1080p".to_string(),
        },
    ]
}

pub fn season(number: i32, monitored: bool) -> Season {
    Season {
        season_number: number,
        monitored,
        ..Season::default()
    }
}

pub fn series(id: i64, title: &str) -> Series {
    Series {
        id,
        title: title.to_string(),
        sort_title: title.to_lowercase(),
        monitored: true,
        quality_profile_id: Some(4),
        seasons: vec![season(1, true), season(2, false)],
        ..Series::default()
    }
}

pub fn dispatched(effects: &[Effect]) -> Vec<Command> {
    effects
        .iter()
        .filter_map(|e| match e {
            Effect::Dispatch(command) => Some(command.clone()),
            _ => None,
        })
        .collect()
}

/// The single command in `effects`, panicking otherwise.
pub fn only_dispatch(effects: &[Effect]) -> Command {
    let mut commands = dispatched(effects);
    assert_eq!(commands.len(), 1, "expected one dispatch in {effects:?}");
    commands.remove(0)
}

pub fn press(state: AppState, key: Key) -> (AppState, Vec<Effect>) {
    update(state, Msg::Key(key))
}

pub fn type_text(mut state: AppState, text: &str) -> AppState {
    for c in text.chars() {
        state = press(state, Key::Char(c)).0;
    }
    state
}

pub fn complete(
    state: AppState,
    command: &Command,
    result: Result<Response, CommandError>,
) -> (AppState, Vec<Effect>) {
    update(
        state,
        Msg::Completed(Completion {
            op: command.op,
            target: command.target,
            result,
        }),
    )
}

pub fn transport_error(message: &str) -> CommandError {
    CommandError::new(ErrorKind::Transport, message)
}

pub fn status(state: &AppState) -> Option<StatusMessage> {
    state.view().status
}

/// Probes one available backend and lands on the client list.
pub fn ready() -> AppState {
    init_logging();
    let state = AppState::new(config());
    let (state, effects) = update(state, Msg::Started);
    let probe = only_dispatch(&effects);
    assert_eq!(probe.request, Request::ProbeClients);
    let summaries = vec![ClientSummary {
        name: "Sonarr".to_string(),
        available: true,
        queued: 2,
        error: None,
    }];
    complete(state, &probe, Ok(Response::Clients(summaries))).0
}

/// Opens the only backend and completes its list fetch with `list`.
pub fn series_list(list: Vec<Series>) -> AppState {
    let (state, effects) = press(ready(), Key::Enter);
    let fetch = only_dispatch(&effects);
    assert!(matches!(fetch.request, Request::ListSeries { .. }));
    complete(
        state,
        &fetch,
        Ok(Response::SeriesList {
            series: list,
            profiles: profiles(),
        }),
    )
    .0
}

/// Opens the series under the cursor and completes its detail fetch.
pub fn open_detail(state: AppState, detail: Series) -> AppState {
    let (state, effects) = press(state, Key::Enter);
    let fetch = only_dispatch(&effects);
    assert!(matches!(fetch.request, Request::GetSeries { .. }));
    complete(state, &fetch, Ok(Response::Series(detail))).0
}
