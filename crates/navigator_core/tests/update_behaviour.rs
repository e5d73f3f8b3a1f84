mod support;

use navigator_core::{
    update, AppState, ClientSummary, ClientsConfig, Effect, Key, Msg, Request, Response,
    ScreenId, ScreenView, Severity, TimerId,
};
use pretty_assertions::assert_eq;

use support::{
    complete, config, init_logging, only_dispatch, press, ready, series, series_list, status,
    transport_error,
};

#[test]
fn started_dispatches_one_probe_to_the_root() {
    init_logging();
    let (state, effects) = update(AppState::new(config()), Msg::Started);
    let probe = only_dispatch(&effects);

    assert_eq!(probe.target, ScreenId::ROOT);
    assert_eq!(probe.request, Request::ProbeClients);
    assert!(matches!(state.view().body, ScreenView::Loading { .. }));
    assert!(state.view().spinner.is_some());

    let (_, effects) = update(state, Msg::Started);
    assert!(effects.is_empty());
}

#[test]
fn no_backends_is_an_error_state() {
    init_logging();
    let (state, effects) = update(AppState::new(ClientsConfig::default()), Msg::Started);

    assert!(effects.is_empty());
    assert!(matches!(state.view().body, ScreenView::Error { .. }));

    let (state, effects) = press(state, Key::Char('q'));
    assert!(state.should_quit());
    assert_eq!(effects, vec![Effect::Quit]);
}

#[test]
fn failed_probe_moves_to_error() {
    init_logging();
    let (state, effects) = update(AppState::new(config()), Msg::Started);
    let probe = only_dispatch(&effects);
    let (state, _) = complete(state, &probe, Err(transport_error("connection refused")));

    match state.view().body {
        ScreenView::Error { message } => assert!(message.contains("connection refused")),
        other => panic!("unexpected view {other:?}"),
    }
}

#[test]
fn ctrl_c_quits_while_loading() {
    init_logging();
    let (state, _) = update(AppState::new(config()), Msg::Started);
    let (state, effects) = press(state, Key::Ctrl('c'));

    assert!(state.should_quit());
    assert_eq!(effects, vec![Effect::Quit]);
}

#[test]
fn ctrl_c_quits_from_a_nested_screen() {
    let state = series_list(vec![series(1, "Alpha")]);
    let (state, _) = press(state, Key::Char('a'));
    let (state, effects) = press(state, Key::Ctrl('c'));

    assert!(state.should_quit());
    assert_eq!(effects, vec![Effect::Quit]);
}

#[test]
fn unavailable_backend_is_reported_and_cannot_be_opened() {
    init_logging();
    let (state, effects) = update(AppState::new(config()), Msg::Started);
    let probe = only_dispatch(&effects);
    let summaries = vec![ClientSummary {
        name: "Sonarr".to_string(),
        available: false,
        queued: 0,
        error: Some("timed out".to_string()),
    }];
    let (state, effects) = complete(state, &probe, Ok(Response::Clients(summaries)));

    let message = status(&state).expect("probe failure is shown");
    assert_eq!(message.severity, Severity::Error);
    assert_eq!(message.text, "Sonarr: timed out");
    assert!(effects
        .iter()
        .any(|e| matches!(e, Effect::StartTimer { .. })));

    let (state, effects) = press(state, Key::Enter);
    assert!(support::dispatched(&effects).is_empty());
    assert_eq!(
        status(&state).map(|m| m.text),
        Some("Sonarr is not available".to_string())
    );
}

#[test]
fn client_list_shows_probe_results() {
    let state = ready();
    let view = state.view();

    assert_eq!(view.title, "Navigator");
    match view.body {
        ScreenView::Clients(clients) => {
            assert_eq!(clients.rows.len(), 1);
            assert_eq!(clients.rows[0].name, "Sonarr");
            assert!(clients.rows[0].available);
            assert_eq!(clients.rows[0].queued, 2);
        }
        other => panic!("unexpected view {other:?}"),
    }
}

#[test]
fn series_list_is_sanitized_sorted_and_resolves_profiles() {
    let mut zeta = series(1, "Zeta");
    zeta.overview = "Line one.\nLine two".to_string();
    let mut alpha = series(2, "Alpha\u{a0}Show");
    alpha.sort_title = "alpha show".to_string();
    alpha.quality_profile_id = Some(99);

    let state = series_list(vec![zeta, alpha]);
    let view = state.view();

    assert_eq!(view.title, "Navigator - Sonarr");
    match view.body {
        ScreenView::SeriesList(list) => {
            let titles: Vec<_> = list.rows.iter().map(|r| r.title.as_str()).collect();
            assert_eq!(titles, vec!["Alpha Show", "Zeta"]);
            assert_eq!(list.rows[0].profile, "Unknown");
            assert_eq!(list.rows[1].profile, "HD-1080p");
            assert!(!list.loading);
            assert!(!list.reloading);
        }
        other => panic!("unexpected view {other:?}"),
    }
}

#[test]
fn failed_list_fetch_stays_and_can_retry() {
    let (state, effects) = press(ready(), Key::Enter);
    let fetch = only_dispatch(&effects);
    let (state, _) = complete(state, &fetch, Err(transport_error("timeout")));

    match state.view().body {
        ScreenView::SeriesList(list) => assert!(list.loading),
        other => panic!("unexpected view {other:?}"),
    }
    assert_eq!(status(&state).map(|m| m.severity), Some(Severity::Error));

    let (_, effects) = press(state, Key::Char('r'));
    assert!(matches!(
        only_dispatch(&effects).request,
        Request::ListSeries { .. }
    ));
}

#[test]
fn back_from_series_list_returns_to_clients() {
    let state = series_list(vec![series(1, "Alpha")]);
    let (state, effects) = press(state, Key::Esc);

    assert!(effects.is_empty());
    assert!(matches!(state.view().body, ScreenView::Clients(_)));

    // Back at the top level is a no-op.
    let (state, effects) = press(state, Key::Esc);
    assert!(effects.is_empty());
    assert!(!state.should_quit());
}

#[test]
fn detail_result_for_abandoned_load_is_dropped() {
    let state = series_list(vec![series(1, "Alpha")]);
    let (state, effects) = press(state, Key::Enter);
    let fetch = only_dispatch(&effects);

    let (state, _) = press(state, Key::Esc);
    assert!(matches!(state.view().body, ScreenView::SeriesList(_)));

    let before = state.clone();
    let (state, effects) = complete(state, &fetch, Ok(Response::Series(series(1, "Alpha"))));

    assert!(effects.is_empty());
    assert_eq!(state, before);
}

#[test]
fn failed_detail_load_returns_to_list() {
    let state = series_list(vec![series(1, "Alpha")]);
    let (state, effects) = press(state, Key::Enter);
    let fetch = only_dispatch(&effects);
    let (state, _) = complete(state, &fetch, Err(transport_error("boom")));

    match state.view().body {
        ScreenView::SeriesList(list) => assert!(!list.opening),
        other => panic!("unexpected view {other:?}"),
    }
    assert_eq!(
        status(&state).map(|m| m.text),
        Some("Failed to load series: boom".to_string())
    );
}

fn status_timer(effects: &[Effect]) -> TimerId {
    effects
        .iter()
        .find_map(|e| match e {
            Effect::StartTimer { timer, .. } => Some(*timer),
            _ => None,
        })
        .expect("status timer armed")
}

#[test]
fn status_message_expires_only_on_its_own_timer() {
    let state = series_list(vec![series(1, "Alpha")]);
    let (state, effects) = press(state, Key::Char('r'));
    let reload = only_dispatch(&effects);
    let first_timer = status_timer(&effects);
    assert_eq!(status(&state).map(|m| m.text), Some("Reloading...".to_string()));

    // The failure message replaces the progress notice before its timer fires.
    let (state, effects) = complete(state, &reload, Err(transport_error("timeout")));
    let second_timer = status_timer(&effects);
    assert_ne!(first_timer, second_timer);

    let (state, _) = update(state, Msg::TimerFired(first_timer));
    assert_eq!(
        status(&state).map(|m| m.text),
        Some("Failed to fetch series: timeout".to_string())
    );

    let (state, _) = update(state, Msg::TimerFired(second_timer));
    assert_eq!(status(&state), None);
}

#[test]
fn question_mark_toggles_help() {
    let state = ready();
    assert!(!state.view().show_help);
    let (state, effects) = press(state, Key::Char('?'));
    assert!(effects.is_empty());
    assert!(state.view().show_help);
    assert!(state.view().bindings.iter().any(|b| b.keys == "?"));
}

#[test]
fn ticks_only_redraw_while_busy() {
    let mut state = series_list(vec![series(1, "Alpha")]);
    state.consume_dirty();
    let (mut state, _) = update(state, Msg::Tick);
    assert!(!state.consume_dirty());

    let (mut state, _) = press(state, Key::Char('r'));
    state.consume_dirty();
    let (mut state, _) = update(state, Msg::Tick);
    assert!(state.consume_dirty());
    assert!(state.view().spinner.is_some());
}
