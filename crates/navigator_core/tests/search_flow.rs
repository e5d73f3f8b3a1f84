mod support;

use navigator_core::{
    AppState, CommandKind, Effect, Key, MonitorType, Request, Response, RootFolder, ScreenView,
    SearchView, Series,
};
use pretty_assertions::assert_eq;

use support::{
    complete, dispatched, only_dispatch, press, series, series_list, status, transport_error,
    type_text,
};

fn in_search() -> AppState {
    let state = series_list(vec![series(1, "Alpha")]);
    let (state, effects) = press(state, Key::Char('a'));
    assert!(effects.is_empty());
    state
}

fn search_view(state: &AppState) -> SearchView {
    match state.view().body {
        ScreenView::Search(search) => search,
        other => panic!("unexpected view {other:?}"),
    }
}

fn candidate(title: &str) -> Series {
    Series {
        id: 0,
        title: title.to_string(),
        sort_title: title.to_lowercase(),
        tvdb_id: 1234,
        ..Series::default()
    }
}

#[test]
fn only_the_latest_search_is_rendered() {
    let state = type_text(in_search(), "foo");
    let (state, effects) = press(state, Key::Enter);
    let first = only_dispatch(&effects);
    assert_eq!(first.kind, CommandKind::Search);
    assert!(search_view(&state).searching);

    let state = type_text(state, "d");
    let (state, effects) = press(state, Key::Enter);
    assert_eq!(effects[0], Effect::Cancel { op: first.op });
    let second = only_dispatch(&effects);
    assert_eq!(
        second.request,
        Request::LookupSeries {
            client: navigator_core::ClientId(0),
            term: "food".to_string(),
        }
    );

    // The superseded lookup finishes late.
    let (state, effects) = complete(state, &first, Ok(Response::Lookup(vec![candidate("Foo")])));
    assert!(effects.is_empty());
    let view = search_view(&state);
    assert!(view.searching);
    assert!(!view.showing_results);

    let (state, _) = complete(
        state,
        &second,
        Ok(Response::Lookup(vec![candidate("Food Wars")])),
    );
    let view = search_view(&state);
    assert!(view.showing_results);
    assert_eq!(view.results.len(), 1);
    assert_eq!(view.results[0].title, "Food Wars");
}

#[test]
fn cancelled_search_result_is_discarded() {
    let state = type_text(in_search(), "bar");
    let (state, effects) = press(state, Key::Enter);
    let lookup = only_dispatch(&effects);

    let (state, effects) = press(state, Key::Esc);
    assert_eq!(effects, vec![Effect::Cancel { op: lookup.op }]);

    let (state, _) = complete(state, &lookup, Ok(Response::Lookup(vec![candidate("Bar")])));
    let view = search_view(&state);
    assert!(!view.searching);
    assert!(!view.showing_results);
    assert_eq!(view.input, "bar");
}

#[test]
fn empty_result_stays_in_input() {
    let state = type_text(in_search(), "nothing");
    let (state, effects) = press(state, Key::Enter);
    let lookup = only_dispatch(&effects);
    let (state, _) = complete(state, &lookup, Ok(Response::Lookup(Vec::new())));

    let view = search_view(&state);
    assert!(!view.showing_results);
    assert_eq!(
        status(&state).map(|m| m.text),
        Some("No results for \"nothing\"".to_string())
    );
}

#[test]
fn failed_search_stays_in_input() {
    let state = type_text(in_search(), "x");
    let (state, effects) = press(state, Key::Enter);
    let lookup = only_dispatch(&effects);
    let (state, _) = complete(state, &lookup, Err(transport_error("timeout")));

    assert!(!search_view(&state).searching);
    assert_eq!(
        status(&state).map(|m| m.text),
        Some("Search failed: timeout".to_string())
    );
}

#[test]
fn typing_reaches_the_input_verbatim() {
    let state = type_text(in_search(), "q?jk r");
    let (state, _) = press(state, Key::Backspace);

    assert!(!state.should_quit());
    assert!(!state.view().show_help);
    assert_eq!(search_view(&state).input, "q?jk ");
}

#[test]
fn blank_input_is_not_submitted() {
    let state = type_text(in_search(), "   ");
    let (_, effects) = press(state, Key::Enter);
    assert!(effects.is_empty());
}

#[test]
fn selecting_a_library_entry_opens_its_detail() {
    let state = type_text(in_search(), "alpha");
    let (state, effects) = press(state, Key::Enter);
    let lookup = only_dispatch(&effects);
    let (state, _) = complete(state, &lookup, Ok(Response::Lookup(vec![series(1, "Alpha")])));

    let (state, effects) = press(state, Key::Enter);
    let fetch = only_dispatch(&effects);
    assert!(matches!(fetch.request, Request::GetSeries { id: 1, .. }));

    let (state, _) = complete(state, &fetch, Ok(Response::Series(series(1, "Alpha"))));
    assert!(matches!(state.view().body, ScreenView::Detail(_)));
}

#[test]
fn adding_a_series_inserts_it_into_the_list() {
    let state = type_text(in_search(), "beta");
    let (state, effects) = press(state, Key::Enter);
    let lookup = only_dispatch(&effects);
    let (state, _) = complete(state, &lookup, Ok(Response::Lookup(vec![candidate("Beta")])));

    let (state, effects) = press(state, Key::Enter);
    let folders = only_dispatch(&effects);
    assert!(matches!(folders.request, Request::RootFolders { .. }));
    assert!(matches!(state.view().body, ScreenView::AddSeries(ref add) if add.loading));

    let (state, _) = complete(
        state,
        &folders,
        Ok(Response::RootFolders(vec![
            RootFolder {
                id: 1,
                path: "/tv".to_string(),
                free_space: None,
            },
            RootFolder {
                id: 2,
                path: "/anime".to_string(),
                free_space: None,
            },
        ])),
    );

    let (state, effects) = press(state, Key::Ctrl('a'));
    let add = only_dispatch(&effects);
    let Request::AddSeries { series: submitted, .. } = &add.request else {
        panic!("expected add, got {:?}", add.request);
    };
    assert_eq!(submitted.root_folder_path.as_deref(), Some("/tv"));
    assert_eq!(submitted.quality_profile_id, Some(4));
    assert!(submitted.monitored);
    assert!(submitted.season_folder);
    let options = submitted.add_options.as_ref().expect("add options set");
    assert_eq!(options.monitor, MonitorType::All);
    assert!(options.search_for_missing_episodes);

    let mut added = (**submitted).clone();
    added.id = 42;
    let (state, effects) = complete(state, &add, Ok(Response::Series(added)));
    assert!(dispatched(&effects).is_empty());

    match state.view().body {
        ScreenView::SeriesList(list) => {
            let ids: Vec<_> = list.rows.iter().map(|r| r.id).collect();
            assert_eq!(ids, vec![1, 42]);
            assert_eq!(list.cursor, 1);
        }
        other => panic!("unexpected view {other:?}"),
    }
    assert_eq!(
        status(&state).map(|m| m.text),
        Some("Added series: Beta".to_string())
    );
}

#[test]
fn add_without_root_folders_is_refused() {
    let state = type_text(in_search(), "beta");
    let (state, effects) = press(state, Key::Enter);
    let lookup = only_dispatch(&effects);
    let (state, _) = complete(state, &lookup, Ok(Response::Lookup(vec![candidate("Beta")])));
    let (state, effects) = press(state, Key::Enter);
    let folders = only_dispatch(&effects);
    let (state, _) = complete(state, &folders, Ok(Response::RootFolders(Vec::new())));

    let (state, effects) = press(state, Key::Ctrl('a'));
    assert!(dispatched(&effects).is_empty());
    assert_eq!(
        status(&state).map(|m| m.text),
        Some("No root folder available".to_string())
    );
}
