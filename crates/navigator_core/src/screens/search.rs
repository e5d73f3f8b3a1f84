use crate::catalog::{QualityProfile, Series};
use crate::effect::{ClientId, CommandKind, OpId, Request, ScreenId};
use crate::msg::{CommandError, Completion, Key, Msg, Response};
use crate::view_model::{bind, KeyBinding, ScreenView, SearchRow, SearchView};

use super::add_series::AddSeriesScreen;
use super::list::{ListAction, ListCursor};
use super::{clean_series, drop_stale, Cx, Exit, Nav, Screen};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SearchPhase {
    Input,
    /// Lookup `op` is in flight; the input stays editable.
    Searching(OpId),
    Results,
}

/// Free-text lookup of series to add. Only the latest lookup is ever shown.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SearchScreen {
    id: ScreenId,
    client: ClientId,
    input: String,
    term: String,
    phase: SearchPhase,
    results: Vec<Series>,
    cursor: ListCursor,
    profiles: Vec<QualityProfile>,
    default_profile: Option<String>,
    sub: Option<Box<Screen>>,
}

impl SearchScreen {
    pub(crate) fn open(
        cx: &mut Cx<'_>,
        client: ClientId,
        profiles: Vec<QualityProfile>,
        default_profile: Option<String>,
    ) -> Self {
        Self {
            id: cx.new_screen_id(),
            client,
            input: String::new(),
            term: String::new(),
            phase: SearchPhase::Input,
            results: Vec::new(),
            cursor: ListCursor::default(),
            profiles,
            default_profile,
            sub: None,
        }
    }

    pub(crate) fn id(&self) -> ScreenId {
        self.id
    }

    pub(crate) fn sub(&self) -> Option<&Screen> {
        self.sub.as_deref()
    }

    pub(crate) fn busy(&self) -> bool {
        matches!(self.phase, SearchPhase::Searching(_))
    }

    pub(crate) fn captures_text(&self) -> bool {
        self.sub.is_none() && self.phase != SearchPhase::Results
    }

    pub(crate) fn update(&mut self, cx: &mut Cx<'_>, msg: Msg) -> Nav {
        match msg {
            Msg::Completed(done) if done.target == self.id => {
                self.on_completed(cx, done);
                Nav::Stay
            }
            msg => match self.sub.as_mut() {
                Some(sub) => match sub.update(cx, msg) {
                    Nav::Back(Exit::SeriesAdded(series)) => Nav::Back(Exit::SeriesAdded(series)),
                    Nav::Back(_) => {
                        self.sub = None;
                        Nav::Stay
                    }
                    nav => nav,
                },
                None => self.on_input(cx, msg),
            },
        }
    }

    fn on_completed(&mut self, cx: &mut Cx<'_>, done: Completion) {
        let SearchPhase::Searching(op) = self.phase else {
            drop_stale(&done);
            return;
        };
        if done.op != op {
            drop_stale(&done);
            return;
        }
        self.phase = SearchPhase::Input;
        match done.result {
            Ok(Response::Lookup(results)) if results.is_empty() => {
                cx.info(format!("No results for \"{}\"", self.term));
            }
            Ok(Response::Lookup(results)) => {
                self.results = results.into_iter().map(clean_series).collect();
                self.cursor = ListCursor::default();
                self.phase = SearchPhase::Results;
            }
            Ok(other) => cx.error(CommandError::unexpected(&other).to_string()),
            Err(err) => cx.error(format!("Search failed: {err}")),
        }
    }

    fn on_input(&mut self, cx: &mut Cx<'_>, msg: Msg) -> Nav {
        match (self.phase, msg) {
            (_, Msg::Completed(done)) => {
                drop_stale(&done);
                Nav::Stay
            }
            (SearchPhase::Results, Msg::Key(key)) => self.on_results_key(cx, key),
            (SearchPhase::Results, Msg::Mouse(mouse)) => {
                match self.cursor.on_mouse(mouse, self.results.len()) {
                    ListAction::Activate => self.choose(cx),
                    ListAction::Moved | ListAction::None => Nav::Stay,
                }
            }
            (_, Msg::Key(key)) => self.on_input_key(cx, key),
            _ => Nav::Stay,
        }
    }

    fn on_input_key(&mut self, cx: &mut Cx<'_>, key: Key) -> Nav {
        match key {
            Key::Esc => match self.phase {
                SearchPhase::Searching(op) => {
                    cx.cancel(op);
                    self.phase = SearchPhase::Input;
                }
                _ => return Nav::Back(Exit::Plain),
            },
            Key::Enter => self.submit(cx),
            Key::Backspace => {
                self.input.pop();
            }
            Key::Char(c) => self.input.push(c),
            _ => {}
        }
        Nav::Stay
    }

    fn on_results_key(&mut self, cx: &mut Cx<'_>, key: Key) -> Nav {
        match key {
            Key::Esc | Key::Char('/') | Key::Backspace => self.phase = SearchPhase::Input,
            Key::Char('q') => return Nav::Quit,
            Key::Enter => return self.choose(cx),
            key => {
                self.cursor.on_key(key, self.results.len());
            }
        }
        Nav::Stay
    }

    /// A new lookup supersedes any outstanding one.
    fn submit(&mut self, cx: &mut Cx<'_>) {
        let term = self.input.trim().to_string();
        if term.is_empty() {
            return;
        }
        if let SearchPhase::Searching(previous) = self.phase {
            cx.cancel(previous);
        }
        let op = cx.dispatch(
            self.id,
            CommandKind::Search,
            Request::LookupSeries {
                client: self.client,
                term: term.clone(),
            },
        );
        self.term = term;
        self.phase = SearchPhase::Searching(op);
    }

    fn choose(&mut self, cx: &mut Cx<'_>) -> Nav {
        let Some(series) = self.results.get(self.cursor.index()) else {
            return Nav::Stay;
        };
        if series.in_library() {
            return Nav::Back(Exit::OpenSeries(Box::new(series.clone())));
        }
        let add = AddSeriesScreen::open(
            cx,
            self.client,
            series.clone(),
            self.profiles.clone(),
            self.default_profile.as_deref(),
        );
        self.sub = Some(Box::new(Screen::AddSeries(add)));
        Nav::Stay
    }

    pub(crate) fn view(&self) -> ScreenView {
        ScreenView::Search(SearchView {
            input: self.input.clone(),
            searching: self.busy(),
            showing_results: self.phase == SearchPhase::Results,
            results: self
                .results
                .iter()
                .map(|s| SearchRow {
                    title: s.title.clone(),
                    year: s.year,
                    network: s.network.clone(),
                    in_library: s.in_library(),
                })
                .collect(),
            cursor: self.cursor.index(),
        })
    }

    pub(crate) fn bindings(&self) -> Vec<KeyBinding> {
        match self.phase {
            SearchPhase::Results => vec![
                bind("up/k", "move up"),
                bind("down/j", "move down"),
                bind("enter", "select"),
                bind("esc", "edit search"),
                bind("q", "quit"),
            ],
            SearchPhase::Searching(_) => vec![
                bind("enter", "search again"),
                bind("esc", "cancel search"),
            ],
            SearchPhase::Input => vec![bind("enter", "search"), bind("esc", "back")],
        }
    }
}
