use crate::catalog::ClientSummary;
use crate::effect::{ClientId, ScreenId};
use crate::msg::{Key, Msg};
use crate::state::ClientConfig;
use crate::view_model::{bind, ClientRow, ClientsView, KeyBinding, ScreenView};

use super::list::{ListAction, ListCursor};
use super::series::SeriesBrowser;
use super::{drop_stale, Cx, Nav, Screen};

#[derive(Debug, Clone, PartialEq)]
struct ClientEntry {
    summary: ClientSummary,
    default_profile: Option<String>,
}

/// Top-level screen: one row per configured backend.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ClientsScreen {
    id: ScreenId,
    clients: Vec<ClientEntry>,
    cursor: ListCursor,
    sub: Option<Box<Screen>>,
}

impl ClientsScreen {
    /// Probe summaries arrive in config order; a backend missing from the
    /// probe is shown as unavailable.
    pub(crate) fn new(id: ScreenId, summaries: Vec<ClientSummary>, configs: &[ClientConfig]) -> Self {
        let mut summaries = summaries.into_iter();
        let clients = configs
            .iter()
            .map(|config| ClientEntry {
                summary: summaries.next().unwrap_or_else(|| ClientSummary {
                    name: config.name.clone(),
                    ..ClientSummary::default()
                }),
                default_profile: config.default_quality_profile.clone(),
            })
            .collect();
        Self {
            id,
            clients,
            cursor: ListCursor::default(),
            sub: None,
        }
    }

    pub(crate) fn id(&self) -> ScreenId {
        self.id
    }

    pub(crate) fn sub(&self) -> Option<&Screen> {
        self.sub.as_deref()
    }

    pub(crate) fn update(&mut self, cx: &mut Cx<'_>, msg: Msg) -> Nav {
        if let Some(sub) = self.sub.as_mut() {
            return match sub.update(cx, msg) {
                Nav::Back(_) => {
                    self.sub = None;
                    Nav::Stay
                }
                nav => nav,
            };
        }

        match msg {
            Msg::Key(Key::Char('q')) => Nav::Quit,
            Msg::Key(Key::Enter) => self.open(cx),
            Msg::Key(key) => {
                self.cursor.on_key(key, self.clients.len());
                Nav::Stay
            }
            Msg::Mouse(mouse) => match self.cursor.on_mouse(mouse, self.clients.len()) {
                ListAction::Activate => self.open(cx),
                ListAction::Moved | ListAction::None => Nav::Stay,
            },
            Msg::Completed(done) => {
                drop_stale(&done);
                Nav::Stay
            }
            _ => Nav::Stay,
        }
    }

    fn open(&mut self, cx: &mut Cx<'_>) -> Nav {
        let index = self.cursor.index();
        let Some(entry) = self.clients.get(index) else {
            return Nav::Stay;
        };
        if !entry.summary.available {
            cx.error(format!("{} is not available", entry.summary.name));
            return Nav::Stay;
        }
        let browser = SeriesBrowser::open(
            cx,
            ClientId(index),
            entry.summary.name.clone(),
            entry.default_profile.clone(),
        );
        self.sub = Some(Box::new(Screen::Series(browser)));
        Nav::Stay
    }

    pub(crate) fn view(&self) -> ScreenView {
        ScreenView::Clients(ClientsView {
            rows: self
                .clients
                .iter()
                .map(|c| ClientRow {
                    name: c.summary.name.clone(),
                    available: c.summary.available,
                    queued: c.summary.queued,
                    error: c.summary.error.clone(),
                })
                .collect(),
            cursor: self.cursor.index(),
        })
    }

    pub(crate) fn bindings(&self) -> Vec<KeyBinding> {
        vec![
            bind("up/k", "move up"),
            bind("down/j", "move down"),
            bind("enter", "open"),
            bind("q", "quit"),
        ]
    }
}
