use crate::effect::OpId;
use crate::screens::{IdAllocator, Screen};
use crate::status::StatusBar;
use crate::view_model::{bind, spinner_frame, AppViewModel, KeyBinding, ScreenView};

const APP_TITLE: &str = "Navigator";

/// Per-backend settings the state machine needs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClientConfig {
    pub name: String,
    /// Profile preselected when adding a series, matched by name.
    pub default_quality_profile: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClientsConfig {
    pub clients: Vec<ClientConfig>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Phase {
    Loading { probe: Option<OpId> },
    Error(String),
    Ready(Screen),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    pub(crate) config: ClientsConfig,
    pub(crate) phase: Phase,
    pub(crate) status: StatusBar,
    pub(crate) ids: IdAllocator,
    pub(crate) ticks: u64,
    pub(crate) size: (u16, u16),
    pub(crate) quit: bool,
    pub(crate) dirty: bool,
}

impl AppState {
    pub fn new(config: ClientsConfig) -> Self {
        Self {
            config,
            phase: Phase::Loading { probe: None },
            status: StatusBar::new(),
            ids: IdAllocator::default(),
            ticks: 0,
            size: (80, 24),
            quit: false,
            dirty: true,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn size(&self) -> (u16, u16) {
        self.size
    }

    /// Returns whether a redraw is due and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn busy(&self) -> bool {
        match &self.phase {
            Phase::Loading { .. } => true,
            Phase::Error(_) => false,
            Phase::Ready(screen) => screen.active().busy(),
        }
    }

    pub(crate) fn captures_text(&self) -> bool {
        match &self.phase {
            Phase::Ready(screen) => screen.active().captures_text(),
            _ => false,
        }
    }

    pub fn view(&self) -> AppViewModel {
        let quit_only = || vec![bind("q", "quit")];
        let (title, body, mut bindings): (String, ScreenView, Vec<KeyBinding>) = match &self.phase {
            Phase::Loading { .. } => (
                APP_TITLE.to_string(),
                ScreenView::Loading {
                    message: "Connecting to backends...".to_string(),
                },
                quit_only(),
            ),
            Phase::Error(message) => (
                APP_TITLE.to_string(),
                ScreenView::Error {
                    message: message.clone(),
                },
                quit_only(),
            ),
            Phase::Ready(screen) => {
                let active = screen.active();
                let title = screen
                    .client_name()
                    .map_or_else(|| APP_TITLE.to_string(), |name| format!("{APP_TITLE} - {name}"));
                (title, active.view(), active.bindings())
            }
        };
        bindings.push(bind("?", "help"));

        AppViewModel {
            title,
            body,
            bindings,
            status: self.status.message().cloned(),
            show_help: self.status.show_help(),
            spinner: self.busy().then(|| spinner_frame(self.ticks)),
            dirty: self.dirty,
        }
    }
}
