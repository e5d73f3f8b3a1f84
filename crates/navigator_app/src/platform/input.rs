//! Terminal events as `Msg`s.
//!
//! A reader thread blocks on `crossterm::event::read` and forwards every
//! event the state machine understands. Mouse clicks arrive in screen
//! coordinates and are turned into list rows using the list position of the
//! last drawn frame.

use std::sync::atomic::{AtomicU16, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use navigator_core::{Key, Mouse, Msg};
use navigator_logging::nav_warn;

/// Screen row of the first list entry, shared between the renderer and the
/// reader thread.
#[derive(Debug, Clone, Default)]
pub struct ListOrigin(Arc<AtomicU16>);

impl ListOrigin {
    pub fn set(&self, row: u16) {
        self.0.store(row, Ordering::Relaxed);
    }

    pub fn get(&self) -> u16 {
        self.0.load(Ordering::Relaxed)
    }
}

pub fn map_event(event: Event, list_top: u16) -> Option<Msg> {
    match event {
        Event::Key(key) => map_key(key).map(Msg::Key),
        Event::Mouse(mouse) => map_mouse(mouse, list_top).map(Msg::Mouse),
        Event::Resize(width, height) => Some(Msg::Resized { width, height }),
        _ => None,
    }
}

fn map_key(key: KeyEvent) -> Option<Key> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    let mapped = match key.code {
        KeyCode::Char(c) if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Key::Ctrl(c.to_ascii_lowercase())
        }
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::Enter => Key::Enter,
        KeyCode::Esc => Key::Esc,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Tab => Key::Tab,
        KeyCode::BackTab => Key::BackTab,
        KeyCode::Backspace => Key::Backspace,
        _ => return None,
    };
    Some(mapped)
}

fn map_mouse(mouse: MouseEvent, list_top: u16) -> Option<Mouse> {
    match mouse.kind {
        MouseEventKind::ScrollUp => Some(Mouse::WheelUp),
        MouseEventKind::ScrollDown => Some(Mouse::WheelDown),
        MouseEventKind::Down(MouseButton::Left) => mouse
            .row
            .checked_sub(list_top)
            .map(|row| Mouse::Click { row: usize::from(row) }),
        _ => None,
    }
}

/// Forwards terminal events until the event loop is gone. A read failure
/// quits.
pub fn spawn_reader(msg_tx: mpsc::Sender<Msg>, origin: ListOrigin) {
    thread::spawn(move || loop {
        let event = match event::read() {
            Ok(event) => event,
            Err(err) => {
                nav_warn!("terminal input failed: {err}");
                let _ = msg_tx.send(Msg::Key(Key::Ctrl('c')));
                return;
            }
        };
        if let Some(msg) = map_event(event, origin.get()) {
            if msg_tx.send(msg).is_err() {
                return;
            }
        }
    });
}
