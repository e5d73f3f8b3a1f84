//! Raw-mode terminal session: alternate screen, mouse capture and drawing.
//!
//! Everything the session turns on is turned off again when it is dropped,
//! and by a panic hook for the unwinding case where output would otherwise be
//! left in raw mode.

use std::io::{self, Stdout, Write};
use std::sync::OnceLock;

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::style::Print;
use crossterm::terminal::{
    self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::{execute, queue};
use navigator_logging::nav_debug;

pub struct TerminalSession {
    stdout: Stdout,
}

impl TerminalSession {
    pub fn enter() -> io::Result<Self> {
        install_panic_hook();
        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        if let Err(err) = execute!(stdout, EnterAlternateScreen, EnableMouseCapture, Hide) {
            restore();
            return Err(err);
        }
        nav_debug!("terminal session entered");
        Ok(Self { stdout })
    }

    /// Current size as (columns, rows).
    pub fn size(&self) -> io::Result<(u16, u16)> {
        terminal::size()
    }

    /// Replaces the screen with `text`, clipped to the terminal.
    pub fn draw(&mut self, text: &str) -> io::Result<()> {
        let (width, height) = self.size()?;
        queue!(self.stdout, Clear(ClearType::All))?;
        for (row, line) in text.lines().take(usize::from(height)).enumerate() {
            let clipped: String = line.chars().take(usize::from(width)).collect();
            // `row` is below `height`, which is a u16.
            queue!(self.stdout, MoveTo(0, row as u16), Print(clipped))?;
        }
        self.stdout.flush()
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        restore();
        nav_debug!("terminal session restored");
    }
}

fn restore() {
    let mut stdout = io::stdout();
    let _ = execute!(stdout, DisableMouseCapture, Show, LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
    let _ = stdout.flush();
}

fn install_panic_hook() {
    static HOOK: OnceLock<()> = OnceLock::new();
    HOOK.get_or_init(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            restore();
            previous(info);
        }));
    });
}
