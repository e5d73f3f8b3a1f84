use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use anyhow::Context;
use navigator_core::{update, AppState, Msg};
use navigator_engine::{CatalogBackend, SonarrClient};
use navigator_logging::nav_info;

use super::config::AppConfig;
use super::effects::EffectRunner;
use super::input::{self, ListOrigin};
use super::render;
use super::terminal::TerminalSession;

pub fn run(config: AppConfig) -> anyhow::Result<()> {
    let backends = config
        .backend_settings()
        .into_iter()
        .map(|settings| {
            let name = settings.name.clone();
            SonarrClient::new(settings)
                .map(|client| Arc::new(client) as Arc<dyn CatalogBackend>)
                .with_context(|| format!("creating client for backend {name:?}"))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    let mut session =
        TerminalSession::enter().context("navigator needs an interactive terminal")?;
    let (width, height) = session.size()?;

    let (msg_tx, msg_rx) = mpsc::channel::<Msg>();
    let origin = ListOrigin::default();
    let runner = EffectRunner::new(backends, msg_tx.clone());
    input::spawn_reader(msg_tx.clone(), origin.clone());
    spawn_ticker(msg_tx.clone(), config.tick());

    let mut state = AppState::new(config.clients());
    let _ = msg_tx.send(Msg::Resized { width, height });
    let _ = msg_tx.send(Msg::Started);
    drop(msg_tx);

    let mut last_frame = String::new();

    while let Ok(msg) = msg_rx.recv() {
        let resized = matches!(msg, Msg::Resized { .. });
        let (next, effects) = update(state, msg);
        state = next;
        runner.enqueue(effects);
        if state.should_quit() {
            break;
        }
        if !state.consume_dirty() {
            continue;
        }
        let frame = render::render(&state.view());
        origin.set(frame.list_top);
        // A resize repaints even when the text is unchanged.
        if frame.text == last_frame && !resized {
            continue;
        }
        session.draw(&frame.text)?;
        last_frame = frame.text;
    }

    nav_info!("event loop finished");
    Ok(())
}

fn spawn_ticker(msg_tx: mpsc::Sender<Msg>, interval: Duration) {
    thread::spawn(move || {
        while msg_tx.send(Msg::Tick).is_ok() {
            thread::sleep(interval);
        }
    });
}
