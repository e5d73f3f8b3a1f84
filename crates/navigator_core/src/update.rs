use navigator_logging::{nav_debug, nav_info};

use crate::effect::{CommandKind, Effect, Request, ScreenId};
use crate::msg::{CommandError, Completion, Key, Msg, Response};
use crate::screens::{drop_stale, ClientsScreen, Cx, Nav, Screen};
use crate::state::{AppState, ClientConfig, Phase};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let mut effects = Vec::new();

    match msg {
        Msg::Key(Key::Ctrl('c')) => {
            request_quit(&mut state, &mut effects);
            return (state, effects);
        }
        Msg::Resized { width, height } => {
            state.size = (width, height);
            state.dirty = true;
            return (state, effects);
        }
        Msg::Tick => {
            state.ticks = state.ticks.wrapping_add(1);
            if state.busy() {
                state.dirty = true;
            }
            return (state, effects);
        }
        _ => {}
    }

    let text_input = state.captures_text();
    if state.status.offer(&msg, text_input) {
        state.dirty = true;
        return (state, effects);
    }

    if let Msg::Completed(done) = &msg {
        let stale =
            matches!(&state.phase, Phase::Ready(screen) if !screen.contains(done.target));
        if stale {
            drop_stale(done);
            return (state, effects);
        }
    }

    state.dirty = true;
    if route(&mut state, msg, &mut effects) {
        request_quit(&mut state, &mut effects);
    }
    (state, effects)
}

fn request_quit(state: &mut AppState, effects: &mut Vec<Effect>) {
    if !state.quit {
        nav_info!("quit requested");
        state.quit = true;
        effects.push(Effect::Quit);
    }
}

/// Hands `msg` to the current root phase. Returns `true` to quit.
fn route(state: &mut AppState, msg: Msg, effects: &mut Vec<Effect>) -> bool {
    let mut cx = Cx {
        ids: &mut state.ids,
        status: &mut state.status,
        effects,
    };
    let mut next = None;

    let quit = match &mut state.phase {
        Phase::Loading { probe } => match msg {
            Msg::Started if probe.is_none() => {
                if state.config.clients.is_empty() {
                    next = Some(Phase::Error("No backends configured".to_string()));
                } else {
                    *probe = Some(cx.dispatch(
                        ScreenId::ROOT,
                        CommandKind::Probe,
                        Request::ProbeClients,
                    ));
                }
                false
            }
            Msg::Completed(done) if Some(done.op) == *probe => {
                next = Some(on_probe(&mut cx, &state.config.clients, done));
                false
            }
            Msg::Completed(done) => {
                drop_stale(&done);
                false
            }
            Msg::Key(Key::Char('q')) => true,
            _ => false,
        },
        Phase::Error(_) => matches!(msg, Msg::Key(Key::Char('q') | Key::Esc)),
        Phase::Ready(screen) => match screen.update(&mut cx, msg) {
            Nav::Quit => true,
            Nav::Back(_) => {
                nav_debug!("back at the top-level screen ignored");
                false
            }
            Nav::Stay => false,
        },
    };

    if let Some(phase) = next {
        state.phase = phase;
    }
    quit
}

fn on_probe(cx: &mut Cx<'_>, clients: &[ClientConfig], done: Completion) -> Phase {
    match done.result {
        Ok(Response::Clients(summaries)) => {
            for summary in &summaries {
                if let Some(err) = &summary.error {
                    cx.error(format!("{}: {err}", summary.name));
                }
            }
            nav_info!("probe finished for {} backends", summaries.len());
            let id = cx.new_screen_id();
            Phase::Ready(Screen::Clients(ClientsScreen::new(id, summaries, clients)))
        }
        Ok(other) => Phase::Error(CommandError::unexpected(&other).to_string()),
        Err(err) => Phase::Error(format!("Failed to reach backends: {err}")),
    }
}
