//! Headless mode runner - event loop without TUI
//!
//! Commands from stdin are applied one at a time; after each one the engine
//! is run until nothing is loading, and every engine event produced along
//! the way is written out as NDJSON.

use std::time::Duration;

use sv_app::config::Settings;
use sv_app::message::Message;
use sv_app::{signals, AppState, Engine, EngineEvent};
use sv_core::prelude::*;
use sv_net::FragmentSource;
use tokio::sync::{broadcast, mpsc};

use super::commands::parse_command;
use super::HeadlessEvent;

/// Capacity of the stdin command channel
const COMMAND_CAPACITY: usize = 16;

/// Run in headless mode - NDJSON events instead of a TUI
pub async fn run_headless<S>(settings: Settings, initial_hash: Option<&str>, source: S) -> Result<()>
where
    S: FragmentSource + Sync + 'static,
{
    info!("═══════════════════════════════════════════════════════");
    info!("StrokeVision shell starting in HEADLESS mode");
    info!("Server: {}", settings.server.base_url);
    info!("═══════════════════════════════════════════════════════");

    let settle_timeout = settings.server.request_timeout() + settings.ui.transition();
    let mut engine = Engine::new(AppState::new(settings, initial_hash), source);

    let (cmd_tx, cmd_rx) = mpsc::channel::<Message>(COMMAND_CAPACITY);
    signals::spawn_signal_handler(cmd_tx.clone());
    std::thread::spawn(move || read_stdin_blocking(cmd_tx));

    let result = run_commands(&mut engine, cmd_rx, settle_timeout, |event| event.emit()).await;

    info!("StrokeVision shell headless mode exiting");
    result
}

/// Start the engine, then apply commands until quit or the channel closes
///
/// Each engine event is handed to `sink`, followed by a `settled` event
/// once the startup navigation and each command have finished.
pub async fn run_commands<S, F>(
    engine: &mut Engine<S>,
    mut commands: mpsc::Receiver<Message>,
    settle_timeout: Duration,
    mut sink: F,
) -> Result<()>
where
    S: FragmentSource + Sync + 'static,
    F: FnMut(HeadlessEvent),
{
    let mut events = engine.subscribe();

    engine.start();
    settle(engine, &mut events, settle_timeout, &mut sink).await;

    while !engine.should_quit() {
        match commands.recv().await {
            Some(message) => {
                debug!("Headless command: {:?}", message);
                engine.process_message(message);
                if engine.should_quit() {
                    info!("Quit requested");
                    break;
                }
                settle(engine, &mut events, settle_timeout, &mut sink).await;
            }
            None => {
                info!("Command input closed");
                break;
            }
        }
    }

    forward(&mut events, &mut sink);
    Ok(())
}

async fn settle<S, F>(
    engine: &mut Engine<S>,
    events: &mut broadcast::Receiver<EngineEvent>,
    timeout: Duration,
    sink: &mut F,
) where
    S: FragmentSource + Sync + 'static,
    F: FnMut(HeadlessEvent),
{
    let idle = engine.settle(timeout).await;
    forward(events, sink);

    if !idle {
        sink(HeadlessEvent::error(
            format!("Still loading after {:?}", timeout),
            false,
        ));
    }
    let router = &engine.state.router;
    sink(HeadlessEvent::settled(router.location(), router.current().view, idle));
}

/// Pass on every event already broadcast
fn forward<F>(events: &mut broadcast::Receiver<EngineEvent>, sink: &mut F)
where
    F: FnMut(HeadlessEvent),
{
    loop {
        match events.try_recv() {
            Ok(event) => sink(HeadlessEvent::from(event)),
            Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                warn!("Dropped {} engine events", skipped);
            }
            Err(_) => break,
        }
    }
}

/// Read commands from stdin until EOF or quit (blocking thread)
fn read_stdin_blocking(cmd_tx: mpsc::Sender<Message>) {
    use std::io::BufRead;

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                error!("Failed to read stdin: {}", e);
                break;
            }
        };

        let Some(message) = parse_command(&line) else {
            continue;
        };
        let quit = matches!(message, Message::Quit);
        if cmd_tx.blocking_send(message).is_err() || quit {
            break;
        }
    }

    info!("Stdin reader exiting");
}
