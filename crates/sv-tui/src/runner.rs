//! Main TUI runner - entry point and event loop

use ratatui::DefaultTerminal;
use sv_app::config::Settings;
use sv_app::signals;
use sv_app::{AppState, Engine};
use sv_core::prelude::*;
use sv_net::FragmentSource;

use crate::{event, render, terminal};

/// Run the terminal shell against `source` until the user quits
///
/// `initial_hash` overrides the configured startup view.
pub async fn run<S>(settings: Settings, initial_hash: Option<&str>, source: S) -> Result<()>
where
    S: FragmentSource + Sync + 'static,
{
    terminal::install_panic_hook();

    let state = AppState::new(settings, initial_hash);
    let mut engine = Engine::new(state, source);

    // Sends Message::Quit on SIGINT/SIGTERM
    signals::spawn_signal_handler(engine.msg_sender());

    let mut term = ratatui::init();
    engine.start();
    let result = run_loop(&mut term, &mut engine);
    ratatui::restore();

    info!("StrokeVision shell exiting");
    result
}

/// Drain engine messages, draw, then wait briefly for one key
fn run_loop<S>(term: &mut DefaultTerminal, engine: &mut Engine<S>) -> Result<()>
where
    S: FragmentSource + Sync + 'static,
{
    while !engine.should_quit() {
        engine.drain_pending_messages();
        if engine.should_quit() {
            break;
        }

        term.draw(|frame| render::view(frame, &engine.state))?;

        if let Some(message) = event::poll()? {
            engine.process_message(message);
        }
    }
    Ok(())
}
