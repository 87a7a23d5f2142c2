//! Main TUI runner - entry point and event loop

use std::sync::Arc;

use tokio::sync::{mpsc, watch};

use vpngate_app::actions::process_message;
use vpngate_app::message::Message;
use vpngate_app::state::AppState;
use vpngate_app::{signals, ConnectionController, Settings, SortableTable};
use vpngate_core::prelude::*;
use vpngate_core::{ConnectionState, EndpointRecord, TunnelEvent};
use vpngate_tunnel::OutputSink;

use crate::{event, render, terminal};

/// Run the TUI over `servers` until the user quits.
///
/// Any running tunnel is killed and reaped before this returns, and the
/// terminal is restored even when the loop fails.
pub async fn run(servers: Vec<EndpointRecord>, settings: Settings) -> Result<()> {
    terminal::install_panic_hook();

    let (msg_tx, msg_rx) = mpsc::channel::<Message>(256);
    let (tunnel_tx, tunnel_rx) = mpsc::channel::<TunnelEvent>(16);

    let sink = OutputSink::new(settings.ui.output_lines);
    let connection = Arc::new(ConnectionController::new(&settings.tunnel, sink, tunnel_tx));
    let mut state = AppState::new(SortableTable::new(servers), Arc::clone(&connection));
    info!(
        "Starting UI with {} servers, tunnel binary {}",
        state.table.len(),
        settings.tunnel.binary
    );

    // Sends Message::Quit on SIGINT/SIGTERM
    signals::spawn_signal_handler(msg_tx);

    let mut term = ratatui::try_init().map_err(|e| Error::TerminalInit(e.to_string()))?;
    let result = run_loop(&mut term, &mut state, msg_rx, tunnel_rx).await;

    connection.shutdown().await;
    if let Err(e) = ratatui::try_restore() {
        warn!("{}", Error::TerminalRestore(e.to_string()));
    }

    if let Err(e) = &result {
        error!("UI loop failed: {}", e);
    }
    result
}

/// Main event loop
async fn run_loop(
    terminal: &mut ratatui::DefaultTerminal,
    state: &mut AppState,
    mut msg_rx: mpsc::Receiver<Message>,
    mut tunnel_rx: mpsc::Receiver<TunnelEvent>,
) -> Result<()> {
    let mut output_rx: watch::Receiver<u64> = state.connection.sink().subscribe();
    let mut drawn: Option<(ConnectionState, String)> = None;
    let mut dirty = true;

    while !state.should_quit() {
        // External messages (signal handler)
        while let Ok(msg) = msg_rx.try_recv() {
            process_message(state, msg).await;
            dirty = true;
        }

        // Tunnel exits
        while let Ok(event) = tunnel_rx.try_recv() {
            process_message(state, Message::Tunnel(event)).await;
            dirty = true;
        }

        if state.should_quit() {
            break;
        }

        let snapshot = (state.connection.state(), state.connection.status());
        if output_rx.has_changed().unwrap_or(false) {
            output_rx.mark_unchanged();
            dirty = true;
        }
        if dirty || drawn.as_ref() != Some(&snapshot) {
            terminal.draw(|frame| render::view(frame, state))?;
            drawn = Some(snapshot);
            dirty = false;
        }

        if let Some(message) = event::poll()? {
            dirty |= message != Message::Tick;
            process_message(state, message).await;
        }
    }

    Ok(())
}
