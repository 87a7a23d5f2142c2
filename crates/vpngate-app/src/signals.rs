//! Interrupts become [`Message::Quit`], so they share the `q` shutdown path
//! and the running tunnel is reaped before exit.

use tokio::sync::mpsc;

use crate::message::Message;
use vpngate_core::prelude::*;

/// Forward the first SIGINT/SIGTERM (Ctrl+C on Windows) to `tx` as a quit
pub fn spawn_signal_handler(tx: mpsc::Sender<Message>) {
    tokio::spawn(async move {
        match interrupted().await {
            Ok(name) => {
                info!("{} received, quitting", name);
                if tx.send(Message::Quit).await.is_err() {
                    debug!("UI loop already gone");
                }
            }
            Err(e) => error!("Cannot listen for interrupts: {}", e),
        }
    });
}

/// Resolve with the name of the first interrupt signal delivered
#[cfg(unix)]
async fn interrupted() -> std::io::Result<&'static str> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut int = signal(SignalKind::interrupt())?;
    let mut term = signal(SignalKind::terminate())?;
    let name = tokio::select! {
        _ = int.recv() => "SIGINT",
        _ = term.recv() => "SIGTERM",
    };
    Ok(name)
}

#[cfg(windows)]
async fn interrupted() -> std::io::Result<&'static str> {
    tokio::signal::ctrl_c().await?;
    Ok("Ctrl+C")
}
