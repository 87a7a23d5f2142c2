//! Action handlers: UpdateAction dispatch

use crate::connection::ConnectionController;
use crate::handler::{update, UpdateAction};
use crate::message::Message;
use crate::state::AppState;
use vpngate_core::prelude::*;

/// Process one message and any follow-up messages it produces.
///
/// Actions are awaited in place, so they apply in the order their messages
/// arrived. Disconnect only signals the process and Connect only waits for a
/// previous tunnel's reap before spawning.
pub async fn process_message(state: &mut AppState, message: Message) {
    let mut next = Some(message);
    while let Some(msg) = next {
        let result = update(state, msg);
        if let Some(action) = result.action {
            execute_action(action, &state.connection).await;
        }
        next = result.message;
    }
}

/// Run one action to completion
pub async fn execute_action(action: UpdateAction, connection: &ConnectionController) {
    match action {
        UpdateAction::Connect(record) => {
            if let Err(e) = connection.connect(&record).await {
                report(connection, &e);
            }
        }
        UpdateAction::Disconnect => connection.disconnect().await,
        UpdateAction::HandleExit { session, code } => {
            connection.handle_exit(session, code).await
        }
    }
}

/// Surface a connect failure in the output pane
fn report(connection: &ConnectionController, err: &Error) {
    if err.is_recoverable() {
        warn!("Connect failed: {}", err);
    } else {
        error!("Connect failed: {}", err);
    }
    connection.sink().set_text(&err.to_string());
}
