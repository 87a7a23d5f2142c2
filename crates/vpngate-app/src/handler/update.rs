//! Main update function - handles state transitions (TEA pattern)

use super::{keys::handle_key, UpdateAction, UpdateResult};
use crate::message::Message;
use crate::state::AppState;
use vpngate_core::prelude::*;
use vpngate_core::TunnelEvent;

/// Process a message and update state
pub fn update(state: &mut AppState, message: Message) -> UpdateResult {
    match message {
        Message::Key(key) => match handle_key(key) {
            Some(msg) => UpdateResult::message(msg),
            None => UpdateResult::none(),
        },

        Message::Tick | Message::Resize => UpdateResult::none(),

        Message::Quit => {
            info!("Quit requested");
            state.should_quit = true;
            UpdateResult::none()
        }

        Message::Tunnel(TunnelEvent::Exited { session, code, .. }) => {
            UpdateResult::action(UpdateAction::HandleExit { session, code })
        }

        Message::SortBy(key) => {
            state.table.toggle_sort(key);
            debug!("Sorted by {:?}", state.table.order());
            UpdateResult::none()
        }

        Message::SelectNext => {
            state.table.select_next();
            UpdateResult::none()
        }
        Message::SelectPrevious => {
            state.table.select_previous();
            UpdateResult::none()
        }
        Message::SelectFirst => {
            state.table.select_first();
            UpdateResult::none()
        }
        Message::SelectLast => {
            state.table.select_last();
            UpdateResult::none()
        }
        Message::PageDown => {
            state.table.page_down(state.page_size);
            UpdateResult::none()
        }
        Message::PageUp => {
            state.table.page_up(state.page_size);
            UpdateResult::none()
        }

        Message::ConnectSelected => match state.table.selected() {
            Some(record) => UpdateResult::action(UpdateAction::Connect(record.clone())),
            None => UpdateResult::none(),
        },

        Message::Disconnect => UpdateResult::action(UpdateAction::Disconnect),
    }
}
