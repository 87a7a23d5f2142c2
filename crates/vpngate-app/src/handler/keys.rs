//! Key routing for the server view

use crate::input_key::InputKey;
use crate::message::Message;
use vpngate_core::SortKey;

/// Keys with a fixed meaning regardless of table position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    ToggleSort(SortKey),
    ConnectSelected,
    Disconnect,
    Quit,
}

/// Outcome of routing one key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Action(KeyAction),
    /// Not claimed; offered to table navigation
    PassThrough(InputKey),
}

/// Map a key to an action, or pass it through
pub fn route(key: InputKey) -> Route {
    let action = match key {
        InputKey::Char(c) => match SortKey::from_trigger(c) {
            Some(sort_key) => KeyAction::ToggleSort(sort_key),
            None => match c {
                'x' => KeyAction::Disconnect,
                'q' => KeyAction::Quit,
                _ => return Route::PassThrough(key),
            },
        },
        InputKey::CharCtrl('c') => KeyAction::Quit,
        InputKey::Enter => KeyAction::ConnectSelected,
        _ => return Route::PassThrough(key),
    };
    Route::Action(action)
}

/// Table navigation for keys `route` did not claim
fn navigate(key: InputKey) -> Option<Message> {
    match key {
        InputKey::Up | InputKey::Char('k') => Some(Message::SelectPrevious),
        InputKey::Down | InputKey::Char('j') => Some(Message::SelectNext),
        InputKey::Home | InputKey::Char('g') => Some(Message::SelectFirst),
        InputKey::End | InputKey::Char('G') => Some(Message::SelectLast),
        InputKey::PageUp => Some(Message::PageUp),
        InputKey::PageDown => Some(Message::PageDown),
        _ => None,
    }
}

/// Convert a key event to a message
pub fn handle_key(key: InputKey) -> Option<Message> {
    match route(key) {
        Route::Action(KeyAction::ToggleSort(sort_key)) => Some(Message::SortBy(sort_key)),
        Route::Action(KeyAction::ConnectSelected) => Some(Message::ConnectSelected),
        Route::Action(KeyAction::Disconnect) => Some(Message::Disconnect),
        Route::Action(KeyAction::Quit) => Some(Message::Quit),
        Route::PassThrough(key) => navigate(key),
    }
}
