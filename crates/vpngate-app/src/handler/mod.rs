//! Handler module - TEA update function and key routing
//!
//! - `update`: Main update() function and message dispatch
//! - `keys`: Key routing and table navigation

pub(crate) mod keys;
pub(crate) mod update;

pub use keys::{handle_key, route, KeyAction, Route};
pub use update::update;

use crate::message::Message;
use vpngate_core::{EndpointRecord, SessionId};

/// Actions that the event loop should perform after update
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateAction {
    /// Connect to a server, replacing any running tunnel
    Connect(EndpointRecord),

    /// Stop the running tunnel
    Disconnect,

    /// A tunnel exited; let the controller decide whether it was the live one
    HandleExit {
        session: SessionId,
        code: Option<i32>,
    },
}

/// Result of processing a message
#[derive(Debug, Default)]
pub struct UpdateResult {
    /// Optional follow-up message to process
    pub message: Option<Message>,
    /// Optional action for the event loop to perform
    pub action: Option<UpdateAction>,
}

impl UpdateResult {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn message(msg: Message) -> Self {
        Self {
            message: Some(msg),
            action: None,
        }
    }

    pub fn action(action: UpdateAction) -> Self {
        Self {
            message: None,
            action: Some(action),
        }
    }
}
