//! Message processing
//!
//! Runs a message through the TEA update function, follows chained messages,
//! and hands every resulting action to the action dispatcher.

use std::sync::Arc;

use sv_net::FragmentSource;
use tokio::sync::mpsc;

use crate::handler;
use crate::message::Message;
use crate::state::AppState;

use super::actions::handle_action;

/// Process a message through the TEA update function
pub fn process_message<S>(
    state: &mut AppState,
    message: Message,
    msg_tx: &mpsc::Sender<Message>,
    source: &Arc<S>,
) where
    S: FragmentSource + Sync + 'static,
{
    let mut msg = Some(message);
    while let Some(m) = msg {
        let result = handler::update(state, m);

        if let Some(action) = result.action {
            handle_action(action, msg_tx.clone(), source.clone());
        }

        msg = result.message;
    }
}
