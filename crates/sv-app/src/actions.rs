//! Action handlers: UpdateAction dispatch and background task spawning

use std::sync::Arc;

use sv_net::FragmentSource;
use tokio::sync::mpsc;
use tracing::debug;

use crate::message::{FetchFailure, Message};
use crate::UpdateAction;

/// Execute an action by spawning a background task
///
/// Every task reports back through `msg_tx`; a closed channel means the
/// event loop is gone and the result is discarded.
pub fn handle_action<S>(action: UpdateAction, msg_tx: mpsc::Sender<Message>, source: Arc<S>)
where
    S: FragmentSource + Sync + 'static,
{
    match action {
        UpdateAction::FetchFragment {
            generation,
            target,
            path,
        } => {
            tokio::spawn(async move {
                let result = source
                    .fetch_fragment(&path)
                    .await
                    .map_err(FetchFailure::from);
                send(
                    &msg_tx,
                    Message::FragmentLoaded {
                        generation,
                        target,
                        result,
                    },
                )
                .await;
            });
        }

        UpdateAction::CompleteClose { generation, after } => {
            tokio::spawn(async move {
                tokio::time::sleep(after).await;
                send(&msg_tx, Message::CloseFinished { generation }).await;
            });
        }

        UpdateAction::FetchFeatureData { generation, path } => {
            tokio::spawn(async move {
                let result = source.fetch_json(&path).await.map_err(FetchFailure::from);
                send(
                    &msg_tx,
                    Message::FeatureData {
                        generation,
                        path,
                        result,
                    },
                )
                .await;
            });
        }

        UpdateAction::FetchSuggestions { seq, path } => {
            tokio::spawn(async move {
                let result = source.fetch_json(&path).await.map_err(FetchFailure::from);
                send(&msg_tx, Message::SuggestionsLoaded { seq, path, result }).await;
            });
        }

        UpdateAction::Submit(write) => {
            tokio::spawn(async move {
                let result = source
                    .submit(&write.mutation)
                    .await
                    .map_err(FetchFailure::from);
                send(&msg_tx, Message::WriteFinished { write, result }).await;
            });
        }
    }
}

async fn send(msg_tx: &mpsc::Sender<Message>, message: Message) {
    if msg_tx.send(message).await.is_err() {
        debug!("Event loop closed, dropping task result");
    }
}
