//! Engine - owns the application state, the message channel and the source
//!
//! Both front ends drive the same Engine: the TUI feeds it key messages and
//! redraws after each cycle, the headless runner subscribes to its events.

use std::sync::Arc;
use std::time::Duration;

use sv_net::FragmentSource;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, warn};

use crate::engine_event::EngineEvent;
use crate::message::Message;
use crate::process::process_message;
use crate::shell::{ContentBody, HeaderState};
use crate::state::AppState;

/// Capacity of the message channel
const MESSAGE_CAPACITY: usize = 256;

/// Capacity of the event broadcast channel
const EVENT_CAPACITY: usize = 256;

/// What changed during one processing cycle is derived from these fields
#[derive(Debug)]
struct Snapshot {
    generation: u64,
    pending: bool,
    feature_busy: bool,
    search_busy: bool,
    notice: Option<String>,
}

impl Snapshot {
    fn of(state: &AppState) -> Self {
        Self {
            generation: state.router.generation(),
            pending: state.router.is_pending(),
            feature_busy: state
                .feature
                .as_ref()
                .is_some_and(|feature| feature.is_loading()),
            search_busy: state.search.is_loading(),
            notice: state.notice.clone(),
        }
    }
}

pub struct Engine<S> {
    pub state: AppState,
    msg_tx: mpsc::Sender<Message>,
    msg_rx: mpsc::Receiver<Message>,
    event_tx: broadcast::Sender<EngineEvent>,
    source: Arc<S>,
}

impl<S> Engine<S>
where
    S: FragmentSource + Sync + 'static,
{
    pub fn new(state: AppState, source: S) -> Self {
        Self::with_source(state, Arc::new(source))
    }

    pub fn with_source(state: AppState, source: Arc<S>) -> Self {
        let (msg_tx, msg_rx) = mpsc::channel(MESSAGE_CAPACITY);
        let (event_tx, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            state,
            msg_tx,
            msg_rx,
            event_tx,
            source,
        }
    }

    /// Sender for messages produced outside the engine (input, signals)
    pub fn msg_sender(&self) -> mpsc::Sender<Message> {
        self.msg_tx.clone()
    }

    pub fn source(&self) -> &Arc<S> {
        &self.source
    }

    /// Receive engine events from now on
    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.event_tx.subscribe()
    }

    /// Navigate to the startup target
    pub fn start(&mut self) {
        self.process_message(Message::Start);
    }

    /// Process one message and broadcast what changed
    pub fn process_message(&mut self, message: Message) {
        let before = Snapshot::of(&self.state);
        process_message(&mut self.state, message, &self.msg_tx, &self.source);
        self.emit_changes(&before);
    }

    /// Process everything already queued; returns how many were handled
    pub fn drain_pending_messages(&mut self) -> usize {
        let mut count = 0;
        while let Ok(message) = self.msg_rx.try_recv() {
            self.process_message(message);
            count += 1;
        }
        count
    }

    /// Wait for the next message and process it
    pub async fn step(&mut self) -> bool {
        match self.msg_rx.recv().await {
            Some(message) => {
                self.process_message(message);
                true
            }
            None => false,
        }
    }

    /// Process messages until nothing is loading or transitioning
    ///
    /// Returns `false` if `timeout` passes first.
    pub async fn settle(&mut self, timeout: Duration) -> bool {
        let deadline = tokio::time::Instant::now() + timeout;
        while !self.state.is_idle() {
            match tokio::time::timeout_at(deadline, self.msg_rx.recv()).await {
                Ok(Some(message)) => self.process_message(message),
                Ok(None) => return false,
                Err(_) => {
                    warn!("Engine did not settle within {:?}", timeout);
                    return false;
                }
            }
        }
        true
    }

    pub fn should_quit(&self) -> bool {
        self.state.should_quit()
    }

    fn emit_changes(&self, before: &Snapshot) {
        let after = Snapshot::of(&self.state);
        let router = &self.state.router;

        if after.generation != before.generation && after.pending {
            self.emit(EngineEvent::NavigationStarted {
                generation: after.generation,
                hash: router.location().to_string(),
                target: router.intended().clone(),
            });
        }

        if before.pending && !after.pending {
            let shell = router.shell();
            match shell.content() {
                ContentBody::Fragment { target, html } => {
                    if let HeaderState::Ready(header) = shell.header() {
                        self.emit(EngineEvent::FragmentRendered {
                            generation: after.generation,
                            target,
                            title: header.title,
                            back: header.back,
                            bytes: html.len(),
                        });
                    }
                }
                ContentBody::Error { target, panel } => {
                    self.emit(EngineEvent::ErrorRendered {
                        generation: after.generation,
                        target,
                        status: panel.status,
                        title: panel.title,
                        message: panel.message,
                    });
                }
                ContentBody::Empty => {
                    self.emit(EngineEvent::ShellClosed {
                        generation: after.generation,
                    });
                }
                ContentBody::Loading(_) => {}
            }
        }

        if before.feature_busy && !after.feature_busy {
            if let Some(feature) = &self.state.feature {
                self.emit(EngineEvent::FeatureLoaded {
                    view: feature.view(),
                    lines: feature.lines(),
                });
            }
        }

        if before.search_busy && !after.search_busy {
            self.emit(EngineEvent::SearchResults {
                query: self.state.search.query().to_string(),
                lines: self.state.search.lines(),
            });
        }

        if after.notice != before.notice {
            if let Some(message) = after.notice {
                self.emit(EngineEvent::Notice { message });
            }
        }
    }

    fn emit(&self, event: EngineEvent) {
        // No subscribers is fine
        if self.event_tx.send(event).is_err() {
            debug!("No engine event subscribers");
        }
    }
}
