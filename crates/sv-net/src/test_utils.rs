//! In-memory fragment source for tests
//!
//! Routes are registered by path with a canned body or status code and an
//! optional delay, and every requested path is recorded so tests can assert
//! which requests were (or were not) issued. Writes are recorded as
//! `"<METHOD> <path>"` and kept whole in [`StaticSource::submissions`].

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use sv_core::prelude::*;

use crate::mutation::Mutation;
use crate::source::FragmentSource;

#[derive(Debug, Clone)]
enum Reply {
    Body(String),
    Status(u16),
    Rejected(u16, String),
}

#[derive(Debug, Clone)]
struct Route {
    reply: Reply,
    delay: Duration,
}

/// Canned responses keyed by path
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    routes: Arc<Mutex<HashMap<String, Route>>>,
    requests: Arc<Mutex<Vec<String>>>,
    submissions: Arc<Mutex<Vec<Mutation>>>,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` at `path`
    pub fn with_body(self, path: &str, body: impl Into<String>) -> Self {
        self.insert(path, Reply::Body(body.into()), Duration::ZERO);
        self
    }

    /// Serve `body` at `path` after `delay`
    pub fn with_delayed_body(self, path: &str, body: impl Into<String>, delay: Duration) -> Self {
        self.insert(path, Reply::Body(body.into()), delay);
        self
    }

    /// Serve a JSON document at `path`
    pub fn with_json(self, path: &str, value: serde_json::Value) -> Self {
        self.insert(path, Reply::Body(value.to_string()), Duration::ZERO);
        self
    }

    /// Answer `path` with an HTTP error status
    pub fn with_status(self, path: &str, status: u16) -> Self {
        self.insert(path, Reply::Status(status), Duration::ZERO);
        self
    }

    /// Refuse writes to `path` with a status and server message
    pub fn with_rejection(self, path: &str, status: u16, message: impl Into<String>) -> Self {
        self.insert(path, Reply::Rejected(status, message.into()), Duration::ZERO);
        self
    }

    /// Write requests received so far, in order
    pub fn submissions(&self) -> Vec<Mutation> {
        self.submissions
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Paths requested so far, in order
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn insert(&self, path: &str, reply: Reply, delay: Duration) {
        self.routes
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(path.to_string(), Route { reply, delay });
    }

    async fn respond(&self, path: &str, label: String) -> Result<String> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(label);

        let route = self
            .routes
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(path)
            .cloned();

        let Some(route) = route else {
            return Err(Error::not_found(path));
        };

        if !route.delay.is_zero() {
            tokio::time::sleep(route.delay).await;
        }

        match route.reply {
            Reply::Body(body) => Ok(body),
            Reply::Status(404) => Err(Error::not_found(path)),
            Reply::Status(status) => Err(Error::http(status, path)),
            Reply::Rejected(status, message) => Err(Error::rejected(status, message)),
        }
    }
}

impl FragmentSource for StaticSource {
    async fn fetch_fragment(&self, path: &str) -> Result<String> {
        self.respond(path, path.to_string()).await
    }

    async fn fetch_json(&self, path: &str) -> Result<serde_json::Value> {
        let body = self.respond(path, path.to_string()).await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn submit(&self, mutation: &Mutation) -> Result<serde_json::Value> {
        self.submissions
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(mutation.clone());
        let body = self.respond(&mutation.path, mutation.to_string()).await?;
        Ok(serde_json::from_str(&body)?)
    }
}
