//! Fragment source abstraction
//!
//! The application loop needs three operations from the network: fetch an
//! HTML fragment, fetch a JSON document, and send a write request.
//! [`FetchClient`] implements them against a real server; tests plug in an
//! in-memory source.
//!
//! [`FetchClient`]: crate::fetch::FetchClient

use sv_core::prelude::*;

use crate::mutation::Mutation;

/// Source of server-rendered fragments and JSON data
#[trait_variant::make(FragmentSource: Send)]
pub trait LocalFragmentSource {
    /// Fetch the HTML fragment at `path`
    async fn fetch_fragment(&self, path: &str) -> Result<String>;

    /// Fetch the JSON document at `path`
    async fn fetch_json(&self, path: &str) -> Result<serde_json::Value>;

    /// Send a write request and return its JSON reply
    async fn submit(&self, mutation: &Mutation) -> Result<serde_json::Value>;
}
