//! # sv-core - Core Domain Types
//!
//! Foundation crate for the StrokeVision shell. Provides the view vocabulary,
//! navigation targets and their URL-hash encoding, error handling, and logging
//! setup.
//!
//! This crate has **zero internal dependencies** -- it only depends on external
//! crates (serde, thiserror, tracing, percent-encoding).
//!
//! ## Public API
//!
//! ### Views (`view`)
//! - [`ViewId`] - The fixed set of views the shell can show
//! - [`EntityId`] - Opaque record identifier carried by detail/edit views
//! - [`NavTarget`] - A view plus its optional entity, with hash and path encoding
//!
//! ### Error Handling (`error`)
//! - [`Error`] - Custom error enum grouped by layer, with HTTP status lookup
//! - [`Result`] - Type alias for `std::result::Result<T, Error>`
//! - [`ResultExt`] - Extension trait for adding error context
//!
//! ## Prelude
//!
//! Import commonly used types with:
//! ```rust
//! use sv_core::prelude::*;
//! ```

pub mod error;
pub mod logging;
pub mod view;

/// Prelude for common imports used throughout all StrokeVision shell crates
pub mod prelude {
    pub use super::error::{Error, Result, ResultExt};
    pub use tracing::{debug, error, info, instrument, trace, warn};
}

// Re-export commonly used types at crate root for convenience
pub use error::{Error, Result, ResultExt};
pub use view::{split_hash, title_for, EntityId, NavTarget, ViewId, APP_NAME};
