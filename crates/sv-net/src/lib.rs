//! sv-net - Network layer for the StrokeVision shell
//!
//! Every request the shell makes goes through [`FetchClient`], which attaches
//! the `X-Requested-With` marker, the anti-forgery token, and same-origin
//! session cookies. Writes are described by [`Mutation`]. The
//! [`FragmentSource`] trait abstracts the client so the application loop can
//! run against an in-memory source in tests.

pub mod api;
pub mod csrf;
pub mod fetch;
pub mod mutation;
pub mod source;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_utils;

pub use api::{
    Charts, DashboardStats, EmailUpdate, Kpis, LogRecord, MutationReply, PasswordChange,
    PasswordResetReply, PatientPage, PatientRow, PredictionReply, ProfileUpdate, RiskRow,
    RoleUpdate, ScatterPoint, Suggestion, SuggestionPage, UserList, UserRecord,
};
pub use csrf::extract_csrf_token;
pub use fetch::{
    FetchClient, CSRF_HEADER, REQUESTED_WITH_HEADER, REQUESTED_WITH_VALUE, SIGN_IN_PATH,
};
pub use mutation::{Method, Mutation, Payload};
pub use source::{FragmentSource, LocalFragmentSource};
