//! Requests that change server state
//!
//! Reads go through `get_fragment`/`get_json`; every write the shell makes is
//! described by a [`Mutation`] and sent with `FetchClient::send_mutation`.

use std::fmt;

use serde::Serialize;

/// HTTP method of a mutating request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Post,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Post => "POST",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request body
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Payload {
    #[default]
    Empty,
    /// `application/json`
    Json(serde_json::Value),
    /// `application/x-www-form-urlencoded`, fields in order
    Form(Vec<(String, String)>),
}

/// One write request against the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mutation {
    pub method: Method,
    pub path: String,
    pub payload: Payload,
}

impl Mutation {
    pub fn delete(path: impl Into<String>) -> Self {
        Self {
            method: Method::Delete,
            path: path.into(),
            payload: Payload::Empty,
        }
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            payload: Payload::Empty,
        }
    }

    pub fn post_form(path: impl Into<String>, fields: Vec<(String, String)>) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            payload: Payload::Form(fields),
        }
    }

    pub fn patch_json<B: Serialize>(
        path: impl Into<String>,
        body: &B,
    ) -> serde_json::Result<Self> {
        Ok(Self {
            method: Method::Patch,
            path: path.into(),
            payload: Payload::Json(serde_json::to_value(body)?),
        })
    }

    /// Value of a form field, for form payloads
    pub fn form_value(&self, name: &str) -> Option<&str> {
        match &self.payload {
            Payload::Form(fields) => fields
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for Mutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}
