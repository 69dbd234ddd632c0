//! Fetch helper: the single choke point for HTTP calls
//!
//! Every request carries `X-Requested-With: XMLHttpRequest` (the server uses
//! it to tell fragment requests from full page loads), the anti-forgery token
//! when one is known, and the session cookies from the shared cookie jar.
//! Redirects are not followed: the server answers an unauthenticated request
//! with a redirect to its sign-in page, which becomes
//! [`Error::SignInRequired`] instead of a login form rendered as the view.
//! Non-2xx responses become typed errors; 404 is reported separately from
//! other statuses. There is no retry or backoff at this layer.

use std::sync::{Arc, RwLock};
use std::time::Duration;

use reqwest::cookie::Jar;
use reqwest::header::LOCATION;
use reqwest::redirect::Policy;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use sv_core::prelude::*;
use url::Url;

use crate::csrf::extract_csrf_token;
use crate::mutation::{Method, Mutation, Payload};
use crate::source::FragmentSource;

pub const REQUESTED_WITH_HEADER: &str = "X-Requested-With";
pub const REQUESTED_WITH_VALUE: &str = "XMLHttpRequest";
pub const CSRF_HEADER: &str = "X-CSRFToken";

/// Path prefix of the server's sign-in page
pub const SIGN_IN_PATH: &str = "/auth/login";

/// HTTP client bound to one server origin
#[derive(Debug, Clone)]
pub struct FetchClient {
    http: Client,
    base_url: Url,
    cookies: Arc<Jar>,
    csrf_token: Arc<RwLock<Option<String>>>,
}

impl FetchClient {
    /// Create a client for `base_url` with a per-request timeout
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| Error::invalid_url(format!("{}: {}", base_url, e)))?;

        let cookies = Arc::new(Jar::default());
        let http = Client::builder()
            .cookie_provider(cookies.clone())
            .redirect(Policy::none())
            .timeout(timeout)
            .build()
            .map_err(|e| Error::network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url,
            cookies,
            csrf_token: Arc::new(RwLock::new(None)),
        })
    }

    /// Seed the anti-forgery token (e.g. from configuration)
    pub fn with_csrf_token(self, token: Option<String>) -> Self {
        if let Some(token) = token {
            self.set_csrf_token(token);
        }
        self
    }

    /// Seed the session cookie of a signed-in user (`name=value`)
    pub fn with_session_cookie(self, cookie: Option<&str>) -> Self {
        if let Some(cookie) = cookie {
            debug!("Session cookie seeded for {}", self.base_url);
            self.cookies.add_cookie_str(cookie, &self.base_url);
        }
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn csrf_token(&self) -> Option<String> {
        self.csrf_token
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn set_csrf_token(&self, token: impl Into<String>) {
        let token = token.into();
        debug!("Anti-forgery token updated");
        *self.csrf_token.write().unwrap_or_else(|e| e.into_inner()) = Some(token);
    }

    /// Resolve a server path against the base URL
    pub fn url(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| Error::invalid_url(format!("{}: {}", path, e)))
    }

    /// GET a server-rendered HTML fragment
    ///
    /// A token found in the fragment replaces the current one, so forms
    /// rendered later keep posting with a valid token.
    pub async fn get_fragment(&self, path: &str) -> Result<String> {
        let url = self.url(path)?;
        let response = self.send(self.http.get(url.clone()), &url).await?;
        check_response(&response, &url)?;
        let body = response
            .text()
            .await
            .map_err(|e| Error::network(format!("Failed to read {}: {}", url, e)))?;

        if let Some(token) = extract_csrf_token(&body) {
            self.set_csrf_token(token);
        }

        Ok(body)
    }

    /// GET a JSON document
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path)?;
        let response = self.send(self.http.get(url.clone()), &url).await?;
        check_response(&response, &url)?;
        Self::decode(response, &url).await
    }

    /// Send a write request and decode the JSON reply
    ///
    /// A 4xx/5xx reply that carries a JSON `message` is reported as
    /// [`Error::Rejected`] with that message.
    pub async fn send_mutation<T: DeserializeOwned>(&self, mutation: &Mutation) -> Result<T> {
        let url = self.url(&mutation.path)?;
        let request = match mutation.method {
            Method::Post => self.http.post(url.clone()),
            Method::Patch => self.http.patch(url.clone()),
            Method::Delete => self.http.delete(url.clone()),
        };
        let request = match &mutation.payload {
            Payload::Empty => request,
            Payload::Json(body) => request.json(body),
            Payload::Form(fields) => request.form(fields),
        };

        debug!("{} {}", mutation.method, url);
        let response = self.send(request, &url).await?;
        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            let bytes = response.bytes().await.unwrap_or_default();
            return Err(rejection(status.as_u16(), &bytes, &url));
        }
        check_response(&response, &url)?;
        Self::decode(response, &url).await
    }

    async fn send(&self, request: RequestBuilder, url: &Url) -> Result<Response> {
        let mut request = request.header(REQUESTED_WITH_HEADER, REQUESTED_WITH_VALUE);
        if let Some(token) = self.csrf_token() {
            request = request.header(CSRF_HEADER, token);
        }

        trace!("Sending request to {}", url);
        request
            .send()
            .await
            .map_err(|e| Error::network(format!("{}: {}", url, e)))
    }

    async fn decode<T: DeserializeOwned>(response: Response, url: &Url) -> Result<T> {
        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::network(format!("Failed to read {}: {}", url, e)))?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

fn check_response(response: &Response, url: &Url) -> Result<()> {
    let location = response
        .headers()
        .get(LOCATION)
        .and_then(|value| value.to_str().ok());
    check_status(response.status().as_u16(), location, url)
}

/// Map a response status to an error
///
/// 404 is reported separately, and a redirect to the sign-in page means the
/// session is missing or expired.
fn check_status(status: u16, location: Option<&str>, url: &Url) -> Result<()> {
    match status {
        200..=299 => Ok(()),
        300..=399 if location.is_some_and(is_sign_in_location) => {
            warn!("{} redirected to sign-in", url);
            Err(Error::sign_in_required(status, url.as_str()))
        }
        404 => {
            debug!("404 from {}", url);
            Err(Error::not_found(url.as_str()))
        }
        _ => {
            warn!("HTTP {} from {}", status, url);
            Err(Error::http(status, url.as_str()))
        }
    }
}

/// `true` for a `Location` header pointing at the sign-in page
fn is_sign_in_location(location: &str) -> bool {
    let path = match Url::parse(location) {
        Ok(absolute) => absolute.path().to_string(),
        Err(_) => location.split('?').next().unwrap_or_default().to_string(),
    };
    path.starts_with(SIGN_IN_PATH)
}

#[derive(Deserialize)]
struct ErrorReply {
    message: Option<String>,
}

/// Error for a failed write, preferring the server's own message
fn rejection(status: u16, body: &[u8], url: &Url) -> Error {
    match serde_json::from_slice::<ErrorReply>(body) {
        Ok(ErrorReply {
            message: Some(message),
        }) => {
            warn!("{} rejected with HTTP {}: {}", url, status, message);
            Error::rejected(status, message)
        }
        _ => match check_status(status, None, url) {
            Err(err) => err,
            Ok(()) => Error::http(status, url.as_str()),
        },
    }
}

impl FragmentSource for FetchClient {
    async fn fetch_fragment(&self, path: &str) -> Result<String> {
        self.get_fragment(path).await
    }

    async fn fetch_json(&self, path: &str) -> Result<serde_json::Value> {
        self.get_json(path).await
    }

    async fn submit(&self, mutation: &Mutation) -> Result<serde_json::Value> {
        self.send_mutation(mutation).await
    }
}
