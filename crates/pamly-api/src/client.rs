// Appliance HTTP client
//
// Wraps `reqwest::Client` with bearer-token injection, `/service/core/v4/`
// URL construction and appliance error decoding. Resource endpoints
// (users, assets, access requests, etc.) are implemented as inherent
// methods in separate files to keep this module focused on transport
// mechanics.

use std::sync::{PoisonError, RwLock};

use bytes::Bytes;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::models::ApiErrorBody;
use crate::transport::TransportConfig;

/// Path prefix of the core service API, relative to the appliance root.
const CORE_API_PREFIX: &str = "service/core/v4/";

/// Authenticated HTTP client for the appliance's core REST API.
///
/// Every request carries the user token as a bearer credential. The raw
/// verbs ([`get`](Self::get), [`post`](Self::post), [`put`](Self::put),
/// [`delete`](Self::delete)) return the undecoded response body; the
/// `*_json` helpers decode it into typed records.
///
/// The client is `Send + Sync`; share it behind an `Arc` for concurrent use.
pub struct ApplianceClient {
    http: reqwest::Client,
    base_url: Url,
    /// User token obtained from the login exchange (or supplied directly).
    token: RwLock<Option<SecretString>>,
}

impl ApplianceClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// `base_url` is the appliance root (e.g. `https://pam.example.com`).
    /// The client starts without a token; call
    /// [`login`](Self::login) or [`set_token`](Self::set_token) before use.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, base_url))
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            http,
            base_url: normalize_base_url(base_url),
            token: RwLock::new(None),
        }
    }

    /// Attach a pre-issued user token.
    pub fn with_token(self, token: SecretString) -> Self {
        self.set_token(token);
        self
    }

    /// The appliance base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The underlying HTTP client (for auth flows that need direct access).
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    // ── Token management ─────────────────────────────────────────────

    /// Store the user token used for all subsequent requests.
    pub fn set_token(&self, token: SecretString) {
        debug!("storing user token");
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token);
    }

    /// Forget the stored user token.
    pub fn clear_token(&self) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Whether a user token is currently held.
    pub fn has_token(&self) -> bool {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    fn authorize(&self, builder: reqwest::RequestBuilder) -> Result<reqwest::RequestBuilder, Error> {
        let guard = self.token.read().unwrap_or_else(PoisonError::into_inner);
        match guard.as_ref() {
            Some(token) => Ok(builder.bearer_auth(token.expose_secret())),
            None => Err(Error::NotLoggedIn),
        }
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build a full URL for a path relative to the core API,
    /// e.g. `"Users/12"` -> `https://host/service/core/v4/Users/12`.
    pub fn api_url(&self, path: &str) -> Result<Url, Error> {
        let path = path.trim_start_matches('/');
        Ok(self.base_url.join(CORE_API_PREFIX)?.join(path)?)
    }

    /// Build a URL relative to the appliance root (used by the STS login).
    pub(crate) fn root_url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    // ── Raw verbs ────────────────────────────────────────────────────

    /// Authenticated GET, returning the raw response body.
    pub async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Bytes, Error> {
        let url = self.api_url(path)?;
        debug!("GET {url} params={query:?}");

        let builder = self.authorize(self.http.get(url))?.query(query);
        let resp = builder.send().await?;
        read_body(resp).await
    }

    /// Authenticated POST with a JSON body, returning the raw response body.
    pub async fn post<B: Serialize + Sync + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Bytes, Error> {
        let url = self.api_url(path)?;
        debug!("POST {url}");

        let builder = self.authorize(self.http.post(url))?.json(body);
        let resp = builder.send().await?;
        read_body(resp).await
    }

    /// Authenticated POST without a body (action endpoints).
    pub async fn post_empty(&self, path: &str) -> Result<Bytes, Error> {
        let url = self.api_url(path)?;
        debug!("POST {url}");

        let builder = self.authorize(self.http.post(url))?;
        let resp = builder.send().await?;
        read_body(resp).await
    }

    /// Authenticated PUT with a JSON body, returning the raw response body.
    pub async fn put<B: Serialize + Sync + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Bytes, Error> {
        let url = self.api_url(path)?;
        debug!("PUT {url}");

        let builder = self.authorize(self.http.put(url))?.json(body);
        let resp = builder.send().await?;
        read_body(resp).await
    }

    /// Authenticated DELETE, returning the raw response body.
    pub async fn delete(&self, path: &str) -> Result<Bytes, Error> {
        let url = self.api_url(path)?;
        debug!("DELETE {url}");

        let builder = self.authorize(self.http.delete(url))?;
        let resp = builder.send().await?;
        read_body(resp).await
    }

    // ── JSON helpers ─────────────────────────────────────────────────

    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, Error> {
        let body = self.get(path, query).await?;
        decode(&body)
    }

    pub(crate) async fn post_json<T: DeserializeOwned, B: Serialize + Sync + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let body = self.post(path, body).await?;
        decode(&body)
    }

    pub(crate) async fn post_action<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let body = self.post_empty(path).await?;
        decode(&body)
    }

    pub(crate) async fn put_json<T: DeserializeOwned, B: Serialize + Sync + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let body = self.put(path, body).await?;
        decode(&body)
    }
}

/// Ensure the base URL path ends in `/` so relative joins append
/// instead of replacing the last segment.
fn normalize_base_url(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

/// Read a response body, mapping non-2xx statuses to [`Error`].
pub(crate) async fn read_body(resp: reqwest::Response) -> Result<Bytes, Error> {
    let status = resp.status();
    if status.is_success() {
        let body = resp.bytes().await?;
        trace!(len = body.len(), "response body received");
        return Ok(body);
    }

    let raw = resp.text().await.unwrap_or_default();

    if status == reqwest::StatusCode::UNAUTHORIZED {
        return Err(Error::Authentication {
            message: if raw.is_empty() {
                "token expired or invalid credentials".into()
            } else {
                raw
            },
        });
    }

    Err(match serde_json::from_str::<ApiErrorBody>(&raw) {
        Ok(err) => Error::Api {
            status: status.as_u16(),
            code: err.code,
            message: err.message.unwrap_or_else(|| status.to_string()),
        },
        Err(_) => Error::Api {
            status: status.as_u16(),
            code: None,
            message: if raw.is_empty() {
                status.to_string()
            } else {
                raw
            },
        },
    })
}

/// Decode a JSON body, keeping a preview of the payload on failure.
pub(crate) fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, Error> {
    serde_json::from_slice(body).map_err(|e| {
        let text = String::from_utf8_lossy(body).into_owned();
        let preview: String = text.chars().take(200).collect();
        Error::Deserialization {
            message: format!("{e} (body preview: {preview:?})"),
            body: text,
        }
    })
}
