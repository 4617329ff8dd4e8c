//! HTTP client for the Firestore REST API.

use std::time::Duration;

use reqwest::{RequestBuilder, StatusCode, Url};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, instrument, trace};

use mergulho_core::error::{Error, InvalidInputError, ProtocolError, TransportError};
use mergulho_core::{Result, StoreUrl};

use crate::wire::ErrorResponse;

/// Database used when none is configured.
pub const DEFAULT_DATABASE: &str = "(default)";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Where and how to reach a Firestore database.
#[derive(Clone)]
pub struct FirestoreConfig {
    /// API endpoint, e.g. `https://firestore.googleapis.com` or an emulator.
    pub endpoint: StoreUrl,
    pub project_id: String,
    pub database_id: String,
    /// OAuth2 bearer token. Omitted for the emulator.
    pub token: Option<String>,
    pub timeout: Duration,
}

impl FirestoreConfig {
    pub fn new(endpoint: StoreUrl, project_id: impl Into<String>) -> Self {
        Self {
            endpoint,
            project_id: project_id.into(),
            database_id: DEFAULT_DATABASE.to_string(),
            token: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_database(mut self, database_id: impl Into<String>) -> Self {
        self.database_id = database_id.into();
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl std::fmt::Debug for FirestoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirestoreConfig")
            .field("endpoint", &self.endpoint.as_str())
            .field("project_id", &self.project_id)
            .field("database_id", &self.database_id)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

fn map_reqwest(err: reqwest::Error) -> Error {
    if err.is_timeout() {
        Error::Transport(TransportError::Timeout)
    } else if err.is_connect() {
        Error::Transport(TransportError::Connection {
            message: err.to_string(),
        })
    } else if err.is_decode() {
        Error::InvalidInput(InvalidInputError::Document {
            message: err.to_string(),
        })
    } else {
        Error::Transport(TransportError::Http {
            message: err.to_string(),
        })
    }
}

/// Returns true for the error Firestore answers a missing document with.
pub(crate) fn is_missing(err: &Error) -> bool {
    matches!(err, Error::Protocol(p) if p.status == StatusCode::NOT_FOUND.as_u16())
}

/// HTTP client bound to one Firestore database.
#[derive(Debug, Clone)]
pub struct FirestoreClient {
    client: reqwest::Client,
    config: FirestoreConfig,
}

impl FirestoreClient {
    /// Create a client for the configured database.
    pub fn new(config: FirestoreConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("mergulho/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .build()
            .map_err(map_reqwest)?;

        Ok(Self { client, config })
    }

    fn documents_root(&self) -> String {
        format!(
            "v1/projects/{}/databases/{}/documents",
            self.config.project_id, self.config.database_id
        )
    }

    fn parse_url(s: &str) -> Result<Url> {
        Url::parse(s).map_err(|e| {
            Error::InvalidInput(InvalidInputError::StoreUrl {
                value: s.to_string(),
                reason: e.to_string(),
            })
        })
    }

    /// URL of a collection or document below the database root.
    pub(crate) fn document_url(&self, segments: &[&str]) -> Result<Url> {
        let base = self.config.endpoint.api_url(&self.documents_root());
        let mut url = Self::parse_url(&base)?;
        url.path_segments_mut()
            .map_err(|_| {
                Error::InvalidInput(InvalidInputError::StoreUrl {
                    value: base.clone(),
                    reason: "cannot be a base".to_string(),
                })
            })?
            .extend(segments);
        Ok(url)
    }

    /// URL of a database-level method such as `runQuery`.
    pub(crate) fn method_url(&self, method: &str) -> Result<Url> {
        let root = format!("{}:{}", self.documents_root(), method);
        Self::parse_url(&self.config.endpoint.api_url(&root))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.config.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    #[instrument(skip(self, body), fields(url = %url))]
    pub(crate) async fn post<B, R>(&self, url: Url, body: &B) -> Result<R>
    where
        B: Serialize,
        R: DeserializeOwned,
    {
        debug!("Firestore POST");
        let request = self.authorize(self.client.post(url).json(body));
        let response = request.send().await.map_err(map_reqwest)?;
        self.handle_response(response).await
    }

    /// GET a resource, mapping 404 to `None`.
    #[instrument(skip(self), fields(url = %url))]
    pub(crate) async fn get<R: DeserializeOwned>(&self, url: Url) -> Result<Option<R>> {
        debug!("Firestore GET");
        let request = self.authorize(self.client.get(url));
        let response = request.send().await.map_err(map_reqwest)?;
        match self.handle_response(response).await {
            Ok(body) => Ok(Some(body)),
            Err(e) if is_missing(&e) => Ok(None),
            Err(e) => Err(e),
        }
    }

    #[instrument(skip(self, params, body), fields(url = %url))]
    pub(crate) async fn patch<B, R>(&self, url: Url, params: &[(&str, String)], body: &B) -> Result<R>
    where
        B: Serialize,
        R: DeserializeOwned,
    {
        debug!("Firestore PATCH");
        trace!(?params, "query parameters");
        let request = self.authorize(self.client.patch(url).query(params).json(body));
        let response = request.send().await.map_err(map_reqwest)?;
        self.handle_response(response).await
    }

    #[instrument(skip(self), fields(url = %url))]
    pub(crate) async fn delete(&self, url: Url) -> Result<()> {
        debug!("Firestore DELETE");
        let request = self.authorize(self.client.delete(url));
        let response = request.send().await.map_err(map_reqwest)?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(Error::Protocol(self.parse_error_response(response).await))
        }
    }

    async fn handle_response<R: DeserializeOwned>(&self, response: reqwest::Response) -> Result<R> {
        let status = response.status();
        trace!(status = %status, "Firestore response");

        if status.is_success() {
            response.json::<R>().await.map_err(map_reqwest)
        } else {
            Err(Error::Protocol(self.parse_error_response(response).await))
        }
    }

    async fn parse_error_response(&self, response: reqwest::Response) -> ProtocolError {
        let status = response.status().as_u16();

        match response.json::<ErrorResponse>().await {
            Ok(body) => ProtocolError::new(status, body.error.status, body.error.message),
            Err(_) => ProtocolError::new(status, None, None),
        }
    }
}
