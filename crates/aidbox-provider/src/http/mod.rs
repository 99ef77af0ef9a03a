//! # HTTP Transport
//!
//! [`AidboxClient`] implements the [`Transport`] contract over the store's REST surface:
//!
//! | Operation | Request | Success | Not found |
//! |-----------|---------|---------|-----------|
//! | create/replace | `PUT {base}/{kind}/{id}` with a JSON body | 200, 201 | n/a |
//! | read | `GET {base}/{kind}/{id}` | 200 | 404 → `None` |
//! | delete | `DELETE {base}/{kind}/{id}` | 200, 204 | 404 → status error |
//!
//! Every other status is a [`TransportError::Status`] carrying the response body. All requests
//! share the client's timeout.

pub mod auth;

use crate::config::{AuthMode, ProviderConfig};
use async_trait::async_trait;
use reconcile_framework::{Document, Transport, TransportError};
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde_json::Value;
use std::fmt;
use tracing::{debug, info};

#[derive(Clone)]
enum Credentials {
    Bearer(String),
    Basic {
        client_id: String,
        client_secret: String,
    },
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bearer(_) => f.debug_tuple("Bearer").field(&"[REDACTED]").finish(),
            Self::Basic { client_id, .. } => f
                .debug_struct("Basic")
                .field("client_id", client_id)
                .field("client_secret", &"[REDACTED]")
                .finish(),
        }
    }
}

/// Authenticated client for one Aidbox instance.
#[derive(Debug, Clone)]
pub struct AidboxClient {
    /// Base URL without a trailing slash.
    base_url: String,
    base: Url,
    http_client: Client,
    credentials: Credentials,
}

impl AidboxClient {
    /// Builds the HTTP client and, in token mode, performs the token exchange.
    pub async fn connect(config: &ProviderConfig) -> Result<Self, TransportError> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("aidbox-provider/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TransportError::Network(format!("Failed to build HTTP client: {e}")))?;
        Self::with_http_client(config, http_client).await
    }

    /// Like [`connect`](Self::connect) with a pre-built `reqwest::Client` (for testing).
    pub async fn with_http_client(
        config: &ProviderConfig,
        http_client: Client,
    ) -> Result<Self, TransportError> {
        // Normalize base URL: strip trailing slash.
        let base_url = config.url.trim_end_matches('/').to_string();
        let base = Url::parse(&base_url)
            .ok()
            .filter(|url| !url.cannot_be_a_base())
            .ok_or_else(|| TransportError::Network(format!("invalid base URL '{base_url}'")))?;

        let credentials = match config.auth_mode {
            AuthMode::Token => Credentials::Bearer(
                auth::acquire_token(
                    &http_client,
                    &base_url,
                    &config.client_id,
                    &config.client_secret,
                )
                .await?,
            ),
            AuthMode::Basic => Credentials::Basic {
                client_id: config.client_id.clone(),
                client_secret: config.client_secret.clone(),
            },
        };

        info!(%base_url, auth_mode = %config.auth_mode, "Connected");
        Ok(Self {
            base_url,
            base,
            http_client,
            credentials,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `{base}/{kind}/{id}` with each segment percent-encoded, so `/`, `?` and `#` in an id stay
    /// inside its segment.
    fn resource_url(&self, kind: &str, id: &str) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(kind).push(id);
        }
        url
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.credentials {
            Credentials::Bearer(token) => builder.bearer_auth(token),
            Credentials::Basic {
                client_id,
                client_secret,
            } => builder.basic_auth(client_id, Some(client_secret)),
        }
    }
}

/// Translates a reqwest failure into the transport taxonomy.
pub fn map_reqwest_error(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout(e.to_string())
    } else if e.is_decode() || e.is_body() {
        TransportError::Body(e.to_string())
    } else {
        TransportError::Network(e.to_string())
    }
}

async fn status_error(response: reqwest::Response) -> TransportError {
    let status = response.status().as_u16();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "<no body>".to_string());
    TransportError::Status { status, body }
}

#[async_trait]
impl Transport for AidboxClient {
    async fn create_or_replace(
        &self,
        kind: &str,
        id: &str,
        document: &Document,
    ) -> Result<(), TransportError> {
        let url = self.resource_url(kind, id);
        debug!(%url, "HTTP PUT");
        let response = self
            .authorize(self.http_client.put(url))
            .json(document)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        match response.status() {
            StatusCode::OK | StatusCode::CREATED => Ok(()),
            _ => Err(status_error(response).await),
        }
    }

    async fn read(&self, kind: &str, id: &str) -> Result<Option<Document>, TransportError> {
        let url = self.resource_url(kind, id);
        debug!(%url, "HTTP GET");
        let response = self
            .authorize(self.http_client.get(url))
            .send()
            .await
            .map_err(map_reqwest_error)?;

        match response.status() {
            StatusCode::OK => {
                let body = response.text().await.map_err(map_reqwest_error)?;
                match serde_json::from_str::<Value>(&body) {
                    Ok(Value::Object(document)) => Ok(Some(document)),
                    Ok(other) => Err(TransportError::Body(format!(
                        "expected a JSON object, got {other}"
                    ))),
                    Err(e) => Err(TransportError::Body(format!(
                        "Failed to parse response: {e}"
                    ))),
                }
            }
            StatusCode::NOT_FOUND => Ok(None),
            _ => Err(status_error(response).await),
        }
    }

    async fn delete(&self, kind: &str, id: &str) -> Result<(), TransportError> {
        let url = self.resource_url(kind, id);
        debug!(%url, "HTTP DELETE");
        let response = self
            .authorize(self.http_client.delete(url))
            .send()
            .await
            .map_err(map_reqwest_error)?;

        match response.status() {
            StatusCode::OK | StatusCode::NO_CONTENT => Ok(()),
            _ => Err(status_error(response).await),
        }
    }
}
