//! Client-credentials token exchange.

use reconcile_framework::TransportError;
use serde::Deserialize;
use tracing::debug;

/// Path of the token endpoint, relative to the base URL.
pub const TOKEN_PATH: &str = "/auth/token";

#[derive(Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
}

/// Exchanges client credentials for a bearer token.
///
/// POSTs `grant_type=client_credentials` to `{base_url}/auth/token` with the credentials as
/// basic auth. A non-200 answer, an undecodable body, and a missing or empty `access_token` are
/// all [`TransportError::Token`].
pub async fn acquire_token(
    http_client: &reqwest::Client,
    base_url: &str,
    client_id: &str,
    client_secret: &str,
) -> Result<String, TransportError> {
    let url = format!("{base_url}{TOKEN_PATH}");
    debug!(%url, client_id, "Requesting access token");

    let response = http_client
        .post(&url)
        .basic_auth(client_id, Some(client_secret))
        .form(&[("grant_type", "client_credentials")])
        .send()
        .await
        .map_err(|e| TransportError::Token(format!("Token request failed: {e}")))?;

    let status = response.status();
    if status != reqwest::StatusCode::OK {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<no body>".to_string());
        return Err(TransportError::Token(format!(
            "Token endpoint returned {status}: {body}"
        )));
    }

    let token: TokenResponse = response
        .json()
        .await
        .map_err(|e| TransportError::Token(format!("Failed to parse token response: {e}")))?;

    match token.access_token {
        Some(access_token) if !access_token.is_empty() => {
            debug!("Access token acquired");
            Ok(access_token)
        }
        _ => Err(TransportError::Token(
            "no access_token in token response".to_string(),
        )),
    }
}
