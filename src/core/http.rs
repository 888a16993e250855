//! HTTP client utilities.
//!
//! Builds the shared `reqwest` client and maps transport and status failures
//! onto [`RainforestError`].

use std::time::Duration;

use reqwest::{Client, ClientBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::error::{RainforestError, Result};

/// Default timeout for HTTP requests.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Timeout for the background release check.
pub const UPDATE_CHECK_TIMEOUT: Duration = Duration::from_secs(3);

/// Longest response excerpt carried into an error message.
const MAX_ERROR_BODY: usize = 200;

/// Build a configured HTTP client.
///
/// # Errors
///
/// Returns error if client construction fails.
pub fn build_client(timeout: Duration) -> Result<Client> {
    ClientBuilder::new()
        .timeout(timeout)
        .user_agent(format!("rainforest-cli/{}", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| RainforestError::Network(e.to_string()))
}

/// Map a transport failure to an error.
#[must_use]
pub fn send_error(err: &reqwest::Error, timeout: Duration) -> RainforestError {
    if err.is_timeout() {
        RainforestError::Timeout(timeout.as_secs())
    } else {
        RainforestError::Network(err.to_string())
    }
}

/// Check the status of a response and decode its JSON body.
///
/// An empty body decodes as JSON `null`, so `()` and `Option<T>` work for
/// endpoints that answer with no content.
///
/// # Errors
///
/// Returns `AuthInvalid` for 401/403, `Api` for other non-success statuses,
/// and `ParseResponse` when the body is not the expected JSON.
pub async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| RainforestError::Network(e.to_string()))?;

    check_status(status, &body)?;
    decode_body(&body)
}

/// Map a non-success status to an error.
///
/// # Errors
///
/// Returns `AuthInvalid` for 401/403 and `Api` for other non-success statuses.
pub fn check_status(status: StatusCode, body: &str) -> Result<()> {
    if status.is_success() {
        return Ok(());
    }

    if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
        return Err(RainforestError::AuthInvalid {
            status: status.as_u16(),
        });
    }

    Err(RainforestError::Api {
        status: status.as_u16(),
        message: error_message(body),
    })
}

/// Decode a JSON body, treating an empty body as `null`.
///
/// # Errors
///
/// Returns `ParseResponse` when the body does not match `T`.
pub fn decode_body<T: DeserializeOwned>(body: &str) -> Result<T> {
    let body = if body.trim().is_empty() { "null" } else { body };
    serde_json::from_str(body).map_err(|e| RainforestError::ParseResponse(e.to_string()))
}

/// Extract the API's `error` field, or a short excerpt of the raw body.
fn error_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body)
        && let Some(message) = value.get("error").and_then(serde_json::Value::as_str)
    {
        return message.to_string();
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "empty response".to_string();
    }
    trimmed.chars().take(MAX_ERROR_BODY).collect()
}

/// Fetch JSON from a URL without API credentials.
///
/// # Errors
///
/// Returns error on network failure, non-success status or JSON parse failure.
pub async fn fetch_json<T: DeserializeOwned>(
    client: &Client,
    url: &str,
    timeout: Duration,
) -> Result<T> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| send_error(&e, timeout))?;
    read_json(response).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_builds() {
        assert!(build_client(DEFAULT_TIMEOUT).is_ok());
    }

    #[test]
    fn unauthorized_maps_to_auth_invalid() {
        let err = check_status(StatusCode::UNAUTHORIZED, "").unwrap_err();
        assert!(matches!(err, RainforestError::AuthInvalid { status: 401 }));
    }

    #[test]
    fn api_error_uses_error_field() {
        let err = check_status(StatusCode::UNPROCESSABLE_ENTITY, r#"{"error":"bad tags"}"#)
            .unwrap_err();
        match err {
            RainforestError::Api { status, message } => {
                assert_eq!(status, 422);
                assert_eq!(message, "bad tags");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn api_error_truncates_raw_body() {
        let body = "x".repeat(1000);
        let err = check_status(StatusCode::INTERNAL_SERVER_ERROR, &body).unwrap_err();
        let RainforestError::Api { message, .. } = err else {
            panic!("expected api error");
        };
        assert_eq!(message.len(), MAX_ERROR_BODY);
    }

    #[test]
    fn empty_body_decodes_as_unit() {
        let decoded: () = decode_body("  ").unwrap();
        assert_eq!(decoded, ());
        let missing: Option<u32> = decode_body("").unwrap();
        assert_eq!(missing, None);
    }

    #[test]
    fn malformed_body_is_parse_error() {
        let err = decode_body::<Vec<u32>>("{").unwrap_err();
        assert!(matches!(err, RainforestError::ParseResponse(_)));
    }
}
