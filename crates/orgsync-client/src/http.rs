//! Shared HTTP response helpers.
//!
//! Centralizes status-code classification (401 -> [`ClientError::Unauthorized`],
//! other non-success -> [`ClientError::Api`]) so the endpoint methods stay
//! focused on request construction and response mapping.

use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use crate::error::ClientError;

/// Check an HTTP response for error statuses. Returns it unchanged on 2xx.
pub async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = resp.status();
    if status == StatusCode::UNAUTHORIZED {
        return Err(ClientError::Unauthorized);
    }
    if !status.is_success() {
        return Err(ClientError::Api {
            status: status.as_u16(),
            message: resp.text().await.unwrap_or_default(),
        });
    }
    Ok(resp)
}

/// Like [`check_response`], but only 201 Created counts as success.
pub async fn expect_created(resp: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let resp = check_response(resp).await?;
    if resp.status() != StatusCode::CREATED {
        return Err(ClientError::UnexpectedStatus {
            expected: StatusCode::CREATED.as_u16(),
            status: resp.status().as_u16(),
        });
    }
    Ok(resp)
}

/// Decode a JSON body, reporting malformed bodies as [`ClientError::Parse`].
pub async fn read_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ClientError> {
    let bytes = resp.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| ClientError::Parse(e.to_string()))
}
