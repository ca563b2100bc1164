//! Response decoding and user-facing error messages

use reqwest::{Response, header};
use serde_json::Value as JsonValue;
use tracing::warn;

use super::CrmClient;
use super::error::RequestError;
use crate::types::ApiResponse;

/// Fixed message for a status when the body offers nothing better
pub fn status_message(status: u16) -> String {
    match status {
        400 => "Bad request".to_string(),
        401 => "Unauthorized".to_string(),
        403 => "Forbidden".to_string(),
        404 => "Not found".to_string(),
        500 => "Server error".to_string(),
        other => format!("Error ({other})"),
    }
}

/// Pick the most specific message from a JSON error body
///
/// Looks at `error`, then `detail`, then `non_field_errors`, and falls back
/// to [`status_message`]. A list of messages is joined with `", "`.
pub fn error_message(status: u16, body: &JsonValue) -> String {
    ["error", "detail", "non_field_errors"]
        .iter()
        .find_map(|field| body.get(*field).and_then(message_text))
        .unwrap_or_else(|| status_message(status))
}

/// Text for a field that is present and non-empty
fn message_text(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::Null | JsonValue::Bool(false) => None,
        JsonValue::String(text) if text.is_empty() => None,
        JsonValue::String(text) => Some(text.clone()),
        JsonValue::Array(items) if items.is_empty() => None,
        JsonValue::Array(items) => Some(
            items
                .iter()
                .map(|item| match item {
                    JsonValue::String(text) => text.clone(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join(", "),
        ),
        other => Some(other.to_string()),
    }
}

fn is_json(response: &Response) -> bool {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|content_type| content_type.contains("application/json"))
}

impl CrmClient {
    /// Turn a received response into a value or a notified failure
    pub(crate) async fn decode(&self, response: Response) -> Result<ApiResponse, RequestError> {
        let status = response.status();

        if is_json(&response) {
            let bytes = response
                .bytes()
                .await
                .map_err(|err| self.network_failure(err))?;

            let body: JsonValue = match serde_json::from_slice(&bytes) {
                Ok(body) => body,
                Err(err) => {
                    warn!(
                        status = status.as_u16(),
                        error = %err,
                        "Response declared JSON but did not parse"
                    );
                    self.notify_error(&status_message(status.as_u16()));
                    return Err(RequestError::Undecodable {
                        status: status.as_u16(),
                    });
                }
            };

            if !status.is_success() {
                let message = error_message(status.as_u16(), &body);
                self.notify_error(&message);
                return Err(RequestError::Server {
                    status: status.as_u16(),
                    message,
                });
            }

            return Ok(ApiResponse::Json(body));
        }

        if !status.is_success() {
            self.notify_error(&status_message(status.as_u16()));
            return Err(RequestError::Undecodable {
                status: status.as_u16(),
            });
        }

        let text = response
            .text()
            .await
            .map_err(|err| self.network_failure(err))?;
        Ok(ApiResponse::Text(text))
    }
}
