use reqwest::Response;
use serde_json::Value;

use crate::error::ApiError;

/// Turns a non-2xx response into an `HttpStatus` error. The message is
/// pulled from a JSON `{"message": ...}` error body when one parses;
/// otherwise the status line is used and the parse failure is only logged.
pub async fn extract_status_error(res: Response) -> ApiError {
    let status = res.status();
    let status_line = match status.canonical_reason() {
        Some(reason) => format!("{} {}", status.as_u16(), reason),
        None => status.as_u16().to_string(),
    };
    let message = match res.text().await {
        Ok(body) => match serde_json::from_str::<Value>(&body) {
            Ok(json) => json
                .get("message")
                .and_then(Value::as_str)
                .map(String::from)
                .unwrap_or_else(|| status_line.clone()),
            Err(e) => {
                log::debug!("error body is not JSON ({}), falling back to status line", e);
                status_line.clone()
            }
        },
        Err(_) => status_line.clone(),
    };
    ApiError::HttpStatus {
        status: status.as_u16(),
        message,
    }
}

/// Parses a successful response body, which must be valid JSON.
pub fn parse_body(text: &str) -> Result<Value, ApiError> {
    Ok(serde_json::from_str(text)?)
}
