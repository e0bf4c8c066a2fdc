use reqwest::Method;
use serde_json::Value;
use url::Url;

use crate::domain::request::{ApiRequest, HttpMethod};
use crate::error::ApiError;

pub fn convert_http_method(input: HttpMethod) -> Method {
    match input {
        HttpMethod::GET => Method::GET,
        HttpMethod::POST => Method::POST,
    }
}

/// Builds the outbound URL. GET requests with a non-empty `data` object
/// get each key/value appended as a query parameter; everything else
/// leaves the URL untouched.
pub fn build_url(request: &ApiRequest) -> Result<Url, ApiError> {
    if request.url.is_empty() {
        return Err(ApiError::Validation(String::from("URL is required")));
    }
    let mut url = Url::parse(&request.url)
        .map_err(|e| ApiError::Validation(format!("invalid URL {}: {}", request.url, e)))?;
    if request.method == HttpMethod::GET {
        if let Value::Object(params) = &request.data {
            if !params.is_empty() {
                let mut pairs = url.query_pairs_mut();
                for (key, value) in params {
                    pairs.append_pair(key, &coerce_query_value(value));
                }
            }
        }
    }
    Ok(url)
}

// JSON strings go in unquoted, everything else via its JSON rendering.
fn coerce_query_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
