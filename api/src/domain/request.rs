use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Clone, Copy, Serialize, Debug, Deserialize, PartialEq, Eq, Default)]
pub enum HttpMethod {
    #[default]
    GET,
    POST,
}
impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug)]
pub struct HttpMethodParseError;
impl FromStr for HttpMethod {
    type Err = HttpMethodParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GET" => Ok(HttpMethod::GET),
            "POST" => Ok(HttpMethod::POST),
            _ => Err(HttpMethodParseError),
        }
    }
}

/// One side of a comparison. `data` rides as the JSON body on POST and is
/// flattened into query parameters on GET.
#[derive(Clone, Serialize, Debug, Deserialize, PartialEq)]
pub struct ApiRequest {
    pub url: String,
    pub method: HttpMethod,
    #[serde(default)]
    pub data: Value,
}

impl Default for ApiRequest {
    fn default() -> Self {
        Self {
            url: String::new(),
            method: HttpMethod::GET,
            data: Value::Null,
        }
    }
}
