use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::ApiError;

/// Shown when the summarizer yields nothing usable.
pub const NO_DIFFERENCES_FALLBACK: &str = "No significant differences found.";
/// Shown when the suggester yields nothing usable.
pub const NO_SUGGESTIONS_FALLBACK: &str = "No suggestions available.";

#[derive(Clone, Serialize, Debug, Deserialize, PartialEq)]
pub struct DifferenceSummary {
    pub summary: String,
}

#[derive(Clone, Serialize, Debug, Deserialize, PartialEq)]
pub struct FixSuggestions {
    pub suggestions: String,
}

/// Narrow seam over the hosted language model. Both operations are a
/// single attempt per cycle; any backend works as long as it speaks these
/// two shapes.
#[async_trait]
pub trait DiffAssistant: Send + Sync {
    async fn summarize(
        &self,
        response1: &Value,
        response2: &Value,
    ) -> Result<DifferenceSummary, ApiError>;

    async fn suggest(
        &self,
        json1: &str,
        json2: &str,
        differences: &str,
    ) -> Result<FixSuggestions, ApiError>;
}

/// Default assistant: posts JSON to a text-generation service.
pub struct HttpAssistant {
    client: reqwest::Client,
    base_url: String,
}

impl HttpAssistant {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    async fn post<T: DeserializeOwned>(&self, path: &str, body: &Value) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        log::debug!("calling assistant at {}", url);
        let res = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::AiService(format!("failed to reach assistant at {}: {}", url, e)))?;
        if !res.status().is_success() {
            return Err(ApiError::AiService(format!(
                "assistant returned status {}",
                res.status()
            )));
        }
        res.json::<T>()
            .await
            .map_err(|e| ApiError::AiService(format!("could not parse assistant reply: {}", e)))
    }
}

#[async_trait]
impl DiffAssistant for HttpAssistant {
    async fn summarize(
        &self,
        response1: &Value,
        response2: &Value,
    ) -> Result<DifferenceSummary, ApiError> {
        self.post(
            "/summarize-differences",
            &json!({ "response1": response1, "response2": response2 }),
        )
        .await
    }

    async fn suggest(
        &self,
        json1: &str,
        json2: &str,
        differences: &str,
    ) -> Result<FixSuggestions, ApiError> {
        self.post(
            "/suggest-fixes",
            &json!({ "json1": json1, "json2": json2, "differences": differences }),
        )
        .await
    }
}
