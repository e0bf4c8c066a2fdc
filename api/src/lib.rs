pub mod ai;
pub mod db;
pub mod domain;
pub mod error;
pub mod history;
pub mod utilities;

use reqwest::header::CONTENT_TYPE;
use serde_json::Value;

use crate::ai::{DiffAssistant, NO_DIFFERENCES_FALLBACK, NO_SUGGESTIONS_FALLBACK};
use crate::domain::request::{ApiRequest, HttpMethod};
use crate::domain::response::ComparisonReport;
use crate::domain::ui::ComparisonPanes;
use crate::error::ApiError;
use crate::history::HistoryStore;

/// Where a comparison cycle currently is. `Failed` keeps whatever panes
/// were already filled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CycleState {
    Idle,
    Fetching,
    Summarizing,
    Suggesting,
    Done,
    Failed,
}

impl CycleState {
    fn is_in_flight(self) -> bool {
        matches!(
            self,
            CycleState::Fetching | CycleState::Summarizing | CycleState::Suggesting
        )
    }
}

/// Issues one configurable request and returns its parsed JSON body.
///
/// Fails before any network activity when the URL is missing or
/// malformed; transport errors carry the target URL, non-2xx statuses
/// carry a best-effort message from the error body, and a non-JSON
/// success body is a parse error.
pub async fn call_api(client: &reqwest::Client, request: &ApiRequest) -> Result<Value, ApiError> {
    let url = utilities::request::build_url(request)?;
    log::info!("submitting {} request to {}", request.method, url);
    let method = utilities::request::convert_http_method(request.method);
    let mut req = client
        .request(method, url.clone())
        .header(CONTENT_TYPE, "application/json");
    if request.method == HttpMethod::POST {
        req = match &request.data {
            // an already-serialized payload is sent verbatim
            Value::String(raw) => req.body(raw.clone()),
            body => req.json(body),
        };
    }
    let res = req.send().await.map_err(|source| ApiError::Network {
        url: url.to_string(),
        source,
    })?;
    if !res.status().is_success() {
        return Err(utilities::response::extract_status_error(res).await);
    }
    let text = res.text().await.map_err(|source| ApiError::Network {
        url: url.to_string(),
        source,
    })?;
    utilities::response::parse_body(&text)
}

pub struct DiffApi {
    pub client: reqwest::Client,
    pub assistant: Box<dyn DiffAssistant>,
    pub history: HistoryStore,
    pub state: CycleState,
    pub panes: ComparisonPanes,
}

impl DiffApi {
    pub async fn new(db_url: &str, assistant: Box<dyn DiffAssistant>) -> anyhow::Result<Self> {
        Ok(DiffApi {
            client: reqwest::Client::new(),
            assistant,
            history: HistoryStore::open(db_url).await?,
            state: CycleState::Idle,
            panes: ComparisonPanes::default(),
        })
    }

    /// Runs one full comparison cycle: fetch both requests sequentially,
    /// summarize the differences, ask for fix suggestions, then append
    /// both requests to the history. A failure at any stage aborts the
    /// remaining stages and leaves the history untouched; panes filled
    /// before the failure stay filled.
    pub async fn run_comparison(
        &mut self,
        request1: ApiRequest,
        request2: ApiRequest,
    ) -> anyhow::Result<ComparisonReport> {
        if self.state.is_in_flight() {
            anyhow::bail!("a comparison cycle is already in flight");
        }
        self.state = CycleState::Fetching;
        let result = self.drive(request1, request2).await;
        match &result {
            Ok(_) => self.state = CycleState::Done,
            Err(e) => {
                log::error!("comparison cycle failed: {:#}", e);
                self.state = CycleState::Failed;
            }
        }
        result
    }

    async fn drive(
        &mut self,
        request1: ApiRequest,
        request2: ApiRequest,
    ) -> anyhow::Result<ComparisonReport> {
        // Sequential on purpose: a first-request failure must prevent the
        // second call and everything downstream.
        let response1 = call_api(&self.client, &request1).await?;
        let response1_text = serde_json::to_string_pretty(&response1)?;
        self.panes.response1 = Some(response1_text.clone());

        let response2 = call_api(&self.client, &request2).await?;
        let response2_text = serde_json::to_string_pretty(&response2)?;
        self.panes.response2 = Some(response2_text.clone());

        self.state = CycleState::Summarizing;
        let summary = self.assistant.summarize(&response1, &response2).await?;
        let differences = if summary.summary.trim().is_empty() {
            NO_DIFFERENCES_FALLBACK.to_string()
        } else {
            summary.summary
        };
        self.panes.differences = Some(differences.clone());

        self.state = CycleState::Suggesting;
        let fixes = self
            .assistant
            .suggest(&response1_text, &response2_text, &differences)
            .await?;
        let suggestions = if fixes.suggestions.trim().is_empty() {
            NO_SUGGESTIONS_FALLBACK.to_string()
        } else {
            fixes.suggestions
        };
        self.panes.suggestions = Some(suggestions.clone());

        self.history.append_comparison(request1, request2).await?;

        Ok(ComparisonReport {
            response1,
            response2,
            response1_text,
            response2_text,
            differences,
            suggestions,
        })
    }
}
