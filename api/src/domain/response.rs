use serde_json::Value;

/// Everything a completed comparison cycle produces for display. The
/// `*_text` fields are the pretty-printed forms shown in the response
/// panes and fed to the fix suggester.
#[derive(Clone, Debug, PartialEq)]
pub struct ComparisonReport {
    pub response1: Value,
    pub response2: Value,
    pub response1_text: String,
    pub response2_text: String,
    pub differences: String,
    pub suggestions: String,
}
