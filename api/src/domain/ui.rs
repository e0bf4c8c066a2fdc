/// Ephemeral view-state for the result panes. Filled in stage by stage
/// during a cycle so a failure still leaves earlier results on screen.
/// Never persisted.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ComparisonPanes {
    pub response1: Option<String>,
    pub response2: Option<String>,
    pub differences: Option<String>,
    pub suggestions: Option<String>,
}
