use crate::runner::state::{ScenarioReport, TestSummary};
use serde::{Deserialize, Serialize};

/// Test results document for report generation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestResults {
    pub session_id: String,
    pub scenarios: Vec<ScenarioReport>,
    pub summary: TestSummary,
    pub generated_at: String,
}
