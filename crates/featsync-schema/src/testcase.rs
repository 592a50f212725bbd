use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A required field was absent from a work item.
///
/// Surfacing this explicitly beats rendering a silently blank scenario.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("work item is missing required field `{0}`")]
pub struct MissingFieldError(pub &'static str);

/// Automation status of a test case.
///
/// The source system stores this as a free string; only the exact value
/// `Automated` carries meaning downstream (it emits the `@automated` tag).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AutomationStatus {
    Automated,
    NotAutomated,
    /// Any other value the service reports (e.g. "Planned").
    Other(String),
}

impl AutomationStatus {
    /// Map the raw field value. An absent field means not automated.
    pub fn from_field(raw: Option<&str>) -> Self {
        match raw {
            Some("Automated") => AutomationStatus::Automated,
            Some("Not Automated") | None => AutomationStatus::NotAutomated,
            Some(other) => AutomationStatus::Other(other.to_string()),
        }
    }

    pub fn is_automated(&self) -> bool {
        matches!(self, AutomationStatus::Automated)
    }
}

/// One test case as retrieved from the test-management service.
///
/// This is the data spine of the pipeline: created once by the retrieval
/// collaborator, consumed by the transformation stages, never mutated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCaseRecord {
    pub id: u64,
    pub title: String,
    pub automation_status: AutomationStatus,
    /// Steps-and-expected-results blob, double-encoded markup.
    pub raw_steps: String,
    /// Parameter definition XML, when the case is data-driven.
    pub raw_parameters: Option<String>,
    /// Local data source XML (the example values), when present.
    pub raw_example_data: Option<String>,
    /// Linked work item ids, in source relation order.
    pub related_work_items: Vec<u64>,
}
