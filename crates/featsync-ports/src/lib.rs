use anyhow::Result;
use featsync_schema::{MissingFieldError, SuiteRef, TestCaseRecord};
use thiserror::Error;

/// Failure while retrieving data from the test-management service.
///
/// The engine treats any of these as fatal for the single test case being
/// fetched, never for the suite: the document is built from whichever test
/// cases succeeded.
#[derive(Debug, Error)]
pub enum RetrievalError {
    /// Non-success response from the service.
    #[error("request failed with status {status}: {body}")]
    Http { status: u16, body: String },
    /// Transport-level failure (connect, timeout, TLS).
    #[error("transport error: {0}")]
    Transport(String),
    /// The response decoded, but not into the shape we expect.
    #[error("malformed response: {0}")]
    Decode(String),
    /// The work item decoded but lacks a required field.
    #[error(transparent)]
    MissingField(#[from] MissingFieldError),
}

/// Retrieval of suites and test cases.
///
/// Adapters live in `featsync-ingest-*` crates. The contract is per-call:
/// implementations carry their own timeout and report non-success responses
/// as [`RetrievalError::Http`].
pub trait WorkItemSource {
    /// All suites of a plan, each with its test case listing.
    fn fetch_suites(&self, plan_id: u64) -> Result<Vec<SuiteRef>, RetrievalError>;

    /// One test case work item, expanded with relations.
    fn fetch_test_case(&self, id: u64) -> Result<TestCaseRecord, RetrievalError>;
}

/// Feature document persistence.
///
/// Whole-document granularity only: `write_full` always replaces, there is no
/// append or merge path.
pub trait FeatureStore {
    fn read_if_exists(&self, name: &str) -> Result<Option<String>>;
    fn write_full(&self, name: &str, content: &str) -> Result<()>;
}
