//! Canonical data types for the featsync pipeline.
//!
//! Defines the test case record as retrieved from the test-management service,
//! suite references, and the automation-status field. All other crates depend
//! on these types.

pub mod suite;
pub mod testcase;

pub use suite::{SuiteRef, TestCaseRef};
pub use testcase::{AutomationStatus, MissingFieldError, TestCaseRecord};
