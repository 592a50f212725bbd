use serde::{Deserialize, Serialize};

/// A lightweight pointer to a test case inside a suite listing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCaseRef {
    pub id: u64,
    pub name: String,
}

/// One test suite of a plan, with the test cases it contains.
///
/// Each suite maps to exactly one output document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiteRef {
    pub id: u64,
    pub name: String,
    pub test_cases: Vec<TestCaseRef>,
}

impl SuiteRef {
    /// File name of the document this suite renders to.
    pub fn document_name(&self) -> String {
        format!("{}.feature", self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_name_uses_suite_id() {
        let suite = SuiteRef {
            id: 321,
            name: "Login".into(),
            test_cases: vec![],
        };
        assert_eq!(suite.document_name(), "321.feature");
    }
}
