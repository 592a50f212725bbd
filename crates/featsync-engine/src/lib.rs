//! Orchestration engine for the featsync pipeline.
//!
//! Wires the retrieval collaborator to the transformation stages and the
//! document store, one suite at a time, one test case at a time. Progress is
//! printed synchronously as the run advances.
//!
//! Error policy:
//! - a test case that fails retrieval is reported and skipped; the suite
//!   document is built from whichever test cases succeeded;
//! - malformed parameter or example XML aborts the suite: partial parameter
//!   data would corrupt the transposition, so it must not be papered over;
//! - a suite with no renderable scenarios produces no document at all.

use anyhow::{Context, Result};
use featsync_params::{ExampleColumns, build_columns, parse_parameter_names};
use featsync_ports::{FeatureStore, WorkItemSource};
use featsync_render_gherkin::{build_feature, compose_scenario};
use featsync_richtext::extract;
use featsync_schema::{SuiteRef, TestCaseRecord};

pub struct Engine<'a> {
    pub source: &'a dyn WorkItemSource,
    pub store: &'a dyn FeatureStore,
}

/// What happened to one suite.
pub enum SuiteOutcome {
    Written {
        document: String,
        scenarios: usize,
        /// Test cases dropped on retrieval failure.
        skipped: usize,
        /// Whether a previous document was replaced.
        overwrote: bool,
    },
    /// Nothing to write: no test cases, or none survived retrieval.
    Empty { skipped: usize },
}

/// Run-level totals, reported at the end of a sync.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SyncSummary {
    pub suites: usize,
    pub documents_written: usize,
    pub suites_empty: usize,
    pub test_cases_skipped: usize,
}

impl<'a> Engine<'a> {
    pub fn new(source: &'a dyn WorkItemSource, store: &'a dyn FeatureStore) -> Self {
        Self { source, store }
    }

    /// Sync every suite of a plan, sequentially.
    pub fn sync_plan(&self, plan_id: u64) -> Result<SyncSummary> {
        let suites = self
            .source
            .fetch_suites(plan_id)
            .with_context(|| format!("fetch suites of plan {plan_id}"))?;

        let mut summary = SyncSummary {
            suites: suites.len(),
            ..SyncSummary::default()
        };

        for suite in &suites {
            println!("syncing test suite {} - {}", suite.id, suite.name);
            match self.sync_suite(suite)? {
                SuiteOutcome::Written {
                    document,
                    scenarios,
                    skipped,
                    overwrote,
                } => {
                    summary.documents_written += 1;
                    summary.test_cases_skipped += skipped;
                    let verb = if overwrote { "updated" } else { "created" };
                    println!("feature file '{document}' {verb} ({scenarios} scenarios)");
                }
                SuiteOutcome::Empty { skipped } => {
                    summary.suites_empty += 1;
                    summary.test_cases_skipped += skipped;
                    if skipped > 0 {
                        println!("no test case retrieved; nothing written");
                    } else {
                        println!("no test cases found");
                    }
                }
            }
        }
        Ok(summary)
    }

    /// Sync one suite into its document.
    pub fn sync_suite(&self, suite: &SuiteRef) -> Result<SuiteOutcome> {
        let mut scenarios = Vec::new();
        let mut skipped = 0usize;

        for case in &suite.test_cases {
            println!("syncing {} - {}", case.id, case.name);
            let record = match self.source.fetch_test_case(case.id) {
                Ok(record) => record,
                Err(err) => {
                    eprintln!("error retrieving test case {}: {err}", case.id);
                    skipped += 1;
                    continue;
                }
            };
            let block = render_test_case(&record)
                .with_context(|| format!("transform test case {}", record.id))?;
            scenarios.push(block);
        }

        if scenarios.is_empty() {
            return Ok(SuiteOutcome::Empty { skipped });
        }

        let document = suite.document_name();
        let overwrote = self.store.read_if_exists(&document)?.is_some();
        let content = build_feature(suite.id, &suite.name, &scenarios);
        self.store.write_full(&document, &content)?;

        Ok(SuiteOutcome::Written {
            document,
            scenarios: scenarios.len(),
            skipped,
            overwrote,
        })
    }
}

/// Transform one record into its scenario block. Pure: no I/O.
pub fn render_test_case(record: &TestCaseRecord) -> Result<String> {
    let steps = extract(&record.raw_steps);
    let params = parse_parameter_names(record.raw_parameters.as_deref())?;
    let columns = match record.raw_example_data.as_deref() {
        Some(xml) if !params.is_empty() && !xml.trim().is_empty() => {
            build_columns(xml, &params)?
        }
        _ => ExampleColumns::new(),
    };
    Ok(compose_scenario(record, &steps, &columns, &params))
}

#[cfg(test)]
mod tests {
    use super::*;
    use featsync_ports::RetrievalError;
    use featsync_schema::{AutomationStatus, TestCaseRef};
    use featsync_store::InMemoryStore;
    use std::collections::{HashMap, HashSet};

    struct FakeSource {
        suites: Vec<SuiteRef>,
        records: HashMap<u64, TestCaseRecord>,
        failing: HashSet<u64>,
    }

    impl FakeSource {
        fn new(suites: Vec<SuiteRef>, records: Vec<TestCaseRecord>) -> Self {
            Self {
                suites,
                records: records.into_iter().map(|r| (r.id, r)).collect(),
                failing: HashSet::new(),
            }
        }
    }

    impl WorkItemSource for FakeSource {
        fn fetch_suites(&self, _plan_id: u64) -> Result<Vec<SuiteRef>, RetrievalError> {
            Ok(self.suites.clone())
        }

        fn fetch_test_case(&self, id: u64) -> Result<TestCaseRecord, RetrievalError> {
            if self.failing.contains(&id) {
                return Err(RetrievalError::Http {
                    status: 404,
                    body: "not found".into(),
                });
            }
            self.records
                .get(&id)
                .cloned()
                .ok_or(RetrievalError::Http {
                    status: 404,
                    body: "unknown id".into(),
                })
        }
    }

    fn suite(id: u64, name: &str, case_ids: &[u64]) -> SuiteRef {
        SuiteRef {
            id,
            name: name.into(),
            test_cases: case_ids
                .iter()
                .map(|&id| TestCaseRef {
                    id,
                    name: format!("case {id}"),
                })
                .collect(),
        }
    }

    fn plain_record(id: u64, title: &str, steps: &str) -> TestCaseRecord {
        TestCaseRecord {
            id,
            title: title.into(),
            automation_status: AutomationStatus::NotAutomated,
            raw_steps: steps.into(),
            raw_parameters: None,
            raw_example_data: None,
            related_work_items: vec![],
        }
    }

    #[test]
    fn data_driven_case_renders_outline_document_end_to_end() {
        let mut record = plain_record(5, "Login", "Enter @user and @pass");
        record.raw_parameters =
            Some(r#"<parameters><param name="user"/><param name="pass"/></parameters>"#.into());
        record.raw_example_data = Some(
            "<NewDataSet>\
             <Table1><user>a</user><pass>p</pass></Table1>\
             <Table1><user>b</user><pass>q</pass></Table1>\
             </NewDataSet>"
                .into(),
        );

        let source = FakeSource::new(vec![suite(1, "Auth", &[5])], vec![record]);
        let store = InMemoryStore::new();
        let summary = Engine::new(&source, &store).sync_plan(99).unwrap();

        assert_eq!(summary.documents_written, 1);
        assert_eq!(
            store.document("1.feature").as_deref(),
            Some(
                "#language:pt\n\
                 @suiteId:1\n\
                 Funcionalidade: Auth\n\
                 \n\
                 @tc:5\n\
                 Esquema do Cenário: Login\n\
                 Enter <user> and <pass>\n\
                 \n\
                 Exemplos:\n   \
                 | user | pass |\n   \
                 | a | p |\n   \
                 | b | q |\n\n"
            )
        );
    }

    #[test]
    fn retrieval_failure_skips_the_case_but_keeps_the_suite() {
        let mut source = FakeSource::new(
            vec![suite(2, "Checkout", &[11, 12])],
            vec![
                plain_record(11, "Broken", "s"),
                plain_record(12, "Works", "do the thing"),
            ],
        );
        source.failing.insert(11);

        let store = InMemoryStore::new();
        let summary = Engine::new(&source, &store).sync_plan(1).unwrap();

        assert_eq!(summary.documents_written, 1);
        assert_eq!(summary.test_cases_skipped, 1);
        let doc = store.document("2.feature").unwrap();
        assert!(doc.contains("@tc:12"));
        assert!(!doc.contains("@tc:11"));
    }

    #[test]
    fn suite_without_test_cases_writes_nothing() {
        let source = FakeSource::new(vec![suite(3, "Empty", &[])], vec![]);
        let store = InMemoryStore::new();
        let summary = Engine::new(&source, &store).sync_plan(1).unwrap();

        assert_eq!(summary.suites_empty, 1);
        assert!(store.is_empty());
    }

    #[test]
    fn suite_where_every_case_fails_writes_nothing() {
        let mut source = FakeSource::new(
            vec![suite(4, "Doomed", &[21])],
            vec![plain_record(21, "T", "s")],
        );
        source.failing.insert(21);

        let store = InMemoryStore::new();
        let summary = Engine::new(&source, &store).sync_plan(1).unwrap();

        assert_eq!(summary.documents_written, 0);
        assert_eq!(summary.test_cases_skipped, 1);
        assert!(store.is_empty());
    }

    #[test]
    fn malformed_parameter_schema_aborts_the_suite() {
        let mut record = plain_record(7, "T", "s");
        record.raw_parameters = Some("<parameters><param name=\"a\"></parameters>".into());

        let source = FakeSource::new(vec![suite(5, "Bad", &[7])], vec![record]);
        let store = InMemoryStore::new();
        let err = Engine::new(&source, &store).sync_plan(1).unwrap_err();

        assert!(err.to_string().contains("test case 7"));
        assert!(store.is_empty());
    }

    #[test]
    fn schema_with_blank_example_data_renders_plain_scenario() {
        let mut record = plain_record(8, "T", "use @name here");
        record.raw_parameters =
            Some(r#"<parameters><param name="name"/></parameters>"#.into());
        record.raw_example_data = Some("   ".into());

        let block = render_test_case(&record).unwrap();
        assert!(block.contains("Cenário: T"));
        assert!(block.contains("use <name> here"));
        assert!(!block.contains("Exemplos"));
    }

    #[test]
    fn second_sync_reports_overwrite() {
        let record = plain_record(30, "T", "s");
        let source = FakeSource::new(vec![suite(6, "S", &[30])], vec![record]);
        let store = InMemoryStore::new();
        let engine = Engine::new(&source, &store);

        let first = engine.sync_suite(&source.suites[0]).unwrap();
        assert!(matches!(first, SuiteOutcome::Written { overwrote: false, .. }));

        let second = engine.sync_suite(&source.suites[0]).unwrap();
        assert!(matches!(second, SuiteOutcome::Written { overwrote: true, .. }));
    }
}
