//! Gherkin renderer for featsync.
//!
//! Composes one scenario block per test case (tags, title, steps, and the
//! example table when the case is data-driven) and assembles the blocks into
//! one feature document per suite.
//!
//! The output is intentionally low-magic: fixed keyword constants, tag lines,
//! pipe tables. Renderers are pure: input in, text out.

use featsync_params::{ExampleColumns, render_table, transpose};
use featsync_schema::TestCaseRecord;

/// Fixed target-language keyword set the source project standardized on.
pub mod keywords {
    pub const LANGUAGE: &str = "pt";
    pub const FEATURE: &str = "Funcionalidade";
    pub const SCENARIO: &str = "Cenário";
    pub const SCENARIO_OUTLINE: &str = "Esquema do Cenário";
    pub const EXAMPLES: &str = "Exemplos";
}

/// Compose one test case into a scenario block.
///
/// Tag lines come first: the test case id, one `@wi:` tag per linked work
/// item in relation order, and `@automated` only when the status is exactly
/// automated (any other status is silently untagged). A case renders as a
/// scenario outline iff its example data transposes into at least one row;
/// a schema with no usable examples falls back to a plain scenario.
pub fn compose_scenario(
    record: &TestCaseRecord,
    steps: &str,
    columns: &ExampleColumns,
    params: &[String],
) -> String {
    let mut out = String::new();

    out.push_str(&format!("@tc:{}\n", record.id));
    for wi in &record.related_work_items {
        out.push_str(&format!("@wi:{wi}\n"));
    }
    if record.automation_status.is_automated() {
        out.push_str("@automated\n");
    }

    let rows = transpose(columns);
    if rows.is_empty() {
        out.push_str(&format!("{}: {}\n", keywords::SCENARIO, record.title));
        out.push_str(steps);
        out.push('\n');
    } else {
        out.push_str(&format!(
            "{}: {}\n",
            keywords::SCENARIO_OUTLINE,
            record.title
        ));
        out.push_str(steps);
        out.push('\n');
        out.push('\n');
        out.push_str(&format!("{}:\n", keywords::EXAMPLES));
        out.push_str(&render_table(&rows, params));
    }

    out
}

/// Assemble a suite document: language marker, suite tag, feature title, and
/// every scenario block separated by a blank line.
///
/// Whether an empty document gets persisted is the caller's call; this stays
/// a pure text assembler.
pub fn build_feature(suite_id: u64, suite_name: &str, scenarios: &[String]) -> String {
    let mut out = String::new();
    out.push_str(&format!("#language:{}\n", keywords::LANGUAGE));
    out.push_str(&format!("@suiteId:{suite_id}\n"));
    out.push_str(&format!("{}: {suite_name}\n", keywords::FEATURE));
    out.push('\n');
    for scenario in scenarios {
        out.push_str(scenario);
        out.push('\n');
    }
    out
}
