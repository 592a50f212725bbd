//! Parameter schema parsing and example table construction.
//!
//! A data-driven test case carries two XML payloads: a parameter definition
//! document (`<param name="...">` elements) and a local data source whose
//! elements are tagged with the parameter names. This crate turns them into
//! the row-oriented example table a scenario outline needs: parse the ordered
//! parameter names, collect per-parameter column vectors, transpose columns
//! into rows, render rows as a pipe-delimited table.
//!
//! Absence of data is a valid state (empty schema, empty columns); XML that
//! fails to parse is not, and surfaces as a typed error.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::collections::HashMap;
use thiserror::Error;

/// The parameter definition document was present but not well-formed XML.
#[derive(Debug, Error)]
#[error("malformed parameter schema: {0}")]
pub struct MalformedSchemaError(#[from] quick_xml::Error);

/// The local data source document was present but not well-formed XML.
#[derive(Debug, Error)]
#[error("malformed example data: {0}")]
pub struct MalformedExampleDataError(#[from] quick_xml::Error);

/// Column vectors keyed by parameter name.
///
/// Columns are intended to be rectangular but nothing enforces it; ragged
/// input transposes into rows with absent entries.
pub type ExampleColumns = HashMap<String, Vec<String>>;

/// One example row: parameter name to value, entries absent where the source
/// column was too short.
pub type ExampleRow = HashMap<String, String>;

/// Parse the ordered parameter names out of a schema document.
///
/// Every `param` element at any depth contributes its `name` attribute, in
/// document order. Duplicates are preserved as-is. Empty or absent input
/// means the test case simply has no parameters.
pub fn parse_parameter_names(
    raw_xml: Option<&str>,
) -> Result<Vec<String>, MalformedSchemaError> {
    let Some(raw) = raw_xml else {
        return Ok(Vec::new());
    };
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut reader = Reader::from_str(raw);
    let mut names = Vec::new();
    loop {
        match reader.read_event()? {
            Event::Start(ref e) | Event::Empty(ref e)
                if e.local_name().as_ref() == b"param" =>
            {
                if let Some(name) = name_attr(e) {
                    names.push(name);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(names)
}

fn name_attr(e: &BytesStart) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.local_name().as_ref() == b"name")
        .map(|attr| String::from_utf8_lossy(&attr.value).into_owned())
}

/// Collect per-parameter columns from a local data source document.
///
/// For each parameter, every element whose tag equals the parameter name
/// contributes its text content (text up to its first child element), in
/// document order. Parameters with no matching elements get empty columns.
pub fn build_columns(
    raw_xml: &str,
    params: &[String],
) -> Result<ExampleColumns, MalformedExampleDataError> {
    let mut columns: ExampleColumns =
        params.iter().map(|p| (p.clone(), Vec::new())).collect();

    let mut reader = Reader::from_str(raw_xml);
    let mut stack: Vec<Frame> = Vec::new();
    loop {
        match reader.read_event()? {
            Event::Start(ref e) => {
                if let Some(top) = stack.last_mut() {
                    top.has_child = true;
                }
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                let slot = columns.get_mut(&name).map(|col| {
                    col.push(String::new());
                    (name, col.len() - 1)
                });
                stack.push(Frame {
                    slot,
                    has_child: false,
                });
            }
            Event::Empty(ref e) => {
                if let Some(top) = stack.last_mut() {
                    top.has_child = true;
                }
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                if let Some(col) = columns.get_mut(&name) {
                    col.push(String::new());
                }
            }
            Event::Text(ref t) => {
                let text = t.unescape().map_err(quick_xml::Error::from)?;
                append_text(&mut columns, &stack, &text);
            }
            Event::CData(t) => {
                let bytes = t.into_inner();
                append_text(&mut columns, &stack, &String::from_utf8_lossy(&bytes));
            }
            Event::End(_) => {
                stack.pop();
            }
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(columns)
}

/// Stack frame per open element. `slot` points at the column cell the element
/// fills; text stops counting once a child element is seen, so only the text
/// ahead of the first child lands in the cell.
struct Frame {
    slot: Option<(String, usize)>,
    has_child: bool,
}

fn append_text(columns: &mut ExampleColumns, stack: &[Frame], text: &str) {
    let Some(top) = stack.last() else { return };
    if top.has_child {
        return;
    }
    if let Some((name, idx)) = &top.slot {
        if let Some(cell) = columns.get_mut(name).and_then(|col| col.get_mut(*idx)) {
            cell.push_str(text);
        }
    }
}

/// Transpose columns into rows, one row per example.
///
/// The row count is the longest column; shorter columns leave their entry
/// absent in later rows rather than zero-filled.
pub fn transpose(columns: &ExampleColumns) -> Vec<ExampleRow> {
    let row_count = columns.values().map(Vec::len).max().unwrap_or(0);
    (0..row_count)
        .map(|i| {
            columns
                .iter()
                .filter_map(|(name, values)| {
                    values.get(i).map(|v| (name.clone(), v.clone()))
                })
                .collect()
        })
        .collect()
}

/// Render header and rows as a pipe-delimited table, parameters in schema
/// order. An absent entry renders as a visibly shorter cell, preserving the
/// gap rather than faking an empty value.
pub fn render_table(rows: &[ExampleRow], params: &[String]) -> String {
    let mut out = String::from("   |");
    for p in params {
        out.push_str(&format!(" {p} |"));
    }
    out.push('\n');
    for row in rows {
        out.push_str("   |");
        for p in params {
            match row.get(p) {
                Some(v) => out.push_str(&format!(" {v} |")),
                None => out.push_str(" |"),
            }
        }
        out.push('\n');
    }
    out
}
