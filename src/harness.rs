//! Scenario grammar parser and runner (§6.3–§6.4): drives two sites through a line of operations
//! and checks that both converge to the expected document.

use crate::document::Document;
use crate::operation::Operation;
use crate::record::Record;
use crate::site::{Role, SiteState};
use anyhow::{bail, ensure, Context, Result};
use std::fmt;
use std::io::{self, Write};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScenarioSummary {
    pub count: u32,
    pub success: u32,
}

impl fmt::Display for ScenarioSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} out of {} tests passed!", self.success, self.count)
    }
}

/// Runs every non-blank, non-comment line of `contents` as a scenario, writing a per-line report
/// to `out` and a final tally line, matching the harness's own output exactly.
pub fn run_file(contents: &str, mut out: impl Write) -> io::Result<ScenarioSummary> {
    let mut count = 0;
    let mut success = 0;

    for (line_num, line) in contents.lines().enumerate() {
        let line_num = line_num + 1;
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        count += 1;
        write!(out, "Test {count}({line_num}): ")?;
        match run_scenario(line) {
            Ok(()) => {
                writeln!(out, "passed!")?;
                success += 1;
            }
            Err(err) => writeln!(out, "{err}")?,
        }
    }

    let summary = ScenarioSummary { count, success };
    writeln!(out, "{summary}")?;
    info!(%summary, "scenario file finished");
    Ok(summary)
}

/// Parses and runs a single `INIT|OPS|EXPECTED` line.
pub fn run_scenario(line: &str) -> Result<()> {
    let sections: Vec<&str> = line.split('|').collect();
    ensure!(
        sections.len() == 3,
        "expected 3 sections separated by '|', got {}",
        sections.len()
    );
    let (init, ops, expected) = (sections[0], sections[1], sections[2]);

    let mut site1 = SiteState::new(Document::new(init), 1, Role::Server);
    let mut site2 = SiteState::new(Document::new(init), 2, Role::Client);
    let mut records1: Vec<Record> = Vec::new();
    let mut records2: Vec<Record> = Vec::new();

    for entry in ops.split(',') {
        if entry.is_empty() {
            continue;
        }
        let (site_str, op_desc) = entry.split_once("->").context("expected SITE->OP")?;
        let site_num: u32 = site_str
            .trim()
            .parse()
            .context("site must be numeric")?;
        ensure!(site_num == 1 || site_num == 2, "site must be 1 or 2");

        let (site, records) = if site_num == 1 {
            (&mut site1, &mut records1)
        } else {
            (&mut site2, &mut records2)
        };
        let op = parse_operation(op_desc, site.document())
            .with_context(|| format!("parsing operation '{op_desc}'"))?;
        let record = site
            .local_op(op)
            .with_context(|| format!("site {site_num} applying local operation"))?;
        records.push(record);
    }

    for record in records2 {
        site1
            .remote_op(record)
            .context("site 1 applying remote operation")?;
    }
    for record in records1 {
        site2
            .remote_op(record)
            .context("site 2 applying remote operation")?;
    }

    let doc1 = site1.document().to_string();
    let doc2 = site2.document().to_string();
    ensure!(
        doc1 == doc2 && doc1 == expected,
        "docs were {doc1:?} and {doc2:?}, but expected {expected:?}"
    );
    Ok(())
}

/// Parses `ins(TEXT@POS)` or `del(FROM-TO)`. A delete's tombstone text is read from `doc`, the
/// site's own current document, exactly as the source harness reads it before constructing the
/// operation.
fn parse_operation(desc: &str, doc: &Document) -> Result<Operation> {
    if let Some(inner) = desc.strip_prefix("ins(").and_then(|s| s.strip_suffix(')')) {
        let (text, pos) = inner
            .rsplit_once('@')
            .context("expected ins(text@position)")?;
        let pos: usize = pos.trim().parse().context("expected numerical position")?;
        Ok(Operation::insert(pos, text))
    } else if let Some(inner) = desc.strip_prefix("del(").and_then(|s| s.strip_suffix(')')) {
        let (from, to) = inner.split_once('-').context("expected del(from-to)")?;
        let from: usize = from.trim().parse().context("expected numerical position")?;
        let to: usize = to.trim().parse().context("expected numerical position")?;
        ensure!(to >= from, "delete range end {to} precedes start {from}");
        let text = doc
            .slice(from, to - from)
            .context("reading tombstone text for delete")?;
        Ok(Operation::delete(from, text))
    } else {
        bail!("unsupported operation '{desc}'")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_insert() {
        let doc = Document::new("abc");
        let op = parse_operation("ins(X@1)", &doc).unwrap();
        assert_eq!(op, Operation::insert(1, "X"));
    }

    #[test]
    fn parses_delete_reading_tombstone_from_document() {
        let doc = Document::new("abcdef");
        let op = parse_operation("del(1-4)", &doc).unwrap();
        assert_eq!(op, Operation::delete(1, "bcd"));
    }

    #[test]
    fn rejects_unsupported_operation() {
        let doc = Document::new("abc");
        assert!(parse_operation("mov(1-2)", &doc).is_err());
    }

    #[test]
    fn scenario_1_disjoint_inserts_converge() {
        run_scenario("abc|1->ins(X@1),2->ins(Y@2)|aXbYc").unwrap();
    }

    #[test]
    fn scenario_5_same_position_inserts_keep_server_first() {
        run_scenario("abc|1->ins(X@1),2->ins(Y@1)|aXYbc").unwrap();
    }

    #[test]
    fn rejects_a_line_missing_sections() {
        assert!(run_scenario("abc|1->ins(X@1)").is_err());
    }

    #[test]
    fn rejects_a_scenario_whose_expected_document_is_wrong() {
        assert!(run_scenario("abc|1->ins(X@1)|zzz").is_err());
    }

    #[test]
    fn run_file_reports_per_line_and_a_final_tally() {
        let input = "# a comment\n\nabc|1->ins(X@1),2->ins(Y@2)|aXbYc\nabc|1->ins(X@1)|wrong\n";
        let mut out = Vec::new();
        let summary = run_file(input, &mut out).unwrap();
        assert_eq!(summary, ScenarioSummary { count: 2, success: 1 });
        let report = String::from_utf8(out).unwrap();
        assert!(report.contains("Test 1(3): passed!"));
        assert!(report.contains("Test 2(4): "));
        assert!(report.contains("1 out of 2 tests passed!"));
    }
}
