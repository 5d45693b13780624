//! `--test`: self-check of extraction against a saved snapshot.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use trending_coins::{assemble, extract, load_from_file, Field, TrendingResult};

/// Outcome of one field check.
#[derive(Debug, Clone)]
pub struct FieldCheck {
    pub field: Field,
    /// Matches in the whole document.
    pub matches: usize,
    /// Values extracted, or the extraction error.
    pub extracted: Result<usize, String>,
}

/// Outcome of a full self-check.
#[derive(Debug, Clone)]
pub struct CheckReport {
    pub snapshot: PathBuf,
    pub fields: Vec<FieldCheck>,
    pub rows: Result<usize, String>,
}

impl CheckReport {
    /// Every field extracted, rows assembled, and at least one row produced.
    pub fn passed(&self) -> bool {
        self.fields.iter().all(|f| f.extracted.is_ok()) && matches!(self.rows, Ok(n) if n > 0)
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Self-check: {}", self.snapshot.display());
        for check in &self.fields {
            match &check.extracted {
                Ok(n) => {
                    let _ = writeln!(
                        out,
                        "[OK] {}: {} match(es), {n} extracted",
                        check.field, check.matches
                    );
                }
                Err(e) => {
                    let _ = writeln!(out, "[!!] {}: {e}", check.field);
                }
            }
        }
        match &self.rows {
            Ok(0) => {
                let _ = writeln!(out, "[!!] no rows assembled");
            }
            Ok(n) => {
                let _ = writeln!(out, "[OK] assembled {n} row(s)");
            }
            Err(e) => {
                let _ = writeln!(out, "[!!] {e}");
            }
        }
        let status = if self.passed() { "PASS" } else { "FAIL" };
        let _ = write!(out, "Status: {status}");
        out
    }
}

/// Load `snapshot` and check every field plus row assembly for `count` rows.
///
/// Only a missing or unreadable snapshot is an error; extraction failures
/// are recorded in the report.
pub fn run(snapshot: &Path, count: usize) -> TrendingResult<CheckReport> {
    let doc = load_from_file(snapshot)?;

    let mut fields = Vec::with_capacity(Field::ALL.len());
    for field in Field::ALL {
        let selector = field.selector(count)?;
        fields.push(FieldCheck {
            field,
            matches: doc.count(&selector),
            extracted: extract(&doc, &selector)
                .map(|values| values.len())
                .map_err(|e| e.to_string()),
        });
    }

    let rows = assemble(&doc, count)
        .map(|rows| rows.len())
        .map_err(|e| e.to_string());

    Ok(CheckReport {
        snapshot: snapshot.to_path_buf(),
        fields,
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use trending_coins::TrendingError;

    const PAGE: &str = r#"<table><tr>
        <td><span class="d-lg-none font-bold">GOD</span></td>
        <td class="td-price price"><span>$439,632</span></td>
        <td class="td-change24h change24h stat-percent text-center"><span>-3.2%</span></td>
        <td class="td-liquidity_score lit"><a><span>$92,706</span></a></td>
    </tr></table>"#;

    #[test]
    fn test_passing_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.html");
        std::fs::write(&path, PAGE).unwrap();

        let report = run(&path, 10).unwrap();
        assert!(report.passed());
        assert_eq!(report.rows, Ok(1));
        assert!(report.fields.iter().all(|f| f.matches == 1));
        let text = report.render();
        assert!(text.contains("[OK] Daily % Change: 1 match(es), 1 extracted"));
        assert!(text.ends_with("Status: PASS"));
    }

    #[test]
    fn test_broken_snapshot_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.html");
        std::fs::write(&path, PAGE.replace("<span>$439,632</span>", "$439,632")).unwrap();

        let report = run(&path, 10).unwrap();
        assert!(!report.passed());
        assert!(report.render().contains("[!!] Price: Malformed structure"));
    }

    #[test]
    fn test_empty_snapshot_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.html");
        std::fs::write(&path, "<html></html>").unwrap();

        let report = run(&path, 10).unwrap();
        assert!(!report.passed());
        assert!(report.render().contains("no rows assembled"));
    }

    #[test]
    fn test_missing_snapshot_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            run(&dir.path().join("nope.html"), 10),
            Err(TrendingError::SourceNotFound(_))
        ));
    }
}
