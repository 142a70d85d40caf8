//! Maintenance result scoring and search.
//!
//! A result's test data is a list of sections, each holding rows that may or
//! may not carry a pass/fail verdict.

use serde::{Deserialize, Serialize};

/// One measured line of a test section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestRow {
    pub label: String,
    #[serde(default)]
    pub expected: Option<String>,
    #[serde(default)]
    pub observed: Option<String>,
    /// `None` for informational rows that are not judged.
    #[serde(default)]
    pub passed: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestSection {
    pub title: String,
    #[serde(default)]
    pub rows: Vec<TestRow>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Pass,
    Fail,
}

/// Aggregate verdict over all judged rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OverallStatus {
    pub outcome: Outcome,
    pub passed: usize,
    pub total: usize,
}

/// Score a result's sections.
///
/// Returns `None` when no row carries a verdict. Any failing row fails the
/// whole result.
pub fn overall_status(sections: &[TestSection]) -> Option<OverallStatus> {
    let verdicts = sections
        .iter()
        .flat_map(|s| s.rows.iter())
        .filter_map(|r| r.passed);

    let (mut passed, mut total) = (0, 0);
    for verdict in verdicts {
        total += 1;
        if verdict {
            passed += 1;
        }
    }

    if total == 0 {
        return None;
    }
    let outcome = if passed < total { Outcome::Fail } else { Outcome::Pass };
    Some(OverallStatus {
        outcome,
        passed,
        total,
    })
}

/// Case-insensitive substring match against any of the given fields.
///
/// An empty (or all-whitespace) term matches everything.
pub fn matches_search<'a, I>(term: &str, fields: I) -> bool
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    fields
        .into_iter()
        .flatten()
        .any(|f| f.to_lowercase().contains(&needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(passed: Option<bool>) -> TestRow {
        TestRow {
            label: "Flow rate".to_string(),
            expected: Some("1.0 mL/min".to_string()),
            observed: Some("1.0 mL/min".to_string()),
            passed,
        }
    }

    fn section(rows: Vec<TestRow>) -> TestSection {
        TestSection {
            title: "Pump".to_string(),
            rows,
        }
    }

    #[test]
    fn no_verdicts_means_no_status() {
        assert_eq!(overall_status(&[]), None);
        assert_eq!(overall_status(&[section(vec![row(None)])]), None);
    }

    #[test]
    fn all_passing_rows_pass() {
        let status = overall_status(&[
            section(vec![row(Some(true)), row(None)]),
            section(vec![row(Some(true))]),
        ]);
        assert_eq!(
            status,
            Some(OverallStatus {
                outcome: Outcome::Pass,
                passed: 2,
                total: 2
            })
        );
    }

    #[test]
    fn any_failure_fails() {
        let rows = vec![row(Some(true)), row(Some(false)), row(Some(true))];
        let status = overall_status(&[section(rows)]).unwrap();
        assert_eq!(status.outcome, Outcome::Fail);
        assert_eq!(status.passed, 2);
        assert_eq!(status.total, 3);
    }

    #[test]
    fn sections_deserialize_with_missing_fields() {
        let json = r#"[{"title": "Detector", "rows": [{"label": "Noise", "passed": false}]}, {"title": "Empty"}]"#;
        let sections: Vec<TestSection> = serde_json::from_str(json).unwrap();
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].rows[0].passed, Some(false));
        assert!(sections[1].rows.is_empty());
    }

    #[test]
    fn search_is_case_insensitive_over_optional_fields() {
        let fields = [Some("EQP-042"), None, Some("Calibration passed")];
        assert!(matches_search("eqp-04", fields));
        assert!(matches_search("PASSED", fields));
        assert!(!matches_search("hplc", fields));
        assert!(matches_search("  ", fields));
    }
}
