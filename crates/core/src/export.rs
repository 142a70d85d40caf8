//! Printable HTML export of the maintenance summary.
//!
//! The document is self-contained (inline styles, no scripts) so the browser
//! can open it in a new tab and print it to PDF.

use std::fmt::Write as _;

use crate::summary::SummaryWindow;
use crate::types::Timestamp;

/// Section titles in the order they appear in the document.
pub const SECTION_OVERDUE: &str = "Overdue";
pub const SECTION_UPCOMING: &str = "Upcoming";
pub const SECTION_PARTIAL: &str = "Partial / In Progress";
pub const SECTION_COMPLETED: &str = "Recently Completed";

/// Fallback label when a schedule's instrument could not be resolved.
const UNKNOWN_INSTRUMENT: &str = "Instrument";

const STYLE: &str = "body { font-family: Arial, sans-serif; padding: 24px; }\n\
h1 { margin-bottom: 4px; }\n\
h3 { margin: 16px 0 8px; }\n\
ul { padding-left: 16px; }\n\
li { margin: 4px 0; }";

/// One schedule line in the export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRow {
    /// Equipment code of the instrument, if it still exists.
    pub instrument: Option<String>,
    pub maintenance_type: String,
    pub due_date: Timestamp,
    pub status: String,
}

/// A titled list of rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSection {
    pub title: &'static str,
    pub rows: Vec<ExportRow>,
}

/// Document heading for a window, e.g. `Maintenance Summary (Last/Next 30 Days)`.
pub fn summary_heading(window: SummaryWindow) -> String {
    format!("Maintenance Summary (Last/Next {} Days)", window.days())
}

/// Render the summary sections into a complete HTML document.
pub fn render_summary_document(
    window: SummaryWindow,
    generated_at: Timestamp,
    sections: &[ExportSection],
) -> String {
    let heading = escape_html(&summary_heading(window));
    let mut html = String::new();

    // Writing to a String cannot fail.
    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{heading}</title>\n\
         <style>\n{STYLE}\n</style>\n</head>\n<body>\n<h1>{heading}</h1>\n<p>Generated: {}</p>\n",
        generated_at.format("%Y-%m-%d %H:%M UTC")
    );

    for section in sections {
        render_section(&mut html, section);
    }

    html.push_str("</body>\n</html>\n");
    html
}

fn render_section(html: &mut String, section: &ExportSection) {
    let _ = write!(html, "<h3>{}</h3>", escape_html(section.title));
    if section.rows.is_empty() {
        html.push_str("<p>None</p>\n");
        return;
    }

    html.push_str("<ul>");
    for row in &section.rows {
        let instrument = row.instrument.as_deref().unwrap_or(UNKNOWN_INSTRUMENT);
        let _ = write!(
            html,
            "<li><strong>{}</strong> \u{2014} {} \u{2022} {} \u{2022} {}</li>",
            escape_html(instrument),
            escape_html(&row.maintenance_type),
            row.due_date.format("%Y-%m-%d"),
            escape_html(&row.status),
        );
    }
    html.push_str("</ul>\n");
}

/// Escape the five HTML-significant characters.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn row(instrument: Option<&str>, status: &str) -> ExportRow {
        ExportRow {
            instrument: instrument.map(str::to_string),
            maintenance_type: "Calibration".to_string(),
            due_date: Utc.with_ymd_and_hms(2025, 2, 3, 10, 0, 0).unwrap(),
            status: status.to_string(),
        }
    }

    fn generated() -> Timestamp {
        Utc.with_ymd_and_hms(2025, 1, 1, 8, 30, 0).unwrap()
    }

    #[test]
    fn document_has_heading_and_sections() {
        let sections = [
            ExportSection { title: SECTION_OVERDUE, rows: vec![row(Some("EQP-7"), "Scheduled")] },
            ExportSection { title: SECTION_UPCOMING, rows: vec![] },
        ];
        let html = render_summary_document(SummaryWindow::Days90, generated(), &sections);

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Maintenance Summary (Last/Next 90 Days)</title>"));
        assert!(html.contains("Generated: 2025-01-01 08:30 UTC"));
        assert!(html.contains(
            "<li><strong>EQP-7</strong> \u{2014} Calibration \u{2022} 2025-02-03 \u{2022} Scheduled</li>"
        ));
        assert!(html.contains("<h3>Upcoming</h3><p>None</p>"));
        assert!(html.trim_end().ends_with("</html>"));
    }

    #[test]
    fn missing_instrument_falls_back_to_generic_label() {
        let sections = [ExportSection { title: SECTION_PARTIAL, rows: vec![row(None, "In Progress")] }];
        let html = render_summary_document(SummaryWindow::Days30, generated(), &sections);
        assert!(html.contains("<strong>Instrument</strong>"));
    }

    #[test]
    fn user_text_is_escaped() {
        let sections = [ExportSection {
            title: SECTION_COMPLETED,
            rows: vec![row(Some("<script>alert(1)</script>"), "Completed")],
        }];
        let html = render_summary_document(SummaryWindow::Days30, generated(), &sections);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    }

    #[test]
    fn escape_covers_quotes_and_ampersand() {
        assert_eq!(escape_html(r#"a&b "c" 'd'"#), "a&amp;b &quot;c&quot; &#39;d&#39;");
    }
}
