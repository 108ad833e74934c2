//! Markdown report rendering

use chrono::NaiveDateTime;

use crate::version::types::Tag;

/// Format of the generation timestamp inside a report
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format of the per-run output directory suffix
const RUN_DIR_FORMAT: &str = "%Y%m%d-%H%M%S";

/// A tag paired with the text shown for it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseEntry {
    pub tag: Tag,
    /// Release notes, or the placeholder when the host had none
    pub body: String,
}

/// Report title block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportHeader<'a> {
    pub package: &'a str,
    pub installed_version: &'a str,
    pub latest_version: Option<&'a str>,
    pub generated_at: NaiveDateTime,
}

/// Render a report. Entries are written in the order given.
pub fn render_report(header: &ReportHeader<'_>, entries: &[ReleaseEntry]) -> String {
    let mut document = format!(
        "# Release notes: {}\n\nGenerated: {}\n\nInstalled version: {}\n",
        header.package,
        header.generated_at.format(TIMESTAMP_FORMAT),
        header.installed_version,
    );
    if let Some(latest) = header.latest_version {
        document.push_str(&format!("Latest version: {}\n", latest));
    }
    document.push('\n');

    for entry in entries {
        document.push_str(&format!("---\n\n## {}\n\n{}\n\n", entry.tag.raw, entry.body));
    }

    document
}

/// File name for a package report, e.g. `foo_1.2.0_to_1.4.0.md`
pub fn report_file_name(package: &str, installed: &str, latest: Option<&str>) -> String {
    match latest {
        Some(latest) => format!(
            "{}_{}_to_{}.md",
            sanitize(package),
            sanitize(installed),
            sanitize(latest)
        ),
        None => format!("{}_{}.md", sanitize(package), sanitize(installed)),
    }
}

/// Directory name for one run's reports
pub fn run_directory_name(started_at: NaiveDateTime) -> String {
    format!("release-notes-{}", started_at.format(RUN_DIR_FORMAT))
}

fn sanitize(part: &str) -> String {
    part.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect()
}
