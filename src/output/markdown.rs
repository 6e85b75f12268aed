//! Markdown report
//!
//! One table per view: content items, deployed HTML files, undeployed HTML
//! files, x-id links and discarded links. HTML files whose name matches the
//! skip pattern are left out of every page view.

use crate::model::{ContentItem, Link};
use crate::output::traits::{OutputResult, ReportWriter};
use crate::pipeline::TriageReport;
use regex::Regex;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Row text for a deployed page without hard links
pub const CLEAN_PAGE_NOTE: &str = "NO BAD LINKS FOUND, CONVERT TO BLANK PG?";

/// Row text for an undeployed page without hard links
pub const CLEAN_UNDEPLOYED_NOTE: &str = "NO BAD LINKS FOUND, CONSIDER DELETE";

/// Writes the markdown report
pub struct MarkdownReport {
    skip_pages: Regex,
}

impl MarkdownReport {
    pub fn new(skip_pages: Regex) -> Self {
        Self { skip_pages }
    }
}

impl ReportWriter for MarkdownReport {
    fn extension(&self) -> &'static str {
        "md"
    }

    fn write(&self, report: &TriageReport, path: &Path) -> OutputResult<()> {
        let markdown = format_markdown_report(report, &self.skip_pages);

        let mut file = File::create(path)?;
        file.write_all(markdown.as_bytes())?;

        Ok(())
    }
}

/// Formats a triage report as markdown
///
/// # Arguments
///
/// * `report` - Results of one export
/// * `skip_pages` - Page names matching this are not listed
///
/// # Returns
///
/// A formatted markdown string
pub fn format_markdown_report(report: &TriageReport, skip_pages: &Regex) -> String {
    let pages: Vec<&ContentItem> = report
        .pages
        .iter()
        .filter(|p| !skip_pages.is_match(&p.title))
        .collect();
    let undeployed: Vec<&ContentItem> = report
        .undeployed
        .iter()
        .filter(|p| !skip_pages.is_match(&p.title))
        .collect();
    let listed = || {
        report
            .items
            .iter()
            .chain(pages.iter().copied())
            .chain(undeployed.iter().copied())
    };

    let mut md = String::new();

    md.push_str(&format!("# Hard-Link Triage: {}\n\n", report.export_name));

    // Summary
    md.push_str("## Summary\n\n");
    md.push_str(&format!(
        "- **Generated**: {}\n",
        report.generated_at.to_rfc3339()
    ));
    md.push_str(&format!("- **Config Hash**: {}\n", report.config_hash));
    md.push_str(&format!("- **Content Items**: {}\n", report.items.len()));
    md.push_str(&format!("- **HTML Files**: {}\n", report.pages.len()));
    md.push_str(&format!(
        "- **Undeployed HTML Files**: {}\n",
        report.undeployed.len()
    ));
    if report.skipped > 0 {
        md.push_str(&format!(
            "- **Unreadable Items Skipped**: {}\n",
            report.skipped
        ));
    }
    md.push('\n');

    // Content items
    md.push_str("## Content Items\n\n");
    md.push_str("| Item Name | Link Address | x-id | Link/Alt Text | Course Location |\n");
    md.push_str("|-----------|--------------|------|---------------|-----------------|\n");
    for item in &report.items {
        for link in &item.hard_links {
            push_row(
                &mut md,
                &[
                    &item.title,
                    &link.url,
                    xid(link),
                    &link.display_text,
                    &item.navigation_path,
                ],
            );
        }
    }
    md.push('\n');

    // Deployed pages
    md.push_str("## HTML Files\n\n");
    md.push_str(
        "| Item Name | Link Address | x-id | Link/Alt Text | Course Location | Content Collection Path |\n",
    );
    md.push_str(
        "|-----------|--------------|------|---------------|-----------------|-------------------------|\n",
    );
    for page in &pages {
        if page.hard_links.is_empty() {
            push_row(
                &mut md,
                &[
                    &page.title,
                    CLEAN_PAGE_NOTE,
                    "",
                    "",
                    &page.navigation_path,
                    &page.collection_path,
                ],
            );
        }
        for link in &page.hard_links {
            push_row(
                &mut md,
                &[
                    &page.title,
                    &link.url,
                    xid(link),
                    &link.display_text,
                    &page.navigation_path,
                    &page.collection_path,
                ],
            );
        }
    }
    md.push('\n');

    // Undeployed pages
    md.push_str("## Undeployed HTML Files\n\n");
    md.push_str("| Content Collection Path | Item Name | Link/Alt Text | Link Address | x-id |\n");
    md.push_str("|-------------------------|-----------|---------------|--------------|------|\n");
    for page in &undeployed {
        if page.hard_links.is_empty() {
            push_row(
                &mut md,
                &[
                    &page.collection_path,
                    &page.title,
                    CLEAN_UNDEPLOYED_NOTE,
                    "",
                    "",
                ],
            );
        }
        for link in &page.hard_links {
            push_row(
                &mut md,
                &[
                    &page.collection_path,
                    &page.title,
                    &link.display_text,
                    &link.url,
                    xid(link),
                ],
            );
        }
    }
    md.push('\n');

    // x-id links
    md.push_str("## x-id Links\n\n");
    md.push_str(
        "| Course Location | Content Collection Path | Item Name | Link/Alt Text | Link Address |\n",
    );
    md.push_str(
        "|-----------------|-------------------------|-----------|---------------|--------------|\n",
    );
    for item in listed() {
        for link in &item.xid_links {
            push_row(
                &mut md,
                &[
                    &item.navigation_path,
                    &item.collection_path,
                    &item.title,
                    &link.display_text,
                    &link.url,
                ],
            );
        }
    }
    md.push('\n');

    // Discarded links
    md.push_str("## Discarded Links\n\n");
    md.push_str(
        "| Course Location | Content Collection Path | Item Name | Link Address | Link/Alt Text |\n",
    );
    md.push_str(
        "|-----------------|-------------------------|-----------|--------------|---------------|\n",
    );
    for item in listed() {
        for link in &item.discarded_links {
            push_row(
                &mut md,
                &[
                    &item.navigation_path,
                    &item.collection_path,
                    &item.title,
                    &link.url,
                    &link.display_text,
                ],
            );
        }
    }

    md
}

fn xid(link: &Link) -> &str {
    link.resolved_xid.as_deref().unwrap_or_default()
}

fn push_row(md: &mut String, cells: &[&str]) {
    md.push('|');
    for cell in cells {
        md.push(' ');
        md.push_str(&escape_cell(cell));
        md.push_str(" |");
    }
    md.push('\n');
}

/// Keeps a value inside its table cell
fn escape_cell(value: &str) -> String {
    value
        .replace('|', "\\|")
        .replace("\r\n", " ")
        .replace(['\n', '\r'], " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ItemSource, LinkCategory, NOT_DEPLOYED, NOT_FOUND_IN_COLLECTION};

    fn link(url: &str, text: &str, category: LinkCategory, xid: Option<&str>) -> Link {
        let mut link = Link::new(url, text, category);
        link.resolved_xid = xid.map(str::to_string);
        link
    }

    fn page(title: &str, path: &str, links: Vec<Link>) -> ContentItem {
        let mut item = ContentItem::new(title.to_lowercase(), title, ItemSource::Page);
        item.navigation_path = path.to_string();
        item.collection_path = format!("/{}", title);
        item.push_links(links);
        item
    }

    fn sample_report() -> TriageReport {
        let mut item = ContentItem::new("res00001", "Week 1", ItemSource::Descriptor);
        item.navigation_path = "\\Course Content\\".to_string();
        item.push_links(vec![
            link(
                "mycontent/page.html",
                "text: Page",
                LinkCategory::HardLink,
                Some(NOT_FOUND_IN_COLLECTION),
            ),
            link("https://example.com/", "text: Out", LinkCategory::Discarded, None),
            link(
                "https://bblearn.nau.edu/bbcswebdav/xid-1_1",
                "text: a|b",
                LinkCategory::XidLink,
                None,
            ),
        ]);

        TriageReport {
            export_name: "ExportFile_ABC101".to_string(),
            items: vec![item],
            pages: vec![
                page("clean.html", "\\Unit 1\\", vec![]),
                page(
                    "DVD123_menu.html",
                    "\\Media\\",
                    vec![link("https://example.org/", "text: Skip me", LinkCategory::Discarded, None)],
                ),
            ],
            undeployed: vec![page("orphan.html", NOT_DEPLOYED, vec![])],
            skipped: 2,
            config_hash: "abc123".to_string(),
            generated_at: chrono::Utc::now(),
        }
    }

    fn format(report: &TriageReport) -> String {
        format_markdown_report(report, &Regex::new("(DVD|VT)[0-9]{1,6}_").unwrap())
    }

    #[test]
    fn test_sections_present() {
        let md = format(&sample_report());
        for heading in [
            "## Summary",
            "## Content Items",
            "## HTML Files",
            "## Undeployed HTML Files",
            "## x-id Links",
            "## Discarded Links",
        ] {
            assert!(md.contains(heading), "missing {}", heading);
        }
        assert!(md.contains("- **Config Hash**: abc123"));
        assert!(md.contains("- **Unreadable Items Skipped**: 2"));
    }

    #[test]
    fn test_hard_link_row() {
        let md = format(&sample_report());
        assert!(md.contains(
            "| Week 1 | mycontent/page.html | NOT FOUND IN COLLECTION | text: Page | \\Course Content\\ |"
        ));
    }

    #[test]
    fn test_clean_page_notes() {
        let md = format(&sample_report());
        assert!(md.contains(&format!("| clean.html | {} |", CLEAN_PAGE_NOTE)));
        assert!(md.contains(&format!(
            "| /orphan.html | orphan.html | {} |",
            CLEAN_UNDEPLOYED_NOTE
        )));
    }

    #[test]
    fn test_skip_pattern_hides_page_everywhere() {
        let md = format(&sample_report());
        assert!(!md.contains("DVD123_menu.html"));
        assert!(!md.contains("Skip me"));

        let md = format_markdown_report(&sample_report(), &Regex::new("^$").unwrap());
        assert!(md.contains("DVD123_menu.html"));
        assert!(md.contains("Skip me"));
    }

    #[test]
    fn test_cells_escaped() {
        let md = format(&sample_report());
        assert!(md.contains("text: a\\|b"));
        assert_eq!(escape_cell("a\r\nb\nc"), "a b c");
    }

    #[test]
    fn test_write_to_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("triage_ABC101.md");
        let writer = MarkdownReport::new(Regex::new("(DVD|VT)[0-9]{1,6}_").unwrap());

        writer.write(&sample_report(), &path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("# Hard-Link Triage: ExportFile_ABC101"));
        assert_eq!(writer.extension(), "md");
    }
}
