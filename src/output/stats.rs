//! Run statistics
//!
//! Counts derived from a finished report, printed at the end of each run.

use crate::model::LinkCategory;
use crate::pipeline::TriageReport;

/// Triage statistics for one export
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TriageStatistics {
    pub content_items: usize,
    pub pages: usize,
    pub undeployed_pages: usize,
    pub skipped_items: usize,

    pub hard_links: usize,
    pub discarded_links: usize,
    pub xid_links: usize,

    /// Hard links with a stable reference suggestion
    pub resolved_hard_links: usize,

    /// Hard links with no matching collection file
    pub unresolved_hard_links: usize,

    /// Items and pages with at least one hard link
    pub items_needing_repair: usize,
}

impl TriageStatistics {
    pub fn from_report(report: &TriageReport) -> Self {
        let hard_links = report.count(LinkCategory::HardLink);
        let unresolved_hard_links = report.unresolved_count();

        Self {
            content_items: report.items.len(),
            pages: report.pages.len(),
            undeployed_pages: report.undeployed.len(),
            skipped_items: report.skipped,
            hard_links,
            discarded_links: report.count(LinkCategory::Discarded),
            xid_links: report.count(LinkCategory::XidLink),
            resolved_hard_links: hard_links - unresolved_hard_links,
            unresolved_hard_links,
            items_needing_repair: report
                .all_items()
                .filter(|item| !item.hard_links.is_empty())
                .count(),
        }
    }

    pub fn total_links(&self) -> usize {
        self.hard_links + self.discarded_links + self.xid_links
    }

    /// Share of hard links with a stable reference suggestion, in percent
    pub fn resolution_rate(&self) -> f64 {
        if self.hard_links == 0 {
            return 0.0;
        }
        (self.resolved_hard_links as f64 / self.hard_links as f64) * 100.0
    }
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `export_name` - Export the statistics belong to
/// * `stats` - The statistics to display
pub fn print_statistics(export_name: &str, stats: &TriageStatistics) {
    println!("=== Triage: {} ===\n", export_name);

    println!("Items:");
    println!("  Content items: {}", stats.content_items);
    println!("  HTML files: {}", stats.pages);
    println!("  Undeployed HTML files: {}", stats.undeployed_pages);
    if stats.skipped_items > 0 {
        println!("  Unreadable (skipped): {}", stats.skipped_items);
    }
    println!();

    println!("Links ({} total):", stats.total_links());
    println!("  Hard links: {}", stats.hard_links);
    println!("  x-id links: {}", stats.xid_links);
    println!("  Discarded: {}", stats.discarded_links);
    println!();

    println!(
        "Resolution: {:.1}% ({} / {} hard links matched in the content collection)",
        stats.resolution_rate(),
        stats.resolved_hard_links,
        stats.hard_links
    );
    println!("Items needing repair: {}", stats.items_needing_repair);
}
