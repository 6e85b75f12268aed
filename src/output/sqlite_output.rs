//! SQLite report
//!
//! The whole report is written in one transaction. Every report view can be
//! rebuilt by query, e.g. the content-item hard links:
//!
//! ```sql
//! SELECT i.title, l.url, l.resolved_xid, l.display_text, i.navigation_path
//! FROM links l JOIN items i ON l.item_id = i.id
//! WHERE i.section = 'content' AND l.category = 'hard'
//! ORDER BY i.position, l.position;
//! ```

use crate::model::{ContentItem, Link};
use crate::output::traits::{OutputResult, ReportWriter};
use crate::pipeline::TriageReport;
use rusqlite::{params, Connection, Transaction};
use std::path::Path;

/// Report database schema
pub const REPORT_SCHEMA_SQL: &str = r#"
-- One row per triaged export
CREATE TABLE IF NOT EXISTS runs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    export_name TEXT NOT NULL,
    generated_at TEXT NOT NULL,
    config_hash TEXT NOT NULL,
    skipped INTEGER NOT NULL DEFAULT 0
);

-- Content items and HTML pages, in report order
CREATE TABLE IF NOT EXISTS items (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    run_id INTEGER NOT NULL REFERENCES runs(id),
    section TEXT NOT NULL,
    position INTEGER NOT NULL,
    item_key TEXT NOT NULL,
    title TEXT NOT NULL,
    content_type TEXT NOT NULL,
    source TEXT NOT NULL,
    navigation_path TEXT NOT NULL,
    collection_path TEXT NOT NULL,
    hard_link_count INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_items_run ON items(run_id, section);

-- Classified links, in scan order within each bucket
CREATE TABLE IF NOT EXISTS links (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    item_id INTEGER NOT NULL REFERENCES items(id),
    category TEXT NOT NULL,
    position INTEGER NOT NULL,
    url TEXT NOT NULL,
    display_text TEXT NOT NULL,
    resolved_xid TEXT
);

CREATE INDEX IF NOT EXISTS idx_links_item ON links(item_id);
CREATE INDEX IF NOT EXISTS idx_links_category ON links(category);
"#;

/// Report section of an item
pub const SECTION_CONTENT: &str = "content";
pub const SECTION_PAGE: &str = "page";
pub const SECTION_UNDEPLOYED: &str = "undeployed";

/// Initializes the report schema
///
/// # Returns
///
/// * `Ok(())` - Schema initialized successfully
/// * `Err(rusqlite::Error)` - Failed to initialize schema
pub fn initialize_schema(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(REPORT_SCHEMA_SQL)?;
    Ok(())
}

/// Writes the SQLite report
///
/// Reports accumulate: writing to an existing database adds a new run.
pub struct SqliteReport;

impl SqliteReport {
    /// Stores a report and returns its run id
    pub fn store(conn: &mut Connection, report: &TriageReport) -> OutputResult<i64> {
        initialize_schema(conn)?;

        let tx = conn.transaction()?;
        tx.execute(
            "INSERT INTO runs (export_name, generated_at, config_hash, skipped) VALUES (?1, ?2, ?3, ?4)",
            params![
                report.export_name,
                report.generated_at.to_rfc3339(),
                report.config_hash,
                report.skipped as i64
            ],
        )?;
        let run_id = tx.last_insert_rowid();

        for (section, items) in [
            (SECTION_CONTENT, &report.items),
            (SECTION_PAGE, &report.pages),
            (SECTION_UNDEPLOYED, &report.undeployed),
        ] {
            for (position, item) in items.iter().enumerate() {
                insert_item(&tx, run_id, section, position, item)?;
            }
        }

        tx.commit()?;
        Ok(run_id)
    }
}

impl ReportWriter for SqliteReport {
    fn extension(&self) -> &'static str {
        "db"
    }

    fn write(&self, report: &TriageReport, path: &Path) -> OutputResult<()> {
        let mut conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        let run_id = Self::store(&mut conn, report)?;
        tracing::debug!("Stored run {} in {}", run_id, path.display());
        Ok(())
    }
}

fn insert_item(
    tx: &Transaction<'_>,
    run_id: i64,
    section: &str,
    position: usize,
    item: &ContentItem,
) -> OutputResult<()> {
    tx.execute(
        "INSERT INTO items (run_id, section, position, item_key, title, content_type, source, navigation_path, collection_path, hard_link_count)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            run_id,
            section,
            position as i64,
            item.item_id,
            item.title,
            item.content_type.to_db_string(),
            item.source.to_db_string(),
            item.navigation_path,
            item.collection_path,
            item.hard_links.len() as i64
        ],
    )?;
    let row_id = tx.last_insert_rowid();

    let mut stmt = tx.prepare_cached(
        "INSERT INTO links (item_id, category, position, url, display_text, resolved_xid)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )?;
    for bucket in [&item.hard_links, &item.discarded_links, &item.xid_links] {
        for (position, link) in bucket.iter().enumerate() {
            insert_link(&mut stmt, row_id, position, link)?;
        }
    }

    Ok(())
}

fn insert_link(
    stmt: &mut rusqlite::CachedStatement<'_>,
    item_row: i64,
    position: usize,
    link: &Link,
) -> OutputResult<()> {
    stmt.execute(params![
        item_row,
        link.category.to_db_string(),
        position as i64,
        link.url,
        link.display_text,
        link.resolved_xid
    ])?;
    Ok(())
}
