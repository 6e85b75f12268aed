//! Integration tests for the triage pipeline
//!
//! These tests build a synthetic extracted course export on disk and run the
//! full pipeline end-to-end, including the written reports.

use course_triage::config::{Config, ReportConfig};
use course_triage::output::{write_reports, CLEAN_PAGE_NOTE, CLEAN_UNDEPLOYED_NOTE};
use course_triage::{process_export, ContentItem, ContentType, LinkCategory, TriageError, NOT_DEPLOYED};
use rusqlite::Connection;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use tempfile::TempDir;

const SECTION: &str = "/courses/2024-NAU01-ABC-101-SEC01-12345.NAU-PSSIS/";
const PREFIX: &str = "https://bblearn.nau.edu/bbcswebdav/xid-";

const MANIFEST: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<manifest identifier="man00001">
  <organizations default="toc00001">
    <organization identifier="toc00001">
      <item identifier="itm00001" identifierref="res00001">
        <title>--TOP--</title>
        <item identifier="itm00002" identifierref="res00002">
          <title>Course Content</title>
          <item identifier="itm00003" identifierref="res00003">
            <title>Week 1</title>
            <item identifier="itm00004" identifierref="res00004">
              <title>Reading</title>
            </item>
            <item identifier="itm00005" identifierref="res00005">
              <title>Lecture Notes</title>
            </item>
          </item>
        </item>
      </item>
    </organization>
  </organizations>
  <resources/>
</manifest>"#;

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

/// Escapes markup for embedding in a descriptor's text field
fn escape(markup: &str) -> String {
    markup
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn content_descriptor(title: &str, markup: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<CONTENT id="_1_1">
  <TITLE value="{}"/>
  <BODY><TEXT>{}</TEXT><TYPE value="H"/></BODY>
  <CONTENTHANDLER value="resource/x-bb-document"/>
</CONTENT>"#,
        title,
        escape(markup)
    )
}

fn collection_metadata(identifier: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<lom xmlns="http://www.imsglobal.org/xsd/imsmd_rootv1p2p1">
  <relation><resource><identifier>{}</identifier></resource></relation>
</lom>"#,
        identifier
    )
}

/// A small course export exercising every report section
fn build_export() -> TempDir {
    let dir = tempfile::Builder::new()
        .prefix("ExportFile_ABC101_")
        .tempdir()
        .unwrap();
    let root = dir.path();

    write(root, "imsmanifest.xml", MANIFEST);

    // Folder descriptors
    write(root, "res00002.dat", &content_descriptor("Course Content", ""));
    write(root, "res00003.dat", &content_descriptor("Week 1", ""));

    // A content item with one link of every kind
    write(
        root,
        "res00004.dat",
        &content_descriptor(
            "Reading",
            &format!(
                concat!(
                    r#"<p><a href="https://bblearn.nau.edu/bbcswebdav{}week2/notes.pdf">Notes</a></p>"#,
                    r#"<p><a href="@X@EmbeddedFile.requestUrlStub@X@bbcswebdav/xid-123456_1">Syllabus</a></p>"#,
                    r#"<p><a href="https://www.example.com/">Publisher</a></p>"#,
                    r#"<p><img src="images/diagram.png" alt="Diagram"></p>"#,
                    r#"<p><a href="missing/handout.docx">Handout</a></p>"#,
                ),
                SECTION
            ),
        ),
    );

    // A file-link item deploying an HTML page
    write(
        root,
        "res00005.dat",
        r#"<?xml version="1.0" encoding="UTF-8"?>
<CONTENT id="_5_1">
  <TITLE value="lecture.html"/>
  <CONTENTHANDLER value="resource/x-bb-file"/>
  <FILES><FILE id="_9_1"><NAME>/lecture.html</NAME><LINKNAME value="lecture.html"/></FILE></FILES>
</CONTENT>"#,
    );

    // An assessment with a publisher test image
    write(
        root,
        "res00006.dat",
        &format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<questestinterop>
  <assessment title="Quiz 1">
    <assessmentmetadata><bbmd_assessmenttype>Test</bbmd_assessmenttype></assessmentmetadata>
    <presentation><mat_formattedtext type="SMART_TEXT">{}</mat_formattedtext></presentation>
  </assessment>
</questestinterop>"#,
            escape(r#"<img src="ppg/q1.gif" alt="Question art">"#)
        ),
    );

    // An announcement: its text is never scanned
    write(
        root,
        "res00007.dat",
        &format!(
            r#"<ANNOUNCEMENT><TITLE value="Welcome"/><DESCRIPTION><TEXT>{}</TEXT></DESCRIPTION></ANNOUNCEMENT>"#,
            escape(r#"<a href="courses/abc/page.html">Page</a>"#)
        ),
    );

    // Unparsable descriptor
    write(root, "res00008.dat", "<CONTENT><TITLE value=\"Broken\"></CONTENT>");

    // Content collection pages
    write(
        root,
        "csfiles/home_dir/lecture.html",
        "<html>\n<body>\n<a href=\"https://bblearn.nau.edu/bbcswebdav/xid-777_1\">Slides</a>\n</body>\n</html>\n",
    );
    write(
        root,
        "csfiles/home_dir/archive/old.html",
        r#"<a href="../week1/notes.pdf">Old notes</a>"#,
    );
    write(root, "csfiles/home_dir/archive/empty.htm", "<p>nothing here</p>");
    write(
        root,
        "csfiles/home_dir/media/DVD1234_menu.html",
        r#"<a href="clip.mp4">Clip</a>"#,
    );

    // Content collection metadata
    write(
        root,
        "csfiles/home_dir/week1/notes.pdf.xml",
        &collection_metadata(&format!("100#{}week1/notes.pdf", SECTION)),
    );
    write(
        root,
        "csfiles/home_dir/week2/notes.pdf.xml",
        &collection_metadata(&format!("200#{}week2/notes.pdf", SECTION)),
    );
    write(
        root,
        "csfiles/home_dir/images/diagram.png.xml",
        &collection_metadata(&format!("300#{}images/diagram.png", SECTION)),
    );
    write(root, "csfiles/home_dir/broken.pdf.xml", "<lom><identifier>");

    dir
}

fn run(root: &Path) -> course_triage::Result<course_triage::TriageReport> {
    process_export(root, &Config::default(), "test-hash", &AtomicBool::new(false))
}

fn find<'a>(items: &'a [ContentItem], id: &str) -> &'a ContentItem {
    items
        .iter()
        .find(|i| i.item_id == id)
        .unwrap_or_else(|| panic!("item {} missing", id))
}

#[test]
fn test_full_triage_buckets_and_resolution() {
    let export = build_export();
    let report = run(export.path()).unwrap();

    assert_eq!(report.skipped, 1);
    assert_eq!(report.config_hash, "test-hash");
    assert!(report.export_name.starts_with("ExportFile_ABC101_"));

    let reading = find(&report.items, "res00004");
    assert_eq!(reading.title, "Reading");
    assert_eq!(reading.navigation_path, "\\Course Content\\Week 1\\");

    // Hard links in key order: alt: Diagram, text: Handout, text: Notes
    let hard: Vec<_> = reading
        .hard_links
        .iter()
        .map(|l| (l.display_text.as_str(), l.resolved_xid.as_deref()))
        .collect();
    assert_eq!(
        hard,
        vec![
            ("alt: Diagram", Some(format!("{}300", PREFIX).as_str())),
            ("text: Handout", Some("NOT FOUND IN COLLECTION")),
            ("text: Notes", Some(format!("{}200", PREFIX).as_str())),
        ]
    );

    assert_eq!(reading.xid_links.len(), 1);
    assert_eq!(
        reading.xid_links[0].url,
        "https://bblearn.nau.edu/bbcswebdav/xid-123456_1"
    );
    assert!(reading.xid_links[0].resolved_xid.is_none());

    assert_eq!(reading.discarded_links.len(), 1);
    assert_eq!(reading.discarded_links[0].display_text, "text: Publisher");
    assert!(reading.discarded_links[0].resolved_xid.is_none());
}

#[test]
fn test_typed_items() {
    let export = build_export();
    let report = run(export.path()).unwrap();

    let quiz = find(&report.items, "res00006");
    assert_eq!(quiz.title, "Test: Quiz 1");
    assert_eq!(quiz.content_type, ContentType::Assessment);
    assert_eq!(quiz.navigation_path, "Tests, Surveys & Pools");
    // Test-tool images are discarded, yet resolution still ran
    assert!(quiz.hard_links.is_empty());
    assert_eq!(quiz.discarded_links.len(), 1);
    assert_eq!(
        quiz.discarded_links[0].resolved_xid.as_deref(),
        Some("NOT FOUND IN COLLECTION")
    );

    let welcome = find(&report.items, "res00007");
    assert_eq!(welcome.content_type, ContentType::Announcement);
    assert_eq!(welcome.navigation_path, "Announcements");
    assert_eq!(welcome.total_links(), 0);
}

#[test]
fn test_items_sorted_by_hard_links() {
    let export = build_export();
    let report = run(export.path()).unwrap();

    assert_eq!(report.items[0].item_id, "res00004");
    let counts: Vec<_> = report.items.iter().map(|i| i.hard_links.len()).collect();
    let mut sorted = counts.clone();
    sorted.sort_by(|a, b| b.cmp(a));
    assert_eq!(counts, sorted);
}

#[test]
fn test_pages_deployed_and_undeployed() {
    let export = build_export();
    let report = run(export.path()).unwrap();

    assert_eq!(report.pages.len(), 1);
    let lecture = &report.pages[0];
    assert_eq!(lecture.title, "Lecture Notes");
    assert_eq!(lecture.navigation_path, "\\Course Content\\Week 1\\");
    assert_eq!(lecture.collection_path, "/lecture.html");
    assert!(lecture.hard_links.is_empty());
    assert_eq!(lecture.xid_links.len(), 1);

    let undeployed: Vec<_> = report
        .undeployed
        .iter()
        .map(|p| p.collection_path.as_str())
        .collect();
    assert_eq!(undeployed.len(), 3);
    assert_eq!(undeployed[0], "/archive/old.html");
    assert!(undeployed.contains(&"/archive/empty.htm"));
    assert!(undeployed.contains(&"/media/DVD1234_menu.html"));
    assert!(report
        .undeployed
        .iter()
        .all(|p| p.navigation_path == NOT_DEPLOYED));
}

#[test]
fn test_reports_written() {
    let export = build_export();
    let report = run(export.path()).unwrap();

    let out = TempDir::new().unwrap();
    let config = ReportConfig {
        output_dir: out.path().to_string_lossy().into_owned(),
        ..ReportConfig::default()
    };
    let written = write_reports(&report, &config).unwrap();
    assert_eq!(written.len(), 2);

    let stem = report.export_name.replace("ExportFile", "triage");
    let markdown = std::fs::read_to_string(out.path().join(format!("{}.md", stem))).unwrap();
    assert!(markdown.contains(&format!("| Lecture Notes | {} |", CLEAN_PAGE_NOTE)));
    assert!(markdown.contains(&format!(
        "| /archive/empty.htm | empty.htm | {} |",
        CLEAN_UNDEPLOYED_NOTE
    )));
    assert!(markdown.contains("../week1/notes.pdf"));
    assert!(!markdown.contains("DVD1234_menu"));

    let conn = Connection::open(out.path().join(format!("{}.db", stem))).unwrap();
    let hard: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM links WHERE category = ?1",
            [LinkCategory::HardLink.to_db_string()],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(hard, report.count(LinkCategory::HardLink) as i64);

    let undeployed: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM items WHERE section = 'undeployed'",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(undeployed, 3);
}

#[test]
fn test_cancelled_run() {
    let export = build_export();
    let result = process_export(
        export.path(),
        &Config::default(),
        "",
        &AtomicBool::new(true),
    );
    assert!(matches!(result, Err(TriageError::Cancelled { .. })));
}

#[test]
fn test_triage_is_deterministic() {
    let export = build_export();
    let first = run(export.path()).unwrap();
    let second = run(export.path()).unwrap();

    let summary = |r: &course_triage::TriageReport| -> Vec<(String, String, usize)> {
        r.all_items()
            .map(|i| (i.item_id.clone(), i.navigation_path.clone(), i.hard_links.len()))
            .collect()
    };
    assert_eq!(summary(&first), summary(&second));
}
