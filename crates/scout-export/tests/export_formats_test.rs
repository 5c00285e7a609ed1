//! Export engine properties across json, csv, and document output.

use chrono::{Duration, TimeZone, Utc};

use scout_core::defaults::PAGE_BREAK;
use scout_core::{
    Citation, CreateVersionRequest, Decision, Error, InsightData, Level, PainPoint, VersionHistory,
    VersionRecord,
};
use scout_export::{export, ExportConfig, ExportEngine, ExportFormat};

fn sample_history() -> VersionHistory {
    let base = Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap();

    let snapshot = InsightData {
        pain_points: vec![PainPoint {
            id: "p1".into(),
            description: "Hard to find walkers on short notice".into(),
            severity: Level::High,
            frequency: 12,
            sources: vec!["c1".into()],
        }],
        citations: vec![Citation {
            id: "c1".into(),
            url: "https://example.com/c1".into(),
            title: "Owner survey".into(),
            snippet: "last minute is the worst".into(),
            relevance_score: 0.82,
        }],
        ..Default::default()
    };

    let first = VersionRecord::from_request(
        CreateVersionRequest::new("dog-walk", "Research: dog walking app")
            .with_author("alice")
            .with_decision(
                Decision::new("Focus on same-day bookings")
                    .made_at(base)
                    .with_rationale(["Top pain point is short notice", "High frequency"])
                    .with_tags(["scope"]),
            )
            .with_snapshot(snapshot),
        1,
    );
    let second = VersionRecord::from_request(
        CreateVersionRequest::new("dog-walk", "Pricing")
            .with_decision(
                Decision::new("Charge per walk, not subscription")
                    .made_at(base + Duration::days(2))
                    .with_author("bob"),
            )
            .with_decision(
                Decision::new("Offer a first walk free")
                    .made_at(base + Duration::days(1))
                    .with_rationale(["Builds trust, \"try before you buy\"", "line one\nline two"]),
            ),
        2,
    );
    VersionHistory::new(vec![first, second])
}

fn decision_ids(history: &VersionHistory) -> Vec<String> {
    history
        .records
        .iter()
        .flat_map(|r| r.decisions.iter().map(|d| d.id.to_string()))
        .collect()
}

fn csv_rows(bytes: &[u8]) -> (Vec<String>, Vec<Vec<String>>) {
    let mut rdr = csv::Reader::from_reader(bytes);
    let header = rdr
        .headers()
        .unwrap()
        .iter()
        .map(String::from)
        .collect();
    let rows = rdr
        .records()
        .map(|r| r.unwrap().iter().map(String::from).collect())
        .collect();
    (header, rows)
}

#[test]
fn test_json_round_trips_to_equal_history() {
    let history = sample_history();
    for pretty in [true, false] {
        let engine = ExportEngine::new(ExportConfig::default().with_pretty_json(pretty));
        let artifact = engine.export(&history, ExportFormat::Json).unwrap();
        assert_eq!(artifact.media_type, "application/json");

        let parsed: VersionHistory = serde_json::from_slice(&artifact.bytes).unwrap();
        assert_eq!(parsed, history);
    }
}

#[test]
fn test_json_preserves_input_order() {
    let mut history = sample_history();
    history.records.reverse();

    let artifact = export(&history, ExportFormat::Json).unwrap();
    let value: serde_json::Value = serde_json::from_slice(&artifact.bytes).unwrap();
    assert_eq!(value[0]["label"], "Pricing");
    assert_eq!(value[1]["sequence"], 1);
}

#[test]
fn test_empty_history_json_is_empty_array() {
    let artifact = export(&VersionHistory::default(), ExportFormat::Json).unwrap();
    let value: serde_json::Value = serde_json::from_slice(&artifact.bytes).unwrap();
    assert_eq!(value, serde_json::json!([]));
}

#[test]
fn test_csv_one_row_per_decision_plus_header() {
    let history = sample_history();
    let artifact = export(&history, ExportFormat::Csv).unwrap();

    let (header, rows) = csv_rows(&artifact.bytes);
    assert_eq!(
        header,
        vec!["version_id", "timestamp", "decision_id", "summary", "rationale"]
    );
    assert_eq!(rows.len(), history.decision_count());
    assert_eq!(rows.len(), 3);
}

#[test]
fn test_csv_rows_follow_input_order() {
    let history = sample_history();
    let artifact = export(&history, ExportFormat::Csv).unwrap();
    let (_, rows) = csv_rows(&artifact.bytes);

    let ids: Vec<String> = rows.iter().map(|r| r[2].clone()).collect();
    assert_eq!(ids, decision_ids(&history));

    assert_eq!(rows[0][0], history.records[0].id.to_string());
    assert_eq!(rows[1][0], history.records[1].id.to_string());
    assert_eq!(rows[0][1], "2026-03-01T09:30:00Z");
}

#[test]
fn test_csv_escapes_quotes_and_newlines() {
    let history = sample_history();
    let artifact = export(&history, ExportFormat::Csv).unwrap();
    let text = artifact.as_text().unwrap();

    // Standard quoting: wrap in quotes, double internal quotes.
    assert!(text.contains(r#""Builds trust, ""try before you buy""; line one"#));

    let (_, rows) = csv_rows(&artifact.bytes);
    assert_eq!(
        rows[2][4],
        "Builds trust, \"try before you buy\"; line one\nline two"
    );
    assert_eq!(rows[0][4], "Top pain point is short notice; High frequency");
}

#[test]
fn test_empty_history_csv_is_header_only() {
    let artifact = export(&VersionHistory::default(), ExportFormat::Csv).unwrap();
    let (header, rows) = csv_rows(&artifact.bytes);

    assert_eq!(header.len(), 5);
    assert!(rows.is_empty());
    assert_eq!(artifact.as_text().unwrap().lines().count(), 1);
}

#[test]
fn test_record_without_decisions_adds_no_csv_rows() {
    let history = VersionHistory::new(vec![VersionRecord::from_request(
        CreateVersionRequest::new("dog-walk", "Empty milestone"),
        1,
    )]);
    let artifact = export(&history, ExportFormat::Csv).unwrap();
    let (_, rows) = csv_rows(&artifact.bytes);
    assert!(rows.is_empty());
}

#[test]
fn test_document_lists_every_decision_once() {
    let history = sample_history();
    let artifact = export(&history, ExportFormat::Document).unwrap();
    let text = artifact.as_text().unwrap();

    for id in decision_ids(&history) {
        assert_eq!(text.matches(&id).count(), 1, "decision {id} should appear once");
    }
    assert_eq!(artifact.file_name, "dog-walk-history.txt");
}

#[test]
fn test_document_sections_in_record_order() {
    let text = String::from_utf8(
        export(&sample_history(), ExportFormat::Document)
            .unwrap()
            .bytes,
    )
    .unwrap();

    let first = text.find("Version 1: Research: dog walking app").unwrap();
    let second = text.find("Version 2: Pricing").unwrap();
    assert!(first < second);
}

#[test]
fn test_document_decisions_chronological_within_section() {
    let text = String::from_utf8(
        export(&sample_history(), ExportFormat::Document)
            .unwrap()
            .bytes,
    )
    .unwrap();

    // "first walk free" was made a day before "per walk" despite coming
    // second in the record.
    let free = text.find("Offer a first walk free").unwrap();
    let per_walk = text.find("Charge per walk").unwrap();
    assert!(free < per_walk);
}

#[test]
fn test_document_paginates() {
    let mut records = Vec::new();
    for seq in 1..=12 {
        records.push(VersionRecord::from_request(
            CreateVersionRequest::new("dog-walk", format!("Iteration {seq}"))
                .with_decision(Decision::new(format!("Decision {seq}")).with_rationale(["why"])),
            seq,
        ));
    }
    let history = VersionHistory::new(records);
    let engine = ExportEngine::new(ExportConfig::default().with_page_lines(10));

    let artifact = engine.export(&history, ExportFormat::Document).unwrap();
    let text = artifact.as_text().unwrap();
    let pages = text.matches(PAGE_BREAK).count() + 1;

    assert!(pages > 1);
    assert!(text.contains(&format!("Page {pages} of {pages}")));
    for page in text.split(PAGE_BREAK) {
        assert!(page.trim_end().ends_with(&format!("of {pages}")));
    }
    for id in decision_ids(&history) {
        assert_eq!(text.matches(&id).count(), 1);
    }
}

#[test]
fn test_document_wraps_to_line_width() {
    let long = "walkers ".repeat(40);
    let history = VersionHistory::new(vec![VersionRecord::from_request(
        CreateVersionRequest::new("dog-walk", "Wrap").with_decision(Decision::new(long)),
        1,
    )]);
    let engine = ExportEngine::new(ExportConfig::default().with_line_width(40));

    let artifact = engine.export(&history, ExportFormat::Document).unwrap();
    for line in artifact.as_text().unwrap().lines() {
        assert!(line.chars().count() <= 40, "line too long: {line:?}");
    }
}

#[test]
fn test_empty_history_document_has_single_section() {
    let artifact = export(&VersionHistory::default(), ExportFormat::Document).unwrap();
    let text = artifact.as_text().unwrap();

    assert_eq!(text.matches("No decisions recorded").count(), 1);
    assert!(!text.contains("Version 1"));
    assert!(text.contains("Page 1 of 1"));
    assert!(artifact.media_type.starts_with("text/plain"));
}

#[test]
fn test_unsupported_format() {
    let engine = ExportEngine::default();
    for name in ["xlsx", "html", ""] {
        assert!(matches!(
            engine.export_as(&sample_history(), name),
            Err(Error::UnsupportedFormat(_))
        ));
    }
    assert!(engine.export_as(&sample_history(), "PDF").is_ok());
}

#[test]
fn test_exports_are_deterministic() {
    let history = sample_history();
    for format in ExportFormat::ALL {
        let a = export(&history, format).unwrap();
        let b = export(&history, format).unwrap();
        assert_eq!(a, b, "{format} export should be stable");
    }
}
