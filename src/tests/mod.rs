use chrono::Utc;
use serde_json::json;

use crate::export::{self, ExportFormat};
use crate::fetch::{FileSource, HttpSource, RecordStore};
use crate::model::{DateStyle, Record};
use crate::table::{PageSize, ViewState};

fn record(id: usize, title: &str) -> Record {
    Record {
        id: Some(json!(id)),
        title: Some(json!(title)),
        description: Some(json!(format!("about {title}"))),
        status_name: Some(json!("Active")),
        category_name: Some(json!("General")),
        date_column: Some(json!("2024-06-30T12:00:00Z")),
    }
}

fn numbered(count: usize) -> Vec<Record> {
    (1..=count).map(|i| record(i, &format!("Entry {i}"))).collect()
}

#[test]
fn alpha_beta_search_scenario() {
    let state = ViewState::new()
        .loaded(vec![record(1, "Alpha"), record(2, "Beta")])
        .with_page_size(PageSize::Ten)
        .with_search("al");
    let visible = state.current_items();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].title_text(), "Alpha");
}

#[test]
fn twenty_three_records_third_page() {
    let state = ViewState::new().loaded(numbered(23)).with_page(3);
    assert_eq!(state.total_pages(), 3);
    let ids: Vec<String> = state.current_items().iter().map(|r| r.id_text()).collect();
    assert_eq!(ids, vec!["21", "22", "23"]);
}

#[test]
fn page_size_change_resets_from_any_page() {
    let state = ViewState::new().loaded(numbered(23)).with_page(3);
    assert_eq!(state.with_page_size(PageSize::Twenty).current_page(), 1);
}

#[test]
fn empty_page_exports_header_only_csv() {
    let state = ViewState::new().loaded(Vec::new());
    let bytes = export::export_page(
        ExportFormat::Csv,
        &state.current_items(),
        &DateStyle::default(),
        &Utc,
    )
    .unwrap();
    assert_eq!(
        String::from_utf8(bytes).unwrap(),
        "ID,Title,Description,Status,Category,Date\n"
    );
    let pages = export::pdf::layout_pages(&[]);
    assert_eq!(pages.len(), 1);
    assert!(pages[0].body.is_empty());
}

#[test]
fn exports_follow_the_visible_page_only() {
    let state = ViewState::new()
        .loaded(numbered(30))
        .with_page_size(PageSize::Five)
        .with_search("entry 2")
        .with_page(2);
    // Entry 2, Entry 20..29 -> 11 matches, page 2 holds Entry 24..28
    let rows = export::project_rows(&state.current_items(), &DateStyle::default(), &Utc);
    let titles: Vec<&str> = rows.iter().map(|r| r.cells[1].as_str()).collect();
    assert_eq!(
        titles,
        vec!["Entry 24", "Entry 25", "Entry 26", "Entry 27", "Entry 28"]
    );
    assert!(rows.iter().all(|r| r.cells[5] == "6/30/2024"));
}

#[tokio::test]
async fn failed_fetch_renders_as_empty_table() {
    let source = HttpSource::new("http://127.0.0.1:9/data", 1).unwrap();
    let store = RecordStore::new().load(&source).await;
    assert!(!store.is_loading());
    let state = ViewState::new().loaded(store.into_records());
    assert!(state.current_items().is_empty());
    assert_eq!(state.total_pages(), 0);
}

#[tokio::test]
async fn file_payload_flows_through_to_export() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("records.json");
    std::fs::write(
        &input,
        r#"[
            {"id": 1, "title": "Quarterly, report", "description": "q1", "status_name": "Done", "category_name": "Finance", "date_column": "2024-01-15"},
            {"id": 2, "title": "Roadmap", "description": null, "status_name": "Open", "category_name": "Product"},
            {"id": 3, "description": "no title", "status_name": "Open"}
        ]"#,
    )
    .unwrap();

    let store = RecordStore::new().load(&FileSource::new(&input)).await;
    let state = ViewState::new().loaded(store.into_records()).with_search("R");
    assert_eq!(state.filtered().len(), 2);

    let bytes = export::export_page(
        ExportFormat::Csv,
        &state.current_items(),
        &DateStyle::default(),
        &Utc,
    )
    .unwrap();
    let path = export::save_export(ExportFormat::Csv, &bytes, dir.path()).unwrap();
    let csv = std::fs::read_to_string(path).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[1], "1,\"Quarterly, report\",q1,Done,Finance,1/15/2024");
    assert_eq!(lines[2], "2,Roadmap,,Open,Product,");
}
