//! End-to-end pagination sessions against scripted pages.

mod common;

use common::{empty_page, names, page_with_counter, results_page, RecordingSink, ScriptedPage};
use farmacie::error::ExtractError;
use farmacie::extract::{
    NextControl, PageReader, ProgressState, RecordStore, Session, SessionOptions, SessionStatus,
    StopReason, StuckReason,
};

#[tokio::test(start_paused = true)]
async fn test_two_pages_complete() {
    let page = ScriptedPage::new(vec![
        results_page(&["A", "B", "C", "D", "E"], 1, 5, 10),
        results_page(&["F", "G", "H", "I", "J"], 6, 10, 10),
    ]);
    let reader = PageReader::default();

    let result = Session::new(&page, &reader, SessionOptions::default())
        .run(RecordStore::new())
        .await
        .unwrap();

    assert_eq!(result.status, SessionStatus::Complete);
    assert_eq!(
        names(&result.records),
        ["A", "B", "C", "D", "E", "F", "G", "H", "I", "J"]
    );
    assert_eq!(result.pages, 2);
    assert_eq!(result.last_progress, Some(ProgressState { end: 10, total: 10 }));
    assert_eq!(page.clicks(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_unresponsive_next_keeps_partial() {
    let page = ScriptedPage::new(vec![
        results_page(&["A", "B", "C", "D", "E", "F"], 1, 6, 12),
        results_page(&["G", "H", "I", "J", "K", "L"], 7, 12, 12),
    ])
    .frozen_from(0);
    let reader = PageReader::default();

    let result = Session::new(&page, &reader, SessionOptions::default())
        .run(RecordStore::new())
        .await
        .unwrap();

    assert_eq!(result.records.len(), 6);
    assert_eq!(
        result.status,
        SessionStatus::StuckPartial(StopReason::Advance(StuckReason::RetriesExhausted {
            attempts: 7
        }))
    );
    assert!(!result.is_complete());
    assert_eq!(page.clicks(), 7);
}

#[tokio::test(start_paused = true)]
async fn test_single_page_needs_no_click() {
    let page = ScriptedPage::new(vec![results_page(&["A", "B", "C"], 1, 3, 3)]);
    let reader = PageReader::default();

    let result = Session::new(&page, &reader, SessionOptions::default())
        .run(RecordStore::new())
        .await
        .unwrap();

    assert!(result.is_complete());
    assert_eq!(result.records.len(), 3);
    assert_eq!(page.clicks(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_missing_control_ends_partial() {
    let page = ScriptedPage::new(vec![
        results_page(&["A", "B"], 1, 2, 4),
        results_page(&["C", "D"], 3, 4, 4),
    ])
    .control(NextControl::Missing);
    let reader = PageReader::default();

    let result = Session::new(&page, &reader, SessionOptions::default())
        .run(RecordStore::new())
        .await
        .unwrap();

    assert_eq!(
        result.status,
        SessionStatus::StuckPartial(StopReason::Advance(StuckReason::NoControl))
    );
    assert_eq!(names(&result.records), ["A", "B"]);
    assert_eq!(page.clicks(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_overlapping_pages_are_deduplicated() {
    let page = ScriptedPage::new(vec![
        results_page(&["A", "B", "C", "D", "E"], 1, 5, 9),
        results_page(&["E", "F", "G", "H", "I"], 5, 9, 9),
    ]);
    let reader = PageReader::default();
    let sink = RecordingSink::default();

    let result = Session::new(&page, &reader, SessionOptions::default())
        .with_sink(&sink)
        .run(RecordStore::new())
        .await
        .unwrap();

    assert!(result.is_complete());
    assert_eq!(
        names(&result.records),
        ["A", "B", "C", "D", "E", "F", "G", "H", "I"]
    );

    let reports = sink.reports.lock().unwrap();
    assert_eq!(reports.len(), 2);
    assert_eq!((reports[1].rows, reports[1].added, reports[1].stored), (5, 4, 9));
    assert_eq!(*sink.status.lock().unwrap(), Some(SessionStatus::Complete));
}

#[tokio::test(start_paused = true)]
async fn test_existing_store_is_extended() {
    let page = ScriptedPage::new(vec![results_page(&["A", "B"], 1, 2, 2)]);
    let reader = PageReader::default();

    let mut store = RecordStore::new();
    store.add(vec![farmacie::models::Record::from_cells(common::cells("B"))]);

    let result = Session::new(&page, &reader, SessionOptions::default())
        .run(store)
        .await
        .unwrap();

    assert_eq!(names(&result.records), ["B", "A"]);
}

#[tokio::test(start_paused = true)]
async fn test_changed_total_is_followed() {
    let page = ScriptedPage::new(vec![
        results_page(&["A", "B"], 1, 2, 6),
        results_page(&["C", "D"], 3, 4, 4),
    ]);
    let reader = PageReader::default();

    let result = Session::new(&page, &reader, SessionOptions::default())
        .run(RecordStore::new())
        .await
        .unwrap();

    assert!(result.is_complete());
    assert_eq!(result.last_progress, Some(ProgressState { end: 4, total: 4 }));
}

#[tokio::test(start_paused = true)]
async fn test_page_limit() {
    let page = ScriptedPage::new(vec![
        results_page(&["A", "B"], 1, 2, 6),
        results_page(&["C", "D"], 3, 4, 6),
        results_page(&["E", "F"], 5, 6, 6),
    ]);
    let reader = PageReader::default();
    let options = SessionOptions {
        max_pages: Some(2),
        ..SessionOptions::default()
    };

    let result = Session::new(&page, &reader, options)
        .run(RecordStore::new())
        .await
        .unwrap();

    assert_eq!(
        result.status,
        SessionStatus::StuckPartial(StopReason::PageLimit { pages: 2 })
    );
    assert_eq!(names(&result.records), ["A", "B", "C", "D"]);
    assert_eq!(page.clicks(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_missing_table_is_fatal() {
    let page = ScriptedPage::new(vec![empty_page()]);
    let reader = PageReader::default();

    let err = Session::new(&page, &reader, SessionOptions::default())
        .run(RecordStore::new())
        .await
        .unwrap_err();

    assert!(matches!(err.source, ExtractError::TableNotFound));
    assert!(err.partial.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_unreadable_counter_is_fatal_with_partial() {
    let page = ScriptedPage::new(vec![
        results_page(&["A", "B"], 1, 2, 4),
        page_with_counter(&["C", "D"], "risultati: caricamento in corso"),
    ]);
    let reader = PageReader::default();

    let err = Session::new(&page, &reader, SessionOptions::default())
        .run(RecordStore::new())
        .await
        .unwrap_err();

    match err.source {
        ExtractError::ProgressParse { ref text } => assert!(text.contains("caricamento")),
        ref other => panic!("expected counter error, got {:?}", other),
    }
    // Rows of the page are stored before its counter is read.
    assert_eq!(names(err.partial.records()), ["A", "B", "C", "D"]);
    assert!(err.to_string().contains("4 records"));
}
