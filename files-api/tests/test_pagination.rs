//! Integration tests for cursor pagination over file listings.
//!
//! ## Running
//!
//! ```bash
//! cargo test -p llmfiles --test test_pagination
//! ```

mod common;

use common::MockGateway;
use futures::StreamExt;
use llmfiles::prelude::*;

fn seed_numbered(gw: &MockGateway, count: usize) {
    for idx in 1..=count {
        gw.seed_file(
            &format!("file-{idx:03}"),
            &format!("f{idx}.jsonl"),
            "fine-tune",
            b"x",
        );
    }
}

/// A limited listing reports has_more and the overall total
#[test_log::test(tokio::test)]
async fn test_first_page() {
    let gw = MockGateway::start().await;
    seed_numbered(&gw, 5);
    let client = gw.client();

    let page = client.files().limit(2).list().await.expect("list");
    assert_eq!(page.len(), 2);
    assert!(page.has_more);
    assert_eq!(page.total, 5);
    // newest first
    assert_eq!(page.data[0].id, "file-005");
    assert_eq!(page.data[1].id, "file-004");

    gw.shutdown().await;
}

/// collect_all follows the after cursor until has_more is false
#[test_log::test(tokio::test)]
async fn test_collect_all() {
    let gw = MockGateway::start().await;
    seed_numbered(&gw, 5);
    let client = gw.client();

    let all = client
        .files()
        .limit(2)
        .list()
        .await
        .expect("list")
        .collect_all()
        .await
        .expect("collect");

    let ids: Vec<&str> = all.iter().map(|file| file.id.as_str()).collect();
    assert_eq!(
        ids,
        vec!["file-005", "file-004", "file-003", "file-002", "file-001"]
    );

    // three pages: no cursor, after=file-004, after=file-002
    let queries: Vec<String> = gw.requests().iter().map(|req| req.query.clone()).collect();
    assert_eq!(queries.len(), 3);
    assert_eq!(queries[0], "limit=2");
    assert_eq!(queries[1], "limit=2&after=file-004");
    assert_eq!(queries[2], "limit=2&after=file-002");

    gw.shutdown().await;
}

/// into_stream yields every file across pages, in order
#[test_log::test(tokio::test)]
async fn test_into_stream() {
    let gw = MockGateway::start().await;
    seed_numbered(&gw, 7);
    let client = gw.client();

    let stream = client
        .files()
        .limit(3)
        .list()
        .await
        .expect("list")
        .into_stream();
    let ids: Vec<String> = stream
        .map(|file| file.expect("stream item").id)
        .collect()
        .await;

    assert_eq!(ids.len(), 7);
    assert_eq!(ids.first().map(String::as_str), Some("file-007"));
    assert_eq!(ids.last().map(String::as_str), Some("file-001"));

    gw.shutdown().await;
}

/// Ascending order reverses the walk; the cursor still follows
#[test_log::test(tokio::test)]
async fn test_ascending_order() {
    let gw = MockGateway::start().await;
    seed_numbered(&gw, 4);
    let client = gw.client();

    let all = client
        .files()
        .limit(3)
        .order(SortOrder::Asc)
        .list()
        .await
        .expect("list")
        .collect_all()
        .await
        .expect("collect");

    let ids: Vec<&str> = all.iter().map(|file| file.id.as_str()).collect();
    assert_eq!(ids, vec!["file-001", "file-002", "file-003", "file-004"]);

    gw.shutdown().await;
}

/// Resuming from an explicit cursor skips earlier files
#[test_log::test(tokio::test)]
async fn test_explicit_after() {
    let gw = MockGateway::start().await;
    seed_numbered(&gw, 4);
    let client = gw.client();

    let page = client
        .files()
        .after("file-003")
        .list()
        .await
        .expect("list");
    let ids: Vec<&str> = page.iter().map(|file| file.id.as_str()).collect();
    // newest first: file-003 is followed by file-002 and file-001
    assert_eq!(ids, vec!["file-002", "file-001"]);
    assert!(!page.has_more);

    gw.shutdown().await;
}

/// A mid-stream gateway failure surfaces as one Err, then the stream ends
#[test_log::test(tokio::test)]
async fn test_stream_error_stops() {
    let gw = MockGateway::start().await;
    seed_numbered(&gw, 4);
    let client = gw.client();

    let page = client.files().limit(2).list().await.expect("list");
    gw.force_status(500);

    let results: Vec<Result<File, FilesError>> = page.into_stream().collect().await;
    // two good items from the first page, then the refill error
    assert_eq!(results.len(), 3);
    assert!(results[0].is_ok());
    assert!(results[1].is_ok());
    assert!(matches!(results[2], Err(FilesError::ApiError { .. })));

    gw.shutdown().await;
}
