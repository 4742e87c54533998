//! Ingest Module Tests
//!
//! Exercises the service handlers directly (no live HTTP server), covering
//! unary and streamed submission, counter consistency, and the deliberate
//! success-despite-failed-forward contract.

use std::sync::Arc;

use axum::{Extension, Json, body::Body, http::StatusCode};

use crate::ingest::handlers::{handle_stats, handle_submit, handle_submit_stream};
use crate::ingest::protocol::CollisionRecord;
use crate::node::NodeContext;
use crate::topology::config::TopologyConfig;

fn record(crash_date: i64, crash_time: i64) -> CollisionRecord {
    CollisionRecord {
        crash_date,
        crash_time,
        persons_injured: 1,
        persons_killed: 0,
        pedestrians_injured: 0,
        pedestrians_killed: 0,
        cyclists_injured: 0,
        cyclists_killed: 0,
        motorists_injured: 0,
        motorists_killed: 0,
    }
}

/// A leaf node: 4 buckets, no children, everything rests locally.
fn leaf_context() -> Arc<NodeContext> {
    let config: TopologyConfig = serde_json::from_str(r#"{ "total_partitions": 4 }"#).unwrap();
    Arc::new(NodeContext::new(&config).unwrap())
}

/// A routing node with two unreachable children and the reference table:
/// buckets {0,1,2} -> child 0, {3} -> child 1. Port 9 is not served, so every
/// forward fails fast.
fn tree_context_with_dead_children() -> Arc<NodeContext> {
    let config: TopologyConfig = serde_json::from_str(
        r#"{
            "total_partitions": 4,
            "children": [
                { "ip": "127.0.0.1", "port": 9 },
                { "ip": "127.0.0.1", "port": 9 }
            ],
            "routes": [
                { "bucket": 0, "target": { "child": 0 } },
                { "bucket": 1, "target": { "child": 0 } },
                { "bucket": 2, "target": { "child": 0 } },
                { "bucket": 3, "target": { "child": 1 } }
            ],
            "forward_timeout_ms": 200
        }"#,
    )
    .unwrap();
    Arc::new(NodeContext::new(&config).unwrap())
}

fn ndjson_body(records: &[CollisionRecord]) -> String {
    records
        .iter()
        .map(|r| serde_json::to_string(r).unwrap() + "\n")
        .collect()
}

// ============================================================
// UNARY SUBMISSION
// ============================================================

#[tokio::test]
async fn submit_stores_locally_and_acks() {
    let ctx = leaf_context();

    let (status, Json(ack)) =
        handle_submit(Extension(ctx.clone()), Json(record(20230101, 800))).await;

    assert_eq!(status, StatusCode::OK);
    assert!(ack.success);
    assert_eq!(ctx.store.len(), 1);
    assert_eq!(ctx.stats.processed(), 1);
    assert_eq!(ctx.stats.stored_local(), 1);
}

#[tokio::test]
async fn submit_acks_success_even_when_forward_fails() {
    let ctx = tree_context_with_dead_children();

    // (20230101, 830) pins to bucket 3, which routes to child 1; child 1 is
    // unreachable. The caller must still see success, and the forwarded
    // counter for child 1 must not move.
    let (status, Json(ack)) =
        handle_submit(Extension(ctx.clone()), Json(record(20230101, 830))).await;

    assert_eq!(status, StatusCode::OK);
    assert!(ack.success, "forwarding failure must not fail the caller");
    assert_eq!(ctx.stats.processed(), 1);
    assert_eq!(ctx.stats.forwarded(0), 0);
    assert_eq!(ctx.stats.forwarded(1), 0);
    assert_eq!(ctx.stats.stored_local(), 0, "the record was dropped, not stored");
    assert!(ctx.store.is_empty());
}

// ============================================================
// STREAMED SUBMISSION
// ============================================================

#[tokio::test]
async fn stream_ack_embeds_the_record_count() {
    let ctx = leaf_context();
    let records: Vec<_> = (0..25).map(|i| record(20230101 + i, (i * 37) % 2400)).collect();

    let (status, Json(ack)) =
        handle_submit_stream(Extension(ctx.clone()), Body::from(ndjson_body(&records))).await;

    assert_eq!(status, StatusCode::OK);
    assert!(ack.success);
    assert!(
        ack.message.contains("25 records"),
        "ack should embed the count, got: {}",
        ack.message
    );
    assert_eq!(ctx.store.len(), 25);
    assert_eq!(ctx.stats.processed(), 25);
}

#[tokio::test]
async fn stream_counts_a_final_record_without_newline() {
    let ctx = leaf_context();
    let mut body = ndjson_body(&[record(20230101, 800), record(20230102, 930)]);
    body.push_str(&serde_json::to_string(&record(20230103, 1445)).unwrap());

    let (status, Json(ack)) =
        handle_submit_stream(Extension(ctx.clone()), Body::from(body)).await;

    assert_eq!(status, StatusCode::OK);
    assert!(ack.message.contains("3 records"));
    assert_eq!(ctx.store.len(), 3);
}

#[tokio::test]
async fn stream_skips_blank_lines() {
    let ctx = leaf_context();
    let body = format!(
        "{}\n\n{}\n",
        serde_json::to_string(&record(20230101, 800)).unwrap(),
        serde_json::to_string(&record(20230102, 930)).unwrap()
    );

    let (_, Json(ack)) = handle_submit_stream(Extension(ctx.clone()), Body::from(body)).await;

    assert!(ack.message.contains("2 records"));
    assert_eq!(ctx.store.len(), 2);
}

#[tokio::test]
async fn stream_rejects_a_malformed_record() {
    let ctx = leaf_context();
    let body = format!(
        "{}\nnot a record\n",
        serde_json::to_string(&record(20230101, 800)).unwrap()
    );

    let (status, Json(ack)) =
        handle_submit_stream(Extension(ctx.clone()), Body::from(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(!ack.success);
    assert!(ack.message.contains("position 2"));
    // Records decoded before the failure stay processed.
    assert_eq!(ctx.store.len(), 1);
}

#[tokio::test]
async fn empty_stream_acks_zero_records() {
    let ctx = leaf_context();

    let (status, Json(ack)) =
        handle_submit_stream(Extension(ctx.clone()), Body::from("")).await;

    assert_eq!(status, StatusCode::OK);
    assert!(ack.message.contains("0 records"));
    assert!(ctx.store.is_empty());
}

// ============================================================
// COUNTER CONSISTENCY
// ============================================================

#[tokio::test]
async fn stored_plus_forwarded_equals_processed() {
    // All-local node: every processed record must be accounted for.
    let ctx = leaf_context();
    for i in 0..50 {
        ctx.process_record(&record(20230101 + i, (i * 53) % 2400)).await;
    }

    let stats = ctx.stats.snapshot();
    let forwarded_total: u64 = stats.forwarded.iter().sum();
    assert_eq!(stats.processed, 50);
    assert_eq!(stats.stored_local + forwarded_total, stats.processed);
    assert_eq!(ctx.store.len() as u64, stats.stored_local);
}

#[tokio::test]
async fn stats_handler_snapshots_counters() {
    let ctx = leaf_context();
    ctx.process_record(&record(20230101, 800)).await;
    ctx.process_record(&record(20230101, 830)).await;

    let Json(stats) = handle_stats(Extension(ctx.clone())).await;
    assert_eq!(stats.processed, 2);
    assert_eq!(stats.stored_local, 2);
    assert!(stats.forwarded.is_empty(), "a leaf has no children");
}

#[tokio::test]
async fn concurrent_unary_submissions_are_all_counted() {
    let ctx = leaf_context();

    let handles: Vec<_> = (0..8)
        .map(|worker| {
            let ctx = ctx.clone();
            tokio::spawn(async move {
                for i in 0..50 {
                    handle_submit(
                        Extension(ctx.clone()),
                        Json(record(20230000 + worker, i)),
                    )
                    .await;
                }
            })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(ctx.stats.processed(), 400);
    assert_eq!(ctx.store.len(), 400);
}
