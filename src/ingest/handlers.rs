use std::sync::Arc;

use axum::{Extension, Json, body::Body, http::StatusCode};
use futures::StreamExt;

use super::protocol::{CollisionRecord, StatsResponse, SubmitResponse};
use crate::node::{NodeContext, PROGRESS_INTERVAL};

/// Unary submission: one record, one acknowledgment.
///
/// The record is routed (local insert or a single downstream call) and the
/// caller is acknowledged with success. A failed forward does not fail this
/// request; see `NodeContext::process_record`.
pub async fn handle_submit(
    Extension(ctx): Extension<Arc<NodeContext>>,
    Json(record): Json<CollisionRecord>,
) -> (StatusCode, Json<SubmitResponse>) {
    tracing::debug!(
        "received record (unary): crash_date={} crash_time={}",
        record.crash_date,
        record.crash_time
    );
    ctx.process_record(&record).await;

    (
        StatusCode::OK,
        Json(SubmitResponse {
            success: true,
            message: "record processed successfully".to_string(),
        }),
    )
}

/// Streamed submission: an NDJSON body, processed strictly in arrival order
/// by the single worker owning this stream, then one final acknowledgment
/// embedding the count of records processed.
pub async fn handle_submit_stream(
    Extension(ctx): Extension<Arc<NodeContext>>,
    body: Body,
) -> (StatusCode, Json<SubmitResponse>) {
    let mut chunks = body.into_data_stream();
    let mut buffered: Vec<u8> = Vec::new();
    let mut count: u64 = 0;

    while let Some(chunk) = chunks.next().await {
        let chunk = match chunk {
            Ok(chunk) => chunk,
            Err(err) => {
                tracing::error!("stream aborted after {} records: {}", count, err);
                return (
                    StatusCode::BAD_REQUEST,
                    Json(SubmitResponse {
                        success: false,
                        message: format!("stream aborted after {} records", count),
                    }),
                );
            }
        };
        buffered.extend_from_slice(&chunk);

        while let Some(newline) = buffered.iter().position(|&byte| byte == b'\n') {
            let line: Vec<u8> = buffered.drain(..=newline).collect();
            match process_line(&ctx, &line[..line.len() - 1], &mut count).await {
                Ok(()) => {}
                Err(response) => return response,
            }
        }
    }

    // A final record may arrive without a trailing newline.
    let trailing = std::mem::take(&mut buffered);
    if let Err(response) = process_line(&ctx, &trailing, &mut count).await {
        return response;
    }

    (
        StatusCode::OK,
        Json(SubmitResponse {
            success: true,
            message: format!("stream processed successfully: {} records received", count),
        }),
    )
}

/// Decodes and processes one NDJSON line. Blank lines are skipped.
async fn process_line(
    ctx: &NodeContext,
    line: &[u8],
    count: &mut u64,
) -> Result<(), (StatusCode, Json<SubmitResponse>)> {
    if line.iter().all(|byte| byte.is_ascii_whitespace()) {
        return Ok(());
    }

    let record: CollisionRecord = match serde_json::from_slice(line) {
        Ok(record) => record,
        Err(err) => {
            tracing::error!("failed to decode record {} in stream: {}", *count + 1, err);
            return Err((
                StatusCode::BAD_REQUEST,
                Json(SubmitResponse {
                    success: false,
                    message: format!("malformed record at position {}", *count + 1),
                }),
            ));
        }
    };

    ctx.process_record(&record).await;
    *count += 1;
    if *count % PROGRESS_INTERVAL == 0 {
        tracing::info!("processed {} records in this stream", count);
    }
    Ok(())
}

/// Counter snapshot for observability.
pub async fn handle_stats(Extension(ctx): Extension<Arc<NodeContext>>) -> Json<StatsResponse> {
    Json(ctx.stats.snapshot())
}
