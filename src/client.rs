//! Outbound side of the ingest contract.
//!
//! A node uses [`IngestClient`] to forward records to its children; external
//! feeders use the same client to drive records into the tree, so the whole
//! system speaks one contract in both directions.
//!
//! The date/time helpers normalize the raw CSV representations of the two
//! partition keys ("MM/DD/YYYY" and "HH:MM") into the integer forms carried
//! on the wire. Rows that fail to normalize are for the feeder to skip.

use std::time::Duration;

use crate::ingest::protocol::{
    CollisionRecord, ENDPOINT_SUBMIT, ENDPOINT_SUBMIT_STREAM, SubmitResponse,
};

/// HTTP client for one ingest endpoint (a child node, or the tree root).
pub struct IngestClient {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl IngestClient {
    /// `addr` is `host:port`; `timeout` is the per-call deadline applied to
    /// unary submissions.
    pub fn new(addr: &str, timeout: Duration) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: format!("http://{}", addr),
            timeout,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Submits one record and returns the server's acknowledgment.
    ///
    /// One attempt, no retries: the caller decides what a failure means.
    pub async fn submit(&self, record: &CollisionRecord) -> Result<SubmitResponse, reqwest::Error> {
        let response = self
            .http
            .post(format!("{}{}", self.base_url, ENDPOINT_SUBMIT))
            .json(record)
            .timeout(self.timeout)
            .send()
            .await?
            .error_for_status()?;
        response.json().await
    }

    /// Drives a sequence of records through one streamed submission.
    ///
    /// Records are serialized lazily into an NDJSON request body, one per
    /// line; the returned acknowledgment embeds the count the server
    /// processed. No per-call deadline is applied, a stream lives as long as
    /// the feeder keeps producing.
    pub async fn submit_stream<I>(&self, records: I) -> Result<SubmitResponse, reqwest::Error>
    where
        I: IntoIterator<Item = CollisionRecord>,
        I::IntoIter: Send + 'static,
    {
        let lines = records.into_iter().map(|record| {
            let mut line = serde_json::to_vec(&record).map_err(std::io::Error::other)?;
            line.push(b'\n');
            Ok::<_, std::io::Error>(line)
        });

        let response = self
            .http
            .post(format!("{}{}", self.base_url, ENDPOINT_SUBMIT_STREAM))
            .body(reqwest::Body::wrap_stream(futures::stream::iter(lines)))
            .send()
            .await?
            .error_for_status()?;
        response.json().await
    }
}

/// Normalizes "MM/DD/YYYY" to the integer YYYYMMDD.
pub fn parse_date(raw: &str) -> Option<i64> {
    let digits: String = raw.chars().filter(|&c| c != '/').collect();
    if digits.len() != 8 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    // Rearrange MMDDYYYY -> YYYYMMDD.
    let (month_day, year) = digits.split_at(4);
    let (month, day) = month_day.split_at(2);
    format!("{year}{month}{day}").parse().ok()
}

/// Normalizes "HH:MM" (or "H:MM") to the integer HHMM.
pub fn parse_time(raw: &str) -> Option<i64> {
    let (hour, minute) = raw.split_once(':')?;
    let digits = if hour.len() == 1 {
        format!("0{hour}{minute}")
    } else {
        format!("{hour}{minute}")
    };
    if !(3..=4).contains(&digits.len()) || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
