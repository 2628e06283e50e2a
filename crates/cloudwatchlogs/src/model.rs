//! CloudWatch Logs data model.
//!
//! Entities double as operation inputs: a create or delete call reads only
//! the identity fields (names) and ignores the service-populated ones.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ── Entities ────────────────────────────────────────────────────────────

/// A log container, unique by name within an account and region.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogGroup {
    pub log_group_name: String,
    pub arn: String,
    pub creation_time: Option<DateTime<Utc>>,
    pub retention_in_days: Option<u32>,
    pub metric_filter_count: u64,
    pub stored_bytes: u64,
}

impl LogGroup {
    pub fn named(name: &str) -> Self {
        Self {
            log_group_name: name.to_string(),
            ..Self::default()
        }
    }
}

/// An ordered event sequence inside one log group.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogStream {
    pub log_stream_name: String,
    pub arn: String,
    pub creation_time: Option<DateTime<Utc>>,
    pub first_event_timestamp: Option<DateTime<Utc>>,
    pub last_event_timestamp: Option<DateTime<Utc>>,
    pub last_ingestion_time: Option<DateTime<Utc>>,
    pub stored_bytes: u64,
    /// Opaque token required by the next ingestion call for this stream.
    pub upload_sequence_token: String,
}

impl LogStream {
    pub fn named(name: &str) -> Self {
        Self {
            log_stream_name: name.to_string(),
            ..Self::default()
        }
    }
}

/// One metric emission of a metric filter. Position in the owning list
/// decides the wire index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricTransformation {
    pub metric_name: String,
    pub metric_namespace: String,
    pub metric_value: String,
}

impl MetricTransformation {
    pub fn new(name: &str, namespace: &str, value: &str) -> Self {
        Self {
            metric_name: name.to_string(),
            metric_namespace: namespace.to_string(),
            metric_value: value.to_string(),
        }
    }
}

/// A pattern over log events that emits metrics on match.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricFilter {
    pub filter_name: String,
    pub filter_pattern: String,
    pub creation_time: Option<DateTime<Utc>>,
    pub metric_transformations: Vec<MetricTransformation>,
}

impl MetricFilter {
    pub fn new(name: &str, pattern: &str, transformations: Vec<MetricTransformation>) -> Self {
        Self {
            filter_name: name.to_string(),
            filter_pattern: pattern.to_string(),
            creation_time: None,
            metric_transformations: transformations,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputLogEvent {
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputLogEvent {
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub ingestion_time: DateTime<Utc>,
}

/// One event matched by a filter pattern under test, with the values the
/// pattern extracted, keyed by `$field` name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricFilterMatchRecord {
    pub event_message: String,
    pub event_number: u64,
    pub extracted_values: BTreeMap<String, String>,
}

/// Index boundaries of events rejected from a partially accepted batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectedLogEventsInfo {
    pub expired_log_event_end_index: Option<u64>,
    pub too_new_log_event_start_index: Option<u64>,
    pub too_old_log_event_end_index: Option<u64>,
}

// ── Operation inputs ────────────────────────────────────────────────────

/// Input of `DescribeLogGroups`. Empty strings and `None` are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescribeLogGroupsRequest {
    pub limit: Option<u32>,
    pub log_group_name_prefix: String,
    /// Cursor from a previous page, passed back unchanged.
    pub next_token: String,
}

impl DescribeLogGroupsRequest {
    /// Request for the page following `previous`.
    pub fn next_page(&self, previous: &DescribeLogGroupsResponse) -> Option<Self> {
        if !previous.has_more() {
            return None;
        }
        Some(Self {
            next_token: previous.next_token.clone(),
            ..self.clone()
        })
    }
}

// ── Results ─────────────────────────────────────────────────────────────

/// Trailer common to every response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseMetadata {
    pub request_id: String,
}

/// Result of operations that return only response metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseResponse {
    pub response_metadata: ResponseMetadata,
}

impl BaseResponse {
    pub fn request_id(&self) -> &str {
        &self.response_metadata.request_id
    }
}

/// One page of `DescribeLogGroups`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DescribeLogGroupsResponse {
    /// Groups in the order the service returned them.
    pub log_groups: Vec<LogGroup>,
    /// Opaque cursor; empty when there are no further pages.
    pub next_token: String,
    pub response_metadata: ResponseMetadata,
}

impl DescribeLogGroupsResponse {
    pub fn has_more(&self) -> bool {
        !self.next_token.is_empty()
    }
}
