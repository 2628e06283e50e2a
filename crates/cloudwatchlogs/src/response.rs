//! Response decoding.
//!
//! A 2xx body is decoded into the caller's expected result shape; any other
//! status is decoded as an AWS fault document and surfaced as a
//! [`ServiceError`]. Each result shape lists the element paths it reads.
//!
//! Success envelope:
//! ```xml
//! <DescribeLogGroupsResponse xmlns="...">
//!   <DescribeLogGroupsResult>...</DescribeLogGroupsResult>
//!   <ResponseMetadata><RequestId>abc-123</RequestId></ResponseMetadata>
//! </DescribeLogGroupsResponse>
//! ```
//!
//! Fault document:
//! ```xml
//! <ErrorResponse>
//!   <Error><Type>Sender</Type><Code>InvalidParameterException</Code><Message>...</Message></Error>
//!   <RequestId>abc-123</RequestId>
//! </ErrorResponse>
//! ```

use crate::config::SERVICE_NAME;
use crate::error::{CloudWatchLogsError, DecodeError, ServiceError};
use crate::model::{BaseResponse, DescribeLogGroupsResponse, LogGroup, ResponseMetadata};
use crate::transport::TransportResponse;
use crate::xml::{self, XmlElement};
use chrono::{DateTime, TimeZone, Utc};

/// A result shape decodable from a Query-protocol response root.
pub trait FromQueryXml: Sized {
    fn from_query_xml(root: &XmlElement) -> Result<Self, DecodeError>;
}

/// Decode a transport response into `T`, or into the service fault it carries.
pub fn decode<T: FromQueryXml>(response: &TransportResponse) -> Result<T, CloudWatchLogsError> {
    if !response.is_success() {
        return Err(parse_fault(response.status, &response.body, response.request_id.as_deref()).into());
    }
    let root = xml::parse(&response.body)?;
    Ok(T::from_query_xml(&root)?)
}

/// Build a [`ServiceError`] from a fault body. Never fails: an unreadable
/// body still yields an error carrying the status and a fallback message.
pub fn parse_fault(status: u16, body: &[u8], header_request_id: Option<&str>) -> ServiceError {
    let root = xml::parse(body).ok();
    let error = root.as_ref().and_then(|r| {
        if r.name == "Error" {
            Some(r)
        } else {
            r.child("Error")
        }
    });

    let non_empty = |e: Option<&XmlElement>, name: &str| {
        e.and_then(|e| e.text_at(&[name]))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    let code = non_empty(error, "Code").unwrap_or_else(|| "UnknownError".to_string());
    let message = non_empty(error, "Message")
        .unwrap_or_else(|| format!("HTTP {} from {}", status, SERVICE_NAME));
    let fault_type = non_empty(error, "Type");
    let request_id = non_empty(root.as_ref(), "RequestId")
        .or_else(|| non_empty(root.as_ref(), "RequestID"))
        .or_else(|| non_empty(error, "RequestId"))
        .or_else(|| header_request_id.map(str::to_string));

    ServiceError {
        status_code: status,
        code,
        fault_type,
        message,
        request_id,
    }
}

// ── Result shapes ───────────────────────────────────────────────────────

impl FromQueryXml for ResponseMetadata {
    fn from_query_xml(root: &XmlElement) -> Result<Self, DecodeError> {
        let request_id = if root.name == "RequestId" {
            Some(root.text.as_str())
        } else {
            root.text_at(&["ResponseMetadata", "RequestId"])
        };
        Ok(Self {
            request_id: request_id.unwrap_or_default().to_string(),
        })
    }
}

impl FromQueryXml for BaseResponse {
    fn from_query_xml(root: &XmlElement) -> Result<Self, DecodeError> {
        Ok(Self {
            response_metadata: ResponseMetadata::from_query_xml(root)?,
        })
    }
}

impl FromQueryXml for DescribeLogGroupsResponse {
    fn from_query_xml(root: &XmlElement) -> Result<Self, DecodeError> {
        let result = root.child("DescribeLogGroupsResult");
        let log_groups = result
            .and_then(|r| r.child("LogGroups"))
            .map(|groups| {
                groups
                    .children_named("member")
                    .map(log_group)
                    .collect::<Result<Vec<_>, _>>()
            })
            .transpose()?
            .unwrap_or_default();
        let next_token = result
            .and_then(|r| r.text_at(&["NextToken"]))
            .unwrap_or_default()
            .to_string();

        Ok(Self {
            log_groups,
            next_token,
            response_metadata: ResponseMetadata::from_query_xml(root)?,
        })
    }
}

/// `LogGroups/member` → [`LogGroup`].
fn log_group(member: &XmlElement) -> Result<LogGroup, DecodeError> {
    let log_group_name = member
        .text_at(&["LogGroupName"])
        .ok_or_else(|| DecodeError::MissingElement("LogGroupName".to_string()))?
        .to_string();

    Ok(LogGroup {
        log_group_name,
        arn: member.text_at(&["Arn"]).unwrap_or_default().to_string(),
        creation_time: timestamp(member, "CreationTime")?,
        retention_in_days: number(member, "RetentionInDays")?,
        metric_filter_count: number(member, "MetricFilterCount")?.unwrap_or_default(),
        stored_bytes: number(member, "StoredBytes")?.unwrap_or_default(),
    })
}

// ── Scalar helpers ──────────────────────────────────────────────────────

fn number<N: std::str::FromStr>(parent: &XmlElement, name: &str) -> Result<Option<N>, DecodeError> {
    match parent.text_at(&[name]).map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => raw.parse().map(Some).map_err(|_| DecodeError::InvalidValue {
            element: name.to_string(),
            value: raw.to_string(),
            expected: "a non-negative integer",
        }),
    }
}

/// Epoch milliseconds or an RFC 3339 timestamp.
fn timestamp(parent: &XmlElement, name: &str) -> Result<Option<DateTime<Utc>>, DecodeError> {
    let raw = match parent.text_at(&[name]).map(str::trim) {
        None | Some("") => return Ok(None),
        Some(raw) => raw,
    };
    let parsed = match raw.parse::<i64>() {
        Ok(millis) => Utc.timestamp_millis_opt(millis).single(),
        Err(_) => DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|t| t.with_timezone(&Utc)),
    };
    parsed.map(Some).ok_or_else(|| DecodeError::InvalidValue {
        element: name.to_string(),
        value: raw.to_string(),
        expected: "epoch milliseconds or an RFC 3339 timestamp",
    })
}
