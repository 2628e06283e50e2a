//! # cloudwatchlogs – CloudWatch Logs over the AWS Query protocol
//!
//! Typed client for log groups, log streams, retention policies and metric
//! filters. Requests are form-encoded POSTs signed with SigV4; responses
//! are XML documents decoded into typed results.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────┐
//! │  CloudWatchLogsClient  (logs.rs)                 │
//! │  └── one method per action                       │
//! ├──────────────────────────────────────────────────┤
//! │  QueryRequest  (requests.rs)                     │
//! │  ├── validate   (validate.rs)                    │
//! │  └── encode     (params.rs)                      │
//! ├──────────────────────────────────────────────────┤
//! │  QueryTransport  (transport.rs)                  │
//! │  └── HttpTransport: reqwest + SigV4 (signing.rs) │
//! ├──────────────────────────────────────────────────┤
//! │  decode  (response.rs)                           │
//! │  └── element tree  (xml.rs)                      │
//! └──────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use cloudwatchlogs::{ClientConfig, CloudWatchLogsClient, Credentials, LogGroup, Region};
//!
//! # async fn run() -> cloudwatchlogs::CloudWatchLogsResult<()> {
//! let config = ClientConfig::new(Region::new("eu-west-1"), Credentials::new("AKID", "SECRET"));
//! let client = CloudWatchLogsClient::new(config)?;
//! client.create_log_group(&LogGroup::named("/app/web")).await?;
//! client.put_retention_policy(&LogGroup::named("/app/web"), 30).await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod logs;
pub mod model;
pub mod params;
pub mod requests;
pub mod response;
pub mod signing;
pub mod transport;
pub mod validate;
pub mod xml;

pub use config::{ClientConfig, Credentials, Region, RetryConfig};
pub use error::{
    CloudWatchLogsError, CloudWatchLogsResult, DecodeError, ServiceError, TransportError,
    ValidationError,
};
pub use logs::CloudWatchLogsClient;
pub use model::{
    BaseResponse, DescribeLogGroupsRequest, DescribeLogGroupsResponse, InputLogEvent, LogGroup,
    LogStream, MetricFilter, MetricFilterMatchRecord, MetricTransformation, OutputLogEvent,
    RejectedLogEventsInfo, ResponseMetadata,
};
pub use params::QueryParams;
pub use transport::{HttpTransport, QueryTransport, TransportResponse};
