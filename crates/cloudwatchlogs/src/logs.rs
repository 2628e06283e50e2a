//! CloudWatch Logs client.
//!
//! Every implemented operation runs the same pipeline: validate the input,
//! flatten it into Query parameters, POST them to `/` through the
//! transport, and decode the response into the operation's result shape.
//! A validation failure returns before the transport is touched.
//!
//! Reference: <https://docs.aws.amazon.com/AmazonCloudWatchLogs/latest/APIReference/>

use crate::config::ClientConfig;
use crate::error::{CloudWatchLogsError, CloudWatchLogsResult, TransportError};
use crate::model::{
    BaseResponse, DescribeLogGroupsRequest, DescribeLogGroupsResponse, InputLogEvent, LogGroup,
    LogStream, MetricFilter,
};
use crate::params::QueryParams;
use crate::requests::{
    CreateLogGroup, CreateLogStream, DeleteLogGroup, DeleteLogStream, DeleteMetricFilter,
    DeleteRetentionPolicy, PutMetricFilter, PutRetentionPolicy, QueryRequest,
};
use crate::response::{self, FromQueryXml};
use crate::transport::{HttpTransport, QueryTransport};
use std::fmt;
use std::sync::Arc;

const METHOD: &str = "POST";
const PATH: &str = "/";

/// Stateless CloudWatch Logs client; cheap to clone and share across tasks.
#[derive(Clone)]
pub struct CloudWatchLogsClient {
    transport: Arc<dyn QueryTransport>,
}

impl fmt::Debug for CloudWatchLogsClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CloudWatchLogsClient").finish_non_exhaustive()
    }
}

impl CloudWatchLogsClient {
    /// Build a client backed by the signed HTTP transport.
    pub fn new(config: ClientConfig) -> CloudWatchLogsResult<Self> {
        config.validate().map_err(TransportError::Other)?;
        let transport = HttpTransport::new(&config)?;
        Ok(Self::with_transport(Arc::new(transport)))
    }

    /// Build a client on top of any transport.
    pub fn with_transport(transport: Arc<dyn QueryTransport>) -> Self {
        Self { transport }
    }

    /// Validate and encode `request` without sending it.
    pub fn prepare<R: QueryRequest>(&self, request: &R) -> CloudWatchLogsResult<QueryParams> {
        Ok(request.to_params()?)
    }

    async fn dispatch<R, T>(&self, request: &R) -> CloudWatchLogsResult<T>
    where
        R: QueryRequest + Sync,
        T: FromQueryXml,
    {
        let params = request.to_params()?;
        log::debug!(
            "CloudWatch Logs {}: sending {} parameters",
            R::ACTION,
            params.len()
        );
        let response = self.transport.send(METHOD, PATH, &params).await?;
        log::trace!("CloudWatch Logs {}: HTTP {}", R::ACTION, response.status);
        response::decode(&response)
    }

    // ── Log groups ──────────────────────────────────────────────────

    pub async fn create_log_group(&self, log_group: &LogGroup) -> CloudWatchLogsResult<BaseResponse> {
        self.dispatch(&CreateLogGroup { log_group }).await
    }

    pub async fn delete_log_group(&self, log_group: &LogGroup) -> CloudWatchLogsResult<BaseResponse> {
        self.dispatch(&DeleteLogGroup { log_group }).await
    }

    /// One page of log groups. Pass the returned `next_token` back in the
    /// next request to continue.
    pub async fn describe_log_groups(
        &self,
        request: &DescribeLogGroupsRequest,
    ) -> CloudWatchLogsResult<DescribeLogGroupsResponse> {
        self.dispatch(request).await
    }

    // ── Retention ───────────────────────────────────────────────────

    /// Set the retention of a group. `retention_in_days` must be one of
    /// [`VALID_RETENTION_DAYS`](crate::validate::VALID_RETENTION_DAYS).
    pub async fn put_retention_policy(
        &self,
        log_group: &LogGroup,
        retention_in_days: i64,
    ) -> CloudWatchLogsResult<BaseResponse> {
        self.dispatch(&PutRetentionPolicy {
            log_group,
            retention_in_days,
        })
        .await
    }

    pub async fn delete_retention_policy(
        &self,
        log_group: &LogGroup,
    ) -> CloudWatchLogsResult<BaseResponse> {
        self.dispatch(&DeleteRetentionPolicy { log_group }).await
    }

    // ── Log streams ─────────────────────────────────────────────────

    pub async fn create_log_stream(
        &self,
        log_group: &LogGroup,
        log_stream: &LogStream,
    ) -> CloudWatchLogsResult<BaseResponse> {
        self.dispatch(&CreateLogStream {
            log_group,
            log_stream,
        })
        .await
    }

    pub async fn delete_log_stream(
        &self,
        log_group: &LogGroup,
        log_stream: &LogStream,
    ) -> CloudWatchLogsResult<BaseResponse> {
        self.dispatch(&DeleteLogStream {
            log_group,
            log_stream,
        })
        .await
    }

    // ── Metric filters ──────────────────────────────────────────────

    pub async fn put_metric_filter(
        &self,
        log_group: &LogGroup,
        metric_filter: &MetricFilter,
    ) -> CloudWatchLogsResult<BaseResponse> {
        self.dispatch(&PutMetricFilter {
            log_group,
            metric_filter,
        })
        .await
    }

    pub async fn delete_metric_filter(
        &self,
        log_group: &LogGroup,
        metric_filter: &MetricFilter,
    ) -> CloudWatchLogsResult<BaseResponse> {
        self.dispatch(&DeleteMetricFilter {
            log_group,
            metric_filter,
        })
        .await
    }

    // ── Not bound yet ───────────────────────────────────────────────
    //
    // These actions exist on the wire but have no request or result
    // mapping here. They fail without touching the network rather than
    // returning an empty success.

    pub async fn describe_log_streams(&self, _log_group: &LogGroup) -> CloudWatchLogsResult<BaseResponse> {
        Err(not_implemented("DescribeLogStreams"))
    }

    pub async fn describe_metric_filters(&self, _log_group: &LogGroup) -> CloudWatchLogsResult<BaseResponse> {
        Err(not_implemented("DescribeMetricFilters"))
    }

    pub async fn get_log_events(
        &self,
        _log_group: &LogGroup,
        _log_stream: &LogStream,
    ) -> CloudWatchLogsResult<BaseResponse> {
        Err(not_implemented("GetLogEvents"))
    }

    pub async fn put_log_events(
        &self,
        _log_group: &LogGroup,
        _log_stream: &LogStream,
        _events: &[InputLogEvent],
    ) -> CloudWatchLogsResult<BaseResponse> {
        Err(not_implemented("PutLogEvents"))
    }

    pub async fn test_metric_filter(
        &self,
        _filter_pattern: &str,
        _log_event_messages: &[String],
    ) -> CloudWatchLogsResult<BaseResponse> {
        Err(not_implemented("TestMetricFilter"))
    }
}

fn not_implemented(action: &'static str) -> CloudWatchLogsError {
    CloudWatchLogsError::NotImplemented { action }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Credentials, Region};

    fn client() -> CloudWatchLogsClient {
        CloudWatchLogsClient::new(ClientConfig::new(
            Region::new("us-east-1"),
            Credentials::new("AKID", "secret"),
        ))
        .unwrap()
    }

    #[test]
    fn client_is_send_sync_clone() {
        fn assert_traits<T: Send + Sync + Clone + 'static>() {}
        assert_traits::<CloudWatchLogsClient>();
    }

    #[test]
    fn prepare_validates_without_sending() {
        let c = client();
        let err = c
            .prepare(&CreateLogGroup {
                log_group: &LogGroup::default(),
            })
            .unwrap_err();
        assert_eq!(err.to_string(), "No LogGroupName supplied");

        let params = c
            .prepare(&DeleteRetentionPolicy {
                log_group: &LogGroup::named("g"),
            })
            .unwrap();
        assert_eq!(params.action(), "DeleteRetentionPolicy");
    }

    #[tokio::test]
    async fn unbound_actions_report_not_implemented() {
        let c = client();
        let g = LogGroup::named("g");
        let s = LogStream::named("s");
        let cases = vec![
            c.describe_log_streams(&g).await,
            c.describe_metric_filters(&g).await,
            c.get_log_events(&g, &s).await,
            c.put_log_events(&g, &s, &[]).await,
            c.test_metric_filter("[x]", &[]).await,
        ];
        let actions: Vec<_> = cases
            .into_iter()
            .map(|r| match r {
                Err(CloudWatchLogsError::NotImplemented { action }) => action,
                other => panic!("unexpected {:?}", other),
            })
            .collect();
        assert_eq!(
            actions,
            vec![
                "DescribeLogStreams",
                "DescribeMetricFilters",
                "GetLogEvents",
                "PutLogEvents",
                "TestMetricFilter"
            ]
        );
    }
}
