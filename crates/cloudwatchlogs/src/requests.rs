//! Per-operation request descriptors.
//!
//! A descriptor borrows the caller's entities, knows its wire action,
//! checks its preconditions and writes its fields into a [`QueryParams`].
//! Wire keys are shared across operations: a group's name is always
//! `LogGroupName`, whichever action carries it.

use crate::error::ValidationError;
use crate::model::{DescribeLogGroupsRequest, LogGroup, LogStream, MetricFilter};
use crate::params::QueryParams;
use crate::validate;

/// An operation that can be validated and flattened into wire parameters.
pub trait QueryRequest {
    /// Value of the `Action` parameter.
    const ACTION: &'static str;

    fn validate(&self) -> Result<(), ValidationError>;

    /// Write operation fields; `Action` and `Version` are already present.
    fn encode(&self, params: &mut QueryParams);

    /// Validate, then encode into a fresh parameter set.
    fn to_params(&self) -> Result<QueryParams, ValidationError> {
        self.validate()?;
        let mut params = QueryParams::new(Self::ACTION);
        self.encode(&mut params);
        Ok(params)
    }
}

fn put_group(params: &mut QueryParams, group: &LogGroup) {
    params.insert("LogGroupName", group.log_group_name.as_str());
}

fn put_stream(params: &mut QueryParams, stream: &LogStream) {
    params.insert("LogStreamName", stream.log_stream_name.as_str());
}

#[derive(Debug, Clone, Copy)]
pub struct CreateLogGroup<'a> {
    pub log_group: &'a LogGroup,
}

impl QueryRequest for CreateLogGroup<'_> {
    const ACTION: &'static str = "CreateLogGroup";

    fn validate(&self) -> Result<(), ValidationError> {
        validate::log_group(self.log_group)
    }

    fn encode(&self, params: &mut QueryParams) {
        put_group(params, self.log_group);
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DeleteLogGroup<'a> {
    pub log_group: &'a LogGroup,
}

impl QueryRequest for DeleteLogGroup<'_> {
    const ACTION: &'static str = "DeleteLogGroup";

    fn validate(&self) -> Result<(), ValidationError> {
        validate::log_group(self.log_group)
    }

    fn encode(&self, params: &mut QueryParams) {
        put_group(params, self.log_group);
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CreateLogStream<'a> {
    pub log_group: &'a LogGroup,
    pub log_stream: &'a LogStream,
}

impl QueryRequest for CreateLogStream<'_> {
    const ACTION: &'static str = "CreateLogStream";

    fn validate(&self) -> Result<(), ValidationError> {
        validate::log_stream(self.log_group, self.log_stream)
    }

    fn encode(&self, params: &mut QueryParams) {
        put_group(params, self.log_group);
        put_stream(params, self.log_stream);
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DeleteLogStream<'a> {
    pub log_group: &'a LogGroup,
    pub log_stream: &'a LogStream,
}

impl QueryRequest for DeleteLogStream<'_> {
    const ACTION: &'static str = "DeleteLogStream";

    fn validate(&self) -> Result<(), ValidationError> {
        validate::log_stream(self.log_group, self.log_stream)
    }

    fn encode(&self, params: &mut QueryParams) {
        put_group(params, self.log_group);
        put_stream(params, self.log_stream);
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DeleteMetricFilter<'a> {
    pub log_group: &'a LogGroup,
    pub metric_filter: &'a MetricFilter,
}

impl QueryRequest for DeleteMetricFilter<'_> {
    const ACTION: &'static str = "DeleteMetricFilter";

    fn validate(&self) -> Result<(), ValidationError> {
        validate::metric_filter_name(self.log_group, self.metric_filter)
    }

    fn encode(&self, params: &mut QueryParams) {
        put_group(params, self.log_group);
        params.insert("FilterName", self.metric_filter.filter_name.as_str());
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PutMetricFilter<'a> {
    pub log_group: &'a LogGroup,
    pub metric_filter: &'a MetricFilter,
}

impl QueryRequest for PutMetricFilter<'_> {
    const ACTION: &'static str = "PutMetricFilter";

    fn validate(&self) -> Result<(), ValidationError> {
        validate::metric_filter(self.log_group, self.metric_filter)
    }

    fn encode(&self, params: &mut QueryParams) {
        let filter = self.metric_filter;
        put_group(params, self.log_group);
        params.insert("FilterName", filter.filter_name.as_str());
        params.insert("FilterPattern", filter.filter_pattern.as_str());
        params.insert_members(
            "MetricTransformations",
            &filter.metric_transformations,
            |p, prefix, t| {
                p.insert(format!("{}.MetricName", prefix), t.metric_name.as_str());
                p.insert(format!("{}.MetricNamespace", prefix), t.metric_namespace.as_str());
                p.insert(format!("{}.MetricValue", prefix), t.metric_value.as_str());
            },
        );
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PutRetentionPolicy<'a> {
    pub log_group: &'a LogGroup,
    pub retention_in_days: i64,
}

impl QueryRequest for PutRetentionPolicy<'_> {
    const ACTION: &'static str = "PutRetentionPolicy";

    fn validate(&self) -> Result<(), ValidationError> {
        validate::retention_policy(self.log_group, self.retention_in_days)
    }

    fn encode(&self, params: &mut QueryParams) {
        put_group(params, self.log_group);
        params.insert("RetentionInDays", self.retention_in_days.to_string());
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DeleteRetentionPolicy<'a> {
    pub log_group: &'a LogGroup,
}

impl QueryRequest for DeleteRetentionPolicy<'_> {
    const ACTION: &'static str = "DeleteRetentionPolicy";

    fn validate(&self) -> Result<(), ValidationError> {
        validate::log_group(self.log_group)
    }

    fn encode(&self, params: &mut QueryParams) {
        put_group(params, self.log_group);
    }
}

impl QueryRequest for DescribeLogGroupsRequest {
    const ACTION: &'static str = "DescribeLogGroups";

    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }

    fn encode(&self, params: &mut QueryParams) {
        params.insert_opt_num("Limit", self.limit);
        params.insert_non_empty("LogGroupNamePrefix", &self.log_group_name_prefix);
        params.insert_non_empty("NextToken", &self.next_token);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MetricTransformation;

    #[test]
    fn create_log_stream_encodes_both_names() {
        let g = LogGroup::named("someLogGroupName");
        let s = LogStream::named("someLogStreamName");
        let params = CreateLogStream {
            log_group: &g,
            log_stream: &s,
        }
        .to_params()
        .unwrap();
        assert_eq!(params.get("Action"), Some("CreateLogStream"));
        assert_eq!(params.get("Version"), Some("2014-03-28"));
        assert_eq!(params.get("LogGroupName"), Some("someLogGroupName"));
        assert_eq!(params.get("LogStreamName"), Some("someLogStreamName"));
        assert_eq!(params.len(), 4);
    }

    #[test]
    fn put_metric_filter_indexes_from_one() {
        let g = LogGroup::named("g");
        let f = MetricFilter::new(
            "f",
            "[ip, user, ...]",
            vec![
                MetricTransformation::new("A", "NS-A", "1"),
                MetricTransformation::new("B", "NS-B", "$bytes"),
                MetricTransformation::new("C", "NS-C", "3"),
            ],
        );
        let params = PutMetricFilter {
            log_group: &g,
            metric_filter: &f,
        }
        .to_params()
        .unwrap();

        assert_eq!(params.get("FilterName"), Some("f"));
        assert_eq!(params.get("FilterPattern"), Some("[ip, user, ...]"));
        for (i, t) in f.metric_transformations.iter().enumerate() {
            let prefix = format!("MetricTransformations.member.{}", i + 1);
            assert_eq!(params.get(&format!("{}.MetricName", prefix)), Some(t.metric_name.as_str()));
            assert_eq!(
                params.get(&format!("{}.MetricNamespace", prefix)),
                Some(t.metric_namespace.as_str())
            );
            assert_eq!(params.get(&format!("{}.MetricValue", prefix)), Some(t.metric_value.as_str()));
        }
        assert!(!params.contains_key("MetricTransformations.member.0.MetricName"));
        assert!(!params.contains_key("MetricTransformations.member.4.MetricName"));
        // Action, Version, LogGroupName, FilterName, FilterPattern + 3 x 3
        assert_eq!(params.len(), 14);
    }

    #[test]
    fn put_metric_filter_without_transformations_is_rejected() {
        let g = LogGroup::named("g");
        let f = MetricFilter::new("f", "p", vec![]);
        let err = PutMetricFilter {
            log_group: &g,
            metric_filter: &f,
        }
        .to_params()
        .unwrap_err();
        assert_eq!(err.to_string(), "No MetricTransformations supplied");
    }

    #[test]
    fn retention_encodes_decimal() {
        let g = LogGroup::named("g");
        let params = PutRetentionPolicy {
            log_group: &g,
            retention_in_days: 3653,
        }
        .to_params()
        .unwrap();
        assert_eq!(params.get("RetentionInDays"), Some("3653"));
    }

    #[test]
    fn describe_log_groups_full() {
        let req = DescribeLogGroupsRequest {
            limit: Some(123),
            log_group_name_prefix: "someLogGroupNamePrefix".into(),
            next_token: "someNextToken".into(),
        };
        let params = req.to_params().unwrap();
        assert_eq!(params.get("Limit"), Some("123"));
        assert_eq!(params.get("LogGroupNamePrefix"), Some("someLogGroupNamePrefix"));
        assert_eq!(params.get("NextToken"), Some("someNextToken"));
    }

    #[test]
    fn describe_log_groups_omits_unset_fields() {
        let params = DescribeLogGroupsRequest::default().to_params().unwrap();
        assert_eq!(params.len(), 2);
        assert_eq!(params.action(), "DescribeLogGroups");
    }

    #[test]
    fn delete_metric_filter_sends_name_only() {
        let g = LogGroup::named("g");
        let f = MetricFilter {
            filter_name: "f".into(),
            ..MetricFilter::default()
        };
        let params = DeleteMetricFilter {
            log_group: &g,
            metric_filter: &f,
        }
        .to_params()
        .unwrap();
        assert_eq!(params.get("FilterName"), Some("f"));
        assert!(!params.contains_key("FilterPattern"));
    }
}
