//! Client-side request preconditions.
//!
//! Each operation checks its rules in a fixed order and reports the first
//! one violated: group name, then stream or filter name, then filter
//! pattern, then transformations, then retention.

use crate::error::ValidationError;
use crate::model::{LogGroup, LogStream, MetricFilter};
use lazy_static::lazy_static;
use std::collections::HashSet;

/// Retention periods, in days, accepted by `PutRetentionPolicy`.
pub const VALID_RETENTION_DAYS: [u32; 17] = [
    1, 3, 5, 7, 14, 30, 60, 90, 120, 150, 180, 365, 400, 545, 731, 1827, 3653,
];

lazy_static! {
    static ref RETENTION_DAYS: HashSet<u32> = VALID_RETENTION_DAYS.iter().copied().collect();
}

pub fn is_valid_retention(days: i64) -> bool {
    u32::try_from(days)
        .map(|d| RETENTION_DAYS.contains(&d))
        .unwrap_or(false)
}

pub fn log_group(group: &LogGroup) -> Result<(), ValidationError> {
    if group.log_group_name.is_empty() {
        return Err(ValidationError::MissingLogGroupName);
    }
    Ok(())
}

pub fn log_stream(group: &LogGroup, stream: &LogStream) -> Result<(), ValidationError> {
    log_group(group)?;
    if stream.log_stream_name.is_empty() {
        return Err(ValidationError::MissingLogStreamName);
    }
    Ok(())
}

/// Rules for operations addressing a filter by name only.
pub fn metric_filter_name(group: &LogGroup, filter: &MetricFilter) -> Result<(), ValidationError> {
    log_group(group)?;
    if filter.filter_name.is_empty() {
        return Err(ValidationError::MissingFilterName);
    }
    Ok(())
}

/// Rules for operations that create or replace a filter.
pub fn metric_filter(group: &LogGroup, filter: &MetricFilter) -> Result<(), ValidationError> {
    metric_filter_name(group, filter)?;
    if filter.filter_pattern.is_empty() {
        return Err(ValidationError::MissingFilterPattern);
    }
    if filter.metric_transformations.is_empty() {
        return Err(ValidationError::MissingMetricTransformations);
    }
    Ok(())
}

pub fn retention_policy(group: &LogGroup, retention_in_days: i64) -> Result<(), ValidationError> {
    log_group(group)?;
    if !is_valid_retention(retention_in_days) {
        return Err(ValidationError::InvalidRetentionInDays);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MetricTransformation;

    fn full_filter() -> MetricFilter {
        MetricFilter::new("f", "p", vec![MetricTransformation::new("n", "ns", "v")])
    }

    #[test]
    fn every_listed_retention_is_accepted() {
        for days in VALID_RETENTION_DAYS {
            assert!(is_valid_retention(days as i64), "{} rejected", days);
        }
    }

    #[test]
    fn unlisted_retention_is_rejected() {
        for days in [0, -1, 2, 366, 3654, i64::MAX, i64::MIN, 1 << 33] {
            assert!(!is_valid_retention(days), "{} accepted", days);
        }
    }

    #[test]
    fn group_checked_before_stream() {
        let err = log_stream(&LogGroup::default(), &LogStream::default()).unwrap_err();
        assert_eq!(err, ValidationError::MissingLogGroupName);

        let err = log_stream(&LogGroup::named("g"), &LogStream::default()).unwrap_err();
        assert_eq!(err, ValidationError::MissingLogStreamName);

        assert!(log_stream(&LogGroup::named("g"), &LogStream::named("s")).is_ok());
    }

    #[test]
    fn filter_rules_report_first_violation() {
        let empty = MetricFilter::default();
        assert_eq!(
            metric_filter(&LogGroup::default(), &empty).unwrap_err(),
            ValidationError::MissingLogGroupName
        );
        let g = LogGroup::named("g");
        assert_eq!(
            metric_filter(&g, &empty).unwrap_err(),
            ValidationError::MissingFilterName
        );

        let mut f = full_filter();
        f.filter_pattern.clear();
        f.metric_transformations.clear();
        assert_eq!(
            metric_filter(&g, &f).unwrap_err(),
            ValidationError::MissingFilterPattern
        );

        let mut f = full_filter();
        f.metric_transformations.clear();
        assert_eq!(
            metric_filter(&g, &f).unwrap_err(),
            ValidationError::MissingMetricTransformations
        );

        assert!(metric_filter(&g, &full_filter()).is_ok());
    }

    #[test]
    fn delete_filter_needs_only_name() {
        let f = MetricFilter {
            filter_name: "f".into(),
            ..MetricFilter::default()
        };
        assert!(metric_filter_name(&LogGroup::named("g"), &f).is_ok());
    }

    #[test]
    fn retention_checks_group_first() {
        assert_eq!(
            retention_policy(&LogGroup::default(), 366).unwrap_err(),
            ValidationError::MissingLogGroupName
        );
        assert_eq!(
            retention_policy(&LogGroup::named("g"), 366).unwrap_err(),
            ValidationError::InvalidRetentionInDays
        );
        assert!(retention_policy(&LogGroup::named("g"), 365).is_ok());
    }
}
