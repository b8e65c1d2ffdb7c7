//! Remote API port
//!
//! The reconciler only needs three operations from the log service. Anything
//! implementing [`MetricFilterApi`] can back it: the HTTP client in
//! [`crate::aws`] in production, an in-memory fake in tests.

use super::model::{MetricFilterRecord, MetricTransformation};
use anyhow::Result;
use async_trait::async_trait;

/// Create-or-replace request for a metric filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PutMetricFilter {
    pub filter_name: String,
    pub filter_pattern: String,
    pub log_group_name: String,
    pub metric_transformations: Vec<MetricTransformation>,
}

/// One page of a prefix-filtered listing
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DescribeMetricFilters {
    pub log_group_name: String,
    /// The service only supports prefix matching on names
    pub filter_name_prefix: Option<String>,
    pub next_token: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct MetricFilterPage {
    pub filters: Vec<MetricFilterRecord>,
    pub next_token: Option<String>,
}

#[async_trait]
pub trait MetricFilterApi: Send + Sync {
    async fn put_metric_filter(&self, request: &PutMetricFilter) -> Result<()>;

    async fn describe_metric_filters(
        &self,
        request: &DescribeMetricFilters,
    ) -> Result<MetricFilterPage>;

    async fn delete_metric_filter(&self, filter_name: &str, log_group_name: &str) -> Result<()>;
}
