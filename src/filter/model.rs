//! Metric filter data model

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Maps a matched log event to a metric data point
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MetricTransformation {
    pub metric_name: String,
    pub metric_namespace: String,
    pub metric_value: String,
}

impl MetricTransformation {
    pub fn new(metric_name: &str, metric_namespace: &str, metric_value: &str) -> Self {
        Self {
            metric_name: metric_name.to_string(),
            metric_namespace: metric_namespace.to_string(),
            metric_value: metric_value.to_string(),
        }
    }
}

/// Desired state of a metric filter
///
/// Every field forces replacement when changed; there is no in-place update.
/// Transformations have set semantics, so order in the source file is irrelevant
/// and value-identical entries collapse into one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSpec {
    pub filter_name: String,
    pub filter_pattern: String,
    pub log_group_name: String,
    pub metric_transformations: BTreeSet<MetricTransformation>,
}

impl FilterSpec {
    pub fn new(
        filter_name: &str,
        filter_pattern: &str,
        log_group_name: &str,
        metric_transformations: impl IntoIterator<Item = MetricTransformation>,
    ) -> Self {
        Self {
            filter_name: filter_name.to_string(),
            filter_pattern: filter_pattern.to_string(),
            log_group_name: log_group_name.to_string(),
            metric_transformations: metric_transformations.into_iter().collect(),
        }
    }

    /// Parse a filter definition from YAML
    pub fn from_yaml(content: &str) -> anyhow::Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Render as YAML
    pub fn to_yaml(&self) -> anyhow::Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

/// A metric filter as reported by the remote listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricFilterRecord {
    pub filter_name: String,
    pub filter_pattern: String,
    pub metric_transformations: Vec<MetricTransformation>,
    /// Epoch millis
    pub creation_time: Option<i64>,
    pub log_group_name: Option<String>,
}

impl MetricFilterRecord {
    /// Rebuild the desired state from this record
    ///
    /// The log group comes from the caller's identifier, not from the record.
    pub fn into_spec(self, log_group_name: &str) -> FilterSpec {
        FilterSpec::new(
            &self.filter_name,
            &self.filter_pattern,
            log_group_name,
            self.metric_transformations,
        )
    }
}
