//! Metric filter operations over the CloudWatch Logs API
//!
//! Maps the [`MetricFilterApi`] port onto `PutMetricFilter`,
//! `DescribeMetricFilters` and `DeleteMetricFilter`.

use super::client::LogsClient;
use crate::filter::api::{DescribeMetricFilters, MetricFilterApi, MetricFilterPage, PutMetricFilter};
use crate::filter::model::{MetricFilterRecord, MetricTransformation};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireTransformation {
    metric_name: String,
    metric_namespace: String,
    metric_value: String,
}

impl From<&MetricTransformation> for WireTransformation {
    fn from(t: &MetricTransformation) -> Self {
        Self {
            metric_name: t.metric_name.clone(),
            metric_namespace: t.metric_namespace.clone(),
            metric_value: t.metric_value.clone(),
        }
    }
}

impl From<WireTransformation> for MetricTransformation {
    fn from(t: WireTransformation) -> Self {
        Self {
            metric_name: t.metric_name,
            metric_namespace: t.metric_namespace,
            metric_value: t.metric_value,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PutMetricFilterInput<'a> {
    filter_name: &'a str,
    filter_pattern: &'a str,
    log_group_name: &'a str,
    metric_transformations: Vec<WireTransformation>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DescribeMetricFiltersInput<'a> {
    log_group_name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    filter_name_prefix: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    next_token: Option<&'a str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DeleteMetricFilterInput<'a> {
    filter_name: &'a str,
    log_group_name: &'a str,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DescribeMetricFiltersOutput {
    #[serde(default)]
    metric_filters: Vec<WireMetricFilter>,
    #[serde(default)]
    next_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireMetricFilter {
    filter_name: String,
    #[serde(default)]
    filter_pattern: String,
    #[serde(default)]
    metric_transformations: Vec<WireTransformation>,
    #[serde(default)]
    creation_time: Option<i64>,
    #[serde(default)]
    log_group_name: Option<String>,
}

impl From<WireMetricFilter> for MetricFilterRecord {
    fn from(mf: WireMetricFilter) -> Self {
        Self {
            filter_name: mf.filter_name,
            filter_pattern: mf.filter_pattern,
            metric_transformations: mf
                .metric_transformations
                .into_iter()
                .map(MetricTransformation::from)
                .collect(),
            creation_time: mf.creation_time,
            log_group_name: mf.log_group_name,
        }
    }
}

#[async_trait]
impl MetricFilterApi for LogsClient {
    async fn put_metric_filter(&self, request: &PutMetricFilter) -> Result<()> {
        let input = PutMetricFilterInput {
            filter_name: &request.filter_name,
            filter_pattern: &request.filter_pattern,
            log_group_name: &request.log_group_name,
            metric_transformations: request
                .metric_transformations
                .iter()
                .map(WireTransformation::from)
                .collect(),
        };

        self.call("PutMetricFilter", &input).await?;
        Ok(())
    }

    async fn describe_metric_filters(
        &self,
        request: &DescribeMetricFilters,
    ) -> Result<MetricFilterPage> {
        let input = DescribeMetricFiltersInput {
            log_group_name: &request.log_group_name,
            filter_name_prefix: request.filter_name_prefix.as_deref(),
            next_token: request.next_token.as_deref(),
        };

        let response = self.call("DescribeMetricFilters", &input).await?;
        let output: DescribeMetricFiltersOutput = if response.is_null() {
            DescribeMetricFiltersOutput::default()
        } else {
            serde_json::from_value(response).context("Unexpected DescribeMetricFilters response")?
        };

        Ok(MetricFilterPage {
            filters: output
                .metric_filters
                .into_iter()
                .map(MetricFilterRecord::from)
                .collect(),
            next_token: output.next_token,
        })
    }

    async fn delete_metric_filter(&self, filter_name: &str, log_group_name: &str) -> Result<()> {
        let input = DeleteMetricFilterInput {
            filter_name,
            log_group_name,
        };

        self.call("DeleteMetricFilter", &input).await?;
        Ok(())
    }
}
