//! Metric filter reconciler
//!
//! Maps a filter definition onto the remote put/describe/delete operations and
//! maps a persisted `<name>:<log group>` id back to remote state.

use super::api::{DescribeMetricFilters, MetricFilterApi, PutMetricFilter};
use super::error::{FilterError, Result};
use super::id::FilterId;
use super::model::{FilterSpec, MetricFilterRecord};
use super::validation::validate_filter_spec;

/// Create/read/delete lifecycle for metric filters
pub struct FilterReconciler<A> {
    api: A,
}

impl<A: MetricFilterApi> FilterReconciler<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Create the filter and return its durable id
    ///
    /// Validation runs first; nothing is sent if any field is invalid.
    pub async fn create(&self, spec: &FilterSpec) -> Result<FilterId> {
        let violations = validate_filter_spec(spec);
        if !violations.is_empty() {
            return Err(FilterError::Validation(violations));
        }

        let request = PutMetricFilter {
            filter_name: spec.filter_name.clone(),
            filter_pattern: spec.filter_pattern.clone(),
            log_group_name: spec.log_group_name.clone(),
            metric_transformations: spec.metric_transformations.iter().cloned().collect(),
        };

        tracing::debug!("Creating CloudWatch Metric Filter: {:?}", request);

        self.api
            .put_metric_filter(&request)
            .await
            .map_err(|e| FilterError::remote("metric filter creation failed", e))?;

        let id = FilterId::new(&spec.filter_name, &spec.log_group_name);
        tracing::info!("CloudWatch Metric Filter created: {}", id);

        Ok(id)
    }

    /// Create the filter, then read it back from the service
    pub async fn create_and_refresh(&self, spec: &FilterSpec) -> Result<(FilterId, FilterSpec)> {
        let id = self.create(spec).await?;
        let state = self.read(&id).await?;
        Ok((id, state))
    }

    /// Read the current remote state of a filter
    ///
    /// Returns [`FilterError::NotFound`] when the filter was removed out of band.
    pub async fn read(&self, id: &FilterId) -> Result<FilterSpec> {
        tracing::debug!("Reading CloudWatch Metric Filter: {}", id);

        let record = self
            .find_exact(&id.filter_name, &id.log_group_name)
            .await?;

        tracing::debug!("Found CloudWatch Metric Filter: {:?}", record);

        Ok(record.into_spec(&id.log_group_name))
    }

    /// Parse a persisted id and read the filter
    pub async fn read_id(&self, id: &str) -> Result<FilterSpec> {
        self.read(&FilterId::parse(id)?).await
    }

    /// Delete the filter
    pub async fn delete(&self, id: &FilterId) -> Result<()> {
        tracing::info!("Deleting CloudWatch Metric Filter: {}", id);

        self.api
            .delete_metric_filter(&id.filter_name, &id.log_group_name)
            .await
            .map_err(|e| FilterError::remote("deleting metric filter failed", e))?;

        tracing::info!("CloudWatch Metric Filter deleted: {}", id);
        Ok(())
    }

    /// Parse a persisted id and delete the filter
    pub async fn delete_id(&self, id: &str) -> Result<()> {
        self.delete(&FilterId::parse(id)?).await
    }

    /// Find the filter whose name is exactly `filter_name`
    ///
    /// The listing only filters by prefix, so every page is scanned for an exact
    /// name match until the continuation token runs out.
    pub async fn find_exact(
        &self,
        filter_name: &str,
        log_group_name: &str,
    ) -> Result<MetricFilterRecord> {
        let mut next_token: Option<String> = None;
        let mut page_count = 0usize;

        loop {
            let request = DescribeMetricFilters {
                log_group_name: log_group_name.to_string(),
                filter_name_prefix: Some(filter_name.to_string()),
                next_token: next_token.take(),
            };

            let page = self
                .api
                .describe_metric_filters(&request)
                .await
                .map_err(|e| FilterError::remote("describing metric filters failed", e))?;
            page_count += 1;

            tracing::debug!(
                "Scanning page {} ({} filters) for {:?}",
                page_count,
                page.filters.len(),
                filter_name
            );

            if let Some(found) = page
                .filters
                .into_iter()
                .find(|mf| mf.filter_name == filter_name)
            {
                return Ok(found);
            }

            match page.next_token {
                Some(token) if !token.is_empty() => next_token = Some(token),
                _ => break,
            }
        }

        Err(FilterError::NotFound {
            name: filter_name.to_string(),
            log_group: log_group_name.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::api::MetricFilterPage;
    use super::super::model::MetricTransformation;
    use super::*;
    use anyhow::anyhow;
    use async_trait::async_trait;
    use std::sync::Mutex;

    fn record(name: &str) -> MetricFilterRecord {
        MetricFilterRecord {
            filter_name: name.to_string(),
            filter_pattern: format!("pattern for {}", name),
            metric_transformations: vec![MetricTransformation::new("m", "ns", "1")],
            creation_time: None,
            log_group_name: None,
        }
    }

    /// Serves fixed pages; tokens are page indexes
    #[derive(Default)]
    struct PagedApi {
        pages: Vec<Vec<MetricFilterRecord>>,
        requests: Mutex<Vec<DescribeMetricFilters>>,
        puts: Mutex<Vec<PutMetricFilter>>,
        deletes: Mutex<Vec<(String, String)>>,
        /// Token returned alongside the last page
        last_token: Option<String>,
        fail: bool,
    }

    impl PagedApi {
        fn with_pages(pages: Vec<Vec<MetricFilterRecord>>) -> Self {
            Self {
                pages,
                ..Default::default()
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                ..Default::default()
            }
        }
    }

    #[async_trait]
    impl MetricFilterApi for PagedApi {
        async fn put_metric_filter(&self, request: &PutMetricFilter) -> anyhow::Result<()> {
            if self.fail {
                return Err(anyhow!("API request failed: 400 Bad Request"));
            }
            self.puts.lock().unwrap().push(request.clone());
            Ok(())
        }

        async fn describe_metric_filters(
            &self,
            request: &DescribeMetricFilters,
        ) -> anyhow::Result<MetricFilterPage> {
            if self.fail {
                return Err(anyhow!("API request failed: 500 Internal Server Error"));
            }
            self.requests.lock().unwrap().push(request.clone());

            let index: usize = match &request.next_token {
                Some(t) => t.parse()?,
                None => 0,
            };
            let filters = self.pages.get(index).cloned().unwrap_or_default();
            let next_token = if index + 1 < self.pages.len() {
                Some((index + 1).to_string())
            } else {
                self.last_token.clone()
            };

            Ok(MetricFilterPage {
                filters,
                next_token,
            })
        }

        async fn delete_metric_filter(
            &self,
            filter_name: &str,
            log_group_name: &str,
        ) -> anyhow::Result<()> {
            if self.fail {
                return Err(anyhow!("API request failed: 404 Not Found"));
            }
            self.deletes
                .lock()
                .unwrap()
                .push((filter_name.to_string(), log_group_name.to_string()));
            Ok(())
        }
    }

    fn spec() -> FilterSpec {
        FilterSpec::new(
            "foo-bar-filter",
            "{ ($.foo = \"bar\") }",
            "foo-bar",
            [MetricTransformation::new("foo-bar-metric", "foo/bar", "1")],
        )
    }

    #[tokio::test]
    async fn test_find_exact_skips_prefix_sibling() {
        let reconciler = FilterReconciler::new(PagedApi::with_pages(vec![vec![
            record("foo-filter-extra"),
            record("foo-filter"),
        ]]));

        let found = reconciler.find_exact("foo-filter", "group").await.unwrap();
        assert_eq!(found.filter_name, "foo-filter");
        assert_eq!(found.filter_pattern, "pattern for foo-filter");
    }

    #[tokio::test]
    async fn test_find_exact_passes_prefix_and_log_group() {
        let reconciler = FilterReconciler::new(PagedApi::with_pages(vec![vec![record("f")]]));
        reconciler.find_exact("f", "group").await.unwrap();

        let requests = reconciler.api().requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].filter_name_prefix.as_deref(), Some("f"));
        assert_eq!(requests[0].log_group_name, "group");
        assert_eq!(requests[0].next_token, None);
    }

    #[tokio::test]
    async fn test_find_exact_follows_pagination() {
        let reconciler = FilterReconciler::new(PagedApi::with_pages(vec![
            vec![record("foo-1"), record("foo-2")],
            vec![record("foo-3"), record("foo")],
        ]));

        let found = reconciler.find_exact("foo", "group").await.unwrap();
        assert_eq!(found.filter_name, "foo");

        let requests = reconciler.api().requests.lock().unwrap();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[1].next_token.as_deref(), Some("1"));
    }

    #[tokio::test]
    async fn test_find_exact_stops_at_first_match() {
        let reconciler = FilterReconciler::new(PagedApi::with_pages(vec![
            vec![record("foo")],
            vec![record("foo-2")],
        ]));

        reconciler.find_exact("foo", "group").await.unwrap();
        assert_eq!(reconciler.api().requests.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_find_exact_not_found_after_all_pages() {
        let reconciler = FilterReconciler::new(PagedApi::with_pages(vec![
            vec![record("foo-1")],
            vec![record("foo-2")],
            vec![],
        ]));

        let err = reconciler.find_exact("foo", "group").await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(reconciler.api().requests.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_find_exact_empty_token_ends_listing() {
        let reconciler = FilterReconciler::new(PagedApi {
            pages: vec![vec![record("foo-1")]],
            last_token: Some(String::new()),
            ..Default::default()
        });

        let err = reconciler.find_exact("foo", "group").await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(reconciler.api().requests.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_find_exact_wraps_remote_failure() {
        let reconciler = FilterReconciler::new(PagedApi::failing());
        let err = reconciler.find_exact("foo", "group").await.unwrap_err();
        assert!(matches!(err, FilterError::Remote { .. }));
    }

    #[tokio::test]
    async fn test_create_returns_composite_id() {
        let reconciler = FilterReconciler::new(PagedApi::default());
        let id = reconciler.create(&spec()).await.unwrap();
        assert_eq!(id.to_string(), "foo-bar-filter:foo-bar");

        let puts = reconciler.api().puts.lock().unwrap();
        assert_eq!(puts.len(), 1);
        assert_eq!(puts[0].filter_name, "foo-bar-filter");
        assert_eq!(puts[0].filter_pattern, "{ ($.foo = \"bar\") }");
        assert_eq!(puts[0].log_group_name, "foo-bar");
        assert_eq!(
            puts[0].metric_transformations,
            vec![MetricTransformation::new("foo-bar-metric", "foo/bar", "1")]
        );
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_spec_before_remote_call() {
        let reconciler = FilterReconciler::new(PagedApi::default());
        let mut invalid = spec();
        invalid.filter_name = "bad:name".to_string();

        let err = reconciler.create(&invalid).await.unwrap_err();
        assert!(matches!(err, FilterError::Validation(ref v) if v.len() == 1));
        assert!(reconciler.api().puts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_wraps_remote_failure() {
        let reconciler = FilterReconciler::new(PagedApi::failing());
        let err = reconciler.create(&spec()).await.unwrap_err();
        assert!(err
            .to_string()
            .starts_with("metric filter creation failed: "));
    }

    #[tokio::test]
    async fn test_read_takes_log_group_from_id() {
        let reconciler =
            FilterReconciler::new(PagedApi::with_pages(vec![vec![record("errors")]]));
        let spec = reconciler.read_id("errors:/aws/app:prod").await.unwrap();
        assert_eq!(spec.filter_name, "errors");
        assert_eq!(spec.log_group_name, "/aws/app:prod");
        assert_eq!(
            reconciler.api().requests.lock().unwrap()[0].log_group_name,
            "/aws/app:prod"
        );
    }

    #[tokio::test]
    async fn test_read_malformed_id_is_invalid() {
        let reconciler = FilterReconciler::new(PagedApi::default());
        let err = reconciler.read_id("no-colon").await.unwrap_err();
        assert!(matches!(err, FilterError::InvalidId(_)));
        assert!(reconciler.api().requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_sends_decoded_keys() {
        let reconciler = FilterReconciler::new(PagedApi::default());
        reconciler.delete_id("foo-bar-filter:foo-bar").await.unwrap();

        let deletes = reconciler.api().deletes.lock().unwrap();
        assert_eq!(
            deletes.as_slice(),
            &[("foo-bar-filter".to_string(), "foo-bar".to_string())]
        );
    }

    #[tokio::test]
    async fn test_delete_wraps_remote_failure() {
        let reconciler = FilterReconciler::new(PagedApi::failing());
        let err = reconciler.delete_id("a:b").await.unwrap_err();
        assert!(err.to_string().starts_with("deleting metric filter failed: "));
    }
}
