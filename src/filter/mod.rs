//! Metric filter resource
//!
//! Lifecycle management for CloudWatch Logs metric filters: a declarative
//! definition is validated, created with a single put call, and later read back
//! through a composite `<filter name>:<log group name>` id.
//!
//! # Module Structure
//!
//! - [`model`] - Filter definition, transformations and remote records
//! - [`validation`] - Field length and pattern rules
//! - [`id`] - Composite identifier encode/decode
//! - [`api`] - The remote API port the reconciler depends on
//! - [`reconciler`] - Create/read/delete and the exact-match paginated lookup
//!
//! # Example
//!
//! ```ignore
//! use cwfilter::aws::LogsClient;
//! use cwfilter::filter::{FilterReconciler, FilterSpec};
//!
//! async fn example(client: LogsClient, spec: FilterSpec) -> anyhow::Result<()> {
//!     let reconciler = FilterReconciler::new(client);
//!     let id = reconciler.create(&spec).await?;
//!     let current = reconciler.read(&id).await?;
//!     reconciler.delete(&id).await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod error;
pub mod id;
pub mod model;
pub mod reconciler;
pub mod validation;

pub use api::{DescribeMetricFilters, MetricFilterApi, MetricFilterPage, PutMetricFilter};
pub use error::FilterError;
pub use id::FilterId;
pub use model::{FilterSpec, MetricFilterRecord, MetricTransformation};
pub use reconciler::FilterReconciler;
pub use validation::{validate_filter_spec, validate_string_length_and_pattern};
