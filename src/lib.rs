//! cwfilter
//!
//! Create/read/delete lifecycle management for CloudWatch Logs metric filters.
//! A filter definition is validated, created with one remote put call and
//! identified afterwards by a composite `<filter name>:<log group name>` id that
//! is mapped back to remote state with a paginated exact-match lookup.

pub mod aws;
pub mod config;
pub mod filter;

pub use filter::{FilterError, FilterId, FilterReconciler, FilterSpec, MetricTransformation};
