//! Error types for metric filter reconciliation

use thiserror::Error;

/// Boxed remote error, keeps the client's context chain as `source()`
pub type RemoteError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors surfaced by [`FilterReconciler`](super::FilterReconciler)
#[derive(Debug, Error)]
pub enum FilterError {
    /// One or more fields failed validation; nothing was sent to the remote API
    #[error("invalid metric filter definition: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// Persisted identifier is not of the form `<name>:<log group>`
    #[error("invalid metric filter id {0:?}: expected <filter name>:<log group name>")]
    InvalidId(String),

    /// No filter with this exact name exists in the log group
    #[error("CloudWatch Metric Filter {name:?} for Log Group {log_group:?} not found")]
    NotFound { name: String, log_group: String },

    /// The remote API call failed
    #[error("{action}: {}", chain(.source))]
    Remote {
        action: &'static str,
        #[source]
        source: RemoteError,
    },
}

impl FilterError {
    pub(crate) fn remote(action: &'static str, err: anyhow::Error) -> Self {
        Self::Remote {
            action,
            source: err.into(),
        }
    }

    /// True when the filter no longer exists remotely
    pub fn is_not_found(&self) -> bool {
        matches!(self, FilterError::NotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, FilterError>;

/// Render an error with every cause in its source chain
fn chain(err: &RemoteError) -> String {
    let err: &(dyn std::error::Error + 'static) = &**err;
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(inner) = source {
        out.push_str(": ");
        out.push_str(&inner.to_string());
        source = inner.source();
    }
    out
}
