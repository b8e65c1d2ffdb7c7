//! Composite identifier for a metric filter
//!
//! A filter is keyed remotely by (filter name, log group name). The durable
//! handle joins both as `<filter name>:<log group name>`. Decoding splits on
//! the first colon only, so the log group part may itself contain colons.
//! This is lossless because filter names are validated to be colon-free.

use super::error::{FilterError, Result};
use std::fmt;

const SEPARATOR: char = ':';

/// Decoded `<filter name>:<log group name>` handle
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FilterId {
    pub filter_name: String,
    pub log_group_name: String,
}

impl FilterId {
    pub fn new(filter_name: &str, log_group_name: &str) -> Self {
        Self {
            filter_name: filter_name.to_string(),
            log_group_name: log_group_name.to_string(),
        }
    }

    /// Parse a persisted identifier
    pub fn parse(id: &str) -> Result<Self> {
        let Some((filter_name, log_group_name)) = id.split_once(SEPARATOR) else {
            return Err(FilterError::InvalidId(id.to_string()));
        };

        if filter_name.is_empty() || log_group_name.is_empty() {
            return Err(FilterError::InvalidId(id.to_string()));
        }

        Ok(Self::new(filter_name, log_group_name))
    }
}

impl fmt::Display for FilterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.filter_name, SEPARATOR, self.log_group_name)
    }
}

impl std::str::FromStr for FilterId {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
