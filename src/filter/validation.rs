//! Field validation for metric filter definitions
//!
//! Rules mirror the remote service limits. All checks accumulate into a list
//! of human-readable violations instead of failing on the first one.

use super::model::{FilterSpec, MetricTransformation};
use regex::Regex;

pub const FILTER_NAME_MAX: usize = 512;
pub const FILTER_NAME_PATTERN: &str = r"[^:*]*";
pub const FILTER_PATTERN_MAX: usize = 512;
pub const LOG_GROUP_NAME_MAX: usize = 512;
pub const LOG_GROUP_NAME_PATTERN: &str = r"[\.\-_/#A-Za-z0-9]+";
pub const METRIC_NAME_MAX: usize = 255;
pub const METRIC_NAME_PATTERN: &str = r"[^:*$]*";
pub const METRIC_VALUE_MAX: usize = 100;

/// Check `value` against a maximum length and an optional full-string pattern
///
/// Length is counted in characters. An empty `pattern` skips the pattern check.
/// The pattern must match the whole value, not a substring of it. A pattern that
/// does not compile is reported as a violation.
pub fn validate_string_length_and_pattern(
    key: &str,
    value: &str,
    max_length: usize,
    pattern: &str,
) -> Vec<String> {
    let mut violations = Vec::new();

    if value.chars().count() > max_length {
        violations.push(format!(
            "{:?} cannot be longer than {} characters",
            key, max_length
        ));
    }

    if !pattern.is_empty() {
        match Regex::new(&format!("^(?:{})$", pattern)) {
            Ok(re) if !re.is_match(value) => {
                violations.push(format!("{:?} must match the pattern {:?}", key, pattern));
            }
            Ok(_) => {}
            Err(e) => {
                tracing::warn!("Invalid validation pattern {:?}: {}", pattern, e);
                violations.push(format!(
                    "{:?} has an invalid validation pattern {:?}",
                    key, pattern
                ));
            }
        }
    }

    violations
}

/// Validate every field of a filter definition
pub fn validate_filter_spec(spec: &FilterSpec) -> Vec<String> {
    let mut violations = Vec::new();

    violations.extend(validate_string_length_and_pattern(
        "filter_name",
        &spec.filter_name,
        FILTER_NAME_MAX,
        FILTER_NAME_PATTERN,
    ));
    violations.extend(validate_string_length_and_pattern(
        "filter_pattern",
        &spec.filter_pattern,
        FILTER_PATTERN_MAX,
        "",
    ));
    violations.extend(validate_string_length_and_pattern(
        "log_group_name",
        &spec.log_group_name,
        LOG_GROUP_NAME_MAX,
        LOG_GROUP_NAME_PATTERN,
    ));

    // Empty names would produce an unparseable id
    if spec.filter_name.is_empty() {
        violations.push("\"filter_name\" must not be empty".to_string());
    }

    if spec.metric_transformations.is_empty() {
        violations.push("\"metric_transformations\" must contain at least one entry".to_string());
    }

    for transformation in &spec.metric_transformations {
        violations.extend(validate_transformation(transformation));
    }

    violations
}

fn validate_transformation(t: &MetricTransformation) -> Vec<String> {
    let mut violations = validate_string_length_and_pattern(
        "metric_transformations.metric_name",
        &t.metric_name,
        METRIC_NAME_MAX,
        METRIC_NAME_PATTERN,
    );
    violations.extend(validate_string_length_and_pattern(
        "metric_transformations.metric_namespace",
        &t.metric_namespace,
        METRIC_NAME_MAX,
        METRIC_NAME_PATTERN,
    ));
    violations.extend(validate_string_length_and_pattern(
        "metric_transformations.metric_value",
        &t.metric_value,
        METRIC_VALUE_MAX,
        "",
    ));
    violations
}
