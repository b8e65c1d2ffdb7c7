//! Property-based tests using proptest
//!
//! These tests verify the composite id codec and the validation rules using
//! randomized inputs.

use cwfilter::filter::{
    validate_filter_spec, validate_string_length_and_pattern, FilterId, FilterSpec,
    MetricTransformation,
};
use proptest::prelude::*;

/// Filter names accepted by validation (no `:` or `*`)
fn arb_filter_name() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 _./#$-]{1,64}"
}

/// Log group names, including the occasional colon to exercise first-colon splitting
fn arb_log_group_name() -> impl Strategy<Value = String> {
    prop_oneof![
        "[.\\-_/#A-Za-z0-9]{1,64}",
        "[a-z]{1,10}:[a-z:]{0,10}",
    ]
}

fn arb_transformation() -> impl Strategy<Value = MetricTransformation> {
    ("[a-zA-Z0-9/_-]{1,32}", "[a-zA-Z0-9/_-]{1,32}", "[0-9]{1,3}|\\$[a-z]{1,8}").prop_map(
        |(name, namespace, value)| MetricTransformation::new(&name, &namespace, &value),
    )
}

proptest! {
    /// decode(encode(name, group)) == (name, group)
    #[test]
    fn id_roundtrip(name in arb_filter_name(), group in arb_log_group_name()) {
        let encoded = FilterId::new(&name, &group).to_string();
        let decoded = FilterId::parse(&encoded).unwrap();
        prop_assert_eq!(decoded.filter_name, name);
        prop_assert_eq!(decoded.log_group_name, group);
    }

    /// Any string without a colon is rejected as an id
    #[test]
    fn id_without_colon_is_rejected(id in "[^:]{0,40}") {
        prop_assert!(FilterId::parse(&id).is_err());
    }

    /// Names with a colon never pass validation, so they can never be encoded
    #[test]
    fn colon_names_fail_validation(
        head in "[a-z]{0,10}",
        tail in "[a-z]{0,10}",
        group in "[a-z]{1,10}"
    ) {
        let name = format!("{}:{}", head, tail);
        let spec = FilterSpec::new(&name, "", &group, [MetricTransformation::new("m", "ns", "1")]);
        prop_assert!(!validate_filter_spec(&spec).is_empty());
    }

    /// Generated definitions within limits validate cleanly
    #[test]
    fn valid_specs_have_no_violations(
        name in "[a-zA-Z0-9_.-]{1,64}",
        pattern in ".{0,64}",
        group in "[.\\-_/#A-Za-z0-9]{1,64}",
        transformations in prop::collection::vec(arb_transformation(), 1..5)
    ) {
        let spec = FilterSpec::new(&name, &pattern, &group, transformations);
        prop_assert_eq!(validate_filter_spec(&spec), Vec::<String>::new());
    }

    /// Length check reports exactly one violation past the limit
    #[test]
    fn length_limit(len in 0usize..1100) {
        let value = "x".repeat(len);
        let violations = validate_string_length_and_pattern("k", &value, 512, "");
        prop_assert_eq!(violations.len(), usize::from(len > 512));
    }

    /// Digit-only pattern is a full-string match
    #[test]
    fn digits_pattern_is_anchored(value in "[0-9a-z]{1,20}") {
        let violations = validate_string_length_and_pattern("k", &value, 512, "[0-9]+");
        let all_digits = value.chars().all(|c| c.is_ascii_digit());
        prop_assert_eq!(violations.is_empty(), all_digits);
    }
}
