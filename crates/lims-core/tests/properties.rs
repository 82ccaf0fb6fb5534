//! Property tests for coercion and keyword sanitation.

use lims_core::{coerce_result, format_keyword, sanitize_identifier, strip_non_word};
use proptest::prelude::*;

proptest! {
    #[test]
    fn parseable_numbers_clamp_at_zero(value in prop::num::f64::NORMAL | prop::num::f64::ZERO) {
        let expected = if value > 0.0 { value } else { 0.0 };
        prop_assert_eq!(coerce_result(&value.to_string()), Ok(expected));
    }

    #[test]
    fn dash_prefixed_text_is_zero(suffix in ".*") {
        prop_assert_eq!(coerce_result(&format!("--{suffix}")), Ok(0.0));
    }

    #[test]
    fn alphabetic_text_is_rejected(text in "[a-zA-Z]{1,12}") {
        prop_assume!(text != "ND");
        prop_assert!(coerce_result(&text).is_err());
    }

    #[test]
    fn sanitizers_are_idempotent(raw in "\\PC{0,24}") {
        let keyword = format_keyword(&raw);
        prop_assert_eq!(format_keyword(&keyword), keyword.clone());
        prop_assert!(keyword.chars().all(|ch| ch.is_ascii_alphanumeric()));

        let word = strip_non_word(&raw);
        prop_assert_eq!(strip_non_word(&word), word.clone());

        let identifier = sanitize_identifier(&raw);
        prop_assert_eq!(sanitize_identifier(&identifier), identifier.clone());
    }
}
