//! Serialization shape of the raw result accumulator and resolution laws.

use lims_model::{
    AnalyteResolution, FieldRecord, MatchMode, RawResults, resolve_analyte,
};
use proptest::prelude::*;
use serde_json::json;

#[test]
fn single_record_serializes_as_object() {
    let mut results = RawResults::new();
    results.add_result(
        "S1",
        "fe",
        FieldRecord::with_default_result("fe").with_field("fe", 12.5),
    );
    let value = serde_json::to_value(&results).expect("serialize");
    assert_eq!(
        value,
        json!({"S1": {"fe": {"DefaultResult": "fe", "Remarks": "", "fe": 12.5}}})
    );
}

#[test]
fn repeated_records_serialize_as_array() {
    let mut results = RawResults::new();
    results.append_result("S1", "Propargite", FieldRecord::with_default_result("RT").with_field("RT", 1.0));
    results.append_result("S1", "Propargite", FieldRecord::with_default_result("RT").with_field("RT", 2.0));
    let value = serde_json::to_value(&results).expect("serialize");
    assert_eq!(
        value["S1"]["Propargite"],
        json!([
            {"DefaultResult": "RT", "Remarks": "", "RT": 1.0},
            {"DefaultResult": "RT", "Remarks": "", "RT": 2.0}
        ])
    );
}

#[test]
fn missing_default_result_serializes_as_null() {
    let mut results = RawResults::new();
    results.add_result("S1", "caffeine", FieldRecord::new().with_field("Area", 10.0));
    let text = serde_json::to_string(&results).expect("serialize");
    assert_eq!(
        text,
        r#"{"S1":{"caffeine":{"DefaultResult":null,"Remarks":"","Area":10.0}}}"#
    );
}

#[test]
fn insertion_order_is_preserved() {
    let mut results = RawResults::new();
    for sample in ["S3", "S1", "S2"] {
        results.add_result(sample, "kw", FieldRecord::new());
    }
    let order: Vec<&str> = results.sample_ids().collect();
    assert_eq!(order, vec!["S3", "S1", "S2"]);
}

proptest! {
    #[test]
    fn two_prefixed_keywords_are_always_ambiguous(
        derived in "[A-Za-z][A-Za-z0-9]{0,6}",
        first in "[A-Za-z0-9_]{0,6}",
        second in "[A-Za-z0-9_]{0,6}",
    ) {
        prop_assume!(first != second);
        let configured = vec![format!("{derived}{first}"), format!("{derived}{second}")];
        let resolved = resolve_analyte(&derived, &configured, MatchMode::Prefix);
        prop_assert!(matches!(resolved, AnalyteResolution::Ambiguous(ref found) if found.len() == 2));
    }

    #[test]
    fn exact_match_is_found_once(keyword in "[A-Za-z][A-Za-z0-9]{0,8}") {
        let configured = vec![keyword.clone(), format!("{keyword}_x")];
        let resolved = resolve_analyte(&keyword, &configured, MatchMode::Exact);
        prop_assert_eq!(resolved, AnalyteResolution::Found(keyword));
    }
}
