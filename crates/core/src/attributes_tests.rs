// SPDX-License-Identifier: MIT

use super::*;

#[test]
fn attributes_round_trip_through_json() {
    let mut attrs = Attributes::new();
    attrs.insert("tags", vec!["gpu".into(), "eu".into()]);
    let json = serde_json::to_string(&attrs).unwrap();
    let back: Attributes = serde_json::from_str(&json).unwrap();
    assert_eq!(attrs, back);
    assert_eq!(back.get("tags"), Some(&["gpu".to_string(), "eu".to_string()][..]));
}

#[test]
fn country_code_validation() {
    assert!(validate_country_code("US").is_ok());
    assert!(validate_country_code("us").is_err());
    assert!(validate_country_code("USA").is_err());
    assert!(validate_country_code("").is_err());
}
