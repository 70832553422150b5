// SPDX-License-Identifier: MIT

use super::*;

#[test]
fn empty_name_is_rejected() {
    assert!(validate_org_fields("", None).is_err());
    assert!(validate_org_fields("   ", None).is_err());
}

#[test]
fn bad_country_code_is_rejected() {
    assert!(validate_org_fields("Acme", Some("usa")).is_err());
}

#[test]
fn valid_fields_pass() {
    assert!(validate_org_fields("Acme", Some("US")).is_ok());
    assert!(validate_org_fields("Acme", None).is_ok());
}
