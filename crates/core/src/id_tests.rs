// SPDX-License-Identifier: MIT

use super::*;

crate::define_id! {
    pub struct TestId;
}

#[test]
fn round_trips_through_display_and_parse() {
    let id = TestId::new();
    let parsed = TestId::parse(&id.to_string()).unwrap();
    assert_eq!(id, parsed);
}

#[test]
fn new_ids_are_distinct() {
    assert_ne!(TestId::new(), TestId::new());
}

#[test]
fn serde_round_trip_is_bare_uuid_string() {
    let id = TestId::new();
    let json = serde_json::to_string(&id).unwrap();
    assert_eq!(json, format!("\"{}\"", id.as_uuid()));
    let back: TestId = serde_json::from_str(&json).unwrap();
    assert_eq!(id, back);
}

#[test]
fn short_truncates_by_char_count() {
    let id = TestId::new();
    assert_eq!(short(&id, 8).len(), 8);
}
