// SPDX-License-Identifier: MIT

use super::*;

#[test]
fn hash_is_deterministic_and_distinct_per_input() {
    let a = hash_token("raw-value-a");
    let b = hash_token("raw-value-a");
    let c = hash_token("raw-value-b");
    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn hash_never_reveals_the_raw_value() {
    let raw = "super-secret-token";
    let hashed = hash_token(raw);
    assert_ne!(hashed, raw);
    assert!(!hashed.contains(raw));
}

#[test]
fn expiry_check() {
    let now = Utc::now();
    let token = Token {
        id: TokenId::new(),
        name: "t".into(),
        role: Role::Admin,
        hashed_value: hash_token("x"),
        expires_at: now,
        scope_id: None,
        created_at: now,
        updated_at: now,
    };
    assert!(token.is_expired(now));
    assert!(!token.is_expired(now - chrono::Duration::seconds(1)));
}
