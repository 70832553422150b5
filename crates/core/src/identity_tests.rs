// SPDX-License-Identifier: MIT

use super::*;

#[test]
fn admin_rejects_scope() {
    let scope = IdentityScope { participant_id: Some("p1".into()), agent_id: None };
    assert!(Identity::new("root", Role::Admin, scope).is_err());
}

#[test]
fn participant_requires_participant_id() {
    assert!(Identity::new("acme", Role::Participant, IdentityScope::default()).is_err());
    let scope = IdentityScope { participant_id: Some("p1".into()), agent_id: None };
    assert!(Identity::new("acme", Role::Participant, scope).is_ok());
}

#[test]
fn agent_requires_both_ids() {
    let partial = IdentityScope { participant_id: Some("p1".into()), agent_id: None };
    assert!(Identity::new("agt", Role::Agent, partial).is_err());
    let full = IdentityScope {
        participant_id: Some("p1".into()),
        agent_id: Some("a1".into()),
    };
    assert!(Identity::new("agt", Role::Agent, full).is_ok());
}
