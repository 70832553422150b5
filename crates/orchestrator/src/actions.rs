// SPDX-License-Identifier: MIT

//! The desired-state → action table: given a service's current state, its
//! target state, and whether the pending property changes are
//! hot-applicable, decide which single job (if any) moves it closer to
//! the target.

use fulcrum_core::{JobAction, Service, ServiceState, ServiceType};

/// The job that would move `service` one step toward its `target_state`,
/// or `None` if it's already there (or stuck in a state nothing can act
/// on, such as `Failed`, without an explicit retry).
pub fn compute_action(service: &Service, service_type: &ServiceType) -> Option<JobAction> {
    let target = service.target_state?;

    // A job is already in flight for this service; the desired-state
    // table only ever issues one job at a time.
    if service.state.is_transient() {
        return None;
    }

    if target == ServiceState::Deleted {
        return (service.state != ServiceState::Deleted).then_some(JobAction::ServiceDelete);
    }

    if service.state == ServiceState::Deleted || service.state == ServiceState::Failed {
        // Terminal states require an explicit recreate/retry, not a
        // desired-state nudge.
        return None;
    }

    if service.state == target {
        // Already at the target run state; a property change while
        // running still needs a job, hot or cold depending on what
        // changed.
        if service.state == ServiceState::Started && properties_differ(service) {
            return Some(update_action(service, service_type));
        }
        return None;
    }

    match target {
        ServiceState::Started => Some(JobAction::ServiceStart),
        ServiceState::Stopped => Some(JobAction::ServiceStop),
        _ => None,
    }
}

fn properties_differ(service: &Service) -> bool {
    match (&service.current_properties, &service.target_properties) {
        (None, None) => false,
        (current, target) => current != target,
    }
}

fn update_action(service: &Service, service_type: &ServiceType) -> JobAction {
    let diff_keys = changed_keys(service);
    if service_type.is_hot_capable(diff_keys) {
        JobAction::ServiceHotUpdate
    } else {
        JobAction::ServiceColdUpdate
    }
}

/// The top-level JSON object keys that differ between current and target
/// properties. An entirely new or removed key counts as changed.
fn changed_keys(service: &Service) -> Vec<String> {
    use serde_json::Value;

    let empty = serde_json::Map::new();
    let current = service.current_properties.as_ref().and_then(Value::as_object).unwrap_or(&empty);
    let target = service.target_properties.as_ref().and_then(Value::as_object).unwrap_or(&empty);

    let mut keys = std::collections::BTreeSet::new();
    for (k, v) in target {
        if current.get(k) != Some(v) {
            keys.insert(k.clone());
        }
    }
    for k in current.keys() {
        if !target.contains_key(k) {
            keys.insert(k.clone());
        }
    }
    keys.into_iter().collect()
}

/// The service state a job's completion leaves the service in.
pub fn completion_state(action: JobAction) -> ServiceState {
    match action {
        JobAction::ServiceCreate => ServiceState::Created,
        JobAction::ServiceStart => ServiceState::Started,
        JobAction::ServiceStop => ServiceState::Stopped,
        JobAction::ServiceHotUpdate | JobAction::ServiceColdUpdate => ServiceState::Started,
        JobAction::ServiceDelete => ServiceState::Deleted,
    }
}

/// The transient state a service moves through while a job for `action`
/// is in flight.
pub fn in_flight_state(action: JobAction) -> ServiceState {
    match action {
        JobAction::ServiceCreate => ServiceState::Creating,
        JobAction::ServiceStart => ServiceState::Starting,
        JobAction::ServiceStop => ServiceState::Stopping,
        JobAction::ServiceHotUpdate => ServiceState::HotUpdating,
        JobAction::ServiceColdUpdate => ServiceState::ColdUpdating,
        JobAction::ServiceDelete => ServiceState::Deleting,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fulcrum_core::ServiceTypeId;
    use std::collections::HashSet;

    fn service_type(hot_fields: &[&str]) -> ServiceType {
        let now = chrono::Utc::now();
        ServiceType {
            id: ServiceTypeId::new(),
            name: "vm".into(),
            resource_definitions: serde_json::json!({}),
            hot_updatable_fields: hot_fields.iter().map(|s| s.to_string()).collect::<HashSet<_>>(),
            created_at: now,
            updated_at: now,
        }
    }

    fn service(state: ServiceState, target: Option<ServiceState>) -> Service {
        let now = chrono::Utc::now();
        Service {
            id: fulcrum_core::ServiceId::new(),
            name: "svc".into(),
            external_id: None,
            agent_id: fulcrum_core::AgentId::new(),
            service_type_id: fulcrum_core::ServiceTypeId::new(),
            group_id: fulcrum_core::ServiceGroupId::new(),
            state,
            target_state: target,
            current_properties: None,
            target_properties: None,
            attributes: Default::default(),
            error_message: None,
            retry_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn no_target_means_no_action() {
        let st = service_type(&[]);
        let svc = service(ServiceState::Created, None);
        assert_eq!(compute_action(&svc, &st), None);
    }

    #[test]
    fn created_to_started_issues_start() {
        let st = service_type(&[]);
        let svc = service(ServiceState::Created, Some(ServiceState::Started));
        assert_eq!(compute_action(&svc, &st), Some(JobAction::ServiceStart));
    }

    #[test]
    fn started_to_stopped_issues_stop() {
        let st = service_type(&[]);
        let svc = service(ServiceState::Started, Some(ServiceState::Stopped));
        assert_eq!(compute_action(&svc, &st), Some(JobAction::ServiceStop));
    }

    #[test]
    fn any_state_to_deleted_issues_delete() {
        let st = service_type(&[]);
        let svc = service(ServiceState::Stopped, Some(ServiceState::Deleted));
        assert_eq!(compute_action(&svc, &st), Some(JobAction::ServiceDelete));
    }

    #[test]
    fn transient_state_blocks_new_action() {
        let st = service_type(&[]);
        let svc = service(ServiceState::Starting, Some(ServiceState::Started));
        assert_eq!(compute_action(&svc, &st), None);
    }

    #[test]
    fn failed_service_needs_explicit_retry() {
        let st = service_type(&[]);
        let svc = service(ServiceState::Failed, Some(ServiceState::Started));
        assert_eq!(compute_action(&svc, &st), None);
    }

    #[test]
    fn property_change_while_running_is_hot_when_fully_allowlisted() {
        let st = service_type(&["replica_count"]);
        let mut svc = service(ServiceState::Started, Some(ServiceState::Started));
        svc.current_properties = Some(serde_json::json!({"replica_count": 1}));
        svc.target_properties = Some(serde_json::json!({"replica_count": 3}));
        assert_eq!(compute_action(&svc, &st), Some(JobAction::ServiceHotUpdate));
    }

    #[test]
    fn property_change_touching_non_hot_field_is_cold() {
        let st = service_type(&["replica_count"]);
        let mut svc = service(ServiceState::Started, Some(ServiceState::Started));
        svc.current_properties = Some(serde_json::json!({"image": "v1"}));
        svc.target_properties = Some(serde_json::json!({"image": "v2"}));
        assert_eq!(compute_action(&svc, &st), Some(JobAction::ServiceColdUpdate));
    }
}
