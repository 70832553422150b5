// SPDX-License-Identifier: MIT

//! The fixed authorization rule table: which roles may perform which
//! action on which object type, independent of object-scope matching.

use fulcrum_core::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Read,
    Create,
    Update,
    Delete,
    UpdateStatus,
    Claim,
    Complete,
    Fail,
    ListPending,
    Generate,
    Retry,
}

fulcrum_core::simple_display! {
    Action {
        Read => "read",
        Create => "create",
        Update => "update",
        Delete => "delete",
        UpdateStatus => "updateStatus",
        Claim => "claim",
        Complete => "complete",
        Fail => "fail",
        ListPending => "listPending",
        Generate => "generate",
        Retry => "retry",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectType {
    Participant,
    Agent,
    Service,
    ServiceGroup,
    Job,
    MetricType,
    MetricEntry,
    Token,
    AgentType,
    ServiceType,
    Event,
}

fulcrum_core::simple_display! {
    ObjectType {
        Participant => "participant",
        Agent => "agent",
        Service => "service",
        ServiceGroup => "serviceGroup",
        Job => "job",
        MetricType => "metricType",
        MetricEntry => "metricEntry",
        Token => "token",
        AgentType => "agentType",
        ServiceType => "serviceType",
        Event => "event",
    }
}

pub struct AuthorizationRule {
    pub object: ObjectType,
    pub action: Action,
    pub roles: &'static [Role],
}

const ALL_ROLES: &[Role] = &[Role::Admin, Role::Participant, Role::Agent];
const ADMIN_PARTICIPANT: &[Role] = &[Role::Admin, Role::Participant];
const ADMIN_ONLY: &[Role] = &[Role::Admin];
const AGENT_ONLY: &[Role] = &[Role::Agent];

/// Every row means "these roles may perform this action on this object,
/// subject to a scope match".
pub fn rule_table() -> &'static [AuthorizationRule] {
    use Action::*;
    use ObjectType::*;
    &[
        AuthorizationRule { object: Participant, action: Read, roles: ADMIN_PARTICIPANT },
        AuthorizationRule { object: Participant, action: Create, roles: ADMIN_ONLY },
        AuthorizationRule { object: Participant, action: Update, roles: ADMIN_PARTICIPANT },
        AuthorizationRule { object: Participant, action: Delete, roles: ADMIN_ONLY },
        AuthorizationRule { object: Agent, action: Read, roles: ALL_ROLES },
        AuthorizationRule { object: Agent, action: Create, roles: ADMIN_PARTICIPANT },
        AuthorizationRule { object: Agent, action: Update, roles: ADMIN_PARTICIPANT },
        AuthorizationRule { object: Agent, action: Delete, roles: ADMIN_PARTICIPANT },
        AuthorizationRule { object: Agent, action: UpdateStatus, roles: ALL_ROLES },
        AuthorizationRule { object: Service, action: Read, roles: ALL_ROLES },
        AuthorizationRule { object: Service, action: Create, roles: ADMIN_PARTICIPANT },
        AuthorizationRule { object: Service, action: Update, roles: ADMIN_PARTICIPANT },
        AuthorizationRule { object: Service, action: Delete, roles: ADMIN_PARTICIPANT },
        AuthorizationRule { object: Service, action: Retry, roles: ADMIN_PARTICIPANT },
        AuthorizationRule { object: ServiceGroup, action: Read, roles: ADMIN_PARTICIPANT },
        AuthorizationRule { object: ServiceGroup, action: Create, roles: ADMIN_PARTICIPANT },
        AuthorizationRule { object: ServiceGroup, action: Update, roles: ADMIN_PARTICIPANT },
        AuthorizationRule { object: ServiceGroup, action: Delete, roles: ADMIN_PARTICIPANT },
        AuthorizationRule { object: Job, action: Read, roles: ALL_ROLES },
        AuthorizationRule { object: Job, action: Claim, roles: AGENT_ONLY },
        AuthorizationRule { object: Job, action: Complete, roles: AGENT_ONLY },
        AuthorizationRule { object: Job, action: Fail, roles: AGENT_ONLY },
        AuthorizationRule { object: Job, action: ListPending, roles: AGENT_ONLY },
        AuthorizationRule { object: MetricType, action: Read, roles: ALL_ROLES },
        AuthorizationRule { object: MetricType, action: Create, roles: ADMIN_ONLY },
        AuthorizationRule { object: MetricType, action: Update, roles: ADMIN_ONLY },
        AuthorizationRule { object: MetricType, action: Delete, roles: ADMIN_ONLY },
        AuthorizationRule { object: MetricEntry, action: Read, roles: ADMIN_PARTICIPANT },
        AuthorizationRule { object: MetricEntry, action: Create, roles: AGENT_ONLY },
        AuthorizationRule { object: Token, action: Read, roles: ADMIN_PARTICIPANT },
        AuthorizationRule { object: Token, action: Create, roles: ADMIN_PARTICIPANT },
        AuthorizationRule { object: Token, action: Update, roles: ADMIN_PARTICIPANT },
        AuthorizationRule { object: Token, action: Delete, roles: ADMIN_PARTICIPANT },
        AuthorizationRule { object: Token, action: Generate, roles: ADMIN_PARTICIPANT },
        AuthorizationRule { object: AgentType, action: Read, roles: ALL_ROLES },
        AuthorizationRule { object: AgentType, action: Create, roles: ADMIN_ONLY },
        AuthorizationRule { object: AgentType, action: Update, roles: ADMIN_ONLY },
        AuthorizationRule { object: AgentType, action: Delete, roles: ADMIN_ONLY },
        AuthorizationRule { object: ServiceType, action: Read, roles: ALL_ROLES },
        AuthorizationRule { object: ServiceType, action: Create, roles: ADMIN_ONLY },
        AuthorizationRule { object: ServiceType, action: Update, roles: ADMIN_ONLY },
        AuthorizationRule { object: ServiceType, action: Delete, roles: ADMIN_ONLY },
        AuthorizationRule { object: Event, action: Read, roles: ALL_ROLES },
    ]
}
