// SPDX-License-Identifier: MIT

//! ServiceGroup: broker-scoped logical grouping of services.

use crate::org::BrokerId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

crate::define_id! {
    pub struct ServiceGroupId;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceGroup {
    pub id: ServiceGroupId,
    pub name: String,
    pub broker_id: BrokerId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
