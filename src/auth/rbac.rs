/*!
 * # Role-Based Access Control (RBAC) Module
 *
 * Every account carries exactly one role; each role maps to a fixed set of
 * permissions.
 */

use super::permissions::consts;
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use utoipa::ToSchema;

/// Account role
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    ToSchema,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    Manager,
    Employee,
    Customer,
}

const STAFF_PERMISSIONS: &[&str] = &[
    consts::MENU_READ,
    consts::MENU_MANAGE,
    consts::EMPLOYEES_READ,
    consts::EMPLOYEES_MANAGE,
    consts::POSITIONS_READ,
    consts::ORDERS_READ,
    consts::ORDERS_CREATE,
    consts::ORDERS_UPDATE,
];

// Managers and employees currently see the same screens.
lazy_static! {
    pub static ref ROLE_PERMISSIONS: HashMap<Role, Vec<&'static str>> = {
        let mut roles = HashMap::new();
        roles.insert(Role::Manager, STAFF_PERMISSIONS.to_vec());
        roles.insert(Role::Employee, STAFF_PERMISSIONS.to_vec());
        roles.insert(Role::Customer, vec![consts::PORTAL_ACCESS]);
        roles
    };
}

impl Role {
    /// Permissions granted to this role
    pub fn permissions(&self) -> Vec<String> {
        ROLE_PERMISSIONS
            .get(self)
            .map(|perms| perms.iter().map(|p| p.to_string()).collect())
            .unwrap_or_default()
    }

    pub fn is_staff(&self) -> bool {
        matches!(self, Role::Manager | Role::Employee)
    }
}
