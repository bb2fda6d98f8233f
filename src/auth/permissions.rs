/*!
 * # Permissions Module
 *
 * Permissions are `resource:action` strings carried in access tokens and
 * checked by `permission_middleware`.
 */

/// Permission actions
pub struct Actions;

impl Actions {
    pub const READ: &'static str = "read";
    pub const CREATE: &'static str = "create";
    pub const UPDATE: &'static str = "update";
    pub const MANAGE: &'static str = "manage";
    pub const ACCESS: &'static str = "access";
}

/// Resource types
pub struct Resources;

impl Resources {
    pub const MENU: &'static str = "menu";
    pub const EMPLOYEES: &'static str = "employees";
    pub const POSITIONS: &'static str = "positions";
    pub const ORDERS: &'static str = "orders";
    pub const PORTAL: &'static str = "portal";
}

/// Permission string constants used when gating routes
pub mod consts {
    // Menu
    pub const MENU_READ: &str = "menu:read";
    pub const MENU_MANAGE: &str = "menu:manage";

    // Staff
    pub const EMPLOYEES_READ: &str = "employees:read";
    pub const EMPLOYEES_MANAGE: &str = "employees:manage";
    pub const POSITIONS_READ: &str = "positions:read";

    // Orders
    pub const ORDERS_READ: &str = "orders:read";
    pub const ORDERS_CREATE: &str = "orders:create";
    pub const ORDERS_UPDATE: &str = "orders:update";

    // Customer self-service
    pub const PORTAL_ACCESS: &str = "portal:access";
}

/// Format a permission string
pub fn format_permission(resource: &str, action: &str) -> String {
    format!("{}:{}", resource, action)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constants_follow_resource_action_format() {
        assert_eq!(
            format_permission(Resources::MENU, Actions::READ),
            consts::MENU_READ
        );
        assert_eq!(
            format_permission(Resources::ORDERS, Actions::CREATE),
            consts::ORDERS_CREATE
        );
        assert_eq!(
            format_permission(Resources::ORDERS, Actions::UPDATE),
            consts::ORDERS_UPDATE
        );
        assert_eq!(
            format_permission(Resources::EMPLOYEES, Actions::MANAGE),
            consts::EMPLOYEES_MANAGE
        );
        assert_eq!(
            format_permission(Resources::PORTAL, Actions::ACCESS),
            consts::PORTAL_ACCESS
        );
    }
}
