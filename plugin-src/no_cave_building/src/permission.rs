//! Permission nodes registered by the plugin.

use crate::ports::PermissionStore;

/// Exempts a player from every build restriction.
pub const IGNORE: &str = "no_cave_building:ignore";

/// Operator level required by a permission's default grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PermissionLvl {
    Zero = 0,
    One = 1,
    Two = 2,
    Three = 3,
    Four = 4,
}

/// Who holds a permission before any explicit grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionDefault {
    Allow,
    Deny,
    Op(PermissionLvl),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permission {
    pub node: &'static str,
    pub description: &'static str,
    pub default: PermissionDefault,
}

impl Permission {
    #[must_use]
    pub const fn new(
        node: &'static str,
        description: &'static str,
        default: PermissionDefault,
    ) -> Self {
        Self {
            node,
            description,
            default,
        }
    }
}

/// Every node this plugin owns.
#[must_use]
pub fn permissions() -> Vec<Permission> {
    vec![Permission::new(
        IGNORE,
        "Ignore cave and rock formation build restrictions",
        PermissionDefault::Op(PermissionLvl::Four),
    )]
}

/// Registers all nodes with the host. Failures are logged and skipped.
pub fn register_permissions(store: &dyn PermissionStore) {
    for permission in permissions() {
        let node = permission.node;
        if let Err(e) = store.register_permission(permission) {
            log::warn!("no_cave_building: Failed to register permission {node}: {e}");
        }
    }
}
