//! Placement gate: decides whether a single building placement goes ahead.

use std::sync::Arc;

use uuid::Uuid;

use crate::math::Vector3;
use crate::permission;
use crate::ports::{Messenger, PermissionStore, SpatialQuery};
use crate::restriction::{RestrictionChecker, RestrictionKind, RestrictionRule};

/// A single placement attempt as seen by the gate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementRequest {
    /// `None` when the placement is not attributable to a player.
    pub actor: Option<Uuid>,
    pub target: Vector3,
}

impl PlacementRequest {
    #[must_use]
    pub const fn new(actor: Option<Uuid>, target: Vector3) -> Self {
        Self { actor, target }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict {
    pub allowed: bool,
    pub matched: Option<RestrictionKind>,
}

impl Verdict {
    pub const ALLOW: Self = Self {
        allowed: true,
        matched: None,
    };

    #[must_use]
    pub const fn deny(kind: RestrictionKind) -> Self {
        Self {
            allowed: false,
            matched: Some(kind),
        }
    }

    /// Tag of the matched restriction, e.g. `"cave"`.
    #[must_use]
    pub fn matched_type(&self) -> Option<&'static str> {
        self.matched.map(RestrictionKind::tag)
    }
}

pub struct BuildGate {
    rules: Vec<RestrictionRule>,
    checker: RestrictionChecker,
    permissions: Arc<dyn PermissionStore>,
    messenger: Arc<dyn Messenger>,
}

impl BuildGate {
    #[must_use]
    pub fn new(
        rules: Vec<RestrictionRule>,
        world: Arc<dyn SpatialQuery>,
        permissions: Arc<dyn PermissionStore>,
        messenger: Arc<dyn Messenger>,
    ) -> Self {
        Self {
            rules,
            checker: RestrictionChecker::new(world),
            permissions,
            messenger,
        }
    }

    /// Swaps the rule list, e.g. after a config reload.
    pub fn set_rules(&mut self, rules: Vec<RestrictionRule>) {
        self.rules = rules;
    }

    #[must_use]
    pub const fn checker(&self) -> &RestrictionChecker {
        &self.checker
    }

    /// Evaluates one placement. On denial the actor is notified exactly once before this
    /// returns; the returned verdict is authoritative either way.
    pub fn evaluate(&self, request: &PlacementRequest) -> Verdict {
        let Some(actor) = request.actor else {
            return Verdict::ALLOW;
        };

        match self.permissions.has_permission(actor, permission::IGNORE) {
            Ok(true) => return Verdict::ALLOW,
            Ok(false) => {}
            Err(e) => {
                // Fail open rather than block every build on a permission backend outage
                log::warn!(
                    "no_cave_building: Permission check failed for {actor}, allowing placement: {e}"
                );
                return Verdict::ALLOW;
            }
        }

        let Some(rule) = self
            .rules
            .iter()
            .filter(|rule| rule.enabled)
            .find(|rule| self.checker.is_restricted(request.target, rule.radius, rule.kind))
        else {
            return Verdict::ALLOW;
        };

        log::debug!(
            "no_cave_building: Denied placement by {actor} at ({:.1}, {:.1}, {:.1}): {}",
            request.target.x,
            request.target.y,
            request.target.z,
            rule.kind,
        );
        if let Err(e) = self.messenger.notify(actor, rule.kind.message_key()) {
            log::warn!("no_cave_building: Failed to notify {actor}: {e}");
        }
        Verdict::deny(rule.kind)
    }
}
