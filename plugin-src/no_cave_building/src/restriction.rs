//! Restricted-area detection.
//!
//! A point counts as restricted when any world-layer object within the rule's radius has
//! a name containing the restriction's tag (`"cave"`, `"formation"`). This is a proximity
//! heuristic, not a volumetric test: a cave mesh anywhere inside the radius is enough.

use std::fmt;
use std::sync::Arc;

use crate::lang::MessageKey;
use crate::math::Vector3;
use crate::pool::BufferPool;
use crate::ports::{LayerMask, NearbyObject, SpatialQuery, TriggerInteraction};

/// Kinds of restricted area, each with its own name tag and denial message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RestrictionKind {
    Cave,
    Formation,
}

impl RestrictionKind {
    /// Substring looked for in nearby object names.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Cave => "cave",
            Self::Formation => "formation",
        }
    }

    #[must_use]
    pub const fn message_key(self) -> MessageKey {
        match self {
            Self::Cave => MessageKey::CannotBuildInCave,
            Self::Formation => MessageKey::CannotBuildUnderRockFormation,
        }
    }
}

impl fmt::Display for RestrictionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// One configured check. Rules are evaluated in the order they are listed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RestrictionRule {
    pub kind: RestrictionKind,
    /// Always positive; enforced when settings are validated.
    pub radius: f64,
    pub enabled: bool,
}

impl RestrictionRule {
    #[must_use]
    pub const fn new(kind: RestrictionKind, radius: f64, enabled: bool) -> Self {
        Self {
            kind,
            radius,
            enabled,
        }
    }
}

/// ASCII case-insensitive, byte-wise substring test. Empty names never match.
#[must_use]
pub fn name_matches(name: &str, tag: &str) -> bool {
    let (name, tag) = (name.as_bytes(), tag.as_bytes());
    if name.is_empty() || tag.is_empty() || tag.len() > name.len() {
        return false;
    }
    name.windows(tag.len()).any(|w| w.eq_ignore_ascii_case(tag))
}

/// Answers "is this point inside a restricted area of the given kind".
pub struct RestrictionChecker {
    world: Arc<dyn SpatialQuery>,
    buffers: BufferPool<NearbyObject>,
}

impl RestrictionChecker {
    #[must_use]
    pub fn new(world: Arc<dyn SpatialQuery>) -> Self {
        Self {
            world,
            buffers: BufferPool::default(),
        }
    }

    /// Returns true if any world object within `radius` of `point` is tagged `kind`.
    ///
    /// A failing spatial query is logged and reported as unrestricted.
    pub fn is_restricted(&self, point: Vector3, radius: f64, kind: RestrictionKind) -> bool {
        let mut nearby = self.buffers.acquire();
        if let Err(e) = self.world.overlap(
            point,
            radius,
            LayerMask::WORLD,
            TriggerInteraction::Ignore,
            &mut nearby,
        ) {
            log::warn!("no_cave_building: Spatial query failed, allowing placement: {e}");
            return false;
        }

        nearby.iter().any(|object| name_matches(&object.name, kind.tag()))
    }

    /// The result buffer pool, exposed for diagnostics.
    #[must_use]
    pub const fn buffers(&self) -> &BufferPool<NearbyObject> {
        &self.buffers
    }
}
