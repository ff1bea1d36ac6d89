//! Host-facing ports: spatial queries, permission storage and player messaging.
//!
//! The plugin never reaches into the host directly. Each collaborator is handed in as
//! an `Arc<dyn ...>` when the plugin is constructed, so tests and alternative hosts
//! can supply their own implementations.

use std::sync::RwLock;

use thiserror::Error;
use uuid::Uuid;

use crate::lang::MessageKey;
use crate::math::Vector3;
use crate::permission::Permission;

/// Failure reported by a host port. Callers in this crate treat every port failure as fail-open.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PortError {
    #[error("{0} is unavailable")]
    Unavailable(&'static str),
    #[error("{0}")]
    Other(String),
}

/// Collision layer a world object lives on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    Default,
    World,
    Terrain,
    Construction,
    Deployed,
}

impl Layer {
    const fn bit(self) -> u32 {
        match self {
            Self::Default => 1 << 0,
            Self::World => 1 << 1,
            Self::Terrain => 1 << 2,
            Self::Construction => 1 << 3,
            Self::Deployed => 1 << 4,
        }
    }
}

/// Set of layers a query is restricted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerMask(u32);

impl LayerMask {
    /// Static world geometry: rocks, caves, monuments.
    pub const WORLD: Self = Self(Layer::World.bit());

    #[must_use]
    pub const fn contains(self, layer: Layer) -> bool {
        self.0 & layer.bit() != 0
    }
}

/// Whether trigger volumes take part in a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerInteraction {
    Ignore,
    Collide,
}

/// A piece of geometry returned by a proximity query.
#[derive(Debug, Clone, PartialEq)]
pub struct NearbyObject {
    pub name: String,
    pub layer: Layer,
    pub is_trigger: bool,
    pub position: Vector3,
}

impl NearbyObject {
    /// A non-trigger world-layer object, the common case for terrain pieces.
    #[must_use]
    pub fn world(name: impl Into<String>, position: Vector3) -> Self {
        Self {
            name: name.into(),
            layer: Layer::World,
            is_trigger: false,
            position,
        }
    }
}

/// Proximity query against the host's collision world.
pub trait SpatialQuery: Send + Sync {
    /// Appends every object within `radius` of `center` that matches `layers` and
    /// `triggers` to `out`. `out` arrives empty.
    fn overlap(
        &self,
        center: Vector3,
        radius: f64,
        layers: LayerMask,
        triggers: TriggerInteraction,
        out: &mut Vec<NearbyObject>,
    ) -> Result<(), PortError>;
}

/// Per-player permission grants.
pub trait PermissionStore: Send + Sync {
    fn register_permission(&self, permission: Permission) -> Result<(), PortError>;

    fn has_permission(&self, player: Uuid, node: &str) -> Result<bool, PortError>;
}

/// Delivers a localized notice to a player. Locale resolution belongs to the implementation.
pub trait Messenger: Send + Sync {
    fn notify(&self, player: Uuid, key: MessageKey) -> Result<(), PortError>;
}

/// In-memory [`SpatialQuery`] over a fixed list of objects, for hosts without a physics
/// engine and for tests.
#[derive(Debug, Default)]
pub struct StaticWorld {
    objects: RwLock<Vec<NearbyObject>>,
}

impl StaticWorld {
    #[must_use]
    pub fn new(objects: Vec<NearbyObject>) -> Self {
        Self {
            objects: RwLock::new(objects),
        }
    }

    pub fn add(&self, object: NearbyObject) {
        if let Ok(mut objects) = self.objects.write() {
            objects.push(object);
        }
    }
}

impl SpatialQuery for StaticWorld {
    fn overlap(
        &self,
        center: Vector3,
        radius: f64,
        layers: LayerMask,
        triggers: TriggerInteraction,
        out: &mut Vec<NearbyObject>,
    ) -> Result<(), PortError> {
        let objects = self
            .objects
            .read()
            .map_err(|_| PortError::Unavailable("static world"))?;
        let radius_sq = radius * radius;
        out.extend(
            objects
                .iter()
                .filter(|o| layers.contains(o.layer))
                .filter(|o| triggers == TriggerInteraction::Collide || !o.is_trigger)
                .filter(|o| o.position.squared_distance_to(&center) <= radius_sq)
                .cloned(),
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(
        world: &StaticWorld,
        center: Vector3,
        radius: f64,
        triggers: TriggerInteraction,
    ) -> Vec<String> {
        let mut out = Vec::new();
        world
            .overlap(center, radius, LayerMask::WORLD, triggers, &mut out)
            .unwrap();
        out.into_iter().map(|o| o.name).collect()
    }

    #[test]
    fn world_mask_only_matches_world_layer() {
        assert!(LayerMask::WORLD.contains(Layer::World));
        assert!(!LayerMask::WORLD.contains(Layer::Terrain));
    }

    #[test]
    fn static_world_filters_by_distance_layer_and_trigger() {
        let origin = Vector3::default();
        let world = StaticWorld::new(vec![
            NearbyObject::world("cave_a", Vector3::new(4.0, 0.0, 0.0)),
            NearbyObject::world("cave_far", Vector3::new(40.0, 0.0, 0.0)),
            NearbyObject {
                name: "cave_terrain".into(),
                layer: Layer::Terrain,
                is_trigger: false,
                position: origin,
            },
            NearbyObject {
                name: "cave_trigger".into(),
                layer: Layer::World,
                is_trigger: true,
                position: origin,
            },
        ]);

        assert_eq!(query(&world, origin, 5.0, TriggerInteraction::Ignore), vec!["cave_a"]);
        assert_eq!(
            query(&world, origin, 5.0, TriggerInteraction::Collide),
            vec!["cave_a", "cave_trigger"]
        );
    }

    #[test]
    fn static_world_radius_is_inclusive() {
        let origin = Vector3::default();
        let world = StaticWorld::new(vec![NearbyObject::world(
            "rock",
            Vector3::new(0.0, 10.0, 0.0),
        )]);
        assert_eq!(query(&world, origin, 10.0, TriggerInteraction::Ignore), vec!["rock"]);
        world.add(NearbyObject::world("rock2", Vector3::new(0.0, 0.0, 10.5)));
        assert_eq!(query(&world, origin, 10.0, TriggerInteraction::Ignore), vec!["rock"]);
    }
}
