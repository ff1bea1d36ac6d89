#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use no_cave_building::gate::BuildGate;
use no_cave_building::lang::MessageKey;
use no_cave_building::math::Vector3;
use no_cave_building::permission::{self, Permission};
use no_cave_building::ports::{Messenger, NearbyObject, PermissionStore, PortError, StaticWorld};
use no_cave_building::restriction::{RestrictionKind, RestrictionRule};
use uuid::Uuid;

#[derive(Default)]
pub struct MemoryPermissions {
    pub registered: Mutex<Vec<Permission>>,
    pub grants: Mutex<HashSet<(Uuid, String)>>,
}

impl MemoryPermissions {
    pub fn grant_ignore(&self, player: Uuid) {
        self.grants
            .lock()
            .unwrap()
            .insert((player, permission::IGNORE.to_owned()));
    }
}

impl PermissionStore for MemoryPermissions {
    fn register_permission(&self, permission: Permission) -> Result<(), PortError> {
        self.registered.lock().unwrap().push(permission);
        Ok(())
    }

    fn has_permission(&self, player: Uuid, node: &str) -> Result<bool, PortError> {
        Ok(self.grants.lock().unwrap().contains(&(player, node.to_owned())))
    }
}

#[derive(Default)]
pub struct RecordingMessenger {
    pub sent: Mutex<Vec<(Uuid, MessageKey)>>,
}

impl RecordingMessenger {
    pub fn sent(&self) -> Vec<(Uuid, MessageKey)> {
        self.sent.lock().unwrap().clone()
    }
}

impl Messenger for RecordingMessenger {
    fn notify(&self, player: Uuid, key: MessageKey) -> Result<(), PortError> {
        self.sent.lock().unwrap().push((player, key));
        Ok(())
    }
}

pub struct Harness {
    pub world: Arc<StaticWorld>,
    pub permissions: Arc<MemoryPermissions>,
    pub messenger: Arc<RecordingMessenger>,
}

impl Harness {
    pub fn new(objects: Vec<NearbyObject>) -> Self {
        Self {
            world: Arc::new(StaticWorld::new(objects)),
            permissions: Arc::new(MemoryPermissions::default()),
            messenger: Arc::new(RecordingMessenger::default()),
        }
    }

    pub fn gate(&self, rules: Vec<RestrictionRule>) -> BuildGate {
        BuildGate::new(
            rules,
            self.world.clone(),
            self.permissions.clone(),
            self.messenger.clone(),
        )
    }
}

pub fn cave_rule(radius: f64) -> RestrictionRule {
    RestrictionRule::new(RestrictionKind::Cave, radius, true)
}

pub fn formation_rule(radius: f64) -> RestrictionRule {
    RestrictionRule::new(RestrictionKind::Formation, radius, true)
}

pub fn at(x: f64, y: f64, z: f64) -> Vector3 {
    Vector3::new(x, y, z)
}
