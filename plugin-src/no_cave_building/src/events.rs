//! Placement event as delivered by the host, and the handler trait the plugin implements.

use std::future::Future;
use std::pin::Pin;

use uuid::Uuid;

use crate::math::Vector3;

pub trait Cancellable {
    fn cancelled(&self) -> bool;

    fn set_cancelled(&mut self, cancelled: bool);
}

/// Fired when a building piece is about to be committed to the world.
///
/// If cancelled, the piece is not placed.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockPlaceEvent {
    /// The placing player, `None` for system-driven placements.
    pub player: Option<Uuid>,
    /// Where the piece will go, `None` if the host could not resolve the placement target.
    pub block_position: Option<Vector3>,
    pub cancelled: bool,
}

impl BlockPlaceEvent {
    #[must_use]
    pub const fn new(player: Option<Uuid>, block_position: Option<Vector3>) -> Self {
        Self {
            player,
            block_position,
            cancelled: false,
        }
    }
}

impl Cancellable for BlockPlaceEvent {
    fn cancelled(&self) -> bool {
        self.cancelled
    }

    fn set_cancelled(&mut self, cancelled: bool) {
        self.cancelled = cancelled;
    }
}

/// Receives host events. `handle_blocking` runs before the host acts on the event and may
/// cancel it; `handle` only observes.
pub trait EventHandler<E>: Send + Sync {
    fn handle<'a>(&'a self, _event: &'a E) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>> {
        Box::pin(async {})
    }

    fn handle_blocking<'a>(
        &'a self,
        _event: &'a mut E,
    ) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>> {
        Box::pin(async {})
    }
}
