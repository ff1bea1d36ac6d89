//! Event handler that vetoes building placements in restricted areas.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::events::{BlockPlaceEvent, Cancellable, EventHandler};
use crate::gate::{BuildGate, PlacementRequest};

pub struct BlockPlaceHandler {
    pub gate: Arc<RwLock<BuildGate>>,
}

impl EventHandler<BlockPlaceEvent> for BlockPlaceHandler {
    fn handle_blocking<'a>(
        &'a self,
        event: &'a mut BlockPlaceEvent,
    ) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>> {
        Box::pin(async move {
            if event.cancelled() {
                return;
            }
            // No resolvable target, nothing to check
            let Some(target) = event.block_position else {
                return;
            };

            let gate = self.gate.read().await;
            let verdict = gate.evaluate(&PlacementRequest::new(event.player, target));
            if !verdict.allowed {
                event.set_cancelled(true);
            }
        })
    }
}
