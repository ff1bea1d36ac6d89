//! No Cave Building: stops players from building inside caves and under rock formations.
//!
//! Layout:
//! - **[restriction]**: restricted-area detection by proximity and object name
//! - **[gate]**: per-placement decision: bypass permission, ordered rules, denial notice
//! - **[handlers]**: block place handler that cancels denied placements
//! - **[config]**: `config.toml` loading, editions and version migrations
//! - **[lang]**: localized denial messages
//! - **[permission]**: permission nodes
//! - **[ports]**: spatial query, permission and messaging interfaces supplied by the host
//! - **[pool]**: reusable query result buffers

pub mod config;
pub mod events;
pub mod gate;
pub mod handlers;
pub mod lang;
pub mod math;
pub mod permission;
pub mod plugin;
pub mod pool;
pub mod ports;
pub mod restriction;

use std::sync::Arc;

use tokio::sync::RwLock;

use config::{Edition, Settings};
use gate::BuildGate;
use handlers::BlockPlaceHandler;
use plugin::{Context, LifecycleFuture, Plugin, PluginMetadata};

pub const METADATA: PluginMetadata<'static> = PluginMetadata {
    name: "no_cave_building",
    version: env!("CARGO_PKG_VERSION"),
    authors: "VisEntities",
    description: "Prevents players from building inside caves",
};

const CONFIG_FILE: &str = "config.toml";

// ---------------------------------------------------------------------------
// Plugin
// ---------------------------------------------------------------------------

pub struct NoCaveBuildingPlugin {
    edition: Edition,
    state: Option<PluginState>,
}

struct PluginState {
    gate: Arc<RwLock<BuildGate>>,
    place_handler: Arc<BlockPlaceHandler>,
}

impl NoCaveBuildingPlugin {
    #[must_use]
    pub const fn new(edition: Edition) -> Self {
        Self {
            edition,
            state: None,
        }
    }

    /// The placement handler to register with the host. `None` until loaded.
    #[must_use]
    pub fn place_handler(&self) -> Option<Arc<BlockPlaceHandler>> {
        self.state.as_ref().map(|s| s.place_handler.clone())
    }

    /// Re-reads `config.toml` and swaps the active rules.
    pub async fn reload(&self, context: &Context) -> Result<(), String> {
        let Some(state) = &self.state else {
            return Err("no_cave_building: reload before load".to_owned());
        };
        let settings = self.load_settings(context)?;
        state.gate.write().await.set_rules(settings.rules(self.edition));
        log::info!("no_cave_building: Reloaded config");
        Ok(())
    }

    fn load_settings(&self, context: &Context) -> Result<Settings, String> {
        let path = context.get_data_folder().join(CONFIG_FILE);
        Settings::load(&path, self.edition).map_err(|e| format!("no_cave_building: {e}"))
    }
}

impl Default for NoCaveBuildingPlugin {
    fn default() -> Self {
        Self::new(Edition::default())
    }
}

impl Plugin for NoCaveBuildingPlugin {
    fn on_load(&mut self, context: Arc<Context>) -> LifecycleFuture<'_> {
        let settings = match self.load_settings(&context) {
            Ok(settings) => settings,
            Err(e) => {
                log::error!("{e}");
                return Box::pin(async move { Err(e) });
            }
        };

        Box::pin(async move {
            permission::register_permissions(context.permissions.as_ref());

            let gate = Arc::new(RwLock::new(BuildGate::new(
                settings.rules(self.edition),
                context.world.clone(),
                context.permissions.clone(),
                context.messenger.clone(),
            )));
            let place_handler = Arc::new(BlockPlaceHandler { gate: gate.clone() });
            self.state = Some(PluginState {
                gate,
                place_handler,
            });

            log::info!(
                "no_cave_building: Loaded v{} (radius {}, caves: {}, rock formations: {})",
                METADATA.version,
                settings.detection_radius,
                settings.prevent_building_in_caves,
                settings.prevent_building_under_rock_formations
                    && self.edition == Edition::Extended,
            );
            Ok(())
        })
    }

    fn on_unload(&mut self, _context: Arc<Context>) -> LifecycleFuture<'_> {
        Box::pin(async move {
            self.state = None;
            Ok(())
        })
    }
}
