//! Host plugin contract: metadata, load context and lifecycle hooks.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::Arc;

use crate::ports::{Messenger, PermissionStore, SpatialQuery};

pub struct PluginMetadata<'a> {
    pub name: &'a str,
    pub version: &'a str,
    pub authors: &'a str,
    pub description: &'a str,
}

/// Everything the host hands a plugin on load.
#[derive(Clone)]
pub struct Context {
    data_folder: PathBuf,
    pub world: Arc<dyn SpatialQuery>,
    pub permissions: Arc<dyn PermissionStore>,
    pub messenger: Arc<dyn Messenger>,
}

impl Context {
    #[must_use]
    pub fn new(
        data_folder: impl Into<PathBuf>,
        world: Arc<dyn SpatialQuery>,
        permissions: Arc<dyn PermissionStore>,
        messenger: Arc<dyn Messenger>,
    ) -> Self {
        Self {
            data_folder: data_folder.into(),
            world,
            permissions,
            messenger,
        }
    }

    #[must_use]
    pub fn get_data_folder(&self) -> &Path {
        &self.data_folder
    }
}

pub type LifecycleFuture<'a> = Pin<Box<dyn Future<Output = Result<(), String>> + Send + 'a>>;

pub trait Plugin: Send + Sync {
    fn on_load(&mut self, context: Arc<Context>) -> LifecycleFuture<'_>;

    fn on_unload(&mut self, context: Arc<Context>) -> LifecycleFuture<'_>;
}
