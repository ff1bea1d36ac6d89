//! Plugin configuration, loaded from `config.toml` in the plugin's data folder.
//!
//! The file carries the plugin version that last wrote it. Files written by an older
//! version are passed through [`MIGRATIONS`] in order before use, then saved back with the
//! current version stamped in.

use std::path::{Path, PathBuf};

use semver::Version;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::restriction::{RestrictionKind, RestrictionRule};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("write config {path:?}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("detection_radius must be a positive number, got {0}")]
    InvalidRadius(f64),
}

/// Plugin release whose defaults apply.
///
/// The baseline release had a fixed 5 block radius and no rock formation check. The
/// extended release widened the radius and added the formation check, off by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Edition {
    Baseline,
    #[default]
    Extended,
}

impl Edition {
    #[must_use]
    pub const fn version(self) -> Version {
        match self {
            Self::Baseline => Version::new(1, 0, 0),
            Self::Extended => Version::new(1, 1, 0),
        }
    }

    #[must_use]
    pub const fn default_radius(self) -> f64 {
        match self {
            Self::Baseline => 5.0,
            Self::Extended => 10.0,
        }
    }

    #[must_use]
    pub const fn supports(self, kind: RestrictionKind) -> bool {
        match kind {
            RestrictionKind::Cave => true,
            RestrictionKind::Formation => matches!(self, Self::Extended),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Settings {
    pub version: String,
    pub detection_radius: f64,
    pub prevent_building_in_caves: bool,
    pub prevent_building_under_rock_formations: bool,
}

/// On-disk layout. Every field may be missing: older releases wrote fewer keys, and the
/// version decides whether the rest is kept.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct StoredSettings {
    version: Option<String>,
    detection_radius: Option<f64>,
    prevent_building_in_caves: Option<bool>,
    prevent_building_under_rock_formations: Option<bool>,
}

impl StoredSettings {
    fn into_settings(self, edition: Edition) -> Settings {
        let defaults = Settings::defaults(edition);
        Settings {
            version: self.version.unwrap_or_default(),
            detection_radius: self.detection_radius.unwrap_or(defaults.detection_radius),
            prevent_building_in_caves: self
                .prevent_building_in_caves
                .unwrap_or(defaults.prevent_building_in_caves),
            prevent_building_under_rock_formations: self
                .prevent_building_under_rock_formations
                .unwrap_or(defaults.prevent_building_under_rock_formations),
        }
    }
}

/// A migration brings settings written before `target` up to that version's layout.
pub struct MigrationStep {
    pub target: Version,
    pub apply: fn(Settings, Edition) -> Settings,
}

/// Applied in order to every file older than a step's target.
pub const MIGRATIONS: &[MigrationStep] = &[MigrationStep {
    target: Version::new(1, 0, 0),
    // Pre-release layouts are not carried over.
    apply: |_, edition| Settings::defaults(edition),
}];

impl Settings {
    #[must_use]
    pub fn defaults(edition: Edition) -> Self {
        Self {
            version: edition.version().to_string(),
            detection_radius: edition.default_radius(),
            prevent_building_in_caves: true,
            prevent_building_under_rock_formations: false,
        }
    }

    /// Version the file was written by. Missing or malformed versions count as 0.0.0.
    #[must_use]
    pub fn parsed_version(&self) -> Version {
        Version::parse(self.version.trim()).unwrap_or_else(|_| Version::new(0, 0, 0))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.detection_radius.is_finite() || self.detection_radius <= 0.0 {
            return Err(ConfigError::InvalidRadius(self.detection_radius));
        }
        Ok(())
    }

    /// Brings older settings up to `edition`. Returns whether anything changed.
    pub fn migrate(&mut self, edition: Edition) -> bool {
        let from = self.parsed_version();
        let to = edition.version();
        if from >= to {
            return false;
        }

        log::warn!("no_cave_building: Config changes detected! Updating...");
        let mut settings = std::mem::replace(self, Self::defaults(edition));
        for step in MIGRATIONS.iter().filter(|step| from < step.target) {
            settings = (step.apply)(settings, edition);
        }
        settings.version = to.to_string();
        *self = settings;
        log::warn!("no_cave_building: Config update complete! Updated from version {from} to {to}");
        true
    }

    /// Ordered rules for `edition`: caves first, then rock formations.
    #[must_use]
    pub fn rules(&self, edition: Edition) -> Vec<RestrictionRule> {
        [
            (RestrictionKind::Cave, self.prevent_building_in_caves),
            (
                RestrictionKind::Formation,
                self.prevent_building_under_rock_formations,
            ),
        ]
        .into_iter()
        .filter(|(kind, _)| edition.supports(*kind))
        .map(|(kind, enabled)| RestrictionRule::new(kind, self.detection_radius, enabled))
        .collect()
    }

    /// Load from `path`, creating it with `edition` defaults when missing. Older files are
    /// migrated and written back.
    pub fn load(path: &Path, edition: Edition) -> Result<Self, ConfigError> {
        if !path.exists() {
            let settings = Self::defaults(edition);
            settings.save(path)?;
            log::info!("no_cave_building: Created default config at {path:?}");
            return Ok(settings);
        }

        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut settings = Self::parse(&text, edition)?;
        if settings.migrate(edition) {
            settings.save(path)?;
        }
        settings.validate()?;
        Ok(settings)
    }

    /// Parses a config file's contents as-is, filling absent keys from `edition` defaults.
    /// No migration or validation happens here.
    pub fn parse(text: &str, edition: Edition) -> Result<Self, ConfigError> {
        let stored: StoredSettings = toml::from_str(text)?;
        Ok(stored.into_settings(edition))
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let write_err = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        let text = toml::to_string_pretty(self)?;
        std::fs::write(path, text).map_err(write_err)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::defaults(Edition::default())
    }
}
