//! Feature flags for controlling optional behaviors.
//!
//! Features can be enabled via:
//! - CLI: `--features rename-hunks,copy-hunks`
//! - Environment: `TREE_PATCH_FEATURES=rename-hunks,copy-hunks`

use std::collections::HashSet;
use std::env;

use clap::ValueEnum;
use log::warn;

use crate::apply::ApplyOptions;

/// Environment variable holding a comma-separated feature list.
pub const FEATURES_ENV: &str = "TREE_PATCH_FEATURES";

/// Available feature flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Feature {
    /// Apply hunks carried by a rename to the moved file instead of ignoring them.
    RenameHunks,
    /// Apply hunks carried by a copy to the new file instead of ignoring them.
    CopyHunks,
}

/// Collection of enabled features.
#[derive(Debug, Clone, Default)]
pub struct Features {
    enabled: HashSet<Feature>,
}

impl Features {
    /// Create an empty feature set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from environment variable.
    pub fn from_env() -> Self {
        Self::from_list(env::var(FEATURES_ENV).ok().as_deref().unwrap_or(""))
    }

    /// Parse a comma-separated list, skipping (and warning about) unknown names.
    pub fn from_list(value: &str) -> Self {
        let mut features = Self::new();
        for name in value.split(',').map(|s| s.trim()).filter(|s| !s.is_empty()) {
            if let Ok(feature) = Feature::from_str(name, true) {
                features.enable(feature);
            } else {
                warn!("Unknown feature '{}' in {}", name, FEATURES_ENV);
            }
        }
        features
    }

    /// Enable a feature.
    pub fn enable(&mut self, feature: Feature) {
        self.enabled.insert(feature);
    }

    /// Disable a feature.
    pub fn disable(&mut self, feature: Feature) {
        self.enabled.remove(&feature);
    }

    /// Check if a feature is enabled.
    pub fn is_enabled(&self, feature: Feature) -> bool {
        self.enabled.contains(&feature)
    }

    /// Merge with CLI overrides.
    pub fn with_overrides(mut self, cli_features: Option<&[Feature]>) -> Self {
        if let Some(features) = cli_features {
            for feature in features {
                self.enable(*feature);
            }
        }
        self
    }

    /// List all enabled features.
    pub fn enabled_features(&self) -> impl Iterator<Item = Feature> + '_ {
        self.enabled.iter().copied()
    }
}

impl From<&Features> for ApplyOptions {
    fn from(features: &Features) -> Self {
        ApplyOptions {
            rename_hunks: features.is_enabled(Feature::RenameHunks),
            copy_hunks: features.is_enabled(Feature::CopyHunks),
        }
    }
}
