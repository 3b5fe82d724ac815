//! Configuration loaded from environment variables.

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde_json::Value;
use tracing::info;

use crate::content::{Attributes, default_attributes_tap};
use crate::tap::{DEFAULT_WEIGHT, TapRegistry};

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port (default: 3000).
    pub port: u16,

    /// Directory of theme templates overriding the bundled ones.
    pub theme_dir: Option<PathBuf>,

    /// TOML file of per-block default attribute overrides.
    pub defaults_file: Option<PathBuf>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .context("PORT must be a valid u16")?;

        let theme_dir = env::var("THEME_DIR")
            .ok()
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);

        let defaults_file = env::var("DEFAULTS_FILE")
            .ok()
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);

        Ok(Self {
            port,
            theme_dir,
            defaults_file,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3000,
            theme_dir: None,
            defaults_file: None,
        }
    }
}

/// Default attribute overrides keyed by block identifier.
///
/// ```toml
/// ["wp-bootstrap-blocks/column"]
/// sizeXs = 6
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DefaultOverrides {
    blocks: IndexMap<String, Attributes>,
}

impl DefaultOverrides {
    /// Parse overrides from TOML source.
    pub fn parse(source: &str) -> Result<Self> {
        let blocks: IndexMap<String, Attributes> =
            toml::from_str(source).context("invalid default overrides")?;
        Ok(Self { blocks })
    }

    /// Load overrides from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::parse(&source).with_context(|| format!("in {}", path.display()))
    }

    /// Number of blocks with overrides.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Overrides for one block.
    pub fn get(&self, identifier: &str) -> Option<&Attributes> {
        self.blocks.get(identifier)
    }

    /// Register each block's overrides as a default-attributes filter.
    ///
    /// Must run before the lifecycle ready event to take effect.
    pub fn register(&self, taps: &TapRegistry) {
        for (identifier, overrides) in &self.blocks {
            let overrides = overrides.clone();
            let count = overrides.len();
            taps.register_weighted(
                &default_attributes_tap(identifier),
                DEFAULT_WEIGHT,
                "config",
                move |mut value| {
                    if let Value::Object(map) = &mut value {
                        for (name, v) in &overrides {
                            map.insert(name.clone(), v.clone());
                        }
                    }
                    value
                },
            );
            info!(block = %identifier, overrides = count, "default overrides registered");
        }
    }
}
