//! Application-wide editor settings

use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use crate::core::{Error, Result};
use crate::edit::ToolOptions;
use crate::ground::quadtree::DEFAULT_DEPTH;

/// Deepest quadtree accepted from a config file
pub const MAX_QUADTREE_DEPTH: u8 = 8;

/// Settings shared by every open map.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Rebuild the ground quadtree before each save
    pub recalculate_quadtree_on_save: bool,
    /// Levels below the quadtree root
    pub quadtree_depth: u8,
    /// Options given to newly opened views
    pub default_tool_options: ToolOptions,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            recalculate_quadtree_on_save: true,
            quadtree_depth: DEFAULT_DEPTH,
            default_tool_options: ToolOptions::default(),
        }
    }
}

impl EditorConfig {
    /// Load from a JSON file. A missing file gives the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            info!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let json = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }

    /// Write as pretty JSON, creating parent directories
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.quadtree_depth > MAX_QUADTREE_DEPTH {
            return Err(Error::Config(format!(
                "quadtree_depth {} exceeds {}",
                self.quadtree_depth, MAX_QUADTREE_DEPTH
            )));
        }
        if !(self.default_tool_options.grid_size > 0.0) {
            return Err(Error::Config(format!(
                "grid_size must be positive, got {}",
                self.default_tool_options.grid_size
            )));
        }
        Ok(())
    }
}
