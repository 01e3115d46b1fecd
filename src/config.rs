//! Site configuration loaded from an optional `site.toml`

use anyhow::{Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::classify::TypePrecedence;

pub const DEFAULT_CONFIG_FILE: &str = "site.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Site title shown on the home page
    pub title: String,
    /// Footer text on every page
    pub footer: String,
    /// Theme catalog JSON
    pub catalog: PathBuf,
    /// Optional model name to image table for the model picker
    pub model_images: Option<PathBuf>,
    /// Root of the generated site; the home page lands here
    pub output_dir: PathBuf,
    /// Detail page directory, relative to `output_dir`
    pub pages_dir: String,
    pub type_precedence: TypePrecedence,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Sony Ericsson Themes".to_string(),
            footer: "made by Beamish 🦆".to_string(),
            catalog: PathBuf::from("themes.json"),
            model_images: None,
            output_dir: PathBuf::from("."),
            pages_dir: "themes-pages".to_string(),
            type_precedence: TypePrecedence::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: SiteConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(config)
    }

    pub fn pages_path(&self) -> PathBuf {
        self.output_dir.join(&self.pages_dir)
    }

    pub fn home_path(&self) -> PathBuf {
        self.output_dir.join("index.html")
    }

    pub fn script_path(&self) -> PathBuf {
        self.output_dir.join("js").join("main.js")
    }
}
