//! Configuration management for the version manager.
//!
//! Handles:
//! - Command-line argument parsing
//! - Project configuration (`.docver.toml`)
//! - Catalog location, save shortcuts and user-facing texts

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;

use crate::input::Shortcut;
use crate::manager::Messages;
use crate::version::DocumentId;

/// File name of the per-project configuration
pub const PROJECT_CONFIG_FILE: &str = ".docver.toml";

/// Command-line arguments for the version manager
#[derive(Debug, Default, Parser)]
#[command(name = "docver")]
#[command(about = "Browse and create versions of a document")]
#[command(version)]
pub struct Args {
    /// Document to open on start
    #[arg(long, help = "Document id to open on start")]
    pub document: Option<DocumentId>,

    /// Version catalog file
    #[arg(long, help = "Path of the JSON version catalog")]
    pub store: Option<PathBuf>,

    /// Project configuration file
    #[arg(long, help = "Configuration file (defaults to ./.docver.toml)")]
    pub config: Option<PathBuf>,

    /// Log level for the version manager
    #[arg(
        long,
        default_value = "info",
        help = "Log level (trace, debug, info, warn, error)"
    )]
    pub log_level: String,
}

/// Contents of `.docver.toml`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Catalog path, relative to the config file
    pub store: Option<PathBuf>,
    /// Save shortcuts such as `"ctrl+s"`
    pub save_shortcuts: Option<Vec<String>>,
    pub messages: Messages,
}

impl ProjectConfig {
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse project configuration")
    }
}

/// Combined configuration from all sources
#[derive(Debug, Clone)]
pub struct Config {
    /// Document opened on start
    pub document: Option<DocumentId>,
    /// Version catalog location
    pub store_path: PathBuf,
    /// Key chords that trigger "save"
    pub save_shortcuts: Vec<Shortcut>,
    /// User-facing texts
    pub messages: Messages,
    /// Project config that was loaded, if any
    pub project_config_path: Option<PathBuf>,
    /// Log level
    pub log_level: String,
}

impl Config {
    /// Create configuration from command-line arguments
    pub fn from_args_and_env() -> Result<Self> {
        Self::from_args(Args::parse())
    }

    /// Create configuration from explicit arguments (useful for testing)
    pub fn from_args(args: Args) -> Result<Self> {
        let (project, project_config_path) = match &args.config {
            Some(path) => (Some(Self::read_project_config(path)?), Some(path.clone())),
            None => {
                let default_path = PathBuf::from(PROJECT_CONFIG_FILE);
                if default_path.exists() {
                    (
                        Some(Self::read_project_config(&default_path)?),
                        Some(default_path),
                    )
                } else {
                    (None, None)
                }
            }
        };
        let project = project.unwrap_or_default();

        let save_shortcuts = match &project.save_shortcuts {
            Some(bindings) => Shortcut::parse_all(bindings).context("Invalid save_shortcuts")?,
            None => Shortcut::default_save(),
        };

        // CLI > project config > user data directory
        let store_path = match (args.store, &project.store) {
            (Some(path), _) => path,
            (None, Some(path)) => Self::relative_to_config(path, project_config_path.as_deref()),
            (None, None) => Self::default_store_path()?,
        };

        Ok(Config {
            document: args.document,
            store_path,
            save_shortcuts,
            messages: project.messages,
            project_config_path,
            log_level: args.log_level,
        })
    }

    pub fn has_project_config(&self) -> bool {
        self.project_config_path.is_some()
    }

    fn read_project_config(path: &Path) -> Result<ProjectConfig> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        ProjectConfig::from_toml(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    fn relative_to_config(path: &Path, config_path: Option<&Path>) -> PathBuf {
        match config_path.and_then(Path::parent) {
            Some(dir) if path.is_relative() => dir.join(path),
            _ => path.to_path_buf(),
        }
    }

    fn default_store_path() -> Result<PathBuf> {
        let data_dir = dirs::data_local_dir()
            .context("Could not determine local data directory")?;
        Ok(data_dir.join("docver").join("versions.json"))
    }
}
