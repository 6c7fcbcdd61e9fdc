//! Configuration management with layered hierarchy

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::core::error::CostingError;

/// Directory holding per-project settings
pub const PROJECT_DIR: &str = ".costing";

/// Costing configuration with layered hierarchy
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Seed catalog file (embedded demo catalog when unset)
    pub catalog: Option<PathBuf>,

    /// Default BOM file (embedded demo BOM when unset)
    pub bom: Option<PathBuf>,

    /// List-price multiplier
    pub lp_factor: Option<f64>,

    /// Default output format
    pub default_format: Option<String>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load() -> Self {
        let project_dir = std::env::current_dir()
            .ok()
            .and_then(|cwd| Self::discover_project_dir(&cwd));
        let mut config = Self::load_files(
            Self::global_config_path().as_deref(),
            project_dir.as_deref(),
        );
        config.apply_env(|key| std::env::var(key).ok());
        config
    }

    /// Merge the global file then the project file; missing or unreadable files are skipped
    pub fn load_files(global: Option<&Path>, project_dir: Option<&Path>) -> Self {
        let mut config = Config::default();

        if let Some(global) = global.and_then(Self::read_file) {
            config.merge(global);
        }

        if let Some(dir) = project_dir {
            let path = dir.join(PROJECT_DIR).join("config.yaml");
            if let Some(project) = Self::read_file(&path) {
                config.merge(project.relative_to(dir));
            }
        }

        config
    }

    fn read_file(path: &Path) -> Option<Config> {
        let contents = std::fs::read_to_string(path).ok()?;
        match serde_yml::from_str::<Config>(&contents) {
            Ok(config) => {
                debug!(path = %path.display(), "loaded config");
                Some(config)
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring malformed config");
                None
            }
        }
    }

    /// Apply `COSTING_*` environment overrides
    pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(catalog) = var("COSTING_CATALOG") {
            self.catalog = Some(PathBuf::from(catalog));
        }
        if let Some(bom) = var("COSTING_BOM") {
            self.bom = Some(PathBuf::from(bom));
        }
        if let Some(factor) = var("COSTING_LP_FACTOR") {
            match factor.parse::<f64>() {
                Ok(f) => self.lp_factor = Some(f),
                Err(_) => warn!(value = %factor, "ignoring non-numeric COSTING_LP_FACTOR"),
            }
        }
    }

    /// Walk up from `start` to the nearest directory containing `.costing/`
    pub fn discover_project_dir(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .find(|dir| dir.join(PROJECT_DIR).is_dir())
            .map(Path::to_path_buf)
    }

    /// Get the path to the global config file
    fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "costing")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Resolve relative file paths against the project root
    fn relative_to(mut self, root: &Path) -> Self {
        self.catalog = self.catalog.map(|p| root.join(p));
        self.bom = self.bom.map(|p| root.join(p));
        self
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        if other.catalog.is_some() {
            self.catalog = other.catalog;
        }
        if other.bom.is_some() {
            self.bom = other.bom;
        }
        if other.lp_factor.is_some() {
            self.lp_factor = other.lp_factor;
        }
        if other.default_format.is_some() {
            self.default_format = other.default_format;
        }
    }

    /// List-price factor, 1 when unset
    pub fn lp_factor(&self) -> Result<f64, CostingError> {
        match self.lp_factor {
            None => Ok(1.0),
            Some(f) if f.is_finite() && f > 0.0 => Ok(f),
            Some(f) => Err(CostingError::InvalidLpFactor(f.to_string())),
        }
    }
}
