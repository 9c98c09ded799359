//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

const PROJECT_FILES: [&str; 2] = ["votum.toml", ".votum.toml"];

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. `VOTUM_`-prefixed environment variables (`__` separates sections,
    ///    e.g. `VOTUM_COUNCIL__MAJORITY_DEFAULT=2/3`)
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./votum.toml` or `./.votum.toml`
    /// 4. Global: `$XDG_CONFIG_HOME/votum/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&Path>) -> Result<FileConfig, Box<figment::Error>> {
        Self::figment(config_path)
            .merge(Env::prefixed("VOTUM_").split("__"))
            .extract()
            .map_err(Box::new)
    }

    /// File sources only, without the environment
    pub fn figment(config_path: Option<&Path>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(&global_path));
        }

        if let Some(path) = Self::project_config_path() {
            figment = figment.merge(Toml::file(path));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// Get the global config file path
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("votum").join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Describe the config file locations being used (for --show-config)
    pub fn describe_sources(config_path: Option<&Path>) -> Vec<String> {
        let mut lines = vec!["Configuration sources (in priority order):".to_string()];

        lines.push("  [ENV  ] VOTUM_* environment variables".to_string());

        if let Some(path) = config_path {
            let found = if path.exists() { "FOUND" } else { "MISSING" };
            lines.push(format!("  [{:5}] Explicit: {}", found, path.display()));
        }

        match Self::project_config_path() {
            Some(path) => lines.push(format!("  [FOUND] Project: {}", path.display())),
            None => lines.push("  [     ] Project: ./votum.toml or ./.votum.toml".to_string()),
        }

        if let Some(path) = Self::global_config_path() {
            let found = if path.exists() { "FOUND" } else { "     " };
            lines.push(format!("  [{}] Global:  {}", found, path.display()));
        }

        lines.push("  [     ] Default: built-in defaults".to_string());
        lines
    }
}
