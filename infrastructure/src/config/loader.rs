//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

const APP_DIR: &str = "streamchat";
const PROJECT_FILES: [&str; 2] = ["streamchat.toml", ".streamchat.toml"];
const ENV_PREFIX: &str = "STREAMCHAT_";

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    pub fn load(config_path: Option<&Path>) -> Result<FileConfig, Box<figment::Error>> {
        Self::figment(config_path).extract().map_err(Box::new)
    }

    /// Build the layered figment without extracting it.
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

        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// Get the global config file path
    ///
    /// Returns `$XDG_CONFIG_HOME/streamchat/config.toml` if set, otherwise the
    /// platform config directory equivalent.
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Default REPL history location when none is configured.
    pub fn default_history_path() -> Option<PathBuf> {
        dirs::data_dir().map(|d| d.join(APP_DIR).join("history.txt"))
    }

    /// Print the config file locations being used (for debugging)
    pub fn print_config_sources(config_path: Option<&Path>) {
        println!("Configuration sources (in priority order):");

        let env_keys: Vec<String> = std::env::vars()
            .map(|(key, _)| key)
            .filter(|key| key.starts_with(ENV_PREFIX))
            .collect();
        if env_keys.is_empty() {
            println!("  [     ] Env:     {}*", ENV_PREFIX);
        } else {
            println!("  [FOUND] Env:     {}", env_keys.join(", "));
        }

        if let Some(path) = config_path {
            let mark = if path.exists() { "FOUND" } else { "MISSING" };
            println!("  [{:<5}] Explicit: {}", mark, path.display());
        }

        if let Some(path) = Self::project_config_path() {
            println!("  [FOUND] Project: {}", path.display());
        } else {
            println!("  [     ] Project: ./streamchat.toml or ./.streamchat.toml");
        }

        if let Some(path) = Self::global_config_path() {
            if path.exists() {
                println!("  [FOUND] Global:  {}", path.display());
            } else {
                println!("  [     ] Global:  {}", path.display());
            }
        }

        println!("  [     ] Default: built-in defaults");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_defaults() {
        let config = ConfigLoader::load_defaults();
        assert_eq!(config.server.base_url, "http://localhost:8000");
        assert_eq!(config.generation.model, "gpt-3.5-turbo");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_global_config_path_returns_some() {
        let path = ConfigLoader::global_config_path();
        assert!(path.is_some());
        assert!(path.unwrap().to_string_lossy().contains("streamchat"));
    }

    #[test]
    fn test_explicit_file_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[server]\nbase_url = \"http://10.0.0.5:8000\"\n\n[generation]\nmax_tokens = 64"
        )
        .unwrap();

        let config = ConfigLoader::load(Some(file.path())).unwrap();
        assert_eq!(config.server.base_url, "http://10.0.0.5:8000");
        assert_eq!(config.generation.max_tokens, 64);
        assert_eq!(config.generation.model, "gpt-3.5-turbo");
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[generation]\nmax_tokens = \"lots\"").unwrap();

        assert!(ConfigLoader::load(Some(file.path())).is_err());
    }
}
