//! XDG Base Directory support
//!
//! Resolves where ragdex keeps its config file and its collections.

use std::env;
use std::fs;
use std::path::PathBuf;

const APP_DIR: &str = "ragdex";

/// XDG directory structure for ragdex
#[derive(Debug, Clone)]
pub struct XdgDirs {
    pub config_dir: PathBuf,
    pub data_dir: PathBuf,
}

impl XdgDirs {
    /// Resolve directories
    ///
    /// Priority order (highest to lowest):
    /// 1. Explicit RAGDEX_* env vars
    /// 2. XDG_* environment variables
    /// 3. XDG defaults (~/.config, ~/.local/share)
    pub fn new() -> Self {
        Self {
            config_dir: resolve("RAGDEX_CONFIG_DIR", "XDG_CONFIG_HOME", &[".config"]),
            data_dir: resolve("RAGDEX_DATA_DIR", "XDG_DATA_HOME", &[".local", "share"]),
        }
    }

    /// Config file path, `RAGDEX_CONFIG` wins when set
    pub fn config_file(&self) -> PathBuf {
        if let Ok(file) = env::var("RAGDEX_CONFIG") {
            return PathBuf::from(file);
        }

        self.config_dir.join("config.toml")
    }

    /// Default root for persisted collections
    pub fn collections_dir(&self) -> PathBuf {
        self.data_dir.join("collections")
    }

    pub fn ensure_dirs_exist(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.config_dir)?;
        fs::create_dir_all(self.collections_dir())?;
        Ok(())
    }

    pub fn log_paths(&self) {
        tracing::debug!("XDG directories resolved:");
        tracing::debug!("  Config: {:?}", self.config_dir);
        tracing::debug!("  Data: {:?}", self.data_dir);
        tracing::debug!("  Config file: {:?}", self.config_file());
    }
}

impl Default for XdgDirs {
    fn default() -> Self {
        Self::new()
    }
}

fn resolve(app_var: &str, xdg_var: &str, fallback: &[&str]) -> PathBuf {
    if let Ok(dir) = env::var(app_var) {
        return PathBuf::from(dir);
    }

    if let Ok(xdg) = env::var(xdg_var) {
        return PathBuf::from(xdg).join(APP_DIR);
    }

    let mut path = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    for part in fallback {
        path.push(part);
    }
    path.join(APP_DIR)
}
