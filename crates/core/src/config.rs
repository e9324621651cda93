//! Config file discovery and TOML parsing shared by the workspace binaries.
//!
//! Precedence is resolved by the caller: values given on the command line win
//! over the config file, and clap fills env vars before either. This module
//! only answers two questions: which file to read, and what it contains.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::de::DeserializeOwned;

use crate::APP_NAME;

/// Where the active config file came from.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    /// Path given explicitly on the command line or via env var
    Explicit(PathBuf),
    /// Picked up from the working directory
    CurrentDir(PathBuf),
    /// Found under $XDG_CONFIG_HOME (or ~/.config)
    XdgConfig(PathBuf),
    /// Found under /etc
    System(PathBuf),
    /// Nothing found anywhere, run on built-in defaults
    Defaults,
}

impl ConfigSource {
    pub fn path(&self) -> Option<&Path> {
        match self {
            ConfigSource::Explicit(p)
            | ConfigSource::CurrentDir(p)
            | ConfigSource::XdgConfig(p)
            | ConfigSource::System(p) => Some(p),
            ConfigSource::Defaults => None,
        }
    }
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.path() {
            Some(p) => write!(f, "{}", p.display()),
            None => write!(f, "(defaults)"),
        }
    }
}

/// Locate a config file, checking the usual places in order.
///
/// An explicit path named by `env_var` wins whenever it exists on disk. After
/// that: the working directory, then `$XDG_CONFIG_HOME/weather-sink/` (falling
/// back to `~/.config/weather-sink/`), then `/etc/weather-sink/`. Returns
/// [`ConfigSource::Defaults`] when no candidate exists.
pub fn find_config_file(env_var: &str, filename: &str) -> ConfigSource {
    if let Some(explicit) = env::var_os(env_var) {
        let path = PathBuf::from(explicit);
        if path.exists() {
            return ConfigSource::Explicit(path);
        }
    }

    let candidates = [
        ConfigSource::CurrentDir(PathBuf::from(filename)),
        ConfigSource::XdgConfig(xdg_config_home().join(APP_NAME).join(filename)),
        ConfigSource::System(Path::new("/etc").join(APP_NAME).join(filename)),
    ];
    candidates
        .into_iter()
        .find(|candidate| candidate.path().is_some_and(Path::exists))
        .unwrap_or(ConfigSource::Defaults)
}

fn xdg_config_home() -> PathBuf {
    match env::var_os("XDG_CONFIG_HOME") {
        Some(dir) => PathBuf::from(dir),
        None => match env::var_os("HOME") {
            Some(home) => PathBuf::from(home).join(".config"),
            // without HOME there is no user config dir to probe
            None => PathBuf::from(".config"),
        },
    }
}

/// Read and parse the TOML file behind `source`.
///
/// `Defaults` short-circuits to `T::default()`; an unreadable or malformed
/// file is an error the caller decides how to handle.
pub fn load_config<T: DeserializeOwned + Default>(source: &ConfigSource) -> anyhow::Result<T> {
    let path = match source.path() {
        Some(path) => path,
        None => return Ok(T::default()),
    };
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("failed to parse config file {}", path.display()))
}
