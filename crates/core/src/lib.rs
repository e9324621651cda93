//! Weather Sink Core Library
//!
//! Shared utilities for the weather sink server:
//! - Configuration loading (XDG-compliant)
//! - Common constants

mod config;

pub use config::{find_config_file, load_config, ConfigSource};

/// Application name used for XDG paths
pub const APP_NAME: &str = "weather-sink";

/// Default server port
pub const DEFAULT_SERVER_PORT: u16 = 9500;

/// Default number of forecast days requested from the weather API
pub const DEFAULT_FORECAST_DAYS: u8 = 3;
