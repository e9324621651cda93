use clap::Parser;
use fern::{
    colors::{Color, ColoredLevelConfig},
    Dispatch,
};
use log::LevelFilter;
use std::env;
use time::{format_description::well_known::Iso8601, OffsetDateTime};
use weather_sink_core::{
    find_config_file, load_config, ConfigSource, DEFAULT_FORECAST_DAYS, DEFAULT_SERVER_PORT,
};

#[derive(Parser, Clone, Debug, serde::Deserialize, Default)]
#[command(
    author,
    version,
    about = "Weather Sink - fetches weather data and records it into InfluxDB"
)]
pub struct Cli {
    /// Path to config file (TOML format)
    /// Searched in order: this flag, $WEATHER_SINK_CONFIG, ./server.toml,
    /// $XDG_CONFIG_HOME/weather-sink/server.toml, /etc/weather-sink/server.toml
    #[arg(short, long)]
    #[serde(skip)]
    pub config: Option<String>,

    /// Log level: trace, debug, info, warn, error
    #[arg(short, long, env = "WEATHER_SINK_LEVEL")]
    pub level: Option<String>,

    /// Host to listen on (use 0.0.0.0 for all interfaces)
    #[arg(short, long, env = "WEATHER_SINK_HOST")]
    #[serde(alias = "host")]
    pub domain: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "WEATHER_SINK_PORT")]
    pub port: Option<String>,

    /// Base URL of the upstream weather API
    #[arg(long, env = "WEATHER_SINK_API_URL")]
    pub weather_api_url: Option<String>,

    /// API key for the upstream weather API
    #[arg(long, env = "WEATHER_API_KEY")]
    #[serde(alias = "api_key")]
    pub weather_api_key: Option<String>,

    /// Number of forecast days to request per fetch
    #[arg(long, env = "WEATHER_SINK_FORECAST_DAYS")]
    pub forecast_days: Option<u8>,

    /// InfluxDB base URL
    #[arg(long, env = "INFLUXDB_URL")]
    pub influx_url: Option<String>,

    /// InfluxDB API token
    #[arg(long, env = "INFLUXDB_TOKEN")]
    pub influx_token: Option<String>,

    /// InfluxDB organization
    #[arg(long, env = "INFLUXDB_ORG")]
    pub influx_org: Option<String>,

    /// InfluxDB bucket weather points are written to
    #[arg(long, env = "INFLUXDB_BUCKET")]
    pub influx_bucket: Option<String>,

    /// Whether data collection starts enabled
    #[arg(long, env = "WEATHER_SINK_COLLECT")]
    pub collect_data: Option<bool>,
}

impl Cli {
    /// Get the effective configuration value with defaults
    pub fn host(&self) -> String {
        self.domain
            .clone()
            .unwrap_or_else(|| "127.0.0.1".to_string())
    }

    pub fn port(&self) -> String {
        self.port
            .clone()
            .unwrap_or_else(|| DEFAULT_SERVER_PORT.to_string())
    }

    pub fn weather_api_url(&self) -> String {
        self.weather_api_url
            .clone()
            .unwrap_or_else(|| "http://api.weatherapi.com".to_string())
    }

    pub fn weather_api_key(&self) -> String {
        self.weather_api_key.clone().unwrap_or_default()
    }

    pub fn forecast_days(&self) -> u8 {
        self.forecast_days.unwrap_or(DEFAULT_FORECAST_DAYS)
    }

    pub fn influx_url(&self) -> String {
        self.influx_url
            .clone()
            .unwrap_or_else(|| "http://localhost:8086".to_string())
    }

    pub fn influx_token(&self) -> String {
        self.influx_token.clone().unwrap_or_default()
    }

    pub fn influx_org(&self) -> String {
        self.influx_org.clone().unwrap_or_default()
    }

    pub fn influx_bucket(&self) -> String {
        self.influx_bucket
            .clone()
            .unwrap_or_else(|| "weather".to_string())
    }

    pub fn collect_data(&self) -> bool {
        self.collect_data.unwrap_or(false)
    }
}

/// Load configuration from CLI args, config file, and environment
pub fn get_config_info() -> Cli {
    let cli_args = Cli::parse();

    // Determine config file path
    let source = if let Some(ref path) = cli_args.config {
        ConfigSource::Explicit(path.into())
    } else {
        find_config_file("WEATHER_SINK_CONFIG", "server.toml")
    };

    // Log where we're loading config from
    if let Some(path) = source.path() {
        log::info!("Loading config from: {}", path.display());
    }

    // Load from config file
    let file_config: Cli = load_config(&source).unwrap_or_default();

    // CLI args override file config (env vars are handled by clap)
    Cli {
        config: cli_args.config,
        level: cli_args.level.or(file_config.level),
        domain: cli_args.domain.or(file_config.domain),
        port: cli_args.port.or(file_config.port),
        weather_api_url: cli_args.weather_api_url.or(file_config.weather_api_url),
        weather_api_key: cli_args.weather_api_key.or(file_config.weather_api_key),
        forecast_days: cli_args.forecast_days.or(file_config.forecast_days),
        influx_url: cli_args.influx_url.or(file_config.influx_url),
        influx_token: cli_args.influx_token.or(file_config.influx_token),
        influx_org: cli_args.influx_org.or(file_config.influx_org),
        influx_bucket: cli_args.influx_bucket.or(file_config.influx_bucket),
        collect_data: cli_args.collect_data.or(file_config.collect_data),
    }
}

pub fn get_log_level(cli: &Cli) -> LevelFilter {
    let level_str = cli
        .level
        .clone()
        .or_else(|| env::var("RUST_LOG").ok())
        .unwrap_or_else(|| "info".to_string());

    match level_str.to_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        _ => LevelFilter::Info,
    }
}

pub fn setup_logger() -> Dispatch {
    let colors = ColoredLevelConfig::new()
        .trace(Color::White)
        .debug(Color::Cyan)
        .info(Color::Blue)
        .warn(Color::Yellow)
        .error(Color::Magenta);

    fern::Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "[{} {}] {}: {}",
                OffsetDateTime::now_utc().format(&Iso8601::DEFAULT).unwrap(),
                colors.color(record.level()),
                record.target(),
                message
            ));
        })
        .chain(std::io::stdout())
}
