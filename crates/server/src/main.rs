use anyhow::anyhow;
use axum::serve;
use futures::TryFutureExt;
use log::{error, info};
use server::{app, build_app_state, get_config_info, get_log_level, setup_logger};
use std::{net::SocketAddr, str::FromStr};
use tokio::{net::TcpListener, signal};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = get_config_info();
    let log_level = get_log_level(&cli);

    setup_logger()
        .level(log_level)
        .level_for("server", log_level)
        .level_for("http_response", log_level)
        .level_for("http_request", log_level)
        .apply()?;

    let socket_addr = SocketAddr::from_str(&format!("{}:{}", cli.host(), cli.port()))
        .map_err(|e| anyhow!("invalid listen address {}:{}: {}", cli.host(), cli.port(), e))?;

    let listener = TcpListener::bind(socket_addr)
        .map_err(|e| anyhow!("error binding {}: {}", socket_addr, e))
        .await?;

    info!("Weather Sink starting...");
    info!("  Listen: http://{}", socket_addr);
    info!("  Docs:   http://{}/docs", socket_addr);
    info!("  Weather API: {}", cli.weather_api_url());
    info!("  InfluxDB: {}", cli.influx_url());
    info!(
        "  Collection: {}",
        if cli.collect_data() {
            "enabled"
        } else {
            "disabled"
        }
    );

    let app_state = build_app_state(&cli)
        .await
        .inspect_err(|e| error!("error building app: {}", e))?;

    serve(
        listener,
        app(app_state).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("interrupt received, shutting down"),
        _ = terminate => info!("terminate signal received, shutting down"),
    }
}
