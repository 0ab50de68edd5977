use std::error::Error;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

mod app_metrics;
mod application_state;
mod clock_ticker;
mod config;
mod health;
mod web;

use page_display::{AutoScaler, Page, SystemClock};

use application_state::ApplicationState;
use clock_ticker::{ClockTicker, DisplayController};
use config::Config;
use web::api::AppState;

// ========== Logging Setup ==========

fn init_logging(log_config: &config::LogConfig) -> Result<(), Box<dyn Error>> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
    use tracing_appender::rolling;

    // Create log directory if it doesn't exist
    std::fs::create_dir_all(&log_config.directory)?;

    // Create daily rolling file appender
    let file_appender = rolling::daily(&log_config.directory, &log_config.file_prefix);

    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false)
        .with_timer(fmt::time::OffsetTime::local_rfc_3339().unwrap_or_else(|_| fmt::time::OffsetTime::new(
            time::UtcOffset::UTC,
            time::format_description::well_known::Rfc3339,
        )));

    let console_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_timer(fmt::time::OffsetTime::local_rfc_3339().unwrap_or_else(|_| fmt::time::OffsetTime::new(
            time::UtcOffset::UTC,
            time::format_description::well_known::Rfc3339,
        )));

    // RUST_LOG wins over the configured level
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&log_config.level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}

// ========== Main Application ==========

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = std::env::args().collect();

    if args.contains(&"--help".to_string()) || args.contains(&"-h".to_string()) {
        println!("Home Display");
        println!();
        println!("USAGE:");
        println!("    home_display [OPTIONS]");
        println!();
        println!("OPTIONS:");
        println!("    --validate-config, --validate, -v    Validate configuration and exit");
        println!("    --help, -h                           Show this help message");
        println!();
        println!("Configuration file: config.json (in current directory)");
        std::process::exit(0);
    }

    let validate_only = args.contains(&"--validate-config".to_string())
                     || args.contains(&"--validate".to_string())
                     || args.contains(&"-v".to_string());

    let config = match Config::from_file("config.json") {
        Ok(cfg) => {
            if validate_only {
                println!("✓ Configuration validation successful");
                println!("  Web port: {}", cfg.web.port);
                println!("  Static directory: {}", cfg.web.static_dir);
                println!("  Refresh interval: {} ms", cfg.display.refresh_interval_ms);
                println!("  Auto-scale: class '{}' to {} px", cfg.display.scalable_class, cfg.display.target_width);
                std::process::exit(0);
            }
            cfg
        },
        Err(e) => {
            if validate_only {
                eprintln!("✗ Configuration validation failed: {}", e);
                std::process::exit(1);
            }
            eprintln!("Warning: Could not load config.json: {}", e);
            eprintln!("Using default configuration");
            Config::default()
        }
    };

    init_logging(&config.logging)?;
    info!("Home Display starting...");

    let page = Arc::new(Mutex::new(Page::home()));
    let state = Arc::new(Mutex::new(ApplicationState::default()));
    let scaler = AutoScaler::new(config.display.target_width);

    let controller = DisplayController::new(
        page.clone(),
        state.clone(),
        scaler,
        config.display.scalable_class.clone(),
        config.display.metrics_interval(),
    );
    let ticker = ClockTicker::start(controller, SystemClock, config.display.refresh_interval());

    let app_state = AppState {
        page,
        state,
        scaler,
        health_tolerance: config.display.health_tolerance(),
    };

    let served = web::server::start_web_server(
        app_state,
        &config.web.static_dir,
        config.web.port,
        shutdown_signal(),
    )
    .await;

    info!(running = ticker.is_running(), "Stopping clock ticker");
    if ticker.stop().await.is_none() {
        warn!("Clock ticker did not shut down cleanly");
    }
    info!("Home Display stopped");

    served
}
