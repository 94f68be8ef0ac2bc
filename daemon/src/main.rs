mod api;
mod config;
mod jobs;
mod store;

use anyhow::Context;
use clap::Parser;
use common::TeamMember;
use config::{Config, LoggingConfig};
use jobs::CommandJobSource;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use store::JsonFileStore;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Config file (.yaml, .yml or .toml)
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Address to listen on, overrides server.bind
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let mut config = Config::load(args.config.as_deref())?;
    if let Some(bind) = args.bind {
        config.server.bind = bind;
    }

    setup_logging(&config.logging)?;
    log::info!("Starting mission-control-daemon...");

    let tasks = JsonFileStore::<serde_json::Value>::new(config.storage.tasks_path());
    let team = JsonFileStore::<TeamMember>::new(config.storage.team_path());
    log::info!("Tasks document: {:?}, team document: {:?}", tasks.path(), team.path());
    log::info!(
        "Job listing: {} {} (timeout {}s)",
        config.jobs.program,
        config.jobs.args.join(" "),
        config.jobs.timeout_secs
    );

    let state = api::AppState {
        jobs: Arc::new(CommandJobSource::from_config(&config.jobs)),
        tasks: Arc::new(tasks),
        team: Arc::new(team),
    };
    let app = api::build_router(state);

    let addr: SocketAddr = config
        .server
        .bind
        .parse()
        .with_context(|| format!("Invalid bind address: {}", config.server.bind))?;
    if !addr.ip().is_loopback() {
        log::warn!("Listening on non-loopback address {}; remote callers will be rejected", addr);
    }

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    println!("Listening on http://{}", addr);

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    log::info!("mission-control-daemon stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    log::info!("Shutdown requested");
}

fn setup_logging(logging: &LoggingConfig) -> anyhow::Result<()> {
    let log_file = std::env::var("MISSION_CONTROL_LOG")
        .ok()
        .map(PathBuf::from)
        .or_else(|| logging.output.clone());

    let mut dispatch = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{}][{}][{}] {}",
                chrono::Local::now().format("%Y-%m-%d][%H:%M:%S"),
                record.target(),
                record.level(),
                message
            ))
        })
        .level(logging.level_filter())
        .chain(std::io::stdout());

    if let Some(path) = log_file {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create log directory {:?}", parent))?;
        }
        dispatch = dispatch.chain(
            fern::log_file(&path).with_context(|| format!("Failed to open log file {:?}", path))?,
        );
    }

    dispatch.apply()?;
    Ok(())
}
