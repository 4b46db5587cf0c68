use clap::Parser;
use std::sync::atomic::AtomicUsize;
use std::sync::Arc;

mod api;
mod config;
mod error;
mod logger;
mod server;
mod storage;
mod translations;

/// Fetch and cache frontend translation files
#[derive(Parser, Debug)]
#[command(name = "frontend-translations", version, about, long_about = None)]
struct Args {
    /// Configuration file path, without extension
    #[arg(short, long, default_value = "config")]
    config: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let cfg = config::Config::load_from(&args.config)?;
    logger::init(&cfg.logging)?;

    // Worker count comes from config, CPU cores otherwise
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let state = Arc::new(config::AppState::setup(&cfg)?);
    let listener = server::create_reusable_listener(addr)?;

    logger::log_server_start(&addr, &state, &state.base_url().await);

    // Connections are served with spawn_local
    let local = tokio::task::LocalSet::new();
    local
        .run_until(server::run_server(
            listener,
            state,
            Arc::new(AtomicUsize::new(0)),
            server::shutdown_signal(),
        ))
        .await;

    Ok(())
}
