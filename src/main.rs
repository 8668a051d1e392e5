use anyhow::Result;
use dotenvy::dotenv;
use simplelog::LevelFilter;
use std::sync::Arc;
use tokio::signal;

use vidresolve::cache::{spawn_cleanup, MetadataCache};
use vidresolve::cli::{Cli, Commands};
use vidresolve::core::{config, init_logger, log_startup_configuration, web_server};
use vidresolve::download::source::ytdlp::YtDlpSource;
use vidresolve::download::ytdlp;
use vidresolve::{ResolveRequest, ResolveService};

/// Main entry point
///
/// Parses CLI arguments and dispatches to the appropriate subcommand.
#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env before any config is read
    let _ = dotenv();

    let cli = Cli::parse_args();
    let level = if cli.verbose { LevelFilter::Debug } else { LevelFilter::Info };
    init_logger(&config::LOG_FILE_PATH, level)?;

    match cli.command {
        Some(Commands::Serve {
            port,
            no_cache,
            update_extractor,
        }) => serve(port.unwrap_or(*config::WEB_PORT), !no_cache, update_extractor).await,
        None => serve(*config::WEB_PORT, true, false).await,
        Some(Commands::Resolve { url, quality, metadata }) => resolve_once(url, quality, metadata).await,
        Some(Commands::CheckExtractor { update }) => {
            let source = YtDlpSource::default();
            if update {
                ytdlp::update_extractor(source.binary()).await;
            }
            let version = ytdlp::check_extractor(source.binary()).await?;
            println!("{} {}", source.binary(), version);
            Ok(())
        }
    }
}

async fn serve(port: u16, use_cache: bool, update_extractor: bool) -> Result<()> {
    log_startup_configuration();

    let source = YtDlpSource::default();
    if update_extractor {
        ytdlp::update_extractor(source.binary()).await;
    }
    if let Err(e) = ytdlp::check_extractor(source.binary()).await {
        log::error!("yt-dlp is not usable ({}); every resolve request will fail until it is installed", e);
    }

    let mut service = ResolveService::new(Arc::new(source)).with_timeout(config::extraction::timeout());
    let mut cleanup_task = None;
    if let (true, Some(ttl)) = (use_cache, config::cache::ttl()) {
        let cache = Arc::new(MetadataCache::new(ttl));
        cleanup_task = Some(spawn_cleanup(Arc::clone(&cache), config::cache::cleanup_interval()));
        service = service.with_cache(cache);
    }

    web_server::start_web_server(port, Arc::new(service), shutdown_signal()).await?;

    if let Some(task) = cleanup_task {
        task.abort();
    }
    Ok(())
}

async fn resolve_once(url: String, quality: String, metadata: bool) -> Result<()> {
    let service =
        ResolveService::new(Arc::new(YtDlpSource::default())).with_timeout(config::extraction::timeout());
    let request = if metadata {
        ResolveRequest::metadata(url)
    } else {
        ResolveRequest::download(url, quality)
    };

    match service.handle(request).await {
        Ok(response) => {
            println!("{}", serde_json::to_string_pretty(&response)?);
            Ok(())
        }
        Err(e) => {
            println!("{}", serde_json::json!({ "error": e.user_message() }));
            Err(e.into())
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    log::info!("Shutdown signal received");
}
