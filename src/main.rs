use anyhow::{Context, Result};
use clap::Parser;
use movierec::app::{build_http_client, App, AppEvent};
use movierec::catalog::{PageSource, SimulatedSource, TmdbClient, TmdbDiscoverSource};
use movierec::config::{Config, FeedSourceKind, API_KEY_ENV};
use movierec::ui;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

/// Get the config directory path (~/.config/movierec/)
fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".config").join("movierec"))
}

/// Create the config directory with user-only permissions.
fn ensure_config_dir(config_dir: &Path) -> Result<()> {
    if !config_dir.exists() {
        std::fs::create_dir_all(config_dir).context("Failed to create config directory")?;
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        match std::fs::metadata(config_dir) {
            Ok(metadata) => {
                let mut perms = metadata.permissions();
                perms.set_mode(0o700);
                if let Err(e) = std::fs::set_permissions(config_dir, perms) {
                    eprintln!(
                        "Warning: failed to set permissions on {}: {}",
                        config_dir.display(),
                        e
                    );
                }
            }
            Err(e) => {
                eprintln!(
                    "Warning: failed to read metadata of {}: {}",
                    config_dir.display(),
                    e
                );
            }
        }
    }
    Ok(())
}

/// Send tracing output to `path`. The terminal belongs to the TUI.
fn init_logging(path: &Path) -> Result<()> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file '{}'", path.display()))?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("movierec=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

#[derive(Parser, Debug)]
#[command(name = "movierec", about = "Discover trending movies and TV shows from the terminal")]
struct Args {
    /// Config file (default: ~/.config/movierec/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Home feed source, overriding the config file
    #[arg(long, value_enum)]
    source: Option<FeedSourceKind>,

    /// Log file (default: ~/.config/movierec/movierec.log)
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_dir = get_config_dir()?;
    ensure_config_dir(&config_dir)?;

    let log_path = args
        .log_file
        .clone()
        .unwrap_or_else(|| config_dir.join("movierec.log"));
    init_logging(&log_path)?;

    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| config_dir.join("config.toml"));
    let mut config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from '{}'", config_path.display()))?;
    if let Some(source) = args.source {
        config.feed_source = source;
    }

    let http = build_http_client(config.request_timeout())
        .context("Failed to build HTTP client")?;
    let api_key = config.resolve_api_key(std::env::var(API_KEY_ENV).ok());
    let tmdb = TmdbClient::new(
        http,
        api_key,
        &config.tmdb_base_url,
        &config.image_base_url,
        config.request_timeout(),
    )
    .context("Invalid TMDB configuration")?;

    if !tmdb.has_api_key() {
        tracing::warn!("No TMDB API key configured; trending list will be unavailable");
    }

    let source: Arc<dyn PageSource> = match config.feed_source {
        FeedSourceKind::Simulated => Arc::new(SimulatedSource::new(config.simulated_delay())),
        FeedSourceKind::Tmdb => Arc::new(TmdbDiscoverSource::new(tmdb.clone())),
    };
    tracing::info!(source = source.name(), "Starting movierec");

    let mut app = App::new(&config, tmdb, source);

    let (event_tx, event_rx) = mpsc::channel::<AppEvent>(32);

    ui::run(&mut app, event_tx, event_rx).await?;

    tracing::info!("Exited cleanly");
    println!("Goodbye!");
    Ok(())
}
