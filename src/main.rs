use anyhow::{Context, bail};
use api_client::{FallbackCache, FrankfurterClient, RateProvider};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use configuration::{Config, DashboardSettings, LoggingSettings, load_config, load_config_from};
use core_types::{CurrencyPair, RangePreset};
use engine::{DashboardSnapshot, Engine, RefreshRequest};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod display;

/// The main entry point for the Ratewatch dashboard.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load RATEWATCH__* overrides from a .env file, if there is one.
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config_from(path),
        None => load_config(),
    }
    .context("Failed to load configuration")?;

    // Keep the guard alive so buffered file logs are flushed on exit.
    let _log_guard = init_tracing(&config.logging)?;

    let engine = build_engine(&config)?;

    // Execute the appropriate command
    match cli.command {
        Commands::Currencies => handle_currencies(&engine).await,
        Commands::Show(args) => handle_show(&engine, &config.dashboard, &args).await,
        Commands::Watch(args) => handle_watch(&engine, &config.dashboard, &args).await,
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// A terminal dashboard for daily exchange rates.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the configuration file (defaults to ./config.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the currencies the provider supports.
    Currencies,
    /// Refresh once and print the dashboard.
    Show(ViewArgs),
    /// Refresh periodically, keeping the last good data on failure.
    Watch(WatchArgs),
}

#[derive(Args)]
struct ViewArgs {
    /// Base currency code (e.g., "CZK").
    #[arg(long)]
    from: Option<String>,

    /// Quote currency code (e.g., "EUR").
    #[arg(long)]
    to: Option<String>,

    /// Range preset: 2w, 1m, 3m, 6m, 1y or 3y.
    #[arg(long)]
    range: Option<RangePreset>,

    /// Invert the currency pair.
    #[arg(long)]
    swap: bool,

    /// Print the snapshot as JSON instead of tables.
    #[arg(long)]
    json: bool,

    #[arg(long)]
    no_ma7: bool,

    #[arg(long)]
    no_ma30: bool,

    #[arg(long)]
    no_ma90: bool,

    /// Hide the high/low markers.
    #[arg(long)]
    no_extremes: bool,

    /// Pretend today is this date (format: YYYY-MM-DD).
    #[arg(long)]
    today: Option<NaiveDate>,
}

#[derive(Args)]
struct WatchArgs {
    #[command(flatten)]
    view: ViewArgs,

    /// Time between refreshes (e.g., "60s", "5m").
    #[arg(long, default_value = "60s", value_parser = humantime::parse_duration)]
    every: Duration,
}

impl ViewArgs {
    fn hides(&self, window: usize) -> bool {
        match window {
            7 => self.no_ma7,
            30 => self.no_ma30,
            90 => self.no_ma90,
            _ => false,
        }
    }

    /// Applies the command-line overrides to the configured dashboard defaults.
    fn to_request(&self, settings: &DashboardSettings) -> anyhow::Result<RefreshRequest> {
        let today = self.today.unwrap_or_else(core_types::today);
        let mut request = RefreshRequest::from_settings(settings, today)?;

        if self.from.is_some() || self.to.is_some() {
            let base = self.from.as_deref().unwrap_or(&settings.base);
            let quote = self.to.as_deref().unwrap_or(&settings.quote);
            request.pair = CurrencyPair::new(base, quote)?;
        }
        if self.swap {
            request.pair = request.pair.swapped();
        }
        if let Some(range) = self.range {
            request.range = range;
        }
        request.moving_averages.retain(|&w| !self.hides(w));
        request.show_extremes &= !self.no_extremes;
        Ok(request)
    }
}

// ==============================================================================
// Setup
// ==============================================================================

/// Installs the global subscriber: stderr always, plus a daily file when configured.
fn init_tracing(settings: &LoggingSettings) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.level))
        .context("Invalid log filter")?;
    let stderr = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    match &settings.directory {
        Some(directory) => {
            let appender = tracing_appender::rolling::daily(directory, "ratewatch.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let file = tracing_subscriber::fmt::layer().with_ansi(false).with_writer(writer);
            tracing_subscriber::registry()
                .with(filter)
                .with(stderr)
                .with(file)
                .try_init()?;
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::registry().with(filter).with(stderr).try_init()?;
            Ok(None)
        }
    }
}

fn build_engine(config: &Config) -> anyhow::Result<Engine> {
    let client = FrankfurterClient::new(&config.provider).context("Failed to build HTTP client")?;
    let provider: Arc<dyn RateProvider> = if config.provider.offline_cache {
        Arc::new(FallbackCache::with_directory(
            Arc::new(client),
            config.provider.cache_dir.clone(),
        ))
    } else {
        Arc::new(client)
    };
    Ok(Engine::new(provider, &config.dashboard))
}

// ==============================================================================
// Command Logic
// ==============================================================================

async fn handle_currencies(engine: &Engine) -> anyhow::Result<()> {
    let currencies = engine.load_currencies().await.map_err(|e| {
        tracing::error!(error = %e, "Failed to load currencies.");
        e
    })?;
    println!("{}", display::render_currencies(&currencies.data));
    if let Some(notice) = display::stale_notice(currencies.freshness) {
        eprintln!("{notice}");
    }
    Ok(())
}

async fn handle_show(
    engine: &Engine,
    settings: &DashboardSettings,
    args: &ViewArgs,
) -> anyhow::Result<()> {
    let request = args.to_request(settings)?;
    let snapshot = engine.refresh(&request).await.map_err(|e| {
        tracing::error!(error = %e, pair = %request.pair, "Refresh failed.");
        e
    })?;
    print_snapshot(&snapshot, args.json)
}

async fn handle_watch(
    engine: &Engine,
    settings: &DashboardSettings,
    args: &WatchArgs,
) -> anyhow::Result<()> {
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C.");
            std::future::pending::<()>().await;
        }
    };
    watch_loop(engine, settings, args, shutdown).await
}

/// Refreshes every `args.every` until `shutdown` completes.
///
/// `shutdown` is polled across the whole loop, including while a refresh is
/// in flight, so a stop request is never dropped.
async fn watch_loop(
    engine: &Engine,
    settings: &DashboardSettings,
    args: &WatchArgs,
    shutdown: impl Future<Output = ()>,
) -> anyhow::Result<()> {
    if args.every.is_zero() {
        bail!("--every must be greater than zero");
    }

    tokio::pin!(shutdown);
    let mut ticker = tokio::time::interval(args.every);
    let mut last: Option<DashboardSnapshot> = None;

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = &mut shutdown => break,
        }

        // Rebuilt every tick so the window follows the calendar.
        let request = args.view.to_request(settings)?;
        let result = tokio::select! {
            result = engine.refresh(&request) => result,
            _ = &mut shutdown => break,
        };

        match result {
            Ok(snapshot) => {
                clear_screen(args.view.json);
                print_snapshot(&snapshot, args.view.json)?;
                last = Some(snapshot);
            }
            Err(e) => {
                tracing::error!(error = %e, pair = %request.pair, "Refresh failed.");
                if let Some(previous) = &last {
                    clear_screen(args.view.json);
                    print_snapshot(previous, args.view.json)?;
                    eprintln!("Could not refresh rates ({e}). Showing the last successful data.");
                } else {
                    eprintln!(
                        "Could not load rates ({e}). Retrying in {}.",
                        humantime::format_duration(args.every)
                    );
                }
            }
        }
    }

    tracing::info!("Watch stopped.");
    Ok(())
}

/// Prints the snapshot. Cached data is flagged in the text view, and on
/// stderr when the output is JSON.
fn print_snapshot(snapshot: &DashboardSnapshot, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(snapshot)?);
        if let Some(notice) = display::stale_notice(snapshot.freshness) {
            eprintln!("{notice}");
        }
    } else {
        print!("{}", display::render_snapshot(snapshot));
    }
    Ok(())
}

fn clear_screen(json: bool) {
    if !json {
        print!("\x1B[2J\x1B[1;1H");
    }
}
