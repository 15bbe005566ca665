use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use unwatch::{Config, GitHubClient, Mode, RunReport, RunSettings, UnwatchEngine};

#[derive(Parser)]
#[command(name = "unwatch")]
#[command(about = "Stop watching an organization's GitHub repositories, except whitelisted ones")]
#[command(version)]
struct Cli {
    /// Organization whose repositories should be unwatched
    #[arg(short, long, env = "ORG")]
    org: Option<String>,

    /// Whitelist file, one owner/repo per line
    #[arg(short, long, env = "WHITELIST_FILE")]
    whitelist: Option<PathBuf>,

    /// Actually ignore repositories (default is a dry run)
    #[arg(short, long)]
    force: bool,

    /// Configuration file path (defaults to XDG config location)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is fine; PAT_TOKEN and ORG may come from the shell
    let dotenv = dotenvy::dotenv();

    let cli = Cli::parse();

    // Load configuration
    let config = load_config(cli.config.as_deref())?;

    init_logging(cli.verbose, &config)?;
    info!("Starting unwatch v{}", env!("CARGO_PKG_VERSION"));
    if let Ok(path) = dotenv {
        debug!("Loaded environment from {:?}", path);
    }

    // Both preconditions are checked before any request is made
    let settings = RunSettings::resolve(&config, cli.org, cli.whitelist, cli.force)?;
    let client = GitHubClient::new(&config)?;

    if settings.mode == Mode::Execute && settings.whitelist_path.is_none() {
        println!(
            "⚠️  No whitelist given: every watched @{} repo will be ignored",
            settings.org
        );
    }

    println!("🔍 Fetching subscriptions to @{} repos...", settings.org);

    let report = UnwatchEngine::new(&client)
        .run_with_hook(&settings, |to_ignore| {
            println!("\n🔕 Ignoring {} repos", to_ignore.len());
        })
        .await;
    print_report(&report);

    Ok(())
}

/// Initialize logging based on verbosity level and configuration
fn init_logging(verbose: bool, config: &Config) -> Result<()> {
    let default_level = if verbose {
        "debug"
    } else {
        config.logging.level.as_str()
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(config.logging.color),
        )
        .with(filter)
        .init();

    Ok(())
}

/// Load configuration from specified path or default location
fn load_config(config_path: Option<&std::path::Path>) -> Result<Config> {
    match config_path {
        Some(path) => Config::load(path),
        None => Config::load_or_default(),
    }
}

/// Print the run outcome to stdout
fn print_report(report: &RunReport) {
    match report {
        RunReport::NothingToDo => {
            println!("✅ Nothing to do");
        }
        RunReport::DryRun { to_ignore } => {
            println!("\n🔍 Dry run mode - {} repos would be ignored:", to_ignore.len());
            for repo in to_ignore {
                println!("   🔕 {}", repo);
            }
            println!("\n💡 Run again with --force to ignore them");
        }
        RunReport::Executed { summary, .. } => {
            println!("\n🎉 Ignore process completed.");
            println!("   ✅ Ignored: {}", summary.ignored);
            println!("   ❌ Failed: {}", summary.failed);
            println!("   ⏱️  Duration: {:.2}s", summary.duration.as_secs_f64());

            if summary.failed > 0 {
                println!("\n🔍 Failed Operations:");
                for (repo, error) in summary.failures() {
                    println!("   ❌ {}: {}", repo, error);
                }
            }
        }
    }
}
