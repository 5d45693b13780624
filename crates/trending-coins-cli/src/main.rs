//! trending-coins: print the top trending cryptocurrencies as a table.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use trending_coins::{acquire, assemble, WebOptions, DEFAULT_ROW_COUNT};
use trending_coins_cli::{check, config, doctor, report};

#[derive(Parser)]
#[command(
    name = "trending-coins",
    about = "Report the top trending cryptocurrencies from a live page or a saved snapshot",
    version,
    after_help = "With neither --file nor --url, the default trending page is rendered."
)]
struct Cli {
    /// Load data from a saved HTML snapshot
    #[arg(long, conflicts_with = "url")]
    file: Option<PathBuf>,

    /// Load data from the web at the given url
    #[arg(long)]
    url: Option<String>,

    /// Save the rendered page here for later replay with --file
    #[arg(long, conflicts_with = "file")]
    save: Option<PathBuf>,

    /// Number of coins to report
    #[arg(long, short = 'n', default_value_t = DEFAULT_ROW_COUNT)]
    count: usize,

    /// Render timeout in milliseconds
    #[arg(long, default_value = "30000")]
    timeout: u64,

    /// Path to the Chromium/Chrome binary
    #[arg(long)]
    chromium: Option<PathBuf>,

    /// Run the self-check against a snapshot (--file, default page.html)
    #[arg(long)]
    test: bool,

    /// Output rows as JSON
    #[arg(long)]
    json: bool,

    /// Suppress status lines
    #[arg(long, short)]
    quiet: bool,

    /// Log level when RUST_LOG is unset (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Check whether a browser is available for live rendering
    Doctor,
    /// Generate shell completion scripts
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish)
        shell: Shell,
    },
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.quiet { "warn" } else { cli.log_level.as_str() };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .init();

    let result = match &cli.command {
        Some(Commands::Doctor) => {
            if doctor::run(cli.chromium.as_deref()) {
                Ok(())
            } else {
                std::process::exit(1);
            }
        }
        Some(Commands::Completions { shell }) => {
            let mut cmd = Cli::command();
            clap_complete::generate(*shell, &mut cmd, "trending-coins", &mut std::io::stdout());
            Ok(())
        }
        None if cli.test => run_check(&cli),
        None => run_report(&cli),
    };

    if let Err(e) = result {
        if cli.json {
            println!(
                "{}",
                serde_json::json!({ "error": true, "message": format!("{e:#}") })
            );
        } else {
            eprintln!("  Error: {e:#}");
        }
        std::process::exit(1);
    }
}

fn run_report(cli: &Cli) -> Result<()> {
    let source = config::resolve_source(cli.file.as_deref(), cli.url.as_deref());
    let options = WebOptions {
        render_timeout: Duration::from_millis(cli.timeout),
        save_to: cli.save.clone(),
        chromium_path: cli.chromium.clone(),
        ..WebOptions::default()
    }
    .wait_for_rows(cli.count);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start runtime")?;
    let doc = runtime.block_on(acquire(&source, &options))?;
    let rows = assemble(&doc, cli.count)?;
    tracing::debug!("assembled {} row(s)", rows.len());

    if cli.json {
        println!("{}", report::render_json(&rows)?);
    } else {
        println!("{}", report::render_table(&rows));
    }
    Ok(())
}

fn run_check(cli: &Cli) -> Result<()> {
    let snapshot = config::resolve_snapshot(cli.file.as_deref());
    let outcome = check::run(&snapshot, cli.count)?;
    println!("{}", outcome.render());
    if outcome.passed() {
        Ok(())
    } else {
        anyhow::bail!("self-check failed for {}", snapshot.display())
    }
}
