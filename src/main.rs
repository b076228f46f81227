//! proxy-rules CLI
//!
//! Downloads the configured upstream lists and writes minimal rule files.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use proxy_rules::{run, Config, HttpFetcher};

#[derive(Parser)]
#[command(name = "proxy-rules")]
#[command(about = "Generate minimal DOMAIN-SUFFIX and IP-CIDR rule lists from upstream block lists")]
struct Cli {
    /// JSON configuration file (defaults to the built-in source set)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output directory, overrides the configuration
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Download timeout in seconds, overrides the configuration
    #[arg(long)]
    timeout: Option<u64>,

    /// Print the effective configuration as JSON and exit
    #[arg(long)]
    print_config: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let env_filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(verbose >= 2).with_writer(std::io::stderr))
        .init();
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match cli.config {
        Some(ref path) => Config::from_file(path)
            .with_context(|| format!("Failed to load config '{}'", path.display()))?,
        None => Config::default(),
    };

    if let Some(ref dir) = cli.output_dir {
        config.output_dir = dir.clone();
    }
    if let Some(timeout) = cli.timeout {
        config.timeout_secs = timeout;
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn execute(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;

    if cli.print_config {
        println!("{}", config.to_json()?);
        return Ok(());
    }

    let start = Instant::now();
    let fetcher = HttpFetcher::with_timeout(config.timeout());
    let written = run(&config, &fetcher).context("Rule generation failed")?;

    for list in &written {
        tracing::info!(
            source = %list.source,
            path = %list.path.display(),
            rules = list.rules,
            "{}",
            list.rule_type
        );
    }
    tracing::info!(
        files = written.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "done"
    );

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match execute(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
