//! ApeWatch CLI — one-shot snapshot and config inspection.
//!
//! Commands:
//! - `snapshot` — scrape the ranking, fetch prices, print the sorted table
//! - `config` — print the effective configuration as TOML

mod report;

use std::io::{self, IsTerminal};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use apewatch_core::{AppConfig, Dashboard, SortField};

use report::OutputFormat;

#[derive(Parser)]
#[command(
    name = "apewatch",
    about = "ApeWatch CLI — trending tickers from ApeWisdom with intraday price moves"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one refresh and print the sorted ticker table.
    Snapshot {
        /// Path to a TOML config file. Defaults are used when omitted.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Sort field. Defaults to `dashboard.sort` from the config.
        #[arg(long, value_enum)]
        sort: Option<SortArg>,

        /// Sort ascending instead of descending.
        #[arg(long, default_value_t = false)]
        ascending: bool,

        /// Output format.
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Include tickers whose price data could not be fetched.
        #[arg(long, default_value_t = false)]
        include_errors: bool,
    },
    /// Print the effective configuration.
    Config {
        /// Path to a TOML config file.
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SortArg {
    Mentions,
    PriceChange,
    SentimentChange,
}

impl From<SortArg> for SortField {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Mentions => SortField::Mentions,
            SortArg::PriceChange => SortField::PriceChange,
            SortArg::SentimentChange => SortField::SentimentChange,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Snapshot {
            config,
            sort,
            ascending,
            format,
            include_errors,
        } => run_snapshot(config, sort, ascending, format, include_errors),
        Commands::Config { config } => run_config(config),
    }
}

fn load_config(path: Option<PathBuf>) -> Result<AppConfig> {
    AppConfig::load(path.as_deref()).with_context(|| match &path {
        Some(p) => format!("failed to load config from {}", p.display()),
        None => "invalid default config".to_string(),
    })
}

/// Logs go to stderr so stdout stays clean for JSON/CSV.
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run_snapshot(
    config_path: Option<PathBuf>,
    sort: Option<SortArg>,
    ascending: bool,
    format: OutputFormat,
    include_errors: bool,
) -> Result<()> {
    let mut config = load_config(config_path)?;
    init_logging(&config.logging.level);

    if let Some(field) = sort {
        config.dashboard.sort = field.into();
    }

    let mut dashboard = Dashboard::from_config(&config).context("failed to build HTTP sources")?;
    if ascending {
        // from_config starts descending; requesting the same field flips it
        dashboard.request_sort(config.dashboard.sort);
    }

    if dashboard.refresh().is_failure() {
        bail!("{}", dashboard.status_line(chrono::Utc::now()));
    }

    let rows = if include_errors {
        dashboard.rows()
    } else {
        dashboard.valid_rows()
    };
    let sort_state = dashboard.sort_state();
    info!(
        rows = rows.len(),
        hidden = dashboard.store().len() - rows.len(),
        sort = %sort_state.field,
        descending = sort_state.descending,
        "snapshot ready"
    );

    let stdout = io::stdout();
    match format {
        OutputFormat::Text => {
            let color = stdout.is_terminal();
            report::write_table(stdout.lock(), dashboard.sort_state(), &rows, color)?;
        }
        OutputFormat::Json => {
            report::write_json(
                stdout.lock(),
                dashboard.status(),
                dashboard.sort_state(),
                &rows,
            )?;
            println!();
        }
        OutputFormat::Csv => report::write_csv(stdout.lock(), &rows)?,
    }

    let hidden = dashboard.store().len() - rows.len();
    if hidden > 0 {
        eprintln!("{hidden} ticker(s) without price data hidden (use --include-errors)");
    }

    Ok(())
}

fn run_config(config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config(config_path)?;
    print!("{}", config.to_toml()?);
    Ok(())
}
