use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use spendlens_core::{TransactionSource, covered_months, month_label};
use spendlens_finance::{Aggregation, Engine, SortKey, SortOrder, ViewSelection};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

mod config;
mod report;
mod state;

use config::{Config, load_config};
use report::{Format, write_summary, write_view};

#[derive(Parser, Debug)]
#[command(
    name = "spendlens",
    version,
    about = "Categorize bank transactions and report 50/30/20 budget figures"
)]
struct Cli {
    /// Config file (default: ~/.spendlens/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Totals, savings, debit ratio and expected allocations
    Summary {
        /// Transaction source JSON: { transactions, currency, months? }
        #[arg(long)]
        input: PathBuf,

        /// text | json (csv is only available for category tables)
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },

    /// Aggregated table for one category ("details" prints the summary)
    Table {
        #[arg(long)]
        input: PathBuf,

        #[arg(long, default_value = "details")]
        category: String,

        /// count | amount
        #[arg(long, default_value = "amount")]
        sort: SortKey,

        /// asc | desc
        #[arg(long, default_value = "desc")]
        order: SortOrder,

        /// text | json | csv (csv is rejected for "details")
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },

    /// Manage ~/.spendlens/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write the default config if none exists
    Init,
    /// Print the effective config
    Show,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    match cli.command {
        Command::Summary { input, format } => {
            let cfg = load_config(config_path)?;
            let engine = cfg.engine()?;
            let (src, agg) = run(&engine, &input)?;
            let mut out = io::stdout().lock();
            if src.transactions.is_empty() {
                writeln!(out, "No transactions in {}", input.display())?;
                return Ok(());
            }
            write_summary(&mut out, &agg, &currency(&src, &cfg), &months(&src), format)?;
        }

        Command::Table {
            input,
            category,
            sort,
            order,
            format,
        } => {
            let cfg = load_config(config_path)?;
            let engine = cfg.engine()?;
            let selection = ViewSelection::parse(&category, engine.categories())
                .with_context(|| format!("--category {category}"))?;

            let (src, agg) = run(&engine, &input)?;
            let currency = currency(&src, &cfg);
            let mut out = io::stdout().lock();
            if src.transactions.is_empty() {
                writeln!(out, "No transactions in {}", input.display())?;
                return Ok(());
            }

            match selection {
                ViewSelection::Details => {
                    write_summary(&mut out, &agg, &currency, &months(&src), format)?;
                }
                ViewSelection::Category(category) => {
                    // every configured category has a table, even when empty
                    let view = agg
                        .view(&category, sort, order)
                        .with_context(|| format!("no table for {category}"))?;
                    write_view(&mut out, &view, &currency, format)?;
                }
            }
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config(config_path)?,
            ConfigCommand::Show => {
                let cfg = load_config(config_path)?;
                // validate before printing so a broken file is reported
                cfg.engine()?;
                print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
                io::stdout().flush()?;
            }
        },
    }

    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn run(engine: &Engine, input: &Path) -> Result<(TransactionSource, Aggregation)> {
    let src = state::read_source(input)?;
    let agg = engine.run(&src.transactions);
    tracing::debug!(
        input = %input.display(),
        transactions = src.transactions.len(),
        skipped = agg.skipped_count(),
        "aggregated"
    );
    Ok((src, agg))
}

fn currency(src: &TransactionSource, cfg: &Config) -> String {
    if src.currency.trim().is_empty() {
        cfg.display.currency.clone()
    } else {
        src.currency.clone()
    }
}

/// Months supplied by the source, or derived from transaction dates
fn months(src: &TransactionSource) -> Vec<String> {
    match &src.months {
        Some(months) => months.clone(),
        None => covered_months(&src.transactions)
            .into_iter()
            .map(month_label)
            .collect(),
    }
}
