use std::collections::HashSet;

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;

use pcb_flag_backfill::{run_backfill, BackfillConfig, RetryingClient, RunOptions};

/// Backfill historical PCB beach flag statuses from the Wayback Machine
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Start year, e.g. 2022
    #[arg(long)]
    from_year: i32,

    /// End year inclusive, e.g. 2025
    #[arg(long)]
    to_year: i32,

    /// Comma list of months 1-12 to include (optional). Example: 5,6,7,8
    #[arg(long, default_value = "")]
    months: String,
}

fn parse_months(raw: &str) -> Result<HashSet<u32>> {
    let mut months = HashSet::new();
    for part in raw.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let month: u32 = part
            .parse()
            .with_context(|| format!("Invalid month: {part}"))?;
        if !(1..=12).contains(&month) {
            anyhow::bail!("Month out of range 1-12: {month}");
        }
        months.insert(month);
    }
    Ok(months)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let months = parse_months(&cli.months)?;

    let config = BackfillConfig::default();
    let client = RetryingClient::new(&config)?;
    let options = RunOptions {
        from_year: cli.from_year,
        to_year: cli.to_year,
        months,
    };

    let days = run_backfill(&client, &config, &options)?;
    println!("[ok] wrote {} day(s) to {}", days, config.csv_path.display());

    Ok(())
}
