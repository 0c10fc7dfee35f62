use anyhow::Result;
use env_logger::Env;
use log::warn;

use pcb_flag_backfill::csvlog::upsert_daily_row;
use pcb_flag_backfill::dates::{fetched_at_utc, today_local};
use pcb_flag_backfill::{
    extract_flag_from_page, normalize_flag, resolve_timezone, BackfillConfig, DailyFlagRow,
    HttpGet, RetryingClient,
};

/// Scrape the live flag status from the first source that yields one.
/// Returns (flag_text, source_url).
fn get_flag(client: &dyn HttpGet, config: &BackfillConfig) -> Result<(String, String)> {
    for source in &config.sources {
        let html = match client.get(&source.url, &[]) {
            Ok(response) => response.body,
            Err(e) => {
                warn!("{} fetch failed: {}", source.name, e);
                continue;
            }
        };
        if let Some(flag_text) = extract_flag_from_page(&html) {
            return Ok((flag_text, source.url.clone()));
        }
    }
    anyhow::bail!("Could not determine flag status from known sources")
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let config = BackfillConfig::default();
    let client = RetryingClient::new(&config)?;

    let tz = resolve_timezone(&config.timezone);
    let date_local = today_local(tz).to_string();

    let (flag_text, source_url) = get_flag(&client, &config)?;
    let normalized = normalize_flag(&flag_text)
        .map(|code| code.as_str().to_string())
        .unwrap_or_default();

    let row = DailyFlagRow {
        date_local: date_local.clone(),
        flag_text: flag_text.clone(),
        normalized_flag: normalized.clone(),
        source_url: source_url.clone(),
        fetched_at_utc: fetched_at_utc(),
    };
    let action = upsert_daily_row(&config.daily_csv_path, &row)?;

    println!(
        "[ok] {}: {} -> {} (normalized={}) from {}",
        action.as_str(),
        date_local,
        flag_text,
        if normalized.is_empty() { "n/a" } else { &normalized },
        source_url
    );

    Ok(())
}
