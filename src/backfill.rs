use std::collections::HashSet;

use anyhow::Result;
use chrono_tz::Tz;
use log::warn;

use crate::cdx::query_snapshots;
use crate::config::BackfillConfig;
use crate::csvlog::{append_observation, ensure_header, FlagObservation};
use crate::dates::{fetched_at_utc, local_date};
use crate::days::{day_key_month, group_by_day, resolve_day, DayOutcome};
use crate::http::HttpGet;
use crate::wayback::replay_url;

/// Parameters for one backfill run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Start year, inclusive.
    pub from_year: i32,
    /// End year, inclusive.
    pub to_year: i32,
    /// Restrict output to these months (1-12); empty means all months.
    pub months: HashSet<u32>,
}

/// Resolve the configured timezone, warning once when the name is unknown
/// and `date_local` degrades to the UTC date.
pub fn resolve_timezone(name: &str) -> Option<Tz> {
    match name.parse::<Tz>() {
        Ok(tz) => Some(tz),
        Err(_) => {
            warn!(
                "unknown timezone {:?}; date_local will use the UTC date",
                name
            );
            None
        }
    }
}

/// Run the whole backfill: index every source, group captures by day, and
/// append one row per day whose flag status could be read. Returns the
/// number of rows written. Per-day trouble is logged and skipped; only
/// output-file problems abort the run.
pub fn run_backfill(
    client: &dyn HttpGet,
    config: &BackfillConfig,
    options: &RunOptions,
) -> Result<usize> {
    let per_source: Vec<_> = config
        .sources
        .iter()
        .map(|source| {
            query_snapshots(
                client,
                config,
                &source.url,
                options.from_year,
                options.to_year,
            )
        })
        .collect();
    let by_day = group_by_day(&per_source);

    ensure_header(&config.csv_path)?;

    let tz = resolve_timezone(&config.timezone);
    let fetched_at = fetched_at_utc();

    let mut days_written = 0;
    for (day, captures) in &by_day {
        if !options.months.is_empty() {
            match day_key_month(day) {
                Some(month) if options.months.contains(&month) => {}
                _ => continue,
            }
        }

        match resolve_day(client, &config.replay_base, &config.sources, captures) {
            DayOutcome::Resolved(resolved) => {
                let date_local = match local_date(&resolved.timestamp, tz) {
                    Ok(date) => date.to_string(),
                    Err(e) => {
                        warn!("{}: {:#}", day, e);
                        continue;
                    }
                };
                let observation = FlagObservation {
                    date_local,
                    flag_text: resolved.flag_text,
                    normalized_flag: resolved
                        .normalized
                        .map(|code| code.as_str().to_string())
                        .unwrap_or_default(),
                    wayback_url: replay_url(
                        &config.replay_base,
                        &resolved.timestamp,
                        &resolved.source_url,
                    ),
                    source_url: resolved.source_url,
                    wayback_ts: resolved.timestamp,
                    fetched_at_utc: fetched_at.clone(),
                };
                append_observation(&config.csv_path, &observation)?;
                days_written += 1;
            }
            DayOutcome::Skipped(reason) => {
                warn!("{}: skipped ({})", day, reason);
            }
        }
    }
    Ok(days_written)
}
