use std::collections::BTreeMap;
use std::fmt;

use crate::cdx::Snapshot;
use crate::config::Source;
use crate::flags::{extract_flag_text, normalize_flag, FlagCode};
use crate::http::HttpGet;
use crate::wayback::fetch_snapshot;

/// Captures for one calendar day, indexed parallel to the configured
/// source list. At most one timestamp per source per day, since the CDX
/// query already collapses to one capture per day.
pub type DayCaptures = Vec<Option<String>>;

/// Group per-source snapshot lists by UTC day key (the first 8 digits of
/// the capture timestamp). BTreeMap keeps day iteration chronological.
pub fn group_by_day(per_source: &[Vec<Snapshot>]) -> BTreeMap<String, DayCaptures> {
    let mut by_day: BTreeMap<String, DayCaptures> = BTreeMap::new();
    for (source_idx, snapshots) in per_source.iter().enumerate() {
        for snapshot in snapshots {
            if snapshot.timestamp.len() < 8 {
                continue;
            }
            let day = snapshot.timestamp[..8].to_string();
            let captures = by_day
                .entry(day)
                .or_insert_with(|| vec![None; per_source.len()]);
            captures[source_idx] = Some(snapshot.timestamp.clone());
        }
    }
    by_day
}

/// Month component of an 8-digit day key, if it parses.
pub fn day_key_month(day: &str) -> Option<u32> {
    day.get(4..6)?.parse().ok()
}

/// Why a day produced no output row.
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    /// No capture's HTML contained recognizable flag wording.
    NoFlagText,
    /// A snapshot fetch failed after the client's retries.
    Fetch(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NoFlagText => write!(f, "no flag text in any capture"),
            SkipReason::Fetch(message) => write!(f, "fetch failed: {message}"),
        }
    }
}

/// A day whose flag status could be read from an archived capture.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedDay {
    pub timestamp: String,
    pub source_url: String,
    pub flag_text: String,
    pub normalized: Option<FlagCode>,
}

/// Result of processing one day's captures. Skipping is a first-class
/// outcome, not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum DayOutcome {
    Resolved(ResolvedDay),
    Skipped(SkipReason),
}

/// Try each source with a capture, in configured order, until one yields
/// readable flag text. The resolved row records whichever source actually
/// produced the text. A fetch error skips the whole day.
pub fn resolve_day(
    client: &dyn HttpGet,
    replay_base: &str,
    sources: &[Source],
    captures: &DayCaptures,
) -> DayOutcome {
    for (source, capture) in sources.iter().zip(captures) {
        let Some(ts) = capture else { continue };

        let html = match fetch_snapshot(client, replay_base, &source.url, ts) {
            Ok(html) => html,
            Err(e) => return DayOutcome::Skipped(SkipReason::Fetch(e.to_string())),
        };

        if let Some(flag_text) = extract_flag_text(&html) {
            let normalized = normalize_flag(&flag_text);
            return DayOutcome::Resolved(ResolvedDay {
                timestamp: ts.clone(),
                source_url: source.url.clone(),
                flag_text,
                normalized,
            });
        }
    }
    DayOutcome::Skipped(SkipReason::NoFlagText)
}
