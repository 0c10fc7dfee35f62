use std::path::PathBuf;
use std::time::Duration;

/// PCB's official beach alerts iframe, the page the flag is read from first.
pub const IFRAME_URL: &str = "https://www.visitpanamacitybeach.com/beach-alerts-iframe/";

/// The beach safety page, tried when the iframe yields nothing.
pub const SAFETY_URL: &str = "https://www.visitpanamacitybeach.com/safety/beach-safety/";

pub const CDX_API: &str = "https://web.archive.org/cdx/search/cdx";
pub const REPLAY_BASE: &str = "https://web.archive.org/web";

pub const USER_AGENT: &str = "pcb-flag-backfill/1.0 (+https://github.com/pcb-flag-backfill)";

/// A page the flag status can be scraped from.
#[derive(Debug, Clone, PartialEq)]
pub struct Source {
    pub name: String,
    pub url: String,
}

impl Source {
    pub fn new(name: &str, url: &str) -> Self {
        Source {
            name: name.to_string(),
            url: url.to_string(),
        }
    }
}

/// Everything a backfill run needs beyond its CLI arguments.
///
/// Sources are ordered by preference: the first source with a capture for a
/// given day is tried first, and the rest serve as fallbacks.
#[derive(Debug, Clone)]
pub struct BackfillConfig {
    pub sources: Vec<Source>,
    pub cdx_api: String,
    pub replay_base: String,
    pub user_agent: String,
    /// IANA timezone name used to derive `date_local`.
    pub timezone: String,
    /// Output file for the historical backfill.
    pub csv_path: PathBuf,
    /// Output file for the daily logger.
    pub daily_csv_path: PathBuf,
    pub request_timeout: Duration,
    /// Pause after every request, successful or not.
    pub request_pause: Duration,
    pub max_attempts: u32,
    pub initial_backoff: Duration,
}

impl Default for BackfillConfig {
    fn default() -> Self {
        BackfillConfig {
            sources: vec![
                Source::new("alerts-iframe", IFRAME_URL),
                Source::new("beach-safety", SAFETY_URL),
            ],
            cdx_api: CDX_API.to_string(),
            replay_base: REPLAY_BASE.to_string(),
            user_agent: USER_AGENT.to_string(),
            timezone: "America/New_York".to_string(),
            csv_path: PathBuf::from("pcb_flags_historical.csv"),
            daily_csv_path: PathBuf::from("pcb_flags.csv"),
            request_timeout: Duration::from_secs(60),
            request_pause: Duration::from_millis(400),
            max_attempts: 6,
            initial_backoff: Duration::from_millis(1500),
        }
    }
}
