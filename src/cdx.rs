use anyhow::{Context, Result};
use log::warn;
use serde_json::Value;

use crate::config::BackfillConfig;
use crate::http::HttpGet;

/// One capture of a source page, as reported by the CDX index.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// 14-digit UTC capture timestamp, YYYYMMDDhhmmss.
    pub timestamp: String,
}

/// Ask the CDX index for one status-200 capture per UTC day of `page_url`.
///
/// A failed query is logged and treated as "no snapshots"; the run carries
/// on with whatever the other sources returned.
pub fn query_snapshots(
    client: &dyn HttpGet,
    config: &BackfillConfig,
    page_url: &str,
    from_year: i32,
    to_year: i32,
) -> Vec<Snapshot> {
    match try_query(client, config, page_url, from_year, to_year) {
        Ok(snapshots) => snapshots,
        Err(e) => {
            warn!("CDX query for {} failed: {:#}", page_url, e);
            Vec::new()
        }
    }
}

pub fn query_params(page_url: &str, from_year: i32, to_year: i32) -> Vec<(String, String)> {
    vec![
        ("url".to_string(), page_url.to_string()),
        ("output".to_string(), "json".to_string()),
        ("from".to_string(), from_year.to_string()),
        ("to".to_string(), to_year.to_string()),
        ("filter".to_string(), "statuscode:200".to_string()),
        ("collapse".to_string(), "timestamp:8".to_string()),
    ]
}

fn try_query(
    client: &dyn HttpGet,
    config: &BackfillConfig,
    page_url: &str,
    from_year: i32,
    to_year: i32,
) -> Result<Vec<Snapshot>> {
    let params = query_params(page_url, from_year, to_year);
    let response = client.get(&config.cdx_api, &params)?;
    parse_cdx_rows(&response.body)
}

/// CDX JSON output is an array of arrays: a header row of column names
/// followed by one row per capture. Empty or header-only means no data.
pub fn parse_cdx_rows(body: &str) -> Result<Vec<Snapshot>> {
    let data: Value = serde_json::from_str(body).context("CDX response is not JSON")?;
    let rows = data.as_array().context("CDX response is not an array")?;
    if rows.len() <= 1 {
        return Ok(Vec::new());
    }

    let header = rows[0].as_array().context("CDX header row is not an array")?;
    let ts_col = header
        .iter()
        .position(|col| col.as_str() == Some("timestamp"))
        .context("CDX header has no timestamp column")?;

    let mut snapshots = Vec::new();
    for row in &rows[1..] {
        let row = row.as_array().context("CDX data row is not an array")?;
        if let Some(ts) = row.get(ts_col).and_then(Value::as_str) {
            snapshots.push(Snapshot {
                timestamp: ts.to_string(),
            });
        }
    }
    Ok(snapshots)
}
