use crate::http::{HttpError, HttpGet};

/// Replay URL for one capture. The `id_` flag asks for the archived page
/// verbatim instead of wrapped in the Wayback toolbar.
pub fn replay_url(base: &str, timestamp: &str, page_url: &str) -> String {
    format!("{base}/{timestamp}id_/{page_url}")
}

/// Fetch the archived HTML for an exact capture timestamp. Errors are the
/// per-day loop's problem.
pub fn fetch_snapshot(
    client: &dyn HttpGet,
    base: &str,
    page_url: &str,
    timestamp: &str,
) -> Result<String, HttpError> {
    let response = client.get(&replay_url(base, timestamp, page_url), &[])?;
    Ok(response.body)
}
