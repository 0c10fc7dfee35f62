use std::collections::HashMap;

use crate::http::{HttpError, HttpGet, HttpResponse};

pub mod fixtures;

pub mod day_tests;

/// Canned response key: the URL plus its query string, in the order the
/// pipeline builds the parameters.
pub fn request_key(url: &str, params: &[(String, String)]) -> String {
    if params.is_empty() {
        return url.to_string();
    }
    let query: Vec<String> = params.iter().map(|(k, v)| format!("{k}={v}")).collect();
    format!("{}?{}", url, query.join("&"))
}

enum MockResponse {
    Ok(String),
    Status(u16),
}

/// In-memory stand-in for the retrying client. Unknown URLs come back
/// as 404.
pub struct MockClient {
    responses: HashMap<String, MockResponse>,
}

impl MockClient {
    pub fn new() -> Self {
        MockClient {
            responses: HashMap::new(),
        }
    }

    pub fn with_ok(mut self, key: &str, body: &str) -> Self {
        self.responses
            .insert(key.to_string(), MockResponse::Ok(body.to_string()));
        self
    }

    pub fn with_status(mut self, key: &str, status: u16) -> Self {
        self.responses
            .insert(key.to_string(), MockResponse::Status(status));
        self
    }
}

impl HttpGet for MockClient {
    fn get(&self, url: &str, params: &[(String, String)]) -> Result<HttpResponse, HttpError> {
        let key = request_key(url, params);
        match self.responses.get(&key) {
            Some(MockResponse::Ok(body)) => Ok(HttpResponse {
                status: 200,
                body: body.clone(),
            }),
            Some(MockResponse::Status(status)) => Err(HttpError::Status {
                status: *status,
                url: key,
            }),
            None => Err(HttpError::Status {
                status: 404,
                url: key,
            }),
        }
    }
}

/// CDX-style JSON body for a list of capture timestamps.
pub fn cdx_body(timestamps: &[&str]) -> String {
    let mut rows = vec![serde_json::json!([
        "urlkey",
        "timestamp",
        "original",
        "mimetype",
        "statuscode",
        "digest",
        "length"
    ])];
    for ts in timestamps {
        rows.push(serde_json::json!([
            "com,visitpanamacitybeach)/",
            ts,
            "https://www.visitpanamacitybeach.com/",
            "text/html",
            "200",
            "ABCDEFGH",
            "12345"
        ]));
    }
    serde_json::Value::Array(rows).to_string()
}

/// Minimal page HTML wrapping the given body text.
pub fn page_html(body: &str) -> String {
    format!("<html><head><title>Beach Alerts</title></head><body><div>{body}</div></body></html>")
}
