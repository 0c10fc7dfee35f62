use super::{page_html, MockClient};
use crate::cdx::Snapshot;
use crate::config::{Source, IFRAME_URL, REPLAY_BASE, SAFETY_URL};
use crate::days::{day_key_month, group_by_day, resolve_day, DayOutcome, SkipReason};
use crate::flags::FlagCode;
use crate::wayback::replay_url;

fn snapshots(timestamps: &[&str]) -> Vec<Snapshot> {
    timestamps
        .iter()
        .map(|ts| Snapshot {
            timestamp: ts.to_string(),
        })
        .collect()
}

fn sources() -> Vec<Source> {
    vec![
        Source::new("alerts-iframe", IFRAME_URL),
        Source::new("beach-safety", SAFETY_URL),
    ]
}

#[test]
fn test_grouping_by_day() {
    let per_source = vec![
        snapshots(&["20230815153000", "20230816120000"]),
        snapshots(&["20230815180000"]),
    ];
    let by_day = group_by_day(&per_source);

    assert_eq!(by_day.len(), 2);
    assert_eq!(
        by_day["20230815"],
        vec![
            Some("20230815153000".to_string()),
            Some("20230815180000".to_string())
        ]
    );
    assert_eq!(
        by_day["20230816"],
        vec![Some("20230816120000".to_string()), None]
    );
}

#[test]
fn test_grouping_is_idempotent() {
    let per_source = vec![
        snapshots(&["20230815153000", "20230816120000"]),
        snapshots(&["20230815180000", "20230901090000"]),
    ];
    assert_eq!(group_by_day(&per_source), group_by_day(&per_source));
}

#[test]
fn test_day_iteration_is_chronological() {
    let per_source = vec![snapshots(&["20231101090000", "20230815153000", "20230901120000"])];
    let days: Vec<_> = group_by_day(&per_source).into_keys().collect();
    assert_eq!(days, vec!["20230815", "20230901", "20231101"]);
}

#[test]
fn test_day_key_month() {
    assert_eq!(day_key_month("20230815"), Some(8));
    assert_eq!(day_key_month("20231201"), Some(12));
    assert_eq!(day_key_month("2023"), None);
    assert_eq!(day_key_month("2023xx15"), None);
}

#[test]
fn test_resolve_prefers_first_source() {
    let sources = sources();
    let captures = vec![
        Some("20230815153000".to_string()),
        Some("20230815180000".to_string()),
    ];
    let client = MockClient::new()
        .with_ok(
            &replay_url(REPLAY_BASE, "20230815153000", IFRAME_URL),
            &page_html("Current conditions: Yellow Flag"),
        )
        .with_ok(
            &replay_url(REPLAY_BASE, "20230815180000", SAFETY_URL),
            &page_html("Green Flag"),
        );

    match resolve_day(&client, REPLAY_BASE, &sources, &captures) {
        DayOutcome::Resolved(resolved) => {
            assert_eq!(resolved.source_url, IFRAME_URL);
            assert_eq!(resolved.timestamp, "20230815153000");
            assert_eq!(resolved.flag_text, "Yellow Flag");
            assert_eq!(resolved.normalized, Some(FlagCode::Yellow));
        }
        other => panic!("expected resolved day, got {:?}", other),
    }
}

#[test]
fn test_resolve_falls_back_when_primary_has_no_text() {
    let sources = sources();
    let captures = vec![
        Some("20230816120000".to_string()),
        Some("20230816130500".to_string()),
    ];
    let client = MockClient::new()
        .with_ok(
            &replay_url(REPLAY_BASE, "20230816120000", IFRAME_URL),
            &page_html("Maintenance page, check back soon"),
        )
        .with_ok(
            &replay_url(REPLAY_BASE, "20230816130500", SAFETY_URL),
            &page_html("double red flag - water closed"),
        );

    match resolve_day(&client, REPLAY_BASE, &sources, &captures) {
        DayOutcome::Resolved(resolved) => {
            // The fallback source's capture is the one recorded.
            assert_eq!(resolved.source_url, SAFETY_URL);
            assert_eq!(resolved.timestamp, "20230816130500");
            assert_eq!(resolved.flag_text, "Double Red Flag");
            assert_eq!(resolved.normalized, Some(FlagCode::DoubleRed));
        }
        other => panic!("expected resolved day, got {:?}", other),
    }
}

#[test]
fn test_resolve_with_secondary_only_capture() {
    let sources = sources();
    let captures = vec![None, Some("20230816140000".to_string())];
    let client = MockClient::new().with_ok(
        &replay_url(REPLAY_BASE, "20230816140000", SAFETY_URL),
        &page_html("Purple Flag: dangerous marine life"),
    );

    match resolve_day(&client, REPLAY_BASE, &sources, &captures) {
        DayOutcome::Resolved(resolved) => {
            assert_eq!(resolved.source_url, SAFETY_URL);
            assert_eq!(resolved.normalized, Some(FlagCode::Purple));
        }
        other => panic!("expected resolved day, got {:?}", other),
    }
}

#[test]
fn test_resolve_skips_when_no_capture_has_text() {
    let sources = sources();
    let captures = vec![Some("20230820100000".to_string()), None];
    let client = MockClient::new().with_ok(
        &replay_url(REPLAY_BASE, "20230820100000", IFRAME_URL),
        &page_html("No conditions posted today"),
    );

    assert_eq!(
        resolve_day(&client, REPLAY_BASE, &sources, &captures),
        DayOutcome::Skipped(SkipReason::NoFlagText)
    );
}

#[test]
fn test_resolve_skips_day_on_fetch_error() {
    let sources = sources();
    let captures = vec![Some("20230821100000".to_string()), None];
    let client = MockClient::new()
        .with_status(&replay_url(REPLAY_BASE, "20230821100000", IFRAME_URL), 500);

    match resolve_day(&client, REPLAY_BASE, &sources, &captures) {
        DayOutcome::Skipped(SkipReason::Fetch(message)) => {
            assert!(message.contains("500"), "message: {}", message);
        }
        other => panic!("expected fetch skip, got {:?}", other),
    }
}
