use scraper::Html;
use serde::Serialize;

/// Warning flag categories flown on Panama City Beach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagCode {
    Green,
    Yellow,
    Purple,
    SingleRed,
    DoubleRed,
}

impl FlagCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlagCode::Green => "green",
            FlagCode::Yellow => "yellow",
            FlagCode::Purple => "purple",
            FlagCode::SingleRed => "single_red",
            FlagCode::DoubleRed => "double_red",
        }
    }
}

/// Exact phrases seen on the alert pages, matched before the substring
/// heuristics kick in.
const FLAG_ALIASES: [(&str, FlagCode); 11] = [
    ("green", FlagCode::Green),
    ("green flag", FlagCode::Green),
    ("yellow", FlagCode::Yellow),
    ("yellow flag", FlagCode::Yellow),
    ("purple", FlagCode::Purple),
    ("purple flag", FlagCode::Purple),
    ("single red", FlagCode::SingleRed),
    ("single red flag", FlagCode::SingleRed),
    ("red flag", FlagCode::SingleRed),
    ("double red", FlagCode::DoubleRed),
    ("double red flag", FlagCode::DoubleRed),
];

/// Tighter phrases first: "double red flag" must never resolve as "red".
const FLAG_PHRASES: [&str; 6] = [
    "double red flag",
    "single red flag",
    "red flag",
    "yellow flag",
    "green flag",
    "purple flag",
];

/// Looser single-token fallbacks, same first-match-wins rule.
const FLAG_WORDS: [&str; 6] = ["double red", "single red", "yellow", "green", "purple", "red"];

/// Map extracted flag wording to its category code.
///
/// A plain "red" with no qualifier is treated as single red, the common
/// phrasing outside closures.
pub fn normalize_flag(raw: &str) -> Option<FlagCode> {
    let s = raw.trim().to_lowercase();
    for (alias, code) in FLAG_ALIASES {
        if s == alias {
            return Some(code);
        }
    }
    if s.contains("double") && s.contains("red") {
        return Some(FlagCode::DoubleRed);
    }
    if s.contains("single") && s.contains("red") {
        return Some(FlagCode::SingleRed);
    }
    if s.contains("red") {
        return Some(FlagCode::SingleRed);
    }
    if s.contains("yellow") {
        return Some(FlagCode::Yellow);
    }
    if s.contains("green") {
        return Some(FlagCode::Green);
    }
    if s.contains("purple") {
        return Some(FlagCode::Purple);
    }
    None
}

/// Strip markup and collapse whitespace so phrases split across elements
/// still match.
pub fn page_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let text = document.root_element().text().collect::<Vec<_>>().join(" ");
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Find the flag phrase in already-lowercased page text.
pub fn find_flag_phrase(text: &str) -> Option<String> {
    for phrase in FLAG_PHRASES {
        if text.contains(phrase) {
            return Some(title_case(phrase));
        }
    }
    for word in FLAG_WORDS {
        if text.contains(word) {
            return Some(title_case(word));
        }
    }
    None
}

/// Pull a human-readable flag phrase out of archived page HTML.
pub fn extract_flag_text(html: &str) -> Option<String> {
    let text = page_text(html).to_lowercase();
    find_flag_phrase(&text)
}

/// Live-page variant: the alerts iframe leads with "Current Beach
/// Conditions", and wording close to that heading is the flag actually
/// flying today. Scan a short window after it before falling back to the
/// whole page.
pub fn extract_flag_from_page(html: &str) -> Option<String> {
    let text = page_text(html).to_lowercase();
    if let Some(idx) = text.find("current beach conditions") {
        let mut end = (idx + 240).min(text.len());
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        if let Some(flag) = find_flag_phrase(&text[idx..end]) {
            return Some(flag);
        }
    }
    find_flag_phrase(&text)
}

fn title_case(s: &str) -> String {
    s.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
