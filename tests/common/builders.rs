//! Test builders — parsers and timestamps with everything pinned.
//!
//! These builders exist for readability in test assertions, not for
//! production use. They panic on invalid rule sets rather than returning
//! `Result`.

use chrono::{DateTime, FixedOffset, TimeZone};
use logseam::presets::{default_actions, default_header_rules};
use logseam::{HeaderParser, HeaderRule, LogParser, Tokenizer};

/// The year every test parser assumes when a line carries none.
pub const REFERENCE_YEAR: i32 = 2020;

/// Strict default parser with the reference year pinned to [`REFERENCE_YEAR`].
pub fn default_parser_pinned() -> LogParser {
    let header = HeaderParser::builder()
        .rules(default_header_rules())
        .reference_year(REFERENCE_YEAR)
        .build()
        .expect("default rules must compile");
    LogParser::new(header, Tokenizer::new(default_actions()))
}

/// Like [`default_parser_pinned`], with headerless fallback instead of
/// strict errors.
pub fn headerless_parser_pinned() -> LogParser {
    let header = HeaderParser::builder()
        .rules(default_header_rules())
        .reference_year(REFERENCE_YEAR)
        .headerless_fallback(true)
        .build()
        .expect("default rules must compile");
    LogParser::new(header, Tokenizer::new(default_actions()))
}

/// A strict parser over arbitrary rules, reference year pinned, default
/// action chain.
pub fn parser_with_rules(rules: Vec<HeaderRule>) -> LogParser {
    let header = HeaderParser::builder()
        .rules(rules)
        .reference_year(REFERENCE_YEAR)
        .build()
        .expect("test rules must compile");
    LogParser::new(header, Tokenizer::new(default_actions()))
}

/// The default body tokenizer on its own.
pub fn default_tokenizer() -> Tokenizer {
    Tokenizer::new(default_actions())
}

/// A UTC timestamp for assertions.
pub fn ts(year: i32, month: u32, day: u32, hour: u32, minute: u32, second: u32) -> DateTime<FixedOffset> {
    FixedOffset::east_opt(0)
        .unwrap()
        .with_ymd_and_hms(year, month, day, hour, minute, second)
        .unwrap()
}

/// A timestamp at an explicit offset (seconds east) for assertions.
pub fn ts_at_offset(
    offset_secs: i32,
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    second: u32,
) -> DateTime<FixedOffset> {
    FixedOffset::east_opt(offset_secs)
        .unwrap()
        .with_ymd_and_hms(year, month, day, hour, minute, second)
        .unwrap()
}
