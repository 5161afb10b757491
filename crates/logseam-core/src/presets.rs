//! Built-in rule sets for common log shapes.
//!
//! [`default_parser`] handles the two everyday formats: syslogd lines
//! (`Jan  1 12:34:56 host …`, with or without a leading year) and ISO-dated
//! lines (`2024-01-15 10:00:00 host …`). [`apache_error_parser`] handles the
//! Apache error-log bracket format in both its 2.2 and 2.4 shapes.
//!
//! These presets are ordinary rule sets: anything they do can be rebuilt or
//! extended through [`HeaderRule`] and [`Action`] directly.

use crate::header::{HeaderParser, HeaderRule, Item};
use crate::parser::LogParser;
use crate::tokenize::{Action, Tokenizer};

/// Time-of-day token, with optional fractional seconds: `12:34:56.789`.
pub const PATTERN_TIME: &str = r"^\d{2}:\d{2}:\d{2}(\.\d+)?$";

/// Colon-separated MAC address token.
pub const PATTERN_MAC: &str = r"^([0-9a-fA-F]{2}:){5}[0-9a-fA-F]{2}$";

/// The default header rules: syslogd first (more specific), ISO date second.
pub fn default_header_rules() -> Vec<HeaderRule> {
    vec![
        HeaderRule::new(vec![
            Item::digit("year").optional(),
            Item::month_abbreviation(),
            Item::digit("day"),
            Item::time(),
            Item::hostname("host"),
        ]),
        HeaderRule::new(vec![
            Item::date(),
            Item::time(),
            Item::hostname("host"),
        ]),
    ]
}

/// The default four-step action chain:
///
/// 1. split on the common separator symbols (brackets, quotes, space, …)
/// 2. protect IP address and network literals
/// 3. protect time-of-day and MAC address tokens
/// 4. split the remaining tokens on `:`
pub fn default_actions() -> Vec<Action> {
    vec![
        Action::split("\"()[]{}|+',=><;`# ").expect("built-in split delimiters must compile"),
        Action::fix_ip(),
        Action::fix(&[PATTERN_TIME, PATTERN_MAC]).expect("built-in fix patterns must compile"),
        Action::split(":").expect("built-in split delimiters must compile"),
    ]
}

/// Strict parser over [`default_header_rules`] and [`default_actions`].
pub fn default_parser() -> LogParser {
    let header = HeaderParser::new(default_header_rules())
        .expect("built-in default header rules must compile");
    LogParser::new(header, Tokenizer::new(default_actions()))
}

/// Header rules for Apache error logs.
///
/// The 2.4 shape (`[Mon Jan 15 10:00:00.123456 2024] [core:error] [pid 1234:
/// tid 5678] [client 10.0.0.1:40960] message`) is listed before the plainer
/// 2.2 shape, more specific first.
pub fn apache_error_rules() -> Vec<HeaderRule> {
    let modern = HeaderRule::with_separator(
        vec![
            Item::text("weekday").dummy(),
            Item::month_abbreviation(),
            Item::digit("day"),
            Item::time(),
            Item::digit("year"),
            Item::text_with_symbols("module", "_"),
            Item::text("severity"),
            Item::pattern("pid_marker", "pid").dummy(),
            Item::digit("pid"),
            Item::pattern("tid_marker", "tid").optional().dummy(),
            Item::digit("tid").optional(),
            Item::pattern("client_marker", "client").optional().dummy(),
            Item::hostname("host").optional(),
        ],
        " []:",
    );
    let legacy = HeaderRule::with_separator(
        vec![
            Item::text("weekday").dummy(),
            Item::month_abbreviation(),
            Item::digit("day"),
            Item::time(),
            Item::digit("year"),
            Item::text("severity"),
            Item::pattern("client_marker", "client").optional().dummy(),
            Item::hostname("host").optional(),
        ],
        " []",
    );
    vec![modern, legacy]
}

/// Strict parser for Apache error logs, with the default body actions.
pub fn apache_error_parser() -> LogParser {
    let header = HeaderParser::new(apache_error_rules())
        .expect("built-in apache header rules must compile");
    LogParser::new(header, Tokenizer::new(default_actions()))
}
