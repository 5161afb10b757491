//! logseam — split log lines at the seams.
//!
//! A naive `line.split(':')` destroys IPv6 addresses and times of day while
//! failing to separate `key:value` markers. logseam instead runs two
//! cooperating engines: an ordered header grammar that recognizes one of
//! several fixed-shape prefixes (timestamp and host conventions), and a body
//! rewriter that splits, protects, and removes substrings in a configured
//! order until a clean word sequence remains.
//!
//! ```
//! let parser = logseam::presets::default_parser();
//! let record = parser
//!     .parse_line("Jan  1 12:34:56 host-device1 system[12345]: link up")
//!     .unwrap();
//! assert_eq!(record.host.as_deref(), Some("host-device1"));
//! assert_eq!(record.words, vec!["system", "12345", "link", "up"]);
//! ```
//!
//! This crate is a facade over [`logseam_core`]; everything it exports comes
//! from there.

pub use logseam_core::{
    error, header, parser, presets, tokenize, types, Action, FieldValue, Header, HeaderParser,
    HeaderParserBuilder, HeaderRule, Item, LogParser, ParseError, Record, RuleError, Span,
    Tokenizer,
};
