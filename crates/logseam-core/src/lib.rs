//! logseam-core — the two parsing engines behind logseam.
//!
//! This crate turns one unstructured, syslog-like line into a structured
//! [`Record`]: an extracted timestamp, a source identifier, and an ordered
//! word sequence ready for pattern mining or templating.
//!
//! # Architecture
//!
//! ```text
//! line ──► HeaderParser ──► (header fields, body) ──► Tokenizer ──► Record
//!            ordered rules,                             ordered actions over
//!            first match wins                           protected/plain spans
//! ```
//!
//! Rule sets are built once, validated at construction, and shared read-only
//! across every processed line; per-line state is local to each call, so a
//! [`LogParser`] can be used from any number of threads.

pub mod error;
pub mod header;
pub mod parser;
pub mod presets;
pub mod tokenize;
pub mod types;

pub use error::{ParseError, RuleError};
pub use header::{HeaderParser, HeaderParserBuilder, HeaderRule, Item};
pub use parser::LogParser;
pub use tokenize::{Action, Span, Tokenizer};
pub use types::{FieldValue, Header, Record};
