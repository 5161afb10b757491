//! Error types for rule construction and per-line parsing.
//!
//! [`RuleError`] is raised once, while building a rule set; nothing that gets
//! past construction can fail structurally at parse time. [`ParseError`] is
//! per-line and never poisons the parser instance.

use thiserror::Error;

/// A structurally invalid rule definition, detected at construction time.
#[derive(Debug, Error)]
pub enum RuleError {
    /// A user-supplied pattern failed to compile, either on its own or after
    /// being combined with the other items of its rule.
    #[error("invalid pattern `{pattern}`: {source}")]
    BadPattern {
        pattern: String,
        #[source]
        source: Box<regex::Error>,
    },

    /// Two items in one header rule would bind the same capture name.
    #[error("duplicate capture name `{0}` in header rule")]
    DuplicateCapture(String),

    /// An item name that cannot be used as a regex capture group name.
    #[error("invalid item name `{0}`: use ASCII letters, digits, and underscores")]
    InvalidName(String),

    /// Every header rule needs at least one non-optional item to anchor on.
    #[error("header rule has no mandatory item")]
    NoMandatoryItem,

    /// A rule that captures time-of-day or partial-date values must also
    /// capture a complete date source (month and day at minimum).
    #[error("header rule captures timestamp parts but no complete date")]
    IncompleteDate,

    /// A split action was configured with an empty delimiter set.
    #[error("empty delimiter set for split action")]
    EmptyDelimiters,

    /// A named capture group referenced by an action is absent from its
    /// pattern.
    #[error("capture group `{group}` not present in pattern `{pattern}`")]
    MissingGroup { group: String, pattern: String },

    /// A bracket pair with an empty opening or closing delimiter.
    #[error("empty bracket delimiter in pair")]
    EmptyBracket,
}

impl RuleError {
    pub(crate) fn bad_pattern(pattern: &str, source: regex::Error) -> Self {
        RuleError::BadPattern {
            pattern: pattern.to_string(),
            source: Box::new(source),
        }
    }
}

/// A per-line parse failure.
#[derive(Debug, Error)]
pub enum ParseError {
    /// No configured header rule matched the line prefix (strict mode only;
    /// headerless parsers pass the whole line through as body instead).
    #[error("no header rule matched: {snippet:?}")]
    HeaderMismatch { snippet: String },
}

impl ParseError {
    /// Truncate the offending line so error messages stay one line long.
    pub(crate) fn header_mismatch(line: &str) -> Self {
        const SNIPPET_LEN: usize = 50;
        let snippet = if line.len() > SNIPPET_LEN {
            let mut end = SNIPPET_LEN;
            while !line.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}…", &line[..end])
        } else {
            line.to_string()
        };
        ParseError::HeaderMismatch { snippet }
    }
}
