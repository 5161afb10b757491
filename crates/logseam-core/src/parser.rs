//! Log parser orchestration — wires the header matcher and the body
//! tokenizer into the single per-line entry point.

use crate::error::ParseError;
use crate::header::HeaderParser;
use crate::tokenize::Tokenizer;
use crate::types::Record;

/// The combined parser. Immutable and internally unsynchronized: every call
/// is a pure function of the line, so one instance can be shared freely
/// across threads.
#[derive(Debug)]
pub struct LogParser {
    header: HeaderParser,
    tokenizer: Tokenizer,
}

impl LogParser {
    pub fn new(header: HeaderParser, tokenizer: Tokenizer) -> Self {
        LogParser { header, tokenizer }
    }

    pub fn header(&self) -> &HeaderParser {
        &self.header
    }

    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    /// Parse one line into a [`Record`]. A trailing line feed is stripped.
    ///
    /// Failure is per-line: an `Err` for one line never affects the next
    /// call.
    pub fn parse_line(&self, line: &str) -> Result<Record, ParseError> {
        let line = line.trim_end_matches(['\r', '\n']);
        let header = self.header.parse(line)?;
        let words = self.tokenizer.tokenize(&header.body);
        Ok(Record {
            raw: line.to_string(),
            timestamp: header.timestamp,
            host: header.host,
            fields: header.fields,
            body: header.body,
            words,
        })
    }
}
