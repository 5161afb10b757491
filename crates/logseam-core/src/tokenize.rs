//! Body tokenization — an ordered chain of span-rewriting actions.
//!
//! The body of a line starts as one unprotected [`Span`]. Each [`Action`]
//! consumes the current span sequence and produces a new one: splitting
//! unprotected spans, protecting substrings that must stay atomic (IP
//! literals, bracketed content), or removing noise. Protection is one-way: a
//! protected span is invisible to every later action and reaches the word
//! list verbatim.

use std::net::{IpAddr, Ipv6Addr};

use regex::Regex;
use tracing::trace;

use crate::error::RuleError;

// ---------------------------------------------------------------------------
// Spans
// ---------------------------------------------------------------------------

/// A contiguous piece of body text, tagged with whether later actions may
/// still rewrite it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub protected: bool,
}

impl Span {
    /// An unprotected span, open to further splitting and removal.
    pub fn word(text: impl Into<String>) -> Self {
        Span {
            text: text.into(),
            protected: false,
        }
    }

    /// A protected span: final, passed through to the word list verbatim.
    pub fn fixed(text: impl Into<String>) -> Self {
        Span {
            text: text.into(),
            protected: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
enum ActionKind {
    Split {
        delimiters: Regex,
        keep_delimiter: bool,
    },
    ConditionalSplit {
        delimiters: Regex,
        unless: Regex,
    },
    Fix {
        patterns: Vec<Regex>,
    },
    FixIp {
        address: bool,
        network: bool,
    },
    FixPartial {
        pattern: Regex,
        groups: Vec<String>,
        discard_rest: bool,
    },
    FixParenthesis {
        pairs: Vec<(String, String)>,
        keep_delimiters: bool,
    },
    Remove {
        patterns: Vec<Regex>,
    },
    RemovePartial {
        pattern: Regex,
        occurrences: usize,
    },
}

/// One configured step of the body-rewriting chain. Build with the
/// constructor methods; every constructor validates its patterns so that a
/// built action can never fail at tokenization time.
#[derive(Debug, Clone)]
pub struct Action {
    kind: ActionKind,
}

fn compile(pattern: &str) -> Result<Regex, RuleError> {
    Regex::new(pattern).map_err(|e| RuleError::bad_pattern(pattern, e))
}

fn compile_all(patterns: &[&str]) -> Result<Vec<Regex>, RuleError> {
    patterns.iter().map(|p| compile(p)).collect()
}

/// A character set compiled to a regex matching runs of those characters.
fn delimiter_run(delimiters: &str) -> Result<Regex, RuleError> {
    if delimiters.is_empty() {
        return Err(RuleError::EmptyDelimiters);
    }
    let class: String = delimiters
        .chars()
        .map(|c| regex::escape(&c.to_string()))
        .collect();
    compile(&format!("[{class}]+"))
}

impl Action {
    /// Split unprotected spans on runs of the given delimiter characters; the
    /// delimiters are dropped.
    pub fn split(delimiters: &str) -> Result<Action, RuleError> {
        Ok(Action {
            kind: ActionKind::Split {
                delimiters: delimiter_run(delimiters)?,
                keep_delimiter: false,
            },
        })
    }

    /// Like [`Action::split`], but each delimiter run survives as its own
    /// unprotected span.
    pub fn split_keeping(delimiters: &str) -> Result<Action, RuleError> {
        Ok(Action {
            kind: ActionKind::Split {
                delimiters: delimiter_run(delimiters)?,
                keep_delimiter: true,
            },
        })
    }

    /// Split unprotected spans on matches of an arbitrary delimiter regex;
    /// the matched text is dropped.
    pub fn split_pattern(pattern: &str) -> Result<Action, RuleError> {
        Ok(Action {
            kind: ActionKind::Split {
                delimiters: compile(pattern)?,
                keep_delimiter: false,
            },
        })
    }

    /// Split on delimiter runs, except where the fragment immediately left or
    /// right of a candidate run matches `unless`. Each occurrence is judged
    /// independently.
    pub fn conditional_split(delimiters: &str, unless: &str) -> Result<Action, RuleError> {
        Ok(Action {
            kind: ActionKind::ConditionalSplit {
                delimiters: delimiter_run(delimiters)?,
                unless: compile(unless)?,
            },
        })
    }

    /// Protect every non-overlapping match of the given patterns inside each
    /// unprotected span; the surrounding text stays unprotected.
    pub fn fix(patterns: &[&str]) -> Result<Action, RuleError> {
        Ok(Action {
            kind: ActionKind::Fix {
                patterns: compile_all(patterns)?,
            },
        })
    }

    /// Protect spans that are IPv4/IPv6 address or network literals
    /// (including IPv6 zone suffixes such as `fe80::1%eth0`).
    pub fn fix_ip() -> Action {
        Self::fix_ip_with(true, true)
    }

    /// [`Action::fix_ip`] with address and CIDR-network matching separately
    /// toggleable.
    pub fn fix_ip_with(address: bool, network: bool) -> Action {
        Action {
            kind: ActionKind::FixIp { address, network },
        }
    }

    /// Protect only the named capture groups of the pattern's first match in
    /// each span; the rest of the span stays unprotected. With an empty
    /// group list the whole match is protected.
    pub fn fix_partial(pattern: &str, groups: &[&str]) -> Result<Action, RuleError> {
        Self::fix_partial_with(pattern, groups, false)
    }

    /// Like [`Action::fix_partial`], but text outside the protected groups is
    /// discarded instead of staying unprotected.
    pub fn fix_partial_discarding(pattern: &str, groups: &[&str]) -> Result<Action, RuleError> {
        Self::fix_partial_with(pattern, groups, true)
    }

    fn fix_partial_with(
        pattern: &str,
        groups: &[&str],
        discard_rest: bool,
    ) -> Result<Action, RuleError> {
        let regex = compile(pattern)?;
        for group in groups {
            if !regex.capture_names().flatten().any(|n| n == *group) {
                return Err(RuleError::MissingGroup {
                    group: group.to_string(),
                    pattern: pattern.to_string(),
                });
            }
        }
        Ok(Action {
            kind: ActionKind::FixPartial {
                pattern: regex,
                groups: groups.iter().map(|g| g.to_string()).collect(),
                discard_rest,
            },
        })
    }

    /// Protect balanced bracket pairs, nesting respected; the bracket
    /// characters themselves stay outside the protected span.
    pub fn fix_parenthesis(pairs: &[(&str, &str)]) -> Result<Action, RuleError> {
        Self::fix_parenthesis_with(pairs, false)
    }

    /// Like [`Action::fix_parenthesis`], but the bracket characters are part
    /// of the protected span.
    pub fn fix_parenthesis_keeping(pairs: &[(&str, &str)]) -> Result<Action, RuleError> {
        Self::fix_parenthesis_with(pairs, true)
    }

    fn fix_parenthesis_with(
        pairs: &[(&str, &str)],
        keep_delimiters: bool,
    ) -> Result<Action, RuleError> {
        if pairs.iter().any(|(open, close)| open.is_empty() || close.is_empty()) {
            return Err(RuleError::EmptyBracket);
        }
        Ok(Action {
            kind: ActionKind::FixParenthesis {
                pairs: pairs
                    .iter()
                    .map(|(open, close)| (open.to_string(), close.to_string()))
                    .collect(),
                keep_delimiters,
            },
        })
    }

    /// Delete every non-overlapping match of the patterns from each
    /// unprotected span; the remaining fragments become separate unprotected
    /// spans.
    pub fn remove(patterns: &[&str]) -> Result<Action, RuleError> {
        Ok(Action {
            kind: ActionKind::Remove {
                patterns: compile_all(patterns)?,
            },
        })
    }

    /// Like [`Action::remove`], but deletes at most `occurrences` matches per
    /// span.
    pub fn remove_partial(pattern: &str, occurrences: usize) -> Result<Action, RuleError> {
        Ok(Action {
            kind: ActionKind::RemovePartial {
                pattern: compile(pattern)?,
                occurrences,
            },
        })
    }

    pub(crate) fn name(&self) -> &'static str {
        match &self.kind {
            ActionKind::Split { .. } => "split",
            ActionKind::ConditionalSplit { .. } => "conditional_split",
            ActionKind::Fix { .. } => "fix",
            ActionKind::FixIp { .. } => "fix_ip",
            ActionKind::FixPartial { .. } => "fix_partial",
            ActionKind::FixParenthesis { .. } => "fix_parenthesis",
            ActionKind::Remove { .. } => "remove",
            ActionKind::RemovePartial { .. } => "remove_partial",
        }
    }

    /// Apply this action to a span sequence. Protected and empty spans pass
    /// through untouched; order is always preserved.
    pub fn apply(&self, spans: Vec<Span>) -> Vec<Span> {
        let mut out = Vec::with_capacity(spans.len());
        for span in spans {
            if span.protected || span.text.is_empty() {
                out.push(span);
                continue;
            }
            match &self.kind {
                ActionKind::Split {
                    delimiters,
                    keep_delimiter,
                } => split_span(&mut out, &span.text, delimiters, *keep_delimiter),
                ActionKind::ConditionalSplit { delimiters, unless } => {
                    conditional_split_span(&mut out, &span.text, delimiters, unless)
                }
                ActionKind::Fix { patterns } => {
                    out.extend(rewrite_pieces(span, patterns, protect_matches))
                }
                ActionKind::FixIp { address, network } => {
                    if is_ip_literal(&span.text, *address, *network) {
                        out.push(Span::fixed(span.text));
                    } else {
                        out.push(span);
                    }
                }
                ActionKind::FixPartial {
                    pattern,
                    groups,
                    discard_rest,
                } => fix_partial_span(&mut out, span, pattern, groups, *discard_rest),
                ActionKind::FixParenthesis {
                    pairs,
                    keep_delimiters,
                } => {
                    let mut pieces = vec![span];
                    for (open, close) in pairs {
                        let mut next = Vec::with_capacity(pieces.len());
                        for piece in pieces {
                            if piece.protected || piece.text.is_empty() {
                                next.push(piece);
                            } else {
                                protect_pair(&mut next, &piece.text, open, close, *keep_delimiters);
                            }
                        }
                        pieces = next;
                    }
                    out.extend(pieces);
                }
                ActionKind::Remove { patterns } => {
                    out.extend(rewrite_pieces(span, patterns, drop_matches))
                }
                ActionKind::RemovePartial {
                    pattern,
                    occurrences,
                } => {
                    let mut cursor = 0;
                    for m in pattern.find_iter(&span.text).take(*occurrences) {
                        if m.start() > cursor {
                            out.push(Span::word(&span.text[cursor..m.start()]));
                        }
                        cursor = m.end();
                    }
                    if cursor < span.text.len() {
                        out.push(Span::word(&span.text[cursor..]));
                    }
                }
            }
        }
        out
    }
}

// ---------------------------------------------------------------------------
// Per-action span rewriting
// ---------------------------------------------------------------------------

fn split_span(out: &mut Vec<Span>, text: &str, delimiters: &Regex, keep: bool) {
    let mut cursor = 0;
    for m in delimiters.find_iter(text) {
        if m.start() > cursor {
            out.push(Span::word(&text[cursor..m.start()]));
        }
        if keep && !m.as_str().is_empty() {
            out.push(Span::word(m.as_str()));
        }
        cursor = m.end();
    }
    if cursor < text.len() {
        out.push(Span::word(&text[cursor..]));
    }
}

fn conditional_split_span(out: &mut Vec<Span>, text: &str, delimiters: &Regex, unless: &Regex) {
    let matches: Vec<(usize, usize)> = delimiters
        .find_iter(text)
        .map(|m| (m.start(), m.end()))
        .collect();
    let mut accepted = Vec::with_capacity(matches.len());
    for (index, &(start, end)) in matches.iter().enumerate() {
        let left_edge = if index == 0 { 0 } else { matches[index - 1].1 };
        let right_edge = if index + 1 < matches.len() {
            matches[index + 1].0
        } else {
            text.len()
        };
        let left = &text[left_edge..start];
        let right = &text[end..right_edge];
        if !unless.is_match(left) && !unless.is_match(right) {
            accepted.push((start, end));
        }
    }
    let mut cursor = 0;
    for (start, end) in accepted {
        if start > cursor {
            out.push(Span::word(&text[cursor..start]));
        }
        cursor = end;
    }
    if cursor < text.len() {
        out.push(Span::word(&text[cursor..]));
    }
}

/// Run each pattern over the still-unprotected pieces of one span.
fn rewrite_pieces(
    span: Span,
    patterns: &[Regex],
    rewrite: fn(&mut Vec<Span>, &str, &Regex),
) -> Vec<Span> {
    let mut pieces = vec![span];
    for pattern in patterns {
        let mut next = Vec::with_capacity(pieces.len());
        for piece in pieces {
            if piece.protected || piece.text.is_empty() {
                next.push(piece);
            } else {
                rewrite(&mut next, &piece.text, pattern);
            }
        }
        pieces = next;
    }
    pieces
}

fn protect_matches(out: &mut Vec<Span>, text: &str, pattern: &Regex) {
    let mut cursor = 0;
    for m in pattern.find_iter(text) {
        if m.start() > cursor {
            out.push(Span::word(&text[cursor..m.start()]));
        }
        if !m.as_str().is_empty() {
            out.push(Span::fixed(m.as_str()));
        }
        cursor = m.end();
    }
    if cursor < text.len() {
        out.push(Span::word(&text[cursor..]));
    }
}

fn drop_matches(out: &mut Vec<Span>, text: &str, pattern: &Regex) {
    let mut cursor = 0;
    for m in pattern.find_iter(text) {
        if m.start() > cursor {
            out.push(Span::word(&text[cursor..m.start()]));
        }
        cursor = m.end();
    }
    if cursor < text.len() {
        out.push(Span::word(&text[cursor..]));
    }
}

fn fix_partial_span(
    out: &mut Vec<Span>,
    span: Span,
    pattern: &Regex,
    groups: &[String],
    discard_rest: bool,
) {
    let mut ranges: Vec<(usize, usize)> = Vec::new();
    if let Some(caps) = pattern.captures(&span.text) {
        if groups.is_empty() {
            ranges.extend(caps.get(0).map(|m| (m.start(), m.end())));
        } else {
            ranges.extend(
                groups
                    .iter()
                    .filter_map(|g| caps.name(g))
                    .map(|m| (m.start(), m.end())),
            );
        }
    }
    if ranges.is_empty() {
        // no match, or none of the configured groups participated
        out.push(span);
        return;
    }
    ranges.sort_unstable();
    let mut cursor = 0;
    for (start, end) in ranges {
        if start > cursor && !discard_rest {
            out.push(Span::word(&span.text[cursor..start]));
        }
        if start < end {
            out.push(Span::fixed(&span.text[start..end]));
        }
        cursor = end;
    }
    if cursor < span.text.len() && !discard_rest {
        out.push(Span::word(&span.text[cursor..]));
    }
}

/// First balanced occurrence of the pair in `text`, depth-counted so nested
/// pairs close at the matching delimiter. Byte offsets of the full region
/// including both delimiters.
fn scan_pair(text: &str, open: &str, close: &str) -> Option<(usize, usize)> {
    let start = text.find(open)?;
    let mut depth = 1usize;
    let mut i = start + open.len();
    while i < text.len() {
        if text[i..].starts_with(close) {
            depth -= 1;
            if depth == 0 {
                return Some((start, i + close.len()));
            }
            i += close.len();
        } else if open != close && text[i..].starts_with(open) {
            depth += 1;
            i += open.len();
        } else {
            i += text[i..].chars().next().map_or(1, |c| c.len_utf8());
        }
    }
    None
}

fn protect_pair(out: &mut Vec<Span>, text: &str, open: &str, close: &str, keep: bool) {
    let mut cursor = 0;
    while let Some((start, end)) = scan_pair(&text[cursor..], open, close) {
        let (start, end) = (cursor + start, cursor + end);
        if keep {
            if start > cursor {
                out.push(Span::word(&text[cursor..start]));
            }
            out.push(Span::fixed(&text[start..end]));
        } else {
            let inner_start = start + open.len();
            let inner_end = end - close.len();
            // the delimiters stay behind as unprotected text for later
            // actions to strip
            out.push(Span::word(&text[cursor..inner_start]));
            if inner_start < inner_end {
                out.push(Span::fixed(&text[inner_start..inner_end]));
            }
            out.push(Span::word(&text[inner_end..end]));
        }
        cursor = end;
    }
    if cursor < text.len() {
        out.push(Span::word(&text[cursor..]));
    }
}

// ---------------------------------------------------------------------------
// IP literal detection
// ---------------------------------------------------------------------------

/// Validation by parsing, not by shape: the span must round-trip through the
/// standard library's address types.
fn is_ip_literal(text: &str, address: bool, network: bool) -> bool {
    // cheap pre-filter: every address form contains a dot or a colon
    if !text.contains('.') && !text.contains(':') {
        return false;
    }
    (address && parses_as_address(text)) || (network && parses_as_network(text))
}

fn parses_as_address(text: &str) -> bool {
    if let Some((addr, zone)) = text.split_once('%') {
        // scoped IPv6 literal, e.g. fe80::1%eth0
        !zone.is_empty() && addr.parse::<Ipv6Addr>().is_ok()
    } else {
        text.parse::<IpAddr>().is_ok()
    }
}

fn parses_as_network(text: &str) -> bool {
    let Some((addr, prefix)) = text.split_once('/') else {
        return false;
    };
    let Ok(prefix) = prefix.parse::<u8>() else {
        return false;
    };
    match addr.parse::<IpAddr>() {
        Ok(IpAddr::V4(_)) => prefix <= 32,
        Ok(IpAddr::V6(_)) => prefix <= 128,
        Err(_) => false,
    }
}

// ---------------------------------------------------------------------------
// Tokenizer
// ---------------------------------------------------------------------------

/// The body engine: folds a fixed action chain over the span sequence and
/// flattens the result into words. Immutable once built.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    actions: Vec<Action>,
}

impl Tokenizer {
    pub fn new(actions: Vec<Action>) -> Self {
        Tokenizer { actions }
    }

    /// Segment a body string into words, in original order. Empty spans are
    /// dropped; anything else the actions left behind becomes a word.
    pub fn tokenize(&self, body: &str) -> Vec<String> {
        let mut spans = vec![Span::word(body)];
        for (step, action) in self.actions.iter().enumerate() {
            spans = action.apply(spans);
            trace!(step, action = action.name(), spans = spans.len(), "applied action");
        }
        spans
            .into_iter()
            .filter(|span| !span.text.is_empty())
            .map(|span| span.text)
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
