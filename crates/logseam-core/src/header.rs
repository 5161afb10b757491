//! Header grammar matching — recognizes the fixed-shape prefix of a log line.
//!
//! A [`HeaderRule`] is an ordered list of [`Item`]s (timestamp pieces, a
//! hostname, arbitrary named captures) joined by a separator character class.
//! Each rule compiles once into a single anchored regex; the
//! [`HeaderParser`] tries its rules in order and the first match wins.
//!
//! Items with the reserved names `year`, `month`, `day`, `hour`, `minute`,
//! `second`, and `microsecond` feed the timestamp instead of the field map, so
//! a rule can assemble a timestamp out of loose digit captures the same way it
//! can out of a whole ISO item.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Datelike, FixedOffset, Local, NaiveDate, NaiveTime, TimeZone};
use regex::{Captures, Regex};
use tracing::trace;

use crate::error::{ParseError, RuleError};
use crate::types::{FieldValue, Header};

const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// `YYYY-MM-DD`, decomposed into named component groups.
const DATE_PATTERN: &str = r"(?P<year>\d{4})-(?P<month>\d{2})-(?P<day>\d{2})";

/// `HH:MM:SS` with optional fractional seconds and timezone.
const CLOCK_PATTERN: &str = r"(?P<hour>\d{2}):(?P<minute>\d{2}):(?P<second>\d{2})(?:\.(?P<frac>\d+))?(?P<tz>Z|[+-]\d{2}:?\d{2})?";

const TZ_PATTERN: &str = r"Z|[+-]\d{2}:?\d{2}";

// ---------------------------------------------------------------------------
// Items
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
enum ItemKind {
    UnixTime,
    IsoTimestamp,
    Date,
    DateConcat { no_century: bool },
    Time,
    TimeConcat,
    YearNoCentury,
    MonthAbbreviation,
    TimeZone,
    Digit,
    Text { symbols: String },
    Hostname,
    UserPattern { pattern: String },
    Group { items: Vec<Item>, separator: Option<String> },
}

/// One grammar terminal (or group of terminals) within a [`HeaderRule`].
///
/// Items are built with the constructor methods below and optionally marked
/// [`optional`](Item::optional) (the line may omit them) or
/// [`dummy`](Item::dummy) (the text must be present but binds no value).
#[derive(Debug, Clone)]
pub struct Item {
    kind: ItemKind,
    name: Option<String>,
    optional: bool,
    dummy: bool,
}

impl Item {
    fn unnamed(kind: ItemKind) -> Self {
        Item {
            kind,
            name: None,
            optional: false,
            dummy: false,
        }
    }

    fn named(kind: ItemKind, name: &str) -> Self {
        Item {
            kind,
            name: Some(name.to_string()),
            optional: false,
            dummy: false,
        }
    }

    /// Unix epoch seconds, e.g. `1551024123`.
    pub fn unix_time() -> Self {
        Self::unnamed(ItemKind::UnixTime)
    }

    /// A full ISO-8601 timestamp, e.g. `2024-01-15T10:00:00.123+09:00`.
    pub fn iso_timestamp() -> Self {
        Self::unnamed(ItemKind::IsoTimestamp)
    }

    /// An ISO calendar date, e.g. `2024-01-15`.
    pub fn date() -> Self {
        Self::unnamed(ItemKind::Date)
    }

    /// A date written as one digit run: `20240115`, or `240115` with
    /// `no_century` (the century then comes from the reference year).
    pub fn date_concat(no_century: bool) -> Self {
        Self::unnamed(ItemKind::DateConcat { no_century })
    }

    /// Time of day, e.g. `12:34:56`, `12:34:56.789`, `12:34:56+09:00`.
    pub fn time() -> Self {
        Self::unnamed(ItemKind::Time)
    }

    /// Time of day as one digit run, e.g. `123456` for 12:34:56.
    pub fn time_concat() -> Self {
        Self::unnamed(ItemKind::TimeConcat)
    }

    /// A two-digit year; the century comes from the reference year.
    pub fn year_no_century() -> Self {
        Self::unnamed(ItemKind::YearNoCentury)
    }

    /// An abbreviated English month name: `Jan`, `Feb`, …
    pub fn month_abbreviation() -> Self {
        Self::unnamed(ItemKind::MonthAbbreviation)
    }

    /// A timezone marker on its own: `Z`, `+0900`, `-05:00`.
    pub fn time_zone() -> Self {
        Self::unnamed(ItemKind::TimeZone)
    }

    /// A named digit run, captured as an integer. The reserved names `year`,
    /// `month`, `day`, `hour`, `minute`, `second`, and `microsecond` feed the
    /// timestamp instead of the field map.
    pub fn digit(name: &str) -> Self {
        Self::named(ItemKind::Digit, name)
    }

    /// A named alphanumeric token.
    pub fn text(name: &str) -> Self {
        Self::named(
            ItemKind::Text {
                symbols: String::new(),
            },
            name,
        )
    }

    /// A named alphanumeric token that may also contain the given symbol
    /// characters.
    pub fn text_with_symbols(name: &str, symbols: &str) -> Self {
        Self::named(
            ItemKind::Text {
                symbols: symbols.to_string(),
            },
            name,
        )
    }

    /// A named hostname or address token (letters, digits, `.`, `:`, `_`,
    /// `-`; must start and end alphanumeric, except single-character names).
    pub fn hostname(name: &str) -> Self {
        Self::named(ItemKind::Hostname, name)
    }

    /// A named capture with a user-supplied regex. The pattern must not be
    /// anchored and must not wrap itself in optional groups; use
    /// [`Item::optional`] instead.
    pub fn pattern(name: &str, pattern: &str) -> Self {
        Self::named(
            ItemKind::UserPattern {
                pattern: pattern.to_string(),
            },
            name,
        )
    }

    /// A fixed sequence of items treated as one unit, with whitespace
    /// between members.
    pub fn group(items: Vec<Item>) -> Self {
        Self::unnamed(ItemKind::Group {
            items,
            separator: None,
        })
    }

    /// Like [`Item::group`], with a custom separator character set between
    /// the group's members.
    pub fn group_with_separator(items: Vec<Item>, separator: &str) -> Self {
        Self::unnamed(ItemKind::Group {
            items,
            separator: Some(separator.to_string()),
        })
    }

    /// Mark this item as optional: the rule still matches lines that omit it.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Mark this item as a dummy: the text must be present for the rule to
    /// match, but no value is bound. Use for repeated or noise fields.
    pub fn dummy(mut self) -> Self {
        self.dummy = true;
        self
    }

    /// The capture group name this item binds, if it binds one.
    fn match_name(&self) -> Option<&str> {
        if self.dummy {
            return None;
        }
        match &self.kind {
            ItemKind::Group { .. } => None,
            ItemKind::UnixTime => Some("unix_time"),
            ItemKind::IsoTimestamp => Some("iso_ts"),
            ItemKind::Date => Some("date"),
            ItemKind::DateConcat { .. } => Some("date_concat"),
            ItemKind::Time => Some("clock"),
            ItemKind::TimeConcat => Some("clock_concat"),
            ItemKind::YearNoCentury => Some("year_nc"),
            ItemKind::MonthAbbreviation => Some("month_name"),
            ItemKind::TimeZone => Some("zone"),
            ItemKind::Digit
            | ItemKind::Text { .. }
            | ItemKind::Hostname
            | ItemKind::UserPattern { .. } => self.name.as_deref(),
        }
    }

    /// Component capture names this item's pattern always contains,
    /// independent of its own match name.
    fn fixed_inner_names(&self) -> &'static [&'static str] {
        match &self.kind {
            ItemKind::IsoTimestamp => {
                &["year", "month", "day", "hour", "minute", "second", "frac", "tz"]
            }
            ItemKind::Date => &["year", "month", "day"],
            ItemKind::Time => &["hour", "minute", "second", "frac", "tz"],
            _ => &[],
        }
    }

    /// The item's pattern without the outer capture wrapper.
    fn bare_pattern(&self) -> Result<String, RuleError> {
        Ok(match &self.kind {
            ItemKind::UnixTime => r"[0-9]+".to_string(),
            ItemKind::IsoTimestamp => format!("{DATE_PATTERN}T{CLOCK_PATTERN}"),
            ItemKind::Date => DATE_PATTERN.to_string(),
            ItemKind::DateConcat { no_century: true } => r"[0-9]{6}".to_string(),
            ItemKind::DateConcat { no_century: false } => r"[0-9]{8}".to_string(),
            ItemKind::Time => CLOCK_PATTERN.to_string(),
            ItemKind::TimeConcat => r"[0-9]{6}".to_string(),
            ItemKind::YearNoCentury => r"[0-9]{2}".to_string(),
            ItemKind::MonthAbbreviation => MONTH_ABBREVIATIONS.join("|"),
            ItemKind::TimeZone => TZ_PATTERN.to_string(),
            ItemKind::Digit => r"\d+".to_string(),
            ItemKind::Text { symbols } => {
                format!("[a-zA-Z0-9{}]+", escape_for_class(symbols))
            }
            ItemKind::Hostname => {
                r"(?:[a-zA-Z0-9:][a-zA-Z0-9:._-]*[a-zA-Z0-9]|[a-zA-Z0-9])".to_string()
            }
            ItemKind::UserPattern { pattern } => pattern.clone(),
            ItemKind::Group { items, separator } => {
                items_fragment(items, &separator_pattern(separator.as_deref())?)?
            }
        })
    }

    /// The item's full regex fragment, with a named capture wrapper when the
    /// item binds a value.
    fn fragment(&self) -> Result<String, RuleError> {
        let bare = self.bare_pattern()?;
        Ok(match self.match_name() {
            Some(name) => format!("(?P<{name}>{bare})"),
            None => format!("(?:{bare})"),
        })
    }

    /// Read this item's captured value into the timestamp parts or the field
    /// map. Returns `None` when the captured text does not form a usable
    /// value (the whole rule is then treated as a mismatch).
    fn pick(
        &self,
        caps: &Captures<'_>,
        parts: &mut TimestampParts,
        fields: &mut HashMap<String, FieldValue>,
    ) -> Option<()> {
        let Some(name) = self.match_name() else {
            return Some(());
        };
        let Some(matched) = caps.name(name) else {
            // optional item not present in this line
            return Some(());
        };
        let text = matched.as_str();
        match &self.kind {
            ItemKind::UnixTime => parts.unix = Some(text.parse().ok()?),
            ItemKind::IsoTimestamp => {
                pick_date_components(caps, parts)?;
                pick_clock_components(caps, parts)?;
            }
            ItemKind::Date => pick_date_components(caps, parts)?,
            ItemKind::DateConcat { no_century } => {
                if *no_century {
                    parts.year_nc = Some(text[0..2].parse().ok()?);
                    parts.month = Some(text[2..4].parse().ok()?);
                    parts.day = Some(text[4..6].parse().ok()?);
                } else {
                    parts.year = Some(text[0..4].parse().ok()?);
                    parts.month = Some(text[4..6].parse().ok()?);
                    parts.day = Some(text[6..8].parse().ok()?);
                }
            }
            ItemKind::Time => pick_clock_components(caps, parts)?,
            ItemKind::TimeConcat => {
                parts.hour = Some(text[0..2].parse().ok()?);
                parts.minute = Some(text[2..4].parse().ok()?);
                parts.second = Some(text[4..6].parse().ok()?);
            }
            ItemKind::YearNoCentury => parts.year_nc = Some(text.parse().ok()?),
            ItemKind::MonthAbbreviation => {
                let index = MONTH_ABBREVIATIONS.iter().position(|m| *m == text)?;
                parts.month = Some(index as u32 + 1);
            }
            ItemKind::TimeZone => parts.tz = Some(parse_tz(text)?),
            ItemKind::Digit => {
                let value: i64 = text.parse().ok()?;
                match name {
                    "year" => parts.year = Some(value as i32),
                    "month" => parts.month = Some(value as u32),
                    "day" => parts.day = Some(value as u32),
                    "hour" => parts.hour = Some(value as u32),
                    "minute" => parts.minute = Some(value as u32),
                    "second" => parts.second = Some(value as u32),
                    "microsecond" => parts.micro = Some(value as u32),
                    _ => {
                        fields.insert(name.to_string(), FieldValue::Int(value));
                    }
                }
            }
            ItemKind::Text { .. } | ItemKind::Hostname | ItemKind::UserPattern { .. } => {
                fields.insert(name.to_string(), FieldValue::Text(text.to_string()));
            }
            ItemKind::Group { .. } => {}
        }
        Some(())
    }
}

fn pick_date_components(caps: &Captures<'_>, parts: &mut TimestampParts) -> Option<()> {
    parts.year = Some(group_parse(caps, "year")?);
    parts.month = Some(group_parse(caps, "month")?);
    parts.day = Some(group_parse(caps, "day")?);
    Some(())
}

fn pick_clock_components(caps: &Captures<'_>, parts: &mut TimestampParts) -> Option<()> {
    parts.hour = Some(group_parse(caps, "hour")?);
    parts.minute = Some(group_parse(caps, "minute")?);
    parts.second = Some(group_parse(caps, "second")?);
    if let Some(frac) = caps.name("frac") {
        parts.micro = Some(frac_to_micros(frac.as_str()));
    }
    if let Some(tz) = caps.name("tz") {
        parts.tz = Some(parse_tz(tz.as_str())?);
    }
    Some(())
}

fn group_parse<T: std::str::FromStr>(caps: &Captures<'_>, name: &str) -> Option<T> {
    caps.name(name)?.as_str().parse().ok()
}

/// Fractional-second digits to microseconds: `"789"` → 789_000.
fn frac_to_micros(frac: &str) -> u32 {
    let digits = if frac.len() > 6 { &frac[..6] } else { frac };
    let value: u32 = digits.parse().unwrap_or(0);
    value * 10u32.pow(6 - digits.len() as u32)
}

/// `Z`, `+0900`, `+09:00`, `-05:00` → fixed offset.
fn parse_tz(text: &str) -> Option<FixedOffset> {
    if text == "Z" {
        return FixedOffset::east_opt(0);
    }
    let sign = match text.as_bytes().first()? {
        b'+' => 1,
        b'-' => -1,
        _ => return None,
    };
    let digits: String = text[1..].chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() < 4 {
        return None;
    }
    let hours: i32 = digits[0..2].parse().ok()?;
    let minutes: i32 = digits[2..4].parse().ok()?;
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

/// One complete header-shape alternative: an ordered item list plus the
/// separator character class between items (whitespace when unset).
#[derive(Debug, Clone)]
pub struct HeaderRule {
    items: Vec<Item>,
    separator: Option<String>,
}

impl HeaderRule {
    pub fn new(items: Vec<Item>) -> Self {
        HeaderRule {
            items,
            separator: None,
        }
    }

    pub fn with_separator(items: Vec<Item>, separator: &str) -> Self {
        HeaderRule {
            items,
            separator: Some(separator.to_string()),
        }
    }

    pub(crate) fn compile(&self) -> Result<CompiledRule, RuleError> {
        let mut names = vec!["body".to_string()];
        collect_capture_names(&self.items, &mut names)?;
        let mut seen = HashSet::new();
        for name in &names {
            if !seen.insert(name.as_str()) {
                return Err(RuleError::DuplicateCapture(name.clone()));
            }
        }

        let sep = separator_pattern(self.separator.as_deref())?;
        let joined = items_fragment(&self.items, &sep)?;
        let pattern = format!("^(?:{sep})?{joined}(?:{sep}(?P<body>.*))?$");
        let regex = Regex::new(&pattern).map_err(|e| RuleError::bad_pattern(&pattern, e))?;

        let picks = flatten_picks(&self.items);
        check_date_completeness(&picks)?;
        Ok(CompiledRule { regex, picks })
    }
}

/// Separator runs: whitespace by default, or a custom character class.
fn separator_pattern(separator: Option<&str>) -> Result<String, RuleError> {
    match separator {
        None => Ok(r"\s+".to_string()),
        Some("") => Err(RuleError::EmptyDelimiters),
        Some(chars) => Ok(format!("[{}]+", escape_for_class(chars))),
    }
}

fn escape_for_class(chars: &str) -> String {
    let mut out = String::new();
    for c in chars.chars() {
        out.push_str(&regex::escape(&c.to_string()));
    }
    out
}

/// Join item fragments with separators. Items left of the first mandatory
/// item carry their separator on the right; items right of it carry the
/// separator on the left; optional items absorb their separator into the
/// optional group.
fn items_fragment(items: &[Item], sep: &str) -> Result<String, RuleError> {
    let first_mandatory = items
        .iter()
        .position(|item| !item.optional)
        .ok_or(RuleError::NoMandatoryItem)?;
    let mut out = String::new();
    for (index, item) in items.iter().enumerate() {
        let fragment = item.fragment()?;
        let placed = match index.cmp(&first_mandatory) {
            std::cmp::Ordering::Less => format!("{fragment}{sep}"),
            std::cmp::Ordering::Equal => fragment,
            std::cmp::Ordering::Greater => format!("{sep}{fragment}"),
        };
        if item.optional {
            out.push_str(&format!("(?:{placed})?"));
        } else {
            out.push_str(&placed);
        }
    }
    Ok(out)
}

fn collect_capture_names(items: &[Item], out: &mut Vec<String>) -> Result<(), RuleError> {
    for item in items {
        if let ItemKind::Group {
            items: members, ..
        } = &item.kind
        {
            collect_capture_names(members, out)?;
            continue;
        }
        if let ItemKind::UserPattern { pattern } = &item.kind {
            // compile standalone to validate early and find the user's own
            // named groups
            let probe = Regex::new(pattern).map_err(|e| RuleError::bad_pattern(pattern, e))?;
            out.extend(probe.capture_names().flatten().map(str::to_string));
        }
        if let Some(name) = item.match_name() {
            if item.name.is_some() {
                validate_name(name)?;
            }
            out.push(name.to_string());
        }
        out.extend(item.fixed_inner_names().iter().map(|s| s.to_string()));
    }
    Ok(())
}

fn validate_name(name: &str) -> Result<(), RuleError> {
    let mut chars = name.chars();
    let head_ok = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    let tail_ok = name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if head_ok && tail_ok {
        Ok(())
    } else {
        Err(RuleError::InvalidName(name.to_string()))
    }
}

/// Flatten groups and drop dummies: the items whose values get extracted.
fn flatten_picks(items: &[Item]) -> Vec<Item> {
    let mut out = Vec::new();
    for item in items {
        match &item.kind {
            ItemKind::Group { items: members, .. } => out.extend(flatten_picks(members)),
            _ if item.dummy => {}
            _ => out.push(item.clone()),
        }
    }
    out
}

/// A rule that captures any timestamp part must capture a complete date
/// source; the year alone may be left to the reference-year default.
fn check_date_completeness(picks: &[Item]) -> Result<(), RuleError> {
    let mut complete = false;
    let mut month = false;
    let mut day = false;
    let mut partial = false;
    for item in picks {
        match &item.kind {
            ItemKind::UnixTime
            | ItemKind::IsoTimestamp
            | ItemKind::Date
            | ItemKind::DateConcat { .. } => complete = true,
            ItemKind::MonthAbbreviation => month = true,
            ItemKind::Time
            | ItemKind::TimeConcat
            | ItemKind::YearNoCentury
            | ItemKind::TimeZone => partial = true,
            ItemKind::Digit => match item.name.as_deref() {
                Some("month") => month = true,
                Some("day") => day = true,
                Some("year") | Some("hour") | Some("minute") | Some("second")
                | Some("microsecond") => partial = true,
                _ => {}
            },
            _ => {}
        }
    }
    if complete || (month && day) || (!partial && !month && !day) {
        Ok(())
    } else {
        Err(RuleError::IncompleteDate)
    }
}

#[derive(Debug)]
pub(crate) struct CompiledRule {
    regex: Regex,
    picks: Vec<Item>,
}

impl CompiledRule {
    /// Anchored match against the line. `None` both on a regex mismatch and
    /// on captured text that does not form usable values.
    fn evaluate(
        &self,
        line: &str,
    ) -> Option<(TimestampParts, HashMap<String, FieldValue>, String)> {
        let caps = self.regex.captures(line)?;
        let mut parts = TimestampParts::default();
        let mut fields = HashMap::new();
        for item in &self.picks {
            item.pick(&caps, &mut parts, &mut fields)?;
        }
        let body = caps
            .name("body")
            .map(|m| m.as_str().to_string())
            .unwrap_or_default();
        Some((parts, fields, body))
    }
}

// ---------------------------------------------------------------------------
// Timestamp assembly
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct TimestampParts {
    unix: Option<i64>,
    year: Option<i32>,
    year_nc: Option<i32>,
    month: Option<u32>,
    day: Option<u32>,
    hour: Option<u32>,
    minute: Option<u32>,
    second: Option<u32>,
    micro: Option<u32>,
    tz: Option<FixedOffset>,
}

impl TimestampParts {
    /// Whether the rule captured anything that should become a timestamp.
    fn has_evidence(&self) -> bool {
        self.unix.is_some() || self.month.is_some() || self.day.is_some()
    }
}

/// Missing year ⇒ reference year; missing time-of-day units ⇒ zero.
fn assemble_timestamp(
    parts: &TimestampParts,
    reference_year: i32,
    assume_offset: FixedOffset,
) -> Option<DateTime<FixedOffset>> {
    let offset = parts.tz.unwrap_or(assume_offset);
    if let Some(unix) = parts.unix {
        return DateTime::from_timestamp(unix, 0).map(|dt| dt.with_timezone(&offset));
    }
    let (Some(month), Some(day)) = (parts.month, parts.day) else {
        return None;
    };
    let year = parts
        .year
        .or_else(|| parts.year_nc.map(|y| (reference_year / 100) * 100 + y))
        .unwrap_or(reference_year);
    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    let time = NaiveTime::from_hms_micro_opt(
        parts.hour.unwrap_or(0),
        parts.minute.unwrap_or(0),
        parts.second.unwrap_or(0),
        parts.micro.unwrap_or(0),
    )?;
    offset.from_local_datetime(&date.and_time(time)).single()
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

/// Ordered-alternative header matcher. Immutable once built; every call is a
/// pure function of the line and the reference year.
#[derive(Debug)]
pub struct HeaderParser {
    rules: Vec<CompiledRule>,
    reference_year: i32,
    assume_offset: FixedOffset,
    headerless_fallback: bool,
}

/// Builder for [`HeaderParser`]. All options have defaults: reference year =
/// year at build time, assumed offset = UTC, strict (no headerless fallback).
#[derive(Debug)]
pub struct HeaderParserBuilder {
    rules: Vec<HeaderRule>,
    reference_year: Option<i32>,
    assume_offset: FixedOffset,
    headerless_fallback: bool,
}

impl Default for HeaderParserBuilder {
    fn default() -> Self {
        HeaderParserBuilder {
            rules: Vec::new(),
            reference_year: None,
            assume_offset: utc(),
            headerless_fallback: false,
        }
    }
}

fn utc() -> FixedOffset {
    FixedOffset::east_opt(0).expect("zero offset is a valid fixed offset")
}

impl HeaderParserBuilder {
    pub fn rule(mut self, rule: HeaderRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn rules(mut self, rules: impl IntoIterator<Item = HeaderRule>) -> Self {
        self.rules.extend(rules);
        self
    }

    /// Year to assume when a matched rule has no year capture (standard
    /// syslog behavior).
    pub fn reference_year(mut self, year: i32) -> Self {
        self.reference_year = Some(year);
        self
    }

    /// Offset to attach when a matched rule carries no timezone.
    pub fn assume_offset(mut self, offset: FixedOffset) -> Self {
        self.assume_offset = offset;
        self
    }

    /// When no rule matches, return an empty header with the whole line as
    /// body instead of an error.
    pub fn headerless_fallback(mut self, enabled: bool) -> Self {
        self.headerless_fallback = enabled;
        self
    }

    pub fn build(self) -> Result<HeaderParser, RuleError> {
        let rules = self
            .rules
            .iter()
            .map(HeaderRule::compile)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(HeaderParser {
            rules,
            reference_year: self
                .reference_year
                .unwrap_or_else(|| Local::now().year()),
            assume_offset: self.assume_offset,
            headerless_fallback: self.headerless_fallback,
        })
    }
}

impl HeaderParser {
    pub fn builder() -> HeaderParserBuilder {
        HeaderParserBuilder::default()
    }

    /// Strict parser with default options; see [`HeaderParser::builder`].
    pub fn new(rules: Vec<HeaderRule>) -> Result<Self, RuleError> {
        Self::builder().rules(rules).build()
    }

    /// Match the line against the rules in order; first match wins.
    pub fn parse(&self, line: &str) -> Result<Header, ParseError> {
        self.parse_with_year(line, self.reference_year)
    }

    /// Like [`HeaderParser::parse`] with a per-call reference year.
    pub fn parse_with_year(&self, line: &str, reference_year: i32) -> Result<Header, ParseError> {
        for (index, rule) in self.rules.iter().enumerate() {
            let Some((parts, mut fields, body)) = rule.evaluate(line) else {
                continue;
            };
            let timestamp = assemble_timestamp(&parts, reference_year, self.assume_offset);
            if timestamp.is_none() && parts.has_evidence() {
                // shape matched but the values form no real calendar date
                trace!(rule = index, "header rule matched with invalid date");
                continue;
            }
            trace!(rule = index, "header rule matched");
            let host = fields.remove("host").map(|v| v.to_string());
            return Ok(Header {
                timestamp,
                host,
                fields,
                body,
            });
        }
        if self.headerless_fallback {
            trace!("no header rule matched, passing line through as body");
            return Ok(Header::headerless(line));
        }
        Err(ParseError::header_mismatch(line))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
