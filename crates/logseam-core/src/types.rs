//! Core types for logseam-core.
//!
//! This module defines the structures shared across both parsing engines: the
//! final [`Record`], the typed [`FieldValue`] extracted by header items, and
//! the [`Header`] produced by the header phase alone.

use std::collections::HashMap;

/// A fully parsed log line: header fields plus the tokenized body.
///
/// Every field is optional except `raw`, `body`, and `words`. The header
/// parser populates as many fields as its matched rule captures; the remainder
/// are left as `None` or absent from `fields`.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Raw log line as received, without the trailing line feed.
    pub raw: String,
    /// Timestamp assembled from the matched header rule's date/time items.
    /// `None` when the rule captures no timestamp parts (or in headerless
    /// fallback).
    pub timestamp: Option<chrono::DateTime<chrono::FixedOffset>>,
    /// Host (or source identifier) captured by the matched rule's `host` item.
    pub host: Option<String>,
    /// Remaining named captures from the matched header rule, keyed by item
    /// name. Timestamp components and `host` are lifted out and do not appear
    /// here.
    pub fields: HashMap<String, FieldValue>,
    /// The free-form body part of the line, exactly as it followed the header.
    pub body: String,
    /// The body segmented into words, in original order.
    pub words: Vec<String>,
}

/// A typed value captured by a named header item.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Int(i64),
    Text(String),
}

impl FieldValue {
    /// The integer value, if this field was captured by a digit item.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            FieldValue::Int(n) => Some(*n),
            FieldValue::Text(_) => None,
        }
    }

    /// The text value, if this field was captured as a string.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Int(_) => None,
            FieldValue::Text(s) => Some(s.as_str()),
        }
    }
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::Int(n) => write!(f, "{n}"),
            FieldValue::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::Int(n)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

/// Output of the header phase: everything in a [`Record`] except the words.
///
/// Invariant: for a matched rule, `body` is the exact unmatched suffix of the
/// input line; headerless fallback returns the whole line as `body` with all
/// other fields empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    pub timestamp: Option<chrono::DateTime<chrono::FixedOffset>>,
    pub host: Option<String>,
    pub fields: HashMap<String, FieldValue>,
    pub body: String,
}

impl Header {
    /// The headerless fallback: no fields, the whole line as body.
    pub(crate) fn headerless(line: &str) -> Self {
        Header {
            timestamp: None,
            host: None,
            fields: HashMap::new(),
            body: line.to_string(),
        }
    }
}
