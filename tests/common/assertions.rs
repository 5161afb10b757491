//! Domain-specific assertion macros for logseam harnesses.
//!
//! These add context-rich failure messages that make it clear *which*
//! tokenization guarantee was violated and on *which* input line.

/// Assert that a `Record`'s word list equals the expected sequence.
///
/// ```rust
/// assert_words!(record, ["system", "12345", "disconnected"]);
/// ```
#[macro_export]
macro_rules! assert_words {
    ($record:expr, [$($word:expr),* $(,)?]) => {{
        let record: &logseam::Record = &$record;
        let expected: Vec<&str> = vec![$($word),*];
        let actual: Vec<&str> = record.words.iter().map(|w| w.as_str()).collect();
        if actual != expected {
            panic!(
                "assert_words! failed:\n  raw:      {:?}\n  expected: {:?}\n  actual:   {:?}",
                record.raw, expected, actual
            );
        }
    }};
}

/// Assert that a `Record` carries a named field with the expected value.
///
/// ```rust
/// assert_field!(record, "pid", 1234i64);
/// assert_field!(record, "severity", "error");
/// ```
#[macro_export]
macro_rules! assert_field {
    ($record:expr, $key:expr, $value:expr) => {{
        let record: &logseam::Record = &$record;
        let key: &str = $key;
        let expected = logseam::FieldValue::from($value);
        match record.fields.get(key) {
            Some(actual) if *actual == expected => {}
            Some(actual) => panic!(
                "assert_field! failed:\n  record.fields[{:?}]\n  expected: {}\n  actual:   {}\n  raw: {:?}",
                key, expected, actual, record.raw
            ),
            None => panic!(
                "assert_field! failed: field {:?} not found.\n  available: {:?}\n  raw: {:?}",
                key,
                record.fields.keys().collect::<Vec<_>>(),
                record.raw
            ),
        }
    }};
}

/// Assert that exactly one word of the record equals the given token — the
/// protected-span atomicity guarantee for fixed entities.
#[macro_export]
macro_rules! assert_atomic_word {
    ($record:expr, $token:expr) => {{
        let record: &logseam::Record = &$record;
        let token: &str = $token;
        let count = record.words.iter().filter(|w| w.as_str() == token).count();
        if count != 1 {
            panic!(
                "assert_atomic_word! failed: {:?} appears {} times in words.\n  words: {:?}\n  raw: {:?}",
                token, count, record.words, record.raw
            );
        }
        if record.words.iter().any(|w| w.as_str() != token && w.contains(token)) {
            panic!(
                "assert_atomic_word! failed: {:?} appears inside a larger word.\n  words: {:?}",
                token, record.words
            );
        }
    }};
}
