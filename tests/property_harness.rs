//! Property-based harness for the tokenization invariants.
//!
//! # What this covers
//!
//! - **Stable word boundaries**: for any input body, tokenizing the
//!   space-joined output again reproduces the same word list (spaces are a
//!   pure separator in the default rule set).
//! - **Split conservation**: splitting with kept delimiters reproduces the
//!   input exactly on concatenation; with dropped delimiters it reproduces
//!   the input minus exactly the delimiter characters.
//! - **Protection is one-way**: a protected span emitted by any action chain
//!   reaches the word list verbatim.
//!
//! # Running
//!
//! ```sh
//! cargo test --test property_harness
//! ```

mod common;
use common::*;

use logseam::{Action, Span};
use proptest::prelude::*;

proptest! {
    /// Tokenizing is stable under one round of space-joining: words never
    /// split further and never merge.
    #[test]
    fn word_boundaries_are_stable(body in "[ -~]{0,60}") {
        let tokenizer = default_tokenizer();
        let first = tokenizer.tokenize(&body);
        let second = tokenizer.tokenize(&first.join(" "));
        prop_assert_eq!(&second, &first, "body {:?}", body);
    }

    /// With kept delimiters, a split conserves every character of the input.
    #[test]
    fn split_keeping_conserves_text(text in "[ -~]{0,60}") {
        let action = Action::split_keeping(" :,").unwrap();
        let spans = action.apply(vec![Span::word(text.clone())]);
        let rebuilt: String = spans.iter().map(|s| s.text.as_str()).collect();
        prop_assert_eq!(rebuilt, text);
    }

    /// With dropped delimiters, a split removes exactly the delimiter
    /// characters and nothing else, in order.
    #[test]
    fn split_drops_only_delimiters(text in "[ -~]{0,60}") {
        let action = Action::split(" :,").unwrap();
        let spans = action.apply(vec![Span::word(text.clone())]);
        let rebuilt: String = spans.iter().map(|s| s.text.as_str()).collect();
        let expected: String = text.chars().filter(|&c| !matches!(c, ' ' | ':' | ',')).collect();
        prop_assert_eq!(&rebuilt, &expected);
        prop_assert!(rebuilt.len() <= text.len());
    }

    /// An IPv6 literal dropped into arbitrary word soup is always exactly one
    /// word of the output.
    #[test]
    fn injected_address_stays_atomic(
        left in proptest::collection::vec("[a-z0-9]{1,8}", 0..5),
        right in proptest::collection::vec("[a-z0-9]{1,8}", 0..5),
    ) {
        let body = {
            let mut pieces = left.clone();
            pieces.push("2001:db8:dead:beef::17".to_string());
            pieces.extend(right.clone());
            pieces.join(" ")
        };
        let words = default_tokenizer().tokenize(&body);
        let hits = words.iter().filter(|w| w.as_str() == "2001:db8:dead:beef::17").count();
        prop_assert_eq!(hits, 1, "words {:?}", words);
    }

    /// Protected spans pass through arbitrary later splits untouched.
    #[test]
    fn protection_is_one_way(text in "[ -~]{1,30}") {
        let split = Action::split(" :.,;|").unwrap();
        let spans = split.apply(vec![Span::fixed(text.clone())]);
        prop_assert_eq!(spans, vec![Span::fixed(text)]);
    }
}
