//! Body tokenization integration harness.
//!
//! # What this covers
//!
//! - **Protected-span atomicity**: an entity protected by `fix`/`fix_ip`/
//!   `fix_parenthesis` survives every later split and remove action as
//!   exactly one word.
//! - **Action composition**: chains mixing split, protect, and remove steps
//!   behave the same as running the actions one by one.
//! - **Conditional splitting**: per-occurrence veto on delimiter neighbors.
//! - **Degradation**: text no action recognizes still comes out as words;
//!   nothing is ever rejected by the body engine.
//!
//! # Running
//!
//! ```sh
//! cargo test --test tokenize_harness
//! ```

mod common;
use common::*;

use logseam::{Action, Tokenizer};
use pretty_assertions::assert_eq;
use rstest::rstest;

// ---------------------------------------------------------------------------
// Protected-span atomicity through the full default chain
// ---------------------------------------------------------------------------

#[rstest]
#[case::ipv6("2001:0db8:1234::1")]
#[case::ipv6_zone("fe80::1%eth0")]
#[case::ipv4("192.0.2.1")]
#[case::cidr("10.0.0.0/8")]
#[case::clock("12:34:56")]
#[case::clock_fractional("12:34:56.789")]
#[case::mac("aa:bb:cc:dd:ee:ff")]
fn protected_entity_stays_atomic(#[case] token: &str) {
    let body = format!("peer {token} flagged (check:immediate)");
    let words = default_tokenizer().tokenize(&body);
    assert_eq!(
        words.iter().filter(|w| w.as_str() == token).count(),
        1,
        "token {token:?} not atomic in {words:?}"
    );
    // the colon-bearing entity must not have been split into fragments
    for fragment in token.split(':') {
        assert!(
            !words.iter().any(|w| w == fragment && fragment != token),
            "fragment {fragment:?} of {token:?} leaked into {words:?}"
        );
    }
}

#[test]
fn unprotected_colon_tokens_still_split() {
    let words = default_tokenizer().tokenize("level:warn code:500");
    assert_eq!(words, vec!["level", "warn", "code", "500"]);
}

// ---------------------------------------------------------------------------
// Action composition
// ---------------------------------------------------------------------------

#[test]
fn quoted_comment_stays_one_word() {
    let tokenizer = Tokenizer::new(vec![
        Action::fix_parenthesis(&[("\"", "\"")]).unwrap(),
        Action::split(" .:\"").unwrap(),
    ]);
    let words = tokenizer.tokenize(r#"comment added: "This is a comment description"."#);
    assert_eq!(
        words,
        vec!["comment", "added", "This is a comment description"]
    );
}

#[test]
fn trailing_colon_stripped_before_time_fix() {
    let tokenizer = Tokenizer::new(vec![
        Action::split(" ").unwrap(),
        Action::remove_partial(":+$", 1).unwrap(),
        Action::fix(&[r"^\d{2}:\d{2}:\d{2}(\.\d+)?$"]).unwrap(),
        Action::split(":").unwrap(),
    ]);
    let words = tokenizer.tokenize("2000 Mar 4 12:34:56.789: message: duplicated header");
    assert_eq!(
        words,
        vec!["2000", "Mar", "4", "12:34:56.789", "message", "duplicated", "header"]
    );
}

#[test]
fn ip_with_port_split_by_partial_fix() {
    let tokenizer = Tokenizer::new(vec![
        Action::split(" ").unwrap(),
        Action::fix_partial(
            r"^(?P<ipaddr>(\d{1,3}\.){3}\d{1,3})\.(?P<port>\d{1,5})$",
            &["ipaddr", "port"],
        )
        .unwrap(),
        Action::split(".").unwrap(),
    ]);
    let words = tokenizer.tokenize("source 192.0.2.1.80 initialized.");
    assert_eq!(words, vec!["source", "192.0.2.1", "80", "initialized"]);
}

#[test]
fn chain_equals_stepwise_application() {
    let actions = vec![
        Action::split(" ()").unwrap(),
        Action::fix_ip(),
        Action::split(":").unwrap(),
    ];
    let body = "drop from 2001:db8::7 (policy:default) port 8080";

    let chained = Tokenizer::new(actions.clone()).tokenize(body);

    let mut spans = vec![logseam::Span::word(body)];
    for action in &actions {
        spans = action.apply(spans);
    }
    let stepwise: Vec<String> = spans
        .into_iter()
        .filter(|s| !s.text.is_empty())
        .map(|s| s.text)
        .collect();

    assert_eq!(chained, stepwise);
    assert_eq!(
        chained,
        vec!["drop", "from", "2001:db8::7", "policy", "default", "port", "8080"]
    );
}

// ---------------------------------------------------------------------------
// Conditional splitting
// ---------------------------------------------------------------------------

#[test]
fn conditional_split_protects_clock_like_pairs() {
    let tokenizer = Tokenizer::new(vec![
        Action::split(" ").unwrap(),
        Action::conditional_split(":", r"^\d{2}$").unwrap(),
    ]);
    let words = tokenizer.tokenize("pid:423 up 12:34:56");
    assert_eq!(words, vec!["pid", "423", "up", "12:34:56"]);
}

// ---------------------------------------------------------------------------
// Degradation
// ---------------------------------------------------------------------------

#[test]
fn unrecognized_text_becomes_words_not_errors() {
    let words = default_tokenizer().tokenize("§ÿ unparsed ☃ blob::chunk");
    assert!(words.contains(&"unparsed".to_string()));
    assert!(words.contains(&"☃".to_string()));
    assert!(words.contains(&"blob".to_string()));
    assert!(words.contains(&"chunk".to_string()));
}

#[test]
fn whitespace_only_body_yields_no_words() {
    assert!(default_tokenizer().tokenize("   ").is_empty());
    assert!(default_tokenizer().tokenize("").is_empty());
}
