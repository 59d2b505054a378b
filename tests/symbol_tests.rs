//! Black-box tests for the symbol type, exercised through the public crate API.

use cfg_rex::symbol::{string_to_symbols, symbols_to_string, Symbol};

#[test]
fn equality_is_by_value_not_identity() {
    let a = Symbol::new("A");
    let b = Symbol::new("A");
    assert_eq!(a, b);
    assert_ne!(a, Symbol::new("B"));
}

#[test]
fn string_round_trip_single_char_alphabet() {
    let symbols = string_to_symbols("term");
    assert_eq!(symbols.len(), 4);
    assert_eq!(symbols_to_string(&symbols), "term");
}

#[test]
fn empty_string_round_trips_to_no_symbols() {
    let symbols = string_to_symbols("");
    assert!(symbols.is_empty());
    assert_eq!(symbols_to_string(&symbols), "");
}

#[test]
fn from_impls_agree_with_new() {
    assert_eq!(Symbol::from('a'), Symbol::new("a"));
    assert_eq!(Symbol::from("cat"), Symbol::new("cat"));
    assert_eq!(Symbol::from(String::from("dog")), Symbol::new("dog"));
}

#[test]
fn multi_character_names_are_distinct_from_their_characters() {
    let cat = Symbol::new("cat");
    assert_ne!(cat, Symbol::new("c"));
    assert_eq!(cat.as_str(), "cat");
}
