//! Black-box tests for grammar parsing and analysis, through the public API.

use cfg_rex::{Grammar, Symbol};

fn sym(name: &str) -> Symbol {
    Symbol::new(name)
}

#[test]
fn parse_lines_counts_productions_per_non_terminal() {
    let lines = vec![
        "2".to_string(),
        "S -> AB".to_string(),
        "A -> a".to_string(),
    ];
    let grammar = Grammar::parse_lines(&lines).unwrap();
    assert_eq!(grammar.productions(&sym("S")).len(), 1);
    assert_eq!(grammar.productions(&sym("A")).len(), 1);
    assert!(grammar.non_terminals().contains(&sym("S")));
    assert!(grammar.terminals().contains(&sym("a")));
}

#[test]
fn parse_lines_splits_alternatives_on_whitespace() {
    let lines = vec!["1".to_string(), "S -> a b c".to_string()];
    let grammar = Grammar::parse_lines(&lines).unwrap();
    assert_eq!(grammar.productions(&sym("S")).len(), 3);
}

#[test]
fn parse_lines_rejects_empty_input() {
    let lines: Vec<String> = vec![];
    assert!(Grammar::parse_lines(&lines).is_err());
}

#[test]
fn parse_lines_first_lhs_is_start_symbol() {
    let lines = vec!["1".to_string(), "S -> a".to_string()];
    let grammar = Grammar::parse_lines(&lines).unwrap();
    assert_eq!(grammar.start(), &sym("S"));
}

#[test]
fn parse_lines_e_token_means_epsilon() {
    let lines = vec!["1".to_string(), "S -> e".to_string()];
    let grammar = Grammar::parse_lines(&lines).unwrap();
    assert!(grammar.productions(&sym("S")).iter().any(|r| r.is_empty()));
}

#[test]
fn parse_lines_reads_classic_arithmetic_grammar() {
    let lines = vec![
        "3".to_string(),
        "S -> S+T T".to_string(),
        "T -> T*F F".to_string(),
        "F -> (S) i".to_string(),
    ];
    let grammar = Grammar::parse_lines(&lines).unwrap();
    assert_eq!(
        grammar.productions(&sym("S")).len() + grammar.productions(&sym("T")).len() + grammar.productions(&sym("F")).len(),
        6
    );
    for t in ["+", "*", "(", ")", "i"] {
        assert!(grammar.terminals().contains(&sym(t)));
    }
}

#[test]
fn analysis_sets_agree_on_a_grammar_with_unreachable_and_dead_non_terminals() {
    // S -> a; A is unreachable; B is dead (only derives through itself).
    let lines = vec![
        "3".to_string(),
        "S -> a".to_string(),
        "A -> a".to_string(),
        "B -> B".to_string(),
    ];
    let mut grammar = Grammar::parse_lines(&lines).unwrap();
    assert_eq!(grammar.reachable(), [sym("S")].into_iter().collect());
    grammar.delete_extra_non_terminals();
    assert_eq!(grammar.non_terminals(), &[sym("S")].into_iter().collect());
}

#[test]
fn left_recursion_round_trips_through_elimination() {
    let lines = vec![
        "2".to_string(),
        "S -> A".to_string(),
        "A -> Ab a".to_string(),
    ];
    let mut grammar = Grammar::parse_lines(&lines).unwrap();
    assert!(grammar.has_left_recursion());
    grammar.eliminate_left_recursion();
    assert!(!grammar.has_left_recursion());
}
