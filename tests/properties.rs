//! Property-based tests over the CFG analyses/rewrites and the RE/LTS
//! compiler, using randomly generated small grammars, regular expressions,
//! and strings.

use std::collections::{HashMap, HashSet};

use cfg_rex::{Grammar, Rex, Symbol};
use proptest::prelude::*;

fn nt(name: &str) -> Symbol {
    Symbol::new(name)
}

/// A small fixed alphabet keeps generated grammars and expressions tractable
/// while still exercising recursion, epsilon, and multi-alternative rules.
fn arb_alt() -> impl Strategy<Value = Vec<Symbol>> {
    proptest::collection::vec(
        prop_oneof![
            Just(nt("A")),
            Just(nt("B")),
            Just(nt("C")),
            Just(Symbol::new("a")),
            Just(Symbol::new("b")),
        ],
        0..3,
    )
}

/// Non-terminals `A`, `B`, `C` over terminals `a`, `b`, with `A` as start;
/// each non-terminal gets one to three random alternatives. Always a valid
/// grammar (every key is declared), so `Grammar::new` cannot fail here.
fn arb_grammar() -> impl Strategy<Value = Grammar> {
    (
        proptest::collection::vec(arb_alt(), 1..4),
        proptest::collection::vec(arb_alt(), 1..4),
        proptest::collection::vec(arb_alt(), 1..4),
    )
        .prop_map(|(a_alts, b_alts, c_alts)| {
            let terminals = HashSet::from([Symbol::new("a"), Symbol::new("b")]);
            let non_terminals = HashSet::from([nt("A"), nt("B"), nt("C")]);
            let mut rules = HashMap::new();
            rules.insert(nt("A"), a_alts);
            rules.insert(nt("B"), b_alts);
            rules.insert(nt("C"), c_alts);
            Grammar::new(terminals, non_terminals, nt("A"), rules).unwrap()
        })
}

fn arb_token() -> impl Strategy<Value = char> {
    prop_oneof![Just('a'), Just('b')]
}

fn leaf_rex() -> impl Strategy<Value = Rex> {
    prop_oneof![
        Just(Rex::Epsilon),
        Just(Rex::Symbol(Symbol::from('a'))),
        Just(Rex::Symbol(Symbol::from('b'))),
    ]
}

/// Regular expressions built up to a small bounded depth, so generated trees
/// stay cheap to compile and to match structurally.
fn arb_rex() -> impl Strategy<Value = Rex> {
    leaf_rex().prop_recursive(4, 32, 3, |inner| {
        prop_oneof![
            (inner.clone(), inner.clone()).prop_map(|(a, b)| Rex::concat(a, b)),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| Rex::union(a, b)),
            inner.prop_map(Rex::star),
        ]
    })
}

proptest! {
    /// `alive`, `reachable`, and `vanishing` are always subsets of the
    /// non-terminal set they're computed over, for any grammar.
    #[test]
    fn analysis_sets_are_subsets_of_non_terminals(grammar in arb_grammar()) {
        let nts = grammar.non_terminals();
        prop_assert!(grammar.alive().is_subset(nts));
        prop_assert!(grammar.reachable().is_subset(nts));
        prop_assert!(grammar.vanishing().is_subset(nts));
    }

    /// `delete_dead` is idempotent: running it twice in a row leaves the
    /// non-terminal set unchanged after the first pass.
    #[test]
    fn delete_dead_is_idempotent(grammar in arb_grammar()) {
        let mut g = grammar;
        g.delete_dead();
        let after_first = g.non_terminals().clone();
        g.delete_dead();
        prop_assert_eq!(g.non_terminals().clone(), after_first);
    }

    /// `delete_unreachable` never grows the non-terminal set.
    #[test]
    fn delete_unreachable_never_adds_non_terminals(grammar in arb_grammar()) {
        let mut g = grammar;
        let before = g.non_terminals().clone();
        g.delete_unreachable();
        prop_assert!(g.non_terminals().is_subset(&before));
    }

    /// After `eliminate_left_recursion`, the grammar never reports left
    /// recursion, whether or not it had any to begin with.
    #[test]
    fn eliminate_left_recursion_clears_left_recursion(grammar in arb_grammar()) {
        let mut g = grammar;
        g.eliminate_left_recursion();
        prop_assert!(!g.has_left_recursion());
    }

    /// `left_factorize` never leaves two distinct alternatives of the same
    /// non-terminal sharing a non-terminal first symbol.
    #[test]
    fn left_factorize_removes_shared_non_terminal_prefixes(grammar in arb_grammar()) {
        let mut g = grammar;
        g.left_factorize();
        for non_term in g.non_terminals().clone() {
            let mut seen_non_terminal_heads: HashSet<Symbol> = HashSet::new();
            for rule in g.productions(&non_term) {
                if let Some(head) = rule.first() {
                    if g.non_terminals().contains(head) {
                        prop_assert!(
                            seen_non_terminal_heads.insert(head.clone()),
                            "{non_term} has two alternatives starting with {head} after left-factorization"
                        );
                    }
                }
            }
        }
    }

    /// The structural `Rex::accepts` and the Thompson-compiled `Lts::accepts`
    /// always agree, for any expression and any input string.
    #[test]
    fn rex_accepts_matches_compiled_lts(
        rex in arb_rex(),
        input in proptest::collection::vec(arb_token(), 0..6),
    ) {
        let tokens: Vec<Symbol> = input.into_iter().map(Symbol::from).collect();
        let lts = cfg_rex::rex2lts::compile(&rex);
        prop_assert_eq!(rex.accepts(&tokens), lts.accepts(&tokens));
    }

    /// `string_to_symbols`/`symbols_to_string` round-trip any string drawn
    /// from a single-character alphabet.
    #[test]
    fn symbol_string_round_trip(s in "[ab]{0,12}") {
        let symbols = cfg_rex::symbol::string_to_symbols(&s);
        prop_assert_eq!(cfg_rex::symbol::symbols_to_string(&symbols), s);
    }
}
