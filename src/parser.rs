//! Recursive-descent membership tester over a normalized grammar.
//!
//! A [`Parser`] owns a private copy of its grammar, normalized once at
//! construction (left recursion eliminated, then left-factorized) so the
//! naive backtracking matcher below terminates and never re-derives the same
//! non-terminal at the same input position without consuming a symbol.

use crate::error::{GrammarError, Result};
use crate::grammar::Grammar;
use crate::symbol::{string_to_symbols, Symbol};

/// Tests whether strings belong to a grammar's language by backtracking,
/// left-to-right, alternative-by-alternative recursive descent.
pub struct Parser {
    grammar: Grammar,
}

impl Parser {
    /// Takes a deep copy of `grammar`, eliminates its left recursion, then
    /// left-factorizes it. The original `grammar` is left untouched.
    pub fn new(grammar: &Grammar) -> Self {
        let mut grammar = grammar.clone();
        grammar.eliminate_left_recursion();
        grammar.left_factorize();
        Self { grammar }
    }

    /// True iff `input` (one symbol per character) is generated by the
    /// grammar's start symbol, with no input left unconsumed.
    pub fn is_in_language(&self, input: &str) -> bool {
        let symbols = string_to_symbols(input);
        matches!(
            self.match_symbol(self.grammar.start(), &symbols),
            Some(remaining) if remaining.is_empty()
        )
    }

    /// As [`Parser::is_in_language`], but gives up with
    /// [`GrammarError::RecursionLimitExceeded`] once the recursion depth
    /// exceeds `max_depth`, instead of running unbounded on adversarial or
    /// cyclic-looking input.
    pub fn is_in_language_bounded(&self, input: &str, max_depth: usize) -> Result<bool> {
        let symbols = string_to_symbols(input);
        let remaining = self.match_symbol_bounded(self.grammar.start(), &symbols, max_depth)?;
        Ok(matches!(remaining, Some(r) if r.is_empty()))
    }

    fn match_symbol<'a>(&self, symbol: &Symbol, input: &'a [Symbol]) -> Option<&'a [Symbol]> {
        if self.grammar.terminals().contains(symbol) {
            return if input.first() == Some(symbol) {
                Some(&input[1..])
            } else {
                None
            };
        }
        for rule in self.grammar.productions(symbol) {
            if let Some(remaining) = self.match_sequence(rule, input) {
                return Some(remaining);
            }
        }
        None
    }

    fn match_sequence<'a>(&self, rule: &[Symbol], input: &'a [Symbol]) -> Option<&'a [Symbol]> {
        let mut remaining = input;
        for symbol in rule {
            remaining = self.match_symbol(symbol, remaining)?;
        }
        Some(remaining)
    }

    fn match_symbol_bounded<'a>(
        &self,
        symbol: &Symbol,
        input: &'a [Symbol],
        depth: usize,
    ) -> Result<Option<&'a [Symbol]>> {
        if self.grammar.terminals().contains(symbol) {
            return Ok(if input.first() == Some(symbol) {
                Some(&input[1..])
            } else {
                None
            });
        }
        if depth == 0 {
            return Err(GrammarError::RecursionLimitExceeded(depth));
        }
        for rule in self.grammar.productions(symbol) {
            if let Some(remaining) = self.match_sequence_bounded(rule, input, depth - 1)? {
                return Ok(Some(remaining));
            }
        }
        Ok(None)
    }

    fn match_sequence_bounded<'a>(
        &self,
        rule: &[Symbol],
        input: &'a [Symbol],
        depth: usize,
    ) -> Result<Option<&'a [Symbol]>> {
        let mut remaining = input;
        for symbol in rule {
            match self.match_symbol_bounded(symbol, remaining, depth)? {
                Some(next) => remaining = next,
                None => return Ok(None),
            }
        }
        Ok(Some(remaining))
    }
}
