//! Context-free grammar model, analysis, and normalizing rewrites.
//!
//! A [`Grammar`] is the tuple `(T, N, S, R)`: terminals, non-terminals, start
//! symbol, and a production map from non-terminal to its ordered list of
//! alternatives. Analysis queries (`alive`, `reachable`, `vanishing`,
//! `has_left_recursion`) are pure; rewrites (`delete_unreachable`,
//! `delete_dead`, `delete_extra_non_terminals`, `delete_vanishings`,
//! `delete_chain_rules`, `eliminate_left_recursion`, `left_factorize`) mutate
//! the grammar in place, each preserving the language of the start symbol
//! (empty-language degeneracies aside, as documented per rewrite).

use std::collections::{HashMap, HashSet};
use std::fmt;

use log::{debug, trace};

use crate::error::{GrammarError, Result};
use crate::graph::Graph;
use crate::symbol::Symbol;

/// A context-free grammar: terminals, non-terminals, a start symbol, and a
/// production map. Invariant (I1): every key of the production map is a
/// member of `non_terminals`; any other symbol appearing in a right-hand
/// side is implicitly a terminal.
#[derive(Debug, Clone)]
pub struct Grammar {
    terminals: HashSet<Symbol>,
    non_terminals: HashSet<Symbol>,
    start: Symbol,
    rules: HashMap<Symbol, Vec<Vec<Symbol>>>,
    last_used_symbol: usize,
}

impl Grammar {
    /// Builds a grammar from its four components, checking invariant I1.
    pub fn new(
        terminals: HashSet<Symbol>,
        non_terminals: HashSet<Symbol>,
        start: Symbol,
        rules: HashMap<Symbol, Vec<Vec<Symbol>>>,
    ) -> Result<Self> {
        for key in rules.keys() {
            if !non_terminals.contains(key) {
                return Err(GrammarError::UndeclaredNonTerminal(key.clone()));
            }
        }
        Ok(Self {
            terminals,
            non_terminals,
            start,
            rules,
            last_used_symbol: 0,
        })
    }

    /// Parses the teacher-style line-oriented grammar notation used by the
    /// CLI demo: the first line is a production count `n`; each of the next
    /// `n` lines is `LHS -> alt1 alt2 ...` where `LHS` is a single-character
    /// non-terminal name, alternatives are space-separated, uppercase ASCII
    /// letters within an alternative denote non-terminals, `e` alone denotes
    /// the epsilon alternative, and everything else is a terminal. The start
    /// symbol is the left-hand side of the first production line. This is an
    /// ambient CLI convenience, not part of the CORE grammar model.
    pub fn parse_lines(lines: &[String]) -> Result<Self> {
        if lines.is_empty() {
            return Err(GrammarError::EmptyInput);
        }

        let n: usize = lines[0]
            .trim()
            .parse()
            .map_err(|e| GrammarError::InvalidFormat(format!("invalid production count: {e}")))?;

        if lines.len() < n + 1 {
            return Err(GrammarError::NotEnoughProductions {
                expected: n,
                actual: lines.len() - 1,
            });
        }

        let mut terminals = HashSet::new();
        let mut non_terminals = HashSet::new();
        let mut rules: HashMap<Symbol, Vec<Vec<Symbol>>> = HashMap::new();
        let mut start: Option<Symbol> = None;

        for line in &lines[1..=n] {
            let mut parts = line.splitn(2, "->");
            let lhs_str = parts.next().unwrap_or("").trim();
            let rhs_str = parts
                .next()
                .ok_or_else(|| GrammarError::InvalidProduction(line.clone()))?
                .trim();

            if lhs_str.is_empty() {
                return Err(GrammarError::InvalidProduction(
                    "empty left-hand side".to_string(),
                ));
            }

            let lhs = Symbol::from(lhs_str.chars().next().unwrap());
            non_terminals.insert(lhs.clone());
            if start.is_none() {
                start = Some(lhs.clone());
            }

            let mut group = rules.remove(&lhs).unwrap_or_default();
            for alt in rhs_str.split_whitespace() {
                let rhs_symbols: Vec<Symbol> = if alt == "e" {
                    Vec::new()
                } else {
                    alt.chars()
                        .map(|c| {
                            let symbol = Symbol::from(c);
                            if c.is_ascii_uppercase() {
                                non_terminals.insert(symbol.clone());
                            } else {
                                terminals.insert(symbol.clone());
                            }
                            symbol
                        })
                        .collect()
                };
                group.push(rhs_symbols);
            }
            rules.insert(lhs, group);
        }

        let start = start.ok_or(GrammarError::EmptyInput)?;
        Grammar::new(terminals, non_terminals, start, rules)
    }

    /// The grammar's terminal set.
    pub fn terminals(&self) -> &HashSet<Symbol> {
        &self.terminals
    }

    /// The grammar's non-terminal set.
    pub fn non_terminals(&self) -> &HashSet<Symbol> {
        &self.non_terminals
    }

    /// The start symbol.
    pub fn start(&self) -> &Symbol {
        &self.start
    }

    /// The full production map.
    pub fn rules(&self) -> &HashMap<Symbol, Vec<Vec<Symbol>>> {
        &self.rules
    }

    /// The alternatives for a single non-terminal; empty if it has none.
    pub fn productions(&self, non_terminal: &Symbol) -> &[Vec<Symbol>] {
        self.rules
            .get(non_terminal)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Allocates a fresh symbol name absent from both `terminals` and
    /// `non_terminals`, caching the last-tried index so repeated calls are
    /// amortized O(1). The caller must insert the returned symbol into
    /// `non_terminals` (or `terminals`) before requesting another fresh
    /// symbol, or the same name will be handed out again.
    pub fn fresh_symbol(&mut self) -> Symbol {
        loop {
            let candidate = Symbol::new(self.last_used_symbol.to_string());
            if !self.non_terminals.contains(&candidate) && !self.terminals.contains(&candidate) {
                return candidate;
            }
            self.last_used_symbol += 1;
        }
    }

    /// The productive ("alive") non-terminals: those that can derive at
    /// least one string of terminals.
    pub fn alive(&self) -> HashSet<Symbol> {
        let mut alive: HashSet<Symbol> = HashSet::new();
        let mut changed = true;
        while changed {
            changed = false;
            for (non_term, group) in &self.rules {
                if alive.contains(non_term) {
                    continue;
                }
                for rule in group {
                    if rule
                        .iter()
                        .all(|s| self.terminals.contains(s) || alive.contains(s))
                    {
                        alive.insert(non_term.clone());
                        changed = true;
                        break;
                    }
                }
            }
            trace!("alive: fixed-point pass, |alive| = {}", alive.len());
        }
        alive
    }

    /// The non-terminals reachable from the start symbol.
    pub fn reachable(&self) -> HashSet<Symbol> {
        let mut reachable: HashSet<Symbol> = HashSet::new();
        if !self.non_terminals.contains(&self.start) {
            return reachable;
        }
        reachable.insert(self.start.clone());

        let mut changed = true;
        while changed {
            changed = false;
            for (non_term, group) in &self.rules {
                if !reachable.contains(non_term) {
                    continue;
                }
                for rule in group {
                    for symbol in rule {
                        if self.non_terminals.contains(symbol) && !reachable.contains(symbol) {
                            reachable.insert(symbol.clone());
                            changed = true;
                        }
                    }
                }
            }
            trace!("reachable: fixed-point pass, |reachable| = {}", reachable.len());
        }
        reachable
    }

    /// The vanishing ("nullable") non-terminals: those that can derive the
    /// empty string.
    pub fn vanishing(&self) -> HashSet<Symbol> {
        let mut vanishing: HashSet<Symbol> = HashSet::new();
        let mut changed = true;
        while changed {
            changed = false;
            for (non_term, group) in &self.rules {
                if vanishing.contains(non_term) {
                    continue;
                }
                for rule in group {
                    if rule.iter().all(|s| vanishing.contains(s)) {
                        vanishing.insert(non_term.clone());
                        changed = true;
                        break;
                    }
                }
            }
            trace!("vanishing: fixed-point pass, |vanishing| = {}", vanishing.len());
        }
        vanishing
    }

    /// Whether the grammar has direct or indirect left recursion: a
    /// derivation `A ⇒⁺ A γ` whose first step consumes no terminal.
    ///
    /// Builds a graph over non-terminals with an edge `A → B` for every `B`
    /// reachable as a prefix element of some alternative of `A` through zero
    /// or more vanishing non-terminals, then checks that graph for a cycle.
    pub fn has_left_recursion(&self) -> bool {
        let vanishing = self.vanishing();
        let mut adjacency: HashMap<Symbol, Vec<Symbol>> = self
            .non_terminals
            .iter()
            .map(|s| (s.clone(), Vec::new()))
            .collect();

        for (symbol, group) in &self.rules {
            for rule in group {
                for sec_symbol in rule {
                    if !self.non_terminals.contains(sec_symbol) {
                        break;
                    }
                    adjacency.entry(symbol.clone()).or_default().push(sec_symbol.clone());
                    if !vanishing.contains(sec_symbol) {
                        break;
                    }
                }
            }
        }

        Graph::new(&adjacency).has_cycle()
    }

    /// Removes every non-terminal not reachable from the start symbol, and
    /// their productions. Preserves the grammar's language.
    pub fn delete_unreachable(&mut self) {
        let reachable = self.reachable();
        debug!(
            "delete_unreachable: {} -> {} non-terminals",
            self.non_terminals.len(),
            reachable.len()
        );
        self.rules.retain(|k, _| reachable.contains(k));
        self.non_terminals = reachable;
    }

    /// Removes every unproductive ("dead") non-terminal, and discards any
    /// surviving alternative that mentions a dead non-terminal. Preserves
    /// the grammar's language.
    pub fn delete_dead(&mut self) {
        let alive = self.alive();
        debug!(
            "delete_dead: {} -> {} non-terminals",
            self.non_terminals.len(),
            alive.len()
        );
        self.rules.retain(|k, _| alive.contains(k));
        let terminals = &self.terminals;
        for group in self.rules.values_mut() {
            group.retain(|rule| rule.iter().all(|s| terminals.contains(s) || alive.contains(s)));
        }
        self.non_terminals = alive;
    }

    /// `delete_dead` then `delete_unreachable`, in that order. The order is
    /// load-bearing: a non-terminal can be productive but only reachable
    /// through a dead sibling, in which case dead-first then unreachable
    /// correctly drops it, while the reverse order leaves it behind.
    pub fn delete_extra_non_terminals(&mut self) {
        self.delete_dead();
        self.delete_unreachable();
    }

    /// Eliminates ε-productions by expanding every alternative into all
    /// subsequences obtained by independently keeping or dropping each
    /// vanishing position, except the all-empty subsequence. If the start
    /// symbol was vanishing, introduces a fresh start with alternatives
    /// `{[old start], []}` so the empty string remains in the language.
    ///
    /// Deliberately does not deduplicate the generated alternatives, even
    /// when two masks coincide or a mask reproduces an already-present
    /// alternative: the reference behavior emits every one of them.
    pub fn delete_vanishings(&mut self) {
        let vanishing = self.vanishing();
        debug!("delete_vanishings: {} vanishing non-terminals", vanishing.len());

        for group in self.rules.values_mut() {
            let mut new_rules = Vec::new();
            for rule in group.iter() {
                let vanishing_positions: Vec<usize> = rule
                    .iter()
                    .enumerate()
                    .filter(|(_, s)| vanishing.contains(s))
                    .map(|(i, _)| i)
                    .collect();
                let combinations = 1usize << vanishing_positions.len();
                let mut bounds = vanishing_positions;
                bounds.push(rule.len());

                for mask in 0..combinations {
                    let mut new_rule = Vec::new();
                    let mut beg = 0;
                    for (i, &ind) in bounds.iter().enumerate() {
                        let keep = if (mask >> i) & 1 == 1 { 1 } else { 0 };
                        new_rule.extend_from_slice(&rule[beg..ind + keep]);
                        beg = ind + 1;
                    }
                    if !new_rule.is_empty() {
                        new_rules.push(new_rule);
                    }
                }
            }
            *group = new_rules;
        }

        if vanishing.contains(&self.start) {
            let new_start = self.fresh_symbol();
            self.non_terminals.insert(new_start.clone());
            self.rules.insert(
                new_start.clone(),
                vec![vec![self.start.clone()], Vec::new()],
            );
            self.start = new_start;
        }
    }

    /// Eliminates unit (chain) productions `A -> B`. Strips every unit
    /// alternative, then for every pair `(A, B)` with `B` reachable from `A`
    /// via unit productions and `A != B`, appends a copy of `B`'s (now
    /// unit-free) alternatives to `A`. Preserves the grammar's language.
    pub fn delete_chain_rules(&mut self) {
        let mut adjacency: HashMap<Symbol, Vec<Symbol>> = HashMap::new();
        for nt in &self.non_terminals {
            let mut edges = Vec::new();
            if let Some(group) = self.rules.get(nt) {
                for rule in group {
                    if rule.len() == 1 && self.non_terminals.contains(&rule[0]) {
                        edges.push(rule[0].clone());
                    }
                }
            }
            adjacency.insert(nt.clone(), edges);
        }
        let reachable = Graph::new(&adjacency).reachables();

        let non_terminals = &self.non_terminals;
        for group in self.rules.values_mut() {
            group.retain(|rule| !(rule.len() == 1 && non_terminals.contains(&rule[0])));
        }

        debug!("delete_chain_rules: {} unit-production sources resolved", adjacency.len());

        let unit_free = self.rules.clone();
        for (a, reach_set) in &reachable {
            for b in reach_set {
                if a != b {
                    if let Some(b_rules) = unit_free.get(b) {
                        self.rules
                            .entry(a.clone())
                            .or_default()
                            .extend(b_rules.iter().cloned());
                    }
                }
            }
        }
    }

    /// Eliminates direct and indirect left recursion. No-op if the grammar
    /// has none. Otherwise normalizes first (prune, delete ε, delete chains,
    /// prune again), then processes non-terminals in an order that handles
    /// the start symbol last, substituting each processed non-terminal's
    /// current alternatives into not-yet-processed non-terminals whose
    /// alternatives begin with it (expanding indirect recursion into direct
    /// recursion), then splitting any direct self-recursion into a fresh
    /// right-recursive pair. Preserves the grammar's language; afterward,
    /// `has_left_recursion` is false.
    pub fn eliminate_left_recursion(&mut self) {
        if !self.has_left_recursion() {
            return;
        }
        debug!("eliminate_left_recursion: grammar has left recursion, normalizing");

        self.delete_extra_non_terminals();
        self.delete_vanishings();
        self.delete_chain_rules();
        self.delete_extra_non_terminals();

        // Order so the start symbol is processed last: push it first, then
        // pop from the end, so every other non-terminal pops (and is
        // processed) before it.
        let mut others: Vec<Symbol> = self
            .non_terminals
            .iter()
            .filter(|s| **s != self.start)
            .cloned()
            .collect();
        others.sort();
        let mut stack = vec![self.start.clone()];
        stack.extend(others);

        while let Some(non_term) = stack.pop() {
            let has_direct_recursion = self
                .rules
                .get(&non_term)
                .map(|group| group.iter().any(|rule| rule.first() == Some(&non_term)))
                .unwrap_or(false);
            if !has_direct_recursion {
                continue;
            }

            let group = self.rules.get(&non_term).cloned().unwrap_or_default();
            let mut alpha_rules = Vec::new();
            let mut beta_rules = Vec::new();
            for rule in group {
                if rule.first() == Some(&non_term) {
                    alpha_rules.push(rule[1..].to_vec());
                } else {
                    beta_rules.push(rule);
                }
            }

            let new_symb = self.fresh_symbol();
            self.non_terminals.insert(new_symb.clone());
            self.rules.insert(
                non_term.clone(),
                beta_rules
                    .into_iter()
                    .map(|mut r| {
                        r.push(new_symb.clone());
                        r
                    })
                    .collect(),
            );
            let mut new_symb_rules: Vec<Vec<Symbol>> = alpha_rules
                .into_iter()
                .map(|mut r| {
                    r.push(new_symb.clone());
                    r
                })
                .collect();
            new_symb_rules.push(Vec::new());
            self.rules.insert(new_symb.clone(), new_symb_rules);

            for bigger in stack.iter() {
                let needs_substitution = self
                    .rules
                    .get(bigger)
                    .map(|g| g.iter().any(|r| r.first() == Some(&non_term)))
                    .unwrap_or(false);
                if !needs_substitution {
                    continue;
                }

                let non_term_rules = self.rules.get(&non_term).cloned().unwrap_or_default();
                let bigger_group = self.rules.get(bigger).cloned().unwrap_or_default();
                let mut new_bigger_rules = Vec::new();
                for rule in bigger_group {
                    if rule.first() == Some(&non_term) {
                        for left in &non_term_rules {
                            let mut combined = left.clone();
                            combined.extend_from_slice(&rule[1..]);
                            new_bigger_rules.push(combined);
                        }
                    } else {
                        new_bigger_rules.push(rule);
                    }
                }
                self.rules.insert(bigger.clone(), new_bigger_rules);
            }
        }
    }

    /// Left-factorizes every non-terminal: alternatives sharing a
    /// non-terminal first symbol are grouped behind a single alternative
    /// pointing at a fresh non-terminal holding their tails, recursively
    /// factorized in turn. Terminal and ε first symbols are left alone.
    /// Preserves the grammar's language.
    pub fn left_factorize(&mut self) {
        let initial: Vec<Symbol> = self.non_terminals.iter().cloned().collect();
        for non_term in initial {
            self.left_factorize_group(&non_term);
        }
    }

    fn left_factorize_group(&mut self, non_term: &Symbol) {
        let group = self.rules.get(non_term).cloned().unwrap_or_default();

        // Group alternatives by first symbol, preserving first-encounter
        // order (matching an insertion-ordered dict).
        let mut by_first: Vec<(Option<Symbol>, Vec<Vec<Symbol>>)> = Vec::new();
        for rule in group {
            let key = rule.first().cloned();
            if let Some(entry) = by_first.iter_mut().find(|(k, _)| *k == key) {
                entry.1.push(rule);
            } else {
                by_first.push((key, vec![rule]));
            }
        }

        let mut new_rules = Vec::new();
        let mut new_symbols = Vec::new();
        for (key, rules_for_key) in by_first {
            let leave_as_is = match &key {
                None => true,
                Some(s) => self.terminals.contains(s) || rules_for_key.len() < 2,
            };
            if leave_as_is {
                new_rules.extend(rules_for_key);
                continue;
            }
            let symbol = key.unwrap();
            let new_beg = self.fresh_symbol();
            self.non_terminals.insert(new_beg.clone());
            new_symbols.push(new_beg.clone());
            new_rules.push(vec![symbol, new_beg.clone()]);
            let tails: Vec<Vec<Symbol>> = rules_for_key
                .into_iter()
                .map(|rule| rule[1..].to_vec())
                .collect();
            self.rules.insert(new_beg, tails);
        }

        self.rules.insert(non_term.clone(), new_rules);
        for new_sym in new_symbols {
            self.left_factorize_group(&new_sym);
        }
    }
}

impl fmt::Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (non_term, group) in &self.rules {
            let alts: Vec<String> = group
                .iter()
                .map(|rule| {
                    if rule.is_empty() {
                        "ε".to_string()
                    } else {
                        rule.iter()
                            .map(|s| s.as_str())
                            .collect::<Vec<_>>()
                            .join(" ")
                    }
                })
                .collect();
            writeln!(f, "{} -> {}", non_term, alts.join(" | "))?;
        }
        Ok(())
    }
}
