//! Labelled transition system (ε-NFA) model: states, transitions, ε-closure,
//! and token-chain acceptance.
//!
//! States are plain `usize` ids, matching how [`crate::rex2lts`] numbers them
//! during Thompson construction. A transition's label is `None` for an
//! ε-move or `Some(symbol)` for a symbol-consuming move.

use std::collections::{HashMap, HashSet};

use crate::symbol::Symbol;

/// A single edge of an [`Lts`]: `source --label--> target`, where `label =
/// None` denotes an ε-transition.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Transition {
    pub source: usize,
    pub label: Option<Symbol>,
    pub target: usize,
}

impl Transition {
    pub fn new(source: usize, label: Option<Symbol>, target: usize) -> Self {
        Self { source, label, target }
    }
}

/// A labelled transition system with a single start state and a single
/// accepting state, as produced by Thompson-style construction.
#[derive(Debug, Clone)]
pub struct Lts {
    states: HashSet<usize>,
    transitions: Vec<Transition>,
    start: usize,
    accept: usize,
    index: HashMap<(usize, Option<Symbol>), Vec<usize>>,
}

impl Lts {
    /// Builds an LTS from its states, transitions, start state, and single
    /// accepting state, indexing transitions by `(source, label)` for O(1)
    /// step lookups.
    pub fn new(
        states: HashSet<usize>,
        transitions: Vec<Transition>,
        start: usize,
        accept: usize,
    ) -> Self {
        let mut index: HashMap<(usize, Option<Symbol>), Vec<usize>> = HashMap::new();
        for t in &transitions {
            index
                .entry((t.source, t.label.clone()))
                .or_default()
                .push(t.target);
        }
        Self {
            states,
            transitions,
            start,
            accept,
            index,
        }
    }

    pub fn states(&self) -> &HashSet<usize> {
        &self.states
    }

    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn accept(&self) -> usize {
        self.accept
    }

    /// The states reachable from any state in `from` by zero or more
    /// ε-transitions, `from` itself included.
    pub fn closure(&self, from: &HashSet<usize>) -> HashSet<usize> {
        let mut reached: HashSet<usize> = from.clone();
        let mut frontier: Vec<usize> = from.iter().copied().collect();
        while let Some(state) = frontier.pop() {
            if let Some(targets) = self.index.get(&(state, None)) {
                for &target in targets {
                    if reached.insert(target) {
                        frontier.push(target);
                    }
                }
            }
        }
        reached
    }

    /// The states reachable from `from` by consuming a single `symbol`,
    /// without taking the ε-closure of the result.
    fn step(&self, from: &HashSet<usize>, symbol: &Symbol) -> HashSet<usize> {
        let mut result = HashSet::new();
        for &state in from {
            if let Some(targets) = self.index.get(&(state, Some(symbol.clone()))) {
                result.extend(targets.iter().copied());
            }
        }
        result
    }

    /// True iff `input` drives the automaton from `{start}` (ε-closed) to a
    /// frontier containing the accepting state, after consuming every
    /// symbol in order.
    pub fn accepts(&self, input: &[Symbol]) -> bool {
        let mut frontier = self.closure(&HashSet::from([self.start]));
        for symbol in input {
            let stepped = self.step(&frontier, symbol);
            frontier = self.closure(&stepped);
            if frontier.is_empty() {
                return false;
            }
        }
        frontier.contains(&self.accept)
    }
}
