//! Directed-graph utility: cycle detection and all-pairs reachability.
//!
//! Pure, generic over any hashable vertex type. Consumed by [`crate::grammar`]
//! for left-recursion detection and unit-production reachability; has no
//! dependency on the grammar or symbol types itself.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

/// DFS visitation state, per the classic three-color scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    NotVisited,
    Visiting,
    Visited,
}

/// A directed graph given as an adjacency map. Vertices not present as a key
/// are treated as having no outgoing edges.
pub struct Graph<'a, V> {
    adjacency: &'a HashMap<V, Vec<V>>,
}

impl<'a, V> Graph<'a, V>
where
    V: Eq + Hash + Clone,
{
    /// Wraps an adjacency map for cycle/reachability queries.
    pub fn new(adjacency: &'a HashMap<V, Vec<V>>) -> Self {
        Self { adjacency }
    }

    /// True iff the graph contains a cycle, including self-loops.
    ///
    /// Three-color DFS from every vertex: touching a `Visiting` vertex
    /// signals a back-edge, hence a cycle.
    pub fn has_cycle(&self) -> bool {
        let mut color: HashMap<&V, Color> =
            self.adjacency.keys().map(|v| (v, Color::NotVisited)).collect();

        for v in self.adjacency.keys() {
            if color[v] == Color::NotVisited && self.dfs_has_cycle(v, &mut color) {
                return true;
            }
        }
        false
    }

    fn dfs_has_cycle(&self, v: &'a V, color: &mut HashMap<&'a V, Color>) -> bool {
        color.insert(v, Color::Visiting);
        if let Some(neighbors) = self.adjacency.get(v) {
            for next in neighbors {
                match color.get(next).copied().unwrap_or(Color::NotVisited) {
                    Color::Visiting => return true,
                    Color::Visited => continue,
                    Color::NotVisited => {
                        if self.dfs_has_cycle(next, color) {
                            return true;
                        }
                    }
                }
            }
        }
        color.insert(v, Color::Visited);
        false
    }

    /// For every vertex, the set of vertices reachable via zero or more
    /// edges (a vertex always reaches itself).
    pub fn reachables(&self) -> HashMap<V, HashSet<V>> {
        let mut result = HashMap::new();
        for v in self.adjacency.keys() {
            let mut visited = HashSet::new();
            self.dfs_collect(v, &mut visited);
            result.insert(v.clone(), visited);
        }
        result
    }

    fn dfs_collect(&self, v: &'a V, visited: &mut HashSet<V>) {
        if !visited.insert(v.clone()) {
            return;
        }
        if let Some(neighbors) = self.adjacency.get(v) {
            for next in neighbors {
                self.dfs_collect(next, visited);
            }
        }
    }
}
