//! Undirected graphs over integer vertices, plus the lexicographic labels
//! used by the LEX-P/LEX-M orderings.
//!
//! Adjacency is kept in ordered sets so every iteration-order-sensitive
//! tie-break (minfill, MCS, label maxima) is reproducible across runs.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::Error;
use crate::Result;

/// An undirected graph with symmetric adjacency and no self-loops.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Graph {
    vertices: BTreeSet<i64>,
    adjacency: BTreeMap<i64, BTreeSet<i64>>,
}

impl Graph {
    #[must_use]
    pub fn new(vertices: impl IntoIterator<Item = i64>) -> Graph {
        let vertices: BTreeSet<i64> = vertices.into_iter().collect();
        let adjacency = vertices.iter().map(|&v| (v, BTreeSet::new())).collect();
        Graph {
            vertices,
            adjacency,
        }
    }

    #[must_use]
    pub fn vertices(&self) -> &BTreeSet<i64> {
        &self.vertices
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Neighbours of `v`.
    ///
    /// # Panics
    ///
    /// Panics when `v` is not a vertex of the graph.
    #[must_use]
    pub fn neighbors(&self, v: i64) -> &BTreeSet<i64> {
        &self.adjacency[&v]
    }

    /// Insert the edge `{u, v}`. Idempotent; `u == v` is ignored.
    pub fn add_edge(&mut self, u: i64, v: i64) {
        if u == v {
            return;
        }
        if let Some(neighbors) = self.adjacency.get_mut(&u) {
            neighbors.insert(v);
        }
        if let Some(neighbors) = self.adjacency.get_mut(&v) {
            neighbors.insert(u);
        }
    }

    #[must_use]
    pub fn is_neighbor(&self, u: i64, v: i64) -> bool {
        self.adjacency[&u].contains(&v)
    }

    /// Remove `v` together with every edge incident to it.
    pub fn remove_vertex(&mut self, v: i64) {
        self.vertices.remove(&v);
        self.adjacency.remove(&v);
        for neighbors in self.adjacency.values_mut() {
            neighbors.remove(&v);
        }
    }

    /// Make the neighbourhood of `v` a clique.
    pub fn fill_in_edges(&mut self, v: i64) {
        let neighbors: Vec<i64> = self.adjacency[&v].iter().copied().collect();
        for (i, &u) in neighbors.iter().enumerate() {
            for &w in &neighbors[i + 1..] {
                self.add_edge(u, w);
            }
        }
    }

    /// Number of unordered neighbour pairs of `v` that are not adjacent.
    #[must_use]
    pub fn count_fill_in_edges(&self, v: i64) -> usize {
        let neighbors: Vec<i64> = self.adjacency[&v].iter().copied().collect();
        let mut count = 0;
        for (i, &u) in neighbors.iter().enumerate() {
            for &w in &neighbors[i + 1..] {
                if !self.is_neighbor(u, w) {
                    count += 1;
                }
            }
        }
        count
    }

    /// The vertex minimising [`Graph::count_fill_in_edges`]. Ties go to the
    /// first vertex in ascending order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::GraphEmpty`] when the graph has no vertices.
    pub fn min_fill_vertex(&self) -> Result<i64> {
        let mut best: Option<(i64, usize)> = None;
        for &v in &self.vertices {
            let count = self.count_fill_in_edges(v);
            if best.is_none_or(|(_, best_count)| count < best_count) {
                best = Some((v, count));
            }
        }
        match best {
            Some((v, _)) => Ok(v),
            None => Err(Error::GraphEmpty),
        }
    }

    /// Whether `to` is reachable from `from`.
    #[must_use]
    pub fn has_path(&self, from: i64, to: i64) -> bool {
        let mut visited = BTreeSet::new();
        let mut stack = vec![from];
        while let Some(v) = stack.pop() {
            if v == to {
                return true;
            }
            if !visited.insert(v) {
                continue;
            }
            for &neighbor in &self.adjacency[&v] {
                if !visited.contains(&neighbor) {
                    stack.push(neighbor);
                }
            }
        }
        false
    }
}

/// A descending integer sequence compared lexicographically.
///
/// LEX-P and LEX-M keep one label per unnumbered vertex and repeatedly pick
/// the vertex whose label is lexicographically largest.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Label(Vec<i64>);

impl Label {
    /// Append `i` and restore the descending order.
    pub fn add_number(&mut self, i: i64) {
        self.0.push(i);
        self.0.sort_unstable_by(|a, b| b.cmp(a));
    }
}
