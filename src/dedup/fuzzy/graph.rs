//! Candidate pair graph and connected components.

use std::collections::{BTreeMap, BTreeSet};

/// Undirected graph over document ids built from candidate edges.
///
/// Edges are stored as `(smaller, larger)` in a sorted set, so merging two
/// graphs is a plain union and the result does not depend on merge order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DuplicateGraph {
    edges: BTreeSet<(String, String)>,
}

impl DuplicateGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from edges.
    pub fn from_edges<I: IntoIterator<Item = (String, String)>>(edges: I) -> Self {
        let mut graph = Self::new();
        for (a, b) in edges {
            graph.add_edge(a, b);
        }
        graph
    }

    /// Add an undirected edge. Self loops are ignored.
    pub fn add_edge(&mut self, a: String, b: String) {
        match a.cmp(&b) {
            std::cmp::Ordering::Less => self.edges.insert((a, b)),
            std::cmp::Ordering::Greater => self.edges.insert((b, a)),
            std::cmp::Ordering::Equal => false,
        };
    }

    /// Union of two graphs.
    pub fn merge(mut self, mut other: DuplicateGraph) -> DuplicateGraph {
        if self.edges.len() < other.edges.len() {
            std::mem::swap(&mut self, &mut other);
        }
        self.edges.extend(other.edges);
        self
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Get the edges.
    pub fn edges(&self) -> &BTreeSet<(String, String)> {
        &self.edges
    }

    /// Connected components with at least two members, sorted.
    pub fn components(&self) -> Vec<BTreeSet<String>> {
        let mut index: BTreeMap<&str, usize> = BTreeMap::new();
        for (a, b) in &self.edges {
            let next = index.len();
            index.entry(a.as_str()).or_insert(next);
            let next = index.len();
            index.entry(b.as_str()).or_insert(next);
        }

        let mut sets = UnionFind::new(index.len());
        for (a, b) in &self.edges {
            sets.union(index[a.as_str()], index[b.as_str()]);
        }

        let mut groups: BTreeMap<usize, BTreeSet<String>> = BTreeMap::new();
        for (id, &node) in &index {
            groups
                .entry(sets.find(node))
                .or_default()
                .insert(id.to_string());
        }

        let mut components: Vec<BTreeSet<String>> = groups.into_values().collect();
        components.sort();
        components
    }
}

/// Disjoint sets with path halving and union by size.
struct UnionFind {
    parent: Vec<usize>,
    size: Vec<usize>,
}

impl UnionFind {
    fn new(n: usize) -> Self {
        UnionFind {
            parent: (0..n).collect(),
            size: vec![1; n],
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    fn union(&mut self, a: usize, b: usize) {
        let (mut a, mut b) = (self.find(a), self.find(b));
        if a == b {
            return;
        }
        if self.size[a] < self.size[b] {
            std::mem::swap(&mut a, &mut b);
        }
        self.parent[b] = a;
        self.size[a] += self.size[b];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(a: &str, b: &str) -> (String, String) {
        (a.to_string(), b.to_string())
    }

    fn set(ids: &[&str]) -> BTreeSet<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_components() {
        let graph = DuplicateGraph::from_edges([
            edge("b", "a"),
            edge("c", "b"),
            edge("x", "y"),
            edge("q", "q"),
        ]);
        assert_eq!(graph.edge_count(), 3);
        assert_eq!(graph.components(), vec![set(&["a", "b", "c"]), set(&["x", "y"])]);
    }

    #[test]
    fn test_merge_order_does_not_matter() {
        let g1 = DuplicateGraph::from_edges([edge("a", "b")]);
        let g2 = DuplicateGraph::from_edges([edge("b", "c"), edge("d", "e")]);
        let g3 = DuplicateGraph::from_edges([edge("e", "a")]);

        let forward = g1.clone().merge(g2.clone()).merge(g3.clone());
        let backward = g3.merge(g1).merge(g2);
        assert_eq!(forward, backward);
        assert_eq!(forward.components(), vec![set(&["a", "b", "c", "d", "e"])]);
    }

    #[test]
    fn test_empty_graph() {
        assert!(DuplicateGraph::new().components().is_empty());
    }
}
