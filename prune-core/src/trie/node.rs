//! Trie nodes and the node arena.

use crate::arena::Span;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

/// Index of a node in the arena.
pub type NodeId = u32;

/// The root node. It represents the empty string and never carries a score.
pub(crate) const ROOT: NodeId = 0;

/// Outgoing edge of a node.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Edge {
    pub label: Span,
    /// First char of the label. Siblings never share one.
    pub lead: char,
    pub node: NodeId,
}

impl Edge {
    #[inline(always)]
    pub fn new(label: Span, lead: char, node: NodeId) -> Self {
        debug_assert!(!label.is_empty(), "edge labels are never empty");
        Self { label, lead, node }
    }
}

/// A vertex of the compressed trie.
///
/// The term a node stands for is the concatenation of the edge labels on
/// the path from the root.
#[derive(Debug, Default)]
pub struct Node {
    score: f64,
    max_descendant: f64,
    /// Sorted by descending child `max_descendant`, stable.
    pub(crate) edges: SmallVec<[Edge; 2]>,
    /// First char of each label -> position in `edges`.
    index: FxHashMap<char, u32>,
}

impl Node {
    /// A node with the given own score and no children.
    #[inline]
    pub(crate) fn with_score(score: f64) -> Self {
        Self {
            score,
            ..Self::default()
        }
    }

    /// Sum of all scores inserted for the term ending at this node.
    #[inline(always)]
    pub fn score(&self) -> f64 {
        self.score
    }

    /// Highest score of any terminal strictly below this node, 0 if none.
    #[inline(always)]
    pub fn max_descendant_score(&self) -> f64 {
        self.max_descendant
    }

    /// A node is terminal once its accumulated score is positive.
    #[inline(always)]
    pub fn is_terminal(&self) -> bool {
        self.score > 0.0
    }

    #[inline(always)]
    pub fn has_children(&self) -> bool {
        !self.edges.is_empty()
    }

    /// Number of outgoing edges.
    #[inline(always)]
    pub fn num_children(&self) -> usize {
        self.edges.len()
    }

    #[inline(always)]
    pub(crate) fn add_to_score(&mut self, delta: f64) {
        self.score += delta;
    }

    #[cfg(test)]
    pub(crate) fn set_max_descendant(&mut self, value: f64) {
        self.max_descendant = value;
    }

    /// Position of the edge whose label starts with `lead`.
    #[inline(always)]
    pub(crate) fn find_edge(&self, lead: char) -> Option<usize> {
        self.index.get(&lead).map(|&i| i as usize)
    }

    fn reindex(&mut self) {
        self.index.clear();
        for (i, edge) in self.edges.iter().enumerate() {
            self.index.insert(edge.lead, i as u32);
        }
    }
}

/// Arena owning every node of a trie. Nodes are never freed.
pub(crate) struct Nodes {
    nodes: Vec<Node>,
}

impl Nodes {
    /// Creates an arena holding only the root.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut nodes = Vec::with_capacity(capacity.max(1));
        nodes.push(Node::default());
        Self { nodes }
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Drops every node except a fresh root.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.nodes.push(Node::default());
    }

    #[inline]
    pub fn alloc(&mut self, node: Node) -> NodeId {
        let id = self.nodes.len() as NodeId;
        self.nodes.push(node);
        id
    }

    #[inline(always)]
    pub fn get_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id as usize]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    /// Appends an edge to `parent`, then restores the edge order.
    pub fn add_child(&mut self, parent: NodeId, edge: Edge) {
        let node = self.get_mut(parent);
        node.index.insert(edge.lead, node.edges.len() as u32);
        node.edges.push(edge);
        self.restore_order(parent);
    }

    /// Overwrites the edge at `index` of `parent`, then restores the edge
    /// order. The new label must start with the same char as the old one.
    pub fn replace_child(&mut self, parent: NodeId, index: usize, edge: Edge) {
        let node = self.get_mut(parent);
        debug_assert_eq!(node.edges[index].lead, edge.lead);
        node.edges[index] = edge;
        self.restore_order(parent);
    }

    /// Stable sort of `parent`'s edges by descending child cache. A no-op
    /// when the edges are already in order.
    pub fn restore_order(&mut self, parent: NodeId) {
        let cache = |nodes: &[Node], e: &Edge| nodes[e.node as usize].max_descendant;
        let edges = &self[parent].edges;
        if edges
            .windows(2)
            .all(|w| cache(&self.nodes, &w[0]) >= cache(&self.nodes, &w[1]))
        {
            return;
        }

        let mut edges = std::mem::take(&mut self.get_mut(parent).edges);
        edges.sort_by(|a, b| cache(&self.nodes, b).total_cmp(&cache(&self.nodes, a)));

        let node = self.get_mut(parent);
        node.edges = edges;
        node.reindex();
    }

    /// Recomputes `id`'s cache from its children.
    ///
    /// Returns the new value.
    pub fn refresh_max(&mut self, id: NodeId) -> f64 {
        let max = self[id].edges.iter().fold(0.0_f64, |acc, edge| {
            let child = &self[edge.node];
            acc.max(child.score).max(child.max_descendant)
        });
        self.get_mut(id).max_descendant = max;
        max
    }
}

impl core::ops::Index<NodeId> for Nodes {
    type Output = Node;

    #[inline(always)]
    fn index(&self, id: NodeId) -> &Node {
        &self.nodes[id as usize]
    }
}
