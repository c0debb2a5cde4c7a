//! Prefix-compressing insertion.

use crate::trie::node::{Edge, Node, NodeId, ROOT};
use crate::trie::types::{PruningTrie, INLINE_PATH_DEPTH};
use prune_types::TermError;
use smallvec::SmallVec;

/// Where the term ended up.
enum Placement {
    /// The term already had a node holding `previous`; its score was updated.
    Existing { previous: f64 },
    /// A node was created for the term.
    Created,
}

impl PruningTrie {
    /// Threads `term` into the trie, adding `delta` to its score.
    ///
    /// Walks down from the root following the single edge that shares a
    /// first char with the remaining suffix. Four cases end the walk:
    ///
    /// ```text
    /// existing   new            action
    /// flower     flower         add delta to the existing node
    /// flower     flow           split: "flow" (delta) -> "er" -> old node
    /// flower     flowchart      split: "flow" (0) -> {"er" -> old, "chart" -> leaf}
    /// (none)     flowchart      append leaf "flowchart"
    /// ```
    ///
    /// When the edge is a strict prefix of the suffix (`flower` vs
    /// `flower power`) the walk descends with the suffix shortened.
    ///
    /// The ancestors visited on the way down are collected and their caches
    /// and edge order refreshed once at the end.
    ///
    /// The caller validates `term` and `delta`. Label storage is claimed
    /// before any node is touched, so an error leaves the trie unchanged.
    pub(crate) fn insert_term(&mut self, term: &str, delta: f64) -> Result<(), TermError> {
        let mut path: SmallVec<[NodeId; INLINE_PATH_DEPTH]> = SmallVec::new();
        let mut parent = ROOT;
        let mut rest = term;

        let placement = loop {
            path.push(parent);
            let lead = lead_char(rest);

            let Some(index) = self.nodes[parent].find_edge(lead) else {
                let label = self.labels.push(rest).ok_or(TermError::CapacityExceeded)?;
                let leaf = self.nodes.alloc(Node::with_score(delta));
                self.nodes.add_child(parent, Edge::new(label, lead, leaf));
                break Placement::Created;
            };

            let edge = self.nodes[parent].edges[index];
            let key = self.labels.get(edge.label);
            let shared = shared_prefix_len(rest, key);
            let child = edge.node;

            if shared == key.len() {
                if shared == rest.len() {
                    let node = self.nodes.get_mut(child);
                    let previous = node.score();
                    node.add_to_score(delta);
                    break Placement::Existing { previous };
                }
                parent = child;
                rest = &rest[shared..];
                continue;
            }

            let (head, tail) = edge.label.split_at(shared);
            let tail_lead = lead_char(&key[shared..]);

            if shared == rest.len() {
                let mid = self.nodes.alloc(Node::with_score(delta));
                self.nodes.add_child(mid, Edge::new(tail, tail_lead, child));
                self.nodes.refresh_max(mid);
                self.nodes.replace_child(parent, index, Edge::new(head, lead, mid));
                break Placement::Created;
            }

            let suffix = &rest[shared..];
            let label = self.labels.push(suffix).ok_or(TermError::CapacityExceeded)?;
            let leaf = self.nodes.alloc(Node::with_score(delta));
            let mid = self.nodes.alloc(Node::with_score(0.0));
            self.nodes.add_child(mid, Edge::new(tail, tail_lead, child));
            self.nodes
                .add_child(mid, Edge::new(label, lead_char(suffix), leaf));
            self.nodes.refresh_max(mid);
            self.nodes.replace_child(parent, index, Edge::new(head, lead, mid));
            break Placement::Created;
        };

        // A term counts when its node is created, or when it reaches an
        // existing node whose score was still 0. The count never goes down.
        let first_score = match placement {
            Placement::Created => true,
            Placement::Existing { previous } => previous == 0.0,
        };
        if first_score {
            self.term_count += 1;
        }

        self.refresh_path(&path);
        self.inserts_applied += 1;
        Ok(())
    }

    /// Recomputes caches bottom-up along `path` and restores each
    /// ancestor's edge order. Stops as soon as a cache comes out unchanged,
    /// since nothing above it can have moved.
    fn refresh_path(&mut self, path: &[NodeId]) {
        for &id in path.iter().rev() {
            let before = self.nodes[id].max_descendant_score();
            let after = self.nodes.refresh_max(id);
            self.nodes.restore_order(id);
            if after == before {
                break;
            }
        }
    }
}

/// Length in bytes of the longest common prefix of `a` and `b`, rounded
/// down to a char boundary.
#[inline]
pub(crate) fn shared_prefix_len(a: &str, b: &str) -> usize {
    let mut len = a
        .bytes()
        .zip(b.bytes())
        .take_while(|(x, y)| x == y)
        .count();
    while !a.is_char_boundary(len) {
        len -= 1;
    }
    len
}

/// First char of a non-empty string.
#[inline(always)]
fn lead_char(s: &str) -> char {
    debug_assert!(!s.is_empty());
    s.chars().next().unwrap_or_default()
}
