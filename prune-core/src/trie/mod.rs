//! Score-pruned radix trie.
//!
//! Stores scored terms in a radix-compressed prefix tree and answers
//! "best `k` terms starting with this prefix" without visiting every
//! matching term.
//!
//! Memory Layout:
//! - Nodes live in a single arena and refer to each other by `u32` id
//! - Edge labels are spans into one contiguous text buffer; splitting an
//!   edge splits its span and copies nothing
//!
//! Structure:
//! - Sibling labels never share a first char, so each step down the trie
//!   follows at most one edge (looked up through a per-node char index)
//! - Every node caches the best score found strictly below it, and keeps
//!   its edges sorted by that cache, highest first
//!
//! Threading:
//! - Inserts take `&mut self` and queries take `&self`, so any number of
//!   threads may query a trie that is no longer being written.

mod api;
mod insert;
pub mod node;
pub mod policy;
pub mod search;
mod stats;
mod types;

pub use node::{Node, NodeId};
pub use policy::{Exhaustive, PruningPolicy, ScorePruning};
pub use search::TopK;
pub use stats::TrieStats;
pub use types::{PruningTrie, TrieMetrics};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trie::insert::shared_prefix_len;
    use crate::trie::node::ROOT;
    use prune_types::Entry;
    use rustc_hash::FxHashMap;

    const BASE_TERMS: [(&str, f64); 12] = [
        ("flower power", 1000.0),
        ("funky", 90.0),
        ("flawless", 98.0),
        ("fancy", 84.0),
        ("flower", 40.0),
        ("flaw", 79.0),
        ("flowchart", 17.0),
        ("flaky", 10.0),
        ("flower power", 337.0),
        ("funky", 6.0),
        ("flower", 5.0),
        ("flaky", 2.0),
    ];

    fn base_trie() -> PruningTrie {
        let mut trie = PruningTrie::new();
        for (term, score) in BASE_TERMS {
            trie.insert(term, score).expect("should insert");
        }
        trie
    }

    fn node_for<'a>(trie: &'a PruningTrie, term: &str) -> &'a Node {
        let (id, _) = trie.locate(term).expect("term should have a node");
        &trie.nodes[id]
    }

    fn child_labels<'a>(trie: &'a PruningTrie, node: &Node) -> Vec<&'a str> {
        node.edges.iter().map(|e| trie.labels.get(e.label)).collect()
    }

    fn subtree_max(trie: &PruningTrie, id: NodeId) -> f64 {
        trie.nodes[id].edges.iter().fold(0.0_f64, |acc, edge| {
            let child = &trie.nodes[edge.node];
            let own = if child.is_terminal() { child.score() } else { 0.0 };
            acc.max(own).max(subtree_max(trie, edge.node))
        })
    }

    /// Walks the whole trie and checks every structural invariant.
    fn check_invariants(trie: &PruningTrie) {
        assert_eq!(trie.nodes[ROOT].score(), 0.0, "root never carries a score");

        let mut terminals = 0;
        let mut stack = vec![ROOT];
        while let Some(id) = stack.pop() {
            let node = &trie.nodes[id];
            if node.is_terminal() {
                terminals += 1;
            }

            let labels = child_labels(trie, node);
            for (i, (edge, label)) in node.edges.iter().zip(&labels).enumerate() {
                assert!(!label.is_empty(), "edge labels are never empty");
                assert_eq!(label.chars().next(), Some(edge.lead));
                assert_eq!(node.find_edge(edge.lead), Some(i), "char index out of sync");
                for other in &labels[i + 1..] {
                    assert_eq!(
                        shared_prefix_len(label, other),
                        0,
                        "siblings {label:?} and {other:?} share a prefix"
                    );
                }
            }

            assert_eq!(
                node.max_descendant_score(),
                subtree_max(trie, id),
                "stale cache below {labels:?}"
            );

            for w in node.edges.windows(2) {
                assert!(
                    trie.nodes[w[0].node].max_descendant_score()
                        >= trie.nodes[w[1].node].max_descendant_score(),
                    "edges must be sorted by descending cache"
                );
            }

            stack.extend(node.edges.iter().map(|e| e.node));
        }

        assert!(terminals <= trie.len(), "live terms missing from the count");
    }

    fn terms(results: &[Entry]) -> Vec<&str> {
        results.iter().map(|e| e.term.as_str()).collect()
    }

    #[test]
    fn structure_after_split() {
        let mut trie = PruningTrie::new();
        trie.insert("flower power", 20.0).expect("should insert");
        trie.insert("flower power 123", 140.0).expect("should insert");
        trie.insert("flowchart", 40.0).expect("should insert");
        check_invariants(&trie);

        let flow = node_for(&trie, "flow");
        assert!(!flow.is_terminal());
        assert_eq!(flow.max_descendant_score(), 140.0);
        assert_eq!(child_labels(&trie, flow), vec!["er power", "chart"]);
    }

    #[test]
    fn duplicate_insert_sums_score() {
        let mut trie = PruningTrie::new();
        trie.insert("flower", 42.0).expect("should insert");
        trie.insert("flower", 20.0).expect("should insert");

        assert_eq!(trie.get("flower"), Some(62.0));
        assert_eq!(trie.len(), 1);
        check_invariants(&trie);
    }

    #[test]
    fn prefix_term_becomes_terminal() {
        let mut trie = PruningTrie::new();
        trie.insert("flower power", 140.0).expect("should insert");
        trie.insert("flower power 123", 40.0).expect("should insert");
        assert_eq!(trie.len(), 2);

        trie.insert("flower", 20.0).expect("should insert");
        assert!(node_for(&trie, "flower").is_terminal());
        assert_eq!(trie.len(), 3);
        check_invariants(&trie);
    }

    #[test]
    fn additivity_matches_single_insert() {
        let mut twice = PruningTrie::new();
        twice.insert("flower", 15.0).expect("should insert");
        twice.insert("flowchart", 3.0).expect("should insert");
        twice.insert("flower", 27.0).expect("should insert");

        let mut once = PruningTrie::new();
        once.insert("flower", 42.0).expect("should insert");
        once.insert("flowchart", 3.0).expect("should insert");

        assert_eq!(twice.get("flower"), once.get("flower"));
        assert_eq!(twice.len(), once.len());
        assert_eq!(twice.top_k("", 10), once.top_k("", 10));
    }

    #[test]
    fn equal_scores_keep_insertion_order() {
        let mut trie = PruningTrie::new();
        trie.insert("flower power", 10.0).expect("should insert");
        for n in 1..=4 {
            trie.insert(&format!("flower power {n}"), 40.0)
                .expect("should insert");
        }

        let results = trie.top_k("flower power ", 10);
        assert_eq!(
            results,
            vec![
                Entry::new("flower power 1", 40.0),
                Entry::new("flower power 2", 40.0),
                Entry::new("flower power 3", 40.0),
                Entry::new("flower power 4", 40.0),
            ]
        );

        let mut trie = PruningTrie::new();
        trie.insert("flower power", 10.0).expect("should insert");
        for n in (1..=4).rev() {
            trie.insert(&format!("flower power {n}"), 40.0)
                .expect("should insert");
        }

        let results = trie.top_k("flower power ", 10);
        assert_eq!(
            terms(&results),
            vec!["flower power 4", "flower power 3", "flower power 2", "flower power 1"]
        );
    }

    #[test]
    fn top_k_returns_only_k() {
        let trie = base_trie();
        check_invariants(&trie);

        let results = trie.top_k("f", 5);
        assert_eq!(
            results,
            vec![
                Entry::new("flower power", 1337.0),
                Entry::new("flawless", 98.0),
                Entry::new("funky", 96.0),
                Entry::new("fancy", 84.0),
                Entry::new("flaw", 79.0),
            ]
        );
    }

    #[test]
    fn top_k_returns_all_terms() {
        let trie = base_trie();
        assert_eq!(trie.len(), 8);

        let results = trie.top_k("f", 200);
        assert_eq!(
            terms(&results),
            vec![
                "flower power",
                "flawless",
                "funky",
                "fancy",
                "flaw",
                "flower",
                "flowchart",
                "flaky"
            ]
        );
        assert_eq!(trie.top_k("", 200), results);
    }

    #[test]
    fn top_k_long_prefix() {
        let trie = base_trie();
        assert_eq!(
            trie.top_k("flower", 2),
            vec![Entry::new("flower power", 1337.0), Entry::new("flower", 45.0)]
        );
    }

    #[test]
    fn top_k_missing_prefix() {
        let trie = base_trie();
        assert!(trie.top_k("not in the trie", 2).is_empty());
        assert!(trie.top_k("flowering", 2).is_empty());
    }

    #[test]
    fn top_k_zero_does_not_walk() {
        let trie = base_trie();
        assert!(trie.top_k("foo", 0).is_empty());
        assert!(trie.top_k("f", 0).is_empty());
        assert!(trie.top_k_with("f", 0, &Exhaustive).is_empty());
    }

    #[test]
    fn non_positive_scores_are_branch_points() {
        let mut trie = PruningTrie::new();
        trie.insert("flower", 7.0).expect("should insert");
        trie.insert("flowchart", -3.0).expect("should insert");

        // Both leaves were created, only one can be returned
        assert_eq!(trie.len(), 2);
        assert!(!trie.contains("flowchart"));
        assert_eq!(trie.top_k("flow", 10), vec![Entry::new("flower", 7.0)]);
        check_invariants(&trie);

        // The split point had score 0, so its first insert counts
        trie.insert("flow", 2.0).expect("should insert");
        assert_eq!(trie.len(), 3);
        assert_eq!(terms(&trie.top_k("flow", 10)), vec!["flower", "flow"]);

        // Already counted when created with a negative score
        trie.insert("flowchart", 5.0).expect("should insert");
        assert_eq!(trie.len(), 3);
        assert_eq!(
            terms(&trie.top_k("flow", 10)),
            vec!["flower", "flow", "flowchart"]
        );
        check_invariants(&trie);
    }

    #[test]
    fn negative_delta_refreshes_caches() {
        let mut trie = PruningTrie::new();
        trie.insert("apple", 50.0).expect("should insert");
        trie.insert("apricot", 30.0).expect("should insert");
        trie.insert("banana", 40.0).expect("should insert");
        check_invariants(&trie);

        trie.insert("apple", -45.0).expect("should insert");
        check_invariants(&trie);
        assert_eq!(node_for(&trie, "ap").max_descendant_score(), 30.0);
        assert_eq!(terms(&trie.top_k("", 1)), vec!["banana"]);

        trie.insert("apple", -5.0).expect("should insert");
        check_invariants(&trie);
        assert_eq!(trie.len(), 3);
        assert!(!trie.contains("apple"));
    }

    #[test]
    fn count_survives_negative_delta() {
        let mut trie = PruningTrie::new();
        trie.insert("apple", 50.0).expect("should insert");
        trie.insert("banana", 10.0).expect("should insert");
        assert_eq!(trie.len(), 2);

        trie.insert("apple", -60.0).expect("should insert");
        assert_eq!(trie.len(), 2);
        assert_eq!(trie.get("apple"), None);
        assert_eq!(trie.top_k("", 10), vec![Entry::new("banana", 10.0)]);

        trie.insert("apple", 20.0).expect("should insert");
        assert_eq!(trie.len(), 2);
        assert_eq!(trie.metrics().term_count, 2);
        assert_eq!(trie.get("apple"), Some(10.0));
        check_invariants(&trie);
    }

    #[test]
    fn ancestors_resort_when_cache_rises() {
        let mut trie = PruningTrie::new();
        trie.insert("alpha", 10.0).expect("should insert");
        trie.insert("alps", 5.0).expect("should insert");
        trie.insert("beta", 1.0).expect("should insert");
        trie.insert("betamax", 2.0).expect("should insert");

        let root_labels = child_labels(&trie, &trie.nodes[ROOT]);
        assert_eq!(root_labels, vec!["alp", "beta"]);

        trie.insert("betamax", 100.0).expect("should insert");
        check_invariants(&trie);
        let root_labels = child_labels(&trie, &trie.nodes[ROOT]);
        assert_eq!(root_labels, vec!["beta", "alp"]);
    }

    /// Small deterministic generator so workloads are reproducible.
    struct Lcg(u64);

    impl Lcg {
        fn next(&mut self) -> u64 {
            self.0 = self
                .0
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            self.0 >> 33
        }

        fn term(&mut self) -> String {
            const ALPHABET: [char; 5] = ['a', 'b', 'c', ' ', 'é'];
            let len = 1 + self.next() % 7;
            (0..len)
                .map(|_| ALPHABET[(self.next() % ALPHABET.len() as u64) as usize])
                .collect()
        }
    }

    fn generated_workload(
        seed: u64,
        inserts: usize,
        min_score: f64,
    ) -> (PruningTrie, FxHashMap<String, f64>) {
        let mut rng = Lcg(seed);
        let mut trie = PruningTrie::new();
        let mut model: FxHashMap<String, f64> = FxHashMap::default();

        for _ in 0..inserts {
            let term = rng.term();
            let score = (rng.next() % 200) as f64 + min_score;
            trie.insert(&term, score).expect("should insert");
            *model.entry(term).or_insert(0.0) += score;
            check_invariants(&trie);
        }

        (trie, model)
    }

    #[test]
    fn invariants_hold_for_generated_workload() {
        for seed in [1, 7, 42] {
            // Mostly positive, some zero and negative deltas
            let (trie, model) = generated_workload(seed, 300, -20.0);
            let live = model.values().filter(|&&s| s > 0.0).count();
            assert!(trie.len() >= live);
            for (term, &score) in &model {
                let expected = (score > 0.0).then_some(score);
                assert_eq!(trie.get(term), expected, "score of {term:?}");
            }
        }
    }

    #[test]
    fn count_matches_distinct_terms_for_positive_workload() {
        for seed in [3, 11] {
            let (trie, model) = generated_workload(seed, 300, 1.0);
            assert_eq!(trie.len(), model.len());
            assert_eq!(trie.top_k("", usize::MAX).len(), model.len());
        }
    }

    #[test]
    fn pruned_matches_brute_force() {
        let (trie, model) = generated_workload(99, 400, -20.0);
        let prefixes = ["", "a", "b", "ab", "é", "a é", "c c", "ba", "zzz"];

        for prefix in prefixes {
            let mut expected: Vec<(&str, f64)> = model
                .iter()
                .filter(|(term, &score)| score > 0.0 && term.starts_with(prefix))
                .map(|(term, &score)| (term.as_str(), score))
                .collect();
            expected.sort_by(|a, b| b.1.total_cmp(&a.1));

            for k in [1, 3, 10, 1000] {
                let results = trie.top_k(prefix, k);
                let want: Vec<f64> = expected.iter().take(k).map(|e| e.1).collect();
                let got: Vec<f64> = results.iter().map(|e| e.score).collect();
                assert_eq!(got, want, "scores for prefix {prefix:?}, k={k}");

                for entry in &results {
                    assert!(entry.term.starts_with(prefix));
                    assert_eq!(model.get(&entry.term), Some(&entry.score));
                }

                let exhaustive = trie.top_k_with(prefix, k, &Exhaustive);
                assert_eq!(results, exhaustive, "prefix {prefix:?}, k={k}");
            }
        }
    }

    #[test]
    fn metrics_tracks_operations() {
        let mut trie = PruningTrie::new();

        let metrics = trie.metrics();
        assert_eq!(metrics.inserts_applied, 0);
        assert_eq!(metrics.queries_executed, 0);
        assert_eq!(metrics.term_count, 0);

        trie.insert("one", 1.0).expect("should insert");
        trie.insert("two", 2.0).expect("should insert");
        trie.insert("two", 2.0).expect("should insert");
        let _ = trie.insert("", 2.0);

        let metrics = trie.metrics();
        assert_eq!(metrics.inserts_applied, 3);
        assert_eq!(metrics.term_count, 2);

        trie.top_k("o", 10);
        trie.top_k("t", 10);
        trie.top_k("t", 0);
        assert_eq!(trie.metrics().queries_executed, 3);

        trie.clear();
        let metrics = trie.metrics();
        assert_eq!(metrics.inserts_applied, 0);
        assert_eq!(metrics.queries_executed, 0);
        assert_eq!(metrics.term_count, 0);
    }

    #[test]
    fn clear_resets() {
        let mut trie = base_trie();
        trie.clear();

        assert!(trie.is_empty());
        assert!(trie.top_k("", 10).is_empty());
        assert_eq!(trie.stats().num_nodes, 1);
        assert_eq!(trie.stats().label_bytes, 0);

        trie.insert("again", 1.0).expect("should insert");
        assert_eq!(trie.top_k("a", 10), vec![Entry::new("again", 1.0)]);
        check_invariants(&trie);
    }

    #[test]
    fn stats_describe_shape() {
        let mut trie = PruningTrie::new();
        trie.insert("flower power", 20.0).expect("should insert");
        trie.insert("flower power 123", 140.0).expect("should insert");
        trie.insert("flowchart", 40.0).expect("should insert");

        // root -> flow -> {er power -> " 123", chart}
        let stats = trie.stats();
        assert_eq!(stats.num_terms, 3);
        assert_eq!(stats.num_nodes, 5);
        assert_eq!(stats.num_edges, 4);
        assert_eq!(stats.max_depth, 3);
        assert_eq!(stats.label_bytes, "flower power 123chart".len());
        assert!(stats.memory_usage_bytes() > stats.label_bytes);
        assert!(format!("{stats}").contains("3 terms"));
    }

    #[test]
    fn trie_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PruningTrie>();
    }
}
