//! Variable-order heuristics over the formula's apparent variables.
//!
//! Heuristics are addressed by signed integer codes: dispatch is by the
//! absolute value, and a negative code requests the reverse of the
//! computed order. Codes 1..=7 operate on the CNF's primal graph; the
//! tree-derived codes 8..=9 are implemented by
//! [`crate::join::JoinNonterminal`].

use std::collections::BTreeMap;

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::cnf::Cnf;
use crate::graph::Label;

pub const RANDOM: i64 = 1;
pub const DECLARED: i64 = 2;
pub const MOST_CLAUSES: i64 = 3;
pub const MINFILL: i64 = 4;
pub const MCS: i64 = 5;
pub const LEXP: i64 = 6;
pub const LEXM: i64 = 7;
pub const BIGGEST_NODE: i64 = 8;
pub const HIGHEST_NODE: i64 = 9;

pub const CNF_VAR_ORDER_HEURISTICS: [(i64, &str); 7] = [
    (RANDOM, "RANDOM"),
    (DECLARED, "DECLARED"),
    (MOST_CLAUSES, "MOST_CLAUSES"),
    (MINFILL, "MINFILL"),
    (MCS, "MCS"),
    (LEXP, "LEXP"),
    (LEXM, "LEXM"),
];

pub const JOIN_TREE_VAR_ORDER_HEURISTICS: [(i64, &str); 2] =
    [(BIGGEST_NODE, "BIGGEST_NODE"), (HIGHEST_NODE, "HIGHEST_NODE")];

/// Whether `code` names one of the CNF heuristics (as opposed to a
/// tree-derived one).
#[must_use]
pub fn is_cnf_heuristic(code: i64) -> bool {
    (RANDOM..=LEXM).contains(&code.abs())
}

#[must_use]
pub fn heuristic_name(code: i64) -> Option<&'static str> {
    CNF_VAR_ORDER_HEURISTICS
        .iter()
        .chain(JOIN_TREE_VAR_ORDER_HEURISTICS.iter())
        .find(|(candidate, _)| *candidate == code.abs())
        .map(|(_, name)| *name)
}

/// One-line summary of every heuristic code, for CLI help text.
#[must_use]
pub fn help_var_order_heuristics() -> String {
    let entries: Vec<String> = CNF_VAR_ORDER_HEURISTICS
        .iter()
        .chain(JOIN_TREE_VAR_ORDER_HEURISTICS.iter())
        .map(|(code, name)| format!("{code}/{name}"))
        .collect();
    format!(
        "var order: {} (negative for inverse order)",
        entries.join(", ")
    )
}

impl Cnf {
    /// Uniform shuffle of the apparent variables, reproducible for a given
    /// [`Config::random_seed`](crate::config::Config).
    #[must_use]
    pub fn random_var_order(&self) -> Vec<i64> {
        let mut order: Vec<i64> = self.apparent_vars.iter().copied().collect();
        let mut rng = ChaCha8Rng::seed_from_u64(self.config.random_seed);
        order.shuffle(&mut rng);
        order
    }

    /// Ascending declaration order, restricted to apparent variables.
    #[must_use]
    pub fn declared_var_order(&self) -> Vec<i64> {
        (1..=self.declared_var_count)
            .filter(|var| self.apparent_vars.contains(var))
            .collect()
    }

    /// Descending clause count; ties broken by descending variable id.
    #[must_use]
    pub fn most_clauses_var_order(&self) -> Vec<i64> {
        let mut counted: Vec<(usize, i64)> = self
            .var_to_clauses
            .iter()
            .map(|(&var, clauses)| (clauses.len(), var))
            .collect();
        counted.sort_unstable_by(|a, b| b.cmp(a));
        counted.into_iter().map(|(_, var)| var).collect()
    }

    /// Repeatedly eliminate the vertex with the fewest fill-in edges from
    /// the primal graph.
    #[must_use]
    pub fn minfill_var_order(&self) -> Vec<i64> {
        let mut graph = self.primal_graph();
        let mut order = Vec::new();
        while let Ok(vertex) = graph.min_fill_vertex() {
            graph.fill_in_edges(vertex);
            graph.remove_vertex(vertex);
            order.push(vertex);
        }
        order
    }

    /// Maximum-cardinality search: after an arbitrary start, always emit
    /// the unranked vertex with the most already-ranked neighbours.
    #[must_use]
    pub fn mcs_var_order(&self) -> Vec<i64> {
        let graph = self.primal_graph();
        let mut vertices = graph.vertices().iter().copied();
        let Some(start) = vertices.next() else {
            return Vec::new();
        };
        let mut ranked_neighbor_counts: BTreeMap<i64, i64> =
            vertices.map(|v| (v, 0)).collect();

        let mut best = start;
        let mut order = Vec::new();
        loop {
            order.push(best);
            ranked_neighbor_counts.remove(&best);
            for &neighbor in graph.neighbors(best) {
                if let Some(count) = ranked_neighbor_counts.get_mut(&neighbor) {
                    *count += 1;
                }
            }

            let mut next: Option<(i64, i64)> = None;
            for (&vertex, &count) in &ranked_neighbor_counts {
                if next.is_none_or(|(_, best_count)| count > best_count) {
                    next = Some((vertex, count));
                }
            }
            match next {
                Some((vertex, _)) => best = vertex,
                None => return order,
            }
        }
    }

    /// Lexicographic BFS: numbers run from `|V|` down to `1`; each step
    /// emits the unnumbered vertex with the lexicographically largest label
    /// and appends the current number to its unnumbered neighbours' labels.
    #[must_use]
    pub fn lexp_var_order(&self) -> Vec<i64> {
        let graph = self.primal_graph();
        let mut unnumbered: BTreeMap<i64, Label> = self
            .apparent_vars
            .iter()
            .map(|&v| (v, Label::default()))
            .collect();

        let mut numbered = Vec::new();
        for number in (1..=self.apparent_vars.len() as i64).rev() {
            let Some(vertex) = max_label_vertex(&unnumbered) else {
                break;
            };
            numbered.push(vertex);
            unnumbered.remove(&vertex);
            for &neighbor in graph.neighbors(vertex) {
                if let Some(label) = unnumbered.get_mut(&neighbor) {
                    label.add_number(number);
                }
            }
        }
        numbered
    }

    /// LEX-M: like LEX-P, but a neighbourhood update reaches every
    /// unnumbered `w` connected to the emitted vertex by a path through
    /// unnumbered vertices whose labels are strictly below `w`'s.
    #[must_use]
    pub fn lexm_var_order(&self) -> Vec<i64> {
        let graph = self.primal_graph();
        let mut unnumbered: BTreeMap<i64, Label> = self
            .apparent_vars
            .iter()
            .map(|&v| (v, Label::default()))
            .collect();

        let mut numbered = Vec::new();
        for i in (1..=self.apparent_vars.len() as i64).rev() {
            let Some(v) = max_label_vertex(&unnumbered) else {
                break;
            };
            numbered.push(v);
            unnumbered.remove(&v);

            let candidates: Vec<i64> = unnumbered.keys().copied().collect();
            for w in candidates {
                let w_label = unnumbered[&w].clone();

                // Restrict the path test to v, w, and the unnumbered
                // vertices with labels below w's.
                let mut subgraph = graph.clone();
                for &u in graph.vertices() {
                    let keep = u == v
                        || u == w
                        || unnumbered.get(&u).is_some_and(|label| *label < w_label);
                    if !keep {
                        subgraph.remove_vertex(u);
                    }
                }

                if subgraph.has_path(v, w) {
                    if let Some(label) = unnumbered.get_mut(&w) {
                        label.add_number(i);
                    }
                }
            }
        }
        numbered
    }

    /// Dispatch by the absolute value of `heuristic`; a negative code
    /// reverses the order.
    ///
    /// # Panics
    ///
    /// Panics when the absolute value is not one of the CNF heuristic
    /// codes; passing one is a programming error.
    #[must_use]
    pub fn cnf_var_order(&self, heuristic: i64) -> Vec<i64> {
        let mut order = match heuristic.abs() {
            RANDOM => self.random_var_order(),
            DECLARED => self.declared_var_order(),
            MOST_CLAUSES => self.most_clauses_var_order(),
            MINFILL => self.minfill_var_order(),
            MCS => self.mcs_var_order(),
            LEXP => self.lexp_var_order(),
            code => {
                assert_eq!(code, LEXM, "unknown cnf var order heuristic {heuristic}");
                self.lexm_var_order()
            }
        };
        if heuristic < 0 {
            order.reverse();
        }
        tracing::debug!(heuristic, ?order, "computed cnf var order");
        order
    }
}

/// The unnumbered vertex with the lexicographically largest label; ties go
/// to the first vertex in ascending order.
fn max_label_vertex(unnumbered: &BTreeMap<i64, Label>) -> Option<i64> {
    let mut best: Option<(i64, &Label)> = None;
    for (&vertex, label) in unnumbered {
        if best.is_none_or(|(_, best_label)| label > best_label) {
            best = Some((vertex, label));
        }
    }
    best.map(|(vertex, _)| vertex)
}

#[cfg(test)]
mod test {
    use std::collections::BTreeSet;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::config::Config;

    fn cnf_from(input: &str) -> Cnf {
        Cnf::from_reader(input.as_bytes(), &Config::default()).unwrap()
    }

    /// Primal graph: triangle 1-2-3 with tail 3-4.
    fn diamond_with_tail() -> Cnf {
        cnf_from("p cnf 4 4\n1 2 0\n1 3 0\n2 3 0\n3 4 0\n")
    }

    /// Primal graph: 4-cycle 1-2-3-4-1.
    fn four_cycle() -> Cnf {
        cnf_from("p cnf 4 4\n1 2 0\n2 3 0\n3 4 0\n1 4 0\n")
    }

    #[test]
    fn every_heuristic_covers_apparent_vars() {
        let cnf = diamond_with_tail();
        let apparent: BTreeSet<i64> = cnf.apparent_vars().clone();

        for code in RANDOM..=LEXM {
            let order = cnf.cnf_var_order(code);
            assert_eq!(order.len(), apparent.len(), "code {code}");
            assert_eq!(
                order.iter().copied().collect::<BTreeSet<_>>(),
                apparent,
                "code {code}"
            );
        }
    }

    #[test]
    fn negative_codes_reverse() {
        let cnf = diamond_with_tail();
        for code in RANDOM..=LEXM {
            let mut reversed = cnf.cnf_var_order(code);
            reversed.reverse();
            assert_eq!(cnf.cnf_var_order(-code), reversed, "code {code}");
        }
    }

    #[test]
    fn random_order_is_reproducible() {
        let config = Config::builder().random_seed(7).build();
        let cnf =
            Cnf::from_reader("p cnf 4 4\n1 2 0\n1 3 0\n2 3 0\n3 4 0\n".as_bytes(), &config)
                .unwrap();
        assert_eq!(cnf.random_var_order(), cnf.random_var_order());
    }

    #[test]
    fn declared_order_skips_missing_vars() {
        let cnf = cnf_from("p cnf 5 2\n1 3 0\n3 5 0\n");
        assert_eq!(cnf.declared_var_order(), vec![1, 3, 5]);
    }

    #[test]
    fn most_clauses_breaks_ties_by_descending_var() {
        let cnf = diamond_with_tail();
        // Clause counts: 3 -> 3; 1, 2 -> 2; 4 -> 1.
        assert_eq!(cnf.most_clauses_var_order(), vec![3, 2, 1, 4]);
    }

    #[test]
    fn minfill_prefers_zero_fill_vertices() {
        let cnf = diamond_with_tail();
        assert_eq!(cnf.minfill_var_order(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn mcs_follows_ranked_neighbor_counts() {
        let cnf = diamond_with_tail();
        assert_eq!(cnf.mcs_var_order(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn lexp_emits_each_vertex_once() {
        let cnf = four_cycle();
        let order = cnf.lexp_var_order();

        assert_eq!(order.len(), 4);
        assert_eq!(
            order.iter().copied().collect::<BTreeSet<_>>(),
            cnf.apparent_vars().clone()
        );
    }

    #[test]
    fn lexm_on_a_path() {
        let cnf = cnf_from("p cnf 3 2\n1 2 0\n2 3 0\n");
        assert_eq!(cnf.lexm_var_order(), vec![1, 2, 3]);
    }

    #[test]
    fn heuristic_names() {
        assert_eq!(heuristic_name(MINFILL), Some("MINFILL"));
        assert_eq!(heuristic_name(-LEXM), Some("LEXM"));
        assert_eq!(heuristic_name(42), None);
        assert!(is_cnf_heuristic(-MCS));
        assert!(!is_cnf_heuristic(BIGGEST_NODE));
    }
}
