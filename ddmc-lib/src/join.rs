//! Join-tree nodes over clause-indexed terminals.
//!
//! Trees are strictly downward-pointing: a nonterminal owns its children,
//! and nothing points back up. Node numbering and the active formula live
//! on a [`JoinTreeBuilder`] rather than on the node types themselves, so
//! speculative construction is an explicit [`JoinTreeBuilder::save`] /
//! [`JoinTreeBuilder::restore`] pair instead of hidden global state.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::cnf::order::{self, BIGGEST_NODE, HIGHEST_NODE};
use crate::cnf::{Assignment, Cnf};
use crate::error::Error;
use crate::Result;

/// Cluster-assignment strategies used when planning the solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClusteringHeuristic {
    BucketList,
    BucketTree,
    BouquetList,
    BouquetTree,
}

/// A leaf identified 1-to-1 with a clause by index.
#[derive(Debug, Clone)]
pub struct JoinTerminal {
    node_index: usize,
    pre_projection_vars: BTreeSet<i64>,
}

/// An internal node carrying the variables eliminated at this point.
#[derive(Debug, Clone)]
pub struct JoinNonterminal {
    node_index: usize,
    children: Vec<JoinNode>,
    projection_vars: BTreeSet<i64>,
    pre_projection_vars: BTreeSet<i64>,
}

/// Either kind of join-tree node.
#[derive(Debug, Clone)]
pub enum JoinNode {
    Terminal(JoinTerminal),
    Nonterminal(JoinNonterminal),
}

impl From<JoinTerminal> for JoinNode {
    fn from(terminal: JoinTerminal) -> JoinNode {
        JoinNode::Terminal(terminal)
    }
}

impl From<JoinNonterminal> for JoinNode {
    fn from(nonterminal: JoinNonterminal) -> JoinNode {
        JoinNode::Nonterminal(nonterminal)
    }
}

impl JoinNode {
    #[must_use]
    pub fn node_index(&self) -> usize {
        match self {
            JoinNode::Terminal(terminal) => terminal.node_index,
            JoinNode::Nonterminal(nonterminal) => nonterminal.node_index,
        }
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, JoinNode::Terminal(_))
    }

    /// Variables entering the node: the clause's variables for a terminal,
    /// the union of the children's post-projection sets otherwise.
    #[must_use]
    pub fn pre_projection_vars(&self) -> &BTreeSet<i64> {
        match self {
            JoinNode::Terminal(terminal) => &terminal.pre_projection_vars,
            JoinNode::Nonterminal(nonterminal) => &nonterminal.pre_projection_vars,
        }
    }

    /// Variables remaining after the node's projection.
    #[must_use]
    pub fn post_projection_vars(&self) -> BTreeSet<i64> {
        match self {
            JoinNode::Terminal(terminal) => terminal.pre_projection_vars.clone(),
            JoinNode::Nonterminal(nonterminal) => nonterminal.post_projection_vars(),
        }
    }

    /// Largest count of unassigned pre-projection variables over this node
    /// and its descendants.
    #[must_use]
    pub fn width(&self, assignment: &Assignment) -> usize {
        let own = self
            .pre_projection_vars()
            .iter()
            .filter(|var| !assignment.contains_var(**var))
            .count();
        match self {
            JoinNode::Terminal(_) => own,
            JoinNode::Nonterminal(nonterminal) => nonterminal
                .children
                .iter()
                .fold(own, |width, child| width.max(child.width(assignment))),
        }
    }

    /// The cluster among `projectable_var_sets[cluster_index + 1..]` this
    /// node belongs to, or the special sink cluster `projectable_var_sets.len()`
    /// when its post-projection variables touch none of them.
    ///
    /// # Panics
    ///
    /// Panics when `cluster_index` is out of range; passing one is a
    /// programming error.
    #[must_use]
    pub fn choose_cluster_index(
        &self,
        cluster_index: usize,
        projectable_var_sets: &[BTreeSet<i64>],
        heuristic: ClusteringHeuristic,
    ) -> usize {
        assert!(
            cluster_index < projectable_var_sets.len(),
            "cluster index {cluster_index} out of range ({})",
            projectable_var_sets.len()
        );

        let post_projection_vars = self.post_projection_vars();
        let interacts = projectable_var_sets
            .iter()
            .any(|vars| !vars.is_disjoint(&post_projection_vars));
        if !interacts {
            return projectable_var_sets.len();
        }

        if matches!(
            heuristic,
            ClusteringHeuristic::BucketList | ClusteringHeuristic::BouquetList
        ) {
            return cluster_index + 1;
        }

        for target in cluster_index + 1..projectable_var_sets.len() {
            if !post_projection_vars.is_disjoint(&projectable_var_sets[target]) {
                return target;
            }
        }
        projectable_var_sets.len()
    }

    /// Minimum (bucket heuristics) or maximum (bouquet heuristics) rank of
    /// the node's post-projection variables under `restricted_var_order`;
    /// `restricted_var_order.len()` when they do not intersect.
    #[must_use]
    pub fn node_rank(
        &self,
        restricted_var_order: &[i64],
        heuristic: ClusteringHeuristic,
    ) -> usize {
        let post_projection_vars = self.post_projection_vars();
        let ranks = restricted_var_order
            .iter()
            .enumerate()
            .filter(|(_, var)| post_projection_vars.contains(*var))
            .map(|(rank, _)| rank);

        let rank = match heuristic {
            ClusteringHeuristic::BucketList | ClusteringHeuristic::BucketTree => ranks.min(),
            ClusteringHeuristic::BouquetList | ClusteringHeuristic::BouquetTree => ranks.max(),
        };
        rank.unwrap_or(restricted_var_order.len())
    }

    fn update_var_sizes(&self, var_sizes: &mut BTreeMap<i64, usize>) {
        match self {
            JoinNode::Terminal(terminal) => {
                record_var_sizes(&terminal.pre_projection_vars, var_sizes);
            }
            JoinNode::Nonterminal(nonterminal) => nonterminal.update_var_sizes(var_sizes),
        }
    }
}

fn record_var_sizes(pre_projection_vars: &BTreeSet<i64>, var_sizes: &mut BTreeMap<i64, usize>) {
    for &var in pre_projection_vars {
        let size = var_sizes.entry(var).or_default();
        *size = (*size).max(pre_projection_vars.len());
    }
}

impl JoinTerminal {
    #[must_use]
    pub fn node_index(&self) -> usize {
        self.node_index
    }

    #[must_use]
    pub fn pre_projection_vars(&self) -> &BTreeSet<i64> {
        &self.pre_projection_vars
    }
}

impl JoinNonterminal {
    #[must_use]
    pub fn node_index(&self) -> usize {
        self.node_index
    }

    #[must_use]
    pub fn children(&self) -> &[JoinNode] {
        &self.children
    }

    #[must_use]
    pub fn projection_vars(&self) -> &BTreeSet<i64> {
        &self.projection_vars
    }

    #[must_use]
    pub fn pre_projection_vars(&self) -> &BTreeSet<i64> {
        &self.pre_projection_vars
    }

    #[must_use]
    pub fn post_projection_vars(&self) -> BTreeSet<i64> {
        self.pre_projection_vars
            .difference(&self.projection_vars)
            .copied()
            .collect()
    }

    /// Print this node in the join-tree line format, 1-based.
    pub fn print_node(&self, start_word: &str) {
        print!("{start_word}{} ", self.node_index + 1);
        for child in &self.children {
            print!("{} ", child.node_index() + 1);
        }
        print!("e");
        for var in &self.projection_vars {
            print!(" {var}");
        }
        println!();
    }

    /// Print the whole subtree, children before parents.
    pub fn print_subtree(&self, start_word: &str) {
        for child in &self.children {
            if let JoinNode::Nonterminal(nonterminal) = child {
                nonterminal.print_subtree(start_word);
            }
        }
        self.print_node(start_word);
    }

    /// Variables in descending size of the biggest node containing them;
    /// ties broken by descending variable id.
    #[must_use]
    pub fn biggest_node_var_order(&self, cnf: &Cnf) -> Vec<i64> {
        let mut var_sizes: BTreeMap<i64, usize> =
            cnf.apparent_vars().iter().map(|&var| (var, 0)).collect();
        self.update_var_sizes(&mut var_sizes);

        let mut sized_vars: Vec<(usize, i64)> = var_sizes
            .into_iter()
            .map(|(var, size)| (size, var))
            .collect();
        sized_vars.sort_unstable_by(|a, b| b.cmp(a));

        if cnf.config().verbose_solving >= 2 {
            let mut previous_size = None;
            for &(size, var) in &sized_vars {
                if previous_size == Some(size) {
                    print!(" {var}");
                } else {
                    if previous_size.is_some() {
                        println!();
                    }
                    previous_size = Some(size);
                    print!("c vars in nodes of size {size:>5}: {var}");
                }
            }
            println!();
        }

        sized_vars.into_iter().map(|(_, var)| var).collect()
    }

    fn update_var_sizes(&self, var_sizes: &mut BTreeMap<i64, usize>) {
        record_var_sizes(&self.pre_projection_vars, var_sizes);
        for child in &self.children {
            child.update_var_sizes(var_sizes);
        }
    }

    /// Projection variables in breadth-first order from the root.
    #[must_use]
    pub fn highest_node_var_order(&self) -> Vec<i64> {
        let mut var_order = Vec::new();
        let mut queue = VecDeque::from([self]);
        while let Some(node) = queue.pop_front() {
            var_order.extend(node.projection_vars.iter().copied());
            for child in &node.children {
                if let JoinNode::Nonterminal(nonterminal) = child {
                    queue.push_back(nonterminal);
                }
            }
        }
        var_order
    }

    /// Dispatch a signed heuristic code: CNF codes go to
    /// [`Cnf::cnf_var_order`], tree codes are computed here. A negative
    /// code reverses the order.
    ///
    /// # Panics
    ///
    /// Panics when the absolute value is not a known heuristic code.
    #[must_use]
    pub fn var_order(&self, heuristic: i64, cnf: &Cnf) -> Vec<i64> {
        if order::is_cnf_heuristic(heuristic) {
            return cnf.cnf_var_order(heuristic);
        }

        let mut var_order = if heuristic.abs() == BIGGEST_NODE {
            self.biggest_node_var_order(cnf)
        } else {
            assert_eq!(
                heuristic.abs(),
                HIGHEST_NODE,
                "unknown var order heuristic {heuristic}"
            );
            self.highest_node_var_order()
        };
        if heuristic < 0 {
            var_order.reverse();
        }
        var_order
    }

    /// Enumerate `2^k` assignments over the first `k` additive variables of
    /// the chosen order. Returns the singleton empty assignment when
    /// `slice_var_count <= 0`.
    #[must_use]
    pub fn additive_assignments(
        &self,
        cnf: &Cnf,
        heuristic: i64,
        slice_var_count: i64,
    ) -> Vec<Assignment> {
        if slice_var_count <= 0 {
            return vec![Assignment::new()];
        }

        let var_order = self.var_order(heuristic, cnf);
        let mut assignments = Vec::new();
        let mut sliced_vars = Vec::new();
        for var in var_order {
            if sliced_vars.len() as i64 >= slice_var_count {
                break;
            }
            if cnf.additive_vars().contains(&var) {
                assignments = Assignment::extend_assignments(&assignments, var);
                sliced_vars.push(var);
            }
        }

        tracing::debug!(?sliced_vars, count = assignments.len(), "slice assignments");
        if cnf.config().verbose_solving >= 2 {
            print!("c slice var order: {{");
            for var in &sliced_vars {
                print!(" {var}");
            }
            println!(" }}");
        }
        assignments
    }
}

/// Owner of node numbering and the active formula during tree building.
///
/// Terminals receive indices `[0, terminal_count)` in clause order;
/// nonterminals take indices at or above the terminal range.
pub struct JoinTreeBuilder<'a> {
    cnf: &'a Cnf,
    node_count: usize,
    terminal_count: usize,
    nonterminal_indices: BTreeSet<usize>,
}

/// Counter state captured by [`JoinTreeBuilder::save`].
#[derive(Debug, Clone)]
pub struct Snapshot {
    node_count: usize,
    terminal_count: usize,
    nonterminal_indices: BTreeSet<usize>,
}

impl<'a> JoinTreeBuilder<'a> {
    #[must_use]
    pub fn new(cnf: &'a Cnf) -> JoinTreeBuilder<'a> {
        JoinTreeBuilder {
            cnf,
            node_count: 0,
            terminal_count: 0,
            nonterminal_indices: BTreeSet::new(),
        }
    }

    #[must_use]
    pub fn cnf(&self) -> &Cnf {
        self.cnf
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    #[must_use]
    pub fn terminal_count(&self) -> usize {
        self.terminal_count
    }

    /// Create the terminal for the next clause in order.
    ///
    /// # Panics
    ///
    /// Panics when more terminals are requested than the formula has
    /// clauses.
    pub fn terminal(&mut self) -> JoinTerminal {
        let node_index = self.terminal_count;
        let pre_projection_vars = self.cnf.clauses()[node_index].vars();
        self.terminal_count += 1;
        self.node_count += 1;
        JoinTerminal {
            node_index,
            pre_projection_vars,
        }
    }

    /// Create a nonterminal over `children`, eliminating `projection_vars`.
    /// Without `requested_index` the next free index is used.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NodeIndexConflict`] when the requested index lies
    /// in the terminal range or is already taken.
    pub fn nonterminal(
        &mut self,
        children: Vec<JoinNode>,
        projection_vars: BTreeSet<i64>,
        requested_index: Option<usize>,
    ) -> Result<JoinNonterminal> {
        let node_index = requested_index.unwrap_or(self.node_count);
        if node_index < self.terminal_count {
            return Err(Error::NodeIndexConflict {
                message: format!(
                    "index {node_index} is below terminal count {}",
                    self.terminal_count
                ),
            });
        }
        if self.nonterminal_indices.contains(&node_index) {
            return Err(Error::NodeIndexConflict {
                message: format!("index {node_index} already taken"),
            });
        }

        self.nonterminal_indices.insert(node_index);
        self.node_count += 1;

        let mut pre_projection_vars = BTreeSet::new();
        for child in &children {
            pre_projection_vars.extend(child.post_projection_vars());
        }

        Ok(JoinNonterminal {
            node_index,
            children,
            projection_vars,
            pre_projection_vars,
        })
    }

    /// Capture the current counters and reset them, so a speculative tree
    /// can be built from scratch.
    #[must_use]
    pub fn save(&mut self) -> Snapshot {
        let snapshot = Snapshot {
            node_count: self.node_count,
            terminal_count: self.terminal_count,
            nonterminal_indices: std::mem::take(&mut self.nonterminal_indices),
        };
        self.node_count = 0;
        self.terminal_count = 0;
        snapshot
    }

    /// Discard the speculative state and restore saved counters.
    pub fn restore(&mut self, snapshot: Snapshot) {
        self.node_count = snapshot.node_count;
        self.terminal_count = snapshot.terminal_count;
        self.nonterminal_indices = snapshot.nonterminal_indices;
    }
}
