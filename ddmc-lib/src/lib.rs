//! # Front end of a decision-diagram model counter.
//!
//! Parse propositional constraint files of the DIMACS/WBO family and compute
//! **variable-elimination orders** for a downstream diagram backend.
//!
//! The crate covers:
//! * parsing of `cnf`, `wcnf`, `hwcnf`, and WBO/PBO inputs into a single
//!   [`cnf::Cnf`] store with per-literal weights, variable roles, and
//!   canonicalised pseudo-boolean constraints,
//! * exact-rational or (log-space) floating-point weights behind one
//!   [`number::Number`] type,
//! * seven elimination-order heuristics over the formula's primal graph,
//!   including minfill, maximum-cardinality search, and the lexicographic
//!   BFS variants LEX-P and LEX-M,
//! * join-tree nodes ([`join::JoinNode`]) that derive further orders from
//!   tree structure and enumerate slice assignments.
//!
//! The following snippet parses a CNF formula and computes a minfill order:
//!
//! ```rust
//! use ddmcrs::cnf::Cnf;
//! use ddmcrs::config::Config;
//! use ddmcrs::order;
//!
//! let config = Config::builder().build();
//! let input = "p cnf 3 2\n1 -2 0\n2 3 0\n";
//! let cnf = Cnf::from_reader(input.as_bytes(), &config).unwrap();
//!
//! let minfill_order = cnf.cnf_var_order(order::MINFILL);
//! assert_eq!(minfill_order.len(), 3);
//! ```
//!
//! Diagram construction, the solver loop, and join-tree *clustering* live in
//! downstream crates; this one stops at orders and slices.

pub mod cnf;
pub mod config;
pub mod error;
pub mod graph;
pub mod join;
pub mod number;

pub use cnf::order;

pub type Result<T> = std::result::Result<T, error::Error>;
