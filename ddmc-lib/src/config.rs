//! Immutable run configuration shared by parsing, numerics, and ordering.

use bon::Builder;

/// Verbosity threshold at which post-parse summaries are printed.
pub const PARSED_INPUT: i64 = 1;
/// Verbosity threshold at which raw input lines are echoed back.
pub const RAW_INPUT: i64 = 2;

/// How the trivial bound is located on a `* #variable= ...` WBO header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WboHeaderMode {
    /// Read the bound from token index 12, as legacy WBO writers place it.
    #[default]
    Positional,
    /// Take the last integer token on the header line, accepting any
    /// `key=value` labels before it.
    Flexible,
}

/// Configuration of a single run.
///
/// Built once before parsing and threaded by reference afterwards; nothing
/// in this crate mutates it. The [`crate::number::Number`] representation
/// and the parser's semantic mode are both derived from these fields.
#[derive(Builder, Debug, Clone)]
pub struct Config {
    /// Literal weights are read from the input and completed per polarity.
    #[builder(default)]
    pub weighted_counting: bool,

    /// Show lines (`vp`/`vm`/`... p show`) select the additive variables.
    #[builder(default)]
    pub projected_counting: bool,

    /// The input is a (Min-)MaxSAT instance; show lines select min variables.
    #[builder(default)]
    pub maxsat_solving: bool,

    /// Numbers are exact rationals instead of binary doubles.
    #[builder(default)]
    pub multiple_precision: bool,

    /// Doubles denote `log10` of the represented value. Only meaningful
    /// together with `multiple_precision == false`.
    #[builder(default)]
    pub log_counting: bool,

    /// Seed of the RANDOM variable-order heuristic.
    #[builder(default)]
    pub random_seed: u64,

    /// Cost bound handed to the downstream MaxSAT solver loop.
    #[builder(default)]
    pub maxsat_bound: i64,

    /// Formula-reporting verbosity; see [`PARSED_INPUT`] and [`RAW_INPUT`].
    #[builder(default)]
    pub verbose_cnf: i64,

    /// Solving-phase verbosity (order and slice reporting).
    #[builder(default)]
    pub verbose_solving: i64,

    /// Trivial-bound location on WBO headers.
    #[builder(default)]
    pub wbo_header_mode: WboHeaderMode,
}

impl Default for Config {
    fn default() -> Self {
        Config::builder().build()
    }
}
