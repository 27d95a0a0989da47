//! Error types raised by the front end.
//!
//! Every parse failure carries the 1-based index and content of the
//! offending line. An empty clause is deliberately *not* an error: the
//! parser reports it as a warning, records it on the store, and continues.

use thiserror::Error;

/// Failures raised while parsing input or computing orders.
#[derive(Debug, Error)]
pub enum Error {
    /// Input path could not be opened.
    #[error("unable to open file '{path}': {source}")]
    FileOpen {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Reading an already-open input failed.
    #[error("i/o error while reading input: {0}")]
    Io(#[from] std::io::Error),

    /// More than one problem line was observed.
    #[error("multiple problem lines: {first} and {second}")]
    DuplicateProblemLine { first: usize, second: usize },

    /// A `p ...` line with fewer than 4 tokens, or a WBO header missing
    /// its trivial-bound token.
    #[error("malformed problem line | line {line_index}: {line}")]
    MalformedProblemLine { line_index: usize, line: String },

    /// The input ended without any problem line.
    #[error("no problem line before input ends on line {line_index}")]
    MissingProblemLine { line_index: usize },

    /// A literal's variable exceeds the declared variable count.
    #[error("literal '{literal}' inconsistent with declared var count {declared_var_count} | line {line_index}: {line}")]
    LiteralOutOfRange {
        literal: i64,
        declared_var_count: i64,
        line_index: usize,
        line: String,
    },

    /// A literal weight below zero.
    #[error("weight must be non-negative | line {line_index}: {line}")]
    NegativeWeight { line_index: usize, line: String },

    /// A weight line before the problem line.
    #[error("no problem line before weighted literal | line {line_index}: {line}")]
    WeightWithoutProblem { line_index: usize, line: String },

    /// A show/min line before the problem line.
    #[error("no problem line before projected var | line {line_index}: {line}")]
    ShowWithoutProblem { line_index: usize, line: String },

    /// A clause line before the problem line.
    #[error("no problem line before clause | line {line_index}: {line}")]
    ClauseWithoutProblem { line_index: usize, line: String },

    /// A `0` terminator before the end of a clause or show line.
    #[error("line terminated prematurely by '0' | line {line_index}: {line}")]
    PrematureZero { line_index: usize, line: String },

    /// A clause line without the terminating `0`.
    #[error("missing end-of-clause indicator '0' | line {line_index}: {line}")]
    MissingZero { line_index: usize, line: String },

    /// Leftover `s ...` or `INDETERMINATE` output from a preprocessor.
    #[error("unexpected preprocessor output | line {line_index}: {line}")]
    UnexpectedPreprocessorOutput { line_index: usize, line: String },

    /// A token that should have been a number but is not.
    #[error("invalid token '{token}' | line {line_index}: {line}")]
    InvalidToken {
        token: String,
        line_index: usize,
        line: String,
    },

    /// A pseudo-boolean constraint too short to hold a comparator, a
    /// right-hand side, and a terminator.
    #[error("malformed pseudo-boolean constraint | line {line_index}: {line}")]
    MalformedPbConstraint { line_index: usize, line: String },

    /// `min_fill_vertex` on a graph with no vertices.
    #[error("graph has no vertex")]
    GraphEmpty,

    /// Nonterminal construction with a taken or too-small explicit index.
    #[error("nonterminal index conflict: {message}")]
    NodeIndexConflict { message: String },
}
