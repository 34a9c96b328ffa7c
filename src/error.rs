//! Error types for the GLL engine and its supporting collaborators.
//!
//! Only *recoverable* faults get a named variant here: grammar degeneracy,
//! detectable at predictor construction, and the ambient I/O/format errors
//! the demo CLI's grammar loader can hit. Internal invariant violations
//! (negative indices, out-of-range slots, malformed BSR nodes) are
//! programmer errors and abort via `panic!` rather than flowing through
//! this type.

use thiserror::Error;

/// Errors surfaced by grammar construction, predictor construction, and the
/// demo CLI's grammar/input loading.
#[derive(Error, Debug)]
pub enum GllError {
    /// The start symbol has no rules at all: it was never given a
    /// production, so it is not a meaningful left-hand side.
    #[error("start symbol {0} is not a key in the grammar's productions")]
    UndefinedStart(String),

    /// The start symbol is unproductive or unreachable post-prune: it has
    /// rules, but none of them can ever derive a string of terminals (or
    /// none survive preprocessing), so nothing can ever be accepted.
    #[error("start symbol {0} is unproductive or unreachable: it can never derive a terminal string")]
    UnproductiveStart(String),

    /// The demo CLI's grammar text format was malformed.
    #[error("invalid grammar format: {0}")]
    InvalidFormat(String),

    /// The demo CLI's grammar text format named too few production lines.
    #[error("not enough production lines: expected {expected}, got {actual}")]
    NotEnoughProductions { expected: usize, actual: usize },

    /// Propagated I/O error, e.g. from the demo CLI reading stdin.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Type alias for `Result`s in this crate.
pub type Result<T> = std::result::Result<T, GllError>;
