//! Error types for grammar construction, the RE concrete-syntax parser, and
//! the CLI demo's text formats.
//!
//! The CORE algorithms of this crate (CFG rewrites, the recursive-descent
//! tester, the RE AST, the Thompson compiler, the LTS acceptor) are total on
//! well-formed inputs; the only CORE failure is an invariant violation at CFG
//! construction. Everything else here belongs to the ambient adapters
//! (`rex_parser`, the CLI's grammar-notation reader) and is never raised by
//! the CORE algorithms themselves.

use thiserror::Error;

use crate::symbol::Symbol;

/// Errors produced by this crate.
#[derive(Error, Debug)]
pub enum GrammarError {
    /// A key of the production map was not declared as a non-terminal
    /// (spec invariant I1: every non-terminal appearing in any production
    /// must be a member of the non-terminal set).
    #[error("non-terminal {0} has productions but is not declared in the non-terminal set")]
    UndeclaredNonTerminal(Symbol),

    /// The regular-expression concrete-syntax parser (`rex_parser`) could
    /// not make sense of its input. Scoped entirely to that ambient module;
    /// malformed RE-parser input is explicitly out of the CORE's contract.
    #[error("malformed regular expression: {0}")]
    RexParse(String),

    /// The CLI's line-oriented grammar notation was malformed.
    #[error("invalid grammar format: {0}")]
    InvalidFormat(String),

    /// A single production line did not match `LHS -> alt1 alt2 ...`.
    #[error("invalid production format: {0}")]
    InvalidProduction(String),

    /// The CLI was given no input at all.
    #[error("empty grammar input")]
    EmptyInput,

    /// The declared production-line count didn't match what followed it.
    #[error("not enough production lines: expected {expected}, got {actual}")]
    NotEnoughProductions { expected: usize, actual: usize },

    /// The recursive-descent tester's bounded variant hit its depth cap
    /// before reaching a verdict. Scoped to `Parser::is_in_language_bounded`;
    /// the unbounded `is_in_language` never raises this.
    #[error("recursive-descent depth limit of {0} exceeded")]
    RecursionLimitExceeded(usize),

    /// Propagated I/O failure from the CLI's stdin/stdout use.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Type alias for `Result`s in this crate.
pub type Result<T> = std::result::Result<T, GrammarError>;
