//! Error types of the library.
//!
//! Undefined probabilities (a DNF which still mentions propositions) are not
//! errors; they are reported as [`f64::NAN`].
use derive_more::{Display, Error};

/// Failures while declaring literals or instantiating a parsed knowledge base.
///
/// These are always caller-correctable; the object under construction is discarded.
#[derive(Debug, Display, Error, Clone, PartialEq)]
pub enum ConstructionError {
    /// The name is already in use with a different definition.
    #[display(fmt = "the name `{}` is already declared with a different definition", name)]
    DuplicateName {
        /// name of the literal
        name: String,
    },
    /// The name is declared as a proposition and as an assumption.
    #[display(
        fmt = "the name `{}` is used both as proposition and as assumption",
        name
    )]
    KindMismatch {
        /// name of the literal
        name: String,
    },
    /// An assumption received a probability outside of `[0, 1]` (or NaN).
    #[display(fmt = "invalid probability {} for assumption `{}`", probability, name)]
    InvalidProbability {
        /// name of the assumption
        name: String,
        /// the rejected value
        probability: f64,
    },
    /// A formula refers to a name which has not been declared.
    #[display(fmt = "the name `{}` has not been declared", name)]
    UnknownName {
        /// the unknown name
        name: String,
    },
}

/// Errors raised by the core data structures and algorithms.
#[derive(Debug, Display, Error, Clone, PartialEq)]
pub enum PasError {
    /// Construction of a literal or knowledge base failed.
    #[display(fmt = "construction failed: {}", source)]
    Construction {
        /// the reason
        source: ConstructionError,
    },
    /// An operation received operands whose algebraic kind it cannot combine.
    #[display(fmt = "{} is not supported for {}", operation, operands)]
    UnsupportedOperator {
        /// the requested operation
        operation: &'static str,
        /// description of the operand kinds
        operands: String,
    },
    /// A sentence was mutated without calling `update()` afterwards.
    #[display(
        fmt = "stale sentence: cached hash {:#x} differs from recomputed hash {:#x}, call update() after mutating elements",
        cached,
        computed
    )]
    StaleSentence {
        /// the cached bag hash
        cached: u64,
        /// the recomputed bag hash
        computed: u64,
    },
}

impl From<ConstructionError> for PasError {
    fn from(value: ConstructionError) -> Self {
        PasError::Construction { source: value }
    }
}

impl PasError {
    pub(crate) fn unsupported(operation: &'static str, operands: impl Into<String>) -> Self {
        PasError::UnsupportedOperator {
            operation,
            operands: operands.into(),
        }
    }
}
