//! Handles into the [decision diagram][crate::obdd::Bdd].
//!
//! A [Term] names a node, and with it the function rooted there; a [Var] is a position in the variable order.
//! The first two nodes of every diagram are the constants.
use std::fmt::Display;

/// Index of a node in a [Bdd][crate::obdd::Bdd].
#[derive(Debug, Eq, PartialEq, PartialOrd, Ord, Hash, Copy, Clone)]
pub struct Term(pub usize);

impl From<usize> for Term {
    fn from(val: usize) -> Self {
        Self(val)
    }
}

impl From<bool> for Term {
    fn from(val: bool) -> Self {
        if val {
            Term::TOP
        } else {
            Term::BOT
        }
    }
}

impl Display for Term {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Term({})", self.0)
    }
}

impl Term {
    /// The constant false
    pub const BOT: Term = Term(0);
    /// The constant true
    pub const TOP: Term = Term(1);

    /// Get the value of the Term, i.e. the corresponding [usize]
    pub fn value(self) -> usize {
        self.0
    }

    /// Checks if the [Term] is one of the constants [Term::TOP] and [Term::BOT].
    pub fn is_truth_value(&self) -> bool {
        self.0 <= Term::TOP.0
    }

    /// Returns true, if the Term is [Term::TOP]
    pub fn is_true(&self) -> bool {
        *self == Self::TOP
    }

    /// The probability of a constant, `None` for an inner node.
    pub fn constant_probability(self) -> Option<f64> {
        match self {
            Term::BOT => Some(0.0),
            Term::TOP => Some(1.0),
            _ => None,
        }
    }
}

/// Position of an assumption in the variable order of a diagram.
///
/// Smaller values are closer to the root.
#[derive(Debug, Eq, PartialEq, PartialOrd, Ord, Hash, Clone, Copy)]
pub struct Var(pub usize);

impl From<usize> for Var {
    fn from(val: usize) -> Self {
        Self(val)
    }
}

impl Display for Var {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Var({})", self.0)
    }
}

impl Var {
    /// Variable of the constant node [Term::TOP]
    pub const TOP: Var = Var(usize::MAX);
    /// Variable of the constant node [Term::BOT]
    pub const BOT: Var = Var(usize::MAX - 1);

    /// Returns the value of the [Var] as [usize]
    pub fn value(self) -> usize {
        self.0
    }

    /// Returns true if the variable belongs to a constant node
    pub fn is_constant(&self) -> bool {
        self.value() >= Var::BOT.value()
    }

    /// Looks up the probability of the variable being true, [f64::NAN] if **weights** has no entry for it.
    pub fn weight(self, weights: &[f64]) -> f64 {
        weights.get(self.0).copied().unwrap_or(f64::NAN)
    }
}

/// One decision node: the function is `lo` if `var` is false and `hi` otherwise.
#[derive(Debug, Eq, PartialEq, PartialOrd, Ord, Hash, Clone, Copy)]
pub(crate) struct BddNode {
    var: Var,
    lo: Term,
    hi: Term,
}

impl Display for BddNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BddNode: {}, lo: {}, hi: {}", self.var, self.lo, self.hi)
    }
}

impl BddNode {
    pub fn new(var: Var, lo: Term, hi: Term) -> Self {
        Self { var, lo, hi }
    }

    /// The node stored at the slot of the constant **value**, both branches point to itself.
    pub fn terminal(value: bool) -> Self {
        let term = Term::from(value);
        Self {
            var: if value { Var::TOP } else { Var::BOT },
            lo: term,
            hi: term,
        }
    }

    pub fn var(self) -> Var {
        self.var
    }

    pub fn lo(self) -> Term {
        self.lo
    }

    pub fn hi(self) -> Term {
        self.hi
    }

    /// The successor if the variable of the node is set to **value**.
    pub fn branch(self, value: bool) -> Term {
        if value {
            self.hi
        } else {
            self.lo
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use quickcheck_macros::quickcheck;
    use test_log::test;

    #[test]
    fn constants() {
        assert_eq!(Term::from(true), Term::TOP);
        assert_eq!(Term::from(false), Term::BOT);
        assert!(Term::TOP.is_truth_value() && Term::TOP.is_true());
        assert!(Term::BOT.is_truth_value() && !Term::BOT.is_true());
        assert!(!Term(2).is_truth_value());
        assert_eq!(Term::TOP.constant_probability(), Some(1.0));
        assert_eq!(Term::BOT.constant_probability(), Some(0.0));
        assert_eq!(Term(7).constant_probability(), None);

        for value in [true, false] {
            let node = BddNode::terminal(value);
            assert!(node.var().is_constant());
            assert_eq!(node.lo(), Term::from(value));
            assert_eq!(node.hi(), Term::from(value));
        }
    }

    #[test]
    fn weights() {
        let weights = [0.25, 0.5];
        assert_eq!(Var(0).weight(&weights), 0.25);
        assert_eq!(Var(1).weight(&weights), 0.5);
        assert!(Var(2).weight(&weights).is_nan());
        assert!(Var::TOP.weight(&weights).is_nan());
    }

    #[quickcheck]
    fn bdd_node(var: usize, lo: usize, hi: usize) -> bool {
        let node = BddNode::new(Var::from(var), Term::from(lo), Term::from(hi));
        node.var().value() == var
            && node.branch(false) == node.lo()
            && node.branch(true) == node.hi()
            && node.lo().value() == lo
            && node.hi().value() == hi
            && node.var().is_constant() == (var >= usize::MAX - 1)
    }
}
