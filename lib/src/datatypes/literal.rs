//! Literals are the atomic, signed units of a probabilistic argumentation system.
//!
//! A [Literal] is either a proposition, a probability-weighted assumption, or one of the two
//! special literals `True` and `False`.
//! All non-special literals of one run are owned by a [LiteralFactory], which hands out
//! monotonically increasing indices and keeps track of the names.
use crate::error::{ConstructionError, PasError};
use serde::Serialize;
use std::{
    cmp::Ordering,
    collections::HashMap,
    fmt::Display,
    hash::{Hash, Hasher},
    rc::Rc,
};

/// Identity of an atom. Two literals with the same index refer to the same atom.
pub type LiteralIndex = u32;

/// The index shared by the special literals `True` and `False`.
pub const SPECIAL_INDEX: LiteralIndex = LiteralIndex::MAX;

/// The kind of an atom.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum LiteralKind {
    /// A deterministic proposition, its probability is undefined.
    Proposition,
    /// An assumption, which holds with the given probability.
    Assumption(f64),
    /// The constants `True` and `False`.
    Special,
}

/// Representation of a signed atom.
///
/// Equality, ordering, and hashing only consider the index and the sign.
#[derive(Debug, Clone, Serialize)]
pub struct Literal {
    index: LiteralIndex,
    negated: bool,
    kind: LiteralKind,
    name: Rc<str>,
}

impl PartialEq for Literal {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index && self.negated == other.negated
    }
}

impl Eq for Literal {}

impl Hash for Literal {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.hash(state);
        self.negated.hash(state);
    }
}

impl PartialOrd for Literal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Literal {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.index, self.negated).cmp(&(other.index, other.negated))
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            LiteralKind::Special => {
                if self.negated {
                    write!(f, "False")
                } else {
                    write!(f, "True")
                }
            }
            _ => {
                if self.negated {
                    write!(f, "¬{}", self.name)
                } else {
                    write!(f, "{}", self.name)
                }
            }
        }
    }
}

impl Literal {
    fn special(negated: bool) -> Self {
        Self {
            index: SPECIAL_INDEX,
            negated,
            kind: LiteralKind::Special,
            name: Rc::from("True"),
        }
    }

    /// The special literal `True`.
    pub fn top() -> Self {
        Self::special(false)
    }

    /// The special literal `False`, i.e. the negation of [Literal::top].
    pub fn bottom() -> Self {
        Self::special(true)
    }

    /// Returns the index of the atom.
    pub fn index(&self) -> LiteralIndex {
        self.index
    }

    /// Returns `true` if the literal is negated.
    pub fn is_negated(&self) -> bool {
        self.negated
    }

    /// Returns the kind of the atom.
    pub fn kind(&self) -> LiteralKind {
        self.kind
    }

    /// Returns the name of the atom.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the complementary literal.
    pub fn negate(&self) -> Literal {
        Literal {
            negated: !self.negated,
            ..self.clone()
        }
    }

    /// Returns `true` if the literal is built on a proposition.
    pub fn is_proposition(&self) -> bool {
        matches!(self.kind, LiteralKind::Proposition)
    }

    /// Returns `true` if the literal is built on an assumption.
    pub fn is_assumption(&self) -> bool {
        matches!(self.kind, LiteralKind::Assumption(_))
    }

    /// Returns `true` for `True` and `False`.
    pub fn is_special(&self) -> bool {
        matches!(self.kind, LiteralKind::Special)
    }

    /// Returns `true` if this is the special literal `True`.
    pub fn is_top(&self) -> bool {
        self.is_special() && !self.negated
    }

    /// Returns `true` if this is the special literal `False`.
    pub fn is_bottom(&self) -> bool {
        self.is_special() && self.negated
    }

    /// Returns `true` if both literals are built on the same atom with opposite signs.
    pub fn is_complement_of(&self, other: &Literal) -> bool {
        self.index == other.index && self.negated != other.negated
    }

    /// The probability of the non-negated atom, if it is an assumption.
    pub fn atom_probability(&self) -> Option<f64> {
        match self.kind {
            LiteralKind::Assumption(probability) => Some(probability),
            _ => None,
        }
    }

    /// The probability that this literal holds.
    ///
    /// A negated assumption holds with `1 - p`, propositions are undefined ([f64::NAN]).
    pub fn probability(&self) -> f64 {
        match self.kind {
            LiteralKind::Assumption(probability) => {
                if self.negated {
                    1.0 - probability
                } else {
                    probability
                }
            }
            LiteralKind::Proposition => f64::NAN,
            LiteralKind::Special => {
                if self.negated {
                    0.0
                } else {
                    1.0
                }
            }
        }
    }
}

/// Owner of all literals of one run.
///
/// Literals are stored by their creation index, names are unique across propositions and assumptions.
#[derive(Debug, Default, Clone)]
pub struct LiteralFactory {
    literals: Vec<Literal>,
    mapping: HashMap<String, LiteralIndex>,
}

impl LiteralFactory {
    /// Creates an empty factory.
    pub fn new() -> Self {
        Self::default()
    }

    fn create(&mut self, name: &str, kind: LiteralKind) -> Literal {
        let index: LiteralIndex = self.literals.len().try_into().expect(
            "literal indices are based on the assumption that less than u32::MAX literals exist",
        );
        assert_ne!(index, SPECIAL_INDEX, "literal index space exhausted");
        let literal = Literal {
            index,
            negated: false,
            kind,
            name: Rc::from(name),
        };
        log::trace!("created literal {} with index {}", name, index);
        self.literals.push(literal.clone());
        self.mapping.insert(name.to_string(), index);
        literal
    }

    /// Declares the proposition `name`, or returns it if it is already declared.
    pub fn proposition(&mut self, name: &str) -> Result<Literal, PasError> {
        match self.literal(name) {
            Some(existing) if existing.is_proposition() => Ok(existing),
            Some(_) => Err(ConstructionError::KindMismatch {
                name: name.to_string(),
            }
            .into()),
            None => Ok(self.create(name, LiteralKind::Proposition)),
        }
    }

    /// Declares the assumption `name` with the given probability.
    ///
    /// Re-declaring an assumption with the identical probability returns the existing literal.
    pub fn assumption(&mut self, name: &str, probability: f64) -> Result<Literal, PasError> {
        if probability.is_nan() || !(0.0..=1.0).contains(&probability) {
            return Err(ConstructionError::InvalidProbability {
                name: name.to_string(),
                probability,
            }
            .into());
        }
        match self.literal(name) {
            Some(existing) => match existing.kind() {
                LiteralKind::Assumption(old) if old == probability => Ok(existing),
                LiteralKind::Assumption(_) => Err(ConstructionError::DuplicateName {
                    name: name.to_string(),
                }
                .into()),
                _ => Err(ConstructionError::KindMismatch {
                    name: name.to_string(),
                }
                .into()),
            },
            None => Ok(self.create(name, LiteralKind::Assumption(probability))),
        }
    }

    /// Looks up the non-negated literal with the given name.
    pub fn literal(&self, name: &str) -> Option<Literal> {
        self.mapping
            .get(name)
            .and_then(|idx| self.literals.get(*idx as usize))
            .cloned()
    }

    /// Looks up the non-negated literal with the given index.
    pub fn by_index(&self, index: LiteralIndex) -> Option<&Literal> {
        self.literals.get(index as usize)
    }

    /// All propositions, in creation order.
    pub fn propositions(&self) -> Vec<Literal> {
        self.literals
            .iter()
            .filter(|lit| lit.is_proposition())
            .cloned()
            .collect()
    }

    /// All assumptions, in creation order.
    pub fn assumptions(&self) -> Vec<Literal> {
        self.literals
            .iter()
            .filter(|lit| lit.is_assumption())
            .cloned()
            .collect()
    }

    /// Number of declared literals.
    pub fn len(&self) -> usize {
        self.literals.len()
    }

    /// Returns `true` if nothing has been declared yet.
    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }
}
