//! Expressions combine unique literals with one connective.
//!
//! A conjunction of literals is called a *term*, a disjunction of literals a *clause*.
//! Both collapse to a canonical constant as soon as a contradiction (resp. tautology) arises.
use super::literal::{Literal, LiteralIndex};
use super::sentence::SimpleSentence;
use crate::error::PasError;
use derivative::Derivative;
use roaring::RoaringBitmap;
use serde::Serialize;
use std::{
    collections::{hash_map::DefaultHasher, BTreeMap},
    fmt::Display,
    hash::{Hash, Hasher},
};

/// The operator which combines the elements of an [Expression] or a [SimpleSentence].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Connective {
    /// Conjunction
    And,
    /// Disjunction
    Or,
}

impl Connective {
    /// Returns the De Morgan dual of the connective.
    pub fn dual(self) -> Connective {
        match self {
            Connective::And => Connective::Or,
            Connective::Or => Connective::And,
        }
    }

    /// The special literal which forces an expression of this connective to collapse.
    pub(crate) fn collapsing_literal(self) -> Literal {
        match self {
            Connective::And => Literal::bottom(),
            Connective::Or => Literal::top(),
        }
    }
}

/// A term (conjunction) or a clause (disjunction) of unique literals.
///
/// Literals are unique by their index. The positive and negative atoms are additionally
/// kept as a pair of [bitmaps][RoaringBitmap], which serve as the signature for subsumption checks.
#[derive(Derivative, Clone)]
#[derivative(Debug)]
pub struct Expression {
    connective: Connective,
    literals: BTreeMap<LiteralIndex, Literal>,
    order: Option<Vec<LiteralIndex>>,
    collapsed: bool,
    #[derivative(Debug = "ignore")]
    positive: RoaringBitmap,
    #[derivative(Debug = "ignore")]
    negative: RoaringBitmap,
}

impl PartialEq for Expression {
    fn eq(&self, other: &Self) -> bool {
        self.connective == other.connective
            && self.collapsed == other.collapsed
            && self.literals.len() == other.literals.len()
            && self
                .literals
                .iter()
                .zip(other.literals.iter())
                .all(|((idx_a, lit_a), (idx_b, lit_b))| idx_a == idx_b && lit_a == lit_b)
    }
}

impl Eq for Expression {}

impl Hash for Expression {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.connective.hash(state);
        self.collapsed.hash(state);
        for literal in self.literals.values() {
            literal.hash(state);
        }
    }
}

impl Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let joined = self
            .iter()
            .map(|lit| format!("{}", lit))
            .collect::<Vec<_>>();
        match self.connective {
            Connective::And => {
                if joined.is_empty() {
                    write!(f, "True")
                } else {
                    write!(f, "{}", joined.join(" "))
                }
            }
            Connective::Or => {
                if joined.is_empty() {
                    write!(f, "(False)")
                } else {
                    write!(f, "({})", joined.join(" + "))
                }
            }
        }
    }
}

impl Expression {
    /// Creates an empty expression, i.e. `True` for a term and `False` for a clause.
    pub fn new(connective: Connective) -> Self {
        Self {
            connective,
            literals: BTreeMap::new(),
            order: None,
            collapsed: false,
            positive: RoaringBitmap::new(),
            negative: RoaringBitmap::new(),
        }
    }

    /// Creates an empty expression which retains the insertion order of its literals.
    pub fn ordered(connective: Connective) -> Self {
        Self {
            order: Some(Vec::new()),
            ..Self::new(connective)
        }
    }

    /// Creates the empty term (`True`).
    pub fn term() -> Self {
        Self::new(Connective::And)
    }

    /// Creates the empty clause (`False`).
    pub fn clause() -> Self {
        Self::new(Connective::Or)
    }

    /// Creates a term from the given literals.
    pub fn term_from<'a>(literals: impl IntoIterator<Item = &'a Literal>) -> Self {
        let mut result = Self::term();
        result.extend(literals);
        result
    }

    /// Creates a clause from the given literals.
    pub fn clause_from<'a>(literals: impl IntoIterator<Item = &'a Literal>) -> Self {
        let mut result = Self::clause();
        result.extend(literals);
        result
    }

    /// Creates the ordered clause `¬b1 + ... + ¬bn + head` which represents the rule `b1 ∧ ... ∧ bn → head`.
    pub fn horn_clause(body: &[Literal], head: &Literal) -> Self {
        let mut result = Self::ordered(Connective::Or);
        for literal in body {
            result.add_literal(&literal.negate());
        }
        result.add_literal(head);
        result
    }

    /// Adds all literals of the iterator.
    pub fn extend<'a>(&mut self, literals: impl IntoIterator<Item = &'a Literal>) {
        for literal in literals {
            self.add_literal(literal);
        }
    }

    /// Returns the connective of the expression.
    pub fn connective(&self) -> Connective {
        self.connective
    }

    /// Returns `true` for a term.
    pub fn is_term(&self) -> bool {
        self.connective == Connective::And
    }

    /// Returns `true` for a clause.
    pub fn is_clause(&self) -> bool {
        self.connective == Connective::Or
    }

    /// Returns `true` if the expression retains the insertion order.
    pub fn is_ordered(&self) -> bool {
        self.order.is_some()
    }

    /// Returns `true` if the expression collapsed to its constant (`False` for terms, `True` for clauses).
    pub fn is_collapsed(&self) -> bool {
        self.collapsed
    }

    /// Returns `true` if the expression is equivalent to `True`.
    pub fn is_true(&self) -> bool {
        match self.connective {
            Connective::And => !self.collapsed && self.literals.is_empty(),
            Connective::Or => self.collapsed,
        }
    }

    /// Returns `true` if the expression is equivalent to `False`.
    pub fn is_false(&self) -> bool {
        match self.connective {
            Connective::And => self.collapsed,
            Connective::Or => !self.collapsed && self.literals.is_empty(),
        }
    }

    /// Number of contained literals (a collapsed expression contains the special literal).
    pub fn len(&self) -> usize {
        self.literals.len()
    }

    /// Returns `true` if no literal is contained.
    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    /// Iterates over the literals, in insertion order for ordered expressions and ascending index order otherwise.
    pub fn iter(&self) -> impl Iterator<Item = &Literal> + '_ {
        let ordered = self
            .order
            .as_ref()
            .map(|order| order.iter().filter_map(|idx| self.literals.get(idx)));
        let plain = if ordered.is_none() {
            Some(self.literals.values())
        } else {
            None
        };
        ordered
            .into_iter()
            .flatten()
            .chain(plain.into_iter().flatten())
    }

    fn collapse(&mut self) {
        let special = self.connective.collapsing_literal();
        self.literals.clear();
        self.positive.clear();
        self.negative.clear();
        if let Some(order) = self.order.as_mut() {
            order.clear();
            order.push(special.index());
        }
        self.literals.insert(special.index(), special);
        self.collapsed = true;
    }

    /// Adds a literal.
    ///
    /// Returns `true` if the expression changed. Adding the complement of a contained literal, or the
    /// collapsing constant, turns the expression into its constant; the neutral constant is ignored.
    pub fn add_literal(&mut self, literal: &Literal) -> bool {
        if self.collapsed {
            return false;
        }
        if literal.is_special() {
            if *literal == self.connective.collapsing_literal() {
                self.collapse();
                return true;
            }
            return false;
        }
        match self.literals.get(&literal.index()) {
            Some(existing) if existing.is_negated() == literal.is_negated() => false,
            Some(_) => {
                self.collapse();
                true
            }
            None => {
                self.literals.insert(literal.index(), literal.clone());
                if literal.is_negated() {
                    self.negative.insert(literal.index());
                } else {
                    self.positive.insert(literal.index());
                }
                if let Some(order) = self.order.as_mut() {
                    order.push(literal.index());
                }
                true
            }
        }
    }

    /// Removes a literal, returns `true` if it was contained.
    ///
    /// Collapsed expressions are not changed.
    pub fn remove_literal(&mut self, literal: &Literal) -> bool {
        if self.collapsed || !self.contains(literal) {
            return false;
        }
        self.literals.remove(&literal.index());
        if literal.is_negated() {
            self.negative.remove(literal.index());
        } else {
            self.positive.remove(literal.index());
        }
        if let Some(order) = self.order.as_mut() {
            order.retain(|idx| *idx != literal.index());
        }
        true
    }

    /// Returns `true` if the literal (with its sign) is contained.
    pub fn contains(&self, literal: &Literal) -> bool {
        self.literals
            .get(&literal.index())
            .map(|existing| existing.is_negated() == literal.is_negated())
            .unwrap_or(false)
    }

    /// Returns `true` if some literal is built on a proposition.
    pub fn has_proposition(&self) -> bool {
        self.literals.values().any(Literal::is_proposition)
    }

    /// Returns `true` if every literal of `self` is contained in `other`.
    ///
    /// Collapsed expressions are only subsets of collapsed expressions.
    pub fn is_subset(&self, other: &Expression) -> bool {
        if self.collapsed || other.collapsed {
            return self.collapsed && other.collapsed;
        }
        self.literals.len() <= other.literals.len()
            && self.positive.is_subset(&other.positive)
            && self.negative.is_subset(&other.negative)
    }

    /// Returns the union of two expressions with the same connective.
    ///
    /// For terms this is the conjunction, for clauses the disjunction.
    pub fn union(&self, other: &Expression) -> Expression {
        debug_assert_eq!(self.connective, other.connective);
        let mut result = self.clone();
        result.extend(other.iter());
        result
    }

    /// Conjunction of two terms.
    pub fn conjoin(&self, other: &Expression) -> Result<Expression, PasError> {
        if !self.is_term() || !other.is_term() {
            return Err(PasError::unsupported(
                "conjoin",
                format!("{:?}- and {:?}-expressions", self.connective, other.connective),
            ));
        }
        Ok(self.union(other))
    }

    /// Disjunction of two clauses.
    pub fn disjoin(&self, other: &Expression) -> Result<Expression, PasError> {
        if !self.is_clause() || !other.is_clause() {
            return Err(PasError::unsupported(
                "disjoin",
                format!("{:?}- and {:?}-expressions", self.connective, other.connective),
            ));
        }
        Ok(self.union(other))
    }

    /// Returns the De Morgan dual: every literal is negated and the connective is swapped.
    pub fn negate(&self) -> Expression {
        if self.collapsed {
            let mut result = Expression::new(self.connective.dual());
            result.order = self.order.as_ref().map(|_| Vec::new());
            result.collapse();
            return result;
        }
        let mut result = Expression {
            order: self.order.as_ref().map(|_| Vec::new()),
            ..Expression::new(self.connective.dual())
        };
        for literal in self.iter() {
            result.add_literal(&literal.negate());
        }
        result
    }

    /// Splits the expression into unit expressions of the dual connective,
    /// collected in a sentence of this expression's connective.
    ///
    /// A clause becomes a DNF of unit terms, a term a CNF of unit clauses.
    pub fn split(&self) -> SimpleSentence {
        let mut result = SimpleSentence::new(self.connective);
        if self.collapsed {
            result.insert(Expression::new(self.connective.dual()));
            return result;
        }
        for literal in self.iter() {
            let mut unit = Expression::new(self.connective.dual());
            unit.add_literal(literal);
            result.insert(unit);
        }
        result
    }

    /// Wraps the expression as the only element of a sentence (a term into a DNF, a clause into a CNF).
    pub fn into_sentence(self) -> SimpleSentence {
        let mut result = SimpleSentence::new(self.connective.dual());
        result.insert(self);
        result
    }

    /// Computes the probability of the expression, assuming stochastically independent literals.
    ///
    /// Terms multiply the probabilities, clauses compute `1 - Π(1 - p)`.
    /// The result is [f64::NAN] if a proposition is contained.
    pub fn probability(&self) -> f64 {
        if self.is_true() {
            return 1.0;
        }
        if self.is_false() {
            return 0.0;
        }
        if self.has_proposition() {
            return f64::NAN;
        }
        match self.connective {
            Connective::And => self.literals.values().map(Literal::probability).product(),
            Connective::Or => {
                1.0 - self
                    .literals
                    .values()
                    .map(|lit| 1.0 - lit.probability())
                    .product::<f64>()
            }
        }
    }

    /// Hash value of the expression, used as summand of the bag hash of a sentence.
    pub(crate) fn element_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }
}
