//! Normal form sentences, i.e. conjunctions of clauses (CNF) and disjunctions of terms (DNF).
//!
//! A [SimpleSentence] is kept *mu-reduced* at all times: no element is a subset of another one.
//! Inserting an element removes every element it subsumes and is rejected if it is subsumed itself.
use super::expression::{Connective, Expression};
use crate::error::PasError;
use derivative::Derivative;
use std::{
    cell::Cell,
    fmt::Display,
    hash::{Hash, Hasher},
};

/// A CNF ([Connective::And] of clauses) or a DNF ([Connective::Or] of terms).
///
/// Canonical constants:
/// - the empty CNF is `True`, a CNF holding the empty clause is `False`
/// - the empty DNF is `False`, a DNF holding the empty term is `True`
///
/// Equality is bag equality of the elements. The bag hash is cached and shared between sentences
/// which have been proven equal.
#[derive(Derivative, Clone)]
#[derivative(Debug)]
pub struct SimpleSentence {
    connective: Connective,
    elements: Vec<Expression>,
    #[derivative(Debug = "ignore")]
    hash_cache: Cell<Option<u64>>,
}

impl Display for SimpleSentence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let elements = self
            .elements
            .iter()
            .map(|elem| format!("{}", elem))
            .collect::<Vec<_>>();
        match self.connective {
            Connective::And => write!(f, "[{}]", elements.concat()),
            Connective::Or => write!(f, "[{}]", elements.join(" + ")),
        }
    }
}

impl PartialEq for SimpleSentence {
    fn eq(&self, other: &Self) -> bool {
        if self.connective != other.connective || self.elements.len() != other.elements.len() {
            return false;
        }
        let (left, right) = (self.checked_cache(), other.checked_cache());
        if let (Some(left), Some(right)) = (left, right) {
            if left != right {
                return false;
            }
        }
        let mut used = vec![false; other.elements.len()];
        let equal = self.elements.iter().all(|elem| {
            match other
                .elements
                .iter()
                .enumerate()
                .position(|(idx, candidate)| !used[idx] && candidate == elem)
            {
                Some(idx) => {
                    used[idx] = true;
                    true
                }
                None => false,
            }
        });
        if equal {
            // a stale cache is never handed on, and never overwritten
            match (left, right) {
                (Some(hash), None) if other.hash_cache.get().is_none() => {
                    other.hash_cache.set(Some(hash))
                }
                (None, Some(hash)) if self.hash_cache.get().is_none() => {
                    self.hash_cache.set(Some(hash))
                }
                _ => {}
            }
        }
        equal
    }
}

impl Eq for SimpleSentence {}

impl Hash for SimpleSentence {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.connective.hash(state);
        state.write_u64(self.compute_hash());
    }
}

impl SimpleSentence {
    /// Creates the empty sentence of the given connective (`True` for a CNF, `False` for a DNF).
    pub fn new(connective: Connective) -> Self {
        Self {
            connective,
            elements: Vec::new(),
            hash_cache: Cell::new(None),
        }
    }

    /// Creates the empty CNF, i.e. `True`.
    pub fn cnf() -> Self {
        Self::new(Connective::And)
    }

    /// Creates the empty DNF, i.e. `False`.
    pub fn dnf() -> Self {
        Self::new(Connective::Or)
    }

    /// Creates the canonical `True` sentence of the given connective.
    pub fn top(connective: Connective) -> Self {
        let mut result = Self::new(connective);
        if connective == Connective::Or {
            result.insert(Expression::term());
        }
        result
    }

    /// Creates the canonical `False` sentence of the given connective.
    pub fn bottom(connective: Connective) -> Self {
        let mut result = Self::new(connective);
        if connective == Connective::And {
            result.insert(Expression::clause());
        }
        result
    }

    /// Creates a sentence from the given elements, applying mu-reduction on every insertion.
    pub fn from_elements(
        connective: Connective,
        elements: impl IntoIterator<Item = Expression>,
    ) -> Result<Self, PasError> {
        let mut result = Self::new(connective);
        for element in elements {
            result.add_element(element)?;
        }
        Ok(result)
    }

    /// Returns the connective of the sentence.
    pub fn connective(&self) -> Connective {
        self.connective
    }

    /// Returns the connective, which the elements need to have.
    pub fn element_connective(&self) -> Connective {
        self.connective.dual()
    }

    /// Returns `true` for a conjunction of clauses.
    pub fn is_cnf(&self) -> bool {
        self.connective == Connective::And
    }

    /// Returns `true` for a disjunction of terms.
    pub fn is_dnf(&self) -> bool {
        self.connective == Connective::Or
    }

    /// Returns `true` if the sentence holds the absorbing element (the empty clause resp. the empty term).
    fn is_absorbed(&self) -> bool {
        self.elements
            .iter()
            .any(|elem| elem.is_empty() && !elem.is_collapsed())
    }

    /// Returns `true` if the sentence is equivalent to `True`.
    pub fn is_true(&self) -> bool {
        match self.connective {
            Connective::And => self.elements.is_empty(),
            Connective::Or => self.is_absorbed(),
        }
    }

    /// Returns `true` if the sentence is equivalent to `False`.
    pub fn is_false(&self) -> bool {
        match self.connective {
            Connective::And => self.is_absorbed(),
            Connective::Or => self.elements.is_empty(),
        }
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns `true` if there are no elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// The elements of the sentence.
    pub fn elements(&self) -> &[Expression] {
        &self.elements
    }

    /// Mutable access to the elements, bypassing mu-reduction.
    ///
    /// # Attention
    /// After changing an element, [update][SimpleSentence::update] needs to be called.
    /// Otherwise the sentence may no longer be mu-reduced and [bag_hash][SimpleSentence::bag_hash] reports a stale sentence.
    pub fn elements_mut(&mut self) -> &mut [Expression] {
        &mut self.elements
    }

    /// Consumes the sentence and returns its elements.
    pub fn into_elements(self) -> Vec<Expression> {
        self.elements
    }

    /// Returns `true` if some literal of some element is built on a proposition.
    pub fn has_proposition(&self) -> bool {
        self.elements.iter().any(Expression::has_proposition)
    }

    /// Inserts an element whose connective is known to fit.
    pub(crate) fn insert(&mut self, element: Expression) -> bool {
        debug_assert_eq!(element.connective(), self.element_connective());
        if self.is_absorbed() || element.is_collapsed() {
            return false;
        }
        if self.elements.iter().any(|elem| elem.is_subset(&element)) {
            return false;
        }
        self.elements.retain(|elem| !element.is_subset(elem));
        self.elements.push(element);
        self.hash_cache.set(None);
        true
    }

    /// Adds an element under mu-reduction.
    ///
    /// Returns `Ok(true)` if the sentence changed, and fails if the connective of the element does not fit
    /// (a CNF only takes clauses, a DNF only takes terms).
    pub fn add_element(&mut self, element: Expression) -> Result<bool, PasError> {
        if element.connective() != self.element_connective() {
            return Err(PasError::unsupported(
                "add_element",
                format!(
                    "{:?}-expression in a {:?}-sentence",
                    element.connective(),
                    self.connective
                ),
            ));
        }
        Ok(self.insert(element))
    }

    /// Removes the element, returns `true` if it was contained.
    pub fn remove_element(&mut self, element: &Expression) -> bool {
        match self.elements.iter().position(|elem| elem == element) {
            Some(idx) => {
                self.elements.remove(idx);
                self.hash_cache.set(None);
                true
            }
            None => false,
        }
    }

    /// Returns `true` if the element is contained.
    pub fn has_element(&self, element: &Expression) -> bool {
        self.elements.iter().any(|elem| elem == element)
    }

    /// Rebuilds the sentence from its current elements, re-applying mu-reduction.
    pub fn update(&mut self) {
        let elements = std::mem::take(&mut self.elements);
        self.hash_cache.set(None);
        for element in elements {
            self.insert(element);
        }
    }

    fn compute_hash(&self) -> u64 {
        self.elements
            .iter()
            .fold(0u64, |acc, elem| acc.wrapping_add(elem.element_hash()))
    }

    /// The cached hash, if there is one and it still matches the elements.
    fn checked_cache(&self) -> Option<u64> {
        self.hash_cache
            .get()
            .filter(|cached| *cached == self.compute_hash())
    }

    /// Returns the bag hash of the elements.
    ///
    /// The value is re-computed and compared to the cached one; a difference means that an element has been
    /// changed through [elements_mut][SimpleSentence::elements_mut] without a call to [update][SimpleSentence::update].
    /// Note that this detection is best-effort.
    pub fn bag_hash(&self) -> Result<u64, PasError> {
        let computed = self.compute_hash();
        match self.hash_cache.get() {
            Some(cached) if cached != computed => Err(PasError::StaleSentence { cached, computed }),
            _ => {
                self.hash_cache.set(Some(computed));
                Ok(computed)
            }
        }
    }

    /// Pairwise union of the elements of two sentences with the same connective.
    ///
    /// For two DNFs this is their conjunction (intersection of the scenarios), for two CNFs their disjunction.
    pub fn cross(&self, other: &SimpleSentence) -> Result<SimpleSentence, PasError> {
        if self.connective != other.connective {
            return Err(PasError::unsupported(
                "cross",
                format!("{:?}- and {:?}-sentences", self.connective, other.connective),
            ));
        }
        Ok(self.cross_unchecked(other))
    }

    pub(crate) fn cross_unchecked(&self, other: &SimpleSentence) -> SimpleSentence {
        let mut result = SimpleSentence::new(self.connective);
        for left in &self.elements {
            for right in &other.elements {
                result.insert(left.union(right));
            }
        }
        log::trace!(
            "crossed {} x {} elements into {}",
            self.len(),
            other.len(),
            result.len()
        );
        result
    }

    /// Adds every element of `other` (which has to have the same connective).
    ///
    /// For two CNFs this is their conjunction, for two DNFs their disjunction.
    pub fn merge(&mut self, other: &SimpleSentence) -> Result<(), PasError> {
        if self.connective != other.connective {
            return Err(PasError::unsupported(
                "merge",
                format!("{:?}- and {:?}-sentences", self.connective, other.connective),
            ));
        }
        for element in &other.elements {
            self.insert(element.clone());
        }
        Ok(())
    }

    /// Returns the De Morgan dual: a CNF becomes the DNF of the negated clauses and vice versa.
    pub fn negate(&self) -> SimpleSentence {
        let mut result = SimpleSentence::new(self.connective.dual());
        for element in &self.elements {
            result.insert(element.negate());
        }
        result
    }

    /// Converts a CNF into an equivalent DNF, resp. a DNF into an equivalent CNF, by distribution.
    ///
    /// The elements are folded from left to right; the size of the result may be exponential.
    pub fn convert(&self) -> SimpleSentence {
        let mut result = SimpleSentence::new(self.connective.dual());
        result.insert(Expression::new(self.connective));
        for element in &self.elements {
            result = result.cross_unchecked(&element.split());
            if result.is_empty() {
                break;
            }
        }
        log::debug!(
            "converted {} elements into {} elements",
            self.len(),
            result.len()
        );
        result
    }
}
