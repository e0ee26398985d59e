/*!
This module contains the numeric evaluators, which compute the probability of an assumption-only DNF.

Two evaluators with independent algorithms are available:
- [BddComputer][bdd::BddComputer] compiles the DNF into an ordered decision diagram and sweeps over it,
- [ExpansionComputer][expansion::ExpansionComputer] applies the inclusion-exclusion principle on the terms.

In addition there is the public enum [Evaluator], which allows to select an evaluator with the public API.
 */
pub mod bdd;
pub mod expansion;

use crate::datatypes::SimpleSentence;
use crate::error::PasError;
use strum::{EnumString, EnumVariantNames};

/// Computes the probability of a DNF over stochastically independent assumptions.
pub trait ProbabilityComputer {
    /// Returns the probability of **dnf**.
    ///
    /// The value is in `[0, 1]`, or [f64::NAN] if a proposition occurs in the DNF.
    /// Fails if **dnf** is not a DNF.
    fn dnf_probability(&self, dnf: &SimpleSentence) -> Result<f64, PasError>;
}

/// Enumeration of the implemented evaluators.
#[derive(EnumString, EnumVariantNames, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Evaluator {
    /// The decision-diagram evaluator
    #[strum(serialize = "bdd")]
    Bdd,
    /// The inclusion-exclusion evaluator
    #[strum(serialize = "expansion")]
    Expansion,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::Bdd
    }
}

impl Evaluator {
    /// Evaluates **dnf** with the selected evaluator.
    pub fn dnf_probability(self, dnf: &SimpleSentence) -> Result<f64, PasError> {
        match self {
            Evaluator::Bdd => bdd::BddComputer::default().dnf_probability(dnf),
            Evaluator::Expansion => expansion::ExpansionComputer.dnf_probability(dnf),
        }
    }
}

/// Handles the cases shared by all evaluators.
///
/// Returns `Some` if the probability is determined without a computation.
pub(crate) fn trivial_probability(
    operation: &'static str,
    dnf: &SimpleSentence,
) -> Result<Option<f64>, PasError> {
    if !dnf.is_dnf() {
        return Err(PasError::unsupported(
            operation,
            "a sentence which is not a DNF",
        ));
    }
    if dnf.is_false() {
        Ok(Some(0.0))
    } else if dnf.is_true() {
        Ok(Some(1.0))
    } else if dnf.has_proposition() {
        log::debug!("{} contains propositions, the probability is undefined", dnf);
        Ok(Some(f64::NAN))
    } else {
        Ok(None)
    }
}
