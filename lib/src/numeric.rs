//! Numeric degrees of (quasi-)support.
//!
//! The [NumericResolver] combines a [SymbolicResolver] with a [ProbabilityComputer].
//! The degree of quasi-support of the inconsistency only depends on the knowledge base and is computed once.
use crate::datatypes::{Expression, SimpleSentence};
use crate::error::PasError;
use crate::probability::ProbabilityComputer;
use crate::resolver::SymbolicResolver;
use std::cell::Cell;

/// Computes degrees of quasi-support and support for a fixed knowledge base.
#[derive(Debug)]
pub struct NumericResolver<C: ProbabilityComputer> {
    resolver: SymbolicResolver,
    computer: C,
    dqs_i: Cell<Option<f64>>,
}

impl<C: ProbabilityComputer> NumericResolver<C> {
    /// Instantiates a new resolver, which evaluates the symbolic results with **computer**.
    pub fn new(resolver: SymbolicResolver, computer: C) -> Self {
        Self {
            resolver,
            computer,
            dqs_i: Cell::new(None),
        }
    }

    /// The underlying symbolic resolver.
    pub fn symbolic(&self) -> &SymbolicResolver {
        &self.resolver
    }

    /// Degree of quasi-support of the CNF **hypothesis**.
    pub fn calc_dqs(&self, hypothesis: &SimpleSentence) -> Result<f64, PasError> {
        log::info!("[Start] degree of quasi-support");
        let qs = self.resolver.find_qs(hypothesis)?;
        let result = self.computer.dnf_probability(&qs)?;
        log::info!("[Done] degree of quasi-support: {}", result);
        Ok(result)
    }

    /// Degree of quasi-support of the inconsistency, i.e. the probability that the knowledge base is contradicted.
    ///
    /// The value is cached for the life of the resolver.
    pub fn calc_dqs_i(&self) -> Result<f64, PasError> {
        if let Some(result) = self.dqs_i.get() {
            return Ok(result);
        }
        log::info!("[Start] degree of inconsistency");
        let qs = self.resolver.find_qs_clause(&Expression::clause())?;
        let result = self.computer.dnf_probability(&qs)?;
        self.dqs_i.set(Some(result));
        log::info!("[Done] degree of inconsistency: {}", result);
        Ok(result)
    }

    /// Degree of support of **hypothesis**, without conditioning on the consistency of the knowledge base.
    pub fn calc_non_normalised_dsp(&self, hypothesis: &SimpleSentence) -> Result<f64, PasError> {
        Ok(self.calc_dqs(hypothesis)? - self.calc_dqs_i()?)
    }

    /// Degree of support of **hypothesis**, conditioned on the consistency of the knowledge base.
    ///
    /// The result is [f64::NAN] if the knowledge base is contradicted in every scenario.
    pub fn calc_normalised_dsp(&self, hypothesis: &SimpleSentence) -> Result<f64, PasError> {
        let non_normalised = self.calc_non_normalised_dsp(hypothesis)?;
        let dqs_i = self.calc_dqs_i()?;
        if dqs_i == 1.0 {
            log::warn!("the knowledge base is inconsistent, the normalised degree of support is undefined");
            return Ok(f64::NAN);
        }
        Ok(non_normalised / (1.0 - dqs_i))
    }
}
