//! The inclusion-exclusion evaluator.
//!
//! `P(T1 + ... + Tn) = Σ_k (-1)^(k+1) Σ_{|C| = k} P(∧_{i ∈ C} Ti)`
//!
//! The subsets are enumerated recursively, conjoining the running term while descending.
//! Conjunctions which collapse to `False` contribute nothing and are not expanded any further.
use super::{trivial_probability, ProbabilityComputer};
use crate::datatypes::{Expression, SimpleSentence};
use crate::error::PasError;

/// Computes the probability of a DNF by the inclusion-exclusion principle.
///
/// The number of summands is exponential in the number of terms.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExpansionComputer;

impl ExpansionComputer {
    /// Sums the probabilities of all conjunctions of **running** with **picks** terms out of **remaining**.
    fn expand(
        remaining: &[Expression],
        picks: usize,
        running: &Expression,
    ) -> Result<f64, PasError> {
        if picks == 0 {
            return Ok(running.probability());
        }
        if remaining.len() < picks {
            return Ok(0.0);
        }
        let mut sum = 0.0;
        for idx in 0..=remaining.len() - picks {
            let conjunction = running.conjoin(&remaining[idx])?;
            if conjunction.is_false() {
                continue;
            }
            sum += Self::expand(&remaining[idx + 1..], picks - 1, &conjunction)?;
        }
        Ok(sum)
    }
}

impl ProbabilityComputer for ExpansionComputer {
    fn dnf_probability(&self, dnf: &SimpleSentence) -> Result<f64, PasError> {
        if let Some(result) = trivial_probability("expansion probability", dnf)? {
            return Ok(result);
        }
        let terms = dnf.elements();
        let mut result = 0.0;
        for picks in 1..=terms.len() {
            let summand = Self::expand(terms, picks, &Expression::term())?;
            log::trace!("{} picks contribute {}", picks, summand);
            if picks % 2 == 1 {
                result += summand;
            } else {
                result -= summand;
            }
        }
        log::debug!("expanded {} terms to {}", terms.len(), result);
        Ok(result)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::datatypes::{Connective, LiteralFactory};
    use test_log::test;

    #[test]
    fn expand() {
        let mut factory = LiteralFactory::new();
        let a = factory.assumption("a", 0.5).unwrap();
        let b = factory.assumption("b", 0.5).unwrap();
        let c = factory.assumption("c", 0.5).unwrap();
        let terms = vec![
            Expression::term_from([&a]),
            Expression::term_from([&b]),
            Expression::term_from([&c]),
        ];
        let start = Expression::term();
        assert_eq!(ExpansionComputer::expand(&terms, 0, &start).unwrap(), 1.0);
        assert_eq!(ExpansionComputer::expand(&terms, 1, &start).unwrap(), 1.5);
        assert_eq!(ExpansionComputer::expand(&terms, 2, &start).unwrap(), 0.75);
        assert_eq!(ExpansionComputer::expand(&terms, 3, &start).unwrap(), 0.125);
        assert_eq!(ExpansionComputer::expand(&terms, 4, &start).unwrap(), 0.0);

        // a ∧ ¬a is pruned
        let terms = vec![
            Expression::term_from([&a]),
            Expression::term_from([&a.negate(), &b]),
        ];
        assert_eq!(ExpansionComputer::expand(&terms, 2, &start).unwrap(), 0.0);
        assert!(ExpansionComputer::expand(&terms, 1, &Expression::clause()).is_err());
    }

    #[test]
    fn probability() {
        let mut factory = LiteralFactory::new();
        let a = factory.assumption("a", 0.5).unwrap();
        let b = factory.assumption("b", 0.5).unwrap();
        let c = factory.assumption("c", 0.5).unwrap();
        let dnf = SimpleSentence::from_elements(
            Connective::Or,
            vec![
                Expression::term_from([&a]),
                Expression::term_from([&b]),
                Expression::term_from([&c]),
            ],
        )
        .unwrap();
        // 1.5 - 0.75 + 0.125
        assert!((ExpansionComputer.dnf_probability(&dnf).unwrap() - 0.875).abs() < 1e-12);

        let dnf = SimpleSentence::from_elements(
            Connective::Or,
            vec![
                Expression::term_from([&a]),
                Expression::term_from([&a.negate(), &b]),
            ],
        )
        .unwrap();
        assert!((ExpansionComputer.dnf_probability(&dnf).unwrap() - 0.75).abs() < 1e-12);
    }
}
