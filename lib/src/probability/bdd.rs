//! The decision-diagram evaluator.
//!
//! Each call compiles the DNF into a fresh [Bdd], which is dropped when the call returns.
//! The distinct assumptions of the DNF are mapped to the diagram variables in ascending literal index order.
use super::{trivial_probability, ProbabilityComputer};
use crate::datatypes::{LiteralIndex, SimpleSentence, Term, Var};
use crate::error::PasError;
use crate::obdd::Bdd;
use std::collections::BTreeMap;
#[cfg(feature = "dotexport")]
use std::path::PathBuf;

/// Computes the probability of a DNF with an ordered decision diagram.
#[derive(Debug, Clone, Default)]
#[cfg_attr(not(feature = "dotexport"), derive(Copy))]
pub struct BddComputer {
    #[cfg(feature = "dotexport")]
    dot_output: Option<PathBuf>,
}

impl BddComputer {
    /// Instantiates the evaluator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Instantiates an evaluator, which writes the diagram of every evaluated DNF as DOT graph to **path**.
    #[cfg(feature = "dotexport")]
    pub fn with_dot_output(path: impl Into<PathBuf>) -> Self {
        Self {
            dot_output: Some(path.into()),
        }
    }

    /// Compiles **dnf** into **bdd** and returns the root.
    fn compile(
        bdd: &mut Bdd,
        dnf: &SimpleSentence,
        variables: &BTreeMap<LiteralIndex, (Var, f64)>,
    ) -> Term {
        let mut root = Bdd::constant(false);
        for term in dnf.elements() {
            let mut conjunction = Bdd::constant(true);
            for literal in term.iter() {
                let var = variables[&literal.index()].0;
                let node = if literal.is_negated() {
                    bdd.not_variable(var)
                } else {
                    bdd.variable(var)
                };
                conjunction = bdd.and(conjunction, node);
            }
            root = bdd.or(root, conjunction);
        }
        root
    }

    /// Maps the assumptions of **dnf** to diagram variables, in ascending index order.
    fn variables(dnf: &SimpleSentence) -> BTreeMap<LiteralIndex, (Var, f64)> {
        let mut result = BTreeMap::new();
        for literal in dnf.elements().iter().flat_map(|term| term.iter()) {
            result
                .entry(literal.index())
                .or_insert_with(|| (Var(0), literal.atom_probability().unwrap_or(f64::NAN)));
        }
        for (var, value) in result.values_mut().enumerate() {
            value.0 = Var(var);
        }
        result
    }

    #[cfg(feature = "dotexport")]
    fn biodivine(
        dnf: &SimpleSentence,
    ) -> (
        biodivine_lib_bdd::BddVariableSet,
        biodivine_lib_bdd::Bdd,
    ) {
        use biodivine_lib_bdd::boolean_expression::BooleanExpression;

        let mut names = BTreeMap::new();
        for literal in dnf.elements().iter().flat_map(|term| term.iter()) {
            names
                .entry(literal.index())
                .or_insert_with(|| literal.name().to_string());
        }
        let mut builder = biodivine_lib_bdd::BddVariableSetBuilder::new();
        let slice_vec: Vec<&str> = names.values().map(<_>::as_ref).collect();
        builder.make_variables(&slice_vec);
        let varset = builder.build();

        let expression = dnf
            .elements()
            .iter()
            .fold(BooleanExpression::Const(false), |disjunction, term| {
                let conjunction =
                    term.iter()
                        .fold(BooleanExpression::Const(true), |conjunction, literal| {
                            let variable = BooleanExpression::Variable(literal.name().to_string());
                            let variable = if literal.is_negated() {
                                BooleanExpression::Not(Box::new(variable))
                            } else {
                                variable
                            };
                            BooleanExpression::And(Box::new(conjunction), Box::new(variable))
                        });
                BooleanExpression::Or(Box::new(disjunction), Box::new(conjunction))
            });
        let bdd = varset.eval_expression(&expression);
        (varset, bdd)
    }

    /// Returns the decision diagram of **dnf** as DOT graph, the variables are named after the literals.
    #[cfg(feature = "dotexport")]
    pub fn dot(&self, dnf: &SimpleSentence) -> Result<String, PasError> {
        if !dnf.is_dnf() {
            return Err(PasError::unsupported(
                "dot",
                "a sentence which is not a DNF",
            ));
        }
        let (varset, bdd) = Self::biodivine(dnf);
        log::debug!("exported diagram has {} nodes", bdd.size());
        Ok(bdd.to_dot_string(&varset, true))
    }

    #[cfg(feature = "dotexport")]
    fn export(&self, dnf: &SimpleSentence) {
        let path = match &self.dot_output {
            Some(path) => path,
            None => return,
        };
        match self
            .dot(dnf)
            .map(|dot| std::fs::write(path, dot))
        {
            Ok(Ok(())) => log::info!("[Done] wrote decision diagram to {}", path.display()),
            Ok(Err(e)) => log::error!(
                "Error during export of the decision diagram to {}: {}",
                path.display(),
                e
            ),
            Err(e) => log::error!("Error during export of the decision diagram: {}", e),
        }
    }
}

impl ProbabilityComputer for BddComputer {
    fn dnf_probability(&self, dnf: &SimpleSentence) -> Result<f64, PasError> {
        if let Some(result) = trivial_probability("bdd probability", dnf)? {
            return Ok(result);
        }
        let variables = Self::variables(dnf);
        let weights = variables
            .values()
            .map(|(_, weight)| *weight)
            .collect::<Vec<f64>>();
        let mut bdd = Bdd::new();
        let root = Self::compile(&mut bdd, dnf, &variables);
        log::debug!(
            "compiled {} terms over {} variables into {} nodes",
            dnf.len(),
            variables.len(),
            bdd.size()
        );
        #[cfg(feature = "dotexport")]
        self.export(dnf);
        Ok(bdd.probability(root, &weights))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::datatypes::{Connective, Expression, LiteralFactory};
    use test_log::test;

    #[test]
    fn variable_order() {
        let mut factory = LiteralFactory::new();
        let a = factory.assumption("a", 0.1).unwrap();
        let _unused = factory.assumption("b", 0.2).unwrap();
        let c = factory.assumption("c", 0.3).unwrap();
        let dnf = SimpleSentence::from_elements(
            Connective::Or,
            vec![
                Expression::term_from([&c]),
                Expression::term_from([&a.negate(), &c]),
            ],
        )
        .unwrap();
        let variables = BddComputer::variables(&dnf);
        assert_eq!(variables.len(), 1);
        assert_eq!(variables[&c.index()], (Var(0), 0.3));

        let dnf = SimpleSentence::from_elements(
            Connective::Or,
            vec![
                Expression::term_from([&c]),
                Expression::term_from([&a.negate()]),
            ],
        )
        .unwrap();
        let variables = BddComputer::variables(&dnf);
        assert_eq!(variables[&a.index()], (Var(0), 0.1));
        assert_eq!(variables[&c.index()], (Var(1), 0.3));
    }

    #[test]
    fn probability() {
        let mut factory = LiteralFactory::new();
        let a = factory.assumption("a", 0.1).unwrap();
        let b = factory.assumption("b", 0.2).unwrap();
        let computer = BddComputer::new();

        let dnf = SimpleSentence::from_elements(
            Connective::Or,
            vec![
                Expression::term_from([&a]),
                Expression::term_from([&a.negate(), &b]),
            ],
        )
        .unwrap();
        // 0.1 + 0.9 * 0.2
        assert!((computer.dnf_probability(&dnf).unwrap() - 0.28).abs() < 1e-12);

        // a + ¬a is valid, the diagram is constant
        let dnf = SimpleSentence::from_elements(
            Connective::Or,
            vec![
                Expression::term_from([&a]),
                Expression::term_from([&a.negate()]),
            ],
        )
        .unwrap();
        assert_eq!(computer.dnf_probability(&dnf).unwrap(), 1.0);
    }

    #[cfg(feature = "dotexport")]
    #[test]
    fn dot_export() {
        let mut factory = LiteralFactory::new();
        let a = factory.assumption("a", 0.1).unwrap();
        let b = factory.assumption("b", 0.2).unwrap();
        let dnf = SimpleSentence::from_elements(
            Connective::Or,
            vec![Expression::term_from([&a, &b.negate()])],
        )
        .unwrap();

        let path = std::env::temp_dir().join(format!(
            "pas_bdd_dot_export_{}.dot",
            std::process::id()
        ));
        let computer = BddComputer::with_dot_output(&path);
        assert!((computer.dnf_probability(&dnf).unwrap() - 0.08).abs() < 1e-12);
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, computer.dot(&dnf).unwrap());
        assert!(written.contains("digraph"));
        assert!(written.contains("\"a\""));
        std::fs::remove_file(&path).unwrap();

        assert!(computer.dot(&SimpleSentence::cnf()).is_err());

        // unwritable targets do not change the result
        let computer = BddComputer::with_dot_output(
            std::env::temp_dir()
                .join("pas_bdd_missing")
                .join("dir")
                .join("out.dot"),
        );
        assert!((computer.dnf_probability(&dnf).unwrap() - 0.08).abs() < 1e-12);
    }

    #[cfg(feature = "dotexport")]
    #[test]
    fn constants_agree_with_biodivine() {
        let mut factory = LiteralFactory::new();
        let a = factory.assumption("a", 0.1).unwrap();
        let b = factory.assumption("b", 0.2).unwrap();
        let valid = SimpleSentence::from_elements(
            Connective::Or,
            vec![
                Expression::term_from([&a]),
                Expression::term_from([&a.negate(), &b]),
                Expression::term_from([&b.negate()]),
            ],
        )
        .unwrap();
        let contingent = Expression::term_from([&a, &b]).into_sentence();
        for dnf in [
            valid,
            contingent,
            SimpleSentence::dnf(),
            SimpleSentence::top(Connective::Or),
        ] {
            let mut bdd = Bdd::new();
            let variables = BddComputer::variables(&dnf);
            let root = BddComputer::compile(&mut bdd, &dnf, &variables);
            let (_, reference) = BddComputer::biodivine(&dnf);
            let expected = if reference.is_true() {
                Some(1.0)
            } else if reference.is_false() {
                Some(0.0)
            } else {
                None
            };
            assert_eq!(root.constant_probability(), expected);
        }
    }
}
