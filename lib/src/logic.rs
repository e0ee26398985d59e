/*!
Algebra on literals, expressions, and sentences.

All combinations of the three syntactic levels are expressed through one sum type, [Formula].
The result of an operation is always lifted to the smallest level which can represent it:

| `and`            | literal / term | clause | CNF   | DNF   |
|------------------|----------------|--------|-------|-------|
| literal / term   | term           | CNF    | CNF   | DNF   |
| clause           | CNF            | CNF    | CNF   | DNF   |
| CNF              | CNF            | CNF    | CNF   | error |
| DNF              | DNF            | DNF    | error | DNF   |

The table for `or` is the dual one. A CNF and a DNF cannot be combined directly; one of them needs to be
[converted][Formula::convert] first.
 */
use crate::datatypes::{Connective, Expression, Literal, SimpleSentence};
use crate::error::PasError;
use std::fmt::Display;

/// A propositional formula in one of the supported normal forms.
#[derive(Debug, Clone, PartialEq)]
pub enum Formula {
    /// A single literal.
    Literal(Literal),
    /// A term or a clause.
    Expression(Expression),
    /// A CNF or a DNF.
    Sentence(SimpleSentence),
}

impl From<Literal> for Formula {
    fn from(value: Literal) -> Self {
        Formula::Literal(value)
    }
}

impl From<Expression> for Formula {
    fn from(value: Expression) -> Self {
        Formula::Expression(value)
    }
}

impl From<SimpleSentence> for Formula {
    fn from(value: SimpleSentence) -> Self {
        Formula::Sentence(value)
    }
}

impl Display for Formula {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Formula::Literal(literal) => write!(f, "{}", literal),
            Formula::Expression(expression) => write!(f, "{}", expression),
            Formula::Sentence(sentence) => write!(f, "{}", sentence),
        }
    }
}

/// Operand of a binary operation, lifted for the operation's connective.
enum Operand {
    /// An expression with the connective of the operation.
    Flat(Expression),
    /// A sentence, possibly lifted from an expression of the dual connective.
    Nested(SimpleSentence),
}

impl Formula {
    fn lift(self, op: Connective) -> Operand {
        match self {
            Formula::Literal(literal) => {
                let mut result = Expression::new(op);
                result.add_literal(&literal);
                Operand::Flat(result)
            }
            Formula::Expression(expression) if expression.connective() == op => {
                Operand::Flat(expression)
            }
            Formula::Expression(expression) => Operand::Nested(expression.into_sentence()),
            Formula::Sentence(sentence) => Operand::Nested(sentence),
        }
    }

    fn combine(self, other: Formula, op: Connective) -> Result<Formula, PasError> {
        let result = match (self.lift(op), other.lift(op)) {
            (Operand::Flat(left), Operand::Flat(right)) => Formula::Expression(left.union(&right)),
            (Operand::Flat(flat), Operand::Nested(mut nested))
            | (Operand::Nested(mut nested), Operand::Flat(flat)) => {
                if nested.connective() == op {
                    nested.merge(&flat.split())?;
                    Formula::Sentence(nested)
                } else {
                    Formula::Sentence(nested.cross(&flat.into_sentence())?)
                }
            }
            (Operand::Nested(mut left), Operand::Nested(right)) => {
                if left.connective() != right.connective() {
                    return Err(PasError::unsupported(
                        if op == Connective::And { "and" } else { "or" },
                        "a CNF and a DNF, convert one of them first",
                    ));
                }
                if left.connective() == op {
                    left.merge(&right)?;
                    Formula::Sentence(left)
                } else {
                    Formula::Sentence(left.cross(&right)?)
                }
            }
        };
        log::trace!("{:?}-combination yields {}", op, result);
        Ok(result)
    }

    /// Conjunction of two formulae.
    pub fn and(self, other: impl Into<Formula>) -> Result<Formula, PasError> {
        self.combine(other.into(), Connective::And)
    }

    /// Disjunction of two formulae.
    pub fn or(self, other: impl Into<Formula>) -> Result<Formula, PasError> {
        self.combine(other.into(), Connective::Or)
    }

    /// Negation of the formula, the level of the formula is kept and the connectives are swapped.
    pub fn negate(&self) -> Formula {
        match self {
            Formula::Literal(literal) => Formula::Literal(literal.negate()),
            Formula::Expression(expression) => Formula::Expression(expression.negate()),
            Formula::Sentence(sentence) => Formula::Sentence(sentence.negate()),
        }
    }

    /// Converts a sentence into the dual normal form.
    ///
    /// A term becomes the CNF of its unit clauses and a clause the DNF of its unit terms, literals stay as they are.
    pub fn convert(&self) -> Formula {
        match self {
            Formula::Literal(literal) => Formula::Literal(literal.clone()),
            Formula::Expression(expression) => Formula::Sentence(expression.split()),
            Formula::Sentence(sentence) => Formula::Sentence(sentence.convert()),
        }
    }

    /// Returns the contained sentence, if there is one.
    pub fn into_sentence(self) -> Option<SimpleSentence> {
        match self {
            Formula::Sentence(sentence) => Some(sentence),
            _ => None,
        }
    }

    /// Returns the contained expression, if there is one.
    pub fn into_expression(self) -> Option<Expression> {
        match self {
            Formula::Expression(expression) => Some(expression),
            _ => None,
        }
    }
}

fn expect_expression(
    operation: &'static str,
    expression: &Expression,
    connective: Connective,
) -> Result<(), PasError> {
    if expression.connective() == connective {
        Ok(())
    } else {
        Err(PasError::unsupported(
            operation,
            format!("a {:?}-expression", expression.connective()),
        ))
    }
}

fn expect_sentence(
    operation: &'static str,
    sentence: &SimpleSentence,
    connective: Connective,
) -> Result<(), PasError> {
    if sentence.connective() == connective {
        Ok(())
    } else {
        Err(PasError::unsupported(
            operation,
            format!("a {:?}-sentence", sentence.connective()),
        ))
    }
}

/// Negates a term into a clause.
pub fn negate_term(term: &Expression) -> Result<Expression, PasError> {
    expect_expression("negate_term", term, Connective::And)?;
    Ok(term.negate())
}

/// Negates a clause into a term.
pub fn negate_clause(clause: &Expression) -> Result<Expression, PasError> {
    expect_expression("negate_clause", clause, Connective::Or)?;
    Ok(clause.negate())
}

/// Negates a DNF into a CNF.
pub fn negate_dnf(dnf: &SimpleSentence) -> Result<SimpleSentence, PasError> {
    expect_sentence("negate_dnf", dnf, Connective::Or)?;
    Ok(dnf.negate())
}

/// Negates a CNF into a DNF.
pub fn negate_cnf(cnf: &SimpleSentence) -> Result<SimpleSentence, PasError> {
    expect_sentence("negate_cnf", cnf, Connective::And)?;
    Ok(cnf.negate())
}

/// Converts a CNF into an equivalent, mu-reduced DNF.
pub fn cnf_to_dnf(cnf: &SimpleSentence) -> Result<SimpleSentence, PasError> {
    expect_sentence("cnf_to_dnf", cnf, Connective::And)?;
    Ok(cnf.convert())
}

/// Converts a DNF into an equivalent, mu-reduced CNF.
pub fn dnf_to_cnf(dnf: &SimpleSentence) -> Result<SimpleSentence, PasError> {
    expect_sentence("dnf_to_cnf", dnf, Connective::Or)?;
    Ok(dnf.convert())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::datatypes::LiteralFactory;
    use test_log::test;

    fn literals() -> (Literal, Literal, Literal) {
        let mut factory = LiteralFactory::new();
        (
            factory.assumption("a", 0.5).unwrap(),
            factory.assumption("b", 0.5).unwrap(),
            factory.proposition("x").unwrap(),
        )
    }

    #[test]
    fn literal_level() {
        let (a, b, x) = literals();
        let term = Formula::from(a.clone()).and(b.clone()).unwrap();
        assert_eq!(format!("{}", term), "a b");
        let clause = Formula::from(a.clone()).or(x.clone()).unwrap();
        assert_eq!(format!("{}", clause), "(a + x)");
        let contradiction = Formula::from(a.clone()).and(a.negate()).unwrap();
        assert!(contradiction.into_expression().unwrap().is_false());
        assert_eq!(Formula::from(a.clone()).negate(), Formula::from(a.negate()));
        assert_eq!(Formula::from(b.clone()).convert(), Formula::from(b));
    }

    #[test]
    fn lifting() {
        let (a, b, x) = literals();
        let clause = Expression::clause_from([&a, &x]);
        let cnf = Formula::from(clause.clone()).and(b.clone()).unwrap();
        assert_eq!(format!("{}", cnf), "[(a + x)(b)]");

        let term = Expression::term_from([&a, &b]);
        let dnf = Formula::from(term).or(x.negate()).unwrap();
        assert_eq!(format!("{}", dnf), "[a b + ¬x]");

        let both = Formula::from(clause.clone())
            .and(Expression::clause_from([&b]))
            .unwrap();
        assert_eq!(format!("{}", both), "[(a + x)(b)]");

        // a term conjoined to a CNF is split into unit clauses
        let merged = cnf
            .clone()
            .and(Expression::term_from([&x.negate()]))
            .unwrap();
        assert_eq!(format!("{}", merged), "[(a + x)(b)(¬x)]");

        // the DNF absorbs the subsumed term
        let dnf = dnf.or(Expression::term_from([&a])).unwrap();
        assert_eq!(format!("{}", dnf), "[¬x + a]");
    }

    #[test]
    fn sentences() {
        let (a, b, x) = literals();
        let left = SimpleSentence::from_elements(
            Connective::Or,
            vec![Expression::term_from([&a]), Expression::term_from([&b])],
        )
        .unwrap();
        let right = Expression::term_from([&x]).into_sentence();
        let crossed = Formula::from(left.clone()).and(right.clone()).unwrap();
        assert_eq!(format!("{}", crossed), "[a x + b x]");
        let merged = Formula::from(left.clone()).or(right).unwrap();
        assert_eq!(format!("{}", merged), "[a + b + x]");

        let cnf = Expression::clause_from([&a, &b]).into_sentence();
        assert!(matches!(
            Formula::from(left.clone()).and(cnf.clone()),
            Err(PasError::UnsupportedOperator { .. })
        ));
        assert!(Formula::from(left.clone()).or(cnf.clone()).is_err());
        assert_eq!(Formula::from(cnf.clone()).convert(), Formula::from(left.clone()));
        assert_eq!(
            Formula::from(left).negate(),
            Formula::from(
                SimpleSentence::from_elements(
                    Connective::And,
                    vec![
                        Expression::clause_from([&a.negate()]),
                        Expression::clause_from([&b.negate()])
                    ]
                )
                .unwrap()
            )
        );
    }

    #[test]
    fn checked_helpers() {
        let (a, b, _x) = literals();
        let term = Expression::term_from([&a, &b]);
        let clause = Expression::clause_from([&a, &b]);
        assert_eq!(negate_term(&term).unwrap(), Expression::clause_from([&a.negate(), &b.negate()]));
        assert!(negate_term(&clause).is_err());
        assert_eq!(negate_clause(&clause).unwrap(), Expression::term_from([&a.negate(), &b.negate()]));
        assert!(negate_clause(&term).is_err());

        let cnf = SimpleSentence::from_elements(
            Connective::And,
            vec![Expression::clause_from([&a]), Expression::clause_from([&a.negate(), &b])],
        )
        .unwrap();
        let dnf = cnf_to_dnf(&cnf).unwrap();
        assert_eq!(format!("{}", dnf), "[a b]");
        assert!(cnf_to_dnf(&dnf).is_err());
        assert!(dnf_to_cnf(&cnf).is_err());
        assert_eq!(
            dnf_to_cnf(&dnf).unwrap(),
            SimpleSentence::from_elements(
                Connective::And,
                vec![Expression::clause_from([&a]), Expression::clause_from([&b])]
            )
            .unwrap()
        );
        assert_eq!(format!("{}", negate_cnf(&cnf).unwrap()), "[¬a + a ¬b]");
        assert!(negate_cnf(&dnf).is_err());
        assert_eq!(format!("{}", negate_dnf(&dnf).unwrap()), "[(¬a + ¬b)]");
        assert!(negate_dnf(&cnf).is_err());
    }
}
