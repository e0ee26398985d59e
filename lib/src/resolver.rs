/*!
Symbolic computation of quasi-supports and supports.

The knowledge base is a CNF over propositions and assumptions. For a hypothesis clause `h`,
the quasi-support is computed by
1. adding the negated literals of `h` as unit clauses to the knowledge base,
2. eliminating every proposition by resolution ([elim_x]),
3. completing the remaining CNF over the assumptions with all resolvents ([cons_x]), and
4. negating the resulting CNF into a DNF of scenarios.

Mu-reduction on every insertion keeps all intermediate sentences minimal, therefore the elimination order
only influences the size of the intermediate results.
 */
use crate::datatypes::{Connective, Expression, Literal, LiteralFactory, SimpleSentence};
use crate::error::PasError;

/// Computes quasi-supports and supports of hypotheses with respect to a fixed knowledge base.
#[derive(Debug, Clone)]
pub struct SymbolicResolver {
    knowledge_base: SimpleSentence,
    propositions: Vec<Literal>,
    assumptions: Vec<Literal>,
}

impl SymbolicResolver {
    /// Instantiates a resolver for the CNF **knowledge_base**.
    ///
    /// Propositions are eliminated and assumptions are completed in the creation order of the **factory**.
    pub fn new(knowledge_base: SimpleSentence, factory: &LiteralFactory) -> Result<Self, PasError> {
        Self::with_literals(
            knowledge_base,
            factory.propositions(),
            factory.assumptions(),
        )
    }

    /// Instantiates a resolver with an explicit elimination order.
    pub fn with_literals(
        knowledge_base: SimpleSentence,
        propositions: Vec<Literal>,
        assumptions: Vec<Literal>,
    ) -> Result<Self, PasError> {
        if !knowledge_base.is_cnf() {
            return Err(PasError::unsupported(
                "resolver",
                "a knowledge base which is not a CNF",
            ));
        }
        log::debug!(
            "resolver over {} clauses, {} propositions, {} assumptions",
            knowledge_base.len(),
            propositions.len(),
            assumptions.len()
        );
        Ok(Self {
            knowledge_base,
            propositions,
            assumptions,
        })
    }

    /// The knowledge base of the resolver.
    pub fn knowledge_base(&self) -> &SimpleSentence {
        &self.knowledge_base
    }

    /// Computes the quasi-support of a single hypothesis clause as DNF.
    ///
    /// The empty clause stands for the inconsistency, its quasi-support are the scenarios which contradict the knowledge base.
    pub fn find_qs_clause(&self, hypothesis: &Expression) -> Result<SimpleSentence, PasError> {
        if !hypothesis.is_clause() {
            return Err(PasError::unsupported(
                "find_qs_clause",
                "a hypothesis which is not a clause",
            ));
        }
        log::debug!("[Start] quasi-support of {}", hypothesis);
        let mut sentence = self.knowledge_base.clone();
        let negated = hypothesis.negate();
        for literal in negated.iter() {
            let mut unit = Expression::clause();
            unit.add_literal(literal);
            sentence.insert(unit);
        }
        log::trace!("extended knowledge base: {}", sentence);

        for proposition in &self.propositions {
            if sentence.is_false() {
                break;
            }
            sentence = elim_x(&sentence, proposition)?;
            log::debug!("eliminated {}, {} clauses left", proposition, sentence.len());
            log::trace!("{}", sentence);
        }
        for assumption in &self.assumptions {
            if sentence.is_false() {
                break;
            }
            sentence = cons_x(&sentence, assumption)?;
            log::debug!("completed {}, {} clauses", assumption, sentence.len());
            log::trace!("{}", sentence);
        }
        let result = sentence.negate();
        log::debug!("[Done] quasi-support of {}: {}", hypothesis, result);
        Ok(result)
    }

    /// Computes the quasi-support of a CNF hypothesis as DNF.
    ///
    /// The quasi-supports of the single clauses are intersected, the empty CNF yields `True`.
    pub fn find_qs(&self, hypothesis: &SimpleSentence) -> Result<SimpleSentence, PasError> {
        if !hypothesis.is_cnf() {
            return Err(PasError::unsupported(
                "find_qs",
                "a hypothesis which is not a CNF",
            ));
        }
        let mut result = SimpleSentence::top(Connective::Or);
        for clause in hypothesis.elements() {
            result = result.cross(&self.find_qs_clause(clause)?)?;
            if result.is_false() {
                break;
            }
        }
        Ok(result)
    }

    /// Computes the support of a CNF hypothesis as DNF, i.e. the quasi-support restricted to the
    /// scenarios which are consistent with the knowledge base.
    pub fn find_sp(&self, hypothesis: &SimpleSentence) -> Result<SimpleSentence, PasError> {
        let qs = self.find_qs(hypothesis)?;
        let inconsistent = self.find_qs_clause(&Expression::clause())?;
        qs.cross(&complement(&inconsistent)?)
    }
}

/// Resolves all clauses of **sentence** on the atom of **x**.
///
/// Returns the clauses without the atom, the clauses containing the positive literal (with the literal removed)
/// and the clauses containing the negative literal (with the literal removed).
fn partition(
    sentence: &SimpleSentence,
    x: &Literal,
) -> Result<(SimpleSentence, Vec<Expression>, Vec<Expression>), PasError> {
    if !sentence.is_cnf() {
        return Err(PasError::unsupported("resolution", "a sentence which is not a CNF"));
    }
    let positive = if x.is_negated() { x.negate() } else { x.clone() };
    let negative = positive.negate();
    let mut rest = SimpleSentence::cnf();
    let mut with_positive = Vec::new();
    let mut with_negative = Vec::new();
    for clause in sentence.elements() {
        if clause.contains(&positive) {
            let mut reduced = clause.clone();
            reduced.remove_literal(&positive);
            with_positive.push(reduced);
        } else if clause.contains(&negative) {
            let mut reduced = clause.clone();
            reduced.remove_literal(&negative);
            with_negative.push(reduced);
        } else {
            rest.insert(clause.clone());
        }
    }
    Ok((rest, with_positive, with_negative))
}

fn add_resolvents(target: &mut SimpleSentence, with_positive: &[Expression], with_negative: &[Expression]) {
    for left in with_positive {
        for right in with_negative {
            target.insert(left.union(right));
        }
    }
}

/// Eliminates the atom of **x** from the CNF: the clauses mentioning the atom are replaced by all their resolvents.
///
/// Tautological resolvents collapse to `True` and are dropped by mu-reduction.
pub fn elim_x(sentence: &SimpleSentence, x: &Literal) -> Result<SimpleSentence, PasError> {
    let (mut result, with_positive, with_negative) = partition(sentence, x)?;
    add_resolvents(&mut result, &with_positive, &with_negative);
    Ok(result)
}

/// Adds all resolvents on the atom of **x** to the CNF, the original clauses are kept.
pub fn cons_x(sentence: &SimpleSentence, x: &Literal) -> Result<SimpleSentence, PasError> {
    let (_, with_positive, with_negative) = partition(sentence, x)?;
    let mut result = sentence.clone();
    add_resolvents(&mut result, &with_positive, &with_negative);
    Ok(result)
}

/// Computes a DNF of the complementary scenarios of the DNF **dnf**.
///
/// Each term is negated into a clause, which is read as DNF of unit terms; these DNFs are intersected.
pub fn complement(dnf: &SimpleSentence) -> Result<SimpleSentence, PasError> {
    if !dnf.is_dnf() {
        return Err(PasError::unsupported("complement", "a sentence which is not a DNF"));
    }
    let mut result = SimpleSentence::top(Connective::Or);
    for term in dnf.elements() {
        result = result.cross_unchecked(&term.negate().split());
        if result.is_false() {
            break;
        }
    }
    log::trace!("complement of {} is {}", dnf, result);
    Ok(result)
}
