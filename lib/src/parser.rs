//! A parser for probabilistic argumentation systems in an ASP-like syntax.
//!
//! Each statement is terminated by a `.`:
//! - `p(x)` declares the proposition `x`
//! - `a(a,0.1)` declares the assumption `a` with probability `0.1`
//! - `cl(neg(a),x,y)` adds the clause `(¬a + x + y)` to the knowledge base, `cl()` adds the empty clause
//! - `r(a,x,y)` adds the rule `a ∧ x → y`, i.e. the clause `(¬a + ¬x + y)`
//! - `h(y)` adds the clause `(y)` to the hypothesis, `h()` stands for the inconsistency
//!
//! Names are either alphanumeric or enclosed in double quotes.
use std::cell::RefCell;

use nom::{
    branch::alt,
    bytes::complete::{tag, take_until},
    character::complete::{alphanumeric1, multispace0},
    combinator::map,
    multi::{many1, separated_list0, separated_list1},
    number::complete::double,
    sequence::{delimited, preceded, separated_pair, terminated},
    IResult,
};

use crate::datatypes::{Expression, Literal, LiteralFactory, SimpleSentence};
use crate::error::{ConstructionError, PasError};

/// A name with a sign, as it occurs in a clause.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SignedName {
    name: String,
    negated: bool,
}

impl From<(&str, bool)> for SignedName {
    fn from((name, negated): (&str, bool)) -> Self {
        Self {
            name: name.to_string(),
            negated,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Declaration {
    Proposition(String),
    Assumption(String, f64),
}

#[derive(Debug, Clone, PartialEq)]
enum Entry {
    Clause(Vec<SignedName>),
    Rule(Vec<SignedName>, SignedName),
}

/// A parsed knowledge base together with the hypothesis, both as CNF.
#[derive(Debug, Clone)]
pub struct PasInstance {
    /// The knowledge base
    pub knowledge_base: SimpleSentence,
    /// The hypothesis, the empty CNF if no hypothesis has been stated
    pub hypothesis: SimpleSentence,
}

/// A parser which reads a probabilistic argumentation system.
///
/// Note that the parser can be utilised by an [nom parser](https://docs.rs/nom/latest/nom/) and the parsed statements
/// are collected in the parser; [instantiate][PasParser::instantiate] builds the sentences afterwards.
#[derive(Debug, Default)]
pub struct PasParser {
    declarations: RefCell<Vec<Declaration>>,
    entries: RefCell<Vec<Entry>>,
    hypothesis: RefCell<Vec<Vec<SignedName>>>,
}

impl PasParser {
    /// Parses a full input string and collects its statements.
    ///
    /// Returns the unparsed remainder of the input.
    pub fn parse<'a>(&'a self) -> impl FnMut(&'a str) -> IResult<&'a str, ()> {
        move |input| {
            let (rem, _) = preceded(
                multispace0,
                many1(alt((
                    self.parse_proposition(),
                    self.parse_assumption(),
                    self.parse_clause(),
                    self.parse_rule(),
                    self.parse_hypothesis(),
                ))),
            )(input)?;
            Ok((rem, ()))
        }
    }

    fn parse_proposition<'a>(&'a self) -> impl FnMut(&'a str) -> IResult<&'a str, ()> {
        move |input| {
            let (remain, name) = terminated(PasParser::proposition, PasParser::terminator)(input)?;
            self.declarations
                .borrow_mut()
                .push(Declaration::Proposition(name.to_string()));
            Ok((remain, ()))
        }
    }

    fn parse_assumption<'a>(&'a self) -> impl FnMut(&'a str) -> IResult<&'a str, ()> {
        move |input| {
            let (remain, (name, probability)) =
                terminated(PasParser::assumption, PasParser::terminator)(input)?;
            self.declarations
                .borrow_mut()
                .push(Declaration::Assumption(name.to_string(), probability));
            Ok((remain, ()))
        }
    }

    fn parse_clause<'a>(&'a self) -> impl FnMut(&'a str) -> IResult<&'a str, ()> {
        move |input| {
            let (remain, literals) = terminated(PasParser::clause, PasParser::terminator)(input)?;
            self.entries.borrow_mut().push(Entry::Clause(
                literals.into_iter().map(SignedName::from).collect(),
            ));
            Ok((remain, ()))
        }
    }

    fn parse_rule<'a>(&'a self) -> impl FnMut(&'a str) -> IResult<&'a str, ()> {
        move |input| {
            let (remain, mut literals) =
                terminated(PasParser::rule, PasParser::terminator)(input)?;
            // separated_list1 guarantees a head
            if let Some(head) = literals.pop() {
                self.entries.borrow_mut().push(Entry::Rule(
                    literals.into_iter().map(SignedName::from).collect(),
                    head.into(),
                ));
            }
            Ok((remain, ()))
        }
    }

    fn parse_hypothesis<'a>(&'a self) -> impl FnMut(&'a str) -> IResult<&'a str, ()> {
        move |input| {
            let (remain, literals) =
                terminated(PasParser::hypothesis, PasParser::terminator)(input)?;
            self.hypothesis
                .borrow_mut()
                .push(literals.into_iter().map(SignedName::from).collect());
            Ok((remain, ()))
        }
    }
}

impl PasParser {
    fn terminator(input: &str) -> IResult<&str, &str> {
        terminated(tag("."), multispace0)(input)
    }

    fn separator(input: &str) -> IResult<&str, &str> {
        delimited(multispace0, tag(","), multispace0)(input)
    }

    fn proposition(input: &str) -> IResult<&str, &str> {
        preceded(tag("p"), delimited(tag("("), PasParser::atomic, tag(")")))(input)
    }

    fn assumption(input: &str) -> IResult<&str, (&str, f64)> {
        preceded(
            tag("a"),
            delimited(
                tag("("),
                separated_pair(PasParser::atomic, PasParser::separator, double),
                tag(")"),
            ),
        )(input)
    }

    fn clause(input: &str) -> IResult<&str, Vec<(&str, bool)>> {
        preceded(
            tag("cl"),
            delimited(
                tag("("),
                separated_list0(PasParser::separator, PasParser::literal),
                tag(")"),
            ),
        )(input)
    }

    fn rule(input: &str) -> IResult<&str, Vec<(&str, bool)>> {
        preceded(
            tag("r"),
            delimited(
                tag("("),
                separated_list1(PasParser::separator, PasParser::literal),
                tag(")"),
            ),
        )(input)
    }

    fn hypothesis(input: &str) -> IResult<&str, Vec<(&str, bool)>> {
        preceded(
            tag("h"),
            delimited(
                tag("("),
                separated_list0(PasParser::separator, PasParser::literal),
                tag(")"),
            ),
        )(input)
    }

    fn literal(input: &str) -> IResult<&str, (&str, bool)> {
        alt((
            map(
                preceded(
                    tag("neg"),
                    delimited(tag("("), PasParser::atomic, tag(")")),
                ),
                |name| (name, true),
            ),
            map(PasParser::atomic, |name| (name, false)),
        ))(input)
    }

    fn atomic(input: &str) -> IResult<&str, &str> {
        alt((
            delimited(tag("\""), take_until("\""), tag("\"")),
            alphanumeric1,
        ))(input)
    }

    /// Number of declared propositions and assumptions.
    pub fn declaration_count(&self) -> usize {
        self.declarations.borrow().len()
    }

    /// Number of knowledge base clauses and rules.
    pub fn clause_count(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Number of hypothesis clauses.
    pub fn hypothesis_count(&self) -> usize {
        self.hypothesis.borrow().len()
    }

    /// Declares all parsed propositions and assumptions in **factory** and builds the knowledge base and the hypothesis.
    pub fn instantiate(&self, factory: &mut LiteralFactory) -> Result<PasInstance, PasError> {
        log::info!("[Start] instantiating knowledge base");
        for declaration in self.declarations.borrow().iter() {
            match declaration {
                Declaration::Proposition(name) => factory.proposition(name)?,
                Declaration::Assumption(name, probability) => {
                    factory.assumption(name, *probability)?
                }
            };
        }
        log::debug!("declared {} literals", factory.len());

        let mut knowledge_base = SimpleSentence::cnf();
        for entry in self.entries.borrow().iter() {
            let clause = match entry {
                Entry::Clause(literals) => {
                    let literals = PasParser::resolve(factory, literals)?;
                    Expression::clause_from(literals.iter())
                }
                Entry::Rule(body, head) => {
                    let body = PasParser::resolve(factory, body)?;
                    let head = PasParser::resolve_name(factory, head)?;
                    Expression::horn_clause(&body, &head)
                }
            };
            log::trace!("knowledge base clause {}", clause);
            knowledge_base.add_element(clause)?;
        }

        let mut hypothesis = SimpleSentence::cnf();
        for literals in self.hypothesis.borrow().iter() {
            let literals = PasParser::resolve(factory, literals)?;
            hypothesis.add_element(Expression::clause_from(literals.iter()))?;
        }
        log::info!(
            "[Done] instantiating knowledge base with {} clauses, hypothesis {}",
            knowledge_base.len(),
            hypothesis
        );
        Ok(PasInstance {
            knowledge_base,
            hypothesis,
        })
    }

    fn resolve_name(factory: &LiteralFactory, signed: &SignedName) -> Result<Literal, PasError> {
        let literal = factory
            .literal(&signed.name)
            .ok_or_else(|| ConstructionError::UnknownName {
                name: signed.name.clone(),
            })?;
        Ok(if signed.negated {
            literal.negate()
        } else {
            literal
        })
    }

    fn resolve(factory: &LiteralFactory, names: &[SignedName]) -> Result<Vec<Literal>, PasError> {
        names
            .iter()
            .map(|signed| PasParser::resolve_name(factory, signed))
            .collect()
    }
}
