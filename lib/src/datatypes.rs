//! Datatypes of the library.
//!
//! - [literal] holds the signed atoms and the [LiteralFactory] owning them
//! - [expression] holds terms and clauses
//! - [sentence] holds the mu-reduced normal forms (CNF and DNF)
//! - the decision-diagram handles [Term], [Var], and [BddNode] are used by the [obdd][crate::obdd] module
mod bdd;
pub mod expression;
pub mod literal;
pub mod sentence;

pub use bdd::*;
pub use expression::{Connective, Expression};
pub use literal::{Literal, LiteralFactory, LiteralIndex, LiteralKind};
pub use sentence::SimpleSentence;
