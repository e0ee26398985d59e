/*!
This library computes degrees of support in `Probabilistic Argumentation Systems (PAS)` by utilising an implementation of `Ordered Binary Decision Diagrams (OBDD)`

# Probabilistic Argumentation Systems
A `probabilistic argumentation system` consists of a knowledge base over two kinds of atoms: propositions, which are deterministic, and assumptions, which hold independently of each other with a given probability.
The knowledge base is a propositional sentence in conjunctive normal form (CNF). An assignment of truth values to all assumptions is called a scenario.

For a hypothesis `h`, again in CNF, we are interested in the scenarios which allow to derive `h`:
- the quasi-support `QS(h)` contains all scenarios which, together with the knowledge base, entail `h`; this includes the scenarios which contradict the knowledge base,
- the support `SP(h)` contains only the scenarios of `QS(h)` which are consistent with the knowledge base.

Both are represented as minimal sentences in disjunctive normal form (DNF) over the assumptions, computed by resolution (see [resolver]).
Their probabilities are the degree of quasi-support `dqs(h)` and the degree of support `dsp(h)` (see [numeric]).

## Noteworthy relations
- `QS(⊥)`, for the empty clause `⊥`, contains exactly the scenarios which contradict the knowledge base
- `dsp(h) = (dqs(h) - dqs(⊥)) / (1 - dqs(⊥))`, which is undefined for a knowledge base that is contradicted by every scenario
- all normal form sentences are kept *mu-reduced*, i.e. no element is a subset of another one

# Reduced Ordered Binary Decision Diagram (roBDD)
A `reduced ordered binary decision diagram` is a normalised representation of binary functions.
The probability of a DNF over independent assumptions can be computed in one sweep over its roBDD, in time linear in the size of the diagram.
To cross-check this approach, an inclusion-exclusion based evaluator with an independent implementation is available as well (see [probability]).

The roBDD is implemented in this crate, the state-of-the art library <https://github.com/sybila/biodivine-lib-bdd> is used to export diagrams in the DOT format.

# Input-file format
Propositions are declared by the unary predicate `p`, assumptions by the binary predicate `a`, which relates the name of the assumption to its probability.
Clauses of the knowledge base and the hypothesis consist of names, which might be negated:
- `cl(l1,...,ln)`: the clause `l1 ∨ ... ∨ ln` of the knowledge base
- `r(l1,...,ln,l)`: the rule `l1 ∧ ... ∧ ln → l`, which is a clause of the knowledge base too
- `h(l1,...,ln)`: a clause of the hypothesis
- `neg(x)`: classical negation
*/

/*!
## Example input file:
```prolog
a(a,0.1).
a(b,0.2).
a(c,0.3).
p(x).
p(y).
p(z).

r(a,x,y).
r(b,z).
cl(neg(y),neg(z)).
cl(c,x).
cl(neg(c),neg(z)).

h(y).
```
*/

/*!
## Usage examples
First parse a given knowledge base and instantiate its literals.
```rust
use pas_bdd::datatypes::LiteralFactory;
use pas_bdd::parser::PasParser;
// use the above example as input
let input = "a(a,0.1).a(b,0.2).a(c,0.3).p(x).p(y).p(z).r(a,x,y).r(b,z).cl(neg(y),neg(z)).cl(c,x).cl(neg(c),neg(z)).h(y).";
let parser = PasParser::default();
match parser.parse()(input) {
    Ok(_) => log::info!("[Done] parsing"),
    Err(e) => {
    log::error!(
        "Error during parsing:\n{} \n\n cannot continue, panic!",
        e
        );
        panic!("Parsing failed, see log for further details")
    }
}
let mut factory = LiteralFactory::new();
let instance = parser.instantiate(&mut factory).expect("all names are declared");
```
### compute the symbolic results
```rust
# use pas_bdd::datatypes::LiteralFactory;
# use pas_bdd::parser::PasParser;
use pas_bdd::resolver::SymbolicResolver;
# let input = "a(a,0.1).a(b,0.2).a(c,0.3).p(x).p(y).p(z).r(a,x,y).r(b,z).cl(neg(y),neg(z)).cl(c,x).cl(neg(c),neg(z)).h(y).";
# let parser = PasParser::default();
# parser.parse()(input).unwrap();
# let mut factory = LiteralFactory::new();
# let instance = parser.instantiate(&mut factory).unwrap();
let resolver = SymbolicResolver::new(instance.knowledge_base, &factory).unwrap();
let qs = resolver.find_qs(&instance.hypothesis).unwrap();
let sp = resolver.find_sp(&instance.hypothesis).unwrap();
assert_eq!(qs.len(), 3);
assert_eq!(format!("{}", sp), "[a ¬b ¬c]");
```
### compute the degrees of support
```rust
# use pas_bdd::datatypes::LiteralFactory;
# use pas_bdd::parser::PasParser;
# use pas_bdd::resolver::SymbolicResolver;
use pas_bdd::numeric::NumericResolver;
use pas_bdd::probability::bdd::BddComputer;
# let input = "a(a,0.1).a(b,0.2).a(c,0.3).p(x).p(y).p(z).r(a,x,y).r(b,z).cl(neg(y),neg(z)).cl(c,x).cl(neg(c),neg(z)).h(y).";
# let parser = PasParser::default();
# parser.parse()(input).unwrap();
# let mut factory = LiteralFactory::new();
# let instance = parser.instantiate(&mut factory).unwrap();
# let resolver = SymbolicResolver::new(instance.knowledge_base, &factory).unwrap();
let numeric = NumericResolver::new(resolver, BddComputer::new());
let dsp = numeric.calc_non_normalised_dsp(&instance.hypothesis).unwrap();
// a ¬b ¬c
assert!((dsp - 0.1 * 0.8 * 0.7).abs() < 1e-9);
```
*/
#![deny(
    missing_debug_implementations,
    missing_copy_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code
)]
#![warn(
    missing_docs,
    unused_import_braces,
    unused_qualifications,
    unused_extern_crates,
    variant_size_differences
)]

pub mod datatypes;
pub mod error;
pub mod logic;
pub mod numeric;
pub mod obdd;
pub mod parser;
pub mod probability;
pub mod resolver;
