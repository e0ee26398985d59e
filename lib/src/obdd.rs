//! Module which represents obdds.
//!
//! The decision diagram is the workspace of the [decision-diagram evaluator][crate::probability::bdd::BddComputer]:
//! each evaluation instantiates its own [Bdd], compiles the DNF into it, and drops it afterwards.
use crate::datatypes::*;
use std::{
    collections::{HashMap, HashSet},
    fmt::Display,
};

/// Contains the data of (possibly) multiple roBDDs, managed over one collection of nodes.
/// It has a couple of methods to instantiate, update, and query properties on a given roBDD.
/// Each roBDD is identified by its corresponding [`Term`], which implicitly identifies the root node of a roBDD.
#[derive(Debug)]
pub struct Bdd {
    pub(crate) nodes: Vec<BddNode>,
    cache: HashMap<BddNode, Term>,
    ite_cache: HashMap<(Term, Term, Term), Term>,
}

impl Display for Bdd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, " ")?;
        for (idx, elem) in self.nodes.iter().enumerate() {
            writeln!(f, "{} {}", idx, *elem)?;
        }
        Ok(())
    }
}

impl Default for Bdd {
    fn default() -> Self {
        Self::new()
    }
}

impl Bdd {
    /// Instantiate a new roBDD structure.
    /// Constants for the [`⊤`][crate::datatypes::Term::TOP] and [`⊥`][crate::datatypes::Term::BOT] concepts are prepared in that step too.
    pub fn new() -> Self {
        Self {
            nodes: vec![BddNode::terminal(false), BddNode::terminal(true)],
            cache: HashMap::new(),
            ite_cache: HashMap::new(),
        }
    }

    /// Number of nodes, including the two constants.
    pub fn size(&self) -> usize {
        self.nodes.len()
    }

    /// Instantiates a [variable][crate::datatypes::Var] and returns the representing roBDD as a [`Term`][crate::datatypes::Term].
    pub fn variable(&mut self, var: Var) -> Term {
        self.node(var, Term::BOT, Term::TOP)
    }

    /// Instantiates the negation of a [variable][crate::datatypes::Var].
    pub fn not_variable(&mut self, var: Var) -> Term {
        self.node(var, Term::TOP, Term::BOT)
    }

    /// Instantiates a constant, which is either [true] or [false].
    pub fn constant(val: bool) -> Term {
        Term::from(val)
    }

    /// Returns an roBDD, which represents the negation of the given roBDD.
    pub fn not(&mut self, term: Term) -> Term {
        self.if_then_else(term, Term::BOT, Term::TOP)
    }

    /// Returns an roBDD, which represents the conjunction of the two given roBDDs.
    pub fn and(&mut self, term_a: Term, term_b: Term) -> Term {
        self.if_then_else(term_a, term_b, Term::BOT)
    }

    /// Returns an roBDD, which represents the disjunction of the two given roBDDs.
    pub fn or(&mut self, term_a: Term, term_b: Term) -> Term {
        self.if_then_else(term_a, Term::TOP, term_b)
    }

    /// Restrict the value of a given [variable][crate::datatypes::Var] to **val**.
    pub fn restrict(&mut self, tree: Term, var: Var, val: bool) -> Term {
        let node = self.nodes[tree.value()];
        if node.var() > var || node.var().is_constant() {
            tree
        } else if node.var() < var {
            let lonode = self.restrict(node.lo(), var, val);
            let hinode = self.restrict(node.hi(), var, val);
            self.node(node.var(), lonode, hinode)
        } else {
            node.branch(val)
        }
    }

    /// The smallest variable at the roots of **terms**.
    fn top_var(&self, terms: [Term; 3]) -> Var {
        terms
            .iter()
            .map(|term| self.nodes[term.value()].var())
            .min()
            .unwrap_or(Var::TOP)
    }

    /// Splits **term** on **var**, which must not be below its root variable.
    fn cofactors(&self, term: Term, var: Var) -> (Term, Term) {
        let node = self.nodes[term.value()];
        if node.var() == var {
            (node.lo(), node.hi())
        } else {
            (term, term)
        }
    }

    /// Computes `(i ∧ t) ∨ (¬i ∧ e)`, all binary operations are reduced to this one.
    fn if_then_else(&mut self, i: Term, t: Term, e: Term) -> Term {
        match (i, t, e) {
            (Term::TOP, t, _) => return t,
            (Term::BOT, _, e) => return e,
            (i, Term::TOP, Term::BOT) => return i,
            (_, t, e) if t == e => return t,
            _ => {}
        }
        if let Some(result) = self.ite_cache.get(&(i, t, e)) {
            return *result;
        }
        let var = self.top_var([i, t, e]);
        let (i_lo, i_hi) = self.cofactors(i, var);
        let (t_lo, t_hi) = self.cofactors(t, var);
        let (e_lo, e_hi) = self.cofactors(e, var);
        let lo = self.if_then_else(i_lo, t_lo, e_lo);
        let hi = self.if_then_else(i_hi, t_hi, e_hi);
        let result = self.node(var, lo, hi);
        self.ite_cache.insert((i, t, e), result);
        result
    }

    /// Creates a new node in the roBDD.
    /// It will not create duplicate nodes and uses already existing nodes, if applicable.
    pub fn node(&mut self, var: Var, lo: Term, hi: Term) -> Term {
        if lo == hi {
            lo
        } else {
            let node = BddNode::new(var, lo, hi);
            match self.cache.get(&node) {
                Some(t) => *t,
                None => {
                    let new_term = Term(self.nodes.len());
                    self.nodes.push(node);
                    self.cache.insert(node, new_term);
                    log::trace!("newterm: {} as {:?}", new_term, node);
                    new_term
                }
            }
        }
    }

    /// Returns all non-constant nodes, which are reachable from **root**.
    pub fn reachable(&self, root: Term) -> Vec<Term> {
        let mut visited = HashSet::new();
        let mut stack = vec![root];
        let mut result = Vec::new();
        while let Some(term) = stack.pop() {
            if term.is_truth_value() || !visited.insert(term) {
                continue;
            }
            let node = self.nodes[term.value()];
            result.push(term);
            stack.push(node.lo());
            stack.push(node.hi());
        }
        result
    }

    /// Computes the probability that the roBDD evaluates to [`⊤`][crate::datatypes::Term::TOP], where
    /// `weights[v]` is the probability of the [variable][crate::datatypes::Var] `v` being true.
    ///
    /// A message of `1.0` starts at **root** and is passed down to the children, `(1-p)`-weighted to the `lo`-branch
    /// and `p`-weighted to the `hi`-branch. As the diagram is ordered, processing the nodes by ascending variable
    /// ensures that each node has received all messages of its parents before it is processed.
    /// Variables without a weight are treated as undefined and yield [f64::NAN].
    pub fn probability(&self, root: Term, weights: &[f64]) -> f64 {
        if let Some(result) = root.constant_probability() {
            return result;
        }
        let mut order = self.reachable(root);
        order.sort_by_key(|term| (self.nodes[term.value()].var(), *term));
        log::debug!("probability sweep over {} nodes", order.len());

        let mut messages: HashMap<Term, f64> = HashMap::with_capacity(order.len() + 2);
        messages.insert(root, 1.0);
        for term in order {
            let node = self.nodes[term.value()];
            let message = messages.get(&term).copied().unwrap_or(0.0);
            let weight = node.var().weight(weights);
            *messages.entry(node.lo()).or_insert(0.0) += message * (1.0 - weight);
            *messages.entry(node.hi()).or_insert(0.0) += message * weight;
        }
        messages.get(&Term::TOP).copied().unwrap_or(0.0)
    }

    #[cfg(test)]
    fn probability_recursive(
        &self,
        term: Term,
        weights: &[f64],
        memo: &mut HashMap<Term, f64>,
    ) -> f64 {
        if let Some(result) = term.constant_probability() {
            return result;
        }
        if let Some(result) = memo.get(&term) {
            return *result;
        }
        let node = self.nodes[term.value()];
        let weight = node.var().weight(weights);
        let result = (1.0 - weight) * self.probability_recursive(node.lo(), weights, memo)
            + weight * self.probability_recursive(node.hi(), weights, memo);
        memo.insert(term, result);
        result
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use test_log::test;

    #[test]
    fn constants() {
        let mut bdd = Bdd::new();
        assert_eq!(bdd.size(), 2);
        assert_eq!(Bdd::constant(true), Term::TOP);
        assert_eq!(Bdd::constant(false), Term::BOT);
        assert_eq!(bdd.not(Term::TOP), Term::BOT);
        assert_eq!(bdd.and(Term::TOP, Term::BOT), Term::BOT);
        assert_eq!(bdd.or(Term::TOP, Term::BOT), Term::TOP);
        assert_eq!(bdd.size(), 2);
    }

    #[test]
    fn sharing() {
        let mut bdd = Bdd::new();
        let x0 = bdd.variable(Var(0));
        let x1 = bdd.variable(Var(1));
        assert_eq!((x0, x1), (Term(2), Term(3)));
        assert_eq!(bdd.variable(Var(0)), x0);
        let not_x0 = bdd.not(x0);
        assert_eq!(bdd.not_variable(Var(0)), not_x0);
        assert_eq!(bdd.size(), 5);
        // x0 ∧ x1 and x1 ∧ x0 are the same node
        let left = bdd.and(x0, x1);
        let right = bdd.and(x1, x0);
        assert_eq!(left, right);
        assert_eq!(bdd.node(Var(2), left, left), left);
    }

    #[test]
    fn laws() {
        let mut bdd = Bdd::new();
        let x0 = bdd.variable(Var(0));
        let x1 = bdd.variable(Var(1));
        let x2 = bdd.variable(Var(2));

        let conj = bdd.and(x0, x1);
        let not_conj = bdd.not(conj);
        assert_eq!(bdd.or(x0, not_conj), Term::TOP);
        let not_x2 = bdd.not(x2);
        assert_eq!(bdd.and(x2, not_x2), Term::BOT);
        assert_eq!(bdd.not(not_conj), conj);

        // de Morgan
        let not_x0 = bdd.not(x0);
        let not_x1 = bdd.not(x1);
        assert_eq!(bdd.or(not_x0, not_x1), not_conj);

        // distribution
        let disj = bdd.or(x1, x2);
        let left = bdd.and(x0, disj);
        let x0_x2 = bdd.and(x0, x2);
        let right = bdd.or(conj, x0_x2);
        assert_eq!(left, right);

        assert_eq!(bdd.restrict(conj, Var(0), false), Term::BOT);
        assert_eq!(bdd.restrict(conj, Var(0), true), x1);
        assert_eq!(bdd.restrict(left, Var(1), false), x0_x2);
        assert_eq!(bdd.restrict(x2, Var(0), true), x2);
    }

    #[test]
    fn reachable() {
        let mut bdd = Bdd::new();
        let v1 = bdd.variable(Var(0));
        let v2 = bdd.variable(Var(1));
        let v3 = bdd.variable(Var(2));
        let a1 = bdd.and(v1, v2);
        let a2 = bdd.or(a1, v3);
        assert_eq!(bdd.reachable(Term::TOP), vec![]);
        assert_eq!(bdd.reachable(v1), vec![v1]);
        let mut nodes = bdd.reachable(a2);
        nodes.sort();
        // x0 ? (x1 ? T : x2) : x2
        assert_eq!(nodes.len(), 3);
        assert!(nodes.contains(&a2));
        assert!(nodes.contains(&v3));
    }

    #[test]
    fn probability() {
        let mut bdd = Bdd::new();
        let weights = [0.5, 0.2, 0.1];
        let v1 = bdd.variable(Var(0));
        let v2 = bdd.variable(Var(1));
        let v3 = bdd.variable(Var(2));
        let a1 = bdd.and(v1, v2);
        let a2 = bdd.or(a1, v3);
        let nv2 = bdd.not(v2);
        let x = bdd.or(nv2, v3);

        assert_eq!(bdd.probability(Term::TOP, &weights), 1.0);
        assert_eq!(bdd.probability(Term::BOT, &weights), 0.0);
        assert!((bdd.probability(v1, &weights) - 0.5).abs() < 1e-12);
        assert!((bdd.probability(a1, &weights) - 0.1).abs() < 1e-12);
        // 0.1 + 0.1 - 0.01
        assert!((bdd.probability(a2, &weights) - 0.19).abs() < 1e-12);
        // 0.8 + 0.1 - 0.08
        assert!((bdd.probability(x, &weights) - 0.82).abs() < 1e-12);
        assert!(bdd.probability(v3, &weights[..1]).is_nan());

        for term in [v1, a1, a2, x] {
            assert!(
                (bdd.probability(term, &weights)
                    - bdd.probability_recursive(term, &weights, &mut HashMap::new()))
                .abs()
                    < 1e-12
            );
        }
    }

    #[test]
    fn display() {
        let mut bdd = Bdd::new();
        let v1 = bdd.variable(Var(0));
        let v2 = bdd.variable(Var(1));
        let _conj = bdd.and(v1, v2);

        assert_eq!(format!("{}", bdd), " \n0 BddNode: Var(18446744073709551614), lo: Term(0), hi: Term(0)\n1 BddNode: Var(18446744073709551615), lo: Term(1), hi: Term(1)\n2 BddNode: Var(0), lo: Term(0), hi: Term(1)\n3 BddNode: Var(1), lo: Term(0), hi: Term(1)\n4 BddNode: Var(0), lo: Term(0), hi: Term(3)\n");
    }
}
