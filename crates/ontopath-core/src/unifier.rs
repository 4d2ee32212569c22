//! Most general unifier over term lists.
//!
//! The term language has named variables and unbound variables only, no
//! constants, so unification over equal-length lists always succeeds.
//! The computation follows the classic delete/orient/propagate loop:
//! identical pairs are removed, pairs are oriented so named variables
//! replace unbound ones, and substitutions are propagated through the
//! remaining pairs until nothing changes.

use crate::query::RewritableQuery;
use crate::term::{substitute_term, Substitution, Term};

/// A most general unifier of two term lists.
#[derive(Debug, Clone)]
pub struct Unifier {
    substitutions: Vec<Substitution>,
}

impl Unifier {
    /// Compute the MGU of two term lists, pairing terms positionally.
    /// Extra terms in the longer list are ignored.
    pub fn new(t1: &[Term], t2: &[Term]) -> Unifier {
        let substitutions = t1
            .iter()
            .zip(t2.iter())
            .map(|(a, b)| Substitution::new(a.clone(), b.clone()))
            .collect();
        let mut unifier = Unifier { substitutions };
        unifier.most_general();
        unifier
    }

    fn most_general(&mut self) {
        let mut action = true;
        while action {
            action = false;
            // delete pairs that are already identical
            let before = self.substitutions.len();
            self.substitutions.retain(|s| !s.from.is_identical(&s.to));
            if self.substitutions.len() != before {
                action = true;
            }
            // orient: named variables replace unbound ones
            for sub in &mut self.substitutions {
                if sub.to.is_unbound() && !sub.from.is_unbound() {
                    std::mem::swap(&mut sub.from, &mut sub.to);
                    action = true;
                }
            }
            // propagate each pair through the others
            for i in 0..self.substitutions.len() {
                let current = self.substitutions[i].clone();
                for j in 0..self.substitutions.len() {
                    if i == j {
                        continue;
                    }
                    if self.substitutions[j].from.is_identical(&current.from)
                        && !self.substitutions[j].from.is_identical(&current.to)
                    {
                        self.substitutions[j].from = current.to.clone();
                        action = true;
                    }
                    if self.substitutions[j].to.is_identical(&current.from)
                        && !self.substitutions[j].to.is_identical(&current.to)
                    {
                        self.substitutions[j].to = current.to.clone();
                        action = true;
                    }
                }
            }
        }
    }

    /// True if the term lists were already pairwise identical.
    pub fn is_empty(&self) -> bool {
        self.substitutions.is_empty()
    }

    pub fn substitutions(&self) -> &[Substitution] {
        &self.substitutions
    }

    /// Apply the unifier to a whole query, head and body.
    pub fn apply(&self, q: &RewritableQuery) -> RewritableQuery {
        if self.substitutions.is_empty() {
            return q.clone();
        }
        let head = q
            .head
            .iter()
            .map(|t| substitute_term(&self.substitutions, t))
            .collect();
        let body = q
            .body
            .iter()
            .map(|a| a.substitute(&self.substitutions))
            .collect();
        RewritableQuery { head, body }
    }
}
