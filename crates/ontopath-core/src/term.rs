//! Terms and substitutions.
//!
//! A term is either a named variable or an unbound (don't-care) variable.
//! Unbound variables carry an id so that the unifier can keep distinct
//! don't-care positions apart, but the id is deliberately invisible to
//! equality, ordering and hashing: two atoms that differ only in which
//! unbound variables they mention are the same atom, which is what lets
//! the rewriting fixpoint converge. Use [`Term::is_identical`] where the
//! id matters.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// A variable position in a query atom.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Term {
    /// A named (answer or join) variable.
    Variable(String),
    /// An unbound variable, printed as `_`. The id is unique within one
    /// rewrite invocation.
    Unbound(u64),
}

impl Term {
    pub fn var(name: impl Into<String>) -> Term {
        Term::Variable(name.into())
    }

    pub fn is_unbound(&self) -> bool {
        matches!(self, Term::Unbound(_))
    }

    /// The variable name, if this is a named variable.
    pub fn name(&self) -> Option<&str> {
        match self {
            Term::Variable(name) => Some(name),
            Term::Unbound(_) => None,
        }
    }

    /// Strict identity: named variables compare by name, unbound
    /// variables by id. This is the equality the unifier works with.
    pub fn is_identical(&self, other: &Term) -> bool {
        match (self, other) {
            (Term::Variable(a), Term::Variable(b)) => a == b,
            (Term::Unbound(a), Term::Unbound(b)) => a == b,
            _ => false,
        }
    }
}

impl PartialEq for Term {
    fn eq(&self, other: &Term) -> bool {
        match (self, other) {
            (Term::Variable(a), Term::Variable(b)) => a == b,
            (Term::Unbound(_), Term::Unbound(_)) => true,
            _ => false,
        }
    }
}

impl Eq for Term {}

impl PartialOrd for Term {
    fn partial_cmp(&self, other: &Term) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Term {
    fn cmp(&self, other: &Term) -> Ordering {
        match (self, other) {
            (Term::Variable(a), Term::Variable(b)) => a.cmp(b),
            (Term::Variable(_), Term::Unbound(_)) => Ordering::Less,
            (Term::Unbound(_), Term::Variable(_)) => Ordering::Greater,
            (Term::Unbound(_), Term::Unbound(_)) => Ordering::Equal,
        }
    }
}

impl Hash for Term {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Term::Variable(name) => {
                0u8.hash(state);
                name.hash(state);
            }
            Term::Unbound(_) => 1u8.hash(state),
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Variable(name) => f.write_str(name),
            Term::Unbound(_) => f.write_str("_"),
        }
    }
}

/// A single substitution, replacing `from` with `to`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    pub from: Term,
    pub to: Term,
}

impl Substitution {
    pub fn new(from: Term, to: Term) -> Substitution {
        Substitution { from, to }
    }
}

impl fmt::Display for Substitution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.to, self.from)
    }
}

/// Apply a substitution list to one term, in list order. Later
/// substitutions see the result of earlier ones, so chains like
/// `y/x, z/y` send `x` to `z`.
pub fn substitute_term(substitutions: &[Substitution], term: &Term) -> Term {
    let mut term = term.clone();
    for sub in substitutions {
        if term.is_identical(&sub.from) {
            term = sub.to.clone();
        }
    }
    term
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unbound_terms_are_interchangeable() {
        assert_eq!(Term::Unbound(1), Term::Unbound(2));
        assert!(!Term::Unbound(1).is_identical(&Term::Unbound(2)));
        assert!(Term::Unbound(7).is_identical(&Term::Unbound(7)));
    }

    #[test]
    fn variables_compare_by_name() {
        assert_eq!(Term::var("x"), Term::var("x"));
        assert_ne!(Term::var("x"), Term::var("y"));
        assert_ne!(Term::var("x"), Term::Unbound(0));
    }

    #[test]
    fn display_forms() {
        assert_eq!(Term::var("x").to_string(), "x");
        assert_eq!(Term::Unbound(3).to_string(), "_");
        let sub = Substitution::new(Term::var("x"), Term::var("y"));
        assert_eq!(sub.to_string(), "y/x");
    }

    #[test]
    fn substitution_chains_apply_in_order() {
        let subs = vec![
            Substitution::new(Term::var("x"), Term::var("y")),
            Substitution::new(Term::var("y"), Term::var("z")),
        ];
        assert_eq!(substitute_term(&subs, &Term::var("x")), Term::var("z"));
        assert_eq!(substitute_term(&subs, &Term::var("y")), Term::var("z"));
        assert_eq!(substitute_term(&subs, &Term::var("w")), Term::var("w"));
    }
}
