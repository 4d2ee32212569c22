//! Query types: the parsed input query with its path atoms, and the
//! rewritable query the engine works on.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use ontopath_ontology::RoleExpr;

use crate::atom::{ConceptAtom, RewritableAtom};
use crate::term::Term;

/// One segment of a path: a role disjunction, possibly starred.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathElement {
    pub roles: BTreeSet<RoleExpr>,
    pub arbitrary_length: bool,
}

impl PathElement {
    pub fn single(roles: BTreeSet<RoleExpr>) -> PathElement {
        PathElement { roles, arbitrary_length: false }
    }

    pub fn starred(roles: BTreeSet<RoleExpr>) -> PathElement {
        PathElement { roles, arbitrary_length: true }
    }
}

impl fmt::Display for PathElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .roles
            .iter()
            .map(|r| r.to_string())
            .collect::<Vec<_>>()
            .join("|");
        if self.roles.len() > 1 {
            write!(f, "({joined})")?;
        } else {
            f.write_str(&joined)?;
        }
        if self.arbitrary_length {
            f.write_str("*")?;
        }
        Ok(())
    }
}

/// A path atom `elem/elem/…(x,y)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathAtom {
    pub elements: Vec<PathElement>,
    pub left: Term,
    pub right: Term,
}

impl fmt::Display for PathAtom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let elems = self
            .elements
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("/");
        write!(f, "{elems}({},{})", self.left, self.right)
    }
}

/// An atom of the input query. Plain role atoms parse as single-element
/// paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Atom {
    Concept(ConceptAtom),
    Path(PathAtom),
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Atom::Concept(a) => a.fmt(f),
            Atom::Path(a) => a.fmt(f),
        }
    }
}

/// The parsed query: an ordered head of answer variables (possibly
/// empty for a boolean query) and a body of atoms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputQuery {
    pub head: Vec<Term>,
    pub body: Vec<Atom>,
}

impl fmt::Display for InputQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_query(f, &self.head, self.body.iter())
    }
}

/// A query under rewriting: body atoms live in an ordered set, so
/// structurally identical atoms merge and iteration is deterministic.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RewritableQuery {
    pub head: Vec<Term>,
    pub body: BTreeSet<RewritableAtom>,
}

impl RewritableQuery {
    pub fn new(head: Vec<Term>, body: BTreeSet<RewritableAtom>) -> RewritableQuery {
        RewritableQuery { head, body }
    }

    /// True if the query has no answer variables.
    pub fn is_boolean(&self) -> bool {
        self.head.is_empty()
    }
}

impl fmt::Display for RewritableQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_query(f, &self.head, self.body.iter())
    }
}

fn write_query<T: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    head: &[Term],
    body: impl Iterator<Item = T>,
) -> fmt::Result {
    let head_str = head
        .iter()
        .map(|t| t.to_string())
        .collect::<Vec<_>>()
        .join(",");
    let body_str = body.map(|a| a.to_string()).collect::<Vec<_>>().join(",");
    write!(f, "q({head_str}):-{body_str}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atom::RolesAtom;
    use ontopath_ontology::ClassName;

    fn roles(names: &[&str]) -> BTreeSet<RoleExpr> {
        names.iter().map(|n| RoleExpr::named(*n)).collect()
    }

    #[test]
    fn path_atom_display() {
        let p = PathAtom {
            elements: vec![
                PathElement::single(roles(&["s"])),
                PathElement::starred(roles(&["r", "t"])),
            ],
            left: Term::var("x"),
            right: Term::var("y"),
        };
        assert_eq!(p.to_string(), "s/(r|t)*(x,y)");
    }

    #[test]
    fn query_display() {
        let q = RewritableQuery::new(
            vec![Term::var("x")],
            BTreeSet::from([
                RewritableAtom::Concept(ConceptAtom::new(ClassName::new("A"), Term::var("x"))),
                RewritableAtom::Roles(RolesAtom::new(
                    roles(&["r"]),
                    Term::var("x"),
                    Term::var("y"),
                )),
            ]),
        );
        // concept atoms sort before role atoms
        assert_eq!(q.to_string(), "q(x):-A(x),r(x,y)");
    }

    #[test]
    fn boolean_query_display() {
        let q = RewritableQuery::new(
            Vec::new(),
            BTreeSet::from([RewritableAtom::Roles(RolesAtom::new(
                roles(&["s"]),
                Term::Unbound(1),
                Term::Unbound(2),
            ))]),
        );
        assert!(q.is_boolean());
        assert_eq!(q.to_string(), "q():-s(_,_)");
    }
}
