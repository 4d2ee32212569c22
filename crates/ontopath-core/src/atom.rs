//! Rewritable atoms: concept atoms, role-disjunction atoms and
//! arbitrary-length (Kleene-star) atoms, plus role-set saturation.
//!
//! Role atoms are kept in a canonical orientation. `(r-)(x,y)` and
//! `r(y,x)` describe the same thing, so the constructor picks the
//! lexicographically smaller of the two orientations. With that in
//! place, inverting an atom is the identity on its canonical form and
//! derived equality, ordering and hashing all behave.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use ontopath_ontology::{Axiom, ClassExpr, ClassName, Ontology, RoleExpr};

use crate::rewriter::VarSource;
use crate::term::{substitute_term, Substitution, Term};

// ============================================================================
// Saturation
// ============================================================================

/// Close a role-expression set under the ontology's role axioms:
/// sub-roles of each role, sub-roles of its inverse (inverted back), and
/// declared inverse properties (flipped unless the role itself is an
/// inverse). Runs to a fixpoint.
pub fn saturate_roles(roles: &BTreeSet<RoleExpr>, ontology: &Ontology) -> BTreeSet<RoleExpr> {
    let mut out = roles.clone();
    loop {
        let snapshot = out.clone();
        for role in &snapshot {
            for sub in ontology.sub_roles_of(role) {
                out.insert(sub.clone());
            }
            for sub in ontology.sub_roles_of(&role.inverse()) {
                out.insert(sub.inverse());
            }
            for partner in ontology.inverse_partners(&role.prop) {
                let equivalent = if role.inverse {
                    RoleExpr { prop: partner.clone(), inverse: false }
                } else {
                    RoleExpr { prop: partner.clone(), inverse: true }
                };
                out.insert(equivalent);
            }
        }
        if out == snapshot {
            return out;
        }
    }
}

/// Close a role set under direct sub-role axioms only. Arbitrary-length
/// atoms range over named roles, so the inverse closure does not apply
/// to them.
pub fn saturate_direct(roles: &BTreeSet<RoleExpr>, ontology: &Ontology) -> BTreeSet<RoleExpr> {
    let mut out = roles.clone();
    loop {
        let snapshot = out.clone();
        for role in &snapshot {
            for sub in ontology.sub_roles_of(role) {
                out.insert(sub.clone());
            }
        }
        if out == snapshot {
            return out;
        }
    }
}

fn role_set_string(roles: &BTreeSet<RoleExpr>) -> String {
    let joined = roles
        .iter()
        .map(|r| r.to_string())
        .collect::<Vec<_>>()
        .join("|");
    if roles.len() > 1 {
        format!("({joined})")
    } else {
        joined
    }
}

// ============================================================================
// Concept atoms
// ============================================================================

/// An atom `A(t)` for a concept name `A`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ConceptAtom {
    pub class: ClassName,
    pub term: Term,
}

impl ConceptAtom {
    pub fn new(class: ClassName, term: Term) -> ConceptAtom {
        ConceptAtom { class, term }
    }

    /// A subclass axiom applies when its superclass side is this atom's
    /// concept name.
    pub fn applicable(&self, axiom: &Axiom) -> bool {
        matches!(axiom, Axiom::SubClassOf { sup: ClassExpr::Class(name), .. } if *name == self.class)
    }

    /// Rewrite this atom backwards through an applicable axiom. A named
    /// subclass gives a concept atom over the same term; an existential
    /// subclass `∃R` gives a saturated role atom from the term into a
    /// fresh unbound variable.
    pub fn apply(&self, axiom: &Axiom, ontology: &Ontology, vars: &mut VarSource) -> RewritableAtom {
        if let Axiom::SubClassOf { sub, sup: ClassExpr::Class(name) } = axiom {
            if *name == self.class {
                return match sub {
                    ClassExpr::Class(subclass) => RewritableAtom::Concept(ConceptAtom {
                        class: subclass.clone(),
                        term: self.term.clone(),
                    }),
                    ClassExpr::SomeValuesFrom(role) => {
                        let roles =
                            saturate_roles(&BTreeSet::from([role.clone()]), ontology);
                        RewritableAtom::Roles(RolesAtom::new(
                            roles,
                            self.term.clone(),
                            vars.fresh_unbound(),
                        ))
                    }
                };
            }
        }
        RewritableAtom::Concept(self.clone())
    }
}

impl fmt::Display for ConceptAtom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.class, self.term)
    }
}

// ============================================================================
// Role atoms
// ============================================================================

/// An atom `(r|s-|…)(x,y)`: a disjunction of role expressions between
/// two terms, stored in canonical orientation.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RolesAtom {
    roles: BTreeSet<RoleExpr>,
    left: Term,
    right: Term,
}

impl RolesAtom {
    /// Build a role atom, normalizing to the canonical orientation.
    pub fn new(roles: BTreeSet<RoleExpr>, left: Term, right: Term) -> RolesAtom {
        let inverted: BTreeSet<RoleExpr> = roles.iter().map(RoleExpr::inverse).collect();
        if (&inverted, &right, &left) < (&roles, &left, &right) {
            RolesAtom { roles: inverted, left: right, right: left }
        } else {
            RolesAtom { roles, left, right }
        }
    }

    pub fn roles(&self) -> &BTreeSet<RoleExpr> {
        &self.roles
    }

    pub fn left(&self) -> &Term {
        &self.left
    }

    pub fn right(&self) -> &Term {
        &self.right
    }

    /// The same atom read in the other direction. Canonicalization makes
    /// this equal to `self`.
    pub fn inverse(&self) -> RolesAtom {
        RolesAtom::new(
            self.roles.iter().map(RoleExpr::inverse).collect(),
            self.right.clone(),
            self.left.clone(),
        )
    }

    /// The role set and terms of the non-canonical orientation.
    pub fn inverse_parts(&self) -> (BTreeSet<RoleExpr>, Term, Term) {
        (
            self.roles.iter().map(RoleExpr::inverse).collect(),
            self.right.clone(),
            self.left.clone(),
        )
    }

    /// An axiom `B ⊑ ∃R` applies when the saturated role set contains
    /// `R` and the right term is unbound, or contains `R⁻` and the left
    /// term is unbound.
    pub fn applicable(&self, axiom: &Axiom) -> bool {
        if let Axiom::SubClassOf { sup: ClassExpr::SomeValuesFrom(role), .. } = axiom {
            (self.roles.contains(role) && self.right.is_unbound())
                || (self.roles.contains(&role.inverse()) && self.left.is_unbound())
        } else {
            false
        }
    }

    /// Rewrite this atom backwards through an applicable `B ⊑ ∃R` axiom.
    /// The bound endpoint survives: a named subclass gives a concept
    /// atom over it, an existential subclass gives a saturated role atom
    /// from it into a fresh unbound variable.
    pub fn apply(&self, axiom: &Axiom, ontology: &Ontology, vars: &mut VarSource) -> RewritableAtom {
        if let Axiom::SubClassOf { sub, sup: ClassExpr::SomeValuesFrom(role) } = axiom {
            let endpoint = if self.roles.contains(role) && self.right.is_unbound() {
                self.left.clone()
            } else {
                self.right.clone()
            };
            return match sub {
                ClassExpr::Class(name) => {
                    RewritableAtom::Concept(ConceptAtom { class: name.clone(), term: endpoint })
                }
                ClassExpr::SomeValuesFrom(sub_role) => {
                    let roles = saturate_roles(&BTreeSet::from([sub_role.clone()]), ontology);
                    RewritableAtom::Roles(RolesAtom::new(roles, endpoint, vars.fresh_unbound()))
                }
            };
        }
        RewritableAtom::Roles(self.clone())
    }
}

impl fmt::Display for RolesAtom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({},{})", role_set_string(&self.roles), self.left, self.right)
    }
}

// ============================================================================
// Arbitrary-length atoms
// ============================================================================

/// An atom `(r|…)*(x,y)`: a path of length zero or more through roles
/// from the set. Role sets here contain named roles only, and no axiom
/// is ever applicable; these atoms are reached through the concatenate,
/// merge and drop rules instead.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ArbitraryLengthAtom {
    pub roles: BTreeSet<RoleExpr>,
    pub left: Term,
    pub right: Term,
}

impl ArbitraryLengthAtom {
    pub fn new(roles: BTreeSet<RoleExpr>, left: Term, right: Term) -> ArbitraryLengthAtom {
        ArbitraryLengthAtom { roles, left, right }
    }
}

impl fmt::Display for ArbitraryLengthAtom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}*({},{})", role_set_string(&self.roles), self.left, self.right)
    }
}

// ============================================================================
// The atom sum type
// ============================================================================

/// Any atom a rewritable query body can hold.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RewritableAtom {
    Concept(ConceptAtom),
    Roles(RolesAtom),
    ArbitraryLength(ArbitraryLengthAtom),
}

impl RewritableAtom {
    pub fn applicable(&self, axiom: &Axiom) -> bool {
        match self {
            RewritableAtom::Concept(a) => a.applicable(axiom),
            RewritableAtom::Roles(a) => a.applicable(axiom),
            RewritableAtom::ArbitraryLength(_) => false,
        }
    }

    pub fn apply(&self, axiom: &Axiom, ontology: &Ontology, vars: &mut VarSource) -> RewritableAtom {
        match self {
            RewritableAtom::Concept(a) => a.apply(axiom, ontology, vars),
            RewritableAtom::Roles(a) => a.apply(axiom, ontology, vars),
            RewritableAtom::ArbitraryLength(a) => RewritableAtom::ArbitraryLength(a.clone()),
        }
    }

    /// The atom's terms, concept atoms first-only, binary atoms
    /// left-then-right.
    pub fn terms(&self) -> Vec<&Term> {
        match self {
            RewritableAtom::Concept(a) => vec![&a.term],
            RewritableAtom::Roles(a) => vec![a.left(), a.right()],
            RewritableAtom::ArbitraryLength(a) => vec![&a.left, &a.right],
        }
    }

    /// Rebuild the atom with every term mapped through `f`. Role atoms
    /// re-canonicalize.
    pub fn map_terms(&self, f: &mut impl FnMut(&Term) -> Term) -> RewritableAtom {
        match self {
            RewritableAtom::Concept(a) => RewritableAtom::Concept(ConceptAtom {
                class: a.class.clone(),
                term: f(&a.term),
            }),
            RewritableAtom::Roles(a) => RewritableAtom::Roles(RolesAtom::new(
                a.roles().clone(),
                f(a.left()),
                f(a.right()),
            )),
            RewritableAtom::ArbitraryLength(a) => {
                RewritableAtom::ArbitraryLength(ArbitraryLengthAtom {
                    roles: a.roles.clone(),
                    left: f(&a.left),
                    right: f(&a.right),
                })
            }
        }
    }

    /// Apply a substitution list to every term.
    pub fn substitute(&self, substitutions: &[Substitution]) -> RewritableAtom {
        self.map_terms(&mut |t| substitute_term(substitutions, t))
    }
}

impl fmt::Display for RewritableAtom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RewritableAtom::Concept(a) => a.fmt(f),
            RewritableAtom::Roles(a) => a.fmt(f),
            RewritableAtom::ArbitraryLength(a) => a.fmt(f),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
