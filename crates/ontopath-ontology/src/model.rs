//! Vocabulary and axiom types for the DL-Lite fragment of OWL 2 QL.
//!
//! The loader collapses the surface axiom forms into three normalized
//! kinds. Domain and range axioms become subclass axioms over
//! existential restrictions, so the rewriting engine never has to know
//! they existed:
//!
//! ```text
//! ObjectPropertyDomain(r A)   =>   ∃r  ⊑ A
//! ObjectPropertyRange(r A)    =>   ∃r⁻ ⊑ A
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// A named class from the ontology signature.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ClassName(pub String);

impl ClassName {
    pub fn new(name: impl Into<String>) -> Self {
        ClassName(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClassName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A named object property from the ontology signature.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Prop(pub String);

impl Prop {
    pub fn new(name: impl Into<String>) -> Self {
        Prop(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Prop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A role expression: a named property, possibly inverted.
///
/// `r-` denotes the inverse of `r`; inverting twice yields the original
/// role, so the flag never nests.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RoleExpr {
    pub prop: Prop,
    pub inverse: bool,
}

impl RoleExpr {
    pub fn named(prop: impl Into<String>) -> Self {
        RoleExpr { prop: Prop::new(prop), inverse: false }
    }

    pub fn inverse_of(prop: impl Into<String>) -> Self {
        RoleExpr { prop: Prop::new(prop), inverse: true }
    }

    /// The same property with the direction flipped.
    pub fn inverse(&self) -> RoleExpr {
        RoleExpr { prop: self.prop.clone(), inverse: !self.inverse }
    }
}

impl fmt::Display for RoleExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.inverse {
            write!(f, "{}-", self.prop)
        } else {
            write!(f, "{}", self.prop)
        }
    }
}

/// A class expression: either a named class or an unqualified
/// existential restriction `∃R` (the QL profile allows no qualified
/// fillers on the sides we consume).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ClassExpr {
    Class(ClassName),
    SomeValuesFrom(RoleExpr),
}

impl ClassExpr {
    pub fn class(name: impl Into<String>) -> Self {
        ClassExpr::Class(ClassName::new(name))
    }

    pub fn some(role: RoleExpr) -> Self {
        ClassExpr::SomeValuesFrom(role)
    }
}

impl fmt::Display for ClassExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassExpr::Class(name) => write!(f, "{name}"),
            ClassExpr::SomeValuesFrom(role) => write!(f, "∃{role}"),
        }
    }
}

/// A normalized DL-Lite axiom.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Axiom {
    SubClassOf { sub: ClassExpr, sup: ClassExpr },
    SubPropertyOf { sub: RoleExpr, sup: RoleExpr },
    InverseProperties { first: Prop, second: Prop },
}

impl fmt::Display for Axiom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axiom::SubClassOf { sub, sup } => write!(f, "{sub} ⊑ {sup}"),
            Axiom::SubPropertyOf { sub, sup } => write!(f, "{sub} ⊑ {sup}"),
            Axiom::InverseProperties { first, second } => {
                write!(f, "{first} ≡ {second}-")
            }
        }
    }
}
