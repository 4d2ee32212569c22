//! OWL 2 QL ontology model and loader.
//!
//! This crate owns the TBox side of query rewriting: the vocabulary types
//! (`ClassName`, `Prop`, `RoleExpr`, `ClassExpr`), the normalized axiom
//! representation (`Axiom`), and a loader for a pragmatic subset of the
//! OWL 2 Functional-Style Syntax.
//!
//! Axioms are normalized at load time so the rewriting engine only ever
//! sees three kinds:
//! - `SubClassOf` over class expressions (domain axioms load as
//!   `∃R ⊑ A`, range axioms as `∃R⁻ ⊑ A`),
//! - `SubPropertyOf` over role expressions,
//! - `InverseProperties` over named properties.
//!
//! Anything outside the supported fragment is rejected with
//! [`OntologyError::NotInProfile`] rather than silently dropped: a missing
//! axiom would make the rewritten union incomplete.

pub mod loader;
pub mod model;

pub use loader::{Ontology, OntologyError};
pub use model::{Axiom, ClassExpr, ClassName, Prop, RoleExpr};
