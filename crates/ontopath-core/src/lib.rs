//! Conjunctive regular-path query rewriting over DL-Lite ontologies.
//!
//! The engine takes a conjunctive query whose atoms may be concept
//! atoms, role atoms or path atoms (slash-separated role disjunctions
//! with optional Kleene star) and compiles the ontology's axioms into
//! the query itself: the result is a finite set of queries whose union,
//! evaluated over the plain data, returns every certain answer the
//! original query has under the ontology. No reasoning is needed at
//! query time.
//!
//! The pipeline is `saturate_paths` (role-set saturation and path
//! splitting), `tau` (unbound-variable marking) and then the rewriting
//! fixpoint; see [`rewriter::Rewriter`].

pub mod atom;
pub mod query;
pub mod rewriter;
pub mod term;
pub mod unifier;

pub use atom::{ArbitraryLengthAtom, ConceptAtom, RewritableAtom, RolesAtom};
pub use query::{Atom, InputQuery, PathAtom, PathElement, RewritableQuery};
pub use rewriter::{Rewriter, VarSource};
pub use term::{Substitution, Term};
pub use unifier::Unifier;
