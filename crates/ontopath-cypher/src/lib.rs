//! Translation of rewritten query sets to Cypher.
//!
//! Each query in the set becomes one `match … return …` fragment and the
//! fragments are joined with `union`. Concept atoms become node-label
//! matches. Role atoms whose roles all point the same way become
//! directed relationship matches; when directions mix, the match is
//! undirected and a `where` clause pins down the admissible
//! direction/type combinations via `startnode`/`type` (Neo4j Cypher
//! only, not openCypher). Arbitrary-length atoms become `*0..`
//! variable-length matches, which Cypher can only express for a single
//! direction.
//!
//! Unification may have renamed answer variables inside individual
//! queries, so the caller passes the original answer-variable list and
//! the return clause aliases each query's head back to those names.

use std::collections::BTreeSet;
use std::fmt::Write;

use ontopath_core::{ArbitraryLengthAtom, RewritableAtom, RewritableQuery, RolesAtom, Term};
use ontopath_ontology::RoleExpr;

#[derive(Debug, thiserror::Error)]
pub enum TranslateError {
    #[error("variable-length pattern `{0}` mixes role directions, which Cypher cannot express")]
    MixedDirectionStar(String),
}

/// Translates rewritten query sets to Cypher.
pub struct CypherTranslator;

impl CypherTranslator {
    pub fn new() -> CypherTranslator {
        CypherTranslator
    }

    /// Render the union of all queries in the set. `answer_vars` is the
    /// original query head, used to alias each fragment's return
    /// clause.
    pub fn translate(
        &self,
        answer_vars: &[Term],
        queries: &BTreeSet<RewritableQuery>,
    ) -> Result<String, TranslateError> {
        let fragments = queries
            .iter()
            .map(|q| self.query_to_cypher(answer_vars, q))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(fragments.join("\nunion\n"))
    }

    fn query_to_cypher(
        &self,
        answer_vars: &[Term],
        q: &RewritableQuery,
    ) -> Result<String, TranslateError> {
        let mut matches: Vec<String> = Vec::new();
        let mut dependencies: Vec<String> = Vec::new();
        let mut rel_counter = 0usize;
        let mut node_counter = 0usize;

        for atom in &q.body {
            match atom {
                RewritableAtom::Concept(c) => {
                    matches.push(format!("match ({}:{})", node_name(&c.term), c.class.name()));
                }
                RewritableAtom::Roles(r) => {
                    self.roles_match(r, &mut matches, &mut dependencies, &mut rel_counter, &mut node_counter);
                }
                RewritableAtom::ArbitraryLength(a) => {
                    matches.push(self.star_match(a)?);
                }
            }
        }

        let mut out = matches.join("\n");
        out.push('\n');
        if !dependencies.is_empty() {
            let _ = writeln!(out, "where {}", dependencies.join(" and "));
        }
        out.push_str("return ");
        if answer_vars.is_empty() {
            out.push('1');
        } else {
            let aliases = q
                .head
                .iter()
                .zip(answer_vars.iter())
                .map(|(head, var)| format!("{head} as {var}"))
                .collect::<Vec<_>>()
                .join(", ");
            out.push_str(&aliases);
        }
        Ok(out)
    }

    fn roles_match(
        &self,
        atom: &RolesAtom,
        matches: &mut Vec<String>,
        dependencies: &mut Vec<String>,
        rel_counter: &mut usize,
        node_counter: &mut usize,
    ) {
        let types = type_list(atom.roles());
        let inverses = atom.roles().iter().filter(|r| r.inverse).count();
        if inverses == 0 {
            matches.push(format!(
                "match ({})-[:{types}]->({})",
                node_name(atom.left()),
                node_name(atom.right())
            ));
        } else if inverses == atom.roles().len() {
            matches.push(format!(
                "match ({})<-[:{types}]-({})",
                node_name(atom.left()),
                node_name(atom.right())
            ));
        } else {
            // mixed directions: match undirected and constrain each
            // role's start node explicitly; unnamed endpoints get a
            // local name so the constraints can refer to them
            *rel_counter += 1;
            let rel = format!("r{rel_counter}");
            let left = named_node(atom.left(), node_counter);
            let right = named_node(atom.right(), node_counter);
            matches.push(format!("match ({left})-[{rel}:{types}]-({right})"));
            let atom_deps = atom
                .roles()
                .iter()
                .map(|role| {
                    let start = if role.inverse { &right } else { &left };
                    format!(
                        "(startnode({rel})={start} and type({rel})=\"{}\")",
                        role.prop.name()
                    )
                })
                .collect::<Vec<_>>()
                .join(" or ");
            dependencies.push(format!("({atom_deps})"));
        }
    }

    fn star_match(&self, atom: &ArbitraryLengthAtom) -> Result<String, TranslateError> {
        let types = type_list(&atom.roles);
        let inverses = atom.roles.iter().filter(|r| r.inverse).count();
        if inverses == 0 {
            Ok(format!(
                "match ({})-[:{types}*0..]->({})",
                node_name(&atom.left),
                node_name(&atom.right)
            ))
        } else if inverses == atom.roles.len() {
            Ok(format!(
                "match ({})<-[:{types}*0..]-({})",
                node_name(&atom.left),
                node_name(&atom.right)
            ))
        } else {
            Err(TranslateError::MixedDirectionStar(atom.to_string()))
        }
    }
}

impl Default for CypherTranslator {
    fn default() -> Self {
        CypherTranslator::new()
    }
}

/// Relationship type list `a|b|c`, deduplicated across directions.
fn type_list(roles: &BTreeSet<RoleExpr>) -> String {
    roles
        .iter()
        .map(|r| r.prop.name())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect::<Vec<_>>()
        .join("|")
}

/// Node rendering for directed matches: unbound endpoints stay
/// anonymous.
fn node_name(term: &Term) -> String {
    match term {
        Term::Variable(name) => name.clone(),
        Term::Unbound(_) => String::new(),
    }
}

/// Node rendering for undirected matches, where the endpoint must be
/// addressable by name.
fn named_node(term: &Term, node_counter: &mut usize) -> String {
    match term {
        Term::Variable(name) => name.clone(),
        Term::Unbound(_) => {
            *node_counter += 1;
            format!("n{node_counter}")
        }
    }
}
