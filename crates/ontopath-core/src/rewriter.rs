//! The query rewriting fixpoint.
//!
//! Rewriting starts from the saturated, unbound-marked form of the
//! input query and exhaustively applies five rules until the result set
//! stops growing: `replace` (rewrite one atom backwards through an
//! axiom), `reduce` (unify two atoms of the same shape), `concatenate`
//! (splice a binary atom into an adjacent arbitrary-length atom),
//! `merge` (overlap two binary atoms on their shared roles) and
//! `drop_atom` (remove an arbitrary-length atom with a dangling
//! endpoint, which always admits the empty path).
//!
//! Every rule is total: when its precondition fails it returns the
//! query unchanged, so the loop can try every rule on every atom and
//! pair without guards.

use std::collections::{BTreeSet, HashMap};

use tracing::debug;

use ontopath_ontology::{Axiom, Ontology, RoleExpr};

use crate::atom::{
    saturate_direct, saturate_roles, ArbitraryLengthAtom, RewritableAtom, RolesAtom,
};
use crate::query::{Atom, InputQuery, RewritableQuery};
use crate::term::Term;
use crate::unifier::Unifier;

// ============================================================================
// Fresh variables
// ============================================================================

/// Source of fresh variable names (`v1, v2, …`) and fresh unbound ids.
/// Each rewrite invocation owns its own source, so rewrites are
/// independent and reproducible.
#[derive(Debug, Default)]
pub struct VarSource {
    counter: u64,
}

impl VarSource {
    pub fn new() -> VarSource {
        VarSource { counter: 0 }
    }

    pub fn fresh_var(&mut self) -> Term {
        self.counter += 1;
        Term::Variable(format!("v{}", self.counter))
    }

    pub fn fresh_unbound(&mut self) -> Term {
        self.counter += 1;
        Term::Unbound(self.counter)
    }
}

// ============================================================================
// Rewriter
// ============================================================================

/// Rewrites input queries against one ontology.
pub struct Rewriter<'a> {
    ontology: &'a Ontology,
}

impl<'a> Rewriter<'a> {
    pub fn new(ontology: &'a Ontology) -> Rewriter<'a> {
        Rewriter { ontology }
    }

    /// Rewrite a query into the set of queries whose union returns all
    /// certain answers over the data alone.
    pub fn rewrite(&self, query: &InputQuery) -> BTreeSet<RewritableQuery> {
        let mut vars = VarSource::new();
        let mut queries = BTreeSet::new();
        let start = self.saturate_paths(query, &mut vars);
        queries.insert(self.tau(&start, &mut vars));

        let mut snapshot = BTreeSet::new();
        let mut pass = 0u32;
        while queries != snapshot {
            snapshot = queries.clone();
            pass += 1;
            for q in &snapshot {
                // (a) rewrite single atoms backwards through axioms
                for atom in &q.body {
                    for axiom in self.ontology.axioms() {
                        if atom.applicable(axiom) {
                            let replaced = self.replace(q, atom, axiom, &mut vars);
                            queries.insert(self.tau(&replaced, &mut vars));
                        }
                    }
                }
                // (b) unify atoms of the same shape
                for a1 in &q.body {
                    for a2 in &q.body {
                        let reduced = self.reduce(q, a1, a2);
                        queries.insert(self.tau(&reduced, &mut vars));
                    }
                }
                // (c) splice binary atoms into arbitrary-length atoms
                for a1 in &q.body {
                    for a2 in &q.body {
                        if let RewritableAtom::ArbitraryLength(b2) = a2 {
                            if a1 != a2 {
                                let joined = self.concatenate(q, a1, b2);
                                queries.insert(self.tau(&joined, &mut vars));
                            }
                        }
                    }
                }
                // (d) overlap binary atoms on shared roles
                for a1 in &q.body {
                    for a2 in &q.body {
                        for merged in self.merge(q, a1, a2) {
                            queries.insert(self.tau(&merged, &mut vars));
                        }
                    }
                }
                // (e) drop arbitrary-length atoms with a dangling end
                for atom in &q.body {
                    if let RewritableAtom::ArbitraryLength(a) = atom {
                        let dropped = self.drop_atom(q, a);
                        queries.insert(self.tau(&dropped, &mut vars));
                    }
                }
            }
            debug!(pass, queries = queries.len(), "rewriting pass");
        }
        queries
    }

    /// Saturate the role sets of the input query's atoms and split
    /// multi-element paths into chains of single atoms over fresh
    /// variables. Single-length elements get the full role closure,
    /// starred elements the direct sub-role closure.
    pub fn saturate_paths(&self, query: &InputQuery, vars: &mut VarSource) -> RewritableQuery {
        let mut body = BTreeSet::new();
        for atom in &query.body {
            match atom {
                Atom::Concept(c) => {
                    body.insert(RewritableAtom::Concept(c.clone()));
                }
                Atom::Path(p) => {
                    if p.elements.is_empty() {
                        continue;
                    }
                    let last = p.elements.len() - 1;
                    let mut left = p.left.clone();
                    for (i, element) in p.elements.iter().enumerate() {
                        let right = if i == last { p.right.clone() } else { vars.fresh_var() };
                        let atom = if element.arbitrary_length {
                            RewritableAtom::ArbitraryLength(ArbitraryLengthAtom::new(
                                saturate_direct(&element.roles, self.ontology),
                                left.clone(),
                                right.clone(),
                            ))
                        } else {
                            RewritableAtom::Roles(RolesAtom::new(
                                saturate_roles(&element.roles, self.ontology),
                                left.clone(),
                                right.clone(),
                            ))
                        };
                        body.insert(atom);
                        left = right;
                    }
                }
            }
        }
        RewritableQuery::new(query.head.clone(), body)
    }

    /// Mark unbound variables: every named variable that occurs in
    /// exactly one atom position and is not an answer variable becomes
    /// an unbound variable.
    pub fn tau(&self, q: &RewritableQuery, vars: &mut VarSource) -> RewritableQuery {
        let mut counts: HashMap<String, usize> = HashMap::new();
        for atom in &q.body {
            for term in atom.terms() {
                if let Term::Variable(name) = term {
                    *counts.entry(name.clone()).or_insert(0) += 1;
                }
            }
        }
        let mut body = BTreeSet::new();
        for atom in &q.body {
            body.insert(atom.map_terms(&mut |term| match term {
                Term::Variable(name) if counts[name.as_str()] == 1 && !q.head.contains(term) => {
                    vars.fresh_unbound()
                }
                _ => term.clone(),
            }));
        }
        RewritableQuery::new(q.head.clone(), body)
    }

    /// Replace one atom by the result of rewriting it backwards through
    /// an applicable axiom.
    pub fn replace(
        &self,
        q: &RewritableQuery,
        atom: &RewritableAtom,
        axiom: &Axiom,
        vars: &mut VarSource,
    ) -> RewritableQuery {
        let mut body = q.body.clone();
        body.remove(atom);
        body.insert(atom.apply(axiom, self.ontology, vars));
        RewritableQuery::new(q.head.clone(), body)
    }

    /// Unify two atoms of the same shape and apply the unifier to the
    /// whole query. Role atoms compare their canonical orientation, so
    /// inverse-related atoms unify without a separate retry.
    pub fn reduce(
        &self,
        q: &RewritableQuery,
        a1: &RewritableAtom,
        a2: &RewritableAtom,
    ) -> RewritableQuery {
        match (a1, a2) {
            (RewritableAtom::Concept(b1), RewritableAtom::Concept(b2))
                if b1.class == b2.class =>
            {
                Unifier::new(&[b1.term.clone()], &[b2.term.clone()]).apply(q)
            }
            (RewritableAtom::Roles(b1), RewritableAtom::Roles(b2))
                if b1.roles() == b2.roles() =>
            {
                Unifier::new(
                    &[b1.left().clone(), b1.right().clone()],
                    &[b2.left().clone(), b2.right().clone()],
                )
                .apply(q)
            }
            (RewritableAtom::ArbitraryLength(b1), RewritableAtom::ArbitraryLength(b2))
                if b1.roles == b2.roles =>
            {
                Unifier::new(
                    &[b1.left.clone(), b1.right.clone()],
                    &[b2.left.clone(), b2.right.clone()],
                )
                .apply(q)
            }
            _ => q.clone(),
        }
    }

    /// Splice a binary atom into an arbitrary-length atom it shares an
    /// endpoint with, provided its roles are covered by the star's role
    /// set. The boundary variable keeps the binary atom's inner
    /// endpoint name when it has one; an unbound inner endpoint gets a
    /// name derived from its id, so repeating the rule on the same
    /// query reproduces the same result.
    pub fn concatenate(
        &self,
        q: &RewritableQuery,
        a1: &RewritableAtom,
        a2: &ArbitraryLengthAtom,
    ) -> RewritableQuery {
        let oriented = match a1 {
            RewritableAtom::Roles(b1) => {
                let primary = (b1.roles().clone(), b1.left().clone(), b1.right().clone());
                if primary.0.is_subset(&a2.roles) {
                    Some(primary)
                } else {
                    let flipped = b1.inverse_parts();
                    if flipped.0.is_subset(&a2.roles) {
                        Some(flipped)
                    } else {
                        None
                    }
                }
            }
            RewritableAtom::ArbitraryLength(b1) if b1.roles.is_subset(&a2.roles) => {
                Some((b1.roles.clone(), b1.left.clone(), b1.right.clone()))
            }
            _ => None,
        };
        let (roles, left, right) = match oriented {
            Some(parts) => parts,
            None => return q.clone(),
        };
        let single = !matches!(a1, RewritableAtom::ArbitraryLength(_));

        if left.is_identical(&a2.left) {
            // splice in front: the star now starts at the boundary
            let boundary = boundary_var(&right);
            let r1 = rebuilt(single, roles, left, boundary.clone());
            let r2 = RewritableAtom::ArbitraryLength(ArbitraryLengthAtom::new(
                a2.roles.clone(),
                boundary,
                a2.right.clone(),
            ));
            self.splice(q, a1, a2, r1, r2)
        } else if right.is_identical(&a2.right) {
            // splice at the back: the star now ends at the boundary
            let boundary = boundary_var(&left);
            let r1 = rebuilt(single, roles, boundary.clone(), right);
            let r2 = RewritableAtom::ArbitraryLength(ArbitraryLengthAtom::new(
                a2.roles.clone(),
                a2.left.clone(),
                boundary,
            ));
            self.splice(q, a1, a2, r1, r2)
        } else {
            q.clone()
        }
    }

    fn splice(
        &self,
        q: &RewritableQuery,
        a1: &RewritableAtom,
        a2: &ArbitraryLengthAtom,
        r1: RewritableAtom,
        r2: RewritableAtom,
    ) -> RewritableQuery {
        let mut body = q.body.clone();
        body.remove(a1);
        body.remove(&RewritableAtom::ArbitraryLength(a2.clone()));
        body.insert(r1);
        body.insert(r2);
        RewritableQuery::new(q.head.clone(), body)
    }

    /// Overlap two binary atoms on the intersection of their role sets,
    /// unifying their terms. Both orientations of a Roles atom are
    /// tried, so up to two results come back. Atoms with identical
    /// terms are not merged (the unifier must be non-empty).
    pub fn merge(
        &self,
        q: &RewritableQuery,
        a1: &RewritableAtom,
        a2: &RewritableAtom,
    ) -> Vec<RewritableQuery> {
        let mut results = Vec::new();
        let (roles2, left2, right2) = match binary_parts(a2) {
            Some(parts) => parts,
            None => return results,
        };
        match a1 {
            RewritableAtom::Roles(b1) => {
                let orientations = [
                    (b1.roles().clone(), b1.left().clone(), b1.right().clone()),
                    b1.inverse_parts(),
                ];
                for (roles1, left1, right1) in orientations {
                    let intersection: BTreeSet<RoleExpr> =
                        roles1.intersection(&roles2).cloned().collect();
                    if intersection.is_empty() {
                        continue;
                    }
                    let unifier = Unifier::new(
                        &[left1.clone(), right1.clone()],
                        &[left2.clone(), right2.clone()],
                    );
                    if unifier.is_empty() {
                        continue;
                    }
                    let mut body = q.body.clone();
                    body.remove(a1);
                    body.remove(a2);
                    body.insert(RewritableAtom::Roles(RolesAtom::new(
                        intersection.clone(),
                        left1,
                        right1,
                    )));
                    body.insert(RewritableAtom::Roles(RolesAtom::new(
                        intersection,
                        left2.clone(),
                        right2.clone(),
                    )));
                    results.push(unifier.apply(&RewritableQuery::new(q.head.clone(), body)));
                }
            }
            RewritableAtom::ArbitraryLength(b1) => {
                let intersection: BTreeSet<RoleExpr> =
                    b1.roles.intersection(&roles2).cloned().collect();
                if intersection.is_empty() {
                    return results;
                }
                let unifier = Unifier::new(
                    &[b1.left.clone(), b1.right.clone()],
                    &[left2.clone(), right2.clone()],
                );
                if unifier.is_empty() {
                    return results;
                }
                let mut body = q.body.clone();
                body.remove(a1);
                body.remove(a2);
                if matches!(a2, RewritableAtom::ArbitraryLength(_)) {
                    body.insert(RewritableAtom::ArbitraryLength(ArbitraryLengthAtom::new(
                        intersection.clone(),
                        b1.left.clone(),
                        b1.right.clone(),
                    )));
                    body.insert(RewritableAtom::ArbitraryLength(ArbitraryLengthAtom::new(
                        intersection,
                        left2,
                        right2,
                    )));
                } else {
                    body.insert(RewritableAtom::Roles(RolesAtom::new(
                        intersection.clone(),
                        b1.left.clone(),
                        b1.right.clone(),
                    )));
                    body.insert(RewritableAtom::Roles(RolesAtom::new(
                        intersection,
                        left2,
                        right2,
                    )));
                }
                results.push(unifier.apply(&RewritableQuery::new(q.head.clone(), body)));
            }
            RewritableAtom::Concept(_) => {}
        }
        results
    }

    /// Remove an arbitrary-length atom whose endpoint is unbound; the
    /// empty path always satisfies it. The body must keep at least one
    /// atom, otherwise the query would become trivially true.
    pub fn drop_atom(&self, q: &RewritableQuery, atom: &ArbitraryLengthAtom) -> RewritableQuery {
        if q.body.len() > 1 && (atom.left.is_unbound() || atom.right.is_unbound()) {
            let mut body = q.body.clone();
            body.remove(&RewritableAtom::ArbitraryLength(atom.clone()));
            RewritableQuery::new(q.head.clone(), body)
        } else {
            q.clone()
        }
    }
}

/// The boundary variable for a splice: the inner endpoint itself when
/// named, otherwise a name derived from the unbound id (stable for a
/// given stored query, unlike a counter-fresh name). The `u` prefix
/// keeps derived names apart from the `v{n}` chain variables.
fn boundary_var(term: &Term) -> Term {
    match term {
        Term::Variable(_) => term.clone(),
        Term::Unbound(id) => Term::Variable(format!("u{id}")),
    }
}

fn rebuilt(single: bool, roles: BTreeSet<RoleExpr>, left: Term, right: Term) -> RewritableAtom {
    if single {
        RewritableAtom::Roles(RolesAtom::new(roles, left, right))
    } else {
        RewritableAtom::ArbitraryLength(ArbitraryLengthAtom::new(roles, left, right))
    }
}

fn binary_parts(atom: &RewritableAtom) -> Option<(BTreeSet<RoleExpr>, Term, Term)> {
    match atom {
        RewritableAtom::Roles(b) => Some((b.roles().clone(), b.left().clone(), b.right().clone())),
        RewritableAtom::ArbitraryLength(b) => {
            Some((b.roles.clone(), b.left.clone(), b.right.clone()))
        }
        RewritableAtom::Concept(_) => None,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{PathAtom, PathElement};

    const SUBROLES: &str = "\
Declaration(Class(:A))
Declaration(ObjectProperty(:r))
Declaration(ObjectProperty(:s))
Declaration(ObjectProperty(:t))
SubObjectPropertyOf(:r :s)
SubObjectPropertyOf(:t :r)
";

    fn roles(names: &[&str]) -> BTreeSet<RoleExpr> {
        names
            .iter()
            .map(|n| match n.strip_suffix('-') {
                Some(base) => RoleExpr::inverse_of(base),
                None => RoleExpr::named(*n),
            })
            .collect()
    }

    fn path(elements: Vec<PathElement>, left: &str, right: &str) -> Atom {
        Atom::Path(PathAtom {
            elements,
            left: Term::var(left),
            right: Term::var(right),
        })
    }

    #[test]
    fn saturate_paths_splits_and_saturates() {
        let o = Ontology::parse(SUBROLES).unwrap();
        let rewriter = Rewriter::new(&o);
        let mut vars = VarSource::new();

        let q = InputQuery {
            head: vec![Term::var("x")],
            body: vec![path(
                vec![
                    PathElement::single(roles(&["s"])),
                    PathElement::starred(roles(&["r"])),
                ],
                "x",
                "y",
            )],
        };
        let qp = rewriter.saturate_paths(&q, &mut vars);
        assert_eq!(qp.to_string(), "q(x):-(r|s|t)(x,v1),(r|t)*(v1,y)");
    }

    #[test]
    fn chain_variables_continue_across_paths() {
        let o = Ontology::parse(SUBROLES).unwrap();
        let rewriter = Rewriter::new(&o);
        let mut vars = VarSource::new();

        let q = InputQuery {
            head: vec![Term::var("x"), Term::var("u")],
            body: vec![
                path(
                    vec![
                        PathElement::single(roles(&["t"])),
                        PathElement::starred(roles(&["t"])),
                    ],
                    "x",
                    "y",
                ),
                path(
                    vec![
                        PathElement::single(roles(&["t"])),
                        PathElement::single(roles(&["t"])),
                    ],
                    "u",
                    "w",
                ),
            ],
        };
        let qp = rewriter.saturate_paths(&q, &mut vars);
        assert_eq!(
            qp.to_string(),
            "q(x,u):-t(u,v2),t(v2,w),t(x,v1),t*(v1,y)"
        );
    }

    #[test]
    fn tau_marks_boolean_query_singletons() {
        let o = Ontology::parse(SUBROLES).unwrap();
        let rewriter = Rewriter::new(&o);
        let mut vars = VarSource::new();

        let q = RewritableQuery::new(
            Vec::new(),
            BTreeSet::from([RewritableAtom::Roles(RolesAtom::new(
                roles(&["s"]),
                Term::var("x"),
                Term::var("y"),
            ))]),
        );
        assert_eq!(rewriter.tau(&q, &mut vars).to_string(), "q():-s(_,_)");

        let q = RewritableQuery::new(
            Vec::new(),
            BTreeSet::from([RewritableAtom::ArbitraryLength(ArbitraryLengthAtom::new(
                roles(&["s"]),
                Term::var("x"),
                Term::var("y"),
            ))]),
        );
        assert_eq!(rewriter.tau(&q, &mut vars).to_string(), "q():-s*(_,_)");
    }

    #[test]
    fn tau_keeps_answer_and_join_variables() {
        let o = Ontology::parse(SUBROLES).unwrap();
        let rewriter = Rewriter::new(&o);
        let mut vars = VarSource::new();

        let q = RewritableQuery::new(
            vec![Term::var("x")],
            BTreeSet::from([
                RewritableAtom::Roles(RolesAtom::new(
                    roles(&["r"]),
                    Term::var("x"),
                    Term::var("y"),
                )),
                RewritableAtom::Roles(RolesAtom::new(
                    roles(&["s"]),
                    Term::var("y"),
                    Term::var("z"),
                )),
            ]),
        );
        // x is an answer variable, y joins two atoms, z is singleton
        assert_eq!(
            rewriter.tau(&q, &mut vars).to_string(),
            "q(x):-r(x,y),s(y,_)"
        );
    }

    #[test]
    fn drop_requires_unbound_endpoint_and_nonempty_rest() {
        let o = Ontology::parse(SUBROLES).unwrap();
        let rewriter = Rewriter::new(&o);

        let star = ArbitraryLengthAtom::new(roles(&["s"]), Term::var("y"), Term::Unbound(1));
        let q = RewritableQuery::new(
            vec![Term::var("x")],
            BTreeSet::from([
                RewritableAtom::Roles(RolesAtom::new(
                    roles(&["r"]),
                    Term::var("x"),
                    Term::var("y"),
                )),
                RewritableAtom::ArbitraryLength(star.clone()),
            ]),
        );
        assert_eq!(rewriter.drop_atom(&q, &star).to_string(), "q(x):-r(x,y)");

        // the last remaining atom can never be dropped
        let lone = ArbitraryLengthAtom::new(roles(&["s"]), Term::Unbound(1), Term::Unbound(2));
        let q = RewritableQuery::new(
            Vec::new(),
            BTreeSet::from([RewritableAtom::ArbitraryLength(lone.clone())]),
        );
        assert_eq!(rewriter.drop_atom(&q, &lone), q);

        // both endpoints bound: no drop either
        let bound = ArbitraryLengthAtom::new(roles(&["s"]), Term::var("y"), Term::var("x"));
        let q = RewritableQuery::new(
            vec![Term::var("x")],
            BTreeSet::from([
                RewritableAtom::Roles(RolesAtom::new(
                    roles(&["r"]),
                    Term::var("x"),
                    Term::var("y"),
                )),
                RewritableAtom::ArbitraryLength(bound.clone()),
            ]),
        );
        assert_eq!(rewriter.drop_atom(&q, &bound), q);
    }

    #[test]
    fn concatenate_splices_at_shared_front() {
        let o = Ontology::parse(SUBROLES).unwrap();
        let rewriter = Rewriter::new(&o);

        let a1 = RewritableAtom::Roles(RolesAtom::new(
            roles(&["t"]),
            Term::var("x"),
            Term::var("y"),
        ));
        let a2 = ArbitraryLengthAtom::new(roles(&["t", "s"]), Term::var("x"), Term::var("z"));
        let q = RewritableQuery::new(
            vec![Term::var("x"), Term::var("z")],
            BTreeSet::from([a1.clone(), RewritableAtom::ArbitraryLength(a2.clone())]),
        );
        let qp = rewriter.concatenate(&q, &a1, &a2);
        assert_eq!(qp.to_string(), "q(x,z):-t(x,y),(s|t)*(y,z)");
    }

    #[test]
    fn concatenate_mints_boundary_for_unbound_endpoint() {
        let o = Ontology::parse(SUBROLES).unwrap();
        let rewriter = Rewriter::new(&o);

        let a1 = RewritableAtom::Roles(RolesAtom::new(
            roles(&["t"]),
            Term::var("x"),
            Term::Unbound(7),
        ));
        let a2 = ArbitraryLengthAtom::new(roles(&["t"]), Term::var("x"), Term::var("z"));
        // a chain variable named v7 elsewhere in the body must not be
        // captured by the derived boundary name
        let bystander = RewritableAtom::Roles(RolesAtom::new(
            roles(&["s"]),
            Term::var("v7"),
            Term::var("z"),
        ));
        let q = RewritableQuery::new(
            vec![Term::var("x"), Term::var("z")],
            BTreeSet::from([
                a1.clone(),
                RewritableAtom::ArbitraryLength(a2.clone()),
                bystander,
            ]),
        );
        let qp = rewriter.concatenate(&q, &a1, &a2);
        assert_eq!(qp.to_string(), "q(x,z):-s(v7,z),t(x,u7),t*(u7,z)");
    }

    #[test]
    fn concatenate_without_shared_endpoint_is_identity() {
        let o = Ontology::parse(SUBROLES).unwrap();
        let rewriter = Rewriter::new(&o);

        let a1 = RewritableAtom::Roles(RolesAtom::new(
            roles(&["t"]),
            Term::var("x"),
            Term::var("y"),
        ));
        // chain-shared endpoints (right of a1 = left of a2) do not splice
        let a2 = ArbitraryLengthAtom::new(roles(&["t"]), Term::var("y"), Term::var("z"));
        let q = RewritableQuery::new(
            vec![Term::var("x")],
            BTreeSet::from([a1.clone(), RewritableAtom::ArbitraryLength(a2.clone())]),
        );
        assert_eq!(rewriter.concatenate(&q, &a1, &a2), q);
    }

    #[test]
    fn merge_is_gated_on_nonempty_unifier() {
        let o = Ontology::parse(SUBROLES).unwrap();
        let rewriter = Rewriter::new(&o);

        let a = RewritableAtom::Roles(RolesAtom::new(
            roles(&["r"]),
            Term::var("x"),
            Term::var("y"),
        ));
        let q = RewritableQuery::new(vec![Term::var("x")], BTreeSet::from([a.clone()]));
        // merging an atom with itself: terms already identical
        assert!(rewriter.merge(&q, &a, &a).is_empty());
    }

    #[test]
    fn reduce_on_distinct_shapes_is_identity() {
        let o = Ontology::parse(SUBROLES).unwrap();
        let rewriter = Rewriter::new(&o);

        let a1 = RewritableAtom::Roles(RolesAtom::new(
            roles(&["r"]),
            Term::var("x"),
            Term::var("y"),
        ));
        let a2 = RewritableAtom::Roles(RolesAtom::new(
            roles(&["t"]),
            Term::var("x"),
            Term::var("y"),
        ));
        let q = RewritableQuery::new(
            vec![Term::var("x")],
            BTreeSet::from([a1.clone(), a2.clone()]),
        );
        assert_eq!(rewriter.reduce(&q, &a1, &a2), q);
    }
}
