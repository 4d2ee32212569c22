//! End-to-end rewriting: ontology text in, the complete query set out.

use std::collections::BTreeSet;

use ontopath_core::{
    Atom, InputQuery, PathAtom, PathElement, RewritableAtom, Rewriter, Term, VarSource,
};
use ontopath_ontology::{Ontology, RoleExpr};

const UNIVERSITY: &str = r#"
Prefix(:=<http://example.org/university#>)
Ontology(<http://example.org/university>
  Declaration(Class(:Professor))
  Declaration(Class(:FullProfessor))
  Declaration(Class(:Course))
  Declaration(ObjectProperty(:teaches))
  Declaration(ObjectProperty(:isTaughtBy))
  Declaration(ObjectProperty(:givesLecture))
  Declaration(ObjectProperty(:givesLab))
  InverseObjectProperties(:teaches :isTaughtBy)
  SubObjectPropertyOf(:givesLecture :teaches)
  SubObjectPropertyOf(:givesLab :teaches)
  ObjectPropertyRange(:teaches :Course)
  SubClassOf(:Course ObjectSomeValuesFrom(:isTaughtBy owl:Thing))
  SubClassOf(:Professor ObjectSomeValuesFrom(:teaches owl:Thing))
  ObjectPropertyDomain(:teaches :Professor)
  SubClassOf(:FullProfessor :Professor)
)
"#;

fn roles(names: &[&str]) -> BTreeSet<RoleExpr> {
    names
        .iter()
        .map(|n| match n.strip_suffix('-') {
            Some(base) => RoleExpr::inverse_of(base),
            None => RoleExpr::named(*n),
        })
        .collect()
}

fn role_atom(role: &str, left: &str, right: &str) -> Atom {
    Atom::Path(PathAtom {
        elements: vec![PathElement::single(roles(&[role]))],
        left: Term::var(left),
        right: Term::var(right),
    })
}

fn rewritten_strings(ontology: &Ontology, query: &InputQuery) -> BTreeSet<String> {
    Rewriter::new(ontology)
        .rewrite(query)
        .iter()
        .map(|q| q.to_string())
        .collect()
}

#[test]
fn university_query_rewrites_to_five_queries() {
    let ontology = Ontology::parse(UNIVERSITY).unwrap();

    // who teaches a course?
    let query = InputQuery {
        head: vec![Term::var("x")],
        body: vec![
            role_atom("teaches", "x", "y"),
            Atom::Concept(ontopath_core::ConceptAtom::new(
                ontopath_ontology::ClassName::new("Course"),
                Term::var("y"),
            )),
        ],
    };

    let teaches = "(givesLab|givesLecture|isTaughtBy-|teaches)";
    let expected: BTreeSet<String> = [
        format!("q(x):-Course(y),{teaches}(x,y)"),
        format!("q(x):-{teaches}(x,y),{teaches}(_,y)"),
        format!("q(x):-{teaches}(x,_)"),
        "q(x):-Professor(x)".to_string(),
        "q(x):-FullProfessor(x)".to_string(),
    ]
    .into_iter()
    .collect();

    assert_eq!(rewritten_strings(&ontology, &query), expected);
}

#[test]
fn rewritten_set_is_closed_under_every_rule() {
    let ontology = Ontology::parse(UNIVERSITY).unwrap();

    // a path with a starred tail exercises all five rules
    let query = InputQuery {
        head: vec![Term::var("x")],
        body: vec![
            Atom::Path(PathAtom {
                elements: vec![
                    PathElement::single(roles(&["teaches"])),
                    PathElement::starred(roles(&["teaches"])),
                ],
                left: Term::var("x"),
                right: Term::var("y"),
            }),
            Atom::Concept(ontopath_core::ConceptAtom::new(
                ontopath_ontology::ClassName::new("Course"),
                Term::var("y"),
            )),
        ],
    };

    let rewriter = Rewriter::new(&ontology);
    let rewritten = rewriter.rewrite(&query);
    assert!(!rewritten.is_empty());

    // re-applying any rule to any result must land back in the set
    let mut vars = VarSource::new();
    for q in &rewritten {
        for atom in &q.body {
            for axiom in ontology.axioms() {
                if atom.applicable(axiom) {
                    let replaced = rewriter.replace(q, atom, axiom, &mut vars);
                    assert!(rewritten.contains(&rewriter.tau(&replaced, &mut vars)));
                }
            }
            if let RewritableAtom::ArbitraryLength(a) = atom {
                let dropped = rewriter.drop_atom(q, a);
                assert!(rewritten.contains(&rewriter.tau(&dropped, &mut vars)));
            }
        }
        for a1 in &q.body {
            for a2 in &q.body {
                let reduced = rewriter.reduce(q, a1, a2);
                assert!(rewritten.contains(&rewriter.tau(&reduced, &mut vars)));

                if let RewritableAtom::ArbitraryLength(b2) = a2 {
                    if a1 != a2 {
                        let joined = rewriter.concatenate(q, a1, b2);
                        assert!(rewritten.contains(&rewriter.tau(&joined, &mut vars)));
                    }
                }

                for merged in rewriter.merge(q, a1, a2) {
                    assert!(rewritten.contains(&rewriter.tau(&merged, &mut vars)));
                }
            }
        }
    }
}

#[test]
fn merge_tries_both_role_atom_orientations() {
    let ontology = Ontology::parse(
        "Declaration(ObjectProperty(:r))
",
    )
    .unwrap();

    // r(x,y) joined with r-(z,y); x and z become unbound, and merging
    // the two atoms (which overlap on r once one is flipped) pins both
    // endpoints to the answer variable
    let query = InputQuery {
        head: vec![Term::var("y")],
        body: vec![
            role_atom("r", "x", "y"),
            Atom::Path(PathAtom {
                elements: vec![PathElement::single(roles(&["r-"]))],
                left: Term::var("z"),
                right: Term::var("y"),
            }),
        ],
    };

    let expected: BTreeSet<String> = ["q(y):-r(y,_),r(_,y)".to_string(), "q(y):-r(y,y)".to_string()]
        .into_iter()
        .collect();

    assert_eq!(rewritten_strings(&ontology, &query), expected);
}

#[test]
fn dangling_star_atom_is_dropped() {
    let ontology = Ontology::parse(
        "Declaration(Class(:A))
Declaration(ObjectProperty(:r))
",
    )
    .unwrap();

    let query = InputQuery {
        head: vec![Term::var("x")],
        body: vec![
            Atom::Concept(ontopath_core::ConceptAtom::new(
                ontopath_ontology::ClassName::new("A"),
                Term::var("x"),
            )),
            Atom::Path(PathAtom {
                elements: vec![PathElement::starred(roles(&["r"]))],
                left: Term::var("x"),
                right: Term::var("y"),
            }),
        ],
    };

    let expected: BTreeSet<String> =
        ["q(x):-A(x),r*(x,_)".to_string(), "q(x):-A(x)".to_string()]
            .into_iter()
            .collect();

    assert_eq!(rewritten_strings(&ontology, &query), expected);
}

#[test]
fn boolean_query_keeps_empty_head() {
    let ontology = Ontology::parse(
        "Declaration(ObjectProperty(:r))
",
    )
    .unwrap();

    let query = InputQuery {
        head: Vec::new(),
        body: vec![role_atom("r", "x", "y")],
    };

    let results = Rewriter::new(&ontology).rewrite(&query);
    assert_eq!(results.len(), 1);
    let q = results.iter().next().unwrap();
    assert!(q.is_boolean());
    assert_eq!(q.to_string(), "q():-r(_,_)");
}
