//! Parser for the query surface syntax.
//!
//! Queries are written datalog-style:
//!
//! ```text
//! q(x,y) :- Professor(x), teaches/(givesLecture|isTaughtBy-)*(x,y)
//! ```
//!
//! The head lists the answer variables (an empty list makes the query
//! boolean). A body atom is either a class name applied to one term or
//! a path applied to two: slash-separated elements, each a role name or
//! a parenthesized `|`-disjunction of role names, with a `-` suffix for
//! the inverse role and an optional `*` for the Kleene star.
//!
//! Parsing is purely syntactic; names are then resolved against the
//! ontology's signature, which decides whether an identifier is a class
//! or a property and rejects unknown names.

use nom::branch::alt;
use nom::bytes::complete::tag;
use nom::character::complete::{alpha1, alphanumeric1, char as pchar, multispace0};
use nom::combinator::{all_consuming, map, opt, recognize};
use nom::multi::{many0_count, separated_list0, separated_list1};
use nom::sequence::{delimited, pair, tuple};
use nom::IResult;

use std::collections::BTreeSet;

use ontopath_core::{Atom, ConceptAtom, InputQuery, PathAtom, PathElement, Term};
use ontopath_ontology::{Ontology, RoleExpr};

/// Errors from parsing or resolving a query.
#[derive(Debug, thiserror::Error)]
pub enum QueryParseError {
    #[error("syntax error in query: {0}")]
    Syntax(String),
    #[error("unknown class `{0}`")]
    UnknownClass(String),
    #[error("unknown property `{0}`")]
    UnknownProperty(String),
    #[error("`{0}` takes one term, not two")]
    ClassUsedAsRole(String),
    #[error("a one-term atom must be a plain class name")]
    MalformedConceptAtom,
    #[error("an atom takes at most two terms, found {0}")]
    WrongArity(usize),
}

/// Parse a query against an ontology's signature.
pub fn parse_query(input: &str, ontology: &Ontology) -> Result<InputQuery, QueryParseError> {
    let (_, raw) = all_consuming(ws(raw_query))(input)
        .map_err(|e| QueryParseError::Syntax(e.to_string()))?;
    resolve(raw, ontology)
}

// ============================================================================
// Grammar
// ============================================================================

struct RawQuery {
    head: Vec<String>,
    body: Vec<RawAtom>,
}

struct RawAtom {
    elements: Vec<RawElement>,
    terms: Vec<String>,
}

struct RawElement {
    roles: Vec<RawRole>,
    starred: bool,
}

struct RawRole {
    name: String,
    inverse: bool,
}

fn ws<'a, F, O>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    delimited(multispace0, inner, multispace0)
}

fn identifier(input: &str) -> IResult<&str, String> {
    map(
        recognize(pair(
            alt((alpha1, tag("_"))),
            many0_count(alt((alphanumeric1, tag("_")))),
        )),
        str::to_string,
    )(input)
}

fn role(input: &str) -> IResult<&str, RawRole> {
    map(pair(identifier, opt(pchar('-'))), |(name, inv)| RawRole {
        name,
        inverse: inv.is_some(),
    })(input)
}

fn element(input: &str) -> IResult<&str, RawElement> {
    map(
        pair(
            alt((
                delimited(
                    ws(pchar('(')),
                    separated_list1(ws(pchar('|')), ws(role)),
                    ws(pchar(')')),
                ),
                map(role, |r| vec![r]),
            )),
            opt(pchar('*')),
        ),
        |(roles, star)| RawElement {
            roles,
            starred: star.is_some(),
        },
    )(input)
}

fn raw_atom(input: &str) -> IResult<&str, RawAtom> {
    map(
        tuple((
            separated_list1(ws(pchar('/')), element),
            delimited(
                ws(pchar('(')),
                separated_list1(ws(pchar(',')), ws(identifier)),
                ws(pchar(')')),
            ),
        )),
        |(elements, terms)| RawAtom { elements, terms },
    )(input)
}

fn raw_query(input: &str) -> IResult<&str, RawQuery> {
    map(
        tuple((
            ws(identifier),
            delimited(
                ws(pchar('(')),
                separated_list0(ws(pchar(',')), ws(identifier)),
                ws(pchar(')')),
            ),
            ws(tag(":-")),
            separated_list1(ws(pchar(',')), ws(raw_atom)),
        )),
        |(_name, head, _, body)| RawQuery { head, body },
    )(input)
}

// ============================================================================
// Name resolution
// ============================================================================

fn resolve(raw: RawQuery, ontology: &Ontology) -> Result<InputQuery, QueryParseError> {
    let head = raw.head.into_iter().map(Term::Variable).collect();
    let body = raw
        .body
        .into_iter()
        .map(|atom| resolve_atom(atom, ontology))
        .collect::<Result<_, _>>()?;
    Ok(InputQuery { head, body })
}

fn resolve_atom(raw: RawAtom, ontology: &Ontology) -> Result<Atom, QueryParseError> {
    if raw.terms.len() == 1 {
        // a unary atom must be a bare class name
        let name = match raw.elements.as_slice() {
            [RawElement { roles, starred: false }] => match roles.as_slice() {
                [RawRole { name, inverse: false }] => name,
                _ => return Err(QueryParseError::MalformedConceptAtom),
            },
            _ => return Err(QueryParseError::MalformedConceptAtom),
        };
        let class = ontology
            .class(name)
            .ok_or_else(|| QueryParseError::UnknownClass(name.clone()))?;
        let term = Term::var(raw.terms[0].clone());
        return Ok(Atom::Concept(ConceptAtom::new(class.clone(), term)));
    }
    if raw.terms.len() != 2 {
        return Err(QueryParseError::WrongArity(raw.terms.len()));
    }

    let mut elements = Vec::with_capacity(raw.elements.len());
    for raw_element in raw.elements {
        let mut roles = BTreeSet::new();
        for r in raw_element.roles {
            if ontology.property(&r.name).is_none() {
                if ontology.class(&r.name).is_some() {
                    return Err(QueryParseError::ClassUsedAsRole(r.name));
                }
                return Err(QueryParseError::UnknownProperty(r.name));
            }
            roles.insert(if r.inverse {
                RoleExpr::inverse_of(&r.name)
            } else {
                RoleExpr::named(&r.name)
            });
        }
        elements.push(if raw_element.starred {
            PathElement::starred(roles)
        } else {
            PathElement::single(roles)
        });
    }
    Ok(Atom::Path(PathAtom {
        elements,
        left: Term::var(raw.terms[0].clone()),
        right: Term::var(raw.terms[1].clone()),
    }))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const ONTOLOGY: &str = "\
Declaration(Class(:Professor))
Declaration(Class(:Course))
Declaration(ObjectProperty(:teaches))
Declaration(ObjectProperty(:givesLecture))
";

    fn ontology() -> Ontology {
        Ontology::parse(ONTOLOGY).unwrap()
    }

    #[test]
    fn parses_concept_atom() {
        let q = parse_query("q(x):-Professor(x)", &ontology()).unwrap();
        assert_eq!(q.head, vec![Term::var("x")]);
        assert_eq!(q.to_string(), "q(x):-Professor(x)");
    }

    #[test]
    fn parses_mixed_body() {
        let q = parse_query("q(x) :- teaches(x,y), Course(y)", &ontology()).unwrap();
        assert_eq!(q.body.len(), 2);
        assert_eq!(q.to_string(), "q(x):-teaches(x,y),Course(y)");
    }

    #[test]
    fn parses_path_with_star_and_disjunction() {
        let q = parse_query(
            "q(x):-teaches/(teaches|givesLecture-)*(x,y)",
            &ontology(),
        )
        .unwrap();
        assert_eq!(q.to_string(), "q(x):-teaches/(givesLecture-|teaches)*(x,y)");
    }

    #[test]
    fn parses_boolean_query() {
        let q = parse_query("q():-teaches(x,y)", &ontology()).unwrap();
        assert!(q.head.is_empty());
    }

    #[test]
    fn rejects_unknown_names() {
        let err = parse_query("q(x):-Student(x)", &ontology()).unwrap_err();
        assert!(matches!(err, QueryParseError::UnknownClass(n) if n == "Student"));

        let err = parse_query("q(x):-attends(x,y)", &ontology()).unwrap_err();
        assert!(matches!(err, QueryParseError::UnknownProperty(n) if n == "attends"));
    }

    #[test]
    fn rejects_class_in_role_position() {
        let err = parse_query("q(x):-Course(x,y)", &ontology()).unwrap_err();
        assert!(matches!(err, QueryParseError::ClassUsedAsRole(n) if n == "Course"));
    }

    #[test]
    fn rejects_starred_concept_atom() {
        let err = parse_query("q(x):-Professor*(x)", &ontology()).unwrap_err();
        assert!(matches!(err, QueryParseError::MalformedConceptAtom));
    }

    #[test]
    fn rejects_atoms_with_more_than_two_terms() {
        let err = parse_query("q(x):-teaches(x,y,z)", &ontology()).unwrap_err();
        assert!(matches!(err, QueryParseError::WrongArity(3)));

        let err = parse_query("q(x):-Professor(x,y,z)", &ontology()).unwrap_err();
        assert!(matches!(err, QueryParseError::WrongArity(3)));
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            parse_query("q(x) whatever", &ontology()),
            Err(QueryParseError::Syntax(_))
        ));
    }
}
