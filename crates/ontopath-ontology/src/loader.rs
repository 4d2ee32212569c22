//! Loader for a pragmatic subset of the OWL 2 Functional-Style Syntax.
//!
//! The loader accepts exactly the axiom forms the rewriting calculus can
//! consume: class and object-property declarations, `SubClassOf`,
//! `SubObjectPropertyOf`, `InverseObjectProperties`,
//! `ObjectPropertyDomain` and `ObjectPropertyRange`, with
//! `ObjectSomeValuesFrom(R owl:Thing)` and `ObjectInverseOf(r)` as the
//! only compound expressions. Everything else is a `NotInProfile` error
//! rather than a silent skip.

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::model::{Axiom, ClassExpr, ClassName, Prop, RoleExpr};

// ============================================================================
// Ontology
// ============================================================================

/// A validated OWL 2 QL ontology: signature plus normalized axioms.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Ontology {
    iri: Option<String>,
    classes: BTreeSet<ClassName>,
    properties: BTreeSet<Prop>,
    axioms: Vec<Axiom>,
}

impl Ontology {
    /// Parse an ontology from functional-syntax text.
    pub fn parse(src: &str) -> Result<Ontology, OntologyError> {
        let tokens = lex(src)?;
        Parser { tokens, pos: 0 }.document()
    }

    /// Parse an ontology from a file.
    pub fn load(path: impl AsRef<Path>) -> Result<Ontology, OntologyError> {
        let src = std::fs::read_to_string(path)?;
        Ontology::parse(&src)
    }

    pub fn iri(&self) -> Option<&str> {
        self.iri.as_deref()
    }

    pub fn classes(&self) -> &BTreeSet<ClassName> {
        &self.classes
    }

    pub fn properties(&self) -> &BTreeSet<Prop> {
        &self.properties
    }

    pub fn axioms(&self) -> &[Axiom] {
        &self.axioms
    }

    /// Look up a class by its simple name.
    pub fn class(&self, name: &str) -> Option<&ClassName> {
        self.classes.iter().find(|c| c.name() == name)
    }

    /// Look up an object property by its simple name.
    pub fn property(&self, name: &str) -> Option<&Prop> {
        self.properties.iter().find(|p| p.name() == name)
    }

    /// All subclass axioms, as `(sub, sup)` pairs.
    pub fn subclass_axioms(&self) -> impl Iterator<Item = (&ClassExpr, &ClassExpr)> {
        self.axioms.iter().filter_map(|ax| match ax {
            Axiom::SubClassOf { sub, sup } => Some((sub, sup)),
            _ => None,
        })
    }

    /// Declared sub-roles of `sup`, matching the axiom's orientation
    /// exactly (`sub_roles_of(r-)` only matches axioms whose superrole
    /// is written as `r-`).
    pub fn sub_roles_of<'a>(&'a self, sup: &'a RoleExpr) -> impl Iterator<Item = &'a RoleExpr> {
        self.axioms.iter().filter_map(move |ax| match ax {
            Axiom::SubPropertyOf { sub, sup: s } if s == sup => Some(sub),
            _ => None,
        })
    }

    /// Properties declared inverse to `prop`, in either axiom position.
    pub fn inverse_partners<'a>(&'a self, prop: &'a Prop) -> impl Iterator<Item = &'a Prop> {
        self.axioms.iter().filter_map(move |ax| match ax {
            Axiom::InverseProperties { first, second } if first == prop => Some(second),
            Axiom::InverseProperties { first, second } if second == prop => Some(first),
            _ => None,
        })
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum OntologyError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse error at line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error("not in the OWL 2 QL fragment: {construct}")]
    NotInProfile { construct: String },
}

// ============================================================================
// Lexer
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
enum Tok {
    LParen,
    RParen,
    Eq,
    Name(String),
    Iri(String),
}

impl Tok {
    fn describe(&self) -> String {
        match self {
            Tok::LParen => "'('".to_string(),
            Tok::RParen => "')'".to_string(),
            Tok::Eq => "'='".to_string(),
            Tok::Name(n) => format!("'{n}'"),
            Tok::Iri(i) => format!("'<{i}>'"),
        }
    }
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | ':' | '-' | '.')
}

fn lex(src: &str) -> Result<Vec<(Tok, usize)>, OntologyError> {
    let mut tokens = Vec::new();
    let mut line = 1usize;
    let mut chars = src.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            '\n' => {
                line += 1;
                chars.next();
            }
            _ if c.is_whitespace() => {
                chars.next();
            }
            '#' => {
                while let Some(&c) = chars.peek() {
                    if c == '\n' {
                        break;
                    }
                    chars.next();
                }
            }
            '(' => {
                tokens.push((Tok::LParen, line));
                chars.next();
            }
            ')' => {
                tokens.push((Tok::RParen, line));
                chars.next();
            }
            '=' => {
                tokens.push((Tok::Eq, line));
                chars.next();
            }
            '<' => {
                chars.next();
                let mut iri = String::new();
                loop {
                    match chars.next() {
                        Some('>') => break,
                        Some('\n') | None => {
                            return Err(OntologyError::Parse {
                                line,
                                message: "unterminated IRI".to_string(),
                            });
                        }
                        Some(c) => iri.push(c),
                    }
                }
                tokens.push((Tok::Iri(iri), line));
            }
            _ if is_name_char(c) => {
                let mut name = String::new();
                while let Some(&c) = chars.peek() {
                    if is_name_char(c) {
                        name.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push((Tok::Name(name), line));
            }
            _ => {
                return Err(OntologyError::Parse {
                    line,
                    message: format!("unexpected character '{c}'"),
                });
            }
        }
    }
    Ok(tokens)
}

// ============================================================================
// Parser
// ============================================================================

/// Strip the prefix from a prefixed name: `:Course` and `univ:Course`
/// both resolve to `Course`.
fn local_name(name: &str) -> &str {
    name.rsplit(':').next().unwrap_or(name)
}

struct Parser {
    tokens: Vec<(Tok, usize)>,
    pos: usize,
}

impl Parser {
    fn document(mut self) -> Result<Ontology, OntologyError> {
        let mut ontology = Ontology::default();
        while let Some((tok, line)) = self.peek() {
            match tok {
                Tok::Name(name) if name == "Prefix" => {
                    self.pos += 1;
                    self.skip_balanced()?;
                }
                Tok::Name(name) if name == "Ontology" => {
                    self.pos += 1;
                    self.expect(Tok::LParen)?;
                    while let Some((Tok::Iri(iri), _)) = self.peek() {
                        if ontology.iri.is_none() {
                            ontology.iri = Some(iri.clone());
                        }
                        self.pos += 1;
                    }
                    while !matches!(self.peek(), Some((Tok::RParen, _)) | None) {
                        self.axiom(&mut ontology)?;
                    }
                    self.expect(Tok::RParen)?;
                }
                Tok::Name(_) => self.axiom(&mut ontology)?,
                _ => {
                    let line = *line;
                    return Err(self.unexpected(line));
                }
            }
        }
        Ok(ontology)
    }

    fn axiom(&mut self, ontology: &mut Ontology) -> Result<(), OntologyError> {
        let (keyword, _) = self.name()?;
        match keyword.as_str() {
            "Declaration" => {
                self.expect(Tok::LParen)?;
                let (kind, _) = self.name()?;
                match kind.as_str() {
                    "Class" => {
                        let name = self.parenthesized_name()?;
                        ontology.classes.insert(ClassName::new(name));
                    }
                    "ObjectProperty" => {
                        let name = self.parenthesized_name()?;
                        ontology.properties.insert(Prop::new(name));
                    }
                    other => {
                        return Err(OntologyError::NotInProfile {
                            construct: format!("Declaration({other})"),
                        });
                    }
                }
                self.expect(Tok::RParen)?;
            }
            "SubClassOf" => {
                self.expect(Tok::LParen)?;
                let sub = self.class_expr(ontology)?;
                let sup = self.class_expr(ontology)?;
                self.expect(Tok::RParen)?;
                ontology.axioms.push(Axiom::SubClassOf { sub, sup });
            }
            "SubObjectPropertyOf" => {
                self.expect(Tok::LParen)?;
                let sub = self.role_expr(ontology)?;
                let sup = self.role_expr(ontology)?;
                self.expect(Tok::RParen)?;
                ontology.axioms.push(Axiom::SubPropertyOf { sub, sup });
            }
            "InverseObjectProperties" => {
                self.expect(Tok::LParen)?;
                let first = self.role_expr(ontology)?;
                let second = self.role_expr(ontology)?;
                self.expect(Tok::RParen)?;
                if first.inverse || second.inverse {
                    return Err(OntologyError::NotInProfile {
                        construct: "InverseObjectProperties over ObjectInverseOf".to_string(),
                    });
                }
                ontology.axioms.push(Axiom::InverseProperties {
                    first: first.prop,
                    second: second.prop,
                });
            }
            "ObjectPropertyDomain" => {
                self.expect(Tok::LParen)?;
                let role = self.role_expr(ontology)?;
                let sup = self.class_expr(ontology)?;
                self.expect(Tok::RParen)?;
                ontology.axioms.push(Axiom::SubClassOf {
                    sub: ClassExpr::SomeValuesFrom(role),
                    sup,
                });
            }
            "ObjectPropertyRange" => {
                self.expect(Tok::LParen)?;
                let role = self.role_expr(ontology)?;
                let sup = self.class_expr(ontology)?;
                self.expect(Tok::RParen)?;
                ontology.axioms.push(Axiom::SubClassOf {
                    sub: ClassExpr::SomeValuesFrom(role.inverse()),
                    sup,
                });
            }
            // Annotations carry no logical content.
            "Annotation" | "AnnotationAssertion" => {
                self.skip_balanced()?;
            }
            other => {
                return Err(OntologyError::NotInProfile {
                    construct: other.to_string(),
                });
            }
        }
        Ok(())
    }

    fn class_expr(&mut self, ontology: &mut Ontology) -> Result<ClassExpr, OntologyError> {
        let (name, _line) = self.name()?;
        match name.as_str() {
            "ObjectSomeValuesFrom" => {
                self.expect(Tok::LParen)?;
                let role = self.role_expr(ontology)?;
                let (filler, _) = self.name()?;
                if filler != "owl:Thing" {
                    return Err(OntologyError::NotInProfile {
                        construct: format!("ObjectSomeValuesFrom with filler {filler}"),
                    });
                }
                self.expect(Tok::RParen)?;
                Ok(ClassExpr::SomeValuesFrom(role))
            }
            "ObjectIntersectionOf" | "ObjectUnionOf" | "ObjectComplementOf" | "ObjectOneOf"
            | "ObjectAllValuesFrom" | "ObjectHasValue" | "ObjectHasSelf"
            | "ObjectMinCardinality" | "ObjectMaxCardinality" | "ObjectExactCardinality" => {
                Err(OntologyError::NotInProfile { construct: name })
            }
            _ => {
                let class = ClassName::new(local_name(&name));
                ontology.classes.insert(class.clone());
                Ok(ClassExpr::Class(class))
            }
        }
    }

    fn role_expr(&mut self, ontology: &mut Ontology) -> Result<RoleExpr, OntologyError> {
        let (name, _line) = self.name()?;
        if name == "ObjectInverseOf" {
            self.expect(Tok::LParen)?;
            let (inner, _) = self.name()?;
            self.expect(Tok::RParen)?;
            let prop = Prop::new(local_name(&inner));
            ontology.properties.insert(prop.clone());
            Ok(RoleExpr { prop, inverse: true })
        } else {
            let prop = Prop::new(local_name(&name));
            ontology.properties.insert(prop.clone());
            Ok(RoleExpr { prop, inverse: false })
        }
    }

    // ------------------------------------------------------------------
    // Token plumbing
    // ------------------------------------------------------------------

    fn peek(&self) -> Option<&(Tok, usize)> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<(Tok, usize)> {
        let tok = self.tokens.get(self.pos).cloned();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn last_line(&self) -> usize {
        self.tokens.last().map(|(_, l)| *l).unwrap_or(1)
    }

    fn unexpected(&self, line: usize) -> OntologyError {
        let found = self
            .peek()
            .map(|(t, _)| t.describe())
            .unwrap_or_else(|| "end of input".to_string());
        OntologyError::Parse {
            line,
            message: format!("unexpected {found}"),
        }
    }

    fn expect(&mut self, expected: Tok) -> Result<(), OntologyError> {
        match self.next() {
            Some((tok, _)) if tok == expected => Ok(()),
            Some((tok, line)) => Err(OntologyError::Parse {
                line,
                message: format!("expected {}, found {}", expected.describe(), tok.describe()),
            }),
            None => Err(OntologyError::Parse {
                line: self.last_line(),
                message: format!("expected {}, found end of input", expected.describe()),
            }),
        }
    }

    fn name(&mut self) -> Result<(String, usize), OntologyError> {
        match self.next() {
            Some((Tok::Name(name), line)) => Ok((name, line)),
            Some((tok, line)) => Err(OntologyError::Parse {
                line,
                message: format!("expected a name, found {}", tok.describe()),
            }),
            None => Err(OntologyError::Parse {
                line: self.last_line(),
                message: "expected a name, found end of input".to_string(),
            }),
        }
    }

    /// `( name )`, returning the localized name.
    fn parenthesized_name(&mut self) -> Result<String, OntologyError> {
        self.expect(Tok::LParen)?;
        let (name, _) = self.name()?;
        self.expect(Tok::RParen)?;
        Ok(local_name(&name).to_string())
    }

    /// Skip a balanced `( ... )` group, e.g. a Prefix declaration.
    fn skip_balanced(&mut self) -> Result<(), OntologyError> {
        self.expect(Tok::LParen)?;
        let mut depth = 1usize;
        while depth > 0 {
            match self.next() {
                Some((Tok::LParen, _)) => depth += 1,
                Some((Tok::RParen, _)) => depth -= 1,
                Some(_) => {}
                None => {
                    return Err(OntologyError::Parse {
                        line: self.last_line(),
                        message: "unbalanced parentheses".to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
