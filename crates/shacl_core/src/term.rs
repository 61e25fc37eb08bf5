//! RDF term model.
//!
//! A [`Term`] is either a [`Resource`] (an IRI, possibly a blank node) or a
//! [`Literal`] (a lexical value with an optional datatype or language tag).
//! Terms are produced by the graph layer and handed to constraints by
//! reference; nothing in this module mutates a term after construction.

use crate::vocabulary::{rdf, xsd};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt::{self, Write};
use std::hash::{Hash, Hasher};
use uuid::Uuid;

/// Prefix carried by the identifier of every blank resource.
pub const BLANK_PREFIX: &str = "bnode:";

/// A resource identified by an IRI, or an anonymous blank node.
///
/// Blank resources keep their generated label behind the `bnode:` prefix, so
/// the string form of a blank resource is never a dereferenceable IRI.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Resource {
    iri: String,
    is_blank: bool,
}

impl Resource {
    /// Creates a named resource from an IRI.
    pub fn new(iri: impl Into<String>) -> Self {
        Self {
            iri: iri.into(),
            is_blank: false,
        }
    }

    /// Creates a blank resource with the given label.
    ///
    /// The `bnode:` prefix is added when the label does not already carry it.
    pub fn blank(label: impl Into<String>) -> Self {
        let label = label.into();
        let iri = if label.starts_with(BLANK_PREFIX) {
            label
        } else {
            format!("{BLANK_PREFIX}{label}")
        };
        Self {
            iri,
            is_blank: true,
        }
    }

    /// Creates a blank resource with a random, collision-resistant label.
    pub fn fresh_blank() -> Self {
        Self::blank(Uuid::new_v4().simple().to_string())
    }

    /// Returns the identifier of this resource.
    pub fn iri(&self) -> &str {
        &self.iri
    }

    /// Returns true if this resource is a blank node.
    pub fn is_blank(&self) -> bool {
        self.is_blank
    }

    /// Returns the label of a blank resource, or the full IRI of a named one.
    pub fn label(&self) -> &str {
        self.iri.strip_prefix(BLANK_PREFIX).unwrap_or(&self.iri)
    }

    /// Derives a blank resource whose label is built from this resource and a
    /// suffix. Deriving twice with the same suffix yields the same resource.
    ///
    /// Every byte of the identifier outside `[A-Za-z0-9]` is escaped as `_XX`,
    /// so distinct resources never derive the same label.
    pub fn derive_blank(&self, suffix: &str) -> Resource {
        let mut label = String::with_capacity(self.iri.len() + suffix.len() + 1);
        for byte in self.iri.bytes() {
            if byte.is_ascii_alphanumeric() {
                label.push(char::from(byte));
            } else {
                let _ = write!(label, "_{byte:02X}");
            }
        }
        label.push('-');
        label.push_str(suffix);
        Resource::blank(label)
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.iri)
    }
}

impl From<&str> for Resource {
    fn from(iri: &str) -> Self {
        Resource::new(iri)
    }
}

/// A literal value.
///
/// The lexical value is what string-based constraints (length, pattern) look
/// at; the datatype and language only matter to datatype, language and
/// ordering constraints.
///
/// Equality, hashing and ordering go through the effective datatype, so a
/// plain literal and the `xsd:string` literal with the same value are the
/// same term.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Literal {
    value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    datatype: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    language: Option<String>,
}

impl Literal {
    /// Creates a plain literal with neither datatype nor language.
    pub fn plain(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            datatype: None,
            language: None,
        }
    }

    /// Creates a literal typed with the given datatype IRI.
    pub fn typed(value: impl Into<String>, datatype: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            datatype: Some(datatype.into()),
            language: None,
        }
    }

    /// Creates a language-tagged literal.
    pub fn lang(value: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            datatype: None,
            language: Some(language.into()),
        }
    }

    /// Creates an `xsd:string` literal.
    pub fn string(value: impl Into<String>) -> Self {
        Self::typed(value, xsd::STRING)
    }

    /// Creates an `xsd:integer` literal.
    pub fn integer(value: i64) -> Self {
        Self::typed(value.to_string(), xsd::INTEGER)
    }

    /// Creates an `xsd:boolean` literal.
    pub fn boolean(value: bool) -> Self {
        Self::typed(value.to_string(), xsd::BOOLEAN)
    }

    /// Returns the lexical value.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Returns the explicit datatype IRI, if any.
    pub fn datatype(&self) -> Option<&str> {
        self.datatype.as_deref()
    }

    /// Returns the language tag, if any.
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    /// Returns the datatype this literal has under RDF 1.1 rules:
    /// `rdf:langString` when tagged, `xsd:string` when untyped.
    pub fn effective_datatype(&self) -> &str {
        match (&self.datatype, &self.language) {
            (_, Some(_)) => rdf::LANG_STRING,
            (Some(datatype), None) => datatype,
            (None, None) => xsd::STRING,
        }
    }

    fn identity(&self) -> (&str, &str, Option<&str>) {
        (&self.value, self.effective_datatype(), self.language.as_deref())
    }
}

impl PartialEq for Literal {
    fn eq(&self, other: &Self) -> bool {
        self.identity() == other.identity()
    }
}

impl Eq for Literal {}

impl Hash for Literal {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity().hash(state);
    }
}

impl PartialOrd for Literal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Literal {
    fn cmp(&self, other: &Self) -> Ordering {
        self.identity().cmp(&other.identity())
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.datatype, &self.language) {
            (_, Some(language)) => write!(f, "{}@{}", self.value, language),
            (Some(datatype), None) => write!(f, "{}^^{}", self.value, datatype),
            (None, None) => f.write_str(&self.value),
        }
    }
}

/// An RDF term: the closed set of node kinds a constraint can be asked about.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Term {
    /// Named or blank resource
    Resource(Resource),
    /// Literal value
    Literal(Literal),
}

impl Term {
    /// Returns the resource if this term is one.
    pub fn as_resource(&self) -> Option<&Resource> {
        match self {
            Term::Resource(resource) => Some(resource),
            Term::Literal(_) => None,
        }
    }

    /// Returns the literal if this term is one.
    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Term::Literal(literal) => Some(literal),
            Term::Resource(_) => None,
        }
    }

    /// Returns true if this term is a blank resource.
    pub fn is_blank(&self) -> bool {
        matches!(self, Term::Resource(resource) if resource.is_blank())
    }

    /// Returns true if this term is a literal.
    pub fn is_literal(&self) -> bool {
        matches!(self, Term::Literal(_))
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Resource(resource) => resource.fmt(f),
            Term::Literal(literal) => literal.fmt(f),
        }
    }
}

impl From<Resource> for Term {
    fn from(resource: Resource) -> Self {
        Term::Resource(resource)
    }
}

impl From<Literal> for Term {
    fn from(literal: Literal) -> Self {
        Term::Literal(literal)
    }
}
