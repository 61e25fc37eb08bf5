//! In-memory triple sets.
//!
//! [`Graph`] is the currency exchanged with the persistence and pattern
//! matching collaborators: constraints serialize their configuration into a
//! `Graph`, and the data graph is handed to constraints as a read-only `Graph`.
//! It is an ordered, de-duplicated set with linear lookups, not a store.

use crate::term::{Resource, Term};
use crate::vocabulary::rdf;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// A subject–predicate–object statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Triple {
    /// Subject resource
    pub subject: Resource,
    /// Predicate resource
    pub predicate: Resource,
    /// Object term
    pub object: Term,
}

impl Triple {
    /// Creates a new triple.
    pub fn new(subject: Resource, predicate: Resource, object: impl Into<Term>) -> Self {
        Self {
            subject,
            predicate,
            object: object.into(),
        }
    }
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.subject, self.predicate, self.object)
    }
}

/// An ordered set of triples.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Graph {
    triples: BTreeSet<Triple>,
}

impl Graph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a triple. Returns false if it was already present.
    pub fn insert(&mut self, triple: Triple) -> bool {
        self.triples.insert(triple)
    }

    /// Adds a triple built from its parts.
    pub fn add(
        &mut self,
        subject: &Resource,
        predicate: &str,
        object: impl Into<Term>,
    ) -> bool {
        self.insert(Triple::new(
            subject.clone(),
            Resource::new(predicate),
            object,
        ))
    }

    /// Moves every triple of `other` into this graph.
    pub fn merge(&mut self, other: Graph) {
        self.triples.extend(other.triples);
    }

    /// Returns true if the graph contains the triple.
    pub fn contains(&self, triple: &Triple) -> bool {
        self.triples.contains(triple)
    }

    /// Number of triples.
    pub fn len(&self) -> usize {
        self.triples.len()
    }

    /// Returns true if the graph has no triples.
    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    /// Iterates over all triples in order.
    pub fn iter(&self) -> impl Iterator<Item = &Triple> {
        self.triples.iter()
    }

    /// Iterates over the triples whose subject is `subject`.
    ///
    /// The returned iterator borrows only the graph.
    pub fn triples_with_subject<'a>(
        &'a self,
        subject: &Resource,
    ) -> impl Iterator<Item = &'a Triple> + use<'a> {
        let subject = subject.clone();
        self.triples.iter().filter(move |t| t.subject == subject)
    }

    /// Iterates over the objects of `(subject, predicate, ?)`.
    pub fn objects<'a>(
        &'a self,
        subject: &Resource,
        predicate: &str,
    ) -> impl Iterator<Item = &'a Term> + use<'a> {
        let predicate = predicate.to_owned();
        self.triples_with_subject(subject)
            .filter(move |t| t.predicate.iri() == predicate)
            .map(|t| &t.object)
    }

    /// Iterates over the subjects of `(?, predicate, object)`.
    pub fn subjects<'a>(
        &'a self,
        predicate: &str,
        object: &Term,
    ) -> impl Iterator<Item = &'a Resource> + use<'a> {
        let predicate = predicate.to_owned();
        let object = object.clone();
        self.triples
            .iter()
            .filter(move |t| t.predicate.iri() == predicate && t.object == object)
            .map(|t| &t.subject)
    }

    /// Returns the first object of `(subject, predicate, ?)`.
    pub fn object(&self, subject: &Resource, predicate: &str) -> Option<&Term> {
        self.objects(subject, predicate).next()
    }

    /// Writes `items` as an RDF collection and links it from `subject`.
    ///
    /// Collection nodes are blank resources derived from `anchor`, so writing
    /// the same list for the same anchor always produces the same triples.
    /// An empty list is linked to `rdf:nil`.
    pub fn add_list(
        &mut self,
        subject: &Resource,
        predicate: &str,
        anchor: &Resource,
        items: impl IntoIterator<Item = Term>,
    ) {
        let head = self.write_list(anchor, items);
        self.add(subject, predicate, head);
    }

    /// Writes `items` as an RDF collection and returns its head node.
    pub fn write_list(
        &mut self,
        anchor: &Resource,
        items: impl IntoIterator<Item = Term>,
    ) -> Resource {
        let items: Vec<Term> = items.into_iter().collect();
        let nodes: Vec<Resource> = (0..items.len())
            .map(|i| anchor.derive_blank(&format!("l{i}")))
            .collect();

        for (i, item) in items.into_iter().enumerate() {
            let rest = nodes
                .get(i + 1)
                .cloned()
                .unwrap_or_else(|| Resource::new(rdf::NIL));
            self.add(&nodes[i], rdf::FIRST, item);
            self.add(&nodes[i], rdf::REST, rest);
        }

        nodes
            .into_iter()
            .next()
            .unwrap_or_else(|| Resource::new(rdf::NIL))
    }
}

impl FromIterator<Triple> for Graph {
    fn from_iter<I: IntoIterator<Item = Triple>>(iter: I) -> Self {
        Self {
            triples: iter.into_iter().collect(),
        }
    }
}

impl Extend<Triple> for Graph {
    fn extend<I: IntoIterator<Item = Triple>>(&mut self, iter: I) {
        self.triples.extend(iter);
    }
}

impl IntoIterator for Graph {
    type Item = Triple;
    type IntoIter = std::collections::btree_set::IntoIter<Triple>;

    fn into_iter(self) -> Self::IntoIter {
        self.triples.into_iter()
    }
}

impl<'a> IntoIterator for &'a Graph {
    type Item = &'a Triple;
    type IntoIter = std::collections::btree_set::Iter<'a, Triple>;

    fn into_iter(self) -> Self::IntoIter {
        self.triples.iter()
    }
}
