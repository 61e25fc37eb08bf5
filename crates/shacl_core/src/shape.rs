//! Shape model.
//!
//! A [`Shape`] bundles the context every validation result inherits
//! (identity, severity, messages, property path) with the constraints that
//! produce those results. Shapes reference other shapes (property shapes,
//! logical operands) by identity; [`ShapesGraph`] resolves those references.

use crate::constraint::Constraint;
use crate::graph::Graph;
use crate::term::{Literal, Resource, Term};
use crate::vocabulary::{rdf, shacl};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

/// Significance attached to every result a shape produces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    /// Constraint violation
    #[default]
    Violation,
    /// Non-critical constraint violation
    Warning,
    /// Informative message
    Info,
}

impl Severity {
    /// Returns the SHACL IRI for this severity.
    pub fn iri(&self) -> &'static str {
        match self {
            Severity::Violation => shacl::VIOLATION,
            Severity::Warning => shacl::WARNING,
            Severity::Info => shacl::INFO,
        }
    }

    /// Parses a severity from its SHACL IRI.
    pub fn from_iri(iri: &str) -> Option<Self> {
        match iri {
            shacl::VIOLATION => Some(Severity::Violation),
            shacl::WARNING => Some(Severity::Warning),
            shacl::INFO => Some(Severity::Info),
            _ => None,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Severity::Violation => "Violation",
            Severity::Warning => "Warning",
            Severity::Info => "Info",
        };
        f.write_str(name)
    }
}

/// A SHACL property path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PropertyPath {
    /// A single predicate
    Predicate(Resource),
    /// `sh:inversePath`
    Inverse(Box<PropertyPath>),
    /// RDF list of paths followed one after the other
    Sequence(Vec<PropertyPath>),
    /// `sh:alternativePath`
    Alternative(Vec<PropertyPath>),
    /// `sh:zeroOrMorePath`
    ZeroOrMore(Box<PropertyPath>),
    /// `sh:oneOrMorePath`
    OneOrMore(Box<PropertyPath>),
    /// `sh:zeroOrOnePath`
    ZeroOrOne(Box<PropertyPath>),
}

/// Insertion-ordered set of terms.
#[derive(Default)]
struct NodeSet {
    order: Vec<Term>,
    seen: HashSet<Term>,
}

impl NodeSet {
    fn push(&mut self, term: Term) -> bool {
        if self.seen.insert(term.clone()) {
            self.order.push(term);
            true
        } else {
            false
        }
    }

    fn into_vec(self) -> Vec<Term> {
        self.order
    }
}

impl PropertyPath {
    /// Creates a predicate path.
    pub fn predicate(iri: impl Into<String>) -> Self {
        PropertyPath::Predicate(Resource::new(iri))
    }

    /// Creates an inverse path.
    pub fn inverse(path: PropertyPath) -> Self {
        PropertyPath::Inverse(Box::new(path))
    }

    /// Returns the predicate if this is a simple predicate path.
    pub fn as_predicate(&self) -> Option<&Resource> {
        match self {
            PropertyPath::Predicate(predicate) => Some(predicate),
            _ => None,
        }
    }

    /// Returns the value nodes reached from `focus` in `graph`, without
    /// duplicates, in the order they were first reached.
    pub fn evaluate(&self, graph: &Graph, focus: &Term) -> Vec<Term> {
        self.step(graph, std::slice::from_ref(focus), false)
    }

    fn step(&self, graph: &Graph, nodes: &[Term], inverse: bool) -> Vec<Term> {
        match self {
            PropertyPath::Predicate(predicate) => {
                let mut out = NodeSet::default();
                for node in nodes {
                    if inverse {
                        for subject in graph.subjects(predicate.iri(), node) {
                            out.push(Term::Resource(subject.clone()));
                        }
                    } else if let Term::Resource(subject) = node {
                        for object in graph.objects(subject, predicate.iri()) {
                            out.push(object.clone());
                        }
                    }
                }
                out.into_vec()
            }
            PropertyPath::Inverse(inner) => inner.step(graph, nodes, !inverse),
            PropertyPath::Sequence(steps) => {
                let mut current = nodes.to_vec();
                if inverse {
                    for path in steps.iter().rev() {
                        current = path.step(graph, &current, inverse);
                    }
                } else {
                    for path in steps {
                        current = path.step(graph, &current, inverse);
                    }
                }
                current
            }
            PropertyPath::Alternative(alternatives) => {
                let mut out = NodeSet::default();
                for path in alternatives {
                    for node in path.step(graph, nodes, inverse) {
                        out.push(node);
                    }
                }
                out.into_vec()
            }
            PropertyPath::ZeroOrMore(inner) => closure(inner, graph, nodes, inverse, true),
            PropertyPath::OneOrMore(inner) => closure(inner, graph, nodes, inverse, false),
            PropertyPath::ZeroOrOne(inner) => {
                let mut out = NodeSet::default();
                for node in nodes.iter().cloned().chain(inner.step(graph, nodes, inverse)) {
                    out.push(node);
                }
                out.into_vec()
            }
        }
    }

    /// Writes this path into `graph` and returns the term that stands for it.
    ///
    /// Predicate paths are their own IRI; every other form becomes a blank
    /// node derived from `anchor`.
    pub fn write(&self, graph: &mut Graph, anchor: &Resource) -> Term {
        self.write_node(graph, anchor, "path")
    }

    fn write_node(&self, graph: &mut Graph, anchor: &Resource, key: &str) -> Term {
        match self {
            PropertyPath::Predicate(predicate) => Term::Resource(predicate.clone()),
            PropertyPath::Inverse(inner) => {
                wrap(graph, anchor, key, shacl::INVERSE_PATH, inner)
            }
            PropertyPath::ZeroOrMore(inner) => {
                wrap(graph, anchor, key, shacl::ZERO_OR_MORE_PATH, inner)
            }
            PropertyPath::OneOrMore(inner) => {
                wrap(graph, anchor, key, shacl::ONE_OR_MORE_PATH, inner)
            }
            PropertyPath::ZeroOrOne(inner) => {
                wrap(graph, anchor, key, shacl::ZERO_OR_ONE_PATH, inner)
            }
            PropertyPath::Sequence(steps) => {
                let items: Vec<Term> = steps
                    .iter()
                    .enumerate()
                    .map(|(i, path)| path.write_node(graph, anchor, &format!("{key}s{i}")))
                    .collect();
                Term::Resource(graph.write_list(&anchor.derive_blank(key), items))
            }
            PropertyPath::Alternative(alternatives) => {
                let items: Vec<Term> = alternatives
                    .iter()
                    .enumerate()
                    .map(|(i, path)| path.write_node(graph, anchor, &format!("{key}a{i}")))
                    .collect();
                let node = anchor.derive_blank(key);
                let list_anchor = anchor.derive_blank(&format!("{key}alt"));
                graph.add_list(&node, shacl::ALTERNATIVE_PATH, &list_anchor, items);
                Term::Resource(node)
            }
        }
    }
}

fn closure(
    inner: &PropertyPath,
    graph: &Graph,
    nodes: &[Term],
    inverse: bool,
    include_start: bool,
) -> Vec<Term> {
    let mut reached = NodeSet::default();
    if include_start {
        for node in nodes {
            reached.push(node.clone());
        }
    }

    let mut frontier = inner.step(graph, nodes, inverse);
    while !frontier.is_empty() {
        let fresh: Vec<Term> = frontier
            .into_iter()
            .filter(|node| reached.push(node.clone()))
            .collect();
        frontier = if fresh.is_empty() {
            Vec::new()
        } else {
            inner.step(graph, &fresh, inverse)
        };
    }

    reached.into_vec()
}

fn wrap(
    graph: &mut Graph,
    anchor: &Resource,
    key: &str,
    predicate: &str,
    inner: &PropertyPath,
) -> Term {
    let node = anchor.derive_blank(key);
    let object = inner.write_node(graph, anchor, &format!("{key}i"));
    graph.add(&node, predicate, object);
    Term::Resource(node)
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn join(f: &mut fmt::Formatter<'_>, paths: &[PropertyPath], sep: &str) -> fmt::Result {
            f.write_str("(")?;
            for (i, path) in paths.iter().enumerate() {
                if i > 0 {
                    f.write_str(sep)?;
                }
                write!(f, "{path}")?;
            }
            f.write_str(")")
        }

        match self {
            PropertyPath::Predicate(predicate) => write!(f, "<{}>", predicate.iri()),
            PropertyPath::Inverse(inner) => write!(f, "^{inner}"),
            PropertyPath::Sequence(steps) => join(f, steps, "/"),
            PropertyPath::Alternative(alternatives) => join(f, alternatives, "|"),
            PropertyPath::ZeroOrMore(inner) => write!(f, "{inner}*"),
            PropertyPath::OneOrMore(inner) => write!(f, "{inner}+"),
            PropertyPath::ZeroOrOne(inner) => write!(f, "{inner}?"),
        }
    }
}

/// Whether a shape validates its focus node directly or the values reached
/// through a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShapeKind {
    /// Node shape: the focus node is the only value node
    Node,
    /// Property shape: value nodes are reached through the path
    Property(PropertyPath),
}

/// A bundle of constraints plus the context attached to their results.
#[derive(Debug, Clone)]
pub struct Shape {
    id: Resource,
    kind: ShapeKind,
    severity: Severity,
    messages: Vec<Literal>,
    deactivated: bool,
    constraints: Vec<Arc<dyn Constraint>>,
    properties: Vec<Resource>,
}

impl Shape {
    /// Starts building a node shape.
    pub fn node(id: Resource) -> ShapeBuilder {
        ShapeBuilder::new(id, ShapeKind::Node)
    }

    /// Starts building a property shape.
    pub fn property(id: Resource, path: PropertyPath) -> ShapeBuilder {
        ShapeBuilder::new(id, ShapeKind::Property(path))
    }

    /// Shape identity.
    pub fn id(&self) -> &Resource {
        &self.id
    }

    /// Node or property shape.
    pub fn kind(&self) -> &ShapeKind {
        &self.kind
    }

    /// Property path, present only for property shapes.
    pub fn path(&self) -> Option<&PropertyPath> {
        match &self.kind {
            ShapeKind::Node => None,
            ShapeKind::Property(path) => Some(path),
        }
    }

    /// Returns true for property shapes.
    pub fn is_property_shape(&self) -> bool {
        matches!(self.kind, ShapeKind::Property(_))
    }

    /// Severity attached to results.
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Messages attached to results.
    pub fn messages(&self) -> &[Literal] {
        &self.messages
    }

    /// Returns true if the shape is switched off.
    pub fn is_deactivated(&self) -> bool {
        self.deactivated
    }

    /// Constraints in evaluation order.
    pub fn constraints(&self) -> &[Arc<dyn Constraint>] {
        &self.constraints
    }

    /// Identities of the property shapes linked with `sh:property`.
    pub fn properties(&self) -> &[Resource] {
        &self.properties
    }

    /// Serializes the shape and all of its constraints.
    pub fn to_graph(&self) -> Graph {
        let mut graph = Graph::new();
        let shape_type = match &self.kind {
            ShapeKind::Node => shacl::NODE_SHAPE,
            ShapeKind::Property(_) => shacl::PROPERTY_SHAPE,
        };
        graph.add(&self.id, rdf::TYPE, Resource::new(shape_type));

        if let ShapeKind::Property(path) = &self.kind {
            let path_term = path.write(&mut graph, &self.id);
            graph.add(&self.id, shacl::PATH, path_term);
        }

        graph.add(&self.id, shacl::SEVERITY, Resource::new(self.severity.iri()));

        for message in &self.messages {
            graph.add(&self.id, shacl::MESSAGE, message.clone());
        }

        if self.deactivated {
            graph.add(&self.id, shacl::DEACTIVATED, Literal::boolean(true));
        }

        for property in &self.properties {
            graph.add(&self.id, shacl::PROPERTY, property.clone());
        }

        for constraint in &self.constraints {
            graph.merge(constraint.to_graph(Some(self)));
        }

        graph
    }
}

/// Builder for creating a [`Shape`].
///
/// # Example
///
/// ```rust
/// use shacl_core::{PropertyPath, Resource, Severity, Shape};
///
/// let shape = Shape::property(
///     Resource::new("http://example.org/NameShape"),
///     PropertyPath::predicate("http://example.org/name"),
/// )
/// .severity(Severity::Warning)
/// .message("Name is too long")
/// .build();
///
/// assert!(shape.is_property_shape());
/// ```
#[derive(Debug)]
pub struct ShapeBuilder {
    id: Resource,
    kind: ShapeKind,
    severity: Severity,
    messages: Vec<Literal>,
    deactivated: bool,
    constraints: Vec<Arc<dyn Constraint>>,
    properties: Vec<Resource>,
}

impl ShapeBuilder {
    fn new(id: Resource, kind: ShapeKind) -> Self {
        Self {
            id,
            kind,
            severity: Severity::default(),
            messages: Vec::new(),
            deactivated: false,
            constraints: Vec::new(),
            properties: Vec::new(),
        }
    }

    /// Sets the severity.
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Adds a plain message.
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.messages.push(Literal::plain(message));
        self
    }

    /// Adds a message literal, e.g. a language-tagged one.
    pub fn message_literal(mut self, message: Literal) -> Self {
        self.messages.push(message);
        self
    }

    /// Marks the shape as deactivated.
    pub fn deactivated(mut self, deactivated: bool) -> Self {
        self.deactivated = deactivated;
        self
    }

    /// Adds a constraint.
    pub fn constraint(mut self, constraint: impl Constraint + 'static) -> Self {
        self.constraints.push(Arc::new(constraint));
        self
    }

    /// Adds an already shared constraint.
    pub fn shared_constraint(mut self, constraint: Arc<dyn Constraint>) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// Links a property shape by identity.
    pub fn property(mut self, property_shape: Resource) -> Self {
        self.properties.push(property_shape);
        self
    }

    /// Builds the shape.
    pub fn build(self) -> Shape {
        Shape {
            id: self.id,
            kind: self.kind,
            severity: self.severity,
            messages: self.messages,
            deactivated: self.deactivated,
            constraints: self.constraints,
            properties: self.properties,
        }
    }
}

/// The set of shapes a validation run can refer to, keyed by identity.
#[derive(Debug, Clone, Default)]
pub struct ShapesGraph {
    shapes: Vec<Shape>,
    index: HashMap<Resource, usize>,
}

impl ShapesGraph {
    /// Creates an empty shapes graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a shape, replacing any shape with the same identity.
    pub fn insert(&mut self, shape: Shape) {
        match self.index.get(shape.id()) {
            Some(&position) => self.shapes[position] = shape,
            None => {
                self.index.insert(shape.id().clone(), self.shapes.len());
                self.shapes.push(shape);
            }
        }
    }

    /// Adds a shape and returns the graph, for chaining.
    pub fn with_shape(mut self, shape: Shape) -> Self {
        self.insert(shape);
        self
    }

    /// Looks a shape up by identity.
    pub fn get(&self, id: &Resource) -> Option<&Shape> {
        self.index.get(id).map(|&position| &self.shapes[position])
    }

    /// Iterates over shapes in insertion order.
    pub fn shapes(&self) -> impl Iterator<Item = &Shape> {
        self.shapes.iter()
    }

    /// Number of shapes.
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Returns true if there are no shapes.
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Serializes every shape.
    pub fn to_graph(&self) -> Graph {
        let mut graph = Graph::new();
        for shape in &self.shapes {
            graph.merge(shape.to_graph());
        }
        graph
    }
}

impl FromIterator<Shape> for ShapesGraph {
    fn from_iter<I: IntoIterator<Item = Shape>>(iter: I) -> Self {
        let mut graph = ShapesGraph::new();
        for shape in iter {
            graph.insert(shape);
        }
        graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ex(local: &str) -> Resource {
        Resource::new(format!("http://example.org/{local}"))
    }

    fn family() -> Graph {
        let mut graph = Graph::new();
        graph.add(&ex("alice"), "http://example.org/parent", ex("bob"));
        graph.add(&ex("bob"), "http://example.org/parent", ex("carol"));
        graph.add(&ex("alice"), "http://example.org/name", Literal::plain("Alice"));
        graph.add(&ex("bob"), "http://example.org/name", Literal::plain("Bob"));
        graph
    }

    #[test]
    fn test_predicate_path() {
        let path = PropertyPath::predicate("http://example.org/parent");
        let values = path.evaluate(&family(), &ex("alice").into());
        assert_eq!(values, vec![Term::from(ex("bob"))]);
    }

    #[test]
    fn test_predicate_path_on_literal_focus() {
        let path = PropertyPath::predicate("http://example.org/parent");
        let values = path.evaluate(&family(), &Literal::plain("x").into());
        assert!(values.is_empty());
    }

    #[test]
    fn test_inverse_path() {
        let path = PropertyPath::inverse(PropertyPath::predicate("http://example.org/parent"));
        let values = path.evaluate(&family(), &ex("carol").into());
        assert_eq!(values, vec![Term::from(ex("bob"))]);
    }

    #[test]
    fn test_sequence_path() {
        let path = PropertyPath::Sequence(vec![
            PropertyPath::predicate("http://example.org/parent"),
            PropertyPath::predicate("http://example.org/name"),
        ]);
        let values = path.evaluate(&family(), &ex("alice").into());
        assert_eq!(values, vec![Term::from(Literal::plain("Bob"))]);
    }

    #[test]
    fn test_inverse_sequence_path() {
        let path = PropertyPath::inverse(PropertyPath::Sequence(vec![
            PropertyPath::predicate("http://example.org/parent"),
            PropertyPath::predicate("http://example.org/parent"),
        ]));
        let values = path.evaluate(&family(), &ex("carol").into());
        assert_eq!(values, vec![Term::from(ex("alice"))]);
    }

    #[test]
    fn test_transitive_paths() {
        let parent = PropertyPath::predicate("http://example.org/parent");

        let one_or_more = PropertyPath::OneOrMore(Box::new(parent.clone()));
        let values = one_or_more.evaluate(&family(), &ex("alice").into());
        assert_eq!(values, vec![Term::from(ex("bob")), Term::from(ex("carol"))]);

        let zero_or_more = PropertyPath::ZeroOrMore(Box::new(parent.clone()));
        let values = zero_or_more.evaluate(&family(), &ex("alice").into());
        assert_eq!(values.len(), 3);
        assert_eq!(values[0], Term::from(ex("alice")));

        let zero_or_one = PropertyPath::ZeroOrOne(Box::new(parent));
        let values = zero_or_one.evaluate(&family(), &ex("alice").into());
        assert_eq!(values, vec![Term::from(ex("alice")), Term::from(ex("bob"))]);
    }

    #[test]
    fn test_alternative_path_deduplicates() {
        let path = PropertyPath::Alternative(vec![
            PropertyPath::predicate("http://example.org/parent"),
            PropertyPath::predicate("http://example.org/parent"),
        ]);
        let values = path.evaluate(&family(), &ex("alice").into());
        assert_eq!(values, vec![Term::from(ex("bob"))]);
    }

    #[test]
    fn test_path_display() {
        let path = PropertyPath::Sequence(vec![
            PropertyPath::inverse(PropertyPath::predicate("http://example.org/p")),
            PropertyPath::ZeroOrMore(Box::new(PropertyPath::predicate("http://example.org/q"))),
        ]);
        assert_eq!(
            path.to_string(),
            "(^<http://example.org/p>/<http://example.org/q>*)"
        );
    }

    #[test]
    fn test_inverse_path_serialization() {
        let anchor = ex("S");
        let path = PropertyPath::inverse(PropertyPath::predicate("http://example.org/p"));
        let mut graph = Graph::new();
        let term = path.write(&mut graph, &anchor);

        let node = term.as_resource().unwrap();
        assert!(node.is_blank());
        assert_eq!(
            graph.object(node, shacl::INVERSE_PATH),
            Some(&Term::from(ex("p")))
        );
    }

    #[test]
    fn test_severity_iri_round_trip() {
        for severity in [Severity::Violation, Severity::Warning, Severity::Info] {
            assert_eq!(Severity::from_iri(severity.iri()), Some(severity));
        }
        assert_eq!(Severity::from_iri("http://example.org/Fatal"), None);
    }

    #[test]
    fn test_shape_to_graph() {
        let shape = Shape::property(ex("NameShape"), PropertyPath::predicate("http://example.org/name"))
            .severity(Severity::Warning)
            .message("bad name")
            .deactivated(true)
            .build();

        let graph = shape.to_graph();
        let id = shape.id();
        assert_eq!(
            graph.object(id, rdf::TYPE),
            Some(&Term::from(Resource::new(shacl::PROPERTY_SHAPE)))
        );
        assert_eq!(graph.object(id, shacl::PATH), Some(&Term::from(ex("name"))));
        assert_eq!(
            graph.object(id, shacl::SEVERITY),
            Some(&Term::from(Resource::new(shacl::WARNING)))
        );
        assert_eq!(
            graph.object(id, shacl::MESSAGE),
            Some(&Term::from(Literal::plain("bad name")))
        );
        assert_eq!(
            graph.object(id, shacl::DEACTIVATED),
            Some(&Term::from(Literal::boolean(true)))
        );
        assert_eq!(graph.len(), 5);
    }

    #[test]
    fn test_similar_shape_ids_keep_separate_path_nodes() {
        let inverse = |p: &str| PropertyPath::inverse(PropertyPath::predicate(p));
        let slash = Shape::property(Resource::new("http://a/b"), inverse("http://example.org/p"))
            .build();
        let underscore = Shape::property(Resource::new("http://a_b"), inverse("http://example.org/q"))
            .build();
        let shapes = ShapesGraph::new().with_shape(slash.clone()).with_shape(underscore.clone());

        let graph = shapes.to_graph();
        let first = graph.object(slash.id(), shacl::PATH).unwrap().as_resource().unwrap();
        let second = graph.object(underscore.id(), shacl::PATH).unwrap().as_resource().unwrap();
        assert_ne!(first, second);
        assert_eq!(graph.objects(first, shacl::INVERSE_PATH).count(), 1);
        assert_eq!(graph.object(second, shacl::INVERSE_PATH), Some(&Term::from(ex("q"))));
    }

    #[test]
    fn test_shapes_graph_replaces_same_id() {
        let mut shapes = ShapesGraph::new();
        shapes.insert(Shape::node(ex("S")).build());
        shapes.insert(Shape::node(ex("S")).severity(Severity::Info).build());
        shapes.insert(Shape::node(ex("T")).build());

        assert_eq!(shapes.len(), 2);
        assert_eq!(shapes.get(&ex("S")).unwrap().severity(), Severity::Info);
        assert!(shapes.get(&ex("U")).is_none());
    }
}
