//! Value type constraints: `sh:class`, `sh:datatype` and `sh:nodeKind`.

use super::with_id;
use crate::compare::is_valid_lexical;
use shacl_core::vocabulary::{rdf, rdfs, shacl};
use shacl_core::{
    ConfigurationError, Constraint, ConstraintComponent, EvaluationContext, Graph, Resource, Shape,
    Term, ValidationReport,
};
use std::collections::{HashSet, VecDeque};
use std::fmt;

/// Returns true if `node` has `rdf:type` `class` or a transitive subclass of it.
fn is_instance_of(data: &Graph, node: &Resource, class: &Resource) -> bool {
    let mut visited: HashSet<&Resource> = HashSet::new();
    let mut queue: VecDeque<&Resource> = data
        .objects(node, rdf::TYPE)
        .filter_map(Term::as_resource)
        .collect();

    while let Some(current) = queue.pop_front() {
        if current == class {
            return true;
        }
        if !visited.insert(current) {
            continue;
        }
        queue.extend(
            data.objects(current, rdfs::SUB_CLASS_OF)
                .filter_map(Term::as_resource),
        );
    }

    false
}

/// `sh:class`: every value node is an instance of the class.
///
/// Instances are found through `rdf:type` and `rdfs:subClassOf*` in the data
/// graph. Literals never conform.
#[derive(Debug, Clone)]
pub struct ClassConstraint {
    id: Resource,
    class: Resource,
}

impl ClassConstraint {
    /// Creates the constraint.
    pub fn new(class: Resource) -> Self {
        Self {
            id: Resource::fresh_blank(),
            class,
        }
    }

    /// Expected class.
    pub fn class(&self) -> &Resource {
        &self.class
    }
}

with_id!(ClassConstraint);

impl Constraint for ClassConstraint {
    fn id(&self) -> &Resource {
        &self.id
    }

    fn component(&self) -> ConstraintComponent {
        ConstraintComponent::Class
    }

    fn evaluate(
        &self,
        ctx: &EvaluationContext<'_>,
        shape: &Shape,
        focus_node: &Term,
        value_node: &Term,
        _all_value_nodes: &[Term],
    ) -> ValidationReport {
        let mut report = ctx.report();
        let conforms = match value_node {
            Term::Resource(resource) => is_instance_of(ctx.data_graph(), resource, &self.class),
            Term::Literal(_) => false,
        };
        if !conforms {
            report.add_result(ctx.result(shape, self.component(), focus_node, value_node));
        }
        report
    }

    fn to_graph(&self, shape: Option<&Shape>) -> Graph {
        let mut graph = Graph::new();
        if let Some(shape) = shape {
            graph.add(shape.id(), shacl::CLASS, self.class.clone());
        }
        graph
    }
}

/// `sh:datatype`: every value node is a well-formed literal of the datatype.
#[derive(Debug, Clone)]
pub struct DatatypeConstraint {
    id: Resource,
    datatype: Resource,
}

impl DatatypeConstraint {
    /// Creates the constraint.
    pub fn new(datatype: impl Into<String>) -> Self {
        Self {
            id: Resource::fresh_blank(),
            datatype: Resource::new(datatype),
        }
    }

    /// Expected datatype.
    pub fn datatype(&self) -> &Resource {
        &self.datatype
    }
}

with_id!(DatatypeConstraint);

impl Constraint for DatatypeConstraint {
    fn id(&self) -> &Resource {
        &self.id
    }

    fn component(&self) -> ConstraintComponent {
        ConstraintComponent::Datatype
    }

    fn evaluate(
        &self,
        ctx: &EvaluationContext<'_>,
        shape: &Shape,
        focus_node: &Term,
        value_node: &Term,
        _all_value_nodes: &[Term],
    ) -> ValidationReport {
        let mut report = ctx.report();
        let expected = self.datatype.iri();
        let conforms = match value_node {
            Term::Literal(literal) => {
                literal.effective_datatype() == expected
                    && is_valid_lexical(expected, literal.value())
            }
            Term::Resource(_) => false,
        };
        if !conforms {
            report.add_result(ctx.result(shape, self.component(), focus_node, value_node));
        }
        report
    }

    fn to_graph(&self, shape: Option<&Shape>) -> Graph {
        let mut graph = Graph::new();
        if let Some(shape) = shape {
            graph.add(shape.id(), shacl::DATATYPE, self.datatype.clone());
        }
        graph
    }
}

/// Node kinds accepted by `sh:nodeKind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// `sh:BlankNode`
    BlankNode,
    /// `sh:IRI`
    Iri,
    /// `sh:Literal`
    Literal,
    /// `sh:BlankNodeOrIRI`
    BlankNodeOrIri,
    /// `sh:BlankNodeOrLiteral`
    BlankNodeOrLiteral,
    /// `sh:IRIOrLiteral`
    IriOrLiteral,
}

impl NodeKind {
    /// SHACL IRI of this node kind.
    pub fn iri(&self) -> &'static str {
        match self {
            NodeKind::BlankNode => shacl::BLANK_NODE,
            NodeKind::Iri => shacl::IRI,
            NodeKind::Literal => shacl::LITERAL,
            NodeKind::BlankNodeOrIri => shacl::BLANK_NODE_OR_IRI,
            NodeKind::BlankNodeOrLiteral => shacl::BLANK_NODE_OR_LITERAL,
            NodeKind::IriOrLiteral => shacl::IRI_OR_LITERAL,
        }
    }

    /// Parses a node kind from its SHACL IRI.
    pub fn from_iri(iri: &str) -> Result<Self, ConfigurationError> {
        match iri {
            shacl::BLANK_NODE => Ok(NodeKind::BlankNode),
            shacl::IRI => Ok(NodeKind::Iri),
            shacl::LITERAL => Ok(NodeKind::Literal),
            shacl::BLANK_NODE_OR_IRI => Ok(NodeKind::BlankNodeOrIri),
            shacl::BLANK_NODE_OR_LITERAL => Ok(NodeKind::BlankNodeOrLiteral),
            shacl::IRI_OR_LITERAL => Ok(NodeKind::IriOrLiteral),
            other => Err(ConfigurationError::invalid_value(
                "NodeKindConstraint",
                format!("unknown node kind '{other}'"),
            )),
        }
    }

    /// Returns true if `term` is of this kind.
    pub fn matches(&self, term: &Term) -> bool {
        let blank = term.is_blank();
        let literal = term.is_literal();
        let iri = !blank && !literal;
        match self {
            NodeKind::BlankNode => blank,
            NodeKind::Iri => iri,
            NodeKind::Literal => literal,
            NodeKind::BlankNodeOrIri => blank || iri,
            NodeKind::BlankNodeOrLiteral => blank || literal,
            NodeKind::IriOrLiteral => iri || literal,
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.iri())
    }
}

/// `sh:nodeKind`: every value node is of the given kind.
#[derive(Debug, Clone)]
pub struct NodeKindConstraint {
    id: Resource,
    kind: NodeKind,
}

impl NodeKindConstraint {
    /// Creates the constraint.
    pub fn new(kind: NodeKind) -> Self {
        Self {
            id: Resource::fresh_blank(),
            kind,
        }
    }

    /// Expected node kind.
    pub fn kind(&self) -> NodeKind {
        self.kind
    }
}

with_id!(NodeKindConstraint);

impl Constraint for NodeKindConstraint {
    fn id(&self) -> &Resource {
        &self.id
    }

    fn component(&self) -> ConstraintComponent {
        ConstraintComponent::NodeKind
    }

    fn evaluate(
        &self,
        ctx: &EvaluationContext<'_>,
        shape: &Shape,
        focus_node: &Term,
        value_node: &Term,
        _all_value_nodes: &[Term],
    ) -> ValidationReport {
        let mut report = ctx.report();
        if !self.kind.matches(value_node) {
            report.add_result(ctx.result(shape, self.component(), focus_node, value_node));
        }
        report
    }

    fn to_graph(&self, shape: Option<&Shape>) -> Graph {
        let mut graph = Graph::new();
        if let Some(shape) = shape {
            graph.add(shape.id(), shacl::NODE_KIND, Resource::new(self.kind.iri()));
        }
        graph
    }
}
