//! `sh:closed` with `sh:ignoredProperties`.

use super::with_id;
use shacl_core::vocabulary::shacl;
use shacl_core::{
    Constraint, ConstraintComponent, EvaluationContext, Graph, Literal, PropertyPath, Resource,
    Shape, ShapesGraph, Term, ValidationReport,
};
use std::collections::HashSet;

/// `sh:closed`: a value node only has properties declared by the shape.
///
/// Declared properties are the predicate paths of the shape's `sh:property`
/// shapes plus the ignored properties. `rdf:type` is not allowed implicitly.
/// Reports one result per offending triple, with the predicate as path and
/// the object as value.
#[derive(Debug, Clone)]
pub struct ClosedConstraint {
    id: Resource,
    closed: bool,
    ignored_properties: Vec<Resource>,
}

impl ClosedConstraint {
    /// Creates the constraint. `closed = false` disables the check.
    pub fn new(closed: bool, ignored_properties: impl IntoIterator<Item = Resource>) -> Self {
        Self {
            id: Resource::fresh_blank(),
            closed,
            ignored_properties: ignored_properties.into_iter().collect(),
        }
    }

    /// Whether the shape is closed.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Properties allowed besides those of the property shapes.
    pub fn ignored_properties(&self) -> &[Resource] {
        &self.ignored_properties
    }

    fn allowed<'a>(&'a self, shape: &'a Shape, shapes: &'a ShapesGraph) -> HashSet<&'a Resource> {
        let declared = shape
            .properties()
            .iter()
            .filter_map(|id| shapes.get(id))
            .filter_map(|property| property.path())
            .filter_map(PropertyPath::as_predicate);
        self.ignored_properties.iter().chain(declared).collect()
    }
}

with_id!(ClosedConstraint);

impl Constraint for ClosedConstraint {
    fn id(&self) -> &Resource {
        &self.id
    }

    fn component(&self) -> ConstraintComponent {
        ConstraintComponent::Closed
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
        let (true, Term::Resource(subject)) = (self.closed, value_node) else {
            return report;
        };

        let allowed = self.allowed(shape, ctx.shapes_graph());
        for triple in ctx.data_graph().triples_with_subject(subject) {
            if !allowed.contains(&triple.predicate) {
                let result = ctx
                    .result(shape, self.component(), focus_node, &triple.object)
                    .with_path(PropertyPath::Predicate(triple.predicate.clone()));
                report.add_result(result);
            }
        }
        report
    }

    fn to_graph(&self, shape: Option<&Shape>) -> Graph {
        let mut graph = Graph::new();
        let Some(shape) = shape else {
            return graph;
        };

        graph.add(shape.id(), shacl::CLOSED, Literal::boolean(self.closed));
        if !self.ignored_properties.is_empty() {
            let items = self.ignored_properties.iter().cloned().map(Term::from);
            graph.add_list(shape.id(), shacl::IGNORED_PROPERTIES, &self.id, items);
        }
        graph
    }
}
