//! Property pair constraints: `sh:equals`, `sh:disjoint`, `sh:lessThan` and
//! `sh:lessThanOrEquals`.
//!
//! Each compares the value nodes with the objects of `(focus, predicate, ?)`
//! in the data graph. A literal focus node has no such objects.

use super::with_id;
use crate::compare::compare_terms;
use shacl_core::vocabulary::shacl;
use shacl_core::{
    Constraint, ConstraintComponent, EvaluationContext, EvaluationScope, Graph, Resource, Shape,
    Term, ValidationReport,
};
use std::cmp::Ordering;

fn sibling_values<'a>(
    ctx: &EvaluationContext<'a>,
    focus: &Term,
    predicate: &Resource,
) -> Vec<&'a Term> {
    match focus {
        Term::Resource(subject) => ctx
            .data_graph()
            .iter()
            .filter(|t| &t.subject == subject && &t.predicate == predicate)
            .map(|t| &t.object)
            .collect(),
        Term::Literal(_) => Vec::new(),
    }
}

/// `sh:equals`: the value nodes and the objects of the predicate are the same set.
///
/// Reports one result per term present on only one side.
#[derive(Debug, Clone)]
pub struct EqualsConstraint {
    id: Resource,
    predicate: Resource,
}

impl EqualsConstraint {
    /// Creates the constraint.
    pub fn new(predicate: Resource) -> Self {
        Self {
            id: Resource::fresh_blank(),
            predicate,
        }
    }

    /// Predicate whose values are compared.
    pub fn predicate(&self) -> &Resource {
        &self.predicate
    }
}

with_id!(EqualsConstraint);

impl Constraint for EqualsConstraint {
    fn id(&self) -> &Resource {
        &self.id
    }

    fn component(&self) -> ConstraintComponent {
        ConstraintComponent::Equals
    }

    fn scope(&self) -> EvaluationScope {
        EvaluationScope::FocusNode
    }

    fn evaluate(
        &self,
        ctx: &EvaluationContext<'_>,
        shape: &Shape,
        focus_node: &Term,
        _value_node: &Term,
        all_value_nodes: &[Term],
    ) -> ValidationReport {
        let mut report = ctx.report();
        let others = sibling_values(ctx, focus_node, &self.predicate);

        for value in all_value_nodes {
            if !others.contains(&value) {
                report.add_result(ctx.result(shape, self.component(), focus_node, value));
            }
        }
        for other in others {
            if !all_value_nodes.contains(other) {
                report.add_result(ctx.result(shape, self.component(), focus_node, other));
            }
        }
        report
    }

    fn to_graph(&self, shape: Option<&Shape>) -> Graph {
        let mut graph = Graph::new();
        if let Some(shape) = shape {
            graph.add(shape.id(), shacl::EQUALS, self.predicate.clone());
        }
        graph
    }
}

/// `sh:disjoint`: no value node is also an object of the predicate.
#[derive(Debug, Clone)]
pub struct DisjointConstraint {
    id: Resource,
    predicate: Resource,
}

impl DisjointConstraint {
    /// Creates the constraint.
    pub fn new(predicate: Resource) -> Self {
        Self {
            id: Resource::fresh_blank(),
            predicate,
        }
    }

    /// Predicate whose values are compared.
    pub fn predicate(&self) -> &Resource {
        &self.predicate
    }
}

with_id!(DisjointConstraint);

impl Constraint for DisjointConstraint {
    fn id(&self) -> &Resource {
        &self.id
    }

    fn component(&self) -> ConstraintComponent {
        ConstraintComponent::Disjoint
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
        if sibling_values(ctx, focus_node, &self.predicate).contains(&value_node) {
            report.add_result(ctx.result(shape, self.component(), focus_node, value_node));
        }
        report
    }

    fn to_graph(&self, shape: Option<&Shape>) -> Graph {
        let mut graph = Graph::new();
        if let Some(shape) = shape {
            graph.add(shape.id(), shacl::DISJOINT, self.predicate.clone());
        }
        graph
    }
}

/// `sh:lessThan` / `sh:lessThanOrEquals`: every value node is ordered before
/// every object of the predicate.
///
/// One result per offending pair; incomparable pairs count as offending.
#[derive(Debug, Clone)]
pub struct LessThanConstraint {
    id: Resource,
    predicate: Resource,
    or_equals: bool,
}

impl LessThanConstraint {
    /// `sh:lessThan`
    pub fn new(predicate: Resource) -> Self {
        Self {
            id: Resource::fresh_blank(),
            predicate,
            or_equals: false,
        }
    }

    /// `sh:lessThanOrEquals`
    pub fn or_equals(predicate: Resource) -> Self {
        Self {
            or_equals: true,
            ..Self::new(predicate)
        }
    }

    /// Predicate whose values are compared.
    pub fn predicate(&self) -> &Resource {
        &self.predicate
    }

    /// Returns true for `sh:lessThanOrEquals`.
    pub fn allows_equal(&self) -> bool {
        self.or_equals
    }

    fn accepts(&self, value: &Term, other: &Term) -> bool {
        match compare_terms(value, other) {
            Some(Ordering::Less) => true,
            Some(Ordering::Equal) => self.or_equals,
            _ => false,
        }
    }
}

with_id!(LessThanConstraint);

impl Constraint for LessThanConstraint {
    fn id(&self) -> &Resource {
        &self.id
    }

    fn component(&self) -> ConstraintComponent {
        if self.or_equals {
            ConstraintComponent::LessThanOrEquals
        } else {
            ConstraintComponent::LessThan
        }
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
        for other in sibling_values(ctx, focus_node, &self.predicate) {
            if !self.accepts(value_node, other) {
                report.add_result(ctx.result(shape, self.component(), focus_node, value_node));
            }
        }
        report
    }

    fn to_graph(&self, shape: Option<&Shape>) -> Graph {
        let mut graph = Graph::new();
        if let Some(shape) = shape {
            let predicate = if self.or_equals {
                shacl::LESS_THAN_OR_EQUALS
            } else {
                shacl::LESS_THAN
            };
            graph.add(shape.id(), predicate, self.predicate.clone());
        }
        graph
    }
}
