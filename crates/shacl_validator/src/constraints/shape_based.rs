//! Shape-based constraints: `sh:node` and `sh:qualifiedValueShape`.

use super::{integer_literal, with_id};
use crate::engine::{Conformance, conformance};
use shacl_core::vocabulary::shacl;
use shacl_core::{
    ConfigurationError, Constraint, ConstraintComponent, EvaluationContext, EvaluationScope, Graph,
    Resource, Shape, Term, ValidationReport,
};

/// `sh:node`: every value node conforms to the shape.
///
/// A node whose conformance cannot be decided is not reported.
#[derive(Debug, Clone)]
pub struct NodeConstraint {
    id: Resource,
    shape: Resource,
}

impl NodeConstraint {
    /// Creates the constraint.
    pub fn new(shape: Resource) -> Self {
        Self {
            id: Resource::fresh_blank(),
            shape,
        }
    }

    /// Required shape.
    pub fn shape(&self) -> &Resource {
        &self.shape
    }
}

with_id!(NodeConstraint);

impl Constraint for NodeConstraint {
    fn id(&self) -> &Resource {
        &self.id
    }

    fn component(&self) -> ConstraintComponent {
        ConstraintComponent::Node
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
        if conformance(ctx, &self.shape, value_node).violates() {
            report.add_result(ctx.result(shape, self.component(), focus_node, value_node));
        }
        report
    }

    fn to_graph(&self, shape: Option<&Shape>) -> Graph {
        let mut graph = Graph::new();
        if let Some(shape) = shape {
            graph.add(shape.id(), shacl::NODE, self.shape.clone());
        }
        graph
    }
}

/// `sh:qualifiedValueShape` with `sh:qualifiedMinCount` and/or
/// `sh:qualifiedMaxCount`.
///
/// Counts the value nodes conforming to the qualified shape. Each violated
/// bound produces one result with the focus node as value. Undetermined
/// value nodes are counted in whichever way satisfies the bound.
#[derive(Debug, Clone)]
pub struct QualifiedValueShapeConstraint {
    id: Resource,
    shape: Resource,
    min_count: Option<usize>,
    max_count: Option<usize>,
}

impl QualifiedValueShapeConstraint {
    /// Creates the constraint.
    ///
    /// At least one bound is required. Negative bounds are treated as zero; a
    /// minimum above the maximum is rejected.
    pub fn new(
        shape: Resource,
        min_count: Option<i64>,
        max_count: Option<i64>,
    ) -> Result<Self, ConfigurationError> {
        if min_count.is_none() && max_count.is_none() {
            return Err(ConfigurationError::missing(
                "QualifiedValueShapeConstraint",
                "qualifiedMinCount or qualifiedMaxCount",
            ));
        }

        let min_count = min_count.map(super::clamp);
        let max_count = max_count.map(super::clamp);
        match (min_count, max_count) {
            (Some(min), Some(max)) if min > max => {
                return Err(ConfigurationError::invalid_value(
                    "QualifiedValueShapeConstraint",
                    format!("qualifiedMinCount {min} exceeds qualifiedMaxCount {max}"),
                ));
            }
            _ => {}
        }

        Ok(Self {
            id: Resource::fresh_blank(),
            shape,
            min_count,
            max_count,
        })
    }

    /// Qualified shape.
    pub fn shape(&self) -> &Resource {
        &self.shape
    }

    /// Minimum number of conforming value nodes, if bounded.
    pub fn min_count(&self) -> Option<usize> {
        self.min_count
    }

    /// Maximum number of conforming value nodes, if bounded.
    pub fn max_count(&self) -> Option<usize> {
        self.max_count
    }
}

with_id!(QualifiedValueShapeConstraint);

impl Constraint for QualifiedValueShapeConstraint {
    fn id(&self) -> &Resource {
        &self.id
    }

    fn component(&self) -> ConstraintComponent {
        if self.min_count.is_some() {
            ConstraintComponent::QualifiedMinCount
        } else {
            ConstraintComponent::QualifiedMaxCount
        }
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
        let outcomes: Vec<Conformance> = all_value_nodes
            .iter()
            .map(|value| conformance(ctx, &self.shape, value))
            .collect();
        let count = outcomes.iter().filter(|o| o.conforms()).count();
        let undetermined = outcomes
            .iter()
            .filter(|o| **o == Conformance::Undetermined)
            .count();

        if self.min_count.is_some_and(|min| count + undetermined < min) {
            report.add_result(ctx.result(
                shape,
                ConstraintComponent::QualifiedMinCount,
                focus_node,
                focus_node,
            ));
        }
        if self.max_count.is_some_and(|max| count > max) {
            report.add_result(ctx.result(
                shape,
                ConstraintComponent::QualifiedMaxCount,
                focus_node,
                focus_node,
            ));
        }
        report
    }

    fn to_graph(&self, shape: Option<&Shape>) -> Graph {
        let mut graph = Graph::new();
        let Some(shape) = shape else {
            return graph;
        };

        graph.add(shape.id(), shacl::QUALIFIED_VALUE_SHAPE, self.shape.clone());
        if let Some(min) = self.min_count {
            graph.add(shape.id(), shacl::QUALIFIED_MIN_COUNT, integer_literal(min));
        }
        if let Some(max) = self.max_count {
            graph.add(shape.id(), shacl::QUALIFIED_MAX_COUNT, integer_literal(max));
        }
        graph
    }
}
