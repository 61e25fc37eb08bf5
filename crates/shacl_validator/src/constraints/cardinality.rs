//! Cardinality constraints: `sh:minCount` and `sh:maxCount`.
//!
//! Both look at the whole value node set of a focus node and report at most one
//! result, with the focus node as value.

use super::{clamp, integer_literal, with_id};
use shacl_core::vocabulary::shacl;
use shacl_core::{
    Constraint, ConstraintComponent, EvaluationContext, EvaluationScope, Graph, Resource, Shape,
    Term, ValidationReport,
};

/// `sh:minCount`: at least `min_count` value nodes.
#[derive(Debug, Clone)]
pub struct MinCountConstraint {
    id: Resource,
    min_count: usize,
}

impl MinCountConstraint {
    /// Creates the constraint. Negative counts are treated as zero.
    pub fn new(min_count: i64) -> Self {
        Self {
            id: Resource::fresh_blank(),
            min_count: clamp(min_count),
        }
    }

    /// Minimum number of value nodes.
    pub fn min_count(&self) -> usize {
        self.min_count
    }
}

with_id!(MinCountConstraint);

impl Constraint for MinCountConstraint {
    fn id(&self) -> &Resource {
        &self.id
    }

    fn component(&self) -> ConstraintComponent {
        ConstraintComponent::MinCount
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
        if all_value_nodes.len() < self.min_count {
            report.add_result(ctx.result(shape, self.component(), focus_node, focus_node));
        }
        report
    }

    fn to_graph(&self, shape: Option<&Shape>) -> Graph {
        let mut graph = Graph::new();
        if let Some(shape) = shape {
            graph.add(shape.id(), shacl::MIN_COUNT, integer_literal(self.min_count));
        }
        graph
    }
}

/// `sh:maxCount`: at most `max_count` value nodes.
#[derive(Debug, Clone)]
pub struct MaxCountConstraint {
    id: Resource,
    max_count: usize,
}

impl MaxCountConstraint {
    /// Creates the constraint. Negative counts are treated as zero.
    pub fn new(max_count: i64) -> Self {
        Self {
            id: Resource::fresh_blank(),
            max_count: clamp(max_count),
        }
    }

    /// Maximum number of value nodes.
    pub fn max_count(&self) -> usize {
        self.max_count
    }
}

with_id!(MaxCountConstraint);

impl Constraint for MaxCountConstraint {
    fn id(&self) -> &Resource {
        &self.id
    }

    fn component(&self) -> ConstraintComponent {
        ConstraintComponent::MaxCount
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
        if all_value_nodes.len() > self.max_count {
            report.add_result(ctx.result(shape, self.component(), focus_node, focus_node));
        }
        report
    }

    fn to_graph(&self, shape: Option<&Shape>) -> Graph {
        let mut graph = Graph::new();
        if let Some(shape) = shape {
            graph.add(shape.id(), shacl::MAX_COUNT, integer_literal(self.max_count));
        }
        graph
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::{Fixture, ex, property_shape};
    use super::*;
    use pretty_assertions::assert_eq;
    use shacl_core::Literal;
    use shacl_core::vocabulary::xsd;

    fn values(n: usize) -> Vec<Term> {
        (0..n).map(|i| Term::from(Literal::integer(i as i64))).collect()
    }

    #[test]
    fn test_min_count() {
        let fixture = Fixture::new();
        let shape = property_shape();
        let focus = Term::from(ex("alice"));
        let constraint = MinCountConstraint::new(1);

        assert!(fixture.check_set(&constraint, &shape, &focus, &values(1)).is_empty());

        let report = fixture.check_set(&constraint, &shape, &focus, &values(0));
        assert_eq!(report.len(), 1);
        assert_eq!(report.results()[0].value, focus);
        assert_eq!(
            report.results()[0].source_constraint_component,
            ConstraintComponent::MinCount
        );
    }

    #[test]
    fn test_max_count() {
        let fixture = Fixture::new();
        let shape = property_shape();
        let focus = Term::from(ex("alice"));
        let constraint = MaxCountConstraint::new(2);

        assert!(fixture.check_set(&constraint, &shape, &focus, &values(2)).is_empty());
        assert_eq!(fixture.check_set(&constraint, &shape, &focus, &values(3)).len(), 1);

        let none_allowed = MaxCountConstraint::new(-1);
        assert_eq!(none_allowed.max_count(), 0);
        assert_eq!(fixture.check_set(&none_allowed, &shape, &focus, &values(1)).len(), 1);
    }

    #[test]
    fn test_cardinality_scope_and_graph() {
        let shape = property_shape();
        let min = MinCountConstraint::new(1);
        assert_eq!(min.scope(), EvaluationScope::FocusNode);
        assert_eq!(
            min.to_graph(Some(&shape)).object(shape.id(), shacl::MIN_COUNT),
            Some(&Term::from(Literal::typed("1", xsd::INTEGER)))
        );
        assert_eq!(
            MaxCountConstraint::new(3)
                .to_graph(Some(&shape))
                .object(shape.id(), shacl::MAX_COUNT),
            Some(&Term::from(Literal::typed("3", xsd::INTEGER)))
        );
    }
}
