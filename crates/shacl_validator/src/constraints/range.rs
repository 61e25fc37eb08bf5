//! Value range constraints: `sh:minInclusive`, `sh:maxInclusive`,
//! `sh:minExclusive` and `sh:maxExclusive`.

use super::with_id;
use crate::compare::compare_terms;
use shacl_core::vocabulary::shacl;
use shacl_core::{
    Constraint, ConstraintComponent, EvaluationContext, Graph, Literal, Resource, Shape, Term,
    ValidationReport,
};
use std::cmp::Ordering;

/// Which side of the bound a value must fall on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeKind {
    /// `sh:minInclusive`: value >= bound
    MinInclusive,
    /// `sh:maxInclusive`: value <= bound
    MaxInclusive,
    /// `sh:minExclusive`: value > bound
    MinExclusive,
    /// `sh:maxExclusive`: value < bound
    MaxExclusive,
}

impl RangeKind {
    fn accepts(&self, value_to_bound: Ordering) -> bool {
        match self {
            RangeKind::MinInclusive => value_to_bound != Ordering::Less,
            RangeKind::MaxInclusive => value_to_bound != Ordering::Greater,
            RangeKind::MinExclusive => value_to_bound == Ordering::Greater,
            RangeKind::MaxExclusive => value_to_bound == Ordering::Less,
        }
    }

    fn predicate(&self) -> &'static str {
        match self {
            RangeKind::MinInclusive => shacl::MIN_INCLUSIVE,
            RangeKind::MaxInclusive => shacl::MAX_INCLUSIVE,
            RangeKind::MinExclusive => shacl::MIN_EXCLUSIVE,
            RangeKind::MaxExclusive => shacl::MAX_EXCLUSIVE,
        }
    }

    fn component(&self) -> ConstraintComponent {
        match self {
            RangeKind::MinInclusive => ConstraintComponent::MinInclusive,
            RangeKind::MaxInclusive => ConstraintComponent::MaxInclusive,
            RangeKind::MinExclusive => ConstraintComponent::MinExclusive,
            RangeKind::MaxExclusive => ConstraintComponent::MaxExclusive,
        }
    }
}

/// A bound on literal values.
///
/// Values that cannot be compared with the bound (resources, literals of
/// another kind, malformed lexical forms) violate the constraint.
#[derive(Debug, Clone)]
pub struct RangeConstraint {
    id: Resource,
    kind: RangeKind,
    bound: Literal,
}

impl RangeConstraint {
    /// Creates a range constraint of the given kind.
    pub fn new(kind: RangeKind, bound: Literal) -> Self {
        Self {
            id: Resource::fresh_blank(),
            kind,
            bound,
        }
    }

    /// `sh:minInclusive`
    pub fn min_inclusive(bound: Literal) -> Self {
        Self::new(RangeKind::MinInclusive, bound)
    }

    /// `sh:maxInclusive`
    pub fn max_inclusive(bound: Literal) -> Self {
        Self::new(RangeKind::MaxInclusive, bound)
    }

    /// `sh:minExclusive`
    pub fn min_exclusive(bound: Literal) -> Self {
        Self::new(RangeKind::MinExclusive, bound)
    }

    /// `sh:maxExclusive`
    pub fn max_exclusive(bound: Literal) -> Self {
        Self::new(RangeKind::MaxExclusive, bound)
    }

    /// Which bound this is.
    pub fn kind(&self) -> RangeKind {
        self.kind
    }

    /// Bound the value is compared against.
    pub fn bound(&self) -> &Literal {
        &self.bound
    }

    fn accepts(&self, value: &Term) -> bool {
        let bound = Term::Literal(self.bound.clone());
        compare_terms(value, &bound).is_some_and(|ordering| self.kind.accepts(ordering))
    }
}

with_id!(RangeConstraint);

impl Constraint for RangeConstraint {
    fn id(&self) -> &Resource {
        &self.id
    }

    fn component(&self) -> ConstraintComponent {
        self.kind.component()
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
        if !self.accepts(value_node) {
            report.add_result(ctx.result(shape, self.component(), focus_node, value_node));
        }
        report
    }

    fn to_graph(&self, shape: Option<&Shape>) -> Graph {
        let mut graph = Graph::new();
        if let Some(shape) = shape {
            graph.add(shape.id(), self.kind.predicate(), self.bound.clone());
        }
        graph
    }
}
