//! Logical constraints: `sh:not`, `sh:and`, `sh:or` and `sh:xone`.
//!
//! Each operand is a shape identity resolved through the shapes graph. The
//! value node is evaluated against the operand shapes one nesting level
//! deeper; nested results are discarded and only the combinator's own result
//! is reported. An operand whose outcome is undetermined never causes a
//! result on its own.

use super::with_id;
use crate::engine::{Conformance, conformance};
use shacl_core::vocabulary::shacl;
use shacl_core::{
    Constraint, ConstraintComponent, EvaluationContext, Graph, Resource, Shape, Term,
    ValidationReport,
};

/// `sh:not`: the value node does not conform to the shape.
#[derive(Debug, Clone)]
pub struct NotConstraint {
    id: Resource,
    shape: Resource,
}

impl NotConstraint {
    /// Creates the constraint.
    pub fn new(shape: Resource) -> Self {
        Self {
            id: Resource::fresh_blank(),
            shape,
        }
    }

    /// Negated shape.
    pub fn shape(&self) -> &Resource {
        &self.shape
    }
}

with_id!(NotConstraint);

impl Constraint for NotConstraint {
    fn id(&self) -> &Resource {
        &self.id
    }

    fn component(&self) -> ConstraintComponent {
        ConstraintComponent::Not
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
        if conformance(ctx, &self.shape, value_node).conforms() {
            report.add_result(ctx.result(shape, self.component(), focus_node, value_node));
        }
        report
    }

    fn to_graph(&self, shape: Option<&Shape>) -> Graph {
        let mut graph = Graph::new();
        if let Some(shape) = shape {
            graph.add(shape.id(), shacl::NOT, self.shape.clone());
        }
        graph
    }
}

/// How many operands must be satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    And,
    Or,
    Xone,
}

impl Combinator {
    /// Returns true when the operands are known to violate the combinator.
    fn violated(&self, ctx: &EvaluationContext<'_>, shapes: &[Resource], node: &Term) -> bool {
        let outcomes: Vec<Conformance> = shapes
            .iter()
            .map(|shape| conformance(ctx, shape, node))
            .collect();
        let conforming = outcomes.iter().filter(|o| o.conforms()).count();
        let undetermined = outcomes
            .iter()
            .filter(|o| **o == Conformance::Undetermined)
            .count();

        match self {
            Combinator::And => outcomes.iter().any(|o| o.violates()),
            Combinator::Or => outcomes.iter().all(|o| o.violates()),
            Combinator::Xone => conforming > 1 || (undetermined == 0 && conforming != 1),
        }
    }
}

macro_rules! list_combinator {
    ($(#[$doc:meta])* $name:ident, $combinator:ident, $predicate:path) => {
        $(#[$doc])*
        #[derive(Debug, Clone)]
        pub struct $name {
            id: Resource,
            shapes: Vec<Resource>,
        }

        impl $name {
            /// Creates the constraint from operand shape identities.
            pub fn new(shapes: impl IntoIterator<Item = Resource>) -> Self {
                Self {
                    id: Resource::fresh_blank(),
                    shapes: shapes.into_iter().collect(),
                }
            }

            /// Operand shapes in order.
            pub fn shapes(&self) -> &[Resource] {
                &self.shapes
            }
        }

        with_id!($name);

        impl Constraint for $name {
            fn id(&self) -> &Resource {
                &self.id
            }

            fn component(&self) -> ConstraintComponent {
                ConstraintComponent::$combinator
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
                if Combinator::$combinator.violated(ctx, &self.shapes, value_node) {
                    report.add_result(ctx.result(shape, self.component(), focus_node, value_node));
                }
                report
            }

            fn to_graph(&self, shape: Option<&Shape>) -> Graph {
                let mut graph = Graph::new();
                if let Some(shape) = shape {
                    let items = self.shapes.iter().cloned().map(Term::from);
                    graph.add_list(shape.id(), $predicate, &self.id, items);
                }
                graph
            }
        }
    };
}

list_combinator!(
    /// `sh:and`: the value node conforms to every shape.
    AndConstraint,
    And,
    shacl::AND
);

list_combinator!(
    /// `sh:or`: the value node conforms to at least one shape.
    OrConstraint,
    Or,
    shacl::OR
);

list_combinator!(
    /// `sh:xone`: the value node conforms to exactly one shape.
    XoneConstraint,
    Xone,
    shacl::XONE
);

#[cfg(test)]
mod tests {
    use super::super::fixtures::{Fixture, ex, property_shape};
    use super::*;
    use crate::{MaxLengthConstraint, MinLengthConstraint, PatternConstraint, PatternFlags};
    use pretty_assertions::assert_eq;
    use shacl_core::vocabulary::rdf;
    use shacl_core::{Literal, ValidationOptions};

    /// `Short`: at most 3 code points; `Long`: at least 5; `Digits`: only digits.
    fn fixture() -> Fixture {
        Fixture::new()
            .with_shape(
                Shape::node(ex("Short"))
                    .constraint(MaxLengthConstraint::new(3))
                    .build(),
            )
            .with_shape(
                Shape::node(ex("Long"))
                    .constraint(MinLengthConstraint::new(5))
                    .build(),
            )
            .with_shape(
                Shape::node(ex("Digits"))
                    .constraint(PatternConstraint::new("^[0-9]+$", PatternFlags::none()).unwrap())
                    .build(),
            )
    }

    fn text(value: &str) -> Term {
        Literal::plain(value).into()
    }

    #[test]
    fn test_not() {
        let fixture = fixture();
        let shape = property_shape();
        let constraint = NotConstraint::new(ex("Short"));

        assert!(fixture.check(&constraint, &shape, &text("abcdef")).is_empty());

        let report = fixture.check(&constraint, &shape, &text("ab"));
        assert_eq!(report.len(), 1);
        assert_eq!(report.results()[0].source_constraint_component, ConstraintComponent::Not);
        assert_eq!(report.results()[0].source_shape, ex("S"));
    }

    #[test]
    fn test_and() {
        let fixture = fixture();
        let shape = property_shape();
        let constraint = AndConstraint::new([ex("Short"), ex("Digits")]);

        assert!(fixture.check(&constraint, &shape, &text("123")).is_empty());
        assert_eq!(fixture.check(&constraint, &shape, &text("12345")).len(), 1);
        assert_eq!(fixture.check(&constraint, &shape, &text("abc")).len(), 1);
    }

    #[test]
    fn test_or() {
        let fixture = fixture();
        let shape = property_shape();
        let constraint = OrConstraint::new([ex("Short"), ex("Long")]);

        assert!(fixture.check(&constraint, &shape, &text("ab")).is_empty());
        assert!(fixture.check(&constraint, &shape, &text("abcdef")).is_empty());
        assert_eq!(fixture.check(&constraint, &shape, &text("abcd")).len(), 1);

        let empty = OrConstraint::new([]);
        assert_eq!(fixture.check(&empty, &shape, &text("ab")).len(), 1);
    }

    #[test]
    fn test_xone() {
        let fixture = fixture();
        let shape = property_shape();
        let constraint = XoneConstraint::new([ex("Short"), ex("Digits")]);

        assert!(fixture.check(&constraint, &shape, &text("abc")).is_empty());
        assert!(fixture.check(&constraint, &shape, &text("12345")).is_empty());
        // both
        assert_eq!(fixture.check(&constraint, &shape, &text("123")).len(), 1);
        // neither
        assert_eq!(fixture.check(&constraint, &shape, &text("abcdef")).len(), 1);
    }

    #[test]
    fn test_nested_results_do_not_leak() {
        let fixture = fixture();
        let shape = property_shape();
        let constraint = AndConstraint::new([ex("Short"), ex("Long"), ex("Digits")]);

        let report = fixture.check(&constraint, &shape, &text("abcd"));
        assert_eq!(report.len(), 1);
        assert_eq!(report.results()[0].source_constraint_component, ConstraintComponent::And);
    }

    #[test]
    fn test_unknown_operand_is_undetermined() {
        let fixture = fixture();
        let shape = property_shape();

        assert!(fixture.check(&NotConstraint::new(ex("Unknown")), &shape, &text("x")).is_empty());
        assert!(
            fixture
                .check(&AndConstraint::new([ex("Short"), ex("Unknown")]), &shape, &text("x"))
                .is_empty()
        );
        // a known failing operand still fails the conjunction
        assert_eq!(
            fixture
                .check(&AndConstraint::new([ex("Long"), ex("Unknown")]), &shape, &text("x"))
                .len(),
            1
        );
        // the disjunction is only violated when every operand is known to fail
        assert!(
            fixture
                .check(&OrConstraint::new([ex("Long"), ex("Unknown")]), &shape, &text("x"))
                .is_empty()
        );
        // two conforming operands already break exactly-one
        let xone = XoneConstraint::new([ex("Short"), ex("Digits"), ex("Unknown")]);
        assert_eq!(fixture.check(&xone, &shape, &text("12")).len(), 1);
        assert!(fixture.check(&xone, &shape, &text("ab")).is_empty());
        assert!(fixture.check(&xone, &shape, &text("abcdef")).is_empty());
    }

    #[test]
    fn test_depth_limit_never_creates_violations() {
        let fixture = fixture().with_options(ValidationOptions::new().with_max_depth(0));
        let shape = property_shape();

        for constraint in [
            Box::new(NotConstraint::new(ex("Short"))) as Box<dyn Constraint>,
            Box::new(AndConstraint::new([ex("Long")])),
            Box::new(OrConstraint::new([ex("Long")])),
            Box::new(XoneConstraint::new([ex("Long")])),
        ] {
            let report = fixture.check(constraint.as_ref(), &shape, &text("ab"));
            assert!(report.is_empty(), "{}", constraint.component());
        }
    }

    #[test]
    fn test_self_referencing_shape_terminates() {
        // Loop = not Loop. At depth 4 the innermost check is undetermined, so
        // Loop conforms there, and the outcome alternates on the way back up:
        // depth 3 violates, 2 conforms, 1 violates.
        let looping = Shape::node(ex("Loop"))
            .constraint(NotConstraint::new(ex("Loop")))
            .build();
        let fixture = Fixture::new()
            .with_shape(looping)
            .with_options(ValidationOptions::new().with_max_depth(4));
        let constraint = NotConstraint::new(ex("Loop"));

        assert!(fixture.check(&constraint, &property_shape(), &text("x")).is_empty());

        let shallower = Fixture::new()
            .with_shape(
                Shape::node(ex("Loop"))
                    .constraint(NotConstraint::new(ex("Loop")))
                    .build(),
            )
            .with_options(ValidationOptions::new().with_max_depth(3));
        let report = shallower.check(&constraint, &property_shape(), &text("x"));
        assert_eq!(report.len(), 1);
        assert_eq!(report.results()[0].source_constraint_component, ConstraintComponent::Not);
    }

    #[test]
    fn test_logical_to_graph() {
        let shape = property_shape();
        let constraint = OrConstraint::new([ex("Short"), ex("Long")]).with_id(ex("either"));

        let graph = constraint.to_graph(Some(&shape));
        let head = graph.object(shape.id(), shacl::OR).unwrap().as_resource().unwrap();
        assert_eq!(graph.object(head, rdf::FIRST), Some(&Term::from(ex("Short"))));
        assert_eq!(graph, constraint.to_graph(Some(&shape)));

        let not = NotConstraint::new(ex("Short")).to_graph(Some(&shape));
        assert_eq!(not.object(shape.id(), shacl::NOT), Some(&Term::from(ex("Short"))));
        assert!(NotConstraint::new(ex("Short")).to_graph(None).is_empty());
    }
}
