//! Concrete constraint components.
//!
//! One type per SHACL rule kind, grouped by family:
//! - String: `sh:minLength`, `sh:maxLength`, `sh:pattern`
//! - Cardinality: `sh:minCount`, `sh:maxCount`
//! - Value type: `sh:class`, `sh:datatype`, `sh:nodeKind`
//! - Value: `sh:in`, `sh:hasValue`, `sh:languageIn`, `sh:uniqueLang`
//! - Range: `sh:minInclusive`, `sh:maxInclusive`, `sh:minExclusive`, `sh:maxExclusive`
//! - Property pair: `sh:equals`, `sh:disjoint`, `sh:lessThan`, `sh:lessThanOrEquals`
//! - Closed: `sh:closed`, `sh:ignoredProperties`
//! - Logical: `sh:not`, `sh:and`, `sh:or`, `sh:xone`
//! - Shape-based: `sh:node`, `sh:qualifiedValueShape`

mod cardinality;
mod closed;
mod logical;
mod pair;
mod range;
mod shape_based;
mod string;
mod value;
mod value_type;

pub use cardinality::*;
pub use closed::*;
pub use logical::*;
pub use pair::*;
pub use range::*;
pub use shape_based::*;
pub use string::*;
pub use value::*;
pub use value_type::*;

use shacl_core::vocabulary::xsd;
use shacl_core::{Literal, Term};

/// Adds `with_id` to a constraint type holding an `id: Resource` field.
macro_rules! with_id {
    ($ty:ty) => {
        impl $ty {
            /// Replaces the generated blank identity with a named one.
            pub fn with_id(mut self, id: shacl_core::Resource) -> Self {
                self.id = id;
                self
            }
        }
    };
}

pub(crate) use with_id;

/// Negative bounds are treated as zero.
pub(crate) fn clamp(n: i64) -> usize {
    usize::try_from(n).unwrap_or(0)
}

pub(crate) fn integer_literal(n: usize) -> Literal {
    Literal::typed(n.to_string(), xsd::INTEGER)
}

/// String form used by the string-based constraints: the IRI of a resource
/// or the lexical value of a literal.
pub(crate) fn lexical_form(term: &Term) -> &str {
    match term {
        Term::Resource(resource) => resource.iri(),
        Term::Literal(literal) => literal.value(),
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use shacl_core::{
        Constraint, EvaluationContext, Graph, PropertyPath, Resource, SequentialIds, Shape,
        ShapesGraph, Term, ValidationOptions, ValidationReport,
    };

    pub(crate) fn ex(local: &str) -> Resource {
        Resource::new(format!("http://example.org/{local}"))
    }

    /// Property shape `ex:S` with path `ex:p` and no constraints.
    pub(crate) fn property_shape() -> Shape {
        Shape::property(ex("S"), PropertyPath::predicate("http://example.org/p")).build()
    }

    /// Owns everything an [`EvaluationContext`] borrows.
    pub(crate) struct Fixture {
        pub(crate) shapes: ShapesGraph,
        pub(crate) data: Graph,
        ids: SequentialIds,
        options: ValidationOptions,
    }

    impl Fixture {
        pub(crate) fn new() -> Self {
            Self {
                shapes: ShapesGraph::new(),
                data: Graph::new(),
                ids: SequentialIds::default(),
                options: ValidationOptions::default(),
            }
        }

        pub(crate) fn with_data(mut self, data: Graph) -> Self {
            self.data = data;
            self
        }

        pub(crate) fn with_shape(mut self, shape: Shape) -> Self {
            self.shapes.insert(shape);
            self
        }

        pub(crate) fn with_options(mut self, options: ValidationOptions) -> Self {
            self.options = options;
            self
        }

        pub(crate) fn ctx(&self) -> EvaluationContext<'_> {
            EvaluationContext::new(&self.shapes, &self.data, &self.ids, &self.options)
        }

        /// Evaluates a value-scoped constraint on a single value node.
        pub(crate) fn check(
            &self,
            constraint: &dyn Constraint,
            shape: &Shape,
            value: &Term,
        ) -> ValidationReport {
            let focus = Term::from(ex("focus"));
            constraint.evaluate(&self.ctx(), shape, &focus, value, std::slice::from_ref(value))
        }

        /// Evaluates a focus-scoped constraint on a set of value nodes.
        pub(crate) fn check_set(
            &self,
            constraint: &dyn Constraint,
            shape: &Shape,
            focus: &Term,
            values: &[Term],
        ) -> ValidationReport {
            constraint.evaluate(&self.ctx(), shape, focus, focus, values)
        }
    }
}
