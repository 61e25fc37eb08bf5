//! # SHACL Validator
//!
//! Constraint components and the shape evaluation driver. This crate provides
//! the concrete rules built on the `shacl_core` contract:
//!
//! - String constraints (length, pattern)
//! - Cardinality and value constraints (counts, `sh:in`, `sh:hasValue`, languages)
//! - Value type and range constraints (class, datatype, node kind, bounds)
//! - Property pair and closed-shape constraints
//! - Logical and shape-based constraints that re-enter shape evaluation
//!
//! ## Example
//!
//! ```rust
//! use shacl_core::{Graph, Literal, PropertyPath, Resource, Shape, ShapesGraph, Term};
//! use shacl_validator::{MaxLengthConstraint, ShapeValidator};
//!
//! let shape = Shape::property(
//!     Resource::new("http://example.org/NameShape"),
//!     PropertyPath::predicate("http://example.org/name"),
//! )
//! .constraint(MaxLengthConstraint::new(3))
//! .build();
//!
//! let values = vec![
//!     Term::from(Literal::plain("ab")),
//!     Term::from(Literal::plain("abcd")),
//! ];
//! let focus = Term::from(Resource::new("http://example.org/alice"));
//!
//! let validator = ShapeValidator::new();
//! let report =
//!     validator.validate_value_nodes(&ShapesGraph::new(), &Graph::new(), &shape, &focus, &values);
//!
//! assert_eq!(report.len(), 1);
//! assert_eq!(report.results()[0].value, values[1]);
//! ```

mod compare;
mod constraints;
mod engine;

pub use compare::*;
pub use constraints::*;
pub use engine::*;
