//! # SHACL Core
//!
//! Core data structures for the SHACL constraint engine.
//!
//! This crate provides the building blocks shared by every constraint: the RDF
//! term model, in-memory triple sets, the shape model, validation reports and
//! the [`Constraint`] contract itself. Concrete constraints and the shape
//! evaluation driver live in `shacl_validator`.
//!
//! ## Key Concepts
//!
//! - **Term**: a resource (IRI or blank node) or a literal
//! - **Shape**: a bundle of constraints plus the severity, messages and path
//!   attached to every result they produce
//! - **Constraint**: one validation rule; evaluates value nodes and serializes
//!   its own configuration back into triples
//! - **ValidationReport**: the append-only list of results for a run
//!
//! ## Example
//!
//! ```rust
//! use shacl_core::{Literal, PropertyPath, Resource, Shape, Term, ValidationReport};
//!
//! let shape = Shape::property(
//!     Resource::new("http://example.org/NameShape"),
//!     PropertyPath::predicate("http://example.org/name"),
//! )
//! .message("Names must be short")
//! .build();
//!
//! let value = Term::from(Literal::plain("Alice"));
//! let report = ValidationReport::new(Resource::fresh_blank());
//!
//! assert!(report.conforms());
//! assert!(shape.path().is_some());
//! assert!(!value.is_blank());
//! ```

pub mod constraint;
pub mod error;
pub mod graph;
pub mod ids;
pub mod report;
pub mod shape;
pub mod term;
pub mod vocabulary;

pub use constraint::*;
pub use error::*;
pub use graph::*;
pub use ids::*;
pub use report::*;
pub use shape::*;
pub use term::*;
pub use vocabulary::ConstraintComponent;
