//! Fixed vocabulary used by constraints, shapes and reports.
//!
//! Predicates and classes are plain `&'static str` IRIs. The
//! [`ConstraintComponent`] enum names the rule kind behind each validation
//! result and maps it to its stable SHACL constraint-component IRI.

use crate::term::Resource;
use serde::{Serialize, Serializer};
use std::fmt;

macro_rules! iri {
    ($ns:literal, $($name:ident => $local:literal),* $(,)?) => {
        $(
            #[doc = concat!("`", $ns, $local, "`")]
            pub const $name: &str = concat!($ns, $local);
        )*
    };
}

/// SHACL vocabulary (`http://www.w3.org/ns/shacl#`).
pub mod shacl {
    /// Namespace IRI
    pub const NS: &str = "http://www.w3.org/ns/shacl#";

    iri!("http://www.w3.org/ns/shacl#",
        // Shapes
        NODE_SHAPE => "NodeShape",
        PROPERTY_SHAPE => "PropertyShape",
        PROPERTY => "property",
        PATH => "path",
        SEVERITY => "severity",
        MESSAGE => "message",
        DEACTIVATED => "deactivated",

        // Severities
        VIOLATION => "Violation",
        WARNING => "Warning",
        INFO => "Info",

        // Paths
        INVERSE_PATH => "inversePath",
        ALTERNATIVE_PATH => "alternativePath",
        ZERO_OR_MORE_PATH => "zeroOrMorePath",
        ONE_OR_MORE_PATH => "oneOrMorePath",
        ZERO_OR_ONE_PATH => "zeroOrOnePath",

        // Constraint parameters
        MIN_COUNT => "minCount",
        MAX_COUNT => "maxCount",
        CLASS => "class",
        DATATYPE => "datatype",
        NODE_KIND => "nodeKind",
        MIN_INCLUSIVE => "minInclusive",
        MAX_INCLUSIVE => "maxInclusive",
        MIN_EXCLUSIVE => "minExclusive",
        MAX_EXCLUSIVE => "maxExclusive",
        MIN_LENGTH => "minLength",
        MAX_LENGTH => "maxLength",
        PATTERN => "pattern",
        FLAGS => "flags",
        LANGUAGE_IN => "languageIn",
        UNIQUE_LANG => "uniqueLang",
        EQUALS => "equals",
        DISJOINT => "disjoint",
        LESS_THAN => "lessThan",
        LESS_THAN_OR_EQUALS => "lessThanOrEquals",
        NOT => "not",
        AND => "and",
        OR => "or",
        XONE => "xone",
        NODE => "node",
        QUALIFIED_VALUE_SHAPE => "qualifiedValueShape",
        QUALIFIED_MIN_COUNT => "qualifiedMinCount",
        QUALIFIED_MAX_COUNT => "qualifiedMaxCount",
        CLOSED => "closed",
        IGNORED_PROPERTIES => "ignoredProperties",
        HAS_VALUE => "hasValue",
        IN => "in",

        // Node kinds
        BLANK_NODE => "BlankNode",
        IRI => "IRI",
        LITERAL => "Literal",
        BLANK_NODE_OR_IRI => "BlankNodeOrIRI",
        BLANK_NODE_OR_LITERAL => "BlankNodeOrLiteral",
        IRI_OR_LITERAL => "IRIOrLiteral",

        // Validation reports
        VALIDATION_REPORT => "ValidationReport",
        VALIDATION_RESULT => "ValidationResult",
        CONFORMS => "conforms",
        RESULT => "result",
        FOCUS_NODE => "focusNode",
        RESULT_PATH => "resultPath",
        VALUE => "value",
        SOURCE_SHAPE => "sourceShape",
        SOURCE_CONSTRAINT_COMPONENT => "sourceConstraintComponent",
        RESULT_MESSAGE => "resultMessage",
        RESULT_SEVERITY => "resultSeverity",
    );
}

/// RDF vocabulary.
pub mod rdf {
    iri!("http://www.w3.org/1999/02/22-rdf-syntax-ns#",
        TYPE => "type",
        FIRST => "first",
        REST => "rest",
        NIL => "nil",
        LANG_STRING => "langString",
    );
}

/// RDFS vocabulary.
pub mod rdfs {
    iri!("http://www.w3.org/2000/01/rdf-schema#",
        SUB_CLASS_OF => "subClassOf",
    );
}

/// XML Schema datatypes.
pub mod xsd {
    iri!("http://www.w3.org/2001/XMLSchema#",
        STRING => "string",
        BOOLEAN => "boolean",
        DECIMAL => "decimal",
        INTEGER => "integer",
        DOUBLE => "double",
        FLOAT => "float",
        LONG => "long",
        INT => "int",
        SHORT => "short",
        BYTE => "byte",
        NON_NEGATIVE_INTEGER => "nonNegativeInteger",
        POSITIVE_INTEGER => "positiveInteger",
        NON_POSITIVE_INTEGER => "nonPositiveInteger",
        NEGATIVE_INTEGER => "negativeInteger",
        UNSIGNED_LONG => "unsignedLong",
        UNSIGNED_INT => "unsignedInt",
        UNSIGNED_SHORT => "unsignedShort",
        UNSIGNED_BYTE => "unsignedByte",
        DATE => "date",
        DATE_TIME => "dateTime",
        TIME => "time",
    );
}

/// Identifies the rule kind that produced a validation result.
///
/// Each variant maps to one fixed constraint-component IRI, so consumers can
/// branch on the kind of violation without parsing messages.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ConstraintComponent {
    /// `sh:minCount`
    MinCount,
    /// `sh:maxCount`
    MaxCount,
    /// `sh:class`
    Class,
    /// `sh:datatype`
    Datatype,
    /// `sh:nodeKind`
    NodeKind,
    /// `sh:minInclusive`
    MinInclusive,
    /// `sh:maxInclusive`
    MaxInclusive,
    /// `sh:minExclusive`
    MinExclusive,
    /// `sh:maxExclusive`
    MaxExclusive,
    /// `sh:minLength`
    MinLength,
    /// `sh:maxLength`
    MaxLength,
    /// `sh:pattern`
    Pattern,
    /// `sh:languageIn`
    LanguageIn,
    /// `sh:uniqueLang`
    UniqueLang,
    /// `sh:equals`
    Equals,
    /// `sh:disjoint`
    Disjoint,
    /// `sh:lessThan`
    LessThan,
    /// `sh:lessThanOrEquals`
    LessThanOrEquals,
    /// `sh:not`
    Not,
    /// `sh:and`
    And,
    /// `sh:or`
    Or,
    /// `sh:xone`
    Xone,
    /// `sh:node`
    Node,
    /// `sh:qualifiedValueShape` with `sh:qualifiedMinCount`
    QualifiedMinCount,
    /// `sh:qualifiedValueShape` with `sh:qualifiedMaxCount`
    QualifiedMaxCount,
    /// `sh:closed`
    Closed,
    /// `sh:hasValue`
    HasValue,
    /// `sh:in`
    In,
    /// Component contributed by a constraint defined outside this workspace
    Custom(Resource),
}

impl ConstraintComponent {
    /// Returns the constraint-component IRI.
    pub fn iri(&self) -> &str {
        match self {
            Self::MinCount => "http://www.w3.org/ns/shacl#MinCountConstraintComponent",
            Self::MaxCount => "http://www.w3.org/ns/shacl#MaxCountConstraintComponent",
            Self::Class => "http://www.w3.org/ns/shacl#ClassConstraintComponent",
            Self::Datatype => "http://www.w3.org/ns/shacl#DatatypeConstraintComponent",
            Self::NodeKind => "http://www.w3.org/ns/shacl#NodeKindConstraintComponent",
            Self::MinInclusive => "http://www.w3.org/ns/shacl#MinInclusiveConstraintComponent",
            Self::MaxInclusive => "http://www.w3.org/ns/shacl#MaxInclusiveConstraintComponent",
            Self::MinExclusive => "http://www.w3.org/ns/shacl#MinExclusiveConstraintComponent",
            Self::MaxExclusive => "http://www.w3.org/ns/shacl#MaxExclusiveConstraintComponent",
            Self::MinLength => "http://www.w3.org/ns/shacl#MinLengthConstraintComponent",
            Self::MaxLength => "http://www.w3.org/ns/shacl#MaxLengthConstraintComponent",
            Self::Pattern => "http://www.w3.org/ns/shacl#PatternConstraintComponent",
            Self::LanguageIn => "http://www.w3.org/ns/shacl#LanguageInConstraintComponent",
            Self::UniqueLang => "http://www.w3.org/ns/shacl#UniqueLangConstraintComponent",
            Self::Equals => "http://www.w3.org/ns/shacl#EqualsConstraintComponent",
            Self::Disjoint => "http://www.w3.org/ns/shacl#DisjointConstraintComponent",
            Self::LessThan => "http://www.w3.org/ns/shacl#LessThanConstraintComponent",
            Self::LessThanOrEquals => {
                "http://www.w3.org/ns/shacl#LessThanOrEqualsConstraintComponent"
            }
            Self::Not => "http://www.w3.org/ns/shacl#NotConstraintComponent",
            Self::And => "http://www.w3.org/ns/shacl#AndConstraintComponent",
            Self::Or => "http://www.w3.org/ns/shacl#OrConstraintComponent",
            Self::Xone => "http://www.w3.org/ns/shacl#XoneConstraintComponent",
            Self::Node => "http://www.w3.org/ns/shacl#NodeConstraintComponent",
            Self::QualifiedMinCount => {
                "http://www.w3.org/ns/shacl#QualifiedMinCountConstraintComponent"
            }
            Self::QualifiedMaxCount => {
                "http://www.w3.org/ns/shacl#QualifiedMaxCountConstraintComponent"
            }
            Self::Closed => "http://www.w3.org/ns/shacl#ClosedConstraintComponent",
            Self::HasValue => "http://www.w3.org/ns/shacl#HasValueConstraintComponent",
            Self::In => "http://www.w3.org/ns/shacl#InConstraintComponent",
            Self::Custom(resource) => resource.iri(),
        }
    }

    /// Returns the component as a resource, for use in triples.
    pub fn to_resource(&self) -> Resource {
        Resource::new(self.iri())
    }
}

impl fmt::Display for ConstraintComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.iri())
    }
}

impl Serialize for ConstraintComponent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.iri())
    }
}
