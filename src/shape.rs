// Resolved type descriptors. No serde_json::Value here except prefitted defaults.

use std::sync::Arc;

use crate::decl::Lit;
use crate::fitted::Fitted;

/// Scalar kinds a leaf descriptor can require.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    Bool,
    Int,                     // exact i64 representation; float-repr numbers never fit
    Float,                   // any JSON number
    Str,
    Null,                    // exactly null
    Any,                     // raw passthrough (incl. untyped mappings)
}

/// A resolved type descriptor. Immutable after construction; shared via `Arc`
/// so concurrent fitting passes can read the same tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Scalar(ScalarKind),
    Literals(Vec<Lit>),      // declaration order; order only affects error text
    Optional(Arc<Shape>),
    Union(Vec<Arc<Shape>>),  // members in declaration order
    Sequence(Arc<Shape>),
    Mapping {
        key: Arc<Shape>,
        value: Arc<Shape>,
    },
    Record {
        name: String,
        fields: Vec<RecordField>,  // declaration order, drives construction
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordField {
    pub name: String,
    pub shape: Arc<Shape>,
    pub required: bool,          // no default and not Optional
    /// Default fitted once at resolve time; cloned verbatim when the field
    /// is absent from the input.
    pub default: Option<Fitted>,
}

impl Shape {
    /// Short label for error messages, e.g. "expected sequence, got string".
    pub fn describe(&self) -> String {
        match self {
            Shape::Scalar(ScalarKind::Bool) => "bool".into(),
            Shape::Scalar(ScalarKind::Int) => "int".into(),
            Shape::Scalar(ScalarKind::Float) => "float".into(),
            Shape::Scalar(ScalarKind::Str) => "str".into(),
            Shape::Scalar(ScalarKind::Null) => "null".into(),
            Shape::Scalar(ScalarKind::Any) => "any".into(),
            Shape::Literals(lits) => {
                let alts = lits.iter().map(Lit::to_string).collect::<Vec<_>>();
                format!("literal[{}]", alts.join(", "))
            }
            Shape::Optional(inner) => format!("optional {}", inner.describe()),
            Shape::Union(members) => {
                let alts = members.iter().map(|m| m.describe()).collect::<Vec<_>>();
                format!("union[{}]", alts.join(" | "))
            }
            Shape::Sequence(_) => "sequence".into(),
            Shape::Mapping { .. } => "mapping".into(),
            Shape::Record { name, .. } => format!("record {name}"),
        }
    }
}
