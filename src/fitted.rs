// Typed output trees. Built only by the fitting pass; owned by the caller.

use indexmap::IndexMap;
use serde_json::Value;

/// A fully-fitted value. Every node satisfied its descriptor; there is no
/// partial or best-effort variant.
#[derive(Debug, Clone, PartialEq)]
pub enum Fitted {
    /// An optional that matched the absence side.
    Absent,
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    /// Raw passthrough for `any`-typed slots; the value is cloned, never
    /// referenced back into the input tree.
    Raw(Value),
    Seq(Vec<Fitted>),
    Map(IndexMap<String, Fitted>),
    Record(RecordValue),
}

/// A dynamically-materialized record instance: the declared type name plus
/// its fields in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordValue {
    pub name: String,
    pub fields: IndexMap<String, Fitted>,
}

impl Fitted {
    pub fn is_absent(&self) -> bool {
        matches!(self, Fitted::Absent)
    }

    /// Record field accessor, mostly for tests and CLI reporting.
    pub fn field(&self, name: &str) -> Option<&Fitted> {
        match self {
            Fitted::Record(rec) => rec.fields.get(name),
            Fitted::Map(map) => map.get(name),
            _ => None,
        }
    }

    /// Short kind label for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Fitted::Absent => "absent",
            Fitted::Null => "null",
            Fitted::Bool(_) => "bool",
            Fitted::Int(_) => "int",
            Fitted::Float(_) => "float",
            Fitted::Str(_) => "str",
            Fitted::Raw(_) => "raw",
            Fitted::Seq(_) => "sequence",
            Fitted::Map(_) => "mapping",
            Fitted::Record(_) => "record",
        }
    }
}

/// Kind label of an input value, used in mismatch messages.
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}
