//! Declared-type surface: the generic-form AST schema authors write, plus the
//! record registry the resolver and record builder consume.
//!
//! A declared type is either a bare name (scalar or registered record) or one
//! of the recognized generic forms. Schema files are plain JSON:
//!
//! ```json
//! {
//!   "records": {
//!     "user": { "fields": [
//!       { "name": "id",   "type": "int" },
//!       { "name": "tags", "type": { "list": "str" }, "default": [] }
//!     ]}
//!   },
//!   "root": { "list": "user" }
//! }
//! ```

use indexmap::IndexMap;
use ordered_float::OrderedFloat;
use serde::Deserialize;
use serde_json::Value;

use crate::fitted::{Fitted, RecordValue};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// A literal value permitted by a `literal[…]` form. Kept hashable so whole
/// declared types can key the descriptor cache.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(untagged)]
pub enum Lit {
    Bool(bool),
    Int(i64),
    Float(OrderedFloat<f64>),
    Str(String),
}

/// A declared type: a bare name, or a generic form with its arguments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(untagged)]
pub enum DeclTy {
    Name(String),
    Form(DeclForm),
}

/// The recognized generic forms, externally tagged in schema files
/// (`{"literal": [...]}`, `{"option": "int"}`, `{"map": ["str", "int"]}`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclForm {
    Literal(Vec<Lit>),
    Option(Box<DeclTy>),
    Union(Vec<DeclTy>),
    List(Box<DeclTy>),
    Map(Box<DeclTy>, Box<DeclTy>),
}

/// One declared record field. Required unless it carries a `default` or its
/// type is itself optional.
#[derive(Debug, Clone, Deserialize)]
pub struct FieldDecl {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: DeclTy,
    #[serde(default)]
    pub default: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecordDecl {
    pub fields: Vec<FieldDecl>,
}

/// A whole schema file: named record declarations plus the root type.
#[derive(Debug, Clone, Deserialize)]
pub struct SchemaDoc {
    #[serde(default)]
    pub records: IndexMap<String, RecordDecl>,
    pub root: DeclTy,
}

// ————————————————————————————————————————————————————————————————————————————
// TYPE SOURCE
// ————————————————————————————————————————————————————————————————————————————

/// Injected introspection + record-construction capability. The fitting core
/// only ever talks to record types through this trait, so hosts can swap in
/// their own reflection (or construction into native structs).
pub trait TypeSource {
    /// Look up a record declaration by name, fields in declaration order.
    fn record(&self, name: &str) -> Option<&RecordDecl>;

    /// Instantiate a record from fitted field values, in declaration order.
    /// The default materializes a dynamic [`RecordValue`].
    fn construct(&self, name: &str, fields: Vec<(String, Fitted)>) -> Fitted {
        Fitted::Record(RecordValue {
            name: name.to_owned(),
            fields: fields.into_iter().collect(),
        })
    }
}

/// Record declarations keyed by name, usually built from a [`SchemaDoc`].
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    records: IndexMap<String, RecordDecl>,
}

impl SchemaRegistry {
    pub fn new(records: IndexMap<String, RecordDecl>) -> Self {
        Self { records }
    }
}

impl From<SchemaDoc> for SchemaRegistry {
    fn from(doc: SchemaDoc) -> Self {
        Self::new(doc.records)
    }
}

impl TypeSource for SchemaRegistry {
    fn record(&self, name: &str) -> Option<&RecordDecl> {
        self.records.get(name)
    }
}

// ————————————————————————————————————————————————————————————————————————————
// LITERAL MATCHING
// ————————————————————————————————————————————————————————————————————————————

impl Lit {
    /// Exact value-and-kind equality against an input value. No coercion:
    /// `true` never matches `1`, and `1` never matches `1.0`.
    pub fn matches(&self, value: &Value) -> bool {
        match (self, value) {
            (Lit::Bool(b), Value::Bool(v)) => b == v,
            (Lit::Int(i), Value::Number(n)) => n.as_i64() == Some(*i),
            (Lit::Float(f), Value::Number(n)) => n.is_f64() && n.as_f64() == Some(f.0),
            (Lit::Str(s), Value::String(v)) => s == v,
            _ => false,
        }
    }
}

impl std::fmt::Display for Lit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Lit::Bool(b) => write!(f, "{b}"),
            Lit::Int(i) => write!(f, "{i}"),
            Lit::Float(x) => write!(f, "{}", x.0),
            Lit::Str(s) => write!(f, "{s:?}"),
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————
