//! The fitting core: one recursive dispatcher walking a descriptor and an
//! input value in lockstep.
//!
//! Every descriptor kind hands its children back to [`Fitter::fit_at`]; the
//! components never call each other directly. The pass is synchronous and
//! pure: either the whole tree fits and a [`Fitted`] value comes back, or a
//! [`FitError`] names the path and reason of the first mismatch. No partial
//! result ever escapes.
//!
//! Design notes:
//! - Union discrimination is first-match-wins in declaration order, no
//!   backtracking. Schema authors list specific alternatives (tagged
//!   records) before permissive ones.
//! - Path segments are pushed before each child and popped on the way out,
//!   even on failure, so a rejected union member leaves the path intact for
//!   the next attempt.
pub mod collect;
pub mod record;

use serde_json::Value;

use crate::decl::{Lit, TypeSource};
use crate::error::{FitError, FitErrorKind, Path, Seg};
use crate::fitted::{value_kind, Fitted};
use crate::shape::{ScalarKind, Shape};

// ------------------------------- Options ---------------------------------- //

/// Caller-tunable limits. Depth is the only one: input nesting is the only
/// unbounded resource a fitting pass consumes.
#[derive(Debug, Clone, Copy)]
pub struct FitOptions {
    pub max_depth: usize,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self { max_depth: 128 }
    }
}

// -------------------------------- Fitter ---------------------------------- //

/// One fitting pass. Holds the injected record source, the options, and the
/// path being walked; cheap to build per call.
pub struct Fitter<'a, S> {
    source: &'a S,
    opts: FitOptions,
    path: Vec<Seg>,
}

impl<'a, S: TypeSource> Fitter<'a, S> {
    pub fn new(source: &'a S, opts: FitOptions) -> Self {
        Self {
            source,
            opts,
            path: Vec::new(),
        }
    }

    /// Fit `value` against `shape`, consuming the pass.
    pub fn fit(mut self, shape: &Shape, value: &Value) -> Result<Fitted, FitError> {
        self.fit_at(shape, value, 0)
    }

    /// The dispatcher. The single recursive entry; exhaustive over kinds.
    fn fit_at(&mut self, shape: &Shape, value: &Value, depth: usize) -> Result<Fitted, FitError> {
        if depth > self.opts.max_depth {
            return Err(self.error(FitErrorKind::DepthExceeded(self.opts.max_depth)));
        }
        match shape {
            Shape::Scalar(kind) => self.fit_scalar(*kind, shape, value),
            Shape::Literals(lits) => self.fit_literals(lits, value),
            Shape::Optional(inner) => match value {
                // Null always selects absence; the wrapped shape is never tried.
                Value::Null => Ok(Fitted::Absent),
                _ => self.fit_at(inner, value, depth + 1),
            },
            Shape::Union(members) => self.fit_union(members, value, depth),
            Shape::Sequence(elem) => collect::fit_sequence(self, elem, value, depth),
            Shape::Mapping { key, value: val } => {
                collect::fit_mapping(self, key, val, value, depth)
            }
            Shape::Record { name, fields } => record::fit_record(self, name, fields, value, depth),
        }
    }

    // ------------------------------ Scalars ------------------------------- //

    fn fit_scalar(
        &self,
        kind: ScalarKind,
        shape: &Shape,
        value: &Value,
    ) -> Result<Fitted, FitError> {
        let fitted = match (kind, value) {
            (ScalarKind::Bool, Value::Bool(b)) => Some(Fitted::Bool(*b)),
            // Exact i64 representation only; 3.0 is a float-repr number and
            // never fits `int`.
            (ScalarKind::Int, Value::Number(n)) => n.as_i64().map(Fitted::Int),
            (ScalarKind::Float, Value::Number(n)) => n.as_f64().map(Fitted::Float),
            (ScalarKind::Str, Value::String(s)) => Some(Fitted::Str(s.clone())),
            (ScalarKind::Null, Value::Null) => Some(Fitted::Null),
            (ScalarKind::Any, v) => Some(Fitted::Raw(v.clone())),
            _ => None,
        };
        fitted.ok_or_else(|| self.mismatch(shape.describe(), value))
    }

    // ----------------------------- Literals ------------------------------- //

    /// Exact value-and-kind membership in the permitted set, declaration
    /// order only affecting the error text.
    fn fit_literals(&self, lits: &[Lit], value: &Value) -> Result<Fitted, FitError> {
        if let Some(hit) = lits.iter().find(|lit| lit.matches(value)) {
            return Ok(fitted_from_lit(hit));
        }
        let allowed = lits.iter().map(Lit::to_string).collect::<Vec<_>>();
        Err(self.error(FitErrorKind::LiteralMismatch {
            allowed: allowed.join(", "),
            actual: render_actual(value),
        }))
    }

    // ------------------------------ Unions -------------------------------- //

    /// First member to fit wins; later members are never attempted. When all
    /// fail, the aggregate carries one error per member so the caller sees
    /// why each alternative was rejected.
    fn fit_union(
        &mut self,
        members: &[std::sync::Arc<Shape>],
        value: &Value,
        depth: usize,
    ) -> Result<Fitted, FitError> {
        let mut attempts = Vec::with_capacity(members.len());
        for member in members {
            match self.fit_at(member, value, depth + 1) {
                Ok(found) => return Ok(found),
                Err(err) => attempts.push(err),
            }
        }
        Err(self.error(FitErrorKind::NoMatch { attempts }))
    }

    // ------------------------------ Errors -------------------------------- //

    fn error(&self, kind: FitErrorKind) -> FitError {
        FitError {
            path: Path(self.path.clone()),
            kind,
        }
    }

    fn mismatch(&self, expected: impl Into<String>, value: &Value) -> FitError {
        self.error(FitErrorKind::Mismatch {
            expected: expected.into(),
            actual: value_kind(value).to_owned(),
        })
    }
}

// ------------------------------ Utilities --------------------------------- //

fn fitted_from_lit(lit: &Lit) -> Fitted {
    match lit {
        Lit::Bool(b) => Fitted::Bool(*b),
        Lit::Int(i) => Fitted::Int(*i),
        Lit::Float(f) => Fitted::Float(f.0),
        Lit::Str(s) => Fitted::Str(s.clone()),
    }
}

/// Scalars render verbatim in literal mismatches; composites collapse to
/// their kind label to keep messages bounded.
fn render_actual(value: &Value) -> String {
    match value {
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => value.to_string(),
        Value::Array(_) | Value::Object(_) => value_kind(value).to_owned(),
    }
}

// -------------------------------- Tests ----------------------------------- //

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decl::{DeclTy, SchemaDoc, SchemaRegistry};
    use crate::resolve::Resolver;
    use ordered_float::OrderedFloat;
    use serde_json::json;
    use std::sync::Arc;

    fn fit_shape(shape: &Shape, value: serde_json::Value) -> Result<Fitted, FitError> {
        let reg = SchemaRegistry::default();
        Fitter::new(&reg, FitOptions::default()).fit(shape, &value)
    }

    fn fit_doc(doc: serde_json::Value, value: serde_json::Value) -> Result<Fitted, FitError> {
        let doc: SchemaDoc = serde_json::from_value(doc).unwrap();
        let root = doc.root.clone();
        let reg = SchemaRegistry::from(doc);
        let shape = Resolver::new(&reg).resolve(&root).unwrap();
        Fitter::new(&reg, FitOptions::default()).fit(&shape, &value)
    }

    fn shape_of(decl: serde_json::Value) -> Arc<Shape> {
        let decl: DeclTy = serde_json::from_value(decl).unwrap();
        let reg = SchemaRegistry::default();
        Resolver::new(&reg).resolve(&decl).unwrap()
    }

    #[test]
    fn literal_set_membership() {
        let shape = shape_of(json!({ "literal": ["a", "b", "c"] }));
        assert_eq!(fit_shape(&shape, json!("b")).unwrap(), Fitted::Str("b".into()));
        let err = fit_shape(&shape, json!("d")).unwrap_err();
        assert!(matches!(err.kind, FitErrorKind::LiteralMismatch { .. }));
        assert!(err.to_string().contains("\"d\""));
    }

    #[test]
    fn literal_rejects_cross_kind_values() {
        let shape = shape_of(json!({ "literal": [1] }));
        assert_eq!(fit_shape(&shape, json!(1)).unwrap(), Fitted::Int(1));
        assert!(fit_shape(&shape, json!(1.0)).is_err());
        assert!(fit_shape(&shape, json!(true)).is_err());

        let shape = shape_of(json!({ "literal": [true] }));
        assert!(fit_shape(&shape, json!(1)).is_err());
    }

    #[test]
    fn scalars_never_widen_across_kinds() {
        assert!(fit_shape(&Shape::Scalar(ScalarKind::Int), json!("3")).is_err());
        assert!(fit_shape(&Shape::Scalar(ScalarKind::Int), json!(3.0)).is_err());
        assert_eq!(
            fit_shape(&Shape::Scalar(ScalarKind::Float), json!(3)).unwrap(),
            Fitted::Float(3.0)
        );
        assert!(fit_shape(&Shape::Scalar(ScalarKind::Str), json!(3)).is_err());
        assert_eq!(
            fit_shape(&Shape::Scalar(ScalarKind::Any), json!({"x": 1})).unwrap(),
            Fitted::Raw(json!({"x": 1}))
        );
    }

    #[test]
    fn union_is_order_sensitive() {
        // Both members structurally match a plain number; the first wins.
        let int_first = Shape::Union(vec![
            Arc::new(Shape::Scalar(ScalarKind::Int)),
            Arc::new(Shape::Scalar(ScalarKind::Float)),
        ]);
        assert_eq!(fit_shape(&int_first, json!(3)).unwrap(), Fitted::Int(3));

        let float_first = Shape::Union(vec![
            Arc::new(Shape::Scalar(ScalarKind::Float)),
            Arc::new(Shape::Scalar(ScalarKind::Int)),
        ]);
        assert_eq!(fit_shape(&float_first, json!(3)).unwrap(), Fitted::Float(3.0));
    }

    #[test]
    fn union_failure_aggregates_every_member() {
        let shape = shape_of(json!({ "union": ["int", "str"] }));
        let err = fit_shape(&shape, json!(true)).unwrap_err();
        let FitErrorKind::NoMatch { attempts } = err.kind else {
            panic!("expected aggregate, got {err:?}");
        };
        assert_eq!(attempts.len(), 2);
    }

    #[test]
    fn optional_takes_null_without_trying_the_wrapped_shape() {
        let shape = shape_of(json!({ "option": "int" }));
        assert_eq!(fit_shape(&shape, json!(null)).unwrap(), Fitted::Absent);
        assert_eq!(fit_shape(&shape, json!(5)).unwrap(), Fitted::Int(5));
        assert!(fit_shape(&shape, json!("x")).is_err());
    }

    #[test]
    fn sequence_preserves_order() {
        let shape = shape_of(json!({ "list": "int" }));
        assert_eq!(
            fit_shape(&shape, json!([3, 1, 2])).unwrap(),
            Fitted::Seq(vec![Fitted::Int(3), Fitted::Int(1), Fitted::Int(2)])
        );
    }

    #[test]
    fn sequence_failure_names_the_index() {
        let shape = shape_of(json!({ "list": "int" }));
        let err = fit_shape(&shape, json!([1, "x", 3])).unwrap_err();
        assert_eq!(err.path.to_string(), "$[1]");
        // Non-sequence input fails at the root.
        let err = fit_shape(&shape, json!({"a": 1})).unwrap_err();
        assert_eq!(err.path.to_string(), "$");
    }

    #[test]
    fn mapping_fits_keys_and_values() {
        let shape = shape_of(json!({ "map": ["str", "int"] }));
        let out = fit_shape(&shape, json!({"a": 1, "b": 2})).unwrap();
        let Fitted::Map(map) = out else { panic!("expected map") };
        assert_eq!(
            map.into_iter().collect::<Vec<_>>(),
            vec![("a".into(), Fitted::Int(1)), ("b".into(), Fitted::Int(2))]
        );

        let err = fit_shape(&shape, json!({"a": 1, "b": "x"})).unwrap_err();
        assert_eq!(err.path.to_string(), "$.b");
    }

    #[test]
    fn mapping_checks_keys_against_the_key_shape() {
        let shape = shape_of(json!({ "map": [{ "literal": ["on", "off"] }, "bool"] }));
        assert!(fit_shape(&shape, json!({"on": true})).is_ok());
        let err = fit_shape(&shape, json!({"dim": true})).unwrap_err();
        assert_eq!(err.path.to_string(), "$.dim");
    }

    #[test]
    fn record_optional_field_absent_and_present() {
        let doc = json!({
            "records": {
                "point": { "fields": [
                    { "name": "x", "type": "int" },
                    { "name": "y", "type": { "option": "int" } }
                ]}
            },
            "root": "point"
        });
        let out = fit_doc(doc.clone(), json!({"x": 1})).unwrap();
        assert_eq!(out.field("y"), Some(&Fitted::Absent));

        let out = fit_doc(doc, json!({"x": 1, "y": 2})).unwrap();
        assert_eq!(out.field("y"), Some(&Fitted::Int(2)));
    }

    #[test]
    fn record_ignores_extra_keys() {
        let doc = json!({
            "records": {
                "point": { "fields": [ { "name": "x", "type": "int" } ]}
            },
            "root": "point"
        });
        let out = fit_doc(doc, json!({"x": 1, "debug": true, "v": 2})).unwrap();
        let Fitted::Record(rec) = out else { panic!("expected record") };
        assert_eq!(rec.fields.len(), 1);
    }

    #[test]
    fn record_missing_required_field_names_it_in_the_path() {
        let doc = json!({
            "records": {
                "point": { "fields": [
                    { "name": "x", "type": "int" },
                    { "name": "label", "type": "str" }
                ]}
            },
            "root": "point"
        });
        let err = fit_doc(doc, json!({"x": 1})).unwrap_err();
        assert_eq!(err.path.to_string(), "$.label");
        assert!(matches!(
            err.kind,
            FitErrorKind::MissingField { ref field } if field == "label"
        ));
    }

    #[test]
    fn record_absent_defaulted_field_uses_the_prefitted_default() {
        let doc = json!({
            "records": {
                "cfg": { "fields": [
                    { "name": "host", "type": "str" },
                    { "name": "port", "type": "int", "default": 80 }
                ]}
            },
            "root": "cfg"
        });
        let out = fit_doc(doc.clone(), json!({"host": "a"})).unwrap();
        assert_eq!(out.field("port"), Some(&Fitted::Int(80)));
        let out = fit_doc(doc, json!({"host": "a", "port": 8080})).unwrap();
        assert_eq!(out.field("port"), Some(&Fitted::Int(8080)));
    }

    #[test]
    fn nested_failure_reports_the_full_path() {
        let doc = json!({
            "records": {
                "item": { "fields": [ { "name": "qty", "type": "int" } ]},
                "order": { "fields": [ { "name": "items", "type": { "list": "item" } } ]}
            },
            "root": "order"
        });
        let err = fit_doc(doc, json!({"items": [{"qty": 1}, {"qty": "two"}]})).unwrap_err();
        assert_eq!(err.path.to_string(), "$.items[1].qty");
    }

    #[test]
    fn failed_union_member_leaves_the_path_clean() {
        // First member fails two levels deep; the second member's error (and
        // the aggregate) must still sit at the root.
        let shape = shape_of(json!({ "union": [ { "list": "int" }, "str" ] }));
        let err = fit_shape(&shape, json!(["a"])).unwrap_err();
        assert_eq!(err.path.to_string(), "$");
        let FitErrorKind::NoMatch { attempts } = err.kind else {
            panic!("expected aggregate");
        };
        assert_eq!(attempts[0].path.to_string(), "$[0]");
        assert_eq!(attempts[1].path.to_string(), "$");
    }

    #[test]
    fn round_trip_stability() {
        let doc = json!({
            "records": {
                "point": { "fields": [
                    { "name": "x", "type": "int" },
                    { "name": "y", "type": { "option": "int" } }
                ]}
            },
            "root": { "list": "point" }
        });
        let input = json!([{"x": 1}, {"x": 2, "y": 3}]);
        let once = fit_doc(doc.clone(), input.clone()).unwrap();
        let twice = fit_doc(doc, input).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn depth_limit_guards_pathological_nesting() {
        // any fits everything, so only the depth guard can reject this.
        let mut value = json!(1);
        for _ in 0..40 {
            value = json!([value]);
        }
        let elem = Arc::new(Shape::Scalar(ScalarKind::Any));
        let mut shape = Shape::Sequence(elem);
        for _ in 0..39 {
            shape = Shape::Sequence(Arc::new(shape));
        }
        let reg = SchemaRegistry::default();
        let err = Fitter::new(&reg, FitOptions { max_depth: 10 })
            .fit(&shape, &value)
            .unwrap_err();
        assert!(matches!(err.kind, FitErrorKind::DepthExceeded(10)));
    }

    #[test]
    fn float_literals_match_float_repr_only() {
        let shape = Shape::Literals(vec![Lit::Float(OrderedFloat(2.5))]);
        assert_eq!(fit_shape(&shape, json!(2.5)).unwrap(), Fitted::Float(2.5));
        assert!(fit_shape(&shape, json!(2)).is_err());
    }
}
