//! Type Descriptor Resolver: declared types in, immutable [`Shape`] trees out.
//!
//! Resolution is eager and happens once per distinct declared type; resolved
//! shapes are cached by declared-type identity behind a mutex so concurrent
//! fitting passes can share one resolver. Malformed declarations surface as
//! fatal [`SchemaError`]s here, never as fit errors later.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::decl::{DeclForm, DeclTy, TypeSource};
use crate::error::SchemaError;
use crate::fit::{FitOptions, Fitter};
use crate::shape::{RecordField, ScalarKind, Shape};

/// Built-in scalar names. Anything else goes through the record registry.
pub fn scalar_kind(name: &str) -> Option<ScalarKind> {
    match name {
        "bool" => Some(ScalarKind::Bool),
        "int" => Some(ScalarKind::Int),
        "float" => Some(ScalarKind::Float),
        "str" => Some(ScalarKind::Str),
        "none" => Some(ScalarKind::Null),
        "any" => Some(ScalarKind::Any),
        _ => None,
    }
}

fn is_absence(decl: &DeclTy) -> bool {
    matches!(decl, DeclTy::Name(name) if name == "none")
}

pub struct Resolver<'a, S> {
    source: &'a S,
    cache: Mutex<HashMap<DeclTy, Arc<Shape>>>,
}

impl<'a, S: TypeSource> Resolver<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self {
            source,
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn resolve(&self, decl: &DeclTy) -> Result<Arc<Shape>, SchemaError> {
        if let Some(shape) = self.cache.lock().unwrap().get(decl) {
            return Ok(Arc::clone(shape));
        }
        // Lock released over the recursion; worst case two threads resolve
        // the same declaration and one insert wins.
        let mut stack = Vec::new();
        let shape = self.resolve_inner(decl, &mut stack)?;
        self.cache
            .lock()
            .unwrap()
            .insert(decl.clone(), Arc::clone(&shape));
        Ok(shape)
    }

    fn resolve_inner(
        &self,
        decl: &DeclTy,
        stack: &mut Vec<String>,
    ) -> Result<Arc<Shape>, SchemaError> {
        match decl {
            DeclTy::Name(name) => {
                if let Some(kind) = scalar_kind(name) {
                    return Ok(Arc::new(Shape::Scalar(kind)));
                }
                self.resolve_record(name, stack)
            }
            DeclTy::Form(form) => self.resolve_form(form, stack),
        }
    }

    fn resolve_form(
        &self,
        form: &DeclForm,
        stack: &mut Vec<String>,
    ) -> Result<Arc<Shape>, SchemaError> {
        match form {
            DeclForm::Literal(lits) => {
                if lits.is_empty() {
                    return Err(SchemaError::EmptyLiteral);
                }
                Ok(Arc::new(Shape::Literals(lits.clone())))
            }
            DeclForm::Option(inner) => {
                let inner = self.resolve_inner(inner, stack)?;
                Ok(wrap_optional(inner))
            }
            DeclForm::Union(args) => {
                let had_absence = args.iter().any(is_absence);
                let mut members = Vec::new();
                for arg in args.iter().filter(|a| !is_absence(a)) {
                    members.push(self.resolve_inner(arg, stack)?);
                }
                let core = match members.len() {
                    0 => return Err(SchemaError::EmptyUnion),
                    1 => members.remove(0),
                    _ => Arc::new(Shape::Union(members)),
                };
                if had_absence {
                    Ok(wrap_optional(core))
                } else {
                    Ok(core)
                }
            }
            DeclForm::List(elem) => {
                let elem = self.resolve_inner(elem, stack)?;
                Ok(Arc::new(Shape::Sequence(elem)))
            }
            DeclForm::Map(key, value) => {
                let key = self.resolve_inner(key, stack)?;
                let value = self.resolve_inner(value, stack)?;
                Ok(Arc::new(Shape::Mapping { key, value }))
            }
        }
    }

    fn resolve_record(
        &self,
        name: &str,
        stack: &mut Vec<String>,
    ) -> Result<Arc<Shape>, SchemaError> {
        let Some(rec) = self.source.record(name) else {
            return Err(SchemaError::UnknownType(name.to_owned()));
        };
        if stack.iter().any(|n| n == name) {
            // Shapes inline their record fields, so a cycle can never finish.
            return Err(SchemaError::RecursiveRecord(name.to_owned()));
        }
        stack.push(name.to_owned());

        let mut fields = Vec::with_capacity(rec.fields.len());
        for field in &rec.fields {
            let shape = self.resolve_inner(&field.ty, stack)?;
            let optionalish = matches!(*shape, Shape::Optional(_));
            // Defaults are validated now, once, against the field's own
            // shape; fitting later clones the prefitted value verbatim.
            let default = match &field.default {
                None => None,
                Some(raw) => {
                    let fitted = Fitter::new(self.source, FitOptions::default())
                        .fit(&shape, raw)
                        .map_err(|source| SchemaError::BadDefault {
                            record: name.to_owned(),
                            field: field.name.clone(),
                            source,
                        })?;
                    Some(fitted)
                }
            };
            fields.push(RecordField {
                name: field.name.clone(),
                required: default.is_none() && !optionalish,
                shape,
                default,
            });
        }

        stack.pop();
        Ok(Arc::new(Shape::Record {
            name: name.to_owned(),
            fields,
        }))
    }
}

/// Optional of optional collapses; absence is absence.
fn wrap_optional(inner: Arc<Shape>) -> Arc<Shape> {
    if matches!(*inner, Shape::Optional(_)) {
        inner
    } else {
        Arc::new(Shape::Optional(inner))
    }
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————
