//! Schema-directed fitting of untyped JSON trees into typed values.
//!
//! A declared type ([`DeclTy`]) is resolved once into an immutable descriptor
//! ([`Shape`]), then a fitting pass walks the descriptor and a
//! `serde_json::Value` in lockstep, producing either a fully-typed [`Fitted`]
//! tree or a [`FitError`] naming the exact path and reason of the first
//! mismatch. There is no partial result and no inverse (typed → untyped)
//! direction.
//!
//! ```
//! use serde_json::json;
//! use typefit::{typefit, DeclTy, Fitted, SchemaRegistry};
//!
//! let registry = SchemaRegistry::default();
//! let decl: DeclTy = serde_json::from_value(json!({ "list": "int" })).unwrap();
//! let fitted = typefit(&decl, &registry, &json!([3, 1, 2])).unwrap();
//! assert_eq!(
//!     fitted,
//!     Fitted::Seq(vec![Fitted::Int(3), Fitted::Int(1), Fitted::Int(2)])
//! );
//! ```

pub mod cli;
pub mod decl;
pub mod error;
pub mod fit;
pub mod fitted;
pub mod path_de;
pub mod resolve;
pub mod shape;

pub use decl::{DeclForm, DeclTy, FieldDecl, Lit, RecordDecl, SchemaDoc, SchemaRegistry, TypeSource};
pub use error::{Error, FitError, FitErrorKind, Path, SchemaError, Seg};
pub use fit::{FitOptions, Fitter};
pub use fitted::{Fitted, RecordValue};
pub use resolve::Resolver;
pub use shape::{RecordField, ScalarKind, Shape};

use serde_json::Value;

/// One-shot fit of a value against a declared type.
pub fn typefit<S: TypeSource>(decl: &DeclTy, source: &S, value: &Value) -> Result<Fitted, Error> {
    let shape = Resolver::new(source).resolve(decl)?;
    let fitted = Fitter::new(source, FitOptions::default()).fit(&shape, value)?;
    Ok(fitted)
}

// ————————————————————————————————————————————————————————————————————————————
// FRONT API
// ————————————————————————————————————————————————————————————————————————————

/// Reusable fitting front: holds the descriptor cache and options across
/// calls, so fitting many values against the same schema resolves each
/// declared type once.
pub struct Typefit<'a, S> {
    source: &'a S,
    resolver: Resolver<'a, S>,
    opts: FitOptions,
}

impl<'a, S: TypeSource> Typefit<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self::with_options(source, FitOptions::default())
    }

    pub fn with_options(source: &'a S, opts: FitOptions) -> Self {
        Self {
            source,
            resolver: Resolver::new(source),
            opts,
        }
    }

    /// Resolve the declared type (cached) without fitting anything.
    pub fn resolve(&self, decl: &DeclTy) -> Result<std::sync::Arc<Shape>, SchemaError> {
        self.resolver.resolve(decl)
    }

    pub fn fit(&self, decl: &DeclTy, value: &Value) -> Result<Fitted, Error> {
        let shape = self.resolver.resolve(decl)?;
        let fitted = Fitter::new(self.source, self.opts).fit(&shape, value)?;
        Ok(fitted)
    }
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————
