//! Collection mapper: homogeneous sequences and key/value mappings.
//!
//! Both mappers are non-lazy: every element is validated before anything is
//! returned, and the first failure aborts with its index or key on the path.

use indexmap::IndexMap;
use serde_json::Value;

use super::Fitter;
use crate::decl::TypeSource;
use crate::error::{FitError, Seg};
use crate::fitted::Fitted;
use crate::shape::Shape;

pub(super) fn fit_sequence<S: TypeSource>(
    fitter: &mut Fitter<'_, S>,
    elem: &Shape,
    value: &Value,
    depth: usize,
) -> Result<Fitted, FitError> {
    let Value::Array(items) = value else {
        return Err(fitter.mismatch("sequence", value));
    };
    let mut out = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        fitter.path.push(Seg::Index(i));
        let fitted = fitter.fit_at(elem, item, depth + 1);
        fitter.path.pop();
        out.push(fitted?);
    }
    Ok(Fitted::Seq(out))
}

pub(super) fn fit_mapping<S: TypeSource>(
    fitter: &mut Fitter<'_, S>,
    key_shape: &Shape,
    value_shape: &Shape,
    value: &Value,
    depth: usize,
) -> Result<Fitted, FitError> {
    let Value::Object(entries) = value else {
        return Err(fitter.mismatch("mapping", value));
    };
    let mut out = IndexMap::with_capacity(entries.len());
    for (key, entry) in entries {
        fitter.path.push(Seg::Key(key.clone()));
        // The key is fitted as a string value; the output keeps the input
        // key set, so the fitted key itself is discarded.
        let fitted = fitter
            .fit_at(key_shape, &Value::String(key.clone()), depth + 1)
            .and_then(|_| fitter.fit_at(value_shape, entry, depth + 1));
        fitter.path.pop();
        out.insert(key.clone(), fitted?);
    }
    Ok(Fitted::Map(out))
}
