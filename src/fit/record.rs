//! Record builder: declared fields against an input mapping, instantiated
//! through the injected [`TypeSource`].

use serde_json::Value;

use super::Fitter;
use crate::decl::TypeSource;
use crate::error::{FitError, FitErrorKind, Seg};
use crate::fitted::Fitted;
use crate::shape::RecordField;

pub(super) fn fit_record<S: TypeSource>(
    fitter: &mut Fitter<'_, S>,
    name: &str,
    fields: &[RecordField],
    value: &Value,
    depth: usize,
) -> Result<Fitted, FitError> {
    let Value::Object(entries) = value else {
        return Err(fitter.mismatch(format!("record {name}"), value));
    };

    // Declaration order drives both lookup and construction. Keys present in
    // the input but not declared are ignored.
    let mut built = Vec::with_capacity(fields.len());
    for field in fields {
        match entries.get(&field.name) {
            Some(entry) => {
                fitter.path.push(Seg::Key(field.name.clone()));
                let fitted = fitter.fit_at(&field.shape, entry, depth + 1);
                fitter.path.pop();
                built.push((field.name.clone(), fitted?));
            }
            None if field.required => {
                fitter.path.push(Seg::Key(field.name.clone()));
                let err = fitter.error(FitErrorKind::MissingField {
                    field: field.name.clone(),
                });
                fitter.path.pop();
                return Err(err);
            }
            None => {
                // Prefitted default, or the explicit absence marker. Neither
                // recurses into the field's shape here.
                let fitted = field.default.clone().unwrap_or(Fitted::Absent);
                built.push((field.name.clone(), fitted));
            }
        }
    }

    Ok(fitter.source.construct(name, built))
}
