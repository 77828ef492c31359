//! Request payload validation

use validator::{Validate, ValidationErrors};

use super::error::AppError;

/// Run `validator` rules; failures become a 400 with per-field details
pub fn validate_payload<T: Validate>(payload: &T) -> Result<(), AppError> {
    payload.validate().map_err(validation_error)
}

fn validation_error(errors: ValidationErrors) -> AppError {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    let summary = fields
        .iter()
        .map(|(field, _)| field.to_string())
        .collect::<Vec<_>>()
        .join(", ");

    fields.into_iter().fold(
        AppError::validation(format!("Invalid fields: {}", summary)),
        |err, (field, errs)| {
            let codes: Vec<String> = errs.iter().map(|e| e.code.to_string()).collect();
            err.with_detail(field.to_string(), codes)
        },
    )
}
