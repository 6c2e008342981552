//! Field rules applied before any I/O.
//!
//! The request types derive [`Validate`]; this module holds the custom rules
//! they reference and folds [`ValidationErrors`] into [`AppError::Validation`].
//! Plates follow the strict `LLLDDD` form (three letters, three digits),
//! checked case-insensitively and stored uppercase.

use std::borrow::Cow;

use validator::{Validate, ValidateUrl, ValidationError, ValidationErrors};

use crate::app_error::AppError;
use crate::car_model::{CarCreateRequest, CarUpdateRequest};

pub const PLATE_FORMAT_MESSAGE: &str =
    "Plate number must be 3 letters followed by 3 digits, for example: ABC123";

const YEAR_LENGTH: usize = 4;

pub fn is_valid_plate(plate: &str) -> bool {
    let bytes = plate.as_bytes();
    bytes.len() == 6
        && bytes[..3].iter().all(u8::is_ascii_alphabetic)
        && bytes[3..].iter().all(u8::is_ascii_digit)
}

/// Canonical stored form of a plate.
pub fn normalize_plate(plate: &str) -> String {
    plate.to_ascii_uppercase()
}

pub fn validate_plate(plate: &str) -> Result<String, AppError> {
    if is_valid_plate(plate) {
        Ok(normalize_plate(plate))
    } else {
        Err(AppError::Validation(PLATE_FORMAT_MESSAGE.to_string()))
    }
}

pub fn is_valid_year(year: &str) -> bool {
    year.len() == YEAR_LENGTH && year.bytes().all(|b| b.is_ascii_digit())
}

/// Empty is accepted: it means "no image".
pub fn is_valid_image_url(url: &str) -> bool {
    url.is_empty() || url.validate_url()
}

fn rule_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

pub(crate) fn plate_rule(plate: &str) -> Result<(), ValidationError> {
    if is_valid_plate(plate) {
        Ok(())
    } else {
        Err(rule_error("plate_format", PLATE_FORMAT_MESSAGE))
    }
}

pub(crate) fn year_rule(year: &str) -> Result<(), ValidationError> {
    if is_valid_year(year) {
        Ok(())
    } else {
        Err(rule_error("year_format", "must be a 4 digit number"))
    }
}

pub(crate) fn image_url_rule(url: &str) -> Result<(), ValidationError> {
    if is_valid_image_url(url) {
        Ok(())
    } else {
        Err(rule_error("image_url", "must be a valid URL"))
    }
}

pub(crate) fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(rule_error("required", "is required"))
    } else {
        Ok(())
    }
}

/// Full check of a new record. The plate is checked first, on its own, so a
/// bad plate always reports [`PLATE_FORMAT_MESSAGE`].
pub fn validate_create(request: &CarCreateRequest) -> Result<(), AppError> {
    validate_plate(&request.plate_number)?;
    request.validate()?;
    Ok(())
}

/// Checks only the fields present in a partial update.
pub fn validate_update(changes: &CarUpdateRequest) -> Result<(), AppError> {
    if let Some(plate) = &changes.plate_number {
        validate_plate(plate)?;
    }
    changes.validate()?;
    Ok(())
}

/// One line per failed rule, `field: message`, sorted by field name.
pub fn describe_errors(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|(left, _), (right, _)| left.cmp(right));

    fields
        .into_iter()
        .flat_map(|(field, failures)| {
            failures.iter().map(move |failure| match &failure.message {
                Some(message) => format!("{field}: {message}"),
                None => format!("{field}: failed `{}`", failure.code),
            })
        })
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::Validation(describe_errors(&errors))
    }
}
