//! Local field validation, run before any network call.
//!
//! Only changed fields are checked so legacy values already stored upstream
//! never block an unrelated edit.

use std::fmt;

use crate::field::{ProfileField, display_name_field};
use crate::profile::UserType;

const MIN_NAME_LEN: usize = 2;
const PHONE_SYMBOLS: &[char] = &['+', '-', '(', ')', ' '];

/// A rejected value, reported inline next to its field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldError {
    pub field: ProfileField,
    pub message: &'static str,
}

/// Every field that failed validation, in submission order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    /// Message for `field`, if it failed.
    #[must_use]
    pub fn message_for(&self, field: ProfileField) -> Option<&'static str> {
        self.0.iter().find(|e| e.field == field).map(|e| e.message)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", err.field, err.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Trimmed, lowercased email when it has exactly one `@` between a
/// non-empty local part and domain.
#[must_use]
pub fn normalize_email(email: &str) -> Option<String> {
    let normalized = email.trim().to_ascii_lowercase();
    let (local, domain) = normalized.split_once('@')?;
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return None;
    }
    Some(normalized)
}

/// Check one value for the given persona.
///
/// # Errors
///
/// Returns the inline message when the value is rejected.
pub fn validate_field(user_type: &UserType, field: ProfileField, value: &str) -> Result<(), &'static str> {
    if Some(field) == display_name_field(user_type) && value.trim().chars().count() < MIN_NAME_LEN {
        return Err("must be at least 2 characters");
    }
    match field {
        ProfileField::Email if normalize_email(value).is_none() => Err("must be a valid email address"),
        ProfileField::FoundedYear if !value.is_empty() && !is_year(value) => Err("must be a four-digit year"),
        ProfileField::Phone if !value.chars().all(|c| c.is_ascii_digit() || PHONE_SYMBOLS.contains(&c)) => {
            Err("may only contain digits, spaces and + - ( )")
        }
        ProfileField::Website if value.trim().contains(char::is_whitespace) => Err("must not contain spaces"),
        _ => Ok(()),
    }
}

/// Check every changed value.
///
/// # Errors
///
/// Returns all failures at once so each can be shown next to its field.
pub fn validate_changes<'a, I>(user_type: &UserType, changes: I) -> Result<(), ValidationErrors>
where
    I: IntoIterator<Item = (ProfileField, &'a str)>,
{
    let errors: Vec<FieldError> = changes
        .into_iter()
        .filter_map(|(field, value)| {
            validate_field(user_type, field, value)
                .err()
                .map(|message| FieldError { field, message })
        })
        .collect();
    if errors.is_empty() { Ok(()) } else { Err(ValidationErrors(errors)) }
}

fn is_year(value: &str) -> bool {
    value.len() == 4 && value.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
#[path = "validate_test.rs"]
mod tests;
