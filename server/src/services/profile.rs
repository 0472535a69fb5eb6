//! Partial profile updates.
//!
//! DESIGN
//! ======
//! The body is a flat JSON object: `id` plus any public field names. It is
//! parsed into an `UpdatePlan` (account id + column assignments) by a pure
//! function, then applied in one statement. Unknown keys and null values are
//! ignored. An empty string clears its column, except for the required
//! `email`. An empresa `companyName` without a `fullName` also rewrites
//! `nombre_usuario` so both names stay in step.

use std::collections::BTreeMap;

use profiles::{ApiResponse, ProfileField, field};
use serde_json::{Map, Value};

use super::accounts::{AccountError, AccountStore, ProfileColumn};

pub const NOTHING_TO_UPDATE: &str = "No fields were provided to update.";
pub const UPDATED: &str = "Profile updated.";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UpdateError {
    #[error("user id is required")]
    MissingId,
    #[error("user id must be a positive integer")]
    InvalidId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdatePlan {
    pub id: u64,
    pub columns: Vec<(ProfileColumn, String)>,
}

/// Parse an update body.
///
/// # Errors
///
/// Returns an error if `id` is missing or not a positive integer (as a JSON
/// number or a numeric string).
pub fn plan_update(body: &Map<String, Value>) -> Result<UpdatePlan, UpdateError> {
    let id = parse_id(body.get("id"))?;

    let mut values: BTreeMap<ProfileField, String> = body
        .iter()
        .filter_map(|(key, value)| Some((ProfileField::from_wire_name(key)?, scalar(value)?)))
        .collect();

    for alias in field::distinct_aliases() {
        if let Some(display) = values.get(&alias.display).filter(|d| !d.is_empty()).cloned() {
            values.entry(alias.canonical).or_insert(display);
        }
    }

    let mut columns: Vec<(ProfileColumn, String)> = values
        .into_iter()
        .filter(|(field, value)| !(value.is_empty() && *field == ProfileField::Email))
        .filter_map(|(field, value)| ProfileColumn::for_field(field).map(|column| (column, value)))
        .collect();
    columns.sort_by_key(|(column, _)| *column);

    Ok(UpdatePlan { id, columns })
}

/// Apply a parsed update.
///
/// # Errors
///
/// Returns an error if the account store fails.
pub async fn apply_update(store: &dyn AccountStore, plan: &UpdatePlan) -> Result<ApiResponse, AccountError> {
    if plan.columns.is_empty() {
        return Ok(ApiResponse::ok(NOTHING_TO_UPDATE));
    }
    let changed = store.update_columns(plan.id, &plan.columns).await?;
    tracing::info!(user_id = plan.id, columns = plan.columns.len(), changed, "profile updated");
    Ok(ApiResponse::ok(UPDATED))
}

fn parse_id(raw: Option<&Value>) -> Result<u64, UpdateError> {
    let id = match raw {
        None | Some(Value::Null) => return Err(UpdateError::MissingId),
        Some(Value::String(s)) if s.trim().is_empty() => return Err(UpdateError::MissingId),
        Some(Value::String(s)) => s.trim().parse::<u64>().map_err(|_| UpdateError::InvalidId)?,
        Some(Value::Number(n)) => n.as_u64().ok_or(UpdateError::InvalidId)?,
        Some(_) => return Err(UpdateError::InvalidId),
    };
    if id == 0 { Err(UpdateError::InvalidId) } else { Ok(id) }
}

/// String form of a scalar member; `None` for null, objects and arrays.
fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

#[cfg(test)]
#[path = "profile_test.rs"]
mod tests;
