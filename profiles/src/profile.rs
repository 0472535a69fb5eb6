//! The signed-in user's profile record.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::field::{ProfileField, display_alias, display_name_field};

// =============================================================================
// USER TYPE
// =============================================================================

/// Persona of an account. Selects the editor variant.
///
/// Unknown values are kept verbatim so they round-trip through the session
/// store unchanged and render the support notice instead of a form.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum UserType {
    #[default]
    Alumno,
    Empresa,
    Unrecognized(String),
}

impl UserType {
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw {
            "alumno" => Self::Alumno,
            "empresa" => Self::Empresa,
            other => Self::Unrecognized(other.to_owned()),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Alumno => "alumno",
            Self::Empresa => "empresa",
            Self::Unrecognized(raw) => raw,
        }
    }

    #[must_use]
    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unrecognized(_))
    }
}

impl From<String> for UserType {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<UserType> for String {
    fn from(user_type: UserType) -> Self {
        user_type.as_str().to_owned()
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// USER PROFILE
// =============================================================================

/// Profile of the signed-in user, mirrored field-by-field in the session store.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub user_type: UserType,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub skills: String,
    #[serde(default)]
    pub experience: String,
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub company_description: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub founded_year: String,
    #[serde(default)]
    pub company_size: String,
    #[serde(default)]
    pub logo: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub address: String,
}

impl UserProfile {
    /// Empty alumno profile with the given id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into(), ..Self::default() }
    }

    /// Current value of `field`. `None` for fields outside the profile (`Token`).
    #[must_use]
    pub fn value(&self, field: ProfileField) -> Option<&str> {
        let value = match field {
            ProfileField::Id => &self.id,
            ProfileField::Email => &self.email,
            ProfileField::FullName => &self.full_name,
            ProfileField::UserType => return Some(self.user_type.as_str()),
            ProfileField::Phone => &self.phone,
            ProfileField::Skills => &self.skills,
            ProfileField::Experience => &self.experience,
            ProfileField::CompanyName => &self.company_name,
            ProfileField::CompanyDescription => &self.company_description,
            ProfileField::Website => &self.website,
            ProfileField::Category => &self.category,
            ProfileField::FoundedYear => &self.founded_year,
            ProfileField::CompanySize => &self.company_size,
            ProfileField::Logo => &self.logo,
            ProfileField::Location => &self.location,
            ProfileField::Address => &self.address,
            ProfileField::Token => return None,
        };
        Some(value.as_str())
    }

    /// Overwrite `field`. Returns `false` (and changes nothing) for `Token`.
    pub fn set(&mut self, field: ProfileField, value: impl Into<String>) -> bool {
        let value = value.into();
        let slot = match field {
            ProfileField::Id => &mut self.id,
            ProfileField::Email => &mut self.email,
            ProfileField::FullName => &mut self.full_name,
            ProfileField::UserType => {
                self.user_type = UserType::parse(&value);
                return true;
            }
            ProfileField::Phone => &mut self.phone,
            ProfileField::Skills => &mut self.skills,
            ProfileField::Experience => &mut self.experience,
            ProfileField::CompanyName => &mut self.company_name,
            ProfileField::CompanyDescription => &mut self.company_description,
            ProfileField::Website => &mut self.website,
            ProfileField::Category => &mut self.category,
            ProfileField::FoundedYear => &mut self.founded_year,
            ProfileField::CompanySize => &mut self.company_size,
            ProfileField::Logo => &mut self.logo,
            ProfileField::Location => &mut self.location,
            ProfileField::Address => &mut self.address,
            ProfileField::Token => return false,
        };
        *slot = value;
        true
    }

    /// `(field, value)` for every profile field, in display order.
    pub fn entries(&self) -> impl Iterator<Item = (ProfileField, &str)> {
        ProfileField::PROFILE
            .into_iter()
            .filter_map(|field| self.value(field).map(|value| (field, value)))
    }

    /// Name shown for the persona (`companyName` for empresa).
    #[must_use]
    pub fn display_name(&self) -> &str {
        display_name_field(&self.user_type)
            .and_then(|field| self.value(field))
            .unwrap_or(&self.full_name)
    }

    /// Fill an empty display-name field from the canonical username field.
    ///
    /// Sign-in responses and older sessions only carry `fullName`; an empresa
    /// still needs its `companyName` populated to render.
    pub fn backfill_display_name(&mut self) {
        let Some(display) = display_alias(&self.user_type, ProfileField::FullName) else {
            return;
        };
        if self.value(display).is_some_and(str::is_empty) {
            let full_name = self.full_name.clone();
            self.set(display, full_name);
        }
    }
}

#[cfg(test)]
#[path = "profile_test.rs"]
mod tests;
