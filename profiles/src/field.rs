//! Typed profile fields, session-store keys, and the display-name alias table.
//!
//! DESIGN
//! ======
//! Every persisted or submitted profile attribute is a `ProfileField`
//! variant. Wire names and session-store keys are derived from the variant,
//! so a misspelled key is a compile error instead of a silently empty value.
//!
//! The backing table keeps one shared username column for both personas.
//! `NAME_ALIASES` records which display-name field feeds that column for each
//! persona; serializers consult it instead of patching requests inline.

use std::fmt;

use crate::profile::UserType;

/// Namespace shared by every session-store key. Logout clears all of it.
pub const SESSION_KEY_PREFIX: &str = "user";

// =============================================================================
// FIELDS
// =============================================================================

/// A named attribute of a signed-in user's session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ProfileField {
    Id,
    Email,
    FullName,
    UserType,
    Phone,
    Skills,
    Experience,
    CompanyName,
    CompanyDescription,
    Website,
    Category,
    FoundedYear,
    CompanySize,
    Logo,
    Location,
    Address,
    /// Optional auth token returned by the sign-in call. Persisted but not
    /// part of `UserProfile`.
    Token,
}

impl ProfileField {
    /// Every field carried by a `UserProfile`, in display order.
    pub const PROFILE: [Self; 16] = [
        Self::Id,
        Self::Email,
        Self::FullName,
        Self::UserType,
        Self::Phone,
        Self::Skills,
        Self::Experience,
        Self::CompanyName,
        Self::CompanyDescription,
        Self::Website,
        Self::Category,
        Self::FoundedYear,
        Self::CompanySize,
        Self::Logo,
        Self::Location,
        Self::Address,
    ];

    /// JSON member name used by the profile service.
    #[must_use]
    pub const fn wire_name(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Email => "email",
            Self::FullName => "fullName",
            Self::UserType => "userType",
            Self::Phone => "phone",
            Self::Skills => "skills",
            Self::Experience => "experience",
            Self::CompanyName => "companyName",
            Self::CompanyDescription => "companyDescription",
            Self::Website => "website",
            Self::Category => "category",
            Self::FoundedYear => "foundedYear",
            Self::CompanySize => "companySize",
            Self::Logo => "logo",
            Self::Location => "location",
            Self::Address => "address",
            Self::Token => "token",
        }
    }

    /// Session-store key, always under [`SESSION_KEY_PREFIX`].
    #[must_use]
    pub const fn session_key(self) -> &'static str {
        match self {
            Self::Id => "userId",
            Self::Email => "userEmail",
            Self::FullName => "userFullName",
            Self::UserType => "userType",
            Self::Phone => "userPhone",
            Self::Skills => "userSkills",
            Self::Experience => "userExperience",
            Self::CompanyName => "userCompanyName",
            Self::CompanyDescription => "userCompanyDescription",
            Self::Website => "userWebsite",
            Self::Category => "userCategory",
            Self::FoundedYear => "userFoundedYear",
            Self::CompanySize => "userCompanySize",
            Self::Logo => "userLogo",
            Self::Location => "userLocation",
            Self::Address => "userAddress",
            Self::Token => "userToken",
        }
    }

    /// Look up a field by its JSON member name.
    #[must_use]
    pub fn from_wire_name(name: &str) -> Option<Self> {
        Self::PROFILE
            .into_iter()
            .chain([Self::Token])
            .find(|field| field.wire_name() == name)
    }

    /// Whether the editor for `user_type` lets the user change this field.
    /// Nothing is editable for an unrecognized persona.
    #[must_use]
    pub fn editable_by(self, user_type: &UserType) -> bool {
        match user_type {
            UserType::Alumno => matches!(
                self,
                Self::FullName | Self::Email | Self::Phone | Self::Skills | Self::Experience
            ),
            UserType::Empresa => matches!(
                self,
                Self::CompanyName
                    | Self::Email
                    | Self::Phone
                    | Self::CompanyDescription
                    | Self::Website
                    | Self::Category
                    | Self::FoundedYear
                    | Self::CompanySize
                    | Self::Logo
                    | Self::Location
                    | Self::Address
            ),
            UserType::Unrecognized(_) => false,
        }
    }
}

impl fmt::Display for ProfileField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

// =============================================================================
// DISPLAY-NAME ALIASES
// =============================================================================

/// Maps a persona's display-name field to the canonical username field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NameAlias {
    /// Persona this row applies to (`UserType::as_str`).
    pub persona: &'static str,
    /// Field the persona edits as its name.
    pub display: ProfileField,
    /// Field stored in the shared username column.
    pub canonical: ProfileField,
}

impl NameAlias {
    /// True when edits to `display` must be mirrored into `canonical`.
    #[must_use]
    pub fn is_distinct(&self) -> bool {
        self.display != self.canonical
    }
}

pub const NAME_ALIASES: [NameAlias; 2] = [
    NameAlias { persona: "alumno", display: ProfileField::FullName, canonical: ProfileField::FullName },
    NameAlias { persona: "empresa", display: ProfileField::CompanyName, canonical: ProfileField::FullName },
];

fn alias_for(user_type: &UserType) -> Option<&'static NameAlias> {
    NAME_ALIASES
        .iter()
        .find(|alias| alias.persona == user_type.as_str())
}

/// Field the persona edits as its display name.
#[must_use]
pub fn display_name_field(user_type: &UserType) -> Option<ProfileField> {
    alias_for(user_type).map(|alias| alias.display)
}

/// Canonical field an edit to `field` must also be submitted under, if any.
#[must_use]
pub fn canonical_alias(user_type: &UserType, field: ProfileField) -> Option<ProfileField> {
    alias_for(user_type)
        .filter(|alias| alias.is_distinct() && alias.display == field)
        .map(|alias| alias.canonical)
}

/// Display-name field that mirrors `canonical` for the persona, if any.
#[must_use]
pub fn display_alias(user_type: &UserType, canonical: ProfileField) -> Option<ProfileField> {
    alias_for(user_type)
        .filter(|alias| alias.is_distinct() && alias.canonical == canonical)
        .map(|alias| alias.display)
}

/// Alias rows whose display and canonical fields differ, for callers that do
/// not know the persona (the update endpoint).
pub fn distinct_aliases() -> impl Iterator<Item = &'static NameAlias> {
    NAME_ALIASES.iter().filter(|alias| alias.is_distinct())
}

#[cfg(test)]
#[path = "field_test.rs"]
mod tests;
