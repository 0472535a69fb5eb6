use super::*;

// =============================================================================
// UserType
// =============================================================================

#[test]
fn user_type_parses_known_personas() {
    assert_eq!(UserType::parse("alumno"), UserType::Alumno);
    assert_eq!(UserType::parse("empresa"), UserType::Empresa);
}

#[test]
fn user_type_keeps_unknown_value_verbatim() {
    let parsed = UserType::parse("Empresa");
    assert_eq!(parsed, UserType::Unrecognized("Empresa".into()));
    assert_eq!(parsed.as_str(), "Empresa");
    assert!(!parsed.is_recognized());
}

#[test]
fn user_type_serializes_as_plain_string() {
    let json = serde_json::to_string(&UserType::Empresa).unwrap();
    assert_eq!(json, "\"empresa\"");
    let back: UserType = serde_json::from_str("\"mentor\"").unwrap();
    assert_eq!(back, UserType::Unrecognized("mentor".into()));
}

// =============================================================================
// UserProfile
// =============================================================================

#[test]
fn profile_json_uses_camel_case_names() {
    let mut profile = UserProfile::new("42");
    profile.full_name = "Ana".into();
    profile.company_size = "11-50".into();
    let value = serde_json::to_value(&profile).unwrap();
    assert_eq!(value["fullName"], "Ana");
    assert_eq!(value["userType"], "alumno");
    assert_eq!(value["companySize"], "11-50");
}

#[test]
fn profile_json_defaults_missing_optional_fields() {
    let profile: UserProfile = serde_json::from_str(r#"{"id":"7","email":"e@x.io"}"#).unwrap();
    assert_eq!(profile.id, "7");
    assert_eq!(profile.email, "e@x.io");
    assert_eq!(profile.user_type, UserType::Alumno);
    assert!(profile.skills.is_empty());
    assert!(profile.address.is_empty());
}

#[test]
fn set_then_value_returns_same_string() {
    let mut profile = UserProfile::new("1");
    for field in ProfileField::PROFILE {
        if field == ProfileField::UserType {
            continue;
        }
        assert!(profile.set(field, format!("v-{field}")));
        assert_eq!(profile.value(field), Some(format!("v-{field}").as_str()));
    }
}

#[test]
fn set_user_type_parses() {
    let mut profile = UserProfile::new("1");
    profile.set(ProfileField::UserType, "empresa");
    assert_eq!(profile.user_type, UserType::Empresa);
}

#[test]
fn token_is_not_a_profile_value() {
    let mut profile = UserProfile::new("1");
    assert!(!profile.set(ProfileField::Token, "abc"));
    assert_eq!(profile.value(ProfileField::Token), None);
    assert_eq!(profile.entries().count(), 16);
}

#[test]
fn display_name_follows_persona() {
    let mut profile = UserProfile::new("1");
    profile.full_name = "Ana".into();
    profile.company_name = "Acme".into();
    assert_eq!(profile.display_name(), "Ana");
    profile.user_type = UserType::Empresa;
    assert_eq!(profile.display_name(), "Acme");
    profile.user_type = UserType::Unrecognized("x".into());
    assert_eq!(profile.display_name(), "Ana");
}

#[test]
fn backfill_copies_full_name_into_empty_company_name() {
    let mut profile = UserProfile::new("1");
    profile.user_type = UserType::Empresa;
    profile.full_name = "Acme".into();
    profile.backfill_display_name();
    assert_eq!(profile.company_name, "Acme");
}

#[test]
fn backfill_keeps_existing_company_name() {
    let mut profile = UserProfile::new("1");
    profile.user_type = UserType::Empresa;
    profile.full_name = "Old".into();
    profile.company_name = "New".into();
    profile.backfill_display_name();
    assert_eq!(profile.company_name, "New");
}

#[test]
fn backfill_is_noop_for_alumno() {
    let mut profile = UserProfile::new("1");
    profile.full_name = "Ana".into();
    profile.backfill_display_name();
    assert!(profile.company_name.is_empty());
}
