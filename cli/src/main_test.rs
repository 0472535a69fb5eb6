use clap::CommandFactory;

use super::*;

#[test]
fn cli_definition_is_valid() {
    Cli::command().debug_assert();
}

#[test]
fn assignment_uses_public_field_names() {
    assert_eq!(parse_assignment("phone=555 1234"), Ok((ProfileField::Phone, "555 1234".to_owned())));
    assert_eq!(parse_assignment("companyName=Acme"), Ok((ProfileField::CompanyName, "Acme".to_owned())));
}

#[test]
fn assignment_keeps_later_equals_in_value() {
    assert_eq!(parse_assignment("website=https://x.io/?a=b"), Ok((ProfileField::Website, "https://x.io/?a=b".to_owned())));
}

#[test]
fn assignment_allows_empty_value() {
    assert_eq!(parse_assignment("skills="), Ok((ProfileField::Skills, String::new())));
}

#[test]
fn assignment_without_equals_is_rejected() {
    assert_eq!(parse_assignment("phone"), Err(AssignmentError::MissingEquals("phone".to_owned())));
}

#[test]
fn assignment_with_unknown_field_is_rejected() {
    assert_eq!(parse_assignment("nickname=x"), Err(AssignmentError::UnknownField("nickname".to_owned())));
}

#[test]
fn edit_collects_repeated_sets() {
    let cli = Cli::try_parse_from(["profile-cli", "edit", "--set", "phone=1", "--set", "location=Lima"]).unwrap();
    let Command::Edit(args) = cli.command else { panic!("expected edit") };
    assert_eq!(
        args.set,
        vec![(ProfileField::Phone, "1".to_owned()), (ProfileField::Location, "Lima".to_owned())]
    );
}

#[test]
fn edit_requires_a_set() {
    assert!(Cli::try_parse_from(["profile-cli", "edit"]).is_err());
}

#[test]
fn edit_rejects_unknown_field() {
    assert!(Cli::try_parse_from(["profile-cli", "edit", "--set", "nickname=x"]).is_err());
}

#[test]
fn signin_provider_id_is_optional() {
    let cli = Cli::try_parse_from(["profile-cli", "signin", "--email", "a@b.com"]).unwrap();
    let Command::Signin(args) = cli.command else { panic!("expected signin") };
    assert_eq!(args.email, "a@b.com");
    assert!(args.provider_id.is_none());
}

#[test]
fn session_files_can_be_overridden() {
    let cli = Cli::try_parse_from(["profile-cli", "--session-file", "/tmp/tab-a.json", "logout"]).unwrap();
    assert_eq!(cli.session_file, PathBuf::from("/tmp/tab-a.json"));
    assert!(matches!(cli.command, Command::Logout));
}

#[test]
fn field_errors_list_only_failing_fields() {
    let fields = [ProfileField::Phone, ProfileField::FoundedYear];
    let errors = profiles::validate_changes(
        &profiles::UserType::Empresa,
        [(ProfileField::Phone, "600 111"), (ProfileField::FoundedYear, "19")],
    )
    .unwrap_err();

    let lines = field_errors(&fields, &errors);

    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with("  foundedYear: "));
}
