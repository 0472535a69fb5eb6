use super::*;
use crate::state::test_helpers::{MemoryAccounts, alumno_row, empresa_row};

fn request(email: Option<&str>, full_name: Option<&str>, provider_id: Option<&str>) -> ProviderSignInRequest {
    ProviderSignInRequest {
        email: email.map(str::to_owned),
        full_name: full_name.map(str::to_owned),
        provider_id: provider_id.map(str::to_owned),
    }
}

#[tokio::test]
async fn missing_keys_is_unsuccessful() {
    let store = MemoryAccounts::default();
    for req in [
        request(None, Some("Ana"), Some("uid-1")),
        request(Some("a@b.com"), Some("Ana"), None),
        request(Some("not-an-email"), None, Some("uid-1")),
        request(Some("a@b.com"), None, Some("  ")),
    ] {
        let resp = sign_in(&store, &req).await.unwrap();
        assert!(!resp.success);
        assert!(resp.usuario.is_none());
    }
    assert!(store.created.lock().unwrap().is_empty());
}

#[tokio::test]
async fn existing_account_by_provider_id() {
    let store = MemoryAccounts::with_rows(vec![alumno_row()]);
    let resp = sign_in(&store, &request(Some("other@b.com"), None, Some("uid-1")))
        .await
        .unwrap();
    let user = resp.usuario.unwrap();
    assert!(resp.success);
    assert_eq!(user.id, "42");
    assert_eq!(user.email.as_deref(), Some("a@b.com"));
    assert_eq!(user.full_name.as_deref(), Some("Ana"));
    assert_eq!(user.tipo_usuario.as_deref(), Some("alumno"));
}

#[tokio::test]
async fn existing_account_by_email_is_linked_and_verified() {
    let store = MemoryAccounts::with_rows(vec![empresa_row()]);
    let resp = sign_in(&store, &request(Some("HR@acme.test"), Some("Someone"), Some("g-77")))
        .await
        .unwrap();

    let user = resp.usuario.unwrap();
    assert_eq!(user.id, "7");
    assert_eq!(user.full_name.as_deref(), Some("Acme"));
    assert_eq!(user.tipo_usuario.as_deref(), Some("empresa"));
    let rows = store.rows.lock().unwrap();
    assert_eq!(rows[0].google_id.as_deref(), Some("g-77"));
    assert!(rows[0].verificado);
}

#[tokio::test]
async fn new_account_is_created_as_verified_alumno() {
    let store = MemoryAccounts::default();
    let resp = sign_in(&store, &request(Some("new@b.com"), Some("Nuevo Alumno"), Some("g-1")))
        .await
        .unwrap();

    assert!(resp.success);
    let user = resp.usuario.unwrap();
    assert_eq!(user.id, "1");
    assert_eq!(user.full_name.as_deref(), Some("Nuevo Alumno"));
    assert_eq!(user.tipo_usuario.as_deref(), Some(DEFAULT_USER_TYPE));

    let created = store.created.lock().unwrap();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].telefono, DEFAULT_PHONE);
    assert_eq!(created[0].codigo_pais, DEFAULT_COUNTRY_CODE);
    assert_eq!(created[0].google_id, "g-1");
    assert_eq!(created[0].password_hash.len(), 64);
}

#[tokio::test]
async fn new_account_without_name_uses_email_local_part() {
    let store = MemoryAccounts::default();
    let resp = sign_in(&store, &request(Some("maria.lopez@uni.test"), Some(" "), Some("g-2")))
        .await
        .unwrap();
    assert_eq!(resp.usuario.unwrap().full_name.as_deref(), Some("maria.lopez"));
}

#[tokio::test]
async fn store_failure_propagates() {
    let store = MemoryAccounts::failing();
    let err = sign_in(&store, &request(Some("a@b.com"), None, Some("uid-1")))
        .await
        .unwrap_err();
    assert!(matches!(err, AccountError::Db(_)));
}

#[test]
fn name_from_email_falls_back_to_user() {
    assert_eq!(name_from_email("ana@b.com"), "ana");
    assert_eq!(name_from_email("@b.com"), "user");
}

#[test]
fn unusable_password_hashes_differ() {
    let a = unusable_password_hash();
    let b = unusable_password_hash();
    assert_eq!(a.len(), 64);
    assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    assert_ne!(a, b);
}
