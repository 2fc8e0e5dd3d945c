//! Session context against the in-memory backend.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use futures::StreamExt;
use showmaster_core::ShowMasterError;
use showmaster_session::{
    FileTokenStorage, LoginForm, MemoryTokenStorage, RegistrationForm, SessionConfig,
    SessionContext, SessionStore, TokenStorage,
};
use showmaster_testing::{Call, MockBackend, fixtures};
use std::sync::Arc;
use std::time::Duration;

const POLL: Duration = Duration::from_millis(50);
const WAIT: Duration = Duration::from_secs(3);

fn config() -> SessionConfig {
    SessionConfig::default().with_poll_interval(POLL)
}

fn context(backend: &MockBackend, storage: MemoryTokenStorage) -> SessionContext<MockBackend> {
    SessionContext::new(Arc::new(backend.clone()), SessionStore::new(storage, config()))
}

#[tokio::test]
async fn rejected_token_clears_session() {
    let backend = MockBackend::new().with_profile_error(
        "abc",
        ShowMasterError::Authentication("expired".into()),
    );
    let storage = MemoryTokenStorage::new().with_token("abc");
    let ctx = context(&backend, storage.clone());

    assert_eq!(ctx.refresh().await, None);
    assert_eq!(ctx.session().token(), None);
    assert_eq!(storage.load().unwrap(), None);
    assert!(!ctx.is_logged_in());
}

#[tokio::test]
async fn remote_failure_keeps_token() {
    let backend = MockBackend::new().with_profile_error(
        "abc",
        ShowMasterError::Remote {
            status: Some(503),
            message: "maintenance".into(),
        },
    );
    let ctx = context(&backend, MemoryTokenStorage::new().with_token("abc"));

    assert_eq!(ctx.refresh().await, None);
    assert_eq!(ctx.session().token().as_deref(), Some("abc"));
    assert!(!ctx.is_logged_in());
}

#[tokio::test]
async fn no_token_means_no_remote_call() {
    let backend = MockBackend::new();
    let ctx = context(&backend, MemoryTokenStorage::new());

    assert_eq!(ctx.refresh().await, None);
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn login_stores_token_and_loads_profile() {
    let backend = MockBackend::new().with_account("pw", "tok-1", fixtures::admin(1, "root"));
    let storage = MemoryTokenStorage::new();
    let ctx = context(&backend, storage.clone());

    let profile = ctx.login(&LoginForm::new("root", "pw")).await.unwrap();
    assert_eq!(profile.username, "root");
    assert_eq!(storage.load().unwrap().as_deref(), Some("tok-1"));
    assert!(ctx.is_logged_in());
    assert!(ctx.is_admin());

    ctx.logout().unwrap();
    assert!(!ctx.is_logged_in());
    assert_eq!(ctx.profile(), None);
    assert_eq!(storage.load().unwrap(), None);
}

#[tokio::test]
async fn bad_credentials_leave_session_empty() {
    let backend = MockBackend::new().with_account("pw", "tok-1", fixtures::user(3, "ann"));
    let ctx = context(&backend, MemoryTokenStorage::new());

    let err = ctx.login(&LoginForm::new("ann", "wrong")).await.unwrap_err();
    assert!(err.is_authentication());
    assert_eq!(ctx.session().token(), None);
}

#[tokio::test]
async fn missing_login_field_never_calls_backend() {
    let backend = MockBackend::new();
    let ctx = context(&backend, MemoryTokenStorage::new());

    let err = ctx.login(&LoginForm::new("ann", "")).await.unwrap_err();
    assert!(matches!(err, ShowMasterError::Validation(_)));
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn registration_passes_message_through() {
    let backend = MockBackend::new().with_registration(Ok("User added: ann".into()));
    let ctx = context(&backend, MemoryTokenStorage::new());

    let form = RegistrationForm {
        name: "ann".into(),
        email: "ann@example.com".into(),
        password: "pw".into(),
        ..RegistrationForm::default()
    };
    assert_eq!(ctx.register(&form).await.unwrap(), "User added: ann");
    assert_eq!(backend.count(|c| matches!(c, Call::Register(_))), 1);

    let incomplete = RegistrationForm {
        password: String::new(),
        ..form
    };
    assert!(ctx.register(&incomplete).await.is_err());
    assert_eq!(backend.calls().len(), 1);
}

#[tokio::test]
async fn deleted_token_is_observed_within_one_poll() {
    let storage = MemoryTokenStorage::without_notifications().with_token("abc");
    let store = SessionStore::new(storage.clone(), config());
    let mut tokens = store.observe();
    assert_eq!(tokens.next().await, Some(Some("abc".to_string())));

    storage.clear().unwrap();
    // one interval plus scheduling slack
    let next = tokio::time::timeout(POLL * 3, tokens.next()).await.unwrap();
    assert_eq!(next, Some(None));
    assert_eq!(store.token(), None);
}

#[tokio::test]
async fn profile_is_dropped_whenever_the_token_goes() {
    let backend = MockBackend::new().with_account("pw", "tok-1", fixtures::admin(1, "root"));
    let storage = MemoryTokenStorage::new();
    let ctx = context(&backend, storage.clone());
    let login = LoginForm::new("root", "pw");

    // blank token through the store
    ctx.login(&login).await.unwrap();
    let mut profiles = ctx.subscribe_profile();
    ctx.session().set_token("").unwrap();
    assert_eq!(ctx.session().token(), None);
    assert_eq!(ctx.profile(), None);
    assert!(!ctx.is_admin());
    assert!(!ctx.is_logged_in());
    assert!(profiles.borrow_and_update().is_none());

    // explicit clear
    ctx.login(&login).await.unwrap();
    ctx.session().clear().unwrap();
    assert_eq!(ctx.profile(), None);
    assert!(!ctx.is_admin());

    // deleted from storage, picked up by reconcile
    ctx.login(&login).await.unwrap();
    assert!(ctx.is_admin());
    storage.clear().unwrap();
    assert!(ctx.session().reconcile());
    assert_eq!(ctx.session().token(), None);
    assert_eq!(ctx.profile(), None);
    assert!(!ctx.is_admin());
}

#[tokio::test]
async fn replaced_token_hides_the_old_profile() {
    let backend = MockBackend::new().with_account("pw", "tok-1", fixtures::admin(1, "root"));
    let ctx = context(&backend, MemoryTokenStorage::new());

    ctx.login(&LoginForm::new("root", "pw")).await.unwrap();
    ctx.session().set_token("someone-else").unwrap();
    assert_eq!(ctx.profile(), None);
    assert!(!ctx.is_admin());
}

#[tokio::test]
async fn running_context_follows_external_login() {
    let backend = MockBackend::new().with_profile("tok-2", fixtures::user(3, "ann"));
    let storage = MemoryTokenStorage::new();
    let ctx = context(&backend, storage.clone());
    let mut profiles = ctx.subscribe_profile();
    let task = ctx.spawn();

    storage.store("tok-2").unwrap();
    tokio::time::timeout(WAIT, profiles.wait_for(Option::is_some))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(ctx.profile().unwrap().username, "ann");

    storage.clear().unwrap();
    tokio::time::timeout(WAIT, profiles.wait_for(Option::is_none))
        .await
        .unwrap()
        .unwrap();

    task.abort();
}

#[tokio::test]
async fn file_sessions_reconcile_across_stores() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    let ours = SessionStore::new(FileTokenStorage::new(&path), config());
    let theirs = SessionStore::new(FileTokenStorage::new(&path), config());

    let mut tokens = ours.observe();
    assert_eq!(tokens.next().await, Some(None));

    theirs.set_token("shared").unwrap();
    let next = tokio::time::timeout(WAIT, tokens.next()).await.unwrap();
    assert_eq!(next, Some(Some("shared".to_string())));

    theirs.clear().unwrap();
    let next = tokio::time::timeout(WAIT, tokens.next()).await.unwrap();
    assert_eq!(next, Some(None));
}
