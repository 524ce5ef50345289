//! Tests for the credential service.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ErrorCode;
use crate::domain::ports::MockUserRepository;
use crate::domain::token::claim_str;
use crate::domain::{MIN_COST, TokenSettings};
use crate::outbound::persistence::InMemoryUserRepository;
use crate::test_support::{FixtureClock, fast_hasher, fixture_instant};

fn clock() -> Arc<dyn Clock> {
    Arc::new(FixtureClock::at(fixture_instant()))
}

fn tokens() -> TokenIssuer {
    TokenIssuer::new(
        TokenSettings::new(b"unit-secret".to_vec(), Some("appliedTo".into()), Duration::hours(1)),
        clock(),
    )
}

fn make_service<R>(repo: Arc<R>) -> CredentialService<R> {
    CredentialService::new(repo, fast_hasher(), tokens(), clock())
}

fn draft(email: &str, password: &str) -> UserDraft {
    UserDraft {
        first_name: " Ann ".into(),
        last_name: "Lee".into(),
        email: email.into(),
        password: password.into(),
    }
}

#[fixture]
fn repo() -> Arc<InMemoryUserRepository> {
    Arc::new(InMemoryUserRepository::new())
}

#[rstest]
#[tokio::test]
async fn register_then_login_round_trip(repo: Arc<InMemoryUserRepository>) {
    let service = make_service(Arc::clone(&repo));

    let token = service
        .register_user(draft("ann@EXAMPLE.com", "correct-horse"))
        .await
        .expect("registration succeeds");

    let email = NormalizedEmail::parse("ann@example.com").expect("valid email");
    let stored = repo
        .find_by_email(&email)
        .await
        .expect("lookup")
        .expect("user stored");
    assert_eq!(stored.first_name, "Ann");
    assert_eq!(stored.created_at, fixture_instant());

    let claims = tokens().verify(token.as_str()).expect("token verifies");
    assert_eq!(claim_str(&claims, "sub"), Some(stored.id.as_ref()));
    assert_eq!(claim_str(&claims, "eml"), Some("ann@example.com"));

    service
        .login(&LoginCredentials::new("ann@example.com", "correct-horse"))
        .await
        .expect("login succeeds");
    let err = service
        .login(&LoginCredentials::new("ann@example.com", "wrong"))
        .await
        .expect_err("wrong password");
    assert_eq!(err, CredentialError::InvalidCredentials);
}

#[rstest]
#[tokio::test]
async fn equivalent_emails_collide(repo: Arc<InMemoryUserRepository>) {
    let service = make_service(repo);
    service
        .register_user(draft("Foo@Example.com ", "pw-one"))
        .await
        .expect("first registration");

    let err = service
        .register_user(draft("foo@example.com", "pw-two"))
        .await
        .expect_err("second registration");
    assert_eq!(err, CredentialError::EmailInUse);
}

#[rstest]
#[case(draft("ann@example.com", ""), "password")]
#[case(draft("", "pw"), "email")]
#[case(UserDraft { first_name: "   ".into(), ..draft("ann@example.com", "pw") }, "firstname")]
#[case(UserDraft { last_name: String::new(), ..draft("ann@example.com", "pw") }, "lastname")]
#[tokio::test]
async fn register_reports_missing_fields(
    repo: Arc<InMemoryUserRepository>,
    #[case] input: UserDraft,
    #[case] field: &str,
) {
    let err = make_service(repo)
        .register_user(input)
        .await
        .expect_err("validation failure");
    match err {
        CredentialError::Validation(inner) => assert_eq!(inner.field(), field),
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[rstest]
#[tokio::test]
async fn register_rejects_malformed_email(repo: Arc<InMemoryUserRepository>) {
    let err = make_service(repo)
        .register_user(draft("not-an-email", "pw"))
        .await
        .expect_err("invalid email");
    assert_eq!(err, CredentialError::InvalidEmail(EmailError::Invalid));
    assert_eq!(Error::from(err).code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[case("nobody@example.com")]
#[case("not an email")]
#[case("")]
#[tokio::test]
async fn login_failures_are_indistinguishable(
    repo: Arc<InMemoryUserRepository>,
    #[case] email: &str,
) {
    let service = make_service(repo);
    service
        .register_user(draft("ann@example.com", "correct-horse"))
        .await
        .expect("registration");

    let err = service
        .login(&LoginCredentials::new(email, "correct-horse"))
        .await
        .expect_err("login fails");
    assert_eq!(err, CredentialError::InvalidCredentials);
    assert_eq!(Error::from(err).message(), "invalid credentials");
}

#[tokio::test]
async fn insert_time_duplicate_maps_to_email_in_use() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_email().times(1).return_once(|_| Ok(None));
    repo.expect_insert()
        .times(1)
        .return_once(|_| Err(UserPersistenceError::duplicate_key("ann@example.com")));

    let err = make_service(Arc::new(repo))
        .register_user(draft("ann@example.com", "pw"))
        .await
        .expect_err("race lost");
    assert_eq!(err, CredentialError::EmailInUse);
    assert_eq!(Error::from(err).code(), ErrorCode::Conflict);
}

#[tokio::test]
async fn connection_failures_surface_as_unavailable() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_email()
        .times(1)
        .return_once(|_| Err(UserPersistenceError::connection("pool exhausted")));

    let err = make_service(Arc::new(repo))
        .login(&LoginCredentials::new("ann@example.com", "pw"))
        .await
        .expect_err("repository down");
    assert_eq!(Error::from(err).code(), ErrorCode::ServiceUnavailable);
}

#[rstest]
#[tokio::test]
async fn login_upgrades_weak_hashes(repo: Arc<InMemoryUserRepository>) {
    let weak = CredentialService::new(Arc::clone(&repo), fast_hasher(), tokens(), clock());
    weak.register_user(draft("ann@example.com", "correct-horse"))
        .await
        .expect("registration");

    let stronger = PasswordHasher::new(MIN_COST + 1);
    let service = CredentialService::new(Arc::clone(&repo), stronger.clone(), tokens(), clock());
    service
        .login(&LoginCredentials::new("ann@example.com", "correct-horse"))
        .await
        .expect("login succeeds");

    let email = NormalizedEmail::parse("ann@example.com").expect("valid email");
    let stored = repo
        .find_by_email(&email)
        .await
        .expect("lookup")
        .expect("user stored");
    assert!(!stronger.needs_rehash(&stored.password_hash));
    assert!(stronger.verify(&stored.password_hash, "correct-horse"));
}

#[rstest]
#[tokio::test]
async fn failed_hash_upgrade_does_not_fail_login(repo: Arc<InMemoryUserRepository>) {
    let weak = CredentialService::new(Arc::clone(&repo), fast_hasher(), tokens(), clock());
    weak.register_user(draft("ann@example.com", "correct-horse"))
        .await
        .expect("registration");
    let email = NormalizedEmail::parse("ann@example.com").expect("valid email");
    let stored = repo
        .find_by_email(&email)
        .await
        .expect("lookup")
        .expect("user stored");

    let reloaded = stored.clone();
    let mut mock = MockUserRepository::new();
    mock.expect_find_by_email()
        .times(1)
        .return_once(move |_| Ok(Some(stored)));
    mock.expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(reloaded)));
    mock.expect_update()
        .times(1)
        .return_once(|_| Err(UserPersistenceError::query("read-only replica")));

    let service = CredentialService::new(
        Arc::new(mock),
        PasswordHasher::new(MIN_COST + 1),
        tokens(),
        clock(),
    );
    service
        .authenticate(LoginCredentials::new("ann@example.com", "correct-horse"))
        .await
        .expect("login still succeeds");
}

/// User store that applies `edit` to the matched record right after the login
/// lookup, standing in for a request that lands mid-login.
struct EditAfterLookup {
    inner: InMemoryUserRepository,
    edit: fn(&mut User),
}

#[async_trait]
impl UserRepository for EditAfterLookup {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        self.inner.find_by_id(id).await
    }

    async fn find_by_email(
        &self,
        email: &NormalizedEmail,
    ) -> Result<Option<User>, UserPersistenceError> {
        let found = self.inner.find_by_email(email).await?;
        if let Some(user) = &found {
            let mut edited = user.clone();
            (self.edit)(&mut edited);
            self.inner.update(&edited).await?;
        }
        Ok(found)
    }

    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        self.inner.insert(user).await
    }

    async fn update(&self, user: &User) -> Result<(), UserPersistenceError> {
        self.inner.update(user).await
    }

    async fn delete(&self, id: &UserId) -> Result<u64, UserPersistenceError> {
        self.inner.delete(id).await
    }
}

async fn registered_weak(inner: &InMemoryUserRepository) -> User {
    let weak = CredentialService::new(Arc::new(inner.clone()), fast_hasher(), tokens(), clock());
    weak.register_user(draft("ann@example.com", "correct-horse"))
        .await
        .expect("registration");
    let email = NormalizedEmail::parse("ann@example.com").expect("valid email");
    inner
        .find_by_email(&email)
        .await
        .expect("lookup")
        .expect("user stored")
}

#[tokio::test]
async fn hash_upgrade_keeps_edits_made_during_login() {
    let inner = InMemoryUserRepository::new();
    let original = registered_weak(&inner).await;
    let repo = Arc::new(EditAfterLookup {
        inner: inner.clone(),
        edit: |user| user.last_name = "Concurrent".into(),
    });
    let stronger = PasswordHasher::new(MIN_COST + 1);
    let service = CredentialService::new(repo, stronger.clone(), tokens(), clock());

    service
        .login(&LoginCredentials::new("ann@example.com", "correct-horse"))
        .await
        .expect("login succeeds");

    let stored = inner
        .find_by_id(&original.id)
        .await
        .expect("lookup")
        .expect("present");
    assert_eq!(stored.last_name, "Concurrent");
    assert!(!stronger.needs_rehash(&stored.password_hash));
    assert!(stronger.verify(&stored.password_hash, "correct-horse"));
}

#[tokio::test]
async fn hash_upgrade_never_restores_a_replaced_password() {
    let inner = InMemoryUserRepository::new();
    let original = registered_weak(&inner).await;
    let repo = Arc::new(EditAfterLookup {
        inner: inner.clone(),
        edit: |user| {
            user.password_hash = PasswordHasher::new(MIN_COST)
                .hash("battery-staple")
                .expect("hash");
        },
    });
    let service = CredentialService::new(repo, PasswordHasher::new(MIN_COST + 1), tokens(), clock());

    service
        .login(&LoginCredentials::new("ann@example.com", "correct-horse"))
        .await
        .expect("login verified against the looked-up hash");

    let stored = inner
        .find_by_id(&original.id)
        .await
        .expect("lookup")
        .expect("present");
    let hasher = fast_hasher();
    assert!(hasher.verify(&stored.password_hash, "battery-staple"));
    assert!(!hasher.verify(&stored.password_hash, "correct-horse"));
}
