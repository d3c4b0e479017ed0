mod support;

use academy_core::domain::{
    errors::AccessError,
    user::{Email, FullName, NewUser, PasswordHash, PhoneNumber, UserId, UserRepository},
};
use chrono::Duration;
use support::*;

#[tokio::test]
async fn access_token_resolves_to_its_subject() {
    let app = TestApp::new();
    let auth = register_student(&app, 1).await;

    let user = app
        .services
        .authenticate(&auth.tokens.access_token)
        .await
        .expect("authenticate");

    assert_eq!(uuid::Uuid::from(user.id), auth.user.id);
    assert_eq!(user.expires_at, auth.tokens.access_expires_at);
    assert_eq!(auth.tokens.token_type, "Bearer");
    assert_eq!(auth.tokens.expires_in, 15 * 60);
}

#[tokio::test]
async fn access_token_expires_exactly_at_its_expiry() {
    let app = TestApp::new();
    let auth = register_student(&app, 1).await;

    app.clock.advance(Duration::minutes(15) - Duration::seconds(1));
    assert!(app.services.authenticate(&auth.tokens.access_token).await.is_ok());

    app.clock.advance(Duration::seconds(1));
    let err = app
        .services
        .authenticate(&auth.tokens.access_token)
        .await
        .expect_err("expired token");
    assert_eq!(err.access_kind(), Some(AccessError::TokenExpired));
}

#[tokio::test]
async fn tokens_are_not_interchangeable() {
    let app = TestApp::new();
    let auth = register_student(&app, 1).await;

    let err = app
        .services
        .authenticate(&auth.tokens.refresh_token)
        .await
        .expect_err("refresh token is not an access token");
    assert_eq!(err.access_kind(), Some(AccessError::InvalidToken));

    let err = app
        .services
        .token_issuer()
        .verify_refresh(&auth.tokens.access_token)
        .expect_err("access token is not a refresh token");
    assert_eq!(err.access_kind(), Some(AccessError::InvalidRefreshToken));
}

#[tokio::test]
async fn garbage_and_tampered_tokens_are_invalid() {
    let app = TestApp::new();
    let auth = register_student(&app, 1).await;

    for token in ["", "not-a-jwt", "a.b.c"] {
        let err = app.services.authenticate(token).await.expect_err(token);
        assert_eq!(err.access_kind(), Some(AccessError::InvalidToken));
    }

    let other = register_student(&app, 2).await;
    let own: Vec<&str> = auth.tokens.access_token.split('.').collect();
    let foreign: Vec<&str> = other.tokens.access_token.split('.').collect();
    let spliced = format!("{}.{}.{}", own[0], foreign[1], own[2]);
    let err = app
        .services
        .authenticate(&spliced)
        .await
        .expect_err("payload does not match signature");
    assert_eq!(err.access_kind(), Some(AccessError::InvalidToken));
}

#[tokio::test]
async fn token_for_unknown_subject_is_invalid() {
    let app = TestApp::new();
    let token = app
        .services
        .token_issuer()
        .issue_access(UserId::generate())
        .expect("issue")
        .token;

    let err = app.services.authenticate(&token).await.expect_err("unknown subject");
    assert_eq!(err.access_kind(), Some(AccessError::InvalidToken));
}

#[tokio::test]
async fn deactivated_account_cannot_authenticate() {
    let app = TestApp::new();
    let user = UserRepository::insert(
        app.store.as_ref(),
        NewUser::registration(
            Email::new("dormant@example.com").unwrap(),
            PhoneNumber::new("0921234567").unwrap(),
            FullName::new("Dormant Account").unwrap(),
            PasswordHash::new(format!("hash::{PASSWORD}")).unwrap(),
            app.clock_now(),
        )
        .with_is_active(false),
    )
    .await
    .unwrap();

    let token = app.services.token_issuer().issue_access(user.id).unwrap().token;
    let err = app.services.authenticate(&token).await.expect_err("inactive");
    assert_eq!(err.access_kind(), Some(AccessError::UserNotActive));
}

#[tokio::test]
async fn profile_reports_remaining_session_time() {
    let app = TestApp::new();
    let actor = student(&app, 1).await;
    app.clock.advance(Duration::minutes(5));

    let profile = app.services.user_queries.get_profile(&actor).await.unwrap();
    assert_eq!(profile.user.email, student_email(1));
    assert_eq!(profile.session_expires_in, 10 * 60);
}
