mod support;

use academy_core::application::{
    ApplicationResult,
    commands::users::{
        ChangePasswordCommand, LoginUserCommand, LogoutCommand, RefreshTokenCommand,
    },
    dto::TokenPairDto,
};
use academy_core::application::ports::{ClockPort, security::TokenIssuer};
use academy_core::domain::{
    errors::AccessError,
    session::{NewRefreshToken, RefreshTokenRepository, TokenHash},
    user::{Email, FullName, NewUser, PasswordHash, PhoneNumber, UserRepository},
};
use academy_core::infrastructure::security::token::JwtTokenIssuer;
use chrono::Duration;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use support::*;

async fn refresh(app: &TestApp, token: &str) -> ApplicationResult<TokenPairDto> {
    app.services
        .user_commands
        .refresh_token(RefreshTokenCommand {
            refresh_token: token.to_string(),
        })
        .await
}

async fn login(app: &TestApp, identifier: &str, password: &str) -> String {
    app.services
        .user_commands
        .login(LoginUserCommand {
            identifier: identifier.into(),
            password: password.into(),
        })
        .await
        .expect("login")
        .tokens
        .refresh_token
}

#[tokio::test]
async fn rotation_issues_a_new_pair_and_retires_the_old_token() {
    let app = TestApp::new();
    let auth = register_student(&app, 1).await;

    let rotated = refresh(&app, &auth.tokens.refresh_token).await.expect("first refresh");
    assert_ne!(rotated.refresh_token, auth.tokens.refresh_token);
    assert!(app.services.authenticate(&rotated.access_token).await.is_ok());

    let err = refresh(&app, &auth.tokens.refresh_token)
        .await
        .expect_err("reused refresh token");
    assert_eq!(err.access_kind(), Some(AccessError::RefreshTokenRevoked));

    assert!(refresh(&app, &rotated.refresh_token).await.is_ok());
}

#[tokio::test]
async fn failed_revoke_still_hands_out_the_new_pair() {
    let revokes = Arc::new(AtomicU32::new(0));
    let counter = Arc::clone(&revokes);
    let app = TestAppBuilder::new()
        .refresh_repo(move |store| {
            let repo: Arc<dyn RefreshTokenRepository> =
                Arc::new(FailingRevokeRepo::new(store, counter));
            repo
        })
        .build();
    let auth = register_student(&app, 1).await;

    let rotated = refresh(&app, &auth.tokens.refresh_token)
        .await
        .expect("rotation succeeds despite the failed revoke");
    assert_eq!(revokes.load(Ordering::SeqCst), 1);
    assert!(app.services.authenticate(&rotated.access_token).await.is_ok());
    assert!(refresh(&app, &rotated.refresh_token).await.is_ok());

    // The presented token was never retired, so it still rotates.
    assert!(refresh(&app, &auth.tokens.refresh_token).await.is_ok());
}

#[tokio::test]
async fn refresh_for_an_inactive_account_is_refused() {
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

    // A session minted before the account was switched off.
    let clock: Arc<ClockPort> = app.clock.clone();
    let issuer = JwtTokenIssuer::new(&test_token_settings(), clock).unwrap();
    let issued = issuer.issue_refresh(user.id).unwrap();
    RefreshTokenRepository::insert(
        app.store.as_ref(),
        NewRefreshToken {
            user_id: user.id,
            token_hash: TokenHash::of(&issued.token),
            expires_at: issued.expires_at,
            created_at: app.clock_now(),
        },
    )
    .await
    .unwrap();

    let err = refresh(&app, &issued.token).await.expect_err("inactive account");
    assert_eq!(err.access_kind(), Some(AccessError::UserNotActive));

    let record = app
        .store
        .find_by_hash(&TokenHash::of(&issued.token))
        .await
        .unwrap()
        .expect("ledger row");
    assert!(!record.revoked);
}

#[tokio::test]
async fn refresh_token_outlives_access_token_but_not_its_own_ttl() {
    let app = TestApp::new();
    let auth = register_student(&app, 1).await;

    app.clock.advance(Duration::days(1));
    let err = app
        .services
        .authenticate(&auth.tokens.access_token)
        .await
        .expect_err("access token is long gone");
    assert_eq!(err.access_kind(), Some(AccessError::TokenExpired));
    let rotated = refresh(&app, &auth.tokens.refresh_token).await.expect("still valid");

    app.clock.advance(Duration::days(8));
    let err = refresh(&app, &rotated.refresh_token)
        .await
        .expect_err("past refresh ttl");
    assert_eq!(err.access_kind(), Some(AccessError::RefreshTokenExpired));
}

#[tokio::test]
async fn access_token_is_not_accepted_for_refresh() {
    let app = TestApp::new();
    let auth = register_student(&app, 1).await;

    let err = refresh(&app, &auth.tokens.access_token)
        .await
        .expect_err("wrong token kind");
    assert_eq!(err.access_kind(), Some(AccessError::InvalidRefreshToken));
}

#[tokio::test]
async fn signed_token_missing_from_the_ledger_is_rejected() {
    let app = TestApp::new();
    let auth = register_student(&app, 1).await;
    let forged = app
        .services
        .token_issuer()
        .issue_refresh(auth.user.id.into())
        .expect("issue")
        .token;

    let err = refresh(&app, &forged).await.expect_err("never persisted");
    assert_eq!(err.access_kind(), Some(AccessError::InvalidRefreshToken));
}

#[tokio::test]
async fn logout_revokes_one_session_and_ignores_unknown_tokens() {
    let app = TestApp::new();
    let first = register_student(&app, 1).await.tokens.refresh_token;
    let second = login(&app, &student_email(1), PASSWORD).await;

    app.services
        .user_commands
        .logout(LogoutCommand {
            refresh_token: first.clone(),
        })
        .await
        .expect("logout");

    let err = refresh(&app, &first).await.expect_err("logged out");
    assert_eq!(err.access_kind(), Some(AccessError::RefreshTokenRevoked));
    assert!(refresh(&app, &second).await.is_ok());

    app.services
        .user_commands
        .logout(LogoutCommand {
            refresh_token: "never-issued".into(),
        })
        .await
        .expect("unknown token is not an error");
    app.services
        .user_commands
        .logout(LogoutCommand {
            refresh_token: first,
        })
        .await
        .expect("second logout is not an error");
}

#[tokio::test]
async fn logout_all_revokes_every_session_of_the_caller_only() {
    let app = TestApp::new();
    let auth = register_student(&app, 1).await;
    let by_phone = login(&app, &student_phone(1), PASSWORD).await;
    let by_email = login(&app, &student_email(1), PASSWORD).await;
    let bystander = register_student(&app, 2).await.tokens.refresh_token;

    let actor = authenticate(&app, &auth).await;
    let revoked = app.services.user_commands.logout_all(&actor).await.unwrap();
    assert_eq!(revoked, 3);

    for token in [&auth.tokens.refresh_token, &by_phone, &by_email] {
        let err = refresh(&app, token).await.expect_err("revoked");
        assert_eq!(err.access_kind(), Some(AccessError::RefreshTokenRevoked));
    }
    assert!(refresh(&app, &bystander).await.is_ok());

    // Access tokens remain valid until they expire.
    assert!(app.services.authenticate(&auth.tokens.access_token).await.is_ok());
}

#[tokio::test]
async fn changing_password_signs_out_everywhere() {
    let app = TestApp::new();
    let auth = register_student(&app, 1).await;
    let actor = authenticate(&app, &auth).await;

    let err = app
        .services
        .user_commands
        .change_password(
            &actor,
            ChangePasswordCommand {
                current_password: "wrong-password".into(),
                new_password: "another-long-password".into(),
            },
        )
        .await
        .expect_err("current password must match");
    assert_eq!(err.access_kind(), Some(AccessError::InvalidCredentials));

    app.services
        .user_commands
        .change_password(
            &actor,
            ChangePasswordCommand {
                current_password: PASSWORD.into(),
                new_password: "another-long-password".into(),
            },
        )
        .await
        .expect("change password");

    let err = refresh(&app, &auth.tokens.refresh_token)
        .await
        .expect_err("sessions revoked");
    assert_eq!(err.access_kind(), Some(AccessError::RefreshTokenRevoked));

    login(&app, &student_email(1), "another-long-password").await;
    let err = app
        .services
        .user_commands
        .login(LoginUserCommand {
            identifier: student_email(1),
            password: PASSWORD.into(),
        })
        .await
        .expect_err("old password");
    assert_eq!(err.access_kind(), Some(AccessError::InvalidCredentials));
}
