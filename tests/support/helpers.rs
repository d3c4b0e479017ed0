// tests/support/helpers.rs
use super::builders::TestApp;
use academy_core::application::{
    commands::{enrollments::CreateActivationCodeCommand, users::RegisterUserCommand},
    dto::{ActivationCodeDto, AuthResultDto, AuthenticatedUser},
};
use academy_core::domain::{
    course::Course,
    user::{Email, FullName, NewUser, PasswordHash, PhoneNumber, Role, UserRepository},
};
use axum::body::{self, Body};
use axum::http::{Request, StatusCode, header};
use serde_json::Value;
use tower::ServiceExt;

pub const PASSWORD: &str = "correct-horse-battery";

pub fn student_email(n: u32) -> String {
    format!("student{n}@example.com")
}

pub fn student_phone(n: u32) -> String {
    format!("090{n:07}")
}

pub async fn register_student(app: &TestApp, n: u32) -> AuthResultDto {
    app.services
        .user_commands
        .register(RegisterUserCommand {
            email: student_email(n),
            phone_number: student_phone(n),
            password: PASSWORD.into(),
            full_name: format!("Student {n}"),
        })
        .await
        .expect("registration should succeed")
}

pub async fn authenticate(app: &TestApp, auth: &AuthResultDto) -> AuthenticatedUser {
    app.services
        .authenticate(&auth.tokens.access_token)
        .await
        .expect("fresh access token should authenticate")
}

pub async fn student(app: &TestApp, n: u32) -> AuthenticatedUser {
    let auth = register_student(app, n).await;
    authenticate(app, &auth).await
}

/// Inserts a staff account directly and returns it with a valid access token.
pub async fn staff(app: &TestApp, role: Role, n: u32) -> (AuthenticatedUser, String) {
    let user = UserRepository::insert(
        app.store.as_ref(),
        NewUser::registration(
            Email::new(format!("staff{n}@example.com")).unwrap(),
            PhoneNumber::new(format!("091{n:07}")).unwrap(),
            FullName::new(format!("Staff {n}")).unwrap(),
            PasswordHash::new(format!("hash::{PASSWORD}")).unwrap(),
            app.clock_now(),
        )
        .with_role(role),
    )
    .await
    .expect("staff insert");

    let token = app
        .services
        .token_issuer()
        .issue_access(user.id)
        .expect("issue access")
        .token;
    let actor = app.services.authenticate(&token).await.expect("staff token");
    (actor, token)
}

pub async fn admin(app: &TestApp) -> AuthenticatedUser {
    staff(app, Role::Admin, 1).await.0
}

pub fn seed_course(app: &TestApp) -> Course {
    app.store
        .seed_course("Rust for Backend Engineers", "rust-backend")
        .expect("seed course")
}

pub async fn create_code(
    app: &TestApp,
    actor: &AuthenticatedUser,
    course: &Course,
    max_uses: Option<u32>,
) -> ActivationCodeDto {
    app.services
        .enrollment_commands
        .create_activation_code(
            actor,
            CreateActivationCodeCommand {
                course_id: course.id.0,
                max_uses,
                expires_at: None,
                note: None,
            },
        )
        .await
        .expect("code creation should succeed")
}

/* -------------------------------- HTTP -------------------------------- */

pub async fn send(
    router: &axum::Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

/// Assert an error body carries the expected status and stable code.
pub fn assert_error(status: StatusCode, body: &Value, expected: StatusCode, code: &str) {
    assert_eq!(status, expected, "unexpected status, body: {body}");
    assert_eq!(body["code"], code, "unexpected code, body: {body}");
    assert!(body["error"].is_string());
    assert!(body["message"].is_string());
}
