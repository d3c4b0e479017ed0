// Runs against a real Postgres when TEST_DATABASE_URL is set and is skipped
// otherwise. Every test seeds its own course, users and codes, so the
// database can be shared between runs.
use academy_core::domain::{
    activation::{
        ActivationCode, ActivationCodeRepository, CodeValue, NewActivationCode, Redemption,
    },
    course::CourseId,
    errors::{AccessError, DomainError},
    session::{NewRefreshToken, RefreshTokenRepository, TokenHash},
    user::{Email, FullName, NewUser, PasswordHash, PhoneNumber, User, UserRepository},
};
use academy_core::infrastructure::{
    database::{init_pool, run_migrations},
    repositories::{
        PostgresActivationCodeRepository, PostgresRefreshTokenRepository, PostgresUserRepository,
    },
};
use chrono::{DateTime, Duration, Utc};
use sqlx::PgPool;
use std::env;
use uuid::Uuid;

async fn test_pool() -> Option<PgPool> {
    let Ok(url) = env::var("TEST_DATABASE_URL") else {
        eprintln!("Skipping Postgres integration test because TEST_DATABASE_URL is not set");
        return None;
    };
    let pool = init_pool(&url).await.expect("connect to the test database");
    run_migrations(&pool).await.expect("apply migrations");
    Some(pool)
}

fn unique_tag() -> String {
    Uuid::new_v4().simple().to_string()
}

fn new_user() -> NewUser {
    let tag = Uuid::new_v4();
    NewUser::registration(
        Email::new(format!("pg-{}@example.com", tag.simple())).unwrap(),
        PhoneNumber::new(format!("0{:010}", tag.as_u128() % 10_000_000_000)).unwrap(),
        FullName::new("Postgres Student").unwrap(),
        PasswordHash::new("hash::unused").unwrap(),
        Utc::now(),
    )
}

async fn insert_user(users: &PostgresUserRepository) -> User {
    users.insert(new_user()).await.expect("insert user")
}

async fn seed_course(pool: &PgPool) -> CourseId {
    let id = Uuid::new_v4();
    sqlx::query("INSERT INTO courses (id, title, slug) VALUES ($1, $2, $3)")
        .bind(id)
        .bind("Concurrency in Practice")
        .bind(format!("pg-{}", unique_tag()))
        .execute(pool)
        .await
        .expect("insert course");
    CourseId(id)
}

fn new_code(course_id: CourseId, creator: &User, max_uses: Option<u32>) -> NewActivationCode {
    NewActivationCode {
        code: CodeValue::from_trusted(format!("PG{}", unique_tag()).to_uppercase()),
        course_id,
        max_uses,
        expires_at: None,
        created_by: creator.id,
        note: None,
        created_at: Utc::now(),
    }
}

fn redemption(code: &ActivationCode, user: &User) -> Redemption {
    Redemption {
        code_id: code.id,
        user_id: user.id,
        course_id: code.course_id,
        redeemed_at: Utc::now(),
        enrollment_expires_at: None,
    }
}

async fn stored_uses(codes: &PostgresActivationCodeRepository, code: &ActivationCode) -> u32 {
    codes
        .find_by_code(&code.code)
        .await
        .unwrap()
        .expect("code exists")
        .current_uses
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_redemptions_never_exceed_the_limit() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let users = PostgresUserRepository::new(pool.clone());
    let codes = PostgresActivationCodeRepository::new(pool.clone());

    let admin = insert_user(&users).await;
    let course = seed_course(&pool).await;
    let code = codes
        .insert(new_code(course, &admin, Some(3)))
        .await
        .expect("insert code");

    let mut students = Vec::new();
    for _ in 0..12 {
        students.push(insert_user(&users).await);
    }

    let handles: Vec<_> = students
        .iter()
        .map(|student| {
            let codes = codes.clone();
            let attempt = redemption(&code, student);
            tokio::spawn(async move { codes.redeem(attempt).await })
        })
        .collect();

    let mut admitted = 0;
    let mut used_up = 0;
    for handle in handles {
        match handle.await.expect("task") {
            Ok(_) => admitted += 1,
            Err(DomainError::Access(AccessError::ActivationCodeUsedUp)) => used_up += 1,
            Err(other) => panic!("unexpected redeem failure: {other:?}"),
        }
    }

    assert_eq!(admitted, 3);
    assert_eq!(used_up, 9);
    assert_eq!(stored_uses(&codes, &code).await, 3);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn one_student_racing_several_codes_enrolls_once() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let users = PostgresUserRepository::new(pool.clone());
    let codes = PostgresActivationCodeRepository::new(pool.clone());

    let admin = insert_user(&users).await;
    let student = insert_user(&users).await;
    let course = seed_course(&pool).await;

    let mut issued = Vec::new();
    for _ in 0..6 {
        issued.push(
            codes
                .insert(new_code(course, &admin, None))
                .await
                .expect("insert code"),
        );
    }

    let handles: Vec<_> = issued
        .iter()
        .map(|code| {
            let codes = codes.clone();
            let attempt = redemption(code, &student);
            tokio::spawn(async move { codes.redeem(attempt).await })
        })
        .collect();

    let mut admitted = 0;
    let mut already_enrolled = 0;
    for handle in handles {
        match handle.await.expect("task") {
            Ok(_) => admitted += 1,
            Err(DomainError::Access(AccessError::AlreadyEnrolled)) => already_enrolled += 1,
            Err(other) => panic!("unexpected redeem failure: {other:?}"),
        }
    }

    assert_eq!(admitted, 1);
    assert_eq!(already_enrolled, 5);

    let mut consumed = 0;
    for code in &issued {
        consumed += stored_uses(&codes, code).await;
    }
    assert_eq!(consumed, 1);
}

#[tokio::test]
async fn constraint_violations_map_to_domain_errors() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let users = PostgresUserRepository::new(pool.clone());
    let codes = PostgresActivationCodeRepository::new(pool.clone());

    let first = new_user();
    let taken_email = first.email.clone();
    users.insert(first).await.expect("first user");

    let mut duplicate = new_user();
    duplicate.email = taken_email;
    let err = users.insert(duplicate).await.unwrap_err();
    assert!(matches!(err, DomainError::Conflict(_)), "{err:?}");

    let admin = insert_user(&users).await;
    let course = seed_course(&pool).await;
    let original = new_code(course, &admin, None);
    let text = original.code.clone();
    codes.insert(original).await.expect("first code");

    let mut clash = new_code(course, &admin, None);
    clash.code = text;
    let err = codes.insert(clash).await.unwrap_err();
    assert!(matches!(err, DomainError::Conflict(_)), "{err:?}");

    let orphan = new_code(CourseId(Uuid::new_v4()), &admin, None);
    let err = codes.insert(orphan).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound(_)), "{err:?}");
}

#[tokio::test]
async fn refresh_sweep_removes_tokens_expiring_exactly_now() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let users = PostgresUserRepository::new(pool.clone());
    let tokens = PostgresRefreshTokenRepository::new(pool.clone());
    let owner = insert_user(&users).await;

    // Whole seconds; Postgres keeps only microseconds.
    let cutoff: DateTime<Utc> =
        DateTime::from_timestamp(Utc::now().timestamp() + 86_400 * 3650, 0).unwrap();
    let edge = format!("edge-{}", unique_tag());
    let later = format!("later-{}", unique_tag());
    for (raw, expires_at) in [(&edge, cutoff), (&later, cutoff + Duration::seconds(1))] {
        tokens
            .insert(NewRefreshToken {
                user_id: owner.id,
                token_hash: TokenHash::of(raw),
                expires_at,
                created_at: Utc::now(),
            })
            .await
            .expect("insert refresh token");
    }

    assert!(tokens.delete_expired(cutoff).await.unwrap() >= 1);
    assert!(tokens.find_by_hash(&TokenHash::of(&edge)).await.unwrap().is_none());
    assert!(tokens.find_by_hash(&TokenHash::of(&later)).await.unwrap().is_some());
}
