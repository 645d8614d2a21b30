#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use fses::fses_config::{AccessConfig, CorsConfig, EmailConfig, JwtConfig};
use fses::fses_core::hash_password;
use fses::fses_models::Role;
use fses::router::init_app;
use fses::state::AppState;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use sqlx::PgPool;
use tower::ServiceExt;
use tower_http::normalize_path::NormalizePath;

pub type TestApp = NormalizePath<Router>;

pub struct TestUser {
    pub id: i64,
    pub username: String,
    pub password: String,
}

pub fn test_state(pool: PgPool, access_config: AccessConfig) -> AppState {
    dotenvy::dotenv().ok();
    let mut email_config = EmailConfig::from_env();
    email_config.enabled = false;

    AppState {
        db: pool,
        jwt_config: JwtConfig::from_env(),
        email_config,
        cors_config: CorsConfig::from_env(),
        access_config,
    }
}

pub fn setup_test_app(pool: PgPool) -> TestApp {
    init_app(test_state(pool, AccessConfig::default()))
}

/// App that rejects requests without a bearer token.
pub fn setup_closed_app(pool: PgPool) -> TestApp {
    init_app(test_state(
        pool,
        AccessConfig {
            allow_anonymous: false,
            ..AccessConfig::default()
        },
    ))
}

pub async fn create_test_user(
    pool: &PgPool,
    username: &str,
    password: &str,
    role: Role,
    is_first_time: bool,
) -> TestUser {
    let hashed = hash_password(password).unwrap();

    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO users (username, email, password, role, is_first_time)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id
        "#,
    )
    .bind(username)
    .bind(format!("{}@test.utm.my", username))
    .bind(hashed)
    .bind(role)
    .bind(is_first_time)
    .fetch_one(pool)
    .await
    .unwrap();

    TestUser {
        id,
        username: username.to_string(),
        password: password.to_string(),
    }
}

pub async fn create_test_department(pool: &PgPool, name: &str, code: &str) -> i64 {
    sqlx::query_scalar("INSERT INTO departments (name, code) VALUES ($1, $2) RETURNING id")
        .bind(name)
        .bind(code)
        .fetch_one(pool)
        .await
        .unwrap()
}

/// A UTM lecturer with the default DOCTOR title.
pub async fn create_test_lecturer(
    pool: &PgPool,
    name: &str,
    department: i64,
    staff: Option<i64>,
) -> i64 {
    sqlx::query_scalar(
        r#"
        INSERT INTO lecturers (name, department_id, university, staff_id)
        VALUES ($1, $2, 'UTM', $3)
        RETURNING id
        "#,
    )
    .bind(name)
    .bind(department)
    .bind(staff)
    .fetch_one(pool)
    .await
    .unwrap()
}

/// `title` is the JSON name, e.g. `"ASSOCIATE_PROFESSOR"`.
pub async fn create_titled_lecturer(
    pool: &PgPool,
    name: &str,
    department: i64,
    title: &str,
    university: &str,
) -> i64 {
    sqlx::query_scalar(
        r#"
        INSERT INTO lecturers (name, department_id, title, university)
        VALUES ($1, $2, $3::lecturer_title, $4)
        RETURNING id
        "#,
    )
    .bind(name)
    .bind(department)
    .bind(title)
    .bind(university)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn create_test_student(
    pool: &PgPool,
    name: &str,
    department: i64,
    supervisor: Option<i64>,
) -> i64 {
    sqlx::query_scalar(
        r#"
        INSERT INTO students (name, supervisor_id, program, semester, evaluation_type, department_id)
        VALUES ($1, $2, 'PHD', 1, 'FIRST_EVALUATION', $3)
        RETURNING id
        "#,
    )
    .bind(name)
    .bind(supervisor)
    .bind(department)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn create_test_nomination(
    pool: &PgPool,
    student: i64,
    examiners: [Option<i64>; 3],
    is_locked: bool,
) -> i64 {
    sqlx::query_scalar(
        r#"
        INSERT INTO nominations (student_id, examiner1_id, examiner2_id, examiner3_id, is_locked)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id
        "#,
    )
    .bind(student)
    .bind(examiners[0])
    .bind(examiners[1])
    .bind(examiners[2])
    .bind(is_locked)
    .fetch_one(pool)
    .await
    .unwrap()
}

/// Sends one request and returns the status and the JSON body (`Null` when
/// the body is empty).
pub async fn send(
    app: TestApp,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }

    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

pub async fn login(app: TestApp, username: &str, password: &str) -> (StatusCode, Value) {
    send(
        app,
        "POST",
        "/auth/login",
        None,
        Some(json!({ "username": username, "password": password })),
    )
    .await
}

pub async fn get_auth_token(app: TestApp, user: &TestUser) -> String {
    let (status, body) = login(app, &user.username, &user.password).await;
    assert_eq!(status, StatusCode::OK, "login failed: {body}");
    body["access_token"].as_str().unwrap().to_string()
}

/// Creates an account with `role` and returns a bearer token for it.
pub async fn token_for(app: TestApp, pool: &PgPool, username: &str, role: Role) -> String {
    let user = create_test_user(pool, username, "testpass123", role, false).await;
    get_auth_token(app, &user).await
}
