mod common;

use axum::http::StatusCode;
use common::{
    create_test_department, create_test_lecturer, create_test_user, login, send, setup_test_app,
    token_for,
};
use fses::fses_models::Role;
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "./migrations")]
async fn test_create_lecturer_provisions_supervisor_account(pool: PgPool) {
    let department = create_test_department(&pool, "Software Engineering", "SEAT").await;

    let (status, lecturer) = send(
        setup_test_app(pool.clone()),
        "POST",
        "/api/lecturers",
        None,
        Some(json!({
            "name": "Dr. Ahmad Rahman",
            "department": department,
            "university": "UTM"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(lecturer["name"], "Dr. Ahmad Rahman");
    assert_eq!(lecturer["title"], "DOCTOR");
    let staff = lecturer["staff"].as_i64().unwrap();

    let (username, email, role, is_first_time): (String, String, Role, bool) =
        sqlx::query_as("SELECT username, email, role, is_first_time FROM users WHERE id = $1")
            .bind(staff)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(username, "rahman");
    assert_eq!(email, "rahman@utm.my");
    assert_eq!(role, Role::Supervisor);
    assert!(is_first_time);

    // The initial password is the username.
    let (status, body) = login(setup_test_app(pool), "rahman", "rahman").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_first_time"], true);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_lecturer_username_collision(pool: PgPool) {
    let department = create_test_department(&pool, "Software Engineering", "SEAT").await;
    create_test_user(&pool, "rahman", "secret123", Role::Pgam, false).await;

    let (status, body) = send(
        setup_test_app(pool.clone()),
        "POST",
        "/api/lecturers",
        None,
        Some(json!({
            "name": "Prof. Nur Rahman",
            "department": department,
            "title": "PROFESSOR",
            "university": "UTM"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["fields"]["name"][0],
        "An account named 'rahman' already exists."
    );

    let lecturers: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM lecturers")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(lecturers, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_lecturer_unknown_department_rolls_back_account(pool: PgPool) {
    let (status, body) = send(
        setup_test_app(pool.clone()),
        "POST",
        "/api/lecturers",
        None,
        Some(json!({
            "name": "Dr. Kumar Singh",
            "department": 404,
            "university": "UTM"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["fields"]["department"].is_array());

    let accounts: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE username = 'singh'")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(accounts, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_lecturer_unknown_title(pool: PgPool) {
    let department = create_test_department(&pool, "Software Engineering", "SEAT").await;

    let (status, body) = send(
        setup_test_app(pool),
        "POST",
        "/api/lecturers",
        None,
        Some(json!({
            "name": "Dr. Ahmad Rahman",
            "department": department,
            "title": "DEAN",
            "university": "UTM"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["fields"]["title"][0].as_str().unwrap().contains("`DEAN`"));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_lecturer_requires_record_role(pool: PgPool) {
    let department = create_test_department(&pool, "Software Engineering", "SEAT").await;
    let token = token_for(
        setup_test_app(pool.clone()),
        &pool,
        "coordinator",
        Role::ProgramCoordinator,
    )
    .await;

    let (status, _) = send(
        setup_test_app(pool),
        "POST",
        "/api/lecturers",
        Some(&token),
        Some(json!({
            "name": "Dr. Ahmad Rahman",
            "department": department,
            "university": "UTM"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_staff_link_requires_supervisor(pool: PgPool) {
    let department = create_test_department(&pool, "Software Engineering", "SEAT").await;
    let lecturer = create_test_lecturer(&pool, "Dr. Siti Aminah", department, None).await;
    let pgam = create_test_user(&pool, "pgam", "secret123", Role::Pgam, false).await;

    let (status, body) = send(
        setup_test_app(pool.clone()),
        "PUT",
        &format!("/api/lecturer/{}", lecturer),
        None,
        Some(json!({ "staff": pgam.id })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["fields"]["staff"][0], "User must have role SUPERVISOR.");

    let (status, body) = send(
        setup_test_app(pool),
        "PUT",
        &format!("/api/lecturer/{}", lecturer),
        None,
        Some(json!({ "staff": 9999 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["fields"]["staff"].is_array());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_and_unlink_staff(pool: PgPool) {
    let department = create_test_department(&pool, "Software Engineering", "SEAT").await;
    let lecturer = create_test_lecturer(&pool, "Dr. Siti Aminah", department, None).await;
    let account = create_test_user(&pool, "aminah", "secret123", Role::Supervisor, false).await;

    let (status, body) = send(
        setup_test_app(pool.clone()),
        "PUT",
        &format!("/api/lecturer/{}", lecturer),
        None,
        Some(json!({ "staff": account.id, "title": "ASSOCIATE_PROFESSOR" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["staff"], account.id);
    assert_eq!(body["title"], "ASSOCIATE_PROFESSOR");
    assert_eq!(body["name"], "Dr. Siti Aminah");

    let (status, body) = send(
        setup_test_app(pool),
        "PUT",
        &format!("/api/lecturer/{}", lecturer),
        None,
        Some(json!({ "staff": null })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["staff"].is_null());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_delete_lecturer_keeps_account(pool: PgPool) {
    let department = create_test_department(&pool, "Software Engineering", "SEAT").await;
    let account = create_test_user(&pool, "wong", "secret123", Role::Supervisor, false).await;
    let lecturer = create_test_lecturer(&pool, "Dr. Fatimah Wong", department, Some(account.id)).await;

    let (status, _) = send(
        setup_test_app(pool.clone()),
        "DELETE",
        &format!("/api/lecturer/{}", lecturer),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = login(setup_test_app(pool.clone()), "wong", "secret123").await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        setup_test_app(pool),
        "GET",
        &format!("/api/lecturer/{}", lecturer),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
