mod common;

use axum::http::StatusCode;
use common::{
    create_test_department, create_test_lecturer, create_test_nomination, create_test_student,
    send, setup_test_app, token_for,
};
use fses::fses_models::Role;
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "./migrations")]
async fn test_create_and_get_student(pool: PgPool) {
    let department = create_test_department(&pool, "Software Engineering", "SEAT").await;
    let supervisor = create_test_lecturer(&pool, "Dr. Ahmad Rahman", department, None).await;
    let co_supervisor = create_test_lecturer(&pool, "Dr. Fatimah Wong", department, None).await;
    let token = token_for(setup_test_app(pool.clone()), &pool, "office", Role::OfficeAssistant).await;

    let (status, created) = send(
        setup_test_app(pool.clone()),
        "POST",
        "/api/students",
        Some(&token),
        Some(json!({
            "name": "AHMAD FAIRUZ BIN ALI",
            "supervisor": supervisor,
            "co_supervisor": co_supervisor,
            "program": "MPHIL",
            "semester": 3,
            "evaluation_type": "RE_EVALUATION",
            "department": department
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["supervisor"], supervisor);
    assert_eq!(created["co_supervisor"], co_supervisor);
    assert_eq!(created["program"], "MPHIL");
    assert_eq!(created["semester"], 3);
    assert_eq!(created["evaluation_type"], "RE_EVALUATION");

    let (status, fetched) = send(
        setup_test_app(pool),
        "GET",
        &format!("/api/student/{}", created["id"]),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_student_defaults(pool: PgPool) {
    let department = create_test_department(&pool, "Software Engineering", "SEAT").await;

    let (status, body) = send(
        setup_test_app(pool.clone()),
        "POST",
        "/api/students",
        None,
        Some(json!({ "name": "FATIMAH ZAHRA", "department": department })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["program"], "PHD");
    assert_eq!(body["semester"], 1);
    assert_eq!(body["evaluation_type"], "FIRST_EVALUATION");
    assert!(body["supervisor"].is_null());

    let (status, body) = send(
        setup_test_app(pool),
        "POST",
        "/api/students",
        None,
        Some(json!({ "name": "NURUL IMAN", "department": department, "semester": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["semester"], 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_student_rejects_bad_input(pool: PgPool) {
    let department = create_test_department(&pool, "Software Engineering", "SEAT").await;

    let (status, body) = send(
        setup_test_app(pool.clone()),
        "POST",
        "/api/students",
        None,
        Some(json!({ "name": "ANIS", "department": department, "semester": -1 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["fields"]["semester"].is_array());

    let (status, body) = send(
        setup_test_app(pool.clone()),
        "POST",
        "/api/students",
        None,
        Some(json!({ "name": "ANIS", "department": department, "program": "BSC" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = body["fields"]["program"][0].as_str().unwrap();
    assert!(message.starts_with("Invalid value: unknown variant `BSC`"));

    let (status, body) = send(
        setup_test_app(pool),
        "POST",
        "/api/students",
        None,
        Some(json!({ "name": "ANIS", "department": department, "supervisor": 4040 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["fields"]["supervisor"][0], "Referenced object does not exist.");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_student_clears_co_supervisor(pool: PgPool) {
    let department = create_test_department(&pool, "Software Engineering", "SEAT").await;
    let supervisor = create_test_lecturer(&pool, "Dr. Ahmad Rahman", department, None).await;
    let other = create_test_lecturer(&pool, "Dr. Fatimah Wong", department, None).await;
    let student = create_test_student(&pool, "ANIS AFIQAH", department, Some(supervisor)).await;

    let (status, body) = send(
        setup_test_app(pool.clone()),
        "PUT",
        &format!("/api/student/{}", student),
        None,
        Some(json!({ "co_supervisor": other, "semester": 4 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["co_supervisor"], other);
    assert_eq!(body["semester"], 4);
    assert_eq!(body["supervisor"], supervisor);

    let (status, body) = send(
        setup_test_app(pool),
        "PUT",
        &format!("/api/student/{}", student),
        None,
        Some(json!({ "co_supervisor": null })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["co_supervisor"].is_null());
    assert_eq!(body["supervisor"], supervisor);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_deleting_supervisor_nulls_reference(pool: PgPool) {
    let department = create_test_department(&pool, "Software Engineering", "SEAT").await;
    let supervisor = create_test_lecturer(&pool, "Dr. Ahmad Rahman", department, None).await;
    let student = create_test_student(&pool, "AYMEN YOUSEF", department, Some(supervisor)).await;

    let (status, _) = send(
        setup_test_app(pool.clone()),
        "DELETE",
        &format!("/api/lecturer/{}", supervisor),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(
        setup_test_app(pool),
        "GET",
        &format!("/api/student/{}", student),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["supervisor"].is_null());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_delete_student_removes_nomination(pool: PgPool) {
    let department = create_test_department(&pool, "Software Engineering", "SEAT").await;
    let student = create_test_student(&pool, "BAHAA SALIM", department, None).await;
    create_test_nomination(&pool, student, [None, None, None], false).await;

    let (status, _) = send(
        setup_test_app(pool.clone()),
        "DELETE",
        &format!("/api/student/{}", student),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let nominations: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM nominations")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(nominations, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_supervisor_cannot_delete_student(pool: PgPool) {
    let department = create_test_department(&pool, "Software Engineering", "SEAT").await;
    let student = create_test_student(&pool, "BAHAA SALIM", department, None).await;
    let token = token_for(setup_test_app(pool.clone()), &pool, "rahman", Role::Supervisor).await;

    let (status, _) = send(
        setup_test_app(pool),
        "DELETE",
        &format!("/api/student/{}", student),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
