mod common;

use actix_web::http::StatusCode;
use actix_web::test;
use chrono::{Duration, Utc};
use common::{
    assignee_ids, bearer, init_app, login, seed_user, send, task_payload, test_state, ROOT_EMAIL,
    ROOT_PASSWORD,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use taskboard::error::NOT_FOUND_MESSAGE;

async fn list_tasks(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
    >,
    token: &str,
) -> Vec<Value> {
    let req = test::TestRequest::get()
        .uri("/api/v1/tasks")
        .append_header(bearer(token))
        .to_request();
    let (status, body) = send(app, req).await;
    assert_eq!(status, StatusCode::OK, "Task list failed. Body: {}", body);
    body["data"].as_array().cloned().unwrap_or_default()
}

#[test_log::test(actix_rt::test)]
async fn test_task_lifecycle() {
    let state = test_state();
    seed_user(&state, "Root", ROOT_EMAIL, ROOT_PASSWORD).await;
    let app = init_app(state.clone()).await;
    let root_token = login(&app, ROOT_EMAIL, ROOT_PASSWORD).await;

    // Register a regular user through the API.
    let req = test::TestRequest::post()
        .uri("/api/v1/users/store")
        .append_header(bearer(&root_token))
        .set_json(json!({
            "name": "Admin",
            "email": "admin@admin.com",
            "password": "123456",
            "isAdmin": false,
        }))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::CREATED, "User creation failed. Body: {}", body);
    assert!(body["data"].get("password").is_none());
    assert_eq!(body["data"]["isAdmin"], json!(false));
    let admin_id = body["data"]["id"].as_i64().expect("user id");

    let token = login(&app, "admin@admin.com", "123456").await;

    let req = test::TestRequest::post()
        .uri("/api/v1/tasks/store")
        .append_header(bearer(&token))
        .set_json(json!({
            "title": "Write report",
            "description": "Quarterly numbers",
            "deadline": "2099-01-01",
            "users_id": [admin_id],
        }))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::CREATED, "Create task failed. Body: {}", body);
    assert_eq!(body["message"], json!("Task registered successfully"));
    assert_eq!(body["data"]["title"], json!("Write report"));
    assert_eq!(body["data"]["status"], json!(true));
    assert_eq!(
        body["data"]["users"],
        json!([{ "id": admin_id, "name": "Admin" }])
    );
    let task_id = body["data"]["id"].as_i64().expect("task id");

    // An empty assignee list is rejected and the task keeps its assignment.
    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/tasks/update/{}", task_id))
        .append_header(bearer(&token))
        .set_json(task_payload("Write report", &[]))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["status"], json!(false));

    let tasks = list_tasks(&app, &token).await;
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["title"], json!("Write report"));
    assert_eq!(assignee_ids(&tasks[0]), vec![admin_id]);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/tasks/delete/{}", task_id))
        .append_header(bearer(&token))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"], json!(true));

    assert!(list_tasks(&app, &token).await.is_empty());

    // The user survives the task and has nothing assigned anymore.
    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/users/get_tasks_user/{}", admin_id))
        .append_header(bearer(&token))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["tasks"], json!([]));
}

#[actix_rt::test]
async fn test_update_replaces_assignees() {
    let state = test_state();
    let root = seed_user(&state, "Root", ROOT_EMAIL, ROOT_PASSWORD).await;
    let ana = seed_user(&state, "Ana", "ana@example.com", "secret-ana").await;
    let ben = seed_user(&state, "Ben", "ben@example.com", "secret-ben").await;
    let app = init_app(state.clone()).await;
    let token = login(&app, ROOT_EMAIL, ROOT_PASSWORD).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/tasks/store")
        .append_header(bearer(&token))
        .set_json(task_payload("Plan sprint", &[root.id, ana.id, ana.id]))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::CREATED, "Body: {}", body);
    assert_eq!(
        assignee_ids(&body["data"]),
        vec![root.id as i64, ana.id as i64]
    );
    let task_id = body["data"]["id"].as_i64().expect("task id");

    let mut payload = task_payload("Plan next sprint", &[ben.id]);
    payload["status"] = json!(false);
    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/tasks/update/{}", task_id))
        .append_header(bearer(&token))
        .set_json(payload)
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::CREATED, "Update failed. Body: {}", body);
    assert_eq!(body["message"], json!("Task updated successfully"));
    assert_eq!(body["data"]["title"], json!("Plan next sprint"));
    assert_eq!(body["data"]["status"], json!(false));
    assert_eq!(assignee_ids(&body["data"]), vec![ben.id as i64]);

    for (user_id, expected) in [(root.id, 0), (ana.id, 0), (ben.id, 1)] {
        let req = test::TestRequest::get()
            .uri(&format!("/api/v1/users/get_tasks_user/{}", user_id))
            .append_header(bearer(&token))
            .to_request();
        let (status, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["data"]["tasks"].as_array().map(Vec::len),
            Some(expected),
            "user {} should have {} task(s)",
            user_id,
            expected
        );
    }
}

#[actix_rt::test]
async fn test_invalid_task_payloads_write_nothing() {
    let state = test_state();
    let root = seed_user(&state, "Root", ROOT_EMAIL, ROOT_PASSWORD).await;
    let app = init_app(state.clone()).await;
    let token = login(&app, ROOT_EMAIL, ROOT_PASSWORD).await;

    let today = Utc::now().date_naive();
    let yesterday = today - Duration::days(1);

    let test_cases = vec![
        (
            "deadline today",
            json!({ "title": "T", "description": "D", "deadline": today.to_string(), "users_id": [root.id] }),
        ),
        (
            "deadline in the past",
            json!({ "title": "T", "description": "D", "deadline": yesterday.to_string(), "users_id": [root.id] }),
        ),
        (
            "malformed deadline",
            json!({ "title": "T", "description": "D", "deadline": "01/01/2099", "users_id": [root.id] }),
        ),
        (
            "empty title",
            json!({ "title": "", "description": "D", "deadline": "2099-01-01", "users_id": [root.id] }),
        ),
        (
            "title too long",
            json!({ "title": "x".repeat(256), "description": "D", "deadline": "2099-01-01", "users_id": [root.id] }),
        ),
        (
            "missing description",
            json!({ "title": "T", "deadline": "2099-01-01", "users_id": [root.id] }),
        ),
        (
            "users_id is not a list",
            json!({ "title": "T", "description": "D", "deadline": "2099-01-01", "users_id": root.id }),
        ),
        (
            "empty users_id",
            json!({ "title": "T", "description": "D", "deadline": "2099-01-01", "users_id": [] }),
        ),
        (
            "unknown user",
            json!({ "title": "T", "description": "D", "deadline": "2099-01-01", "users_id": [root.id, 9999] }),
        ),
    ];

    for (case, payload) in test_cases {
        let req = test::TestRequest::post()
            .uri("/api/v1/tasks/store")
            .append_header(bearer(&token))
            .set_json(&payload)
            .to_request();
        let (status, body) = send(&app, req).await;
        assert_eq!(
            status,
            StatusCode::UNPROCESSABLE_ENTITY,
            "{}: unexpected status. Body: {}",
            case,
            body
        );
        assert_eq!(body["status"], json!(false), "{}", case);
    }

    assert!(list_tasks(&app, &token).await.is_empty());
}

#[actix_rt::test]
async fn test_unknown_user_in_update_leaves_task_untouched() {
    let state = test_state();
    let root = seed_user(&state, "Root", ROOT_EMAIL, ROOT_PASSWORD).await;
    let app = init_app(state.clone()).await;
    let token = login(&app, ROOT_EMAIL, ROOT_PASSWORD).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/tasks/store")
        .append_header(bearer(&token))
        .set_json(task_payload("Original", &[root.id]))
        .to_request();
    let (_, body) = send(&app, req).await;
    let task_id = body["data"]["id"].as_i64().expect("task id");

    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/tasks/update/{}", task_id))
        .append_header(bearer(&token))
        .set_json(task_payload("Renamed", &[root.id, 4242]))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let tasks = list_tasks(&app, &token).await;
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["title"], json!("Original"));
    assert_eq!(assignee_ids(&tasks[0]), vec![root.id as i64]);
}

#[actix_rt::test]
async fn test_missing_tasks_are_not_found() {
    let state = test_state();
    let root = seed_user(&state, "Root", ROOT_EMAIL, ROOT_PASSWORD).await;
    let app = init_app(state).await;
    let token = login(&app, ROOT_EMAIL, ROOT_PASSWORD).await;

    let requests = vec![
        test::TestRequest::put()
            .uri("/api/v1/tasks/update/999")
            .set_json(task_payload("Ghost", &[root.id])),
        test::TestRequest::patch().uri("/api/v1/tasks/complete/999"),
        test::TestRequest::delete().uri("/api/v1/tasks/delete/999"),
        test::TestRequest::delete().uri("/api/v1/tasks/delete/abc"),
        test::TestRequest::get().uri("/api/v1/tasks/unknown/route"),
    ];

    for req in requests {
        let (status, body) = send(&app, req.append_header(bearer(&token)).to_request()).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "Body: {}", body);
        assert_eq!(
            body,
            json!({ "status": false, "message": NOT_FOUND_MESSAGE })
        );
    }
}

#[actix_rt::test]
async fn test_complete_task() {
    let state = test_state();
    let root = seed_user(&state, "Root", ROOT_EMAIL, ROOT_PASSWORD).await;
    let app = init_app(state).await;
    let token = login(&app, ROOT_EMAIL, ROOT_PASSWORD).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/tasks/store")
        .append_header(bearer(&token))
        .set_json(task_payload("Ship it", &[root.id]))
        .to_request();
    let (_, body) = send(&app, req).await;
    let task_id = body["data"]["id"].as_i64().expect("task id");

    let req = test::TestRequest::patch()
        .uri(&format!("/api/v1/tasks/complete/{}", task_id))
        .append_header(bearer(&token))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], json!(false));
    assert_eq!(assignee_ids(&body["data"]), vec![root.id as i64]);
}
