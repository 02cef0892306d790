/// Integration tests for the Hearth API
///
/// These tests verify the system end-to-end:
/// - Session authentication and rejection paths
/// - Task lifecycle (create, complete, rotation advance)
/// - Turn enforcement and the duplicate-completion debounce
/// - Purchase ownership rules
/// - Roster removal guards
///
/// Tests marked `#[ignore]` need a PostgreSQL instance (`DATABASE_URL`);
/// run them with `cargo test -- --ignored`.

mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use common::TestContext;
use hearth_shared::models::task::Task;
use serde_json::json;
use tower::Service as _;

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

/// Requests without credentials are rejected before any database access
#[tokio::test]
async fn test_missing_session_rejected() {
    let mut app = common::test_router();

    let request = Request::builder()
        .method("GET")
        .uri("/v1/tasks")
        .body(Body::empty())
        .unwrap();

    let response = app.call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let json = body_json(response).await;
    assert_eq!(json["error"], "unauthorized");
}

/// Garbage tokens are rejected with 401, in both cookie and bearer form
#[tokio::test]
async fn test_invalid_token_rejected() {
    let mut app = common::test_router();

    let request = Request::builder()
        .method("GET")
        .uri("/v1/dashboard")
        .header(header::COOKIE, "session_token=not-a-real-token")
        .body(Body::empty())
        .unwrap();

    let response = app.call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let request = Request::builder()
        .method("GET")
        .uri("/v1/dashboard")
        .header(header::AUTHORIZATION, "Bearer not-a-real-token")
        .body(Body::empty())
        .unwrap();

    let response = app.call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// Logout clears the cookie and needs no session
#[tokio::test]
async fn test_logout_clears_cookie() {
    let mut app = common::test_router();

    let request = Request::builder()
        .method("POST")
        .uri("/v1/auth/logout")
        .body(Body::empty())
        .unwrap();

    let response = app.call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(set_cookie.starts_with("session_token=;"));
    assert!(set_cookie.contains("Max-Age=0"));
}

/// Signup validation failures come back as 422 with per-field details
#[tokio::test]
async fn test_signup_validation_error_shape() {
    let mut app = common::test_router();

    let request = Request::builder()
        .method("POST")
        .uri("/v1/auth/signup")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({
                "name": "Alex",
                "email": "not-an-email",
                "password": "weak"
            })
            .to_string(),
        ))
        .unwrap();

    let response = app.call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let json = body_json(response).await;
    assert_eq!(json["error"], "validation_error");
    let fields: Vec<&str> = json["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["field"].as_str().unwrap())
        .collect();
    assert!(fields.contains(&"email"));
    assert!(fields.contains(&"password"));
}

/// Signup establishes a session cookie and returns the new member
#[tokio::test]
#[ignore = "requires a PostgreSQL database"]
async fn test_signup_sets_session_cookie() {
    let ctx = TestContext::new().await.unwrap();

    let request = Request::builder()
        .method("POST")
        .uri("/v1/auth/signup")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({
                "name": "New Member",
                "email": format!("signup-{}@example.com", uuid::Uuid::new_v4()),
                "password": "SecureP@ss123"
            })
            .to_string(),
        ))
        .unwrap();

    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(set_cookie.starts_with("session_token="));
    assert!(set_cookie.contains("HttpOnly"));

    let json = body_json(response).await;
    assert_eq!(json["name"], "New Member");
    assert!(json.get("password_hash").is_none());

    ctx.cleanup().await.unwrap();
}

/// A valid session token resolves the current member via /me
#[tokio::test]
#[ignore = "requires a PostgreSQL database"]
async fn test_me_returns_current_member() {
    let ctx = TestContext::new().await.unwrap();

    let request = Request::builder()
        .method("GET")
        .uri("/v1/auth/me")
        .header(header::AUTHORIZATION, ctx.auth_header())
        .body(Body::empty())
        .unwrap();

    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["id"], ctx.user.id.to_string());

    ctx.cleanup().await.unwrap();
}

/// Creating a task assigns it to the roster head with rotation index 0
#[tokio::test]
#[ignore = "requires a PostgreSQL database"]
async fn test_create_task_assigns_roster_head() {
    let ctx = TestContext::new().await.unwrap();

    let request = Request::builder()
        .method("POST")
        .uri("/v1/tasks")
        .header(header::AUTHORIZATION, ctx.auth_header())
        .header("content-type", "application/json")
        .body(Body::from(
            json!({
                "name": "Dishes",
                "description": "Wash and dry",
                "due_date": "2030-01-01T00:00:00Z"
            })
            .to_string(),
        ))
        .unwrap();

    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["rotation_index"], 0);
    assert_eq!(json["current_turn_user_id"], ctx.user.id.to_string());
    assert_eq!(json["overdue"], false);

    ctx.cleanup().await.unwrap();
}

/// Completion advances the turn through the roster in creation order
#[tokio::test]
#[ignore = "requires a PostgreSQL database"]
async fn test_completion_advances_rotation() {
    let ctx = TestContext::new().await.unwrap();
    let second = common::create_member(&ctx.db, "Second Member").await.unwrap();

    let task = Task::create(
        &ctx.db,
        hearth_shared::models::task::CreateTask {
            name: "Vacuum".to_string(),
            description: "Living room".to_string(),
            due_date: chrono::Utc::now(),
        },
    )
    .await
    .unwrap();
    assert_eq!(task.current_turn_user_id, ctx.user.id);

    let request = Request::builder()
        .method("POST")
        .uri(format!("/v1/tasks/{}/complete", task.id))
        .header(header::AUTHORIZATION, ctx.auth_header())
        .body(Body::empty())
        .unwrap();

    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["rotation_index"], 1);
    assert_eq!(json["current_turn_user_id"], second.id.to_string());
    assert!(json["last_completed_at"].is_string());

    ctx.cleanup().await.unwrap();
}

/// Completing out of turn is a 409 with the not_your_turn code and no
/// side effects
#[tokio::test]
#[ignore = "requires a PostgreSQL database"]
async fn test_complete_out_of_turn_rejected() {
    let ctx = TestContext::new().await.unwrap();
    let second = common::create_member(&ctx.db, "Second Member").await.unwrap();

    let task = Task::create(
        &ctx.db,
        hearth_shared::models::task::CreateTask {
            name: "Bins".to_string(),
            description: "Take out".to_string(),
            due_date: chrono::Utc::now(),
        },
    )
    .await
    .unwrap();

    // The task belongs to the first member; the second tries to jump in
    let request = Request::builder()
        .method("POST")
        .uri(format!("/v1/tasks/{}/complete", task.id))
        .header(
            header::AUTHORIZATION,
            format!("Bearer {}", ctx.token_for(second.id)),
        )
        .body(Body::empty())
        .unwrap();

    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let json = body_json(response).await;
    assert_eq!(json["error"], "not_your_turn");

    // Rotation state untouched
    let unchanged = Task::find_by_id(&ctx.db, task.id).await.unwrap().unwrap();
    assert_eq!(unchanged.rotation_index, 0);
    assert_eq!(unchanged.current_turn_user_id, ctx.user.id);
    assert!(unchanged.last_completed_at.is_none());

    ctx.cleanup().await.unwrap();
}

/// In a single-member household the turn loops back immediately, so a rapid
/// second completion lands in the debounce window
#[tokio::test]
#[ignore = "requires a PostgreSQL database"]
async fn test_duplicate_completion_debounced() {
    let ctx = TestContext::new().await.unwrap();

    let task = Task::create(
        &ctx.db,
        hearth_shared::models::task::CreateTask {
            name: "Plants".to_string(),
            description: "Water them".to_string(),
            due_date: chrono::Utc::now(),
        },
    )
    .await
    .unwrap();

    let complete = || {
        Request::builder()
            .method("POST")
            .uri(format!("/v1/tasks/{}/complete", task.id))
            .header(header::AUTHORIZATION, ctx.auth_header())
            .body(Body::empty())
            .unwrap()
    };

    let response = ctx.app.clone().call(complete()).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = ctx.app.clone().call(complete()).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let json = body_json(response).await;
    assert_eq!(json["error"], "duplicate_completion");

    ctx.cleanup().await.unwrap();
}

/// Two simultaneous completion attempts serialize on the task row lock:
/// exactly one advances the rotation, the loser gets a 409, and only one
/// completion record exists afterwards
#[tokio::test]
#[ignore = "requires a PostgreSQL database"]
async fn test_racing_completions_admit_exactly_one() {
    let ctx = TestContext::new().await.unwrap();
    common::create_member(&ctx.db, "Second Member").await.unwrap();

    let task = Task::create(
        &ctx.db,
        hearth_shared::models::task::CreateTask {
            name: "Mop".to_string(),
            description: "Kitchen floor".to_string(),
            due_date: chrono::Utc::now(),
        },
    )
    .await
    .unwrap();

    let complete = || {
        Request::builder()
            .method("POST")
            .uri(format!("/v1/tasks/{}/complete", task.id))
            .header(header::AUTHORIZATION, ctx.auth_header())
            .body(Body::empty())
            .unwrap()
    };

    let (first, second) = tokio::join!(
        ctx.app.clone().call(complete()),
        ctx.app.clone().call(complete()),
    );
    let statuses = [first.unwrap().status(), second.unwrap().status()];

    assert!(statuses.contains(&StatusCode::OK), "got {:?}", statuses);
    assert!(
        statuses.contains(&StatusCode::CONFLICT),
        "got {:?}",
        statuses
    );

    // The loser left no trace: one completion row, rotation advanced once
    let completions: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM task_completions WHERE task_id = $1")
            .bind(task.id)
            .fetch_one(&ctx.db)
            .await
            .unwrap();
    assert_eq!(completions, 1);

    let task = Task::find_by_id(&ctx.db, task.id).await.unwrap().unwrap();
    assert_eq!(task.rotation_index, 1);

    ctx.cleanup().await.unwrap();
}

/// Editing another member's purchase is forbidden
#[tokio::test]
#[ignore = "requires a PostgreSQL database"]
async fn test_purchase_ownership_enforced() {
    let ctx = TestContext::new().await.unwrap();
    let second = common::create_member(&ctx.db, "Second Member").await.unwrap();

    let purchase = hearth_shared::models::purchase::Purchase::create(
        &ctx.db,
        hearth_shared::models::purchase::CreatePurchase {
            user_id: second.id,
            item: "Milk".to_string(),
            quantity: 2,
            price: 3.5,
            purchase_date: chrono::Utc::now(),
        },
    )
    .await
    .unwrap();

    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/v1/purchases/{}", purchase.id))
        .header(header::AUTHORIZATION, ctx.auth_header())
        .body(Body::empty())
        .unwrap();

    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    ctx.cleanup().await.unwrap();
}

/// The last remaining member cannot leave the household
#[tokio::test]
#[ignore = "requires a PostgreSQL database"]
async fn test_last_member_cannot_leave() {
    let ctx = TestContext::new().await.unwrap();

    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/v1/roommates/{}", ctx.user.id))
        .header(header::AUTHORIZATION, ctx.auth_header())
        .body(Body::empty())
        .unwrap();

    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let json = body_json(response).await;
    assert_eq!(json["error"], "last_user");

    ctx.cleanup().await.unwrap();
}

/// Two members of a two-person household leaving at the same time cannot
/// empty the roster: the removals serialize on the member-row locks and
/// the second one hits the last-member guard
#[tokio::test]
#[ignore = "requires a PostgreSQL database"]
async fn test_racing_removals_keep_one_member() {
    let ctx = TestContext::new().await.unwrap();
    let second = common::create_member(&ctx.db, "Second Member").await.unwrap();

    let leave = |user_id: uuid::Uuid, token: String| {
        Request::builder()
            .method("DELETE")
            .uri(format!("/v1/roommates/{}", user_id))
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap()
    };

    let (first, second_resp) = tokio::join!(
        ctx.app
            .clone()
            .call(leave(ctx.user.id, ctx.session_token.clone())),
        ctx.app
            .clone()
            .call(leave(second.id, ctx.token_for(second.id))),
    );
    let statuses = [first.unwrap().status(), second_resp.unwrap().status()];

    assert!(statuses.contains(&StatusCode::OK), "got {:?}", statuses);
    assert!(
        statuses.contains(&StatusCode::CONFLICT),
        "got {:?}",
        statuses
    );

    let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(&ctx.db)
        .await
        .unwrap();
    assert_eq!(remaining, 1, "the household must never be emptied");

    ctx.cleanup().await.unwrap();
}

/// Leaving the household reassigns held tasks to the new roster head and
/// resets their rotation index
#[tokio::test]
#[ignore = "requires a PostgreSQL database"]
async fn test_member_removal_reassigns_tasks() {
    let ctx = TestContext::new().await.unwrap();
    let second = common::create_member(&ctx.db, "Second Member").await.unwrap();

    let task = Task::create(
        &ctx.db,
        hearth_shared::models::task::CreateTask {
            name: "Windows".to_string(),
            description: "Inside only".to_string(),
            due_date: chrono::Utc::now(),
        },
    )
    .await
    .unwrap();
    assert_eq!(task.current_turn_user_id, ctx.user.id);

    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/v1/roommates/{}", ctx.user.id))
        .header(header::AUTHORIZATION, ctx.auth_header())
        .body(Body::empty())
        .unwrap();

    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let task = Task::find_by_id(&ctx.db, task.id).await.unwrap().unwrap();
    assert_eq!(task.current_turn_user_id, second.id);
    assert_eq!(task.rotation_index, 0);

    ctx.cleanup().await.unwrap();
}

/// Roommate list carries contribution stats for zero-activity members too
#[tokio::test]
#[ignore = "requires a PostgreSQL database"]
async fn test_roommates_include_zero_activity_stats() {
    let ctx = TestContext::new().await.unwrap();

    let request = Request::builder()
        .method("GET")
        .uri("/v1/roommates")
        .header(header::AUTHORIZATION, ctx.auth_header())
        .body(Body::empty())
        .unwrap();

    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let me = json
        .as_array()
        .unwrap()
        .iter()
        .find(|s| s["user_id"] == ctx.user.id.to_string())
        .expect("context user in roster");
    assert_eq!(me["purchase_count"], 0);
    assert_eq!(me["task_count"], 0);
    assert_eq!(me["total_contributions"], 0);

    ctx.cleanup().await.unwrap();
}
