//! Integration tests for HTTP API endpoints.

mod common;

use axum::http::StatusCode;
use common::{TestServer, json_request, text_request};
use dayoff_core::TOKEN_LEN;
use dayoff_core::token::is_token_alphabet;
use dayoff_metadata::repos::OverrideRepo;

#[tokio::test]
async fn test_index_greets() {
    let server = TestServer::new().await;

    let (status, body) = text_request(&server.router, "GET", "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Hello, World!");
}

#[tokio::test]
async fn test_health_check() {
    let server = TestServer::new().await;

    let (status, json) = json_request(&server.router, "GET", "/v1/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["calendar"], "fixed");
}

#[tokio::test]
async fn test_register_returns_token_once() {
    let server = TestServer::new().await;
    let uri = format!("/register/alice?token={}", server.root_token);

    let (status, token) = text_request(&server.router, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(token.len(), TOKEN_LEN);
    assert!(is_token_alphabet(&token));

    let (status, body) = text_request(&server.router, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body, "username already exists");

    // The first token still works after the rejected duplicate
    let lookup = format!("/alice/20241001?token={token}");
    let (status, body) = text_request(&server.router, "GET", &lookup, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "1");
}

#[tokio::test]
async fn test_register_via_post() {
    let server = TestServer::new().await;
    let uri = format!("/register/bobby?token={}", server.root_token);

    let (status, json) = json_request(&server.router, "POST", &uri).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["code"], "created");
    assert_eq!(json["token"].as_str().unwrap().len(), TOKEN_LEN);
}

#[tokio::test]
async fn test_root_token_keeps_authorizing_registration() {
    let server = TestServer::new().await;

    for name in ["user1", "user2", "user3", "user4"] {
        server.register(name).await;
    }
}

#[tokio::test]
async fn test_register_requires_root_token() {
    let server = TestServer::new().await;
    let alice = server.register("alice").await;

    let (status, body) = text_request(&server.router, "GET", "/register/bobby", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, "token is required");

    let uri = format!("/register/bobby?token={alice}");
    let (status, body) = text_request(&server.router, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, "authorize failed");
}

#[tokio::test]
async fn test_bad_usernames_fail_regardless_of_token() {
    let server = TestServer::new().await;
    let alice = server.register("alice").await;

    for name in ["abc", "abcdefghijklmnopq"] {
        for token in [server.root_token.as_str(), "wrong", ""] {
            let uri = format!("/register/{name}?token={token}");
            let (status, _) = text_request(&server.router, "GET", &uri, None).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "register {name}");

            let uri = format!("/{name}/20241001?token={token}");
            let (status, _) = text_request(&server.router, "GET", &uri, None).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "lookup {name}");
        }
    }

    // Boundary lengths are accepted by the length check
    let uri = format!("/abcd/20241001?token={alice}");
    let (status, _) = text_request(&server.router, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_reserved_username_rejected() {
    let server = TestServer::new().await;
    let uri = format!("/register/register?token={}", server.root_token);

    let (status, json) = json_request(&server.router, "GET", &uri).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "bad_request");
}

#[tokio::test]
async fn test_lookup_follows_calendar_without_override() {
    let server = TestServer::new().await;
    let token = server.register("alice").await;

    let cases = [
        ("20241001", "1"), // holiday
        ("20240929", "0"), // make-up workday on a Sunday
        ("20240615", "1"), // Saturday
        ("20240611", "0"), // Tuesday
    ];
    for (day, expected) in cases {
        let uri = format!("/alice/{day}?token={token}");
        let (status, body) = text_request(&server.router, "GET", &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, expected, "{day}");
    }
}

#[tokio::test]
async fn test_lookup_date_errors_precede_auth() {
    let server = TestServer::new().await;

    let (status, body) = text_request(&server.router, "GET", "/alice/2024131", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "date format error, expect yyyyMMdd");

    let (status, body) = text_request(&server.router, "GET", "/alice/20241332", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "invalid date");

    let (status, body) = text_request(&server.router, "GET", "/alice/19991231", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "date format error, expect yyyyMMdd");
}

#[tokio::test]
async fn test_lookup_rejects_other_users_token() {
    let server = TestServer::new().await;
    server.register("alice").await;
    let bobby = server.register("bobby").await;

    let uri = format!("/alice/20241001?token={bobby}");
    let (status, body) = text_request(&server.router, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, "authorize failed");
}

#[tokio::test]
async fn test_force_holiday_wins_over_workday() {
    let server = TestServer::new().await;
    let token = server.register("alice").await;

    let uri = format!("/alice/20240611?token={token}&status=1");
    let (status, body) = text_request(&server.router, "PUT", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "1");

    let calls_before = server.calendar.calls();
    let uri = format!("/alice/20240611?token={token}");
    let (status, json) = json_request(&server.router, "GET", &uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["is_holiday"], true);
    assert_eq!(json["source"], "override");
    assert_eq!(server.calendar.calls(), calls_before);
}

#[tokio::test]
async fn test_force_workday_then_void_restores_calendar() {
    let server = TestServer::new().await;
    let token = server.register("alice").await;
    let lookup = format!("/alice/20241001?token={token}");

    let uri = format!("/alice/20241001?token={token}&status=0");
    text_request(&server.router, "PUT", &uri, None).await;
    let (_, body) = text_request(&server.router, "GET", &lookup, None).await;
    assert_eq!(body, "0");

    let uri = format!("/alice/20241001?token={token}&status=-1");
    let (status, body) = text_request(&server.router, "PUT", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "-1");

    let (_, body) = text_request(&server.router, "GET", &lookup, None).await;
    assert_eq!(body, "1");
}

#[tokio::test]
async fn test_setting_same_status_twice_is_a_no_op() {
    let server = TestServer::new().await;
    let token = server.register("alice").await;
    let uri = format!("/alice/20240101?token={token}&status=1");

    let (_, first) = json_request(&server.router, "PUT", &uri).await;
    let (status, second) = json_request(&server.router, "PUT", &uri).await;
    assert_eq!(first["outcome"], "created");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["outcome"], "unchanged");

    let overrides = server.metadata().list_overrides("alice").await.unwrap();
    assert_eq!(overrides.len(), 1);
    assert_eq!(overrides[0].created_at, overrides[0].updated_at);
}

#[tokio::test]
async fn test_override_validation() {
    let server = TestServer::new().await;
    let token = server.register("alice").await;

    for query in ["status=2", "status=on", ""] {
        let uri = format!("/alice/20240101?token={token}&{query}");
        let (status, body) = text_request(&server.router, "PUT", &uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{query}");
        assert_eq!(body, "invalid status, expect one of 0, 1, -1");
    }

    let uri = format!("/alice/2024-01-01?token={token}&status=1");
    let (status, _) = text_request(&server.router, "PUT", &uri, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Status is validated before the token
    let (status, _) = text_request(&server.router, "PUT", "/alice/20240101?status=7", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) =
        text_request(&server.router, "PUT", "/alice/20240101?status=1", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, "token is required");
}

#[tokio::test]
async fn test_list_overrides_includes_void() {
    let server = TestServer::new().await;
    let token = server.register("alice").await;

    for (day, status) in [("20240305", "1"), ("20240101", "0"), ("20240305", "-1")] {
        let uri = format!("/alice/{day}?token={token}&status={status}");
        text_request(&server.router, "PUT", &uri, None).await;
    }

    let uri = format!("/alice/overrides?token={token}");
    let (status, body) = text_request(&server.router, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "20240101 0\n20240305 -1");

    let (_, json) = json_request(&server.router, "GET", &uri).await;
    assert_eq!(json["overrides"].as_array().unwrap().len(), 2);
    assert_eq!(json["overrides"][0]["status"], 0);
}

#[tokio::test]
async fn test_list_overrides_requires_owner_token() {
    let server = TestServer::new().await;
    server.register("alice").await;

    let uri = format!("/alice/overrides?token={}", server.root_token);
    let (status, _) = text_request(&server.router, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_calendar_failure_is_internal_error() {
    let server = TestServer::new().await;
    let token = server.register("alice").await;

    let uri = format!("/alice/20990101?token={token}");
    let (status, json) = json_request(&server.router, "GET", &uri).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "internal_error");
    assert!(json["message"].as_str().unwrap().contains("2099"));
}

#[tokio::test]
async fn test_override_shadows_unsupported_calendar_year() {
    let server = TestServer::new().await;
    let token = server.register("alice").await;

    let uri = format!("/alice/20990101?token={token}&status=1");
    text_request(&server.router, "PUT", &uri, None).await;

    let uri = format!("/alice/20990101?token={token}");
    let (status, body) = text_request(&server.router, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "1");
}

#[tokio::test]
async fn test_bearer_header_is_accepted() {
    let server = TestServer::new().await;
    let token = server.register("alice").await;

    let request = axum::http::Request::builder()
        .uri("/alice/20241001")
        .header("Authorization", format!("Bearer {token}"))
        .body(axum::body::Body::empty())
        .unwrap();
    let response = tower::ServiceExt::oneshot(server.router.clone(), request)
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_content_negotiation() {
    let server = TestServer::new().await;
    let token = server.register("alice").await;
    let uri = format!("/alice/20241001?token={token}");

    let (_, plain) = text_request(&server.router, "GET", &uri, Some("text/plain")).await;
    assert_eq!(plain, "1");

    let (_, tie) = text_request(&server.router, "GET", &uri, Some("*/*")).await;
    assert_eq!(tie, "1");

    let (_, json) = text_request(
        &server.router,
        "GET",
        &uri,
        Some("text/plain;q=0.2, application/json;q=0.9"),
    )
    .await;
    let json: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(json["code"], "ok");
    assert_eq!(json["message"], "1");
    assert_eq!(json["is_holiday"], true);
}

#[tokio::test]
async fn test_metrics_endpoint_toggle() {
    let server = TestServer::new().await;
    dayoff_server::metrics::register_metrics();
    let (status, _) = text_request(&server.router, "GET", "/metrics", None).await;
    assert_eq!(status, StatusCode::OK);

    let server = TestServer::with_config(|c| c.server.metrics_enabled = false).await;
    let (status, _) = text_request(&server.router, "GET", "/metrics", None).await;
    assert_ne!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_empty_token_fails_authorization() {
    let server = TestServer::new().await;
    server.register("alice").await;

    let (status, body) = text_request(&server.router, "GET", "/alice/20241001?token=", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, "authorize failed");

    let (status, body) = text_request(&server.router, "GET", "/alice/20241001", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, "token is required");
}

#[tokio::test]
async fn test_trace_id_is_echoed() {
    let server = TestServer::new().await;

    let request = axum::http::Request::builder()
        .uri("/")
        .header("X-Trace-Id", "trace-abc\t123")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = tower::ServiceExt::oneshot(server.router.clone(), request)
        .await
        .unwrap();
    assert_eq!(response.headers()["x-trace-id"], "trace-abc123");

    let request = axum::http::Request::builder()
        .uri("/")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = tower::ServiceExt::oneshot(server.router.clone(), request)
        .await
        .unwrap();
    assert_eq!(response.headers()["x-trace-id"].len(), 36);
}
