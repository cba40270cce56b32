use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use civic_cli::client::CivicClient;
use civic_cli::error::CivicError;
use civic_cli::session::{Role, Session};
use civic_cli::types::Profile;

fn session() -> Session {
    Session {
        access: "old-token".to_string(),
        refresh: "refresh-token".to_string(),
        role: Role::Citizen,
        username: "asha".to_string(),
    }
}

#[tokio::test]
async fn expired_token_is_refreshed_and_request_replayed_once() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let session_path = dir.path().join("session.json");
    session().save(&session_path).unwrap();

    Mock::given(method("GET"))
        .and(path("/api/profile/"))
        .and(header("authorization", "Bearer old-token"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/auth/refresh/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access": "new-token",
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/profile/"))
        .and(header("authorization", "Bearer new-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "username": "asha",
            "points": 3,
            "issues_resolved": 1,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = CivicClient::new(&server.uri(), Some(session()))
        .unwrap()
        .with_session_path(session_path.clone());

    let profile: Profile = client.get("/api/profile/").await.unwrap();
    assert_eq!(profile.username, "asha");

    // The refreshed access token was kept in memory and on disk.
    assert_eq!(client.session().unwrap().access, "new-token");
    let stored = Session::load(&session_path).unwrap();
    assert_eq!(stored.access, "new-token");
    assert_eq!(stored.refresh, "refresh-token");
}

#[tokio::test]
async fn failed_refresh_purges_the_session() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let session_path = dir.path().join("session.json");
    session().save(&session_path).unwrap();

    Mock::given(method("GET"))
        .and(path("/api/profile/"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/auth/refresh/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "detail": "Token is invalid or expired",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = CivicClient::new(&server.uri(), Some(session()))
        .unwrap()
        .with_session_path(session_path.clone());

    let err = client.get::<Profile>("/api/profile/").await.unwrap_err();
    assert!(matches!(err, CivicError::Unauthorized), "got {err}");

    assert!(client.session().is_none());
    assert!(Session::load(&session_path).is_none());
}

#[tokio::test]
async fn a_second_401_after_refresh_gives_up() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let session_path = dir.path().join("session.json");
    session().save(&session_path).unwrap();

    // The server rejects both the original token and the refreshed one.
    Mock::given(method("GET"))
        .and(path("/api/profile/"))
        .respond_with(ResponseTemplate::new(401))
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/auth/refresh/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access": "new-token",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = CivicClient::new(&server.uri(), Some(session()))
        .unwrap()
        .with_session_path(session_path.clone());

    let err = client.get::<Profile>("/api/profile/").await.unwrap_err();
    assert!(matches!(err, CivicError::Unauthorized), "got {err}");
    assert!(Session::load(&session_path).is_none());
}

#[tokio::test]
async fn anonymous_401_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": "Invalid credentials",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = CivicClient::new(&server.uri(), None).unwrap();

    let err = client
        .post::<serde_json::Value>(
            "/api/auth/login/",
            json!({ "username": "asha", "password": "wrong" }),
        )
        .await
        .unwrap_err();

    match err {
        CivicError::Api { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "Invalid credentials");
        }
        other => panic!("expected Api error, got {other}"),
    }
}

#[tokio::test]
async fn forbidden_and_not_found_map_to_their_variants() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/assigned-issues/"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "detail": "Citizens cannot view assigned issues",
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/issues/999/"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let mut client = CivicClient::new(&server.uri(), None).unwrap();

    let err = client
        .get::<Vec<civic_cli::types::Issue>>("/api/assigned-issues/")
        .await
        .unwrap_err();
    assert!(matches!(err, CivicError::Forbidden(_)), "got {err}");

    let err = client
        .get::<civic_cli::types::Issue>("/api/issues/999/")
        .await
        .unwrap_err();
    assert!(matches!(err, CivicError::NotFound(_)), "got {err}");
}
