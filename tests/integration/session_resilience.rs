//! Integration tests for the resilient session against a fake upstream
//!
//! Covers the cache tiers, retry accounting, the fatal login redirect and
//! credential resolution failures.

use httpmock::prelude::*;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use vaccinare_slots::api::{vaccinare_config, ApiConfig, SchedulingApi};
use vaccinare_slots::session::{HttpSession, SessionConfig, SessionError};

fn test_api_config(server: &MockServer) -> ApiConfig {
    let mut config = vaccinare_config();
    config.base_url = server.base_url();
    config.login_url = format!("{}/login", server.base_url());
    config.token_env = "VACCINARE_TOKEN_UNSET_IN_TESTS".to_string();
    config
}

fn session_with(server: &MockServer, config: SessionConfig) -> HttpSession {
    HttpSession::new(test_api_config(server), config)
}

fn token_config() -> SessionConfig {
    SessionConfig {
        session_token: Some("test-token".to_string()),
        ..SessionConfig::default()
    }
}

#[tokio::test]
async fn test_fresh_cache_entry_skips_the_network() {
    let server = MockServer::start_async().await;
    let cache_dir = TempDir::new().unwrap();

    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/nomenclatures/api/county");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"[{"id":10,"name":"Cluj"}]"#);
        })
        .await;

    let session = session_with(
        &server,
        SessionConfig {
            cache_lifetime: Some(Duration::from_secs(3600)),
            cache_path: Some(cache_dir.path().to_path_buf()),
            ..token_config()
        },
    );
    let api = SchedulingApi::new(Arc::new(session));

    let first = api.counties().await.unwrap();
    let second = api.counties().await.unwrap();

    assert_eq!(first, second);
    mock.assert_hits_async(1).await;
}

#[tokio::test]
async fn test_fallback_tier_serves_stale_entry_after_live_failure() {
    let server = MockServer::start_async().await;
    let cache_dir = TempDir::new().unwrap();

    // Fresh tier disabled, fallback tier long: the first response is cached
    // but never short-circuits a live request.
    let session = session_with(
        &server,
        SessionConfig {
            cache_lifetime: None,
            fallback_cache_lifetime: Some(Duration::from_secs(3600)),
            cache_path: Some(cache_dir.path().to_path_buf()),
            max_retries: 0,
            ..token_config()
        },
    );
    let api = SchedulingApi::new(Arc::new(session));

    let ok_mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/nomenclatures/api/county");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"[{"id":10,"name":"Cluj"}]"#);
        })
        .await;
    let first = api.counties().await.unwrap();
    ok_mock.assert_hits_async(1).await;
    ok_mock.delete_async().await;

    let failing_mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/nomenclatures/api/county");
            then.status(500).body("upstream down");
        })
        .await;

    // The caller observes success even though the live fetch failed.
    let second = api.counties().await.unwrap();
    assert_eq!(first, second);
    failing_mock.assert_hits_async(1).await;
}

#[tokio::test]
async fn test_exhausted_retries_without_fallback_surface_attempt_count() {
    let server = MockServer::start_async().await;

    let failing_mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/nomenclatures/api/county");
            then.status(500).body("upstream down");
        })
        .await;

    let session = session_with(
        &server,
        SessionConfig {
            max_retries: 2,
            ..token_config()
        },
    );
    let api = SchedulingApi::new(Arc::new(session));

    let err = api.counties().await.unwrap_err();
    match err {
        SessionError::RequestExhausted { attempts, .. } => assert_eq!(attempts, 3),
        other => panic!("expected RequestExhausted, got: {other}"),
    }
    failing_mock.assert_hits_async(3).await;
}

#[tokio::test]
async fn test_login_redirect_is_fatal_and_never_retried() {
    let server = MockServer::start_async().await;
    let login_url = format!("{}/login", server.base_url());

    let redirect_mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/nomenclatures/api/county");
            then.status(302).header("location", &login_url);
        })
        .await;

    let session = session_with(
        &server,
        SessionConfig {
            max_retries: 5,
            ..token_config()
        },
    );
    let api = SchedulingApi::new(Arc::new(session));

    let err = api.counties().await.unwrap_err();
    assert!(matches!(err, SessionError::AuthenticationExpired));
    redirect_mock.assert_hits_async(1).await;
}

#[tokio::test]
async fn test_malformed_body_counts_as_a_failed_attempt() {
    let server = MockServer::start_async().await;

    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/nomenclatures/api/county");
            then.status(200).body("<html>not json</html>");
        })
        .await;

    let session = session_with(
        &server,
        SessionConfig {
            max_retries: 1,
            ..token_config()
        },
    );
    let api = SchedulingApi::new(Arc::new(session));

    let err = api.counties().await.unwrap_err();
    assert!(matches!(err, SessionError::RequestExhausted { .. }));
    mock.assert_hits_async(2).await;
}

#[tokio::test]
async fn test_session_cookie_travels_on_every_request() {
    let server = MockServer::start_async().await;

    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/nomenclatures/api/county")
                .header("cookie", "SESSION=test-token");
            then.status(200)
                .header("content-type", "application/json")
                .body("[]");
        })
        .await;

    let session = session_with(&server, token_config());
    let api = SchedulingApi::new(Arc::new(session));

    api.counties().await.unwrap();
    mock.assert_hits_async(1).await;
}

#[tokio::test]
async fn test_missing_token_fails_before_any_network_activity() {
    let server = MockServer::start_async().await;
    let cache_dir = TempDir::new().unwrap();

    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/nomenclatures/api/county");
            then.status(200).body("[]");
        })
        .await;

    let session = session_with(
        &server,
        SessionConfig {
            session_token: None,
            cache_path: Some(cache_dir.path().to_path_buf()),
            ..SessionConfig::default()
        },
    );
    let api = SchedulingApi::new(Arc::new(session));

    let err = api.counties().await.unwrap_err();
    assert!(matches!(err, SessionError::Configuration(_)));
    mock.assert_hits_async(0).await;
}
