//! Integration tests for the lazy enumeration pipeline against a fake upstream
//!
//! Exercises page following in the centre listing, the per-centre ordering of
//! the composed enumerator, capacity filtering and the stream adapter.

use futures_util::TryStreamExt;
use httpmock::prelude::*;
use serde_json::json;
use std::sync::Arc;
use vaccinare_slots::api::{vaccinare_config, SchedulingApi};
use vaccinare_slots::session::{HttpSession, SessionConfig};

fn api_for(server: &MockServer) -> SchedulingApi {
    let mut api_config = vaccinare_config();
    api_config.base_url = server.base_url();
    api_config.login_url = format!("{}/login", server.base_url());
    api_config.token_env = "VACCINARE_TOKEN_UNSET_IN_TESTS".to_string();

    let session_config = SessionConfig {
        session_token: Some("test-token".to_string()),
        ..SessionConfig::default()
    };
    SchedulingApi::new(Arc::new(HttpSession::new(api_config, session_config)))
}

fn centre_json(id: i64, name: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "code": format!("C{id}"),
        "countyID": 10,
        "countyName": "Cluj",
        "localityID": 20,
        "localityName": "Cluj-Napoca",
        "address": format!("Str. {name} 1"),
        "availableSlots": 5,
    })
}

#[tokio::test]
async fn test_centre_pager_follows_pages_in_order() {
    let server = MockServer::start_async().await;
    let api = api_for(&server);

    let page0 = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/scheduling/api/centres")
                .query_param("page", "0");
            then.status(200).json_body(json!({
                "content": [centre_json(1, "Centrul A"), centre_json(2, "Centrul B")],
                "last": false,
            }));
        })
        .await;
    let page1 = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/scheduling/api/centres")
                .query_param("page", "1");
            then.status(200).json_body(json!({
                "content": [centre_json(3, "Centrul C")],
                "last": true,
            }));
        })
        .await;

    let mut pager = api.centres(None, 2);
    let mut ids = Vec::new();
    while let Some(centre) = pager.next().await.unwrap() {
        ids.push(centre.id);
    }

    assert_eq!(ids, vec![1, 2, 3]);
    page0.assert_hits_async(1).await;
    page1.assert_hits_async(1).await;
}

#[tokio::test]
async fn test_enumeration_keeps_each_centre_contiguous() {
    let server = MockServer::start_async().await;
    let api = api_for(&server);

    server
        .mock_async(|when, then| {
            when.method(POST).path("/scheduling/api/centres");
            then.status(200).json_body(json!({
                "content": [centre_json(1, "Centrul A"), centre_json(2, "Centrul B")],
                "last": true,
            }));
        })
        .await;

    // Month and day lookups are matched on centre identity only; the
    // enumeration anchors its month cursor at the current day.
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/scheduling/api/time_slots/month_available_places")
                .json_body_partial(r#"{"centerID": 1}"#);
            then.status(200).json_body(json!([
                {"startTime": "09-02-2021 00:00:00.000000", "availablePlaces": 2},
            ]));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/scheduling/api/time_slots/day_slots")
                .json_body_partial(r#"{"centerID": 1}"#);
            then.status(200).json_body(json!([
                {
                    "centerID": 1,
                    "startTime": "09-02-2021 09:00:00.000000",
                    "endTime": "09-02-2021 09:05:00.000000",
                    "availablePlaces": 1,
                },
                {
                    "centerID": 1,
                    "startTime": "09-02-2021 10:00:00.000000",
                    "endTime": "09-02-2021 10:05:00.000000",
                    "availablePlaces": 1,
                },
            ]));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/scheduling/api/time_slots/month_available_places")
                .json_body_partial(r#"{"centerID": 2}"#);
            then.status(200).json_body(json!([
                {"startTime": "10-02-2021 00:00:00.000000", "availablePlaces": 1},
            ]));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/scheduling/api/time_slots/day_slots")
                .json_body_partial(r#"{"centerID": 2}"#);
            then.status(200).json_body(json!([
                {
                    "centerID": 2,
                    "startTime": "10-02-2021 11:00:00.000000",
                    "endTime": "10-02-2021 11:05:00.000000",
                    "availablePlaces": 1,
                },
            ]));
        })
        .await;

    let mut pairs = api.available_slots_for_all_centres(1);
    let mut observed = Vec::new();
    while let Some((centre, slot)) = pairs.next().await.unwrap() {
        observed.push((centre.id, slot.start_time.format("%H:%M").to_string()));
    }

    assert_eq!(
        observed,
        vec![
            (1, "09:00".to_string()),
            (1, "10:00".to_string()),
            (2, "11:00".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_days_and_slots_without_capacity_are_skipped() {
    let server = MockServer::start_async().await;
    let api = api_for(&server);

    server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/scheduling/api/time_slots/month_available_places")
                .json_body_partial(r#"{"centerID": 1}"#);
            then.status(200).json_body(json!([
                {"startTime": "09-02-2021 00:00:00.000000", "availablePlaces": 0},
                {"startTime": "10-02-2021 00:00:00.000000", "availablePlaces": 3},
            ]));
        })
        .await;
    let closed_day = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/scheduling/api/time_slots/day_slots")
                .json_body_partial(r#"{"currentDate": "09-02-2021 00:00:00.000000"}"#);
            then.status(200).json_body(json!([]));
        })
        .await;
    let open_day = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/scheduling/api/time_slots/day_slots")
                .json_body_partial(r#"{"currentDate": "10-02-2021 00:00:00.000000"}"#);
            then.status(200).json_body(json!([
                {
                    "centerID": 1,
                    "startTime": "10-02-2021 09:00:00.000000",
                    "endTime": "10-02-2021 09:05:00.000000",
                    "availablePlaces": 0,
                },
                {
                    "centerID": 1,
                    "startTime": "10-02-2021 10:00:00.000000",
                    "endTime": "10-02-2021 10:05:00.000000",
                    "availablePlaces": 2,
                },
            ]));
        })
        .await;

    let mut expansion = api.available_slots(1, 1);
    let mut starts = Vec::new();
    while let Some(slot) = expansion.next().await.unwrap() {
        starts.push(slot.start_time.format("%H:%M").to_string());
    }

    assert_eq!(starts, vec!["10:00".to_string()]);
    // The day with zero places is never expanded at all.
    closed_day.assert_hits_async(0).await;
    open_day.assert_hits_async(1).await;
}

#[tokio::test]
async fn test_stream_adapter_yields_the_same_pairs() {
    let server = MockServer::start_async().await;
    let api = api_for(&server);

    server
        .mock_async(|when, then| {
            when.method(POST).path("/scheduling/api/centres");
            then.status(200).json_body(json!({
                "content": [centre_json(1, "Centrul A")],
                "last": true,
            }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/scheduling/api/time_slots/month_available_places");
            then.status(200).json_body(json!([
                {"startTime": "09-02-2021 00:00:00.000000", "availablePlaces": 1},
            ]));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/scheduling/api/time_slots/day_slots");
            then.status(200).json_body(json!([
                {
                    "centerID": 1,
                    "startTime": "09-02-2021 09:00:00.000000",
                    "endTime": "09-02-2021 09:05:00.000000",
                    "availablePlaces": 1,
                },
            ]));
        })
        .await;

    let pairs: Vec<_> = api
        .available_slots_for_all_centres(1)
        .into_stream()
        .try_collect()
        .await
        .unwrap();

    assert_eq!(pairs.len(), 1);
    assert_eq!(pairs[0].0.name, "Centrul A");
    assert_eq!(pairs[0].1.available_places, 1);
}
