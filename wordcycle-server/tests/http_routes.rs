//! HTTP contract tests, driving the router in-process with `oneshot`.

use std::io::Write;
use std::sync::Arc;

use axum::body::Body;
use http_body_util::BodyExt;
use hyper::{Request, StatusCode};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tempfile::NamedTempFile;
use tower::ServiceExt;
use wordcycle_core::{InMemorySeenStore, SeenSetSampler, ShuffleSampler, Vocabulary};
use wordcycle_server::config::ServerConfig;
use wordcycle_server::handlers::health::LIVENESS_MESSAGE;
use wordcycle_server::router::{build_router, AppState};

// ── Helpers ────────────────────────────────────────────────────

fn memory_app(vocabulary: Vocabulary) -> axum::Router {
    let sampler = ShuffleSampler::with_rng(vocabulary, StdRng::seed_from_u64(17));
    build_router(AppState::new(Arc::new(sampler)))
}

fn remote_app(vocabulary: Vocabulary, store: InMemorySeenStore) -> axum::Router {
    let sampler = SeenSetSampler::with_rng(vocabulary, store, StdRng::seed_from_u64(17));
    build_router(AppState::new(Arc::new(sampler)))
}

async fn get(app: &axum::Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let resp = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    (status, bytes.to_vec())
}

async fn get_json(app: &axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let (status, bytes) = get(app, uri).await;
    let body = serde_json::from_slice(&bytes).unwrap_or_else(
        |_| serde_json::json!({ "raw": String::from_utf8_lossy(&bytes).to_string() }),
    );
    (status, body)
}

// ── Tests ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_get_returns_entry_with_remaining_count() {
    let vocabulary = Vocabulary::from_json_str(
        r#"[{"term":"ephemeral","definition":"lasting a very short time"}]"#,
    )
    .unwrap();
    let app = memory_app(vocabulary);

    let (status, body) = get_json(&app, "/get").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["remaining_unique"], 0);
    assert_eq!(body["data"]["term"], "ephemeral");
    assert_eq!(body["data"]["definition"], "lasting a very short time");
}

#[tokio::test]
async fn test_memory_backend_cycles_through_all_routes() {
    let app = memory_app(Vocabulary::from_terms(["a", "b", "c"]));

    let mut terms = Vec::new();
    for uri in ["/", "/get", "/api/next-word"] {
        let (status, body) = get_json(&app, uri).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
        terms.push(body["data"]["term"].as_str().unwrap().to_string());
    }
    terms.sort();
    assert_eq!(terms, vec!["a", "b", "c"]);

    // Fourth request starts a new cycle rather than failing.
    let (status, body) = get_json(&app, "/get").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["remaining_unique"], 2);
}

#[tokio::test]
async fn test_empty_vocabulary_is_server_error() {
    let app = memory_app(Vocabulary::default());

    let (status, body) = get_json(&app, "/get").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "No data found");
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_remote_backend_root_is_liveness() {
    let app = remote_app(Vocabulary::from_terms(["a"]), InMemorySeenStore::new());

    let (status, bytes) = get(&app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(String::from_utf8(bytes).unwrap(), LIVENESS_MESSAGE);

    let (status, body) = get_json(&app, "/get").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["term"], "a");
}

#[tokio::test]
async fn test_remote_backend_skips_seen_terms() {
    let app = remote_app(
        Vocabulary::from_terms(["a", "b", "c"]),
        InMemorySeenStore::with_seen(["a", "c"]),
    );

    let (status, body) = get_json(&app, "/get").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["term"], "b");
    assert_eq!(body["remaining_unique"], 0);
}

#[tokio::test]
async fn test_health_always_ok() {
    let app = memory_app(Vocabulary::default());
    let (status, bytes) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(String::from_utf8(bytes).unwrap(), LIVENESS_MESSAGE);
}

#[tokio::test]
async fn test_state_from_config_with_missing_dataset_stays_up() {
    let config = ServerConfig::from_lookup(|key| match key {
        "VOCAB_PATH" => Some("/no/such/words_output.json".to_string()),
        _ => None,
    })
    .unwrap();
    let app = build_router(AppState::from_config(&config).unwrap());

    let (status, _) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = get_json(&app, "/get").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "No data found");
}

#[tokio::test]
async fn test_state_from_config_loads_dataset() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(br#"[{"term":"quixotic","pos":"adj"}]"#).unwrap();
    let path = file.path().to_string_lossy().to_string();

    let config = ServerConfig::from_lookup(|key| match key {
        "VOCAB_PATH" => Some(path.clone()),
        "RELOAD_ON_CYCLE" => Some("true".to_string()),
        _ => None,
    })
    .unwrap();
    let app = build_router(AppState::from_config(&config).unwrap());

    let (status, body) = get_json(&app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], serde_json::json!({"term":"quixotic","pos":"adj"}));
}
