//! 開発サーバーのテスト
//!
//! スキャンAPI・保存APIのレスポンスと、HTTP経由での保存/読み込みを検証

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use picviewer::listing::{ListingChain, ListingSource};
use picviewer::error::PicViewerError;
use picviewer::remote::RemoteClient;
use picviewer::server::{build_router, AppState};
use picviewer::storage::{StorageBackend, StorageChain};
use picviewer::{Gallery, SaveOutcome};
use picviewer_common::{ImageMetadata, MetadataStore, METADATA_FILE_NAME};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tempfile::tempdir;
use tower::util::ServiceExt; // for `oneshot`

fn setup_state(root: &Path) -> (AppState, PathBuf) {
    let public = root.join("public");
    let pics = public.join("pics");
    std::fs::create_dir_all(&pics).unwrap();
    std::fs::write(pics.join("a.jpg"), b"12345").unwrap();
    std::fs::write(pics.join("b.webp"), b"12").unwrap();
    std::fs::write(pics.join("readme.md"), b"# no").unwrap();
    (AppState::new(pics.clone(), public), pics)
}

async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

#[tokio::test]
async fn test_scan_pics_endpoint() {
    let dir = tempdir().expect("Failed to create temp dir");
    let (state, _) = setup_state(dir.path());
    let app = build_router(state);

    let request = Request::get("/api/scan-pics")
        .header("origin", "http://localhost:5173")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("access-control-allow-origin").unwrap(),
        "*"
    );

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["files"].as_array().unwrap().len(), 2);
    assert_eq!(body["files"][0]["name"], "a.jpg");
    assert_eq!(body["files"][0]["size"], 5);
}

#[tokio::test]
async fn test_save_metadata_writes_sidecar() {
    let dir = tempdir().expect("Failed to create temp dir");
    let (state, pics) = setup_state(dir.path());
    let app = build_router(state);

    let payload = r#"{ "a.jpg": { "tags": ["猫"], "sourceUrl": "https://example.com/a" } }"#;
    let request = Request::post("/api/save-metadata")
        .header("content-type", "application/json")
        .body(Body::from(payload))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(extract_json(response.into_body()).await["success"], true);

    let sidecar: Value =
        serde_json::from_str(&std::fs::read_to_string(pics.join(METADATA_FILE_NAME)).unwrap())
            .unwrap();
    assert_eq!(sidecar["a.jpg"]["tags"][0], "猫");
    assert_eq!(sidecar["a.jpg"]["sourceUrl"], "https://example.com/a");
}

#[tokio::test]
async fn test_save_metadata_invalid_body() {
    let dir = tempdir().expect("Failed to create temp dir");
    let (state, pics) = setup_state(dir.path());
    let app = build_router(state);

    let request = Request::post("/api/save-metadata")
        .body(Body::from("{ not json"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["success"], false);
    assert!(body["error"].is_string());
    assert!(!pics.join(METADATA_FILE_NAME).exists());
}

/// 空や `null` のボディでは既存のサイドカーを上書きしない
#[tokio::test]
async fn test_save_metadata_blank_body_keeps_sidecar() {
    let dir = tempdir().expect("Failed to create temp dir");
    let (state, pics) = setup_state(dir.path());
    let sidecar = pics.join(METADATA_FILE_NAME);
    let seeded = r#"{"a.jpg":{"tags":["keep"]}}"#;
    std::fs::write(&sidecar, seeded).unwrap();

    for payload in ["", "  \n", "null"] {
        let request = Request::post("/api/save-metadata")
            .header("content-type", "application/json")
            .body(Body::from(payload))
            .unwrap();
        let response = build_router(state.clone()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR, "body={:?}", payload);

        let body = extract_json(response.into_body()).await;
        assert_eq!(body["success"], false);
        assert_eq!(std::fs::read_to_string(&sidecar).unwrap(), seeded);
    }
}

#[tokio::test]
async fn test_save_metadata_rejects_get() {
    let dir = tempdir().expect("Failed to create temp dir");
    let (state, _) = setup_state(dir.path());
    let app = build_router(state);

    let request = Request::get("/api/save-metadata").body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_metadata_not_found_before_first_save() {
    let dir = tempdir().expect("Failed to create temp dir");
    let (state, _) = setup_state(dir.path());
    let app = build_router(state);

    let request = Request::get("/pics/.picviewer-metadata.json")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_serves_image_files() {
    let dir = tempdir().expect("Failed to create temp dir");
    let (state, _) = setup_state(dir.path());
    let app = build_router(state);

    let request = Request::get("/pics/a.jpg").body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"12345");
}

#[tokio::test]
async fn test_health_endpoint() {
    let dir = tempdir().expect("Failed to create temp dir");
    let (state, _) = setup_state(dir.path());
    let app = build_router(state);

    let request = Request::get("/health").body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "picviewer");
}

/// 実際にサーバーを立ててHTTP経由で保存・再読み込み
#[tokio::test]
async fn test_gallery_through_running_server() {
    let dir = tempdir().expect("Failed to create temp dir");
    let (state, pics) = setup_state(dir.path());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, build_router(state)).await.unwrap();
    });

    let client = RemoteClient::new(format!("http://{}", addr)).unwrap();
    let cache = dir.path().join("cache.json");
    let new_gallery = || {
        Gallery::new(
            StorageChain::new(vec![
                StorageBackend::Remote(client.clone()),
                StorageBackend::LocalCache(cache.clone()),
            ]),
            ListingChain::new(vec![ListingSource::RemoteApi(client.clone())]),
        )
    };

    let mut gallery = new_gallery();
    let images = gallery.load().await;
    assert_eq!(images.len(), 2);

    let outcome = gallery
        .save("/pics/b.webp", vec!["A".into(), "B".into()], None)
        .await;
    assert!(matches!(outcome, SaveOutcome::Saved(ref b) if b.starts_with("remote")));
    assert!(pics.join(METADATA_FILE_NAME).exists());
    // サーバーへの保存成功時もキャッシュに複製される
    assert!(cache.exists());

    let mut reloaded = new_gallery();
    let images = reloaded.load().await;
    let webp = images.iter().find(|i| i.name == "b.webp").unwrap();
    assert_eq!(webp.tags, vec!["A", "B"]);
    assert!(webp.source_url.is_none());
}

/// サーバー側で書き込めない場合は500が返り、チェーンはローカルキャッシュへ進む
#[tokio::test]
async fn test_remote_save_error_falls_back_to_cache() {
    let dir = tempdir().expect("Failed to create temp dir");
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, b"").unwrap();
    let state = AppState::new(blocker.join("pics"), dir.path().join("public"));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, build_router(state)).await.unwrap();
    });

    let client = RemoteClient::new(format!("http://{}", addr)).unwrap();
    let mut store = MetadataStore::new();
    store.insert("a.jpg".into(), ImageMetadata::new(vec!["x".into()], None));

    // サーバーが返したエラー文がそのまま保存先エラーになる
    match client.post_metadata(&store).await {
        Err(PicViewerError::Backend { backend, message }) => {
            assert_eq!(backend, "remote");
            assert!(!message.is_empty());
            assert_ne!(message, "500 Internal Server Error");
        }
        other => panic!("Backendエラーを期待: {:?}", other),
    }

    let cache = dir.path().join("cache.json");
    let chain = StorageChain::new(vec![
        StorageBackend::Remote(client),
        StorageBackend::LocalCache(cache.clone()),
    ]);
    let outcome = chain.save(&store).await;
    assert_eq!(
        outcome,
        SaveOutcome::Saved(format!("local-cache({})", cache.display()))
    );
    assert!(cache.exists());
}
