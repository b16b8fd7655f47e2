//! 開発サーバー
//!
//! - GET  /api/scan-pics       画像フォルダのスキャン結果
//! - POST /api/save-metadata   メタデータ全体でサイドカーを上書き
//! - GET  /api/scan-pics.json  静的一覧ファイル
//! - GET  /pics/*              画像とサイドカー（なければ404）
//! - GET  /health

use crate::scanner::{self, SCAN_LISTING_PATH};
use crate::storage::write_store_file;
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use picviewer_common::{parse_metadata_payload, SaveResponse, ScanResponse, METADATA_FILE_NAME};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// ハンドラ間で共有する状態
#[derive(Debug, Clone)]
pub struct AppState {
    pub pics_dir: Arc<PathBuf>,
    pub public_dir: Arc<PathBuf>,
}

impl AppState {
    pub fn new(pics_dir: PathBuf, public_dir: PathBuf) -> Self {
        Self {
            pics_dir: Arc::new(pics_dir),
            public_dir: Arc::new(public_dir),
        }
    }

    pub fn metadata_path(&self) -> PathBuf {
        self.pics_dir.join(METADATA_FILE_NAME)
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub module: String,
    pub version: String,
}

pub fn build_router(state: AppState) -> Router {
    let pics = ServeDir::new(state.pics_dir.as_path());
    let listing = ServeFile::new(state.public_dir.join(SCAN_LISTING_PATH));

    Router::new()
        .route("/api/scan-pics", get(scan_pics))
        .route("/api/save-metadata", post(save_metadata))
        .route("/health", get(health_check))
        .route_service("/api/scan-pics.json", listing)
        .nest_service("/pics", pics)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /api/scan-pics
async fn scan_pics(State(state): State<AppState>) -> (StatusCode, Json<ScanResponse>) {
    let pics_dir = Arc::clone(&state.pics_dir);
    match tokio::task::spawn_blocking(move || scanner::scan_directory(&pics_dir)).await {
        Ok(files) => {
            info!("スキャン: {}件", files.len());
            (StatusCode::OK, Json(ScanResponse::ok(files)))
        }
        Err(e) => {
            error!("スキャンタスクが異常終了: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ScanResponse {
                    success: false,
                    files: Vec::new(),
                }),
            )
        }
    }
}

/// POST /api/save-metadata
async fn save_metadata(
    State(state): State<AppState>,
    body: Bytes,
) -> (StatusCode, Json<SaveResponse>) {
    let body = String::from_utf8_lossy(&body);

    let store = match parse_metadata_payload(&body) {
        Ok(store) => store,
        Err(e) => {
            error!("メタデータの解析に失敗: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(SaveResponse::failed(e.to_string())),
            );
        }
    };

    let path = state.metadata_path();
    let count = store.len();
    let written = {
        let path = path.clone();
        tokio::task::spawn_blocking(move || write_store_file(&path, &store)).await
    };

    match written {
        Ok(Ok(())) => {
            info!("メタデータを保存: {} ({}件)", path.display(), count);
            (StatusCode::OK, Json(SaveResponse::ok()))
        }
        Ok(Err(e)) => {
            error!("メタデータの書き込みに失敗: {}: {}", path.display(), e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(SaveResponse::failed(e.to_string())),
            )
        }
        Err(e) => {
            error!("書き込みタスクが異常終了: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(SaveResponse::failed(e.to_string())),
            )
        }
    }
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        module: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// 一覧ファイルを生成してからサーバーを起動
pub async fn serve(state: AppState, port: u16) -> crate::error::Result<()> {
    let listing = scanner::write_scan_listing(&state.public_dir, &state.pics_dir)?;
    info!("一覧ファイルを生成しました: {}", listing.display());

    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;
    info!("picviewer listening on http://127.0.0.1:{}", port);

    axum::serve(listener, app).await?;
    Ok(())
}
