//! 開発サーバーとのHTTP通信

use crate::error::{PicViewerError, Result};
use picviewer_common::{
    parse_metadata_store, MetadataStore, SaveResponse, ScanResponse, METADATA_FILE_NAME,
    PICS_URL_PREFIX,
};
use reqwest::StatusCode;
use std::time::Duration;
use tracing::debug;

const REQUEST_TIMEOUT_SECS: u64 = 10;

/// 開発サーバーのAPIクライアント
#[derive(Debug, Clone)]
pub struct RemoteClient {
    http: reqwest::Client,
    base_url: String,
}

impl RemoteClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET /pics/.picviewer-metadata.json（404は空のストア）
    pub async fn fetch_metadata(&self) -> Result<MetadataStore> {
        let url = self.url(&format!("{}/{}", PICS_URL_PREFIX, METADATA_FILE_NAME));
        debug!(url = %url, "メタデータを取得");

        let response = self.http.get(&url).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Ok(MetadataStore::new());
        }
        if !status.is_success() {
            return Err(PicViewerError::backend(
                "remote",
                format!("GET {} → {}", url, status),
            ));
        }

        let body = response.text().await?;
        Ok(parse_metadata_store(&body)?)
    }

    /// POST /api/save-metadata（ストア全体で上書き）
    pub async fn post_metadata(&self, store: &MetadataStore) -> Result<()> {
        let url = self.url("/api/save-metadata");
        debug!(url = %url, entries = store.len(), "メタデータを送信");

        let response = self.http.post(&url).json(store).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response
                .json::<SaveResponse>()
                .await
                .ok()
                .and_then(|r| r.error)
                .unwrap_or_else(|| status.to_string());
            return Err(PicViewerError::backend("remote", message));
        }

        Ok(())
    }

    /// GET /api/scan-pics
    pub async fn fetch_scan(&self) -> Result<ScanResponse> {
        self.get_scan_response("/api/scan-pics").await
    }

    /// GET /api/scan-pics.json（静的に生成された一覧）
    pub async fn fetch_static_scan(&self) -> Result<ScanResponse> {
        self.get_scan_response("/api/scan-pics.json").await
    }

    async fn get_scan_response(&self, path: &str) -> Result<ScanResponse> {
        let url = self.url(path);
        debug!(url = %url, "画像一覧を取得");

        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(PicViewerError::backend(
                "remote",
                format!("GET {} → {}", url, status),
            ));
        }

        Ok(response.json::<ScanResponse>().await?)
    }
}
