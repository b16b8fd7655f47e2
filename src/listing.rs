//! 画像一覧の取得元チェーン
//!
//! 開発サーバーがあれば API → 静的一覧 → フォルダ直接スキャン、
//! なければ フォルダ直接スキャン → 静的一覧ファイル の順に試す。

use crate::error::{PicViewerError, Result};
use crate::remote::RemoteClient;
use crate::scanner;
use picviewer_common::{FileEntry, ScanResponse};
use std::fmt;
use std::path::PathBuf;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub enum ListingSource {
    /// GET /api/scan-pics
    RemoteApi(RemoteClient),
    /// GET /api/scan-pics.json
    RemoteStatic(RemoteClient),
    /// ローカルの scan-pics.json
    StaticListing(PathBuf),
    /// フォルダを直接スキャン（フォルダがなければ次へ）
    Directory(PathBuf),
}

impl ListingSource {
    pub async fn list(&self) -> Result<Vec<FileEntry>> {
        let response = match self {
            ListingSource::RemoteApi(client) => client.fetch_scan().await?,
            ListingSource::RemoteStatic(client) => client.fetch_static_scan().await?,
            ListingSource::StaticListing(path) => {
                let content = std::fs::read_to_string(path)?;
                serde_json::from_str::<ScanResponse>(&content)?
            }
            ListingSource::Directory(path) => {
                if !path.is_dir() {
                    return Err(PicViewerError::FolderNotFound(path.display().to_string()));
                }
                return Ok(scanner::scan_directory(path));
            }
        };

        if !response.success {
            return Err(PicViewerError::backend(
                self.to_string(),
                "success: false が返されました",
            ));
        }
        Ok(response.files)
    }
}

impl fmt::Display for ListingSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListingSource::RemoteApi(client) => write!(f, "api({})", client.base_url()),
            ListingSource::RemoteStatic(client) => write!(f, "static-api({})", client.base_url()),
            ListingSource::StaticListing(path) => write!(f, "static({})", path.display()),
            ListingSource::Directory(path) => write!(f, "directory({})", path.display()),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ListingChain {
    sources: Vec<ListingSource>,
}

impl ListingChain {
    pub fn new(sources: Vec<ListingSource>) -> Self {
        Self { sources }
    }

    pub fn sources(&self) -> &[ListingSource] {
        &self.sources
    }

    /// 最初に成功した取得元の一覧を返す。全滅なら空
    pub async fn list(&self) -> Vec<FileEntry> {
        for source in &self.sources {
            match source.list().await {
                Ok(files) => {
                    debug!("画像一覧を取得: {} ({}件)", source, files.len());
                    return files;
                }
                Err(e) => warn!("画像一覧の取得に失敗、次を試します: {}: {}", source, e),
            }
        }

        warn!("画像一覧を取得できませんでした");
        Vec::new()
    }
}
