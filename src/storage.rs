//! メタデータの保存先チェーン
//!
//! 保存先を優先順に並べ、最初に成功したものを採用する。
//! 非キャッシュの保存先に書けた場合はローカルキャッシュにも写しておく。

use crate::error::{PicViewerError, Result};
use crate::remote::RemoteClient;
use picviewer_common::{parse_metadata_store, to_metadata_json, MetadataStore};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, error, warn};

/// 保存先1つ分
#[derive(Debug, Clone)]
pub enum StorageBackend {
    /// 開発サーバーのAPI経由
    Remote(RemoteClient),
    /// 画像フォルダ内のサイドカーファイル
    Sidecar(PathBuf),
    /// ユーザーごとのローカルキャッシュ
    LocalCache(PathBuf),
}

impl StorageBackend {
    pub fn kind(&self) -> &'static str {
        match self {
            StorageBackend::Remote(_) => "remote",
            StorageBackend::Sidecar(_) => "sidecar",
            StorageBackend::LocalCache(_) => "local-cache",
        }
    }

    pub fn is_cache(&self) -> bool {
        matches!(self, StorageBackend::LocalCache(_))
    }

    pub async fn load(&self) -> Result<MetadataStore> {
        match self {
            StorageBackend::Remote(client) => client.fetch_metadata().await,
            StorageBackend::Sidecar(path) | StorageBackend::LocalCache(path) => {
                read_store_file(path)
            }
        }
    }

    pub async fn save(&self, store: &MetadataStore) -> Result<()> {
        match self {
            StorageBackend::Remote(client) => client.post_metadata(store).await,
            StorageBackend::Sidecar(path) | StorageBackend::LocalCache(path) => {
                write_store_file(path, store)
            }
        }
    }
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageBackend::Remote(client) => write!(f, "remote({})", client.base_url()),
            StorageBackend::Sidecar(path) => write!(f, "sidecar({})", path.display()),
            StorageBackend::LocalCache(path) => write!(f, "local-cache({})", path.display()),
        }
    }
}

/// 保存結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// 書き込めた保存先
    Saved(String),
    /// すべての保存先で失敗（メモリ上のストアは更新済み）
    Failed,
}

impl SaveOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, SaveOutcome::Saved(_))
    }
}

#[derive(Debug, Clone, Default)]
pub struct StorageChain {
    backends: Vec<StorageBackend>,
}

impl StorageChain {
    pub fn new(backends: Vec<StorageBackend>) -> Self {
        Self { backends }
    }

    pub fn backends(&self) -> &[StorageBackend] {
        &self.backends
    }

    /// 優先順に読み込み、最初に成功したものを返す。全滅なら空のストア
    pub async fn load(&self) -> MetadataStore {
        for backend in &self.backends {
            match backend.load().await {
                Ok(store) => {
                    debug!("メタデータを読み込み: {} ({}件)", backend, store.len());
                    return store;
                }
                Err(e) => warn!("メタデータの読み込みに失敗、次を試します: {}: {}", backend, e),
            }
        }

        if !self.backends.is_empty() {
            error!("すべての保存先から読み込めませんでした。空のメタデータで続行します");
        }
        MetadataStore::new()
    }

    /// 優先順に保存し、最初に成功した保存先を返す
    pub async fn save(&self, store: &MetadataStore) -> SaveOutcome {
        for (idx, backend) in self.backends.iter().enumerate() {
            match backend.save(store).await {
                Ok(()) => {
                    debug!("メタデータを保存: {}", backend);
                    if !backend.is_cache() {
                        self.mirror_to_caches(idx, store).await;
                    }
                    return SaveOutcome::Saved(backend.to_string());
                }
                Err(e) => warn!("メタデータの保存に失敗、次を試します: {}: {}", backend, e),
            }
        }

        error!("メタデータをどこにも保存できませんでした");
        SaveOutcome::Failed
    }

    async fn mirror_to_caches(&self, saved_idx: usize, store: &MetadataStore) {
        for backend in self.backends.iter().skip(saved_idx + 1).filter(|b| b.is_cache()) {
            if let Err(e) = backend.save(store).await {
                warn!("キャッシュへの複製に失敗: {}: {}", backend, e);
            }
        }
    }
}

fn read_store_file(path: &Path) -> Result<MetadataStore> {
    if !path.exists() {
        return Ok(MetadataStore::new());
    }

    let content = std::fs::read_to_string(path)?;
    parse_metadata_store(&content).map_err(|e| {
        PicViewerError::backend(path.display().to_string(), e.to_string())
    })
}

/// ストア全体を整形済みJSONで上書き
pub fn write_store_file(path: &Path, store: &MetadataStore) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let json = to_metadata_json(store)?;
    std::fs::write(path, json)?;
    Ok(())
}
