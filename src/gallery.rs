//! ギャラリーのメタデータサービス
//!
//! 画像一覧とメタデータストアをマージし、編集内容をストア全体ごと保存する。
//! ストアは `Gallery` が所有し、読み込み・保存はすべてここを通す。

use crate::config::Config;
use crate::error::Result;
use crate::listing::{ListingChain, ListingSource};
use crate::remote::RemoteClient;
use crate::storage::{SaveOutcome, StorageBackend, StorageChain};
use picviewer_common::{
    file_name_of, normalize_source_url, normalize_tags, ImageMetadata, ImageRecord,
    MetadataStore, METADATA_FILE_NAME,
};
use tracing::info;

pub struct Gallery {
    store: MetadataStore,
    storage: StorageChain,
    listing: ListingChain,
    /// 保存先からストアを読み込み済みか
    loaded: bool,
}

impl Gallery {
    pub fn new(storage: StorageChain, listing: ListingChain) -> Self {
        Self {
            store: MetadataStore::new(),
            storage,
            listing,
            loaded: false,
        }
    }

    /// 設定から保存先・一覧取得元のチェーンを組み立てる
    ///
    /// - サーバーURLあり: API → ローカルキャッシュ / API → 静的API → フォルダ
    /// - なし: サイドカー → ローカルキャッシュ / フォルダ → 静的一覧ファイル
    pub fn from_config(config: &Config) -> Result<Self> {
        let cache_path = config.resolved_cache_path()?;
        let directory = ListingSource::Directory(config.pics_dir.clone());

        let (storage, listing) = match &config.server_url {
            Some(url) => {
                let client = RemoteClient::new(url.clone())?;
                (
                    vec![
                        StorageBackend::Remote(client.clone()),
                        StorageBackend::LocalCache(cache_path),
                    ],
                    vec![
                        ListingSource::RemoteApi(client.clone()),
                        ListingSource::RemoteStatic(client),
                        directory,
                    ],
                )
            }
            None => (
                vec![
                    StorageBackend::Sidecar(config.pics_dir.join(METADATA_FILE_NAME)),
                    StorageBackend::LocalCache(cache_path),
                ],
                vec![
                    directory,
                    ListingSource::StaticListing(
                        config.public_dir.join(crate::scanner::SCAN_LISTING_PATH),
                    ),
                ],
            ),
        };

        Ok(Self::new(StorageChain::new(storage), ListingChain::new(listing)))
    }

    pub fn store(&self) -> &MetadataStore {
        &self.store
    }

    pub fn storage(&self) -> &StorageChain {
        &self.storage
    }

    pub fn listing(&self) -> &ListingChain {
        &self.listing
    }

    /// メタデータを読み直し、画像一覧とマージして返す
    pub async fn load(&mut self) -> Vec<ImageRecord> {
        self.store = self.storage.load().await;
        self.loaded = true;
        let files = self.listing.list().await;

        let images: Vec<ImageRecord> = files
            .iter()
            .map(|entry| ImageRecord::from_entry(entry, self.store.get(&entry.name)))
            .collect();

        info!("画像を読み込みました: {}件", images.len());
        images
    }

    /// 1ファイル分のタグと入手元URLを上書きし、ストア全体を保存
    ///
    /// 保存はストア全体の上書きなので、`load` 前に呼ばれた場合は
    /// 先に保存先から読み込んで既存エントリを消さないようにする。
    pub async fn save(
        &mut self,
        image: &str,
        tags: Vec<String>,
        source_url: Option<String>,
    ) -> SaveOutcome {
        self.ensure_loaded().await;
        let file_name = file_name_of(image).to_string();
        self.store
            .insert(file_name.clone(), ImageMetadata::new(tags, source_url));
        self.persist(&file_name).await
    }

    /// タグだけを更新（入手元URLは維持）
    pub async fn save_tags(&mut self, image: &str, tags: Vec<String>) -> SaveOutcome {
        self.ensure_loaded().await;
        let file_name = file_name_of(image).to_string();
        self.store.entry(file_name.clone()).or_default().tags = normalize_tags(tags);
        self.persist(&file_name).await
    }

    /// 入手元URLだけを更新（空文字なら削除）
    pub async fn save_source_url(&mut self, image: &str, source_url: &str) -> SaveOutcome {
        self.ensure_loaded().await;
        let file_name = file_name_of(image).to_string();
        self.store.entry(file_name.clone()).or_default().source_url =
            normalize_source_url(Some(source_url.to_string()));
        self.persist(&file_name).await
    }

    pub fn tags_for(&self, image: &str) -> Vec<String> {
        self.store
            .get(file_name_of(image))
            .map(|m| m.tags.clone())
            .unwrap_or_default()
    }

    pub fn source_url_for(&self, image: &str) -> Option<String> {
        self.store
            .get(file_name_of(image))
            .and_then(|m| m.source_url.clone())
    }

    async fn ensure_loaded(&mut self) {
        if !self.loaded {
            self.store = self.storage.load().await;
            self.loaded = true;
        }
    }

    async fn persist(&self, file_name: &str) -> SaveOutcome {
        let outcome = self.storage.save(&self.store).await;
        if let SaveOutcome::Saved(backend) = &outcome {
            info!("メタデータを保存しました: {} → {}", file_name, backend);
        }
        outcome
    }
}
