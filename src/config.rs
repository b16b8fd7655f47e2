use crate::error::{PicViewerError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 画像フォルダ（サイドカーもここに置く）
    pub pics_dir: PathBuf,
    /// 静的ファイルの公開ルート（api/scan-pics.json の出力先）
    pub public_dir: PathBuf,
    /// 開発サーバーのポート
    pub port: u16,
    /// 起動中の開発サーバーURL（設定時はHTTP経由で読み書き）
    pub server_url: Option<String>,
    /// ローカルキャッシュファイル（未設定時はOSのキャッシュディレクトリ）
    pub cache_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pics_dir: PathBuf::from("public").join("pics"),
            public_dir: PathBuf::from("public"),
            port: 1420,
            server_url: None,
            cache_path: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| PicViewerError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("picviewer").join("config.json"))
    }

    /// ローカルキャッシュの保存先
    pub fn resolved_cache_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.cache_path {
            return Ok(path.clone());
        }

        let cache = dirs::cache_dir()
            .ok_or_else(|| PicViewerError::Config("キャッシュディレクトリが見つかりません".into()))?;
        Ok(cache.join("picviewer").join("metadata.json"))
    }

    pub fn set_server_url(&mut self, url: Option<String>) {
        self.server_url = url
            .map(|u| u.trim().trim_end_matches('/').to_string())
            .filter(|u| !u.is_empty());
    }
}
