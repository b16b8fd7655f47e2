//! メタデータ編集モデル
//!
//! タグの追加・削除と入手元URLの入力を保存前に保持する。

use crate::types::{normalize_source_url, ImageRecord};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataDraft {
    tags: Vec<String>,
    source_url: String,
}

impl MetadataDraft {
    pub fn new(tags: Vec<String>, source_url: Option<String>) -> Self {
        Self {
            tags,
            source_url: source_url.unwrap_or_default(),
        }
    }

    pub fn from_record(record: &ImageRecord) -> Self {
        Self::new(record.tags.clone(), record.source_url.clone())
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    /// タグを追加。空文字・既存タグは無視してfalseを返す
    pub fn add_tag(&mut self, tag: &str) -> bool {
        let tag = tag.trim();
        if tag.is_empty() || self.tags.iter().any(|t| t == tag) {
            return false;
        }
        self.tags.push(tag.to_string());
        true
    }

    pub fn remove_tag(&mut self, tag: &str) -> bool {
        let before = self.tags.len();
        self.tags.retain(|t| t != tag);
        self.tags.len() != before
    }

    pub fn set_source_url(&mut self, url: impl Into<String>) {
        self.source_url = url.into();
    }

    /// 保存用の値に確定（URLは前後空白を除き、空なら未設定）
    pub fn finish(self) -> (Vec<String>, Option<String>) {
        (self.tags, normalize_source_url(Some(self.source_url)))
    }
}
