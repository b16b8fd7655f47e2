//! 検索・タグ絞り込み
//!
//! ファイル名の部分一致（大文字小文字を区別しない）と、
//! 選択タグすべてを含む画像だけを残すAND絞り込み。

use crate::types::{normalize_tags, ImageRecord};
use std::collections::BTreeSet;

/// 検索条件
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageQuery {
    /// ファイル名検索文字列（空なら全件）
    pub text: String,
    /// 選択中のタグ（すべて含むものだけ残す）
    pub tags: Vec<String>,
}

impl ImageQuery {
    /// タグは保存時と同じく正規化する（前後空白・空文字・重複を除去）
    pub fn new(text: impl Into<String>, tags: Vec<String>) -> Self {
        Self {
            text: text.into(),
            tags: normalize_tags(tags),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.tags.is_empty()
    }

    /// タグの選択をトグル
    pub fn toggle_tag(&mut self, tag: &str) {
        let tag = tag.trim();
        if tag.is_empty() {
            return;
        }
        if let Some(pos) = self.tags.iter().position(|t| t == tag) {
            self.tags.remove(pos);
        } else {
            self.tags.push(tag.to_string());
        }
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.tags.clear();
    }

    pub fn matches(&self, record: &ImageRecord) -> bool {
        let matches_text = self.text.is_empty()
            || record.name.to_lowercase().contains(&self.text.to_lowercase());

        let matches_tags = self.tags.iter().all(|tag| record.has_tag(tag));

        matches_text && matches_tags
    }
}

/// 条件に合う画像だけを返す（順序は維持）
pub fn filter_images<'a>(records: &'a [ImageRecord], query: &ImageQuery) -> Vec<&'a ImageRecord> {
    records.iter().filter(|r| query.matches(r)).collect()
}

/// 全画像に付いているタグの一覧（重複除去・ソート済み）
pub fn available_tags(records: &[ImageRecord]) -> Vec<String> {
    records
        .iter()
        .flat_map(|r| r.tags.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
