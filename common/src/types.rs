//! ギャラリーの型定義
//!
//! CLI・開発サーバー・将来のフロントエンドで共有される型:
//! - ImageRecord: スキャン結果とメタデータをマージした1枚分の画像
//! - ImageMetadata / MetadataStore: サイドカーJSONの中身
//! - FileEntry / ScanResponse / SaveResponse: HTTPエンドポイントの形式

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 開発サーバーが画像を公開するURLパス
pub const PICS_URL_PREFIX: &str = "/pics";

/// メタデータサイドカーのファイル名
pub const METADATA_FILE_NAME: &str = ".picviewer-metadata.json";

/// ギャラリー上の画像1枚
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRecord {
    /// 一意キー（`/pics/<name>`）
    pub path: String,

    /// 表示名（ファイル名）
    pub name: String,

    /// ファイルサイズ（バイト）
    pub size: u64,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
}

impl ImageRecord {
    /// スキャン結果とメタデータから組み立てる
    pub fn from_entry(entry: &FileEntry, metadata: Option<&ImageMetadata>) -> Self {
        let metadata = metadata.cloned().unwrap_or_default();
        Self {
            path: image_path(&entry.name),
            name: entry.name.clone(),
            size: entry.size,
            tags: metadata.tags,
            source_url: metadata.source_url,
        }
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// 1ファイル分のメタデータ
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageMetadata {
    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
}

impl ImageMetadata {
    /// タグと入手元URLを正規化して作成
    pub fn new(tags: Vec<String>, source_url: Option<String>) -> Self {
        Self {
            tags: normalize_tags(tags),
            source_url: normalize_source_url(source_url),
        }
    }
}

/// ファイル名 → メタデータ
///
/// BTreeMapなので保存されるJSONのキー順は常に安定する。
pub type MetadataStore = BTreeMap<String, ImageMetadata>;

/// ディレクトリスキャンの1エントリ
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    pub name: String,
    pub size: u64,
}

/// `/api/scan-pics` のレスポンス
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResponse {
    pub success: bool,
    #[serde(default)]
    pub files: Vec<FileEntry>,
}

impl ScanResponse {
    pub fn ok(files: Vec<FileEntry>) -> Self {
        Self { success: true, files }
    }
}

/// `/api/save-metadata` のレスポンス
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SaveResponse {
    pub fn ok() -> Self {
        Self { success: true, error: None }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(message.into()),
        }
    }
}

/// ファイル名から画像パスを作る
pub fn image_path(file_name: &str) -> String {
    format!("{}/{}", PICS_URL_PREFIX, file_name)
}

/// 画像パス（またはファイル名）からファイル名を取り出す
///
/// 最後の `/` 以降を返す。
pub fn file_name_of(image_path: &str) -> &str {
    image_path.rsplit('/').next().unwrap_or(image_path)
}

/// タグを正規化（前後空白除去・空文字除外・重複除去、初出順を維持）
pub fn normalize_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut normalized: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.as_ref().trim();
        if tag.is_empty() || normalized.iter().any(|t| t == tag) {
            continue;
        }
        normalized.push(tag.to_string());
    }
    normalized
}

/// 空白のみのURLは未設定扱い
pub fn normalize_source_url(source_url: Option<String>) -> Option<String> {
    source_url
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_record_serialize_camel_case() {
        let record = ImageRecord {
            path: "/pics/a.jpg".into(),
            name: "a.jpg".into(),
            size: 10,
            tags: vec!["風景".into()],
            source_url: Some("https://example.com".into()),
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["sourceUrl"], "https://example.com");
        assert_eq!(json["tags"][0], "風景");
    }

    #[test]
    fn test_metadata_without_source_url_omits_field() {
        let meta = ImageMetadata::new(vec!["a".into()], None);
        let json = serde_json::to_string(&meta).unwrap();
        assert_eq!(json, r#"{"tags":["a"]}"#);
    }

    #[test]
    fn test_metadata_store_parses_sidecar() {
        let json = r#"{
            "cat.png": { "tags": ["動物", "可愛い"], "sourceUrl": "https://example.com/cat" },
            "dog.jpg": {}
        }"#;
        let store: MetadataStore = serde_json::from_str(json).unwrap();

        assert_eq!(store["cat.png"].tags, vec!["動物", "可愛い"]);
        assert_eq!(store["cat.png"].source_url.as_deref(), Some("https://example.com/cat"));
        assert!(store["dog.jpg"].tags.is_empty());
        assert!(store["dog.jpg"].source_url.is_none());
    }

    #[test]
    fn test_from_entry_defaults_when_metadata_missing() {
        let entry = FileEntry { name: "x.gif".into(), size: 42 };
        let record = ImageRecord::from_entry(&entry, None);

        assert_eq!(record.path, "/pics/x.gif");
        assert_eq!(record.size, 42);
        assert!(record.tags.is_empty());
        assert!(record.source_url.is_none());
    }

    #[test]
    fn test_file_name_of() {
        assert_eq!(file_name_of("/pics/a.jpg"), "a.jpg");
        assert_eq!(file_name_of("a.jpg"), "a.jpg");
        assert_eq!(file_name_of("/pics/"), "");
    }

    #[test]
    fn test_normalize_tags() {
        let tags = normalize_tags(vec![" 風景 ", "自然", "", "風景", "  "]);
        assert_eq!(tags, vec!["風景", "自然"]);
    }

    #[test]
    fn test_normalize_source_url() {
        assert_eq!(normalize_source_url(Some("  ".into())), None);
        assert_eq!(normalize_source_url(None), None);
        assert_eq!(
            normalize_source_url(Some(" https://a.example ".into())).as_deref(),
            Some("https://a.example")
        );
    }

    #[test]
    fn test_save_response_failed() {
        let json = serde_json::to_value(SaveResponse::failed("boom")).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "boom");
    }
}
