//! メタデータサイドカーの読み書き（I/Oなし）

use crate::error::{Error, Result};
use crate::types::MetadataStore;

/// サイドカーJSONをパース
///
/// `null` や空文字は空のストアとして扱う。ルートがオブジェクト以外ならエラー。
pub fn parse_metadata_store(json: &str) -> Result<MetadataStore> {
    if json.trim().is_empty() {
        return Ok(MetadataStore::new());
    }

    let value: serde_json::Value = serde_json::from_str(json)?;
    match value {
        serde_json::Value::Null => Ok(MetadataStore::new()),
        serde_json::Value::Object(_) => Ok(serde_json::from_value(value)?),
        other => Err(Error::InvalidMetadata(format!(
            "ルートがオブジェクトではありません: {}",
            json_kind(&other)
        ))),
    }
}

/// 保存APIのリクエストボディをパース
///
/// サイドカー読み込みと違い、空文字や `null` は受け付けない。
/// 空のPOSTでサイドカーを `{}` に上書きしないため。
pub fn parse_metadata_payload(json: &str) -> Result<MetadataStore> {
    if json.trim().is_empty() {
        return Err(Error::InvalidMetadata("リクエストボディが空です".into()));
    }

    let value: serde_json::Value = serde_json::from_str(json)?;
    match value {
        serde_json::Value::Object(_) => Ok(serde_json::from_value(value)?),
        other => Err(Error::InvalidMetadata(format!(
            "ルートがオブジェクトではありません: {}",
            json_kind(&other)
        ))),
    }
}

/// サイドカー用に整形済みJSONへ変換
pub fn to_metadata_json(store: &MetadataStore) -> Result<String> {
    Ok(serde_json::to_string_pretty(store)?)
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
