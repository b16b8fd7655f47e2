//! 画像フォルダのスキャン
//!
//! フォルダ直下の画像ファイル（拡張子の許可リストで判定）の名前とサイズを返す。
//! フォルダがない場合はエラーにせず空の一覧を返す。

use crate::error::Result;
use picviewer_common::{FileEntry, ScanResponse};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// 静的フォールバック用一覧ファイル（public_dir からの相対パス）
pub const SCAN_LISTING_PATH: &str = "api/scan-pics.json";

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp", "webp"];

/// 拡張子が許可リストに含まれるか（大文字小文字は区別しない）
pub fn is_image_file(name: &str) -> bool {
    Path::new(name)
        .extension()
        .map(|ext| {
            let ext = ext.to_string_lossy().to_lowercase();
            IMAGE_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

pub fn scan_directory(folder: &Path) -> Vec<FileEntry> {
    if !folder.is_dir() {
        warn!("画像フォルダが見つかりません: {}", folder.display());
        return Vec::new();
    }

    let mut files = Vec::new();

    for entry in WalkDir::new(folder)
        .min_depth(1)
        .max_depth(1)  // 直下のみ（再帰しない）
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if !entry.file_type().is_file() {
            continue;
        }

        let name = entry.file_name().to_string_lossy().to_string();
        if !is_image_file(&name) {
            continue;
        }

        let size = match entry.metadata() {
            Ok(meta) => meta.len(),
            Err(e) => {
                warn!("ファイル情報を取得できません: {} ({})", name, e);
                continue;
            }
        };

        files.push(FileEntry { name, size });
    }

    // ファイル名でソート
    files.sort_by(|a, b| a.name.cmp(&b.name));

    debug!("{}件の画像を検出: {}", files.len(), folder.display());
    files
}

/// 静的ホスティング用に `<public_dir>/api/scan-pics.json` を生成
pub fn write_scan_listing(public_dir: &Path, pics_dir: &Path) -> Result<PathBuf> {
    let response = ScanResponse::ok(scan_directory(pics_dir));

    let output_path = public_dir.join(SCAN_LISTING_PATH);
    if let Some(parent) = output_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(&response)?;
    std::fs::write(&output_path, json)?;

    debug!(
        "一覧ファイルを生成: {} ({}件)",
        output_path.display(),
        response.files.len()
    );
    Ok(output_path)
}
