//! 対話式メタデータ編集
//!
//! [Enter]だけで確定。タグは「+タグ」で追加、「-タグ」で削除。

use crate::error::{PicViewerError, Result};
use dialoguer::Input;
use picviewer_common::{ImageRecord, MetadataDraft};

/// 1行分の操作
#[derive(Debug, PartialEq, Eq)]
pub enum TagCommand {
    Add(String),
    Remove(String),
    Done,
}

/// 入力行を操作に変換（接頭辞なしは追加）
pub fn parse_tag_command(line: &str) -> TagCommand {
    let line = line.trim();
    if line.is_empty() {
        return TagCommand::Done;
    }

    if let Some(rest) = line.strip_prefix('-') {
        TagCommand::Remove(rest.trim().to_string())
    } else if let Some(rest) = line.strip_prefix('+') {
        TagCommand::Add(rest.trim().to_string())
    } else {
        TagCommand::Add(line.to_string())
    }
}

/// 対話式でタグと入手元URLを編集
///
/// 保存する値（タグ, 入手元URL）を返す。
pub fn run_interactive_edit(record: &ImageRecord) -> Result<(Vec<String>, Option<String>)> {
    let mut draft = MetadataDraft::from_record(record);

    println!("🏷  {} ({} bytes)", record.name, record.size);
    println!("---");
    println!("操作: [タグ名]/[+タグ]追加 [-タグ]削除 [Enter]確定");
    println!("---");

    loop {
        println!("  タグ: {}", format_tags(draft.tags()));

        let line: String = Input::new()
            .with_prompt("タグ")
            .allow_empty(true)
            .interact_text()
            .map_err(|e| PicViewerError::Prompt(e.to_string()))?;

        match parse_tag_command(&line) {
            TagCommand::Add(tag) => {
                if !draft.add_tag(&tag) {
                    println!("  → 追加しません（空か既存）: {}", tag);
                }
            }
            TagCommand::Remove(tag) => {
                if !draft.remove_tag(&tag) {
                    println!("  → 見つかりません: {}", tag);
                }
            }
            TagCommand::Done => break,
        }
    }

    let url: String = Input::new()
        .with_prompt("入手元URL（空で削除）")
        .with_initial_text(draft.source_url().to_string())
        .allow_empty(true)
        .interact_text()
        .map_err(|e| PicViewerError::Prompt(e.to_string()))?;
    draft.set_source_url(url);

    Ok(draft.finish())
}

pub fn format_tags(tags: &[String]) -> String {
    if tags.is_empty() {
        "(なし)".to_string()
    } else {
        tags.join(", ")
    }
}
