//! PicViewer
//!
//! 画像フォルダのスキャン、タグ・入手元URLのメタデータ管理、開発サーバー

pub mod cli;
pub mod config;
pub mod editor;
pub mod error;
pub mod gallery;
pub mod listing;
pub mod remote;
pub mod scanner;
pub mod server;
pub mod storage;

pub use gallery::Gallery;
pub use storage::SaveOutcome;
