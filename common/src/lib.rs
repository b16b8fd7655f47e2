//! PicViewer Common Library
//!
//! CLI・開発サーバーで共有される型と表示ロジック（I/Oなし）

pub mod types;
pub mod error;
pub mod metadata;
pub mod filter;
pub mod editor;

pub use types::{
    file_name_of, image_path, normalize_source_url, normalize_tags, FileEntry, ImageMetadata,
    ImageRecord, MetadataStore, SaveResponse, ScanResponse, METADATA_FILE_NAME, PICS_URL_PREFIX,
};
pub use error::{Error, Result};
pub use metadata::{parse_metadata_payload, parse_metadata_store, to_metadata_json};
pub use filter::{available_tags, filter_images, ImageQuery};
pub use editor::MetadataDraft;
