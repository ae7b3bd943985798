//! File import/export and user notices
//!
//! This module connects the conversion engine to the filesystem: reading
//! Markdown for import, writing `{slug}_{lang}.md` exports, and reporting
//! the outcome through transient notices.

mod notice;
mod transfer;

pub use crate::config::Lang;
pub use notice::{Notice, NoticeBoard, NoticeKind};
pub use transfer::{export_file_name, import_into, read_markdown_file, write_markdown_export};
