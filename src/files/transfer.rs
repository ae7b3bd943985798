//! Markdown import and export on disk
//!
//! Export file names follow `{slug}_{lang}.md`. Import replaces the open
//! document only when the file could be read; failures are reported through
//! the notice board and leave the document as it was.

use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::notice::NoticeBoard;
use crate::config::Lang;
use crate::document::Node;
use crate::error::{Error, Result};
use crate::markdown::markdown_to_tree;

/// Extension of exported files
const MARKDOWN_EXTENSION: &str = "md";

/// File name for an export of the document with `slug` in `lang`.
///
/// The slug is used as given, except that path separators and control
/// characters become `-`. A blank slug becomes `untitled`.
pub fn export_file_name(slug: &str, lang: Lang) -> String {
    let stem: String = slug
        .trim()
        .chars()
        .map(|c| if c == '/' || c == '\\' || c.is_control() { '-' } else { c })
        .collect();
    let stem = if stem.is_empty() { "untitled" } else { stem.as_str() };
    format!("{}_{}.{}", stem, lang.code(), MARKDOWN_EXTENSION)
}

/// Read a Markdown file as UTF-8 text.
pub fn read_markdown_file(path: &Path) -> Result<String> {
    debug!("Reading Markdown from {}", path.display());
    fs::read_to_string(path).map_err(|e| Error::FileRead {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Write an export into `dir` and return the file's path.
///
/// The file is written next to its final name and renamed into place, so a
/// failed export never leaves a half-written file behind.
pub fn write_markdown_export(dir: &Path, slug: &str, lang: Lang, markdown: &str) -> Result<PathBuf> {
    fs::create_dir_all(dir).map_err(|e| Error::FileWrite {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let path = dir.join(export_file_name(slug, lang));
    let partial = path.with_extension(format!("{}.part", MARKDOWN_EXTENSION));

    fs::write(&partial, markdown).map_err(|e| Error::FileWrite {
        path: partial.clone(),
        source: e,
    })?;
    fs::rename(&partial, &path).map_err(|e| Error::FileWrite {
        path: path.clone(),
        source: e,
    })?;

    info!("Exported {}", path.display());
    Ok(path)
}

/// Import the Markdown file at `path` into `document`.
///
/// On success the document is replaced and a success notice is posted. On
/// failure an error notice is posted and the document is untouched. Returns
/// whether the import happened.
pub fn import_into(path: &Path, document: &mut Node, notices: &mut NoticeBoard, now: Duration) -> bool {
    match read_markdown_file(path) {
        Ok(markdown) => {
            *document = markdown_to_tree(&markdown);
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            notices.success(now, format!("Imported {}", name));
            true
        }
        Err(err) => {
            notices.error(now, format!("Import failed: {}", err));
            false
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
