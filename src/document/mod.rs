//! Structured document model
//!
//! The editor's rich-text tree (`doc` → blocks → text runs with marks) and its
//! HTML rendering.

mod html;
mod node;

pub use html::render_html;
pub use node::{Attrs, Mark, Node};
