//! Heading id generation.

/// Derive a URL-fragment id from heading text.
///
/// Lowercases, drops everything that is not alphanumeric, a hyphen or
/// whitespace, turns whitespace runs into a hyphen and collapses repeated
/// hyphens. Letters outside ASCII are kept so non-Latin headings still get
/// an id. Equal texts give equal ids; callers do not de-duplicate.
///
/// ```
/// use folio::navigator::slugify;
///
/// assert_eq!(slugify("Hello, World!"), "hello-world");
/// assert_eq!(slugify("  Multiple   Spaces  "), "multiple-spaces");
/// ```
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_hyphen = false;

    for c in text.trim().chars() {
        if c.is_alphanumeric() {
            if pending_hyphen {
                slug.push('-');
                pending_hyphen = false;
            }
            slug.extend(c.to_lowercase());
        } else if c.is_whitespace() || c == '-' {
            pending_hyphen = true;
        }
    }
    if pending_hyphen {
        slug.push('-');
    }

    slug
}
