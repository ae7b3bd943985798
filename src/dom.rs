//! Thin helpers over the html5ever reference-counted DOM
//!
//! Both the HTML → Markdown reduction and the heading scanner walk parsed
//! HTML; these helpers keep the `RefCell`/`NodeData` plumbing in one place.

use html5ever::tendril::TendrilSink;
use html5ever::{
    ns, parse_document, serialize, serialize::SerializeOpts, serialize::TraversalScope, Attribute,
    LocalName, ParseOpts, QualName,
};
use markup5ever_rcdom::{Handle, NodeData, RcDom, SerializableHandle};

use crate::error::{Error, Result};

/// Parse an HTML document or fragment. html5ever never rejects input; broken
/// markup is repaired the way a browser would.
pub(crate) fn parse_html(html: &str) -> RcDom {
    parse_document(RcDom::default(), ParseOpts::default()).one(html)
}

/// The `<body>` element of a parsed document.
pub(crate) fn body(dom: &RcDom) -> Option<Handle> {
    find_element(&dom.document, "body")
}

/// First element with the given tag name, depth-first.
pub(crate) fn find_element(root: &Handle, tag: &str) -> Option<Handle> {
    if element_name(root) == Some(tag) {
        return Some(root.clone());
    }
    root.children
        .borrow()
        .iter()
        .find_map(|child| find_element(child, tag))
}

/// Local tag name of an element node (`None` for text, comments, ...).
pub(crate) fn element_name(node: &Handle) -> Option<&str> {
    match &node.data {
        NodeData::Element { name, .. } => Some(&*name.local),
        _ => None,
    }
}

/// Value of an attribute on an element node.
pub(crate) fn attr(node: &Handle, attr_name: &str) -> Option<String> {
    match &node.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|a| &*a.name.local == attr_name)
            .map(|a| a.value.to_string()),
        _ => None,
    }
}

/// Set (or replace) an attribute on an element node. No-op for non-elements.
pub(crate) fn set_attr(node: &Handle, attr_name: &str, value: &str) {
    if let NodeData::Element { attrs, .. } = &node.data {
        let mut attrs = attrs.borrow_mut();
        if let Some(existing) = attrs.iter_mut().find(|a| &*a.name.local == attr_name) {
            existing.value = value.to_string().into();
        } else {
            attrs.push(Attribute {
                name: QualName::new(None, ns!(), LocalName::from(attr_name)),
                value: value.to_string().into(),
            });
        }
    }
}

/// Concatenated text of all descendant text nodes.
pub(crate) fn text_content(node: &Handle) -> String {
    let mut text = String::new();
    collect_text(node, &mut text);
    text
}

fn collect_text(node: &Handle, output: &mut String) {
    if let NodeData::Text { contents } = &node.data {
        output.push_str(&contents.borrow());
    }
    for child in node.children.borrow().iter() {
        collect_text(child, output);
    }
}

/// Serialize the children of `node` back to HTML.
pub(crate) fn inner_html(node: &Handle) -> Result<String> {
    let mut output = Vec::new();
    let opts = SerializeOpts {
        traversal_scope: TraversalScope::IncludeNode,
        ..Default::default()
    };

    for child in node.children.borrow().iter() {
        let serializable = SerializableHandle::from(child.clone());
        serialize(&mut output, &serializable, opts.clone())?;
    }

    String::from_utf8(output)
        .map_err(|e| Error::Application(format!("Serialized HTML is not UTF-8: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_of_fragment() {
        let dom = parse_html("<p>Hello <b>there</b></p>");
        let body = body(&dom).unwrap();
        assert_eq!(text_content(&body), "Hello there");
    }

    #[test]
    fn test_attr_roundtrip() {
        let dom = parse_html("<h2 class=\"x\">Title</h2>");
        let h2 = find_element(&dom.document, "h2").unwrap();
        assert_eq!(attr(&h2, "class").as_deref(), Some("x"));
        assert_eq!(attr(&h2, "id"), None);

        set_attr(&h2, "id", "title");
        set_attr(&h2, "class", "y");
        assert_eq!(attr(&h2, "id").as_deref(), Some("title"));
        assert_eq!(attr(&h2, "class").as_deref(), Some("y"));
    }

    #[test]
    fn test_inner_html_includes_new_attribute() {
        let dom = parse_html("<h1>A</h1>");
        let h1 = find_element(&dom.document, "h1").unwrap();
        set_attr(&h1, "id", "a");
        let html = inner_html(&body(&dom).unwrap()).unwrap();
        assert_eq!(html, "<h1 id=\"a\">A</h1>");
    }
}
