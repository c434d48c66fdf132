//! Namespace handling for haul XML names.
//!
//! Names are compared in Clark notation: `{namespace}local` for namespaced
//! names, the bare local name otherwise.

use roxmltree::{Attribute, Node};

/// Namespace the package producer uses for typed elements and attributes.
pub const APPIAN_NS: &str = "http://www.appian.com/ae/types/2009";

/// Strips a `{namespace}` prefix, returning the tag unchanged when absent.
pub fn local_name(tag: &str) -> &str {
    match tag.rfind('}') {
        Some(pos) => &tag[pos + 1..],
        None => tag,
    }
}

/// Qualifies a name with the producer namespace.
pub fn namespaced_attr(attr: &str) -> String {
    format!("{{{}}}{}", APPIAN_NS, attr)
}

/// Clark-notation name of an element.
pub fn element_name(node: Node<'_, '_>) -> String {
    let tag = node.tag_name();
    clark(tag.namespace(), tag.name())
}

/// True when the element's qualified name equals `qualified` exactly.
pub fn element_is(node: Node<'_, '_>, qualified: &str) -> bool {
    let tag = node.tag_name();
    is_qualified(tag.namespace(), tag.name(), qualified)
}

/// Looks up an attribute value by its Clark-notation name.
///
/// Empty values count as missing.
pub fn attr_value<'a>(node: Node<'a, '_>, qualified: &str) -> Option<&'a str> {
    node.attributes()
        .find(|attr| attr_is(attr, qualified))
        .map(|attr| attr.value())
        .filter(|value| !value.is_empty())
}

fn attr_is(attr: &Attribute<'_, '_>, qualified: &str) -> bool {
    is_qualified(attr.namespace(), attr.name(), qualified)
}

fn clark(namespace: Option<&str>, local: &str) -> String {
    match namespace {
        Some(ns) => format!("{{{}}}{}", ns, local),
        None => local.to_string(),
    }
}

fn is_qualified(namespace: Option<&str>, local: &str, qualified: &str) -> bool {
    match qualified.strip_prefix('{').and_then(|rest| rest.split_once('}')) {
        Some((ns, name)) => namespace == Some(ns) && local == name,
        None => namespace.is_none() && local == qualified,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roxmltree::Document;

    #[test]
    fn test_local_name_strips_namespace() {
        assert_eq!(local_name("{urn:x}contentHaul"), "contentHaul");
        assert_eq!(local_name("contentHaul"), "contentHaul");
        assert_eq!(local_name(""), "");
    }

    #[test]
    fn test_local_name_passes_malformed_through() {
        assert_eq!(local_name("{unterminated"), "{unterminated");
    }

    #[test]
    fn test_namespaced_attr() {
        assert_eq!(
            namespaced_attr("uuid"),
            "{http://www.appian.com/ae/types/2009}uuid"
        );
    }

    #[test]
    fn test_element_name_round_trips_through_local_name() {
        let xml = r#"<a:root xmlns:a="urn:x"><plain/></a:root>"#;
        let doc = Document::parse(xml).unwrap();
        let root = doc.root_element();

        assert_eq!(element_name(root), "{urn:x}root");
        assert_eq!(local_name(&element_name(root)), "root");

        let plain = root.first_element_child().unwrap();
        assert_eq!(element_name(plain), "plain");
    }

    #[test]
    fn test_element_is_distinguishes_namespaces() {
        let xml = format!(
            r#"<root xmlns:a="{}"><a:name/><name/></root>"#,
            APPIAN_NS
        );
        let doc = Document::parse(&xml).unwrap();
        let children: Vec<_> = doc.root_element().children().filter(|n| n.is_element()).collect();

        assert!(element_is(children[0], &namespaced_attr("name")));
        assert!(!element_is(children[0], "name"));
        assert!(element_is(children[1], "name"));
        assert!(!element_is(children[1], &namespaced_attr("name")));
    }

    #[test]
    fn test_attr_value_lookup() {
        let xml = format!(
            r#"<recordType xmlns:a="{}" name="Invoice" a:uuid="u-123" empty=""/>"#,
            APPIAN_NS
        );
        let doc = Document::parse(&xml).unwrap();
        let root = doc.root_element();

        assert_eq!(attr_value(root, "name"), Some("Invoice"));
        assert_eq!(attr_value(root, &namespaced_attr("uuid")), Some("u-123"));
        assert_eq!(attr_value(root, "uuid"), None);
        assert_eq!(attr_value(root, "empty"), None);
    }
}
