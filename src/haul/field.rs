//! Child text lookup tolerant of inconsistent namespacing

use super::tag::{element_is, element_name, local_name, namespaced_attr};
use roxmltree::Node;

/// One way of picking a child element whose text answers a field lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lookup {
    /// First child named exactly `tag`, without a namespace
    Unprefixed,
    /// First child named `tag` in the producer namespace
    Namespaced,
    /// Any child whose local name is `tag`
    LocalScan,
}

const LOOKUP_ORDER: [Lookup; 3] = [Lookup::Unprefixed, Lookup::Namespaced, Lookup::LocalScan];

/// Returns the trimmed text of the child element `tag`.
///
/// Tries the unprefixed name, then the namespaced name, then a scan of all
/// children by local name. Whitespace-only text counts as missing.
pub fn field_text(element: Node<'_, '_>, tag: &str) -> Option<String> {
    LOOKUP_ORDER
        .iter()
        .find_map(|lookup| lookup.apply(element, tag))
}

/// Like [`field_text`] but yields an empty string when nothing matches.
pub fn field_text_or_empty(element: Node<'_, '_>, tag: &str) -> String {
    field_text(element, tag).unwrap_or_default()
}

impl Lookup {
    fn apply(self, element: Node<'_, '_>, tag: &str) -> Option<String> {
        let mut children = element.children().filter(|n| n.is_element());
        match self {
            Lookup::Unprefixed => children.find(|c| element_is(*c, tag)).and_then(text_of),
            Lookup::Namespaced => {
                let qualified = namespaced_attr(tag);
                children
                    .find(|c| element_is(*c, &qualified))
                    .and_then(text_of)
            }
            Lookup::LocalScan => children
                .filter(|c| local_name(&element_name(*c)) == tag)
                .find_map(text_of),
        }
    }
}

/// Direct text of an element. Comments split the text into several nodes;
/// the pieces are joined back together.
fn text_of(node: Node<'_, '_>) -> Option<String> {
    let text: String = node
        .children()
        .filter(|child| child.is_text())
        .filter_map(|child| child.text())
        .collect();
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::haul::tag::APPIAN_NS;
    use roxmltree::Document;

    fn lookup(xml: &str, tag: &str) -> Option<String> {
        let doc = Document::parse(xml).unwrap();
        field_text(doc.root_element(), tag)
    }

    #[test]
    fn test_unprefixed_child() {
        let text = lookup("<rule><name>  myRule \n</name></rule>", "name");
        assert_eq!(text.as_deref(), Some("myRule"));
    }

    #[test]
    fn test_namespaced_child() {
        let xml = format!(
            r#"<rule xmlns:a="{}"><a:uuid>u-1</a:uuid></rule>"#,
            APPIAN_NS
        );
        let text = lookup(&xml, "uuid");
        assert_eq!(text.as_deref(), Some("u-1"));
    }

    #[test]
    fn test_foreign_namespace_found_by_local_scan() {
        let xml = r#"<rule xmlns:o="urn:other"><o:definition>a!x()</o:definition></rule>"#;
        let text = lookup(xml, "definition");
        assert_eq!(text.as_deref(), Some("a!x()"));
    }

    #[test]
    fn test_default_namespace_children() {
        let xml = format!(r#"<rule xmlns="{}"><name>nsRule</name></rule>"#, APPIAN_NS);
        let text = lookup(&xml, "name");
        assert_eq!(text.as_deref(), Some("nsRule"));
    }

    #[test]
    fn test_unprefixed_wins_over_namespaced() {
        let xml = format!(
            r#"<rule xmlns:a="{}"><a:name>second</a:name><name>first</name></rule>"#,
            APPIAN_NS
        );
        let text = lookup(&xml, "name");
        assert_eq!(text.as_deref(), Some("first"));
    }

    #[test]
    fn test_empty_unprefixed_falls_through() {
        let xml = format!(
            r#"<rule xmlns:a="{}"><name>   </name><a:name>fallback</a:name></rule>"#,
            APPIAN_NS
        );
        let text = lookup(&xml, "name");
        assert_eq!(text.as_deref(), Some("fallback"));
    }

    #[test]
    fn test_local_scan_skips_empty_matches() {
        let xml = r#"<rule xmlns:o="urn:other"><o:name/><o:name>later</o:name></rule>"#;
        let text = lookup(xml, "name");
        assert_eq!(text.as_deref(), Some("later"));
    }

    #[test]
    fn test_grandchildren_are_ignored() {
        let xml = "<rule><meta><name>nested</name></meta></rule>";
        let text = lookup(xml, "name");
        assert_eq!(text, None);
    }

    #[test]
    fn test_cdata_definition() {
        let xml = "<rule><definition><![CDATA[if(a < b, 1, 2)]]></definition></rule>";
        let doc = Document::parse(xml).unwrap();
        let text = field_text_or_empty(doc.root_element(), "definition");
        assert_eq!(text, "if(a < b, 1, 2)");
    }

    #[test]
    fn test_missing_field_or_empty() {
        let doc = Document::parse("<rule/>").unwrap();
        let text = field_text_or_empty(doc.root_element(), "description");
        assert_eq!(text, "");
    }

    #[test]
    fn test_leading_comment_is_dropped() {
        let text = lookup("<rule><definition><!-- gen -->1+1</definition></rule>", "definition");
        assert_eq!(text.as_deref(), Some("1+1"));

        let name = lookup("<rule><name><!-- n -->named</name></rule>", "name");
        assert_eq!(name.as_deref(), Some("named"));
    }

    #[test]
    fn test_text_around_comment_is_joined() {
        let text = lookup(
            "<rule><definition>a!x(<!-- c -->1)</definition></rule>",
            "definition",
        );
        assert_eq!(text.as_deref(), Some("a!x(1)"));
    }

    #[test]
    fn test_comment_only_counts_as_missing() {
        assert!(lookup("<rule><definition><!-- empty --></definition></rule>", "definition").is_none());
    }
}
