//! Generic haul parsing for process models, record types and other
//! folder-routed objects

use super::entry_stem;
use super::field::{field_text, field_text_or_empty};
use super::tag::{attr_value, element_is, element_name, local_name, namespaced_attr};
use crate::object::{DesignObject, ObjectType};
use roxmltree::Node;

/// Extracts the object stored in the haul's `inner_tag` child.
///
/// Identity fields may live in attributes rather than child elements, so
/// `name` checks the plain attribute first and `uuid` the namespaced one.
/// Returns `None` when the inner element is missing.
pub fn parse_generic_haul(
    haul: Node<'_, '_>,
    inner_tag: &str,
    object_type: ObjectType,
    path: &str,
    app: &str,
) -> Option<DesignObject> {
    let inner = find_inner(haul, inner_tag)?;

    let name = attr_value(inner, "name")
        .map(str::to_string)
        .or_else(|| field_text(inner, "name"))
        .unwrap_or_else(|| entry_stem(path));

    let uuid = attr_value(inner, &namespaced_attr("uuid"))
        .map(str::to_string)
        .or_else(|| field_text(inner, "uuid"))
        .unwrap_or_default();

    Some(DesignObject {
        name,
        uuid,
        object_type,
        definition: field_text_or_empty(inner, "definition"),
        description: field_text_or_empty(inner, "description"),
        app: app.to_string(),
        source_path: path.to_string(),
    })
}

fn find_inner<'a, 'input>(haul: Node<'a, 'input>, inner_tag: &str) -> Option<Node<'a, 'input>> {
    let mut children = haul.children().filter(|n| n.is_element());
    children
        .clone()
        .find(|c| element_is(*c, inner_tag))
        .or_else(|| children.find(|c| local_name(&element_name(*c)) == inner_tag))
}
