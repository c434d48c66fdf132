//! Content haul parsing: rules, interfaces, constants and their containers

use super::field::{field_text, field_text_or_empty};
use super::tag::{element_name, local_name};
use super::entry_stem;
use crate::object::{DesignObject, ObjectType};
use roxmltree::Node;
use tracing::trace;

/// Extracts the design object wrapped by a `contentHaul` element.
///
/// The first child with a recognized tag decides the object's type; later
/// recognized children are ignored. Placeholder kinds without a definition
/// yield nothing.
pub fn parse_content_haul(haul: Node<'_, '_>, path: &str, app: &str) -> Option<DesignObject> {
    let (child, object_type) = haul
        .children()
        .filter(|n| n.is_element())
        .find_map(|child| {
            let tag = element_name(child);
            ObjectType::from_content_tag(local_name(&tag)).map(|t| (child, t))
        })?;

    let definition = field_text_or_empty(child, "definition");
    if object_type.is_placeholder() && definition.is_empty() {
        trace!(path, object_type = %object_type, "Skipping placeholder without definition");
        return None;
    }

    Some(DesignObject {
        name: field_text(child, "name").unwrap_or_else(|| entry_stem(path)),
        uuid: field_text_or_empty(child, "uuid"),
        object_type,
        definition,
        description: field_text_or_empty(child, "description"),
        app: app.to_string(),
        source_path: path.to_string(),
    })
}
