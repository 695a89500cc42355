//! `<VerticalLayout>`: content controls rendered one below the other
//!
//! If no width is set, the width of the content is used. Disabling the
//! layout disables every control inside it (see
//! [`ControlTree::effective_enabled`]).

use crate::core::metadata::{ControlMetadata, Capabilities, property, aggregation};
use crate::core::value::{PropertyType, PropertyValue};
use crate::core::event::{Handlers, AccessibilityInfo, DEFAULT_HANDLERS};
use crate::core::control::{ControlClass, ControlKey};
use crate::core::tree::ControlTree;
use crate::{Error, CheapString};

pub const CLASS_NAME: &str = "sap.ui.layout.VerticalLayout";

const CONTENT: &str = "content";

pub const METADATA: ControlMetadata = ControlMetadata {
    name: CLASS_NAME,
    library: "sap.ui.layout",
    properties: &[
        property("width", PropertyType::CssSize, None).in_group("Dimension"),
        property("enabled", PropertyType::Boolean, Some("true")).in_group("Behavior"),
    ],
    default_aggregation: Some(CONTENT),
    aggregations: &[aggregation(CONTENT, "content")],
    associations: &[],
    interfaces: Capabilities::ENABLED_PROPAGATOR,
    design_time: true,
};

pub const CLASS: ControlClass = ControlClass {
    metadata: &METADATA,
    handlers: Handlers {
        accessibility_info,
        ..DEFAULT_HANDLERS
    },
};

fn accessibility_info(tree: &ControlTree, key: ControlKey) -> Option<AccessibilityInfo> {
    let children = tree.aggregation(key, CONTENT).ok()?
        .iter()
        .filter_map(|child| tree.accessibility_info(*child))
        .collect();

    Some(AccessibilityInfo {
        children,
        ..AccessibilityInfo::default()
    })
}

pub fn create(tree: &mut ControlTree, id: Option<&str>) -> Result<ControlKey, Error> {
    tree.create(CLASS_NAME, id)
}

/// Sets the width without re-rendering the layout and its content
pub fn set_width(tree: &mut ControlTree, layout: ControlKey, width: Option<&str>) -> Result<(), Error> {
    let width = match width {
        Some(width) => PropertyValue::parse(width, PropertyType::CssSize)?,
        None => PropertyValue::Null,
    };
    tree.set_property_silent(layout, "width", width)
}

pub fn width(tree: &ControlTree, layout: ControlKey) -> Result<Option<CheapString>, Error> {
    match tree.property(layout, "width")? {
        PropertyValue::String(width) => Ok(Some(width)),
        _ => Ok(None),
    }
}

pub fn set_enabled(tree: &mut ControlTree, layout: ControlKey, enabled: bool) -> Result<(), Error> {
    tree.set_property(layout, "enabled", enabled)
}

pub fn content(tree: &ControlTree, layout: ControlKey) -> Result<&[ControlKey], Error> {
    tree.aggregation(layout, CONTENT)
}

pub fn add_content(tree: &mut ControlTree, layout: ControlKey, control: ControlKey) -> Result<(), Error> {
    tree.add_aggregation(layout, CONTENT, control)
}

pub fn insert_content(tree: &mut ControlTree, layout: ControlKey, control: ControlKey, index: usize) -> Result<(), Error> {
    tree.insert_aggregation(layout, CONTENT, control, index)
}

pub fn remove_content(tree: &mut ControlTree, layout: ControlKey, control: ControlKey) -> Result<Option<ControlKey>, Error> {
    tree.remove_aggregation(layout, CONTENT, control)
}
