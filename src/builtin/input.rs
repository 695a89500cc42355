use crate::core::metadata::{ControlMetadata, Capabilities, property};
use crate::core::value::PropertyType;
use crate::core::event::{Handlers, AccessibilityInfo, DEFAULT_HANDLERS};
use crate::core::control::{ControlClass, ControlKey};
use crate::core::tree::ControlTree;
use crate::Error;

pub const CLASS_NAME: &str = "sap.m.Input";

pub const METADATA: ControlMetadata = ControlMetadata {
    name: CLASS_NAME,
    library: "sap.m",
    properties: &[
        property("value", PropertyType::String, Some("")).in_group("Data"),
        property("placeholder", PropertyType::String, Some("")),
        property("required", PropertyType::Boolean, Some("false")),
        property("editable", PropertyType::Boolean, Some("true")).in_group("Behavior"),
        property("enabled", PropertyType::Boolean, Some("true")).in_group("Behavior"),
        property("width", PropertyType::CssSize, Some("")).in_group("Dimension"),
        property("visible", PropertyType::Boolean, Some("true")),
    ],
    default_aggregation: None,
    aggregations: &[],
    associations: &[],
    interfaces: Capabilities::FORM_CONTENT,
    design_time: false,
};

pub const CLASS: ControlClass = ControlClass {
    metadata: &METADATA,
    handlers: Handlers {
        accessibility_info,
        ..DEFAULT_HANDLERS
    },
};

fn accessibility_info(tree: &ControlTree, key: ControlKey) -> Option<AccessibilityInfo> {
    let value = tree.property_text(key, "value").ok()?;
    let description = match value.is_empty() {
        true => tree.property_text(key, "placeholder").ok()?,
        false => value,
    };

    Some(AccessibilityInfo {
        role: Some("textbox".into()),
        type_name: Some("Input".into()),
        description: Some(description),
        enabled: Some(tree.effective_enabled(key)),
        editable: tree.property_bool(key, "editable").ok(),
        children: Vec::new(),
    })
}

pub fn create(tree: &mut ControlTree, id: Option<&str>) -> Result<ControlKey, Error> {
    tree.create(CLASS_NAME, id)
}

pub fn set_required(tree: &mut ControlTree, input: ControlKey, required: bool) -> Result<(), Error> {
    tree.set_property(input, "required", required)
}

pub fn set_editable(tree: &mut ControlTree, input: ControlKey, editable: bool) -> Result<(), Error> {
    tree.set_property(input, "editable", editable)
}
