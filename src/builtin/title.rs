use crate::core::metadata::{ControlMetadata, Capabilities, property};
use crate::core::value::PropertyType;
use crate::core::event::DEFAULT_HANDLERS;
use crate::core::control::{ControlClass, ControlKey};
use crate::core::tree::ControlTree;
use crate::{Error, CheapString};

pub const CLASS_NAME: &str = "sap.ui.core.Title";

pub const METADATA: ControlMetadata = ControlMetadata {
    name: CLASS_NAME,
    library: "sap.ui.core",
    properties: &[
        property("text", PropertyType::String, None).in_group("Appearance"),
        property("icon", PropertyType::String, None).in_group("Appearance"),
        property("level", PropertyType::Enum(&["Auto", "H1", "H2", "H3", "H4", "H5", "H6"]), Some("Auto")),
        property("emphasized", PropertyType::Boolean, Some("false")).in_group("Appearance"),
    ],
    default_aggregation: None,
    aggregations: &[],
    associations: &[],
    interfaces: Capabilities::TITLE,
    design_time: false,
};

pub const CLASS: ControlClass = ControlClass {
    metadata: &METADATA,
    handlers: DEFAULT_HANDLERS,
};

pub fn create(tree: &mut ControlTree, id: Option<&str>) -> Result<ControlKey, Error> {
    tree.create(CLASS_NAME, id)
}

pub fn with_text(tree: &mut ControlTree, id: Option<&str>, text: &str) -> Result<ControlKey, Error> {
    let title = create(tree, id)?;
    tree.set_property(title, "text", CheapString::copy(text))?;
    Ok(title)
}

pub fn text(tree: &ControlTree, title: ControlKey) -> Result<CheapString, Error> {
    tree.property_text(title, "text")
}
