//! Grid layout data of a form container
//!
//! Set as `layoutData` of a [`container`](super::container); changing it
//! is reported up to the form's layout.

use crate::core::metadata::{ControlMetadata, Capabilities, property};
use crate::core::value::PropertyType;
use crate::core::event::DEFAULT_HANDLERS;
use crate::core::control::{ControlClass, ControlKey};
use crate::core::tree::ControlTree;
use crate::Error;

pub const CLASS_NAME: &str = "sap.ui.layout.form.GridContainerData";

pub const METADATA: ControlMetadata = ControlMetadata {
    name: CLASS_NAME,
    library: "sap.ui.layout",
    properties: &[
        // only half of the grid width is used by the container
        property("halfGrid", PropertyType::Boolean, Some("false")),
    ],
    default_aggregation: None,
    aggregations: &[],
    associations: &[],
    interfaces: Capabilities::LAYOUT_DATA,
    design_time: false,
};

pub const CLASS: ControlClass = ControlClass {
    metadata: &METADATA,
    handlers: DEFAULT_HANDLERS,
};

pub fn create(tree: &mut ControlTree, id: Option<&str>) -> Result<ControlKey, Error> {
    tree.create(CLASS_NAME, id)
}

pub fn half_grid(tree: &ControlTree, data: ControlKey) -> Result<bool, Error> {
    tree.property_bool(data, "halfGrid")
}

pub fn set_half_grid(tree: &mut ControlTree, data: ControlKey, half_grid: bool) -> Result<(), Error> {
    tree.set_property(data, "halfGrid", half_grid)
}
