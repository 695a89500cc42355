//! `<FormContainer>`: a group of form elements with an optional title

use crate::core::metadata::{ControlMetadata, Capabilities, property, aggregation, single_aggregation};
use crate::core::value::PropertyType;
use crate::core::event::{Handlers, DEFAULT_HANDLERS};
use crate::core::control::{ControlClass, ControlKey};
use crate::core::tree::ControlTree;
use crate::Error;
use super::{TitleArg, TitleRef};

pub const CLASS_NAME: &str = "sap.ui.layout.form.FormContainer";

const FORM_ELEMENTS: &str = "formElements";

pub const METADATA: ControlMetadata = ControlMetadata {
    name: CLASS_NAME,
    library: "sap.ui.layout",
    properties: &[
        property("expanded", PropertyType::Boolean, Some("true")),
        property("expandable", PropertyType::Boolean, Some("false")),
        property("visible", PropertyType::Boolean, Some("true")),
    ],
    default_aggregation: Some(FORM_ELEMENTS),
    aggregations: &[
        aggregation(FORM_ELEMENTS, "formElement"),
        single_aggregation("title").or_text(),
        single_aggregation("toolbar"),
        single_aggregation("layoutData"),
    ],
    associations: &[],
    interfaces: Capabilities::empty(),
    design_time: true,
};

pub const CLASS: ControlClass = ControlClass {
    metadata: &METADATA,
    handlers: Handlers {
        initializer: super::init_title,
        content_rendered,
        ..DEFAULT_HANDLERS
    },
};

fn content_rendered(tree: &mut ControlTree, container: ControlKey, element: ControlKey, source: ControlKey) -> Result<(), Error> {
    match tree.parent(container) {
        Some(form) => tree.content_rendered(form, element, source),
        None => Ok(()),
    }
}

pub fn create(tree: &mut ControlTree, id: Option<&str>) -> Result<ControlKey, Error> {
    tree.create(CLASS_NAME, id)
}

pub fn form_elements(tree: &ControlTree, container: ControlKey) -> Result<&[ControlKey], Error> {
    tree.aggregation(container, FORM_ELEMENTS)
}

pub fn add_form_element(tree: &mut ControlTree, container: ControlKey, element: ControlKey) -> Result<(), Error> {
    tree.add_aggregation(container, FORM_ELEMENTS, element)
}

pub fn insert_form_element(tree: &mut ControlTree, container: ControlKey, element: ControlKey, index: usize) -> Result<(), Error> {
    tree.insert_aggregation(container, FORM_ELEMENTS, element, index)
}

pub fn remove_form_element(tree: &mut ControlTree, container: ControlKey, element: ControlKey) -> Result<Option<ControlKey>, Error> {
    tree.remove_aggregation(container, FORM_ELEMENTS, element)
}

/// Sets the title, as a `Title` control or as plain text
pub fn set_title(tree: &mut ControlTree, container: ControlKey, title: TitleArg) -> Result<(), Error> {
    super::set_title(tree, container, title)
}

pub fn title(tree: &ControlTree, container: ControlKey) -> Result<Option<TitleRef>, Error> {
    super::title(tree, container)
}

pub fn is_visible(tree: &ControlTree, container: ControlKey) -> Result<bool, Error> {
    tree.property_bool(container, "visible")
}

pub fn is_expanded(tree: &ControlTree, container: ControlKey) -> Result<bool, Error> {
    tree.property_bool(container, "expanded")
}

/// Collapses or expands the container; only expandable containers can be collapsed
pub fn set_expanded(tree: &mut ControlTree, container: ControlKey, expanded: bool) -> Result<(), Error> {
    if !expanded && !tree.property_bool(container, "expandable")? {
        log::warn!("{} is not expandable and stays expanded", tree.id(container)?);
        return Ok(());
    }
    tree.set_property(container, "expanded", expanded)
}

/// Form elements which are currently visible
pub fn visible_form_elements(tree: &ControlTree, container: ControlKey) -> Result<Vec<ControlKey>, Error> {
    let mut visible = Vec::new();
    for element in form_elements(tree, container)? {
        if super::element::is_visible(tree, *element)? {
            visible.push(*element);
        }
    }
    Ok(visible)
}
