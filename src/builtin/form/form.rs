//! `<Form>`: the root of a form, holding its containers
//!
//! The form itself renders nothing: its `layout` control arranges the
//! containers and elements. Rendered content and layout data changes from
//! below are reported to the form, which hands them over to the layout.

use crate::core::metadata::{ControlMetadata, Capabilities, property, aggregation, single_aggregation};
use crate::core::value::PropertyType;
use crate::core::event::{Handlers, DEFAULT_HANDLERS};
use crate::core::control::{ControlClass, ControlKey};
use crate::core::tree::ControlTree;
use crate::Error;
use super::{TitleArg, TitleRef, container, element};

pub const CLASS_NAME: &str = "sap.ui.layout.form.Form";

const FORM_CONTAINERS: &str = "formContainers";
const LAYOUT: &str = "layout";

pub const METADATA: ControlMetadata = ControlMetadata {
    name: CLASS_NAME,
    library: "sap.ui.layout",
    properties: &[
        property("width", PropertyType::CssSize, None).in_group("Dimension"),
        property("editable", PropertyType::Boolean, Some("false")),
    ],
    default_aggregation: Some(FORM_CONTAINERS),
    aggregations: &[
        aggregation(FORM_CONTAINERS, "formContainer"),
        single_aggregation("title").or_text(),
        single_aggregation("toolbar"),
        single_aggregation(LAYOUT),
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
        layout_data_changed,
        ..DEFAULT_HANDLERS
    },
};

fn content_rendered(tree: &mut ControlTree, form: ControlKey, element: ControlKey, source: ControlKey) -> Result<(), Error> {
    match tree.aggregated(form, LAYOUT)? {
        Some(layout) => tree.content_rendered(layout, element, source),
        None => Ok(()),
    }
}

fn layout_data_changed(tree: &mut ControlTree, form: ControlKey, source: ControlKey) -> Result<(), Error> {
    log::debug!("layout data of {} changed", tree.id(source)?);
    match tree.aggregated(form, LAYOUT)? {
        Some(layout) => tree.invalidate(layout),
        None => tree.invalidate(form),
    }
    Ok(())
}

pub fn create(tree: &mut ControlTree, id: Option<&str>) -> Result<ControlKey, Error> {
    tree.create(CLASS_NAME, id)
}

pub fn form_containers(tree: &ControlTree, form: ControlKey) -> Result<&[ControlKey], Error> {
    tree.aggregation(form, FORM_CONTAINERS)
}

pub fn add_form_container(tree: &mut ControlTree, form: ControlKey, container: ControlKey) -> Result<(), Error> {
    tree.add_aggregation(form, FORM_CONTAINERS, container)
}

pub fn insert_form_container(tree: &mut ControlTree, form: ControlKey, container: ControlKey, index: usize) -> Result<(), Error> {
    tree.insert_aggregation(form, FORM_CONTAINERS, container, index)
}

pub fn remove_form_container(tree: &mut ControlTree, form: ControlKey, container: ControlKey) -> Result<Option<ControlKey>, Error> {
    tree.remove_aggregation(form, FORM_CONTAINERS, container)
}

/// Containers which are currently visible
pub fn visible_form_containers(tree: &ControlTree, form: ControlKey) -> Result<Vec<ControlKey>, Error> {
    let mut visible = Vec::new();
    for container in form_containers(tree, form)? {
        if container::is_visible(tree, *container)? {
            visible.push(*container);
        }
    }
    Ok(visible)
}

pub fn is_editable(tree: &ControlTree, form: ControlKey) -> Result<bool, Error> {
    tree.property_bool(form, "editable")
}

/// Switches the form between edit and display mode
///
/// The form is not re-rendered, but every label is: their display-only
/// state depends on this flag.
pub fn set_editable(tree: &mut ControlTree, form: ControlKey, editable: bool) -> Result<(), Error> {
    if is_editable(tree, form)? == editable {
        return Ok(());
    }

    tree.set_property_silent(form, "editable", editable)?;

    for container in form_containers(tree, form)?.to_vec() {
        for element in container::form_elements(tree, container)?.to_vec() {
            element::invalidate_label(tree, element)?;
        }
    }

    Ok(())
}

/// Sets the title, as a `Title` control or as plain text
pub fn set_title(tree: &mut ControlTree, form: ControlKey, title: TitleArg) -> Result<(), Error> {
    super::set_title(tree, form, title)
}

pub fn title(tree: &ControlTree, form: ControlKey) -> Result<Option<TitleRef>, Error> {
    super::title(tree, form)
}

pub fn toolbar(tree: &ControlTree, form: ControlKey) -> Result<Option<ControlKey>, Error> {
    tree.aggregated(form, "toolbar")
}

pub fn set_toolbar(tree: &mut ControlTree, form: ControlKey, toolbar: Option<ControlKey>) -> Result<(), Error> {
    tree.set_aggregation(form, "toolbar", toolbar)
}

pub fn layout(tree: &ControlTree, form: ControlKey) -> Result<Option<ControlKey>, Error> {
    tree.aggregated(form, LAYOUT)
}

pub fn set_layout(tree: &mut ControlTree, form: ControlKey, layout: Option<ControlKey>) -> Result<(), Error> {
    tree.set_aggregation(form, LAYOUT, layout)
}
