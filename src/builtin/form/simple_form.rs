//! `<SimpleForm>`: a form built from a flat list of controls
//!
//! Each content control lands in an internal [`form`](super::form):
//!
//! - a `Title` starts a new container, titled by it;
//! - a `Label` starts a new element of the current container;
//! - anything else becomes a field of the current element.
//!
//! Containers and elements are created on demand, so content may start
//! with a field.

use crate::core::metadata::{ControlMetadata, Capabilities, property, single_aggregation};
use crate::core::value::PropertyType;
use crate::core::event::{Handlers, DEFAULT_HANDLERS};
use crate::core::control::{ControlClass, ControlKey};
use crate::core::tree::ControlTree;
use crate::{Error, error};
use super::{TitleArg, form, container, element::{self, LabelArg}};

pub const CLASS_NAME: &str = "sap.ui.layout.form.SimpleForm";

const FORM: &str = "form";

pub const METADATA: ControlMetadata = ControlMetadata {
    name: CLASS_NAME,
    library: "sap.ui.layout",
    properties: &[
        property("editable", PropertyType::Boolean, Some("false")),
        property("width", PropertyType::CssSize, None).in_group("Dimension"),
    ],
    default_aggregation: None,
    aggregations: &[
        single_aggregation(FORM).hidden(),
    ],
    associations: &[],
    interfaces: Capabilities::empty(),
    design_time: true,
};

pub const CLASS: ControlClass = ControlClass {
    metadata: &METADATA,
    handlers: Handlers {
        initializer,
        ..DEFAULT_HANDLERS
    },
};

#[derive(Default)]
struct SimpleFormState {
    content: Vec<ControlKey>,
    created: usize,
}

enum ContentKind {
    Title,
    Label,
    Field,
}

fn initializer(tree: &mut ControlTree, simple_form: ControlKey) -> Result<(), Error> {
    tree.set_storage(simple_form, SimpleFormState::default())?;
    let id = format!("{}--Form", tree.id(simple_form)?);
    let form = form::create(tree, Some(&id))?;
    tree.set_aggregation(simple_form, FORM, Some(form))
}

fn state_mut(tree: &mut ControlTree, simple_form: ControlKey) -> Result<&mut SimpleFormState, Error> {
    let id = tree.id(simple_form)?;
    tree.storage_mut(simple_form).ok_or_else(|| error!(Metadata, "{} is not a simple form", id))
}

/// Creates the id of the next container (`FC`) or element (`FE`)
fn next_id(tree: &mut ControlTree, simple_form: ControlKey, kind: &str) -> Result<String, Error> {
    let prefix = tree.id(simple_form)?;
    loop {
        let state = state_mut(tree, simple_form)?;
        let id = format!("{}--{}{}", prefix, kind, state.created);
        state.created += 1;
        if tree.by_id(&id).is_none() {
            break Ok(id);
        }
    }
}

pub fn create(tree: &mut ControlTree, id: Option<&str>) -> Result<ControlKey, Error> {
    tree.create(CLASS_NAME, id)
}

/// Creates a simple form and adds each control of `content`, in order
pub fn with_content(tree: &mut ControlTree, id: Option<&str>, content: &[ControlKey]) -> Result<ControlKey, Error> {
    let simple_form = create(tree, id)?;
    for control in content {
        add_content(tree, simple_form, *control)?;
    }
    Ok(simple_form)
}

/// The internal form
pub fn form(tree: &ControlTree, simple_form: ControlKey) -> Result<ControlKey, Error> {
    tree.aggregated(simple_form, FORM)?
        .ok_or_else(|| error!(UnknownControl, "{:?} has no form", simple_form))
}

/// Content controls, in the order they were added
pub fn content(tree: &ControlTree, simple_form: ControlKey) -> Result<Vec<ControlKey>, Error> {
    let id = tree.id(simple_form)?;
    let state = tree.storage::<SimpleFormState>(simple_form)
        .ok_or_else(|| error!(Metadata, "{} is not a simple form", id))?;

    Ok(state.content.iter().copied().filter(|c| tree.contains(*c)).collect())
}

pub fn add_content(tree: &mut ControlTree, simple_form: ControlKey, control: ControlKey) -> Result<(), Error> {
    let form = form(tree, simple_form)?;

    let kind = if tree.implements(control, Capabilities::TITLE) {
        ContentKind::Title
    } else if tree.implements(control, Capabilities::LABEL) {
        ContentKind::Label
    } else {
        ContentKind::Field
    };

    match kind {
        ContentKind::Title => {
            let container = new_container(tree, simple_form, form)?;
            container::set_title(tree, container, TitleArg::Control(control))?;
        },
        ContentKind::Label => {
            let container = current_container(tree, simple_form, form)?;
            let element = new_element(tree, simple_form, container)?;
            element::set_label(tree, element, LabelArg::Control(control))?;
        },
        ContentKind::Field => {
            let container = current_container(tree, simple_form, form)?;
            let element = match container::form_elements(tree, container)?.last().copied() {
                Some(element) => element,
                None => new_element(tree, simple_form, container)?,
            };
            element::add_field(tree, element, control)?;
        },
    }

    state_mut(tree, simple_form)?.content.push(control);
    Ok(())
}

fn new_container(tree: &mut ControlTree, simple_form: ControlKey, form: ControlKey) -> Result<ControlKey, Error> {
    let id = next_id(tree, simple_form, "FC")?;
    let container = container::create(tree, Some(&id))?;
    form::add_form_container(tree, form, container)?;
    Ok(container)
}

fn current_container(tree: &mut ControlTree, simple_form: ControlKey, form: ControlKey) -> Result<ControlKey, Error> {
    match form::form_containers(tree, form)?.last().copied() {
        Some(container) => Ok(container),
        None => new_container(tree, simple_form, form),
    }
}

fn new_element(tree: &mut ControlTree, simple_form: ControlKey, container: ControlKey) -> Result<ControlKey, Error> {
    let id = next_id(tree, simple_form, "FE")?;
    let element = element::create(tree, Some(&id))?;
    container::add_form_element(tree, container, element)?;
    Ok(element)
}

pub fn is_editable(tree: &ControlTree, simple_form: ControlKey) -> Result<bool, Error> {
    tree.property_bool(simple_form, "editable")
}

/// Sets `editable` on the simple form and its internal form
pub fn set_editable(tree: &mut ControlTree, simple_form: ControlKey, editable: bool) -> Result<(), Error> {
    tree.set_property_silent(simple_form, "editable", editable)?;
    let form = form(tree, simple_form)?;
    form::set_editable(tree, form, editable)
}

/// Title of the internal form
pub fn set_title(tree: &mut ControlTree, simple_form: ControlKey, title: TitleArg) -> Result<(), Error> {
    let form = form(tree, simple_form)?;
    form::set_title(tree, form, title)
}
