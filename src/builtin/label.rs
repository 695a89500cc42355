use crate::core::metadata::{ControlMetadata, AssociationInfo, Capabilities, property};
use crate::core::value::PropertyType;
use crate::core::event::{Handlers, AccessibilityInfo, DEFAULT_HANDLERS};
use crate::core::control::{ControlClass, ControlKey};
use crate::core::tree::ControlTree;
use crate::builtin::form::element;
use crate::{Error, CheapString};

pub const CLASS_NAME: &str = "sap.m.Label";

pub const METADATA: ControlMetadata = ControlMetadata {
    name: CLASS_NAME,
    library: "sap.m",
    properties: &[
        property("text", PropertyType::String, Some("")),
        property("required", PropertyType::Boolean, Some("false")),
        property("displayOnly", PropertyType::Boolean, Some("false")),
        property("textAlign", PropertyType::Enum(&["Begin", "End", "Left", "Right", "Center", "Initial"]), Some("Begin"))
            .in_group("Appearance"),
        property("width", PropertyType::CssSize, Some("")).in_group("Dimension"),
        property("visible", PropertyType::Boolean, Some("true")),
    ],
    default_aggregation: None,
    aggregations: &[],
    associations: &[
        AssociationInfo { name: "labelFor", multiple: false },
        AssociationInfo { name: "alternativeLabelFor", multiple: false },
    ],
    interfaces: Capabilities::FORM_CONTENT.with(Capabilities::LABEL),
    design_time: true,
};

pub const CLASS: ControlClass = ControlClass {
    metadata: &METADATA,
    handlers: Handlers {
        initializer,
        accessibility_info,
        ..DEFAULT_HANDLERS
    },
};

/// Set while a form element computes `required` / `displayOnly` for this label
struct LabelState {
    managed_by: Option<ControlKey>,
}

fn initializer(tree: &mut ControlTree, key: ControlKey) -> Result<(), Error> {
    tree.set_storage(key, LabelState { managed_by: None })
}

fn accessibility_info(tree: &ControlTree, key: ControlKey) -> Option<AccessibilityInfo> {
    Some(AccessibilityInfo {
        description: tree.property_text(key, "text").ok(),
        ..AccessibilityInfo::default()
    })
}

pub fn create(tree: &mut ControlTree, id: Option<&str>) -> Result<ControlKey, Error> {
    tree.create(CLASS_NAME, id)
}

pub fn with_text(tree: &mut ControlTree, id: Option<&str>, text: &str) -> Result<ControlKey, Error> {
    let label = create(tree, id)?;
    set_text(tree, label, text)?;
    Ok(label)
}

pub fn text(tree: &ControlTree, label: ControlKey) -> Result<CheapString, Error> {
    tree.property_text(label, "text")
}

pub fn set_text(tree: &mut ControlTree, label: ControlKey, text: &str) -> Result<(), Error> {
    tree.set_property(label, "text", CheapString::copy(text))
}

/// Id of the labelled control: `labelFor`, else `alternativeLabelFor`
pub fn label_for(tree: &ControlTree, label: ControlKey) -> Option<CheapString> {
    match tree.association(label, "labelFor") {
        Ok(Some(id)) => Some(id),
        _ => tree.association(label, "alternativeLabelFor").ok().flatten(),
    }
}

/// Does this control let a form element take over `required` & `displayOnly`?
pub fn has_overridable_state(tree: &ControlTree, label: ControlKey) -> bool {
    tree.storage::<LabelState>(label).is_some()
}

pub(crate) fn set_managed_by(tree: &mut ControlTree, label: ControlKey, element: Option<ControlKey>) {
    if let Some(state) = tree.storage_mut::<LabelState>(label) {
        state.managed_by = element;
    }
}

/// The form element computing this label's `required` & `displayOnly` state
///
/// A label moved out of its element is no longer managed by it.
pub fn managed_by(tree: &ControlTree, label: ControlKey) -> Option<ControlKey> {
    let element = tree.storage::<LabelState>(label)?.managed_by?;
    match tree.parent(label) == Some(element) {
        true => Some(element),
        false => None,
    }
}

/// Should the label be rendered with a "required" marker?
///
/// A free label is required if its own flag is set or if the labelled
/// control is required. Labels of form elements defer to
/// [`element::label_is_required`].
pub fn is_required(tree: &ControlTree, label: ControlKey) -> Result<bool, Error> {
    if let Some(element) = managed_by(tree, label) {
        return element::label_is_required(tree, element, label);
    }

    if tree.property_bool(label, "required")? {
        return Ok(true);
    }

    let target = match label_for(tree, label).and_then(|id| tree.by_id(&id)) {
        Some(target) => target,
        None => return Ok(false),
    };

    match tree.metadata(target)?.has_property("required") {
        true => tree.property_bool(target, "required"),
        false => Ok(false),
    }
}

/// Should the label be rendered in display-only mode?
///
/// Labels of form elements defer to [`element::label_is_display_only`].
pub fn is_display_only(tree: &ControlTree, label: ControlKey) -> Result<bool, Error> {
    match managed_by(tree, label) {
        Some(element) => element::label_is_display_only(tree, element, label),
        None => tree.property_bool(label, "displayOnly"),
    }
}
