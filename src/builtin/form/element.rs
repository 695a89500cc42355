//! `<FormElement>`: a label and the fields it describes
//!
//! The label is either an external control (aggregation `label`) or, when
//! set as plain text, an internal [`Label`](crate::builtin::label) created and owned by the element
//! (hidden aggregation `_label`). Either way, the first field is kept as the
//! label target:
//!
//! - an internal label points to it with `labelFor`,
//! - an external label which supports it points to it with
//!   `alternativeLabelFor`.
//!
//! While a label belongs to an element, its `required` and `displayOnly`
//! state is computed by [`label_is_required`] and [`label_is_display_only`].
//!
//! The element observes its own `fields` & `_label` aggregations and the
//! `required` property of each field, and attaches a render delegate to every field so
//! that the form layout hears about rendered content.

use crate::core::metadata::{ControlMetadata, Capabilities, property, aggregation, single_aggregation};
use crate::core::value::PropertyType;
use crate::core::event::{Handlers, Change, ChangeKind, Mutation, Delegate, DEFAULT_HANDLERS};
use crate::core::control::{ControlClass, ControlKey};
use crate::core::tree::ControlTree;
use crate::builtin::label;
use crate::{Error, error, CheapString};
use std::collections::BTreeMap;

pub const CLASS_NAME: &str = "sap.ui.layout.form.FormElement";

const LABEL: &str = "label";
const INTERNAL_LABEL: &str = "_label";
const FIELDS: &str = "fields";
const REQUIRED: &str = "required";

pub const METADATA: ControlMetadata = ControlMetadata {
    name: CLASS_NAME,
    library: "sap.ui.layout",
    properties: &[
        property("visible", PropertyType::Boolean, Some("true")),
    ],
    default_aggregation: Some(FIELDS),
    aggregations: &[
        single_aggregation(LABEL).or_text(),
        single_aggregation(INTERNAL_LABEL).hidden(),
        aggregation(FIELDS, "field"),
        single_aggregation("layoutData"),
    ],
    associations: &[],
    interfaces: Capabilities::empty(),
    design_time: true,
};

pub const CLASS: ControlClass = ControlClass {
    metadata: &METADATA,
    handlers: Handlers {
        initializer,
        finalizer,
        observer,
        ..DEFAULT_HANDLERS
    },
};

/// Argument of [`set_label`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LabelArg {
    /// Creates (or updates) an internal label
    Text(CheapString),
    Control(ControlKey),
    None,
}

/// Current label of an element, see [`label()`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LabelRef {
    Text(CheapString),
    Control(ControlKey),
}

/// ARIA attributes being written for a control, without the `aria-` prefix
pub type AriaProps = BTreeMap<String, String>;

#[derive(Default)]
struct ElementState {
    label_text: Option<CheapString>,
    internal_label: Option<ControlKey>,
    no_observer_change: bool,
}

fn state(tree: &ControlTree, element: ControlKey) -> Result<&ElementState, Error> {
    let id = tree.id(element)?;
    tree.storage(element).ok_or_else(|| error!(Metadata, "{} is not a form element", id))
}

fn state_mut(tree: &mut ControlTree, element: ControlKey) -> Result<&mut ElementState, Error> {
    let id = tree.id(element)?;
    tree.storage_mut(element).ok_or_else(|| error!(Metadata, "{} is not a form element", id))
}

fn initializer(tree: &mut ControlTree, element: ControlKey) -> Result<(), Error> {
    tree.set_storage(element, ElementState::default())?;
    tree.observe(element, element, &[], &[FIELDS, INTERNAL_LABEL])
}

fn finalizer(tree: &mut ControlTree, element: ControlKey) -> Result<(), Error> {
    for field in tree.aggregation(element, FIELDS)?.to_vec() {
        detach_delegate(tree, element, field)?;
    }

    tree.disconnect(element);

    let state = state_mut(tree, element)?;
    state.internal_label = None;
    state.label_text = None;
    Ok(())
}

fn observer(tree: &mut ControlTree, element: ControlKey, change: &Change) -> Result<(), Error> {
    match (change.object == element, change.name) {
        (true, FIELDS) => fields_changed(tree, element, change),
        (true, INTERNAL_LABEL) => internal_label_changed(tree, element, change),
        (false, REQUIRED) => invalidate_label(tree, element),
        _ => Ok(()),
    }
}

fn fields_changed(tree: &mut ControlTree, element: ControlKey, change: &Change) -> Result<(), Error> {
    if let ChangeKind::Aggregation { mutation, child } = change.kind {
        match mutation {
            Mutation::Insert => {
                if !tree.implements(child, Capabilities::FORM_CONTENT) {
                    log::warn!("{} is not valid Form content", tree.id(child)?);
                }
                attach_delegate(tree, element, child)?;
            },
            Mutation::Remove => detach_delegate(tree, element, child)?,
        }
    }

    update_label_for(tree, element)
}

/// The internal label was destroyed or moved away from outside
fn internal_label_changed(tree: &mut ControlTree, element: ControlKey, change: &Change) -> Result<(), Error> {
    if let ChangeKind::Aggregation { mutation: Mutation::Remove, child } = change.kind {
        let state = state_mut(tree, element)?;
        if state.internal_label == Some(child) {
            state.internal_label = None;
            state.label_text = None;
        }
    }

    Ok(())
}

fn field_rendered(tree: &mut ControlTree, element: ControlKey, field: ControlKey) -> Result<(), Error> {
    match tree.parent(element) {
        Some(container) => tree.content_rendered(container, element, field),
        None => Ok(()),
    }
}

fn attach_delegate(tree: &mut ControlTree, element: ControlKey, field: ControlKey) -> Result<(), Error> {
    tree.add_delegate(field, Delegate {
        owner: element,
        on_after_rendering: field_rendered,
    })?;

    if !state(tree, element)?.no_observer_change && tree.metadata(field)?.has_property(REQUIRED) {
        tree.observe(element, field, &[REQUIRED], &[])?;
    }

    Ok(())
}

fn detach_delegate(tree: &mut ControlTree, element: ControlKey, field: ControlKey) -> Result<(), Error> {
    if tree.contains(field) {
        tree.remove_delegate(field, element)?;
    }

    tree.unobserve(element, field);
    Ok(())
}

/// Points the label of `element` to its first field
fn update_label_for(tree: &mut ControlTree, element: ControlKey) -> Result<(), Error> {
    let first = tree.aggregation(element, FIELDS)?.first().copied();

    if let Some(internal) = state(tree, element)?.internal_label {
        return tree.set_association(internal, "labelFor", first);
    }

    if let Some(external) = tree.aggregated(element, LABEL)? {
        if tree.metadata(external)?.association("alternativeLabelFor").is_some() {
            tree.set_association(external, "alternativeLabelFor", first)?;
        }
    }

    Ok(())
}

/// Gives an external label back its own `required` & `displayOnly` state
fn release_label(tree: &mut ControlTree, element: ControlKey, label: ControlKey) -> Result<(), Error> {
    if tree.metadata(label)?.association("alternativeLabelFor").is_some() {
        tree.set_association(label, "alternativeLabelFor", None)?;
    }

    if label::managed_by(tree, label) == Some(element) {
        label::set_managed_by(tree, label, None);
    }

    Ok(())
}

pub fn create(tree: &mut ControlTree, id: Option<&str>) -> Result<ControlKey, Error> {
    tree.create(CLASS_NAME, id)
}

/// Sets the label of an element
///
/// - a text creates an internal label, or updates the existing one;
/// - a control replaces any label, destroying the internal one;
/// - [`LabelArg::None`] removes the label.
///
/// Returns `element` for chaining.
pub fn set_label(tree: &mut ControlTree, element: ControlKey, label: LabelArg) -> Result<ControlKey, Error> {
    let internal = state(tree, element)?.internal_label;

    if internal.is_none() {
        if let Some(previous) = tree.aggregated(element, LABEL)? {
            let kept = matches!(label, LabelArg::Control(l) if l == previous);
            if !kept {
                release_label(tree, element, previous)?;
            }
        }
    }

    match label {
        LabelArg::Text(text) => {
            tree.set_aggregation(element, LABEL, None)?;
            state_mut(tree, element)?.label_text = Some(text.clone());

            match internal {
                Some(internal) => label::set_text(tree, internal, &text)?,
                None => {
                    let id = format!("{}-label", tree.id(element)?);
                    let id = match tree.by_id(&id) {
                        Some(_) => None,
                        None => Some(id.as_str()),
                    };
                    let internal = label::create(tree, id)?;
                    label::set_text(tree, internal, &text)?;
                    tree.set_aggregation(element, INTERNAL_LABEL, Some(internal))?;
                    label::set_managed_by(tree, internal, Some(element));
                    state_mut(tree, element)?.internal_label = Some(internal);
                },
            }
        },
        LabelArg::Control(control) => {
            tree.set_aggregation(element, LABEL, Some(control))?;
            drop_internal_label(tree, element)?;

            if label::has_overridable_state(tree, control) {
                label::set_managed_by(tree, control, Some(element));
            }
        },
        LabelArg::None => {
            tree.set_aggregation(element, LABEL, None)?;
            drop_internal_label(tree, element)?;
        },
    }

    update_label_for(tree, element)?;
    Ok(element)
}

fn drop_internal_label(tree: &mut ControlTree, element: ControlKey) -> Result<(), Error> {
    let state = state_mut(tree, element)?;
    state.label_text = None;

    if let Some(internal) = state.internal_label.take() {
        tree.destroy(internal)?;
    }

    Ok(())
}

/// Destroys the label (external or internal) of an element
///
/// Returns `element` for chaining.
pub fn destroy_label(tree: &mut ControlTree, element: ControlKey) -> Result<ControlKey, Error> {
    if let Some(external) = tree.aggregated(element, LABEL)? {
        release_label(tree, element, external)?;
    }

    tree.destroy_aggregation(element, LABEL)?;
    drop_internal_label(tree, element)?;
    Ok(element)
}

/// The label as set: text for an internal label, else the external control
pub fn label(tree: &ControlTree, element: ControlKey) -> Result<Option<LabelRef>, Error> {
    if let Some(text) = &state(tree, element)?.label_text {
        return Ok(Some(LabelRef::Text(text.clone())));
    }

    Ok(tree.aggregated(element, LABEL)?.map(LabelRef::Control))
}

/// The label control: the internal one, else the external one
pub fn label_control(tree: &ControlTree, element: ControlKey) -> Option<ControlKey> {
    match state(tree, element) {
        Ok(ElementState { internal_label: Some(internal), .. }) => Some(*internal),
        _ => tree.aggregated(element, LABEL).ok().flatten(),
    }
}

pub fn fields(tree: &ControlTree, element: ControlKey) -> Result<&[ControlKey], Error> {
    tree.aggregation(element, FIELDS)
}

pub fn add_field(tree: &mut ControlTree, element: ControlKey, field: ControlKey) -> Result<(), Error> {
    tree.add_aggregation(element, FIELDS, field)
}

pub fn insert_field(tree: &mut ControlTree, element: ControlKey, field: ControlKey, index: usize) -> Result<(), Error> {
    tree.insert_aggregation(element, FIELDS, field, index)
}

pub fn remove_field(tree: &mut ControlTree, element: ControlKey, field: ControlKey) -> Result<Option<ControlKey>, Error> {
    tree.remove_aggregation(element, FIELDS, field)
}

pub fn remove_all_fields(tree: &mut ControlTree, element: ControlKey) -> Result<Vec<ControlKey>, Error> {
    tree.remove_all_aggregation(element, FIELDS)
}

pub fn destroy_fields(tree: &mut ControlTree, element: ControlKey) -> Result<(), Error> {
    tree.destroy_aggregation(element, FIELDS)
}

/// Re-evaluates the fields with `refresh` while `required` changes are not tracked
///
/// Field observations and label targets are set up again afterwards.
/// Returns `element` for chaining.
pub fn update_fields<F>(tree: &mut ControlTree, element: ControlKey, refresh: F) -> Result<ControlKey, Error>
where
    F: FnOnce(&mut ControlTree, ControlKey) -> Result<(), Error>,
{
    state_mut(tree, element)?.no_observer_change = true;
    let result = refresh(tree, element);
    state_mut(tree, element)?.no_observer_change = false;
    result?;

    for field in tree.aggregation(element, FIELDS)?.to_vec() {
        if tree.metadata(field)?.has_property(REQUIRED) {
            tree.observe(element, field, &[REQUIRED], &[])?;
        }
    }

    update_label_for(tree, element)?;
    Ok(element)
}

/// Adds the label of `element` to the `labelledby` attribute written for `target`
///
/// Nothing happens when `target` is the label itself. An id already listed
/// is not repeated.
pub fn enhance_accessibility_state(
    tree: &ControlTree,
    element: ControlKey,
    target: ControlKey,
    aria: &mut AriaProps,
) -> Result<(), Error> {
    let label = match label_control(tree, element) {
        Some(label) if label != target => label,
        _ => return Ok(()),
    };

    let id = tree.id(label)?;
    let labelledby = match aria.get("labelledby") {
        Some(ids) if ids.split(' ').any(|i| i == &*id) => return Ok(()),
        Some(ids) if !ids.trim().is_empty() => format!("{} {}", id, ids),
        _ => id.to_string(),
    };

    aria.insert("labelledby".into(), labelledby);
    Ok(())
}

pub fn is_visible(tree: &ControlTree, element: ControlKey) -> Result<bool, Error> {
    tree.property_bool(element, "visible")
}

pub fn set_visible(tree: &mut ControlTree, element: ControlKey, visible: bool) -> Result<(), Error> {
    tree.set_property(element, "visible", visible)
}

/// Re-renders the label, e.g. because its computed state changed
pub fn invalidate_label(tree: &mut ControlTree, element: ControlKey) -> Result<(), Error> {
    if let Some(label) = label_control(tree, element) {
        tree.invalidate(label);
    }
    Ok(())
}

/// `required` state of the label of `element`
///
/// The label is required if flagged so, or if one of the fields is required
/// and not read-only.
pub fn label_is_required(tree: &ControlTree, element: ControlKey, label: ControlKey) -> Result<bool, Error> {
    if tree.metadata(label)?.has_property(REQUIRED) && tree.property_bool(label, REQUIRED)? {
        return Ok(true);
    }

    for field in tree.aggregation(element, FIELDS)? {
        let metadata = tree.metadata(*field)?;
        if !metadata.has_property(REQUIRED) || !tree.property_bool(*field, REQUIRED)? {
            continue;
        }

        if !metadata.has_property("editable") || tree.property_bool(*field, "editable")? {
            return Ok(true);
        }
    }

    Ok(false)
}

/// `displayOnly` state of the label of `element`
///
/// An explicitly set value wins; otherwise the label is display-only when
/// the enclosing form is not editable.
pub fn label_is_display_only(tree: &ControlTree, element: ControlKey, label: ControlKey) -> Result<bool, Error> {
    if !tree.metadata(label)?.has_property("displayOnly") {
        return Ok(false);
    }

    if !tree.is_property_initial(label, "displayOnly")? {
        return tree.property_bool(label, "displayOnly");
    }

    let form = tree.parent(element).and_then(|container| tree.parent(container));
    match form {
        Some(form) if tree.metadata(form)?.has_property("editable") => Ok(!tree.property_bool(form, "editable")?),
        _ => Ok(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::input;

    #[test]
    fn text_label_is_internal() {
        let mut tree = ControlTree::new();
        let element = create(&mut tree, None).unwrap();
        set_label(&mut tree, element, LabelArg::Text("Name".into())).unwrap();

        let internal = label_control(&tree, element).unwrap();
        assert_eq!(tree.parent_aggregation(internal), Some(INTERNAL_LABEL));
        assert_eq!(label(&tree, element).unwrap(), Some(LabelRef::Text("Name".into())));
        assert_eq!(label::managed_by(&tree, internal), Some(element));

        set_label(&mut tree, element, LabelArg::Text("Other".into())).unwrap();
        assert_eq!(label_control(&tree, element), Some(internal));
        assert_eq!(&*label::text(&tree, internal).unwrap(), "Other");
    }

    #[test]
    fn control_label_replaces_internal_one() {
        let mut tree = ControlTree::new();
        let element = create(&mut tree, None).unwrap();
        set_label(&mut tree, element, LabelArg::Text("Name".into())).unwrap();
        let internal = label_control(&tree, element).unwrap();

        let external = label::create(&mut tree, Some("L1")).unwrap();
        set_label(&mut tree, element, LabelArg::Control(external)).unwrap();

        assert!(!tree.contains(internal));
        assert_eq!(label_control(&tree, element), Some(external));
        assert_eq!(label(&tree, element).unwrap(), Some(LabelRef::Control(external)));
    }

    #[test]
    fn aria_labelledby_is_not_repeated() {
        let mut tree = ControlTree::new();
        let element = create(&mut tree, None).unwrap();
        let field = input::create(&mut tree, Some("I1")).unwrap();
        let external = label::create(&mut tree, Some("L1")).unwrap();
        add_field(&mut tree, element, field).unwrap();
        set_label(&mut tree, element, LabelArg::Control(external)).unwrap();

        let mut aria = AriaProps::new();
        enhance_accessibility_state(&tree, element, field, &mut aria).unwrap();
        enhance_accessibility_state(&tree, element, field, &mut aria).unwrap();
        assert_eq!(aria.get("labelledby").map(String::as_str), Some("L1"));

        let mut aria = AriaProps::new();
        aria.insert("labelledby".into(), "Other".into());
        enhance_accessibility_state(&tree, element, field, &mut aria).unwrap();
        assert_eq!(aria.get("labelledby").map(String::as_str), Some("L1 Other"));

        let mut aria = AriaProps::new();
        enhance_accessibility_state(&tree, element, external, &mut aria).unwrap();
        assert!(aria.is_empty());
    }
}
