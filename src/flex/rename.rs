//! Renames a label or a title of a form
//!
//! The change stores the new text in `texts.formText` and the renamed
//! control in `content.elementSelector`:
//!
//! ```json
//! {
//!     "changeType": "renameLabel",
//!     "selector": { "id": "SimpleForm" },
//!     "content": { "elementSelector": { "id": "Label0" } },
//!     "texts": { "formText": { "value": "Name", "type": "XFLD" } }
//! }
//! ```
//!
//! Tools report the renamed *form element* (or container), while the
//! change must point to the control carrying the text, so that it can be
//! applied to an XML view where form elements do not exist yet.

use super::{ChangeRecord, PropertyBag, Text};
use crate::builtin::form::{TitleRef, container, element};
use crate::core::tree::ControlTree;
use crate::modifier::{Selector, TreeModifier};
use crate::{Error, error};
use serde::{Deserialize, Serialize};

pub const RENAME_LABEL: &str = "renameLabel";
pub const RENAME_TITLE: &str = "renameTitle";
pub const RENAME: &str = "rename";

const TEXT_PROPERTY: &str = "text";
const TEXT_TYPE: &str = "XFLD";

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RenameKind {
    RenameLabel,
    RenameTitle,
}

impl RenameKind {
    pub fn change_type(self) -> &'static str {
        match self {
            Self::RenameLabel => RENAME_LABEL,
            Self::RenameTitle => RENAME_TITLE,
        }
    }
}

/// What a tool reports when the user renamed something
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecificChangeInfo {
    #[serde(default)]
    pub renamed_element: Option<Selector>,
    pub change_type: RenameKind,
    /// The new text; an empty text is valid
    #[serde(default)]
    pub value: Option<String>,
}

/// Writes the new text of a rename change to the renamed control
///
/// `control` is the control the change is attached to; it must be part of
/// the view. Returns `Ok(false)` without touching the view if the change
/// carries no text.
pub fn apply_change<M: TreeModifier>(
    change: &ChangeRecord,
    control: Option<M::Node>,
    bag: &mut PropertyBag<M>,
) -> Result<bool, Error> {
    bag.check_target(control)?;

    let value = match change.texts.form_text.as_ref().and_then(|t| t.value.as_deref()) {
        Some(value) => value,
        None => {
            log::error!("Change does not contain sufficient information to be applied: {:?}", change.selector);
            return Ok(false);
        },
    };

    let id = match (&change.content.element_selector, &change.content.rename_id) {
        (Some(selector), _) => selector.id.as_str(),
        (None, Some(id)) => id.as_str(),
        (None, None) => return Err(error!(InvalidTarget, "Rename change without element selector")),
    };

    let renamed = bag.modifier.by_id(&*bag.view, bag.root, id)
        .ok_or_else(|| error!(InvalidTarget, "No control with id {:?} in the view", id))?;

    bag.modifier.set_property(bag.view, renamed, TEXT_PROPERTY, value)?;
    log::debug!("renamed {} to {:?}", id, value);
    Ok(true)
}

/// Fills a rename change from what the tool reported
///
/// Fails with [`MissingValue`](crate::ErrorKind::MissingValue) without a
/// value (checked first), then with
/// [`MissingSelector`](crate::ErrorKind::MissingSelector) without a renamed
/// element.
pub fn complete_change_content(
    change: &mut ChangeRecord,
    info: &SpecificChangeInfo,
    tree: &ControlTree,
) -> Result<(), Error> {
    let value = info.value.as_ref()
        .ok_or_else(|| error!(MissingValue, "Rename change requires a value"))?;

    let renamed = info.renamed_element.as_ref()
        .ok_or_else(|| error!(MissingSelector, "Rename change requires the renamed element"))?;

    let id = text_control_id(tree, &renamed.id, info.change_type);

    change.texts.form_text = Some(Text {
        value: Some(value.clone()),
        text_type: Some(TEXT_TYPE.into()),
    });
    change.content.element_selector = Some(Selector::new(&id));
    change.content.rename_id = None;

    if change.change_type.is_none() {
        change.change_type = Some(info.change_type.change_type().into());
    }

    Ok(())
}

/// Id of the control holding the text of `renamed`
///
/// Falls back to `renamed` itself when it has no such control.
fn text_control_id(tree: &ControlTree, renamed: &str, kind: RenameKind) -> String {
    let key = match tree.by_id(renamed) {
        Some(key) => key,
        None => return renamed.into(),
    };

    let text_control = match kind {
        RenameKind::RenameLabel if tree.is_a(key, element::CLASS_NAME) => element::label_control(tree, key),
        RenameKind::RenameTitle if tree.is_a(key, container::CLASS_NAME) => match container::title(tree, key) {
            Ok(Some(TitleRef::Control(title))) => Some(title),
            _ => None,
        },
        _ => None,
    };

    match text_control.and_then(|c| tree.id(c).ok()) {
        Some(id) => id.into(),
        None => renamed.into(),
    }
}
