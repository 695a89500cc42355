//! Flexibility changes
//!
//! A [`ChangeRecord`] describes one semantic edit of a view, e.g. "the
//! label `Label0` now reads `Name`". Change handlers apply records through
//! a [`TreeModifier`], so the same record can be applied to a live
//! [`ControlTree`](crate::core::tree::ControlTree) or to an XML view before
//! it is instantiated:
//!
//! | Change types                            | Handler              |
//! |-----------------------------------------|----------------------|
//! | `renameLabel`, `renameTitle`, `rename`  | [`rename`]           |
//! | `moveControls`                          | [`move_controls`]    |
//!
//! Records are JSON documents. Fields this crate does not know about are
//! kept as they are, so records survive a read / write cycle.

pub mod move_controls;
pub mod rename;

use crate::modifier::{Selector, TreeModifier};
use crate::{Error, error};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A modifier and the view it works on
pub struct PropertyBag<'a, M: TreeModifier> {
    pub modifier: &'a M,
    pub view: &'a mut M::View,
    /// Ids are resolved at or below this node
    pub root: M::Node,
}

impl<'a, M: TreeModifier> PropertyBag<'a, M> {
    pub fn new(modifier: &'a M, view: &'a mut M::View, root: M::Node) -> Self {
        Self { modifier, view, root }
    }

    pub fn by_selector(&self, selector: &Selector) -> Option<M::Node> {
        self.modifier.by_selector(&*self.view, self.root, selector)
    }

    /// Checks that `control` was given and still belongs to the view
    pub(crate) fn check_target(&self, control: Option<M::Node>) -> Result<M::Node, Error> {
        match control {
            Some(control) if self.modifier.contains(&*self.view, self.root, control) => Ok(control),
            Some(control) => Err(error!(InvalidTarget, "{:?} is not part of the view", control)),
            None => Err(error!(InvalidTarget, "No control to apply the change to")),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change_type: Option<String>,
    /// The control the change is attached to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selector: Option<Selector>,
    #[serde(default)]
    pub content: ChangeContent,
    #[serde(default)]
    pub texts: Texts,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeContent {
    /// The renamed element
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element_selector: Option<Selector>,
    /// Renamed element, as written by older tools
    #[serde(default, rename = "sRenameId", skip_serializing_if = "Option::is_none")]
    pub rename_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub moved_elements: Vec<MovedElement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<AggregationSelector>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<AggregationSelector>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Texts {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form_text: Option<Text>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A translatable text of a change
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Text {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Translation category, `XFLD` for field labels
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub text_type: Option<String>,
}

/// A control moved by a `moveControls` change
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovedElement {
    pub selector: Selector,
    pub source_index: usize,
    pub target_index: usize,
}

/// An aggregation of some control
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregationSelector {
    pub selector: Selector,
    pub aggregation: String,
}

impl ChangeRecord {
    pub fn new(change_type: &str, selector: Selector) -> Self {
        Self {
            change_type: Some(change_type.into()),
            selector: Some(selector),
            ..Self::default()
        }
    }

    pub fn parse(json: &str) -> Result<Self, Error> {
        serde_json::from_str(json).map_err(|e| error!(Json, "change record: {}", e))
    }

    pub fn to_json(&self) -> Result<String, Error> {
        serde_json::to_string(self).map_err(|e| error!(Json, "change record: {}", e))
    }

    /// The control the change is attached to, in the view of `bag`
    pub fn resolve_control<M: TreeModifier>(&self, bag: &PropertyBag<M>) -> Option<M::Node> {
        bag.by_selector(self.selector.as_ref()?)
    }
}

/// Applies a change with the handler registered for its type
///
/// Returns `Ok(false)` when the change lacks what its handler needs to
/// apply it; nothing is mutated in that case.
pub fn apply_change<M: TreeModifier>(
    change: &ChangeRecord,
    control: Option<M::Node>,
    bag: &mut PropertyBag<M>,
) -> Result<bool, Error> {
    match change.change_type.as_deref() {
        Some(move_controls::CHANGE_TYPE) => move_controls::apply_change(change, control, bag),
        Some(rename::RENAME_LABEL | rename::RENAME_TITLE | rename::RENAME) => rename::apply_change(change, control, bag),
        Some(other) => Err(error!(Other, "No change handler for {:?}", other)),
        None => Err(error!(Other, "Change without a change type")),
    }
}
