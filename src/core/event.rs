//! Handler tables, change notifications & render delegates

use super::tree::ControlTree;
use super::control::ControlKey;
use super::value::PropertyValue;
use crate::{Error, CheapString};

#[cfg(doc)]
use super::control::ControlClass;

/// Runs right after a control was created (`init`)
pub type Initializer = fn(
    tree: &mut ControlTree,
    key: ControlKey,
) -> Result<(), Error>;

/// Runs right before a control is destroyed (`exit`)
///
/// The control and its children are still alive when this runs.
pub type Finalizer = fn(
    tree: &mut ControlTree,
    key: ControlKey,
) -> Result<(), Error>;

/// Receives the changes registered via [`ControlTree::observe`]
///
/// # Arguments
///
/// - `observer`: the observing control (its class provides this handler)
/// - `change`: what happened; `change.object` is the observed control
pub type Observer = fn(
    tree: &mut ControlTree,
    observer: ControlKey,
    change: &Change,
) -> Result<(), Error>;

/// Called when some content control below `key` was rendered
///
/// # Arguments
///
/// - `element`: the direct child of `key` which owns the rendered control
/// - `source`: the rendered control
pub type ContentRendered = fn(
    tree: &mut ControlTree,
    key: ControlKey,
    element: ControlKey,
    source: ControlKey,
) -> Result<(), Error>;

/// Called when the layout data of `source` (or of one of its descendants) changed
pub type LayoutDataChanged = fn(
    tree: &mut ControlTree,
    key: ControlKey,
    source: ControlKey,
) -> Result<(), Error>;

/// Builds the accessibility description of a control
pub type AccessibilityInfoGetter = fn(
    tree: &ControlTree,
    key: ControlKey,
) -> Option<AccessibilityInfo>;

/// Dispatch Table for [`ControlClass`]es
#[derive(Copy, Clone)]
pub struct Handlers {
    pub initializer: Initializer,
    pub finalizer: Finalizer,
    pub observer: Observer,
    pub content_rendered: ContentRendered,
    pub layout_data_changed: LayoutDataChanged,
    pub accessibility_info: AccessibilityInfoGetter,
}

fn initializer(_tree: &mut ControlTree, _key: ControlKey) -> Result<(), Error> {
    Ok(())
}

fn finalizer(_tree: &mut ControlTree, _key: ControlKey) -> Result<(), Error> {
    Ok(())
}

fn observer(_tree: &mut ControlTree, observer: ControlKey, change: &Change) -> Result<(), Error> {
    log::trace!("{:?} ignores change {:?}", observer, change);
    Ok(())
}

fn content_rendered(_: &mut ControlTree, _: ControlKey, _: ControlKey, _: ControlKey) -> Result<(), Error> {
    Ok(())
}

fn layout_data_changed(tree: &mut ControlTree, key: ControlKey, source: ControlKey) -> Result<(), Error> {
    match tree.parent(key) {
        Some(parent) => tree.layout_data_changed(parent, source),
        None => Ok(()),
    }
}

fn accessibility_info(_: &ControlTree, _: ControlKey) -> Option<AccessibilityInfo> {
    None
}

/// Default handlers (see detailed doc)
///
/// - `initializer`, `finalizer`, `content_rendered`: do nothing
/// - `observer`: ignores the change
/// - `layout_data_changed`: bubbles to the parent
/// - `accessibility_info`: returns `None`
pub const DEFAULT_HANDLERS: Handlers = Handlers {
    initializer,
    finalizer,
    observer,
    content_rendered,
    layout_data_changed,
    accessibility_info,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Mutation {
    Insert,
    Remove,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChangeKind {
    Property {
        old: PropertyValue,
        current: PropertyValue,
    },
    Aggregation {
        mutation: Mutation,
        child: ControlKey,
    },
}

/// A single mutation of an observed control
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Change {
    /// The mutated control
    pub object: ControlKey,
    /// Property or aggregation name
    pub name: &'static str,
    pub kind: ChangeKind,
}

/// Called by [`ControlTree::after_rendering`] for each delegate of the rendered control
pub type RenderCallback = fn(
    tree: &mut ControlTree,
    owner: ControlKey,
    source: ControlKey,
) -> Result<(), Error>;

/// Render lifecycle hook attached to a control by another one (its `owner`)
#[derive(Copy, Clone)]
pub struct Delegate {
    pub owner: ControlKey,
    pub on_after_rendering: RenderCallback,
}

/// Accessibility description of a control, as exposed to screen readers
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AccessibilityInfo {
    pub role: Option<CheapString>,
    pub type_name: Option<CheapString>,
    pub description: Option<CheapString>,
    pub enabled: Option<bool>,
    pub editable: Option<bool>,
    pub children: Vec<AccessibilityInfo>,
}
