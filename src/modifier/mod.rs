//! Tree modifiers
//!
//! A [`TreeModifier`] lets change handlers read and mutate a view without
//! knowing how it is represented. Two modifiers exist:
//!
//! - [`JsControlTreeModifier`] works on live controls of a
//!   [`ControlTree`](crate::core::tree::ControlTree);
//! - [`XmlTreeModifier`] works on the elements of an
//!   [`XmlDocument`](crate::core::xml::XmlDocument), before controls exist.
//!
//! Ids are resolved below a view root: the root control of a live view,
//! or the root element of an XML view.

mod control;
mod xml;

pub use control::JsControlTreeModifier;
pub use xml::XmlTreeModifier;

use crate::Error;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt::Debug;

/// Identifies a control (or XML element) by id
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selector {
    pub id: String,
    /// The id is local to the owning component
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub id_is_local: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Selector {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }
}

pub trait TreeModifier {
    /// The whole tree: a control tree or an XML document
    type View: ?Sized;
    /// A control or an element of the tree
    type Node: Copy + Eq + Debug;

    /// Finds the node with this id at or below `root`
    fn by_id(&self, view: &Self::View, root: Self::Node, id: &str) -> Option<Self::Node>;

    fn by_selector(&self, view: &Self::View, root: Self::Node, selector: &Selector) -> Option<Self::Node> {
        self.by_id(view, root, &selector.id)
    }

    /// Is `node` still part of the view rooted at `root`?
    fn contains(&self, view: &Self::View, root: Self::Node, node: Self::Node) -> bool;

    fn get_id(&self, view: &Self::View, node: Self::Node) -> Option<String>;

    /// The control owning `node`, skipping aggregation nodes
    fn get_parent(&self, view: &Self::View, node: Self::Node) -> Option<Self::Node>;

    /// Textual value of a property; `None` when it is not set
    fn get_property(&self, view: &Self::View, node: Self::Node, name: &str) -> Result<Option<String>, Error>;

    /// Sets a property from its textual value
    fn set_property(&self, view: &mut Self::View, node: Self::Node, name: &str, value: &str) -> Result<(), Error>;

    fn get_aggregation(&self, view: &Self::View, node: Self::Node, name: &str) -> Result<Vec<Self::Node>, Error>;

    /// Inserts `child` at `index` (clamped), removing it from its current parent
    fn insert_aggregation(
        &self,
        view: &mut Self::View,
        parent: Self::Node,
        name: &str,
        child: Self::Node,
        index: usize,
    ) -> Result<(), Error>;

    /// Removes `child` from an aggregation; nothing happens if it is not there
    fn remove_aggregation(&self, view: &mut Self::View, parent: Self::Node, name: &str, child: Self::Node) -> Result<(), Error>;
}
