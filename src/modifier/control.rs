use super::TreeModifier;
use crate::core::control::ControlKey;
use crate::core::tree::ControlTree;
use crate::core::value::PropertyValue;
use crate::{Error, error};

/// Modifier for live controls
///
/// Ids are resolved through the tree's id registry, then checked to be
/// below the view root. Property writes are parsed according to the
/// control metadata and invalidate the control like any other write.
#[derive(Copy, Clone, Debug, Default)]
pub struct JsControlTreeModifier;

impl TreeModifier for JsControlTreeModifier {
    type View = ControlTree;
    type Node = ControlKey;

    fn by_id(&self, tree: &ControlTree, root: ControlKey, id: &str) -> Option<ControlKey> {
        let key = tree.by_id(id)?;
        match tree.is_ancestor(root, key) {
            true => Some(key),
            false => None,
        }
    }

    fn contains(&self, tree: &ControlTree, root: ControlKey, key: ControlKey) -> bool {
        tree.contains(key) && tree.is_ancestor(root, key)
    }

    fn get_id(&self, tree: &ControlTree, key: ControlKey) -> Option<String> {
        tree.id(key).ok().map(String::from)
    }

    fn get_parent(&self, tree: &ControlTree, key: ControlKey) -> Option<ControlKey> {
        tree.parent(key)
    }

    fn get_property(&self, tree: &ControlTree, key: ControlKey, name: &str) -> Result<Option<String>, Error> {
        match tree.property(key, name)? {
            PropertyValue::Null => Ok(None),
            value => Ok(Some(value.to_string())),
        }
    }

    fn set_property(&self, tree: &mut ControlTree, key: ControlKey, name: &str, value: &str) -> Result<(), Error> {
        let info = tree.metadata(key)?.property(name).ok_or_else(|| {
            let class = tree.metadata(key).map(|m| m.name).unwrap_or_default();
            error!(InvalidTarget, "{} has no property {}", class, name)
        })?;

        let value = PropertyValue::parse(value, info.ty)?;
        tree.set_property(key, name, value)
    }

    fn get_aggregation(&self, tree: &ControlTree, key: ControlKey, name: &str) -> Result<Vec<ControlKey>, Error> {
        Ok(tree.aggregation(key, name)?.to_vec())
    }

    fn insert_aggregation(
        &self,
        tree: &mut ControlTree,
        parent: ControlKey,
        name: &str,
        child: ControlKey,
        index: usize,
    ) -> Result<(), Error> {
        tree.insert_aggregation(parent, name, child, index)
    }

    fn remove_aggregation(&self, tree: &mut ControlTree, parent: ControlKey, name: &str, child: ControlKey) -> Result<(), Error> {
        tree.remove_aggregation(parent, name, child).map(|_| ())
    }
}
