//! Design-time metadata
//!
//! Visual tools read a [`DesignTimeMetadata`] descriptor to know which
//! aggregations of a composite control they may edit, which node stands for
//! each aggregation, and which named change handler performs an action
//! (e.g. `moveControls`). Descriptors are JSON documents:
//!
//! ```json
//! {
//!     "aggregations": {
//!         "title": { "ignore": true },
//!         "toolbar": { "ignore": "whenEmpty", "domRef": "control" },
//!         "formContainers": { "domRef": ":sap-domref", "actions": { "move": "moveControls" } }
//!     }
//! }
//! ```

use super::tree::ControlTree;
use super::control::ControlKey;
use crate::{Error, error};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Whether tools should skip an aggregation
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Ignore {
    Always(bool),
    Rule(IgnoreRule),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IgnoreRule {
    /// Ignored while the aggregation holds no control
    WhenEmpty,
}

impl Default for Ignore {
    fn default() -> Self {
        Self::Always(false)
    }
}

/// Named change handlers for tool actions
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r#move: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rename: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregationDesignTime {
    #[serde(default)]
    pub ignore: Ignore,
    /// A selector, or `"control"` for the aggregated control's own node
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dom_ref: Option<String>,
    #[serde(default)]
    pub actions: Actions,
}

/// Node standing for an aggregation
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DomRef {
    Selector(String),
    Control(ControlKey),
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesignTimeMetadata {
    #[serde(default)]
    pub aggregations: BTreeMap<String, AggregationDesignTime>,
}

const CONTROL_DOM_REF: &str = "control";

impl DesignTimeMetadata {
    pub fn parse(json: &str) -> Result<Self, Error> {
        serde_json::from_str(json).map_err(|e| error!(Json, "design-time metadata: {}", e))
    }

    fn entry(&self, aggregation: &str) -> Option<&AggregationDesignTime> {
        self.aggregations.get(aggregation)
    }

    /// Should tools skip `aggregation` of `key`?
    pub fn is_ignored(&self, tree: &ControlTree, key: ControlKey, aggregation: &str) -> Result<bool, Error> {
        match self.entry(aggregation).map(|e| &e.ignore) {
            None | Some(Ignore::Always(false)) => Ok(false),
            Some(Ignore::Always(true)) => Ok(true),
            Some(Ignore::Rule(IgnoreRule::WhenEmpty)) => Ok(tree.aggregation(key, aggregation)?.is_empty()),
        }
    }

    /// The node standing for `aggregation` of `key`
    pub fn dom_ref(&self, tree: &ControlTree, key: ControlKey, aggregation: &str) -> Result<Option<DomRef>, Error> {
        let dom_ref = match self.entry(aggregation).and_then(|e| e.dom_ref.as_deref()) {
            Some(dom_ref) => dom_ref,
            None => return Ok(None),
        };

        match dom_ref {
            CONTROL_DOM_REF => Ok(tree.aggregated(key, aggregation)?.map(DomRef::Control)),
            selector => Ok(Some(DomRef::Selector(selector.into()))),
        }
    }

    /// Name of the change handler moving children of `aggregation`
    pub fn move_action(&self, aggregation: &str) -> Option<&str> {
        self.entry(aggregation)?.actions.r#move.as_deref()
    }

    pub fn rename_action(&self, aggregation: &str) -> Option<&str> {
        self.entry(aggregation)?.actions.rename.as_deref()
    }

    /// Aggregations of `key` which tools may edit, in name order
    pub fn editable_aggregations(&self, tree: &ControlTree, key: ControlKey) -> Result<Vec<&str>, Error> {
        let mut editable = Vec::new();
        for name in self.aggregations.keys() {
            if !self.is_ignored(tree, key, name)? {
                editable.push(name.as_str());
            }
        }
        Ok(editable)
    }
}
