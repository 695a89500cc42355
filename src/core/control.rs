//! The Control structure

use super::event::{Handlers, Delegate};
use super::metadata::ControlMetadata;
use super::value::PropertyValue;
use crate::CheapString;
use oakwood::{Cookie64, index, tree};
use std::{any::Any, collections::BTreeMap, fmt};

tree!(ControlArena, Control, ControlKey, ControlIndex, OptionalControlIndex, Cookie64);

// registered [`ControlClass`]es
index!(ClassIndex, OptionalClassIndex, u16);

/// Control classes pair declarative metadata with a handler table
#[derive(Copy, Clone)]
pub struct ControlClass {
    pub metadata: &'static ControlMetadata,
    pub handlers: Handlers,
}

/// A live control
///
/// Keys of destroyed controls stay stale: the arena cookie changes when
/// a slot is recycled.
#[derive(Default)]
pub struct Control {
    pub id: CheapString,
    pub class: OptionalClassIndex,
    /// Parent control & the aggregation holding this one
    pub parent: Option<(ControlKey, &'static str)>,
    /// Number of times this control was invalidated
    pub invalidations: usize,
    /// Class-specific state; classes initialize it in their initializer.
    pub storage: Option<Box<dyn Any>>,

    pub(crate) properties: BTreeMap<&'static str, PropertyValue>,
    pub(crate) aggregations: BTreeMap<&'static str, Vec<ControlKey>>,
    pub(crate) associations: BTreeMap<&'static str, CheapString>,
    pub(crate) delegates: Vec<Delegate>,
    /// Controls holding a delegate owned by this one
    pub(crate) delegated_to: Vec<ControlKey>,
}

impl Control {
    pub(crate) fn children(&self) -> impl Iterator<Item = ControlKey> + '_ {
        self.aggregations.values().flat_map(|list| list.iter().copied())
    }
}

impl fmt::Debug for Control {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Control")
            .field("id", &self.id)
            .field("class", &self.class)
            .field("parent", &self.parent)
            .field("properties", &self.properties)
            .field("aggregations", &self.aggregations)
            .field("associations", &self.associations)
            .finish()
    }
}
