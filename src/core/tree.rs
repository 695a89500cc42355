//! The live control tree
//!
//! [`ControlTree`] owns every control of an application, the explicit id
//! registry used to resolve controls by id, the observer registrations and
//! the registered control classes.
//!
//! All structural mutations go through the tree. Each inserted or removed
//! child and each property change is reported synchronously to the
//! controls observing the mutated control, through the observer's
//! [`Handlers::observer`](super::event::Handlers) entry.

use super::control::{Control, ControlArena, ControlKey, ControlClass, ClassIndex};
use super::event::{Change, ChangeKind, Mutation, Delegate, Handlers, AccessibilityInfo};
use super::metadata::{Capabilities, ControlMetadata};
use super::value::PropertyValue;
use crate::{Error, error, CheapString};
use std::{any::Any, collections::HashMap, mem};

pub struct DebuggingOptions {
    /// Log every invalidation at `trace` level
    pub trace_invalidations: bool,
    /// Log every observer delivery at `trace` level
    pub trace_observers: bool,
}

/// What an observer watches on a target
struct Observation {
    observer: ControlKey,
    target: ControlKey,
    properties: Vec<&'static str>,
    aggregations: Vec<&'static str>,
}

impl Observation {
    fn watches(&self, change: &Change) -> bool {
        match change.kind {
            ChangeKind::Property { .. } => self.properties.contains(&change.name),
            ChangeKind::Aggregation { .. } => self.aggregations.contains(&change.name),
        }
    }
}

pub struct ControlTree {
    pub debug: DebuggingOptions,

    arena: ControlArena,
    registry: HashMap<CheapString, ControlKey>,
    classes: Vec<ControlClass>,
    class_names: HashMap<&'static str, ClassIndex>,
    observations: Vec<Observation>,
    generated_ids: usize,
}

impl Default for ControlTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ControlTree {
    /// Creates an empty tree with all [built-in classes](crate::builtin::CLASSES) registered
    pub fn new() -> Self {
        let mut tree = Self {
            debug: DebuggingOptions {
                trace_invalidations: false,
                trace_observers: false,
            },
            arena: ControlArena::new(),
            registry: HashMap::new(),
            classes: Vec::with_capacity(crate::builtin::CLASSES.len()),
            class_names: HashMap::new(),
            observations: Vec::new(),
            generated_ids: 0,
        };

        for class in crate::builtin::CLASSES {
            tree.register(*class);
        }

        tree
    }

    /// Registers a control class; a class with the same name is replaced.
    pub fn register(&mut self, class: ControlClass) -> ClassIndex {
        let name = class.metadata.name;
        if let Some(index) = self.class_names.get(name) {
            self.classes[usize::from(*index)] = class;
            return *index;
        }

        let index: ClassIndex = self.classes.len().into();
        self.classes.push(class);
        self.class_names.insert(name, index);
        index
    }

    pub fn class_index(&self, name: &str) -> Option<ClassIndex> {
        self.class_names.get(name).copied()
    }

    /// Creates a control of a registered class and runs its initializer
    ///
    /// Without an `id`, one is generated from the class name (`__label3`).
    pub fn create(&mut self, class_name: &str, id: Option<&str>) -> Result<ControlKey, Error> {
        let class = match self.class_index(class_name) {
            Some(class) => class,
            None => return Err(error!(Metadata, "Unknown control class: {}", class_name)),
        };

        let id = match id {
            Some(id) if id.is_empty() => return Err(error!(Metadata, "Control ids cannot be empty")),
            Some(id) if self.registry.contains_key(id) => {
                return Err(error!(Metadata, "Duplicate id: {:?}", id));
            },
            Some(id) => CheapString::copy(id),
            None => self.generate_id(class),
        };

        let key = self.arena.create();
        self.arena[key] = Control {
            id: id.clone(),
            class: Some(class).into(),
            ..Control::default()
        };
        self.registry.insert(id, key);

        let initializer = self.classes[usize::from(class)].handlers.initializer;
        initializer(self, key)?;

        Ok(key)
    }

    fn generate_id(&mut self, class: ClassIndex) -> CheapString {
        let prefix = self.classes[usize::from(class)].metadata.short_name().to_lowercase();
        loop {
            let id = format!("__{}{}", prefix, self.generated_ids);
            self.generated_ids += 1;
            if !self.registry.contains_key(id.as_str()) {
                break id.into();
            }
        }
    }

    pub fn get(&self, key: ControlKey) -> Option<&Control> {
        self.arena.get(key)
    }

    fn get_mut(&mut self, key: ControlKey) -> Option<&mut Control> {
        match self.arena.get(key).is_some() {
            true => Some(&mut self.arena[key]),
            false => None,
        }
    }

    pub fn contains(&self, key: ControlKey) -> bool {
        self.get(key).is_some()
    }

    pub fn control(&self, key: ControlKey) -> Result<&Control, Error> {
        self.get(key).ok_or_else(|| error!(UnknownControl, "{:?} is not a live control", key))
    }

    fn control_mut(&mut self, key: ControlKey) -> Result<&mut Control, Error> {
        self.get_mut(key).ok_or_else(|| error!(UnknownControl, "{:?} is not a live control", key))
    }

    /// Resolves a control by id
    pub fn by_id(&self, id: &str) -> Option<ControlKey> {
        self.registry.get(id).copied()
    }

    pub fn id(&self, key: ControlKey) -> Result<CheapString, Error> {
        Ok(self.control(key)?.id.clone())
    }

    fn class(&self, key: ControlKey) -> Result<&ControlClass, Error> {
        let control = self.control(key)?;
        match control.class.get() {
            Some(class) => Ok(&self.classes[usize::from(class)]),
            None => Err(error!(UnknownControl, "{} has no class", control.id)),
        }
    }

    pub fn metadata(&self, key: ControlKey) -> Result<&'static ControlMetadata, Error> {
        Ok(self.class(key)?.metadata)
    }

    pub fn handlers(&self, key: ControlKey) -> Result<Handlers, Error> {
        Ok(self.class(key)?.handlers)
    }

    /// Checks that `key` is a control of the given class
    pub fn is_a(&self, key: ControlKey, class_name: &str) -> bool {
        match self.metadata(key) {
            Ok(metadata) => metadata.name == class_name,
            Err(_) => false,
        }
    }

    pub fn implements(&self, key: ControlKey, interface: Capabilities) -> bool {
        match self.metadata(key) {
            Ok(metadata) => metadata.is_instance_of(interface),
            Err(_) => false,
        }
    }

    pub fn parent(&self, key: ControlKey) -> Option<ControlKey> {
        self.get(key)?.parent.map(|(parent, _)| parent)
    }

    /// Name of the parent aggregation holding `key`
    pub fn parent_aggregation(&self, key: ControlKey) -> Option<&'static str> {
        self.get(key)?.parent.map(|(_, name)| name)
    }

    /// Is `ancestor` equal to `key` or one of its ancestors?
    pub fn is_ancestor(&self, ancestor: ControlKey, key: ControlKey) -> bool {
        let mut current = Some(key);
        while let Some(key) = current {
            if key == ancestor {
                return true;
            }
            current = self.parent(key);
        }
        false
    }

    pub fn storage<T: Any>(&self, key: ControlKey) -> Option<&T> {
        self.get(key)?.storage.as_ref()?.downcast_ref()
    }

    pub fn storage_mut<T: Any>(&mut self, key: ControlKey) -> Option<&mut T> {
        self.get_mut(key)?.storage.as_mut()?.downcast_mut()
    }

    pub fn set_storage<T: Any>(&mut self, key: ControlKey, storage: T) -> Result<(), Error> {
        self.control_mut(key)?.storage = Some(Box::new(storage));
        Ok(())
    }
}

/// Properties
impl ControlTree {
    /// Reads a property, falling back to its declared default
    pub fn property(&self, key: ControlKey, name: &str) -> Result<PropertyValue, Error> {
        let info = self.metadata(key)?.expect_property(name)?;
        match self.control(key)?.properties.get(info.name) {
            Some(value) => Ok(value.clone()),
            None => info.default_value(),
        }
    }

    /// Reads a boolean property; `Null` reads as `false`
    pub fn property_bool(&self, key: ControlKey, name: &str) -> Result<bool, Error> {
        match self.property(key, name)? {
            PropertyValue::Bool(b) => Ok(b),
            PropertyValue::Null => Ok(false),
            value => Err(error!(Metadata, "{}.{} is not a boolean: {:?}", self.id(key)?, name, value)),
        }
    }

    /// Reads a textual property; `Null` reads as an empty string
    pub fn property_text(&self, key: ControlKey, name: &str) -> Result<CheapString, Error> {
        match self.property(key, name)? {
            PropertyValue::String(s) => Ok(s),
            PropertyValue::Null => Ok(CheapString::default()),
            value => Ok(value.to_string().into()),
        }
    }

    /// `true` until the property is explicitly set
    pub fn is_property_initial(&self, key: ControlKey, name: &str) -> Result<bool, Error> {
        let info = self.metadata(key)?.expect_property(name)?;
        Ok(!self.control(key)?.properties.contains_key(info.name))
    }

    /// Sets a property and invalidates the control if the value changed
    pub fn set_property(&mut self, key: ControlKey, name: &str, value: impl Into<PropertyValue>) -> Result<(), Error> {
        self.store_property(key, name, value.into(), false)
    }

    /// Sets a property without invalidating the control
    pub fn set_property_silent(&mut self, key: ControlKey, name: &str, value: impl Into<PropertyValue>) -> Result<(), Error> {
        self.store_property(key, name, value.into(), true)
    }

    fn store_property(&mut self, key: ControlKey, name: &str, value: PropertyValue, silent: bool) -> Result<(), Error> {
        let metadata = self.metadata(key)?;
        let info = metadata.expect_property(name)?;
        value.check(info.ty)?;

        let old = self.property(key, name)?;
        self.control_mut(key)?.properties.insert(info.name, value.clone());

        if old == value {
            return Ok(());
        }

        if !silent {
            self.invalidate(key);
        }

        self.notify(Change {
            object: key,
            name: info.name,
            kind: ChangeKind::Property { old, current: value },
        })?;

        if metadata.is_instance_of(Capabilities::LAYOUT_DATA) {
            if let Some(parent) = self.parent(key) {
                self.layout_data_changed(parent, key)?;
            }
        }

        Ok(())
    }
}

/// Aggregations
impl ControlTree {
    pub fn aggregation(&self, key: ControlKey, name: &str) -> Result<&[ControlKey], Error> {
        let info = self.metadata(key)?.expect_aggregation(name)?;
        match self.control(key)?.aggregations.get(info.name) {
            Some(list) => Ok(list.as_slice()),
            None => Ok(&[][..]),
        }
    }

    /// The control in a single aggregation
    pub fn aggregated(&self, key: ControlKey, name: &str) -> Result<Option<ControlKey>, Error> {
        Ok(self.aggregation(key, name)?.first().copied())
    }

    pub fn index_of_aggregation(&self, key: ControlKey, name: &str, child: ControlKey) -> Result<Option<usize>, Error> {
        Ok(self.aggregation(key, name)?.iter().position(|c| *c == child))
    }

    /// Inserts `child` at `index` (clamped) in an aggregation of `parent`
    ///
    /// `child` is first removed from its current parent. In a single
    /// aggregation, the previous child is removed (not destroyed).
    pub fn insert_aggregation(&mut self, parent: ControlKey, name: &str, child: ControlKey, index: usize) -> Result<(), Error> {
        let info = self.metadata(parent)?.expect_aggregation(name)?;
        self.control(child)?;

        if self.is_ancestor(child, parent) {
            return Err(error!(Metadata, "Cannot aggregate {} into its own descendant {}", self.id(child)?, self.id(parent)?));
        }

        if let Some((old_parent, old_name)) = self.control(child)?.parent {
            self.remove_aggregation(old_parent, old_name, child)?;
        }

        if !info.multiple {
            if let Some(previous) = self.aggregated(parent, info.name)? {
                self.remove_aggregation(parent, info.name, previous)?;
            }
        }

        let list = self.control_mut(parent)?.aggregations.entry(info.name).or_default();
        let index = index.min(list.len());
        list.insert(index, child);
        self.control_mut(child)?.parent = Some((parent, info.name));
        self.invalidate(parent);

        self.notify(Change {
            object: parent,
            name: info.name,
            kind: ChangeKind::Aggregation { mutation: Mutation::Insert, child },
        })
    }

    /// Appends `child` to an aggregation of `parent`
    pub fn add_aggregation(&mut self, parent: ControlKey, name: &str, child: ControlKey) -> Result<(), Error> {
        self.insert_aggregation(parent, name, child, usize::MAX)
    }

    /// Replaces the content of a single aggregation; `None` empties it
    pub fn set_aggregation(&mut self, parent: ControlKey, name: &str, child: Option<ControlKey>) -> Result<(), Error> {
        match child {
            Some(child) => self.insert_aggregation(parent, name, child, 0),
            None => self.remove_all_aggregation(parent, name).map(|_| ()),
        }
    }

    /// Removes `child` from an aggregation of `parent`; `Ok(None)` if it wasn't there
    pub fn remove_aggregation(&mut self, parent: ControlKey, name: &str, child: ControlKey) -> Result<Option<ControlKey>, Error> {
        let info = self.metadata(parent)?.expect_aggregation(name)?;
        let list = match self.control_mut(parent)?.aggregations.get_mut(info.name) {
            Some(list) => list,
            None => return Ok(None),
        };

        let index = match list.iter().position(|c| *c == child) {
            Some(index) => index,
            None => return Ok(None),
        };

        list.remove(index);
        if let Some(child) = self.get_mut(child) {
            child.parent = None;
        }
        self.invalidate(parent);

        self.notify(Change {
            object: parent,
            name: info.name,
            kind: ChangeKind::Aggregation { mutation: Mutation::Remove, child },
        })?;

        Ok(Some(child))
    }

    /// Removes every child of an aggregation, reporting each removal
    pub fn remove_all_aggregation(&mut self, parent: ControlKey, name: &str) -> Result<Vec<ControlKey>, Error> {
        let children = self.aggregation(parent, name)?.to_vec();
        for child in &children {
            self.remove_aggregation(parent, name, *child)?;
        }
        Ok(children)
    }

    /// Removes then destroys every child of an aggregation
    pub fn destroy_aggregation(&mut self, parent: ControlKey, name: &str) -> Result<(), Error> {
        for child in self.remove_all_aggregation(parent, name)? {
            self.destroy(child)?;
        }
        Ok(())
    }
}

/// Associations
impl ControlTree {
    /// Id of the associated control, if any
    pub fn association(&self, key: ControlKey, name: &str) -> Result<Option<CheapString>, Error> {
        let info = self.metadata(key)?.expect_association(name)?;
        Ok(self.control(key)?.associations.get(info.name).cloned())
    }

    pub fn set_association(&mut self, key: ControlKey, name: &str, target: Option<ControlKey>) -> Result<(), Error> {
        let target = match target {
            Some(target) => Some(self.id(target)?),
            None => None,
        };
        self.set_association_id(key, name, target)
    }

    pub fn set_association_id(&mut self, key: ControlKey, name: &str, target: Option<CheapString>) -> Result<(), Error> {
        let info = self.metadata(key)?.expect_association(name)?;
        let associations = &mut self.control_mut(key)?.associations;
        let changed = match target {
            Some(id) => associations.insert(info.name, id.clone()) != Some(id),
            None => associations.remove(info.name).is_some(),
        };

        if changed {
            self.invalidate(key);
        }

        Ok(())
    }
}

/// Observation & Delegates
impl ControlTree {
    /// Reports changes of the listed properties / aggregations of `target` to `observer`
    ///
    /// Registrations of the same pair are merged.
    pub fn observe(
        &mut self,
        observer: ControlKey,
        target: ControlKey,
        properties: &[&'static str],
        aggregations: &[&'static str],
    ) -> Result<(), Error> {
        self.control(observer)?;
        self.control(target)?;

        let position = self.observations.iter().position(|o| o.observer == observer && o.target == target);
        let observation = match position {
            Some(i) => &mut self.observations[i],
            None => {
                self.observations.push(Observation {
                    observer,
                    target,
                    properties: Vec::new(),
                    aggregations: Vec::new(),
                });
                let last = self.observations.len() - 1;
                &mut self.observations[last]
            },
        };

        for name in properties {
            if !observation.properties.contains(name) {
                observation.properties.push(*name);
            }
        }

        for name in aggregations {
            if !observation.aggregations.contains(name) {
                observation.aggregations.push(*name);
            }
        }

        Ok(())
    }

    /// Stops every observation of `target` by `observer`
    pub fn unobserve(&mut self, observer: ControlKey, target: ControlKey) {
        self.observations.retain(|o| !(o.observer == observer && o.target == target));
    }

    /// Stops every observation made by `observer`
    pub fn disconnect(&mut self, observer: ControlKey) {
        self.observations.retain(|o| o.observer != observer);
    }

    pub fn is_observed(&self, observer: ControlKey, target: ControlKey, name: &str) -> bool {
        self.observations.iter().any(|o| {
            o.observer == observer && o.target == target
                && o.properties.iter().chain(o.aggregations.iter()).any(|n| *n == name)
        })
    }

    fn notify(&mut self, change: Change) -> Result<(), Error> {
        let observers: Vec<ControlKey> = self.observations.iter()
            .filter(|o| o.target == change.object && o.watches(&change))
            .map(|o| o.observer)
            .collect();

        for observer in observers {
            // an earlier delivery may have destroyed it
            let handler = match self.handlers(observer) {
                Ok(handlers) => handlers.observer,
                Err(_) => continue,
            };

            if self.debug.trace_observers {
                log::trace!("delivering {:?} to {:?}", change, observer);
            }

            handler(self, observer, &change)?;
        }

        Ok(())
    }

    /// Attaches a render delegate; a control holds at most one delegate per owner
    pub fn add_delegate(&mut self, key: ControlKey, delegate: Delegate) -> Result<(), Error> {
        let owner = delegate.owner;
        let delegates = &mut self.control_mut(key)?.delegates;
        if delegates.iter().any(|d| d.owner == owner) {
            return Ok(());
        }

        delegates.push(delegate);
        if let Some(owner) = self.get_mut(owner) {
            owner.delegated_to.push(key);
        }

        Ok(())
    }

    pub fn remove_delegate(&mut self, key: ControlKey, owner: ControlKey) -> Result<(), Error> {
        self.control_mut(key)?.delegates.retain(|d| d.owner != owner);
        if let Some(owner) = self.get_mut(owner) {
            owner.delegated_to.retain(|target| *target != key);
        }
        Ok(())
    }

    pub fn has_delegate(&self, key: ControlKey, owner: ControlKey) -> bool {
        match self.get(key) {
            Some(control) => control.delegates.iter().any(|d| d.owner == owner),
            None => false,
        }
    }

    /// Runs the render delegates of `key`, as the render pipeline does after rendering it
    pub fn after_rendering(&mut self, key: ControlKey) -> Result<(), Error> {
        let delegates = self.control(key)?.delegates.clone();
        for delegate in delegates {
            (delegate.on_after_rendering)(self, delegate.owner, key)?;
        }
        Ok(())
    }
}

/// Lifecycle & Dispatch
impl ControlTree {
    /// Marks a control for re-rendering
    pub fn invalidate(&mut self, key: ControlKey) {
        let trace = self.debug.trace_invalidations;
        if let Some(control) = self.get_mut(key) {
            control.invalidations += 1;
            if trace {
                log::trace!("invalidated {} ({} times)", control.id, control.invalidations);
            }
        }
    }

    pub fn invalidations(&self, key: ControlKey) -> usize {
        self.get(key).map(|c| c.invalidations).unwrap_or(0)
    }

    /// Destroys a control and all its descendants
    ///
    /// Finalizers run first (parents before children), then the control is
    /// removed from its parent (which observers see as a removal), then
    /// ids, observations and delegates of the destroyed controls are dropped.
    pub fn destroy(&mut self, key: ControlKey) -> Result<(), Error> {
        self.finalize(key)?;

        if let Some((parent, name)) = self.control(key)?.parent {
            if self.contains(parent) {
                self.remove_aggregation(parent, name, key)?;
            }
        }

        self.release(key);
        Ok(())
    }

    fn finalize(&mut self, key: ControlKey) -> Result<(), Error> {
        let finalizer = self.handlers(key)?.finalizer;
        finalizer(self, key)?;

        let children: Vec<ControlKey> = self.control(key)?.children().collect();
        for child in children {
            self.finalize(child)?;
        }

        Ok(())
    }

    fn release(&mut self, key: ControlKey) {
        let control = match self.get_mut(key) {
            Some(control) => mem::take(control),
            None => return,
        };

        self.arena.delete(key);
        self.registry.remove(&*control.id);
        self.observations.retain(|o| o.observer != key && o.target != key);
        for target in &control.delegated_to {
            if let Some(target) = self.get_mut(*target) {
                target.delegates.retain(|d| d.owner != key);
            }
        }

        log::trace!("destroyed {}", control.id);

        for child in control.children() {
            self.release(child);
        }
    }

    /// Dispatches to the `content_rendered` handler of `key`'s class
    pub fn content_rendered(&mut self, key: ControlKey, element: ControlKey, source: ControlKey) -> Result<(), Error> {
        let handler = self.handlers(key)?.content_rendered;
        handler(self, key, element, source)
    }

    /// Dispatches to the `layout_data_changed` handler of `key`'s class
    pub fn layout_data_changed(&mut self, key: ControlKey, source: ControlKey) -> Result<(), Error> {
        let handler = self.handlers(key)?.layout_data_changed;
        handler(self, key, source)
    }

    /// Dispatches to the `accessibility_info` handler of `key`'s class
    pub fn accessibility_info(&self, key: ControlKey) -> Option<AccessibilityInfo> {
        let handler = self.handlers(key).ok()?.accessibility_info;
        handler(self, key)
    }

    /// Own `enabled` flag combined with every enabled-propagating ancestor
    pub fn effective_enabled(&self, key: ControlKey) -> bool {
        let enabled = |key| match self.metadata(key) {
            Ok(metadata) if metadata.has_property("enabled") => self.property_bool(key, "enabled").unwrap_or(true),
            _ => true,
        };

        if !enabled(key) {
            return false;
        }

        let mut current = self.parent(key);
        while let Some(ancestor) = current {
            if self.implements(ancestor, Capabilities::ENABLED_PROPAGATOR) && !enabled(ancestor) {
                return false;
            }
            current = self.parent(ancestor);
        }

        true
    }
}
