//! Declarative control metadata
//!
//! Every control class describes itself with a [`ControlMetadata`] constant:
//! its typed properties (with textual defaults, parsed on demand), its
//! aggregations (ordered, owned children), its associations (non-owning
//! references by id) and the interfaces it implements.

use super::value::{PropertyType, PropertyValue};
use crate::{Error, error};
use bitflags::bitflags;

bitflags! {
    /// Interfaces a control class declares
    pub struct Capabilities: u32 {
        /// May be placed in the `fields` of a form element
        const FORM_CONTENT       = 0b00001;
        /// Labels another control (`labelFor`)
        const LABEL              = 0b00010;
        /// Provides a heading text for a container
        const TITLE              = 0b00100;
        /// Layout data; changes are reported to the owning control
        const LAYOUT_DATA        = 0b01000;
        /// `enabled: false` disables every descendant
        const ENABLED_PROPAGATOR = 0b10000;
    }
}

impl Capabilities {
    /// `const` union, usable in metadata declarations
    pub const fn with(self, other: Self) -> Self {
        Self::from_bits_truncate(self.bits() | other.bits())
    }
}

/// A typed property
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PropertyInfo {
    pub name: &'static str,
    pub ty: PropertyType,
    /// Default value, as it would be written in an XML view
    pub default: Option<&'static str>,
    pub group: &'static str,
}

/// An ordered list of owned child controls
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AggregationInfo {
    pub name: &'static str,
    pub multiple: bool,
    pub singular_name: &'static str,
    /// Hidden aggregations are managed by the owning class only
    pub hidden: bool,
    /// The aggregation also accepts plain text, handled by the owning class
    pub alt_text: bool,
}

/// A non-owning reference to other controls, by id
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AssociationInfo {
    pub name: &'static str,
    pub multiple: bool,
}

/// Description of a control class
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ControlMetadata {
    /// Fully qualified class name, e.g. `sap.ui.layout.form.FormElement`
    pub name: &'static str,
    pub library: &'static str,
    pub properties: &'static [PropertyInfo],
    pub default_aggregation: Option<&'static str>,
    pub aggregations: &'static [AggregationInfo],
    pub associations: &'static [AssociationInfo],
    pub interfaces: Capabilities,
    /// Whether design-time metadata exists for this class
    pub design_time: bool,
}

pub const fn property(name: &'static str, ty: PropertyType, default: Option<&'static str>) -> PropertyInfo {
    PropertyInfo { name, ty, default, group: "Misc" }
}

pub const fn aggregation(name: &'static str, singular_name: &'static str) -> AggregationInfo {
    AggregationInfo { name, multiple: true, singular_name, hidden: false, alt_text: false }
}

pub const fn single_aggregation(name: &'static str) -> AggregationInfo {
    AggregationInfo { name, multiple: false, singular_name: name, hidden: false, alt_text: false }
}

impl AggregationInfo {
    pub const fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub const fn or_text(mut self) -> Self {
        self.alt_text = true;
        self
    }
}

impl PropertyInfo {
    pub const fn in_group(mut self, group: &'static str) -> Self {
        self.group = group;
        self
    }

    /// Parses the declared default, or [`PropertyValue::Null`] without one
    pub fn default_value(&self) -> Result<PropertyValue, Error> {
        match self.default {
            Some(text) => PropertyValue::parse(text, self.ty),
            None => Ok(PropertyValue::Null),
        }
    }
}

impl ControlMetadata {
    /// The unqualified class name, `FormElement` for `sap.ui.layout.form.FormElement`
    pub fn short_name(&self) -> &'static str {
        self.name.rsplit('.').next().unwrap_or(self.name)
    }

    pub fn property(&self, name: &str) -> Option<&'static PropertyInfo> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub fn aggregation(&self, name: &str) -> Option<&'static AggregationInfo> {
        self.aggregations.iter().find(|a| a.name == name)
    }

    pub fn association(&self, name: &str) -> Option<&'static AssociationInfo> {
        self.associations.iter().find(|a| a.name == name)
    }

    pub fn has_property(&self, name: &str) -> bool {
        self.property(name).is_some()
    }

    pub fn is_instance_of(&self, interface: Capabilities) -> bool {
        self.interfaces.contains(interface)
    }

    pub fn expect_property(&self, name: &str) -> Result<&'static PropertyInfo, Error> {
        self.property(name).ok_or_else(|| error!(Metadata, "{} has no property {:?}", self.name, name))
    }

    pub fn expect_aggregation(&self, name: &str) -> Result<&'static AggregationInfo, Error> {
        self.aggregation(name).ok_or_else(|| error!(Metadata, "{} has no aggregation {:?}", self.name, name))
    }

    pub fn expect_association(&self, name: &str) -> Result<&'static AssociationInfo, Error> {
        self.association(name).ok_or_else(|| error!(Metadata, "{} has no association {:?}", self.name, name))
    }
}
