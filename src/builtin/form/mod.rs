//! Form controls
//!
//! A [`form::Form`](form) holds [`container`]s, which hold [`element`]s. A
//! form element pairs a label with one or more fields; the label is either
//! an external control or created internally from a plain text.
//!
//! ```text
//! Form
//! ├── title, toolbar, layout
//! └── formContainers
//!     └── FormContainer
//!         ├── title, toolbar, layoutData
//!         └── formElements
//!             └── FormElement
//!                 ├── label (or internal _label)
//!                 ├── fields
//!                 └── layoutData
//! ```
//!
//! [`simple_form`] builds this structure from a flat list of controls.

pub mod container;
pub mod element;
#[allow(clippy::module_inception)]
pub mod form;
pub mod grid_container_data;
pub mod simple_form;

use crate::core::control::ControlKey;
use crate::core::designtime::DesignTimeMetadata;
use crate::core::tree::ControlTree;
use crate::{Error, CheapString};

/// Design-time descriptor of [`form::Form`](form)
pub fn design_time() -> Result<DesignTimeMetadata, Error> {
    DesignTimeMetadata::parse(include_str!("form.designtime.json"))
}

/// Argument of the `title` setters
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TitleArg {
    Text(CheapString),
    Control(ControlKey),
    None,
}

/// Current title of a form or container
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TitleRef {
    Text(CheapString),
    Control(ControlKey),
}

/// Text given in place of a title control
#[derive(Default)]
pub(crate) struct TitleText(Option<CheapString>);

pub(crate) fn init_title(tree: &mut ControlTree, key: ControlKey) -> Result<(), Error> {
    tree.set_storage(key, TitleText::default())
}

pub(crate) fn set_title(tree: &mut ControlTree, key: ControlKey, title: TitleArg) -> Result<(), Error> {
    let (control, text) = match title {
        TitleArg::Text(text) => (None, Some(text)),
        TitleArg::Control(control) => (Some(control), None),
        TitleArg::None => (None, None),
    };

    tree.set_aggregation(key, "title", control)?;

    let changed = match tree.storage_mut::<TitleText>(key) {
        Some(storage) if storage.0 != text => {
            storage.0 = text;
            true
        },
        _ => false,
    };

    if changed {
        tree.invalidate(key);
    }

    Ok(())
}

pub(crate) fn title(tree: &ControlTree, key: ControlKey) -> Result<Option<TitleRef>, Error> {
    if let Some(control) = tree.aggregated(key, "title")? {
        return Ok(Some(TitleRef::Control(control)));
    }

    Ok(tree.storage::<TitleText>(key).and_then(|t| t.0.clone()).map(TitleRef::Text))
}
