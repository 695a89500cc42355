//! Built-in control classes
//!
//! | Class                                  | Module                        |
//! |----------------------------------------|-------------------------------|
//! | `sap.m.Label`                          | [`label`]                     |
//! | `sap.m.Input`                          | [`input`]                     |
//! | `sap.ui.core.Title`                    | [`title`]                     |
//! | `sap.ui.layout.VerticalLayout`         | [`vertical_layout`]           |
//! | `sap.ui.layout.form.Form`              | [`form::form`]                |
//! | `sap.ui.layout.form.FormContainer`     | [`form::container`]           |
//! | `sap.ui.layout.form.FormElement`       | [`form::element`]             |
//! | `sap.ui.layout.form.GridContainerData` | [`form::grid_container_data`] |
//! | `sap.ui.layout.form.SimpleForm`        | [`form::simple_form`]         |
//!
//! Each module exposes its `METADATA`, its `CLASS` and a `create` function.

use crate::core::control::ControlClass;

pub mod form;
pub mod input;
pub mod label;
pub mod title;
pub mod vertical_layout;

/// Classes registered by [`ControlTree::new`](crate::core::tree::ControlTree::new)
pub const CLASSES: &[ControlClass] = &[
    label::CLASS,
    input::CLASS,
    title::CLASS,
    vertical_layout::CLASS,
    form::form::CLASS,
    form::container::CLASS,
    form::element::CLASS,
    form::grid_container_data::CLASS,
    form::simple_form::CLASS,
];
