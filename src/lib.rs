//! Declarative form controls, tree modifiers and flexibility change handlers.
//!
//! The crate is organised like this:
//!
//! - [`core`]: the live control tree, control metadata, the XML view
//!   document and design-time descriptors.
//! - [`builtin`]: the built-in control classes (`Label`, `Input`, `Title`,
//!   `VerticalLayout` and the [`builtin::form`] family).
//! - [`modifier`]: the [`modifier::TreeModifier`] abstraction and its
//!   live-tree and XML implementations.
//! - [`flex`]: change records and the change handlers written against
//!   [`modifier::TreeModifier`].
//!
//! ```
//! use formflex::core::tree::ControlTree;
//! use formflex::builtin::{label, input, form::element::{self, LabelArg}};
//!
//! let mut tree = ControlTree::new();
//! let element = element::create(&mut tree, Some("FE0")).unwrap();
//! let field = input::create(&mut tree, Some("Input0")).unwrap();
//! element::add_field(&mut tree, element, field).unwrap();
//! element::set_label(&mut tree, element, LabelArg::Text("Name".into())).unwrap();
//!
//! let label = element::label_control(&tree, element).unwrap();
//! assert_eq!(label::label_for(&tree, label).as_deref(), Some("Input0"));
//! ```

pub mod core;
pub mod builtin;
pub mod modifier;
pub mod flex;
pub mod utils;

pub use utils::cheap_string::CheapString;

use ::core::fmt;

/// Broad classification of an [`Error`]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A change was completed without a value
    MissingValue,
    /// A change does not say which element it is about
    MissingSelector,
    /// A change was applied to something the modifier cannot resolve
    InvalidTarget,
    /// A control key or id does not refer to a live control
    UnknownControl,
    /// Unknown property, aggregation or association, or a badly typed value
    Metadata,
    /// Malformed XML view
    Xml,
    /// Malformed JSON (change records, design-time descriptors)
    Json,
    Other,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Error {
    pub line: u32,
    pub file: &'static str,
    pub kind: ErrorKind,
    pub msg: Option<String>,
}

impl Error {
    pub fn new(line: u32, file: &'static str, kind: ErrorKind, msg: Option<String>) -> Self {
        Self { line, file, kind, msg }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.msg {
            Some(msg) => write!(f, "{}, line {}: {}", self.file, self.line, msg),
            None => write!(f, "{}, line {}: {:?}", self.file, self.line, self.kind),
        }
    }
}

impl std::error::Error for Error {}

/// Creates an [`Error`] automatically, with an optional [`ErrorKind`]
/// and an optional formatted string
///
/// # Examples
///
/// ```ignore
/// Err(error!())?;
/// Err(error!(InvalidTarget))?;
/// Err(error!(Metadata, "no property {} on {}", name, class))?;
/// Err(error!("We crashed... so sad..."))?;
/// ```
///
/// Corresponding messages:
///
/// ```text
/// src/my_file.rs, line 51: Other
/// src/my_file.rs, line 51: InvalidTarget
/// src/my_file.rs, line 51: no property text on sap.m.Input
/// src/my_file.rs, line 51: We crashed... so sad...
/// ```
#[macro_export]
macro_rules! error {
    () => {
        $crate::Error::new(::core::line!(), ::core::file!(), $crate::ErrorKind::Other, None)
    };
    ($kind:ident) => {
        $crate::Error::new(::core::line!(), ::core::file!(), $crate::ErrorKind::$kind, None)
    };
    ($kind:ident, $($arg:tt)*) => {
        $crate::Error::new(::core::line!(), ::core::file!(), $crate::ErrorKind::$kind, Some(::std::format!($($arg)*)))
    };
    ($($arg:tt)*) => {
        $crate::Error::new(::core::line!(), ::core::file!(), $crate::ErrorKind::Other, Some(::std::format!($($arg)*)))
    };
}
