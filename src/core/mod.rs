//! Control tree, Metadata, XML Views, Design-time descriptors

pub mod control;
pub mod designtime;
pub mod event;
pub mod metadata;
pub mod tree;
pub mod value;
pub mod xml;
