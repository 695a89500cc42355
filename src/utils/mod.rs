//! Small shared helpers

pub mod cheap_string;
