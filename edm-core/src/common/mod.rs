//! Helpers shared by the kind plugins.

pub mod escape;
