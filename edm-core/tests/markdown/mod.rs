//! Markdown format tests
//!
//! Import (Markdown → tree), export (tree → Markdown), round trips and
//! kinds registered from outside the crate.

mod export;
mod extension;
mod import;
mod roundtrip;
