// QSOMap - core/mod.rs
//
// Core business logic layer.
// Must NOT depend on: platform, app, or perform any I/O directly.

pub mod export;
pub mod i18n;
pub mod locator;
pub mod model;
pub mod parser;
