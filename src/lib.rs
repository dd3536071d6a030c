// QSOMap - lib.rs
//
// Library entry point, exposing all modules for integration testing and
// for use by a graphical front end.

pub mod app;
pub mod core;
pub mod platform;
pub mod util;
