// QSOMap - platform/mod.rs
//
// Platform abstraction layer: filesystem access and configuration.
// Dependencies: core types, directories crate.

pub mod config;
pub mod fs;
