// QSOMap - app/mod.rs
//
// Application layer: orchestration of decode, generate, and write.
// Dependencies: core layer, platform filesystem helpers.

pub mod convert;
