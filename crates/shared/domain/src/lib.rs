//! Configuration models for the jtool helpers. No logic lives here; loading is done by
//! `jtool-kernel` and each helper consumes its own section.

pub mod config;
