//! Step definitions for task status transition scenarios.

pub mod world;

mod given;
mod then;
mod when;
