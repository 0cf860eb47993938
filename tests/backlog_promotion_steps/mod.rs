//! Step definitions for backlog promotion scenarios.

pub mod world;

mod given;
mod then;
mod when;
