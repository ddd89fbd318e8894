//! Shared test utilities for otrace integration harnesses.
//!
//! Import everything you need via `mod common; use common::*;` at the top of
//! each harness file. Snapshot-level helpers never touch the filesystem;
//! [`FixtureRoot`] writes a real artifact root into a temp dir.
#![allow(dead_code, unused_imports)]

pub mod assertions;
pub mod builders;
pub mod fixtures;

pub use assertions::*;
pub use builders::*;
pub use fixtures::*;
