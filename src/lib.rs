// src/lib.rs

//! Crown-land tenure application search client.
//!
//! Composes user filter selections into backend query descriptor sets,
//! executes them against the public registry API, and merges the results
//! into a single deduplicated record set.

pub mod config;
pub mod error;
pub mod models;
pub mod query;
pub mod services;
pub mod utils;
