// src/models/mod.rs

//! Domain models for the search client.
//!
//! This module contains the API record types, the closed code tables, and
//! the user-facing filter selection.

mod application;
mod codes;
mod comment;
mod detail;
mod filters;

// Re-export all public types
pub use application::Application;
pub use codes::{CommentPeriodState, PurposeGroup, ReasonCode, RegionCode, StatusGroup};
pub use comment::{current_period, Comment, CommentAuthor, CommentPeriod, NewComment};
pub use detail::{Decision, Document, Feature};
pub use filters::FilterSelection;
