// src/services/mod.rs

//! Service layer: the gateway to the registry API and the search, detail
//! and comment workflows built on top of it.

mod comments;
mod detail;
mod gateway;
mod search;

pub use comments::CommentService;
pub use detail::ApplicationDetail;
pub use gateway::{ApplicationGateway, HttpGateway};
pub use search::{ApplicationSearch, SearchController, SearchPhase};
