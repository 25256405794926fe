//! Exchange integration module
//!
//! Fetches aggregate bars from the Polygon.io REST API.

pub mod client;
pub mod query;
pub mod response;

pub use client::*;
pub use query::*;
pub use response::*;
