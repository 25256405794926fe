//! Polygon-Bars: price bars from Polygon.io prepared for model training
//!
//! The crate is a four stage pipeline:
//!
//! - **Fetching**: one aggregates request against the Polygon.io REST API
//! - **Flattening**: bars mapped to records and assembled into a [`Table`](data::Table)
//! - **Normalization**: z-score or min-max rescaling of selected columns
//! - **Windowing**: fixed-size row slices reduced to a feature matrix and a target
//!
//! # Example
//!
//! ```no_run
//! use polygon_bars::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let client = PolygonClient::new("my-api-key");
//!     let bars = client.get_aggs(&AggregatesQuery::default())?;
//!
//!     let mut table = bars_to_table(&bars, true)?;
//!     add_change_column(&mut table, "close")?;
//!     normalize_(&ZScore, &mut table, DEFAULT_COLUMNS)?;
//!
//!     let window = create_window(&table, 0, 28, DEFAULT_COLUMNS)?;
//!     println!("{:?} -> {}", window.data.dim(), window.target);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod exchange;
pub mod normalize;
pub mod window;

pub use error::Error;

// Re-export commonly used types
pub mod prelude {
    pub use crate::config::*;
    pub use crate::data::*;
    pub use crate::exchange::*;
    pub use crate::normalize::*;
    pub use crate::window::*;

    pub use crate::{Error, Result};
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
