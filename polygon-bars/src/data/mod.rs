//! Data management module
//!
//! Bars, their flat record form and the column table they are assembled into.

pub mod bar;
pub mod record;
pub mod table;

pub use bar::*;
pub use record::*;
pub use table::*;
