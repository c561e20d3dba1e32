//! Export module.
//!
//! - Group: order-preserving grouping of entries into files
//! - Pipeline: options, layouts and the concurrent writer fan-out

pub mod group;
pub mod pipeline;

pub use group::{by_language, group_by, Group};
pub use pipeline::*;
