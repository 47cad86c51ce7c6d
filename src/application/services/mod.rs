//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (FileSystem) but are themselves
//! concrete structs, not traits.

mod document;
mod stage;

pub use document::{DocumentService, Taxonomy};
pub use stage::{
    CardPanel, OrbitPanel, Panel, Stage, SunburstLine, SunburstPanel, DATA_CORRUPT_MESSAGE,
};
