//! skillsweb: skills taxonomy normalization, drill-down geometry and label wrapping
//!
//! Layers, innermost first: `domain` (pure tree and geometry logic),
//! `application` (document loading and the render stage), `infrastructure`
//! (filesystem and service wiring) and `cli`.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod tree_traits;
pub mod util;
