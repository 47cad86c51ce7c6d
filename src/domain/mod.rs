//! Domain layer: taxonomy model and drill-down geometry
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod card;
pub mod drilldown;
pub mod entities;
pub mod error;
pub mod geometry;
pub mod label;
pub mod taxonomy;
pub mod viewport;

pub use arena::{Hierarchy, HierarchyNode, NodeData};
pub use card::{CardRecord, CardState};
pub use drilldown::{DrillDown, NodeTransition, Transition};
pub use entities::*;
pub use error::{DomainError, DomainResult};
pub use geometry::{Arc, FocusWindow, VisibilityRules};
pub use label::{wrap, wrap_label, LabelBlock};
pub use taxonomy::{normalize, NodeShape, TreeNode};
pub use viewport::{LabelPlacement, Viewport, ViewportLimits};
