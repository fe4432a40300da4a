//! Hierarchical 2D transforms for named nodes.
//!
//! A [`NodeRegistry`] keeps nodes with a local translation, rotation and scale, linked into a parent
//! hierarchy. Every change is composed down the hierarchy and pushed to the [`Target`] bound to each node.
//! [`FamilyRegistry`] is a simpler grouping with explicit, non-composing parent and children bookkeeping.

pub mod command;
pub mod config;
pub mod family;
pub mod formats;
pub mod math;
pub mod node;
pub mod registry;
pub mod target;

pub use command::{Command, Component, Query, Reply};
pub use config::{CompositionMode, RegistryConfig};
pub use family::{FamilyKey, FamilyRegistry};
pub use math::transform::{Transform, TransformOffset};
pub use node::{LocalUpdate, Node};
pub use registry::{HierarchyError, NodeRegistry};
pub use target::{Sprite, Target};
