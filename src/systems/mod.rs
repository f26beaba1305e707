//! Systems - per-cell rules, the collider pipeline, the physics contract and pixel bodies

pub mod behaviors;
pub mod combustion;
pub mod geometry;
pub mod physics;
pub mod pixel_body;
pub mod reactions;
pub mod temperature;

pub use behaviors::{BehaviorRegistry, UpdateContext, UpdateCounters, UpdateParams};
pub use pixel_body::{BodyCell, BodyState, PixelBody};
