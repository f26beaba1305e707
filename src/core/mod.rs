//! Core building blocks shared by every layer: vector math, the tick RNG and error types.

pub mod error;
pub mod math;
pub mod rng;

pub use error::{ConfigError, ContentError, SnapshotError};
pub use math::{Aabb, IVec2, Vec2};
pub use rng::TickRng;
