//! Physics collaborator contract.
//!
//! The simulation only needs bodies, fixtures, transforms, velocities, sleep state and a
//! broad-phase box query from the rigid-body engine. `KinematicPhysics` is the in-crate
//! reference implementation; hosts can plug a full solver behind the same trait.

mod kinematic;

pub use kinematic::KinematicPhysics;

use serde::{Deserialize, Serialize};

use crate::core::{Aabb, Vec2};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyHandle(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BodyKind {
    Static,
    Kinematic,
    Dynamic,
}

/// Convex triangle fixture in body-local physics units
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fixture {
    pub vertices: [Vec2; 3],
    pub density: f32,
    pub friction: f32,
}

/// One fixture overlapping a queried box
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixtureHit {
    pub body: BodyHandle,
    pub kind: BodyKind,
}

pub trait PhysicsBackend {
    fn create_body(&mut self, kind: BodyKind, position: Vec2, angle: f32) -> BodyHandle;
    fn destroy_body(&mut self, body: BodyHandle);
    fn body_kind(&self, body: BodyHandle) -> Option<BodyKind>;

    fn add_fixture(&mut self, body: BodyHandle, fixture: Fixture);
    fn clear_fixtures(&mut self, body: BodyHandle);
    /// Fixtures in insertion order; empty for unknown bodies.
    fn fixtures(&self, body: BodyHandle) -> &[Fixture];

    fn step(&mut self, dt: f32, velocity_iterations: u32, position_iterations: u32);
    fn set_gravity(&mut self, gravity: Vec2);

    fn transform(&self, body: BodyHandle) -> Option<(Vec2, f32)>;
    fn set_transform(&mut self, body: BodyHandle, position: Vec2, angle: f32);
    fn linear_velocity(&self, body: BodyHandle) -> Vec2;
    fn angular_velocity(&self, body: BodyHandle) -> f32;
    fn set_linear_velocity(&mut self, body: BodyHandle, velocity: Vec2);
    fn set_angular_velocity(&mut self, body: BodyHandle, velocity: f32);
    fn is_awake(&self, body: BodyHandle) -> bool;
    fn set_awake(&mut self, body: BodyHandle, awake: bool);

    /// Every fixture whose world bounds overlap `region`.
    fn query_aabb(&self, region: Aabb) -> Vec<FixtureHit>;
}
