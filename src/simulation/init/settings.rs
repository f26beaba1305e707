use serde::{Deserialize, Serialize};

use crate::core::{ConfigError, Vec2};
use crate::systems::geometry::ColliderParams;
use crate::systems::physics::PhysicsBackend;
use crate::systems::UpdateParams;

use super::perf_stats::PerfStats;
use super::WorldCore;

/// Every tunable of a world. Missing JSON fields take their defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SimSettings {
    /// Mixed with (chunk, tick) to seed every chunk's generator
    pub seed: u64,
    /// Dirty rect shrink per tick and growth margin per write, in cells
    pub dirty_border: i32,
    pub ambient_temperature: f32,
    pub thermal_rate: f32,
    pub thermal_epsilon: f32,
    pub fire_cooling: f32,

    pub gravity: Vec2,
    pub time_step: f32,
    pub velocity_iterations: u32,
    pub position_iterations: u32,
    pub pixels_per_meter: f32,
    /// Bodies slower than this (physics units/s) enter the grid without dirtying it
    pub idle_linear_speed: f32,
    pub idle_angular_speed: f32,

    pub simplify_epsilon: f32,
    pub simplify_min_vertices: usize,
    pub fixture_density: f32,
    pub fixture_friction: f32,
    /// Cells around a stale chunk searched for dynamic bodies
    pub collider_query_margin: f32,
    pub max_promote_cells: usize,
}

impl Default for SimSettings {
    fn default() -> Self {
        Self {
            seed: 0x5EED,
            dirty_border: 2,
            ambient_temperature: 20.0,
            thermal_rate: 0.5,
            thermal_epsilon: 0.05,
            fire_cooling: 0.02,
            gravity: Vec2::new(0.0, 9.8),
            time_step: 1.0 / 60.0,
            velocity_iterations: 8,
            position_iterations: 3,
            pixels_per_meter: 10.0,
            idle_linear_speed: 0.05,
            idle_angular_speed: 0.05,
            simplify_epsilon: 1.0,
            simplify_min_vertices: 12,
            fixture_density: 1.0,
            fixture_friction: 0.5,
            collider_query_margin: 16.0,
            max_promote_cells: 4096,
        }
    }
}

fn check(name: &'static str, expected: &'static str, value: f64, ok: bool) -> Result<(), ConfigError> {
    if ok && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::Invalid { name, expected, value })
    }
}

impl SimSettings {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: SimSettings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        const POSITIVE: &str = "positive";
        const NON_NEGATIVE: &str = "non-negative";
        check("timeStep", POSITIVE, self.time_step as f64, self.time_step > 0.0)?;
        check("pixelsPerMeter", POSITIVE, self.pixels_per_meter as f64, self.pixels_per_meter > 0.0)?;
        check("dirtyBorder", "at least 1", self.dirty_border as f64, self.dirty_border >= 1)?;
        check("maxPromoteCells", "at least 1", self.max_promote_cells as f64, self.max_promote_cells >= 1)?;
        for (name, value) in [
            ("thermalRate", self.thermal_rate),
            ("thermalEpsilon", self.thermal_epsilon),
            ("fireCooling", self.fire_cooling),
            ("idleLinearSpeed", self.idle_linear_speed),
            ("idleAngularSpeed", self.idle_angular_speed),
            ("simplifyEpsilon", self.simplify_epsilon),
            ("fixtureDensity", self.fixture_density),
            ("fixtureFriction", self.fixture_friction),
            ("colliderQueryMargin", self.collider_query_margin),
        ] {
            check(name, NON_NEGATIVE, value as f64, value >= 0.0)?;
        }
        check("ambientTemperature", "finite", self.ambient_temperature as f64, true)?;
        check("gravity.x", "finite", self.gravity.x as f64, true)?;
        check("gravity.y", "finite", self.gravity.y as f64, true)
    }

    pub fn update_params(&self) -> UpdateParams {
        UpdateParams {
            thermal_rate: self.thermal_rate,
            thermal_epsilon: self.thermal_epsilon,
            fire_cooling: self.fire_cooling,
            ambient_temp: self.ambient_temperature,
        }
    }

    pub fn chunk_collider(&self) -> ColliderParams {
        ColliderParams {
            simplify_epsilon: self.simplify_epsilon,
            simplify_min_vertices: self.simplify_min_vertices,
            friction: self.fixture_friction,
            ..ColliderParams::chunk(1.0 / self.pixels_per_meter)
        }
    }

    pub fn body_collider(&self) -> ColliderParams {
        ColliderParams {
            simplify_epsilon: self.simplify_epsilon,
            simplify_min_vertices: self.simplify_min_vertices,
            density: self.fixture_density,
            friction: self.fixture_friction,
            ..ColliderParams::body(1.0 / self.pixels_per_meter)
        }
    }
}

pub(super) fn enable_perf_metrics<P: PhysicsBackend>(world: &mut WorldCore<P>, enabled: bool) {
    world.perf_enabled = enabled;
    if !enabled {
        world.perf_stats.reset();
    }
}

pub(super) fn get_perf_stats<P: PhysicsBackend>(world: &WorldCore<P>) -> PerfStats {
    world.perf_stats.clone()
}

pub(super) fn set_gravity<P: PhysicsBackend>(world: &mut WorldCore<P>, x: f32, y: f32) {
    world.settings.gravity = Vec2::new(x, y);
    world.physics.set_gravity(world.settings.gravity);
    for body in world.bodies.values() {
        world.physics.set_awake(body.handle(), true);
    }
}

pub(super) fn set_ambient_temperature<P: PhysicsBackend>(world: &mut WorldCore<P>, temp: f32) {
    world.settings.ambient_temperature = temp;
    world.params.ambient_temp = temp;
    world.grid.set_ambient_temp(temp);
}
