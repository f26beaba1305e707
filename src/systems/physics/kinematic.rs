use std::collections::BTreeMap;

use crate::core::{Aabb, Vec2};

use super::{BodyHandle, BodyKind, Fixture, FixtureHit, PhysicsBackend};

/// Speed clamp (units per second) to keep per-axis resolution from tunneling
const MAX_SPEED: f32 = 60.0;
const MAX_ANGULAR_SPEED: f32 = 12.0;
const SLEEP_LINEAR: f32 = 0.05;
const SLEEP_ANGULAR: f32 = 0.05;
const TIME_TO_SLEEP: f32 = 0.5;
/// Penetration tolerated before two boxes count as touching
const CONTACT_SLOP: f32 = 1e-4;

struct SimBody {
    kind: BodyKind,
    position: Vec2,
    angle: f32,
    linear_velocity: Vec2,
    angular_velocity: f32,
    fixtures: Vec<Fixture>,
    awake: bool,
    sleep_time: f32,
}

impl SimBody {
    fn world_point(&self, local: Vec2) -> Vec2 {
        self.position + local.rotated(self.angle)
    }

    fn fixture_bounds(&self, fixture: &Fixture, at: Vec2) -> Option<Aabb> {
        let pts = fixture.vertices.map(|v| at + v.rotated(self.angle));
        Aabb::from_points(&pts)
    }

    fn bounds_at(&self, at: Vec2) -> Option<Aabb> {
        let mut out: Option<Aabb> = None;
        for f in &self.fixtures {
            if let Some(b) = self.fixture_bounds(f, at) {
                out = Some(match out {
                    Some(o) => o.union(&b),
                    None => b,
                });
            }
        }
        out
    }
}

/// Small deterministic rigid-body integrator.
///
/// Dynamic bodies integrate gravity with semi-implicit Euler and resolve against static
/// fixtures per axis (bounds only) with restitution. Bodies fall asleep after a short run
/// of low-speed steps. There is no body-body contact.
pub struct KinematicPhysics {
    bodies: BTreeMap<BodyHandle, SimBody>,
    next_handle: u32,
    gravity: Vec2,
    restitution: f32,
}

impl KinematicPhysics {
    pub fn new(gravity: Vec2) -> Self {
        Self {
            bodies: BTreeMap::new(),
            next_handle: 1,
            gravity,
            restitution: 0.3,
        }
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    fn collides_at(&self, handle: BodyHandle, at: Vec2) -> bool {
        let Some(body) = self.bodies.get(&handle) else {
            return false;
        };
        let Some(bounds) = body.bounds_at(at) else {
            return false;
        };
        for (other_handle, other) in &self.bodies {
            if *other_handle == handle || other.kind != BodyKind::Static {
                continue;
            }
            let Some(other_bounds) = other.bounds_at(other.position) else {
                continue;
            };
            if !bounds.overlaps(&other_bounds, CONTACT_SLOP) {
                continue;
            }
            for f in &other.fixtures {
                if let Some(fb) = other.fixture_bounds(f, other.position) {
                    if bounds.overlaps(&fb, CONTACT_SLOP) {
                        return true;
                    }
                }
            }
        }
        false
    }

    fn integrate(&mut self, handle: BodyHandle, dt: f32) {
        let gravity = self.gravity;
        let restitution = self.restitution;
        let Some(body) = self.bodies.get_mut(&handle) else {
            return;
        };
        if !body.awake || body.kind == BodyKind::Static {
            return;
        }

        if body.kind == BodyKind::Dynamic {
            body.linear_velocity = body.linear_velocity + gravity * dt;
        }
        body.linear_velocity.x = body.linear_velocity.x.clamp(-MAX_SPEED, MAX_SPEED);
        body.linear_velocity.y = body.linear_velocity.y.clamp(-MAX_SPEED, MAX_SPEED);
        body.angular_velocity = body.angular_velocity.clamp(-MAX_ANGULAR_SPEED, MAX_ANGULAR_SPEED);
        body.angle += body.angular_velocity * dt;

        let kind = body.kind;
        let pos = body.position;
        let vel = body.linear_velocity;
        let desired = pos + vel * dt;

        if kind == BodyKind::Kinematic {
            if let Some(body) = self.bodies.get_mut(&handle) {
                body.position = desired;
            }
            return;
        }

        // Resolve per axis (cheap and deterministic)
        let mut next = pos;
        let mut vel = vel;

        let try_x = Vec2::new(desired.x, next.y);
        if self.collides_at(handle, try_x) {
            vel.x = -vel.x * restitution;
        } else {
            next.x = try_x.x;
        }

        let try_y = Vec2::new(next.x, desired.y);
        if self.collides_at(handle, try_y) {
            vel.y = -vel.y * restitution;
        } else {
            next.y = try_y.y;
        }

        if let Some(body) = self.bodies.get_mut(&handle) {
            body.position = next;
            body.linear_velocity = vel;

            if vel.length() < SLEEP_LINEAR && body.angular_velocity.abs() < SLEEP_ANGULAR {
                body.sleep_time += dt;
                if body.sleep_time >= TIME_TO_SLEEP {
                    body.awake = false;
                    body.linear_velocity = Vec2::ZERO;
                    body.angular_velocity = 0.0;
                }
            } else {
                body.sleep_time = 0.0;
            }
        }
    }
}

impl Default for KinematicPhysics {
    fn default() -> Self {
        Self::new(Vec2::new(0.0, 9.8))
    }
}

impl PhysicsBackend for KinematicPhysics {
    fn create_body(&mut self, kind: BodyKind, position: Vec2, angle: f32) -> BodyHandle {
        let handle = BodyHandle(self.next_handle);
        self.next_handle = self.next_handle.wrapping_add(1).max(1);
        self.bodies.insert(
            handle,
            SimBody {
                kind,
                position,
                angle,
                linear_velocity: Vec2::ZERO,
                angular_velocity: 0.0,
                fixtures: Vec::new(),
                awake: kind != BodyKind::Static,
                sleep_time: 0.0,
            },
        );
        handle
    }

    fn destroy_body(&mut self, body: BodyHandle) {
        self.bodies.remove(&body);
    }

    fn body_kind(&self, body: BodyHandle) -> Option<BodyKind> {
        self.bodies.get(&body).map(|b| b.kind)
    }

    fn add_fixture(&mut self, body: BodyHandle, fixture: Fixture) {
        if let Some(b) = self.bodies.get_mut(&body) {
            b.fixtures.push(fixture);
        }
    }

    fn clear_fixtures(&mut self, body: BodyHandle) {
        if let Some(b) = self.bodies.get_mut(&body) {
            b.fixtures.clear();
        }
    }

    fn fixtures(&self, body: BodyHandle) -> &[Fixture] {
        self.bodies.get(&body).map(|b| b.fixtures.as_slice()).unwrap_or(&[])
    }

    fn step(&mut self, dt: f32, _velocity_iterations: u32, _position_iterations: u32) {
        let handles: Vec<BodyHandle> = self.bodies.keys().copied().collect();
        for handle in handles {
            self.integrate(handle, dt);
        }
    }

    fn set_gravity(&mut self, gravity: Vec2) {
        self.gravity = gravity;
    }

    fn transform(&self, body: BodyHandle) -> Option<(Vec2, f32)> {
        self.bodies.get(&body).map(|b| (b.position, b.angle))
    }

    fn set_transform(&mut self, body: BodyHandle, position: Vec2, angle: f32) {
        if let Some(b) = self.bodies.get_mut(&body) {
            b.position = position;
            b.angle = angle;
        }
    }

    fn linear_velocity(&self, body: BodyHandle) -> Vec2 {
        self.bodies.get(&body).map(|b| b.linear_velocity).unwrap_or_default()
    }

    fn angular_velocity(&self, body: BodyHandle) -> f32 {
        self.bodies.get(&body).map(|b| b.angular_velocity).unwrap_or(0.0)
    }

    fn set_linear_velocity(&mut self, body: BodyHandle, velocity: Vec2) {
        if let Some(b) = self.bodies.get_mut(&body) {
            if b.kind == BodyKind::Static {
                return;
            }
            b.linear_velocity = velocity;
            if velocity.length_squared() > 0.0 {
                b.awake = true;
                b.sleep_time = 0.0;
            }
        }
    }

    fn set_angular_velocity(&mut self, body: BodyHandle, velocity: f32) {
        if let Some(b) = self.bodies.get_mut(&body) {
            if b.kind == BodyKind::Static {
                return;
            }
            b.angular_velocity = velocity;
            if velocity != 0.0 {
                b.awake = true;
                b.sleep_time = 0.0;
            }
        }
    }

    fn is_awake(&self, body: BodyHandle) -> bool {
        self.bodies.get(&body).map(|b| b.awake).unwrap_or(false)
    }

    fn set_awake(&mut self, body: BodyHandle, awake: bool) {
        if let Some(b) = self.bodies.get_mut(&body) {
            if b.kind == BodyKind::Static {
                return;
            }
            b.awake = awake;
            b.sleep_time = 0.0;
            if !awake {
                b.linear_velocity = Vec2::ZERO;
                b.angular_velocity = 0.0;
            }
        }
    }

    fn query_aabb(&self, region: Aabb) -> Vec<FixtureHit> {
        let mut hits = Vec::new();
        for (handle, body) in &self.bodies {
            for f in &body.fixtures {
                let pts = f.vertices.map(|v| body.world_point(v));
                if let Some(b) = Aabb::from_points(&pts) {
                    if b.overlaps(&region, 0.0) {
                        hits.push(FixtureHit { body: *handle, kind: body.kind });
                    }
                }
            }
        }
        hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box() -> [Fixture; 2] {
        let (a, b, c, d) = (
            Vec2::new(-0.5, -0.5),
            Vec2::new(0.5, -0.5),
            Vec2::new(0.5, 0.5),
            Vec2::new(-0.5, 0.5),
        );
        [
            Fixture { vertices: [a, b, c], density: 1.0, friction: 0.5 },
            Fixture { vertices: [a, c, d], density: 1.0, friction: 0.5 },
        ]
    }

    #[test]
    fn dynamic_body_falls_and_lands_on_static_floor() {
        let mut physics = KinematicPhysics::new(Vec2::new(0.0, 10.0));
        let floor = physics.create_body(BodyKind::Static, Vec2::new(0.0, 5.0), 0.0);
        physics.add_fixture(
            floor,
            Fixture {
                vertices: [Vec2::new(-10.0, 0.0), Vec2::new(10.0, 0.0), Vec2::new(10.0, 1.0)],
                density: 1.0,
                friction: 0.5,
            },
        );
        let body = physics.create_body(BodyKind::Dynamic, Vec2::new(0.0, 0.0), 0.0);
        for f in unit_box() {
            physics.add_fixture(body, f);
        }

        for _ in 0..600 {
            physics.step(1.0 / 60.0, 8, 3);
        }

        let (pos, _) = physics.transform(body).unwrap();
        assert!(pos.y > 3.0 && pos.y < 4.51, "body rests above the floor, y = {}", pos.y);
        assert!(!physics.is_awake(body));
    }

    #[test]
    fn query_reports_each_overlapping_fixture() {
        let mut physics = KinematicPhysics::new(Vec2::ZERO);
        let body = physics.create_body(BodyKind::Dynamic, Vec2::new(3.0, 3.0), 0.0);
        for f in unit_box() {
            physics.add_fixture(body, f);
        }
        let hits = physics.query_aabb(Aabb::new(Vec2::new(2.0, 2.0), Vec2::new(4.0, 4.0)));
        assert_eq!(hits.len(), 2);
        assert!(hits.iter().all(|h| h.body == body && h.kind == BodyKind::Dynamic));
        assert!(physics
            .query_aabb(Aabb::new(Vec2::new(10.0, 10.0), Vec2::new(11.0, 11.0)))
            .is_empty());
    }

    #[test]
    fn setting_velocity_wakes_a_sleeping_body() {
        let mut physics = KinematicPhysics::new(Vec2::ZERO);
        let body = physics.create_body(BodyKind::Dynamic, Vec2::ZERO, 0.0);
        physics.set_awake(body, false);
        assert!(!physics.is_awake(body));
        physics.set_linear_velocity(body, Vec2::new(1.0, 0.0));
        assert!(physics.is_awake(body));
    }
}
