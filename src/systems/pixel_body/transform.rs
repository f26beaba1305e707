//! Integer rotation of body offsets
//!
//! The angle is snapped to the nearest quarter turn, which is exact on the lattice, and the
//! residual (at most 45°) is applied as three rounded shears. Each shear is a bijection on
//! integer points, so distinct offsets always land on distinct world cells.

use std::f32::consts::FRAC_PI_2;

use crate::core::{IVec2, Vec2};
use crate::systems::physics::PhysicsBackend;

use super::PixelBody;

/// An angle split into quarter turns plus the shear factors of the residual.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RotationShear {
    /// Number of 90° turns, 0..4
    pub quarter: u8,
    /// Horizontal shear, `-tan(residual / 2)`
    pub a: f32,
    /// Vertical shear, `sin(residual)`
    pub b: f32,
}

impl RotationShear {
    pub fn new(angle: f32) -> Self {
        let turns = (angle / FRAC_PI_2).round();
        let residual = angle - turns * FRAC_PI_2;
        Self {
            quarter: (turns as i64).rem_euclid(4) as u8,
            a: -(residual * 0.5).tan(),
            b: residual.sin(),
        }
    }
}

/// Rotate a local offset onto the lattice.
#[inline]
pub fn map_offset(offset: IVec2, rot: &RotationShear) -> IVec2 {
    let mut p = offset;
    for _ in 0..rot.quarter {
        p = IVec2::new(-p.y, p.x);
    }
    let (mut x, mut y) = (p.x, p.y);
    x += (rot.a * y as f32).round() as i32;
    y += (rot.b * x as f32).round() as i32;
    x += (rot.a * y as f32).round() as i32;
    IVec2::new(x, y)
}

impl PixelBody {
    /// Recompute every cell's world slot from the physics transform. The body origin sits at
    /// the center of the offset (0, 0) cell.
    pub fn update_positions<P: PhysicsBackend>(&mut self, physics: &P, pixels_per_meter: f32) {
        let Some((position, angle)) = physics.transform(self.handle) else {
            return;
        };
        let c = position * pixels_per_meter - Vec2::new(0.5, 0.5);
        let center = IVec2::new(c.x.round() as i32, c.y.round() as i32);
        let rot = RotationShear::new(angle);
        for (offset, bc) in self.cells.iter_mut() {
            bc.world_pos = center + map_offset(*offset, &rot);
        }
    }
}
