//! Solid region -> collider pipeline: segmentation, contour tracing, simplification,
//! triangulation and fixture emission.

pub mod collider;
pub mod flood_fill;
pub mod marching_squares;
pub mod simplify;
pub mod triangulate;

pub use collider::{build_fixtures, fixtures_for_cells, ColliderBuild, ColliderParams};
pub use flood_fill::{flood_from, segment};
pub use marching_squares::trace;
pub use simplify::{simplify_polygon, simplify_polyline};
pub use triangulate::triangulate;

use crate::core::Vec2;

/// Twice the signed area (shoelace). Positive for the winding `trace` produces.
pub fn signed_area2(points: &[Vec2]) -> f32 {
    let n = points.len();
    let mut sum = 0.0;
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        sum += a.x * b.y - b.x * a.y;
    }
    sum
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::collections::BTreeSet;

    use crate::core::{IVec2, Vec2};

    /// Even-odd point-in-polygon test
    pub fn contains(poly: &[Vec2], p: Vec2) -> bool {
        let mut inside = false;
        let n = poly.len();
        for i in 0..n {
            let a = poly[i];
            let b = poly[(i + 1) % n];
            if (a.y > p.y) != (b.y > p.y) {
                let x = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
                if p.x < x {
                    inside = !inside;
                }
            }
        }
        inside
    }

    /// Cells whose centers fall inside the polygon
    pub fn rasterize(poly: &[Vec2]) -> BTreeSet<IVec2> {
        let mut out = BTreeSet::new();
        for y in -4..24 {
            for x in -4..24 {
                if contains(poly, Vec2::new(x as f32 + 0.5, y as f32 + 0.5)) {
                    out.insert(IVec2::new(x, y));
                }
            }
        }
        out
    }

    pub fn cells(rows: &[&str]) -> BTreeSet<IVec2> {
        let mut out = BTreeSet::new();
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                if ch == '#' {
                    out.insert(IVec2::new(x as i32, y as i32));
                }
            }
        }
        out
    }

    pub fn to_vec2(points: &[IVec2]) -> Vec<Vec2> {
        points.iter().map(|p| p.to_vec2()).collect()
    }
}
