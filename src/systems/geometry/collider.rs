use std::collections::BTreeSet;

use crate::core::{IVec2, Vec2};
use crate::systems::physics::Fixture;

use super::flood_fill::segment;
use super::marching_squares::trace;
use super::signed_area2;
use super::simplify::simplify_polygon;
use super::triangulate::triangulate;

/// Unit conversion and fixture material for one collider build.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColliderParams {
    /// Physics length per grid unit (`1 / pixels_per_meter`).
    pub scale: f32,
    /// Added to lattice vertices before scaling.
    pub origin: Vec2,
    pub simplify_epsilon: f32,
    /// Contours with at most this many vertices are triangulated as traced.
    pub simplify_min_vertices: usize,
    pub density: f32,
    pub friction: f32,
}

impl ColliderParams {
    /// Static chunk collider: vertices are chunk-local lattice points.
    pub fn chunk(scale: f32) -> Self {
        Self {
            scale,
            origin: Vec2::ZERO,
            simplify_epsilon: 1.0,
            simplify_min_vertices: 12,
            density: 0.0,
            friction: 0.5,
        }
    }

    /// Body collider: lattice point `v` sits at `v - 0.5` relative to the body origin, since
    /// body offset `(0, 0)` names the cell centered on the origin.
    pub fn body(scale: f32) -> Self {
        Self { origin: Vec2::new(-0.5, -0.5), density: 1.0, ..Self::chunk(scale) }
    }
}

/// Output of a multi-region build.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ColliderBuild {
    pub fixtures: Vec<Fixture>,
    /// Connected regions that produced at least one fixture.
    pub regions: usize,
    /// Regions whose contour was degenerate and got no collider.
    pub rejected: usize,
}

/// Turn one traced contour into triangle fixtures.
///
/// Consecutive duplicate points are collapsed first; rings that end up with fewer than three
/// vertices or no area produce nothing.
pub fn build_fixtures(contour: &[IVec2], params: &ColliderParams) -> Vec<Fixture> {
    let mut ring: Vec<Vec2> = Vec::with_capacity(contour.len());
    for p in contour {
        let v = p.to_vec2();
        if ring.last() != Some(&v) {
            ring.push(v);
        }
    }
    while ring.len() > 1 && ring.first() == ring.last() {
        ring.pop();
    }
    if ring.len() < 3 || signed_area2(&ring) == 0.0 {
        log::warn!("degenerate contour with {} points skipped", ring.len());
        return Vec::new();
    }

    let polygon = if ring.len() > params.simplify_min_vertices {
        simplify_polygon(&ring, params.simplify_epsilon)
    } else {
        ring
    };
    if polygon.len() < 3 {
        log::warn!("contour simplified below a triangle");
        return Vec::new();
    }

    triangulate(&polygon)
        .into_iter()
        .filter_map(|tri| {
            let [a, b, c] = tri.map(|v| (v + params.origin) * params.scale);
            if a == b || b == c || a == c || (b - a).cross(c - a) == 0.0 {
                return None;
            }
            Some(Fixture { vertices: [a, b, c], density: params.density, friction: params.friction })
        })
        .collect()
}

/// Segment `cells` into 4-connected regions and build fixtures for each.
pub fn fixtures_for_cells(cells: BTreeSet<IVec2>, params: &ColliderParams) -> ColliderBuild {
    let mut build = ColliderBuild::default();
    for region in segment(cells) {
        let fixtures = build_fixtures(&trace(&region), params);
        if fixtures.is_empty() {
            build.rejected += 1;
        } else {
            build.regions += 1;
            build.fixtures.extend(fixtures);
        }
    }
    build
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::geometry::test_support::cells;

    fn area(fixtures: &[Fixture]) -> f32 {
        fixtures
            .iter()
            .map(|f| {
                let [a, b, c] = f.vertices;
                ((b - a).cross(c - a) / 2.0).abs()
            })
            .sum()
    }

    #[test]
    fn one_region_per_component() {
        let params = ColliderParams::chunk(1.0);
        let build = fixtures_for_cells(cells(&["##..#", "##..#"]), &params);
        assert_eq!(build.regions, 2);
        assert_eq!(build.rejected, 0);
        assert!((area(&build.fixtures) - 6.0).abs() < 1e-4);
    }

    #[test]
    fn vertices_are_scaled_and_offset() {
        let params = ColliderParams::body(0.1);
        let fixtures = build_fixtures(&trace(&cells(&["#"])), &params);
        assert_eq!(fixtures.len(), 2);
        for f in &fixtures {
            for v in f.vertices {
                assert!((v.x.abs() - 0.05).abs() < 1e-6);
                assert!((v.y.abs() - 0.05).abs() < 1e-6);
            }
            assert_eq!(f.density, 1.0);
        }
        assert!((area(&fixtures) - 0.01).abs() < 1e-6);
    }

    #[test]
    fn duplicate_points_are_collapsed() {
        let contour = [
            IVec2::new(1, 1),
            IVec2::new(1, 1),
            IVec2::new(0, 1),
            IVec2::new(0, 0),
            IVec2::new(0, 0),
            IVec2::new(1, 0),
            IVec2::new(1, 1),
        ];
        let fixtures = build_fixtures(&contour, &ColliderParams::chunk(1.0));
        assert!((area(&fixtures) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn degenerate_contours_are_rejected() {
        let params = ColliderParams::chunk(1.0);
        assert!(build_fixtures(&[], &params).is_empty());
        assert!(build_fixtures(&[IVec2::new(0, 0), IVec2::new(1, 0)], &params).is_empty());
        let flat = [IVec2::new(0, 0), IVec2::new(1, 0), IVec2::new(2, 0), IVec2::new(1, 0)];
        assert!(build_fixtures(&flat, &params).is_empty());
    }

    #[test]
    fn large_regions_are_simplified_but_keep_their_extent() {
        let rows: Vec<String> = (0..12).map(|_| "#".repeat(12)).collect();
        let rows: Vec<&str> = rows.iter().map(String::as_str).collect();
        let build = fixtures_for_cells(cells(&rows), &ColliderParams::chunk(1.0));
        assert_eq!(build.fixtures.len(), 2);
        assert!((area(&build.fixtures) - 144.0).abs() < 1e-3);
    }
}
