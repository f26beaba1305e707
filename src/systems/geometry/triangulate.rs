use crate::core::Vec2;

use super::signed_area2;

const COLLINEAR_EPS: f32 = 1e-6;

/// Ear-clipping triangulation of a simple polygon (ring, first point not repeated).
///
/// Consecutive duplicates are collapsed and the winding is normalized first. Collinear
/// vertices are dropped without emitting a triangle. If the polygon stops yielding ears
/// (self-touching input) the triangles found so far are returned.
pub fn triangulate(polygon: &[Vec2]) -> Vec<[Vec2; 3]> {
    let mut pts: Vec<Vec2> = Vec::with_capacity(polygon.len());
    for &p in polygon {
        if pts.last() != Some(&p) {
            pts.push(p);
        }
    }
    while pts.len() > 1 && pts.first() == pts.last() {
        pts.pop();
    }
    if pts.len() < 3 {
        return Vec::new();
    }
    if signed_area2(&pts) < 0.0 {
        pts.reverse();
    }

    let mut ring: Vec<usize> = (0..pts.len()).collect();
    let mut triangles = Vec::with_capacity(pts.len().saturating_sub(2));

    while ring.len() > 3 {
        let m = ring.len();
        let mut clipped = false;

        for i in 0..m {
            let a = pts[ring[(i + m - 1) % m]];
            let b = pts[ring[i]];
            let c = pts[ring[(i + 1) % m]];
            let turn = (b - a).cross(c - a);

            if turn.abs() <= COLLINEAR_EPS {
                ring.remove(i);
                clipped = true;
                break;
            }
            if turn < 0.0 {
                continue;
            }

            let blocked = ring.iter().map(|&j| pts[j]).any(|p| {
                p != a && p != b && p != c && in_triangle(p, a, b, c)
            });
            if blocked {
                continue;
            }

            triangles.push([a, b, c]);
            ring.remove(i);
            clipped = true;
            break;
        }

        if !clipped {
            log::warn!(
                "ear clipping stalled with {} vertices left ({} triangles emitted)",
                ring.len(),
                triangles.len()
            );
            return triangles;
        }
    }

    let (a, b, c) = (pts[ring[0]], pts[ring[1]], pts[ring[2]]);
    if (b - a).cross(c - a).abs() > COLLINEAR_EPS {
        triangles.push([a, b, c]);
    }
    triangles
}

/// Inclusive point-in-triangle for a positively wound triangle.
fn in_triangle(p: Vec2, a: Vec2, b: Vec2, c: Vec2) -> bool {
    (b - a).cross(p - a) >= 0.0 && (c - b).cross(p - b) >= 0.0 && (a - c).cross(p - c) >= 0.0
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::core::IVec2;
    use crate::systems::geometry::marching_squares::trace;
    use crate::systems::geometry::simplify::simplify_polygon;
    use crate::systems::geometry::test_support::{cells, to_vec2};

    fn total_area(triangles: &[[Vec2; 3]]) -> f32 {
        triangles.iter().map(|[a, b, c]| ((*b - *a).cross(*c - *a) / 2.0).abs()).sum()
    }

    fn polygon_for(rows: &[&str]) -> Vec<Vec2> {
        simplify_polygon(&to_vec2(&trace(&cells(rows))), 0.0)
    }

    #[test]
    fn unit_square_is_two_triangles() {
        let tris = triangulate(&polygon_for(&["#"]));
        assert_eq!(tris.len(), 2);
        assert_eq!(total_area(&tris), 1.0);
    }

    #[test]
    fn concave_shapes_cover_their_area() {
        let shapes: [(&[&str], f32); 4] = [
            (&["#.", "##"], 3.0),
            (&[".#.", "###", ".#."], 5.0),
            (&["#.#", "#.#", "###"], 7.0),
            (&["####", "#..#", "#..#"], 8.0),
        ];
        for (rows, area) in shapes {
            let tris = triangulate(&polygon_for(rows));
            assert!((total_area(&tris) - area).abs() < 1e-4, "{:?}", rows);
            assert!(tris.iter().all(|[a, b, c]| (*b - *a).cross(*c - *a) > 0.0));
        }
    }

    #[test]
    fn l_shape_yields_four_triangles() {
        assert_eq!(triangulate(&polygon_for(&["#.", "##"])).len(), 4);
    }

    #[test]
    fn clockwise_input_is_reoriented() {
        let mut square = polygon_for(&["##", "##"]);
        square.reverse();
        let tris = triangulate(&square);
        assert_eq!(total_area(&tris), 4.0);
    }

    #[test]
    fn degenerate_input_yields_nothing() {
        let p = Vec2::new(1.0, 1.0);
        assert!(triangulate(&[]).is_empty());
        assert!(triangulate(&[p, p, p]).is_empty());
        let line = [Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), Vec2::new(2.0, 0.0)];
        assert!(triangulate(&line).is_empty());
    }

    #[test]
    fn pinched_ring_still_triangulates() {
        let shape: BTreeSet<IVec2> = [(1, 1), (1, 0), (2, 0), (3, 0), (3, 1), (3, 2), (2, 2)]
            .into_iter()
            .map(|(x, y)| IVec2::new(x, y))
            .collect();
        let poly = simplify_polygon(&to_vec2(&trace(&shape)), 0.0);
        let tris = triangulate(&poly);
        assert!((total_area(&tris) - 7.0).abs() < 1e-4);
    }
}
