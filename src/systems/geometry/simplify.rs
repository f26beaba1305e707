use crate::core::Vec2;

/// Douglas-Peucker over an open polyline. Both endpoints are always kept; an interior point
/// survives only when its distance to the current chord is strictly greater than `epsilon`.
pub fn simplify_polyline(points: &[Vec2], epsilon: f32) -> Vec<Vec2> {
    let n = points.len();
    if n < 3 {
        return points.to_vec();
    }

    let mut keep = vec![false; n];
    keep[0] = true;
    keep[n - 1] = true;

    // Explicit stack: contour chains can run to thousands of points.
    let mut ranges = vec![(0usize, n - 1)];
    while let Some((first, last)) = ranges.pop() {
        if last <= first + 1 {
            continue;
        }
        let a = points[first];
        let b = points[last];
        let mut best = 0.0f32;
        let mut best_index = first;
        for (i, p) in points.iter().enumerate().take(last).skip(first + 1) {
            let d = distance_to_line(*p, a, b);
            if d > best {
                best = d;
                best_index = i;
            }
        }
        if best > epsilon {
            keep[best_index] = true;
            ranges.push((best_index, last));
            ranges.push((first, best_index));
        }
    }

    points
        .iter()
        .zip(keep)
        .filter_map(|(p, k)| k.then_some(*p))
        .collect()
}

/// Simplify a closed ring (first point not repeated).
///
/// The ring is cut at its first point and the vertex farthest from it; each half is simplified
/// as a polyline and the halves are joined without repeating the cut points.
pub fn simplify_polygon(ring: &[Vec2], epsilon: f32) -> Vec<Vec2> {
    if ring.len() < 4 {
        return ring.to_vec();
    }

    let anchor = ring[0];
    let mut far = 0;
    let mut far_dist = 0.0f32;
    for (i, p) in ring.iter().enumerate().skip(1) {
        let d = (*p - anchor).length_squared();
        if d > far_dist {
            far_dist = d;
            far = i;
        }
    }
    if far == 0 {
        return ring.to_vec();
    }

    let first_half = simplify_polyline(&ring[..=far], epsilon);
    let mut second_chain = ring[far..].to_vec();
    second_chain.push(anchor);
    let second_half = simplify_polyline(&second_chain, epsilon);

    let mut out = Vec::with_capacity(first_half.len() + second_half.len());
    out.extend_from_slice(&first_half[..first_half.len() - 1]);
    out.extend_from_slice(&second_half[..second_half.len() - 1]);
    out
}

/// Perpendicular distance from `p` to the infinite line through `a` and `b`
/// (point distance when the line is degenerate).
fn distance_to_line(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len = ab.length();
    if len == 0.0 {
        return (p - a).length();
    }
    ab.cross(p - a).abs() / len
}
