use std::collections::BTreeSet;

use crate::core::IVec2;

/// Trace the outer boundary of a 4-connected cell set.
///
/// Vertices live on the cell-corner lattice (corner `(x, y)` is the top-left of cell `(x, y)`).
/// The walk starts at the bottom-right corner of the last cell in row-major order and returns a
/// closed ring (first point not repeated) with positive shoelace area. Diagonal-only contacts
/// are kept apart by the saddle rules, so a component that pinches at a corner revisits that
/// corner instead of merging across it.
pub fn trace(occupied: &BTreeSet<IVec2>) -> Vec<IVec2> {
    let Some(last) = occupied.iter().copied().max_by_key(|p| p.row_major_key()) else {
        return Vec::new();
    };

    let start = last.offset(1, 1);
    let limit = 4 * occupied.len() + 4;
    let mut points = Vec::with_capacity(limit);
    let mut cursor = start;
    let mut prev = IVec2::ZERO;

    for _ in 0..limit {
        points.push(cursor);

        let mut case = 0u8;
        if occupied.contains(&cursor.offset(-1, -1)) {
            case |= 1;
        }
        if occupied.contains(&cursor.offset(0, -1)) {
            case |= 2;
        }
        if occupied.contains(&cursor.offset(-1, 0)) {
            case |= 4;
        }
        if occupied.contains(&cursor) {
            case |= 8;
        }

        let dir = match case {
            1 | 5 | 13 => IVec2::UP,
            2 | 3 | 7 => IVec2::RIGHT,
            4 | 12 | 14 => IVec2::LEFT,
            8 | 10 | 11 => IVec2::DOWN,
            6 => {
                if prev == IVec2::DOWN {
                    IVec2::RIGHT
                } else {
                    IVec2::LEFT
                }
            }
            9 => {
                if prev == IVec2::RIGHT {
                    IVec2::UP
                } else {
                    IVec2::DOWN
                }
            }
            _ => {
                log::warn!("contour trace hit interior case {} at {:?}", case, cursor);
                return Vec::new();
            }
        };

        cursor = cursor + dir;
        prev = dir;

        if cursor == start {
            points.reverse();
            points.rotate_right(1);
            return points;
        }
    }

    log::warn!("contour trace did not close after {} steps", limit);
    Vec::new()
}
