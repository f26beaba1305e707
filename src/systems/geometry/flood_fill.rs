use std::collections::{BTreeSet, VecDeque};

use crate::core::IVec2;

/// Partition `cells` into maximal 4-connected components, consuming the set.
///
/// Components come out in order of their smallest coordinate, each found with a queue-based
/// BFS restricted to the cells still remaining.
pub fn segment(mut cells: BTreeSet<IVec2>) -> Vec<BTreeSet<IVec2>> {
    let mut components = Vec::new();
    let mut queue = VecDeque::new();

    while let Some(start) = cells.pop_first() {
        let mut component = BTreeSet::new();
        component.insert(start);
        queue.push_back(start);

        while let Some(p) = queue.pop_front() {
            for dir in IVec2::CARDINAL {
                let n = p + dir;
                if cells.remove(&n) {
                    component.insert(n);
                    queue.push_back(n);
                }
            }
        }

        components.push(component);
    }

    components
}

/// BFS from `seed` over 4-neighbors accepted by `accept`, stopping after `limit` cells.
/// Returns an empty set when the seed itself is rejected.
pub fn flood_from(seed: IVec2, limit: usize, mut accept: impl FnMut(IVec2) -> bool) -> BTreeSet<IVec2> {
    let mut visited = BTreeSet::new();
    if limit == 0 || !accept(seed) {
        return visited;
    }
    let mut queue = VecDeque::new();
    visited.insert(seed);
    queue.push_back(seed);

    while let Some(p) = queue.pop_front() {
        for dir in IVec2::CARDINAL {
            if visited.len() >= limit {
                return visited;
            }
            let n = p + dir;
            if !visited.contains(&n) && accept(n) {
                visited.insert(n);
                queue.push_back(n);
            }
        }
    }

    visited
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::geometry::test_support::cells;

    #[test]
    fn separate_blobs_become_separate_components() {
        let parts = segment(cells(&[
            "##..#",
            "#...#",
            "....#",
        ]));
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].len(), 3);
        assert_eq!(parts[1].len(), 3);
        assert!(parts[0].is_disjoint(&parts[1]));
    }

    #[test]
    fn diagonal_contact_does_not_connect() {
        let parts = segment(cells(&[
            "#.",
            ".#",
        ]));
        assert_eq!(parts.len(), 2);
    }

    #[test]
    fn empty_input_has_no_components() {
        assert!(segment(BTreeSet::new()).is_empty());
    }

    #[test]
    fn long_snake_does_not_recurse() {
        let snake: BTreeSet<IVec2> = (0..50_000).map(|x| IVec2::new(x, 0)).collect();
        let parts = segment(snake);
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].len(), 50_000);
    }

    #[test]
    fn flood_respects_limit_and_predicate() {
        let region = cells(&[
            "###",
            "#.#",
            "###",
        ]);
        let all = flood_from(IVec2::new(0, 0), usize::MAX, |p| region.contains(&p));
        assert_eq!(all, region);
        let capped = flood_from(IVec2::new(0, 0), 3, |p| region.contains(&p));
        assert_eq!(capped.len(), 3);
        assert!(flood_from(IVec2::new(1, 1), 10, |p| region.contains(&p)).is_empty());
    }
}
