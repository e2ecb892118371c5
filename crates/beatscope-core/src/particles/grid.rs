//! Uniform grid for proximity queries between particles.

use std::collections::HashMap;

use crate::canvas::Point;

/// A pair of particle indices closer than the grid's threshold
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub a: usize,
    pub b: usize,
    pub distance: f32,
}

/// Smallest cell side; tinier thresholds still use cells of this size
const MIN_CELL_SIZE: f32 = 1.0;

/// Buckets points into square cells at least as wide as the threshold.
///
/// Any pair within the threshold of each other lies in the same or an
/// adjacent cell, so only the 3x3 block around each point needs checking.
pub struct SpatialGrid {
    threshold: f32,
    cell_size: f32,
    cells: HashMap<(i32, i32), Vec<usize>>,
}

impl SpatialGrid {
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold,
            cell_size: threshold.max(MIN_CELL_SIZE),
            cells: HashMap::new(),
        }
    }

    fn cell_of(&self, p: Point) -> (i32, i32) {
        (
            (p.x / self.cell_size).floor() as i32,
            (p.y / self.cell_size).floor() as i32,
        )
    }

    pub fn rebuild(&mut self, points: &[Point]) {
        self.cells.clear();
        for (i, &p) in points.iter().enumerate() {
            let cell = self.cell_of(p);
            self.cells.entry(cell).or_default().push(i);
        }
    }

    /// Every unordered pair of `points` strictly closer than the threshold.
    ///
    /// `points` must be the slice the grid was last rebuilt with.
    pub fn neighbors(&self, points: &[Point]) -> Vec<Neighbor> {
        let threshold_sq = self.threshold * self.threshold;
        let mut pairs = Vec::new();

        for (a, &pa) in points.iter().enumerate() {
            let (cx, cy) = self.cell_of(pa);
            for dx in -1..=1 {
                for dy in -1..=1 {
                    let Some(bucket) = self
                        .cells
                        .get(&(cx.saturating_add(dx), cy.saturating_add(dy))) else {
                        continue;
                    };
                    for &b in bucket {
                        // Each pair once
                        if b <= a {
                            continue;
                        }
                        let pb = points[b];
                        let ddx = pa.x - pb.x;
                        let ddy = pa.y - pb.y;
                        let dist_sq = ddx * ddx + ddy * ddy;
                        if dist_sq < threshold_sq {
                            pairs.push(Neighbor {
                                a,
                                b,
                                distance: dist_sq.sqrt(),
                            });
                        }
                    }
                }
            }
        }

        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn brute_force(points: &[Point], threshold: f32) -> Vec<(usize, usize)> {
        let mut pairs = Vec::new();
        for a in 0..points.len() {
            for b in a + 1..points.len() {
                let dx = points[a].x - points[b].x;
                let dy = points[a].y - points[b].y;
                if (dx * dx + dy * dy).sqrt() < threshold {
                    pairs.push((a, b));
                }
            }
        }
        pairs
    }

    #[test]
    fn test_matches_brute_force() {
        let mut rng = StdRng::seed_from_u64(42);
        let points: Vec<Point> = (0..300)
            .map(|_| Point::new(rng.random_range(-50.0..900.0), rng.random_range(-50.0..700.0)))
            .collect();

        let mut grid = SpatialGrid::new(80.0);
        grid.rebuild(&points);
        let mut found: Vec<(usize, usize)> =
            grid.neighbors(&points).iter().map(|n| (n.a, n.b)).collect();
        found.sort();

        assert_eq!(found, brute_force(&points, 80.0));
    }

    #[test]
    fn test_distance_is_euclidean() {
        let points = [Point::new(0.0, 0.0), Point::new(30.0, 40.0), Point::new(500.0, 0.0)];
        let mut grid = SpatialGrid::new(100.0);
        grid.rebuild(&points);
        let pairs = grid.neighbors(&points);
        assert_eq!(pairs.len(), 1);
        assert_eq!((pairs[0].a, pairs[0].b), (0, 1));
        assert!((pairs[0].distance - 50.0).abs() < 1e-4);
    }

    #[test]
    fn test_rebuild_forgets_old_points() {
        let mut grid = SpatialGrid::new(10.0);
        grid.rebuild(&[Point::new(1.0, 1.0), Point::new(2.0, 2.0)]);
        let moved = [Point::new(1.0, 1.0), Point::new(200.0, 200.0)];
        grid.rebuild(&moved);
        assert!(grid.neighbors(&moved).is_empty());
    }

    #[test]
    fn test_rebuild_keeps_only_occupied_cells() {
        let mut grid = SpatialGrid::new(1.0);
        let mut points: Vec<Point> = (0..100).map(|i| Point::new(i as f32 * 3.0, 0.0)).collect();
        for _ in 0..1000 {
            points.iter_mut().for_each(|p| p.y += 1.5);
            grid.rebuild(&points);
        }
        assert!(grid.cells.len() <= points.len());
    }

    #[test]
    fn test_tiny_threshold_far_from_origin() {
        let points = [
            Point::new(800.0, 0.0),
            Point::new(800.0, 0.0),
            Point::new(1e30, -1e30),
        ];
        let mut grid = SpatialGrid::new(1e-7);
        grid.rebuild(&points);
        let pairs = grid.neighbors(&points);
        assert_eq!(pairs.len(), 1);
        assert_eq!((pairs[0].a, pairs[0].b), (0, 1));

        grid.rebuild(&[Point::new(800.0, 0.0), Point::new(800.5, 0.0)]);
        assert!(grid
            .neighbors(&[Point::new(800.0, 0.0), Point::new(800.5, 0.0)])
            .is_empty());
    }
}
