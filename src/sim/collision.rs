//! Broad-phase window sweep and narrow-phase overlap tests
//!
//! Antagonists are sorted by y once per frame. Each projectile then walks the
//! sorted list: entries more than the window above it are skipped, and the
//! walk stops at the first entry more than the window below it. Everything
//! after that point is further down still, so it can never qualify.

use glam::Vec2;

use super::antagonist::Antagonist;
use crate::aabb_overlap;

/// Iterator over sorted positions that fall inside a vertical window
#[derive(Debug, Clone)]
pub struct WindowSweep<'a> {
    sorted_y: &'a [f32],
    origin_y: f32,
    window: f32,
    cursor: usize,
    inspected: usize,
}

impl<'a> WindowSweep<'a> {
    /// `sorted_y` must be ascending; the early stop is wrong otherwise
    pub fn new(sorted_y: &'a [f32], origin_y: f32, window: f32) -> Self {
        debug_assert!(sorted_y.windows(2).all(|w| w[0] <= w[1]));
        Self {
            sorted_y,
            origin_y,
            window,
            cursor: 0,
            inspected: 0,
        }
    }

    /// How many entries the sweep has looked at so far (including the one
    /// that ended it)
    pub fn inspected(&self) -> usize {
        self.inspected
    }
}

impl Iterator for WindowSweep<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        while let Some(&y) = self.sorted_y.get(self.cursor) {
            let index = self.cursor;
            self.cursor += 1;
            self.inspected += 1;

            let dy = y - self.origin_y;
            if dy < -self.window {
                continue;
            }
            if dy > self.window {
                // Sorted: nothing further can be inside the window
                self.cursor = self.sorted_y.len();
                return None;
            }
            return Some(index);
        }
        None
    }
}

/// Narrow phase: point vs. antagonist box (radius as half extent)
#[inline]
pub fn projectile_hits(point: Vec2, antagonist: &Antagonist) -> bool {
    aabb_overlap(point, antagonist.pos, antagonist.radius)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_skips_above_and_stops_below() {
        let ys = [0.0, 50.0, 100.0, 150.0];
        let mut sweep = WindowSweep::new(&ys, 45.0, 30.0);
        let hits: Vec<usize> = sweep.by_ref().collect();
        assert_eq!(hits, vec![1]);
        // 0 skipped, 50 tested, 100 ends the walk; 150 is never looked at
        assert_eq!(sweep.inspected(), 3);
    }

    #[test]
    fn test_window_bounds_are_inclusive() {
        let ys = [15.0, 45.0, 75.0];
        let hits: Vec<usize> = WindowSweep::new(&ys, 45.0, 30.0).collect();
        assert_eq!(hits, vec![0, 1, 2]);
    }

    #[test]
    fn test_empty_sweep() {
        let mut sweep = WindowSweep::new(&[], 10.0, 30.0);
        assert_eq!(sweep.next(), None);
        assert_eq!(sweep.inspected(), 0);
    }

    #[test]
    fn test_all_above_window() {
        let ys = [-300.0, -200.0, -100.0];
        let mut sweep = WindowSweep::new(&ys, 200.0, 30.0);
        assert_eq!(sweep.next(), None);
        assert_eq!(sweep.inspected(), 3);
    }

    #[test]
    fn test_projectile_hits_uses_radius() {
        let mut a = Antagonist::default();
        a.pos = Vec2::new(100.0, 100.0);
        a.radius = 20.0;
        assert!(projectile_hits(Vec2::new(119.0, 81.0), &a));
        assert!(!projectile_hits(Vec2::new(120.0, 100.0), &a));
        assert!(!projectile_hits(Vec2::new(100.0, 121.0), &a));
    }
}
