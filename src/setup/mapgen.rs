//! Procedural map generation.
//!
//! Regions are carved out of a cell grid as rectangles. Every rectangle
//! after the first must start out overlapping the regions already placed
//! and is then shrunk one edge at a time until it stops overlapping, so it
//! ends up bordering at least one of them. Borders are perturbed with a
//! smooth function of the cell coordinates to look hand drawn.

// Grid coordinates are small; the casts to f64 are exact
#![allow(clippy::cast_precision_loss)]

use std::collections::BTreeSet;

use log::{debug, warn};
use rand::Rng;

use crate::error::MapGenError;
use crate::game::{CellGrid, Point, Region, RegionGraph, RegionId};

/// Smallest supported player count.
pub const MIN_PLAYERS: usize = 2;

/// Largest supported player count.
pub const MAX_PLAYERS: usize = 4;

/// Rectangles shrunk below this area are abandoned.
const MIN_REGION_AREA: usize = 9;

/// Smallest rectangle side drawn.
const MIN_REGION_SIDE: usize = 3;

/// Tunable generation parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapParams {
    /// Grid width in cells.
    pub width: usize,
    /// Grid height in cells.
    pub height: usize,
    /// Candidate rectangles drawn per pass.
    pub retries_per_pass: u32,
    /// Passes attempted before giving up.
    pub max_passes: u32,
}

impl Default for MapParams {
    fn default() -> Self {
        Self {
            width: 30,
            height: 20,
            retries_per_pass: 2500,
            max_passes: 64,
        }
    }
}

/// Regions a map for `player_count` players needs.
#[must_use]
pub const fn needed_regions(player_count: usize) -> usize {
    13 + 3 * player_count
}

/// Largest rectangle side drawn for `player_count` players (exclusive).
#[must_use]
pub const fn max_region_size(player_count: usize) -> usize {
    11 - player_count
}

/// Generate a map for `player_count` players on the default grid.
///
/// # Errors
///
/// Returns [`MapGenError::PlayerCount`] outside `2..=4` players and
/// [`MapGenError::Exhausted`] if no pass manages to place every region.
pub fn generate<R: Rng + ?Sized>(
    player_count: usize,
    rng: &mut R,
) -> Result<RegionGraph, MapGenError> {
    generate_with(&MapParams::default(), player_count, rng)
}

/// Generate a map with explicit parameters.
///
/// # Errors
///
/// Same as [`generate`].
pub fn generate_with<R: Rng + ?Sized>(
    params: &MapParams,
    player_count: usize,
    rng: &mut R,
) -> Result<RegionGraph, MapGenError> {
    if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&player_count) {
        return Err(MapGenError::PlayerCount {
            count: player_count,
            min: MIN_PLAYERS,
            max: MAX_PLAYERS,
        });
    }

    let needed = needed_regions(player_count);
    let max_size = max_region_size(player_count);
    let perturb = f64::from(rng.random_range(10_000u32..100_000));

    for pass in 1..=params.max_passes {
        let mut carver = Carver::new(params.width, params.height, perturb);
        let mut retries = params.retries_per_pass;

        while carver.bounds.len() < needed && retries > 0 {
            retries -= 1;
            carver.try_place(rng, max_size);
        }

        if carver.bounds.len() == needed {
            debug!(
                "generated {needed} regions for {player_count} players on pass {pass}"
            );
            return carver.finish();
        }
        warn!(
            "map generation pass {pass} placed {}/{needed} regions, restarting",
            carver.bounds.len()
        );
    }

    Err(MapGenError::Exhausted {
        passes: params.max_passes,
        needed,
    })
}

/// A candidate rectangle, in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Bounds {
    left: usize,
    top: usize,
    width: usize,
    height: usize,
}

impl Bounds {
    const fn area(&self) -> usize {
        self.width * self.height
    }

    fn cells(&self) -> impl Iterator<Item = (usize, usize)> {
        let Bounds {
            left,
            top,
            width,
            height,
        } = *self;
        (left..left + width).flat_map(move |x| (top..top + height).map(move |y| (x, y)))
    }

    /// Shrink by one cell in a random direction.
    ///
    /// Returns `false` once the rectangle is too small to keep.
    fn shrink<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        let r = rng.random_range(0..4);
        if r % 2 == 1 {
            self.width -= 1;
        } else {
            self.height -= 1;
        }
        match r {
            2 => self.top += 1,
            3 => self.left += 1,
            _ => {}
        }
        self.area() >= MIN_REGION_AREA
    }
}

/// Draw from `[lo, hi)`, or `lo` when the range is empty.
fn draw<R: Rng + ?Sized>(rng: &mut R, lo: usize, hi: usize) -> usize {
    if hi > lo { rng.random_range(lo..hi) } else { lo }
}

/// One generation pass in progress.
struct Carver {
    grid: CellGrid,
    bounds: Vec<Bounds>,
    perturb: f64,
}

impl Carver {
    fn new(width: usize, height: usize, perturb: f64) -> Self {
        Self {
            grid: CellGrid::new(width, height),
            bounds: Vec::new(),
            perturb,
        }
    }

    fn overlaps(&self, bounds: &Bounds) -> bool {
        bounds.cells().any(|(x, y)| self.grid.get(x, y).is_some())
    }

    fn try_place<R: Rng + ?Sized>(&mut self, rng: &mut R, max_size: usize) {
        let width = self.grid.width();
        let height = self.grid.height();
        let mut bounds = Bounds {
            left: draw(rng, 1, (width + 1).saturating_sub(max_size)),
            top: draw(rng, 1, (height + 1).saturating_sub(max_size)),
            width: draw(rng, MIN_REGION_SIDE, max_size),
            height: draw(rng, MIN_REGION_SIDE, max_size),
        };

        if !self.bounds.is_empty() && !self.overlaps(&bounds) {
            return;
        }

        while bounds.shrink(rng) {
            if !self.overlaps(&bounds) {
                let id = self.bounds.len();
                for (x, y) in bounds.cells() {
                    self.grid.set(x, y, id);
                }
                self.bounds.push(bounds);
                return;
            }
        }
    }

    fn perturbed_point(&self, x: usize, y: usize) -> Point {
        let (x, y) = (x as f64, y as f64);
        let angle = (x * x * y * y * 600.0 + self.perturb * 357.0).sin() * 6.28;
        let dist = (x * y * 600.0 + self.perturb * 211.0).sin() / 2.0;
        Point::new(x + angle.sin() * dist, y + angle.cos() * dist)
    }

    /// Boundary walk: top edge, right edge, bottom edge, left edge.
    fn polygon(&self, b: &Bounds) -> Vec<Point> {
        let (l, t, w, h) = (b.left, b.top, b.width, b.height);
        let mut points = Vec::with_capacity(2 * (w + h));
        points.extend((0..w).map(|i| self.perturbed_point(l + i, t)));
        points.extend((0..h).map(|i| self.perturbed_point(l + w, t + i)));
        points.extend((0..w).map(|i| self.perturbed_point(l + w - i, t + h)));
        points.extend((0..h).map(|i| self.perturbed_point(l, t + h - i)));
        points
    }

    fn neighbor_lists(&self) -> Vec<BTreeSet<RegionId>> {
        let mut neighbors = vec![BTreeSet::new(); self.bounds.len()];
        let (width, height) = (self.grid.width(), self.grid.height());
        for x in 1..width.saturating_sub(1) {
            for y in 1..height.saturating_sub(1) {
                let Some(region) = self.grid.get(x, y) else {
                    continue;
                };
                for (nx, ny) in [(x - 1, y), (x + 1, y), (x, y - 1), (x, y + 1)] {
                    if let Some(other) = self.grid.get(nx, ny).filter(|&o| o != region) {
                        neighbors[region].insert(other);
                    }
                }
            }
        }
        neighbors
    }

    fn finish(self) -> Result<RegionGraph, MapGenError> {
        let neighbors = self.neighbor_lists();
        let regions = self
            .bounds
            .iter()
            .zip(neighbors)
            .enumerate()
            .map(|(id, (bounds, n))| Region::new(id, self.polygon(bounds), n.into_iter().collect()))
            .collect();
        Ok(RegionGraph::with_grid(regions, Some(self.grid))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_generate_region_count() {
        for players in MIN_PLAYERS..=MAX_PLAYERS {
            let mut rng = StdRng::seed_from_u64(players as u64);
            let map = generate(players, &mut rng).unwrap();
            assert_eq!(map.len(), needed_regions(players));
        }
    }

    #[test]
    fn test_generated_map_connected_and_symmetric() {
        let mut rng = StdRng::seed_from_u64(2024);
        let map = generate(3, &mut rng).unwrap();
        assert!(map.is_connected());
        assert!(map.is_symmetric());
    }

    #[test]
    fn test_generation_deterministic_for_seed() {
        let a = generate(2, &mut StdRng::seed_from_u64(5)).unwrap();
        let b = generate(2, &mut StdRng::seed_from_u64(5)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_polygon_point_count() {
        let mut rng = StdRng::seed_from_u64(11);
        let map = generate(4, &mut rng).unwrap();
        let grid = map.grid().unwrap();
        for region in map.regions() {
            let cells = (0..grid.width())
                .flat_map(|x| (0..grid.height()).map(move |y| (x, y)))
                .filter(|&(x, y)| grid.get(x, y) == Some(region.id))
                .count();
            assert!(cells >= MIN_REGION_AREA);
            // 2w + 2h points for a w x h rectangle
            assert_eq!(region.points.len() % 2, 0);
            assert!(region.points.len() >= 12);
        }
    }

    #[test]
    fn test_regions_stay_off_the_border() {
        let mut rng = StdRng::seed_from_u64(3);
        let map = generate(2, &mut rng).unwrap();
        let grid = map.grid().unwrap();
        for x in 0..grid.width() {
            assert_eq!(grid.get(x, 0), None);
            assert_eq!(grid.get(x, grid.height() - 1), None);
        }
        for y in 0..grid.height() {
            assert_eq!(grid.get(0, y), None);
            assert_eq!(grid.get(grid.width() - 1, y), None);
        }
    }

    #[test]
    fn test_player_count_rejected() {
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(
            generate(1, &mut rng),
            Err(MapGenError::PlayerCount {
                count: 1,
                min: 2,
                max: 4
            })
        );
        assert!(generate(5, &mut rng).is_err());
    }

    #[test]
    fn test_tiny_grid_exhausts() {
        let params = MapParams {
            width: 8,
            height: 8,
            retries_per_pass: 50,
            max_passes: 3,
        };
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(
            generate_with(&params, 4, &mut rng),
            Err(MapGenError::Exhausted {
                passes: 3,
                needed: 25
            })
        );
    }
}
