//! Regions and the adjacency graph the simulation runs on.

use std::collections::VecDeque;

use serde::Serialize;

use crate::error::GraphError;

/// Index of a region in its [`RegionGraph`].
pub type RegionId = usize;

/// A 2-D boundary point in map cell units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    /// Horizontal position.
    pub x: f64,
    /// Vertical position.
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A polygonal cell of the map, the unit of ownership.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Region {
    /// Position of this region in the graph.
    pub id: RegionId,
    /// Boundary polygon, in walking order.
    pub points: Vec<Point>,
    /// Bordering regions, sorted ascending.
    pub neighbors: Vec<RegionId>,
}

impl Region {
    /// Create a region.
    #[must_use]
    pub fn new(id: RegionId, points: Vec<Point>, mut neighbors: Vec<RegionId>) -> Self {
        neighbors.sort_unstable();
        neighbors.dedup();
        Self {
            id,
            points,
            neighbors,
        }
    }

    /// Check whether `other` borders this region.
    #[must_use]
    pub fn borders(&self, other: RegionId) -> bool {
        self.neighbors.binary_search(&other).is_ok()
    }
}

/// The cell grid a generated map was carved from.
///
/// Kept alongside the graph so the map can be rendered and the adjacency
/// pass re-checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CellGrid {
    width: usize,
    height: usize,
    cells: Vec<Option<RegionId>>,
}

impl CellGrid {
    /// Create an empty grid.
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![None; width * height],
        }
    }

    /// Grid width in cells.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Grid height in cells.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Region occupying a cell, if any. Out-of-bounds cells are empty.
    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> Option<RegionId> {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            None
        }
    }

    /// Assign a cell to a region. Out-of-bounds writes are ignored.
    pub fn set(&mut self, x: usize, y: usize, region: RegionId) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = Some(region);
        }
    }
}

/// The immutable region graph of one game.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionGraph {
    regions: Vec<Region>,
    grid: Option<CellGrid>,
}

impl RegionGraph {
    /// Build a graph from regions, validating ids and adjacency symmetry.
    ///
    /// # Errors
    ///
    /// Returns an error if ids are out of order, a neighbour is unknown, or
    /// adjacency is not symmetric.
    pub fn new(regions: Vec<Region>) -> Result<Self, GraphError> {
        Self::with_grid(regions, None)
    }

    /// Build a graph that remembers the cell grid it was generated on.
    ///
    /// # Errors
    ///
    /// Same as [`RegionGraph::new`].
    pub fn with_grid(regions: Vec<Region>, grid: Option<CellGrid>) -> Result<Self, GraphError> {
        for (position, region) in regions.iter().enumerate() {
            if region.id != position {
                return Err(GraphError::MisnumberedRegion {
                    position,
                    id: region.id,
                });
            }
            for &neighbor in &region.neighbors {
                let Some(other) = regions.get(neighbor) else {
                    return Err(GraphError::UnknownNeighbor {
                        region: region.id,
                        neighbor,
                    });
                };
                if !other.borders(region.id) {
                    return Err(GraphError::Asymmetric {
                        region: region.id,
                        neighbor,
                    });
                }
            }
        }
        Ok(Self { regions, grid })
    }

    /// Build a graph from an edge list, with unit-square polygons laid out
    /// in a row. Convenient for hand-made maps.
    ///
    /// # Errors
    ///
    /// Returns an error if an edge references a region `>= count`.
    pub fn from_edges(count: usize, edges: &[(RegionId, RegionId)]) -> Result<Self, GraphError> {
        let mut neighbors = vec![Vec::new(); count];
        for &(a, b) in edges {
            if a >= count || b >= count {
                return Err(GraphError::UnknownNeighbor {
                    region: a.min(b),
                    neighbor: a.max(b),
                });
            }
            if a != b {
                neighbors[a].push(b);
                neighbors[b].push(a);
            }
        }
        Self::new(row_of_squares(neighbors))
    }

    /// `count` unit squares in a row, each bordering the next.
    #[must_use]
    pub fn line(count: usize) -> Self {
        let neighbors = (0..count)
            .map(|i| {
                let mut n = Vec::with_capacity(2);
                if i > 0 {
                    n.push(i - 1);
                }
                if i + 1 < count {
                    n.push(i + 1);
                }
                n
            })
            .collect();
        Self {
            regions: row_of_squares(neighbors),
            grid: None,
        }
    }

    /// Number of regions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// Whether the graph has no regions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Get a region by id.
    #[must_use]
    pub fn get(&self, id: RegionId) -> Option<&Region> {
        self.regions.get(id)
    }

    /// All regions, in id order.
    #[must_use]
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// The cell grid, for generated maps.
    #[must_use]
    pub fn grid(&self) -> Option<&CellGrid> {
        self.grid.as_ref()
    }

    /// Check whether two regions share a border.
    #[must_use]
    pub fn are_neighbors(&self, a: RegionId, b: RegionId) -> bool {
        self.get(a).is_some_and(|r| r.borders(b))
    }

    /// Breadth-first hop distances from `start`. Unreachable regions are `None`.
    #[must_use]
    pub fn distances_from(&self, start: RegionId) -> Vec<Option<usize>> {
        let mut dist = vec![None; self.regions.len()];
        if start >= self.regions.len() {
            return dist;
        }
        let mut queue = VecDeque::from([start]);
        dist[start] = Some(0);
        while let Some(current) = queue.pop_front() {
            let next = dist[current].map_or(0, |d| d + 1);
            for &n in &self.regions[current].neighbors {
                if dist[n].is_none() {
                    dist[n] = Some(next);
                    queue.push_back(n);
                }
            }
        }
        dist
    }

    /// Whether every region is reachable from every other.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        if self.regions.is_empty() {
            return true;
        }
        self.distances_from(0).iter().all(Option::is_some)
    }

    /// Whether every neighbour relation has its back-reference.
    #[must_use]
    pub fn is_symmetric(&self) -> bool {
        self.regions.iter().all(|r| {
            r.neighbors
                .iter()
                .all(|&n| self.get(n).is_some_and(|o| o.borders(r.id)))
        })
    }
}

fn row_of_squares(neighbors: Vec<Vec<RegionId>>) -> Vec<Region> {
    neighbors
        .into_iter()
        .enumerate()
        .map(|(id, n)| {
            #[allow(clippy::cast_precision_loss)]
            let x = id as f64;
            let square = vec![
                Point::new(x, 0.0),
                Point::new(x + 1.0, 0.0),
                Point::new(x + 1.0, 1.0),
                Point::new(x, 1.0),
            ];
            Region::new(id, square, n)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_edges_symmetric() {
        let graph = RegionGraph::from_edges(3, &[(0, 1), (1, 2)]).unwrap();
        assert_eq!(graph.len(), 3);
        assert!(graph.are_neighbors(0, 1));
        assert!(graph.are_neighbors(1, 0));
        assert!(!graph.are_neighbors(0, 2));
        assert!(graph.is_symmetric());
        assert!(graph.is_connected());
    }

    #[test]
    fn test_line_matches_edges() {
        let edges = RegionGraph::from_edges(4, &[(0, 1), (1, 2), (2, 3)]).unwrap();
        assert_eq!(RegionGraph::line(4), edges);
        assert!(RegionGraph::line(0).is_empty());
    }

    #[test]
    fn test_disconnected_graph() {
        let graph = RegionGraph::from_edges(4, &[(0, 1), (2, 3)]).unwrap();
        assert!(!graph.is_connected());
        let dist = graph.distances_from(0);
        assert_eq!(dist, vec![Some(0), Some(1), None, None]);
    }

    #[test]
    fn test_asymmetric_rejected() {
        let regions = vec![
            Region::new(0, Vec::new(), vec![1]),
            Region::new(1, Vec::new(), Vec::new()),
        ];
        assert_eq!(
            RegionGraph::new(regions),
            Err(GraphError::Asymmetric {
                region: 0,
                neighbor: 1
            })
        );
    }

    #[test]
    fn test_unknown_neighbor_rejected() {
        let regions = vec![Region::new(0, Vec::new(), vec![5])];
        assert!(matches!(
            RegionGraph::new(regions),
            Err(GraphError::UnknownNeighbor { region: 0, neighbor: 5 })
        ));
    }

    #[test]
    fn test_cell_grid_bounds() {
        let mut grid = CellGrid::new(4, 3);
        grid.set(1, 2, 7);
        grid.set(9, 9, 1);
        assert_eq!(grid.get(1, 2), Some(7));
        assert_eq!(grid.get(0, 0), None);
        assert_eq!(grid.get(9, 9), None);
    }
}
