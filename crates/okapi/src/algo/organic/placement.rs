//! Snaps continuous positions onto a uniform grid without collisions.

use crate::algo::CellSize;
use crate::graph::Point;
use rustc_hash::FxHashMap;
use serde::Serialize;
use std::collections::hash_map::Entry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct GridCell {
    pub x: i32,
    pub y: i32,
}

impl GridCell {
    pub const ORIGIN: GridCell = GridCell { x: 0, y: 0 };

    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The cell whose center is nearest to `p`.
    pub fn nearest(p: Point, cell: CellSize) -> Self {
        // `as` saturates (and maps NaN to 0), so degenerate positions still land somewhere.
        Self {
            x: (p.x / cell.width).round() as i32,
            y: (p.y / cell.height).round() as i32,
        }
    }

    pub fn to_point(self, cell: CellSize) -> Point {
        Point::new(f64::from(self.x) * cell.width, f64::from(self.y) * cell.height)
    }

    fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }
}

/// Cells at Chebyshev distance exactly `r` from `center`.
///
/// Scan order is fixed: `dx` ascending in the outer loop, `dy` ascending in the inner loop.
/// Radius 0 yields `center` alone.
pub fn ring(center: GridCell, r: i32) -> impl Iterator<Item = GridCell> {
    (-r..=r).flat_map(move |dx| {
        (-r..=r)
            .filter(move |dy| dx.abs() == r || dy.abs() == r)
            .map(move |dy| center.offset(dx, dy))
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Claim {
    Free(GridCell),
    /// No free cell within the search radius; the preferred cell is reused.
    Exhausted(GridCell),
}

impl Claim {
    pub fn cell(self) -> GridCell {
        match self {
            Claim::Free(c) | Claim::Exhausted(c) => c,
        }
    }
}

/// Sparse occupancy map; at most one owner per cell.
#[derive(Debug, Clone, Default)]
pub struct Grid {
    occupied: FxHashMap<GridCell, usize>,
}

impl Grid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn owner(&self, cell: GridCell) -> Option<usize> {
        self.occupied.get(&cell).copied()
    }

    /// Claims the first free cell on the expanding rings around `preferred`.
    pub fn claim_near(&mut self, preferred: GridCell, owner: usize, max_radius: u32) -> Claim {
        let max_radius = i32::try_from(max_radius).unwrap_or(i32::MAX);
        for r in 0..=max_radius {
            for cell in ring(preferred, r) {
                if let Entry::Vacant(slot) = self.occupied.entry(cell) {
                    slot.insert(owner);
                    return Claim::Free(cell);
                }
            }
        }
        Claim::Exhausted(preferred)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Placement {
    /// `(node index, cell)` in claim order.
    pub cells: Vec<(usize, GridCell)>,
    /// Nodes that fell back to an already occupied cell.
    pub exhausted: Vec<usize>,
}

/// Assigns grid cells: linked nodes nearest the origin claim first, then unlinked nodes spiral
/// out from the origin in input order.
pub fn resolve(
    linked: &[(usize, Point)],
    unlinked: &[usize],
    cell: CellSize,
    max_radius: u32,
) -> Placement {
    let mut order: Vec<&(usize, Point)> = linked.iter().collect();
    order.sort_by(|a, b| squared_norm(a.1).total_cmp(&squared_norm(b.1)));

    let mut grid = Grid::new();
    let mut placement = Placement::default();
    let anchors = order
        .into_iter()
        .map(|&(node, p)| (node, GridCell::nearest(p, cell)))
        .chain(unlinked.iter().map(|&node| (node, GridCell::ORIGIN)));
    for (node, preferred) in anchors {
        let claim = grid.claim_near(preferred, node, max_radius);
        if let Claim::Exhausted(cell) = claim {
            tracing::warn!(
                node,
                x = cell.x,
                y = cell.y,
                max_radius,
                "grid search exhausted; node overlaps an occupied cell"
            );
            placement.exhausted.push(node);
        }
        placement.cells.push((node, claim.cell()));
    }
    placement
}

fn squared_norm(p: Point) -> f64 {
    p.x * p.x + p.y * p.y
}

#[cfg(test)]
mod tests {
    use super::{Claim, Grid, GridCell, ring, resolve};
    use crate::algo::CellSize;
    use crate::graph::Point;

    fn cells(v: &[(i32, i32)]) -> Vec<GridCell> {
        v.iter().map(|&(x, y)| GridCell::new(x, y)).collect()
    }

    #[test]
    fn ring_zero_is_the_center() {
        let c = GridCell::new(4, -2);
        assert_eq!(ring(c, 0).collect::<Vec<_>>(), vec![c]);
    }

    #[test]
    fn ring_one_scans_dx_then_dy() {
        assert_eq!(
            ring(GridCell::ORIGIN, 1).collect::<Vec<_>>(),
            cells(&[
                (-1, -1),
                (-1, 0),
                (-1, 1),
                (0, -1),
                (0, 1),
                (1, -1),
                (1, 0),
                (1, 1)
            ])
        );
    }

    #[test]
    fn ring_r_has_8r_boundary_cells() {
        let center = GridCell::new(10, 10);
        for r in 1..6 {
            let boundary: Vec<GridCell> = ring(center, r).collect();
            assert_eq!(boundary.len(), (8 * r) as usize);
            assert!(
                boundary
                    .iter()
                    .all(|c| (c.x - center.x).abs().max((c.y - center.y).abs()) == r)
            );
        }
    }

    #[test]
    fn nearest_rounds_per_axis() {
        let cell = CellSize::default();
        assert_eq!(
            GridCell::nearest(Point::new(340.0, -250.0), cell),
            GridCell::new(2, -2)
        );
        assert_eq!(
            GridCell::nearest(Point::new(100.0, 70.0), cell),
            GridCell::ORIGIN
        );
        assert_eq!(
            GridCell::new(-3, 2).to_point(cell),
            Point::new(-660.0, 320.0)
        );
    }

    #[test]
    fn nearest_survives_non_finite_positions() {
        let cell = CellSize::default();
        assert_eq!(
            GridCell::nearest(Point::new(f64::NAN, f64::INFINITY), cell),
            GridCell::new(0, i32::MAX)
        );
    }

    #[test]
    fn claim_near_takes_preferred_cell_when_free() {
        let mut grid = Grid::new();
        let c = GridCell::new(3, 3);
        assert_eq!(grid.claim_near(c, 7, 100), Claim::Free(c));
        assert_eq!(grid.owner(c), Some(7));
        assert_eq!(
            grid.claim_near(c, 8, 100),
            Claim::Free(GridCell::new(2, 2))
        );
        assert_eq!(grid.occupied.len(), 2);
    }

    #[test]
    fn claim_near_reports_exhaustion_and_keeps_first_owner() {
        let mut grid = Grid::new();
        assert_eq!(
            grid.claim_near(GridCell::ORIGIN, 0, 0),
            Claim::Free(GridCell::ORIGIN)
        );
        assert_eq!(
            grid.claim_near(GridCell::ORIGIN, 1, 0),
            Claim::Exhausted(GridCell::ORIGIN)
        );
        assert_eq!(grid.owner(GridCell::ORIGIN), Some(0));
    }

    #[test]
    fn nodes_nearer_the_origin_claim_first() {
        let cell = CellSize::default();
        // Both round to (1, 0); node 5 is closer to the origin.
        let linked = [(4, Point::new(260.0, 10.0)), (5, Point::new(200.0, 0.0))];
        let p = resolve(&linked, &[], cell, 100);
        assert_eq!(
            p.cells,
            vec![(5, GridCell::new(1, 0)), (4, GridCell::new(0, -1))]
        );
        assert!(p.exhausted.is_empty());
    }

    #[test]
    fn unlinked_nodes_fill_around_linked_ones() {
        let cell = CellSize::default();
        let linked = [(0, Point::new(0.0, 0.0))];
        let p = resolve(&linked, &[1, 2], cell, 100);
        assert_eq!(
            p.cells,
            vec![
                (0, GridCell::ORIGIN),
                (1, GridCell::new(-1, -1)),
                (2, GridCell::new(-1, 0)),
            ]
        );
    }

    #[test]
    fn exhausted_search_falls_back_to_preferred_cell() {
        let p = resolve(&[], &[0, 1, 2], CellSize::default(), 0);
        assert_eq!(
            p.cells,
            vec![
                (0, GridCell::ORIGIN),
                (1, GridCell::ORIGIN),
                (2, GridCell::ORIGIN)
            ]
        );
        assert_eq!(p.exhausted, vec![1, 2]);
    }
}
