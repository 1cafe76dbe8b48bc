//! Edge-to-edge path traversal used by the world crate.

use std::collections::VecDeque;

use line_defence_core::{Cell, Edge, ARENA_SIZE, HALF_ARENA};

/// Dense breadth-first distance grid covering the arena bounding square.
///
/// Distances default to `u16::MAX` for cells that are blocked, outside the
/// arena or unreachable from the seeds, so callers can tell them apart from
/// traversable cells.
#[derive(Clone, Debug)]
pub(crate) struct NavigationField {
    distances: Vec<u16>,
}

impl Default for NavigationField {
    fn default() -> Self {
        Self {
            distances: vec![u16::MAX; grid_len()],
        }
    }
}

impl NavigationField {
    /// Rebuilds the distances with a breadth-first search from the seeds.
    pub(crate) fn rebuild_with<F>(&mut self, seeds: &[Cell], mut is_blocked: F)
    where
        F: FnMut(Cell) -> bool,
    {
        self.distances.fill(u16::MAX);
        let mut queue = VecDeque::new();

        for &seed in seeds {
            let Some(seed_index) = index(seed) else {
                continue;
            };
            if is_blocked(seed) || self.distances[seed_index] == 0 {
                continue;
            }
            self.distances[seed_index] = 0;
            queue.push_back(seed);
        }

        while let Some(cell) = queue.pop_front() {
            let Some(current_index) = index(cell) else {
                continue;
            };
            let next_distance = self.distances[current_index].saturating_add(1);

            for neighbor in neighbors(cell) {
                let Some(neighbor_index) = index(neighbor) else {
                    continue;
                };
                if self.distances[neighbor_index] != u16::MAX || is_blocked(neighbor) {
                    continue;
                }
                self.distances[neighbor_index] = next_distance;
                queue.push_back(neighbor);
            }
        }
    }

    /// Distance recorded for the provided cell.
    pub(crate) fn distance(&self, cell: Cell) -> Option<u16> {
        index(cell).map(|index| self.distances[index])
    }

    fn reachable(&self, cell: Cell) -> bool {
        self.distance(cell).is_some_and(|distance| distance != u16::MAX)
    }
}

/// Computes the ordered cells a mobile unit launched from `launch` visits.
///
/// Units head for the edge opposite their launch edge. When that edge cannot
/// be reached, they head for the reachable cells closest to it instead. Among
/// equally short steps, a unit alternates between horizontal and vertical
/// moves, favouring the direction of its destination edge.
pub(crate) fn path_to_edge<F>(launch: Cell, mut is_blocked: F) -> Vec<Cell>
where
    F: FnMut(Cell) -> bool,
{
    if !launch.in_arena() || is_blocked(launch) {
        return Vec::new();
    }

    let destination = launch.edge().map_or_else(
        || {
            if launch.x() < HALF_ARENA {
                Edge::TopRight
            } else {
                Edge::TopLeft
            }
        },
        Edge::opposite,
    );

    let mut reach = NavigationField::default();
    reach.rebuild_with(&[launch], &mut is_blocked);

    let reachable: Vec<Cell> = arena_cells()
        .filter(|cell| reach.reachable(*cell))
        .collect();
    let Some(best_gap) = reachable
        .iter()
        .map(|cell| edge_gap(destination, *cell))
        .min()
    else {
        return Vec::new();
    };
    let goals: Vec<Cell> = reachable
        .into_iter()
        .filter(|cell| edge_gap(destination, *cell) == best_gap)
        .collect();

    let mut field = NavigationField::default();
    field.rebuild_with(&goals, &mut is_blocked);

    let (step_x, step_y) = heading(destination);
    let mut path = vec![launch];
    let mut current = launch;
    let mut last_vertical = false;

    while let Some(remaining) = field.distance(current).filter(|d| *d != 0 && *d != u16::MAX) {
        let horizontal = [
            Cell::new(current.x() + step_x, current.y()),
            Cell::new(current.x() - step_x, current.y()),
        ];
        let vertical = [
            Cell::new(current.x(), current.y() + step_y),
            Cell::new(current.x(), current.y() - step_y),
        ];
        let ordered = if last_vertical {
            [horizontal[0], horizontal[1], vertical[0], vertical[1]]
        } else {
            [vertical[0], vertical[1], horizontal[0], horizontal[1]]
        };

        let Some(next) = ordered
            .into_iter()
            .find(|candidate| field.distance(*candidate) == Some(remaining - 1))
        else {
            break;
        };

        last_vertical = next.x() == current.x();
        path.push(next);
        current = next;
    }

    path
}

/// Every cell of the arena in row-major order.
pub(crate) fn arena_cells() -> impl Iterator<Item = Cell> {
    (0..ARENA_SIZE)
        .flat_map(|y| (0..ARENA_SIZE).map(move |x| Cell::new(x, y)))
        .filter(|cell| cell.in_arena())
}

fn edge_gap(edge: Edge, cell: Cell) -> i32 {
    let (x, y) = (cell.x(), cell.y());
    match edge {
        Edge::BottomLeft => (x + y - (HALF_ARENA - 1)).abs(),
        Edge::BottomRight => (x - y - HALF_ARENA).abs(),
        Edge::TopLeft => (y - x - HALF_ARENA).abs(),
        Edge::TopRight => (x + y - (ARENA_SIZE + HALF_ARENA - 1)).abs(),
    }
}

fn heading(edge: Edge) -> (i32, i32) {
    match edge {
        Edge::BottomLeft => (-1, -1),
        Edge::BottomRight => (1, -1),
        Edge::TopLeft => (-1, 1),
        Edge::TopRight => (1, 1),
    }
}

fn neighbors(cell: Cell) -> impl Iterator<Item = Cell> {
    [
        Cell::new(cell.x(), cell.y() - 1),
        Cell::new(cell.x() + 1, cell.y()),
        Cell::new(cell.x(), cell.y() + 1),
        Cell::new(cell.x() - 1, cell.y()),
    ]
    .into_iter()
    .filter(|neighbor| neighbor.in_arena())
}

fn grid_len() -> usize {
    let side = usize::try_from(ARENA_SIZE).unwrap_or(0);
    side * side
}

fn index(cell: Cell) -> Option<usize> {
    if !cell.in_arena() {
        return None;
    }
    let x = usize::try_from(cell.x()).ok()?;
    let y = usize::try_from(cell.y()).ok()?;
    let side = usize::try_from(ARENA_SIZE).ok()?;
    y.checked_mul(side)?.checked_add(x)
}
