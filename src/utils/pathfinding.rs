//! # Pathfinding
//!
//! A* search over the tile grid for chasing and auto-movement.
//!
//! The open list is a flat `Vec` scanned for the lowest `g + h` each
//! iteration. Grids are small enough that this beats a heap in practice, and
//! every buffer lives in a [`Pathfinder`] so repeated searches do not allocate.

use crate::config::DEFAULT_PATH_CAPACITY;
use crate::{Direction, Occupants, Position, TileGrid};
use serde::{Deserialize, Serialize};

/// Cells from start to goal, both included.
///
/// An empty path means the goal was not reached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Path {
    steps: Vec<Position>,
    capacity: usize,
}

impl Path {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            steps: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Number of cells, start and goal included.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn positions(&self) -> &[Position] {
        &self.steps
    }

    /// Number of moves needed to walk the path.
    pub fn moves(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }

    /// The cell to move to first, if the path goes anywhere.
    pub fn next_step(&self) -> Option<Position> {
        self.steps.get(1).copied()
    }

    pub fn goal(&self) -> Option<Position> {
        self.steps.last().copied()
    }

    /// Keeps the first `capacity` cells of the chain.
    fn fill_from(&mut self, cells: impl Iterator<Item = Position>) {
        self.steps.clear();
        self.steps.extend(cells.take(self.capacity));
    }
}

impl Default for Path {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_PATH_CAPACITY)
    }
}

#[derive(Debug, Clone, Copy)]
struct OpenEntry {
    index: usize,
    f_score: u32,
}

/// Reusable A* search state.
#[derive(Debug, Clone)]
pub struct Pathfinder {
    open: Vec<OpenEntry>,
    g_score: Vec<u32>,
    parent: Vec<Option<usize>>,
    closed: Vec<bool>,
    chain: Vec<Position>,
    path_capacity: usize,
}

impl Pathfinder {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_PATH_CAPACITY)
    }

    /// A pathfinder whose paths hold at most `path_capacity` cells.
    pub fn with_capacity(path_capacity: usize) -> Self {
        Self {
            open: Vec::new(),
            g_score: Vec::new(),
            parent: Vec::new(),
            closed: Vec::new(),
            chain: Vec::new(),
            path_capacity,
        }
    }

    fn reset(&mut self, area: usize) {
        self.open.clear();
        self.g_score.clear();
        self.g_score.resize(area, u32::MAX);
        self.parent.clear();
        self.parent.resize(area, None);
        self.closed.clear();
        self.closed.resize(area, false);
    }

    /// Shortest path from `start` to `goal` under the Manhattan heuristic.
    ///
    /// A cell is impassable if its tile blocks movement or a movement-blocking
    /// actor stands on it. Actors on the goal itself are ignored so a chaser
    /// can path onto its target. Paths longer than the capacity keep the cells
    /// nearest the start.
    pub fn find_path(
        &mut self,
        grid: &TileGrid,
        occupants: &Occupants,
        start: Position,
        goal: Position,
        allow_diagonal: bool,
    ) -> Path {
        let mut path = Path::with_capacity(self.path_capacity);
        let (Some(start_index), Some(goal_index)) = (grid.index_of(start), grid.index_of(goal))
        else {
            return path;
        };

        self.reset(grid.area());
        self.g_score[start_index] = 0;
        self.open.push(OpenEntry {
            index: start_index,
            f_score: start.manhattan_distance(goal),
        });

        let directions: &[Direction] = if allow_diagonal {
            &Direction::ALL
        } else {
            &Direction::CARDINAL
        };

        while let Some(best) = self.pop_lowest() {
            let current = best.index;
            // Superseded entry.
            if self.closed[current] {
                continue;
            }
            self.closed[current] = true;

            if current == goal_index {
                self.collect_chain(grid, goal_index);
                path.fill_from(self.chain.iter().rev().copied());
                return path;
            }

            let here = grid.position_of(current);
            let next_g = self.g_score[current] + 1;
            for &direction in directions {
                let neighbour = here.step(direction);
                let Some(index) = grid.index_of(neighbour) else {
                    continue;
                };
                if self.closed[index] || grid.blocks(neighbour) {
                    continue;
                }
                if neighbour != goal && occupants.blocks_movement(neighbour) {
                    continue;
                }

                if next_g < self.g_score[index] {
                    self.g_score[index] = next_g;
                    self.parent[index] = Some(current);
                    self.open.push(OpenEntry {
                        index,
                        f_score: next_g + neighbour.manhattan_distance(goal),
                    });
                }
            }
        }

        path
    }

    fn pop_lowest(&mut self) -> Option<OpenEntry> {
        let (slot, _) = self
            .open
            .iter()
            .enumerate()
            .min_by_key(|(_, entry)| entry.f_score)?;
        Some(self.open.swap_remove(slot))
    }

    /// Walks parent links back from `goal_index`, goal first.
    fn collect_chain(&mut self, grid: &TileGrid, goal_index: usize) {
        self.chain.clear();
        let mut cursor = Some(goal_index);
        while let Some(index) = cursor {
            self.chain.push(grid.position_of(index));
            cursor = self.parent[index];
        }
    }
}

impl Default for Pathfinder {
    fn default() -> Self {
        Self::new()
    }
}

/// One-shot [`Pathfinder::find_path`] with a fresh pathfinder.
pub fn find_path(
    grid: &TileGrid,
    occupants: &Occupants,
    start: Position,
    goal: Position,
    allow_diagonal: bool,
) -> Path {
    Pathfinder::new().find_path(grid, occupants, start, goal, allow_diagonal)
}
