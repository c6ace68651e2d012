//! Randomized Prim carving over the open-ended strip.
//!
//! Walls move through three classifications: unconsidered, available (in the
//! frontier) and considered. Squares move from uninitialized to initialized to
//! used. Every carved wall joins a freshly annexed square to the existing
//! tree, so the passages always form a perfect maze rooted at the start
//! square.

use endless_maze_core::{CellCoord, Direction, GenerationError, WallCoord};
use tracing::{debug, error, trace};

use crate::World;

/// Bounding walls of a square, in the order they are created and offered to
/// the frontier.
const SQUARE_WALLS: [Direction; 4] = [
    Direction::West,
    Direction::East,
    Direction::South,
    Direction::North,
];

fn bounding_walls(cell: CellCoord) -> impl Iterator<Item = WallCoord> {
    SQUARE_WALLS
        .into_iter()
        .map(move |direction| cell.wall_toward(direction))
}

impl World {
    /// Creates the square's bounding walls as standing unless already known.
    pub(crate) fn ensure_walls(&mut self, cell: CellCoord) {
        for wall in bounding_walls(cell) {
            if self.walls.get(wall).is_none() {
                self.walls.set(wall, true);
            }
        }
    }

    pub(crate) fn ensure_square(&mut self, cell: CellCoord) {
        if self.squares.insert(cell) {
            self.ensure_walls(cell);
        }
    }

    /// Adds the square to the tree and offers its carvable walls to the frontier.
    pub(crate) fn annex_square(&mut self, cell: CellCoord) {
        let _ = self.squares_used.insert(cell);
        self.ensure_square(cell);

        for wall in bounding_walls(cell) {
            if self.bounds.is_wall_removable(wall)
                && !self.walls_considered.contains(wall)
                && !self.walls_available.contains(wall)
            {
                let _ = self.walls_available.insert(wall);
            }
        }
    }

    fn remove_wall(&mut self, wall: WallCoord) {
        self.walls.set(wall, false);
    }

    /// Pops frontier walls until one of them opens a passage to a square
    /// outside the tree. Returns the carved wall, or `None` once the frontier
    /// is exhausted without carving.
    pub(crate) fn carve(&mut self) -> Option<WallCoord> {
        while let Some(wall) = self.walls_available.remove_random(&mut self.rng) {
            let _ = self.walls_considered.insert(wall);

            let mut carved = false;
            for cell in wall.squares() {
                if !self.squares_used.contains(cell) {
                    self.remove_wall(wall);
                    self.annex_square(cell);
                    carved = true;
                }
            }

            if carved {
                return Some(wall);
            }
        }
        None
    }

    /// Carves until `wall` has been considered. It may end up removed or
    /// still standing.
    pub(crate) fn ensure_wall_considered(&mut self, wall: WallCoord) -> Result<(), GenerationError> {
        if !self.bounds.is_wall_removable(wall) {
            return Err(GenerationError::NotRemovable { wall });
        }

        while !self.walls_considered.contains(wall) {
            if self.walls_available.is_empty() {
                error!(%wall, used = self.squares_used.len(), "frontier exhausted");
                return Err(GenerationError::FrontierExhausted { wall });
            }
            let _ = self.carve();
        }
        Ok(())
    }

    /// Initializes every square of the column and resolves each of their
    /// carvable walls.
    pub(crate) fn ensure_column_complete(&mut self, column: i32) -> Result<(), GenerationError> {
        let bounds = self.bounds;
        for row in bounds.rows() {
            let cell = CellCoord::new(column, row);
            self.ensure_square(cell);
            for wall in bounding_walls(cell) {
                if bounds.is_wall_removable(wall) {
                    self.ensure_wall_considered(wall)?;
                }
            }
        }
        Ok(())
    }

    /// Completes columns until everything through `through_column` plus the
    /// lookahead margin is resolved. Returns whether any column was completed.
    pub(crate) fn generate_through(&mut self, through_column: i32) -> Result<bool, GenerationError> {
        if self.bounds.is_empty() {
            return Ok(false);
        }

        let target = i64::from(through_column) + i64::from(self.lookahead);
        let first = self.next_column;
        while i64::from(self.next_column) <= target {
            self.ensure_column_complete(self.next_column)?;
            trace!(column = self.next_column, "column complete");
            match self.next_column.checked_add(1) {
                Some(next) => self.next_column = next,
                None => break,
            }
        }

        let completed = self.next_column != first;
        if completed {
            debug!(
                from = first,
                through = self.next_column - 1,
                frontier = self.walls_available.len(),
                used = self.squares_used.len(),
                "columns generated"
            );
        }
        Ok(completed)
    }
}

#[cfg(test)]
mod tests {
    use endless_maze_core::{Axis, MazeConfig, WallState};

    use super::*;

    fn config(top_row: i32, bottom_row: i32) -> MazeConfig {
        MazeConfig {
            left_column: 1,
            top_row,
            bottom_row,
            lookahead: 32,
            start: CellCoord::new(1, top_row),
            seed: 0x00c0_ffee,
        }
    }

    fn assert_invariants(world: &World) {
        for cell in world.squares_used.iter() {
            assert!(world.squares.contains(cell), "used square {cell} not initialized");
        }
        for wall in world.walls_available.iter() {
            assert!(world.bounds.is_wall_removable(wall), "{wall} in frontier");
            assert!(!world.walls_considered.contains(wall), "{wall} in both sets");
        }
        for wall in world.walls_considered.iter() {
            assert!(!world.walls_available.contains(wall));
            if world.wall_state(wall) == WallState::Removed {
                for cell in wall.squares() {
                    assert!(world.squares_used.contains(cell), "{wall} removed before {cell}");
                }
            }
        }

        let Some(last) = world.last_column() else {
            return;
        };
        for column in world.bounds.left_column()..=last {
            for row in world.bounds.rows() {
                let cell = CellCoord::new(column, row);
                assert!(world.squares.contains(cell), "{cell} missing");
                for wall in bounding_walls(cell) {
                    if world.bounds.is_wall_removable(wall) {
                        assert!(world.walls_considered.contains(wall), "{wall} unresolved");
                    }
                }
            }
        }
    }

    type Snapshot = (
        Vec<WallState>,
        Vec<WallCoord>,
        Vec<WallCoord>,
        Vec<CellCoord>,
        Vec<CellCoord>,
    );

    fn snapshot(world: &World, first_column: i32, last_column: i32) -> Snapshot {
        let mut walls = Vec::new();
        for column in first_column..=last_column {
            for row in -5..=4 {
                for axis in [Axis::Vertical, Axis::Horizontal] {
                    walls.push(world.wall_state(WallCoord::new(axis, column, row)));
                }
            }
        }
        (
            walls,
            world.walls_considered.iter().collect(),
            world.walls_available.iter().collect(),
            world.squares_used.iter().collect(),
            world.squares.iter().collect(),
        )
    }

    #[test]
    fn invariants_hold_across_batches() {
        let mut world = World::new(&config(-4, 4)).expect("world");
        assert_invariants(&world);
        for through in [0, 5, 40, 41, 100] {
            let _ = world.generate_through(through).expect("generate");
            assert_invariants(&world);
        }
    }

    #[test]
    fn column_one_is_fully_resolved() {
        let mut world = World::blank(&config(1, 9));
        world.annex_square(CellCoord::new(1, 1));
        let _ = world.generate_through(1).expect("generate");

        let column: Vec<CellCoord> = (1..=9).map(|row| CellCoord::new(1, row)).collect();
        for cell in &column {
            assert!(world.squares.contains(*cell));
            for wall in bounding_walls(*cell) {
                if world.bounds.is_wall_removable(wall) {
                    assert!(world.walls_considered.contains(wall));
                } else {
                    assert_eq!(world.wall_state(wall), WallState::Standing);
                }
            }
        }
        assert!(world.squares_used.contains(CellCoord::new(1, 1)));
    }

    #[test]
    fn east_wall_opens_once_carved() {
        let mut world = World::blank(&config(1, 1));
        let start = CellCoord::new(1, 1);
        world.annex_square(start);
        assert_eq!(world.wall_state(start.wall_toward(Direction::East)), WallState::Standing);
        assert_eq!(world.wall_state(start.wall_toward(Direction::West)), WallState::Standing);

        assert_eq!(world.carve(), Some(start.wall_toward(Direction::East)));
        assert_eq!(
            world.wall_state(start.wall_toward(Direction::East)),
            WallState::Removed
        );
        assert!(world.squares_used.contains(CellCoord::new(2, 1)));
    }

    #[test]
    fn ensure_square_and_walls_are_idempotent() {
        let mut world = World::blank(&config(1, 9));
        let cell = CellCoord::new(3, 4);
        world.ensure_square(cell);
        let snapshot = world.clone();
        world.ensure_square(cell);
        world.ensure_walls(cell);
        assert_eq!(world.squares.len(), snapshot.squares.len());
        for wall in bounding_walls(cell) {
            assert_eq!(world.wall_state(wall), snapshot.wall_state(wall));
            assert_eq!(world.wall_state(wall), WallState::Standing);
        }
    }

    #[test]
    fn ensure_walls_keeps_removed_walls_removed() {
        let mut world = World::blank(&config(1, 9));
        let cell = CellCoord::new(2, 2);
        world.ensure_square(cell);
        world.remove_wall(cell.wall_toward(Direction::South));
        world.ensure_walls(cell);
        world.ensure_square(cell.neighbor(Direction::South));
        assert_eq!(
            world.wall_state(cell.wall_toward(Direction::South)),
            WallState::Removed
        );
    }

    #[test]
    fn ensure_column_complete_is_idempotent() {
        let mut world = World::new(&config(-4, 4)).expect("world");
        world.ensure_column_complete(45).expect("complete");
        let before = snapshot(&world, 0, 60);

        world.ensure_column_complete(45).expect("complete");
        assert_eq!(snapshot(&world, 0, 60), before);
    }

    #[test]
    fn carve_on_empty_frontier_is_noop() {
        let mut world = World::blank(&config(1, 9));
        assert_eq!(world.carve(), None);
        assert!(world.walls_considered.is_empty());
    }

    #[test]
    fn perimeter_walls_cannot_be_forced() {
        let mut world = World::new(&config(1, 9)).expect("world");
        let wall = WallCoord::new(Axis::Vertical, 0, 4);
        assert_eq!(
            world.ensure_wall_considered(wall),
            Err(GenerationError::NotRemovable { wall })
        );
    }

    #[test]
    fn unreachable_bounds_surface_exhaustion() {
        let mut world = World::blank(&MazeConfig {
            start: CellCoord::new(-10, 1),
            ..config(1, 9)
        });
        world.annex_square(CellCoord::new(-10, 1));
        assert!(matches!(
            world.generate_through(1),
            Err(GenerationError::FrontierExhausted { .. })
        ));
    }
}
