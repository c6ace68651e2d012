#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative maze state for Endless Maze.
//!
//! The world owns an infinite strip of squares that is carved lazily, column
//! by column, just ahead of the observer. Everything west of the generated
//! frontier is frozen; everything east of it does not exist yet.

mod carving;
mod sparse;

use endless_maze_core::{
    Bounds, CellCoord, Command, Event, GenerationError, MazeConfig, MazeError, WallCoord,
    WallState,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::sparse::{SparseRelation, SparseSet};

/// Represents the authoritative Endless Maze world state.
#[derive(Clone, Debug)]
pub struct World {
    bounds: Bounds,
    lookahead: u32,
    start: CellCoord,
    /// First column that has not been fully resolved yet.
    next_column: i32,
    squares: SparseSet<CellCoord>,
    /// `true` while a wall stands, `false` once it was carved away.
    walls: SparseRelation<WallCoord, bool>,
    squares_used: SparseSet<CellCoord>,
    walls_available: SparseSet<WallCoord>,
    walls_considered: SparseSet<WallCoord>,
    rng: ChaCha8Rng,
}

impl World {
    /// Creates a maze world and generates its initial lookahead window.
    pub fn new(config: &MazeConfig) -> Result<Self, MazeError> {
        config.validate()?;
        let mut world = Self::blank(config);
        let mut events = Vec::new();
        world.reset(&mut events)?;
        Ok(world)
    }

    fn blank(config: &MazeConfig) -> Self {
        let bounds = config.bounds();
        Self {
            bounds,
            lookahead: config.lookahead,
            start: config.start,
            next_column: bounds.left_column(),
            squares: SparseSet::new(),
            walls: SparseRelation::new(),
            squares_used: SparseSet::new(),
            walls_available: SparseSet::new(),
            walls_considered: SparseSet::new(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
        }
    }

    /// Discards every square and wall, re-annexes the start square and
    /// generates the initial window. The random source is not rewound, so
    /// successive resets produce different mazes.
    fn reset(&mut self, out_events: &mut Vec<Event>) -> Result<(), GenerationError> {
        self.next_column = self.bounds.left_column();
        self.walls.clear();
        self.squares.clear();
        self.squares_used.clear();
        self.walls_available.clear();
        self.walls_considered.clear();

        if !self.bounds.is_empty() {
            self.annex_square(self.start);
        }
        debug!(start = %self.start, bounds = %self.bounds, "maze reset");

        let _ = self.generate_through(self.bounds.left_column())?;
        out_events.push(Event::MazeChanged);
        Ok(())
    }

    fn ensure_generated(
        &mut self,
        through_column: i32,
        out_events: &mut Vec<Event>,
    ) -> Result<(), GenerationError> {
        if self.generate_through(through_column)? {
            out_events.push(Event::MazeChanged);
        }
        Ok(())
    }

    fn wall_state(&self, wall: WallCoord) -> WallState {
        match self.walls.get(wall) {
            None => WallState::Unknown,
            Some(true) => WallState::Standing,
            Some(false) => WallState::Removed,
        }
    }

    fn last_column(&self) -> Option<i32> {
        if self.next_column > self.bounds.left_column() {
            Some(self.next_column - 1)
        } else {
            None
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// At most one [`Event::MazeChanged`] is appended per command, after all
/// mutation has completed.
pub fn apply(
    world: &mut World,
    command: Command,
    out_events: &mut Vec<Event>,
) -> Result<(), GenerationError> {
    match command {
        Command::ResetMaze => world.reset(out_events),
        Command::EnsureGenerated { through_column } => {
            world.ensure_generated(through_column, out_events)
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::World;
    use endless_maze_core::{Bounds, CellCoord, Direction, WallCoord, WallState};

    /// Generation bounds the world was configured with.
    #[must_use]
    pub fn bounds(world: &World) -> Bounds {
        world.bounds
    }

    /// Root square of the spanning tree.
    #[must_use]
    pub fn start(world: &World) -> CellCoord {
        world.start
    }

    /// Highest fully generated column, or `None` before anything was generated.
    #[must_use]
    pub fn last_column(world: &World) -> Option<i32> {
        world.last_column()
    }

    /// Reports what the world knows about the wall.
    #[must_use]
    pub fn wall_state(world: &World, wall: WallCoord) -> WallState {
        world.wall_state(wall)
    }

    /// Reports whether the observer may step from `cell` toward `direction`.
    ///
    /// Returns `None` when the wall between the squares has not been generated.
    #[must_use]
    pub fn is_passable(world: &World, cell: CellCoord, direction: Direction) -> Option<bool> {
        maze_view(world).is_passable(cell, direction)
    }

    /// Reports whether the square and its bounding walls have been initialized.
    #[must_use]
    pub fn contains_square(world: &World, cell: CellCoord) -> bool {
        world.squares.contains(cell)
    }

    /// Squares annexed into the spanning tree, in annexation-independent order.
    #[must_use]
    pub fn used_squares(world: &World) -> Vec<CellCoord> {
        let mut squares: Vec<CellCoord> = world.squares_used.iter().collect();
        squares.sort();
        squares
    }

    /// Captures a read-only view of the maze for systems and renderers.
    #[must_use]
    pub fn maze_view(world: &World) -> MazeView<'_> {
        MazeView { world }
    }

    /// Read-only view into the generated maze.
    #[derive(Clone, Copy, Debug)]
    pub struct MazeView<'a> {
        world: &'a World,
    }

    impl MazeView<'_> {
        /// Generation bounds of the strip.
        #[must_use]
        pub fn bounds(&self) -> Bounds {
            self.world.bounds
        }

        /// Highest fully generated column, if any.
        #[must_use]
        pub fn last_column(&self) -> Option<i32> {
            self.world.last_column()
        }

        /// Reports what the world knows about the wall.
        #[must_use]
        pub fn wall_state(&self, wall: WallCoord) -> WallState {
            self.world.wall_state(wall)
        }

        /// Reports whether a step from `cell` toward `direction` is open,
        /// `None` when the wall has not been generated.
        #[must_use]
        pub fn is_passable(&self, cell: CellCoord, direction: Direction) -> Option<bool> {
            self.world.wall_state(cell.wall_toward(direction)).passable()
        }
    }
}
