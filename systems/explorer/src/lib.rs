#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic explorer system that walks the maze one square at a time.
//!
//! The explorer plays the observer: before each step it asks the world whether
//! the wall ahead is open, and after each step it requests generation through
//! its new column so the maze always stays ahead of it.

use endless_maze_core::{CellCoord, Command, Direction};
use endless_maze_world::query::MazeView;
use tracing::{trace, warn};

/// Result of a single explorer step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// The explorer moved one square in the given direction.
    Moved(Direction),
    /// Every wall around the explorer is standing.
    Enclosed,
    /// A wall that had to be checked was never generated.
    Ungenerated(Direction),
}

/// Right-hand wall follower. In a perfect maze this walks an Euler tour of
/// the spanning tree, so every finite dead end is left behind eventually and
/// the explorer keeps drifting east.
#[derive(Clone, Debug)]
pub struct Explorer {
    position: CellCoord,
    facing: Direction,
    steps: u64,
    furthest_column: i32,
}

impl Explorer {
    /// Places a new explorer on `start`, facing east.
    #[must_use]
    pub fn new(start: CellCoord) -> Self {
        Self {
            position: start,
            facing: Direction::East,
            steps: 0,
            furthest_column: start.column(),
        }
    }

    /// Square currently occupied by the explorer.
    #[must_use]
    pub fn position(&self) -> CellCoord {
        self.position
    }

    /// Direction of the most recent move.
    #[must_use]
    pub fn facing(&self) -> Direction {
        self.facing
    }

    /// Number of successful moves so far.
    #[must_use]
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Easternmost column the explorer has visited.
    #[must_use]
    pub fn furthest_column(&self) -> i32 {
        self.furthest_column
    }

    /// Takes one step and requests generation through the new column.
    pub fn step(&mut self, maze: MazeView<'_>, out: &mut Vec<Command>) -> StepOutcome {
        let candidates = [
            self.facing.clockwise(),
            self.facing,
            self.facing.counter_clockwise(),
            self.facing.opposite(),
        ];

        for direction in candidates {
            match maze.is_passable(self.position, direction) {
                Some(true) => {
                    self.position = self.position.neighbor(direction);
                    self.facing = direction;
                    self.steps += 1;
                    self.furthest_column = self.furthest_column.max(self.position.column());
                    trace!(position = %self.position, ?direction, "explorer moved");
                    out.push(Command::EnsureGenerated {
                        through_column: self.position.column(),
                    });
                    return StepOutcome::Moved(direction);
                }
                Some(false) => {}
                None => {
                    warn!(position = %self.position, ?direction, "explorer reached ungenerated wall");
                    return StepOutcome::Ungenerated(direction);
                }
            }
        }

        StepOutcome::Enclosed
    }
}
