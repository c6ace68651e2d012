#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Endless Maze engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative maze world, and pure systems. Adapters submit [`Command`]
//! values describing desired mutations, the world executes those commands via
//! its `apply` entry point, and then broadcasts [`Event`] values so observers
//! can re-sync. Systems consume event streams, query the world, and respond
//! exclusively with new command batches.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of columns generation stays ahead of the observer by default.
pub const DEFAULT_LOOKAHEAD: u32 = 32;

/// Seed used for the maze's random source when none is configured.
pub const DEFAULT_SEED: u64 = 0x5eed_cafe;

/// Commands that express all permissible maze mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Command {
    /// Discards the current maze and re-seeds it from the configured start cell.
    ResetMaze,
    /// Requests that every column up to the provided one, plus the lookahead
    /// margin, is fully generated.
    EnsureGenerated {
        /// Column the observer currently occupies.
        through_column: i32,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Event {
    /// Announces that wall state changed. Observers must re-query the cells
    /// they care about; no diff is provided.
    MazeChanged,
}

/// Cardinal movement directions available to the observer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
}

impl Direction {
    /// Every direction in clockwise order starting at north.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Column and row delta applied when stepping in this direction.
    #[must_use]
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Self::North => (0, -1),
            Self::East => (1, 0),
            Self::South => (0, 1),
            Self::West => (-1, 0),
        }
    }

    /// Direction obtained by turning a quarter clockwise.
    #[must_use]
    pub const fn clockwise(self) -> Self {
        match self {
            Self::North => Self::East,
            Self::East => Self::South,
            Self::South => Self::West,
            Self::West => Self::North,
        }
    }

    /// Direction obtained by turning a quarter counter-clockwise.
    #[must_use]
    pub const fn counter_clockwise(self) -> Self {
        match self {
            Self::North => Self::West,
            Self::East => Self::North,
            Self::South => Self::East,
            Self::West => Self::South,
        }
    }

    /// Direction pointing the opposite way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::East => Self::West,
            Self::South => Self::North,
            Self::West => Self::East,
        }
    }
}

/// Location of a single maze square expressed as column and row coordinates.
///
/// Columns grow without bound toward the east; rows are bounded by the
/// world's [`Bounds`]. Both components are signed so the strip may start at
/// any offset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: i32,
    row: i32,
}

impl CellCoord {
    /// Creates a new square coordinate.
    #[must_use]
    pub const fn new(column: i32, row: i32) -> Self {
        Self { column, row }
    }

    /// Column index of the square.
    #[must_use]
    pub const fn column(&self) -> i32 {
        self.column
    }

    /// Row index of the square.
    #[must_use]
    pub const fn row(&self) -> i32 {
        self.row
    }

    /// Square adjacent to this one in the provided direction.
    #[must_use]
    pub const fn neighbor(self, direction: Direction) -> Self {
        let (dx, dy) = direction.offset();
        Self::new(self.column.wrapping_add(dx), self.row.wrapping_add(dy))
    }

    /// Wall separating this square from its neighbor in the provided direction.
    #[must_use]
    pub const fn wall_toward(self, direction: Direction) -> WallCoord {
        match direction {
            Direction::West => WallCoord::new(Axis::Vertical, self.column.wrapping_sub(1), self.row),
            Direction::East => WallCoord::new(Axis::Vertical, self.column, self.row),
            Direction::South => WallCoord::new(Axis::Horizontal, self.column, self.row),
            Direction::North => {
                WallCoord::new(Axis::Horizontal, self.column, self.row.wrapping_sub(1))
            }
        }
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.column, self.row)
    }
}

/// Orientation of a wall segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Axis {
    /// Wall at `(x, y)` separating squares `(x, y)` and `(x + 1, y)`.
    Vertical,
    /// Wall at `(x, y)` separating squares `(x, y)` and `(x, y + 1)`.
    Horizontal,
}

impl Axis {
    /// Offset from a wall's coordinate to the second square it separates.
    /// The first square always shares the wall's coordinate.
    #[must_use]
    pub const fn far_side(self) -> (i32, i32) {
        match self {
            Self::Vertical => (1, 0),
            Self::Horizontal => (0, 1),
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vertical => write!(f, "vertical"),
            Self::Horizontal => write!(f, "horizontal"),
        }
    }
}

/// Location of a single wall segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WallCoord {
    axis: Axis,
    column: i32,
    row: i32,
}

impl WallCoord {
    /// Creates a new wall coordinate.
    #[must_use]
    pub const fn new(axis: Axis, column: i32, row: i32) -> Self {
        Self { axis, column, row }
    }

    /// Orientation of the wall.
    #[must_use]
    pub const fn axis(&self) -> Axis {
        self.axis
    }

    /// Column component of the wall coordinate.
    #[must_use]
    pub const fn column(&self) -> i32 {
        self.column
    }

    /// Row component of the wall coordinate.
    #[must_use]
    pub const fn row(&self) -> i32 {
        self.row
    }

    /// The two squares separated by this wall.
    #[must_use]
    pub const fn squares(&self) -> [CellCoord; 2] {
        let (dx, dy) = self.axis.far_side();
        [
            CellCoord::new(self.column, self.row),
            CellCoord::new(self.column.wrapping_add(dx), self.row.wrapping_add(dy)),
        ]
    }
}

impl fmt::Display for WallCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} wall at ({}, {})", self.axis, self.column, self.row)
    }
}

/// Knowledge the world holds about a single wall.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WallState {
    /// The wall has not been generated yet.
    Unknown,
    /// The wall exists and blocks movement.
    Standing,
    /// The wall was carved away, opening a passage.
    Removed,
}

impl WallState {
    /// Converts the wall state into a passability answer, `None` when unknown.
    #[must_use]
    pub const fn passable(self) -> Option<bool> {
        match self {
            Self::Unknown => None,
            Self::Standing => Some(false),
            Self::Removed => Some(true),
        }
    }
}

/// Generation bounds of the maze strip.
///
/// Generation never happens west of `left_column`; rows are inclusive on both
/// ends. There is no eastern limit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bounds {
    left_column: i32,
    top_row: i32,
    bottom_row: i32,
}

impl Bounds {
    /// Creates bounds from the western column and inclusive row range.
    #[must_use]
    pub const fn new(left_column: i32, top_row: i32, bottom_row: i32) -> Self {
        Self {
            left_column,
            top_row,
            bottom_row,
        }
    }

    /// Westernmost generated column.
    #[must_use]
    pub const fn left_column(&self) -> i32 {
        self.left_column
    }

    /// Northernmost generated row.
    #[must_use]
    pub const fn top_row(&self) -> i32 {
        self.top_row
    }

    /// Southernmost generated row.
    #[must_use]
    pub const fn bottom_row(&self) -> i32 {
        self.bottom_row
    }

    /// Reports whether the row span is empty, in which case nothing is generated.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.bottom_row < self.top_row
    }

    /// Iterator over every row inside the bounds, north to south.
    pub fn rows(&self) -> impl Iterator<Item = i32> {
        self.top_row..=self.bottom_row
    }

    /// Reports whether the square lies inside the strip.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column() >= self.left_column
            && cell.row() >= self.top_row
            && cell.row() <= self.bottom_row
    }

    /// Reports whether the wall may ever be carved.
    ///
    /// Vertical walls use an inclusive southern bound while horizontal walls
    /// use a strict one, and both exclude the column west of the strip. The
    /// perimeter (`V(left - 1, y)`, `H(x, top - 1)`, `H(x, bottom)`) is
    /// therefore never removable, while the eastern edge stays open.
    #[must_use]
    pub const fn is_wall_removable(&self, wall: WallCoord) -> bool {
        let column = wall.column() as i64;
        let row = wall.row() as i64;
        let west = self.left_column as i64 - 1;
        let north = self.top_row as i64 - 1;
        let south = self.bottom_row as i64;

        match wall.axis() {
            Axis::Vertical => column > west && row > north && row <= south,
            Axis::Horizontal => column > west && row > north && row < south,
        }
    }
}

impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "columns {}.., rows {}..={}",
            self.left_column, self.top_row, self.bottom_row
        )
    }
}

/// Immutable construction parameters for a maze world.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MazeConfig {
    /// Westernmost column of the strip.
    pub left_column: i32,
    /// Northernmost row of the strip (inclusive).
    pub top_row: i32,
    /// Southernmost row of the strip (inclusive).
    pub bottom_row: i32,
    /// Number of columns generated ahead of the observer.
    pub lookahead: u32,
    /// Square annexed first, the root of the spanning tree.
    pub start: CellCoord,
    /// Seed for the carving random source.
    pub seed: u64,
}

impl Default for MazeConfig {
    fn default() -> Self {
        Self {
            left_column: 0,
            top_row: -4,
            bottom_row: 4,
            lookahead: DEFAULT_LOOKAHEAD,
            start: CellCoord::new(0, 0),
            seed: DEFAULT_SEED,
        }
    }
}

impl MazeConfig {
    /// Generation bounds described by the configuration.
    #[must_use]
    pub const fn bounds(&self) -> Bounds {
        Bounds::new(self.left_column, self.top_row, self.bottom_row)
    }

    /// Checks that the start square can reach the rest of the strip and that
    /// every perimeter wall has a representable coordinate.
    ///
    /// An empty row span is accepted; such a maze simply never generates.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let bounds = self.bounds();
        if bounds.left_column() == i32::MIN
            || bounds.top_row() == i32::MIN
            || bounds.bottom_row() == i32::MAX
        {
            return Err(ConfigError::BoundsAtLimit { bounds });
        }
        if !bounds.is_empty() && !bounds.contains(self.start) {
            return Err(ConfigError::StartOutOfBounds {
                start: self.start,
                bounds,
            });
        }
        Ok(())
    }
}

/// Reasons a maze configuration may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The start square lies outside the generation strip.
    #[error("start square {start} lies outside the maze bounds ({bounds})")]
    StartOutOfBounds {
        /// Configured start square.
        start: CellCoord,
        /// Configured generation bounds.
        bounds: Bounds,
    },
    /// A perimeter wall of the strip would lie past the coordinate range.
    #[error("maze bounds ({bounds}) leave no room for the perimeter walls")]
    BoundsAtLimit {
        /// Configured generation bounds.
        bounds: Bounds,
    },
}

/// Defects detected while carving. Each indicates the spanning tree cannot
/// reach a wall it was required to resolve; the only recovery is a reset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// The frontier emptied before the wall was considered.
    #[error("frontier exhausted before the {wall} was considered")]
    FrontierExhausted {
        /// Wall that was never reached.
        wall: WallCoord,
    },
    /// The wall lies on or outside the perimeter and can never be considered.
    #[error("the {wall} is outside the carvable region")]
    NotRemovable {
        /// Wall that was requested.
        wall: WallCoord,
    },
}

/// Any failure surfaced while constructing or driving a maze world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum MazeError {
    /// The configuration was rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Carving hit a defect.
    #[error(transparent)]
    Generation(#[from] GenerationError),
}
