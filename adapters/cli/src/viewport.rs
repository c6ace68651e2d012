//! ASCII viewport that mirrors a window of the maze.
//!
//! The viewport never receives wall diffs. Whenever the world reports
//! [`Event::MazeChanged`] or the window scrolls, every wall inside the window
//! is queried again.

use endless_maze_core::{Axis, CellCoord, Event, WallCoord, WallState};
use endless_maze_world::query::MazeView;

const CELL_WIDTH: usize = 3;

#[derive(Debug)]
pub(crate) struct Viewport {
    width: u32,
    first_column: Option<i32>,
    lines: Vec<String>,
    dirty: bool,
}

impl Viewport {
    pub(crate) fn new(width: u32) -> Self {
        Self {
            width: width.max(1),
            first_column: None,
            lines: Vec::new(),
            dirty: true,
        }
    }

    /// Marks the cached frame stale when the maze changed.
    pub(crate) fn observe(&mut self, events: &[Event]) {
        if events.iter().any(|event| matches!(event, Event::MazeChanged)) {
            self.dirty = true;
        }
    }

    /// Scrolls so `focus` sits a third of the way into the window and
    /// re-queries the maze if anything changed since the last sync.
    pub(crate) fn sync(&mut self, maze: MazeView<'_>, focus: CellCoord) {
        let lead = i32::try_from(self.width / 3).unwrap_or(0);
        let first_column = focus
            .column()
            .saturating_sub(lead)
            .max(maze.bounds().left_column().saturating_sub(1));

        if !self.dirty && self.first_column == Some(first_column) {
            return;
        }

        self.first_column = Some(first_column);
        self.lines = render(maze, first_column, self.width);
        self.dirty = false;
    }

    /// Draws the cached frame with the explorer overlaid on `focus`.
    pub(crate) fn draw(&self, maze: MazeView<'_>, focus: CellCoord) -> String {
        let mut lines = self.lines.clone();
        if let Some(first_column) = self.first_column {
            let bounds = maze.bounds();
            let column = i64::from(focus.column()) - i64::from(first_column);
            let row = i64::from(focus.row()) - i64::from(bounds.top_row());
            let in_window = (0..i64::from(self.width)).contains(&column)
                && (0..=i64::from(bounds.bottom_row()) - i64::from(bounds.top_row()))
                    .contains(&row);
            if in_window {
                let line = usize::try_from(row * 2 + 1).unwrap_or(0);
                let offset = usize::try_from(column).unwrap_or(0) * CELL_WIDTH + 1;
                if let Some(text) = lines.get_mut(line) {
                    text.replace_range(offset..offset + 1, "@");
                }
            }
        }
        lines.join("\n")
    }
}

fn render(maze: MazeView<'_>, first_column: i32, width: u32) -> Vec<String> {
    let bounds = maze.bounds();
    if bounds.is_empty() {
        return Vec::new();
    }

    let columns: Vec<i32> = (0..width)
        .filter_map(|offset| first_column.checked_add(i32::try_from(offset).ok()?))
        .collect();
    let mut lines = Vec::new();

    for row in bounds.rows() {
        lines.push(horizontal_line(maze, &columns, row - 1));

        let mut line = String::new();
        for &column in &columns {
            line.push(vertical_glyph(
                maze.wall_state(WallCoord::new(Axis::Vertical, column - 1, row)),
            ));
            line.push_str("  ");
        }
        if let Some(&last) = columns.last() {
            line.push(vertical_glyph(
                maze.wall_state(WallCoord::new(Axis::Vertical, last, row)),
            ));
        }
        lines.push(line);
    }
    lines.push(horizontal_line(maze, &columns, bounds.bottom_row()));
    lines
}

fn horizontal_line(maze: MazeView<'_>, columns: &[i32], wall_row: i32) -> String {
    let mut line = String::new();
    for &column in columns {
        line.push('+');
        line.push_str(horizontal_glyph(
            maze.wall_state(WallCoord::new(Axis::Horizontal, column, wall_row)),
        ));
    }
    line.push('+');
    line
}

fn horizontal_glyph(state: WallState) -> &'static str {
    match state {
        WallState::Standing => "--",
        WallState::Removed => "  ",
        WallState::Unknown => "..",
    }
}

fn vertical_glyph(state: WallState) -> char {
    match state {
        WallState::Standing => '|',
        WallState::Removed => ' ',
        WallState::Unknown => ':',
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use endless_maze_core::MazeConfig;
    use endless_maze_world::{self as world, query, World};

    fn small_world() -> World {
        World::new(&MazeConfig {
            top_row: 0,
            bottom_row: 2,
            lookahead: 4,
            ..MazeConfig::default()
        })
        .expect("world")
    }

    #[test]
    fn frame_has_two_lines_per_row_plus_border() {
        let world = small_world();
        let mut viewport = Viewport::new(6);
        viewport.sync(query::maze_view(&world), CellCoord::new(0, 0));

        let frame = viewport.draw(query::maze_view(&world), CellCoord::new(0, 0));
        let lines: Vec<&str> = frame.lines().collect();
        assert_eq!(lines.len(), 7);
        for line in &lines {
            assert_eq!(line.chars().count(), 6 * CELL_WIDTH + 1);
        }
        assert!(lines[0].starts_with("+.."), "{}", lines[0]);
        assert!(lines[1].contains('@'));
        assert!(!lines[0].contains(' '), "north border is closed");
        assert!(!lines[6].contains(' '), "south border is closed");
    }

    #[test]
    fn ungenerated_columns_render_as_unknown() {
        let world = small_world();
        let mut viewport = Viewport::new(60);
        viewport.sync(query::maze_view(&world), CellCoord::new(0, 1));
        let frame = viewport.draw(query::maze_view(&world), CellCoord::new(0, 1));
        let top = frame.lines().next().expect("top border");
        assert!(top.ends_with("+..+"), "{top}");
    }

    #[test]
    fn change_events_trigger_resync() {
        let mut world = small_world();
        let mut viewport = Viewport::new(12);
        viewport.sync(query::maze_view(&world), CellCoord::new(0, 1));
        let before = viewport.draw(query::maze_view(&world), CellCoord::new(0, 1));

        let mut events = Vec::new();
        world::apply(
            &mut world,
            endless_maze_core::Command::EnsureGenerated { through_column: 6 },
            &mut events,
        )
        .expect("generate");

        viewport.sync(query::maze_view(&world), CellCoord::new(0, 1));
        assert_eq!(
            viewport.draw(query::maze_view(&world), CellCoord::new(0, 1)),
            before,
            "stale until notified"
        );

        viewport.observe(&events);
        viewport.sync(query::maze_view(&world), CellCoord::new(0, 1));
        assert_ne!(
            viewport.draw(query::maze_view(&world), CellCoord::new(0, 1)),
            before
        );
    }
}
