//! Text rendering of mazes and rollout paths
//!
//! | Symbol | Meaning |
//! |--------|---------|
//! | `#` | wall |
//! | `S` | entrance |
//! | `E` | exit |
//! | `.` | trail left by the agent |
//! | `@` | agent's final position |

use std::{collections::HashSet, fmt};

use crate::{
    maze::{Maze, Position},
    q_learning::Path,
};

impl fmt::Display for Maze {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (y, row) in self.tile_rows().enumerate() {
            let line: String = row.iter().map(|tile| tile.symbol()).collect();
            if y + 1 < self.rows() {
                writeln!(f, "{line}")?;
            } else {
                write!(f, "{line}")?;
            }
        }
        Ok(())
    }
}

/// Render `maze` with entrance/exit markers and, optionally, a rollout path
pub fn render(maze: &Maze, path: Option<&Path>) -> String {
    let trail: HashSet<Position> = path
        .map(|p| p.positions().iter().copied().collect())
        .unwrap_or_default();
    let agent = path.and_then(Path::last);

    let mut out = String::with_capacity(maze.rows() * (maze.columns() + 1));
    for (y, row) in maze.tile_rows().enumerate() {
        for (x, tile) in row.iter().enumerate() {
            let pos = Position::new(x, y);
            let symbol = if Some(pos) == agent {
                '@'
            } else if pos == maze.entrance() {
                'S'
            } else if pos == maze.exit() {
                'E'
            } else if trail.contains(&pos) {
                '.'
            } else {
                tile.symbol()
            };
            out.push(symbol);
        }
        if y + 1 < maze.rows() {
            out.push('\n');
        }
    }
    out
}
