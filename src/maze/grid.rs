//! Occupancy grid shared by the maze builder and the learner
//!
//! A maze of `W×H` logical cells is stored at doubled resolution as a
//! `(2W+1)×(2H+1)` grid, so that walls between cells are addressable tiles of
//! their own. Logical cell `(x, y)` lives at grid coordinate `(2x+1, 2y+1)`.

use std::{collections::HashSet, fmt};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Occupancy of a single grid tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tile {
    Wall,
    Open,
}

impl Tile {
    /// Character used by the text layout format
    pub fn symbol(self) -> char {
        match self {
            Tile::Wall => '#',
            Tile::Open => ' ',
        }
    }
}

/// A grid coordinate (column `x`, row `y`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Apply a signed delta, returning `None` on underflow
    pub fn offset(self, dx: isize, dy: isize) -> Option<Self> {
        Some(Self {
            x: self.x.checked_add_signed(dx)?,
            y: self.y.checked_add_signed(dy)?,
        })
    }
}

impl From<(usize, usize)> for Position {
    fn from((x, y): (usize, usize)) -> Self {
        Self::new(x, y)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Generated maze: occupancy grid plus fixed entrance and exit
///
/// Entrance is always `(0, 1)` on the left edge and exit `(2W, 2H-1)` on the
/// right edge. Once handed out by the builder a maze is never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Maze {
    width: usize,
    height: usize,
    tiles: Vec<Tile>,
    entrance: Position,
    exit: Position,
}

impl Maze {
    /// All-wall grid for a `width×height` logical maze
    pub(crate) fn filled(width: usize, height: usize) -> Self {
        let columns = 2 * width + 1;
        let rows = 2 * height + 1;
        Self {
            width,
            height,
            tiles: vec![Tile::Wall; columns * rows],
            entrance: Position::new(0, 1),
            exit: Position::new(2 * width, (2 * height).saturating_sub(1)),
        }
    }

    /// Parse a maze from its text layout (`#` wall, space open)
    ///
    /// `S`, `E`, `.` and `@` are accepted as open tiles so rendered output can
    /// be read back. Entrance and exit are derived from the dimensions and are
    /// not forced open.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self> {
        let row_count = rows.len();
        if row_count < 3 || row_count % 2 == 0 {
            return Err(Error::InvalidLayout {
                message: format!("expected an odd number of rows (at least 3), got {row_count}"),
            });
        }

        let columns = rows[0].as_ref().chars().count();
        if columns < 3 || columns % 2 == 0 {
            return Err(Error::InvalidLayout {
                message: format!("expected an odd number of columns (at least 3), got {columns}"),
            });
        }

        let mut maze = Self::filled((columns - 1) / 2, (row_count - 1) / 2);
        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            let len = row.chars().count();
            if len != columns {
                return Err(Error::InvalidLayout {
                    message: format!("row {y} has {len} columns, expected {columns}"),
                });
            }
            for (x, ch) in row.chars().enumerate() {
                match ch {
                    '#' => {}
                    ' ' | 'S' | 'E' | '.' | '@' => maze.open(Position::new(x, y)),
                    other => {
                        return Err(Error::InvalidLayout {
                            message: format!("unexpected character '{other}' at ({x}, {y})"),
                        });
                    }
                }
            }
        }
        Ok(maze)
    }

    /// Logical width (cells)
    pub fn width(&self) -> usize {
        self.width
    }

    /// Logical height (cells)
    pub fn height(&self) -> usize {
        self.height
    }

    /// Grid columns, `2W+1`
    pub fn columns(&self) -> usize {
        2 * self.width + 1
    }

    /// Grid rows, `2H+1`
    pub fn rows(&self) -> usize {
        2 * self.height + 1
    }

    pub fn entrance(&self) -> Position {
        self.entrance
    }

    pub fn exit(&self) -> Position {
        self.exit
    }

    /// First interior open cell, where every episode and rollout begins
    pub fn start(&self) -> Position {
        Self::cell_center(0, 0)
    }

    /// Grid coordinate of logical cell `(x, y)`
    pub const fn cell_center(x: usize, y: usize) -> Position {
        Position::new(2 * x + 1, 2 * y + 1)
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.x < self.columns() && pos.y < self.rows()
    }

    pub fn tile(&self, pos: Position) -> Option<Tile> {
        if self.contains(pos) {
            Some(self.tiles[self.index(pos)])
        } else {
            None
        }
    }

    /// In bounds and open; the only tiles the agent may occupy
    pub fn is_open(&self, pos: Position) -> bool {
        self.tile(pos) == Some(Tile::Open)
    }

    /// In bounds and a wall
    pub fn is_wall(&self, pos: Position) -> bool {
        self.tile(pos) == Some(Tile::Wall)
    }

    /// Destination of a move from `pos`, if it lands on an open tile
    pub fn step(&self, pos: Position, dx: isize, dy: isize) -> Option<Position> {
        pos.offset(dx, dy).filter(|&next| self.is_open(next))
    }

    /// Tiles of row `y`, left to right; `None` past the last row
    pub fn row(&self, y: usize) -> Option<&[Tile]> {
        let columns = self.columns();
        let start = y.checked_mul(columns)?;
        self.tiles.get(start..start.checked_add(columns)?)
    }

    /// Every row of tiles, top to bottom
    pub fn tile_rows(&self) -> impl ExactSizeIterator<Item = &[Tile]> + '_ {
        self.tiles.chunks(self.columns())
    }

    /// Every grid coordinate in row-major order
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.rows()).flat_map(move |y| (0..self.columns()).map(move |x| Position::new(x, y)))
    }

    pub fn open_count(&self) -> usize {
        self.tiles.iter().filter(|&&tile| tile == Tile::Open).count()
    }

    /// Open tiles reachable from `from` by 4-connected moves
    pub fn reachable_from(&self, from: Position) -> HashSet<Position> {
        let mut seen = HashSet::new();
        if !self.is_open(from) {
            return seen;
        }

        let mut frontier = vec![from];
        seen.insert(from);
        while let Some(pos) = frontier.pop() {
            for (dx, dy) in [(0, -1), (0, 1), (-1, 0), (1, 0)] {
                if let Some(next) = self.step(pos, dx, dy)
                    && seen.insert(next)
                {
                    frontier.push(next);
                }
            }
        }
        seen
    }

    pub(crate) fn open(&mut self, pos: Position) {
        let idx = self.index(pos);
        self.tiles[idx] = Tile::Open;
    }

    fn index(&self, pos: Position) -> usize {
        pos.y * self.columns() + pos.x
    }
}
