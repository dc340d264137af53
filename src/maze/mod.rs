//! Maze generation
//!
//! [`MazeBuilder`] carves a connected maze into an all-wall grid and hands back
//! an immutable [`Maze`]. The learner only ever reads it.

pub mod builder;
pub mod grid;

pub use builder::{
    CarveStep, LOOP_PROBABILITY, MAX_DIMENSION, MIN_DIMENSION, MazeBuilder, generate,
    random_dimension,
};
pub use grid::{Maze, Position, Tile};
