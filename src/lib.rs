//! Maze generation and tabular Q-learning
//!
//! This crate provides:
//! - Randomised depth-first maze carving on a doubled wall/cell grid
//! - A Q-learning agent that learns to walk from the start cell to the exit
//! - Greedy rollout of the learned policy
//! - Observer hooks for progress display, logging and cancellation
//! - A text renderer and the `qmaze` command-line interface

pub mod app;
pub mod cli;
pub mod error;
pub mod maze;
pub mod pipeline;
pub mod ports;
pub mod q_learning;
pub mod render;

pub use app::LearnerConfig;
pub use error::{Error, Result};
pub use maze::{CarveStep, Maze, MazeBuilder, Position, Tile};
pub use pipeline::{TrainingConfig, TrainingPipeline, TrainingResult};
pub use ports::Observer;
pub use q_learning::{Action, Path, QLearningAgent, QTable, RolloutOutcome, TrainingStats};
