//! Tabular Q-learning over a maze grid
//!
//! The agent's state is its grid coordinate and its actions are the four unit
//! moves. Each step applies one of two updates:
//!
//! | Move | Reward | Update |
//! |------|--------|--------|
//! | onto the exit | +100 | Q(s,a) ← Q(s,a) + α[r + γ max Q(s',·) − Q(s,a)] |
//! | onto another open tile | −1 | same |
//! | onto a wall or off the grid | −10 | Q(s,a) ← Q(s,a) + α[r − Q(s,a)], agent stays put |
//!
//! An episode starts at `(1, 1)` and ends when the exit is reached. Exploration
//! is ε-greedy with ε decayed once per episode.
//!
//! ## Usage Example
//!
//! ```no_run
//! use qmaze::{app::LearnerConfig, maze::MazeBuilder, q_learning::QLearningAgent};
//!
//! let maze = MazeBuilder::new(8, 8)?.with_seed(3).generate()?;
//! let mut agent = QLearningAgent::new(
//!     &maze,
//!     LearnerConfig::default().with_seed(3), // α=0.1, γ=0.9, ε 1.0 → 0.01
//! )?;
//! let stats = agent.train(1000)?;
//! let path = agent.rollout();
//! assert_eq!(path.first(), Some(maze.start()));
//! # let _ = stats;
//! # Ok::<(), qmaze::Error>(())
//! ```

pub mod action;
pub mod agent;
pub mod q_table;

pub use action::Action;
pub use agent::{
    EpisodeSummary, GOAL_REWARD, Path, QLearningAgent, RolloutOutcome, STEP_PENALTY,
    TrainingStats, Transition, WALL_PENALTY, reward,
};
pub use q_table::{ActionValues, QTable};
