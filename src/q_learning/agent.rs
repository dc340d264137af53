//! Q-learning agent for maze navigation
//!
//! The agent moves one grid tile at a time, so a move can target a wall. Such
//! a move is rejected (the agent stays put) but still updates the Q-table with
//! the wall penalty, teaching the agent not to try it again from that tile.

use std::collections::HashSet;

use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{
    Result,
    app::LearnerConfig,
    maze::{Maze, Position},
    ports::{NoopObserver, Observer},
    q_learning::{action::Action, q_table::QTable},
};

/// Reward for stepping onto the exit
pub const GOAL_REWARD: f64 = 100.0;
/// Reward for targeting a wall or leaving the grid
pub const WALL_PENALTY: f64 = -10.0;
/// Reward for any other move onto an open tile
pub const STEP_PENALTY: f64 = -1.0;

/// Reward for arriving at `position`
pub fn reward(maze: &Maze, position: Position) -> f64 {
    if position == maze.exit() {
        GOAL_REWARD
    } else if !maze.is_open(position) {
        WALL_PENALTY
    } else {
        STEP_PENALTY
    }
}

fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// One learning step, reported after its update has been applied
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub episode: usize,
    /// Step index within the episode (0-based)
    pub step: usize,
    pub state: Position,
    pub action: Action,
    /// Where the agent ended up; `None` when the move was rejected
    pub next_state: Option<Position>,
    pub reward: f64,
    /// Q(state, action) after the update
    pub q_value: f64,
}

/// Outcome of a single training episode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeSummary {
    pub episode: usize,
    pub steps: usize,
    pub total_reward: f64,
    pub reached_exit: bool,
    /// Exploration rate after this episode's decay
    pub epsilon: f64,
}

/// Aggregate statistics for one call to [`QLearningAgent::train`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingStats {
    pub episodes_run: usize,
    pub total_steps: usize,
    pub successful_episodes: usize,
    pub truncated_episodes: usize,
    pub final_epsilon: f64,
    pub cancelled: bool,
}

impl TrainingStats {
    fn record(&mut self, summary: &EpisodeSummary) {
        self.episodes_run += 1;
        self.total_steps += summary.steps;
        if summary.reached_exit {
            self.successful_episodes += 1;
        } else {
            self.truncated_episodes += 1;
        }
    }
}

/// Why a greedy rollout ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RolloutOutcome {
    /// The path ends on the exit
    Reached,
    /// The last position has no Q-table row
    Unlearned,
    /// The greedy move from the last position is rejected
    Blocked,
    /// The greedy move would return to a position already on the path
    Cycle,
}

/// Positions visited by a greedy rollout, starting at `(1, 1)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Path {
    positions: Vec<Position>,
    outcome: RolloutOutcome,
}

impl Path {
    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    pub fn outcome(&self) -> RolloutOutcome {
        self.outcome
    }

    pub fn reached_exit(&self) -> bool {
        self.outcome == RolloutOutcome::Reached
    }

    pub fn first(&self) -> Option<Position> {
        self.positions.first().copied()
    }

    pub fn last(&self) -> Option<Position> {
        self.positions.last().copied()
    }

    /// Number of positions, including the start
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Moves taken, one fewer than the number of positions
    pub fn moves(&self) -> usize {
        self.positions.len().saturating_sub(1)
    }
}

/// Greedy walk over a trained Q-table
struct GreedyWalk<'a> {
    maze: &'a Maze,
    q_table: &'a QTable,
    current: Position,
    seen: HashSet<Position>,
    outcome: Option<RolloutOutcome>,
}

impl<'a> GreedyWalk<'a> {
    fn new(maze: &'a Maze, q_table: &'a QTable) -> Self {
        let start = maze.start();
        Self {
            maze,
            q_table,
            current: start,
            seen: HashSet::from([start]),
            outcome: None,
        }
    }

    fn stop(&mut self, outcome: RolloutOutcome) -> Option<Position> {
        self.outcome = Some(outcome);
        None
    }

    fn into_outcome(self) -> RolloutOutcome {
        self.outcome.unwrap_or(RolloutOutcome::Reached)
    }
}

impl Iterator for GreedyWalk<'_> {
    type Item = Position;

    fn next(&mut self) -> Option<Position> {
        if self.outcome.is_some() {
            return None;
        }
        if self.current == self.maze.exit() {
            return self.stop(RolloutOutcome::Reached);
        }
        let Some(action) = self.q_table.greedy_action(self.current) else {
            return self.stop(RolloutOutcome::Unlearned);
        };
        let (dx, dy) = action.delta();
        let Some(next) = self.maze.step(self.current, dx, dy) else {
            return self.stop(RolloutOutcome::Blocked);
        };
        if !self.seen.insert(next) {
            return self.stop(RolloutOutcome::Cycle);
        }
        self.current = next;
        Some(next)
    }
}

/// Tabular Q-learning agent bound to one maze
///
/// The maze is borrowed read-only; the agent owns its Q-table and resets it
/// at the start of every [`train`](Self::train) call.
///
/// # Examples
///
/// ```no_run
/// use qmaze::{app::LearnerConfig, maze, q_learning::QLearningAgent};
///
/// let maze = maze::generate(6, 6, Some(1))?;
/// let mut agent = QLearningAgent::new(&maze, LearnerConfig::default().with_seed(1))?;
/// agent.train(1000)?;
/// let path = agent.rollout();
/// println!("{} moves, reached exit: {}", path.moves(), path.reached_exit());
/// # Ok::<(), qmaze::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct QLearningAgent<'m> {
    maze: &'m Maze,
    config: LearnerConfig,
    q_table: QTable,
    epsilon: f64,
    rng: StdRng,
}

impl<'m> QLearningAgent<'m> {
    /// Create an agent for `maze`
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if a hyperparameter is out of range.
    pub fn new(maze: &'m Maze, config: LearnerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            maze,
            q_table: QTable::new(config.learning_rate, config.discount_factor),
            epsilon: config.epsilon_start,
            rng: build_rng(config.seed),
            config,
        })
    }

    pub fn maze(&self) -> &'m Maze {
        self.maze
    }

    pub fn config(&self) -> &LearnerConfig {
        &self.config
    }

    pub fn q_table(&self) -> &QTable {
        &self.q_table
    }

    /// Current exploration rate
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Train from scratch for `episodes` episodes
    pub fn train(&mut self, episodes: usize) -> Result<TrainingStats> {
        self.train_observed(episodes, &mut NoopObserver)
    }

    /// Train from scratch, reporting every step and episode to `observer`
    ///
    /// The Q-table, epsilon and (when seeded) the random source are reset
    /// first, so nothing carries over from an earlier run.
    pub fn train_observed(
        &mut self,
        episodes: usize,
        observer: &mut dyn Observer,
    ) -> Result<TrainingStats> {
        self.reset();
        info!(
            episodes,
            width = self.maze.width(),
            height = self.maze.height(),
            "training started"
        );
        observer.on_training_start(episodes, self.maze)?;

        let mut stats = TrainingStats::default();
        for episode in 0..episodes {
            if observer.should_stop() {
                warn!(episode, "training cancelled before completion");
                stats.cancelled = true;
                break;
            }
            let summary = self.run_episode(episode, observer)?;
            debug!(
                episode,
                steps = summary.steps,
                reached_exit = summary.reached_exit,
                epsilon = summary.epsilon,
                "episode finished"
            );
            stats.record(&summary);
        }
        stats.final_epsilon = self.epsilon;

        if stats.truncated_episodes > 0 {
            warn!(
                truncated = stats.truncated_episodes,
                max_steps = ?self.config.max_steps_per_episode,
                "episodes hit the step cap before reaching the exit"
            );
        }
        observer.on_training_end(stats.episodes_run)?;
        info!(
            episodes = stats.episodes_run,
            total_steps = stats.total_steps,
            q_states = self.q_table.size(),
            "training finished"
        );
        Ok(stats)
    }

    /// Greedy walk from `(1, 1)` using the learned values
    pub fn rollout(&self) -> Path {
        let mut walk = GreedyWalk::new(self.maze, &self.q_table);
        let mut positions = vec![self.maze.start()];
        positions.extend(walk.by_ref());
        Path {
            positions,
            outcome: walk.into_outcome(),
        }
    }

    /// Greedy walk, reporting each position to `observer` as it is taken
    pub fn rollout_observed(&self, observer: &mut dyn Observer) -> Result<Path> {
        let start = self.maze.start();
        observer.on_rollout_step(0, start, self.maze)?;

        let mut walk = GreedyWalk::new(self.maze, &self.q_table);
        let mut positions = vec![start];
        for position in walk.by_ref() {
            positions.push(position);
            observer.on_rollout_step(positions.len() - 1, position, self.maze)?;
        }

        let path = Path {
            positions,
            outcome: walk.into_outcome(),
        };
        info!(moves = path.moves(), outcome = ?path.outcome(), "rollout finished");
        Ok(path)
    }

    fn reset(&mut self) {
        self.q_table.reset();
        self.epsilon = self.config.epsilon_start;
        if let Some(seed) = self.config.seed {
            self.rng = StdRng::seed_from_u64(seed);
        }
    }

    fn run_episode(
        &mut self,
        episode: usize,
        observer: &mut dyn Observer,
    ) -> Result<EpisodeSummary> {
        observer.on_episode_start(episode)?;

        let goal = self.maze.exit();
        let mut state = self.maze.start();
        let mut steps = 0;
        let mut total_reward = 0.0;
        let mut reached_exit = false;

        loop {
            if let Some(max_steps) = self.config.max_steps_per_episode
                && steps >= max_steps
            {
                break;
            }

            let action = self.select_action(state);
            let (next_state, reward) = self.apply(state, action);
            let transition = Transition {
                episode,
                step: steps,
                state,
                action,
                next_state,
                reward,
                q_value: self.q_table.value(state, action),
            };
            steps += 1;
            total_reward += reward;
            observer.on_transition(&transition)?;

            if let Some(next) = next_state {
                state = next;
                if next == goal {
                    reached_exit = true;
                    break;
                }
            }
        }

        self.decay_epsilon();
        let summary = EpisodeSummary {
            episode,
            steps,
            total_reward,
            reached_exit,
            epsilon: self.epsilon,
        };
        observer.on_episode_end(&summary)?;
        Ok(summary)
    }

    /// ε-greedy action selection
    fn select_action(&mut self, state: Position) -> Action {
        if self.rng.random::<f64>() < self.epsilon {
            return self.random_action();
        }
        match self.q_table.greedy_action(state) {
            Some(action) => action,
            None => self.random_action(),
        }
    }

    fn random_action(&mut self) -> Action {
        Action::ALL[self.rng.random_range(0..Action::COUNT)]
    }

    /// Take `action` from `state` and apply the matching update
    ///
    /// Returns the new position (`None` if the move was rejected) and the
    /// reward used.
    fn apply(&mut self, state: Position, action: Action) -> (Option<Position>, f64) {
        let (dx, dy) = action.delta();
        match self.maze.step(state, dx, dy) {
            Some(next) => {
                let reward = reward(self.maze, next);
                self.q_table.q_learning_update(state, action, reward, next);
                (Some(next), reward)
            }
            None => {
                self.q_table.rejected_move_update(state, action, WALL_PENALTY);
                (None, WALL_PENALTY)
            }
        }
    }

    /// Decay epsilon after episode
    fn decay_epsilon(&mut self) {
        self.epsilon = (self.epsilon * self.config.epsilon_decay).max(self.config.min_epsilon);
    }
}
