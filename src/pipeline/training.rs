//! Training pipeline: generate a maze, train on it, roll the policy out

use rand::{SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    Result,
    app::LearnerConfig,
    maze::{Maze, MazeBuilder, random_dimension},
    ports::{Observer, ObserverSet},
    q_learning::{Path, QLearningAgent, TrainingStats},
};

/// Training configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Logical maze width; drawn from 6..=15 when unset
    pub width: Option<usize>,

    /// Logical maze height; drawn from 6..=15 when unset
    pub height: Option<usize>,

    /// Number of training episodes
    pub episodes: usize,

    /// Random seed for the whole run
    pub seed: Option<u64>,

    /// Learner hyperparameters
    pub learner: LearnerConfig,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            width: None,
            height: None,
            episodes: 1000,
            seed: None,
            learner: LearnerConfig::default(),
        }
    }
}

impl TrainingConfig {
    /// Seed for the `cycle`-th regeneration of a seeded run
    ///
    /// The maze uses this seed and the learner the next one up, so cycles
    /// are spaced two apart.
    fn cycle_seed(&self, cycle: usize) -> Option<u64> {
        self.seed
            .map(|seed| seed.wrapping_add(2 * cycle as u64))
    }
}

/// Result of one generate → train → rollout cycle
#[derive(Debug, Clone, Serialize)]
pub struct TrainingResult {
    /// Maze the agent was trained on
    #[serde(skip)]
    pub maze: Maze,

    /// Logical maze width
    pub width: usize,

    /// Logical maze height
    pub height: usize,

    /// Seed used for maze generation, if any
    pub seed: Option<u64>,

    /// Training statistics
    pub stats: TrainingStats,

    /// Number of states in the final Q-table
    pub q_table_size: usize,

    /// Greedy rollout after training
    pub path: Path,
}

impl TrainingResult {
    /// Save result to JSON file
    pub fn save<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }
}

/// Training pipeline for a fresh maze and learner per cycle
///
/// Nothing carries over between cycles: each builds a new maze and a new
/// agent. Observers stay registered for the pipeline's lifetime and see the
/// events of every cycle in order.
pub struct TrainingPipeline {
    config: TrainingConfig,
    observers: ObserverSet,
}

impl TrainingPipeline {
    /// Create a new training pipeline
    pub fn new(config: TrainingConfig) -> Self {
        Self {
            config,
            observers: ObserverSet::new(),
        }
    }

    /// Add an observer to the pipeline
    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Run a single cycle
    pub fn run(&mut self) -> Result<TrainingResult> {
        self.run_cycle(0)
    }

    /// Run `cycles` independent cycles, as if "new maze" were pressed between them
    pub fn run_cycles(&mut self, cycles: usize) -> Result<Vec<TrainingResult>> {
        (0..cycles).map(|cycle| self.run_cycle(cycle)).collect()
    }

    fn run_cycle(&mut self, cycle: usize) -> Result<TrainingResult> {
        let seed = self.config.cycle_seed(cycle);
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        let width = self
            .config
            .width
            .unwrap_or_else(|| random_dimension(&mut rng));
        let height = self
            .config
            .height
            .unwrap_or_else(|| random_dimension(&mut rng));

        let mut builder = MazeBuilder::new(width, height)?;
        if let Some(seed) = seed {
            builder = builder.with_seed(seed);
        }
        info!(cycle, width, height, seed = ?seed, "generating maze");
        let maze = builder.generate_observed(&mut self.observers)?;

        let mut learner = self.config.learner.clone();
        if learner.seed.is_none() {
            learner.seed = seed.map(|seed| seed.wrapping_add(1));
        }

        let (stats, path, q_table_size) = {
            let mut agent = QLearningAgent::new(&maze, learner)?;
            let stats = agent.train_observed(self.config.episodes, &mut self.observers)?;
            let path = agent.rollout_observed(&mut self.observers)?;
            (stats, path, agent.q_table().size())
        };

        Ok(TrainingResult {
            maze,
            width,
            height,
            seed,
            stats,
            q_table_size,
            path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::observers::StopAfter;

    fn config() -> TrainingConfig {
        TrainingConfig {
            width: Some(6),
            height: Some(7),
            episodes: 40,
            seed: Some(42),
            learner: LearnerConfig::default(),
        }
    }

    #[test]
    fn test_training_pipeline() {
        let mut pipeline = TrainingPipeline::new(config());
        let result = pipeline.run().unwrap();

        assert_eq!((result.width, result.height), (6, 7));
        assert_eq!(result.stats.episodes_run, 40);
        assert_eq!(result.path.first(), Some(result.maze.start()));
        assert!(result.q_table_size > 0);
    }

    #[test]
    fn test_seeded_pipeline_is_reproducible() {
        let first = TrainingPipeline::new(config()).run().unwrap();
        let second = TrainingPipeline::new(config()).run().unwrap();
        assert_eq!(first.maze, second.maze);
        assert_eq!(first.stats, second.stats);
        assert_eq!(first.path, second.path);
    }

    #[test]
    fn test_cycle_seeds_are_spaced_two_apart() {
        let results = TrainingPipeline::new(config()).run_cycles(2).unwrap();
        assert_eq!(results[0].seed, Some(42));
        assert_eq!(results[1].seed, Some(44));
        assert_eq!(results[1].maze, crate::maze::generate(6, 7, Some(44)).unwrap());

        let learner = LearnerConfig::default().with_seed(45);
        let mut agent = QLearningAgent::new(&results[1].maze, learner).unwrap();
        assert_eq!(agent.train(40).unwrap(), results[1].stats);
    }

    #[test]
    fn test_random_dimensions_in_range() {
        let config = TrainingConfig {
            width: None,
            height: None,
            episodes: 1,
            seed: Some(9),
            learner: LearnerConfig::default(),
        };
        let results = TrainingPipeline::new(config).run_cycles(3).unwrap();
        assert_eq!(results.len(), 3);
        for result in &results {
            assert!((6..=15).contains(&result.width));
            assert!((6..=15).contains(&result.height));
        }
        assert_ne!(results[0].seed, results[1].seed);
    }

    #[test]
    fn test_invalid_dimension_fails_before_training() {
        let config = TrainingConfig {
            width: Some(3),
            ..config()
        };
        let err = TrainingPipeline::new(config).run().unwrap_err();
        assert!(matches!(err, crate::Error::InvalidDimension { .. }));
    }

    #[test]
    fn test_save_writes_json_without_grid() {
        let result = TrainingPipeline::new(config()).run().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("result.json");
        result.save(&path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["width"], 6);
        assert_eq!(value["stats"]["episodes_run"], 40);
        assert!(value.get("maze").is_none());
        assert!(value["path"]["positions"].is_array());
    }

    #[test]
    fn test_observer_can_cancel_between_episodes() {
        let mut pipeline =
            TrainingPipeline::new(config()).with_observer(Box::new(StopAfter::new(5)));
        let result = pipeline.run().unwrap();
        assert_eq!(result.stats.episodes_run, 5);
        assert!(result.stats.cancelled);
    }
}
