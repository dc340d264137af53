//! Observer pattern for training pipelines
//!
//! Observers allow composable data collection during training without coupling
//! training logic to specific output formats.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};

use crate::{
    Result,
    maze::Maze,
    ports::Observer,
    q_learning::{EpisodeSummary, Transition},
};

/// Per-episode record written by [`JsonlObserver`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpisodeObservation {
    /// Training run (0-based, one per maze)
    pub run: usize,
    pub episode: usize,
    pub steps: usize,
    pub rejected_moves: usize,
    pub total_reward: f64,
    pub reached_exit: bool,
    pub epsilon: f64,
}

/// Progress bar observer - Shows training progress
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    successes: usize,
}

impl ProgressObserver {
    /// Create a new progress observer
    pub fn new() -> Self {
        Self {
            progress_bar: None,
            successes: 0,
        }
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for ProgressObserver {
    fn on_training_start(&mut self, total_episodes: usize, _maze: &Maze) -> Result<()> {
        let pb = ProgressBar::new(total_episodes as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} episodes ({msg})")
                .map_err(|e| crate::Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.progress_bar = Some(pb);
        self.successes = 0;
        Ok(())
    }

    fn on_episode_end(&mut self, summary: &EpisodeSummary) -> Result<()> {
        if summary.reached_exit {
            self.successes += 1;
        }
        if let Some(pb) = &self.progress_bar {
            pb.set_position(summary.episode as u64 + 1);
            pb.set_message(format!(
                "exit {} | ε {:.3} | {} steps",
                self.successes, summary.epsilon, summary.steps
            ));
        }
        Ok(())
    }

    fn on_training_end(&mut self, _episodes_run: usize) -> Result<()> {
        if let Some(pb) = self.progress_bar.take() {
            pb.finish_with_message(format!("exit reached in {} episodes", self.successes));
        }
        Ok(())
    }
}

/// Metrics observer - Tracks training metrics
pub struct MetricsObserver {
    episode_steps: Vec<usize>,
    successes: usize,
    rejected_moves: usize,
}

impl MetricsObserver {
    /// Create a new metrics observer
    pub fn new() -> Self {
        Self {
            episode_steps: Vec::new(),
            successes: 0,
            rejected_moves: 0,
        }
    }

    /// Fraction of episodes that reached the exit
    pub fn success_rate(&self) -> f64 {
        if self.episode_steps.is_empty() {
            0.0
        } else {
            self.successes as f64 / self.episode_steps.len() as f64
        }
    }

    /// Average episode length over the last `window` episodes
    pub fn recent_avg_steps(&self, window: usize) -> f64 {
        let start = self.episode_steps.len().saturating_sub(window);
        let recent = &self.episode_steps[start..];
        if recent.is_empty() {
            0.0
        } else {
            recent.iter().sum::<usize>() as f64 / recent.len() as f64
        }
    }

    /// Get metrics summary
    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            episodes: self.episode_steps.len(),
            successes: self.successes,
            success_rate: self.success_rate(),
            total_steps: self.episode_steps.iter().sum(),
            rejected_moves: self.rejected_moves,
            avg_steps: self.recent_avg_steps(self.episode_steps.len()),
            last_100_avg_steps: self.recent_avg_steps(100),
        }
    }
}

impl Default for MetricsObserver {
    fn default() -> Self {
        Self::new()
    }
}

/// Summary of training metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub episodes: usize,
    pub successes: usize,
    pub success_rate: f64,
    pub total_steps: usize,
    pub rejected_moves: usize,
    pub avg_steps: f64,
    pub last_100_avg_steps: f64,
}

impl Observer for MetricsObserver {
    fn on_transition(&mut self, transition: &Transition) -> Result<()> {
        if transition.next_state.is_none() {
            self.rejected_moves += 1;
        }
        Ok(())
    }

    fn on_episode_end(&mut self, summary: &EpisodeSummary) -> Result<()> {
        self.episode_steps.push(summary.steps);
        if summary.reached_exit {
            self.successes += 1;
        }
        Ok(())
    }
}

/// JSONL observer - Exports one episode per line in JSON Lines format
pub struct JsonlObserver<W: Write = BufWriter<File>> {
    writer: W,
    run: Option<usize>,
    rejected_moves: usize,
}

impl JsonlObserver {
    /// Create a new JSONL observer writing to `path`
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self::from_writer(BufWriter::new(file)))
    }
}

impl<W: Write> JsonlObserver<W> {
    pub fn from_writer(writer: W) -> Self {
        Self {
            writer,
            run: None,
            rejected_moves: 0,
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Send> Observer for JsonlObserver<W> {
    fn on_training_start(&mut self, _total_episodes: usize, _maze: &Maze) -> Result<()> {
        self.run = Some(self.run.map_or(0, |run| run + 1));
        Ok(())
    }

    fn on_episode_start(&mut self, _episode: usize) -> Result<()> {
        self.rejected_moves = 0;
        Ok(())
    }

    fn on_transition(&mut self, transition: &Transition) -> Result<()> {
        if transition.next_state.is_none() {
            self.rejected_moves += 1;
        }
        Ok(())
    }

    fn on_episode_end(&mut self, summary: &EpisodeSummary) -> Result<()> {
        let observation = EpisodeObservation {
            run: self.run.unwrap_or(0),
            episode: summary.episode,
            steps: summary.steps,
            rejected_moves: self.rejected_moves,
            total_reward: summary.total_reward,
            reached_exit: summary.reached_exit,
            epsilon: summary.epsilon,
        };

        serde_json::to_writer(&mut self.writer, &observation)?;
        writeln!(&mut self.writer)?;
        Ok(())
    }

    fn on_training_end(&mut self, _episodes_run: usize) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Stops training once `limit` episodes have finished
#[derive(Debug, Clone)]
pub struct StopAfter {
    limit: usize,
    finished: usize,
}

impl StopAfter {
    pub fn new(limit: usize) -> Self {
        Self { limit, finished: 0 }
    }
}

impl Observer for StopAfter {
    fn on_training_start(&mut self, _total_episodes: usize, _maze: &Maze) -> Result<()> {
        self.finished = 0;
        Ok(())
    }

    fn should_stop(&self) -> bool {
        self.finished >= self.limit
    }

    fn on_episode_end(&mut self, _summary: &EpisodeSummary) -> Result<()> {
        self.finished += 1;
        Ok(())
    }
}
