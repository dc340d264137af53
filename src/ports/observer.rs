//! Observer port - hooks for presentation and data collection
//!
//! Carving, training and rollout never draw anything or sleep. They report
//! each discrete step to an [`Observer`], and a presentation layer decides
//! what to render and how fast.

use crate::{
    Result,
    maze::{CarveStep, Maze, Position},
    q_learning::{EpisodeSummary, Transition},
};

/// Observer trait for monitoring generation, training and rollout
///
/// Every method has a no-op default, so implementors override only what
/// they care about.
///
/// # Event Sequence
///
/// 1. `on_carve(...)` - For every change made while a maze is carved
/// 2. `on_training_start(total_episodes, maze)` - Once per training run
/// 3. For each episode:
///    - `should_stop()` - Checked before the episode starts
///    - `on_episode_start(episode)`
///    - `on_transition(...)` - For each step the agent takes
///    - `on_episode_end(summary)`
/// 4. `on_training_end(episodes_run)` - Once at the end
/// 5. `on_rollout_step(...)` - For each move of the greedy rollout
///
/// # Examples
///
/// ```no_run
/// use qmaze::{ports::Observer, q_learning::EpisodeSummary};
///
/// struct StepCounter {
///     steps: usize,
/// }
///
/// impl Observer for StepCounter {
///     fn on_episode_end(&mut self, summary: &EpisodeSummary) -> qmaze::Result<()> {
///         self.steps += summary.steps;
///         Ok(())
///     }
/// }
/// ```
pub trait Observer: Send {
    /// Called after each carve step, with the partially carved grid.
    fn on_carve(&mut self, _step: CarveStep, _maze: &Maze) -> Result<()> {
        Ok(())
    }

    /// Called when training starts on `maze`.
    fn on_training_start(&mut self, _total_episodes: usize, _maze: &Maze) -> Result<()> {
        Ok(())
    }

    /// Called before each episode; returning `true` ends training early.
    ///
    /// Cancellation is only honoured between episodes.
    fn should_stop(&self) -> bool {
        false
    }

    /// Called when an episode starts.
    fn on_episode_start(&mut self, _episode: usize) -> Result<()> {
        Ok(())
    }

    /// Called after every learning step, once the Q-value update is applied.
    fn on_transition(&mut self, _transition: &Transition) -> Result<()> {
        Ok(())
    }

    /// Called when an episode ends, after epsilon has decayed.
    fn on_episode_end(&mut self, _summary: &EpisodeSummary) -> Result<()> {
        Ok(())
    }

    /// Called when training completes or is cancelled.
    fn on_training_end(&mut self, _episodes_run: usize) -> Result<()> {
        Ok(())
    }

    /// Called for each position appended to a rollout path.
    ///
    /// `index` is the position's index in the path; the start is index 0.
    fn on_rollout_step(&mut self, _index: usize, _position: Position, _maze: &Maze) -> Result<()> {
        Ok(())
    }
}

/// Observer that ignores every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl Observer for NoopObserver {}

/// Fan-out to several observers, in registration order
#[derive(Default)]
pub struct ObserverSet {
    observers: Vec<Box<dyn Observer>>,
}

impl ObserverSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, observer: Box<dyn Observer>) {
        self.observers.push(observer);
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl Observer for ObserverSet {
    fn on_carve(&mut self, step: CarveStep, maze: &Maze) -> Result<()> {
        for observer in &mut self.observers {
            observer.on_carve(step, maze)?;
        }
        Ok(())
    }

    fn on_training_start(&mut self, total_episodes: usize, maze: &Maze) -> Result<()> {
        for observer in &mut self.observers {
            observer.on_training_start(total_episodes, maze)?;
        }
        Ok(())
    }

    fn should_stop(&self) -> bool {
        self.observers.iter().any(|observer| observer.should_stop())
    }

    fn on_episode_start(&mut self, episode: usize) -> Result<()> {
        for observer in &mut self.observers {
            observer.on_episode_start(episode)?;
        }
        Ok(())
    }

    fn on_transition(&mut self, transition: &Transition) -> Result<()> {
        for observer in &mut self.observers {
            observer.on_transition(transition)?;
        }
        Ok(())
    }

    fn on_episode_end(&mut self, summary: &EpisodeSummary) -> Result<()> {
        for observer in &mut self.observers {
            observer.on_episode_end(summary)?;
        }
        Ok(())
    }

    fn on_training_end(&mut self, episodes_run: usize) -> Result<()> {
        for observer in &mut self.observers {
            observer.on_training_end(episodes_run)?;
        }
        Ok(())
    }

    fn on_rollout_step(&mut self, index: usize, position: Position, maze: &Maze) -> Result<()> {
        for observer in &mut self.observers {
            observer.on_rollout_step(index, position, maze)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Stopper;

    impl Observer for Stopper {
        fn should_stop(&self) -> bool {
            true
        }
    }

    #[test]
    fn test_empty_set_never_stops() {
        let set = ObserverSet::new();
        assert!(set.is_empty());
        assert!(!set.should_stop());
    }

    #[test]
    fn test_any_member_can_stop() {
        let mut set = ObserverSet::new();
        set.push(Box::new(NoopObserver));
        set.push(Box::new(Stopper));
        assert_eq!(set.len(), 2);
        assert!(set.should_stop());
    }
}
