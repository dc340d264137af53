//! Training pipelines and observers
//!
//! The pipeline runs the full generate → train → rollout cycle and fans every
//! event out to the registered observers.

pub mod observers;
pub mod training;

pub use observers::{
    EpisodeObservation, JsonlObserver, MetricsObserver, MetricsSummary, ProgressObserver,
    StopAfter,
};
pub use training::{TrainingConfig, TrainingPipeline, TrainingResult};
