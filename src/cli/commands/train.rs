//! Train command - Generate mazes and train Q-learning agents on them

use std::{
    fs::File,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use serde_json::to_writer_pretty;

use crate::{
    cli::{
        config::load_training_config,
        output::{format_number, format_share, print_section, print_stats_table, print_subsection},
    },
    maze::Position,
    pipeline::{
        JsonlObserver, ProgressObserver, TrainingConfig, TrainingPipeline, TrainingResult,
    },
    q_learning::RolloutOutcome,
    render::render,
};

#[derive(Debug, Serialize)]
struct RunSummary {
    width: usize,
    height: usize,
    seed: Option<u64>,
    episodes_run: usize,
    successful_episodes: usize,
    total_steps: usize,
    final_epsilon: f64,
    cancelled: bool,
    q_table_size: usize,
    outcome: RolloutOutcome,
    reached_exit: bool,
    path: Vec<Position>,
}

impl From<&TrainingResult> for RunSummary {
    fn from(result: &TrainingResult) -> Self {
        Self {
            width: result.width,
            height: result.height,
            seed: result.seed,
            episodes_run: result.stats.episodes_run,
            successful_episodes: result.stats.successful_episodes,
            total_steps: result.stats.total_steps,
            final_epsilon: result.stats.final_epsilon,
            cancelled: result.stats.cancelled,
            q_table_size: result.q_table_size,
            outcome: result.path.outcome(),
            reached_exit: result.path.reached_exit(),
            path: result.path.positions().to_vec(),
        }
    }
}

#[derive(Debug, Serialize)]
struct TrainingSummaryFile<'a> {
    config: &'a TrainingConfig,
    runs: Vec<RunSummary>,
}

fn sanitize_summary_path(raw: &Path) -> PathBuf {
    let mut normalized = raw.to_path_buf();
    let raw_str = raw.as_os_str().to_string_lossy();

    // Treat trailing separators or missing filename as a directory target.
    if raw_str.ends_with(std::path::MAIN_SEPARATOR) || normalized.file_name().is_none() {
        normalized.push("training_summary.json");
        return normalized;
    }

    match normalized.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => normalized,
        _ => {
            normalized.set_extension("json");
            normalized
        }
    }
}

#[derive(Parser, Debug)]
#[command(about = "Train a Q-learning agent on a generated maze")]
pub struct TrainArgs {
    /// Logical maze width (6-15, random when omitted)
    #[arg(long, short = 'W')]
    pub width: Option<usize>,

    /// Logical maze height (6-15, random when omitted)
    #[arg(long, short = 'H')]
    pub height: Option<usize>,

    /// Number of training episodes [default: 1000]
    #[arg(long, short = 'e')]
    pub episodes: Option<usize>,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Number of generate/train cycles, each on a brand-new maze
    #[arg(long, default_value_t = 1)]
    pub runs: usize,

    /// JSON configuration file; command-line flags override its values
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Learning rate α [default: 0.1]
    #[arg(long)]
    pub alpha: Option<f64>,

    /// Discount factor γ [default: 0.9]
    #[arg(long)]
    pub gamma: Option<f64>,

    /// Initial exploration rate [default: 1.0]
    #[arg(long)]
    pub epsilon: Option<f64>,

    /// Epsilon decay per episode [default: 0.995]
    #[arg(long)]
    pub epsilon_decay: Option<f64>,

    /// Minimum epsilon [default: 0.01]
    #[arg(long)]
    pub min_epsilon: Option<f64>,

    /// Cap on steps per episode (unbounded by default)
    #[arg(long)]
    pub max_steps: Option<usize>,

    /// Optional path for writing a summary JSON file
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Optional file for per-episode JSONL observations
    #[arg(long)]
    pub observations: Option<PathBuf>,

    /// Hide the progress bar
    #[arg(long, default_value_t = false)]
    pub no_progress: bool,

    /// Skip printing the maze and path
    #[arg(long, default_value_t = false)]
    pub no_render: bool,
}

/// Merge the optional config file with command-line overrides
fn build_config(args: &TrainArgs) -> Result<TrainingConfig> {
    let mut config = match &args.config {
        Some(path) => load_training_config(path)?,
        None => TrainingConfig::default(),
    };

    if args.width.is_some() {
        config.width = args.width;
    }
    if args.height.is_some() {
        config.height = args.height;
    }
    if let Some(episodes) = args.episodes {
        config.episodes = episodes;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }

    let learner = &mut config.learner;
    if let Some(alpha) = args.alpha {
        learner.learning_rate = alpha;
    }
    if let Some(gamma) = args.gamma {
        learner.discount_factor = gamma;
    }
    if let Some(epsilon) = args.epsilon {
        learner.epsilon_start = epsilon;
    }
    if let Some(decay) = args.epsilon_decay {
        learner.epsilon_decay = decay;
    }
    if let Some(min) = args.min_epsilon {
        learner.min_epsilon = min;
    }
    if args.max_steps.is_some() {
        learner.max_steps_per_episode = args.max_steps;
    }
    learner.validate()?;

    Ok(config)
}

fn display_result(index: usize, result: &TrainingResult, render_maze: bool) {
    print_section(&format!(
        "Run {}: {}x{} maze",
        index + 1,
        result.width,
        result.height
    ));

    if render_maze {
        println!("{}", render(&result.maze, Some(&result.path)));
    }

    print_subsection("Training");
    let stats = &result.stats;
    print_stats_table(&[
        ("Episodes", format_number(stats.episodes_run)),
        (
            "Reached exit",
            format_share(stats.successful_episodes, stats.episodes_run),
        ),
        ("Total steps", format_number(stats.total_steps)),
        ("Final epsilon", format!("{:.4}", stats.final_epsilon)),
        ("Q-table states", format_number(result.q_table_size)),
    ]);
    if stats.cancelled {
        println!("  Training was stopped early.");
    }

    print_subsection("Rollout");
    let outcome = match result.path.outcome() {
        RolloutOutcome::Reached => "reached the exit",
        RolloutOutcome::Unlearned => "stalled on an unvisited tile",
        RolloutOutcome::Blocked => "stalled against a wall",
        RolloutOutcome::Cycle => "stalled in a loop",
    };
    print_stats_table(&[
        ("Outcome", outcome.to_string()),
        ("Moves", format_number(result.path.moves())),
    ]);
}

pub fn execute(args: TrainArgs) -> Result<()> {
    let config = build_config(&args)?;

    let mut pipeline = TrainingPipeline::new(config.clone());
    if !args.no_progress {
        pipeline = pipeline.with_observer(Box::new(ProgressObserver::new()));
    }
    if let Some(path) = &args.observations {
        let observer = JsonlObserver::new(path)
            .with_context(|| format!("Failed to create observations file: {}", path.display()))?;
        pipeline = pipeline.with_observer(Box::new(observer));
    }

    let results = pipeline.run_cycles(args.runs)?;
    for (index, result) in results.iter().enumerate() {
        display_result(index, result, !args.no_render);
    }

    if let Some(raw) = &args.summary {
        let path = sanitize_summary_path(raw);
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        let file = File::create(&path)
            .with_context(|| format!("Failed to create summary file: {}", path.display()))?;
        let summary = TrainingSummaryFile {
            config: &config,
            runs: results.iter().map(RunSummary::from).collect(),
        };
        to_writer_pretty(file, &summary).context("Failed to write training summary")?;
        println!("\nSummary written to {}", path.display());
    }

    Ok(())
}
