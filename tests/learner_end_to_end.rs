//! Generate → train → rollout on real mazes.

use qmaze::{
    LearnerConfig, Maze, MazeBuilder, Position, QLearningAgent, RolloutOutcome,
    q_learning::GOAL_REWARD,
};

fn maze_6x6() -> Maze {
    MazeBuilder::new(6, 6)
        .unwrap()
        .with_seed(7)
        .generate()
        .unwrap()
}

fn is_unit_step(a: Position, b: Position) -> bool {
    a.x.abs_diff(b.x) + a.y.abs_diff(b.y) == 1
}

fn assert_valid_walk(maze: &Maze, positions: &[Position]) {
    assert_eq!(positions.first(), Some(&Position::new(1, 1)));
    assert!(positions.iter().all(|&pos| maze.is_open(pos)));
    assert!(
        positions
            .windows(2)
            .all(|pair| is_unit_step(pair[0], pair[1]))
    );
}

#[test]
fn seeded_6x6_maze_is_solved_after_1000_episodes() {
    let maze = maze_6x6();
    let mut agent = QLearningAgent::new(&maze, LearnerConfig::default().with_seed(7)).unwrap();
    let stats = agent.train(1000).unwrap();
    assert_eq!(stats.episodes_run, 1000);
    assert!(!stats.cancelled);

    let path = agent.rollout();
    assert!(path.reached_exit(), "rollout stalled: {:?}", path.outcome());
    assert_eq!(path.outcome(), RolloutOutcome::Reached);
    assert_eq!(path.last(), Some(Position::new(12, 11)));
    assert_valid_walk(&maze, path.positions());
}

#[test]
fn undertrained_rollout_stalls_without_leaving_open_tiles() {
    let maze = maze_6x6();
    for seed in 0..5 {
        let config = LearnerConfig::default().with_seed(seed).with_max_steps(20);
        let mut agent = QLearningAgent::new(&maze, config).unwrap();
        agent.train(3).unwrap();

        let path = agent.rollout();
        assert_valid_walk(&maze, path.positions());
        let mut seen = std::collections::HashSet::new();
        assert!(path.positions().iter().all(|pos| seen.insert(*pos)));
        if !path.reached_exit() {
            assert_ne!(path.last(), Some(maze.exit()));
        }
    }
}

#[test]
fn every_uncapped_episode_ends_at_the_exit() {
    let maze = maze_6x6();
    let mut agent = QLearningAgent::new(&maze, LearnerConfig::default().with_seed(11)).unwrap();
    let stats = agent.train(50).unwrap();
    assert_eq!(stats.successful_episodes, 50);
    assert_eq!(stats.truncated_episodes, 0);
}

#[test]
fn exit_value_propagates_back_to_the_start() {
    let maze = maze_6x6();
    let mut agent = QLearningAgent::new(&maze, LearnerConfig::default().with_seed(3)).unwrap();
    agent.train(1000).unwrap();

    let table = agent.q_table();
    assert!(table.contains(maze.start()));
    assert!(table.size() <= maze.open_count());

    // Q-values are bounded by the goal reward
    for (_, values) in table.iter() {
        assert!(values.iter().all(|&q| q <= GOAL_REWARD));
    }
}

#[test]
fn epsilon_reaches_its_floor() {
    let maze = maze_6x6();
    let config = LearnerConfig::default()
        .with_seed(5)
        .with_epsilon(1.0, 0.5, 0.05);
    let mut agent = QLearningAgent::new(&maze, config).unwrap();
    let stats = agent.train(20).unwrap();
    assert_eq!(stats.final_epsilon, 0.05);
    assert_eq!(agent.epsilon(), 0.05);
}

#[test]
fn untrained_rollout_stops_at_the_start() {
    let maze = maze_6x6();
    let agent = QLearningAgent::new(&maze, LearnerConfig::default()).unwrap();
    let path = agent.rollout();
    assert_eq!(path.positions(), &[maze.start()]);
    assert_eq!(path.outcome(), RolloutOutcome::Unlearned);
}
