//! Structural properties of generated mazes across the full size range.

use qmaze::{
    Maze, MazeBuilder, Position,
    maze::{MAX_DIMENSION, MIN_DIMENSION},
};

const SEEDS: [u64; 3] = [0, 17, 2024];

fn build(width: usize, height: usize, seed: u64) -> Maze {
    MazeBuilder::new(width, height)
        .unwrap()
        .with_seed(seed)
        .generate()
        .unwrap()
}

#[test]
fn every_cell_is_reachable_from_the_entrance() {
    for width in MIN_DIMENSION..=MAX_DIMENSION {
        for height in MIN_DIMENSION..=MAX_DIMENSION {
            for seed in SEEDS {
                let maze = build(width, height, seed);
                let reachable = maze.reachable_from(maze.entrance());

                for y in 0..height {
                    for x in 0..width {
                        let center = Maze::cell_center(x, y);
                        assert!(
                            reachable.contains(&center),
                            "{width}x{height} seed {seed}: cell ({x}, {y}) unreachable"
                        );
                    }
                }
                assert!(
                    reachable.contains(&maze.exit()),
                    "{width}x{height} seed {seed}: exit unreachable"
                );
            }
        }
    }
}

#[test]
fn grid_shape_and_endpoints() {
    for (width, height) in [(6, 6), (6, 15), (15, 6), (11, 9), (15, 15)] {
        let maze = build(width, height, 5);
        assert_eq!(maze.columns(), 2 * width + 1);
        assert_eq!(maze.rows(), 2 * height + 1);
        assert_eq!(maze.entrance(), Position::new(0, 1));
        assert_eq!(maze.exit(), Position::new(2 * width, 2 * height - 1));
        assert!(maze.is_open(maze.entrance()));
        assert!(maze.is_open(maze.exit()));
        assert!(maze.is_open(maze.start()));
    }
}

#[test]
fn border_is_wall_except_endpoints() {
    let maze = build(9, 7, 3);
    let (columns, rows) = (maze.columns(), maze.rows());
    for pos in maze.positions() {
        let on_border = pos.x == 0 || pos.y == 0 || pos.x == columns - 1 || pos.y == rows - 1;
        if on_border && pos != maze.entrance() && pos != maze.exit() {
            assert!(maze.is_wall(pos), "border tile {pos} is open");
        }
    }
}

#[test]
fn wall_lattice_points_stay_walls() {
    // Tiles with both coordinates even never belong to a cell or a passage.
    let maze = build(12, 10, 99);
    for pos in maze.positions() {
        if pos.x % 2 == 0 && pos.y % 2 == 0 {
            assert!(maze.is_wall(pos), "lattice point {pos} is open");
        }
    }
}

#[test]
fn same_seed_same_maze() {
    for seed in SEEDS {
        assert_eq!(build(10, 8, seed), build(10, 8, seed));
    }
}

#[test]
fn different_seeds_usually_differ() {
    let mazes: Vec<Maze> = (0..5).map(|seed| build(10, 10, seed)).collect();
    let distinct = mazes
        .iter()
        .enumerate()
        .filter(|(i, maze)| mazes[..*i].iter().all(|other| other != *maze))
        .count();
    assert!(distinct > 1);
}

#[test]
fn out_of_range_dimensions_are_rejected() {
    for (width, height) in [(5, 6), (6, 5), (16, 6), (6, 16), (0, 0)] {
        assert!(
            MazeBuilder::new(width, height).is_err(),
            "{width}x{height} should be rejected"
        );
    }
}
