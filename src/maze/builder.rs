//! Randomised depth-first maze carving
//!
//! Recursive backtracker with a loop-injection step, run on an explicit stack
//! so 15×15 mazes never depend on call-stack depth:
//!
//! 1. Mark the current cell visited and open its grid tile
//! 2. Shuffle the four cardinal directions
//! 3. For each direction whose neighbour is in bounds and unvisited, open the
//!    wall tile between them and descend into the neighbour
//! 4. When that descent returns, with probability 0.2 descend into the same
//!    neighbour again. The neighbour and everything around it is visited by
//!    then, so the second descent only re-opens the cell and reshuffles
//! 5. A cell is finished once all four directions are exhausted
//!
//! Entrance and exit tiles are forced open after carving completes.

use rand::{Rng, SeedableRng, rngs::StdRng, seq::SliceRandom};
use tracing::debug;

use crate::{
    Error, Result,
    maze::grid::{Maze, Position},
    ports::{NoopObserver, Observer},
};

/// Smallest accepted logical width/height
pub const MIN_DIMENSION: usize = 6;
/// Largest accepted logical width/height
pub const MAX_DIMENSION: usize = 15;
/// Chance of re-entering a neighbour right after carving into it
pub const LOOP_PROBABILITY: f64 = 0.2;

const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];

/// Incremental change made while carving, reported to observers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarveStep {
    /// A logical cell centre was visited for the first time
    CellOpened(Position),
    /// The wall tile between two cells was removed
    PassageOpened(Position),
    /// Loop-injection re-entry into an already visited cell
    Revisited(Position),
    /// Entrance or exit forced open after carving
    EndpointOpened(Position),
}

fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

fn validate_dimension(axis: &'static str, value: usize) -> Result<()> {
    if (MIN_DIMENSION..=MAX_DIMENSION).contains(&value) {
        Ok(())
    } else {
        Err(Error::InvalidDimension {
            axis,
            value,
            min: MIN_DIMENSION,
            max: MAX_DIMENSION,
        })
    }
}

/// Draw a dimension uniformly from the accepted range
pub fn random_dimension<R: Rng + ?Sized>(rng: &mut R) -> usize {
    rng.random_range(MIN_DIMENSION..=MAX_DIMENSION)
}

/// Generate a `width×height` maze in one call
///
/// # Errors
///
/// Returns [`Error::InvalidDimension`] when either side is outside `6..=15`.
pub fn generate(width: usize, height: usize, seed: Option<u64>) -> Result<Maze> {
    let mut builder = MazeBuilder::new(width, height)?;
    if let Some(seed) = seed {
        builder = builder.with_seed(seed);
    }
    builder.generate()
}

/// Maze generator for a fixed logical size
///
/// # Examples
///
/// ```
/// use qmaze::maze::MazeBuilder;
///
/// let maze = MazeBuilder::new(6, 6)?.with_seed(7).generate()?;
/// assert!(maze.is_open(maze.entrance()));
/// assert!(maze.is_open(maze.exit()));
/// # Ok::<(), qmaze::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct MazeBuilder {
    width: usize,
    height: usize,
    rng: StdRng,
    rng_seed: Option<u64>,
}

impl MazeBuilder {
    /// Create a builder, rejecting sizes outside `6..=15` before anything is allocated
    pub fn new(width: usize, height: usize) -> Result<Self> {
        validate_dimension("width", width)?;
        validate_dimension("height", height)?;
        Ok(Self {
            width,
            height,
            rng: build_rng(None),
            rng_seed: None,
        })
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self.rng_seed = Some(seed);
        self
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn seed(&self) -> Option<u64> {
        self.rng_seed
    }

    /// Carve a fresh maze
    pub fn generate(&mut self) -> Result<Maze> {
        self.generate_observed(&mut NoopObserver)
    }

    /// Carve a fresh maze, reporting every step to `observer`
    pub fn generate_observed(&mut self, observer: &mut dyn Observer) -> Result<Maze> {
        let maze = Carver::new(self.width, self.height, &mut self.rng, observer).run()?;
        debug!(
            width = self.width,
            height = self.height,
            seed = ?self.rng_seed,
            open_tiles = maze.open_count(),
            "maze generated"
        );
        Ok(maze)
    }
}

/// Suspended visit of one logical cell
struct Frame {
    cell: (usize, usize),
    directions: [(isize, isize); 4],
    next: usize,
    /// Neighbour carved into by the descent that just returned
    carved: Option<(usize, usize)>,
}

struct Carver<'a> {
    maze: Maze,
    visited: Vec<bool>,
    stack: Vec<Frame>,
    rng: &'a mut StdRng,
    observer: &'a mut dyn Observer,
}

impl<'a> Carver<'a> {
    fn new(
        width: usize,
        height: usize,
        rng: &'a mut StdRng,
        observer: &'a mut dyn Observer,
    ) -> Self {
        Self {
            maze: Maze::filled(width, height),
            visited: vec![false; width * height],
            stack: Vec::with_capacity(width * height),
            rng,
            observer,
        }
    }

    fn run(mut self) -> Result<Maze> {
        if !self.visited.is_empty() {
            self.enter((0, 0), false)?;
        }

        let width = self.maze.width();
        let height = self.maze.height();

        while let Some(frame) = self.stack.last_mut() {
            if let Some(child) = frame.carved.take()
                && self.rng.random::<f64>() < LOOP_PROBABILITY
            {
                self.enter(child, true)?;
                continue;
            }

            if frame.next == DIRECTIONS.len() {
                self.stack.pop();
                continue;
            }

            let (dx, dy) = frame.directions[frame.next];
            frame.next += 1;

            let (x, y) = frame.cell;
            let neighbour = match (x.checked_add_signed(dx), y.checked_add_signed(dy)) {
                (Some(nx), Some(ny)) if nx < width && ny < height => (nx, ny),
                _ => continue,
            };
            if self.visited[neighbour.1 * width + neighbour.0] {
                continue;
            }
            let Some(wall) = Maze::cell_center(x, y).offset(dx, dy) else {
                continue;
            };
            frame.carved = Some(neighbour);

            self.maze.open(wall);
            self.observer
                .on_carve(CarveStep::PassageOpened(wall), &self.maze)?;
            self.enter(neighbour, false)?;
        }

        for endpoint in [self.maze.entrance(), self.maze.exit()] {
            self.maze.open(endpoint);
            self.observer
                .on_carve(CarveStep::EndpointOpened(endpoint), &self.maze)?;
        }

        Ok(self.maze)
    }

    fn enter(&mut self, cell: (usize, usize), revisit: bool) -> Result<()> {
        let (x, y) = cell;
        let width = self.maze.width();
        self.visited[y * width + x] = true;

        let center = Maze::cell_center(x, y);
        self.maze.open(center);
        let step = if revisit {
            CarveStep::Revisited(center)
        } else {
            CarveStep::CellOpened(center)
        };
        self.observer.on_carve(step, &self.maze)?;

        let mut directions = DIRECTIONS;
        directions.shuffle(&mut *self.rng);
        self.stack.push(Frame {
            cell,
            directions,
            next: 0,
            carved: None,
        });
        Ok(())
    }
}
