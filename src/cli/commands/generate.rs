//! Generate command - carve and print a maze without training

use anyhow::Result;
use clap::Parser;
use rand::{SeedableRng, rngs::StdRng};

use crate::{
    cli::output::{format_number, print_kv, print_section},
    maze::{CarveStep, Maze, MazeBuilder, random_dimension},
    ports::Observer,
    render::render,
};

#[derive(Parser, Debug)]
#[command(about = "Generate a maze and print it")]
pub struct GenerateArgs {
    /// Logical maze width (6-15, random when omitted)
    #[arg(long, short = 'W')]
    pub width: Option<usize>,

    /// Logical maze height (6-15, random when omitted)
    #[arg(long, short = 'H')]
    pub height: Option<usize>,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Print only the grid, without markers or statistics
    #[arg(long, default_value_t = false)]
    pub plain: bool,
}

#[derive(Default)]
struct CarveCounter {
    cells: usize,
    passages: usize,
    revisits: usize,
}

impl Observer for CarveCounter {
    fn on_carve(&mut self, step: CarveStep, _maze: &Maze) -> crate::Result<()> {
        match step {
            CarveStep::CellOpened(_) => self.cells += 1,
            CarveStep::PassageOpened(_) => self.passages += 1,
            CarveStep::Revisited(_) => self.revisits += 1,
            CarveStep::EndpointOpened(_) => {}
        }
        Ok(())
    }
}

pub fn execute(args: GenerateArgs) -> Result<()> {
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_rng(&mut rand::rng()),
    };
    let width = args.width.unwrap_or_else(|| random_dimension(&mut rng));
    let height = args.height.unwrap_or_else(|| random_dimension(&mut rng));

    let mut builder = MazeBuilder::new(width, height)?;
    if let Some(seed) = args.seed {
        builder = builder.with_seed(seed);
    }
    let mut counter = CarveCounter::default();
    let maze = builder.generate_observed(&mut counter)?;

    if args.plain {
        println!("{maze}");
        return Ok(());
    }

    print_section(&format!("{width}x{height} maze"));
    println!("{}", render(&maze, None));
    println!();
    print_kv("Grid", format!("{}x{}", maze.columns(), maze.rows()));
    print_kv("Open tiles", format_number(maze.open_count()));
    print_kv("Cells carved", format_number(counter.cells));
    print_kv("Passages", format_number(counter.passages));
    print_kv("Loop re-entries", format_number(counter.revisits));
    if let Some(seed) = args.seed {
        print_kv("Seed", seed);
    }
    Ok(())
}
