use clap::{Parser, ValueEnum};
use env_logger::Env;
use log::info;

use flat_planner::graph::Graph;
use flat_planner::level::{format_route, parse_route, Level};
use flat_planner::solvers::{ExhaustiveSolver, PruningSolver, Solver};
use flat_planner::vis;

#[derive(ValueEnum, Clone)]
enum SolverName {
    /// Simulates all 9! orders and filters out the illegal ones.
    Exhaustive,
    /// Skips orders that already break a rule. Same ranking, faster.
    Pruning,
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Solver implementation to use to rank the routes.
    #[arg(short, long, value_enum, default_value_t = SolverName::Pruning)]
    solver: SolverName,

    /// Number of cheapest routes to print.
    #[arg(long, default_value_t = 10)]
    best: usize,

    /// Number of most expensive routes to print.
    #[arg(long, default_value_t = 10)]
    worst: usize,

    /// Distance table JSON to use instead of the built-in estimates.
    #[arg(long)]
    distances_file: Option<String>,

    /// Route to annotate with its rank and cost, e.g. E,3,1,A,2,C,4,D,5,B.
    /// Can be repeated.
    #[arg(long)]
    show: Vec<String>,

    /// Directory to write one SVG diagram per route passed via --show.
    #[arg(long)]
    svg_dir: Option<String>,
}

fn new_solver(cli: &Cli) -> Box<dyn Solver> {
    match cli.solver {
        SolverName::Exhaustive => Box::new(ExhaustiveSolver {}),
        SolverName::Pruning => Box::new(PruningSolver {}),
    }
}

fn main() {
    // Init logger with default value of info
    // This can be overriden with RUST_LOG env var
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let graph = match &cli.distances_file {
        Some(filename) => {
            let data = std::fs::read_to_string(filename)
                .expect("failed to read distances_file");
            info!("Loading distance table from {filename}");
            Graph::from_json(&data).expect("invalid distance table")
        }
        None => Graph::flat(),
    };
    let level = Level::flat();

    let mut solver = new_solver(&cli);
    let ranking = solver
        .rank(&level, &graph)
        .expect("distance table is missing a leg");

    println!("Best:");
    for walk in ranking.best(cli.best) {
        println!("{}   Dist: {}", format_route(&walk.route), walk.cost);
    }
    println!("Worst:");
    for walk in ranking.worst(cli.worst) {
        println!("{}   Dist: {}", format_route(&walk.route), walk.cost);
    }

    for (i, route_arg) in cli.show.iter().enumerate() {
        let route = parse_route(route_arg).expect("invalid route in --show");
        let (rank, walk) = ranking
            .rank_of(&route)
            .expect("--show route is not a legal order");
        println!(
            "{}   Dist: {}   Rank: {}/{}",
            format_route(&walk.route),
            walk.cost,
            rank + 1,
            ranking.len()
        );
        if let Some(dir) = &cli.svg_dir {
            let document = vis::render(walk);
            let filename = format!("{dir}/route_{i:02}.svg");
            svg::save(&filename, &document).expect("failed to write SVG");
            info!("Wrote {filename}");
        }
    }
}
