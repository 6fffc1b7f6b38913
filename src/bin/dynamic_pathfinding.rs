// Dynamic pathfinding demo
//
// usage: dynamic_pathfinding [strategy] [heuristic] [seed]
//   strategy:  a* | gbfs            (default a*)
//   heuristic: manhattan | euclidean | chebyshev   (default manhattan)
//
// Set RUST_LOG=debug for per-search details.

use std::env;
use std::error::Error;

use log::{info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use dynamic_pathfinder::common::{Cell, GridSearch, HeuristicKind, SearchStrategy};
use dynamic_pathfinder::path_planning::{BestFirstSearch, ReplanConfig, ReplanState, ReplanningController};
use dynamic_pathfinder::utils::{
    colors, GridMap, PointStyle, Visualizer, DEFAULT_COLS, DEFAULT_ROWS, DEFAULT_WALL_PROBABILITY,
};

const SHOW_ANIMATION: bool = false;
const MAX_TICKS: usize = 10_000;
const MAX_GRID_ATTEMPTS: usize = 50;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = env::args().skip(1);
    let strategy: SearchStrategy = args.next().map_or(Ok(SearchStrategy::default()), |s| s.parse())?;
    let heuristic: HeuristicKind = args.next().map_or(Ok(HeuristicKind::default()), |s| s.parse())?;
    let seed: u64 = args.next().map_or(Ok(0), |s| s.parse())?;

    info!("{} / {} dynamic pathfinding start!!", strategy, heuristic);

    let mut rng = StdRng::seed_from_u64(seed);
    let start = Cell::new(1, 1);
    let goal = Cell::new(DEFAULT_ROWS - 2, DEFAULT_COLS - 2);

    // Regenerate until the goal is reachable so the demo has something to show
    let mut grid = GridMap::random_bordered(
        DEFAULT_ROWS,
        DEFAULT_COLS,
        DEFAULT_WALL_PROBABILITY,
        start,
        goal,
        &mut rng,
    )?;
    for _ in 1..MAX_GRID_ATTEMPTS {
        if grid.reachable_from(start).contains(&goal) {
            break;
        }
        grid = GridMap::random_bordered(
            DEFAULT_ROWS,
            DEFAULT_COLS,
            DEFAULT_WALL_PROBABILITY,
            start,
            goal,
            &mut rng,
        )?;
    }
    println!("{}", grid);

    let planner = BestFirstSearch::with_strategy(strategy, heuristic);
    let result = planner.plan(&grid, start, goal)?;
    info!(
        "visited: {}, cost: {}, time: {:.2?}",
        result.visited_count(),
        result.cost(),
        result.elapsed
    );
    if !result.is_found() {
        warn!("No path found!");
        return Ok(());
    }

    let mut vis = Visualizer::new(&grid);
    vis.set_title(&format!("{} ({}) static search", strategy, heuristic));
    vis.plot_walls(&grid)
        .plot_visited(&result.visited)
        .plot_path(&result.path, "Path")
        .plot_start(start)
        .plot_goal(goal);
    save(&vis, "dynamic_pathfinding_static.png");

    let mut controller = ReplanningController::new(planner, ReplanConfig::default(), start, goal)?;
    controller.begin(result.path)?;

    let mut inserted = Vec::new();
    let mut trail = vec![start];
    let final_state = controller.run(&mut grid, &mut rng, MAX_TICKS, |report| {
        trail.push(report.agent);
        if let Some(cell) = report.inserted_wall {
            inserted.push(cell);
        }
        if let Some(replan) = &report.replan {
            info!(
                "tick {}: replanned at {} -> visited: {}, cost: {}",
                report.tick,
                report.agent,
                replan.visited_count(),
                replan.cost()
            );
        }
    });
    trail.dedup();

    match final_state {
        ReplanState::Reached => info!(
            "Goal reached after {} replans, {} walls added",
            controller.replan_count(),
            inserted.len()
        ),
        ReplanState::Blocked => warn!("Blocked at {}!", controller.agent()),
        other => warn!("Stopped in state {} after {} ticks", other, MAX_TICKS),
    }

    let mut vis = Visualizer::new(&grid);
    vis.set_title(&format!("{} ({}) dynamic replanning", strategy, heuristic));
    vis.plot_walls(&grid)
        .plot_cells(
            &inserted,
            &PointStyle::new(colors::INSERTED, "Inserted")
                .with_symbol('S')
                .with_size(1.5),
        )
        .plot_path(&trail, "Agent trail")
        .plot_start(start)
        .plot_goal(goal)
        .plot_agent(controller.agent());
    save(&vis, "dynamic_pathfinding_replanning.png");

    if SHOW_ANIMATION {
        if let Err(e) = vis.show() {
            warn!("{}", e);
        }
    }

    info!("dynamic pathfinding finish!!");
    Ok(())
}

fn save(vis: &Visualizer, path: &str) {
    match vis.save_png(path, 800, 640) {
        Ok(()) => info!("Plot saved to: {}", path),
        Err(e) => warn!("Failed to save {}: {}", path, e),
    }
}
