//! Tick-driven dynamic replanning
//!
//! A simulated agent walks along a previously found path, one cell per tick.
//! While it moves, walls may appear at random interior cells. When a new wall
//! lands on the part of the path the agent has not consumed yet, the path is
//! invalidated and the search is run again from the agent's current cell.
//!
//! State machine:
//!
//! ```text
//! Idle -> Moving -> Replanning -> Moving
//!            |           |
//!            v           v
//!         Reached     Blocked
//! ```
//!
//! `Reached` and `Blocked` are terminal; ticking a terminal controller is a
//! no-op.

use std::fmt;

use log::{debug, info, warn};
use rand::Rng;

use crate::common::{Cell, GridSearch, PathfindingError, PathfindingResult, SearchResult};
use crate::path_planning::best_first::BestFirstSearch;
use crate::utils::GridMap;

pub const DEFAULT_OBSTACLE_PROBABILITY: f64 = 0.15;

/// When an inserted wall forces a replan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReplanTrigger {
    /// Only walls on the unconsumed remainder of the path
    #[default]
    OnPathBlocked,
    /// Every inserted wall
    OnAnyObstacle,
}

/// Configuration for the replanning controller
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReplanConfig {
    /// Chance per move tick of attempting to insert a random wall
    pub obstacle_probability: f64,
    pub trigger: ReplanTrigger,
}

impl Default for ReplanConfig {
    fn default() -> Self {
        Self {
            obstacle_probability: DEFAULT_OBSTACLE_PROBABILITY,
            trigger: ReplanTrigger::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReplanState {
    /// No path adopted yet
    Idle,
    Moving,
    /// The current path is invalid; the next tick searches again
    Replanning,
    /// A replan found no path; terminal
    Blocked,
    /// The agent stands on the goal; terminal
    Reached,
}

impl ReplanState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ReplanState::Blocked | ReplanState::Reached)
    }
}

impl fmt::Display for ReplanState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReplanState::Idle => "Idle",
            ReplanState::Moving => "Moving",
            ReplanState::Replanning => "Replanning",
            ReplanState::Blocked => "Blocked",
            ReplanState::Reached => "Reached",
        };
        write!(f, "{}", name)
    }
}

/// Result of trying to place a wall
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObstacleEffect {
    /// Nothing was inserted (protected cell, already a wall, out of bounds,
    /// or no active session)
    Rejected,
    /// Wall inserted; the current path is still usable
    Inserted,
    /// Wall inserted and the current path must be replanned
    PathInvalidated,
}

/// What happened during one tick
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    /// Number of ticks that did work so far
    pub tick: usize,
    pub agent: Cell,
    pub state: ReplanState,
    pub inserted_wall: Option<Cell>,
    pub replanned: bool,
    /// The search run by this tick, if any
    pub replan: Option<SearchResult>,
}

impl TickReport {
    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }
}

/// Drives an agent along a path and replans when walls appear on it
#[derive(Debug, Clone)]
pub struct ReplanningController<S: GridSearch = BestFirstSearch> {
    searcher: S,
    config: ReplanConfig,
    start: Cell,
    goal: Cell,
    path: Vec<Cell>,
    index: usize,
    state: ReplanState,
    ticks: usize,
    replans: usize,
}

impl<S: GridSearch> ReplanningController<S> {
    pub fn new(searcher: S, config: ReplanConfig, start: Cell, goal: Cell) -> PathfindingResult<Self> {
        if !(0.0..=1.0).contains(&config.obstacle_probability) {
            return Err(PathfindingError::InvalidParameter(format!(
                "obstacle probability must be in [0, 1], got {}",
                config.obstacle_probability
            )));
        }
        Ok(Self {
            searcher,
            config,
            start,
            goal,
            path: Vec::new(),
            index: 0,
            state: ReplanState::Idle,
            ticks: 0,
            replans: 0,
        })
    }

    /// Adopt the initial path and start moving.
    ///
    /// An empty path means the goal was unreachable to begin with, which puts
    /// the controller straight into `Blocked`.
    pub fn begin(&mut self, path: Vec<Cell>) -> PathfindingResult<ReplanState> {
        if let (Some(first), Some(last)) = (path.first(), path.last()) {
            if *first != self.start || *last != self.goal {
                return Err(PathfindingError::InvalidParameter(format!(
                    "path runs from {} to {}, expected {} to {}",
                    first, last, self.start, self.goal
                )));
            }
        }
        self.state = match path.len() {
            0 => ReplanState::Blocked,
            1 => ReplanState::Reached,
            _ => ReplanState::Moving,
        };
        self.path = path;
        self.index = 0;
        self.ticks = 0;
        self.replans = 0;
        debug!("session started in state {}", self.state);
        Ok(self.state)
    }

    pub fn state(&self) -> ReplanState {
        self.state
    }

    pub fn config(&self) -> &ReplanConfig {
        &self.config
    }

    pub fn searcher(&self) -> &S {
        &self.searcher
    }

    pub fn start(&self) -> Cell {
        self.start
    }

    pub fn goal(&self) -> Cell {
        self.goal
    }

    /// Current agent cell
    pub fn agent(&self) -> Cell {
        self.path.get(self.index).copied().unwrap_or(self.start)
    }

    pub fn path(&self) -> &[Cell] {
        &self.path
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Unconsumed part of the path, agent cell included
    pub fn remaining_path(&self) -> &[Cell] {
        self.path.get(self.index..).unwrap_or(&[])
    }

    pub fn replan_count(&self) -> usize {
        self.replans
    }

    /// Insert a wall at `cell` and invalidate the path if it is affected.
    ///
    /// The agent's cell, the start and the goal are never walled.
    pub fn insert_obstacle(&mut self, grid: &mut GridMap, cell: Cell) -> ObstacleEffect {
        if !matches!(self.state, ReplanState::Moving | ReplanState::Replanning) {
            return ObstacleEffect::Rejected;
        }
        if cell == self.agent() || cell == self.start || cell == self.goal {
            return ObstacleEffect::Rejected;
        }
        if !grid.insert_wall(cell) {
            return ObstacleEffect::Rejected;
        }

        let invalidated = match self.config.trigger {
            ReplanTrigger::OnPathBlocked => self.remaining_path().contains(&cell),
            ReplanTrigger::OnAnyObstacle => true,
        };
        if invalidated {
            debug!("wall at {} invalidates the current path", cell);
            self.state = ReplanState::Replanning;
            ObstacleEffect::PathInvalidated
        } else {
            debug!("wall at {} is off the current path", cell);
            ObstacleEffect::Inserted
        }
    }

    /// Advance the simulation by one step.
    ///
    /// In `Moving` the agent takes one step, then a random wall may appear;
    /// a wall on the remaining path triggers the replan within the same tick.
    /// In `Replanning` the tick only searches. Terminal and idle controllers
    /// are left untouched.
    pub fn tick<R: Rng + ?Sized>(&mut self, grid: &mut GridMap, rng: &mut R) -> TickReport {
        match self.state {
            ReplanState::Idle | ReplanState::Blocked | ReplanState::Reached => {
                return self.report(None, None);
            }
            ReplanState::Replanning => {
                self.ticks += 1;
                let result = self.replan(grid);
                return self.report(None, Some(result));
            }
            ReplanState::Moving => {}
        }

        self.ticks += 1;
        if self.index + 1 >= self.path.len() {
            self.state = ReplanState::Reached;
            return self.report(None, None);
        }
        self.index += 1;

        let mut inserted = None;
        if rng.gen_bool(self.config.obstacle_probability) {
            if let Some(cell) = Self::random_interior(grid, rng) {
                if self.insert_obstacle(grid, cell) != ObstacleEffect::Rejected {
                    inserted = Some(cell);
                }
            }
        }

        let mut replan = None;
        if self.state == ReplanState::Replanning {
            replan = Some(self.replan(grid));
        } else if self.index + 1 == self.path.len() {
            info!("goal {} reached after {} ticks", self.goal, self.ticks);
            self.state = ReplanState::Reached;
        }
        self.report(inserted, replan)
    }

    /// Tick until a terminal state or `max_ticks`, reporting every tick
    pub fn run<R, F>(&mut self, grid: &mut GridMap, rng: &mut R, max_ticks: usize, mut on_tick: F) -> ReplanState
    where
        R: Rng + ?Sized,
        F: FnMut(&TickReport),
    {
        for _ in 0..max_ticks {
            if self.state.is_terminal() || self.state == ReplanState::Idle {
                break;
            }
            let report = self.tick(grid, rng);
            on_tick(&report);
        }
        self.state
    }

    fn replan(&mut self, grid: &GridMap) -> SearchResult {
        let from = self.agent();
        let result = self.searcher.search(grid, from, self.goal);
        self.replans += 1;

        if result.is_found() {
            info!(
                "replanned from {}: cost {}, visited {}",
                from,
                result.cost(),
                result.visited_count()
            );
            self.path = result.path.clone();
            self.index = 0;
            self.state = if self.path.len() == 1 {
                ReplanState::Reached
            } else {
                ReplanState::Moving
            };
        } else {
            warn!("blocked at {}: goal {} is no longer reachable", from, self.goal);
            self.state = ReplanState::Blocked;
        }
        result
    }

    fn random_interior<R: Rng + ?Sized>(grid: &GridMap, rng: &mut R) -> Option<Cell> {
        if grid.rows() < 3 || grid.cols() < 3 {
            return None;
        }
        let row = rng.gen_range(1..grid.rows() - 1);
        let col = rng.gen_range(1..grid.cols() - 1);
        Some(Cell::new(row, col))
    }

    fn report(&self, inserted_wall: Option<Cell>, replan: Option<SearchResult>) -> TickReport {
        TickReport {
            tick: self.ticks,
            agent: self.agent(),
            state: self.state,
            inserted_wall,
            replanned: replan.is_some(),
            replan,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{HeuristicKind, SearchStrategy};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn quiet_config() -> ReplanConfig {
        ReplanConfig {
            obstacle_probability: 0.0,
            ..Default::default()
        }
    }

    fn started(grid: &GridMap, start: Cell, goal: Cell, config: ReplanConfig) -> ReplanningController {
        let searcher = BestFirstSearch::with_strategy(SearchStrategy::AStar, HeuristicKind::Manhattan);
        let initial = searcher.search(grid, start, goal);
        let mut controller = ReplanningController::new(searcher, config, start, goal).unwrap();
        controller.begin(initial.path).unwrap();
        controller
    }

    #[test]
    fn test_rejects_bad_probability() {
        let config = ReplanConfig {
            obstacle_probability: -0.1,
            ..Default::default()
        };
        let result = ReplanningController::new(
            BestFirstSearch::default(),
            config,
            Cell::new(0, 0),
            Cell::new(1, 1),
        );
        assert!(matches!(result, Err(PathfindingError::InvalidParameter(_))));
    }

    #[test]
    fn test_begin_checks_endpoints() {
        let mut controller = ReplanningController::new(
            BestFirstSearch::default(),
            quiet_config(),
            Cell::new(0, 0),
            Cell::new(0, 2),
        )
        .unwrap();
        assert_eq!(controller.state(), ReplanState::Idle);
        assert!(controller.begin(vec![Cell::new(0, 1), Cell::new(0, 2)]).is_err());
        assert_eq!(controller.begin(Vec::new()).unwrap(), ReplanState::Blocked);
    }

    #[test]
    fn test_moves_one_cell_per_tick_until_reached() {
        let mut grid = GridMap::new(3, 5).unwrap();
        let start = Cell::new(1, 0);
        let goal = Cell::new(1, 4);
        let mut controller = started(&grid, start, goal, quiet_config());
        let mut rng = StdRng::seed_from_u64(1);

        let mut agents = Vec::new();
        let state = controller.run(&mut grid, &mut rng, 100, |report| agents.push(report.agent));

        assert_eq!(state, ReplanState::Reached);
        assert_eq!(agents.len(), 4);
        assert_eq!(agents.last(), Some(&goal));
        assert!(agents.windows(2).all(|w| w[0].is_adjacent(&w[1])));
        assert_eq!(grid.wall_count(), 0);
    }

    #[test]
    fn test_wall_on_next_cell_triggers_replan() {
        let mut grid = GridMap::new(5, 5).unwrap();
        let start = Cell::new(0, 0);
        let goal = Cell::new(0, 4);
        let mut controller = started(&grid, start, goal, quiet_config());
        let mut rng = StdRng::seed_from_u64(2);

        let report = controller.tick(&mut grid, &mut rng);
        assert_eq!(report.state, ReplanState::Moving);
        let agent = report.agent;
        let next = controller.remaining_path()[1];

        assert_eq!(controller.insert_obstacle(&mut grid, next), ObstacleEffect::PathInvalidated);
        assert_eq!(controller.state(), ReplanState::Replanning);

        let report = controller.tick(&mut grid, &mut rng);
        assert!(report.replanned);
        assert_eq!(report.state, ReplanState::Moving);
        assert_eq!(report.agent, agent);
        assert!(!controller.path().contains(&next));
        assert!(grid.is_valid_path(controller.path(), agent, goal));

        let state = controller.run(&mut grid, &mut rng, 100, |_| {});
        assert_eq!(state, ReplanState::Reached);
        assert_eq!(controller.agent(), goal);
    }

    #[test]
    fn test_disconnecting_wall_blocks_permanently() {
        let mut grid = GridMap::from_ascii(
            "#####\n\
             .....\n\
             #####",
        )
        .unwrap();
        let start = Cell::new(1, 0);
        let goal = Cell::new(1, 4);
        let mut controller = started(&grid, start, goal, quiet_config());
        let mut rng = StdRng::seed_from_u64(3);

        controller.tick(&mut grid, &mut rng);
        assert_eq!(controller.agent(), Cell::new(1, 1));

        assert_eq!(
            controller.insert_obstacle(&mut grid, Cell::new(1, 3)),
            ObstacleEffect::PathInvalidated
        );
        let report = controller.tick(&mut grid, &mut rng);
        assert!(report.replanned);
        assert!(report.replan.as_ref().map_or(false, |r| r.path.is_empty()));
        assert_eq!(report.state, ReplanState::Blocked);

        // Terminal ticks must not insert walls even when one is due every tick
        controller.config.obstacle_probability = 1.0;
        let walls = grid.wall_count();
        for _ in 0..5 {
            let report = controller.tick(&mut grid, &mut rng);
            assert_eq!(report.state, ReplanState::Blocked);
            assert!(!report.replanned);
            assert_eq!(report.agent, Cell::new(1, 1));
        }
        assert_eq!(grid.wall_count(), walls);
    }

    #[test]
    fn test_protected_cells_are_never_walled() {
        let mut grid = GridMap::new(5, 5).unwrap();
        let start = Cell::new(1, 1);
        let goal = Cell::new(3, 3);
        let mut controller = started(&grid, start, goal, quiet_config());

        assert_eq!(controller.insert_obstacle(&mut grid, start), ObstacleEffect::Rejected);
        assert_eq!(controller.insert_obstacle(&mut grid, goal), ObstacleEffect::Rejected);
        assert_eq!(
            controller.insert_obstacle(&mut grid, controller.agent()),
            ObstacleEffect::Rejected
        );
        assert_eq!(grid.wall_count(), 0);
    }

    #[test]
    fn test_off_path_wall_depends_on_trigger() {
        let mut grid = GridMap::new(5, 5).unwrap();
        let start = Cell::new(0, 0);
        let goal = Cell::new(0, 4);
        let mut controller = started(&grid, start, goal, quiet_config());
        assert_eq!(
            controller.insert_obstacle(&mut grid, Cell::new(4, 4)),
            ObstacleEffect::Inserted
        );
        assert_eq!(controller.state(), ReplanState::Moving);

        let config = ReplanConfig {
            obstacle_probability: 0.0,
            trigger: ReplanTrigger::OnAnyObstacle,
        };
        let mut eager = started(&grid, start, goal, config);
        assert_eq!(
            eager.insert_obstacle(&mut grid, Cell::new(4, 3)),
            ObstacleEffect::PathInvalidated
        );
        assert_eq!(eager.state(), ReplanState::Replanning);
    }

    #[test]
    fn test_random_walls_keep_paths_valid() {
        let mut rng = StdRng::seed_from_u64(42);
        let start = Cell::new(1, 1);
        let goal = Cell::new(18, 23);
        let mut grid = GridMap::random_bordered(20, 25, 0.2, start, goal, &mut rng).unwrap();
        let config = ReplanConfig {
            obstacle_probability: 1.0,
            ..Default::default()
        };
        let mut controller = started(&grid, start, goal, config);

        for _ in 0..5_000 {
            let report = controller.tick(&mut grid, &mut rng);
            assert!(grid.is_free(report.agent));
            if let Some(result) = report.replan.as_ref().filter(|r| r.is_found()) {
                assert!(grid.is_valid_path(&result.path, report.agent, goal));
            }
            if report.is_terminal() {
                break;
            }
        }
        assert!(controller.state().is_terminal());
    }
}
