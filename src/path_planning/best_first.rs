//! Best-first grid search (A* and greedy best-first)
//!
//! Both strategies share one traversal loop over a 4-connected grid with unit
//! move cost. The strategy only decides two things: whether cost-so-far is part
//! of the priority key, and whether an already recorded cost that is at least
//! as good blocks relaxation of a neighbor.
//!
//! The frontier uses lazy deletion: stale entries stay in the heap and are
//! discarded when popped if their cell is already closed. Closed cells are
//! never reopened, which is correct for A* because every provided heuristic is
//! consistent.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};
use std::time::Instant;

use log::{debug, trace, warn};
use ordered_float::OrderedFloat;

use crate::common::{Cell, GridSearch, HeuristicKind, SearchResult, SearchStrategy};
use crate::path_planning::heuristic::estimate;
use crate::utils::GridMap;

/// Configuration for the best-first planner
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BestFirstConfig {
    pub strategy: SearchStrategy,
    pub heuristic: HeuristicKind,
    /// Hard cap on closed cells, start included; a search that would close
    /// more reports the goal as unreachable
    pub max_expansions: Option<usize>,
}

/// Frontier entry ordered by priority, then row, then column (min-heap)
#[derive(Debug, PartialEq, Eq)]
struct PriorityNode {
    priority: OrderedFloat<f64>,
    cell: Cell,
}

impl PriorityNode {
    fn new(priority: f64, cell: Cell) -> Self {
        Self {
            priority: OrderedFloat(priority),
            cell,
        }
    }
}

impl Ord for PriorityNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap behavior
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| other.cell.cmp(&self.cell))
    }
}

impl PartialOrd for PriorityNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A* / greedy best-first planner over a [`GridMap`]
#[derive(Debug, Clone, Default)]
pub struct BestFirstSearch {
    config: BestFirstConfig,
}

impl BestFirstSearch {
    pub fn new(config: BestFirstConfig) -> Self {
        Self { config }
    }

    /// Planner with the given strategy and heuristic and no expansion cap
    pub fn with_strategy(strategy: SearchStrategy, heuristic: HeuristicKind) -> Self {
        Self::new(BestFirstConfig {
            strategy,
            heuristic,
            ..Default::default()
        })
    }

    pub fn config(&self) -> &BestFirstConfig {
        &self.config
    }

    fn priority(&self, cost_so_far: usize, cell: Cell, goal: Cell) -> f64 {
        let h = estimate(cell, goal, self.config.heuristic);
        match self.config.strategy {
            SearchStrategy::AStar => cost_so_far as f64 + h,
            SearchStrategy::GreedyBestFirst => h,
        }
    }

    /// Start and goal count as free even if the matrix says otherwise
    fn is_passable(grid: &GridMap, cell: Cell, start: Cell, goal: Cell) -> bool {
        grid.in_bounds(cell) && (cell == start || cell == goal || grid.is_free(cell))
    }

    fn reconstruct_path(predecessor: &HashMap<Cell, Cell>, start: Cell, goal: Cell) -> Vec<Cell> {
        let mut path = vec![goal];
        let mut current = goal;
        while current != start {
            match predecessor.get(&current) {
                Some(&prev) => {
                    path.push(prev);
                    current = prev;
                }
                None => break,
            }
        }
        path.reverse();
        path
    }
}

impl GridSearch for BestFirstSearch {
    fn search(&self, grid: &GridMap, start: Cell, goal: Cell) -> SearchResult {
        let started = Instant::now();
        let strategy = self.config.strategy;

        let mut best_cost: HashMap<Cell, usize> = HashMap::new();
        let mut predecessor: HashMap<Cell, Cell> = HashMap::new();
        let mut frontier = BinaryHeap::new();
        let mut closed: HashSet<Cell> = HashSet::new();
        let mut visited = Vec::new();

        best_cost.insert(start, 0);
        frontier.push(PriorityNode::new(self.priority(0, start, goal), start));

        while let Some(PriorityNode { cell: current, .. }) = frontier.pop() {
            if closed.contains(&current) {
                continue;
            }
            if let Some(limit) = self.config.max_expansions {
                if visited.len() >= limit {
                    warn!(
                        "{} gave up after {} expansions without reaching {}",
                        strategy, limit, goal
                    );
                    break;
                }
            }
            closed.insert(current);
            visited.push(current);

            if visited.len() % 100 == 0 {
                trace!(
                    "expanded: {}, frontier size: {}",
                    visited.len(),
                    frontier.len()
                );
            }

            if current == goal {
                let path = Self::reconstruct_path(&predecessor, start, goal);
                debug!(
                    "{} reached {} after {} expansions, cost {}",
                    strategy,
                    goal,
                    visited.len(),
                    path.len() - 1
                );
                return SearchResult {
                    path,
                    visited,
                    elapsed: started.elapsed(),
                };
            }

            let Some(&cost_so_far) = best_cost.get(&current) else {
                continue;
            };

            for next in current.neighbors4() {
                if !Self::is_passable(grid, next, start, goal) || closed.contains(&next) {
                    continue;
                }
                let new_cost = cost_so_far + 1;
                if strategy == SearchStrategy::AStar
                    && best_cost.get(&next).map_or(false, |&old| old <= new_cost)
                {
                    continue;
                }
                best_cost.insert(next, new_cost);
                predecessor.insert(next, current);
                frontier.push(PriorityNode::new(self.priority(new_cost, next, goal), next));
            }
        }

        debug!(
            "{} exhausted the frontier after {} expansions, {} unreachable from {}",
            strategy,
            visited.len(),
            goal,
            start
        );
        SearchResult {
            path: Vec::new(),
            visited,
            elapsed: started.elapsed(),
        }
    }
}

/// One-shot search with the given strategy and heuristic
pub fn search(
    grid: &GridMap,
    start: Cell,
    goal: Cell,
    strategy: SearchStrategy,
    heuristic: HeuristicKind,
) -> SearchResult {
    BestFirstSearch::with_strategy(strategy, heuristic).search(grid, start, goal)
}
