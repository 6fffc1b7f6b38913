//! Distance heuristics for grid search
//!
//! All three metrics are admissible and consistent on a 4-connected grid with
//! unit move cost, which A* needs for its optimality guarantee.

use crate::common::{Cell, HeuristicKind};

/// Estimate the remaining cost from `a` to `b` under the given metric
pub fn estimate(a: Cell, b: Cell, kind: HeuristicKind) -> f64 {
    let dr = a.row.abs_diff(b.row) as f64;
    let dc = a.col.abs_diff(b.col) as f64;
    match kind {
        HeuristicKind::Manhattan => dr + dc,
        HeuristicKind::Euclidean => dr.hypot(dc),
        HeuristicKind::Chebyshev => dr.max(dc),
    }
}

impl HeuristicKind {
    pub fn estimate(&self, a: Cell, b: Cell) -> f64 {
        estimate(a, b, *self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_values() {
        let a = Cell::new(1, 1);
        let b = Cell::new(4, 5);
        assert_eq!(estimate(a, b, HeuristicKind::Manhattan), 7.0);
        assert!((estimate(a, b, HeuristicKind::Euclidean) - 5.0).abs() < 1e-10);
        assert_eq!(estimate(a, b, HeuristicKind::Chebyshev), 4.0);
    }

    #[test]
    fn test_zero_at_goal_and_symmetric() {
        let a = Cell::new(3, 8);
        let b = Cell::new(6, 2);
        for kind in HeuristicKind::ALL {
            assert_eq!(kind.estimate(a, a), 0.0);
            assert_eq!(kind.estimate(a, b), kind.estimate(b, a));
        }
    }

    #[test]
    fn test_consistent_across_unit_moves() {
        // |h(n) - h(m)| <= 1 for every orthogonal step n -> m
        let goal = Cell::new(5, 5);
        for r in 0..10 {
            for c in 0..10 {
                let n = Cell::new(r, c);
                for m in n.neighbors4() {
                    for kind in HeuristicKind::ALL {
                        let diff = (kind.estimate(n, goal) - kind.estimate(m, goal)).abs();
                        assert!(diff <= 1.0 + 1e-12, "{} {} -> {}", kind, n, m);
                    }
                }
            }
        }
    }

    #[test]
    fn test_never_exceeds_manhattan() {
        // Manhattan is the exact distance on an open 4-connected grid
        let a = Cell::new(0, 0);
        for r in 0..8 {
            for c in 0..8 {
                let b = Cell::new(r, c);
                let exact = estimate(a, b, HeuristicKind::Manhattan);
                assert!(estimate(a, b, HeuristicKind::Euclidean) <= exact);
                assert!(estimate(a, b, HeuristicKind::Chebyshev) <= exact);
            }
        }
    }
}
