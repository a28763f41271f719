//! Iteration count for amplitude amplification.
//!
//! With `M` of `N` states marked, the initial overlap angle is
//! `θ = asin(√(M/N))` and after `k` oracle+diffuser rounds the marked
//! probability is `sin²((2k+1)θ)`. The planner picks the best `k` in
//! `0..=⌈π/(4θ)⌉`, comparing `k = 0` with the two integers around
//! `π/(4θ) - ½`.

use std::f64::consts::PI;

use serde::Serialize;
use tracing::debug;

use crate::error::{SimError, SimResult};
use crate::oracle::Oracle;

/// Probabilities closer than this are treated as equal when choosing k.
const TIE_TOLERANCE: f64 = 1e-12;

/// Planned iteration count for a search over `search_space` states.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IterationPlan {
    /// N.
    pub search_space: usize,
    /// M.
    pub solutions: usize,
    /// `asin(√(M/N))`.
    pub theta: f64,
    /// Chosen k.
    pub iterations: usize,
    /// `sin²((2k+1)θ)` for the chosen k.
    pub success_probability: f64,
}

impl IterationPlan {
    /// Plan a search for `solutions` marked states among `search_space`.
    pub fn compute(search_space: usize, solutions: usize) -> SimResult<Self> {
        if solutions == 0 {
            return Err(SimError::NoSolution { search_space });
        }
        if solutions > search_space {
            return Err(SimError::TooManySolutions {
                solutions,
                search_space,
            });
        }

        let theta = (solutions as f64 / search_space as f64).sqrt().asin();
        let success = |k: usize| ((2 * k + 1) as f64 * theta).sin().powi(2);

        // Every state is a solution: measuring the uniform state already succeeds.
        if solutions == search_space {
            return Ok(Self {
                search_space,
                solutions,
                theta,
                iterations: 0,
                success_probability: success(0),
            });
        }

        let target = PI / (4.0 * theta);
        let nearest = target.round();
        let bound = target.ceil() as usize;

        // sin²((2k+1)θ) peaks where (2k+1)θ is nearest π/2, so only the two
        // integers around target - ½ can beat k = 0 within the bound.
        let below = ((target - 0.5).floor().max(0.0) as usize).min(bound);
        let above = below.saturating_add(1).min(bound);

        let mut best = 0usize;
        let mut best_p = success(0);
        for k in [below, above] {
            let p = success(k);
            let better = if (p - best_p).abs() <= TIE_TOLERANCE {
                (k as f64 - nearest).abs() < (best as f64 - nearest).abs()
            } else {
                p > best_p
            };
            if better {
                best = k;
                best_p = p;
            }
        }

        debug!(
            search_space,
            solutions,
            theta,
            iterations = best,
            success_probability = best_p,
            "planned amplitude amplification"
        );
        Ok(Self {
            search_space,
            solutions,
            theta,
            iterations: best,
            success_probability: best_p,
        })
    }

    /// Plan for the marked set of `oracle`.
    pub fn for_oracle(oracle: &Oracle) -> SimResult<Self> {
        Self::compute(oracle.search_space(), oracle.num_solutions())
    }

    /// Marked probability after exactly `k` rounds.
    pub fn success_probability_after(&self, k: usize) -> f64 {
        ((2 * k + 1) as f64 * self.theta).sin().powi(2)
    }
}

/// Just the iteration count of [`IterationPlan::compute`].
pub fn optimal_iterations(search_space: usize, solutions: usize) -> SimResult<usize> {
    IterationPlan::compute(search_space, solutions).map(|plan| plan.iterations)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_qubits_one_solution() {
        let plan = IterationPlan::compute(4, 1).unwrap();
        assert_eq!(plan.iterations, 1);
        assert!((plan.success_probability - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_no_solution() {
        for n in [1, 4, 1024] {
            assert!(matches!(
                IterationPlan::compute(n, 0),
                Err(SimError::NoSolution { search_space }) if search_space == n
            ));
        }
    }

    #[test]
    fn test_too_many_solutions() {
        assert!(matches!(
            optimal_iterations(4, 5),
            Err(SimError::TooManySolutions {
                solutions: 5,
                search_space: 4
            })
        ));
    }

    #[test]
    fn test_all_marked_needs_no_iterations() {
        let plan = IterationPlan::compute(8, 8).unwrap();
        assert_eq!(plan.iterations, 0);
        assert!((plan.success_probability - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_three_of_eight() {
        let plan = IterationPlan::compute(8, 3).unwrap();
        let theta = (3.0f64 / 8.0).sqrt().asin();
        assert_eq!(plan.iterations, (PI / (4.0 * theta)).round() as usize);
        assert_eq!(plan.iterations, 1);
        assert!((plan.success_probability - 27.0 / 32.0).abs() < 1e-12);
    }

    #[test]
    fn test_large_search_matches_textbook_estimate() {
        // For M << N the optimum is close to (π/4)·√(N/M).
        let k = optimal_iterations(1 << 20, 1).unwrap();
        let estimate = (PI / 4.0 * ((1u64 << 20) as f64).sqrt()).floor() as usize;
        assert!(k.abs_diff(estimate) <= 1, "k={k}, estimate={estimate}");
        let plan = IterationPlan::compute(1 << 20, 1).unwrap();
        assert!(plan.success_probability > 0.999);
    }

    #[test]
    fn test_chosen_k_is_never_beaten_within_bound() {
        for n in 1..=8usize {
            let space = 1usize << n;
            for m in 1..space {
                let plan = IterationPlan::compute(space, m).unwrap();
                let bound = (PI / (4.0 * plan.theta)).ceil() as usize;
                for k in 0..=bound {
                    assert!(
                        plan.success_probability_after(k)
                            <= plan.success_probability + TIE_TOLERANCE,
                        "N={space} M={m} k={k}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_huge_search_space_plans_in_constant_time() {
        let start = std::time::Instant::now();
        let plan = IterationPlan::compute(1 << 56, 1).unwrap();
        assert!(start.elapsed() < std::time::Duration::from_millis(100));
        let textbook = PI / 4.0 * 2f64.powi(28);
        assert!((plan.iterations as f64 - textbook).abs() < 1.0, "{}", plan.iterations);
        assert!(plan.success_probability > 1.0 - 1e-6);
    }

    #[test]
    fn test_for_oracle() {
        let oracle = Oracle::from_bitstrings(2, &["11"]).unwrap();
        let plan = IterationPlan::for_oracle(&oracle).unwrap();
        assert_eq!(plan.search_space, 4);
        assert_eq!(plan.solutions, 1);
        assert_eq!(plan.iterations, 1);
    }
}
