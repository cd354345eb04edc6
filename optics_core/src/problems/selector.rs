//! Problem selection: by kind, by difficulty, or a random sample.
//!
//! Selection never mutates the bank and returns references into it. Random
//! selection draws without replacement, so a quiz never repeats a problem;
//! pass a seeded RNG to [`random_problems_with`] for a reproducible draw.

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use crate::calculations::CalculationKind;
use crate::problems::bank::{all_problems, category};
use crate::problems::{CalculationProblem, Difficulty};

/// All problems of one kind, in bank order.
pub fn problems_by_kind(kind: CalculationKind) -> Vec<&'static CalculationProblem> {
    category(kind).problems.iter().collect()
}

/// All problems at one difficulty, optionally restricted to a kind.
pub fn problems_by_difficulty(
    difficulty: Difficulty,
    kind: Option<CalculationKind>,
) -> Vec<&'static CalculationProblem> {
    pool(kind).into_iter().filter(|p| p.difficulty == difficulty).collect()
}

/// Up to `count` distinct problems drawn at random.
///
/// Asking for more than the pool holds returns the whole pool, shuffled.
pub fn random_problems(count: usize, kind: Option<CalculationKind>) -> Vec<&'static CalculationProblem> {
    random_problems_with(count, kind, &mut rand::thread_rng())
}

/// [`random_problems`] with a caller-supplied RNG.
pub fn random_problems_with<R: Rng + ?Sized>(
    count: usize,
    kind: Option<CalculationKind>,
    rng: &mut R,
) -> Vec<&'static CalculationProblem> {
    let pool = pool(kind);
    let picked: Vec<_> = pool.choose_multiple(rng, count).copied().collect();
    debug!(
        requested = count,
        available = pool.len(),
        selected = picked.len(),
        kind = ?kind,
        "selected random problems"
    );
    picked
}

fn pool(kind: Option<CalculationKind>) -> Vec<&'static CalculationProblem> {
    match kind {
        Some(kind) => problems_by_kind(kind),
        None => all_problems().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn test_by_kind() {
        let problems = problems_by_kind(CalculationKind::VertexDistance);
        assert_eq!(problems.len(), 5);
        assert!(problems.iter().all(|p| p.kind() == CalculationKind::VertexDistance));
    }

    #[test]
    fn test_by_difficulty() {
        let easy = problems_by_difficulty(Difficulty::Easy, None);
        assert!(!easy.is_empty());
        assert!(easy.iter().all(|p| p.difficulty == Difficulty::Easy));

        let hard_prism = problems_by_difficulty(Difficulty::Hard, Some(CalculationKind::Prism));
        assert_eq!(hard_prism.len(), 2);
        assert!(hard_prism.iter().all(|p| p.kind() == CalculationKind::Prism));
    }

    #[test]
    fn test_difficulties_partition_the_bank() {
        let total: usize = Difficulty::ALL
            .into_iter()
            .map(|d| problems_by_difficulty(d, None).len())
            .sum();
        assert_eq!(total, all_problems().count());
    }

    #[test]
    fn test_random_draw_has_no_duplicates() {
        let mut rng = StdRng::seed_from_u64(7);
        let drawn = random_problems_with(10, None, &mut rng);
        assert_eq!(drawn.len(), 10);
        let ids: HashSet<_> = drawn.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids.len(), 10);
    }

    #[test]
    fn test_random_draw_is_reproducible_with_seed() {
        let a: Vec<_> = random_problems_with(5, None, &mut StdRng::seed_from_u64(42))
            .iter()
            .map(|p| p.id.clone())
            .collect();
        let b: Vec<_> = random_problems_with(5, None, &mut StdRng::seed_from_u64(42))
            .iter()
            .map(|p| p.id.clone())
            .collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_oversized_request_returns_whole_pool() {
        let drawn = random_problems(100, Some(CalculationKind::Magnification));
        assert_eq!(drawn.len(), 4);
        assert!(drawn.iter().all(|p| p.kind() == CalculationKind::Magnification));
    }

    #[test]
    fn test_zero_count() {
        assert!(random_problems(0, None).is_empty());
    }
}
