//! Per-student classification draws.
//!
//! Administrative axes (home language, special education, economic
//! disadvantage, homelessness) use exact quotas: a budget is computed up front
//! from the population size and drawn down one student at a time, so realized
//! counts match the targets. Ethnicity is sampled from a weighted pool instead,
//! so its counts only approach the targets.

use rand::Rng;

use schoolroll_core::{DistributionTargets, Ethnicity, Language};

use crate::errors::GenerationError;

/// Integer budget for `percentage` percent of `total`, rounded half away from zero.
pub fn quota_for(total: u64, percentage: f64) -> u64 {
    (total as f64 * percentage / 100.0).round().max(0.0) as u64
}

/// Budget for one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quota<T> {
    pub category: T,
    pub target: u64,
    pub remaining: u64,
}

impl<T> Quota<T> {
    fn new(category: T, target: u64) -> Self {
        Self {
            category,
            target,
            remaining: target,
        }
    }
}

/// Quota-exhaustion allocator over a fixed priority order of categories.
#[derive(Debug, Clone)]
pub struct QuotaAllocator<T> {
    quotas: Vec<Quota<T>>,
    default: T,
}

impl<T: Copy + PartialEq> QuotaAllocator<T> {
    /// Quotas computed independently per category as `round(total × pct / 100)`.
    /// They are not forced to sum to `total`; draws past the last budget
    /// return `default`.
    pub fn from_rates(total: u64, rates: &[(T, f64)], default: T) -> Self {
        let quotas = rates
            .iter()
            .map(|(category, percentage)| Quota::new(*category, quota_for(total, *percentage)))
            .collect();
        Self { quotas, default }
    }

    /// Split `total` across categories by the largest-remainder method so the
    /// budgets sum to `round(total × Σshares / 100)` exactly. Ties on the
    /// remainder go to the earlier category.
    pub fn apportion(total: u64, shares: &[(T, f64)], default: T) -> Self {
        let share_sum: f64 = shares.iter().map(|(_, share)| share).sum();
        let budget = quota_for(total, share_sum).min(total);

        let exact: Vec<f64> = shares
            .iter()
            .map(|(_, share)| total as f64 * share / 100.0)
            .collect();
        let mut targets: Vec<u64> = exact.iter().map(|value| value.floor() as u64).collect();

        let assigned: u64 = targets.iter().sum();
        let mut leftover = budget.saturating_sub(assigned);

        let mut order: Vec<usize> = (0..shares.len())
            .filter(|idx| shares[*idx].1 > 0.0)
            .collect();
        order.sort_by(|a, b| {
            let frac_a = exact[*a] - exact[*a].floor();
            let frac_b = exact[*b] - exact[*b].floor();
            frac_b.total_cmp(&frac_a).then(a.cmp(b))
        });
        for idx in order {
            if leftover == 0 {
                break;
            }
            targets[idx] += 1;
            leftover -= 1;
        }

        let quotas = shares
            .iter()
            .zip(targets)
            .map(|((category, _), target)| Quota::new(*category, target))
            .collect();
        Self { quotas, default }
    }

    /// Take one unit from the first category with budget left, or return the
    /// default once every budget is spent.
    pub fn draw(&mut self) -> T {
        match self.quotas.iter_mut().find(|quota| quota.remaining > 0) {
            Some(quota) => {
                quota.remaining -= 1;
                quota.category
            }
            None => self.default,
        }
    }

    pub fn remaining(&self) -> u64 {
        self.quotas.iter().map(|quota| quota.remaining).sum()
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }

    /// Sum of the initial budgets.
    pub fn target_total(&self) -> u64 {
        self.quotas.iter().map(|quota| quota.target).sum()
    }

    pub fn quotas(&self) -> &[Quota<T>] {
        &self.quotas
    }
}

impl QuotaAllocator<bool> {
    /// Boolean axis: `round(total × pct / 100)` draws return `true`.
    pub fn flag(total: u64, percentage: f64) -> Self {
        Self::from_rates(total, &[(true, percentage)], false)
    }
}

/// Pool where each category appears once per whole percentage point.
#[derive(Debug, Clone)]
pub struct WeightedPool<T> {
    pool: Vec<T>,
}

impl<T: Copy> WeightedPool<T> {
    pub fn new(weights: &[(T, f64)]) -> Result<Self, GenerationError> {
        let pool: Vec<T> = weights
            .iter()
            .flat_map(|(category, weight)| {
                std::iter::repeat_n(*category, weight.round().max(0.0) as usize)
            })
            .collect();
        if pool.is_empty() {
            return Err(GenerationError::InvalidOptions(
                "weighted pool has no entries".to_string(),
            ));
        }
        Ok(Self { pool })
    }

    /// Uniform pick from the pool.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> T {
        self.pool[rng.random_range(0..self.pool.len())]
    }

    pub fn len(&self) -> usize {
        self.pool.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pool.is_empty()
    }
}

/// Classification of one student across every axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StudentDraws {
    pub ethnicity: Ethnicity,
    pub language: Language,
    pub special_education: bool,
    pub economically_disadvantaged: bool,
    pub homeless: bool,
}

/// Every allocator used by the student loop, built for one population size.
#[derive(Debug, Clone)]
pub struct ClassificationAxes {
    pub ethnicity: WeightedPool<Ethnicity>,
    pub language: QuotaAllocator<Language>,
    pub special_education: QuotaAllocator<bool>,
    pub economically_disadvantaged: QuotaAllocator<bool>,
    pub homeless: QuotaAllocator<bool>,
}

impl ClassificationAxes {
    pub fn new(students: u64, targets: &DistributionTargets) -> Result<Self, GenerationError> {
        let ethnicity: Vec<(Ethnicity, f64)> = targets
            .ethnicity
            .iter()
            .map(|weight| (weight.ethnicity, weight.percentage))
            .collect();
        let languages: Vec<(Language, f64)> = targets
            .ell_languages
            .iter()
            .map(|share| (share.language, share.percentage))
            .collect();
        let ell_total = quota_for(students, targets.ell);

        Ok(Self {
            ethnicity: WeightedPool::new(&ethnicity)?,
            language: QuotaAllocator::apportion(ell_total, &languages, Language::English),
            special_education: QuotaAllocator::flag(students, targets.special_education),
            economically_disadvantaged: QuotaAllocator::flag(
                students,
                targets.economically_disadvantaged,
            ),
            homeless: QuotaAllocator::flag(students, targets.homeless),
        })
    }

    /// Draw one student's classification, in the order ethnicity, language,
    /// special education, economic disadvantage, homelessness.
    pub fn draw<R: Rng + ?Sized>(&mut self, rng: &mut R) -> StudentDraws {
        StudentDraws {
            ethnicity: self.ethnicity.sample(rng),
            language: self.language.draw(),
            special_education: self.special_education.draw(),
            economically_disadvantaged: self.economically_disadvantaged.draw(),
            homeless: self.homeless.draw(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    #[test]
    fn quota_rounds_half_away_from_zero() {
        assert_eq!(quota_for(100, 21.3), 21);
        assert_eq!(quota_for(100, 90.1), 90);
        assert_eq!(quota_for(100, 2.0), 2);
        assert_eq!(quota_for(50, 25.0), 13);
        assert_eq!(quota_for(0, 50.0), 0);
    }

    #[test]
    fn draws_in_priority_order_then_default() {
        let mut allocator =
            QuotaAllocator::from_rates(10, &[("a", 20.0), ("b", 10.0)], "none");
        let draws: Vec<_> = (0..5).map(|_| allocator.draw()).collect();
        assert_eq!(draws, vec!["a", "a", "b", "none", "none"]);
        assert!(allocator.is_exhausted());
    }

    #[test]
    fn independent_rounding_may_drift() {
        let allocator = QuotaAllocator::from_rates(10, &[(1, 35.0), (2, 35.0), (3, 30.0)], 0);
        assert_eq!(allocator.target_total(), 4 + 4 + 3);
    }

    #[test]
    fn flag_axis_is_exact() {
        let mut allocator = QuotaAllocator::flag(100, 21.3);
        let flagged = (0..100).filter(|_| allocator.draw()).count();
        assert_eq!(flagged, 21);
        assert!(!allocator.draw());
    }

    #[test]
    fn apportion_matches_budget_for_every_total() {
        let shares = [
            (Language::Spanish, 98.0),
            (Language::Arabic, 1.0),
            (Language::Russian, 1.0),
        ];
        for total in 0..400 {
            let allocator = QuotaAllocator::apportion(total, &shares, Language::English);
            assert_eq!(allocator.target_total(), total, "total {total}");
        }

        let allocator = QuotaAllocator::apportion(25, &shares, Language::English);
        let targets: Vec<u64> = allocator.quotas().iter().map(|quota| quota.target).collect();
        assert_eq!(targets, vec![25, 0, 0]);

        // 50 ELLs (N=200): Arabic and Russian tie at 0.5 and the single
        // leftover unit goes to Arabic, so Russian gets 0 and the total stays 50.
        let allocator = QuotaAllocator::apportion(50, &shares, Language::English);
        let targets: Vec<u64> = allocator.quotas().iter().map(|quota| quota.target).collect();
        assert_eq!(targets, vec![49, 1, 0]);
    }

    #[test]
    fn apportion_leaves_room_for_default_when_shares_are_partial() {
        let mut allocator = QuotaAllocator::apportion(10, &[("x", 50.0)], "rest");
        assert_eq!(allocator.target_total(), 5);
        let rest = (0..10).filter(|_| allocator.draw() == "rest").count();
        assert_eq!(rest, 5);
    }

    #[test]
    fn weighted_pool_repeats_by_percentage() {
        let pool = WeightedPool::new(&[("a", 94.0), ("b", 3.0), ("c", 0.2)]).expect("pool");
        assert_eq!(pool.len(), 97);
        assert!(WeightedPool::new(&[("a", 0.0)]).is_err());
    }

    #[test]
    fn ethnicity_converges_to_targets() {
        let targets = DistributionTargets::default();
        let mut axes = ClassificationAxes::new(20_000, &targets).expect("axes");
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut counts: HashMap<Ethnicity, u64> = HashMap::new();
        for _ in 0..20_000 {
            *counts.entry(axes.draw(&mut rng).ethnicity).or_insert(0) += 1;
        }
        for weight in &targets.ethnicity {
            let observed =
                *counts.get(&weight.ethnicity).unwrap_or(&0) as f64 / 20_000.0 * 100.0;
            assert!(
                (observed - weight.percentage).abs() < 1.0,
                "{} observed {observed:.2}%",
                weight.ethnicity
            );
        }
    }

    #[test]
    fn axes_realize_exact_quotas() {
        let targets = DistributionTargets::default();
        let mut axes = ClassificationAxes::new(100, &targets).expect("axes");
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let draws: Vec<StudentDraws> = (0..100).map(|_| axes.draw(&mut rng)).collect();

        assert_eq!(draws.iter().filter(|draw| draw.special_education).count(), 21);
        assert_eq!(
            draws.iter().filter(|draw| draw.economically_disadvantaged).count(),
            90
        );
        assert_eq!(draws.iter().filter(|draw| draw.homeless).count(), 2);
        assert_eq!(draws.iter().filter(|draw| draw.language.is_ell()).count(), 25);
        assert!(draws[..25].iter().all(|draw| draw.language == Language::Spanish));
    }
}
