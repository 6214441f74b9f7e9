use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::reviews::{ReviewError, ReviewRepository};

/// Compute the aggregate (average rating, review count) for a set of ratings.
///
/// An empty set yields (0.0, 0). Otherwise the arithmetic mean is rounded to
/// one decimal place half-up; ratings are non-negative, so midpoint-away-
/// from-zero is the same rounding.
pub(crate) fn aggregate_ratings(ratings: &[Decimal]) -> (f64, i32) {
    if ratings.is_empty() {
        return (0.0, 0);
    }

    let sum: Decimal = ratings.iter().copied().sum();
    let mean = sum / Decimal::from(ratings.len() as i64);
    let rounded = mean.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);

    (rounded.to_f64().unwrap_or(0.0), ratings.len() as i32)
}

/// Calculator for the derived rating fields on a service proposal
///
/// The calculator is the only writer of average_rating and review_count; it
/// runs synchronously after every review insert or delete so the stored
/// aggregate always reflects the post-mutation review set.
#[derive(Clone)]
pub struct RatingCalculator {
    repository: ReviewRepository,
}

impl RatingCalculator {
    /// Create a new RatingCalculator
    pub fn new(repository: ReviewRepository) -> Self {
        Self { repository }
    }

    /// Recalculate and persist the average rating for a service proposal
    ///
    /// Existence of the service is not re-checked here; every call site has
    /// already resolved the id. Two interleaved recalculations for the same
    /// service can lose an update; matching the original behavior, no lock is
    /// taken. Returns the stored average.
    pub async fn recalculate(&self, service_id: i64) -> Result<f64, ReviewError> {
        let ratings = self.repository.get_ratings_for_service(service_id).await?;
        let (average, count) = aggregate_ratings(&ratings);

        self.repository
            .update_service_rating(service_id, average, count)
            .await?;

        tracing::debug!(
            "Updated service {} aggregate: average {} over {} reviews",
            service_id,
            average,
            count
        );
        Ok(average)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_empty_set_resets_aggregate() {
        assert_eq!(aggregate_ratings(&[]), (0.0, 0));
    }

    #[test]
    fn test_single_review_average_is_its_rating() {
        assert_eq!(aggregate_ratings(&[dec!(3.7)]), (3.7, 1));
        assert_eq!(aggregate_ratings(&[dec!(5.0)]), (5.0, 1));
    }

    #[test]
    fn test_three_reviews_then_delete_scenario() {
        // 5.0, 4.0, 3.0 -> 4.0 over 3
        assert_eq!(
            aggregate_ratings(&[dec!(5.0), dec!(4.0), dec!(3.0)]),
            (4.0, 3)
        );
        // Dropping the 3.0 -> 4.5 over 2
        assert_eq!(aggregate_ratings(&[dec!(5.0), dec!(4.0)]), (4.5, 2));
    }

    #[test]
    fn test_midpoint_rounds_up() {
        // Mean 4.25 rounds to 4.3, not 4.2
        assert_eq!(aggregate_ratings(&[dec!(4.2), dec!(4.3)]), (4.3, 2));
        // Mean 0.15 rounds to 0.2
        assert_eq!(aggregate_ratings(&[dec!(0.1), dec!(0.2)]), (0.2, 2));
        // Mean 3.05 rounds to 3.1
        assert_eq!(aggregate_ratings(&[dec!(2.8), dec!(3.3)]), (3.1, 2));
    }

    #[test]
    fn test_repeating_mean_truncates_to_one_decimal() {
        // (5 + 4 + 4) / 3 = 4.333... -> 4.3
        assert_eq!(
            aggregate_ratings(&[dec!(5.0), dec!(4.0), dec!(4.0)]),
            (4.3, 3)
        );
        // (5 + 5 + 4) / 3 = 4.666... -> 4.7
        assert_eq!(
            aggregate_ratings(&[dec!(5.0), dec!(5.0), dec!(4.0)]),
            (4.7, 3)
        );
    }

    /// Reference half-up rounding over ratings expressed in tenths, using
    /// integer arithmetic only: the mean in tenths is sum/n, rounded up when
    /// the fractional part is at least one half.
    fn expected_average_tenths(tenths: &[i64]) -> f64 {
        let n = tenths.len() as i64;
        let sum: i64 = tenths.iter().sum();
        let quotient = sum / n;
        let remainder = sum % n;
        let rounded_tenths = if 2 * remainder >= n { quotient + 1 } else { quotient };
        rounded_tenths as f64 / 10.0
    }

    proptest! {
        #[test]
        fn prop_average_matches_integer_reference(
            tenths in proptest::collection::vec(0i64..=50, 1..=40)
        ) {
            let ratings: Vec<Decimal> =
                tenths.iter().map(|&t| Decimal::new(t, 1)).collect();

            let (average, count) = aggregate_ratings(&ratings);

            prop_assert_eq!(count as usize, tenths.len());
            prop_assert_eq!(average, expected_average_tenths(&tenths));
        }

        #[test]
        fn prop_average_stays_within_rating_bounds(
            tenths in proptest::collection::vec(0i64..=50, 1..=40)
        ) {
            let ratings: Vec<Decimal> =
                tenths.iter().map(|&t| Decimal::new(t, 1)).collect();

            let (average, _) = aggregate_ratings(&ratings);

            prop_assert!(average >= 0.0);
            prop_assert!(average <= 5.0);
        }

        #[test]
        fn prop_uniform_ratings_average_to_themselves(
            tenth in 0i64..=50,
            len in 1usize..=20
        ) {
            let ratings = vec![Decimal::new(tenth, 1); len];
            let (average, count) = aggregate_ratings(&ratings);

            prop_assert_eq!(average, tenth as f64 / 10.0);
            prop_assert_eq!(count as usize, len);
        }
    }
}
