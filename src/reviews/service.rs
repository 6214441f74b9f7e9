use chrono::{Duration, Utc};
use validator::Validate;

use crate::reviews::{
    CreateReviewRequest, RatingCalculator, Review, ReviewError, ReviewRepository,
};

/// Resolve the display name shown on a review.
///
/// The account name wins when it is present and non-empty; otherwise the
/// local part of the email is used, or the whole email when it has no '@'.
pub(crate) fn derive_client_name(email: &str, account_name: Option<&str>) -> String {
    match account_name {
        Some(name) if !name.trim().is_empty() => name.to_string(),
        _ => match email.find('@') {
            Some(at) => email[..at].to_string(),
            None => email.to_string(),
        },
    }
}

/// Service layer for review business logic
#[derive(Clone)]
pub struct ReviewService {
    repository: ReviewRepository,
    rating_calculator: RatingCalculator,
}

impl ReviewService {
    /// Create a new ReviewService
    pub fn new(repository: ReviewRepository, rating_calculator: RatingCalculator) -> Self {
        Self {
            repository,
            rating_calculator,
        }
    }

    /// Add a review for a service
    ///
    /// 1. Rejects a duplicate (client already reviewed this service)
    /// 2. Resolves the service (also supplying the provider default)
    /// 3. Resolves the client display name
    /// 4. Applies defaults for comment, review date, and booking dates
    /// 5. Persists the review, then recalculates the service aggregate
    pub async fn add_review(
        &self,
        service_id: i64,
        client_email: &str,
        request: CreateReviewRequest,
    ) -> Result<Review, ReviewError> {
        request
            .validate()
            .map_err(|e| ReviewError::ValidationError(format!("Validation failed: {}", e)))?;

        if self
            .repository
            .exists_by_service_and_email(service_id, client_email)
            .await?
        {
            return Err(ReviewError::DuplicateReview);
        }

        let service_name = self
            .repository
            .find_service_name(service_id)
            .await?
            .ok_or(ReviewError::ServiceNotFound)?;

        let account_name = self.repository.find_account_name(client_email).await?;
        let client_name = derive_client_name(client_email, account_name.as_deref());

        let today = Utc::now().date_naive();
        let comment = request.comment.unwrap_or_default();
        let provider = request.provider.unwrap_or(service_name);
        let booking_start = request
            .booking_start_date
            .unwrap_or(today - Duration::days(7));
        let booking_end = request.booking_end_date.unwrap_or(today);

        let review = self
            .repository
            .create(
                service_id,
                client_email,
                &client_name,
                Some(&provider),
                request.rating,
                &comment,
                today,
                booking_start,
                booking_end,
            )
            .await?;

        // The aggregate must reflect the post-insert review set
        self.rating_calculator.recalculate(service_id).await?;

        tracing::info!(
            "Review {} saved for service {} by {}",
            review.id,
            service_id,
            client_name
        );
        Ok(review)
    }

    /// Delete a review owned by the requesting client
    ///
    /// Recalculates the owning service's aggregate after the delete commits.
    pub async fn delete_review(
        &self,
        review_id: i64,
        requester_email: &str,
    ) -> Result<(), ReviewError> {
        let review = self
            .repository
            .find_by_id(review_id)
            .await?
            .ok_or(ReviewError::NotFound)?;

        if review.client_email != requester_email {
            return Err(ReviewError::Forbidden);
        }

        let service_id = review.service_id;
        self.repository.delete(review_id).await?;
        self.rating_calculator.recalculate(service_id).await?;

        Ok(())
    }

    /// All reviews for a service, newest first
    pub async fn get_reviews_for_service(
        &self,
        service_id: i64,
    ) -> Result<Vec<Review>, ReviewError> {
        self.repository.find_by_service(service_id).await
    }

    /// All reviews written by a client, newest first
    pub async fn get_reviews_by_client(
        &self,
        client_email: &str,
    ) -> Result<Vec<Review>, ReviewError> {
        self.repository.find_by_client_email(client_email).await
    }

    /// Whether the client has already reviewed the service
    pub async fn has_reviewed(
        &self,
        service_id: i64,
        client_email: &str,
    ) -> Result<bool, ReviewError> {
        self.repository
            .exists_by_service_and_email(service_id, client_email)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_name_wins_when_present() {
        assert_eq!(
            derive_client_name("jdoe@example.com", Some("John Doe")),
            "John Doe"
        );
    }

    #[test]
    fn test_email_local_part_used_without_account() {
        assert_eq!(derive_client_name("jdoe@example.com", None), "jdoe");
    }

    #[test]
    fn test_blank_account_name_falls_back_to_email() {
        assert_eq!(derive_client_name("jdoe@example.com", Some("")), "jdoe");
        assert_eq!(derive_client_name("jdoe@example.com", Some("   ")), "jdoe");
    }

    #[test]
    fn test_email_without_at_sign_used_verbatim() {
        assert_eq!(derive_client_name("not-an-email", None), "not-an-email");
    }

    #[test]
    fn test_first_at_sign_splits_the_local_part() {
        assert_eq!(derive_client_name("a@b@c.com", None), "a");
    }
}
