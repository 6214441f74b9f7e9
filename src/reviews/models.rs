use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Domain model representing a review in the database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Review {
    pub id: i64,
    pub service_id: i64,
    pub client_email: String,
    pub client_name: String,
    pub provider: Option<String>,
    pub rating: Decimal,
    pub comment: String,
    pub review_date: Option<NaiveDate>,
    pub booking_start_date: Option<NaiveDate>,
    pub booking_end_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request DTO for creating a new review
///
/// The reviewer's email comes from the authentication token, not the body.
#[derive(Debug, Deserialize, Validate, Clone)]
pub struct CreateReviewRequest {
    #[validate(custom = "crate::validation::validate_rating_range")]
    pub rating: Decimal,
    #[validate(length(max = 1000, message = "Comment must not exceed 1000 characters"))]
    pub comment: Option<String>,
    pub provider: Option<String>,
    pub booking_start_date: Option<NaiveDate>,
    pub booking_end_date: Option<NaiveDate>,
}

/// Response DTO for API responses
#[derive(Debug, Serialize)]
pub struct ReviewResponse {
    pub id: i64,
    pub service_id: i64,
    pub client_email: String,
    pub client_name: String,
    pub provider: Option<String>,
    pub rating: f64,
    pub comment: String,
    pub review_date: Option<NaiveDate>,
    pub booking_start_date: Option<NaiveDate>,
    pub booking_end_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl From<Review> for ReviewResponse {
    fn from(review: Review) -> Self {
        Self {
            id: review.id,
            service_id: review.service_id,
            client_email: review.client_email,
            client_name: review.client_name,
            provider: review.provider,
            rating: review.rating.to_f64().unwrap_or(0.0),
            comment: review.comment,
            review_date: review.review_date,
            booking_start_date: review.booking_start_date,
            booking_end_date: review.booking_end_date,
            created_at: review.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use validator::Validate;

    #[test]
    fn test_create_review_request_deserialization() {
        let json = r#"{
            "rating": 4.5,
            "comment": "Great service",
            "booking_start_date": "2024-03-01",
            "booking_end_date": "2024-03-08"
        }"#;

        let request: CreateReviewRequest =
            serde_json::from_str(json).expect("Failed to deserialize CreateReviewRequest");

        assert_eq!(request.rating, dec!(4.5));
        assert_eq!(request.comment.as_deref(), Some("Great service"));
        assert_eq!(request.provider, None);
        assert_eq!(
            request.booking_start_date,
            NaiveDate::from_ymd_opt(2024, 3, 1)
        );
    }

    #[test]
    fn test_create_review_request_minimal() {
        let json = r#"{"rating": 5}"#;

        let request: CreateReviewRequest =
            serde_json::from_str(json).expect("Failed to deserialize minimal request");

        assert_eq!(request.rating, dec!(5));
        assert_eq!(request.comment, None);
        assert_eq!(request.booking_start_date, None);
        assert_eq!(request.booking_end_date, None);
    }

    #[test]
    fn test_rating_out_of_bounds_fails_validation() {
        let ok = CreateReviewRequest {
            rating: dec!(5.0),
            comment: None,
            provider: None,
            booking_start_date: None,
            booking_end_date: None,
        };
        assert!(ok.validate().is_ok());

        let too_high = CreateReviewRequest {
            rating: dec!(5.5),
            ..ok.clone()
        };
        assert!(too_high.validate().is_err());

        let negative = CreateReviewRequest {
            rating: dec!(-1.0),
            ..ok
        };
        assert!(negative.validate().is_err());
    }

    #[test]
    fn test_review_response_rating_serializes_as_number() {
        let review = Review {
            id: 1,
            service_id: 2,
            client_email: "jdoe@example.com".to_string(),
            client_name: "jdoe".to_string(),
            provider: Some("Cleanly".to_string()),
            rating: dec!(4.5),
            comment: "".to_string(),
            review_date: NaiveDate::from_ymd_opt(2024, 3, 8),
            booking_start_date: None,
            booking_end_date: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_string(&ReviewResponse::from(review))
            .expect("Failed to serialize ReviewResponse");

        assert!(json.contains("\"rating\":4.5"));
        assert!(json.contains("\"client_name\":\"jdoe\""));
    }
}
