use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::reviews::{Review, ReviewError};

/// Repository for database operations on reviews and the derived rating
/// fields they maintain on service proposals
#[derive(Clone)]
pub struct ReviewRepository {
    pool: PgPool,
}

impl ReviewRepository {
    /// Create a new ReviewRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Persist a new review
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        service_id: i64,
        client_email: &str,
        client_name: &str,
        provider: Option<&str>,
        rating: Decimal,
        comment: &str,
        review_date: NaiveDate,
        booking_start_date: NaiveDate,
        booking_end_date: NaiveDate,
    ) -> Result<Review, ReviewError> {
        let review = sqlx::query_as::<_, Review>(
            r#"
            INSERT INTO reviews
                (service_id, client_email, client_name, provider, rating, comment,
                 review_date, booking_start_date, booking_end_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, service_id, client_email, client_name, provider, rating,
                      comment, review_date, booking_start_date, booking_end_date,
                      created_at, updated_at
            "#,
        )
        .bind(service_id)
        .bind(client_email)
        .bind(client_name)
        .bind(provider)
        .bind(rating)
        .bind(comment)
        .bind(review_date)
        .bind(booking_start_date)
        .bind(booking_end_date)
        .fetch_one(&self.pool)
        .await?;

        Ok(review)
    }

    /// Find a review by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Review>, ReviewError> {
        let review = sqlx::query_as::<_, Review>(
            r#"
            SELECT id, service_id, client_email, client_name, provider, rating,
                   comment, review_date, booking_start_date, booking_end_date,
                   created_at, updated_at
            FROM reviews
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(review)
    }

    /// Check whether a client already reviewed a service (duplicate detection)
    pub async fn exists_by_service_and_email(
        &self,
        service_id: i64,
        client_email: &str,
    ) -> Result<bool, ReviewError> {
        let exists: Option<bool> = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM reviews WHERE service_id = $1 AND client_email = $2)",
        )
        .bind(service_id)
        .bind(client_email)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists.unwrap_or(false))
    }

    /// Delete a review
    pub async fn delete(&self, id: i64) -> Result<(), ReviewError> {
        let result = sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ReviewError::NotFound);
        }

        Ok(())
    }

    /// Find all reviews for a service, newest first
    pub async fn find_by_service(&self, service_id: i64) -> Result<Vec<Review>, ReviewError> {
        let reviews = sqlx::query_as::<_, Review>(
            r#"
            SELECT id, service_id, client_email, client_name, provider, rating,
                   comment, review_date, booking_start_date, booking_end_date,
                   created_at, updated_at
            FROM reviews
            WHERE service_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(service_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(reviews)
    }

    /// Find all reviews written by a client, newest first
    pub async fn find_by_client_email(
        &self,
        client_email: &str,
    ) -> Result<Vec<Review>, ReviewError> {
        let reviews = sqlx::query_as::<_, Review>(
            r#"
            SELECT id, service_id, client_email, client_name, provider, rating,
                   comment, review_date, booking_start_date, booking_end_date,
                   created_at, updated_at
            FROM reviews
            WHERE client_email = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(client_email)
        .fetch_all(&self.pool)
        .await?;

        Ok(reviews)
    }

    /// Get all rating values for a service (for average calculation)
    pub async fn get_ratings_for_service(
        &self,
        service_id: i64,
    ) -> Result<Vec<Decimal>, ReviewError> {
        let ratings: Vec<(Decimal,)> =
            sqlx::query_as("SELECT rating FROM reviews WHERE service_id = $1")
                .bind(service_id)
                .fetch_all(&self.pool)
                .await?;

        Ok(ratings.into_iter().map(|(r,)| r).collect())
    }

    /// Write the derived rating fields on a service proposal
    pub async fn update_service_rating(
        &self,
        service_id: i64,
        average: f64,
        count: i32,
    ) -> Result<(), ReviewError> {
        sqlx::query(
            r#"
            UPDATE service_proposals
            SET average_rating = $1, review_count = $2, updated_at = NOW()
            WHERE id = $3
            "#,
        )
        .bind(average)
        .bind(count)
        .bind(service_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Fetch a service proposal's name, or None when the id does not resolve
    pub async fn find_service_name(&self, service_id: i64) -> Result<Option<String>, ReviewError> {
        let name: Option<String> =
            sqlx::query_scalar("SELECT name FROM service_proposals WHERE id = $1")
                .bind(service_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(name)
    }

    /// Fetch the account name registered for an email, if any
    ///
    /// Returns None when no account exists; Some(name) may still be empty.
    pub async fn find_account_name(&self, email: &str) -> Result<Option<String>, ReviewError> {
        let name: Option<String> =
            sqlx::query_scalar("SELECT name FROM accounts WHERE LOWER(email) = LOWER($1)")
                .bind(email)
                .fetch_optional(&self.pool)
                .await?;

        Ok(name)
    }
}
