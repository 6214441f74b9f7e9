// Database repository for accounts

use crate::auth::{error::AuthError, models::Account};
use sqlx::PgPool;

/// Account repository for database operations
#[derive(Clone)]
pub struct AccountRepository {
    pool: PgPool,
}

impl AccountRepository {
    /// Create a new AccountRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new account
    pub async fn create(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<Account, AuthError> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            INSERT INTO accounts (name, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, name, email, password_hash, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            // Unique constraint on email
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AuthError::EmailAlreadyExists;
                }
            }
            AuthError::DatabaseError(e.to_string())
        })?;

        Ok(account)
    }

    /// Find an account by email (case-insensitive)
    pub async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AuthError> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            SELECT id, name, email, password_hash, created_at, updated_at
            FROM accounts
            WHERE LOWER(email) = LOWER($1)
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        Ok(account)
    }

    /// Find an account by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Account>, AuthError> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            SELECT id, name, email, password_hash, created_at, updated_at
            FROM accounts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        Ok(account)
    }

    /// Check if an email is used by any account other than `exclude_id`
    pub async fn email_taken_by_other(
        &self,
        email: &str,
        exclude_id: i64,
    ) -> Result<bool, AuthError> {
        let exists: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM accounts WHERE LOWER(email) = LOWER($1) AND id != $2)",
        )
        .bind(email)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        Ok(exists.0)
    }

    /// Update name, email, and optionally the password hash
    pub async fn update_profile(
        &self,
        id: i64,
        name: &str,
        email: &str,
        password_hash: Option<&str>,
    ) -> Result<Account, AuthError> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            UPDATE accounts
            SET name = $1,
                email = $2,
                password_hash = COALESCE($3, password_hash),
                updated_at = NOW()
            WHERE id = $4
            RETURNING id, name, email, password_hash, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        Ok(account)
    }

    /// Replace the stored password hash
    pub async fn update_password(&self, id: i64, password_hash: &str) -> Result<(), AuthError> {
        sqlx::query("UPDATE accounts SET password_hash = $1, updated_at = NOW() WHERE id = $2")
            .bind(password_hash)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        Ok(())
    }
}
