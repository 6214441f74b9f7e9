// Authentication service - business logic layer

use crate::auth::{
    error::AuthError,
    models::{
        Account, AccountResponse, AuthResponse, LoginRequest, RegisterRequest,
        UpdateAccountRequest, UpdatePasswordRequest,
    },
    password::PasswordService,
    repository::AccountRepository,
    reset::ResetCodeLedger,
    token::TokenService,
};

/// Authentication service coordinating accounts, tokens, and reset codes
#[derive(Clone)]
pub struct AuthService {
    accounts: AccountRepository,
    tokens: TokenService,
    reset_codes: ResetCodeLedger,
}

impl AuthService {
    /// Create a new AuthService
    pub fn new(
        accounts: AccountRepository,
        tokens: TokenService,
        reset_codes: ResetCodeLedger,
    ) -> Self {
        Self {
            accounts,
            tokens,
            reset_codes,
        }
    }

    /// Register a new account and issue a token
    pub async fn register(&self, request: RegisterRequest) -> Result<AuthResponse, AuthError> {
        let password_hash = PasswordService::hash_password(&request.password)?;

        let account = self
            .accounts
            .create(&request.name, &request.email, &password_hash)
            .await?;

        tracing::info!("Account registered: {}", account.email);
        self.auth_response(account)
    }

    /// Log in with email and password
    pub async fn login(&self, request: LoginRequest) -> Result<AuthResponse, AuthError> {
        let account = self
            .accounts
            .find_by_email(&request.email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let matches = PasswordService::verify_password(&request.password, &account.password_hash)?;
        if !matches {
            tracing::warn!("Failed login attempt for {}", request.email);
            return Err(AuthError::InvalidCredentials);
        }

        tracing::info!("Login successful for {}", account.email);
        self.auth_response(account)
    }

    /// Fetch the profile for an authenticated email
    pub async fn profile(&self, email: &str) -> Result<AccountResponse, AuthError> {
        let account = self
            .accounts
            .find_by_email(email)
            .await?
            .ok_or(AuthError::AccountNotFound)?;

        Ok(AccountResponse::from(account))
    }

    /// Update name/email and optionally the password
    pub async fn update_account(
        &self,
        id: i64,
        request: UpdateAccountRequest,
    ) -> Result<AccountResponse, AuthError> {
        let account = self
            .accounts
            .find_by_id(id)
            .await?
            .ok_or(AuthError::AccountNotFound)?;

        // Email change allowed only if not used by someone else
        if !account.email.eq_ignore_ascii_case(&request.email)
            && self.accounts.email_taken_by_other(&request.email, id).await?
        {
            return Err(AuthError::EmailAlreadyExists);
        }

        // Password re-hashed only when provided non-blank
        let password_hash = match request.password.as_deref() {
            Some(password) if !password.trim().is_empty() => {
                Some(PasswordService::hash_password(password)?)
            }
            _ => None,
        };

        let updated = self
            .accounts
            .update_profile(id, &request.name, &request.email, password_hash.as_deref())
            .await?;

        Ok(AccountResponse::from(updated))
    }

    /// Change the password after re-checking the old one
    pub async fn update_password(
        &self,
        id: i64,
        request: UpdatePasswordRequest,
    ) -> Result<(), AuthError> {
        let account = self
            .accounts
            .find_by_id(id)
            .await?
            .ok_or(AuthError::AccountNotFound)?;

        let matches =
            PasswordService::verify_password(&request.old_password, &account.password_hash)?;
        if !matches {
            return Err(AuthError::InvalidCredentials);
        }

        let password_hash = PasswordService::hash_password(&request.new_password)?;
        self.accounts.update_password(id, &password_hash).await
    }

    /// Issue a one-time reset code for a registered email
    pub async fn forgot_password(&self, email: &str) -> Result<String, AuthError> {
        self.accounts
            .find_by_email(email)
            .await?
            .ok_or(AuthError::AccountNotFound)?;

        Ok(self.reset_codes.issue(email).await)
    }

    /// Check a reset code without consuming it
    pub async fn verify_reset_code(&self, email: &str, code: &str) -> bool {
        self.reset_codes.verify(email, code).await
    }

    /// Consume a reset code and set the new password.
    ///
    /// The ledger removes the entry atomically with the validity check, so a
    /// code can succeed here at most once.
    pub async fn reset_password(
        &self,
        email: &str,
        code: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        let entry = self
            .reset_codes
            .consume(email, code)
            .await
            .ok_or(AuthError::InvalidResetCode)?;

        let account = self
            .accounts
            .find_by_email(&entry.email)
            .await?
            .ok_or(AuthError::AccountNotFound)?;

        let password_hash = PasswordService::hash_password(new_password)?;
        self.accounts
            .update_password(account.id, &password_hash)
            .await?;

        tracing::info!("Password reset completed for {}", entry.email);
        Ok(())
    }

    fn auth_response(&self, account: Account) -> Result<AuthResponse, AuthError> {
        let token = self.tokens.generate_token(account.id, &account.email)?;

        Ok(AuthResponse {
            token,
            id: account.id,
            email: account.email,
            name: account.name,
        })
    }
}
