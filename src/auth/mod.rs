// Authentication module
// Account registration/login with JWT issuance, profile and password
// management, and the one-time password-reset code flow

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod password;
pub mod repository;
pub mod reset;
pub mod service;
pub mod token;

// Re-export commonly used types
pub use error::AuthError;
pub use middleware::AuthenticatedUser;
pub use models::{Account, AccountResponse, AuthResponse, LoginRequest, RegisterRequest};
pub use repository::AccountRepository;
pub use reset::ResetCodeLedger;
pub use service::AuthService;
pub use token::TokenService;
