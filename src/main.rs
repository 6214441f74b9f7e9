mod auth;
mod db;
mod error;
mod proposals;
mod reviews;
mod validation;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use sqlx::PgPool;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use auth::{
    handlers::{
        forgot_password_handler, login_handler, me_handler, register_handler,
        reset_password_handler, update_account_handler, update_password_handler,
        verify_reset_code_handler,
    },
    AccountRepository, AuthService, ResetCodeLedger, TokenService,
};
use proposals::{
    handlers::{
        create_proposal_handler, delete_proposal_handler, list_proposals_handler,
        update_proposal_handler, vote_proposal_handler,
    },
    CreateProposalRequest, ProposalRepository, ServiceProposal, UpdateProposalRequest,
    VoteResponse,
};
use reviews::{
    handlers::{
        create_review_handler, delete_review_handler, get_reviews_for_service_handler,
        has_reviewed_handler, my_reviews_handler,
    },
    RatingCalculator, ReviewRepository, ReviewService,
};

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        proposals::handlers::list_proposals_handler,
        proposals::handlers::create_proposal_handler,
        proposals::handlers::update_proposal_handler,
        proposals::handlers::delete_proposal_handler,
        proposals::handlers::vote_proposal_handler,
    ),
    components(
        schemas(ServiceProposal, CreateProposalRequest, UpdateProposalRequest, VoteResponse)
    ),
    tags(
        (name = "services", description = "Service proposal endpoints")
    ),
    info(
        title = "Service Marketplace API",
        version = "1.0.0",
        description = "RESTful API for service proposals, reviews, and accounts"
    )
)]
struct ApiDoc;

/// Application state shared across handlers
#[derive(Clone)]
struct AppState {
    auth_service: AuthService,
    review_service: ReviewService,
    proposal_repository: ProposalRepository,
}

/// Creates and configures the application router
/// Maps all API endpoints to their handlers and adds CORS middleware
fn create_router(db: PgPool, jwt_secret: String) -> Router {
    use tower_http::cors::{Any, CorsLayer};

    let account_repository = AccountRepository::new(db.clone());
    let token_service = TokenService::new(jwt_secret);
    let reset_ledger = ResetCodeLedger::new();
    let auth_service = AuthService::new(account_repository, token_service, reset_ledger);

    let review_repository = ReviewRepository::new(db.clone());
    let rating_calculator = RatingCalculator::new(review_repository.clone());
    let review_service = ReviewService::new(review_repository, rating_calculator);

    let proposal_repository = ProposalRepository::new(db);

    let state = AppState {
        auth_service,
        review_service,
        proposal_repository,
    };

    // Configure CORS to allow all origins, methods, and headers
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Authentication
        .route("/api/auth/register", post(register_handler))
        .route("/api/auth/login", post(login_handler))
        .route("/api/auth/me", get(me_handler))
        .route("/api/auth/forgot-password", post(forgot_password_handler))
        .route("/api/auth/reset-password", post(reset_password_handler))
        .route("/api/auth/verify-reset-code", post(verify_reset_code_handler))
        // Accounts
        .route("/api/accounts/:id", put(update_account_handler))
        .route("/api/accounts/:id/password", put(update_password_handler))
        // Service proposals
        .route("/api/services", get(list_proposals_handler))
        .route("/api/services", post(create_proposal_handler))
        .route("/api/services/:id", put(update_proposal_handler))
        .route("/api/services/:id", delete(delete_proposal_handler))
        .route("/api/services/:id/vote", post(vote_proposal_handler))
        // Reviews
        .route(
            "/api/services/:id/reviews",
            get(get_reviews_for_service_handler),
        )
        .route("/api/services/:id/reviews", post(create_review_handler))
        .route("/api/services/:id/has-reviewed", get(has_reviewed_handler))
        .route("/api/reviews/mine", get(my_reviews_handler))
        .route("/api/reviews/:id", delete(delete_review_handler))
        .layer(cors)
        .with_state(state)
}

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    tracing::info!("Service Marketplace API - Starting...");

    // Get configuration from environment variables
    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");
    let jwt_secret = std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in environment");
    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = std::env::var("PORT").unwrap_or_else(|_| "8080".to_string());

    // Create database connection pool
    tracing::info!("Connecting to database...");
    let db_pool = db::create_pool(&database_url)
        .await
        .expect("Failed to create database pool");

    // Run SQLx migrations on startup
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Migrations completed successfully");

    // Create the application router
    let app = create_router(db_pool, jwt_secret);

    // Start the Axum server
    let addr = format!("{}:{}", host, port);
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Service Marketplace API is running on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", addr);

    axum::serve(listener, app)
        .await
        .expect("Server error");
}
