/// Common test utilities for integration tests
///
/// This module provides shared infrastructure for integration tests:
/// - Test database setup and cleanup
/// - Test member creation
/// - Session token generation
/// - API client helpers
///
/// `TestContext::new` needs a running PostgreSQL instance (`DATABASE_URL`);
/// tests built on it are `#[ignore]`d so the default suite passes without
/// one. `test_router` builds the app over a lazy pool and serves the tests
/// that never reach the database.

use hearth_api::app::{build_router, AppState};
use hearth_api::config::{ApiConfig, Config, DatabaseConfig, SessionConfig};
use hearth_shared::auth::session::{create_token, SessionClaims};
use hearth_shared::models::user::{CreateUser, User};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

/// Session secret used across the test suite
pub const TEST_SECRET: &str = "integration-test-secret-at-least-32-bytes";

/// Test context containing all necessary resources
pub struct TestContext {
    pub db: PgPool,
    pub app: axum::Router,
    pub user: User,
    pub session_token: String,
}

impl TestContext {
    /// Creates a new test context against a real database
    pub async fn new() -> anyhow::Result<Self> {
        let config = test_config(
            std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgresql://localhost/hearth_test".to_string()),
        );

        let db = PgPool::connect(&config.database.url).await?;

        // Path relative to this crate's Cargo.toml
        sqlx::migrate!("../hearth-shared/migrations").run(&db).await?;

        let user = create_member(&db, "Test Member").await?;

        let claims = SessionClaims::new(user.id);
        let session_token = create_token(&claims, &config.session.secret)?;

        let state = AppState::new(db.clone(), config);
        let app = build_router(state);

        Ok(TestContext {
            db,
            app,
            user,
            session_token,
        })
    }

    /// Returns the authorization header value for the context user
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.session_token)
    }

    /// Returns a session token for an arbitrary member
    pub fn token_for(&self, user_id: Uuid) -> String {
        let claims = SessionClaims::new(user_id);
        create_token(&claims, TEST_SECRET).expect("token creation")
    }

    /// Cleans up test data
    pub async fn cleanup(&self) -> anyhow::Result<()> {
        sqlx::query("TRUNCATE purchases, task_completions, tasks, users")
            .execute(&self.db)
            .await?;
        Ok(())
    }
}

/// Builds the app over a lazy pool; requests that hit the database fail,
/// but auth and validation rejections happen before that
pub fn test_router() -> axum::Router {
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect_lazy("postgresql://localhost/hearth_unreachable")
        .expect("lazy pool");

    let state = AppState::new(pool, test_config("postgresql://localhost/unused".to_string()));
    build_router(state)
}

fn test_config(database_url: String) -> Config {
    Config {
        api: ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_origins: vec!["*".to_string()],
            production: false,
        },
        database: DatabaseConfig {
            url: database_url,
            max_connections: 5,
        },
        session: SessionConfig {
            secret: TEST_SECRET.to_string(),
        },
    }
}

/// Helper to create a household member with a unique email
pub async fn create_member(db: &PgPool, name: &str) -> anyhow::Result<User> {
    let user = User::create(
        db,
        CreateUser {
            name: name.to_string(),
            email: format!("test-{}@example.com", Uuid::new_v4()),
            // Not used by these tests; handlers under test never verify it
            password_hash: "$argon2id$v=19$m=65536,t=3,p=4$placeholder$placeholder".to_string(),
        },
    )
    .await?;

    Ok(user)
}
