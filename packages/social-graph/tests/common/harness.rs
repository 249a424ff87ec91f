//! Test harnesses for integration testing.
//!
//! `TestHarness` wires the real router and activities to in-memory fakes.
//! `PostgresHarness` runs against a shared Postgres container; containers and
//! migrations are initialized once on first use, then reused.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use social_graph_core::common::auth::{JwtService, Role};
use social_graph_core::domains::registration::RegisterUserHandler;
use social_graph_core::domains::social_graph::models::User;
use social_graph_core::kernel::{
    BaseGraphStore, MessageHeaders, PostgresGraphStore, ServerDeps, TestDependencies,
};
use social_graph_core::server::{build_app, HttpOptions};
use sqlx::PgPool;
use test_context::AsyncTestContext;
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, ImageExt};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;
use tower::ServiceExt;

pub const TEST_JWT_SECRET: &str = "test-secret";
pub const TEST_JWT_ISSUER: &str = "twitter-clone";

fn init_tracing() {
    // Run tests with: RUST_LOG=debug cargo test -- --nocapture
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// In-memory harness: real activities, router and saga handler over fakes.
///
/// # Example using test-context
///
/// ```ignore
/// use test_context::test_context;
///
/// #[test_context(TestHarness)]
/// #[tokio::test]
/// async fn my_test(ctx: &TestHarness) {
///     ctx.seed([user("alice")]).await;
///     let (status, body) = ctx.get("/follow-requests", "alice").await;
/// }
/// ```
pub struct TestHarness {
    pub deps: TestDependencies,
    pub jwt: Arc<JwtService>,
}

impl AsyncTestContext for TestHarness {
    async fn setup() -> Self {
        Self::new()
    }

    async fn teardown(self) {}
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

impl TestHarness {
    pub fn new() -> Self {
        init_tracing();
        Self {
            deps: TestDependencies::new(),
            jwt: Arc::new(JwtService::new(
                TEST_JWT_SECRET,
                TEST_JWT_ISSUER.to_string(),
            )),
        }
    }

    pub fn server_deps(&self) -> ServerDeps {
        self.deps.server_deps()
    }

    /// Insert users straight into the store.
    pub async fn seed(&self, users: impl IntoIterator<Item = User>) {
        for user in users {
            self.deps
                .graph
                .upsert_user(&user)
                .await
                .expect("seeding the in-memory store cannot fail");
        }
    }

    pub fn saga_handler(&self) -> RegisterUserHandler {
        RegisterUserHandler::new(self.server_deps())
    }

    /// Deliver a raw saga command as the NATS listener would.
    pub async fn deliver(&self, payload: &[u8], headers: &MessageHeaders) {
        self.saga_handler().handle_message(payload, headers).await;
    }

    pub fn router(&self) -> Router {
        self.router_with(HttpOptions::default())
    }

    pub fn router_with(&self, options: HttpOptions) -> Router {
        build_app(self.server_deps(), self.jwt.clone(), options)
    }

    pub fn token_for(&self, username: &str) -> String {
        self.jwt
            .create_token(username, Role::Regular)
            .expect("token creation")
    }

    /// Send one request through the default router. `as_user` adds a bearer token.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        as_user: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        self.send(self.router(), method, uri, as_user, body).await
    }

    /// Send one request through `router`.
    pub async fn send(
        &self,
        router: Router,
        method: Method,
        uri: &str,
        as_user: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(username) = as_user {
            builder = builder.header(
                header::AUTHORIZATION,
                format!("Bearer {}", self.token_for(username)),
            );
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("valid request");

        let response = router.oneshot(request).await.expect("infallible");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("readable body");
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    pub async fn get(&self, uri: &str, as_user: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, Some(as_user), None).await
    }

    pub async fn post(&self, uri: &str, as_user: &str, body: Option<Value>) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(as_user), body).await
    }

    pub async fn patch(&self, uri: &str, as_user: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::PATCH, uri, Some(as_user), Some(body))
            .await
    }

    pub async fn delete(&self, uri: &str, as_user: &str) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, Some(as_user), None).await
    }
}

/// Shared Postgres container that persists across all tests.
struct SharedTestInfra {
    db_url: String,
    // Keep the container alive for the entire test run
    _postgres: ContainerAsync<Postgres>,
}

static SHARED_INFRA: OnceCell<SharedTestInfra> = OnceCell::const_new();

impl SharedTestInfra {
    async fn init() -> Result<Self> {
        init_tracing();

        let postgres = Postgres::default()
            .with_tag("16")
            .start()
            .await
            .context("Failed to start Postgres container")?;

        let pg_host = postgres.get_host().await?;
        let pg_port = postgres.get_host_port_ipv4(5432).await?;
        let db_url = format!(
            "postgresql://postgres:postgres@{}:{}/postgres",
            pg_host, pg_port
        );

        let store = PostgresGraphStore::new(
            PgPool::connect(&db_url)
                .await
                .context("Failed to connect to Postgres for migrations")?,
        );
        store.migrate().await?;

        Ok(Self {
            db_url,
            _postgres: postgres,
        })
    }

    async fn get() -> &'static Self {
        SHARED_INFRA
            .get_or_init(|| async {
                Self::init()
                    .await
                    .expect("Failed to initialize shared test infrastructure")
            })
            .await
    }
}

/// Harness backed by a real Postgres. Each test starts from empty tables.
pub struct PostgresHarness {
    pub store: Arc<PostgresGraphStore>,
}

impl AsyncTestContext for PostgresHarness {
    async fn setup() -> Self {
        Self::new().await.expect("Failed to create Postgres harness")
    }

    async fn teardown(self) {}
}

impl PostgresHarness {
    pub async fn new() -> Result<Self> {
        let infra = SharedTestInfra::get().await;
        let pool = PgPool::connect(&infra.db_url)
            .await
            .context("Failed to connect to test database")?;

        sqlx::query("TRUNCATE follows, graph_users")
            .execute(&pool)
            .await
            .context("Failed to reset tables")?;

        Ok(Self {
            store: Arc::new(PostgresGraphStore::new(pool)),
        })
    }

    pub async fn seed(&self, users: impl IntoIterator<Item = User>) {
        for user in users {
            self.store.upsert_user(&user).await.expect("seed user");
        }
    }
}
