//! Postgres-backed graph store.
//!
//! Users live in `graph_users`; edges in `follows`, whose primary key on
//! `(follower, followee)` enforces the one-edge-per-pair rule. Each trait
//! method issues a single statement (or one transaction) so a cancelled
//! request never leaves a half-applied mutation behind.

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::debug;

use super::BaseGraphStore;
use crate::domains::social_graph::models::{Direction, EdgeKind, TargetGroupFilter, User};

const USER_COLUMNS: &str = "u.username, u.town, u.gender, u.year_of_birth, u.private";

#[derive(Clone)]
pub struct PostgresGraphStore {
    pool: PgPool,
}

impl PostgresGraphStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a pool against `database_url`.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .context("Failed to connect to graph database")?;
        Ok(Self::new(pool))
    }

    /// Apply the bundled schema migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Failed to run migrations")?;
        Ok(())
    }
}

fn limit_param(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

#[async_trait]
impl BaseGraphStore for PostgresGraphStore {
    async fn upsert_user(&self, user: &User) -> Result<()> {
        sqlx::query(
            "INSERT INTO graph_users (username, town, gender, year_of_birth, private)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT (username) DO UPDATE
             SET town = EXCLUDED.town,
                 gender = EXCLUDED.gender,
                 year_of_birth = EXCLUDED.year_of_birth,
                 private = EXCLUDED.private",
        )
        .bind(&user.username)
        .bind(&user.town)
        .bind(&user.gender)
        .bind(user.year_of_birth)
        .bind(user.is_private)
        .execute(&self.pool)
        .await
        .with_context(|| format!("Failed to upsert user {}", user.username))?;

        Ok(())
    }

    async fn get_user(&self, username: &str) -> Result<Option<User>> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM graph_users u WHERE u.username = $1"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(Into::into)
    }

    async fn set_privacy(&self, username: &str, is_private: bool) -> Result<bool> {
        let result = sqlx::query("UPDATE graph_users SET private = $2 WHERE username = $1")
            .bind(username)
            .bind(is_private)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_user(&self, username: &str) -> Result<bool> {
        // Edges go with the node via ON DELETE CASCADE.
        let result = sqlx::query("DELETE FROM graph_users WHERE username = $1")
            .bind(username)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn upsert_edge(&self, kind: EdgeKind, from: &str, to: &str) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO graph_users (username) VALUES ($1)
             ON CONFLICT (username) DO NOTHING",
        )
        .bind(from)
        .execute(&mut *tx)
        .await?;

        let statement = match kind {
            EdgeKind::Requested => {
                "INSERT INTO follows (follower, followee, kind) VALUES ($1, $2, $3)
                 ON CONFLICT (follower, followee) DO NOTHING"
            }
            EdgeKind::Approved => {
                "INSERT INTO follows (follower, followee, kind) VALUES ($1, $2, $3)
                 ON CONFLICT (follower, followee) DO UPDATE SET kind = EXCLUDED.kind"
            }
        };

        sqlx::query(statement)
            .bind(from)
            .bind(to)
            .bind(kind.as_str())
            .execute(&mut *tx)
            .await
            .with_context(|| format!("Failed to save {} edge {} -> {}", kind, from, to))?;

        tx.commit().await?;
        debug!(from = %from, to = %to, kind = %kind, "Edge merged");
        Ok(())
    }

    async fn promote_request(&self, from: &str, to: &str) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE follows SET kind = 'APPROVED'
             WHERE follower = $1 AND followee = $2 AND kind = 'REQUESTED'",
        )
        .bind(from)
        .bind(to)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_edge(&self, kind: EdgeKind, from: &str, to: &str) -> Result<bool> {
        let result = sqlx::query(
            "DELETE FROM follows WHERE follower = $1 AND followee = $2 AND kind = $3",
        )
        .bind(from)
        .bind(to)
        .bind(kind.as_str())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn edge_exists(&self, kind: EdgeKind, from: &str, to: &str) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (
                 SELECT 1 FROM follows
                 WHERE follower = $1 AND followee = $2 AND kind = $3
             )",
        )
        .bind(from)
        .bind(to)
        .bind(kind.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn neighbors(
        &self,
        direction: Direction,
        kind: EdgeKind,
        username: &str,
    ) -> Result<Vec<User>> {
        let (anchor, neighbor) = match direction {
            Direction::Outgoing => ("follower", "followee"),
            Direction::Incoming => ("followee", "follower"),
        };

        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS}
             FROM follows f
             JOIN graph_users u ON u.username = f.{neighbor}
             WHERE f.{anchor} = $1 AND f.kind = $2
             ORDER BY u.username"
        ))
        .bind(username)
        .bind(kind.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(Into::into)
    }

    async fn two_hop_reachable(&self, username: &str, limit: usize) -> Result<Vec<User>> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT DISTINCT {USER_COLUMNS}
             FROM follows first_hop
             JOIN follows second_hop
               ON second_hop.follower = first_hop.followee
              AND second_hop.kind = 'APPROVED'
             JOIN graph_users u ON u.username = second_hop.followee
             WHERE first_hop.follower = $1
               AND first_hop.kind = 'APPROVED'
               AND second_hop.followee <> $1
               AND NOT EXISTS (
                   SELECT 1 FROM follows direct
                   WHERE direct.follower = $1
                     AND direct.followee = second_hop.followee
                     AND direct.kind = 'APPROVED'
               )
             ORDER BY u.username
             LIMIT $2"
        ))
        .bind(username)
        .bind(limit_param(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(Into::into)
    }

    async fn users_excluding(&self, username: &str, limit: usize) -> Result<Vec<User>> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS}
             FROM graph_users u
             WHERE u.username <> $1
               AND NOT EXISTS (
                   SELECT 1 FROM follows f
                   WHERE f.follower = $1 AND f.followee = u.username
               )
             ORDER BY u.username
             LIMIT $2"
        ))
        .bind(username)
        .bind(limit_param(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(Into::into)
    }

    async fn users_matching(
        &self,
        filter: &TargetGroupFilter,
        current_year: i32,
        username: &str,
    ) -> Result<Vec<User>> {
        let (born_from, born_to) = filter.birth_year_range(current_year);

        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS}
             FROM graph_users u
             WHERE u.username <> $1
               AND ($2::TEXT IS NULL OR u.town = $2)
               AND ($3::TEXT IS NULL OR u.gender = $3)
               AND u.year_of_birth > 0
               AND u.year_of_birth BETWEEN $4 AND $5
               AND NOT EXISTS (
                   SELECT 1 FROM follows f
                   WHERE f.follower = u.username
                     AND f.followee = $1
                     AND f.kind = 'APPROVED'
               )
             ORDER BY u.username"
        ))
        .bind(username)
        .bind(filter.town.as_deref())
        .bind(filter.gender.as_deref())
        .bind(born_from)
        .bind(born_to)
        .fetch_all(&self.pool)
        .await
        .map_err(Into::into)
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
