//! `UserStore` over a PostgreSQL pool.

use super::UserStore;
use crate::error::AppError;
use crate::model::{Lookup, NewUser, UpsertUser, User, UserPatch, UserStats};
use crate::sql::{row_to_json, update_user};
use async_trait::async_trait;
use serde_json::Value;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

const USER_COLUMNS: &str = "id, name, email, age, is_active";

#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        PgUserStore { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn insert_one(conn: &mut PgConnection, user: &NewUser) -> Result<Uuid, AppError> {
        let sql = "INSERT INTO users (name, email) VALUES ($1, $2) RETURNING id";
        tracing::debug!(sql = %sql, email = %user.email, "query");
        let id = sqlx::query_scalar::<_, Uuid>(sql)
            .bind(&user.name)
            .bind(&user.email)
            .fetch_one(&mut *conn)
            .await?;
        Ok(id)
    }

    async fn count(conn: &mut PgConnection) -> Result<i64, AppError> {
        let sql = "SELECT COUNT(*) FROM users";
        tracing::debug!(sql = %sql, "query");
        let n = sqlx::query_scalar::<_, i64>(sql).fetch_one(&mut *conn).await?;
        Ok(n)
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn create(&self, user: &NewUser) -> Result<Uuid, AppError> {
        let mut conn = self.pool.acquire().await?;
        Self::insert_one(&mut conn, user).await
    }

    async fn create_many(&self, users: &[NewUser]) -> Result<Vec<Uuid>, AppError> {
        if users.is_empty() {
            return Ok(Vec::new());
        }
        let (names, emails): (Vec<String>, Vec<String>) =
            users.iter().map(|u| (u.name.clone(), u.email.clone())).unzip();
        let sql = "INSERT INTO users (name, email) \
                   SELECT * FROM UNNEST($1::text[], $2::text[]) \
                   ON CONFLICT DO NOTHING RETURNING id";
        tracing::debug!(sql = %sql, rows = users.len(), "query");
        let ids = sqlx::query_scalar::<_, Uuid>(sql)
            .bind(names)
            .bind(emails)
            .fetch_all(&self.pool)
            .await?;
        Ok(ids)
    }

    async fn list(&self) -> Result<Vec<User>, AppError> {
        let sql = format!("SELECT {} FROM users ORDER BY email ASC NULLS FIRST, id", USER_COLUMNS);
        tracing::debug!(sql = %sql, "query");
        let users = sqlx::query_as::<_, User>(&sql).fetch_all(&self.pool).await?;
        Ok(users)
    }

    async fn find(&self, id: Uuid) -> Result<Lookup<User>, AppError> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        tracing::debug!(sql = %sql, %id, "query");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user.into())
    }

    async fn stats(&self) -> Result<UserStats, AppError> {
        let sql = "SELECT COUNT(*) AS total_users, \
                   AVG(age)::float8 AS average_age, \
                   COUNT(email) AS total_emails, \
                   MAX(age) AS oldest_person, \
                   MIN(age) AS youngest_person \
                   FROM users";
        tracing::debug!(sql = %sql, "query");
        let stats = sqlx::query_as::<_, UserStats>(sql).fetch_one(&self.pool).await?;
        Ok(stats)
    }

    async fn update(&self, id: Uuid, patch: &UserPatch) -> Result<Uuid, AppError> {
        let q = update_user(id, patch);
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let row = q.bind_all().fetch_optional(&self.pool).await?;
        match row {
            Some(_) => Ok(id),
            None => Err(AppError::NotFound(format!("user {} not found", id))),
        }
    }

    async fn upsert(&self, user: &UpsertUser) -> Result<User, AppError> {
        // $5/$6 say whether age/is_active were supplied; a supplied NULL clears the column.
        let sql = format!(
            "INSERT INTO users (email, name, age, is_active) VALUES ($1, $2, $3, $4) \
             ON CONFLICT (email) DO UPDATE SET \
             name = EXCLUDED.name, \
             age = CASE WHEN $5 THEN EXCLUDED.age ELSE users.age END, \
             is_active = CASE WHEN $6 THEN EXCLUDED.is_active ELSE users.is_active END \
             RETURNING {}",
            USER_COLUMNS
        );
        tracing::debug!(sql = %sql, email = %user.email, "query");
        let row = sqlx::query_as::<_, User>(&sql)
            .bind(&user.email)
            .bind(&user.name)
            .bind(user.age.flatten())
            .bind(user.is_active.flatten())
            .bind(user.age.is_some())
            .bind(user.is_active.is_some())
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn delete(&self, id: Uuid) -> Result<Uuid, AppError> {
        let sql = "DELETE FROM users WHERE id = $1 RETURNING id";
        tracing::debug!(sql = %sql, %id, "query");
        sqlx::query_scalar::<_, Uuid>(sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user {} not found", id)))
    }

    async fn raw_by_id(&self, id: Uuid) -> Result<Vec<Value>, AppError> {
        let sql = "SELECT * FROM users WHERE id = $1::uuid";
        tracing::debug!(sql = %sql, %id, "query");
        let rows = sqlx::query(sql).bind(id).fetch_all(&self.pool).await?;
        Ok(rows.iter().map(row_to_json).collect())
    }

    async fn create_and_count(&self, user: &NewUser) -> Result<i64, AppError> {
        let mut tx = self.pool.begin().await?;
        Self::insert_one(&mut tx, user).await?;
        let count = Self::count(&mut tx).await?;
        tx.commit().await?;
        Ok(count)
    }

    async fn create_pair_and_count(&self, first: &NewUser, second: &NewUser) -> Result<i64, AppError> {
        let mut tx = self.pool.begin().await?;
        Self::insert_one(&mut tx, first).await?;
        Self::insert_one(&mut tx, second).await?;
        let count = Self::count(&mut tx).await?;
        tx.commit().await?;
        Ok(count)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").fetch_optional(&self.pool).await?;
        Ok(())
    }

    async fn close(&self) {
        tracing::info!("closing database pool");
        self.pool.close().await;
    }
}
