//! Data access for users. Handlers only see the [`UserStore`] trait; the
//! PostgreSQL implementation is constructed once at startup and injected.

mod bootstrap;
mod postgres;

pub use bootstrap::{ensure_database_exists, ensure_users_table};
pub use postgres::PgUserStore;

use crate::error::AppError;
use crate::model::{Lookup, NewUser, UpsertUser, User, UserPatch, UserStats};
use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert one user and return its generated id. Duplicate email is a conflict.
    async fn create(&self, user: &NewUser) -> Result<Uuid, AppError>;

    /// Insert many users, skipping any that violate a uniqueness constraint.
    /// Returns ids of the inserted rows only.
    async fn create_many(&self, users: &[NewUser]) -> Result<Vec<Uuid>, AppError>;

    /// All users ordered by email ascending, users without email first.
    async fn list(&self) -> Result<Vec<User>, AppError>;

    async fn find(&self, id: Uuid) -> Result<Lookup<User>, AppError>;

    async fn stats(&self) -> Result<UserStats, AppError>;

    /// Apply the supplied fields only. Missing id is `AppError::NotFound`.
    async fn update(&self, id: Uuid, patch: &UserPatch) -> Result<Uuid, AppError>;

    /// Insert, or update name/age/isActive of the row holding the same email, atomically.
    async fn upsert(&self, user: &UpsertUser) -> Result<User, AppError>;

    /// Delete one row by id and return that id. Missing id is `AppError::NotFound`.
    async fn delete(&self, id: Uuid) -> Result<Uuid, AppError>;

    /// Raw-SQL lookup by id, returned as untyped rows.
    async fn raw_by_id(&self, id: Uuid) -> Result<Vec<Value>, AppError>;

    /// In one transaction: insert `user`, then count all users.
    async fn create_and_count(&self, user: &NewUser) -> Result<i64, AppError>;

    /// In one transaction: insert `first`, insert `second`, then count all users.
    /// Nothing is committed unless every step succeeds.
    async fn create_pair_and_count(&self, first: &NewUser, second: &NewUser) -> Result<i64, AppError>;

    /// Round-trip to the backing store (readiness).
    async fn ping(&self) -> Result<(), AppError>;

    /// Release backing resources. Called once on shutdown.
    async fn close(&self);
}
