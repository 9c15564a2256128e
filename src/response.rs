//! Response bodies, one per route shape.

use crate::model::{User, UserStats};
use axum::{http::StatusCode, Json};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct IdOnly {
    pub id: Uuid,
}

impl From<Uuid> for IdOnly {
    fn from(id: Uuid) -> Self {
        IdOnly { id }
    }
}

/// `{user: {id}}` for create, update and delete.
#[derive(Debug, Serialize)]
pub struct UserIdBody {
    pub user: IdOnly,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedUsersBody {
    pub create_users: Vec<IdOnly>,
}

#[derive(Debug, Serialize)]
pub struct UsersBody {
    pub users: Vec<User>,
}

/// Get-by-id keeps the `users` key; `null` when nothing matched.
#[derive(Debug, Serialize)]
pub struct UserLookupBody {
    pub users: Option<User>,
}

#[derive(Debug, Serialize)]
pub struct StatsBody {
    pub stats: UserStats,
}

#[derive(Debug, Serialize)]
pub struct UserBody {
    pub user: User,
}

#[derive(Debug, Serialize)]
pub struct RawResultBody {
    pub result: Vec<Value>,
}

#[derive(Debug, Serialize)]
pub struct CountBody {
    pub count: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalUsersBody {
    pub total_users: i64,
}

pub fn created<T: Serialize>(body: T) -> (StatusCode, Json<T>) {
    (StatusCode::CREATED, Json(body))
}

pub fn ok<T: Serialize>(body: T) -> (StatusCode, Json<T>) {
    (StatusCode::OK, Json(body))
}
