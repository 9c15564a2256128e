#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;
use users_api::{app, AppError, AppState, Lookup, NewUser, UpsertUser, User, UserPatch, UserStats, UserStore};
use uuid::Uuid;

/// In-memory `UserStore` with the same observable rules as the PostgreSQL one:
/// unique emails, nulls-first ordering, all-or-nothing transactions.
#[derive(Default)]
pub struct MemoryStore {
    rows: Mutex<Vec<User>>,
    unavailable: AtomicBool,
}

impl MemoryStore {
    pub fn with_users(users: Vec<User>) -> Self {
        MemoryStore {
            rows: Mutex::new(users),
            ..Default::default()
        }
    }

    pub fn set_unavailable(&self, v: bool) {
        self.unavailable.store(v, Ordering::SeqCst);
    }

    pub fn snapshot(&self) -> Vec<User> {
        self.rows.lock().unwrap().clone()
    }

    fn check(&self) -> Result<(), AppError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AppError::TransientStore("connection refused".into()));
        }
        Ok(())
    }

    fn insert(rows: &mut Vec<User>, user: &NewUser) -> Result<Uuid, AppError> {
        if rows.iter().any(|u| u.email.as_deref() == Some(user.email.as_str())) {
            return Err(AppError::Conflict("unique constraint users_email_key violated".into()));
        }
        let id = Uuid::new_v4();
        rows.push(User {
            id,
            name: user.name.clone(),
            email: Some(user.email.clone()),
            age: None,
            is_active: None,
        });
        Ok(id)
    }

    /// Run `f` on a copy of the rows; keep the copy only if `f` succeeds.
    fn transaction<T>(&self, f: impl FnOnce(&mut Vec<User>) -> Result<T, AppError>) -> Result<T, AppError> {
        let mut rows = self.rows.lock().unwrap();
        let mut working = rows.clone();
        let out = f(&mut working)?;
        *rows = working;
        Ok(out)
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create(&self, user: &NewUser) -> Result<Uuid, AppError> {
        self.check()?;
        self.transaction(|rows| Self::insert(rows, user))
    }

    async fn create_many(&self, users: &[NewUser]) -> Result<Vec<Uuid>, AppError> {
        self.check()?;
        self.transaction(|rows| {
            Ok(users
                .iter()
                .filter_map(|u| Self::insert(rows, u).ok())
                .collect())
        })
    }

    async fn list(&self) -> Result<Vec<User>, AppError> {
        self.check()?;
        let mut users = self.snapshot();
        users.sort_by(|a, b| a.email.cmp(&b.email).then(a.id.cmp(&b.id)));
        Ok(users)
    }

    async fn find(&self, id: Uuid) -> Result<Lookup<User>, AppError> {
        self.check()?;
        Ok(self.snapshot().into_iter().find(|u| u.id == id).into())
    }

    async fn stats(&self) -> Result<UserStats, AppError> {
        self.check()?;
        let rows = self.snapshot();
        let ages: Vec<i32> = rows.iter().filter_map(|u| u.age).collect();
        Ok(UserStats {
            total_users: rows.len() as i64,
            average_age: if ages.is_empty() {
                None
            } else {
                Some(ages.iter().map(|a| *a as f64).sum::<f64>() / ages.len() as f64)
            },
            total_emails: rows.iter().filter(|u| u.email.is_some()).count() as i64,
            oldest_person: ages.iter().copied().max(),
            youngest_person: ages.iter().copied().min(),
        })
    }

    async fn update(&self, id: Uuid, patch: &UserPatch) -> Result<Uuid, AppError> {
        self.check()?;
        self.transaction(|rows| {
            if let Some(Some(email)) = &patch.email {
                if rows.iter().any(|u| u.id != id && u.email.as_deref() == Some(email.as_str())) {
                    return Err(AppError::Conflict("unique constraint users_email_key violated".into()));
                }
            }
            let user = rows
                .iter_mut()
                .find(|u| u.id == id)
                .ok_or_else(|| AppError::NotFound(format!("user {} not found", id)))?;
            if let Some(name) = &patch.name {
                user.name = name.clone();
            }
            if let Some(email) = &patch.email {
                user.email = email.clone();
            }
            if let Some(age) = patch.age {
                user.age = age;
            }
            if let Some(is_active) = patch.is_active {
                user.is_active = is_active;
            }
            Ok(id)
        })
    }

    async fn upsert(&self, input: &UpsertUser) -> Result<User, AppError> {
        self.check()?;
        self.transaction(|rows| {
            if let Some(user) = rows.iter_mut().find(|u| u.email.as_deref() == Some(input.email.as_str())) {
                user.name = input.name.clone();
                if let Some(age) = input.age {
                    user.age = age;
                }
                if let Some(is_active) = input.is_active {
                    user.is_active = is_active;
                }
                return Ok(user.clone());
            }
            let user = User {
                id: Uuid::new_v4(),
                name: input.name.clone(),
                email: Some(input.email.clone()),
                age: input.age.flatten(),
                is_active: input.is_active.flatten(),
            };
            rows.push(user.clone());
            Ok(user)
        })
    }

    async fn delete(&self, id: Uuid) -> Result<Uuid, AppError> {
        self.check()?;
        self.transaction(|rows| {
            let pos = rows
                .iter()
                .position(|u| u.id == id)
                .ok_or_else(|| AppError::NotFound(format!("user {} not found", id)))?;
            rows.remove(pos);
            Ok(id)
        })
    }

    async fn raw_by_id(&self, id: Uuid) -> Result<Vec<Value>, AppError> {
        self.check()?;
        Ok(self
            .snapshot()
            .into_iter()
            .filter(|u| u.id == id)
            .map(|u| {
                json!({
                    "id": u.id.to_string(),
                    "name": u.name,
                    "email": u.email,
                    "age": u.age,
                    "is_active": u.is_active,
                })
            })
            .collect())
    }

    async fn create_and_count(&self, user: &NewUser) -> Result<i64, AppError> {
        self.check()?;
        self.transaction(|rows| {
            Self::insert(rows, user)?;
            Ok(rows.len() as i64)
        })
    }

    async fn create_pair_and_count(&self, first: &NewUser, second: &NewUser) -> Result<i64, AppError> {
        self.check()?;
        self.transaction(|rows| {
            Self::insert(rows, first)?;
            Self::insert(rows, second)?;
            Ok(rows.len() as i64)
        })
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.check()
    }

    async fn close(&self) {}
}

pub fn user(name: &str, email: Option<&str>, age: Option<i32>) -> User {
    User {
        id: Uuid::new_v4(),
        name: name.to_string(),
        email: email.map(String::from),
        age,
        is_active: None,
    }
}

pub fn test_app(store: Arc<MemoryStore>) -> Router {
    test_app_with_limit(store, 1024 * 1024)
}

pub fn test_app_with_limit(store: Arc<MemoryStore>, body_limit: usize) -> Router {
    app(AppState::new(store), body_limit)
}

/// Send one request through the router; returns status and parsed JSON (Null for an empty body).
pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    match body {
        Some(v) => send_raw(app, method, uri, Some("application/json"), v.to_string()).await,
        None => send_raw(app, method, uri, None, String::new()).await,
    }
}

/// Like `send`, with the content type and raw body under the caller's control.
pub async fn send_raw(
    app: &Router,
    method: &str,
    uri: &str,
    content_type: Option<&str>,
    body: String,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(ct) = content_type {
        builder = builder.header("content-type", ct);
    }
    let req = builder.body(Body::from(body)).unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into()))
    };
    (status, json)
}
