//! User handlers: one store call per route, results rendered as JSON.

use crate::error::AppError;
use crate::extractors::{AppJson, AppQuery};
use crate::model::{
    BatchCreateRequest, CreateUserRequest, NewUser, TxRequest, UpsertUserRequest, UserPatchRequest,
};
use crate::response::{
    created, ok, CountBody, CreatedUsersBody, RawResultBody, StatsBody, TotalUsersBody, UserBody,
    UserIdBody, UserLookupBody, UsersBody,
};
use crate::service::RequestValidator;
use crate::state::AppState;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use serde::Deserialize;
use uuid::Uuid;

/// User inserted by `POST /txSimple`.
pub const TX_SIMPLE_USER: (&str, &str) = ("Jander", "jander@gmail.com");

/// Users inserted by `POST /tx` when the request has no body.
pub const TX_DEFAULT_USERS: [(&str, &str); 2] = [
    ("Pedrinho", "pedrinho05@email.com"),
    ("Pedrinho2", "pedrinho06@email.com"),
];

fn parse_id(id_str: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(id_str).map_err(|_| AppError::BadRequest(format!("invalid uuid: {}", id_str)))
}

pub async fn create(
    State(state): State<AppState>,
    AppJson(body): AppJson<CreateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = RequestValidator::new_user(body)?;
    let id = state.store.create(&user).await?;
    tracing::info!(%id, "user created");
    Ok(created(UserIdBody { user: id.into() }))
}

pub async fn batch_create(
    State(state): State<AppState>,
    AppJson(body): AppJson<BatchCreateRequest>,
) -> Result<impl IntoResponse, AppError> {
    let users = RequestValidator::new_users(body.users)?;
    let ids = state.store.create_many(&users).await?;
    tracing::info!(requested = users.len(), inserted = ids.len(), "users batch created");
    Ok(created(CreatedUsersBody {
        create_users: ids.into_iter().map(Into::into).collect(),
    }))
}

pub async fn list(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let users = state.store.list().await?;
    Ok(ok(UsersBody { users }))
}

pub async fn read(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let found = state.store.find(id).await?;
    Ok(ok(UserLookupBody {
        users: found.into_option(),
    }))
}

pub async fn stats(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let stats = state.store.stats().await?;
    Ok(ok(StatsBody { stats }))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
    AppJson(body): AppJson<UserPatchRequest>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let patch = RequestValidator::user_patch(body)?;
    let id = state.store.update(id, &patch).await?;
    tracing::info!(%id, "user updated");
    Ok(ok(UserIdBody { user: id.into() }))
}

pub async fn upsert(
    State(state): State<AppState>,
    AppJson(body): AppJson<UpsertUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = RequestValidator::upsert_user(body)?;
    let user = state.store.upsert(&user).await?;
    tracing::info!(id = %user.id, "user upserted");
    Ok(ok(UserBody { user }))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let id = state.store.delete(id).await?;
    tracing::info!(%id, "user deleted");
    Ok(ok(UserIdBody { user: id.into() }))
}

#[derive(Debug, Deserialize)]
pub struct RawLookupParams {
    pub id: Option<String>,
}

/// GET /?id=... — raw SQL lookup, rows returned untyped.
pub async fn raw_lookup(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<RawLookupParams>,
) -> Result<impl IntoResponse, AppError> {
    let id_str = params
        .id
        .ok_or_else(|| AppError::Validation("id is required".into()))?;
    let id = parse_id(&id_str)?;
    let result = state.store.raw_by_id(id).await?;
    Ok(ok(RawResultBody { result }))
}

pub async fn tx_simple(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let (name, email) = TX_SIMPLE_USER;
    let count = state.store.create_and_count(&NewUser::new(name, email)).await?;
    Ok(ok(CountBody { count }))
}

/// POST /tx — two inserts and a count in one transaction. An empty body uses
/// the default pair; `{users: [a, b]}` replaces it.
pub async fn tx_interactive(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let [first, second] = tx_users(&body)?;
    let total_users = state.store.create_pair_and_count(&first, &second).await?;
    Ok(ok(TotalUsersBody { total_users }))
}

fn tx_users(body: &[u8]) -> Result<[NewUser; 2], AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        let [(n1, e1), (n2, e2)] = TX_DEFAULT_USERS;
        return Ok([NewUser::new(n1, e1), NewUser::new(n2, e2)]);
    }
    let req: TxRequest = serde_json::from_slice(body)
        .map_err(|e| AppError::BadRequest(format!("invalid JSON body: {}", e)))?;
    let users = RequestValidator::new_users(req.users)?;
    <[NewUser; 2]>::try_from(users).map_err(|users: Vec<NewUser>| {
        AppError::Validation(format!("exactly 2 users are required, got {}", users.len()))
    })
}
