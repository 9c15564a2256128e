//! Required-field validation for request bodies.

use crate::error::AppError;
use crate::model::{CreateUserRequest, NewUser, UpsertUser, UpsertUserRequest, UserPatch, UserPatchRequest};

pub struct RequestValidator;

impl RequestValidator {
    /// `name` and `email` must both be present and non-null.
    pub fn new_user(body: CreateUserRequest) -> Result<NewUser, AppError> {
        match (body.name, body.email) {
            (Some(name), Some(email)) => Ok(NewUser { name, email }),
            (name, email) => Err(missing(&[("name", name.is_none()), ("email", email.is_none())])),
        }
    }

    /// Validate every item; the first invalid item fails the whole batch with its index.
    pub fn new_users(items: Vec<CreateUserRequest>) -> Result<Vec<NewUser>, AppError> {
        items
            .into_iter()
            .enumerate()
            .map(|(i, item)| {
                Self::new_user(item).map_err(|e| match e {
                    AppError::Validation(msg) => AppError::Validation(format!("users[{}]: {}", i, msg)),
                    other => other,
                })
            })
            .collect()
    }

    /// Any subset of fields. `name` may be omitted but not set to null.
    pub fn user_patch(body: UserPatchRequest) -> Result<UserPatch, AppError> {
        let name = match body.name {
            Some(None) => return Err(AppError::Validation("name cannot be null".into())),
            Some(Some(name)) => Some(name),
            None => None,
        };
        Ok(UserPatch {
            name,
            email: body.email,
            age: body.age,
            is_active: body.is_active,
        })
    }

    /// `email` and `name` are required; `age` and `isActive` are optional.
    pub fn upsert_user(body: UpsertUserRequest) -> Result<UpsertUser, AppError> {
        match (body.email, body.name) {
            (Some(email), Some(name)) => Ok(UpsertUser {
                email,
                name,
                age: body.age,
                is_active: body.is_active,
            }),
            (email, name) => Err(missing(&[("email", email.is_none()), ("name", name.is_none())])),
        }
    }
}

fn missing(fields: &[(&str, bool)]) -> AppError {
    let names: Vec<String> = fields
        .iter()
        .filter(|(_, absent)| *absent)
        .map(|(name, _)| format!("{} is required", name))
        .collect();
    AppError::Validation(names.join("; "))
}
