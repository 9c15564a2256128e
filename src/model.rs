//! The user entity and the shapes of its inputs and aggregates.

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Keeps an explicit JSON `null` apart from an absent field: absent is `None`
/// (via `#[serde(default)]`), `null` is `Some(None)`.
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// One row of the `users` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub age: Option<i32>,
    pub is_active: Option<bool>,
}

/// Validated input for an insert: both fields present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
}

impl NewUser {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        NewUser {
            name: name.into(),
            email: email.into(),
        }
    }
}

/// Partial update. `None` leaves the column untouched, `Some(None)` sets it to NULL.
/// `name` is NOT NULL, so it is only ever replaced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<Option<String>>,
    pub age: Option<Option<i32>>,
    pub is_active: Option<Option<bool>>,
}

impl UserPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.age.is_none() && self.is_active.is_none()
    }
}

/// Validated upsert input keyed on `email`. `age` and `is_active` follow the
/// `UserPatch` convention when the row already exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpsertUser {
    pub email: String,
    pub name: String,
    pub age: Option<Option<i32>>,
    pub is_active: Option<Option<bool>>,
}

/// Body of `POST /users`; fields are checked for presence by `RequestValidator`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BatchCreateRequest {
    pub users: Vec<CreateUserRequest>,
}

/// Body of `PUT /users/:id`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPatchRequest {
    #[serde(default, deserialize_with = "nullable")]
    pub name: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub email: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub age: Option<Option<i32>>,
    #[serde(default, deserialize_with = "nullable")]
    pub is_active: Option<Option<bool>>,
}

/// Body of `PUT /users/upsert`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertUserRequest {
    pub email: Option<String>,
    pub name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub age: Option<Option<i32>>,
    #[serde(default, deserialize_with = "nullable")]
    pub is_active: Option<Option<bool>>,
}

/// Optional body of `POST /tx`: the two users inserted inside the transaction.
#[derive(Debug, Clone, Deserialize)]
pub struct TxRequest {
    pub users: Vec<CreateUserRequest>,
}

/// Aggregates over the whole table. Age aggregates are `None` when no row has an age.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub total_users: i64,
    pub average_age: Option<f64>,
    pub total_emails: i64,
    pub oldest_person: Option<i32>,
    pub youngest_person: Option<i32>,
}

/// Result of a point lookup where absence is an answer, not a failure.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<T> {
    Found(T),
    NotFound,
}

impl<T> Lookup<T> {
    pub fn into_option(self) -> Option<T> {
        match self {
            Lookup::Found(v) => Some(v),
            Lookup::NotFound => None,
        }
    }
}

impl<T> From<Option<T>> for Lookup<T> {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => Lookup::Found(v),
            None => Lookup::NotFound,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn user_serializes_camel_case() {
        let user = User {
            id: Uuid::nil(),
            name: "Ana".into(),
            email: None,
            age: Some(31),
            is_active: Some(true),
        };
        let v = serde_json::to_value(&user).unwrap();
        assert_eq!(v["isActive"], json!(true));
        assert_eq!(v["email"], json!(null));
        assert!(v.get("is_active").is_none());
    }

    #[test]
    fn patch_request_tells_null_from_absent() {
        let req: UserPatchRequest = serde_json::from_value(json!({ "age": 30, "email": null })).unwrap();
        assert_eq!(req.age, Some(Some(30)));
        assert_eq!(req.email, Some(None));
        assert_eq!(req.name, None);
        assert_eq!(req.is_active, None);
    }

    #[test]
    fn upsert_request_tells_null_from_absent() {
        let req: UpsertUserRequest =
            serde_json::from_value(json!({ "email": "a@x.com", "name": "A", "isActive": null })).unwrap();
        assert_eq!(req.is_active, Some(None));
        assert_eq!(req.age, None);
    }

    #[test]
    fn empty_patch_is_empty() {
        assert!(UserPatch::default().is_empty());
        let patch = UserPatch {
            age: Some(None),
            ..Default::default()
        };
        assert!(!patch.is_empty());
    }

    #[test]
    fn lookup_converts_from_option() {
        assert_eq!(Lookup::from(Some(1)), Lookup::Found(1));
        assert_eq!(Lookup::<i32>::from(None).into_option(), None);
    }
}
