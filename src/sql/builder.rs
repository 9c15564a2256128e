//! Builds the parameterized statements whose column list depends on the request.

use crate::model::UserPatch;
use crate::sql::PgBindValue;
use uuid::Uuid;

pub const USERS_TABLE: &str = "users";

/// Quote identifier for PostgreSQL (identifiers here are compile-time constants).
fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<PgBindValue>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: impl Into<PgBindValue>) -> u32 {
        let n = self.params.len() as u32 + 1;
        self.params.push(v.into());
        n
    }

    pub fn bind_all(&self) -> sqlx::query::Query<'_, sqlx::Postgres, sqlx::postgres::PgArguments> {
        let mut query = sqlx::query(&self.sql);
        for p in &self.params {
            query = query.bind(p.clone());
        }
        query
    }
}

/// UPDATE by id: SET only the columns present in the patch, RETURNING id.
/// An empty patch degrades to a SELECT of the id so a missing row is still detected.
pub fn update_user(id: Uuid, patch: &UserPatch) -> QueryBuf {
    let mut q = QueryBuf::new();
    let table = quoted(USERS_TABLE);
    if patch.is_empty() {
        q.push_param(id);
        q.sql = format!("SELECT {} FROM {} WHERE {} = $1", quoted("id"), table, quoted("id"));
        return q;
    }

    let mut sets = Vec::new();
    let mut set = |q: &mut QueryBuf, column: &str, pg_type: &str, v: PgBindValue| {
        let n = q.push_param(v);
        sets.push(format!("{} = ${}::{}", quoted(column), n, pg_type));
    };
    if let Some(name) = &patch.name {
        set(&mut q, "name", "text", name.as_str().into());
    }
    if let Some(email) = &patch.email {
        set(&mut q, "email", "text", email.as_deref().into());
    }
    if let Some(age) = patch.age {
        set(&mut q, "age", "integer", age.into());
    }
    if let Some(is_active) = patch.is_active {
        set(&mut q, "is_active", "boolean", is_active.into());
    }

    let id_param = q.push_param(id);
    q.sql = format!(
        "UPDATE {} SET {} WHERE {} = ${} RETURNING {}",
        table,
        sets.join(", "),
        quoted("id"),
        id_param,
        quoted("id")
    );
    q
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_sets_only_supplied_columns() {
        let id = Uuid::nil();
        let patch = UserPatch {
            age: Some(Some(30)),
            ..Default::default()
        };
        let q = update_user(id, &patch);
        assert_eq!(
            q.sql,
            r#"UPDATE "users" SET "age" = $1::integer WHERE "id" = $2 RETURNING "id""#
        );
        assert_eq!(q.params, vec![PgBindValue::I32(30), PgBindValue::Uuid(id)]);
    }

    #[test]
    fn update_numbers_params_in_column_order() {
        let patch = UserPatch {
            name: Some("Ana".into()),
            email: Some(Some("ana@x.com".into())),
            age: None,
            is_active: Some(Some(false)),
        };
        let q = update_user(Uuid::nil(), &patch);
        assert!(q.sql.contains(r#""name" = $1::text, "email" = $2::text, "is_active" = $3::boolean"#));
        assert!(q.sql.contains(r#"WHERE "id" = $4"#));
        assert_eq!(q.params.len(), 4);
    }

    #[test]
    fn explicit_null_binds_null() {
        let id = Uuid::nil();
        let patch = UserPatch {
            email: Some(None),
            age: Some(None),
            ..Default::default()
        };
        let q = update_user(id, &patch);
        assert_eq!(
            q.sql,
            r#"UPDATE "users" SET "email" = $1::text, "age" = $2::integer WHERE "id" = $3 RETURNING "id""#
        );
        assert_eq!(q.params, vec![PgBindValue::Null, PgBindValue::Null, PgBindValue::Uuid(id)]);
    }

    #[test]
    fn empty_update_is_a_select() {
        let q = update_user(Uuid::nil(), &UserPatch::default());
        assert_eq!(q.sql, r#"SELECT "id" FROM "users" WHERE "id" = $1"#);
        assert_eq!(q.params, vec![PgBindValue::Uuid(Uuid::nil())]);
    }

    #[test]
    fn quoted_escapes_double_quotes() {
        assert_eq!(quoted(r#"a"b"#), r#""a""b""#);
    }
}
