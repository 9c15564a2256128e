//! Values that can be bound to a dynamically built PostgreSQL query.

use sqlx::encode::{Encode, IsNull};
use sqlx::postgres::{PgTypeInfo, Postgres};
use sqlx::{Database, Type};

/// A value bound to a query whose parameter list is only known at run time.
/// Each variant reports its own wire type. `Null` goes out as an untyped TEXT NULL,
/// so the statement casts every placeholder to its column type.
#[derive(Clone, Debug, PartialEq)]
pub enum PgBindValue {
    Null,
    Bool(bool),
    I32(i32),
    String(String),
    Uuid(uuid::Uuid),
}

impl From<bool> for PgBindValue {
    fn from(v: bool) -> Self {
        PgBindValue::Bool(v)
    }
}

impl From<i32> for PgBindValue {
    fn from(v: i32) -> Self {
        PgBindValue::I32(v)
    }
}

impl From<&str> for PgBindValue {
    fn from(v: &str) -> Self {
        PgBindValue::String(v.to_string())
    }
}

impl From<uuid::Uuid> for PgBindValue {
    fn from(v: uuid::Uuid) -> Self {
        PgBindValue::Uuid(v)
    }
}

impl<T: Into<PgBindValue>> From<Option<T>> for PgBindValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(PgBindValue::Null)
    }
}

impl<'q> Encode<'q, Postgres> for PgBindValue {
    fn encode_by_ref(
        &self,
        buf: &mut <Postgres as Database>::ArgumentBuffer<'q>,
    ) -> Result<IsNull, Box<dyn std::error::Error + Send + Sync>> {
        Ok(match self {
            PgBindValue::Null => IsNull::Yes,
            PgBindValue::Bool(b) => <bool as Encode<Postgres>>::encode_by_ref(b, buf)?,
            PgBindValue::I32(n) => <i32 as Encode<Postgres>>::encode_by_ref(n, buf)?,
            PgBindValue::String(s) => <String as Encode<Postgres>>::encode_by_ref(s, buf)?,
            PgBindValue::Uuid(u) => <uuid::Uuid as Encode<Postgres>>::encode_by_ref(u, buf)?,
        })
    }

    fn produces(&self) -> Option<PgTypeInfo> {
        Some(match self {
            PgBindValue::Null => <String as Type<Postgres>>::type_info(),
            PgBindValue::Bool(_) => <bool as Type<Postgres>>::type_info(),
            PgBindValue::I32(_) => <i32 as Type<Postgres>>::type_info(),
            PgBindValue::String(_) => <String as Type<Postgres>>::type_info(),
            PgBindValue::Uuid(_) => <uuid::Uuid as Type<Postgres>>::type_info(),
        })
    }
}

impl Type<Postgres> for PgBindValue {
    fn type_info() -> PgTypeInfo {
        PgTypeInfo::with_name("TEXT")
    }

    fn compatible(_ty: &PgTypeInfo) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_collapse_to_null() {
        assert_eq!(PgBindValue::from(None::<i32>), PgBindValue::Null);
        assert_eq!(PgBindValue::from(Some(7)), PgBindValue::I32(7));
        assert_eq!(PgBindValue::from(Some("a")), PgBindValue::String("a".into()));
    }

    #[test]
    fn values_report_their_own_type() {
        let v = PgBindValue::Bool(true);
        assert_eq!(v.produces(), Some(<bool as Type<Postgres>>::type_info()));
        let v = PgBindValue::I32(1);
        assert_eq!(v.produces(), Some(<i32 as Type<Postgres>>::type_info()));
    }
}
