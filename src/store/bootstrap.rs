//! Startup DDL: create the database and the `users` table if they are missing.
//! Idempotent; this is not a migration system.

use crate::error::{AppError, ConfigError};
use sqlx::ConnectOptions;
use sqlx::PgPool;
use std::str::FromStr;

const USERS_DDL: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name TEXT NOT NULL,
    email TEXT UNIQUE,
    age INTEGER,
    is_active BOOLEAN
)
"#;

/// Create the `users` table (and its email unique constraint) if not exists.
pub async fn ensure_users_table(pool: &PgPool) -> Result<(), AppError> {
    sqlx::query(USERS_DDL).execute(pool).await?;
    tracing::info!("users table ready");
    Ok(())
}

/// Ensure the database in `database_url` exists; create it if not. Connects to the
/// default `postgres` database to run CREATE DATABASE. Call before creating the main pool.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    let (admin_url, db_name) = parse_db_name_from_url(database_url)?;
    if db_name.is_empty() || db_name == "postgres" {
        return Ok(());
    }
    let opts = sqlx::postgres::PgConnectOptions::from_str(&admin_url)
        .map_err(|e| ConfigError::Validation(format!("invalid DATABASE_URL: {}", e)))?;
    let mut conn: sqlx::PgConnection = opts.connect().await?;
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await?;
    if !exists.0 {
        tracing::info!(database = %db_name, "creating database");
        sqlx::query(&format!("CREATE DATABASE {}", quote_ident(&db_name)))
            .execute(&mut conn)
            .await?;
    }
    Ok(())
}

/// Split a connection URL into (url of the `postgres` maintenance database, target database name).
fn parse_db_name_from_url(url: &str) -> Result<(String, String), AppError> {
    let scheme_end = url.find("://").map(|i| i + 3).unwrap_or(0);
    let path_start = url[scheme_end..]
        .find('/')
        .map(|i| scheme_end + i + 1)
        .ok_or_else(|| ConfigError::Validation("DATABASE_URL has no database path".into()))?;
    let path_and_query = url.get(path_start..).unwrap_or("");
    let mut parts = path_and_query.splitn(2, '?');
    let db_name = parts.next().unwrap_or("").trim();
    let query = parts.next().map(|q| format!("?{}", q)).unwrap_or_default();
    let base = url.get(..path_start).unwrap_or(url);
    Ok((format!("{}postgres{}", base, query), db_name.to_string()))
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
