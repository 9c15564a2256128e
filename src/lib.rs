//! Users API: CRUD and aggregate queries over a PostgreSQL `users` table.

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod model;
pub mod response;
pub mod routes;
pub mod service;
pub mod sql;
pub mod state;
pub mod store;

pub use config::AppConfig;
pub use error::{AppError, ConfigError};
pub use model::{Lookup, NewUser, UpsertUser, User, UserPatch, UserStats};
pub use routes::{app, common_routes_with_ready, user_routes};
pub use state::AppState;
pub use store::{ensure_database_exists, ensure_users_table, PgUserStore, UserStore};
