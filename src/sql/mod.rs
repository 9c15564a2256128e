//! Safe SQL building for the users table: fixed identifiers, values as parameters.

mod builder;
pub mod params;
mod row;
pub use builder::*;
pub use params::*;
pub use row::row_to_json;
