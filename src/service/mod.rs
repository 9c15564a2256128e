//! Request-level checks applied before anything reaches the store.

mod validation;
pub use validation::RequestValidator;
