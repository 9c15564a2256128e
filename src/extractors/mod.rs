pub mod json;
pub mod query;

pub use json::AppJson;
pub use query::AppQuery;

use crate::error::AppError;
use axum::http::StatusCode;

/// Carries an axum rejection's status over to `AppError`. Anything that is not
/// a media type or size problem is the client's malformed input.
pub(crate) fn rejection_to_error(status: StatusCode, message: String) -> AppError {
    match status {
        StatusCode::UNSUPPORTED_MEDIA_TYPE => AppError::UnsupportedMediaType(message),
        StatusCode::PAYLOAD_TOO_LARGE => AppError::PayloadTooLarge(message),
        _ => AppError::BadRequest(message),
    }
}
