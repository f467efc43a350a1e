/// Error types for Space Service
///
/// Errors are converted to appropriate HTTP responses for API clients.
/// Rate-limit denials (daily quota, per-space cooldown) surface as 429
/// with a `blocked` flag so clients can distinguish them from other
/// client errors.
use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use thiserror::Error;

/// Result type for space-service operations
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error types
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed
    #[error("Database error: {0}")]
    Database(String),

    /// Validation failed
    #[error("Validation error: {0}")]
    Validation(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Identity headers missing or malformed
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Caller is neither the resource owner nor an admin
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Daily report quota reached; resets at the next calendar day
    #[error("Daily report limit of {limit} reached. Come back tomorrow.")]
    DailyLimitExceeded { limit: i32 },

    /// Space was reported too recently by this user
    #[error("You already reported this space. Wait {retry_after_minutes} more minute(s).")]
    CooldownActive { retry_after_minutes: i64 },

    /// Concurrent write lost the race
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::DailyLimitExceeded { .. } | AppError::CooldownActive { .. } => {
                StatusCode::TOO_MANY_REQUESTS
            }
            AppError::Conflict(_) => StatusCode::CONFLICT,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        match self {
            AppError::DailyLimitExceeded { .. } => {
                HttpResponse::build(status).json(serde_json::json!({
                    "blocked": true,
                    "error": self.to_string(),
                    "status": status.as_u16(),
                }))
            }
            AppError::CooldownActive {
                retry_after_minutes,
            } => HttpResponse::build(status).json(serde_json::json!({
                "blocked": true,
                "error": self.to_string(),
                "retry_after_minutes": retry_after_minutes,
                "status": status.as_u16(),
            })),
            _ => HttpResponse::build(status).json(serde_json::json!({
                "error": self.to_string(),
                "status": status.as_u16(),
            })),
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        // Serialization failures and unique-index violations mean a
        // concurrent writer won; callers may retry. Everything else is
        // an internal database failure.
        if let sqlx::Error::Database(db_err) = &err {
            if let Some(code) = db_err.code() {
                if code == "40001" || code == "40P01" || code == "23505" {
                    return AppError::Conflict(db_err.to_string());
                }
            }
        }
        AppError::Database(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limit_errors_map_to_429() {
        let daily = AppError::DailyLimitExceeded { limit: 10 };
        let cooldown = AppError::CooldownActive {
            retry_after_minutes: 7,
        };

        assert_eq!(daily.status_code(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(cooldown.status_code(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[test]
    fn cooldown_message_carries_wait_time() {
        let err = AppError::CooldownActive {
            retry_after_minutes: 3,
        };
        assert!(err.to_string().contains("3"));
    }
}
