use actix_web::error::ResponseError;
use actix_web::http::header::{HeaderName, HeaderValue};
use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// JSON body rendered for every structured failure.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub message: String,
    #[serde(rename = "statusCode")]
    pub status_code: u16,
}

/// Body rendered when the rate limiter rejects a request.
#[derive(Debug, Serialize)]
pub struct RateLimitBody {
    pub error: String,
    #[serde(rename = "retryAfter")]
    pub retry_after: u64,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid token")]
    InvalidToken,
    #[error("User not authenticated")]
    Unauthenticated,
    #[error("Insufficient permissions")]
    Forbidden,
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("Too many requests, please try again later.")]
    RateLimited {
        limit: u64,
        remaining: u64,
        reset_secs: u64,
    },
    #[error("Configuration error: {detail}")]
    Config { detail: String },
    #[error("Internal error: {detail}")]
    Internal { detail: String },
}

impl AppError {
    /// HTTP status code for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            AppError::Config { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message sent to the client. Config and internal details stay in the
    /// logs; clients only ever see the generic message.
    fn client_message(&self) -> String {
        match self {
            AppError::Config { .. } | AppError::Internal { .. } => {
                "Internal server error".to_string()
            }
            other => other.to_string(),
        }
    }

    pub fn invalid_token() -> Self {
        Self::InvalidToken
    }

    pub fn unauthenticated() -> Self {
        Self::Unauthenticated
    }

    pub fn forbidden() -> Self {
        Self::Forbidden
    }

    pub fn invalid_credentials() -> Self {
        Self::InvalidCredentials
    }

    pub fn config(detail: impl Into<String>) -> Self {
        Self::Config {
            detail: detail.into(),
        }
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::Internal {
            detail: detail.into(),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status();

        if status.is_server_error() {
            error!(error = %self, "request failed with internal error");
        }

        if let AppError::RateLimited {
            limit,
            remaining,
            reset_secs,
        } = self
        {
            return HttpResponse::build(status)
                .insert_header(rate_limit_header("x-ratelimit-limit", *limit))
                .insert_header(rate_limit_header("x-ratelimit-remaining", *remaining))
                .insert_header(rate_limit_header("x-ratelimit-reset", *reset_secs))
                .json(RateLimitBody {
                    error: self.client_message(),
                    retry_after: *reset_secs,
                });
        }

        HttpResponse::build(status).json(ErrorBody {
            success: false,
            message: self.client_message(),
            status_code: status.as_u16(),
        })
    }
}

pub(crate) fn rate_limit_header(name: &'static str, value: u64) -> (HeaderName, HeaderValue) {
    (
        HeaderName::from_static(name),
        HeaderValue::from_str(&value.to_string())
            .unwrap_or_else(|_| HeaderValue::from_static("0")),
    )
}
