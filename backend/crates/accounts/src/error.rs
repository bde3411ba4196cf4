//! Accounts Error Types
//!
//! Accounts-specific error variants that integrate with the unified
//! `kernel::error::AppError` system. Every variant carries a stable `code`
//! so the frontend can branch without matching on message text.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

use crate::domain::entity::registration_session::CodeRejection;

/// Accounts-specific result type alias
pub type AccountsResult<T> = Result<T, AccountsError>;

#[derive(Debug, Error)]
pub enum AccountsError {
    /// Malformed input (bad email, short password, unknown role, ...)
    #[error("{0}")]
    Validation(String),

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("You must accept the terms and conditions")]
    TermsNotAccepted,

    #[error("Email is already registered")]
    EmailTaken,

    #[error("Phone number is already registered")]
    PhoneTaken,

    /// Temp token missing, forged, expired or already consumed
    #[error("Registration session is invalid or has expired")]
    SessionInvalid,

    #[error("College not found")]
    CollegeNotFound,

    #[error("Verification codes have not been issued for this session")]
    CodesNotIssued,

    #[error("Email verification code has expired")]
    EmailCodeExpired,

    #[error("Phone verification code has expired")]
    PhoneCodeExpired,

    #[error("Email verification code is incorrect")]
    EmailCodeIncorrect,

    #[error("Phone verification code is incorrect")]
    PhoneCodeIncorrect,

    /// Session already promoted to a user
    #[error("Registration is already verified")]
    AlreadyVerified,

    #[error("Please wait {retry_after_secs} seconds before requesting new codes")]
    ResendTooSoon { retry_after_secs: u64 },

    /// Neither channel accepted the codes
    #[error("Failed to send verification codes")]
    DeliveryFailed,

    #[error("User not found")]
    UserNotFound,

    #[error("User is not a college admin")]
    NotCollegeAdmin,

    #[error("Authentication required")]
    Unauthorized,

    #[error("Platform admin access required")]
    Forbidden,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Account is suspended")]
    AccountSuspended,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AccountsError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        use AccountsError::*;
        match self {
            Validation(_)
            | PasswordMismatch
            | TermsNotAccepted
            | SessionInvalid
            | CollegeNotFound
            | CodesNotIssued
            | EmailCodeExpired
            | PhoneCodeExpired
            | EmailCodeIncorrect
            | PhoneCodeIncorrect
            | NotCollegeAdmin => ErrorKind::BadRequest,
            EmailTaken | PhoneTaken | AlreadyVerified => ErrorKind::Conflict,
            ResendTooSoon { .. } => ErrorKind::TooManyRequests,
            DeliveryFailed => ErrorKind::BadGateway,
            UserNotFound => ErrorKind::NotFound,
            Unauthorized | InvalidCredentials => ErrorKind::Unauthorized,
            Forbidden | AccountSuspended => ErrorKind::Forbidden,
            Database(_) | Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Machine-readable code
    pub fn code(&self) -> &'static str {
        use AccountsError::*;
        match self {
            Validation(_) => "VALIDATION_ERROR",
            PasswordMismatch => "PASSWORD_MISMATCH",
            TermsNotAccepted => "TERMS_NOT_ACCEPTED",
            EmailTaken => "EMAIL_TAKEN",
            PhoneTaken => "PHONE_TAKEN",
            SessionInvalid => "SESSION_INVALID",
            CollegeNotFound => "COLLEGE_NOT_FOUND",
            CodesNotIssued => "CODES_NOT_ISSUED",
            EmailCodeExpired => "EMAIL_CODE_EXPIRED",
            PhoneCodeExpired => "PHONE_CODE_EXPIRED",
            EmailCodeIncorrect => "EMAIL_CODE_INCORRECT",
            PhoneCodeIncorrect => "PHONE_CODE_INCORRECT",
            AlreadyVerified => "ALREADY_VERIFIED",
            ResendTooSoon { .. } => "RESEND_TOO_SOON",
            DeliveryFailed => "DELIVERY_FAILED",
            UserNotFound => "USER_NOT_FOUND",
            NotCollegeAdmin => "NOT_COLLEGE_ADMIN",
            Unauthorized => "UNAUTHORIZED",
            Forbidden => "FORBIDDEN",
            InvalidCredentials => "INVALID_CREDENTIALS",
            AccountSuspended => "ACCOUNT_SUSPENDED",
            Database(_) => "DATABASE_ERROR",
            Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Convert to AppError
    ///
    /// Server-side details stay in the log; the response only says what
    /// the caller can act on.
    pub fn to_app_error(&self) -> AppError {
        use AccountsError::*;
        let message = self.to_string();
        let err = match self.kind() {
            ErrorKind::BadRequest => AppError::bad_request(message),
            ErrorKind::Unauthorized => AppError::unauthorized(message),
            ErrorKind::Forbidden => AppError::forbidden(message),
            ErrorKind::NotFound => AppError::not_found(message),
            ErrorKind::Conflict => AppError::conflict(message),
            ErrorKind::TooManyRequests => AppError::too_many_requests(message),
            ErrorKind::BadGateway => AppError::bad_gateway(message),
            ErrorKind::InternalServerError => AppError::internal("Internal server error"),
            kind => AppError::new(kind, message),
        }
        .with_code(self.code());

        match self {
            ResendTooSoon { retry_after_secs } => err.with_retry_after(*retry_after_secs),
            EmailCodeExpired | PhoneCodeExpired => err.with_action("Request new codes and try again"),
            SessionInvalid => err.with_action("Start registration again"),
            DeliveryFailed => err.with_action("Request new codes in a moment"),
            _ => err,
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        use AccountsError::*;
        match self {
            Database(e) => {
                tracing::error!(error = %e, "Accounts database error");
            }
            Internal(msg) => {
                tracing::error!(message = %msg, "Accounts internal error");
            }
            DeliveryFailed => {
                tracing::error!("Verification code delivery failed on every channel");
            }
            EmailCodeIncorrect | PhoneCodeIncorrect => {
                tracing::warn!(code = self.code(), "Incorrect verification code submitted");
            }
            ResendTooSoon { retry_after_secs } => {
                tracing::warn!(retry_after_secs, "Code resend requested during cooldown");
            }
            InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            Forbidden => {
                tracing::warn!("Non-admin attempted an admin route");
            }
            _ => {
                tracing::debug!(error = %self, "Accounts error");
            }
        }
    }
}

impl IntoResponse for AccountsError {
    fn into_response(self) -> Response {
        self.log();
        match self {
            // Pool exhaustion and lost connections become 503
            AccountsError::Database(err) => AppError::from(err)
                .with_code("DATABASE_ERROR")
                .into_response(),
            other => other.to_app_error().into_response(),
        }
    }
}

impl From<AppError> for AccountsError {
    /// Value objects report validation failures as 400 `AppError`s
    fn from(err: AppError) -> Self {
        if err.is_client_error() {
            AccountsError::Validation(err.message().to_string())
        } else {
            AccountsError::Internal(err.to_string())
        }
    }
}

impl From<CodeRejection> for AccountsError {
    fn from(rejection: CodeRejection) -> Self {
        match rejection {
            CodeRejection::NotIssued => AccountsError::CodesNotIssued,
            CodeRejection::EmailExpired => AccountsError::EmailCodeExpired,
            CodeRejection::PhoneExpired => AccountsError::PhoneCodeExpired,
            CodeRejection::EmailIncorrect => AccountsError::EmailCodeIncorrect,
            CodeRejection::PhoneIncorrect => AccountsError::PhoneCodeIncorrect,
        }
    }
}

impl From<platform::password::PasswordPolicyError> for AccountsError {
    fn from(err: platform::password::PasswordPolicyError) -> Self {
        AccountsError::Validation(err.to_string())
    }
}

impl From<platform::password::PasswordHashError> for AccountsError {
    fn from(err: platform::password::PasswordHashError) -> Self {
        AccountsError::Internal(err.to_string())
    }
}
