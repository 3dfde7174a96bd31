use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use derive_more::Display;
use diesel::result::{DatabaseErrorKind, Error as DBError};
use std::convert::From;

#[derive(Debug, Display, PartialEq)]
pub enum ServiceError {
    #[display(fmt = "Internal Server Error")]
    InternalServerError,

    #[display(fmt = "BadRequest: {}", _0)]
    BadRequest(String),

    /// the request body is missing fields or contains invalid values
    #[display(fmt = "Validation: {}", _0)]
    Validation(String),

    #[display(fmt = "Conflict: {}", _0)]
    Conflict(String),

    #[display(fmt = "Unauthorized")]
    Unauthorized,

    #[display(fmt = "Forbidden: {}", _0)]
    Forbidden(String),

    #[display(fmt = "Not Found")]
    NotFound,
}

/// ErrorResponse is the body of every failed request.
///
/// Validation failures carry a `reason`, everything else a `message`.
#[derive(Debug, Serialize, PartialEq)]
#[serde(untagged)]
pub enum ErrorResponse {
    Message { message: String },
    Reason { reason: String },
}

impl ServiceError {
    pub fn body(&self) -> ErrorResponse {
        let message = match self {
            ServiceError::InternalServerError => "Internal Server Error, Please try later".into(),
            ServiceError::BadRequest(ref message) => message.clone(),
            ServiceError::Validation(ref reason) => {
                return ErrorResponse::Reason {
                    reason: reason.clone(),
                }
            }
            ServiceError::Conflict(ref message) => message.clone(),
            ServiceError::Unauthorized => "Unauthorized".into(),
            ServiceError::Forbidden(ref message) => message.clone(),
            ServiceError::NotFound => "Not Found".into(),
        };

        ErrorResponse::Message { message }
    }
}

// impl ResponseError trait allows to convert our errors into http responses with appropriate data
impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
            ServiceError::BadRequest(_) | ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            ServiceError::Conflict(_) => StatusCode::CONFLICT,
            ServiceError::Unauthorized => StatusCode::UNAUTHORIZED,
            ServiceError::Forbidden(_) => StatusCode::FORBIDDEN,
            ServiceError::NotFound => StatusCode::NOT_FOUND,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(self.body())
    }
}

impl From<DBError> for ServiceError {
    fn from(error: DBError) -> ServiceError {
        match error {
            DBError::NotFound => ServiceError::NotFound,
            DBError::DatabaseError(kind, info) => {
                let message = info.details().unwrap_or_else(|| info.message()).to_string();
                error!("db error: {}", message);
                match kind {
                    DatabaseErrorKind::UniqueViolation => ServiceError::Conflict(message),
                    DatabaseErrorKind::ForeignKeyViolation => ServiceError::BadRequest(message),
                    _ => ServiceError::InternalServerError,
                }
            }
            _ => {
                error!("db error: {}", error);
                ServiceError::InternalServerError
            }
        }
    }
}

impl From<r2d2::Error> for ServiceError {
    fn from(error: r2d2::Error) -> ServiceError {
        error!("r2d2 connection pool error: {}", error);
        ServiceError::InternalServerError
    }
}

impl From<argon2::Error> for ServiceError {
    fn from(error: argon2::Error) -> ServiceError {
        error!("argon2 error: {}", error);
        ServiceError::InternalServerError
    }
}

impl From<actix_threadpool::BlockingError<ServiceError>> for ServiceError {
    fn from(error: actix_threadpool::BlockingError<ServiceError>) -> ServiceError {
        match error {
            actix_threadpool::BlockingError::Error(error) => error,
            actix_threadpool::BlockingError::Canceled => {
                error!("actix threadpool task was canceled");
                ServiceError::InternalServerError
            }
        }
    }
}
