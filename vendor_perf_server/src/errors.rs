use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use log::error;
use serde_json::json;
use thiserror::Error;
use vendor_perf_engine::{validation::ValidationErrors, AuthApiError, PurchaseOrderApiError, VendorApiError};

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("Could not read request body: {0}")]
    InvalidRequestBody(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("Invalid server configuration. {0}")]
    ConfigurationError(String),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
    #[error("Authentication Error. {0}")]
    AuthenticationError(#[from] AuthError),
    #[error("The data was not found. {0}")]
    NoRecordFound(String),
    #[error("Validation failed. {0}")]
    ValidationFailed(ValidationErrors),
    /// Bad username or password on the login endpoint. Reported as a 400, unlike the token endpoint.
    #[error("Invalid Credentials")]
    InvalidCredentials,
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::ValidationFailed(_) => StatusCode::BAD_REQUEST,
            Self::InvalidCredentials => StatusCode::BAD_REQUEST,
            Self::AuthenticationError(_) => StatusCode::UNAUTHORIZED,
            Self::NoRecordFound(_) => StatusCode::NOT_FOUND,
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            Self::ValidationFailed(errors) => json!(errors),
            Self::InvalidCredentials => json!({ "errors": self.to_string() }),
            _ => json!({ "error": self.to_string() }),
        };
        HttpResponse::build(self.status_code()).insert_header(ContentType::json()).body(body.to_string())
    }
}

#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("Authentication credentials were not provided.")]
    MissingToken,
    #[error("Given token not valid for any token type. {0}")]
    InvalidToken(String),
    #[error("Token has wrong type. Expected token_type '{0}'.")]
    WrongTokenType(String),
    #[error("No active account found with the given credentials")]
    InvalidCredentials,
    #[error("Could not issue token. {0}")]
    TokenCreationError(String),
}

impl From<VendorApiError> for ServerError {
    fn from(e: VendorApiError) -> Self {
        match e {
            VendorApiError::DatabaseError(e) => Self::BackendError(format!("Database error: {e}")),
            VendorApiError::VendorCodeAlreadyExists(_) => Self::ValidationFailed(ValidationErrors::single(
                "vendor_code",
                "vendor with this vendor code already exists.",
            )),
            VendorApiError::VendorNotFound(_) => Self::NoRecordFound(e.to_string()),
            VendorApiError::ValidationFailed(errors) => Self::ValidationFailed(errors),
        }
    }
}

impl From<PurchaseOrderApiError> for ServerError {
    fn from(e: PurchaseOrderApiError) -> Self {
        match e {
            PurchaseOrderApiError::DatabaseError(e) => Self::BackendError(format!("Database error: {e}")),
            PurchaseOrderApiError::PoNumberAlreadyExists(_) => Self::ValidationFailed(ValidationErrors::single(
                "po_number",
                "purchase order with this po number already exists.",
            )),
            PurchaseOrderApiError::OrderNotFound(_) => Self::NoRecordFound(e.to_string()),
            PurchaseOrderApiError::VendorNotFound(id) => Self::ValidationFailed(ValidationErrors::single(
                "vendor",
                format!("Invalid pk \"{id}\" - object does not exist."),
            )),
            PurchaseOrderApiError::ValidationFailed(errors) => Self::ValidationFailed(errors),
            PurchaseOrderApiError::VendorError(e) => e.into(),
        }
    }
}

impl From<AuthApiError> for ServerError {
    fn from(e: AuthApiError) -> Self {
        match e {
            AuthApiError::DatabaseError(e) => Self::BackendError(format!("Database error: {e}")),
            AuthApiError::UsernameTaken => Self::ValidationFailed(ValidationErrors::single("username", e.to_string())),
            AuthApiError::InvalidCredentials => Self::InvalidCredentials,
            AuthApiError::ValidationFailed(errors) => Self::ValidationFailed(errors),
            AuthApiError::PasswordHashError(ref reason) => {
                error!("🔑️ Password hashing failed. {reason}");
                Self::BackendError(e.to_string())
            },
        }
    }
}
