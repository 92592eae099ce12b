use std::fmt::{Debug, Display};
use std::io::{Error as IoError, ErrorKind};

use actix_web::error::{JsonPayloadError, PathError};
use actix_web::dev::ServiceResponse;
use actix_web::http::StatusCode;
use actix_web::middleware::ErrorHandlerResponse;
use actix_web::{HttpResponse, ResponseError};
use derivative::Derivative;
use figment::Error as ConfigError;
use sqlx::Error as DatabaseError;

use crate::campaign::CampaignId;
use crate::utils::Envelope;

/// App data that decides whether 500 responses carry the underlying error
/// message. Only development servers turn this on.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ErrorDetails(pub bool);

/// Error handler for 500 responses. Re-renders the envelope with the internal
/// error message when the app was given `ErrorDetails(true)`.
pub fn render_internal_details<B>(
    res: ServiceResponse<B>,
) -> actix_web::Result<ErrorHandlerResponse<B>> {
    let expose = res
        .request()
        .app_data::<ErrorDetails>()
        .map_or(false, |details| details.0);
    let envelope = match res.response().error() {
        Some(err) if expose => err.as_error::<Error>().map(|err| err.to_envelope(true)),
        _ => None,
    };

    let res = match envelope {
        Some(envelope) => {
            let (req, res) = res.into_parts();
            let res = HttpResponse::build(res.status()).json(envelope);
            ServiceResponse::new(req, res).map_into_right_body()
        }
        None => res.map_into_left_body(),
    };

    Ok(ErrorHandlerResponse::Response(res))
}

#[derive(Debug, Derivative)]
#[derivative(PartialEq, Eq)]
pub enum Error {
    // 400
    InvalidJson(#[derivative(PartialEq = "ignore")] JsonPayloadError),
    InvalidPath(#[derivative(PartialEq = "ignore")] PathError),
    MissingCampaignFields,
    InvalidStartDate {
        start_date: String,
    },
    InvalidStatus {
        status: String,
    },
    StatusRequired,

    // 404
    PathNotFound,
    CampaignNotFound {
        campaign_id: CampaignId,
    },

    // 500
    ExistentialState(String),
    FailedDatabaseCall(#[derivative(PartialEq = "ignore")] DatabaseError),
    IoError(#[derivative(PartialEq = "ignore")] IoError),
    InvalidConfig(#[derivative(PartialEq = "ignore")] Box<ConfigError>),
}

impl Error {
    pub fn error_message(&self) -> &'static str {
        match self {
            Error::InvalidJson(_) => "The given json could not be parsed",
            Error::InvalidPath(_) => "The given path could not be parsed",
            Error::MissingCampaignFields => {
                "Campaign name, client name, and start date are required"
            }
            Error::InvalidStartDate { .. } => "Invalid start date. Must be formatted as YYYY-MM-DD",
            Error::InvalidStatus { .. } => "Invalid status. Must be active, paused, or completed",
            Error::StatusRequired => "Valid status is required (active, paused, or completed)",
            Error::PathNotFound => "Route not found",
            Error::CampaignNotFound { .. } => "Campaign not found",
            Error::ExistentialState(_) => "The server detected an invalid state",
            Error::FailedDatabaseCall(_) => {
                "An error occurred when communicating with the database"
            }
            Error::IoError(_) => "An error occurred during an I/O operation",
            Error::InvalidConfig(_) => "The server configuration could not be loaded",
        }
    }

    /// Whether this error means the database could not be reached at all.
    ///
    /// The pool retries refused connections until its acquire timeout runs
    /// out, so a timed out acquire is treated the same as a refused connect.
    pub fn is_connection_refused(&self) -> bool {
        match self {
            Error::FailedDatabaseCall(DatabaseError::Io(err)) => {
                err.kind() == ErrorKind::ConnectionRefused
            }
            Error::FailedDatabaseCall(DatabaseError::PoolTimedOut) => true,
            _ => false,
        }
    }

    /// Renders the failure envelope. Parse errors always explain themselves,
    /// internal errors only when `expose_internal` is set.
    pub fn to_envelope(&self, expose_internal: bool) -> Envelope<()> {
        let error = match self {
            Error::InvalidJson(err) => Some(err.to_string()),
            Error::InvalidPath(err) => Some(err.to_string()),
            Error::ExistentialState(msg) if expose_internal => Some(msg.clone()),
            Error::FailedDatabaseCall(err) if expose_internal => Some(err.to_string()),
            Error::IoError(err) if expose_internal => Some(err.to_string()),
            Error::InvalidConfig(err) if expose_internal => Some(err.to_string()),
            _ => None,
        };

        Envelope {
            success: false,
            data: None,
            message: self.error_message().to_owned(),
            error,
        }
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidJson(_) => StatusCode::BAD_REQUEST,
            Error::InvalidPath(_) => StatusCode::BAD_REQUEST,
            Error::MissingCampaignFields => StatusCode::BAD_REQUEST,
            Error::InvalidStartDate { .. } => StatusCode::BAD_REQUEST,
            Error::InvalidStatus { .. } => StatusCode::BAD_REQUEST,
            Error::StatusRequired => StatusCode::BAD_REQUEST,
            Error::PathNotFound => StatusCode::NOT_FOUND,
            Error::CampaignNotFound { .. } => StatusCode::NOT_FOUND,
            Error::ExistentialState(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::FailedDatabaseCall(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::IoError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::InvalidConfig(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(self.to_envelope(false))
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        Debug::fmt(self, f)
    }
}

impl From<DatabaseError> for Error {
    fn from(error: DatabaseError) -> Error {
        Error::FailedDatabaseCall(error)
    }
}

impl From<IoError> for Error {
    fn from(error: IoError) -> Error {
        Error::IoError(error)
    }
}

impl From<ConfigError> for Error {
    fn from(error: ConfigError) -> Error {
        Error::InvalidConfig(Box::new(error))
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::InvalidJson(err) => Some(err),
            Error::InvalidPath(err) => Some(err),
            Error::FailedDatabaseCall(err) => Some(err),
            Error::IoError(err) => Some(err),
            Error::InvalidConfig(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}
