use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use std::path::PathBuf;
use std::process::ExitStatus;

#[derive(thiserror::Error, Debug)]
pub enum ThumbnailError {
    #[error("invalid camera name")]
    UnknownCamera(String),

    #[error("invalid camera uri: {0}")]
    InvalidUri(String),

    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with {status}: {stderr}")]
    DecoderFailed {
        program: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("{program} produced no image data")]
    EmptyOutput { program: String },

    #[error("failed to read lookup table {}: {source}", .path.display())]
    LookupRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("lookup table entry {0:?} has no uri")]
    LookupParse(String),

    #[error("invalid camera feed")]
    InvalidFeed,
}

impl ResponseError for ThumbnailError {
    fn status_code(&self) -> StatusCode {
        match self {
            ThumbnailError::UnknownCamera(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    // Producer failures are reported with a fixed message, the detail only goes to the log.
    fn error_response(&self) -> HttpResponse {
        let body = match self {
            ThumbnailError::UnknownCamera(_) => self.to_string(),
            _ => ThumbnailError::InvalidFeed.to_string(),
        };
        HttpResponse::build(self.status_code())
            .content_type("text/plain; charset=utf-8")
            .body(body)
    }
}
