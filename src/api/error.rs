use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use log::{error, warn};
use thiserror::Error;

use super::models::ErrorResponse;
use crate::blockchain::LedgerError;

/// Every way a request can be refused. None of them mutate the ledger.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid difficulty. Must be a positive integer.")]
    InvalidDifficulty,

    #[error("Transaction is required")]
    MissingTransaction,

    #[error("Invalid block index")]
    InvalidIndex,

    #[error("Block index out of range")]
    IndexOutOfRange,

    #[error("New data is required")]
    MissingData,

    #[error("{0}")]
    BadRequest(String),

    #[error("Mining aborted after {attempts} attempts")]
    MiningAborted { attempts: u64 },

    #[error("Internal server error")]
    Internal(String),
}

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::IndexOutOfRange { .. } => ApiError::IndexOutOfRange,
            LedgerError::MiningAborted { attempts } => ApiError::MiningAborted { attempts },
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MiningAborted { .. } => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            ApiError::Internal(detail) => error!("request failed: {detail}"),
            other => warn!("request rejected: {other}"),
        }
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::ApiError;
    use crate::blockchain::LedgerError;
    use actix_web::ResponseError;
    use actix_web::body::to_bytes;
    use actix_web::http::StatusCode;

    #[test]
    fn status_codes() {
        assert_eq!(ApiError::InvalidDifficulty.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::IndexOutOfRange.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::MiningAborted { attempts: 3 }.status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ApiError::Internal("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn ledger_errors_map_to_api_errors() {
        let err: ApiError = LedgerError::IndexOutOfRange { index: 9, len: 2 }.into();
        assert!(matches!(err, ApiError::IndexOutOfRange));
        let err: ApiError = LedgerError::MiningAborted { attempts: 7 }.into();
        assert!(matches!(err, ApiError::MiningAborted { attempts: 7 }));
    }

    #[actix_web::test]
    async fn internal_detail_is_not_leaked() {
        let resp = ApiError::Internal("lock poisoned".into()).error_response();
        let body = to_bytes(resp.into_body()).await.unwrap();
        assert_eq!(&body[..], br#"{"error":"Internal server error"}"#);
    }
}
