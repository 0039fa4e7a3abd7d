use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use derive_more::Display;
use serde_json::json;

#[derive(Debug, Display, PartialEq, Eq)]
pub enum ReportError {
    #[display(fmt = "Employee not found")]
    NotFound,
    #[display(fmt = "Employee data is temporarily unavailable")]
    StoreUnavailable,
    #[display(fmt = "Unauthorized")]
    Unauthorized,
}

impl ResponseError for ReportError {
    fn status_code(&self) -> StatusCode {
        match self {
            ReportError::NotFound => StatusCode::NOT_FOUND,
            ReportError::StoreUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ReportError::Unauthorized => StatusCode::UNAUTHORIZED,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({
            "error": self.to_string()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_map_to_http_statuses() {
        assert_eq!(ReportError::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ReportError::StoreUnavailable.status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ReportError::Unauthorized.error_response().status(),
            StatusCode::UNAUTHORIZED
        );
    }
}
