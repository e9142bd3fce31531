use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use std::fmt;

use crate::auth::AuthError;

#[derive(Debug)]
pub enum AppError {
    SheetsApi(String),
    Auth(AuthError),
    PdfError(String),
    ConfigError(String),
    ValidationError(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::SheetsApi(_) => StatusCode::BAD_GATEWAY,
            AppError::Auth(_) => StatusCode::BAD_GATEWAY,
            AppError::PdfError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::ConfigError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::SheetsApi(msg) => write!(f, "Erro na API do Google Sheets: {}", msg),
            AppError::Auth(err) => write!(f, "Erro de autenticação Google: {}", err),
            AppError::PdfError(msg) => write!(f, "Erro ao gerar PDF: {}", msg),
            AppError::ConfigError(msg) => write!(f, "Erro de configuração: {}", msg),
            AppError::ValidationError(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        AppError::Auth(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = json!({
            "error": self.to_string(),
            "status": status.as_u16()
        });

        (status, axum::Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::ValidationError("Nome obrigatório".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::SheetsApi("403".into()).status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            AppError::PdfError("fonte".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::ConfigError("coluna".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_auth_error_converts_to_bad_gateway() {
        let err: AppError = AuthError::Token("expirado".to_string()).into();
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
        assert!(err.to_string().starts_with("Erro de autenticação Google"));
    }

    #[test]
    fn test_validation_message_is_shown_verbatim() {
        let err = AppError::ValidationError("Informe o nome.".to_string());
        assert_eq!(err.to_string(), "Informe o nome.");
    }
}
