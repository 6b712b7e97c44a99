//! 统一 API 错误码定义

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::Serialize;
use serde_repr::{Deserialize_repr, Serialize_repr};

use crate::errors::FoodgramError;

/// API 错误码枚举
///
/// 使用 serde_repr 序列化为数字，按千位分域：
/// - 0: 成功
/// - 1000-1099: 通用错误
/// - 3000-3099: 短链接错误
/// - 4000-4099: 文档生成错误
/// - 5000-5099: 存储错误
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_repr, Deserialize_repr)]
#[repr(i32)]
pub enum ErrorCode {
    // 成功
    Success = 0,

    // 通用错误 1000-1099
    BadRequest = 1000,
    Unauthorized = 1001,
    ValidationFailed = 1002,
    Forbidden = 1003,
    NotFound = 1004,
    InternalServerError = 1005,
    Conflict = 1009,
    ServiceUnavailable = 1030,

    // 短链接错误 3000-3099
    ShortLinkNotFound = 3000,
    ShortLinkExhausted = 3001,

    // 文档生成错误 4000-4099
    DocumentRenderFailed = 4000,

    // 存储错误 5000-5099
    DatabaseError = 5000,
}

impl From<&FoodgramError> for ErrorCode {
    fn from(err: &FoodgramError) -> Self {
        match err {
            FoodgramError::Validation(_) => ErrorCode::ValidationFailed,
            FoodgramError::NotFound(_) => ErrorCode::NotFound,
            FoodgramError::Unauthorized(_) => ErrorCode::Unauthorized,
            FoodgramError::Forbidden(_) => ErrorCode::Forbidden,
            FoodgramError::Conflict(_) => ErrorCode::Conflict,
            FoodgramError::DatabaseConnection(_) => ErrorCode::ServiceUnavailable,
            FoodgramError::DatabaseConfig(_) | FoodgramError::DatabaseOperation(_) => {
                ErrorCode::DatabaseError
            }
            FoodgramError::DocumentRender(_) => ErrorCode::DocumentRenderFailed,
            FoodgramError::ShortLinkExhausted(_) => ErrorCode::ShortLinkExhausted,
            FoodgramError::FileOperation(_) | FoodgramError::Serialization(_) => {
                ErrorCode::InternalServerError
            }
        }
    }
}

/// 错误响应体 `{"code": <int>, "message": <string>}`
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub code: ErrorCode,
    pub message: String,
}

impl ResponseError for FoodgramError {
    fn status_code(&self) -> StatusCode {
        self.http_status()
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("{}", self);
        }

        // 内部错误不把细节暴露给客户端
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            self.error_type().to_string()
        } else {
            self.message().to_string()
        };

        HttpResponse::build(status)
            .append_header(("Content-Type", "application/json; charset=utf-8"))
            .json(ErrorBody {
                code: ErrorCode::from(self),
                message,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_serializes_as_number() {
        let json = serde_json::to_string(&ErrorCode::ValidationFailed).unwrap();
        assert_eq!(json, "1002");
        let parsed: ErrorCode = serde_json::from_str("3000").unwrap();
        assert_eq!(parsed, ErrorCode::ShortLinkNotFound);
    }

    #[test]
    fn test_error_mapping() {
        assert_eq!(
            ErrorCode::from(&FoodgramError::forbidden("x")),
            ErrorCode::Forbidden
        );
        assert_eq!(
            ErrorCode::from(&FoodgramError::short_link_exhausted("x")),
            ErrorCode::ShortLinkExhausted
        );
        assert_eq!(
            ErrorCode::from(&FoodgramError::database_connection("x")),
            ErrorCode::ServiceUnavailable
        );
    }

    #[test]
    fn test_internal_errors_hide_details() {
        let resp = FoodgramError::database_operation("secret table name").error_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let resp = FoodgramError::validation("tags: at least one tag is required").error_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
