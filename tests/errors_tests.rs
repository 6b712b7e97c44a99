use actix_web::ResponseError;
use actix_web::body::to_bytes;
use actix_web::http::StatusCode;
use foodgram::errors::{FoodgramError, Result};
use std::error::Error;

#[cfg(test)]
mod error_creation_tests {
    use super::*;

    #[test]
    fn test_validation_error() {
        let error = FoodgramError::validation("cooking_time must be at least 1");

        assert!(matches!(error, FoodgramError::Validation(_)));
        assert!(error.to_string().contains("Validation Error"));
        assert!(error.to_string().contains("cooking_time must be at least 1"));
        assert_eq!(error.code(), "E005");
    }

    #[test]
    fn test_not_found_error() {
        let error = FoodgramError::not_found("Recipe 7 not found");

        assert!(matches!(error, FoodgramError::NotFound(_)));
        assert_eq!(error.message(), "Recipe 7 not found");
        assert_eq!(error.error_type(), "Resource Not Found");
    }

    #[test]
    fn test_short_link_exhausted_error() {
        let error = FoodgramError::short_link_exhausted("64 attempts");

        assert_eq!(error.code(), "E012");
        assert_eq!(error.http_status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_error_source_is_none() {
        let error = FoodgramError::document_render("font missing");
        assert!(error.source().is_none());
    }
}

#[cfg(test)]
mod conversion_tests {
    use super::*;

    #[test]
    fn test_from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "config.toml");
        let error: FoodgramError = io.into();
        assert!(matches!(error, FoodgramError::FileOperation(_)));
    }

    #[test]
    fn test_from_serde_json_error() {
        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error: FoodgramError = parse.into();
        assert!(matches!(error, FoodgramError::Serialization(_)));
    }

    #[test]
    fn test_from_db_error() {
        let db = sea_orm::DbErr::Custom("boom".to_string());
        let error: FoodgramError = db.into();
        assert!(matches!(error, FoodgramError::DatabaseOperation(_)));
    }

    #[test]
    fn test_result_alias_with_question_mark() {
        fn parse(input: &str) -> Result<i32> {
            input
                .parse::<i32>()
                .map_err(|_| FoodgramError::validation(format!("'{}' is not a number", input)))
        }
        assert_eq!(parse("5").unwrap(), 5);
        assert!(parse("five").is_err());
    }
}

#[cfg(test)]
mod http_mapping_tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let cases = [
            (FoodgramError::validation("x"), StatusCode::BAD_REQUEST),
            (FoodgramError::conflict("x"), StatusCode::BAD_REQUEST),
            (FoodgramError::unauthorized("x"), StatusCode::UNAUTHORIZED),
            (FoodgramError::forbidden("x"), StatusCode::FORBIDDEN),
            (FoodgramError::not_found("x"), StatusCode::NOT_FOUND),
            (FoodgramError::database_connection("x"), StatusCode::SERVICE_UNAVAILABLE),
            (FoodgramError::database_operation("x"), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (error, status) in cases {
            assert_eq!(error.status_code(), status, "{}", error);
        }
    }

    #[actix_rt::test]
    async fn test_error_body_shape() {
        let resp = FoodgramError::forbidden("Only the author can modify this recipe").error_response();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let bytes = to_bytes(resp.into_body()).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["code"], 1003);
        assert_eq!(body["message"], "Only the author can modify this recipe");
    }

    #[actix_rt::test]
    async fn test_internal_error_message_is_generic() {
        let resp = FoodgramError::database_operation("no such table: recipes").error_response();
        let bytes = to_bytes(resp.into_body()).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["code"], 5000);
        assert_eq!(body["message"], "Database Operation Error");
    }
}
