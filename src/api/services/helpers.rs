//! HTTP 帮助函数

use actix_web::{HttpResponse, http::StatusCode};
use serde::Serialize;

use crate::errors::FoodgramError;
use crate::services::RecipeQuery;

/// 200 OK + JSON
pub fn ok_json<T: Serialize>(data: T) -> HttpResponse {
    HttpResponse::Ok()
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(data)
}

/// 201 Created + JSON
pub fn created_json<T: Serialize>(data: T) -> HttpResponse {
    HttpResponse::build(StatusCode::CREATED)
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(data)
}

pub fn no_content() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

/// 将 actix 的参数解析错误转换为统一的 400 响应
pub fn extractor_error<E: std::fmt::Display>(err: E) -> actix_web::Error {
    FoodgramError::validation(err.to_string()).into()
}

fn parse_flag(key: &str, value: &str) -> Result<bool, FoodgramError> {
    match value {
        "1" | "true" => Ok(true),
        "0" | "false" => Ok(false),
        other => Err(FoodgramError::validation(format!(
            "{}: expected 0 or 1, got '{}'",
            key, other
        ))),
    }
}

/// 解析食谱列表查询串；`tags` 可重复出现
pub fn parse_recipe_query(query_string: &str) -> Result<RecipeQuery, FoodgramError> {
    let mut query = RecipeQuery::default();

    for (key, value) in url::form_urlencoded::parse(query_string.as_bytes()) {
        match key.as_ref() {
            "tags" => {
                let slug = value.trim();
                if !slug.is_empty() && !query.tags.iter().any(|t| t == slug) {
                    query.tags.push(slug.to_string());
                }
            }
            "author" => {
                let author = value.trim().parse::<i32>().map_err(|_| {
                    FoodgramError::validation(format!("author: '{}' is not a valid id", value))
                })?;
                query.author = Some(author);
            }
            "is_favorited" => query.is_favorited = Some(parse_flag("is_favorited", &value)?),
            "is_in_shopping_cart" => {
                query.is_in_shopping_cart = Some(parse_flag("is_in_shopping_cart", &value)?)
            }
            // 分页等其它参数忽略
            _ => {}
        }
    }

    Ok(query)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_repeated_tags() {
        let query = parse_recipe_query("tags=breakfast&tags=lunch&tags=breakfast").unwrap();
        assert_eq!(query.tags, vec!["breakfast", "lunch"]);
        assert_eq!(query.is_favorited, None);
        assert_eq!(query.is_in_shopping_cart, None);
    }

    #[test]
    fn test_parse_flags_and_author() {
        let query = parse_recipe_query("author=7&is_favorited=1&is_in_shopping_cart=0").unwrap();
        assert_eq!(query.author, Some(7));
        assert_eq!(query.is_favorited, Some(true));
        assert_eq!(query.is_in_shopping_cart, Some(false));
    }

    #[test]
    fn test_parse_rejects_bad_values() {
        assert!(parse_recipe_query("author=abc").is_err());
        assert!(parse_recipe_query("is_favorited=yes").is_err());
    }

    #[test]
    fn test_parse_ignores_unknown_params() {
        let query = parse_recipe_query("page=2&limit=6").unwrap();
        assert!(query.tags.is_empty());
        assert_eq!(query.author, None);
    }
}
