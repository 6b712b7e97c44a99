use crate::storage::models::{Ingredient, Tag, Token, User};
use migration::entities::{ingredient, tag, token, user};

pub fn model_to_user(model: user::Model) -> User {
    User {
        id: model.id,
        email: model.email,
        username: model.username,
        first_name: model.first_name,
        last_name: model.last_name,
        created_at: model.created_at,
    }
}

pub fn model_to_tag(model: tag::Model) -> Tag {
    Tag {
        id: model.id,
        name: model.name,
        slug: model.slug,
    }
}

pub fn model_to_ingredient(model: ingredient::Model) -> Ingredient {
    Ingredient {
        id: model.id,
        name: model.name,
        measurement_unit: model.measurement_unit,
    }
}

pub fn model_to_token(model: token::Model) -> Token {
    Token {
        id: model.id,
        full_url: model.full_url,
        short_url: model.short_url,
        requests_count: model.requests_count.max(0),
        created_at: model.created_at,
        is_active: model.is_active,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_model_to_token_clamps_negative_counter() {
        let model = token::Model {
            id: 3,
            full_url: "http://localhost:8000/recipes/3".to_string(),
            short_url: "aB3dE9".to_string(),
            requests_count: -5,
            created_at: Utc::now(),
            is_active: true,
        };

        let token = model_to_token(model);
        assert_eq!(token.requests_count, 0);
        assert_eq!(token.short_url, "aB3dE9");
    }

    #[test]
    fn test_model_to_user_drops_auth_token() {
        let model = user::Model {
            id: 1,
            email: "cook@example.com".to_string(),
            username: "cook".to_string(),
            first_name: "Ann".to_string(),
            last_name: "Smith".to_string(),
            auth_token: "secret".to_string(),
            created_at: Utc::now(),
        };

        let user = model_to_user(model);
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("secret"));
        assert_eq!(user.username, "cook");
    }
}
