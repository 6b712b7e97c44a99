pub mod favorite;
pub mod ingredient;
pub mod recipe;
pub mod recipe_ingredient;
pub mod recipe_tag;
pub mod shopping_cart;
pub mod subscription;
pub mod tag;
pub mod token;
pub mod user;

pub use favorite::Entity as FavoriteEntity;
pub use ingredient::Entity as IngredientEntity;
pub use recipe::Entity as RecipeEntity;
pub use recipe_ingredient::Entity as RecipeIngredientEntity;
pub use recipe_tag::Entity as RecipeTagEntity;
pub use shopping_cart::Entity as ShoppingCartEntity;
pub use subscription::Entity as SubscriptionEntity;
pub use tag::Entity as TagEntity;
pub use token::Entity as TokenEntity;
pub use user::Entity as UserEntity;
