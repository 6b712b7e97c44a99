pub mod catalog;
pub mod error_code;
pub mod health;
pub mod helpers;
pub mod recipes;
pub mod redirect;
pub mod routes;
pub mod users;

use actix_web::web;

pub use error_code::{ErrorBody, ErrorCode};
pub use health::{AppStartTime, HealthService, health_routes};
pub use redirect::{RedirectService, redirect_routes};
pub use routes::api_routes;

use crate::services::AppServices;

/// 注册共享状态与全部路由
///
/// 服务器和集成测试共用同一份装配逻辑。
pub fn configure_app(
    services: AppServices,
    app_start_time: AppStartTime,
) -> impl Fn(&mut web::ServiceConfig) + Clone {
    move |cfg: &mut web::ServiceConfig| {
        cfg.app_data(web::Data::new(services.storage.clone()))
            .app_data(web::Data::new(services.short_links.clone()))
            .app_data(web::Data::new(services.recipes.clone()))
            .app_data(web::Data::new(services.users.clone()))
            .app_data(web::Data::new(services.shopping.clone()))
            .app_data(web::Data::new(app_start_time.clone()))
            .app_data(web::JsonConfig::default().error_handler(|err, _| helpers::extractor_error(err)))
            .app_data(web::QueryConfig::default().error_handler(|err, _| helpers::extractor_error(err)))
            .app_data(web::PathConfig::default().error_handler(|err, _| helpers::extractor_error(err)))
            .service(health_routes())
            .service(redirect_routes())
            .service(api_routes(services.storage.clone()));
    }
}
