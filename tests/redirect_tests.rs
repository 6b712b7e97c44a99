//! Redirect and health endpoint tests
//!
//! The redirect path is the hot path: short code → 302 to the recipe page.

mod common;

use actix_web::App;
use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use serde_json::Value;

use foodgram::services::ShortLinkService;

use common::{app_config, test_db};

#[actix_rt::test]
async fn test_redirect_to_full_url() {
    let db = test_db().await;
    let links = ShortLinkService::new(db.storage.clone());
    let token = links
        .get_or_create("http://localhost:8000/recipes/3")
        .await
        .unwrap();

    let app = test::init_service(App::new().configure(app_config(db.storage.clone()))).await;

    for path in [format!("/s/{}", token.short_url), format!("/s/{}/", token.short_url)] {
        let req = TestRequest::get().uri(&path).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FOUND, "path {}", path);
        assert_eq!(
            resp.headers().get("Location").unwrap(),
            "http://localhost:8000/recipes/3"
        );
    }

    let stored = db
        .storage
        .find_token_by_short_url(&token.short_url)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.requests_count, 2);
}

#[actix_rt::test]
async fn test_redirect_under_api_prefix() {
    let db = test_db().await;
    let links = ShortLinkService::new(db.storage.clone());
    let token = links
        .get_or_create("http://localhost:8000/recipes/5")
        .await
        .unwrap();

    let app = test::init_service(App::new().configure(app_config(db.storage.clone()))).await;

    let req = TestRequest::get()
        .uri(&format!("/api/s/{}/", token.short_url))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(
        resp.headers().get("Location").unwrap(),
        "http://localhost:8000/recipes/5"
    );

    let req = TestRequest::get().uri("/api/s/ZZZZZZ/").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

    let stored = db
        .storage
        .find_token_by_short_url(&token.short_url)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.requests_count, 1);
}

#[actix_rt::test]
async fn test_unknown_and_malformed_codes_are_404() {
    let db = test_db().await;
    let app = test::init_service(App::new().configure(app_config(db.storage.clone()))).await;

    for path in ["/s/ZZZZZZ", "/s/abc", "/s/abcdefg", "/s/ab_cd!"] {
        let req = TestRequest::get().uri(path).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "path {}", path);
    }
}

#[actix_rt::test]
async fn test_deactivated_link_is_404() {
    let db = test_db().await;
    let links = ShortLinkService::new(db.storage.clone());
    let token = links
        .get_or_create("http://localhost:8000/recipes/8")
        .await
        .unwrap();
    links.set_active(&token.short_url, false).await.unwrap();

    let app = test::init_service(App::new().configure(app_config(db.storage.clone()))).await;
    let req = TestRequest::get()
        .uri(&format!("/s/{}", token.short_url))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_health_reports_storage() {
    let db = test_db().await;
    let app = test::init_service(App::new().configure(app_config(db.storage.clone()))).await;

    let req = TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["checks"]["storage"]["status"], "healthy");
    assert_eq!(body["checks"]["storage"]["backend"], "sqlite");
}
