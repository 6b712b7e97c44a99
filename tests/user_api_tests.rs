//! User and subscription API tests

mod common;

use actix_web::App;
use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use serde_json::Value;

use foodgram::storage::MeasurementUnit;

use common::{
    app_config, auth_header, create_ingredient, create_recipe, create_tag, create_user, recipe,
    test_db,
};

#[actix_rt::test]
async fn test_me_requires_token() {
    let db = test_db().await;
    let (cook, token) = create_user(&db.storage, "cook").await;
    let app = test::init_service(App::new().configure(app_config(db.storage.clone()))).await;

    let req = TestRequest::get().uri("/api/users/me/").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);

    let req = TestRequest::get()
        .uri("/api/users/me/")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .to_request();
    let me: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(me["id"], cook.id);
    assert_eq!(me["username"], "cook");
    assert_eq!(me["email"], "cook@example.com");
    assert_eq!(me["is_subscribed"], false);
    assert!(me.get("auth_token").is_none());

    let req = TestRequest::get()
        .uri("/api/users/me/")
        .insert_header(("Authorization", "Basic abc"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn test_list_and_get_users() {
    let db = test_db().await;
    let (alice, _) = create_user(&db.storage, "alice").await;
    create_user(&db.storage, "bob").await;
    let app = test::init_service(App::new().configure(app_config(db.storage.clone()))).await;

    let req = TestRequest::get().uri("/api/users/").to_request();
    let users: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(users.as_array().unwrap().len(), 2);

    let req = TestRequest::get()
        .uri(&format!("/api/users/{}/", alice.id))
        .to_request();
    let one: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(one["username"], "alice");

    let req = TestRequest::get().uri("/api/users/9999/").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let err: Value = test::read_body_json(resp).await;
    assert_eq!(err["code"], 1004);
}

#[actix_rt::test]
async fn test_subscription_lifecycle() {
    let db = test_db().await;
    let (reader, reader_token) = create_user(&db.storage, "reader").await;
    let (chef, _) = create_user(&db.storage, "chef").await;
    let tag = create_tag(&db.storage, "dinner").await;
    let beef = create_ingredient(&db.storage, "beef", MeasurementUnit::G).await;
    for name in ["stew", "roast", "burger"] {
        create_recipe(&db.storage, chef.id, recipe(name, vec![tag.id], vec![(beef, 300)])).await;
    }
    let app = test::init_service(App::new().configure(app_config(db.storage.clone()))).await;
    let subscribe_uri = format!("/api/users/{}/subscribe/", chef.id);

    let req = TestRequest::post()
        .uri(&format!("{}?recipes_limit=2", subscribe_uri))
        .insert_header(auth_header(&reader_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let sub: Value = test::read_body_json(resp).await;
    assert_eq!(sub["id"], chef.id);
    assert_eq!(sub["is_subscribed"], true);
    assert_eq!(sub["recipes_count"], 3);
    assert_eq!(sub["recipes"].as_array().unwrap().len(), 2);
    assert_eq!(sub["recipes"][0]["name"], "burger");

    // 重复订阅
    let req = TestRequest::post()
        .uri(&subscribe_uri)
        .insert_header(auth_header(&reader_token))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

    // 不能订阅自己
    let req = TestRequest::post()
        .uri(&format!("/api/users/{}/subscribe/", reader.id))
        .insert_header(auth_header(&reader_token))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

    let req = TestRequest::get()
        .uri("/api/users/subscriptions/")
        .insert_header(auth_header(&reader_token))
        .to_request();
    let subs: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(subs.as_array().unwrap().len(), 1);
    assert_eq!(subs[0]["recipes"].as_array().unwrap().len(), 3);

    // 订阅状态反映在作者视图中
    let req = TestRequest::get()
        .uri(&format!("/api/users/{}/", chef.id))
        .insert_header(auth_header(&reader_token))
        .to_request();
    let author: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(author["is_subscribed"], true);

    let req = TestRequest::delete()
        .uri(&subscribe_uri)
        .insert_header(auth_header(&reader_token))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NO_CONTENT);

    let req = TestRequest::delete()
        .uri(&subscribe_uri)
        .insert_header(auth_header(&reader_token))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

    let req = TestRequest::post()
        .uri("/api/users/4242/subscribe/")
        .insert_header(auth_header(&reader_token))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_bad_recipes_limit_is_rejected() {
    let db = test_db().await;
    let (_, token) = create_user(&db.storage, "reader").await;
    let app = test::init_service(App::new().configure(app_config(db.storage.clone()))).await;

    let req = TestRequest::get()
        .uri("/api/users/subscriptions/?recipes_limit=lots")
        .insert_header(auth_header(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let err: Value = test::read_body_json(resp).await;
    assert_eq!(err["code"], 1002);
}
