//! Short link service tests
//!
//! Issuing, reuse, collisions, exhaustion and resolution of recipe short links.

mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use foodgram::errors::FoodgramError;
use foodgram::services::{MAX_GENERATION_ATTEMPTS, ShortLinkService};
use foodgram::storage::{InsertOutcome, MeasurementUnit};

use common::{create_ingredient, create_recipe, create_tag, create_user, recipe, test_db};

type Generator = Arc<dyn Fn() -> String + Send + Sync>;

/// 依次返回给定短码，用完后重复最后一个
fn sequence_generator(codes: Vec<&'static str>) -> (Generator, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let generator: Generator = Arc::new(move || {
        let i = counter.fetch_add(1, Ordering::SeqCst);
        codes[i.min(codes.len() - 1)].to_string()
    });
    (generator, calls)
}

#[tokio::test]
async fn test_get_or_create_is_idempotent_and_counts_requests() {
    let db = test_db().await;
    let service = ShortLinkService::new(db.storage.clone());
    let url = "http://localhost:8000/recipes/1";

    let first = service.get_or_create(url).await.unwrap();
    assert_eq!(first.requests_count, 0);
    assert_eq!(first.short_url.len(), 6);

    let second = service.get_or_create(url).await.unwrap();
    assert_eq!(second.short_url, first.short_url);
    assert_eq!(second.requests_count, 1);

    let stored = db
        .storage
        .find_token_by_short_url(&first.short_url)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.requests_count, 1);
}

#[tokio::test]
async fn test_distinct_urls_get_distinct_tokens() {
    let db = test_db().await;
    let service = ShortLinkService::new(db.storage.clone());

    let a = service.get_or_create("http://localhost:8000/recipes/1").await.unwrap();
    let b = service.get_or_create("http://localhost:8000/recipes/2").await.unwrap();
    assert_ne!(a.short_url, b.short_url);
}

#[tokio::test]
async fn test_collision_is_retried_with_next_code() {
    let db = test_db().await;
    let outcome = db
        .storage
        .insert_token("http://localhost:8000/recipes/99", "AAAAAA")
        .await
        .unwrap();
    assert!(matches!(outcome, InsertOutcome::Inserted(_)));

    let (generator, calls) = sequence_generator(vec!["AAAAAA", "BBBBBB"]);
    let service = ShortLinkService::with_generator(db.storage.clone(), generator);

    let token = service
        .get_or_create("http://localhost:8000/recipes/1")
        .await
        .unwrap();
    assert_eq!(token.short_url, "BBBBBB");
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_generation_gives_up_after_max_attempts() {
    let db = test_db().await;
    db.storage
        .insert_token("http://localhost:8000/recipes/99", "AAAAAA")
        .await
        .unwrap();

    let (generator, calls) = sequence_generator(vec!["AAAAAA"]);
    let service = ShortLinkService::with_generator(db.storage.clone(), generator);

    let err = service
        .get_or_create("http://localhost:8000/recipes/1")
        .await
        .unwrap_err();
    assert!(matches!(err, FoodgramError::ShortLinkExhausted(_)));
    assert_eq!(calls.load(Ordering::SeqCst), MAX_GENERATION_ATTEMPTS);
}

#[tokio::test]
async fn test_duplicate_full_url_insert_reports_conflict() {
    let db = test_db().await;
    let url = "http://localhost:8000/recipes/5";
    db.storage.insert_token(url, "CCCCCC").await.unwrap();

    let outcome = db.storage.insert_token(url, "DDDDDD").await.unwrap();
    assert!(matches!(outcome, InsertOutcome::Conflict));
}

#[tokio::test]
async fn test_resolve_increments_and_respects_active_flag() {
    let db = test_db().await;
    let service = ShortLinkService::new(db.storage.clone());
    let url = "http://localhost:8000/recipes/7";
    let token = service.get_or_create(url).await.unwrap();

    assert_eq!(
        service.resolve(&token.short_url).await.unwrap().as_deref(),
        Some(url)
    );

    service.set_active(&token.short_url, false).await.unwrap();
    assert_eq!(service.resolve(&token.short_url).await.unwrap(), None);

    service.set_active(&token.short_url, true).await.unwrap();
    assert!(service.resolve(&token.short_url).await.unwrap().is_some());

    let stored = db
        .storage
        .find_token_by_short_url(&token.short_url)
        .await
        .unwrap()
        .unwrap();
    // 两次成功跳转；停用期间不计数
    assert_eq!(stored.requests_count, 2);
}

#[tokio::test]
async fn test_resolve_unknown_or_malformed_code() {
    let db = test_db().await;
    let service = ShortLinkService::new(db.storage.clone());

    assert_eq!(service.resolve("ZZZZZZ").await.unwrap(), None);
    assert_eq!(service.resolve("abc").await.unwrap(), None);
    assert_eq!(service.resolve("ab-d/f").await.unwrap(), None);
}

#[tokio::test]
async fn test_set_active_unknown_code_is_not_found() {
    let db = test_db().await;
    let service = ShortLinkService::new(db.storage.clone());

    let err = service.set_active("QQQQQQ", false).await.unwrap_err();
    assert!(matches!(err, FoodgramError::NotFound(_)));
}

#[tokio::test]
async fn test_recipe_short_link_uses_configured_base() {
    let db = test_db().await;
    let service = ShortLinkService::new(db.storage.clone());

    let err = service.recipe_short_link(404).await.unwrap_err();
    assert!(matches!(err, FoodgramError::NotFound(_)));

    let (author, _) = create_user(&db.storage, "chef").await;
    let tag = create_tag(&db.storage, "dinner").await;
    let salt = create_ingredient(&db.storage, "salt", MeasurementUnit::G).await;
    let soup = create_recipe(&db.storage, author.id, recipe("soup", vec![tag.id], vec![(salt, 5)])).await;

    let first = service.recipe_short_link(soup.id).await.unwrap();
    let second = service.recipe_short_link(soup.id).await.unwrap();
    assert!(first.starts_with("http://localhost:8000/s/"));
    assert_eq!(first, second);

    let code = first.rsplit('/').next().unwrap();
    let stored = db.storage.find_token_by_short_url(code).await.unwrap().unwrap();
    assert_eq!(stored.full_url, format!("http://localhost:8000/recipes/{}", soup.id));
    assert_eq!(stored.requests_count, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_insert_conflict_reuses_concurrently_issued_token() {
    let db = test_db().await;
    let url = "http://localhost:8000/recipes/21";

    // 生成短码期间另一请求抢先为同一 full_url 建好令牌
    let storage = db.storage.clone();
    let raced = Arc::new(AtomicUsize::new(0));
    let raced_in_generator = raced.clone();
    let generator: Generator = Arc::new(move || {
        if raced_in_generator.fetch_add(1, Ordering::SeqCst) == 0 {
            let storage = storage.clone();
            let outcome = tokio::task::block_in_place(|| {
                tokio::runtime::Handle::current()
                    .block_on(async move { storage.insert_token(url, "Race01").await })
            })
            .unwrap();
            assert!(matches!(outcome, InsertOutcome::Inserted(_)));
        }
        "Mine01".to_string()
    });
    let service = ShortLinkService::with_generator(db.storage.clone(), generator);

    let token = service.get_or_create(url).await.unwrap();
    assert_eq!(token.short_url, "Race01");
    assert_eq!(token.requests_count, 1);
    assert_eq!(raced.load(Ordering::SeqCst), 1);
    assert!(
        db.storage
            .find_token_by_short_url("Mine01")
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_get_or_create_issues_one_token() {
    const REQUESTS: usize = 16;
    let db = test_db().await;
    let service = Arc::new(ShortLinkService::new(db.storage.clone()));
    let url = "http://localhost:8000/recipes/42";

    let handles: Vec<_> = (0..REQUESTS)
        .map(|_| {
            let service = service.clone();
            tokio::spawn(async move { service.get_or_create(url).await })
        })
        .collect();

    let mut codes = std::collections::HashSet::new();
    for handle in handles {
        let token = handle.await.unwrap().unwrap();
        codes.insert(token.short_url);
    }
    assert_eq!(codes.len(), 1);

    let code = codes.into_iter().next().unwrap();
    let stored = db
        .storage
        .find_token_by_short_url(&code)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.requests_count, (REQUESTS - 1) as i64);
}
