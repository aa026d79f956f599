//! Store-level tests against a real PostgreSQL database.
//!
//! These verify the invariants that live in repository SQL and the
//! ownership checks above it: like-toggle parity, batched liker
//! fetches, non-owner rejection, and beyond-end pagination.
//!
//! They need DATABASE_URL pointing at a disposable database and skip
//! quietly when it is unset, so the rest of the suite runs anywhere.

use actix_web::{http::StatusCode, test, web, App};
use sqlx::PgPool;
use uuid::Uuid;

use blog_api::db::{like_repo, post_repo, run_migrations, user_repo};
use blog_api::models::User;
use blog_api::routes;
use blog_api::security::jwt;

const TEST_SECRET: &str = "store-test-secret";

async fn test_pool() -> Option<PgPool> {
    let url = match std::env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            eprintln!("DATABASE_URL not set; skipping database-backed test");
            return None;
        }
    };

    let pool = PgPool::connect(&url)
        .await
        .expect("Failed to connect to test database");
    run_migrations(&pool).await.expect("Failed to run migrations");
    Some(pool)
}

/// Unique user per call so tests never collide across runs
async fn create_user(pool: &PgPool, tag: &str) -> User {
    let suffix = Uuid::new_v4().simple().to_string();
    let email = format!("{}-{}@example.com", tag, &suffix[..12]);
    let username = format!("{}_{}", tag, &suffix[..12]);

    user_repo::create_user(pool, &email, &username, "argon2id-placeholder-hash")
        .await
        .expect("Failed to create test user")
}

fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token))
}

#[tokio::test]
async fn toggle_like_alternates_and_restores() {
    let Some(pool) = test_pool().await else { return };

    let author = create_user(&pool, "author").await;
    let liker = create_user(&pool, "liker").await;
    let post = post_repo::create_post(&pool, author.id, "Toggle target", "body")
        .await
        .unwrap();

    // First toggle: like appears
    let (liked, count) = like_repo::toggle_like(&pool, post.id, liker.id).await.unwrap();
    assert!(liked);
    assert_eq!(count, 1);
    assert_eq!(
        like_repo::get_liker_ids(&pool, post.id).await.unwrap(),
        vec![liker.id]
    );

    // Second toggle: back to the original empty set
    let (liked, count) = like_repo::toggle_like(&pool, post.id, liker.id).await.unwrap();
    assert!(!liked);
    assert_eq!(count, 0);
    assert!(like_repo::get_liker_ids(&pool, post.id)
        .await
        .unwrap()
        .is_empty());

    // Third toggle: strict alternation continues
    let (liked, count) = like_repo::toggle_like(&pool, post.id, liker.id).await.unwrap();
    assert!(liked);
    assert_eq!(count, 1);
}

#[tokio::test]
async fn batched_liker_fetch_groups_by_post() {
    let Some(pool) = test_pool().await else { return };

    let author = create_user(&pool, "batchau").await;
    let liker = create_user(&pool, "batchli").await;
    let liked_post = post_repo::create_post(&pool, author.id, "Liked", "body")
        .await
        .unwrap();
    let plain_post = post_repo::create_post(&pool, author.id, "Plain", "body")
        .await
        .unwrap();

    like_repo::toggle_like(&pool, liked_post.id, liker.id).await.unwrap();

    let likers =
        like_repo::get_liker_ids_for_posts(&pool, &[liked_post.id, plain_post.id])
            .await
            .unwrap();

    assert_eq!(likers.get(&liked_post.id), Some(&vec![liker.id]));
    assert!(!likers.contains_key(&plain_post.id));
}

#[actix_web::test]
async fn non_owner_update_and_delete_rejected() {
    let Some(pool) = test_pool().await else { return };
    jwt::initialize_keys(TEST_SECRET).unwrap();

    let owner = create_user(&pool, "owner").await;
    let intruder = create_user(&pool, "intruder").await;
    let post = post_repo::create_post(&pool, owner.id, "Mine", "original body")
        .await
        .unwrap();

    let token =
        jwt::generate_token(intruder.id, &intruder.email, &intruder.username, 3600).unwrap();

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .configure(routes::configure_routes),
    )
    .await;

    let req = test::TestRequest::put()
        .uri(&format!("/api/posts/{}", post.id))
        .insert_header(bearer(&token))
        .set_json(serde_json::json!({ "title": "Hijacked" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/posts/{}", post.id))
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    // Neither request mutated the post
    let stored = post_repo::find_post_by_id(&pool, post.id)
        .await
        .unwrap()
        .expect("post should still exist");
    assert_eq!(stored.title, "Mine");
    assert_eq!(stored.content, "original body");
}

#[actix_web::test]
async fn page_beyond_data_returns_empty() {
    let Some(pool) = test_pool().await else { return };

    let author = create_user(&pool, "pager").await;
    post_repo::create_post(&pool, author.id, "Only post", "body")
        .await
        .unwrap();

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .configure(routes::configure_routes),
    )
    .await;

    // Largest representable page: the offset saturates and the page is empty
    let req = test::TestRequest::get()
        .uri(&format!("/api/posts?page={}&limit=100", i64::MAX))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Vec<serde_json::Value> = test::read_body_json(resp).await;
    assert!(body.is_empty());
}
