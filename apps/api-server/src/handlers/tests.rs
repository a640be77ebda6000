use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use async_trait::async_trait;
use serde_json::{Value, json};

use blog_core::domain::{
    NewPost, NewUser, POST_CACHE_TOMBSTONE, Page, Post, PostUpdate, PostView,
};
use blog_core::error::RepoError;
use blog_core::ports::{
    BaseRepository, Cache, CacheError, PostRepository, TokenService, UserRepository,
};
use blog_infra::{
    Argon2PasswordService, InMemoryCache, InMemoryCommentRepository, InMemoryDatabase,
    InMemoryPostRepository, InMemoryUserRepository, JwtConfig, JwtTokenService,
};

use super::configure_routes;
use crate::state::AppState;

const SECRET: &str = "test-secret-key-that-is-long-enough!!";

/// Post repository that counts primary-key reads.
struct CountingPosts {
    inner: InMemoryPostRepository,
    reads: AtomicUsize,
}

#[async_trait]
impl BaseRepository<Post, i64> for CountingPosts {
    async fn init_schema(&self) -> Result<(), RepoError> {
        self.inner.init_schema().await
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, RepoError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.find_by_id(id).await
    }
}

#[async_trait]
impl PostRepository for CountingPosts {
    async fn create(&self, post: NewPost) -> Result<Post, RepoError> {
        self.inner.create(post).await
    }

    async fn update(&self, update: PostUpdate) -> Result<Post, RepoError> {
        self.inner.update(update).await
    }

    async fn delete(&self, id: i64, author_id: i64) -> Result<(), RepoError> {
        self.inner.delete(id, author_id).await
    }

    async fn list(&self, page: Page) -> Result<Vec<Post>, RepoError> {
        self.inner.list(page).await
    }

    async fn list_by_author(&self, author_id: i64) -> Result<Vec<Post>, RepoError> {
        self.inner.list_by_author(author_id).await
    }
}

/// Cache whose set-if-absent writes (the read-path fill) land late.
struct SlowFillCache {
    inner: Arc<InMemoryCache>,
    delay: Duration,
}

#[async_trait]
impl Cache for SlowFillCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), CacheError> {
        self.inner.set(key, value, ttl).await
    }

    async fn set_if_absent(
        &self,
        key: &str,
        value: &str,
        ttl: Option<Duration>,
    ) -> Result<bool, CacheError> {
        tokio::time::sleep(self.delay).await;
        self.inner.set_if_absent(key, value, ttl).await
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.inner.delete(key).await
    }
}

struct Harness {
    state: AppState,
    posts: Arc<CountingPosts>,
    cache: Arc<InMemoryCache>,
}

impl Harness {
    fn new() -> Self {
        let db = InMemoryDatabase::new();
        let posts = Arc::new(CountingPosts {
            inner: InMemoryPostRepository::new(db.clone()),
            reads: AtomicUsize::new(0),
        });
        let cache = Arc::new(InMemoryCache::new());
        let state = AppState {
            users: Arc::new(InMemoryUserRepository::new(db.clone())),
            posts: posts.clone(),
            comments: Arc::new(InMemoryCommentRepository::new(db)),
            cache: Some(cache.clone()),
            tokens: Arc::new(JwtTokenService::new(JwtConfig {
                secret: SECRET.to_string(),
                ..JwtConfig::default()
            })),
            passwords: Arc::new(Argon2PasswordService::new()),
        };
        Self {
            state,
            posts,
            cache,
        }
    }

    /// Register a user directly and return `(user_id, "Bearer <token>")`.
    async fn user(&self, name: &str) -> (i64, String) {
        let user = self
            .state
            .users
            .create(NewUser::new(
                name.to_string(),
                format!("{name}@example.com"),
                "unused-hash".to_string(),
            ))
            .await
            .unwrap();
        let token = self.state.tokens.generate_token(user.id).unwrap();
        (user.id, format!("Bearer {token}"))
    }

    /// Route the read-path fill through a cache that lands it after `delay`.
    fn with_slow_fill(mut self, delay: Duration) -> Self {
        self.state.cache = Some(Arc::new(SlowFillCache {
            inner: self.cache.clone(),
            delay,
        }));
        self
    }

    fn reads(&self) -> usize {
        self.posts.reads.load(Ordering::SeqCst)
    }

    /// The cache is filled by a detached task; wait for it to land.
    async fn wait_for_cached(&self, post_id: i64) -> String {
        let key = PostView::cache_key(post_id);
        for _ in 0..100 {
            if let Some(raw) = self.cache.get(&key).await.unwrap() {
                return raw;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("post {post_id} was never cached");
    }
}

macro_rules! app {
    ($harness:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($harness.state.clone()))
                .configure(configure_routes),
        )
        .await
    };
}

macro_rules! send {
    ($app:expr, $req:expr) => {{
        let resp = test::call_service(&$app, $req.to_request()).await;
        let status = resp.status();
        let body = test::read_body(resp).await;
        let json: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
        (status, json)
    }};
}

fn post_body(title: &str) -> Value {
    json!({ "title": title, "content": "Long enough post content" })
}

fn create_post(auth: &str, title: &str) -> test::TestRequest {
    test::TestRequest::post()
        .uri("/post")
        .insert_header(("Authorization", auth))
        .set_json(post_body(title))
}

#[actix_web::test]
async fn test_sign_up_and_sign_in() {
    let h = Harness::new();
    let app = app!(h);

    let signup = json!({
        "username": "alice01",
        "email": "alice@example.com",
        "password": "Secret123"
    });
    let (status, body) = send!(
        app,
        test::TestRequest::post().uri("/user/signup").set_json(&signup)
    );
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], 201);
    let user_id = body["user"]["user_id"].as_i64().unwrap();

    // same email, fresh username
    let (status, body) = send!(
        app,
        test::TestRequest::post().uri("/user/signup").set_json(json!({
            "username": "alice02",
            "email": "alice@example.com",
            "password": "Secret123"
        }))
    );
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Email already exists");

    // same username, fresh email
    let (status, _) = send!(
        app,
        test::TestRequest::post().uri("/user/signup").set_json(json!({
            "username": "alice01",
            "email": "other@example.com",
            "password": "Secret123"
        }))
    );
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = send!(
        app,
        test::TestRequest::post()
            .uri("/user/signin")
            .set_json(json!({ "email": "alice@example.com", "password": "Secret123" }))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["expires_in"], 12 * 3600);
    let token = body["auth_token"].as_str().unwrap();
    assert_eq!(h.state.tokens.validate_token(token).unwrap().user_id, user_id);

    let (status, _) = send!(
        app,
        test::TestRequest::post()
            .uri("/user/signin")
            .set_json(json!({ "email": "alice@example.com", "password": "Wrong1234" }))
    );
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send!(
        app,
        test::TestRequest::post()
            .uri("/user/signin")
            .set_json(json!({ "email": "nobody@example.com", "password": "Secret123" }))
    );
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_sign_up_validation() {
    let h = Harness::new();
    let app = app!(h);

    for payload in [
        json!({ "username": "abc", "email": "a@example.com", "password": "Secret123" }),
        json!({ "username": "alice01", "email": "not-an-email", "password": "Secret123" }),
        json!({ "username": "alice01", "email": "a@example.com", "password": "secret123" }),
        json!({ "username": "alice_01", "email": "a@example.com", "password": "Secret123" }),
    ] {
        let (status, body) = send!(
            app,
            test::TestRequest::post().uri("/user/signup").set_json(&payload)
        );
        assert_eq!(status, StatusCode::BAD_REQUEST, "accepted {payload}");
        assert_eq!(body["status"], 400);
    }
}

#[actix_web::test]
async fn test_mutations_require_authentication() {
    let h = Harness::new();
    let app = app!(h);

    let (status, body) = send!(
        app,
        test::TestRequest::post().uri("/post").set_json(post_body("Hello"))
    );
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["status"], 401);

    for header in ["Bearer", "Bearer a b", "Bearer not-a-jwt"] {
        let (status, _) = send!(app, create_post(header, "Hello"));
        assert_eq!(status, StatusCode::UNAUTHORIZED, "accepted {header:?}");
    }
}

#[actix_web::test]
async fn test_create_and_read_post() {
    let h = Harness::new();
    let (alice, auth) = h.user("alice").await;
    let app = app!(h);

    let (status, body) = send!(app, create_post(&auth, "Hello"));
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], 201);
    let post_id = body["post_id"].as_i64().unwrap();

    let (status, body) = send!(
        app,
        test::TestRequest::get().uri(&format!("/post/{post_id}"))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["post_id"], post_id);
    assert_eq!(body["title"], "Hello");
    assert_eq!(body["content"], "Long enough post content");
    assert_eq!(body["author_id"], alice);
    assert_eq!(body["username"], "alice");
}

#[actix_web::test]
async fn test_create_post_validation() {
    let h = Harness::new();
    let (_, auth) = h.user("alice").await;
    let app = app!(h);

    let (status, _) = send!(app, create_post(&auth, "Hi"));
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send!(
        app,
        test::TestRequest::post()
            .uri("/post")
            .insert_header(("Authorization", auth.as_str()))
            .insert_header(("Content-Type", "application/json"))
            .set_payload("{not json")
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);
}

#[actix_web::test]
async fn test_create_post_for_deleted_author() {
    let h = Harness::new();
    let (alice, auth) = h.user("alice").await;
    h.state.users.delete(alice).await.unwrap();
    let app = app!(h);

    let (status, body) = send!(app, create_post(&auth, "Hello"));
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "author does not exist");
}

#[actix_web::test]
async fn test_second_read_is_served_from_cache() {
    let h = Harness::new();
    let (_, auth) = h.user("alice").await;
    let app = app!(h);

    let (_, body) = send!(app, create_post(&auth, "Cached"));
    let post_id = body["post_id"].as_i64().unwrap();
    let uri = format!("/post/{post_id}");

    let (status, first) = send!(app, test::TestRequest::get().uri(&uri));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(h.reads(), 1);

    let raw = h.wait_for_cached(post_id).await;
    let cached: PostView = serde_json::from_str(&raw).unwrap();
    assert_eq!(cached.title, "Cached");

    let (status, second) = send!(app, test::TestRequest::get().uri(&uri));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first, second);
    assert_eq!(h.reads(), 1, "cache hit must not touch storage");
}

#[actix_web::test]
async fn test_undecodable_cache_entry_falls_through() {
    let h = Harness::new();
    let (_, auth) = h.user("alice").await;
    let app = app!(h);

    let (_, body) = send!(app, create_post(&auth, "Hello"));
    let post_id = body["post_id"].as_i64().unwrap();
    h.cache
        .set(&PostView::cache_key(post_id), "{garbage", None)
        .await
        .unwrap();

    let (status, body) = send!(
        app,
        test::TestRequest::get().uri(&format!("/post/{post_id}"))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Hello");
    assert_eq!(h.reads(), 1);

    // the bad entry is replaced by a real projection
    let raw = h.wait_for_cached(post_id).await;
    let cached: PostView = serde_json::from_str(&raw).unwrap();
    assert_eq!(cached.title, "Hello");
}

#[actix_web::test]
async fn test_late_fill_does_not_restore_updated_post() {
    let h = Harness::new().with_slow_fill(Duration::from_millis(200));
    let (_, auth) = h.user("alice").await;
    let app = app!(h);

    let (_, body) = send!(app, create_post(&auth, "Original"));
    let post_id = body["post_id"].as_i64().unwrap();
    let uri = format!("/post/{post_id}");

    // cold read: the fill carrying "Original" is still in flight
    let (_, body) = send!(app, test::TestRequest::get().uri(&uri));
    assert_eq!(body["title"], "Original");

    let (status, _) = send!(
        app,
        test::TestRequest::patch()
            .uri(&uri)
            .insert_header(("Authorization", auth.as_str()))
            .set_json(post_body("Edited"))
    );
    assert_eq!(status, StatusCode::OK);

    tokio::time::sleep(Duration::from_millis(400)).await;

    let (status, body) = send!(app, test::TestRequest::get().uri(&uri));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Edited");

    let raw = h.cache.get(&PostView::cache_key(post_id)).await.unwrap();
    assert_eq!(raw.as_deref(), Some(POST_CACHE_TOMBSTONE));
}

#[actix_web::test]
async fn test_late_fill_does_not_resurrect_deleted_post() {
    let h = Harness::new().with_slow_fill(Duration::from_millis(200));
    let (_, auth) = h.user("alice").await;
    let app = app!(h);

    let (_, body) = send!(app, create_post(&auth, "Doomed"));
    let post_id = body["post_id"].as_i64().unwrap();
    let uri = format!("/post/{post_id}");

    send!(app, test::TestRequest::get().uri(&uri));

    let (status, _) = send!(
        app,
        test::TestRequest::delete()
            .uri(&uri)
            .insert_header(("Authorization", auth.as_str()))
    );
    assert_eq!(status, StatusCode::OK);

    tokio::time::sleep(Duration::from_millis(400)).await;

    let (status, body) = send!(app, test::TestRequest::get().uri(&uri));
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Post not found");
}

#[actix_web::test]
async fn test_read_missing_or_malformed_post() {
    let h = Harness::new();
    let app = app!(h);

    let (status, body) = send!(app, test::TestRequest::get().uri("/post/404"));
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "status": 404, "error": "Post not found" }));

    let (status, body) = send!(app, test::TestRequest::get().uri("/post/abc"));
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);
}

#[actix_web::test]
async fn test_only_the_author_updates_a_post() {
    let h = Harness::new();
    let (alice, alice_auth) = h.user("alice").await;
    let (_, bob_auth) = h.user("bobby").await;
    let app = app!(h);

    let (_, body) = send!(app, create_post(&alice_auth, "Original"));
    let post_id = body["post_id"].as_i64().unwrap();
    let uri = format!("/post/{post_id}");

    // warm the cache so a stale entry would be visible
    send!(app, test::TestRequest::get().uri(&uri));
    h.wait_for_cached(post_id).await;

    let (status, body) = send!(
        app,
        test::TestRequest::patch()
            .uri(&uri)
            .insert_header(("Authorization", bob_auth.as_str()))
            .set_json(post_body("Hijacked"))
    );
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["status"], 403);

    let (status, body) = send!(
        app,
        test::TestRequest::patch()
            .uri(&uri)
            .insert_header(("Authorization", alice_auth.as_str()))
            .set_json(post_body("Edited"))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["post_id"], post_id);
    assert_eq!(body["title"], "Edited");
    assert_eq!(body["author_id"], alice);
    assert!(body["updated_at"].is_string());

    let (_, body) = send!(app, test::TestRequest::get().uri(&uri));
    assert_eq!(body["title"], "Edited");
}

#[actix_web::test]
async fn test_update_missing_post_is_not_found() {
    let h = Harness::new();
    let (_, auth) = h.user("alice").await;
    let app = app!(h);

    let (status, _) = send!(
        app,
        test::TestRequest::patch()
            .uri("/post/77")
            .insert_header(("Authorization", auth.as_str()))
            .set_json(post_body("Edited"))
    );
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_only_the_author_deletes_a_post() {
    let h = Harness::new();
    let (_, alice_auth) = h.user("alice").await;
    let (_, bob_auth) = h.user("bobby").await;
    let app = app!(h);

    let (_, body) = send!(app, create_post(&alice_auth, "Doomed"));
    let post_id = body["post_id"].as_i64().unwrap();
    let uri = format!("/post/{post_id}");

    send!(app, test::TestRequest::get().uri(&uri));
    h.wait_for_cached(post_id).await;

    let (status, _) = send!(
        app,
        test::TestRequest::delete()
            .uri(&uri)
            .insert_header(("Authorization", bob_auth.as_str()))
    );
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send!(
        app,
        test::TestRequest::delete()
            .uri(&uri)
            .insert_header(("Authorization", alice_auth.as_str()))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": 200, "post_id": post_id }));

    let (status, _) = send!(app, test::TestRequest::get().uri(&uri));
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_list_posts_pagination() {
    let h = Harness::new();
    let (_, auth) = h.user("alice").await;
    let app = app!(h);

    let mut ids = Vec::new();
    for i in 0..5 {
        let (_, body) = send!(app, create_post(&auth, &format!("Post {i}")));
        ids.push(body["post_id"].as_i64().unwrap());
    }

    let page_ids = |body: &Value| -> Vec<i64> {
        body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|row| row["post_id"].as_i64().unwrap())
            .collect()
    };

    let (status, first) = send!(app, test::TestRequest::get().uri("/posts?limit=2&offset=0"));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["status"], 200);
    assert_eq!(first["data"][0]["username"], "alice");
    let (_, second) = send!(app, test::TestRequest::get().uri("/posts?limit=2&offset=2"));

    assert_eq!(page_ids(&first), vec![ids[4], ids[3]]);
    assert_eq!(page_ids(&second), vec![ids[2], ids[1]]);

    let (_, all) = send!(app, test::TestRequest::get().uri("/posts"));
    assert_eq!(page_ids(&all).len(), 5);

    for bad in ["/posts?limit=0", "/posts?offset=-1", "/posts?limit=ten"] {
        let (status, _) = send!(app, test::TestRequest::get().uri(bad));
        assert_eq!(status, StatusCode::BAD_REQUEST, "accepted {bad}");
    }
}

#[actix_web::test]
async fn test_comment_lifecycle() {
    let h = Harness::new();
    let (alice, alice_auth) = h.user("alice").await;
    let (_, bob_auth) = h.user("bobby").await;
    let app = app!(h);

    let (_, body) = send!(app, create_post(&alice_auth, "Discussed"));
    let post_id = body["post_id"].as_i64().unwrap();

    let (status, body) = send!(
        app,
        test::TestRequest::post()
            .uri("/comment")
            .insert_header(("Authorization", alice_auth.as_str()))
            .set_json(json!({ "content": "First comment here", "post_id": post_id }))
    );
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["post_id"], post_id);
    assert_eq!(body["author_id"], alice);
    let comment_id = body["comment_id"].as_i64().unwrap();
    let uri = format!("/comment/{comment_id}");

    let edit = |post_id: i64| json!({ "content": "Edited comment text", "post_id": post_id });

    let (status, _) = send!(
        app,
        test::TestRequest::patch()
            .uri(&uri)
            .insert_header(("Authorization", bob_auth.as_str()))
            .set_json(edit(post_id))
    );
    assert_eq!(status, StatusCode::FORBIDDEN);

    // right author, wrong post
    let (status, _) = send!(
        app,
        test::TestRequest::patch()
            .uri(&uri)
            .insert_header(("Authorization", alice_auth.as_str()))
            .set_json(edit(post_id + 1))
    );
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send!(
        app,
        test::TestRequest::patch()
            .uri(&uri)
            .insert_header(("Authorization", alice_auth.as_str()))
            .set_json(edit(post_id))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["comment_id"], comment_id);
    assert_eq!(body["content"], "Edited comment text");

    let (status, _) = send!(
        app,
        test::TestRequest::delete()
            .uri(&uri)
            .insert_header(("Authorization", bob_auth.as_str()))
    );
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send!(
        app,
        test::TestRequest::delete()
            .uri(&uri)
            .insert_header(("Authorization", alice_auth.as_str()))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": 200, "comment_id": comment_id }));

    let (status, _) = send!(
        app,
        test::TestRequest::delete()
            .uri(&uri)
            .insert_header(("Authorization", alice_auth.as_str()))
    );
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_comment_on_missing_post() {
    let h = Harness::new();
    let (_, auth) = h.user("alice").await;
    let app = app!(h);

    let (status, body) = send!(
        app,
        test::TestRequest::post()
            .uri("/comment")
            .insert_header(("Authorization", auth.as_str()))
            .set_json(json!({ "content": "Orphaned comment", "post_id": 999 }))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "author or post does not exist");

    let (status, _) = send!(
        app,
        test::TestRequest::post()
            .uri("/comment")
            .insert_header(("Authorization", auth.as_str()))
            .set_json(json!({ "content": "too short", "post_id": 1 }))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_list_comments_skips_deleted_authors() {
    let h = Harness::new();
    let (_, alice_auth) = h.user("alice").await;
    let (bob, bob_auth) = h.user("bobby").await;
    let app = app!(h);

    let (_, body) = send!(app, create_post(&alice_auth, "Discussed"));
    let post_id = body["post_id"].as_i64().unwrap();
    let (_, body) = send!(app, create_post(&alice_auth, "Other"));
    let other_post = body["post_id"].as_i64().unwrap();

    for (auth, target) in [
        (&alice_auth, post_id),
        (&bob_auth, post_id),
        (&alice_auth, other_post),
    ] {
        let (status, _) = send!(
            app,
            test::TestRequest::post()
                .uri("/comment")
                .insert_header(("Authorization", auth.as_str()))
                .set_json(json!({ "content": "A thoughtful reply", "post_id": target }))
        );
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, body) = send!(
        app,
        test::TestRequest::get().uri(&format!("/comments?post_id={post_id}"))
    );
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    h.state.users.delete(bob).await.unwrap();

    let (status, body) = send!(
        app,
        test::TestRequest::get().uri(&format!("/comments?post_id={post_id}"))
    );
    assert_eq!(status, StatusCode::OK);
    let rows = body["data"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["username"], "alice");

    let (_, body) = send!(app, test::TestRequest::get().uri("/comments"));
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let (status, _) = send!(app, test::TestRequest::get().uri("/comments?post_id=0"));
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_unknown_route_is_json_404() {
    let h = Harness::new();
    let app = app!(h);

    let (status, body) = send!(app, test::TestRequest::get().uri("/nowhere"));
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], 404);
}
