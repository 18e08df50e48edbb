//! End-to-end behaviour of the blog list API over in-memory stores.
//!
//! Requests go through the real middleware, extractors, handlers and domain
//! services; only the User Store and Blog Store are replaced.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use actix_web::{App, web};
use rstest::{fixture, rstest};
use serde_json::{Value, json};

use bloglist::Trace;
use bloglist::domain::{AuthService, BlogService, TRACE_ID_HEADER, UpdatePolicy, UserService};
use bloglist::inbound::http::state::HttpState;
use bloglist::inbound::http::{api_scope, json_config};
use bloglist::outbound::security::JwtTokenCodec;
use bloglist::test_support::{InMemoryBlogRepository, InMemoryUserRepository, fast_password_hasher};

const SECRET: &[u8] = b"integration-secret";

struct Harness {
    users: Arc<InMemoryUserRepository>,
    blogs: Arc<InMemoryBlogRepository>,
    state: web::Data<HttpState>,
}

struct Reply {
    status: StatusCode,
    body: Value,
    trace_id: Option<String>,
}

impl Harness {
    fn new(policy: UpdatePolicy) -> Self {
        let users = Arc::new(InMemoryUserRepository::new());
        let blogs = Arc::new(InMemoryBlogRepository::new(users.clone()));
        let hasher = Arc::new(fast_password_hasher());
        let tokens = Arc::new(JwtTokenCodec::new(SECRET, None));

        let auth = Arc::new(AuthService::new(users.clone(), hasher.clone(), tokens));
        let user_service = Arc::new(UserService::new(users.clone(), blogs.clone(), hasher));
        let blog_service = Arc::new(BlogService::new(blogs.clone(), policy));
        let state = web::Data::new(HttpState::from_services(auth, user_service, blog_service));

        Self {
            users,
            blogs,
            state,
        }
    }

    async fn send(&self, request: actix_test::TestRequest) -> Reply {
        let app = actix_test::init_service(
            App::new()
                .app_data(self.state.clone())
                .app_data(json_config())
                .wrap(Trace)
                .service(api_scope()),
        )
        .await;
        let response = actix_test::call_service(&app, request.to_request()).await;
        let status = response.status();
        let trace_id = response
            .headers()
            .get(TRACE_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let bytes = actix_test::read_body(response).await;
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        Reply {
            status,
            body,
            trace_id,
        }
    }

    async fn register(&self, username: &str, password: &str) -> Reply {
        self.send(
            actix_test::TestRequest::post()
                .uri("/api/users")
                .set_json(json!({ "username": username, "name": "Tester", "password": password })),
        )
        .await
    }

    async fn login(&self, username: &str, password: &str) -> Reply {
        self.send(
            actix_test::TestRequest::post()
                .uri("/api/login")
                .set_json(json!({ "username": username, "password": password })),
        )
        .await
    }

    /// Register and log in, returning the bearer token.
    async fn token_for(&self, username: &str) -> String {
        let registered = self.register(username, "sekret").await;
        assert_eq!(registered.status, StatusCode::CREATED, "{:?}", registered.body);
        let session = self.login(username, "sekret").await;
        assert_eq!(session.status, StatusCode::OK, "{:?}", session.body);
        session.body["token"]
            .as_str()
            .expect("token in login response")
            .to_owned()
    }

    async fn create(&self, token: &str, body: Value) -> Reply {
        self.send(
            actix_test::TestRequest::post()
                .uri("/api/blogs")
                .insert_header(("Authorization", format!("Bearer {token}")))
                .set_json(body),
        )
        .await
    }

    async fn list(&self) -> Reply {
        self.send(actix_test::TestRequest::get().uri("/api/blogs"))
            .await
    }

    async fn delete(&self, token: &str, id: &str) -> Reply {
        self.send(
            actix_test::TestRequest::delete()
                .uri(&format!("/api/blogs/{id}"))
                .insert_header(("Authorization", format!("Bearer {token}"))),
        )
        .await
    }

    async fn update(&self, token: &str, id: &str, body: Value) -> Reply {
        self.send(
            actix_test::TestRequest::put()
                .uri(&format!("/api/blogs/{id}"))
                .insert_header(("Authorization", format!("Bearer {token}")))
                .set_json(body),
        )
        .await
    }
}

#[fixture]
fn harness() -> Harness {
    Harness::new(UpdatePolicy::AnyAuthenticated)
}

fn sample_blog() -> Value {
    json!({
        "title": "Subject",
        "author": "BlogTester",
        "url": "http://localhost",
        "likes": 7
    })
}

#[rstest]
#[actix_web::test]
async fn created_blog_round_trips_through_list(harness: Harness) {
    let token = harness.token_for("root").await;

    let created = harness.create(&token, sample_blog()).await;
    assert_eq!(created.status, StatusCode::CREATED);

    let listed = harness.list().await;
    assert_eq!(listed.status, StatusCode::OK);
    let blogs = listed.body.as_array().expect("array");
    assert_eq!(blogs.len(), 1);
    let blog = &blogs[0];
    assert_eq!(blog["title"], "Subject");
    assert_eq!(blog["author"], "BlogTester");
    assert_eq!(blog["url"], "http://localhost");
    assert_eq!(blog["likes"], 7);
    assert_eq!(blog["user"]["username"], "root");
    assert_eq!(blog["id"], created.body["id"]);
}

#[rstest]
#[case(json!({ "title": "Subject", "url": "http://localhost" }))]
#[case(json!({ "title": "Subject", "url": "http://localhost", "likes": null }))]
#[case(json!({ "title": "Subject", "url": "http://localhost", "likes": "many" }))]
#[actix_web::test]
async fn likes_default_to_zero(harness: Harness, #[case] body: Value) {
    let token = harness.token_for("root").await;

    let created = harness.create(&token, body).await;

    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.body["likes"], 0);
}

#[rstest]
#[case(json!({ "url": "http://localhost" }), "title")]
#[case(json!({ "title": "Subject" }), "url")]
#[case(json!({ "title": "  ", "url": "http://localhost" }), "title")]
#[actix_web::test]
async fn title_and_url_are_required(
    harness: Harness,
    #[case] body: Value,
    #[case] field: &str,
) {
    let token = harness.token_for("root").await;

    let rejected = harness.create(&token, body).await;

    assert_eq!(rejected.status, StatusCode::BAD_REQUEST);
    assert_eq!(rejected.body["code"], "invalid_request");
    assert_eq!(rejected.body["details"]["field"], field);
    assert!(harness.blogs.records().is_empty());
}

#[rstest]
#[case(json!(-1))]
#[case(json!(3_000_000_000_u64))]
#[actix_web::test]
async fn out_of_range_likes_are_rejected(harness: Harness, #[case] likes: Value) {
    let token = harness.token_for("root").await;

    let rejected = harness
        .create(
            &token,
            json!({ "title": "Subject", "url": "http://localhost", "likes": likes }),
        )
        .await;

    assert_eq!(rejected.status, StatusCode::BAD_REQUEST);
    assert_eq!(rejected.body["code"], "invalid_request");
    assert_eq!(rejected.body["details"]["field"], "likes");
    assert!(harness.blogs.records().is_empty());
}

#[rstest]
#[case(None, "token missing")]
#[case(Some("Bearer forged.token.value"), "token invalid")]
#[case(Some("Basic cm9vdDpzZWtyZXQ="), "token invalid")]
#[actix_web::test]
async fn create_without_valid_token_is_unauthorized(
    harness: Harness,
    #[case] authorization: Option<&str>,
    #[case] message: &str,
) {
    let mut request = actix_test::TestRequest::post()
        .uri("/api/blogs")
        .set_json(sample_blog());
    if let Some(value) = authorization {
        request = request.insert_header(("Authorization", value));
    }

    let rejected = harness.send(request).await;

    assert_eq!(rejected.status, StatusCode::UNAUTHORIZED);
    assert_eq!(rejected.body["message"], message);
    assert!(harness.blogs.records().is_empty());
}

#[rstest]
#[actix_web::test]
async fn token_from_another_secret_is_rejected(harness: Harness) {
    let _ = harness.token_for("root").await;
    let stored = harness.users.stored();
    let identity = bloglist::domain::AuthenticatedUser::new(
        *stored[0].user.id(),
        stored[0].user.username().clone(),
    );
    let forged = bloglist::domain::ports::TokenCodec::issue(
        &JwtTokenCodec::new(b"some-other-secret", None),
        &identity,
    )
    .expect("issue");

    let rejected = harness.create(&forged, sample_blog()).await;

    assert_eq!(rejected.status, StatusCode::UNAUTHORIZED);
    assert!(harness.blogs.records().is_empty());
}

#[rstest]
#[actix_web::test]
async fn non_owner_cannot_delete(harness: Harness) {
    let owner = harness.token_for("root").await;
    let stranger = harness.token_for("mluukkai").await;
    let created = harness.create(&owner, sample_blog()).await;
    let id = created.body["id"].as_str().expect("id").to_owned();

    let rejected = harness.delete(&stranger, &id).await;

    assert_eq!(rejected.status, StatusCode::FORBIDDEN);
    assert_eq!(rejected.body["code"], "forbidden");
    assert_eq!(harness.blogs.records().len(), 1);
}

#[rstest]
#[actix_web::test]
async fn owner_can_delete(harness: Harness) {
    let owner = harness.token_for("root").await;
    let created = harness.create(&owner, sample_blog()).await;
    let id = created.body["id"].as_str().expect("id").to_owned();

    let deleted = harness.delete(&owner, &id).await;

    assert_eq!(deleted.status, StatusCode::NO_CONTENT);
    assert!(harness.blogs.records().is_empty());
}

#[rstest]
#[case("5f0c1e2a-9d8b-4c3a-8e7f-6a5b4c3d2e1f")]
#[case("not-an-id")]
#[actix_web::test]
async fn deleting_unknown_blog_is_not_found(harness: Harness, #[case] id: &str) {
    let token = harness.token_for("root").await;

    let missing = harness.delete(&token, id).await;

    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(missing.body["code"], "not_found");
}

#[rstest]
#[actix_web::test]
async fn listing_twice_without_mutation_is_identical(harness: Harness) {
    let token = harness.token_for("root").await;
    harness.create(&token, sample_blog()).await;
    harness
        .create(
            &token,
            json!({ "title": "Second", "url": "http://localhost/2" }),
        )
        .await;

    let first = harness.list().await;
    let second = harness.list().await;

    assert_eq!(first.body, second.body);
    assert_eq!(first.body.as_array().map(Vec::len), Some(2));
}

#[rstest]
#[case("ro", "sekret", "username")]
#[case("root", "se", "password")]
#[actix_web::test]
async fn short_credentials_fail_registration(
    harness: Harness,
    #[case] username: &str,
    #[case] password: &str,
    #[case] field: &str,
) {
    let rejected = harness.register(username, password).await;

    assert_eq!(rejected.status, StatusCode::BAD_REQUEST);
    assert_eq!(rejected.body["code"], "invalid_request");
    assert_eq!(rejected.body["details"]["field"], field);
    assert!(harness.users.stored().is_empty());
}

#[rstest]
#[actix_web::test]
async fn long_username_and_name_register(harness: Harness) {
    let username = "a".repeat(65);
    let name = "n".repeat(129);

    let created = harness
        .send(
            actix_test::TestRequest::post()
                .uri("/api/users")
                .set_json(json!({ "username": username, "name": name, "password": "sekret" })),
        )
        .await;

    assert_eq!(created.status, StatusCode::CREATED, "{:?}", created.body);
    assert_eq!(created.body["username"], username.as_str());
    assert_eq!(created.body["name"], name.as_str());
}

#[rstest]
#[actix_web::test]
async fn duplicate_registration_leaves_user_count_unchanged(harness: Harness) {
    let first = harness.register("root", "sekret").await;
    assert_eq!(first.status, StatusCode::CREATED);
    assert!(first.body.get("passwordHash").is_none());

    let second = harness.register("root", "anything").await;

    assert_eq!(second.status, StatusCode::BAD_REQUEST);
    assert_eq!(second.body["code"], "duplicate_username");
    assert_eq!(harness.users.stored().len(), 1);
}

#[rstest]
#[actix_web::test]
async fn login_token_authorizes_every_mutation(harness: Harness) {
    let token = harness.token_for("root").await;

    let created = harness.create(&token, sample_blog()).await;
    assert_eq!(created.status, StatusCode::CREATED);
    let id = created.body["id"].as_str().expect("id").to_owned();

    let updated = harness.update(&token, &id, json!({ "likes": 8 })).await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.body["likes"], 8);
    assert_eq!(updated.body["title"], "Subject");

    let deleted = harness.delete(&token, &id).await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);
}

#[rstest]
#[actix_web::test]
async fn wrong_password_yields_no_token(harness: Harness) {
    harness.register("root", "sekret").await;

    let rejected = harness.login("root", "wrong").await;

    assert_eq!(rejected.status, StatusCode::UNAUTHORIZED);
    assert_eq!(rejected.body["message"], "invalid username or password");
    assert!(rejected.body.get("token").is_none());
}

#[rstest]
#[actix_web::test]
async fn login_returns_profile_alongside_token(harness: Harness) {
    harness.register("root", "sekret").await;

    let session = harness.login("root", "sekret").await;

    assert_eq!(session.status, StatusCode::OK);
    assert_eq!(session.body["username"], "root");
    assert_eq!(session.body["name"], "Tester");
}

#[rstest]
#[actix_web::test]
async fn any_authenticated_user_may_update_by_default(harness: Harness) {
    let owner = harness.token_for("root").await;
    let stranger = harness.token_for("mluukkai").await;
    let created = harness.create(&owner, sample_blog()).await;
    let id = created.body["id"].as_str().expect("id").to_owned();

    let updated = harness.update(&stranger, &id, json!({ "likes": 9 })).await;

    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.body["user"]["username"], "root");
}

#[actix_web::test]
async fn owner_only_policy_rejects_foreign_updates() {
    let harness = Harness::new(UpdatePolicy::OwnerOnly);
    let owner = harness.token_for("root").await;
    let stranger = harness.token_for("mluukkai").await;
    let created = harness.create(&owner, sample_blog()).await;
    let id = created.body["id"].as_str().expect("id").to_owned();

    let rejected = harness.update(&stranger, &id, json!({ "likes": 9 })).await;

    assert_eq!(rejected.status, StatusCode::FORBIDDEN);
    assert_eq!(harness.blogs.records()[0].likes, 7);
}

#[rstest]
#[actix_web::test]
async fn users_listing_embeds_owned_blogs(harness: Harness) {
    let token = harness.token_for("root").await;
    harness.token_for("mluukkai").await;
    harness.create(&token, sample_blog()).await;

    let listed = harness
        .send(actix_test::TestRequest::get().uri("/api/users"))
        .await;

    assert_eq!(listed.status, StatusCode::OK);
    let users = listed.body.as_array().expect("array");
    assert_eq!(users.len(), 2);
    assert_eq!(users[0]["blogs"][0]["title"], "Subject");
    assert_eq!(users[1]["blogs"], json!([]));
    assert!(users.iter().all(|user| user.get("passwordHash").is_none()));
}

#[rstest]
#[actix_web::test]
async fn store_outage_is_reported_as_unavailable(harness: Harness) {
    harness.blogs.set_unavailable(true);

    let reply = harness.list().await;

    assert_eq!(reply.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(reply.body["code"], "store_unavailable");
    assert_eq!(reply.body["traceId"].as_str(), reply.trace_id.as_deref());
}

#[rstest]
#[actix_web::test]
async fn malformed_json_is_a_bad_request(harness: Harness) {
    let token = harness.token_for("root").await;

    let reply = harness
        .send(
            actix_test::TestRequest::post()
                .uri("/api/blogs")
                .insert_header(("Authorization", format!("Bearer {token}")))
                .insert_header(("Content-Type", "application/json"))
                .set_payload("{not json"),
        )
        .await;

    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.body["code"], "invalid_request");
}

#[rstest]
#[actix_web::test]
async fn malformed_update_of_unknown_blog_is_not_found(harness: Harness) {
    let token = harness.token_for("root").await;
    let created = harness.create(&token, sample_blog()).await;
    let known = created.body["id"].as_str().expect("id").to_owned();
    harness.delete(&token, &known).await;

    let reply = harness
        .send(
            actix_test::TestRequest::put()
                .uri(&format!("/api/blogs/{known}"))
                .insert_header(("Authorization", format!("Bearer {token}")))
                .insert_header(("Content-Type", "application/json"))
                .set_payload("{not json"),
        )
        .await;

    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert_eq!(reply.body["code"], "not_found");
}
