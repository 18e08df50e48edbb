//! Tests for user registration and listing.

use std::sync::Arc;

use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::{
    BlogPersistenceError, MockBlogRepository, MockPasswordHasher, MockUserRepository,
};
use crate::domain::{Blog, BlogId, BlogOwner, ErrorCode, PasswordHash, Username};

type Service = UserService<MockUserRepository, MockBlogRepository, MockPasswordHasher>;

fn make_service(
    users: MockUserRepository,
    blogs: MockBlogRepository,
    hasher: MockPasswordHasher,
) -> Service {
    UserService::new(Arc::new(users), Arc::new(blogs), Arc::new(hasher))
}

#[fixture]
fn hasher() -> MockPasswordHasher {
    let mut hasher = MockPasswordHasher::new();
    hasher
        .expect_hash()
        .returning(|password| Ok(PasswordHash::new(format!("hashed:{password}"))));
    hasher
}

#[fixture]
fn registration() -> Registration {
    Registration::try_from_parts(Some("root"), Some("Superuser"), Some("sekret"))
        .expect("valid registration")
}

fn user(username: &str) -> User {
    User::new(
        UserId::random(),
        Username::new(username).expect("username"),
        None,
    )
}

fn blog_owned_by(owner: &User, title: &str) -> Blog {
    Blog {
        id: BlogId::random(),
        title: title.to_owned(),
        author: None,
        url: "http://localhost".to_owned(),
        likes: 0,
        owner: BlogOwner {
            id: *owner.id(),
            username: owner.username().clone(),
            name: None,
        },
    }
}

#[rstest]
#[tokio::test]
async fn register_stores_hashed_password(
    hasher: MockPasswordHasher,
    registration: Registration,
) {
    let mut users = MockUserRepository::new();
    users
        .expect_insert()
        .withf(|stored| {
            stored.user.username().as_ref() == "root"
                && stored.password_hash.as_str() == "hashed:sekret"
        })
        .times(1)
        .returning(|_| Ok(()));

    let created = make_service(users, MockBlogRepository::new(), hasher)
        .register(&registration)
        .await
        .expect("registration succeeds");

    assert_eq!(created.username().as_ref(), "root");
    assert_eq!(created.name(), Some("Superuser"));
}

#[rstest]
#[tokio::test]
async fn register_reports_duplicate_username(
    hasher: MockPasswordHasher,
    registration: Registration,
) {
    let mut users = MockUserRepository::new();
    users
        .expect_insert()
        .returning(|_| Err(UserPersistenceError::duplicate_username("root")));

    let error = make_service(users, MockBlogRepository::new(), hasher)
        .register(&registration)
        .await
        .expect_err("duplicate rejected");

    assert_eq!(error.code(), ErrorCode::DuplicateUsername);
    assert_eq!(error.details().expect("details")["field"], "username");
}

#[rstest]
#[tokio::test]
async fn register_surfaces_store_outage_as_transient(
    hasher: MockPasswordHasher,
    registration: Registration,
) {
    let mut users = MockUserRepository::new();
    users
        .expect_insert()
        .returning(|_| Err(UserPersistenceError::connection("refused")));

    let error = make_service(users, MockBlogRepository::new(), hasher)
        .register(&registration)
        .await
        .expect_err("outage surfaces");

    assert!(error.is_transient());
}

#[rstest]
#[tokio::test]
async fn list_users_embeds_owned_blogs() {
    let root = user("root");
    let mluukkai = user("mluukkai");
    let blogs = vec![
        blog_owned_by(&root, "first"),
        blog_owned_by(&mluukkai, "second"),
        blog_owned_by(&root, "third"),
    ];
    let listed = vec![root.clone(), mluukkai.clone()];

    let mut users = MockUserRepository::new();
    users.expect_list().return_once(move || Ok(listed));
    let mut blog_repo = MockBlogRepository::new();
    blog_repo.expect_list().return_once(move || Ok(blogs));

    let result = make_service(users, blog_repo, MockPasswordHasher::new())
        .list_users()
        .await
        .expect("listing succeeds");

    assert_eq!(result.len(), 2);
    assert_eq!(result[0].id, *root.id());
    let titles: Vec<_> = result[0].blogs.iter().map(|b| b.title.as_str()).collect();
    assert_eq!(titles, ["first", "third"]);
    assert_eq!(result[1].blogs.len(), 1);
}

#[rstest]
#[tokio::test]
async fn list_users_maps_blog_store_failure() {
    let mut users = MockUserRepository::new();
    users.expect_list().return_once(|| Ok(Vec::new()));
    let mut blog_repo = MockBlogRepository::new();
    blog_repo
        .expect_list()
        .return_once(|| Err(BlogPersistenceError::query("boom")));

    let error = make_service(users, blog_repo, MockPasswordHasher::new())
        .list_users()
        .await
        .expect_err("failure surfaces");

    assert_eq!(error.code(), ErrorCode::InternalError);
}
