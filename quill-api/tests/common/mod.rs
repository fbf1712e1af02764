#![allow(dead_code)]

use actix_http::Request;
use actix_session::{storage::CookieSessionStore, SessionMiddleware};
use actix_web::{
    cookie::{Cookie, Key},
    dev::{Service, ServiceResponse},
    http::header,
    test, web, App, Error,
};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Argon2,
};
use chrono::Utc;
use sea_orm::{ActiveValue, ConnectOptions, Database, DatabaseConnection, EntityTrait};
use sea_orm_migration::MigratorTrait;
use uuid::Uuid;

use quill_api::entity::{groups, posts, users};
use quill_api::migrator::Migrator;
use quill_api::service::{self, DbConnection};

/// Fresh in-memory database with the full schema applied. One
/// connection only, so every query sees the same memory.
pub async fn test_db() -> DatabaseConnection {
    let mut c_opt = ConnectOptions::new("sqlite::memory:");
    c_opt.max_connections(1).sqlx_logging(false);
    let db = Database::connect(c_opt)
        .await
        .expect("connect test database");
    Migrator::up(&db, None).await.expect("migrate test database");
    db
}

pub fn test_app(
    db: &DatabaseConnection,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = Error,
        InitError = (),
    >,
> {
    App::new()
        .configure(service::configure_services)
        .app_data(web::Data::new(DbConnection::new(db.clone())))
        .wrap(
            SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
                .cookie_secure(false)
                .build(),
        )
}

pub async fn create_user(
    db: &DatabaseConnection,
    username: &str,
    password: &str,
    email: &str,
) -> users::Model {
    let user_id = Uuid::new_v4();
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .unwrap()
        .to_string();
    let model = users::ActiveModel {
        user_id: ActiveValue::Set(user_id),
        username: ActiveValue::Set(username.to_owned()),
        salt: ActiveValue::Set(salt.as_str().to_owned()),
        hash: ActiveValue::Set(hash.clone()),
        email: ActiveValue::Set(email.to_owned()),
    };
    users::Entity::insert(model).exec(db).await.expect("insert user");
    users::Model {
        user_id,
        username: username.to_owned(),
        salt: salt.as_str().to_owned(),
        hash,
        email: email.to_owned(),
    }
}

pub async fn create_post(
    db: &DatabaseConnection,
    author: &users::Model,
    text: &str,
) -> posts::Model {
    let post_id = Uuid::new_v4();
    let posted = Utc::now().naive_utc();
    let model = posts::ActiveModel {
        post_id: ActiveValue::Set(post_id),
        user_id: ActiveValue::Set(author.user_id),
        group_id: ActiveValue::Set(None),
        posted: ActiveValue::Set(posted),
        content: ActiveValue::Set(text.to_owned()),
        image: ActiveValue::Set(None),
    };
    posts::Entity::insert(model).exec(db).await.expect("insert post");
    posts::Model {
        post_id,
        user_id: author.user_id,
        group_id: None,
        posted,
        content: text.to_owned(),
        image: None,
    }
}

pub async fn create_group(
    db: &DatabaseConnection,
    title: &str,
    slug: &str,
    description: &str,
) -> groups::Model {
    let group_id = Uuid::new_v4();
    let model = groups::ActiveModel {
        group_id: ActiveValue::Set(group_id),
        title: ActiveValue::Set(title.to_owned()),
        slug: ActiveValue::Set(slug.to_owned()),
        description: ActiveValue::Set(description.to_owned()),
    };
    groups::Entity::insert(model).exec(db).await.expect("insert group");
    groups::Model {
        group_id,
        title: title.to_owned(),
        slug: slug.to_owned(),
        description: description.to_owned(),
    }
}

/// Logs in through the real login route and hands back the session
/// cookie for follow-up requests.
pub async fn login<S>(app: &S, username: &str, password: &str) -> Cookie<'static>
where
    S: Service<Request, Response = ServiceResponse, Error = Error>,
{
    let req = test::TestRequest::post()
        .uri("/auth/login/")
        .set_json(serde_json::json!({ "username": username, "password": password }))
        .to_request();
    let res = test::call_service(app, req).await;
    assert!(res.status().is_redirection(), "login should redirect");
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "id")
        .expect("session cookie")
        .into_owned()
}

pub fn location(res: &ServiceResponse) -> String {
    res.headers()
        .get(header::LOCATION)
        .expect("location header")
        .to_str()
        .expect("ascii location header")
        .to_owned()
}

pub async fn body_text(res: ServiceResponse) -> String {
    let body = test::read_body(res).await;
    String::from_utf8(body.to_vec()).expect("utf8 body")
}
