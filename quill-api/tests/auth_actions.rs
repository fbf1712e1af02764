mod common;

use actix_web::{http::StatusCode, test};
use sea_orm::{EntityTrait, PaginatorTrait};

use common::*;
use quill_api::entity::users;

#[actix_web::test]
async fn signup_then_login_then_own_profile() {
    let db = test_db().await;
    let app = test::init_service(test_app(&db)).await;

    let req = test::TestRequest::post()
        .uri("/auth/signup/")
        .set_json(serde_json::json!({
            "username": "Jack",
            "email": "just_jack@tyler.com",
            "password1": "MarTyJ202",
            "password2": "MarTyJ202",
        }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location(&res), "/auth/login/");
    assert_eq!(users::Entity::find().count(&db).await.unwrap(), 1);

    let cookie = login(&app, "Jack", "MarTyJ202").await;
    let req = test::TestRequest::get()
        .uri("/Jack/")
        .cookie(cookie)
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[actix_web::test]
async fn signup_with_mismatched_passwords_is_rejected() {
    let db = test_db().await;
    let app = test::init_service(test_app(&db)).await;

    let req = test::TestRequest::post()
        .uri("/auth/signup/")
        .set_json(serde_json::json!({
            "username": "Jack",
            "email": "just_jack@tyler.com",
            "password1": "MarTyJ202",
            "password2": "different",
        }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(body_text(res).await.contains("passwords do not match"));
    assert_eq!(users::Entity::find().count(&db).await.unwrap(), 0);
}

#[actix_web::test]
async fn signup_with_taken_username_is_rejected() {
    let db = test_db().await;
    let app = test::init_service(test_app(&db)).await;
    create_user(&db, "Jack", "abc12345678", "just_jack@tyler.com").await;

    let req = test::TestRequest::post()
        .uri("/auth/signup/")
        .set_json(serde_json::json!({
            "username": "Jack",
            "email": "second_jack@tyler.com",
            "password1": "MarTyJ202",
            "password2": "MarTyJ202",
        }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(body_text(res).await.contains("already taken"));
    assert_eq!(users::Entity::find().count(&db).await.unwrap(), 1);
}

#[actix_web::test]
async fn login_with_wrong_password_rerenders_the_form() {
    let db = test_db().await;
    let app = test::init_service(test_app(&db)).await;
    create_user(&db, "Jack", "abc12345678", "just_jack@tyler.com").await;

    let req = test::TestRequest::post()
        .uri("/auth/login/")
        .set_json(serde_json::json!({ "username": "Jack", "password": "wrong" }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(body_text(res).await.contains("incorrect username or password"));
}

#[actix_web::test]
async fn login_redirects_to_the_next_target() {
    let db = test_db().await;
    let app = test::init_service(test_app(&db)).await;
    create_user(&db, "Jack", "abc12345678", "just_jack@tyler.com").await;

    let req = test::TestRequest::post()
        .uri("/auth/login/?next=/new/")
        .set_json(serde_json::json!({ "username": "Jack", "password": "abc12345678" }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location(&res), "/new/");
}

#[actix_web::test]
async fn logout_invalidates_the_session_cookie() {
    let db = test_db().await;
    let app = test::init_service(test_app(&db)).await;
    create_user(&db, "Jack", "abc12345678", "just_jack@tyler.com").await;
    let cookie = login(&app, "Jack", "abc12345678").await;

    let req = test::TestRequest::get()
        .uri("/auth/logout/")
        .cookie(cookie)
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location(&res), "/");

    // the logout response replaces the cookie with an expired one
    let cleared = res
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "id")
        .expect("removal cookie")
        .into_owned();
    let req = test::TestRequest::get()
        .uri("/new/")
        .cookie(cleared)
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location(&res), "/auth/login/?next=/new/");
}
