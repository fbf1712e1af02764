mod common;

use actix_web::{http::StatusCode, test};
use sea_orm::{EntityTrait, PaginatorTrait};

use common::*;
use quill_api::entity::comments;

const COMMENT_TEXT: &str = "It is test comment text";

#[actix_web::test]
async fn auth_user_can_comment() {
    let db = test_db().await;
    let app = test::init_service(test_app(&db)).await;
    let jack = create_user(&db, "Jack", "abc12345678", "just_jack@tyler.com").await;
    let post = create_post(&db, &jack, "It is test text").await;
    let cookie = login(&app, "Jack", "abc12345678").await;

    let req = test::TestRequest::post()
        .uri(&format!("/Jack/{}/comment/", post.post_id))
        .cookie(cookie.clone())
        .set_json(serde_json::json!({ "text": COMMENT_TEXT }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location(&res), format!("/Jack/{}/", post.post_id));

    let req = test::TestRequest::get()
        .uri(&format!("/Jack/{}/", post.post_id))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert!(body_text(res).await.contains(COMMENT_TEXT));
}

#[actix_web::test]
async fn unauthenticated_comment_redirects_to_login() {
    let db = test_db().await;
    let app = test::init_service(test_app(&db)).await;
    let jack = create_user(&db, "Jack", "abc12345678", "just_jack@tyler.com").await;
    let post = create_post(&db, &jack, "It is test text").await;

    let req = test::TestRequest::post()
        .uri(&format!("/Jack/{}/comment/", post.post_id))
        .set_json(serde_json::json!({ "text": COMMENT_TEXT }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(
        location(&res),
        format!("/auth/login/?next=/Jack/{}/comment/", post.post_id)
    );
    assert_eq!(comments::Entity::find().count(&db).await.unwrap(), 0);
}

#[actix_web::test]
async fn blank_comment_is_rejected() {
    let db = test_db().await;
    let app = test::init_service(test_app(&db)).await;
    let jack = create_user(&db, "Jack", "abc12345678", "just_jack@tyler.com").await;
    let post = create_post(&db, &jack, "It is test text").await;
    let cookie = login(&app, "Jack", "abc12345678").await;

    let req = test::TestRequest::post()
        .uri(&format!("/Jack/{}/comment/", post.post_id))
        .cookie(cookie)
        .set_json(serde_json::json!({ "text": "   " }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(comments::Entity::find().count(&db).await.unwrap(), 0);
}

#[actix_web::test]
async fn plain_view_request_redirects_to_post() {
    let db = test_db().await;
    let app = test::init_service(test_app(&db)).await;
    let jack = create_user(&db, "Jack", "abc12345678", "just_jack@tyler.com").await;
    let post = create_post(&db, &jack, "It is test text").await;
    let cookie = login(&app, "Jack", "abc12345678").await;

    let req = test::TestRequest::get()
        .uri(&format!("/Jack/{}/comment/", post.post_id))
        .cookie(cookie)
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location(&res), format!("/Jack/{}/", post.post_id));
    assert_eq!(comments::Entity::find().count(&db).await.unwrap(), 0);
}

#[actix_web::test]
async fn comment_redirect_targets_the_posts_author() {
    let db = test_db().await;
    let app = test::init_service(test_app(&db)).await;
    let jack = create_user(&db, "Jack", "abc12345678", "just_jack@tyler.com").await;
    create_user(&db, "Marla", "abc12345678", "marla@tyler.com").await;
    let post = create_post(&db, &jack, "It is test text").await;
    let cookie = login(&app, "Marla", "abc12345678").await;

    // the username segment is wrong on purpose, the post still resolves
    let req = test::TestRequest::post()
        .uri(&format!("/Marla/{}/comment/", post.post_id))
        .cookie(cookie)
        .set_json(serde_json::json!({ "text": COMMENT_TEXT }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location(&res), format!("/Jack/{}/", post.post_id));
}

#[actix_web::test]
async fn commenting_a_missing_post_is_not_found() {
    let db = test_db().await;
    let app = test::init_service(test_app(&db)).await;
    create_user(&db, "Jack", "abc12345678", "just_jack@tyler.com").await;
    let cookie = login(&app, "Jack", "abc12345678").await;

    let req = test::TestRequest::post()
        .uri(&format!("/Jack/{}/comment/", uuid::Uuid::new_v4()))
        .cookie(cookie)
        .set_json(serde_json::json!({ "text": COMMENT_TEXT }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}
