use actix_session::Session;
use actix_web::{
    web::{Data, Path, Query},
    HttpRequest, HttpResponse,
};
use sea_orm::{
    ActiveValue, ColumnTrait, EntityTrait, IntoActiveModel, PaginatorTrait, QueryFilter,
};
use serde::Serialize;
use uuid::Uuid;

use super::objects::{Page, PageQuery, PostContext, ProfileContext};
use super::{helpers, DbConnection, ServiceResult};
use crate::entity::prelude::*;
use crate::entity::{follows, users};
use crate::errors::ServiceError;

#[derive(Serialize)]
struct FollowIndexContext {
    page: Page<PostContext>,
    follow: bool,
}

#[actix_web::get("/follow/")]
pub(crate) async fn follow_index(
    query: Query<PageQuery>,
    req: HttpRequest,
    session: Session,
    db: Data<DbConnection>,
) -> ServiceResult {
    let viewer = helpers::require_viewer(req.path(), &session, &db).await?;
    let followed = Follows::find()
        .filter(follows::Column::UserId.eq(viewer.user_id))
        .all(&db.db_connection)
        .await?;
    let author_ids: Vec<Uuid> = followed.iter().map(|follow| follow.author_id).collect();
    if author_ids.is_empty() {
        return Ok(HttpResponse::Ok().json(FollowIndexContext {
            page: Page::empty(),
            follow: true,
        }));
    }
    let page = helpers::fetch_page(
        helpers::recent_posts_by_authors(author_ids).paginate(&db.db_connection, helpers::PAGE_SIZE),
        query.page,
    )
    .await?
    .map(|(post, author)| PostContext::from_model(post, author));
    Ok(HttpResponse::Ok().json(FollowIndexContext { page, follow: true }))
}

#[derive(Serialize)]
struct ProfilePageContext {
    profile: ProfileContext,
    following: bool,
    viewer_is_owner: bool,
    page: Page<PostContext>,
}

#[actix_web::get("/{username}/")]
pub(crate) async fn profile(
    username: Path<String>,
    query: Query<PageQuery>,
    session: Session,
    db: Data<DbConnection>,
) -> ServiceResult {
    let profile = Users::find()
        .filter(users::Column::Username.eq(username.as_str()))
        .one(&db.db_connection)
        .await?
        .ok_or(ServiceError::NotFound)?;

    let mut following = false;
    let mut viewer_is_owner = false;
    if let Some(viewer) = helpers::viewer(&session, &db).await? {
        viewer_is_owner = viewer.user_id == profile.user_id;
        following = Follows::find()
            .filter(follows::Column::UserId.eq(viewer.user_id))
            .filter(follows::Column::AuthorId.eq(profile.user_id))
            .one(&db.db_connection)
            .await?
            .is_some();
    }

    let page = helpers::fetch_page(
        helpers::recent_posts_by_author(profile.user_id).paginate(&db.db_connection, helpers::PAGE_SIZE),
        query.page,
    )
    .await?
    .map(|(post, author)| PostContext::from_model(post, author));
    Ok(HttpResponse::Ok().json(ProfilePageContext {
        profile: profile.into(),
        following,
        viewer_is_owner,
        page,
    }))
}

#[actix_web::get("/{username}/follow/")]
pub(crate) async fn profile_follow(
    username: Path<String>,
    req: HttpRequest,
    session: Session,
    db: Data<DbConnection>,
) -> ServiceResult {
    let viewer = helpers::require_viewer(req.path(), &session, &db).await?;
    let author = Users::find()
        .filter(users::Column::Username.eq(username.as_str()))
        .one(&db.db_connection)
        .await?
        .ok_or(ServiceError::NotFound)?;

    // following yourself is silently skipped
    if viewer.user_id == author.user_id {
        return Ok(helpers::redirect(format!("/{}/", username)));
    }

    let existing = Follows::find()
        .filter(follows::Column::UserId.eq(viewer.user_id))
        .filter(follows::Column::AuthorId.eq(author.user_id))
        .one(&db.db_connection)
        .await?;
    if existing.is_none() {
        let model = follows::ActiveModel {
            follow_id: ActiveValue::Set(Uuid::new_v4()),
            user_id: ActiveValue::Set(viewer.user_id),
            author_id: ActiveValue::Set(author.user_id),
        };
        Follows::insert(model).exec(&db.db_connection).await?;
    }
    Ok(helpers::redirect(format!("/{}/", username)))
}

#[actix_web::get("/{username}/unfollow/")]
pub(crate) async fn profile_unfollow(
    username: Path<String>,
    req: HttpRequest,
    session: Session,
    db: Data<DbConnection>,
) -> ServiceResult {
    let viewer = helpers::require_viewer(req.path(), &session, &db).await?;
    let author = Users::find()
        .filter(users::Column::Username.eq(username.as_str()))
        .one(&db.db_connection)
        .await?
        .ok_or(ServiceError::NotFound)?;

    if viewer.user_id == author.user_id {
        return Ok(helpers::redirect(format!("/{}/", username)));
    }

    let follow = Follows::find()
        .filter(follows::Column::UserId.eq(viewer.user_id))
        .filter(follows::Column::AuthorId.eq(author.user_id))
        .one(&db.db_connection)
        .await?
        .ok_or(ServiceError::NotFound)?;
    Follows::delete(follow.into_active_model())
        .exec(&db.db_connection)
        .await?;
    Ok(helpers::redirect(format!("/{}/", username)))
}
