use actix_session::Session;
use actix_web::{http::header, HttpResponse};
use log::debug;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, Paginator, QueryFilter, QueryOrder,
    SelectTwo, SelectorTrait,
};
use std::str::FromStr;
use uuid::Uuid;

use super::objects::{DbConnection, Page};
use super::SESSION_ID;
use crate::entity::prelude::*;
use crate::entity::{posts, users};
use crate::errors::ServiceError;

pub(super) const PAGE_SIZE: u64 = 10;

// Every feed-style fetch goes through one of these, so ordering stays
// reverse-chronological everywhere.

pub(super) fn recent_posts() -> SelectTwo<posts::Entity, users::Entity> {
    Posts::find()
        .find_also_related(Users)
        .order_by_desc(posts::Column::Posted)
}

pub(super) fn recent_posts_by_author(author_id: Uuid) -> SelectTwo<posts::Entity, users::Entity> {
    Posts::find()
        .filter(posts::Column::UserId.eq(author_id))
        .find_also_related(Users)
        .order_by_desc(posts::Column::Posted)
}

pub(super) fn recent_posts_in_group(group_id: Uuid) -> SelectTwo<posts::Entity, users::Entity> {
    Posts::find()
        .filter(posts::Column::GroupId.eq(group_id))
        .find_also_related(Users)
        .order_by_desc(posts::Column::Posted)
}

pub(super) fn recent_posts_by_authors(
    author_ids: Vec<Uuid>,
) -> SelectTwo<posts::Entity, users::Entity> {
    Posts::find()
        .filter(posts::Column::UserId.is_in(author_ids))
        .find_also_related(Users)
        .order_by_desc(posts::Column::Posted)
}

/// Resolves the authenticated viewer, if any, from the cookie session.
pub async fn viewer(
    session: &Session,
    db: &DbConnection,
) -> Result<Option<users::Model>, ServiceError> {
    let Ok(Some(uuid_string)) = session.get::<String>(SESSION_ID) else {
        return Ok(None);
    };
    let Ok(user_id) = Uuid::from_str(&uuid_string) else {
        debug!("session carried a malformed user id: {}", uuid_string);
        return Ok(None);
    };
    Ok(Users::find_by_id(user_id).one(&db.db_connection).await?)
}

/// Like [`viewer`], but answers protected routes: no session means a
/// login redirect carrying the original path as the return target.
pub async fn require_viewer(
    path: &str,
    session: &Session,
    db: &DbConnection,
) -> Result<users::Model, ServiceError> {
    match viewer(session, db).await? {
        Some(user) => Ok(user),
        None => Err(ServiceError::LoginRequired {
            next: path.to_owned(),
        }),
    }
}

pub(super) fn redirect(location: impl Into<String>) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location.into()))
        .finish()
}

/// Fetches one page of a paginated selection. Pages are 1-based and ten
/// records long; a missing number means the first page and an
/// out-of-range one is clamped to the last page.
pub(super) async fn fetch_page<'db, S>(
    paginator: Paginator<'db, DatabaseConnection, S>,
    page: Option<u64>,
) -> Result<Page<S::Item>, DbErr>
where
    S: SelectorTrait + Send + Sync + 'db,
{
    let counts = paginator.num_items_and_pages().await?;
    let pages = counts.number_of_pages.max(1);
    let number = page.unwrap_or(1).clamp(1, pages);
    let items = paginator.fetch_page(number - 1).await?;
    Ok(Page {
        items,
        number,
        pages,
        total: counts.number_of_items,
    })
}
