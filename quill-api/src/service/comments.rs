use actix_session::Session;
use actix_web::{
    web::{Data, Json, Path},
    HttpRequest, HttpResponse,
};
use chrono::Utc;
use sea_orm::{ActiveValue, EntityTrait};
use serde::Serialize;
use uuid::Uuid;
use validator::Validate;

use super::objects::{CommentFormContext, PostContext};
use super::{helpers, DbConnection, ServiceResult};
use crate::entity::comments;
use crate::entity::prelude::*;
use crate::errors::ServiceError;
use quill_commons::data_structures::CommentFormData;

#[derive(Serialize)]
struct CommentFormPageContext {
    form: CommentFormContext,
    post: PostContext,
}

#[actix_web::post("/{username}/{post_id}/comment/")]
pub(crate) async fn add_comment(
    path: Path<(String, Uuid)>,
    form: Json<CommentFormData>,
    req: HttpRequest,
    session: Session,
    db: Data<DbConnection>,
) -> ServiceResult {
    let viewer = helpers::require_viewer(req.path(), &session, &db).await?;
    let (username, post_id) = path.into_inner();
    let (post, author) = Posts::find_by_id(post_id)
        .find_also_related(Users)
        .one(&db.db_connection)
        .await?
        .ok_or(ServiceError::NotFound)?;
    let form = form.into_inner();
    match form.validate() {
        Err(errors) => Ok(HttpResponse::Ok().json(CommentFormPageContext {
            form: CommentFormContext {
                text: form.text.clone(),
                errors,
            },
            post: PostContext::from_model(post, author),
        })),
        Ok(()) => {
            let model = comments::ActiveModel {
                comment_id: ActiveValue::Set(Uuid::new_v4()),
                post_id: ActiveValue::Set(post.post_id),
                user_id: ActiveValue::Set(viewer.user_id),
                posted: ActiveValue::Set(Utc::now().naive_utc()),
                content: ActiveValue::Set(form.text.clone()),
            };
            Comments::insert(model).exec(&db.db_connection).await?;
            // the redirect targets the post's actual author, not the
            // username segment the caller arrived with
            let author_name = author.map(|u| u.username).unwrap_or(username);
            Ok(helpers::redirect(format!(
                "/{}/{}/",
                author_name, post.post_id
            )))
        }
    }
}

#[actix_web::get("/{username}/{post_id}/comment/")]
pub(crate) async fn add_comment_view(
    path: Path<(String, Uuid)>,
    req: HttpRequest,
    session: Session,
    db: Data<DbConnection>,
) -> ServiceResult {
    helpers::require_viewer(req.path(), &session, &db).await?;
    let (username, post_id) = path.into_inner();
    Ok(helpers::redirect(format!("/{}/{}/", username, post_id)))
}
