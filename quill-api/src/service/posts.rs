use actix_session::Session;
use actix_web::{
    web::{Data, Json, Path, Query},
    HttpRequest, HttpResponse,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::Utc;
use sea_orm::{
    ActiveValue, ColumnTrait, EntityTrait, IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder,
};
use serde::Serialize;
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use super::objects::{
    CommentContext, CommentFormContext, GroupContext, Page, PageQuery, PostContext,
    PostFormContext, ProfileContext,
};
use super::{helpers, DbConnection, ServiceResult};
use crate::entity::prelude::*;
use crate::entity::{comments, groups, posts, users};
use crate::errors::ServiceError;
use quill_commons::data_structures::PostFormData;

static POST_IMAGE_BYTES_MAX: usize = 1_000_000;

#[derive(Serialize)]
struct IndexContext {
    page: Page<PostContext>,
    index: bool,
}

#[actix_web::get("/")]
pub(crate) async fn index(query: Query<PageQuery>, db: Data<DbConnection>) -> ServiceResult {
    let page = helpers::fetch_page(
        helpers::recent_posts().paginate(&db.db_connection, helpers::PAGE_SIZE),
        query.page,
    )
    .await?
    .map(|(post, author)| PostContext::from_model(post, author));
    Ok(HttpResponse::Ok().json(IndexContext { page, index: true }))
}

#[derive(Serialize)]
struct GroupPageContext {
    group: GroupContext,
    page: Page<PostContext>,
}

#[actix_web::get("/group/{slug}/")]
pub(crate) async fn group_posts(
    slug: Path<String>,
    query: Query<PageQuery>,
    db: Data<DbConnection>,
) -> ServiceResult {
    let group = Groups::find()
        .filter(groups::Column::Slug.eq(slug.as_str()))
        .one(&db.db_connection)
        .await?
        .ok_or(ServiceError::NotFound)?;
    let page = helpers::fetch_page(
        helpers::recent_posts_in_group(group.group_id).paginate(&db.db_connection, helpers::PAGE_SIZE),
        query.page,
    )
    .await?
    .map(|(post, author)| PostContext::from_model(post, author));
    Ok(HttpResponse::Ok().json(GroupPageContext {
        group: group.into(),
        page,
    }))
}

#[derive(Serialize)]
struct NewPostContext {
    form: PostFormContext,
}

#[actix_web::get("/new/")]
pub(crate) async fn new_post_form(
    req: HttpRequest,
    session: Session,
    db: Data<DbConnection>,
) -> ServiceResult {
    helpers::require_viewer(req.path(), &session, &db).await?;
    let form = PostFormContext::empty(group_choices(&db).await?);
    Ok(HttpResponse::Ok().json(NewPostContext { form }))
}

#[actix_web::post("/new/")]
pub(crate) async fn new_post(
    form: Json<PostFormData>,
    req: HttpRequest,
    session: Session,
    db: Data<DbConnection>,
) -> ServiceResult {
    let viewer = helpers::require_viewer(req.path(), &session, &db).await?;
    let form = form.into_inner();
    match check_post_form(&form, &db).await? {
        FormCheck::Invalid(errors) => {
            let form = PostFormContext::from_form(&form, group_choices(&db).await?, errors);
            Ok(HttpResponse::Ok().json(NewPostContext { form }))
        }
        FormCheck::Valid { image } => {
            let model = posts::ActiveModel {
                post_id: ActiveValue::Set(Uuid::new_v4()),
                user_id: ActiveValue::Set(viewer.user_id),
                group_id: ActiveValue::Set(form.group),
                posted: ActiveValue::Set(Utc::now().naive_utc()),
                content: ActiveValue::Set(form.text.clone()),
                image: ActiveValue::Set(image),
            };
            Posts::insert(model).exec(&db.db_connection).await?;
            Ok(helpers::redirect("/"))
        }
    }
}

#[derive(Serialize)]
struct PostViewContext {
    post: PostContext,
    posts_count: u64,
    profile: ProfileContext,
    comments: Vec<CommentContext>,
    form: CommentFormContext,
}

#[actix_web::get("/{username}/{post_id}/")]
pub(crate) async fn post_view(
    path: Path<(String, Uuid)>,
    db: Data<DbConnection>,
) -> ServiceResult {
    let (username, post_id) = path.into_inner();
    let profile = Users::find()
        .filter(users::Column::Username.eq(username.as_str()))
        .one(&db.db_connection)
        .await?
        .ok_or(ServiceError::NotFound)?;
    let posts_count = Posts::find()
        .filter(posts::Column::UserId.eq(profile.user_id))
        .count(&db.db_connection)
        .await?;
    // the post resolves by id alone, the username segment is not
    // cross-checked against its author
    let (post, author) = Posts::find_by_id(post_id)
        .find_also_related(Users)
        .one(&db.db_connection)
        .await?
        .ok_or(ServiceError::NotFound)?;
    let comments = Comments::find()
        .filter(comments::Column::PostId.eq(post.post_id))
        .find_also_related(Users)
        .order_by_asc(comments::Column::Posted)
        .all(&db.db_connection)
        .await?
        .into_iter()
        .map(|(comment, author)| CommentContext::from_model(comment, author))
        .collect();
    Ok(HttpResponse::Ok().json(PostViewContext {
        post: PostContext::from_model(post, author),
        posts_count,
        profile: profile.into(),
        comments,
        form: CommentFormContext::empty(),
    }))
}

#[derive(Serialize)]
struct EditPostContext {
    form: PostFormContext,
    post: PostContext,
}

#[actix_web::get("/{username}/{post_id}/edit/")]
pub(crate) async fn post_edit_form(
    path: Path<(String, Uuid)>,
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
    if post.user_id != viewer.user_id {
        return Ok(helpers::redirect(format!("/{}/{}/", username, post_id)));
    }
    let form = PostFormContext::from_post(&post, group_choices(&db).await?);
    Ok(HttpResponse::Ok().json(EditPostContext {
        form,
        post: PostContext::from_model(post, author),
    }))
}

#[actix_web::post("/{username}/{post_id}/edit/")]
pub(crate) async fn post_edit(
    path: Path<(String, Uuid)>,
    form: Json<PostFormData>,
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
    // only the author gets to change a post, everyone else is bounced
    // back to the read-only view
    if post.user_id != viewer.user_id {
        return Ok(helpers::redirect(format!("/{}/{}/", username, post_id)));
    }
    let form = form.into_inner();
    match check_post_form(&form, &db).await? {
        FormCheck::Invalid(errors) => {
            let form_context = PostFormContext::from_form(&form, group_choices(&db).await?, errors);
            Ok(HttpResponse::Ok().json(EditPostContext {
                form: form_context,
                post: PostContext::from_model(post, author),
            }))
        }
        FormCheck::Valid { image } => {
            let mut active = post.into_active_model();
            active.content = ActiveValue::Set(form.text.clone());
            active.group_id = ActiveValue::Set(form.group);
            if let Some(image) = image {
                active.image = ActiveValue::Set(Some(image));
            }
            active.user_id = ActiveValue::Set(viewer.user_id);
            active.posted = ActiveValue::Set(Utc::now().naive_utc());
            Posts::update(active).exec(&db.db_connection).await?;
            Ok(helpers::redirect(format!("/{}/{}/", username, post_id)))
        }
    }
}

async fn group_choices(db: &DbConnection) -> Result<Vec<GroupContext>, ServiceError> {
    let groups = Groups::find()
        .order_by_asc(groups::Column::Title)
        .all(&db.db_connection)
        .await?;
    Ok(groups.into_iter().map(GroupContext::from).collect())
}

enum FormCheck {
    Valid { image: Option<Vec<u8>> },
    Invalid(ValidationErrors),
}

async fn check_post_form(form: &PostFormData, db: &DbConnection) -> Result<FormCheck, ServiceError> {
    let mut errors = match form.validate() {
        Ok(()) => ValidationErrors::new(),
        Err(errors) => errors,
    };
    if let Some(group_id) = form.group {
        if Groups::find_by_id(group_id)
            .one(&db.db_connection)
            .await?
            .is_none()
        {
            errors.add(
                "group",
                ValidationError::new("unknown_group")
                    .with_message("select an existing group".into()),
            );
        }
    }
    let mut image = None;
    if let Some(encoded) = &form.image {
        match STANDARD.decode(encoded) {
            Ok(bytes) if bytes.len() > POST_IMAGE_BYTES_MAX => {
                errors.add(
                    "image",
                    ValidationError::new("too_large")
                        .with_message("uploaded file exceeded allowed size".into()),
                );
            }
            Ok(bytes) if !infer::is_image(&bytes) => {
                errors.add(
                    "image",
                    ValidationError::new("not_image")
                        .with_message("uploaded file was not a valid image".into()),
                );
            }
            Ok(bytes) => image = Some(bytes),
            Err(_) => {
                errors.add(
                    "image",
                    ValidationError::new("not_image")
                        .with_message("uploaded file was not a valid image".into()),
                );
            }
        }
    }
    if errors.is_empty() {
        Ok(FormCheck::Valid { image })
    } else {
        Ok(FormCheck::Invalid(errors))
    }
}
