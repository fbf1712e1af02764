mod auth;
mod comments;
pub mod helpers;
mod objects;
mod posts;
mod profiles;

use actix_web::{web, HttpResponse};

use crate::errors::ServiceError;
pub use objects::DbConnection;

pub(crate) const SESSION_ID: &str = "id";

pub type ServiceResult = Result<HttpResponse, ServiceError>;

// Registration order doubles as match priority: the static paths have
// to come before the `/{username}/...` catch-alls.
pub fn configure_services(cfg: &mut web::ServiceConfig) {
    let auth_scope = web::scope("/auth")
        .service(auth::signup)
        .service(auth::login_form)
        .service(auth::login)
        .service(auth::logout);
    cfg.service(auth_scope);

    cfg.service(posts::index);
    cfg.service(profiles::follow_index);
    cfg.service(posts::group_posts);
    cfg.service(posts::new_post_form);
    cfg.service(posts::new_post);
    cfg.service(profiles::profile_follow);
    cfg.service(profiles::profile_unfollow);
    cfg.service(posts::post_edit_form);
    cfg.service(posts::post_edit);
    cfg.service(comments::add_comment);
    cfg.service(comments::add_comment_view);
    cfg.service(posts::post_view);
    cfg.service(profiles::profile);
}
