use actix_session::Session;
use actix_web::{
    web::{Data, Json, Query},
    HttpResponse,
};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use log::{log, Level};
use sea_orm::{ActiveValue, ColumnTrait, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use super::{helpers, DbConnection, ServiceResult, SESSION_ID};
use crate::entity::prelude::*;
use crate::entity::users;
use quill_commons::data_structures::{LoginFormData, SignupFormData};

#[derive(Deserialize)]
struct NextQuery {
    next: Option<String>,
}

#[derive(Serialize)]
struct SignupFormContext {
    username: String,
    email: String,
    errors: ValidationErrors,
}

#[derive(Serialize)]
struct LoginFormContext {
    username: String,
    next: Option<String>,
    errors: ValidationErrors,
}

#[actix_web::post("signup/")]
pub(crate) async fn signup(form: Json<SignupFormData>, db: Data<DbConnection>) -> ServiceResult {
    let form = form.into_inner();
    let mut errors = match form.validate() {
        Ok(()) => ValidationErrors::new(),
        Err(errors) => errors,
    };
    if form.password1 != form.password2 {
        errors.add(
            "password2",
            ValidationError::new("mismatch").with_message("passwords do not match".into()),
        );
    }
    if Users::find()
        .filter(users::Column::Username.eq(form.username.as_str()))
        .one(&db.db_connection)
        .await?
        .is_some()
    {
        errors.add(
            "username",
            ValidationError::new("taken").with_message("username is already taken".into()),
        );
    }
    if !errors.is_empty() {
        return Ok(HttpResponse::Ok().json(SignupFormContext {
            username: form.username,
            email: form.email,
            errors,
        }));
    }

    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(form.password1.as_bytes(), &salt)
        .unwrap()
        .to_string();

    log!(Level::Debug, "signup for '{}'", form.username);

    let model = users::ActiveModel {
        user_id: ActiveValue::Set(Uuid::new_v4()),
        username: ActiveValue::Set(form.username.clone()),
        salt: ActiveValue::Set(salt.as_str().to_owned()),
        hash: ActiveValue::Set(password_hash),
        email: ActiveValue::Set(form.email.clone()),
    };
    Users::insert(model).exec(&db.db_connection).await?;
    Ok(helpers::redirect("/auth/login/"))
}

#[actix_web::get("login/")]
pub(crate) async fn login_form(query: Query<NextQuery>) -> ServiceResult {
    Ok(HttpResponse::Ok().json(LoginFormContext {
        username: String::new(),
        next: query.into_inner().next,
        errors: ValidationErrors::new(),
    }))
}

#[actix_web::post("login/")]
pub(crate) async fn login(
    form: Json<LoginFormData>,
    query: Query<NextQuery>,
    session: Session,
    db: Data<DbConnection>,
) -> ServiceResult {
    let form = form.into_inner();
    let NextQuery { next } = query.into_inner();
    let user = Users::find()
        .filter(users::Column::Username.eq(form.username.as_str()))
        .one(&db.db_connection)
        .await?;
    let verified = user.as_ref().is_some_and(|user| {
        PasswordHash::new(&user.hash)
            .map(|parsed| {
                Argon2::default()
                    .verify_password(form.password.as_bytes(), &parsed)
                    .is_ok()
            })
            .unwrap_or(false)
    });
    match user {
        Some(user) if verified => {
            session.insert(SESSION_ID, user.user_id.to_string())?;
            log!(Level::Debug, "login for '{}'", user.username);
            Ok(helpers::redirect(next.unwrap_or_else(|| "/".to_owned())))
        }
        _ => {
            session.remove(SESSION_ID);
            let mut errors = ValidationErrors::new();
            errors.add(
                "username",
                ValidationError::new("invalid_login")
                    .with_message("incorrect username or password".into()),
            );
            Ok(HttpResponse::Ok().json(LoginFormContext {
                username: form.username,
                next,
                errors,
            }))
        }
    }
}

#[actix_web::get("logout/")]
pub(crate) async fn logout(session: Session) -> ServiceResult {
    session.purge();
    Ok(helpers::redirect("/"))
}
