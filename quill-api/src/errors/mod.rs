use actix_web::{http::header, HttpResponse, ResponseError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Resource not found")]
    NotFound,

    #[error("Login required")]
    LoginRequired { next: String },

    #[error("Session error")]
    SessionError {
        #[from]
        source: actix_session::SessionInsertError,
    },

    #[error("Database error")]
    DatabaseError {
        #[from]
        source: sea_orm::DbErr,
    },
}

impl ResponseError for ServiceError {
    fn error_response(&self) -> actix_web::HttpResponse<actix_web::body::BoxBody> {
        match self {
            ServiceError::NotFound => HttpResponse::NotFound().reason("resource not found").finish(),
            ServiceError::LoginRequired { next } => HttpResponse::Found()
                .insert_header((header::LOCATION, format!("/auth/login/?next={}", next)))
                .finish(),
            ServiceError::SessionError { source } => {
                log::error!("session insert error: {:?}", source);
                HttpResponse::InternalServerError()
                    .reason("session error")
                    .finish()
            }
            ServiceError::DatabaseError { source } => {
                log::error!("database error: {:?}", source);
                HttpResponse::InternalServerError()
                    .reason("an error occured")
                    .finish()
            }
        }
    }
}
