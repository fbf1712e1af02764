use serde::Serialize;
use uuid::Uuid;
use validator::ValidationErrors;

use crate::entity::{comments, groups, posts, users};
use quill_commons::data_structures::PostFormData;

#[derive(Clone)]
pub struct DbConnection {
    pub(super) db_connection: sea_orm::DatabaseConnection,
}
impl DbConnection {
    pub fn new(db_connection: sea_orm::prelude::DatabaseConnection) -> Self {
        Self { db_connection }
    }
}

#[derive(serde::Deserialize)]
pub(super) struct PageQuery {
    pub(super) page: Option<u64>,
}

#[derive(Clone, Serialize, Debug)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: u64,
    pub pages: u64,
    pub total: u64,
}

impl<T> Page<T> {
    pub(super) fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            number: self.number,
            pages: self.pages,
            total: self.total,
        }
    }

    pub(super) fn empty() -> Self {
        Page {
            items: vec![],
            number: 1,
            pages: 1,
            total: 0,
        }
    }
}

#[derive(Clone, Serialize, Debug)]
pub struct PostContext {
    pub post_id: Uuid,
    pub author: String,
    pub group: Option<Uuid>,
    pub posted: chrono::NaiveDateTime,
    pub content: String,
    pub has_image: bool,
}

impl PostContext {
    pub(super) fn from_model(post: posts::Model, author: Option<users::Model>) -> Self {
        Self {
            post_id: post.post_id,
            author: author.map(|u| u.username).unwrap_or_default(),
            group: post.group_id,
            posted: post.posted,
            content: post.content,
            has_image: post.image.is_some(),
        }
    }
}

#[derive(Clone, Serialize, Debug)]
pub struct GroupContext {
    pub group_id: Uuid,
    pub title: String,
    pub slug: String,
    pub description: String,
}

impl From<groups::Model> for GroupContext {
    fn from(group: groups::Model) -> Self {
        Self {
            group_id: group.group_id,
            title: group.title,
            slug: group.slug,
            description: group.description,
        }
    }
}

#[derive(Clone, Serialize, Debug)]
pub struct ProfileContext {
    pub username: String,
}

impl From<users::Model> for ProfileContext {
    fn from(user: users::Model) -> Self {
        Self {
            username: user.username,
        }
    }
}

#[derive(Clone, Serialize, Debug)]
pub struct CommentContext {
    pub comment_id: Uuid,
    pub author: String,
    pub posted: chrono::NaiveDateTime,
    pub content: String,
}

impl CommentContext {
    pub(super) fn from_model(comment: comments::Model, author: Option<users::Model>) -> Self {
        Self {
            comment_id: comment.comment_id,
            author: author.map(|u| u.username).unwrap_or_default(),
            posted: comment.posted,
            content: comment.content,
        }
    }
}

#[derive(Clone, Serialize, Debug)]
pub struct PostFormContext {
    pub text: String,
    pub group: Option<Uuid>,
    pub groups: Vec<GroupContext>,
    pub errors: ValidationErrors,
}

impl PostFormContext {
    pub(super) fn empty(groups: Vec<GroupContext>) -> Self {
        Self {
            text: String::new(),
            group: None,
            groups,
            errors: ValidationErrors::new(),
        }
    }

    pub(super) fn from_form(
        form: &PostFormData,
        groups: Vec<GroupContext>,
        errors: ValidationErrors,
    ) -> Self {
        Self {
            text: form.text.clone(),
            group: form.group,
            groups,
            errors,
        }
    }

    pub(super) fn from_post(post: &posts::Model, groups: Vec<GroupContext>) -> Self {
        Self {
            text: post.content.clone(),
            group: post.group_id,
            groups,
            errors: ValidationErrors::new(),
        }
    }
}

#[derive(Clone, Serialize, Debug)]
pub struct CommentFormContext {
    pub text: String,
    pub errors: ValidationErrors,
}

impl CommentFormContext {
    pub(super) fn empty() -> Self {
        Self {
            text: String::new(),
            errors: ValidationErrors::new(),
        }
    }
}
