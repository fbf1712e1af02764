pub mod comments;
pub mod follows;
pub mod groups;
pub mod posts;
pub mod users;

pub mod prelude {
    pub use super::comments::Entity as Comments;
    pub use super::follows::Entity as Follows;
    pub use super::groups::Entity as Groups;
    pub use super::posts::Entity as Posts;
    pub use super::users::Entity as Users;
}
