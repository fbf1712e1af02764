use super::m00000000_000001_create_users_table::Users;
use sea_orm_migration::prelude::*;
pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m00000000_000005_create_follows_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .if_not_exists()
                    .table(Follows::Table)
                    .col(ColumnDef::new(Follows::FollowId).uuid().primary_key())
                    .col(ColumnDef::new(Follows::UserId).uuid().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-follows-user_id")
                            .from(Follows::Table, Follows::UserId)
                            .to(Users::Table, Users::UserId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .col(ColumnDef::new(Follows::AuthorId).uuid().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-follows-author_id")
                            .from(Follows::Table, Follows::AuthorId)
                            .to(Users::Table, Users::UserId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;
        // one relation per (follower, author) pair
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx-follows-user_id-author_id")
                    .table(Follows::Table)
                    .col(Follows::UserId)
                    .col(Follows::AuthorId)
                    .unique()
                    .to_owned(),
            )
            .await
    }
    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Follows::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Follows {
    Table,
    FollowId,
    UserId,
    AuthorId,
}
