mod m00000000_000001_create_users_table;
mod m00000000_000002_create_groups_table;
mod m00000000_000003_create_posts_table;
mod m00000000_000004_create_comments_table;
mod m00000000_000005_create_follows_table;
use sea_orm_migration::prelude::*;
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m00000000_000001_create_users_table::Migration {}),
            Box::new(m00000000_000002_create_groups_table::Migration {}),
            Box::new(m00000000_000003_create_posts_table::Migration {}),
            Box::new(m00000000_000004_create_comments_table::Migration {}),
            Box::new(m00000000_000005_create_follows_table::Migration {}),
        ]
    }
}
