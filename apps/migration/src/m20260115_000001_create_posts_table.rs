use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Posts::Table)
                    .if_not_exists()
                    .col(uuid(Posts::Id).primary_key())
                    .col(uuid(Posts::OwnerId))
                    .col(text(Posts::Content))
                    .col(timestamp_with_time_zone(Posts::ScheduledTime))
                    .col(string(Posts::Status).default("scheduled"))
                    .col(boolean(Posts::AiGenerated).default(false))
                    .col(big_integer(Posts::Likes).default(0))
                    .col(big_integer(Posts::Retweets).default(0))
                    .col(big_integer(Posts::Replies).default(0))
                    .col(big_integer(Posts::Impressions).default(0))
                    .col(timestamp_with_time_zone(Posts::CreatedAt))
                    .col(timestamp_with_time_zone_null(Posts::PostedAt))
                    .to_owned(),
            )
            .await?;

        // The due-item scan filters on status + scheduled_time every tick.
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_posts_status_scheduled_time")
                    .table(Posts::Table)
                    .col(Posts::Status)
                    .col(Posts::ScheduledTime)
                    .to_owned(),
            )
            .await?;

        // Owner-scoped listings and aggregation views.
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_posts_owner_id")
                    .table(Posts::Table)
                    .col(Posts::OwnerId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Posts::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Posts {
    Table,
    Id,
    OwnerId,
    Content,
    ScheduledTime,
    Status,
    AiGenerated,
    Likes,
    Retweets,
    Replies,
    Impressions,
    CreatedAt,
    PostedAt,
}
