use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SystemNotifs::Table)
                    .if_not_exists()
                    .col(pk_auto(SystemNotifs::Id))
                    .col(text(SystemNotifs::Message))
                    .col(date_time(SystemNotifs::CreatedAt))
                    .col(boolean(SystemNotifs::IsRead).default(false))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(UserNotifs::Table)
                    .if_not_exists()
                    .col(pk_auto(UserNotifs::Id))
                    .col(integer(UserNotifs::UserId))
                    .col(text(UserNotifs::Message))
                    .col(date_time(UserNotifs::CreatedAt))
                    .col(boolean(UserNotifs::IsRead).default(false))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_notif_user")
                            .from(UserNotifs::Table, UserNotifs::UserId)
                            .to(CustomUsers::Table, CustomUsers::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_user_notif_user")
                    .table(UserNotifs::Table)
                    .col(UserNotifs::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserNotifs::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(SystemNotifs::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum CustomUsers {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum SystemNotifs {
    Table,
    Id,
    Message,
    CreatedAt,
    IsRead,
}

#[derive(DeriveIden)]
enum UserNotifs {
    Table,
    Id,
    UserId,
    Message,
    CreatedAt,
    IsRead,
}
