use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create transfers table
        manager
            .create_table(
                Table::create()
                    .table(Transfers::Table)
                    .if_not_exists()
                    .col(pk_auto(Transfers::Id))
                    .col(integer(Transfers::PlayerId))
                    .col(integer(Transfers::IncomingTeamId))
                    .col(integer(Transfers::OutgoingTeamId))
                    .col(date(Transfers::TransferDate))
                    .col(integer(Transfers::Gameweek))
                    .col(integer(Transfers::AdditionalPoints).default(0))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_transfer_player")
                            .from(Transfers::Table, Transfers::PlayerId)
                            .to(Players::Table, Players::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_transfer_incoming_team")
                            .from(Transfers::Table, Transfers::IncomingTeamId)
                            .to(Teams::Table, Teams::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_transfer_outgoing_team")
                            .from(Transfers::Table, Transfers::OutgoingTeamId)
                            .to(Teams::Table, Teams::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create in_game_scorings table
        manager
            .create_table(
                Table::create()
                    .table(InGameScorings::Table)
                    .if_not_exists()
                    .col(pk_auto(InGameScorings::Id))
                    .col(string_len(InGameScorings::Name, 100))
                    .col(json_binary(InGameScorings::Rules))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(InGameScorings::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Transfers::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Players {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Teams {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Transfers {
    Table,
    Id,
    PlayerId,
    IncomingTeamId,
    OutgoingTeamId,
    TransferDate,
    Gameweek,
    AdditionalPoints,
}

#[derive(DeriveIden)]
enum InGameScorings {
    Table,
    Id,
    Name,
    Rules,
}
