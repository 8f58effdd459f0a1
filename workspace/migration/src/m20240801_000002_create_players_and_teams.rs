use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create players table
        manager
            .create_table(
                Table::create()
                    .table(Players::Table)
                    .if_not_exists()
                    .col(pk_auto(Players::Id))
                    .col(string_len(Players::Name, 100))
                    .col(string_len(Players::Position, 15))
                    .col(decimal_len(Players::CurrentForm, 5, 2))
                    .col(decimal_len(Players::Price, 5, 2))
                    .col(string_len_null(Players::EplTeam, 100))
                    .col(json_binary(Players::Statistics))
                    .to_owned(),
            )
            .await?;

        // Create teams table
        manager
            .create_table(
                Table::create()
                    .table(Teams::Table)
                    .if_not_exists()
                    .col(pk_auto(Teams::Id))
                    .col(string_len(Teams::Name, 100))
                    .col(integer(Teams::OwnerId))
                    .col(string_len(Teams::Formation, 10))
                    .col(integer(Teams::WeeklyPts).default(0))
                    .col(integer(Teams::TotalPts).default(0))
                    .col(integer(Teams::PtsScoredAgainstWeekly).default(0))
                    .col(integer(Teams::PtsScoredAgainstSeason).default(0))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_team_owner")
                            .from(Teams::Table, Teams::OwnerId)
                            .to(CustomUsers::Table, CustomUsers::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create team_players table (join table)
        manager
            .create_table(
                Table::create()
                    .table(TeamPlayers::Table)
                    .if_not_exists()
                    .col(integer(TeamPlayers::TeamId))
                    .col(integer(TeamPlayers::PlayerId))
                    .primary_key(
                        Index::create()
                            .name("pk_team_players")
                            .col(TeamPlayers::TeamId)
                            .col(TeamPlayers::PlayerId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_team_players_team")
                            .from(TeamPlayers::Table, TeamPlayers::TeamId)
                            .to(Teams::Table, Teams::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_team_players_player")
                            .from(TeamPlayers::Table, TeamPlayers::PlayerId)
                            .to(Players::Table, Players::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create matches table
        manager
            .create_table(
                Table::create()
                    .table(Matches::Table)
                    .if_not_exists()
                    .col(pk_auto(Matches::Id))
                    .col(integer(Matches::HomeTeamId))
                    .col(integer(Matches::AwayTeamId))
                    .col(date(Matches::Date))
                    .col(date_time(Matches::DateTime))
                    .col(string_len(Matches::FinalScore, 10))
                    .col(integer(Matches::HomeTeamGoals))
                    .col(integer(Matches::AwayTeamGoals))
                    .col(integer(Matches::Cards))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_match_home_team")
                            .from(Matches::Table, Matches::HomeTeamId)
                            .to(Teams::Table, Teams::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_match_away_team")
                            .from(Matches::Table, Matches::AwayTeamId)
                            .to(Teams::Table, Teams::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop tables in reverse order to avoid foreign key constraints
        manager
            .drop_table(Table::drop().table(Matches::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(TeamPlayers::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Teams::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Players::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum CustomUsers {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Players {
    Table,
    Id,
    Name,
    Position,
    CurrentForm,
    Price,
    EplTeam,
    Statistics,
}

#[derive(DeriveIden)]
enum Teams {
    Table,
    Id,
    Name,
    OwnerId,
    Formation,
    WeeklyPts,
    TotalPts,
    PtsScoredAgainstWeekly,
    PtsScoredAgainstSeason,
}

#[derive(DeriveIden)]
enum TeamPlayers {
    Table,
    TeamId,
    PlayerId,
}

#[derive(DeriveIden)]
enum Matches {
    Table,
    Id,
    HomeTeamId,
    AwayTeamId,
    Date,
    DateTime,
    FinalScore,
    HomeTeamGoals,
    AwayTeamGoals,
    Cards,
}
