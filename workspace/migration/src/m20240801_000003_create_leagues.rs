use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create leagues table, one league per commissioner
        manager
            .create_table(
                Table::create()
                    .table(Leagues::Table)
                    .if_not_exists()
                    .col(pk_auto(Leagues::Id))
                    .col(string_len(Leagues::Name, 100))
                    .col(integer(Leagues::CommissionerId).unique_key())
                    .col(text(Leagues::Description))
                    .col(json_binary(Leagues::ScoringSystem))
                    .col(integer(Leagues::RosterSize))
                    .col(integer(Leagues::LineupSize))
                    .col(integer(Leagues::SeasonDuration).default(38))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_league_commissioner")
                            .from(Leagues::Table, Leagues::CommissionerId)
                            .to(CustomUsers::Table, CustomUsers::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create team_memberships table
        manager
            .create_table(
                Table::create()
                    .table(TeamMemberships::Table)
                    .if_not_exists()
                    .col(pk_auto(TeamMemberships::Id))
                    .col(integer(TeamMemberships::TeamId))
                    .col(integer(TeamMemberships::LeagueId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_team_membership_team")
                            .from(TeamMemberships::Table, TeamMemberships::TeamId)
                            .to(Teams::Table, Teams::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_team_membership_league")
                            .from(TeamMemberships::Table, TeamMemberships::LeagueId)
                            .to(Leagues::Table, Leagues::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_team_membership_unique")
                    .table(TeamMemberships::Table)
                    .col(TeamMemberships::TeamId)
                    .col(TeamMemberships::LeagueId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Create positions catalog
        manager
            .create_table(
                Table::create()
                    .table(Positions::Table)
                    .if_not_exists()
                    .col(pk_auto(Positions::Id))
                    .col(string_len(Positions::Name, 15).unique_key())
                    .col(string_len(Positions::Abbreviation, 3).unique_key())
                    .to_owned(),
            )
            .await?;

        // Create roster_requirements table
        manager
            .create_table(
                Table::create()
                    .table(RosterRequirements::Table)
                    .if_not_exists()
                    .col(pk_auto(RosterRequirements::Id))
                    .col(integer(RosterRequirements::LeagueId))
                    .col(integer(RosterRequirements::PositionId))
                    .col(integer(RosterRequirements::RequiredNumber))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_roster_requirement_league")
                            .from(RosterRequirements::Table, RosterRequirements::LeagueId)
                            .to(Leagues::Table, Leagues::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_roster_requirement_position")
                            .from(RosterRequirements::Table, RosterRequirements::PositionId)
                            .to(Positions::Table, Positions::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_roster_requirement_unique")
                    .table(RosterRequirements::Table)
                    .col(RosterRequirements::LeagueId)
                    .col(RosterRequirements::PositionId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Create matchups table
        manager
            .create_table(
                Table::create()
                    .table(Matchups::Table)
                    .if_not_exists()
                    .col(pk_auto(Matchups::Id))
                    .col(integer(Matchups::LeagueId))
                    .col(integer(Matchups::WeekNumber))
                    .col(integer(Matchups::HomeTeamId))
                    .col(integer(Matchups::AwayTeamId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_matchup_league")
                            .from(Matchups::Table, Matchups::LeagueId)
                            .to(Leagues::Table, Leagues::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_matchup_home_team")
                            .from(Matchups::Table, Matchups::HomeTeamId)
                            .to(Teams::Table, Teams::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_matchup_away_team")
                            .from(Matchups::Table, Matchups::AwayTeamId)
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
        manager
            .drop_table(Table::drop().table(Matchups::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(RosterRequirements::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Positions::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(TeamMemberships::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Leagues::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum CustomUsers {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Teams {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Leagues {
    Table,
    Id,
    Name,
    CommissionerId,
    Description,
    ScoringSystem,
    RosterSize,
    LineupSize,
    SeasonDuration,
}

#[derive(DeriveIden)]
enum TeamMemberships {
    Table,
    Id,
    TeamId,
    LeagueId,
}

#[derive(DeriveIden)]
enum Positions {
    Table,
    Id,
    Name,
    Abbreviation,
}

#[derive(DeriveIden)]
enum RosterRequirements {
    Table,
    Id,
    LeagueId,
    PositionId,
    RequiredNumber,
}

#[derive(DeriveIden)]
enum Matchups {
    Table,
    Id,
    LeagueId,
    WeekNumber,
    HomeTeamId,
    AwayTeamId,
}
