//! Fixtures shared by the database-backed tests.

use migration::{Migrator, MigratorTrait};
use model::entities::position::PlayerPosition;
use model::entities::{custom_user, league, player, team, team_membership, team_player, user};
use model::scoring::ScoringRules;
use model::statistics::PlayerStatistics;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ConnectionTrait, Database, DatabaseConnection, DbErr, Set};

pub async fn setup_db() -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect("sqlite::memory:").await?;
    db.execute_unprepared("PRAGMA foreign_keys = ON;").await?;
    Migrator::up(&db, None).await?;
    Ok(db)
}

pub async fn create_profile(db: &DatabaseConnection, username: &str) -> Result<custom_user::Model, DbErr> {
    let user = user::ActiveModel {
        username: Set(username.to_string()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    custom_user::ActiveModel {
        user_id: Set(user.id),
        ..Default::default()
    }
    .insert(db)
    .await
}

pub async fn create_team(db: &DatabaseConnection, owner_id: i32, name: &str) -> Result<team::Model, DbErr> {
    team::ActiveModel {
        name: Set(name.to_string()),
        owner_id: Set(owner_id),
        formation: Set(team::Formation::FourFourTwo),
        ..Default::default()
    }
    .insert(db)
    .await
}

pub async fn create_player(db: &DatabaseConnection, name: &str, position: PlayerPosition) -> Result<player::Model, DbErr> {
    player::ActiveModel {
        name: Set(name.to_string()),
        position: Set(position),
        current_form: Set(Decimal::new(500, 2)),
        price: Set(Decimal::new(800, 2)),
        epl_team: Set(None),
        statistics: Set(PlayerStatistics::new()),
        ..Default::default()
    }
    .insert(db)
    .await
}

pub async fn create_league(
    db: &DatabaseConnection,
    commissioner_id: i32,
    roster_size: i32,
    season_duration: i32,
) -> Result<league::Model, DbErr> {
    league::ActiveModel {
        name: Set("Test League".to_string()),
        commissioner_id: Set(commissioner_id),
        description: Set(String::new()),
        scoring_system: Set(ScoringRules::standard()),
        roster_size: Set(roster_size),
        lineup_size: Set(roster_size),
        season_duration: Set(season_duration),
        ..Default::default()
    }
    .insert(db)
    .await
}

pub async fn enroll(db: &DatabaseConnection, team_id: i32, league_id: i32) -> Result<(), DbErr> {
    team_membership::ActiveModel {
        team_id: Set(team_id),
        league_id: Set(league_id),
        ..Default::default()
    }
    .insert(db)
    .await?;
    Ok(())
}

pub async fn sign(db: &DatabaseConnection, team_id: i32, player_id: i32) -> Result<(), DbErr> {
    team_player::ActiveModel {
        team_id: Set(team_id),
        player_id: Set(player_id),
    }
    .insert(db)
    .await?;
    Ok(())
}
