pub use sea_orm_migration::prelude::*;

mod m20240801_000001_create_users;
mod m20240801_000002_create_players_and_teams;
mod m20240801_000003_create_leagues;
mod m20240801_000004_create_transfers_and_scoring;
mod m20240801_000005_create_notifications;
mod m20240801_000006_seed_positions;
mod m20240901_000007_add_matchup_results;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240801_000001_create_users::Migration),
            Box::new(m20240801_000002_create_players_and_teams::Migration),
            Box::new(m20240801_000003_create_leagues::Migration),
            Box::new(m20240801_000004_create_transfers_and_scoring::Migration),
            Box::new(m20240801_000005_create_notifications::Migration),
            Box::new(m20240801_000006_seed_positions::Migration),
            Box::new(m20240901_000007_add_matchup_results::Migration),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{ConnectionTrait, Database};

    #[tokio::test]
    async fn test_migrations_apply_and_revert() -> Result<(), DbErr> {
        let db = Database::connect("sqlite::memory:").await?;
        db.execute_unprepared("PRAGMA foreign_keys = ON;").await?;

        Migrator::up(&db, None).await?;
        let manager = SchemaManager::new(&db);
        for table in [
            "users",
            "custom_users",
            "players",
            "teams",
            "team_players",
            "matches",
            "leagues",
            "team_memberships",
            "positions",
            "roster_requirements",
            "matchups",
            "transfers",
            "in_game_scorings",
            "system_notifs",
            "user_notifs",
        ] {
            assert!(manager.has_table(table).await?, "missing table {table}");
        }

        assert!(manager.has_column("matchups", "home_points").await?);
        assert!(manager.has_column("matchups", "away_points").await?);

        Migrator::down(&db, None).await?;
        assert!(!manager.has_table("players").await?);
        Ok(())
    }
}
