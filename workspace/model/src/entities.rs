//! Root of the SeaORM entity modules for the fantasy league data model.

pub mod custom_user;
pub mod football_match;
pub mod in_game_scoring;
pub mod league;
pub mod matchup;
pub mod player;
pub mod position;
pub mod roster_requirement;
pub mod system_notif;
pub mod team;
pub mod team_membership;
pub mod team_player;
pub mod transfer;
pub mod user;
pub mod user_notif;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::custom_user::Entity as CustomUser;
    pub use super::football_match::Entity as FootballMatch;
    pub use super::in_game_scoring::Entity as InGameScoring;
    pub use super::league::Entity as League;
    pub use super::matchup::Entity as Matchup;
    pub use super::player::Entity as Player;
    pub use super::position::Entity as Position;
    pub use super::roster_requirement::Entity as RosterRequirement;
    pub use super::system_notif::Entity as SystemNotif;
    pub use super::team::Entity as Team;
    pub use super::team_membership::Entity as TeamMembership;
    pub use super::team_player::Entity as TeamPlayer;
    pub use super::transfer::Entity as Transfer;
    pub use super::user::Entity as User;
    pub use super::user_notif::Entity as UserNotif;
}

#[cfg(test)]
mod test {
    use migration::{Migrator, MigratorTrait};
    use rust_decimal::Decimal;
    use sea_orm::{
        ActiveModelTrait, ColumnTrait, ConnectionTrait, Database, DatabaseConnection, DbErr,
        EntityTrait, ModelTrait, PaginatorTrait, QueryFilter, Set,
    };

    use super::*;
    use crate::scoring::ScoringRules;
    use crate::statistics::{PlayerStatistics, StatValue};
    use position::PlayerPosition;
    use prelude::*;

    async fn setup_db() -> Result<DatabaseConnection, DbErr> {
        let db = Database::connect("sqlite::memory:").await?;
        db.execute_unprepared("PRAGMA foreign_keys = ON;").await?;
        Migrator::up(&db, None).await.expect("Migrations failed.");
        Ok(db)
    }

    async fn create_profile(db: &DatabaseConnection, username: &str) -> Result<custom_user::Model, DbErr> {
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

    async fn create_team(db: &DatabaseConnection, owner: &custom_user::Model, name: &str) -> Result<team::Model, DbErr> {
        team::ActiveModel {
            name: Set(name.to_string()),
            owner_id: Set(owner.id),
            formation: Set(team::Formation::FourFourTwo),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    async fn create_player(db: &DatabaseConnection, name: &str, position: &str) -> Result<player::Model, DbErr> {
        player::ActiveModel {
            name: Set(name.to_string()),
            position: Set(position.parse().expect("valid position")),
            current_form: Set(Decimal::new(750, 2)),
            price: Set(Decimal::new(1050, 2)),
            epl_team: Set(Some("Arsenal".to_string())),
            statistics: Set(PlayerStatistics::new()),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    async fn create_league(db: &DatabaseConnection, commissioner: &custom_user::Model) -> Result<league::Model, DbErr> {
        league::ActiveModel {
            name: Set("Sunday League".to_string()),
            commissioner_id: Set(commissioner.id),
            description: Set("Friends and rivals".to_string()),
            scoring_system: Set(ScoringRules::standard()),
            roster_size: Set(15),
            lineup_size: Set(11),
            season_duration: Set(league::DEFAULT_SEASON_DURATION),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    #[tokio::test]
    async fn test_positions_are_seeded() -> Result<(), DbErr> {
        let db = setup_db().await?;

        let rows = Position::find().all(&db).await?;
        assert_eq!(rows.len(), 4);
        for position in PlayerPosition::ALL {
            let row = position::Entity::find_by_position(&db, position).await?;
            assert_eq!(row.and_then(|row| row.player_position()), Some(position));
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_player_position_is_normalized() -> Result<(), DbErr> {
        let db = setup_db().await?;

        let player = create_player(&db, "Bukayo Saka", "midfielder").await?;
        let stored = Player::find_by_id(player.id).one(&db).await?.expect("player exists");

        assert_eq!(stored.position, PlayerPosition::Midfielder);
        assert_eq!(stored.to_string(), "Bukayo Saka");
        assert_eq!(stored.price, Decimal::new(1050, 2));
        Ok(())
    }

    #[tokio::test]
    async fn test_update_and_read_statistics() -> Result<(), DbErr> {
        let db = setup_db().await?;
        let player = create_player(&db, "Martin Odegaard", "MID").await?;

        assert_eq!(player.get_statistics("goals"), None);

        let player = player
            .update_stats(&db, [("goals", 4i64), ("assists", 6i64)].into_iter().collect())
            .await?;
        let player = player
            .update_stats(&db, [("goals", 5i64)].into_iter().collect())
            .await?;

        let stored = Player::find_by_id(player.id).one(&db).await?.expect("player exists");
        assert_eq!(stored.get_statistics("goals"), Some(&StatValue::Integer(5)));
        assert_eq!(stored.get_statistics("assists"), Some(&StatValue::Integer(6)));
        assert_eq!(stored.get_statistics("saves"), None);
        Ok(())
    }

    #[tokio::test]
    async fn test_team_membership_is_unique() -> Result<(), DbErr> {
        let db = setup_db().await?;
        let owner = create_profile(&db, "owner").await?;
        let team = create_team(&db, &owner, "Gunners").await?;
        let league = create_league(&db, &owner).await?;

        team_membership::Entity::join(&db, team.id, league.id)
            .await
            .expect("first join succeeds");
        let second = team_membership::Entity::join(&db, team.id, league.id).await;
        assert!(matches!(
            second,
            Err(team_membership::MembershipError::AlreadyMember { .. })
        ));

        let missing = team_membership::Entity::join(&db, team.id, league.id + 100).await;
        assert!(matches!(
            missing,
            Err(team_membership::MembershipError::UnknownReference { .. })
        ));

        let participants = league.participants(&db).await?;
        assert_eq!(participants.len(), 1);
        assert_eq!(team.leagues(&db).await?.len(), 1);

        assert!(team_membership::Entity::leave(&db, team.id, league.id).await?);
        assert!(!team_membership::Entity::leave(&db, team.id, league.id).await?);
        Ok(())
    }

    #[tokio::test]
    async fn test_roster_requirements_resolve_positions() -> Result<(), DbErr> {
        let db = setup_db().await?;
        let commissioner = create_profile(&db, "commish").await?;
        let league = create_league(&db, &commissioner).await?;

        let goalkeeper = position::Entity::find_by_position(&db, PlayerPosition::Goalkeeper)
            .await?
            .expect("seeded");
        roster_requirement::ActiveModel {
            league_id: Set(league.id),
            position_id: Set(goalkeeper.id),
            required_number: Set(2),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let requirements = league.roster_requirements(&db).await?;
        assert_eq!(requirements, vec![(PlayerPosition::Goalkeeper, 2)]);

        let stored = League::find_by_id(league.id).one(&db).await?.expect("league exists");
        assert_eq!(stored.scoring_system, ScoringRules::standard());
        Ok(())
    }

    #[tokio::test]
    async fn test_deleting_owner_cascades_to_teams() -> Result<(), DbErr> {
        let db = setup_db().await?;
        let owner = create_profile(&db, "leaving").await?;
        let team = create_team(&db, &owner, "Short Lived").await?;
        let player = create_player(&db, "Declan Rice", "Midfielder").await?;
        team_player::ActiveModel {
            team_id: Set(team.id),
            player_id: Set(player.id),
        }
        .insert(&db)
        .await?;
        assert_eq!(team.players(&db).await?.len(), 1);

        let identity = User::find_by_id(owner.user_id).one(&db).await?.expect("user exists");
        identity.delete(&db).await?;

        assert_eq!(CustomUser::find().count(&db).await?, 0);
        assert_eq!(Team::find().count(&db).await?, 0);
        assert_eq!(TeamPlayer::find().count(&db).await?, 0);
        assert_eq!(Player::find().count(&db).await?, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_user_notifications_are_marked_read_after_listing() -> Result<(), DbErr> {
        let db = setup_db().await?;
        let profile = create_profile(&db, "reader").await?;

        user_notif::ActiveModel {
            user_id: Set(profile.id),
            message: Set("Your trade was accepted".to_string()),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let first = user_notif::Entity::take_for_user(&db, profile.id).await?;
        assert_eq!(first.len(), 1);
        assert!(!first[0].is_read);

        let second = user_notif::Entity::take_for_user(&db, profile.id).await?;
        assert!(second[0].is_read);

        let broadcast = system_notif::ActiveModel {
            message: Set("Gameweek 1 deadline tomorrow".to_string()),
            ..Default::default()
        }
        .insert(&db)
        .await?;
        assert!(!broadcast.is_read);
        Ok(())
    }

    #[tokio::test]
    async fn test_notifications_created_after_listing_stay_unread() -> Result<(), DbErr> {
        let db = setup_db().await?;
        let profile = create_profile(&db, "latecomer").await?;

        let notify = |message: &'static str| user_notif::ActiveModel {
            user_id: Set(profile.id),
            message: Set(message.to_string()),
            ..Default::default()
        };

        notify("Lineup locked").insert(&db).await?;
        let shown = user_notif::Entity::find()
            .filter(user_notif::Column::UserId.eq(profile.id))
            .all(&db)
            .await?;
        let late = notify("Transfer window closes soon").insert(&db).await?;

        let marked = user_notif::Entity::mark_read(&db, &shown).await?;
        assert_eq!(marked, 1);

        let late = UserNotif::find_by_id(late.id).one(&db).await?.expect("notification exists");
        assert!(!late.is_read);
        assert_eq!(user_notif::Entity::mark_read(&db, &[]).await?, 0);
        Ok(())
    }
}
