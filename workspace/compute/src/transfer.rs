use std::collections::BTreeSet;

use model::entities::transfer::{self, NewTransfer};
use model::entities::{player, team, team_player};
use sea_orm::{ActiveModelTrait, EntityTrait, Set, TransactionTrait};
use tracing::{debug, info, instrument};

use crate::error::{ComputeError, Result};
use crate::roster::{RosterRules, roster_positions};

/// Moves a player between two teams of the same league and records the
/// transfer, all in one database transaction.
///
/// The incoming roster is checked against every league the incoming team
/// plays in, exactly as a direct signing would be.
#[instrument(skip(db))]
pub async fn execute_transfer<C>(db: &C, request: NewTransfer) -> Result<transfer::Model>
where
    C: TransactionTrait,
{
    if request.outgoing_team_id == request.incoming_team_id {
        return Err(ComputeError::SameTeamTransfer {
            team_id: request.incoming_team_id,
        });
    }

    let txn = db.begin().await?;

    let player = player::Entity::find_by_id(request.player_id)
        .one(&txn)
        .await?
        .ok_or_else(|| ComputeError::not_found("Player", request.player_id))?;
    let outgoing = team::Entity::find_by_id(request.outgoing_team_id)
        .one(&txn)
        .await?
        .ok_or_else(|| ComputeError::not_found("Team", request.outgoing_team_id))?;
    let incoming = team::Entity::find_by_id(request.incoming_team_id)
        .one(&txn)
        .await?
        .ok_or_else(|| ComputeError::not_found("Team", request.incoming_team_id))?;

    if team_player::Entity::find_by_id((outgoing.id, player.id))
        .one(&txn)
        .await?
        .is_none()
    {
        return Err(ComputeError::NotOnOutgoingTeam {
            player_id: player.id,
            team_id: outgoing.id,
        });
    }
    if team_player::Entity::find_by_id((incoming.id, player.id))
        .one(&txn)
        .await?
        .is_some()
    {
        return Err(ComputeError::AlreadyOnRoster {
            player_id: player.id,
            team_id: incoming.id,
        });
    }

    let outgoing_leagues: BTreeSet<i32> = outgoing.leagues(&txn).await?.into_iter().map(|league| league.id).collect();
    let incoming_leagues = incoming.leagues(&txn).await?;
    if !incoming_leagues.iter().any(|league| outgoing_leagues.contains(&league.id)) {
        return Err(ComputeError::NoSharedLeague {
            outgoing_team_id: outgoing.id,
            incoming_team_id: incoming.id,
        });
    }

    let roster = roster_positions(&txn, &incoming).await?;
    for league in &incoming_leagues {
        let rules = RosterRules::load(&txn, league).await?;
        rules.check_addition(incoming.id, &roster, player.position)?;
    }

    debug!(
        "Moving player {} from team {} to team {}",
        player.id, outgoing.id, incoming.id
    );
    team_player::Entity::delete_by_id((outgoing.id, player.id))
        .exec(&txn)
        .await?;
    team_player::ActiveModel {
        team_id: Set(incoming.id),
        player_id: Set(player.id),
    }
    .insert(&txn)
    .await?;

    let record = transfer::ActiveModel {
        player_id: Set(player.id),
        incoming_team_id: Set(incoming.id),
        outgoing_team_id: Set(outgoing.id),
        transfer_date: Set(request.transfer_date),
        gameweek: Set(request.gameweek),
        additional_points: Set(request.additional_points),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;
    info!("Recorded transfer {} for player {}", record.id, record.player_id);

    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;
    use chrono::NaiveDate;
    use model::entities::position::PlayerPosition;
    use sea_orm::{EntityTrait, PaginatorTrait};

    fn request(player_id: i32, outgoing_team_id: i32, incoming_team_id: i32) -> NewTransfer {
        NewTransfer {
            player_id,
            outgoing_team_id,
            incoming_team_id,
            transfer_date: NaiveDate::from_ymd_opt(2024, 8, 30).expect("valid date"),
            gameweek: 3,
            additional_points: 0,
        }
    }

    #[tokio::test]
    async fn test_transfer_moves_player_between_teams() -> Result<()> {
        let db = testing::setup_db().await?;
        let owner = testing::create_profile(&db, "manager").await?;
        let from = testing::create_team(&db, owner.id, "Gunners").await?;
        let to = testing::create_team(&db, owner.id, "Blues").await?;
        let league = testing::create_league(&db, owner.id, 15, 38).await?;
        testing::enroll(&db, from.id, league.id).await?;
        testing::enroll(&db, to.id, league.id).await?;
        let player = testing::create_player(&db, "Kai Havertz", PlayerPosition::Forward).await?;
        testing::sign(&db, from.id, player.id).await?;

        let record = execute_transfer(&db, request(player.id, from.id, to.id)).await?;
        assert_eq!(
            record.summary(&player, &from, &to),
            "Kai Havertz transferred from Gunners to Blues on 2024-08-30"
        );
        assert!(from.players(&db).await?.is_empty());
        assert_eq!(to.players(&db).await?.len(), 1);

        let repeated = execute_transfer(&db, request(player.id, from.id, to.id)).await;
        assert!(matches!(repeated, Err(ComputeError::NotOnOutgoingTeam { .. })));
        assert_eq!(transfer::Entity::find().count(&db).await?, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_transfer_respects_incoming_roster_size() -> Result<()> {
        let db = testing::setup_db().await?;
        let owner = testing::create_profile(&db, "manager").await?;
        let from = testing::create_team(&db, owner.id, "Sellers").await?;
        let to = testing::create_team(&db, owner.id, "Full House").await?;
        let league = testing::create_league(&db, owner.id, 1, 38).await?;
        testing::enroll(&db, from.id, league.id).await?;
        testing::enroll(&db, to.id, league.id).await?;

        let resident = testing::create_player(&db, "Resident", PlayerPosition::Defender).await?;
        let moving = testing::create_player(&db, "Mover", PlayerPosition::Midfielder).await?;
        testing::sign(&db, to.id, resident.id).await?;
        testing::sign(&db, from.id, moving.id).await?;

        let result = execute_transfer(&db, request(moving.id, from.id, to.id)).await;
        assert!(matches!(result, Err(ComputeError::RosterFull { roster_size: 1, .. })));

        // Nothing moved.
        assert_eq!(to.players(&db).await?.len(), 1);
        assert_eq!(from.players(&db).await?.len(), 1);
        assert_eq!(transfer::Entity::find().count(&db).await?, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_transfer_requires_a_shared_league() -> Result<()> {
        let db = testing::setup_db().await?;
        let owner = testing::create_profile(&db, "manager").await?;
        let other = testing::create_profile(&db, "rival").await?;
        let from = testing::create_team(&db, owner.id, "North").await?;
        let to = testing::create_team(&db, owner.id, "South").await?;
        let north_league = testing::create_league(&db, owner.id, 15, 38).await?;
        let south_league = testing::create_league(&db, other.id, 15, 38).await?;
        testing::enroll(&db, from.id, north_league.id).await?;
        testing::enroll(&db, to.id, south_league.id).await?;
        let player = testing::create_player(&db, "Wanderer", PlayerPosition::Forward).await?;
        testing::sign(&db, from.id, player.id).await?;

        let result = execute_transfer(&db, request(player.id, from.id, to.id)).await;
        assert!(matches!(result, Err(ComputeError::NoSharedLeague { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_transfer_to_same_team_is_rejected() -> Result<()> {
        let db = testing::setup_db().await?;
        let result = execute_transfer(&db, request(1, 4, 4)).await;
        assert!(matches!(result, Err(ComputeError::SameTeamTransfer { team_id: 4 })));
        Ok(())
    }
}
