use std::collections::BTreeMap;

use model::entities::position::PlayerPosition;
use model::entities::{league, player, team, team_membership, team_player};
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};
use tracing::{debug, info, instrument, warn};

use crate::error::{ComputeError, Result};

/// Roster limits a single league imposes on its teams.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterRules {
    pub league_id: i32,
    pub roster_size: i32,
    /// Positions without an entry are unrestricted.
    pub requirements: BTreeMap<PlayerPosition, i32>,
}

impl RosterRules {
    pub async fn load<C: ConnectionTrait>(db: &C, league: &league::Model) -> Result<Self> {
        let requirements = league.roster_requirements(db).await?.into_iter().collect();
        Ok(Self {
            league_id: league.id,
            roster_size: league.roster_size,
            requirements,
        })
    }

    /// Checks whether a player at `position` fits on a roster that
    /// currently holds `roster`.
    pub fn check_addition(&self, team_id: i32, roster: &[PlayerPosition], position: PlayerPosition) -> Result<()> {
        if roster.len() as i64 >= i64::from(self.roster_size) {
            return Err(ComputeError::RosterFull {
                team_id,
                league_id: self.league_id,
                roster_size: self.roster_size,
            });
        }

        if let Some(&required) = self.requirements.get(&position) {
            let at_position = roster.iter().filter(|&&held| held == position).count();
            if at_position as i64 >= i64::from(required) {
                return Err(ComputeError::PositionLimitReached {
                    league_id: self.league_id,
                    position,
                    required,
                });
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionCount {
    pub position: PlayerPosition,
    pub count: usize,
    pub required: Option<i32>,
}

/// How a team's roster measures up against one league's rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterStatus {
    pub team_id: i32,
    pub league_id: i32,
    pub roster_size: i32,
    pub player_count: usize,
    pub positions: Vec<PositionCount>,
    /// Every position requirement is met.
    pub complete: bool,
}

impl RosterStatus {
    pub fn evaluate(team_id: i32, rules: &RosterRules, roster: &[PlayerPosition]) -> Self {
        let positions: Vec<PositionCount> = PlayerPosition::ALL
            .iter()
            .map(|&position| PositionCount {
                position,
                count: roster.iter().filter(|&&held| held == position).count(),
                required: rules.requirements.get(&position).copied(),
            })
            .collect();

        let complete = positions.iter().all(|entry| match entry.required {
            Some(required) => entry.count as i64 >= i64::from(required),
            None => true,
        });

        Self {
            team_id,
            league_id: rules.league_id,
            roster_size: rules.roster_size,
            player_count: roster.len(),
            positions,
            complete,
        }
    }
}

pub(crate) async fn roster_positions<C: ConnectionTrait>(db: &C, team: &team::Model) -> Result<Vec<PlayerPosition>> {
    Ok(team
        .players(db)
        .await?
        .into_iter()
        .map(|player| player.position)
        .collect())
}

/// Puts a player on a team's roster after checking the rules of every
/// league the team plays in.
#[instrument(skip(db))]
pub async fn add_player_to_team<C: ConnectionTrait>(db: &C, team_id: i32, player_id: i32) -> Result<team_player::Model> {
    let team = team::Entity::find_by_id(team_id)
        .one(db)
        .await?
        .ok_or_else(|| ComputeError::not_found("Team", team_id))?;
    let player = player::Entity::find_by_id(player_id)
        .one(db)
        .await?
        .ok_or_else(|| ComputeError::not_found("Player", player_id))?;

    if team_player::Entity::find_by_id((team_id, player_id))
        .one(db)
        .await?
        .is_some()
    {
        warn!("Player {} is already on team {}", player_id, team_id);
        return Err(ComputeError::AlreadyOnRoster { player_id, team_id });
    }

    let roster = roster_positions(db, &team).await?;
    for league in team.leagues(db).await? {
        let rules = RosterRules::load(db, &league).await?;
        debug!(
            "Checking {} against league {} (roster size {}, {} requirement(s))",
            player.position,
            league.id,
            rules.roster_size,
            rules.requirements.len()
        );
        rules.check_addition(team_id, &roster, player.position)?;
    }

    let link = team_player::ActiveModel {
        team_id: Set(team_id),
        player_id: Set(player_id),
    }
    .insert(db)
    .await?;

    info!("Added player {} ({}) to team {}", player.id, player.position, team.id);
    Ok(link)
}

/// Roster status of a team measured against one of its leagues.
#[instrument(skip(db))]
pub async fn roster_status<C: ConnectionTrait>(db: &C, team_id: i32, league_id: i32) -> Result<RosterStatus> {
    let team = team::Entity::find_by_id(team_id)
        .one(db)
        .await?
        .ok_or_else(|| ComputeError::not_found("Team", team_id))?;
    let league = league::Entity::find_by_id(league_id)
        .one(db)
        .await?
        .ok_or_else(|| ComputeError::not_found("League", league_id))?;

    let membership = team_membership::Entity::find()
        .filter(team_membership::Column::TeamId.eq(team_id))
        .filter(team_membership::Column::LeagueId.eq(league_id))
        .one(db)
        .await?;
    if membership.is_none() {
        return Err(ComputeError::NotMember { team_id, league_id });
    }

    let rules = RosterRules::load(db, &league).await?;
    let roster = roster_positions(db, &team).await?;
    Ok(RosterStatus::evaluate(team_id, &rules, &roster))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;
    use model::entities::{position, roster_requirement};

    fn rules(roster_size: i32, requirements: &[(PlayerPosition, i32)]) -> RosterRules {
        RosterRules {
            league_id: 1,
            roster_size,
            requirements: requirements.iter().copied().collect(),
        }
    }

    #[test]
    fn test_check_addition_enforces_roster_size() {
        let rules = rules(2, &[]);
        let roster = [PlayerPosition::Forward, PlayerPosition::Defender];

        let result = rules.check_addition(7, &roster, PlayerPosition::Midfielder);
        assert!(matches!(result, Err(ComputeError::RosterFull { roster_size: 2, .. })));
    }

    #[test]
    fn test_check_addition_enforces_position_requirements() {
        let rules = rules(15, &[(PlayerPosition::Goalkeeper, 1)]);
        let roster = [PlayerPosition::Goalkeeper];

        let result = rules.check_addition(7, &roster, PlayerPosition::Goalkeeper);
        assert!(matches!(
            result,
            Err(ComputeError::PositionLimitReached {
                position: PlayerPosition::Goalkeeper,
                required: 1,
                ..
            })
        ));
        // Positions without a requirement are unrestricted.
        assert!(rules.check_addition(7, &roster, PlayerPosition::Forward).is_ok());
    }

    #[test]
    fn test_status_reports_completion() {
        let rules = rules(3, &[(PlayerPosition::Goalkeeper, 1), (PlayerPosition::Defender, 2)]);

        let partial = RosterStatus::evaluate(1, &rules, &[PlayerPosition::Goalkeeper, PlayerPosition::Defender]);
        assert!(!partial.complete);
        assert_eq!(partial.player_count, 2);

        let full = RosterStatus::evaluate(
            1,
            &rules,
            &[PlayerPosition::Goalkeeper, PlayerPosition::Defender, PlayerPosition::Defender],
        );
        assert!(full.complete);
        let defenders = full
            .positions
            .iter()
            .find(|entry| entry.position == PlayerPosition::Defender)
            .expect("defender row");
        assert_eq!(defenders.count, 2);
        assert_eq!(defenders.required, Some(2));
    }

    #[tokio::test]
    async fn test_add_player_respects_league_rules() -> Result<()> {
        let db = testing::setup_db().await?;
        let owner = testing::create_profile(&db, "owner").await?;
        let team = testing::create_team(&db, owner.id, "Keepers United").await?;
        let league = testing::create_league(&db, owner.id, 15, 38).await?;
        testing::enroll(&db, team.id, league.id).await?;

        let goalkeeper_row = position::Entity::find_by_position(&db, PlayerPosition::Goalkeeper)
            .await?
            .expect("seeded position");
        roster_requirement::ActiveModel {
            league_id: Set(league.id),
            position_id: Set(goalkeeper_row.id),
            required_number: Set(1),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let first = testing::create_player(&db, "David Raya", PlayerPosition::Goalkeeper).await?;
        let second = testing::create_player(&db, "Aaron Ramsdale", PlayerPosition::Goalkeeper).await?;

        add_player_to_team(&db, team.id, first.id).await?;
        let duplicate = add_player_to_team(&db, team.id, first.id).await;
        assert!(matches!(duplicate, Err(ComputeError::AlreadyOnRoster { .. })));

        let over_limit = add_player_to_team(&db, team.id, second.id).await;
        assert!(matches!(over_limit, Err(ComputeError::PositionLimitReached { .. })));

        let status = roster_status(&db, team.id, league.id).await?;
        assert!(status.complete);
        assert_eq!(status.player_count, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_roster_status_requires_membership() -> Result<()> {
        let db = testing::setup_db().await?;
        let owner = testing::create_profile(&db, "outsider").await?;
        let team = testing::create_team(&db, owner.id, "Lonely FC").await?;
        let league = testing::create_league(&db, owner.id, 15, 38).await?;

        let result = roster_status(&db, team.id, league.id).await;
        assert!(matches!(result, Err(ComputeError::NotMember { .. })));
        Ok(())
    }
}
