use model::entities::team::ResultError;
use model::entities::{matchup, team};
use sea_orm::{ActiveModelTrait, EntityTrait, QuerySelect, Set, TransactionTrait};
use tracing::{debug, info, instrument};

use crate::error::{ComputeError, Result};

/// A matchup and both of its teams after a result was applied.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchupOutcome {
    pub matchup: matchup::Model,
    pub home: team::Model,
    pub away: team::Model,
}

impl From<ResultError> for ComputeError {
    fn from(error: ResultError) -> Self {
        match error {
            ResultError::Overflow { team_id } => ComputeError::PointsOutOfRange { team_id },
            ResultError::Database(db_error) => ComputeError::Database(db_error),
        }
    }
}

/// Stores the result of a matchup and applies it to both teams.
///
/// Posting a result for a matchup that already has one replaces it: the
/// earlier points are taken back out of the season totals. The matchup and
/// both teams are read and written inside one transaction, with row locks
/// on backends that support them.
#[instrument(skip(db))]
pub async fn record_matchup_result<C>(
    db: &C,
    matchup_id: i32,
    home_points: i32,
    away_points: i32,
) -> Result<MatchupOutcome>
where
    C: TransactionTrait,
{
    let txn = db.begin().await?;

    let fixture = matchup::Entity::find_by_id(matchup_id)
        .lock_exclusive()
        .one(&txn)
        .await?
        .ok_or_else(|| ComputeError::not_found("Matchup", matchup_id))?;
    let home = team::Entity::find_by_id(fixture.home_team_id)
        .lock_exclusive()
        .one(&txn)
        .await?
        .ok_or_else(|| ComputeError::not_found("Team", fixture.home_team_id))?;
    let away = team::Entity::find_by_id(fixture.away_team_id)
        .lock_exclusive()
        .one(&txn)
        .await?
        .ok_or_else(|| ComputeError::not_found("Team", fixture.away_team_id))?;

    let previous = fixture.result();
    debug!(
        "Recording {}-{} for {} vs {} in week {} (previous result: {:?})",
        home_points, away_points, home, away, fixture.week_number, previous
    );

    let home = home.record_result(&txn, home_points, away_points, previous).await?;
    let away = away
        .record_result(&txn, away_points, home_points, previous.map(|(home, away)| (away, home)))
        .await?;

    let mut active: matchup::ActiveModel = fixture.into();
    active.home_points = Set(Some(home_points));
    active.away_points = Set(Some(away_points));
    let matchup = active.update(&txn).await?;

    txn.commit().await?;
    info!("Result of matchup {} recorded", matchup.id);

    Ok(MatchupOutcome { matchup, home, away })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;

    async fn fixture_between(db: &sea_orm::DatabaseConnection) -> Result<(matchup::Model, i32, i32)> {
        let owner = testing::create_profile(db, "owner").await?;
        let home = testing::create_team(db, owner.id, "Hosts").await?;
        let away = testing::create_team(db, owner.id, "Visitors").await?;
        let league = testing::create_league(db, owner.id, 15, 1).await?;
        let fixture = matchup::ActiveModel {
            league_id: Set(league.id),
            week_number: Set(1),
            home_team_id: Set(home.id),
            away_team_id: Set(away.id),
            ..Default::default()
        }
        .insert(db)
        .await?;
        Ok((fixture, home.id, away.id))
    }

    #[tokio::test]
    async fn test_reposting_a_result_does_not_double_count() -> Result<()> {
        let db = testing::setup_db().await?;
        let (fixture, _, _) = fixture_between(&db).await?;

        record_matchup_result(&db, fixture.id, 10, 7).await?;
        let outcome = record_matchup_result(&db, fixture.id, 10, 7).await?;

        assert_eq!(outcome.matchup.result(), Some((10, 7)));
        assert_eq!(outcome.home.total_pts, 10);
        assert_eq!(outcome.home.pts_scored_against_season, 7);
        assert_eq!(outcome.away.total_pts, 7);
        assert_eq!(outcome.away.pts_scored_against_season, 10);
        Ok(())
    }

    #[tokio::test]
    async fn test_corrected_result_replaces_the_earlier_one() -> Result<()> {
        let db = testing::setup_db().await?;
        let (fixture, home_id, _) = fixture_between(&db).await?;

        record_matchup_result(&db, fixture.id, 10, 7).await?;
        let outcome = record_matchup_result(&db, fixture.id, 4, 9).await?;

        assert_eq!(outcome.home.id, home_id);
        assert_eq!(outcome.home.weekly_pts, 4);
        assert_eq!(outcome.home.total_pts, 4);
        assert_eq!(outcome.home.pts_scored_against_season, 9);
        assert_eq!(outcome.away.total_pts, 9);
        assert_eq!(outcome.away.pts_scored_against_season, 4);
        Ok(())
    }

    #[tokio::test]
    async fn test_overflowing_totals_are_rejected_without_writes() -> Result<()> {
        let db = testing::setup_db().await?;
        let (fixture, home_id, _) = fixture_between(&db).await?;

        let home = team::Entity::find_by_id(home_id)
            .one(&db)
            .await?
            .ok_or_else(|| ComputeError::not_found("Team", home_id))?;
        let mut active: team::ActiveModel = home.into();
        active.total_pts = Set(i32::MAX);
        active.update(&db).await?;

        let result = record_matchup_result(&db, fixture.id, 1, 0).await;
        assert!(matches!(result, Err(ComputeError::PointsOutOfRange { team_id }) if team_id == home_id));

        let stored = matchup::Entity::find_by_id(fixture.id)
            .one(&db)
            .await?
            .ok_or_else(|| ComputeError::not_found("Matchup", fixture.id))?;
        assert_eq!(stored.result(), None);
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_matchup_is_not_found() -> Result<()> {
        let db = testing::setup_db().await?;
        let result = record_matchup_result(&db, 404, 1, 0).await;
        assert!(matches!(result, Err(ComputeError::NotFound { entity: "Matchup", id: 404 })));
        Ok(())
    }
}
