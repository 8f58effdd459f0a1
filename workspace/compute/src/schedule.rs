use model::entities::{league, matchup};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set, TransactionTrait,
};
use tracing::{debug, info, instrument};

use crate::error::{ComputeError, Result};

/// One scheduled game: `home` hosts `away` in `week` (1-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fixture {
    pub week: i32,
    pub home: i32,
    pub away: i32,
}

/// Pairings for one full cycle, built with the circle method.
///
/// The first team stays fixed while the others rotate one slot per round.
/// With an odd number of teams a placeholder is added and whoever meets it
/// has a bye that round.
fn circle_rounds(team_ids: &[i32]) -> Vec<Vec<(i32, i32)>> {
    let mut slots: Vec<Option<i32>> = team_ids.iter().copied().map(Some).collect();
    if slots.len() % 2 == 1 {
        slots.push(None);
    }

    let slot_count = slots.len();
    let mut rounds = Vec::with_capacity(slot_count.saturating_sub(1));
    for round in 0..slot_count.saturating_sub(1) {
        let mut pairs = Vec::with_capacity(slot_count / 2);
        for i in 0..slot_count / 2 {
            if let (Some(first), Some(second)) = (slots[i], slots[slot_count - 1 - i]) {
                // Keep the fixed team from always hosting.
                if i == 0 && round % 2 == 1 {
                    pairs.push((second, first));
                } else {
                    pairs.push((first, second));
                }
            }
        }
        rounds.push(pairs);
        slots[1..].rotate_right(1);
    }
    rounds
}

/// Round-robin schedule over `team_ids` for `weeks` weeks.
///
/// Every pair meets exactly once per cycle of `n - 1` rounds (`n` rounded
/// up to even). Cycles repeat until the weeks run out, with home and away
/// swapped on every second cycle.
pub fn round_robin(team_ids: &[i32], weeks: u32) -> Vec<Fixture> {
    let rounds = circle_rounds(team_ids);
    if rounds.is_empty() {
        return Vec::new();
    }

    let mut fixtures = Vec::new();
    for week_index in 0..weeks as usize {
        let cycle = week_index / rounds.len();
        let week = week_index as i32 + 1;
        for &(home, away) in &rounds[week_index % rounds.len()] {
            let (home, away) = if cycle % 2 == 1 { (away, home) } else { (home, away) };
            fixtures.push(Fixture { week, home, away });
        }
    }
    fixtures
}

/// Replaces the league's matchups with a fresh round-robin schedule over
/// its current participants.
#[instrument(skip(db))]
pub async fn generate_league_schedule<C>(db: &C, league_id: i32) -> Result<Vec<matchup::Model>>
where
    C: ConnectionTrait + TransactionTrait,
{
    let league = league::Entity::find_by_id(league_id)
        .one(db)
        .await?
        .ok_or_else(|| ComputeError::not_found("League", league_id))?;

    let team_ids: Vec<i32> = league
        .participants(db)
        .await?
        .into_iter()
        .map(|team| team.id)
        .collect();
    if team_ids.len() < 2 {
        return Err(ComputeError::NotEnoughParticipants {
            league_id,
            count: team_ids.len(),
        });
    }

    let weeks = u32::try_from(league.season_duration).unwrap_or(0);
    let fixtures = round_robin(&team_ids, weeks);
    debug!(
        "Scheduling {} fixtures for {} teams over {} weeks",
        fixtures.len(),
        team_ids.len(),
        weeks
    );

    let txn = db.begin().await?;
    let removed = matchup::Entity::delete_many()
        .filter(matchup::Column::LeagueId.eq(league_id))
        .exec(&txn)
        .await?;
    if removed.rows_affected > 0 {
        debug!("Removed {} existing matchups", removed.rows_affected);
    }

    let mut created = Vec::with_capacity(fixtures.len());
    for fixture in fixtures {
        let model = matchup::ActiveModel {
            league_id: Set(league_id),
            week_number: Set(fixture.week),
            home_team_id: Set(fixture.home),
            away_team_id: Set(fixture.away),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        created.push(model);
    }
    txn.commit().await?;

    info!("Generated {} matchups for league {}", created.len(), league_id);
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;
    use std::collections::{BTreeSet, HashSet};

    fn pair(fixture: &Fixture) -> (i32, i32) {
        (fixture.home.min(fixture.away), fixture.home.max(fixture.away))
    }

    fn assert_no_double_booking(fixtures: &[Fixture]) {
        let mut seen = HashSet::new();
        for fixture in fixtures {
            assert!(seen.insert((fixture.week, fixture.home)), "{:?}", fixture);
            assert!(seen.insert((fixture.week, fixture.away)), "{:?}", fixture);
        }
    }

    #[test]
    fn test_even_count_meets_every_pair_once_per_cycle() {
        let teams = [1, 2, 3, 4];
        let fixtures = round_robin(&teams, 3);

        assert_eq!(fixtures.len(), 6);
        let pairs: BTreeSet<_> = fixtures.iter().map(pair).collect();
        assert_eq!(pairs.len(), 6);
        assert_no_double_booking(&fixtures);
    }

    #[test]
    fn test_odd_count_gives_each_team_one_bye_per_cycle() {
        let teams = [10, 20, 30, 40, 50];
        let fixtures = round_robin(&teams, 5);

        assert_eq!(fixtures.len(), 10);
        assert_no_double_booking(&fixtures);
        for week in 1..=5 {
            assert_eq!(fixtures.iter().filter(|f| f.week == week).count(), 2);
        }
        let pairs: BTreeSet<_> = fixtures.iter().map(pair).collect();
        assert_eq!(pairs.len(), 10);
    }

    #[test]
    fn test_second_cycle_swaps_home_and_away() {
        let teams = [1, 2, 3, 4];
        let fixtures = round_robin(&teams, 6);

        let (first_cycle, second_cycle) = fixtures.split_at(6);
        for (first, second) in first_cycle.iter().zip(second_cycle) {
            assert_eq!(second.week, first.week + 3);
            assert_eq!((second.home, second.away), (first.away, first.home));
        }
    }

    #[test]
    fn test_too_few_teams_yield_nothing() {
        assert!(round_robin(&[], 10).is_empty());
        assert!(round_robin(&[1], 10).is_empty());
    }

    #[tokio::test]
    async fn test_generate_replaces_existing_schedule() -> Result<()> {
        let db = testing::setup_db().await?;
        let owner = testing::create_profile(&db, "commish").await?;
        let league = testing::create_league(&db, owner.id, 15, 4).await?;
        for name in ["A", "B", "C"] {
            let team = testing::create_team(&db, owner.id, name).await?;
            testing::enroll(&db, team.id, league.id).await?;
        }

        let first = generate_league_schedule(&db, league.id).await?;
        // Three teams: one game per week, four weeks.
        assert_eq!(first.len(), 4);

        let second = generate_league_schedule(&db, league.id).await?;
        assert_eq!(second.len(), 4);
        assert_eq!(league.matchups(&db).await?.len(), 4);
        Ok(())
    }

    #[tokio::test]
    async fn test_generate_needs_two_participants() -> Result<()> {
        let db = testing::setup_db().await?;
        let owner = testing::create_profile(&db, "solo").await?;
        let league = testing::create_league(&db, owner.id, 15, 38).await?;
        let team = testing::create_team(&db, owner.id, "Only Team").await?;
        testing::enroll(&db, team.id, league.id).await?;

        let result = generate_league_schedule(&db, league.id).await;
        assert!(matches!(
            result,
            Err(ComputeError::NotEnoughParticipants { count: 1, .. })
        ));
        Ok(())
    }
}
