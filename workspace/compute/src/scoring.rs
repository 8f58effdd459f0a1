use model::entities::player;
use model::entities::position::PlayerPosition;
use model::scoring::{ScoringEvent, ScoringRules};
use sea_orm::{ConnectionTrait, EntityTrait};
use tracing::{debug, instrument, trace};

use crate::error::{ComputeError, Result};

/// What a single player did in one match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerEvents {
    pub goals: u32,
    pub assists: u32,
    pub clean_sheet: bool,
    pub yellow_cards: u32,
    pub red_cards: u32,
}

impl PlayerEvents {
    /// How many times `event` happened. A clean sheet counts once at most.
    pub fn count(&self, event: ScoringEvent) -> u32 {
        match event {
            ScoringEvent::Goal => self.goals,
            ScoringEvent::Assist => self.assists,
            ScoringEvent::CleanSheet => u32::from(self.clean_sheet),
            ScoringEvent::YellowCard => self.yellow_cards,
            ScoringEvent::RedCard => self.red_cards,
        }
    }
}

/// Points earned from one kind of event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventPoints {
    pub event: ScoringEvent,
    pub count: u32,
    pub points: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerScore {
    pub player_id: i32,
    pub position: PlayerPosition,
    pub total: i64,
    pub breakdown: Vec<EventPoints>,
}

/// Applies `rules` to the events of a player at `position`.
///
/// Every event kind appears in the breakdown, including those that did not
/// happen, so callers can render a full table. Totals may be negative.
pub fn score_events(rules: &ScoringRules, position: PlayerPosition, events: &PlayerEvents) -> (i64, Vec<EventPoints>) {
    let breakdown: Vec<EventPoints> = ScoringEvent::ALL
        .iter()
        .map(|&event| {
            let count = events.count(event);
            let points = i64::from(count) * i64::from(rules.points_for(event, position));
            trace!("{} x {} at {} = {}", count, event, position, points);
            EventPoints { event, count, points }
        })
        .collect();

    let total = breakdown.iter().map(|entry| entry.points).sum();
    (total, breakdown)
}

/// Looks up the player and scores their events under `rules`.
#[instrument(skip(db, rules))]
pub async fn score_player<C: ConnectionTrait>(
    db: &C,
    rules: &ScoringRules,
    player_id: i32,
    events: PlayerEvents,
) -> Result<PlayerScore> {
    let player = player::Entity::find_by_id(player_id)
        .one(db)
        .await?
        .ok_or_else(|| ComputeError::not_found("Player", player_id))?;

    let (total, breakdown) = score_events(rules, player.position, &events);
    debug!("Player {} ({}) scored {} points", player.id, player.position, total);

    Ok(PlayerScore {
        player_id: player.id,
        position: player.position,
        total,
        breakdown,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;

    #[test]
    fn test_score_events_sums_each_kind() {
        let rules = ScoringRules::standard();
        let events = PlayerEvents {
            goals: 2,
            assists: 1,
            clean_sheet: true,
            yellow_cards: 1,
            red_cards: 0,
        };

        let (total, breakdown) = score_events(&rules, PlayerPosition::Defender, &events);

        // 2 goals x 3 + 1 assist x 1 + clean sheet 2 + 1 yellow x -1
        assert_eq!(total, 8);
        assert_eq!(breakdown.len(), ScoringEvent::ALL.len());
        assert_eq!(
            breakdown[0],
            EventPoints {
                event: ScoringEvent::Goal,
                count: 2,
                points: 6
            }
        );
    }

    #[test]
    fn test_missing_rules_score_zero() {
        let rules = ScoringRules::standard();
        let events = PlayerEvents {
            goals: 1,
            clean_sheet: true,
            ..Default::default()
        };

        let (total, _) = score_events(&rules, PlayerPosition::Goalkeeper, &events);

        // No goal rule for goalkeepers; clean sheet is worth 3.
        assert_eq!(total, 3);
    }

    #[test]
    fn test_totals_can_be_negative() {
        let rules = ScoringRules::standard();
        let events = PlayerEvents {
            yellow_cards: 1,
            red_cards: 1,
            ..Default::default()
        };

        let (total, _) = score_events(&rules, PlayerPosition::Forward, &events);
        assert_eq!(total, -4);
    }

    #[tokio::test]
    async fn test_score_player_uses_stored_position() -> Result<()> {
        let db = testing::setup_db().await?;
        let player = testing::create_player(&db, "Erling Haaland", PlayerPosition::Forward).await?;
        let events = PlayerEvents {
            goals: 3,
            ..Default::default()
        };

        let score = score_player(&db, &ScoringRules::standard(), player.id, events).await?;
        assert_eq!(score.total, 3);
        assert_eq!(score.position, PlayerPosition::Forward);

        let missing = score_player(&db, &ScoringRules::standard(), player.id + 1, events).await;
        assert!(matches!(missing, Err(ComputeError::NotFound { entity: "Player", .. })));
        Ok(())
    }
}
