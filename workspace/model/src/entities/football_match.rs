use chrono::{NaiveDate, NaiveDateTime};
use sea_orm::entity::prelude::*;

/// A real-world match between two teams.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "matches")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub home_team_id: i32,
    pub away_team_id: i32,
    pub date: NaiveDate,
    pub date_time: NaiveDateTime,
    /// Score in "home-away" notation, e.g. "2-1".
    pub final_score: String,
    pub home_team_goals: i32,
    pub away_team_goals: i32,
    /// Cards shown during the match.
    pub cards: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::team::Entity",
        from = "Column::HomeTeamId",
        to = "super::team::Column::Id",
        on_delete = "Cascade"
    )]
    HomeTeam,
    #[sea_orm(
        belongs_to = "super::team::Entity",
        from = "Column::AwayTeamId",
        to = "super::team::Column::Id",
        on_delete = "Cascade"
    )]
    AwayTeam,
}

impl ActiveModelBehavior for ActiveModel {}

/// Formats goal counts as a final score string.
pub fn score_line(home_goals: i32, away_goals: i32) -> String {
    format!("{}-{}", home_goals, away_goals)
}

impl Model {
    /// Whether `final_score` agrees with the recorded goal counts.
    pub fn is_score_consistent(&self) -> bool {
        self.final_score.trim() == score_line(self.home_team_goals, self.away_team_goals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(final_score: &str) -> Model {
        Model {
            id: 1,
            home_team_id: 1,
            away_team_id: 2,
            date: NaiveDate::from_ymd_opt(2024, 8, 17).unwrap(),
            date_time: NaiveDate::from_ymd_opt(2024, 8, 17)
                .unwrap()
                .and_hms_opt(15, 0, 0)
                .unwrap(),
            final_score: final_score.to_string(),
            home_team_goals: 2,
            away_team_goals: 1,
            cards: 3,
        }
    }

    #[test]
    fn test_score_consistency() {
        assert_eq!(score_line(2, 1), "2-1");
        assert!(sample("2-1").is_score_consistent());
        assert!(!sample("1-2").is_score_consistent());
    }
}
