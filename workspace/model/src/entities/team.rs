use std::fmt;
use std::str::FromStr;

use sea_orm::entity::prelude::*;
use sea_orm::{Iterable, Set};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

/// Supported team formations. The stored value is the dashed notation
/// that is also shown to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
#[serde(try_from = "String", into = "String")]
pub enum Formation {
    #[sea_orm(string_value = "4-4-2")]
    FourFourTwo,
    #[sea_orm(string_value = "3-5-2")]
    ThreeFiveTwo,
    #[sea_orm(string_value = "4-3-3")]
    FourThreeThree,
    #[sea_orm(string_value = "3-4-3")]
    ThreeFourThree,
    #[sea_orm(string_value = "4-5-1")]
    FourFiveOne,
    #[sea_orm(string_value = "5-3-2")]
    FiveThreeTwo,
    #[sea_orm(string_value = "5-4-1")]
    FiveFourOne,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unsupported formation: {0:?}")]
pub struct FormationParseError(pub String);

impl Formation {
    pub fn as_str(self) -> &'static str {
        match self {
            Formation::FourFourTwo => "4-4-2",
            Formation::ThreeFiveTwo => "3-5-2",
            Formation::FourThreeThree => "4-3-3",
            Formation::ThreeFourThree => "3-4-3",
            Formation::FourFiveOne => "4-5-1",
            Formation::FiveThreeTwo => "5-3-2",
            Formation::FiveFourOne => "5-4-1",
        }
    }
}

impl fmt::Display for Formation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Formation {
    type Err = FormationParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Formation::iter()
            .find(|formation| formation.as_str() == s.trim())
            .ok_or_else(|| FormationParseError(s.to_string()))
    }
}

impl TryFrom<String> for Formation {
    type Error = FormationParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Formation> for String {
    fn from(formation: Formation) -> Self {
        formation.as_str().to_string()
    }
}

/// A fantasy team. Each team has exactly one owner; an owner may run
/// several teams.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "teams")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub owner_id: i32,
    pub formation: Formation,
    #[sea_orm(default_value = 0)]
    pub weekly_pts: i32,
    #[sea_orm(default_value = 0)]
    pub total_pts: i32,
    /// Points conceded in head-to-head play this week.
    #[sea_orm(default_value = 0)]
    pub pts_scored_against_weekly: i32,
    #[sea_orm(default_value = 0)]
    pub pts_scored_against_season: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::custom_user::Entity",
        from = "Column::OwnerId",
        to = "super::custom_user::Column::Id",
        on_delete = "Cascade"
    )]
    Owner,
    #[sea_orm(has_many = "super::team_player::Entity")]
    TeamPlayer,
    #[sea_orm(has_many = "super::team_membership::Entity")]
    TeamMembership,
}

impl Related<super::custom_user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl Related<super::player::Entity> for Entity {
    fn to() -> RelationDef {
        super::team_player::Relation::Player.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::team_player::Relation::Team.def().rev())
    }
}

impl Related<super::league::Entity> for Entity {
    fn to() -> RelationDef {
        super::team_membership::Relation::League.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::team_membership::Relation::Team.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl Model {
    /// Players currently on the roster.
    pub async fn players<C: ConnectionTrait>(&self, db: &C) -> Result<Vec<super::player::Model>, DbErr> {
        self.find_related(super::player::Entity).all(db).await
    }

    /// Leagues this team takes part in.
    pub async fn leagues<C: ConnectionTrait>(&self, db: &C) -> Result<Vec<super::league::Model>, DbErr> {
        self.find_related(super::league::Entity).all(db).await
    }

    /// Records one head-to-head result: the weekly figures are replaced,
    /// the season figures accumulate.
    ///
    /// `replaces` is a result recorded earlier for the same matchup. It is
    /// taken back out of the season figures first, so posting a corrected
    /// or repeated result never counts twice.
    #[instrument(skip(self, db), fields(team_id = self.id))]
    pub async fn record_result<C: ConnectionTrait>(
        self,
        db: &C,
        points_for: i32,
        points_against: i32,
        replaces: Option<(i32, i32)>,
    ) -> Result<Model, ResultError> {
        let (total_pts, against_season) = self.season_totals_after(points_for, points_against, replaces)?;
        debug!(
            "Team {} scored {} and conceded {}; season totals {} / {}",
            self.id, points_for, points_against, total_pts, against_season
        );

        let mut active: ActiveModel = self.into();
        active.weekly_pts = Set(points_for);
        active.total_pts = Set(total_pts);
        active.pts_scored_against_weekly = Set(points_against);
        active.pts_scored_against_season = Set(against_season);
        Ok(active.update(db).await?)
    }

    fn season_totals_after(
        &self,
        points_for: i32,
        points_against: i32,
        replaces: Option<(i32, i32)>,
    ) -> Result<(i32, i32), ResultError> {
        let (previous_for, previous_against) = replaces.unwrap_or((0, 0));
        let overflow = || ResultError::Overflow { team_id: self.id };

        let total_pts = self
            .total_pts
            .checked_sub(previous_for)
            .and_then(|total| total.checked_add(points_for))
            .ok_or_else(overflow)?;
        let against_season = self
            .pts_scored_against_season
            .checked_sub(previous_against)
            .and_then(|total| total.checked_add(points_against))
            .ok_or_else(overflow)?;
        Ok((total_pts, against_season))
    }
}

#[derive(Debug, Error)]
pub enum ResultError {
    #[error("Season totals of team {team_id} are out of range")]
    Overflow { team_id: i32 },

    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formation_round_trips_through_text() {
        for formation in Formation::iter() {
            assert_eq!(formation.as_str().parse(), Ok(formation));
        }
        assert_eq!(
            "4-2-4".parse::<Formation>(),
            Err(FormationParseError("4-2-4".to_string()))
        );
    }

    fn team(total_pts: i32, pts_scored_against_season: i32) -> Model {
        Model {
            id: 9,
            name: "Test XI".to_string(),
            owner_id: 1,
            formation: Formation::FourFourTwo,
            weekly_pts: 0,
            total_pts,
            pts_scored_against_weekly: 0,
            pts_scored_against_season,
        }
    }

    #[test]
    fn test_season_totals_replace_an_earlier_result() {
        let team = team(30, 12);

        assert_eq!(team.season_totals_after(10, 7, None).unwrap(), (40, 19));
        // 10-7 was already counted; the correction to 12-7 adds only the difference.
        assert_eq!(team.season_totals_after(12, 7, Some((10, 7))).unwrap(), (32, 12));
    }

    #[test]
    fn test_season_totals_refuse_to_overflow() {
        let team = team(i32::MAX, 0);

        let result = team.season_totals_after(1, 0, None);
        assert!(matches!(result, Err(ResultError::Overflow { team_id: 9 })));
    }

    #[test]
    fn test_formation_serde_uses_dashed_notation() {
        let formation: Formation = serde_json::from_str("\"3-5-2\"").unwrap();
        assert_eq!(formation, Formation::ThreeFiveTwo);
        assert_eq!(serde_json::to_string(&Formation::FourThreeThree).unwrap(), "\"4-3-3\"");
    }
}
