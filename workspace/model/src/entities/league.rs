use sea_orm::entity::prelude::*;
use sea_orm::QueryOrder;

use super::position::PlayerPosition;
use crate::scoring::ScoringRules;

/// Weeks in a season when a league does not say otherwise.
pub const DEFAULT_SEASON_DURATION: i32 = 38;

/// A fantasy league run by a single commissioner.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "leagues")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    /// Each user can commission at most one league.
    #[sea_orm(unique)]
    pub commissioner_id: i32,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub scoring_system: ScoringRules,
    /// Maximum number of players on a team's roster.
    pub roster_size: i32,
    /// Number of players that start each week.
    pub lineup_size: i32,
    /// Season length in gameweeks.
    #[sea_orm(default_value = 38)]
    pub season_duration: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::custom_user::Entity",
        from = "Column::CommissionerId",
        to = "super::custom_user::Column::Id",
        on_delete = "Cascade"
    )]
    Commissioner,
    #[sea_orm(has_many = "super::team_membership::Entity")]
    TeamMembership,
    #[sea_orm(has_many = "super::roster_requirement::Entity")]
    RosterRequirement,
    #[sea_orm(has_many = "super::matchup::Entity")]
    Matchup,
}

impl Related<super::custom_user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Commissioner.def()
    }
}

/// Participants are the teams holding a membership in the league.
impl Related<super::team::Entity> for Entity {
    fn to() -> RelationDef {
        super::team_membership::Relation::Team.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::team_membership::Relation::League.def().rev())
    }
}

impl Related<super::roster_requirement::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RosterRequirement.def()
    }
}

impl Related<super::matchup::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Matchup.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Participating teams, ordered by id.
    pub async fn participants<C: ConnectionTrait>(&self, db: &C) -> Result<Vec<super::team::Model>, DbErr> {
        self.find_related(super::team::Entity)
            .order_by_asc(super::team::Column::Id)
            .all(db)
            .await
    }

    /// Required player count per position. Positions without a
    /// requirement row are not listed.
    pub async fn roster_requirements<C: ConnectionTrait>(
        &self,
        db: &C,
    ) -> Result<Vec<(PlayerPosition, i32)>, DbErr> {
        let rows = self
            .find_related(super::roster_requirement::Entity)
            .find_also_related(super::position::Entity)
            .all(db)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(requirement, position)| {
                position
                    .and_then(|position| position.player_position())
                    .map(|position| (position, requirement.required_number))
            })
            .collect())
    }

    /// Scheduled matchups, ordered by week.
    pub async fn matchups<C: ConnectionTrait>(&self, db: &C) -> Result<Vec<super::matchup::Model>, DbErr> {
        self.find_related(super::matchup::Entity)
            .order_by_asc(super::matchup::Column::WeekNumber)
            .order_by_asc(super::matchup::Column::Id)
            .all(db)
            .await
    }
}
