use sea_orm::entity::prelude::*;

/// A scheduled head-to-head fixture between two teams in a league week.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "matchups")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub league_id: i32,
    pub week_number: i32,
    pub home_team_id: i32,
    pub away_team_id: i32,
    /// Points of the recorded result; both are `None` until one is posted.
    pub home_points: Option<i32>,
    pub away_points: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::league::Entity",
        from = "Column::LeagueId",
        to = "super::league::Column::Id",
        on_delete = "Cascade"
    )]
    League,
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

impl Related<super::league::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::League.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// The recorded `(home, away)` result, if any.
    pub fn result(&self) -> Option<(i32, i32)> {
        self.home_points.zip(self.away_points)
    }
}
