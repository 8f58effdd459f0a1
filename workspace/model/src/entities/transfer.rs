use chrono::NaiveDate;
use sea_orm::entity::prelude::*;

use super::{player, team};

/// Record of a player moving from one team to another.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "transfers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub player_id: i32,
    pub incoming_team_id: i32,
    pub outgoing_team_id: i32,
    pub transfer_date: NaiveDate,
    pub gameweek: i32,
    /// Bonus (or penalty) points attached to the move.
    #[sea_orm(default_value = 0)]
    pub additional_points: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::player::Entity",
        from = "Column::PlayerId",
        to = "super::player::Column::Id",
        on_delete = "Cascade"
    )]
    Player,
    #[sea_orm(
        belongs_to = "super::team::Entity",
        from = "Column::IncomingTeamId",
        to = "super::team::Column::Id",
        on_delete = "Cascade"
    )]
    IncomingTeam,
    #[sea_orm(
        belongs_to = "super::team::Entity",
        from = "Column::OutgoingTeamId",
        to = "super::team::Column::Id",
        on_delete = "Cascade"
    )]
    OutgoingTeam,
}

impl Related<super::player::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Player.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Human readable summary, e.g.
    /// "Kai Havertz transferred from Gunners to Blues on 2024-08-30".
    pub fn summary(&self, player: &player::Model, outgoing: &team::Model, incoming: &team::Model) -> String {
        format!(
            "{} transferred from {} to {} on {}",
            player, outgoing, incoming, self.transfer_date
        )
    }
}

/// Parameters of a transfer that has not happened yet.
#[derive(Clone, Debug)]
pub struct NewTransfer {
    pub player_id: i32,
    pub outgoing_team_id: i32,
    pub incoming_team_id: i32,
    pub transfer_date: NaiveDate,
    pub gameweek: i32,
    pub additional_points: i32,
}
