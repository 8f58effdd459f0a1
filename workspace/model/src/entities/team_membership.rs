use sea_orm::entity::prelude::*;
use sea_orm::{Set, SqlErr};
use thiserror::Error;
use tracing::{debug, warn};

/// Links a team to a league it plays in. A (team, league) pair appears at
/// most once; the migrations back this with a unique index.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "team_memberships")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub team_id: i32,
    pub league_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::team::Entity",
        from = "Column::TeamId",
        to = "super::team::Column::Id",
        on_delete = "Cascade"
    )]
    Team,
    #[sea_orm(
        belongs_to = "super::league::Entity",
        from = "Column::LeagueId",
        to = "super::league::Column::Id",
        on_delete = "Cascade"
    )]
    League,
}

impl Related<super::team::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Team.def()
    }
}

impl Related<super::league::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::League.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Error)]
pub enum MembershipError {
    #[error("Team {team_id} is already a member of league {league_id}")]
    AlreadyMember { team_id: i32, league_id: i32 },

    #[error("Team {team_id} or league {league_id} does not exist")]
    UnknownReference { team_id: i32, league_id: i32 },

    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl Entity {
    /// Enrolls a team in a league.
    pub async fn join<C: ConnectionTrait>(
        db: &C,
        team_id: i32,
        league_id: i32,
    ) -> Result<Model, MembershipError> {
        debug!("Enrolling team {} in league {}", team_id, league_id);
        let membership = ActiveModel {
            team_id: Set(team_id),
            league_id: Set(league_id),
            ..Default::default()
        };

        membership.insert(db).await.map_err(|err| match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                warn!("Team {} is already enrolled in league {}", team_id, league_id);
                MembershipError::AlreadyMember { team_id, league_id }
            }
            Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
                MembershipError::UnknownReference { team_id, league_id }
            }
            _ => MembershipError::Database(err),
        })
    }

    /// Removes a team from a league. Returns whether a membership existed.
    pub async fn leave<C: ConnectionTrait>(db: &C, team_id: i32, league_id: i32) -> Result<bool, DbErr> {
        let result = Entity::delete_many()
            .filter(Column::TeamId.eq(team_id))
            .filter(Column::LeagueId.eq(league_id))
            .exec(db)
            .await?;
        Ok(result.rows_affected > 0)
    }
}
