use sea_orm::entity::prelude::*;

/// Application-level user profile wrapping exactly one [`user`](super::user).
///
/// Teams are owned by, leagues are commissioned by and notifications are
/// addressed to a custom user rather than the bare identity.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "custom_users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub user_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
    /// One user can own many teams.
    #[sea_orm(has_many = "super::team::Entity")]
    Team,
    /// A user commissions at most one league.
    #[sea_orm(has_one = "super::league::Entity")]
    League,
    #[sea_orm(has_many = "super::user_notif::Entity")]
    UserNotif,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
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

impl Related<super::user_notif::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserNotif.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Entity {
    /// Loads a profile together with the identity it wraps.
    pub async fn find_with_user<C: ConnectionTrait>(
        db: &C,
        id: i32,
    ) -> Result<Option<(Model, super::user::Model)>, DbErr> {
        let found = Entity::find_by_id(id)
            .find_also_related(super::user::Entity)
            .one(db)
            .await?;

        Ok(found.and_then(|(profile, user)| user.map(|user| (profile, user))))
    }
}
