use chrono::{NaiveDateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{QueryOrder, Set};

/// A notification addressed to a single user.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "user_notifs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub message: String,
    pub created_at: NaiveDateTime,
    #[sea_orm(default_value = "false")]
    pub is_read: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::custom_user::Entity",
        from = "Column::UserId",
        to = "super::custom_user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::custom_user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        if insert {
            if self.created_at.is_not_set() {
                self.created_at = Set(Utc::now().naive_utc());
            }
            if self.is_read.is_not_set() {
                self.is_read = Set(false);
            }
        }
        Ok(self)
    }
}

impl Entity {
    /// Returns the user's notifications, newest first, as they were before
    /// the call, then marks the unread ones among them as read.
    pub async fn take_for_user<C: ConnectionTrait>(db: &C, user_id: i32) -> Result<Vec<Model>, DbErr> {
        let notifications = Entity::find()
            .filter(Column::UserId.eq(user_id))
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .all(db)
            .await?;

        Entity::mark_read(db, &notifications).await?;
        Ok(notifications)
    }

    /// Marks exactly the given notifications as read. Rows created after
    /// `shown` was loaded are left untouched.
    pub async fn mark_read<C: ConnectionTrait>(db: &C, shown: &[Model]) -> Result<u64, DbErr> {
        let unread: Vec<i32> = shown
            .iter()
            .filter(|notification| !notification.is_read)
            .map(|notification| notification.id)
            .collect();
        if unread.is_empty() {
            return Ok(0);
        }

        let result = Entity::update_many()
            .col_expr(Column::IsRead, Expr::value(true))
            .filter(Column::Id.is_in(unread))
            .exec(db)
            .await?;
        Ok(result.rows_affected)
    }
}
