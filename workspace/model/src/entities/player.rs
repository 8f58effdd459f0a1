use std::fmt;

use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use sea_orm::Set;
use thiserror::Error;
use tracing::{debug, instrument};

use super::position::PlayerPosition;
use crate::statistics::{PlayerStatistics, StatValue};

/// Largest magnitude the `Decimal(5, 2)` form and price columns hold.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(99_999, 0, 0, false, 2);

#[derive(Debug, Error, PartialEq, Eq)]
#[error("{field} must be below 1000")]
pub struct AmountOutOfRange {
    pub field: &'static str,
    pub value: Decimal,
}

/// Rounds `value` to two places and checks that it fits the form and price
/// columns.
pub fn checked_amount(field: &'static str, value: Decimal) -> Result<Decimal, AmountOutOfRange> {
    let rounded = value.round_dp(2);
    if rounded.abs() > MAX_AMOUNT {
        return Err(AmountOutOfRange { field, value });
    }
    Ok(rounded)
}

/// A real-world footballer that fantasy teams can pick.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "players")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub position: PlayerPosition,
    /// Recent form rating.
    #[sea_orm(column_type = "Decimal(Some((5, 2)))")]
    pub current_form: Decimal,
    /// Transfer price in millions.
    #[sea_orm(column_type = "Decimal(Some((5, 2)))")]
    pub price: Decimal,
    /// The real-world club the player is registered with.
    pub epl_team: Option<String>,
    /// Real-life statistics, e.g. `{"goals": 7, "assists": 3}`.
    #[sea_orm(column_type = "JsonBinary")]
    pub statistics: PlayerStatistics,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::team_player::Entity")]
    TeamPlayer,
    #[sea_orm(has_many = "super::transfer::Entity")]
    Transfer,
}

impl Related<super::team::Entity> for Entity {
    fn to() -> RelationDef {
        super::team_player::Relation::Team.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::team_player::Relation::Player.def().rev())
    }
}

impl Related<super::transfer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transfer.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl Model {
    /// Merges `update` into the stored statistics and persists the result.
    ///
    /// Keys present in `update` overwrite the stored values; all other keys
    /// are kept. Concurrent updates resolve as last write wins.
    #[instrument(skip(self, db, update), fields(player_id = self.id, keys = update.len()))]
    pub async fn update_stats<C: ConnectionTrait>(
        self,
        db: &C,
        update: PlayerStatistics,
    ) -> Result<Model, DbErr> {
        let mut statistics = self.statistics.clone();
        statistics.merge(update);
        debug!("Player {} now has {} statistics", self.id, statistics.len());

        let mut active: ActiveModel = self.into();
        active.statistics = Set(statistics);
        active.update(db).await
    }

    /// Returns a single statistic, or `None` when it has never been recorded.
    pub fn get_statistics(&self, statistic_name: &str) -> Option<&StatValue> {
        self.statistics.get(statistic_name)
    }

    /// Teams currently holding this player.
    pub async fn teams<C: ConnectionTrait>(&self, db: &C) -> Result<Vec<super::team::Model>, DbErr> {
        self.find_related(super::team::Entity).all(db).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checked_amount_rounds_to_two_places() {
        assert_eq!(checked_amount("price", Decimal::new(10_005, 3)), Ok(Decimal::new(1_000, 2)));
        assert_eq!(checked_amount("price", Decimal::new(99_999, 2)), Ok(Decimal::new(99_999, 2)));
    }

    #[test]
    fn test_checked_amount_rejects_values_past_the_column() {
        let err = checked_amount("current_form", Decimal::new(1_000, 0)).unwrap_err();
        assert_eq!(err.field, "current_form");
        assert_eq!(err.to_string(), "current_form must be below 1000");
        // 999.995 rounds up past the limit.
        assert!(checked_amount("price", Decimal::new(999_995, 3)).is_err());
        assert!(checked_amount("price", Decimal::new(-1_000, 0)).is_err());
    }
}
