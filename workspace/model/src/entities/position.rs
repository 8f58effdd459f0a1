use std::fmt;
use std::str::FromStr;

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The four positions a player can occupy on the pitch.
///
/// Parsing is case-insensitive and accepts both the full name and the
/// catalog abbreviation, so "midfielder", "MIDFIELDER" and "MID" all map to
/// [`PlayerPosition::Midfielder`]. The canonical form (stored in the
/// database and shown to users) is the title-cased name.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(15))")]
#[serde(try_from = "String", into = "String")]
pub enum PlayerPosition {
    #[sea_orm(string_value = "Goalkeeper")]
    Goalkeeper,
    #[sea_orm(string_value = "Defender")]
    Defender,
    #[sea_orm(string_value = "Midfielder")]
    Midfielder,
    #[sea_orm(string_value = "Forward")]
    Forward,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unrecognized player position: {0:?}")]
pub struct PositionParseError(pub String);

impl PlayerPosition {
    pub const ALL: [PlayerPosition; 4] = [
        PlayerPosition::Goalkeeper,
        PlayerPosition::Defender,
        PlayerPosition::Midfielder,
        PlayerPosition::Forward,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PlayerPosition::Goalkeeper => "Goalkeeper",
            PlayerPosition::Defender => "Defender",
            PlayerPosition::Midfielder => "Midfielder",
            PlayerPosition::Forward => "Forward",
        }
    }

    pub fn abbreviation(self) -> &'static str {
        match self {
            PlayerPosition::Goalkeeper => "GK",
            PlayerPosition::Defender => "DEF",
            PlayerPosition::Midfielder => "MID",
            PlayerPosition::Forward => "FWD",
        }
    }
}

impl fmt::Display for PlayerPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PlayerPosition {
    type Err = PositionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "GOALKEEPER" | "GK" => Ok(PlayerPosition::Goalkeeper),
            "DEFENDER" | "DEF" => Ok(PlayerPosition::Defender),
            "MIDFIELDER" | "MID" => Ok(PlayerPosition::Midfielder),
            "FORWARD" | "FWD" => Ok(PlayerPosition::Forward),
            _ => Err(PositionParseError(s.to_string())),
        }
    }
}

impl TryFrom<String> for PlayerPosition {
    type Error = PositionParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PlayerPosition> for String {
    fn from(position: PlayerPosition) -> Self {
        position.name().to_string()
    }
}

/// Canonical position catalog row (e.g. "Goalkeeper" / "GK").
/// The four standard rows are seeded by the migrations.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "positions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
    #[sea_orm(unique)]
    pub abbreviation: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::roster_requirement::Entity")]
    RosterRequirement,
}

impl Related<super::roster_requirement::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RosterRequirement.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// The enum value this catalog row stands for, if it is one of the
    /// standard positions.
    pub fn player_position(&self) -> Option<PlayerPosition> {
        self.abbreviation.parse().ok()
    }
}

impl Entity {
    /// Looks up the catalog row for a position by its abbreviation.
    pub async fn find_by_position<C: ConnectionTrait>(
        db: &C,
        position: PlayerPosition,
    ) -> Result<Option<Model>, DbErr> {
        Entity::find()
            .filter(Column::Abbreviation.eq(position.abbreviation()))
            .one(db)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("midfielder".parse(), Ok(PlayerPosition::Midfielder));
        assert_eq!("MIDFIELDER".parse(), Ok(PlayerPosition::Midfielder));
        assert_eq!("Mid".parse(), Ok(PlayerPosition::Midfielder));
        assert_eq!(" gk ".parse(), Ok(PlayerPosition::Goalkeeper));
        assert_eq!("fwd".parse(), Ok(PlayerPosition::Forward));
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert_eq!(
            "winger".parse::<PlayerPosition>(),
            Err(PositionParseError("winger".to_string()))
        );
    }

    #[test]
    fn test_serde_uses_canonical_name() {
        let position: PlayerPosition = serde_json::from_str("\"defender\"").unwrap();
        assert_eq!(position, PlayerPosition::Defender);
        assert_eq!(serde_json::to_string(&position).unwrap(), "\"Defender\"");
        assert!(serde_json::from_str::<PlayerPosition>("\"sweeper\"").is_err());
    }

    #[test]
    fn test_catalog_row_maps_to_enum() {
        let row = Model {
            id: 1,
            name: "Goalkeeper".into(),
            abbreviation: "GK".into(),
        };
        assert_eq!(row.player_position(), Some(PlayerPosition::Goalkeeper));
    }
}
