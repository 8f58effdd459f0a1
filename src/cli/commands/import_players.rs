use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use model::entities::player;
use model::entities::position::PlayerPosition;
use model::statistics::PlayerStatistics;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, Database, Set, TransactionTrait};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, trace, warn};

const PLAYER_MODEL: &str = "fantasy_app.player";

/// One record of a fixture dump.
#[derive(Debug, Deserialize)]
struct FixtureRecord {
    model: String,
    #[serde(default)]
    pk: Option<serde_json::Value>,
    fields: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct FixturePlayer {
    name: String,
    position: String,
    current_form: Decimal,
    price: Decimal,
    #[serde(default, alias = "EPL_team")]
    epl_team: Option<String>,
    #[serde(default)]
    statistics: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Error)]
enum PlayerRecordError {
    #[error("invalid fields: {0}")]
    Fields(#[from] serde_json::Error),
    #[error(transparent)]
    Position(#[from] model::entities::position::PositionParseError),
    #[error(transparent)]
    Statistics(#[from] model::statistics::StatisticsError),
    #[error(transparent)]
    Amount(#[from] player::AmountOutOfRange),
    #[error("name must be between 1 and 100 characters")]
    Name,
}

fn parse_player(fields: serde_json::Value) -> Result<player::ActiveModel, PlayerRecordError> {
    let record: FixturePlayer = serde_json::from_value(fields)?;
    let name = record.name.trim().to_string();
    if name.is_empty() || name.chars().count() > 100 {
        return Err(PlayerRecordError::Name);
    }
    let position: PlayerPosition = record.position.parse()?;
    let statistics = PlayerStatistics::from_json_map(record.statistics)?;

    Ok(player::ActiveModel {
        name: Set(name),
        position: Set(position),
        current_form: Set(player::checked_amount("current_form", record.current_form)?),
        price: Set(player::checked_amount("price", record.price)?),
        epl_team: Set(record.epl_team),
        statistics: Set(statistics),
        ..Default::default()
    })
}

#[derive(Debug, Default, PartialEq, Eq)]
struct ImportSummary {
    imported: usize,
    skipped: usize,
}

/// Inserts the player records of a dump in one transaction. Invalid records
/// are skipped with a warning; a database error rolls the whole import back.
async fn import_records<C: TransactionTrait>(db: &C, records: Vec<FixtureRecord>) -> Result<ImportSummary> {
    let txn = db.begin().await.context("Failed to start transaction")?;

    let mut summary = ImportSummary::default();
    for record in records {
        if record.model != PLAYER_MODEL {
            trace!("Ignoring record of model {}", record.model);
            continue;
        }

        match parse_player(record.fields) {
            Ok(new_player) => {
                let inserted = new_player
                    .insert(&txn)
                    .await
                    .with_context(|| format!("Failed to insert player record {:?}", record.pk))?;
                debug!("Imported player {} as ID {}", inserted.name, inserted.id);
                summary.imported += 1;
            }
            Err(e) => {
                warn!("Skipping player record {:?}: {}", record.pk, e);
                summary.skipped += 1;
            }
        }
    }

    txn.commit().await.context("Failed to commit import")?;
    Ok(summary)
}

/// Imports every player record of the dump. The import as a whole only
/// fails on I/O or database errors, and then nothing is written.
pub async fn import_players(json_path: &str, database_url: &str) -> Result<()> {
    trace!("Entering import_players function");
    info!("Starting player import");
    debug!("JSON path: {}", json_path);
    debug!("Database URL: {}", database_url);

    let db = Database::connect(database_url)
        .await
        .context("Failed to connect to database")?;
    info!("Connected to database");

    let file = File::open(Path::new(json_path)).with_context(|| format!("Failed to open file: {}", json_path))?;
    let records: Vec<FixtureRecord> = serde_json::from_reader(file).context("Failed to parse JSON")?;
    info!("Loaded {} records from dump", records.len());

    let summary = import_records(&db, records).await?;
    info!("Imported {} players, skipped {}", summary.imported, summary.skipped);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::test_utils::setup_test_db;
    use sea_orm::EntityTrait;
    use serde_json::json;

    #[test]
    fn test_parse_player_normalizes_position() {
        let model = parse_player(json!({
            "name": "Bukayo Saka",
            "position": "midfielder",
            "current_form": "7.50",
            "price": "10.00",
            "statistics": {"goals": 3}
        }))
        .unwrap();

        assert_eq!(model.position.unwrap(), PlayerPosition::Midfielder);
        assert_eq!(model.statistics.unwrap().len(), 1);
    }

    #[test]
    fn test_parse_player_rejects_bad_records() {
        let bad_position = parse_player(json!({
            "name": "Nobody",
            "position": "sweeper",
            "current_form": "1.00",
            "price": "4.00"
        }));
        assert!(matches!(bad_position, Err(PlayerRecordError::Position(_))));

        let nested_stats = parse_player(json!({
            "name": "Nobody",
            "position": "GK",
            "current_form": "1.00",
            "price": "4.00",
            "statistics": {"saves": [1, 2]}
        }));
        assert!(matches!(nested_stats, Err(PlayerRecordError::Statistics(_))));
    }

    #[test]
    fn test_parse_player_checks_amounts_and_reads_club_key() {
        let out_of_range = parse_player(json!({
            "name": "Overpriced",
            "position": "FWD",
            "current_form": "5.00",
            "price": "1000.00"
        }));
        assert!(matches!(out_of_range, Err(PlayerRecordError::Amount(_))));

        let model = parse_player(json!({
            "name": "Cole Palmer",
            "position": "MID",
            "current_form": "8.126",
            "price": "10.50",
            "EPL_team": "Chelsea"
        }))
        .unwrap();
        assert_eq!(model.epl_team.unwrap(), Some("Chelsea".to_string()));
        assert_eq!(model.current_form.unwrap(), Decimal::new(813, 2));
    }

    #[tokio::test]
    async fn test_import_records_skips_invalid_players() {
        let db = setup_test_db().await;
        let records: Vec<FixtureRecord> = serde_json::from_value(json!([
            {"model": "fantasy_app.player", "pk": 1, "fields": {
                "name": "Bukayo Saka", "position": "MID", "current_form": "7.50",
                "price": "10.00", "EPL_team": "Arsenal"
            }},
            {"model": "fantasy_app.player", "pk": 2, "fields": {
                "name": "Overpriced", "position": "FWD", "current_form": "5.00", "price": "1000.00"
            }},
            {"model": "fantasy_app.team", "pk": 1, "fields": {"name": "Gunners"}}
        ]))
        .unwrap();

        let summary = import_records(&db, records).await.unwrap();
        assert_eq!(summary, ImportSummary { imported: 1, skipped: 1 });

        let stored = player::Entity::find().all(&db).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].epl_team.as_deref(), Some("Arsenal"));
    }
}
