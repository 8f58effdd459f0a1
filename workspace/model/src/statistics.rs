//! Typed container for a player's real-life statistics.
//!
//! Statistics are a flat map from a stat name ("goals", "minutes_played", ...)
//! to a scalar value. The map is persisted as a JSON column, but every value
//! that reaches the database has passed through [`StatValue::from_json`], so
//! nested objects, arrays and nulls never end up in storage.

use std::collections::BTreeMap;
use std::fmt;

use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single statistic value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StatValue {
    Flag(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for StatValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatValue::Flag(value) => write!(f, "{}", value),
            StatValue::Integer(value) => write!(f, "{}", value),
            StatValue::Float(value) => write!(f, "{}", value),
            StatValue::Text(value) => f.write_str(value),
        }
    }
}

impl From<i64> for StatValue {
    fn from(value: i64) -> Self {
        StatValue::Integer(value)
    }
}

impl From<f64> for StatValue {
    fn from(value: f64) -> Self {
        StatValue::Float(value)
    }
}

impl From<bool> for StatValue {
    fn from(value: bool) -> Self {
        StatValue::Flag(value)
    }
}

impl From<&str> for StatValue {
    fn from(value: &str) -> Self {
        StatValue::Text(value.to_string())
    }
}

impl From<String> for StatValue {
    fn from(value: String) -> Self {
        StatValue::Text(value)
    }
}

/// Errors raised while turning raw JSON into statistics.
#[derive(Debug, Error, PartialEq)]
pub enum StatisticsError {
    #[error("Statistic names must not be empty")]
    EmptyName,

    #[error("Statistic '{name}' has an unsupported value: {kind}")]
    UnsupportedValue { name: String, kind: &'static str },
}

impl StatValue {
    /// Converts a raw JSON value, rejecting anything that is not a scalar.
    pub fn from_json(name: &str, value: serde_json::Value) -> Result<Self, StatisticsError> {
        use serde_json::Value;

        let unsupported = |kind| StatisticsError::UnsupportedValue {
            name: name.to_string(),
            kind,
        };

        match value {
            Value::Bool(flag) => Ok(StatValue::Flag(flag)),
            Value::Number(number) => {
                if let Some(integer) = number.as_i64() {
                    Ok(StatValue::Integer(integer))
                } else if let Some(float) = number.as_f64() {
                    Ok(StatValue::Float(float))
                } else {
                    Err(unsupported("number out of range"))
                }
            }
            Value::String(text) => Ok(StatValue::Text(text)),
            Value::Null => Err(unsupported("null")),
            Value::Array(_) => Err(unsupported("array")),
            Value::Object(_) => Err(unsupported("object")),
        }
    }
}

/// A player's statistics keyed by stat name.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, FromJsonQueryResult)]
#[serde(transparent)]
pub struct PlayerStatistics(BTreeMap<String, StatValue>);

impl PlayerStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates a raw JSON map coming from outside the service.
    pub fn from_json_map<I>(entries: I) -> Result<Self, StatisticsError>
    where
        I: IntoIterator<Item = (String, serde_json::Value)>,
    {
        let mut stats = BTreeMap::new();
        for (name, value) in entries {
            if name.trim().is_empty() {
                return Err(StatisticsError::EmptyName);
            }
            let value = StatValue::from_json(&name, value)?;
            stats.insert(name, value);
        }
        Ok(Self(stats))
    }

    /// Returns the value recorded under `name`, if any.
    pub fn get(&self, name: &str) -> Option<&StatValue> {
        self.0.get(name)
    }

    /// Merges `other` into `self`. Values from `other` win on conflicts.
    pub fn merge(&mut self, other: PlayerStatistics) {
        self.0.extend(other.0);
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<StatValue>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &StatValue)> {
        self.0.iter()
    }
}

impl<K, V> FromIterator<(K, V)> for PlayerStatistics
where
    K: Into<String>,
    V: Into<StatValue>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_map_accepts_scalars() {
        let raw = json!({"goals": 3, "xg": 1.75, "captain": true, "note": "hat-trick"});
        let entries = raw.as_object().unwrap().clone().into_iter();

        let stats = PlayerStatistics::from_json_map(entries).unwrap();

        assert_eq!(stats.len(), 4);
        assert_eq!(stats.get("goals"), Some(&StatValue::Integer(3)));
        assert_eq!(stats.get("xg"), Some(&StatValue::Float(1.75)));
        assert_eq!(stats.get("captain"), Some(&StatValue::Flag(true)));
        assert_eq!(stats.get("note"), Some(&StatValue::Text("hat-trick".into())));
    }

    #[test]
    fn test_from_json_map_rejects_nested_values() {
        let raw = json!({"shots": {"on_target": 2}});
        let entries = raw.as_object().unwrap().clone().into_iter();

        let err = PlayerStatistics::from_json_map(entries).unwrap_err();

        assert_eq!(
            err,
            StatisticsError::UnsupportedValue {
                name: "shots".into(),
                kind: "object"
            }
        );
    }

    #[test]
    fn test_from_json_map_rejects_empty_names() {
        let err = PlayerStatistics::from_json_map(vec![(" ".to_string(), json!(1))]).unwrap_err();
        assert_eq!(err, StatisticsError::EmptyName);
    }

    #[test]
    fn test_merge_overwrites_and_keeps_existing() {
        let mut stats: PlayerStatistics = [("goals", 1i64), ("assists", 2i64)].into_iter().collect();
        let update: PlayerStatistics = [("goals", 5i64)].into_iter().collect();

        stats.merge(update);

        assert_eq!(stats.get("goals"), Some(&StatValue::Integer(5)));
        assert_eq!(stats.get("assists"), Some(&StatValue::Integer(2)));
        assert_eq!(stats.get("saves"), None);
    }

    #[test]
    fn test_serializes_as_plain_json_object() {
        let mut stats = PlayerStatistics::new();
        stats.insert("goals", 2i64);
        stats.insert("position_played", "CAM");

        let value = serde_json::to_value(&stats).unwrap();
        assert_eq!(value, json!({"goals": 2, "position_played": "CAM"}));

        let back: PlayerStatistics = serde_json::from_value(value).unwrap();
        assert_eq!(back, stats);
    }
}
