use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::domain::value_objects::enums::week_days::WeekDay;

const TIME_FORMAT: &str = "%H:%M";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("Schedule must be valid JSON")]
    InvalidJson,
    #[error("Schedule must be a list of schedule items")]
    NotAList,
    #[error("Each schedule item must have 'day' and 'time' keys")]
    MissingKeys,
    #[error("Invalid day: {0}. Must be one of mon, tue, wed, thu, fri, sat, sun")]
    InvalidDay(String),
    #[error("Invalid time: {0}. Must be HH:MM")]
    InvalidTime(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub day: WeekDay,
    pub time: String,
}

/// Weekly recurring slots of a group, in the order they were entered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schedule(Vec<ScheduleEntry>);

impl Schedule {
    pub fn entries(&self) -> &[ScheduleEntry] {
        &self.0
    }

    /// Accepts either a JSON array or a string holding one, as form inputs send both.
    pub fn from_input(input: &Value) -> Result<Self, ScheduleError> {
        match input {
            Value::String(raw) => Self::parse_str(raw),
            other => Self::from_value(other),
        }
    }

    pub fn parse_str(raw: &str) -> Result<Self, ScheduleError> {
        let value: Value = serde_json::from_str(raw).map_err(|_| ScheduleError::InvalidJson)?;
        Self::from_value(&value)
    }

    pub fn from_value(value: &Value) -> Result<Self, ScheduleError> {
        let items = value.as_array().ok_or(ScheduleError::NotAList)?;

        let mut entries = Vec::with_capacity(items.len());
        for item in items {
            let object = item.as_object().ok_or(ScheduleError::MissingKeys)?;
            let (day, time) = match (object.get("day"), object.get("time")) {
                (Some(day), Some(time)) => (day, time),
                _ => return Err(ScheduleError::MissingKeys),
            };

            let day_token = day.as_str().map(str::to_string).unwrap_or_else(|| day.to_string());
            let day = WeekDay::from_str(&day_token).ok_or(ScheduleError::InvalidDay(day_token))?;

            let time_token = time.as_str().map(str::to_string).unwrap_or_else(|| time.to_string());
            let time = NaiveTime::parse_from_str(&time_token, TIME_FORMAT)
                .map_err(|_| ScheduleError::InvalidTime(time_token.clone()))?;

            entries.push(ScheduleEntry {
                day,
                time: time.format(TIME_FORMAT).to_string(),
            });
        }

        Ok(Self(entries))
    }

    pub fn to_value(&self) -> Value {
        Value::Array(
            self.0
                .iter()
                .map(|entry| serde_json::json!({ "day": entry.day.as_str(), "time": entry.time }))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_string_input() {
        let schedule = Schedule::from_input(&json!(
            r#"[{"day": "tue", "time": "19:30"}, {"day": "thu", "time": "20:30"}]"#
        ))
        .unwrap();

        assert_eq!(schedule.entries().len(), 2);
        assert_eq!(schedule.entries()[0].day, WeekDay::Tue);
        assert_eq!(schedule.entries()[1].time, "20:30");
    }

    #[test]
    fn parses_array_input_and_keeps_order() {
        let schedule =
            Schedule::from_input(&json!([{"day": "sun", "time": "10:00"}, {"day": "mon", "time": "09:15"}]))
                .unwrap();

        let days: Vec<_> = schedule.entries().iter().map(|e| e.day).collect();
        assert_eq!(days, vec![WeekDay::Sun, WeekDay::Mon]);
    }

    #[test]
    fn empty_list_is_valid() {
        let schedule = Schedule::from_input(&json!([])).unwrap();
        assert!(schedule.entries().is_empty());
    }

    #[test]
    fn rejects_non_json() {
        assert_eq!(
            Schedule::from_input(&json!("tue at 19:30")),
            Err(ScheduleError::InvalidJson)
        );
    }

    #[test]
    fn rejects_non_list() {
        assert_eq!(
            Schedule::from_input(&json!({"day": "tue", "time": "19:30"})),
            Err(ScheduleError::NotAList)
        );
    }

    #[test]
    fn rejects_missing_keys() {
        assert_eq!(
            Schedule::from_input(&json!([{"day": "tue"}])),
            Err(ScheduleError::MissingKeys)
        );
        assert_eq!(
            Schedule::from_input(&json!(["tue 19:30"])),
            Err(ScheduleError::MissingKeys)
        );
    }

    #[test]
    fn rejects_unknown_day() {
        let err = Schedule::from_input(&json!([{"day": "tuesday", "time": "19:30"}])).unwrap_err();
        assert_eq!(err, ScheduleError::InvalidDay("tuesday".to_string()));
        assert!(err.to_string().starts_with("Invalid day: tuesday"));
    }

    #[test]
    fn rejects_bad_time() {
        let err = Schedule::from_input(&json!([{"day": "tue", "time": "late"}])).unwrap_err();
        assert_eq!(err, ScheduleError::InvalidTime("late".to_string()));
    }

    #[test]
    fn round_trips_through_column_value() {
        let schedule = Schedule::from_input(&json!([{"day": "fri", "time": "18:00"}])).unwrap();
        assert_eq!(Schedule::from_value(&schedule.to_value()).unwrap(), schedule);
    }
}
