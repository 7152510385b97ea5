use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::domain::{
    entities::{
        groups::{GroupEntity, InsertGroupEntity},
        passes::{InsertPassEntity, PassEntity},
    },
    value_objects::schedule::Schedule,
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GroupModel {
    pub id: Uuid,
    pub name: String,
    pub schedule: Schedule,
    pub duration: String,
    pub start_at: NaiveDate,
    pub finished_at: Option<NaiveDate>,
    pub location: String,
    pub teacher_ids: Vec<Uuid>,
}

impl GroupModel {
    pub fn from_entity(entity: GroupEntity, teacher_ids: Vec<Uuid>) -> Self {
        // Rows are validated on the way in; a hand-edited column degrades to an empty schedule.
        let schedule = Schedule::from_value(&entity.schedule).unwrap_or_default();

        Self {
            id: entity.id,
            name: entity.name,
            schedule,
            duration: entity.duration,
            start_at: entity.start_at,
            finished_at: entity.finished_at,
            location: entity.location,
            teacher_ids,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InsertGroupModel {
    pub name: String,
    /// JSON list of `{day, time}` objects, or a string holding that JSON.
    pub schedule: Value,
    pub duration: String,
    pub start_at: NaiveDate,
    pub finished_at: Option<NaiveDate>,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub teacher_ids: Vec<Uuid>,
}

impl InsertGroupModel {
    pub fn to_entity(&self, schedule: &Schedule) -> InsertGroupEntity {
        InsertGroupEntity {
            name: self.name.trim().to_string(),
            schedule: schedule.to_value(),
            duration: self.duration.trim().to_string(),
            start_at: self.start_at,
            finished_at: self.finished_at,
            location: self.location.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PassModel {
    pub id: Uuid,
    pub group_id: Uuid,
    pub name: String,
    pub price_minor: i32,
    pub lessons_included: i32,
    pub skips_included: i32,
}

impl From<PassEntity> for PassModel {
    fn from(entity: PassEntity) -> Self {
        Self {
            id: entity.id,
            group_id: entity.group_id,
            name: entity.name,
            price_minor: entity.price_minor,
            lessons_included: entity.lessons_included,
            skips_included: entity.skips_included,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InsertPassModel {
    pub name: String,
    pub price_minor: i32,
    pub lessons_included: i32,
    #[serde(default)]
    pub skips_included: i32,
}

impl InsertPassModel {
    pub fn to_entity(&self, group_id: Uuid) -> InsertPassEntity {
        InsertPassEntity {
            group_id,
            name: self.name.trim().to_string(),
            price_minor: self.price_minor,
            lessons_included: self.lessons_included,
            skips_included: self.skips_included,
        }
    }
}
