use chrono::NaiveDate;
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::dance_groups;

/// Raw row. The schedule stays as JSON and is validated into `Schedule` by the model layer.
#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = dance_groups)]
pub struct GroupEntity {
    pub id: Uuid,
    pub name: String,
    pub schedule: serde_json::Value,
    pub duration: String,
    pub start_at: NaiveDate,
    pub finished_at: Option<NaiveDate>,
    pub location: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = dance_groups)]
pub struct InsertGroupEntity {
    pub name: String,
    pub schedule: serde_json::Value,
    pub duration: String,
    pub start_at: NaiveDate,
    pub finished_at: Option<NaiveDate>,
    pub location: String,
}
