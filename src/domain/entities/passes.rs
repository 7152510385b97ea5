use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::passes;

#[derive(Debug, Clone, PartialEq, Identifiable, Selectable, Queryable)]
#[diesel(table_name = passes)]
pub struct PassEntity {
    pub id: Uuid,
    pub group_id: Uuid,
    pub name: String,
    pub price_minor: i32,
    pub lessons_included: i32,
    pub skips_included: i32,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = passes)]
pub struct InsertPassEntity {
    pub group_id: Uuid,
    pub name: String,
    pub price_minor: i32,
    pub lessons_included: i32,
    pub skips_included: i32,
}
