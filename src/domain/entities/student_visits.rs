use chrono::NaiveDate;
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::student_visits;

#[derive(Debug, Clone, PartialEq, Identifiable, Selectable, Queryable)]
#[diesel(table_name = student_visits)]
pub struct StudentVisitEntity {
    pub id: Uuid,
    pub student_id: Uuid,
    pub group_id: Uuid,
    pub date: NaiveDate,
    pub skipped: bool,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Insertable)]
#[diesel(table_name = student_visits)]
pub struct InsertStudentVisitEntity {
    pub student_id: Uuid,
    pub group_id: Uuid,
    pub date: NaiveDate,
    pub skipped: bool,
    pub notes: String,
}

/// Projection of a visit, the only shape the credit calculation needs.
#[derive(Debug, Clone, Copy, PartialEq, Queryable)]
pub struct PassVisitRow {
    pub group_id: Uuid,
    pub date: NaiveDate,
    pub skipped: bool,
}
