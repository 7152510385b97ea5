use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::{group_students, students};

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = students)]
pub struct StudentEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub phone: String,
    pub notes: String,
}

/// Profile fields only; the owning user id is bound when the user row exists.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = students)]
pub struct InsertStudentEntity {
    pub phone: String,
    pub notes: String,
}

#[derive(Debug, Clone, Insertable, Queryable)]
#[diesel(table_name = group_students)]
pub struct GroupStudentEntity {
    pub group_id: Uuid,
    pub student_id: Uuid,
}
