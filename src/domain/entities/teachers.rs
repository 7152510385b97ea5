use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::{group_teachers, teachers};

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = teachers)]
pub struct TeacherEntity {
    pub id: Uuid,
    pub user_id: Uuid,
}

#[derive(Debug, Clone, Insertable, Queryable)]
#[diesel(table_name = group_teachers)]
pub struct GroupTeacherEntity {
    pub group_id: Uuid,
    pub teacher_id: Uuid,
}
