use std::collections::HashMap;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    entities::{
        app_users::{AppUserEntity, InsertAppUserEntity},
        student_visits::StudentVisitEntity,
        students::{GroupStudentEntity, StudentEntity},
    },
    value_objects::{active_passes::ActivePassModel, purchases::PurchaseModel},
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StudentModel {
    pub id: Uuid,
    pub user_id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub notes: String,
    pub group_ids: Vec<Uuid>,
}

impl StudentModel {
    pub fn from_entities(student: StudentEntity, user: AppUserEntity, group_ids: Vec<Uuid>) -> Self {
        Self {
            id: student.id,
            user_id: user.id,
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            phone: student.phone,
            notes: student.notes,
            group_ids,
        }
    }
}

/// Joins student rows with their enrollments, keeping the row order.
pub fn students_with_groups(
    rows: Vec<(StudentEntity, AppUserEntity)>,
    enrollments: Vec<GroupStudentEntity>,
) -> Vec<StudentModel> {
    let mut groups_by_student: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
    for enrollment in enrollments {
        groups_by_student
            .entry(enrollment.student_id)
            .or_default()
            .push(enrollment.group_id);
    }

    rows.into_iter()
        .map(|(student, user)| {
            let group_ids = groups_by_student.remove(&student.id).unwrap_or_default();
            StudentModel::from_entities(student, user, group_ids)
        })
        .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InsertStudentModel {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Falls back to the email when left empty.
    pub username: Option<String>,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub group_ids: Vec<Uuid>,
}

impl InsertStudentModel {
    pub fn username(&self) -> String {
        self.username
            .as_deref()
            .map(str::trim)
            .filter(|username| !username.is_empty())
            .unwrap_or_else(|| self.email.trim())
            .to_string()
    }

    pub fn to_user_entity(&self) -> InsertAppUserEntity {
        InsertAppUserEntity {
            username: self.username(),
            email: self.email.trim().to_string(),
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            is_staff: false,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StudentVisitModel {
    pub id: Uuid,
    pub student_id: Uuid,
    pub group_id: Uuid,
    pub date: NaiveDate,
    pub skipped: bool,
    pub notes: String,
}

impl From<StudentVisitEntity> for StudentVisitModel {
    fn from(entity: StudentVisitEntity) -> Self {
        Self {
            id: entity.id,
            student_id: entity.student_id,
            group_id: entity.group_id,
            date: entity.date,
            skipped: entity.skipped,
            notes: entity.notes,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StudentDetailModel {
    pub student: StudentModel,
    pub active_passes: Vec<ActivePassModel>,
    pub recent_visits: Vec<StudentVisitModel>,
    pub purchases: Vec<PurchaseModel>,
}
