use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use mockall::automock;
use uuid::Uuid;

use crate::domain::{
    entities::student_visits::{PassVisitRow, StudentVisitEntity},
    value_objects::attendance::{AttendanceOutcome, AttendanceRoster},
};

#[async_trait]
#[automock]
pub trait AttendanceRepository {
    async fn list_lesson_visits(
        &self,
        group_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<StudentVisitEntity>>;
    /// Newest first, capped at `limit`.
    async fn list_recent_visits(&self, student_id: Uuid, limit: i64)
    -> Result<Vec<StudentVisitEntity>>;
    /// Visits of the student in the given groups, skipped ones included.
    async fn list_pass_visits(
        &self,
        student_id: Uuid,
        group_ids: Vec<Uuid>,
    ) -> Result<Vec<PassVisitRow>>;
    /// Makes the stored visits of (group, date) match the roster, enrolling
    /// `enroll_student_id` first when given. All or nothing. `None` when the
    /// group no longer exists.
    async fn replace_lesson_attendance(
        &self,
        group_id: Uuid,
        date: NaiveDate,
        roster: AttendanceRoster,
        enroll_student_id: Option<Uuid>,
    ) -> Result<Option<AttendanceOutcome>>;
}
