use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::{Connection, RunQueryDsl, delete, insert_into, prelude::*, update};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::{
    domain::{
        entities::{
            student_visits::{PassVisitRow, StudentVisitEntity},
            students::GroupStudentEntity,
        },
        repositories::attendance::AttendanceRepository,
        value_objects::attendance::{
            AttendanceOutcome, AttendancePlan, AttendanceRoster, plan_attendance,
        },
    },
    infrastructure::postgres::{
        postgres_connection::PgPoolSquad,
        schema::{dance_groups, group_students, student_visits},
    },
};

pub struct AttendancePostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl AttendancePostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl AttendanceRepository for AttendancePostgres {
    async fn list_lesson_visits(
        &self,
        group_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<StudentVisitEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = student_visits::table
            .filter(student_visits::group_id.eq(group_id))
            .filter(student_visits::date.eq(date))
            .select(StudentVisitEntity::as_select())
            .load::<StudentVisitEntity>(&mut conn)?;

        Ok(results)
    }

    async fn list_recent_visits(
        &self,
        student_id: Uuid,
        limit: i64,
    ) -> Result<Vec<StudentVisitEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = student_visits::table
            .filter(student_visits::student_id.eq(student_id))
            .order(student_visits::date.desc())
            .limit(limit)
            .select(StudentVisitEntity::as_select())
            .load::<StudentVisitEntity>(&mut conn)?;

        Ok(results)
    }

    async fn list_pass_visits(
        &self,
        student_id: Uuid,
        group_ids: Vec<Uuid>,
    ) -> Result<Vec<PassVisitRow>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = student_visits::table
            .filter(student_visits::student_id.eq(student_id))
            .filter(student_visits::group_id.eq_any(group_ids))
            .select((
                student_visits::group_id,
                student_visits::date,
                student_visits::skipped,
            ))
            .load::<PassVisitRow>(&mut conn)?;

        Ok(results)
    }

    async fn replace_lesson_attendance(
        &self,
        group_id: Uuid,
        date: NaiveDate,
        roster: AttendanceRoster,
        enroll_student_id: Option<Uuid>,
    ) -> Result<Option<AttendanceOutcome>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = conn.transaction::<Option<AttendanceOutcome>, diesel::result::Error, _>(|tx| {
            // Serializes concurrent submissions for the same group.
            let locked = dance_groups::table
                .find(group_id)
                .select(dance_groups::id)
                .for_update()
                .first::<Uuid>(tx)
                .optional()?;
            if locked.is_none() {
                return Ok(None);
            }

            let mut enrolled_new_student = false;
            if let Some(student_id) = enroll_student_id {
                let inserted = insert_into(group_students::table)
                    .values(&GroupStudentEntity {
                        group_id,
                        student_id,
                    })
                    .on_conflict_do_nothing()
                    .execute(tx)?;
                enrolled_new_student = inserted > 0;
            }

            let existing = student_visits::table
                .filter(student_visits::group_id.eq(group_id))
                .filter(student_visits::date.eq(date))
                .select(StudentVisitEntity::as_select())
                .load::<StudentVisitEntity>(tx)?;

            let AttendancePlan {
                inserts,
                updates,
                deletes,
            } = plan_attendance(group_id, date, &existing, &roster);

            let deleted = if deletes.is_empty() {
                0
            } else {
                delete(student_visits::table.filter(student_visits::id.eq_any(deletes)))
                    .execute(tx)?
            };

            for (visit_id, skipped) in &updates {
                update(student_visits::table.find(*visit_id))
                    .set((
                        student_visits::skipped.eq(*skipped),
                        student_visits::notes.eq(""),
                    ))
                    .execute(tx)?;
            }

            let inserted = if inserts.is_empty() {
                0
            } else {
                insert_into(student_visits::table)
                    .values(&inserts)
                    .execute(tx)?
            };

            Ok(Some(AttendanceOutcome {
                inserted,
                updated: updates.len(),
                deleted,
                enrolled_new_student,
            }))
        })?;

        debug!(%group_id, %date, ?result, "attendance: transaction committed");
        Ok(result)
    }
}
