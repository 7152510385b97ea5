use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    entities::student_visits::{InsertStudentVisitEntity, StudentVisitEntity},
    value_objects::{
        groups::GroupModel,
        students::{StudentModel, StudentVisitModel},
    },
};

/// Attendance form for one lesson occurrence.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RecordAttendanceModel {
    #[serde(default)]
    pub students: Vec<Uuid>,
    #[serde(default)]
    pub skipped: Vec<Uuid>,
    pub new_student: Option<Uuid>,
}

/// The desired visit rows of one lesson occurrence, one per student.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceRoster {
    entries: Vec<(Uuid, bool)>,
}

impl AttendanceRoster {
    /// Duplicate ids collapse to one entry, a new student is appended as attending,
    /// and skipped ids that are not attendees are dropped.
    pub fn new(students: &[Uuid], skipped: &[Uuid], new_student: Option<Uuid>) -> Self {
        let skipped: HashSet<Uuid> = skipped.iter().copied().collect();
        let mut seen = HashSet::new();

        let entries = students
            .iter()
            .copied()
            .chain(new_student)
            .filter(|student_id| seen.insert(*student_id))
            .map(|student_id| (student_id, skipped.contains(&student_id)))
            .collect();

        Self { entries }
    }

    pub fn from_model(model: &RecordAttendanceModel) -> Self {
        Self::new(&model.students, &model.skipped, model.new_student)
    }

    pub fn entries(&self) -> &[(Uuid, bool)] {
        &self.entries
    }

    pub fn student_ids(&self) -> Vec<Uuid> {
        self.entries.iter().map(|(student_id, _)| *student_id).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Row-level changes that turn the stored visits of an occurrence into the roster.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttendancePlan {
    pub inserts: Vec<InsertStudentVisitEntity>,
    /// Retained rows whose `skipped` flag or notes must be rewritten, with the new flag.
    pub updates: Vec<(Uuid, bool)>,
    pub deletes: Vec<Uuid>,
}

impl AttendancePlan {
    pub fn is_noop(&self) -> bool {
        self.inserts.is_empty() && self.updates.is_empty() && self.deletes.is_empty()
    }
}

/// Reconciles the stored rows of (group, date) with a freshly submitted roster.
///
/// The final rows are indistinguishable from deleting everything and recreating
/// one visit per roster entry: retained rows get the submitted flag and lose their
/// notes, rows for students missing from the roster are removed.
pub fn plan_attendance(
    group_id: Uuid,
    date: NaiveDate,
    existing: &[StudentVisitEntity],
    roster: &AttendanceRoster,
) -> AttendancePlan {
    let mut stored: HashMap<Uuid, &StudentVisitEntity> = HashMap::new();
    let mut plan = AttendancePlan::default();

    for visit in existing {
        if visit.group_id != group_id || visit.date != date {
            continue;
        }
        // A second row for the same student cannot exist under the unique key; drop it if it does.
        if stored.contains_key(&visit.student_id) {
            plan.deletes.push(visit.id);
        } else {
            stored.insert(visit.student_id, visit);
        }
    }

    for (student_id, skipped) in roster.entries() {
        match stored.remove(student_id) {
            Some(visit) => {
                if visit.skipped != *skipped || !visit.notes.is_empty() {
                    plan.updates.push((visit.id, *skipped));
                }
            }
            None => plan.inserts.push(InsertStudentVisitEntity {
                student_id: *student_id,
                group_id,
                date,
                skipped: *skipped,
                notes: String::new(),
            }),
        }
    }

    let mut leftovers: Vec<&StudentVisitEntity> = stored.into_values().collect();
    leftovers.sort_by_key(|visit| visit.id);
    plan.deletes.extend(leftovers.into_iter().map(|visit| visit.id));

    plan
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AttendanceOutcome {
    pub inserted: usize,
    pub updated: usize,
    pub deleted: usize,
    pub enrolled_new_student: bool,
}

/// Everything the attendance form needs for one lesson occurrence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LessonAttendanceModel {
    pub group: GroupModel,
    pub lesson_date: NaiveDate,
    pub group_students: Vec<StudentModel>,
    pub existing_visits: Vec<StudentVisitModel>,
    pub other_students: Vec<StudentModel>,
}
