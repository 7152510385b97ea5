use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
    application::usecases::{
        errors::{StudioError, UseCaseResult},
        identity::IdentityResolver,
    },
    domain::{
        entities::groups::GroupEntity,
        repositories::{
            attendance::AttendanceRepository, groups::GroupRepository,
            students::StudentRepository, teachers::TeacherRepository,
        },
        value_objects::{
            attendance::{
                AttendanceOutcome, AttendanceRoster, LessonAttendanceModel, RecordAttendanceModel,
            },
            groups::GroupModel,
            iam::{AuthSubject, can_manage_group},
            students::{StudentVisitModel, students_with_groups},
        },
    },
};

/// Lesson dates travel as `YYYY-MM-DD`.
pub fn parse_lesson_date(raw: &str) -> UseCaseResult<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| StudioError::Validation(format!("Invalid lesson date: {raw}")))
}

pub struct AttendanceUseCase<A, G, S, T>
where
    A: AttendanceRepository + Send + Sync + 'static,
    G: GroupRepository + Send + Sync + 'static,
    S: StudentRepository + Send + Sync + 'static,
    T: TeacherRepository + Send + Sync + 'static,
{
    attendance_repo: Arc<A>,
    group_repo: Arc<G>,
    student_repo: Arc<S>,
    identity_resolver: Arc<IdentityResolver<T>>,
}

impl<A, G, S, T> AttendanceUseCase<A, G, S, T>
where
    A: AttendanceRepository + Send + Sync + 'static,
    G: GroupRepository + Send + Sync + 'static,
    S: StudentRepository + Send + Sync + 'static,
    T: TeacherRepository + Send + Sync + 'static,
{
    pub fn new(
        attendance_repo: Arc<A>,
        group_repo: Arc<G>,
        student_repo: Arc<S>,
        identity_resolver: Arc<IdentityResolver<T>>,
    ) -> Self {
        Self {
            attendance_repo,
            group_repo,
            student_repo,
            identity_resolver,
        }
    }

    pub async fn lesson_attendance(
        &self,
        subject: AuthSubject,
        group_id: Uuid,
        lesson_date: NaiveDate,
    ) -> UseCaseResult<LessonAttendanceModel> {
        let (group, teacher_ids) = self.authorize(subject, group_id).await?;

        let group_students = self
            .student_repo
            .list_group_students(group_id)
            .await
            .map_err(StudioError::Internal)?;
        let other_students = self
            .student_repo
            .list_students_outside_group(group_id)
            .await
            .map_err(StudioError::Internal)?;

        let student_ids = group_students
            .iter()
            .chain(other_students.iter())
            .map(|(student, _)| student.id)
            .collect();
        let enrollments = self
            .student_repo
            .list_enrollments(student_ids)
            .await
            .map_err(StudioError::Internal)?;
        let (group_enrollments, other_enrollments): (Vec<_>, Vec<_>) = enrollments
            .into_iter()
            .partition(|enrollment| {
                group_students
                    .iter()
                    .any(|(student, _)| student.id == enrollment.student_id)
            });

        let existing_visits = self
            .attendance_repo
            .list_lesson_visits(group_id, lesson_date)
            .await
            .map_err(|err| {
                error!(%group_id, %lesson_date, db_error = ?err, "attendance: failed to load visits");
                StudioError::Internal(err)
            })?
            .into_iter()
            .map(StudentVisitModel::from)
            .collect();

        Ok(LessonAttendanceModel {
            group: GroupModel::from_entity(group, teacher_ids),
            lesson_date,
            group_students: students_with_groups(group_students, group_enrollments),
            existing_visits,
            other_students: students_with_groups(other_students, other_enrollments),
        })
    }

    /// Replaces the visits of one lesson occurrence with the submitted roster.
    pub async fn record_attendance(
        &self,
        subject: AuthSubject,
        group_id: Uuid,
        lesson_date: NaiveDate,
        record_attendance_model: RecordAttendanceModel,
    ) -> UseCaseResult<AttendanceOutcome> {
        self.authorize(subject, group_id).await?;

        let roster = AttendanceRoster::from_model(&record_attendance_model);
        self.ensure_students_exist(roster.student_ids()).await?;

        let outcome = self
            .attendance_repo
            .replace_lesson_attendance(
                group_id,
                lesson_date,
                roster,
                record_attendance_model.new_student,
            )
            .await
            .map_err(|err| {
                error!(
                    %group_id,
                    %lesson_date,
                    db_error = ?err,
                    "attendance: transaction rolled back"
                );
                StudioError::TransactionFailure(err)
            })?
            .ok_or(StudioError::NotFound("group"))?;

        info!(
            %group_id,
            %lesson_date,
            recorded_by = %subject.user_id,
            inserted = outcome.inserted,
            updated = outcome.updated,
            deleted = outcome.deleted,
            enrolled_new_student = outcome.enrolled_new_student,
            "attendance: lesson recorded"
        );

        Ok(outcome)
    }

    /// Admins, or teachers of this group. Checked before anything else touches the store.
    async fn authorize(
        &self,
        subject: AuthSubject,
        group_id: Uuid,
    ) -> UseCaseResult<(GroupEntity, Vec<Uuid>)> {
        let identity = self.identity_resolver.resolve(subject).await?;

        let group = self
            .group_repo
            .find_by_id(group_id)
            .await
            .map_err(StudioError::Internal)?
            .ok_or(StudioError::NotFound("group"))?;

        let teacher_ids = self
            .group_repo
            .list_teacher_ids(group_id)
            .await
            .map_err(StudioError::Internal)?;

        if !can_manage_group(&identity, &teacher_ids) {
            warn!(
                user_id = %identity.user_id,
                %group_id,
                "attendance: caller does not teach this group"
            );
            return Err(StudioError::Forbidden("group teachers only"));
        }

        Ok((group, teacher_ids))
    }

    async fn ensure_students_exist(&self, student_ids: Vec<Uuid>) -> UseCaseResult<()> {
        if student_ids.is_empty() {
            return Ok(());
        }

        let existing = self
            .student_repo
            .find_existing_ids(student_ids.clone())
            .await
            .map_err(StudioError::Internal)?;

        if let Some(missing) = student_ids.iter().find(|id| !existing.contains(id)) {
            warn!(student_id = %missing, "attendance: unknown student in roster");
            return Err(StudioError::NotFound("student"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        entities::{
            app_users::AppUserEntity,
            student_visits::StudentVisitEntity,
            students::{GroupStudentEntity, StudentEntity},
            teachers::TeacherEntity,
        },
        repositories::{
            attendance::MockAttendanceRepository, groups::MockGroupRepository,
            students::MockStudentRepository, teachers::MockTeacherRepository,
        },
    };
    use chrono::{TimeZone, Utc};
    use mockall::predicate::eq;
    use serde_json::json;

    type TestUseCase = AttendanceUseCase<
        MockAttendanceRepository,
        MockGroupRepository,
        MockStudentRepository,
        MockTeacherRepository,
    >;

    fn lesson_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 4, 8).unwrap()
    }

    fn subject() -> AuthSubject {
        AuthSubject {
            user_id: Uuid::new_v4(),
            is_staff: false,
        }
    }

    fn teacher_repo(teacher_id: Uuid) -> MockTeacherRepository {
        let mut teacher_repo = MockTeacherRepository::new();
        teacher_repo.expect_find_by_user_id().returning(move |user_id| {
            Box::pin(async move {
                Ok(Some(TeacherEntity {
                    id: teacher_id,
                    user_id,
                }))
            })
        });
        teacher_repo
    }

    fn group_repo(group_id: Uuid, teacher_ids: Vec<Uuid>) -> MockGroupRepository {
        let mut group_repo = MockGroupRepository::new();
        group_repo
            .expect_find_by_id()
            .with(eq(group_id))
            .returning(|group_id| {
                Box::pin(async move {
                    Ok(Some(GroupEntity {
                        id: group_id,
                        name: "Bachata improvers".to_string(),
                        schedule: json!([{"day": "tue", "time": "20:00"}]),
                        duration: "1h".to_string(),
                        start_at: NaiveDate::from_ymd_opt(2025, 1, 7).unwrap(),
                        finished_at: None,
                        location: "Hall 2".to_string(),
                    }))
                })
            });
        group_repo.expect_list_teacher_ids().returning(move |_| {
            let teacher_ids = teacher_ids.clone();
            Box::pin(async move { Ok(teacher_ids) })
        });
        group_repo
    }

    fn usecase(
        attendance_repo: MockAttendanceRepository,
        group_repo: MockGroupRepository,
        student_repo: MockStudentRepository,
        teacher_repo: MockTeacherRepository,
    ) -> TestUseCase {
        AttendanceUseCase::new(
            Arc::new(attendance_repo),
            Arc::new(group_repo),
            Arc::new(student_repo),
            Arc::new(IdentityResolver::new(Arc::new(teacher_repo))),
        )
    }

    fn student_row(student_id: Uuid, first_name: &str) -> (StudentEntity, AppUserEntity) {
        let user_id = Uuid::new_v4();
        (
            StudentEntity {
                id: student_id,
                user_id,
                phone: String::new(),
                notes: String::new(),
            },
            AppUserEntity {
                id: user_id,
                username: first_name.to_lowercase(),
                email: format!("{}@example.com", first_name.to_lowercase()),
                first_name: first_name.to_string(),
                last_name: "Test".to_string(),
                is_staff: false,
                created_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
            },
        )
    }

    fn students_exist(student_repo: &mut MockStudentRepository) {
        student_repo
            .expect_find_existing_ids()
            .returning(|student_ids| Box::pin(async move { Ok(student_ids) }));
    }

    #[test]
    fn lesson_date_must_be_iso() {
        assert_eq!(parse_lesson_date("2025-04-08").unwrap(), lesson_date());
        assert!(matches!(
            parse_lesson_date("08/04/2025"),
            Err(StudioError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn teacher_of_group_records_attendance() {
        let teacher_id = Uuid::new_v4();
        let group_id = Uuid::new_v4();
        let (s1, s2) = (Uuid::new_v4(), Uuid::new_v4());

        let mut student_repo = MockStudentRepository::new();
        students_exist(&mut student_repo);

        let mut attendance_repo = MockAttendanceRepository::new();
        attendance_repo
            .expect_replace_lesson_attendance()
            .withf(move |gid, date, roster, enroll| {
                *gid == group_id
                    && *date == lesson_date()
                    && roster.entries() == [(s1, false), (s2, true)]
                    && enroll.is_none()
            })
            .times(1)
            .returning(|_, _, roster, _| {
                let inserted = roster.entries().len();
                Box::pin(async move {
                    Ok(Some(AttendanceOutcome {
                        inserted,
                        ..AttendanceOutcome::default()
                    }))
                })
            });

        let usecase = usecase(
            attendance_repo,
            group_repo(group_id, vec![teacher_id]),
            student_repo,
            teacher_repo(teacher_id),
        );

        let outcome = usecase
            .record_attendance(
                subject(),
                group_id,
                lesson_date(),
                RecordAttendanceModel {
                    students: vec![s1, s2],
                    skipped: vec![s2],
                    new_student: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(outcome.inserted, 2);
    }

    #[tokio::test]
    async fn other_teacher_is_rejected_before_any_write() {
        let group_id = Uuid::new_v4();

        let mut attendance_repo = MockAttendanceRepository::new();
        attendance_repo.expect_replace_lesson_attendance().never();
        let mut student_repo = MockStudentRepository::new();
        student_repo.expect_find_existing_ids().never();

        let usecase = usecase(
            attendance_repo,
            group_repo(group_id, vec![Uuid::new_v4()]),
            student_repo,
            teacher_repo(Uuid::new_v4()),
        );

        let result = usecase
            .record_attendance(
                subject(),
                group_id,
                lesson_date(),
                RecordAttendanceModel {
                    students: vec![Uuid::new_v4()],
                    ..RecordAttendanceModel::default()
                },
            )
            .await;

        assert!(matches!(result, Err(StudioError::Forbidden(_))));
    }

    #[tokio::test]
    async fn admin_without_teacher_profile_may_record_any_group() {
        let group_id = Uuid::new_v4();
        let newcomer = Uuid::new_v4();

        let mut teacher_repo = MockTeacherRepository::new();
        teacher_repo
            .expect_find_by_user_id()
            .returning(|_| Box::pin(async { Ok(None) }));
        let mut student_repo = MockStudentRepository::new();
        students_exist(&mut student_repo);
        let mut attendance_repo = MockAttendanceRepository::new();
        attendance_repo
            .expect_replace_lesson_attendance()
            .withf(move |_, _, roster, enroll| {
                roster.student_ids() == vec![newcomer] && *enroll == Some(newcomer)
            })
            .returning(|_, _, _, _| {
                Box::pin(async {
                    Ok(Some(AttendanceOutcome {
                        inserted: 1,
                        enrolled_new_student: true,
                        ..AttendanceOutcome::default()
                    }))
                })
            });

        let usecase = usecase(
            attendance_repo,
            group_repo(group_id, vec![]),
            student_repo,
            teacher_repo,
        );
        let admin = AuthSubject {
            user_id: Uuid::new_v4(),
            is_staff: true,
        };

        let outcome = usecase
            .record_attendance(
                admin,
                group_id,
                lesson_date(),
                RecordAttendanceModel {
                    new_student: Some(newcomer),
                    ..RecordAttendanceModel::default()
                },
            )
            .await
            .unwrap();

        assert!(outcome.enrolled_new_student);
    }

    #[tokio::test]
    async fn unknown_group_is_not_found() {
        let mut group_repo = MockGroupRepository::new();
        group_repo
            .expect_find_by_id()
            .returning(|_| Box::pin(async { Ok(None) }));
        let mut attendance_repo = MockAttendanceRepository::new();
        attendance_repo.expect_replace_lesson_attendance().never();

        let usecase = usecase(
            attendance_repo,
            group_repo,
            MockStudentRepository::new(),
            teacher_repo(Uuid::new_v4()),
        );

        let result = usecase
            .record_attendance(
                subject(),
                Uuid::new_v4(),
                lesson_date(),
                RecordAttendanceModel::default(),
            )
            .await;

        assert!(matches!(result, Err(StudioError::NotFound("group"))));
    }

    #[tokio::test]
    async fn unknown_student_is_not_found() {
        let teacher_id = Uuid::new_v4();
        let group_id = Uuid::new_v4();
        let known = Uuid::new_v4();

        let mut student_repo = MockStudentRepository::new();
        student_repo
            .expect_find_existing_ids()
            .returning(move |_| Box::pin(async move { Ok(vec![known]) }));
        let mut attendance_repo = MockAttendanceRepository::new();
        attendance_repo.expect_replace_lesson_attendance().never();

        let usecase = usecase(
            attendance_repo,
            group_repo(group_id, vec![teacher_id]),
            student_repo,
            teacher_repo(teacher_id),
        );

        let result = usecase
            .record_attendance(
                subject(),
                group_id,
                lesson_date(),
                RecordAttendanceModel {
                    students: vec![known, Uuid::new_v4()],
                    ..RecordAttendanceModel::default()
                },
            )
            .await;

        assert!(matches!(result, Err(StudioError::NotFound("student"))));
    }

    #[tokio::test]
    async fn group_removed_before_lock_is_not_found() {
        let teacher_id = Uuid::new_v4();
        let group_id = Uuid::new_v4();

        let mut student_repo = MockStudentRepository::new();
        students_exist(&mut student_repo);
        let mut attendance_repo = MockAttendanceRepository::new();
        attendance_repo
            .expect_replace_lesson_attendance()
            .times(1)
            .returning(|_, _, _, _| Box::pin(async { Ok(None) }));

        let usecase = usecase(
            attendance_repo,
            group_repo(group_id, vec![teacher_id]),
            student_repo,
            teacher_repo(teacher_id),
        );

        let err = usecase
            .record_attendance(
                subject(),
                group_id,
                lesson_date(),
                RecordAttendanceModel {
                    students: vec![Uuid::new_v4()],
                    ..RecordAttendanceModel::default()
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, StudioError::NotFound("group")));
        assert_eq!(err.status_code(), axum::http::StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn store_failure_surfaces_as_transaction_failure() {
        let teacher_id = Uuid::new_v4();
        let group_id = Uuid::new_v4();

        let mut student_repo = MockStudentRepository::new();
        students_exist(&mut student_repo);
        let mut attendance_repo = MockAttendanceRepository::new();
        attendance_repo
            .expect_replace_lesson_attendance()
            .returning(|_, _, _, _| {
                Box::pin(async { Err(anyhow::anyhow!("deadlock detected")) })
            });

        let usecase = usecase(
            attendance_repo,
            group_repo(group_id, vec![teacher_id]),
            student_repo,
            teacher_repo(teacher_id),
        );

        let result = usecase
            .record_attendance(
                subject(),
                group_id,
                lesson_date(),
                RecordAttendanceModel {
                    students: vec![Uuid::new_v4()],
                    ..RecordAttendanceModel::default()
                },
            )
            .await;

        let err = result.unwrap_err();
        assert!(matches!(err, StudioError::TransactionFailure(_)));
        assert_eq!(err.status_code(), axum::http::StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn lesson_view_splits_enrolled_and_other_students() {
        let teacher_id = Uuid::new_v4();
        let group_id = Uuid::new_v4();
        let (enrolled, outsider) = (Uuid::new_v4(), Uuid::new_v4());
        let other_group = Uuid::new_v4();

        let mut student_repo = MockStudentRepository::new();
        student_repo
            .expect_list_group_students()
            .returning(move |_| Box::pin(async move { Ok(vec![student_row(enrolled, "Ana")]) }));
        student_repo
            .expect_list_students_outside_group()
            .returning(move |_| Box::pin(async move { Ok(vec![student_row(outsider, "Eka")]) }));
        student_repo.expect_list_enrollments().returning(move |_| {
            Box::pin(async move {
                Ok(vec![
                    GroupStudentEntity {
                        group_id,
                        student_id: enrolled,
                    },
                    GroupStudentEntity {
                        group_id: other_group,
                        student_id: outsider,
                    },
                ])
            })
        });

        let mut attendance_repo = MockAttendanceRepository::new();
        attendance_repo
            .expect_list_lesson_visits()
            .with(eq(group_id), eq(lesson_date()))
            .returning(move |group_id, date| {
                Box::pin(async move {
                    Ok(vec![StudentVisitEntity {
                        id: Uuid::new_v4(),
                        student_id: enrolled,
                        group_id,
                        date,
                        skipped: true,
                        notes: String::new(),
                    }])
                })
            });

        let usecase = usecase(
            attendance_repo,
            group_repo(group_id, vec![teacher_id]),
            student_repo,
            teacher_repo(teacher_id),
        );

        let view = usecase
            .lesson_attendance(subject(), group_id, lesson_date())
            .await
            .unwrap();

        assert_eq!(view.group.teacher_ids, vec![teacher_id]);
        assert_eq!(view.group_students[0].id, enrolled);
        assert_eq!(view.group_students[0].group_ids, vec![group_id]);
        assert_eq!(view.other_students[0].group_ids, vec![other_group]);
        assert_eq!(view.existing_visits.len(), 1);
        assert!(view.existing_visits[0].skipped);
    }
}
