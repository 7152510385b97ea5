use std::sync::Arc;

use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
    application::usecases::{
        errors::{StudioError, UseCaseResult},
        identity::IdentityResolver,
        pass_credits::PassCreditUseCase,
    },
    domain::{
        entities::{
            app_users::AppUserEntity,
            students::{InsertStudentEntity, StudentEntity},
        },
        repositories::{
            attendance::AttendanceRepository, groups::GroupRepository,
            purchases::PurchaseRepository, students::StudentRepository,
            teachers::TeacherRepository,
        },
        value_objects::{
            active_passes::ActivePassModel,
            iam::AuthSubject,
            purchases::PurchaseModel,
            students::{
                InsertStudentModel, StudentDetailModel, StudentModel, StudentVisitModel,
                students_with_groups,
            },
        },
    },
};

pub const RECENT_VISITS_LIMIT: i64 = 10;

pub struct StudentUseCase<S, G, Pur, A, T>
where
    S: StudentRepository + Send + Sync + 'static,
    G: GroupRepository + Send + Sync + 'static,
    Pur: PurchaseRepository + Send + Sync + 'static,
    A: AttendanceRepository + Send + Sync + 'static,
    T: TeacherRepository + Send + Sync + 'static,
{
    student_repo: Arc<S>,
    group_repo: Arc<G>,
    purchase_repo: Arc<Pur>,
    attendance_repo: Arc<A>,
    pass_credits: Arc<PassCreditUseCase<Pur, A>>,
    identity_resolver: Arc<IdentityResolver<T>>,
}

impl<S, G, Pur, A, T> StudentUseCase<S, G, Pur, A, T>
where
    S: StudentRepository + Send + Sync + 'static,
    G: GroupRepository + Send + Sync + 'static,
    Pur: PurchaseRepository + Send + Sync + 'static,
    A: AttendanceRepository + Send + Sync + 'static,
    T: TeacherRepository + Send + Sync + 'static,
{
    pub fn new(
        student_repo: Arc<S>,
        group_repo: Arc<G>,
        purchase_repo: Arc<Pur>,
        attendance_repo: Arc<A>,
        identity_resolver: Arc<IdentityResolver<T>>,
    ) -> Self {
        let pass_credits = Arc::new(PassCreditUseCase::new(
            Arc::clone(&purchase_repo),
            Arc::clone(&attendance_repo),
        ));

        Self {
            student_repo,
            group_repo,
            purchase_repo,
            attendance_repo,
            pass_credits,
            identity_resolver,
        }
    }

    pub async fn add_student(
        &self,
        subject: AuthSubject,
        insert_student_model: InsertStudentModel,
    ) -> UseCaseResult<StudentModel> {
        let identity = self.identity_resolver.resolve_staff(subject).await?;

        if insert_student_model.first_name.trim().is_empty()
            || insert_student_model.last_name.trim().is_empty()
        {
            return Err(StudioError::Validation(
                "First and last name are required".to_string(),
            ));
        }
        if !insert_student_model.email.contains('@') {
            return Err(StudioError::Validation("Enter a valid email address".to_string()));
        }

        let username = insert_student_model.username();
        let taken = self
            .student_repo
            .username_taken(username.clone())
            .await
            .map_err(StudioError::Internal)?;
        if taken {
            warn!(%username, "students: username already in use");
            return Err(StudioError::Validation(format!(
                "Username {username} is already in use"
            )));
        }

        let mut group_ids = insert_student_model.group_ids.clone();
        group_ids.sort_unstable();
        group_ids.dedup();
        for group_id in &group_ids {
            self.group_repo
                .find_by_id(*group_id)
                .await
                .map_err(StudioError::Internal)?
                .ok_or_else(|| StudioError::Validation(format!("Unknown group: {group_id}")))?;
        }

        let insert_student_entity = InsertStudentEntity {
            phone: insert_student_model.phone.trim().to_string(),
            notes: insert_student_model.notes.clone(),
        };

        let student_id = self
            .student_repo
            .create_student(
                insert_student_model.to_user_entity(),
                insert_student_entity,
                group_ids.clone(),
            )
            .await
            .map_err(|err| {
                error!(db_error = ?err, "students: failed to create student");
                StudioError::Internal(err)
            })?;

        info!(
            %student_id,
            created_by = %identity.user_id,
            groups = group_ids.len(),
            "students: student added"
        );

        let (student, user) = self.find_student(student_id).await?;
        Ok(StudentModel::from_entities(student, user, group_ids))
    }

    pub async fn list_students(&self, subject: AuthSubject) -> UseCaseResult<Vec<StudentModel>> {
        self.identity_resolver.resolve_staff(subject).await?;

        let rows = self.student_repo.list_students().await.map_err(|err| {
            error!(db_error = ?err, "students: failed to list students");
            StudioError::Internal(err)
        })?;

        self.with_group_ids(rows).await
    }

    pub async fn student_detail(
        &self,
        subject: AuthSubject,
        student_id: Uuid,
    ) -> UseCaseResult<StudentDetailModel> {
        self.identity_resolver.resolve_staff(subject).await?;

        let row = self.find_student(student_id).await?;
        let student = self
            .with_group_ids(vec![row])
            .await?
            .pop()
            .ok_or(StudioError::NotFound("student"))?;

        let active_passes = self.pass_credits.active_passes(student_id).await?;

        let recent_visits = self
            .attendance_repo
            .list_recent_visits(student_id, RECENT_VISITS_LIMIT)
            .await
            .map_err(StudioError::Internal)?
            .into_iter()
            .map(StudentVisitModel::from)
            .collect();

        let purchases = self
            .purchase_repo
            .list_by_student(student_id)
            .await
            .map_err(StudioError::Internal)?
            .into_iter()
            .map(PurchaseModel::from)
            .collect();

        Ok(StudentDetailModel {
            student,
            active_passes,
            recent_visits,
            purchases,
        })
    }

    pub async fn active_passes(
        &self,
        subject: AuthSubject,
        student_id: Uuid,
    ) -> UseCaseResult<Vec<ActivePassModel>> {
        self.identity_resolver.resolve_staff(subject).await?;
        self.find_student(student_id).await?;
        self.pass_credits.active_passes(student_id).await
    }

    async fn find_student(&self, student_id: Uuid) -> UseCaseResult<(StudentEntity, AppUserEntity)> {
        self.student_repo
            .find_by_id(student_id)
            .await
            .map_err(|err| {
                error!(%student_id, db_error = ?err, "students: failed to load student");
                StudioError::Internal(err)
            })?
            .ok_or(StudioError::NotFound("student"))
    }

    async fn with_group_ids(
        &self,
        rows: Vec<(StudentEntity, AppUserEntity)>,
    ) -> UseCaseResult<Vec<StudentModel>> {
        let student_ids = rows.iter().map(|(student, _)| student.id).collect();
        let enrollments = self
            .student_repo
            .list_enrollments(student_ids)
            .await
            .map_err(StudioError::Internal)?;

        Ok(students_with_groups(rows, enrollments))
    }
}
