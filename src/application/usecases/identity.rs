use std::sync::Arc;

use tracing::{debug, error};

use crate::{
    application::usecases::errors::{StudioError, UseCaseResult},
    domain::{
        repositories::teachers::TeacherRepository,
        value_objects::iam::{ActingIdentity, AuthSubject},
    },
};

/// Turns an authenticated subject into an identity with its roles resolved from the store.
pub struct IdentityResolver<T>
where
    T: TeacherRepository + Send + Sync + 'static,
{
    teacher_repo: Arc<T>,
}

impl<T> IdentityResolver<T>
where
    T: TeacherRepository + Send + Sync + 'static,
{
    pub fn new(teacher_repo: Arc<T>) -> Self {
        Self { teacher_repo }
    }

    pub async fn resolve(&self, subject: AuthSubject) -> UseCaseResult<ActingIdentity> {
        let teacher = self
            .teacher_repo
            .find_by_user_id(subject.user_id)
            .await
            .map_err(|err| {
                error!(
                    user_id = %subject.user_id,
                    db_error = ?err,
                    "identity: failed to load teacher profile"
                );
                StudioError::Internal(err)
            })?;

        let identity = ActingIdentity {
            user_id: subject.user_id,
            is_admin: subject.is_staff,
            teacher_id: teacher.map(|teacher| teacher.id),
        };
        debug!(
            user_id = %identity.user_id,
            is_admin = identity.is_admin,
            is_teacher = identity.is_teacher(),
            "identity: resolved"
        );

        Ok(identity)
    }

    pub async fn resolve_staff(&self, subject: AuthSubject) -> UseCaseResult<ActingIdentity> {
        let identity = self.resolve(subject).await?;
        if !identity.is_studio_staff() {
            return Err(StudioError::Forbidden("studio staff only"));
        }
        Ok(identity)
    }

    pub async fn resolve_admin(&self, subject: AuthSubject) -> UseCaseResult<ActingIdentity> {
        let identity = self.resolve(subject).await?;
        if !identity.is_admin() {
            return Err(StudioError::Forbidden("administrators only"));
        }
        Ok(identity)
    }
}
