use std::{collections::HashMap, sync::Arc};

use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
    application::usecases::{
        errors::{StudioError, UseCaseResult},
        identity::IdentityResolver,
    },
    domain::{
        repositories::{
            groups::GroupRepository, passes::PassRepository, teachers::TeacherRepository,
        },
        value_objects::{
            groups::{GroupModel, InsertGroupModel, InsertPassModel, PassModel},
            iam::AuthSubject,
            schedule::Schedule,
        },
    },
};

pub struct GroupUseCase<G, P, T>
where
    G: GroupRepository + Send + Sync + 'static,
    P: PassRepository + Send + Sync + 'static,
    T: TeacherRepository + Send + Sync + 'static,
{
    group_repo: Arc<G>,
    pass_repo: Arc<P>,
    teacher_repo: Arc<T>,
    identity_resolver: Arc<IdentityResolver<T>>,
}

impl<G, P, T> GroupUseCase<G, P, T>
where
    G: GroupRepository + Send + Sync + 'static,
    P: PassRepository + Send + Sync + 'static,
    T: TeacherRepository + Send + Sync + 'static,
{
    pub fn new(
        group_repo: Arc<G>,
        pass_repo: Arc<P>,
        teacher_repo: Arc<T>,
        identity_resolver: Arc<IdentityResolver<T>>,
    ) -> Self {
        Self {
            group_repo,
            pass_repo,
            teacher_repo,
            identity_resolver,
        }
    }

    pub async fn create_group(
        &self,
        subject: AuthSubject,
        insert_group_model: InsertGroupModel,
    ) -> UseCaseResult<GroupModel> {
        let identity = self.identity_resolver.resolve_admin(subject).await.map_err(|err| {
            warn!(user_id = %subject.user_id, "groups: create rejected for non-admin");
            err
        })?;

        if insert_group_model.name.trim().is_empty() {
            return Err(StudioError::Validation("Group name is required".to_string()));
        }
        if insert_group_model.duration.trim().is_empty() {
            return Err(StudioError::Validation("Duration is required".to_string()));
        }
        if let Some(finished_at) = insert_group_model.finished_at {
            if finished_at < insert_group_model.start_at {
                return Err(StudioError::Validation(
                    "Finish date must not precede start date".to_string(),
                ));
            }
        }

        let schedule = Schedule::from_input(&insert_group_model.schedule).map_err(|err| {
            warn!(error = %err, "groups: invalid schedule");
            StudioError::from(err)
        })?;

        let mut teacher_ids = insert_group_model.teacher_ids.clone();
        teacher_ids.sort_unstable();
        teacher_ids.dedup();
        self.ensure_teachers_exist(&teacher_ids).await?;

        let entity = self
            .group_repo
            .create_group(insert_group_model.to_entity(&schedule), teacher_ids.clone())
            .await
            .map_err(|err| {
                error!(db_error = ?err, "groups: failed to create group");
                StudioError::Internal(err)
            })?;

        info!(
            group_id = %entity.id,
            created_by = %identity.user_id,
            slots = schedule.entries().len(),
            "groups: group created"
        );

        Ok(GroupModel::from_entity(entity, teacher_ids))
    }

    /// Groups without a finish date. Teachers only see the groups they teach.
    pub async fn list_active_groups(&self, subject: AuthSubject) -> UseCaseResult<Vec<GroupModel>> {
        let identity = self.identity_resolver.resolve_staff(subject).await?;
        let teacher_filter = if identity.is_admin() {
            None
        } else {
            identity.teacher_id
        };

        let groups = self
            .group_repo
            .list_active_groups(teacher_filter)
            .await
            .map_err(|err| {
                error!(db_error = ?err, "groups: failed to list active groups");
                StudioError::Internal(err)
            })?;

        let group_ids = groups.iter().map(|group| group.id).collect();
        let links = self
            .group_repo
            .list_teacher_links(group_ids)
            .await
            .map_err(StudioError::Internal)?;

        let mut teachers_by_group: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
        for link in links {
            teachers_by_group
                .entry(link.group_id)
                .or_default()
                .push(link.teacher_id);
        }

        Ok(groups
            .into_iter()
            .map(|group| {
                let teacher_ids = teachers_by_group.remove(&group.id).unwrap_or_default();
                GroupModel::from_entity(group, teacher_ids)
            })
            .collect())
    }

    pub async fn create_pass(
        &self,
        subject: AuthSubject,
        group_id: Uuid,
        insert_pass_model: InsertPassModel,
    ) -> UseCaseResult<PassModel> {
        self.identity_resolver.resolve_admin(subject).await?;

        if insert_pass_model.name.trim().is_empty() {
            return Err(StudioError::Validation("Pass name is required".to_string()));
        }
        if insert_pass_model.price_minor < 0 {
            return Err(StudioError::Validation("Price must not be negative".to_string()));
        }
        if insert_pass_model.lessons_included < 0 || insert_pass_model.skips_included < 0 {
            return Err(StudioError::Validation(
                "Lesson and skip counts must not be negative".to_string(),
            ));
        }

        self.group_repo
            .find_by_id(group_id)
            .await
            .map_err(StudioError::Internal)?
            .ok_or(StudioError::NotFound("group"))?;

        let pass = self
            .pass_repo
            .create_pass(insert_pass_model.to_entity(group_id))
            .await
            .map_err(|err| {
                error!(%group_id, db_error = ?err, "groups: failed to create pass");
                StudioError::Internal(err)
            })?;

        info!(%group_id, pass_id = %pass.id, "groups: pass created");
        Ok(PassModel::from(pass))
    }

    async fn ensure_teachers_exist(&self, teacher_ids: &[Uuid]) -> UseCaseResult<()> {
        if teacher_ids.is_empty() {
            return Ok(());
        }

        let existing = self
            .teacher_repo
            .find_existing_ids(teacher_ids.to_vec())
            .await
            .map_err(StudioError::Internal)?;

        match teacher_ids.iter().find(|id| !existing.contains(id)) {
            Some(missing) => Err(StudioError::Validation(format!("Unknown teacher: {missing}"))),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        entities::{
            groups::GroupEntity,
            passes::PassEntity,
            teachers::{GroupTeacherEntity, TeacherEntity},
        },
        repositories::{
            groups::MockGroupRepository, passes::MockPassRepository,
            teachers::MockTeacherRepository,
        },
        value_objects::enums::week_days::WeekDay,
    };
    use chrono::NaiveDate;
    use serde_json::json;

    fn admin() -> AuthSubject {
        AuthSubject {
            user_id: Uuid::new_v4(),
            is_staff: true,
        }
    }

    fn teacher_repo_without_profiles() -> MockTeacherRepository {
        let mut teacher_repo = MockTeacherRepository::new();
        teacher_repo
            .expect_find_by_user_id()
            .returning(|_| Box::pin(async { Ok(None) }));
        teacher_repo
    }

    fn usecase(
        group_repo: MockGroupRepository,
        pass_repo: MockPassRepository,
        teacher_repo: MockTeacherRepository,
    ) -> GroupUseCase<MockGroupRepository, MockPassRepository, MockTeacherRepository> {
        let teacher_repo = Arc::new(teacher_repo);
        GroupUseCase::new(
            Arc::new(group_repo),
            Arc::new(pass_repo),
            Arc::clone(&teacher_repo),
            Arc::new(IdentityResolver::new(teacher_repo)),
        )
    }

    fn insert_model(schedule: serde_json::Value) -> InsertGroupModel {
        InsertGroupModel {
            name: "Salsa beginners".to_string(),
            schedule,
            duration: "90min".to_string(),
            start_at: NaiveDate::from_ymd_opt(2025, 2, 3).unwrap(),
            finished_at: None,
            location: "Studio A".to_string(),
            teacher_ids: vec![],
        }
    }

    fn group_entity(group_id: Uuid) -> GroupEntity {
        GroupEntity {
            id: group_id,
            name: "Salsa beginners".to_string(),
            schedule: json!([{"day": "tue", "time": "19:30"}]),
            duration: "90min".to_string(),
            start_at: NaiveDate::from_ymd_opt(2025, 2, 3).unwrap(),
            finished_at: None,
            location: "Studio A".to_string(),
        }
    }

    #[tokio::test]
    async fn admin_creates_group_with_normalized_schedule() {
        let group_id = Uuid::new_v4();
        let mut group_repo = MockGroupRepository::new();
        group_repo
            .expect_create_group()
            .withf(|entity, teacher_ids| {
                entity.schedule == json!([{"day": "tue", "time": "19:30"}]) && teacher_ids.is_empty()
            })
            .times(1)
            .returning(move |_, _| Box::pin(async move { Ok(group_entity(group_id)) }));

        let usecase = usecase(
            group_repo,
            MockPassRepository::new(),
            teacher_repo_without_profiles(),
        );

        let group = usecase
            .create_group(
                admin(),
                insert_model(json!(r#"[{"day": "tue", "time": "19:30"}]"#)),
            )
            .await
            .unwrap();

        assert_eq!(group.id, group_id);
        assert_eq!(group.schedule.entries()[0].day, WeekDay::Tue);
        assert!(group.finished_at.is_none());
    }

    #[tokio::test]
    async fn invalid_schedule_is_rejected_before_any_write() {
        let mut group_repo = MockGroupRepository::new();
        group_repo.expect_create_group().never();

        let usecase = usecase(
            group_repo,
            MockPassRepository::new(),
            teacher_repo_without_profiles(),
        );

        let result = usecase
            .create_group(admin(), insert_model(json!([{"day": "someday", "time": "19:30"}])))
            .await;

        assert!(matches!(result, Err(StudioError::Validation(msg)) if msg.starts_with("Invalid day")));
    }

    #[tokio::test]
    async fn teacher_cannot_create_group() {
        let mut teacher_repo = MockTeacherRepository::new();
        teacher_repo.expect_find_by_user_id().returning(|user_id| {
            Box::pin(async move {
                Ok(Some(TeacherEntity {
                    id: Uuid::new_v4(),
                    user_id,
                }))
            })
        });
        let mut group_repo = MockGroupRepository::new();
        group_repo.expect_create_group().never();

        let usecase = usecase(group_repo, MockPassRepository::new(), teacher_repo);
        let subject = AuthSubject {
            user_id: Uuid::new_v4(),
            is_staff: false,
        };

        let result = usecase.create_group(subject, insert_model(json!([]))).await;
        assert!(matches!(result, Err(StudioError::Forbidden(_))));
    }

    #[tokio::test]
    async fn unknown_teacher_is_a_validation_error() {
        let missing = Uuid::new_v4();
        let mut teacher_repo = teacher_repo_without_profiles();
        teacher_repo
            .expect_find_existing_ids()
            .returning(|_| Box::pin(async { Ok(vec![]) }));
        let mut group_repo = MockGroupRepository::new();
        group_repo.expect_create_group().never();

        let usecase = usecase(group_repo, MockPassRepository::new(), teacher_repo);
        let mut model = insert_model(json!([]));
        model.teacher_ids = vec![missing];

        let result = usecase.create_group(admin(), model).await;
        assert!(matches!(result, Err(StudioError::Validation(msg)) if msg.contains(&missing.to_string())));
    }

    #[tokio::test]
    async fn list_attaches_teacher_ids() {
        let group_id = Uuid::new_v4();
        let teacher_id = Uuid::new_v4();

        let mut group_repo = MockGroupRepository::new();
        group_repo
            .expect_list_active_groups()
            .withf(|teacher_filter| teacher_filter.is_none())
            .returning(move |_| Box::pin(async move { Ok(vec![group_entity(group_id)]) }));
        group_repo.expect_list_teacher_links().returning(move |_| {
            Box::pin(async move {
                Ok(vec![GroupTeacherEntity {
                    group_id,
                    teacher_id,
                }])
            })
        });

        let usecase = usecase(
            group_repo,
            MockPassRepository::new(),
            teacher_repo_without_profiles(),
        );

        let groups = usecase.list_active_groups(admin()).await.unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].teacher_ids, vec![teacher_id]);
    }

    #[tokio::test]
    async fn negative_pass_price_is_rejected() {
        let mut pass_repo = MockPassRepository::new();
        pass_repo.expect_create_pass().never();

        let usecase = usecase(
            MockGroupRepository::new(),
            pass_repo,
            teacher_repo_without_profiles(),
        );

        let result = usecase
            .create_pass(
                admin(),
                Uuid::new_v4(),
                InsertPassModel {
                    name: "8 lessons".to_string(),
                    price_minor: -1,
                    lessons_included: 8,
                    skips_included: 0,
                },
            )
            .await;

        assert!(matches!(result, Err(StudioError::Validation(_))));
    }

    #[tokio::test]
    async fn creates_pass_for_existing_group() {
        let group_id = Uuid::new_v4();
        let mut group_repo = MockGroupRepository::new();
        group_repo
            .expect_find_by_id()
            .returning(move |_| Box::pin(async move { Ok(Some(group_entity(group_id))) }));
        let mut pass_repo = MockPassRepository::new();
        pass_repo.expect_create_pass().returning(|entity| {
            Box::pin(async move {
                Ok(PassEntity {
                    id: Uuid::new_v4(),
                    group_id: entity.group_id,
                    name: entity.name,
                    price_minor: entity.price_minor,
                    lessons_included: entity.lessons_included,
                    skips_included: entity.skips_included,
                })
            })
        });

        let usecase = usecase(group_repo, pass_repo, teacher_repo_without_profiles());
        let pass = usecase
            .create_pass(
                admin(),
                group_id,
                InsertPassModel {
                    name: " 8 lessons ".to_string(),
                    price_minor: 12000,
                    lessons_included: 8,
                    skips_included: 2,
                },
            )
            .await
            .unwrap();

        assert_eq!(pass.group_id, group_id);
        assert_eq!(pass.name, "8 lessons");
        assert_eq!(pass.lessons_included, 8);
    }
}
