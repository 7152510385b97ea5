use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::teachers::TeacherEntity;

#[async_trait]
#[automock]
pub trait TeacherRepository {
    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Option<TeacherEntity>>;
    async fn find_existing_ids(&self, teacher_ids: Vec<Uuid>) -> Result<Vec<Uuid>>;
}
