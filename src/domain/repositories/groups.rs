use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::{
    groups::{GroupEntity, InsertGroupEntity},
    teachers::GroupTeacherEntity,
};

#[async_trait]
#[automock]
pub trait GroupRepository {
    /// Inserts the group and its teacher links in one transaction.
    async fn create_group(
        &self,
        insert_group_entity: InsertGroupEntity,
        teacher_ids: Vec<Uuid>,
    ) -> Result<GroupEntity>;
    async fn find_by_id(&self, group_id: Uuid) -> Result<Option<GroupEntity>>;
    async fn list_active_groups(&self, teacher_id: Option<Uuid>) -> Result<Vec<GroupEntity>>;
    async fn list_teacher_ids(&self, group_id: Uuid) -> Result<Vec<Uuid>>;
    async fn list_teacher_links(&self, group_ids: Vec<Uuid>) -> Result<Vec<GroupTeacherEntity>>;
}
