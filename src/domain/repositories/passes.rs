use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::{
    groups::GroupEntity,
    passes::{InsertPassEntity, PassEntity},
};

#[async_trait]
#[automock]
pub trait PassRepository {
    async fn create_pass(&self, insert_pass_entity: InsertPassEntity) -> Result<PassEntity>;
    async fn find_with_group(&self, pass_id: Uuid) -> Result<Option<(PassEntity, GroupEntity)>>;
}
