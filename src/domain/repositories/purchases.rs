use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::{
    passes::PassEntity,
    purchases::{InsertPurchaseEntity, MarkPurchasePaidEntity, PurchaseEntity},
};

#[async_trait]
#[automock]
pub trait PurchaseRepository {
    async fn create_purchase(
        &self,
        insert_purchase_entity: InsertPurchaseEntity,
    ) -> Result<PurchaseEntity>;
    async fn find_by_id(&self, purchase_id: Uuid) -> Result<Option<PurchaseEntity>>;
    /// Applies the change only while `paid_at` is still null. Returns whether a row changed.
    async fn mark_paid_if_unpaid(
        &self,
        purchase_id: Uuid,
        mark_paid_entity: MarkPurchasePaidEntity,
    ) -> Result<bool>;
    /// Newest first.
    async fn list_by_student(&self, student_id: Uuid) -> Result<Vec<PurchaseEntity>>;
    async fn list_paid_with_passes(
        &self,
        student_id: Uuid,
    ) -> Result<Vec<(PurchaseEntity, PassEntity)>>;
}
