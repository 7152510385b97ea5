use anyhow::Result;
use async_trait::async_trait;
use diesel::{RunQueryDsl, insert_into, prelude::*, update};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::{
        entities::{
            passes::PassEntity,
            purchases::{InsertPurchaseEntity, MarkPurchasePaidEntity, PurchaseEntity},
        },
        repositories::purchases::PurchaseRepository,
    },
    infrastructure::postgres::{
        postgres_connection::PgPoolSquad,
        schema::{passes, purchases},
    },
};

pub struct PurchasePostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl PurchasePostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl PurchaseRepository for PurchasePostgres {
    async fn create_purchase(
        &self,
        insert_purchase_entity: InsertPurchaseEntity,
    ) -> Result<PurchaseEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = insert_into(purchases::table)
            .values(&insert_purchase_entity)
            .returning(PurchaseEntity::as_returning())
            .get_result::<PurchaseEntity>(&mut conn)?;

        Ok(result)
    }

    async fn find_by_id(&self, purchase_id: Uuid) -> Result<Option<PurchaseEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = purchases::table
            .find(purchase_id)
            .select(PurchaseEntity::as_select())
            .first::<PurchaseEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn mark_paid_if_unpaid(
        &self,
        purchase_id: Uuid,
        mark_paid_entity: MarkPurchasePaidEntity,
    ) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        // The paid_at guard makes the first writer win; later calls touch zero rows.
        let affected = update(purchases::table)
            .filter(purchases::id.eq(purchase_id))
            .filter(purchases::paid_at.is_null())
            .set(&mark_paid_entity)
            .execute(&mut conn)?;

        Ok(affected > 0)
    }

    async fn list_by_student(&self, student_id: Uuid) -> Result<Vec<PurchaseEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = purchases::table
            .filter(purchases::student_id.eq(student_id))
            .order(purchases::created_at.desc())
            .select(PurchaseEntity::as_select())
            .load::<PurchaseEntity>(&mut conn)?;

        Ok(results)
    }

    async fn list_paid_with_passes(
        &self,
        student_id: Uuid,
    ) -> Result<Vec<(PurchaseEntity, PassEntity)>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = purchases::table
            .inner_join(passes::table)
            .filter(purchases::student_id.eq(student_id))
            .filter(purchases::paid_at.is_not_null())
            .order(purchases::created_at.desc())
            .select((PurchaseEntity::as_select(), PassEntity::as_select()))
            .load::<(PurchaseEntity, PassEntity)>(&mut conn)?;

        Ok(results)
    }
}
