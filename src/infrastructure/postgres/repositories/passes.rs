use anyhow::Result;
use async_trait::async_trait;
use diesel::{RunQueryDsl, insert_into, prelude::*};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::{
        entities::{
            groups::GroupEntity,
            passes::{InsertPassEntity, PassEntity},
        },
        repositories::passes::PassRepository,
    },
    infrastructure::postgres::{
        postgres_connection::PgPoolSquad,
        schema::{dance_groups, passes},
    },
};

pub struct PassPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl PassPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl PassRepository for PassPostgres {
    async fn create_pass(&self, insert_pass_entity: InsertPassEntity) -> Result<PassEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = insert_into(passes::table)
            .values(&insert_pass_entity)
            .returning(PassEntity::as_returning())
            .get_result::<PassEntity>(&mut conn)?;

        Ok(result)
    }

    async fn find_with_group(&self, pass_id: Uuid) -> Result<Option<(PassEntity, GroupEntity)>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = passes::table
            .inner_join(dance_groups::table)
            .filter(passes::id.eq(pass_id))
            .select((PassEntity::as_select(), GroupEntity::as_select()))
            .first::<(PassEntity, GroupEntity)>(&mut conn)
            .optional()?;

        Ok(result)
    }
}
