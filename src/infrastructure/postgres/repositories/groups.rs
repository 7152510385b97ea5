use anyhow::Result;
use async_trait::async_trait;
use diesel::{Connection, RunQueryDsl, insert_into, prelude::*};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::{
        entities::{
            groups::{GroupEntity, InsertGroupEntity},
            teachers::GroupTeacherEntity,
        },
        repositories::groups::GroupRepository,
    },
    infrastructure::postgres::{
        postgres_connection::PgPoolSquad,
        schema::{dance_groups, group_teachers},
    },
};

pub struct GroupPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl GroupPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl GroupRepository for GroupPostgres {
    async fn create_group(
        &self,
        insert_group_entity: InsertGroupEntity,
        teacher_ids: Vec<Uuid>,
    ) -> Result<GroupEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = conn.transaction::<GroupEntity, diesel::result::Error, _>(|tx| {
            let group = insert_into(dance_groups::table)
                .values(&insert_group_entity)
                .returning(GroupEntity::as_returning())
                .get_result::<GroupEntity>(tx)?;

            let links: Vec<GroupTeacherEntity> = teacher_ids
                .iter()
                .map(|teacher_id| GroupTeacherEntity {
                    group_id: group.id,
                    teacher_id: *teacher_id,
                })
                .collect();

            if !links.is_empty() {
                insert_into(group_teachers::table)
                    .values(&links)
                    .execute(tx)?;
            }

            Ok(group)
        })?;

        Ok(result)
    }

    async fn find_by_id(&self, group_id: Uuid) -> Result<Option<GroupEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = dance_groups::table
            .find(group_id)
            .select(GroupEntity::as_select())
            .first::<GroupEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn list_active_groups(&self, teacher_id: Option<Uuid>) -> Result<Vec<GroupEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;
        let mut query = dance_groups::table
            .filter(dance_groups::finished_at.is_null())
            .select(GroupEntity::as_select())
            .into_boxed();

        if let Some(teacher_id) = teacher_id {
            query = query.filter(
                dance_groups::id.eq_any(
                    group_teachers::table
                        .filter(group_teachers::teacher_id.eq(teacher_id))
                        .select(group_teachers::group_id),
                ),
            );
        }

        let results = query
            .order((dance_groups::start_at.asc(), dance_groups::name.asc()))
            .load::<GroupEntity>(&mut conn)?;

        Ok(results)
    }

    async fn list_teacher_ids(&self, group_id: Uuid) -> Result<Vec<Uuid>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = group_teachers::table
            .filter(group_teachers::group_id.eq(group_id))
            .select(group_teachers::teacher_id)
            .load::<Uuid>(&mut conn)?;

        Ok(results)
    }

    async fn list_teacher_links(&self, group_ids: Vec<Uuid>) -> Result<Vec<GroupTeacherEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = group_teachers::table
            .filter(group_teachers::group_id.eq_any(group_ids))
            .select((group_teachers::group_id, group_teachers::teacher_id))
            .load::<GroupTeacherEntity>(&mut conn)?;

        Ok(results)
    }
}
