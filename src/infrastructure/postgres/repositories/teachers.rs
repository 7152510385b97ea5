use anyhow::Result;
use async_trait::async_trait;
use diesel::{RunQueryDsl, prelude::*};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::{entities::teachers::TeacherEntity, repositories::teachers::TeacherRepository},
    infrastructure::postgres::{postgres_connection::PgPoolSquad, schema::teachers},
};

pub struct TeacherPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl TeacherPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl TeacherRepository for TeacherPostgres {
    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Option<TeacherEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = teachers::table
            .filter(teachers::user_id.eq(user_id))
            .select(TeacherEntity::as_select())
            .first::<TeacherEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn find_existing_ids(&self, teacher_ids: Vec<Uuid>) -> Result<Vec<Uuid>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = teachers::table
            .filter(teachers::id.eq_any(teacher_ids))
            .select(teachers::id)
            .load::<Uuid>(&mut conn)?;

        Ok(results)
    }
}
