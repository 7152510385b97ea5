use anyhow::Result;
use async_trait::async_trait;
use diesel::{Connection, RunQueryDsl, dsl::exists, insert_into, prelude::*, select};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::{
        entities::{
            app_users::{AppUserEntity, InsertAppUserEntity},
            students::{GroupStudentEntity, InsertStudentEntity, StudentEntity},
        },
        repositories::students::StudentRepository,
    },
    infrastructure::postgres::{
        postgres_connection::PgPoolSquad,
        schema::{app_users, group_students, students},
    },
};

pub struct StudentPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl StudentPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl StudentRepository for StudentPostgres {
    async fn create_student(
        &self,
        insert_user_entity: InsertAppUserEntity,
        insert_student_entity: InsertStudentEntity,
        group_ids: Vec<Uuid>,
    ) -> Result<Uuid> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = conn.transaction::<Uuid, diesel::result::Error, _>(|tx| {
            let user_id = insert_into(app_users::table)
                .values(&insert_user_entity)
                .returning(app_users::id)
                .get_result::<Uuid>(tx)?;

            let student_id = insert_into(students::table)
                .values((&insert_student_entity, students::user_id.eq(user_id)))
                .returning(students::id)
                .get_result::<Uuid>(tx)?;

            let enrollments: Vec<GroupStudentEntity> = group_ids
                .iter()
                .map(|group_id| GroupStudentEntity {
                    group_id: *group_id,
                    student_id,
                })
                .collect();

            if !enrollments.is_empty() {
                insert_into(group_students::table)
                    .values(&enrollments)
                    .execute(tx)?;
            }

            Ok(student_id)
        })?;

        Ok(result)
    }

    async fn find_by_id(&self, student_id: Uuid) -> Result<Option<(StudentEntity, AppUserEntity)>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = students::table
            .inner_join(app_users::table)
            .filter(students::id.eq(student_id))
            .select((StudentEntity::as_select(), AppUserEntity::as_select()))
            .first::<(StudentEntity, AppUserEntity)>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn username_taken(&self, username: String) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let taken = select(exists(
            app_users::table.filter(app_users::username.eq(username)),
        ))
        .get_result::<bool>(&mut conn)?;

        Ok(taken)
    }

    async fn find_existing_ids(&self, student_ids: Vec<Uuid>) -> Result<Vec<Uuid>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = students::table
            .filter(students::id.eq_any(student_ids))
            .select(students::id)
            .load::<Uuid>(&mut conn)?;

        Ok(results)
    }

    async fn list_students(&self) -> Result<Vec<(StudentEntity, AppUserEntity)>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = students::table
            .inner_join(app_users::table)
            .order((app_users::first_name.asc(), app_users::last_name.asc()))
            .select((StudentEntity::as_select(), AppUserEntity::as_select()))
            .load::<(StudentEntity, AppUserEntity)>(&mut conn)?;

        Ok(results)
    }

    async fn list_group_students(
        &self,
        group_id: Uuid,
    ) -> Result<Vec<(StudentEntity, AppUserEntity)>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = students::table
            .inner_join(app_users::table)
            .inner_join(group_students::table)
            .filter(group_students::group_id.eq(group_id))
            .order((app_users::first_name.asc(), app_users::last_name.asc()))
            .select((StudentEntity::as_select(), AppUserEntity::as_select()))
            .load::<(StudentEntity, AppUserEntity)>(&mut conn)?;

        Ok(results)
    }

    async fn list_students_outside_group(
        &self,
        group_id: Uuid,
    ) -> Result<Vec<(StudentEntity, AppUserEntity)>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let enrolled = group_students::table
            .filter(group_students::group_id.eq(group_id))
            .select(group_students::student_id);

        let results = students::table
            .inner_join(app_users::table)
            .filter(students::id.ne_all(enrolled))
            .order((app_users::first_name.asc(), app_users::last_name.asc()))
            .select((StudentEntity::as_select(), AppUserEntity::as_select()))
            .load::<(StudentEntity, AppUserEntity)>(&mut conn)?;

        Ok(results)
    }

    async fn list_enrollments(&self, student_ids: Vec<Uuid>) -> Result<Vec<GroupStudentEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = group_students::table
            .filter(group_students::student_id.eq_any(student_ids))
            .select((group_students::group_id, group_students::student_id))
            .load::<GroupStudentEntity>(&mut conn)?;

        Ok(results)
    }
}
