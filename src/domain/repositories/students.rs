use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::{
    app_users::{AppUserEntity, InsertAppUserEntity},
    students::{GroupStudentEntity, InsertStudentEntity, StudentEntity},
};

#[async_trait]
#[automock]
pub trait StudentRepository {
    /// Creates the app user, the student profile and its enrollments in one transaction.
    async fn create_student(
        &self,
        insert_user_entity: InsertAppUserEntity,
        insert_student_entity: InsertStudentEntity,
        group_ids: Vec<Uuid>,
    ) -> Result<Uuid>;
    async fn find_by_id(&self, student_id: Uuid) -> Result<Option<(StudentEntity, AppUserEntity)>>;
    async fn username_taken(&self, username: String) -> Result<bool>;
    async fn find_existing_ids(&self, student_ids: Vec<Uuid>) -> Result<Vec<Uuid>>;
    async fn list_students(&self) -> Result<Vec<(StudentEntity, AppUserEntity)>>;
    async fn list_group_students(&self, group_id: Uuid)
    -> Result<Vec<(StudentEntity, AppUserEntity)>>;
    async fn list_students_outside_group(
        &self,
        group_id: Uuid,
    ) -> Result<Vec<(StudentEntity, AppUserEntity)>>;
    async fn list_enrollments(&self, student_ids: Vec<Uuid>) -> Result<Vec<GroupStudentEntity>>;
}
