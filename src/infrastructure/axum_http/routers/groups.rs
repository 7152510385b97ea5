use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use uuid::Uuid;

use crate::{
    application::usecases::{groups::GroupUseCase, identity::IdentityResolver},
    domain::{
        repositories::{
            groups::GroupRepository, passes::PassRepository, teachers::TeacherRepository,
        },
        value_objects::{
            groups::{InsertGroupModel, InsertPassModel},
            iam::AuthSubject,
        },
    },
    infrastructure::postgres::{
        postgres_connection::PgPoolSquad,
        repositories::{groups::GroupPostgres, passes::PassPostgres, teachers::TeacherPostgres},
    },
};

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let teacher_repository = Arc::new(TeacherPostgres::new(Arc::clone(&db_pool)));
    let identity_resolver = Arc::new(IdentityResolver::new(Arc::clone(&teacher_repository)));
    let group_usecase = GroupUseCase::new(
        Arc::new(GroupPostgres::new(Arc::clone(&db_pool))),
        Arc::new(PassPostgres::new(Arc::clone(&db_pool))),
        teacher_repository,
        identity_resolver,
    );

    Router::new()
        .route("/", post(create_group).get(list_active_groups))
        .route("/:group_id/passes", post(create_pass))
        .with_state(Arc::new(group_usecase))
}

pub async fn create_group<G, P, T>(
    State(group_usecase): State<Arc<GroupUseCase<G, P, T>>>,
    subject: AuthSubject,
    Json(insert_group_model): Json<InsertGroupModel>,
) -> impl IntoResponse
where
    G: GroupRepository + Send + Sync + 'static,
    P: PassRepository + Send + Sync + 'static,
    T: TeacherRepository + Send + Sync + 'static,
{
    match group_usecase.create_group(subject, insert_group_model).await {
        Ok(group) => (StatusCode::CREATED, Json(group)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn list_active_groups<G, P, T>(
    State(group_usecase): State<Arc<GroupUseCase<G, P, T>>>,
    subject: AuthSubject,
) -> impl IntoResponse
where
    G: GroupRepository + Send + Sync + 'static,
    P: PassRepository + Send + Sync + 'static,
    T: TeacherRepository + Send + Sync + 'static,
{
    match group_usecase.list_active_groups(subject).await {
        Ok(groups) => (StatusCode::OK, Json(groups)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn create_pass<G, P, T>(
    State(group_usecase): State<Arc<GroupUseCase<G, P, T>>>,
    subject: AuthSubject,
    Path(group_id): Path<Uuid>,
    Json(insert_pass_model): Json<InsertPassModel>,
) -> impl IntoResponse
where
    G: GroupRepository + Send + Sync + 'static,
    P: PassRepository + Send + Sync + 'static,
    T: TeacherRepository + Send + Sync + 'static,
{
    match group_usecase
        .create_pass(subject, group_id, insert_pass_model)
        .await
    {
        Ok(dance_pass) => (StatusCode::CREATED, Json(dance_pass)).into_response(),
        Err(e) => e.into_response(),
    }
}
