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
    application::usecases::{identity::IdentityResolver, purchases::PurchaseUseCase},
    domain::{
        repositories::{
            passes::PassRepository, purchases::PurchaseRepository, students::StudentRepository,
            teachers::TeacherRepository,
        },
        value_objects::{iam::AuthSubject, purchases::MarkPurchasePaidModel},
    },
    infrastructure::postgres::{
        postgres_connection::PgPoolSquad,
        repositories::{
            passes::PassPostgres, purchases::PurchasePostgres, students::StudentPostgres,
            teachers::TeacherPostgres,
        },
    },
};

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let teacher_repository = Arc::new(TeacherPostgres::new(Arc::clone(&db_pool)));
    let purchase_usecase = PurchaseUseCase::new(
        Arc::new(PurchasePostgres::new(Arc::clone(&db_pool))),
        Arc::new(PassPostgres::new(Arc::clone(&db_pool))),
        Arc::new(StudentPostgres::new(Arc::clone(&db_pool))),
        Arc::new(IdentityResolver::new(teacher_repository)),
    );

    Router::new()
        .route("/:purchase_id/paid", post(mark_paid))
        .with_state(Arc::new(purchase_usecase))
}

pub async fn mark_paid<Pur, Pas, S, T>(
    State(purchase_usecase): State<Arc<PurchaseUseCase<Pur, Pas, S, T>>>,
    subject: AuthSubject,
    Path(purchase_id): Path<Uuid>,
    Json(mark_paid_model): Json<MarkPurchasePaidModel>,
) -> impl IntoResponse
where
    Pur: PurchaseRepository + Send + Sync + 'static,
    Pas: PassRepository + Send + Sync + 'static,
    S: StudentRepository + Send + Sync + 'static,
    T: TeacherRepository + Send + Sync + 'static,
{
    match purchase_usecase
        .mark_purchase_paid(subject, purchase_id, mark_paid_model)
        .await
    {
        Ok(purchase) => (StatusCode::OK, Json(purchase)).into_response(),
        Err(e) => e.into_response(),
    }
}
