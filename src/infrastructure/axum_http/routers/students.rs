use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    application::usecases::{
        identity::IdentityResolver, purchases::PurchaseUseCase, students::StudentUseCase,
    },
    domain::{
        repositories::{
            attendance::AttendanceRepository, groups::GroupRepository, passes::PassRepository,
            purchases::PurchaseRepository, students::StudentRepository,
            teachers::TeacherRepository,
        },
        value_objects::{
            iam::AuthSubject, purchases::InsertPurchaseModel, students::InsertStudentModel,
        },
    },
    infrastructure::postgres::{
        postgres_connection::PgPoolSquad,
        repositories::{
            attendance::AttendancePostgres, groups::GroupPostgres, passes::PassPostgres,
            purchases::PurchasePostgres, students::StudentPostgres, teachers::TeacherPostgres,
        },
    },
};

pub struct StudentRoutesState<S, G, Pur, A, Pas, T>
where
    S: StudentRepository + Send + Sync + 'static,
    G: GroupRepository + Send + Sync + 'static,
    Pur: PurchaseRepository + Send + Sync + 'static,
    A: AttendanceRepository + Send + Sync + 'static,
    Pas: PassRepository + Send + Sync + 'static,
    T: TeacherRepository + Send + Sync + 'static,
{
    pub student_usecase: StudentUseCase<S, G, Pur, A, T>,
    pub purchase_usecase: PurchaseUseCase<Pur, Pas, S, T>,
}

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let student_repository = Arc::new(StudentPostgres::new(Arc::clone(&db_pool)));
    let purchase_repository = Arc::new(PurchasePostgres::new(Arc::clone(&db_pool)));
    let teacher_repository = Arc::new(TeacherPostgres::new(Arc::clone(&db_pool)));
    let identity_resolver = Arc::new(IdentityResolver::new(teacher_repository));

    let student_usecase = StudentUseCase::new(
        Arc::clone(&student_repository),
        Arc::new(GroupPostgres::new(Arc::clone(&db_pool))),
        Arc::clone(&purchase_repository),
        Arc::new(AttendancePostgres::new(Arc::clone(&db_pool))),
        Arc::clone(&identity_resolver),
    );
    let purchase_usecase = PurchaseUseCase::new(
        purchase_repository,
        Arc::new(PassPostgres::new(Arc::clone(&db_pool))),
        student_repository,
        identity_resolver,
    );

    Router::new()
        .route("/", post(add_student).get(list_students))
        .route("/:student_id", get(student_detail))
        .route("/:student_id/active-passes", get(active_passes))
        .route("/:student_id/purchases", post(add_purchase))
        .with_state(Arc::new(StudentRoutesState {
            student_usecase,
            purchase_usecase,
        }))
}

pub async fn add_student<S, G, Pur, A, Pas, T>(
    State(state): State<Arc<StudentRoutesState<S, G, Pur, A, Pas, T>>>,
    subject: AuthSubject,
    Json(insert_student_model): Json<InsertStudentModel>,
) -> impl IntoResponse
where
    S: StudentRepository + Send + Sync + 'static,
    G: GroupRepository + Send + Sync + 'static,
    Pur: PurchaseRepository + Send + Sync + 'static,
    A: AttendanceRepository + Send + Sync + 'static,
    Pas: PassRepository + Send + Sync + 'static,
    T: TeacherRepository + Send + Sync + 'static,
{
    match state
        .student_usecase
        .add_student(subject, insert_student_model)
        .await
    {
        Ok(student) => (StatusCode::CREATED, Json(student)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn list_students<S, G, Pur, A, Pas, T>(
    State(state): State<Arc<StudentRoutesState<S, G, Pur, A, Pas, T>>>,
    subject: AuthSubject,
) -> impl IntoResponse
where
    S: StudentRepository + Send + Sync + 'static,
    G: GroupRepository + Send + Sync + 'static,
    Pur: PurchaseRepository + Send + Sync + 'static,
    A: AttendanceRepository + Send + Sync + 'static,
    Pas: PassRepository + Send + Sync + 'static,
    T: TeacherRepository + Send + Sync + 'static,
{
    match state.student_usecase.list_students(subject).await {
        Ok(students) => (StatusCode::OK, Json(students)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn student_detail<S, G, Pur, A, Pas, T>(
    State(state): State<Arc<StudentRoutesState<S, G, Pur, A, Pas, T>>>,
    subject: AuthSubject,
    Path(student_id): Path<Uuid>,
) -> impl IntoResponse
where
    S: StudentRepository + Send + Sync + 'static,
    G: GroupRepository + Send + Sync + 'static,
    Pur: PurchaseRepository + Send + Sync + 'static,
    A: AttendanceRepository + Send + Sync + 'static,
    Pas: PassRepository + Send + Sync + 'static,
    T: TeacherRepository + Send + Sync + 'static,
{
    match state.student_usecase.student_detail(subject, student_id).await {
        Ok(detail) => (StatusCode::OK, Json(detail)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn active_passes<S, G, Pur, A, Pas, T>(
    State(state): State<Arc<StudentRoutesState<S, G, Pur, A, Pas, T>>>,
    subject: AuthSubject,
    Path(student_id): Path<Uuid>,
) -> impl IntoResponse
where
    S: StudentRepository + Send + Sync + 'static,
    G: GroupRepository + Send + Sync + 'static,
    Pur: PurchaseRepository + Send + Sync + 'static,
    A: AttendanceRepository + Send + Sync + 'static,
    Pas: PassRepository + Send + Sync + 'static,
    T: TeacherRepository + Send + Sync + 'static,
{
    match state.student_usecase.active_passes(subject, student_id).await {
        Ok(active_passes) => (StatusCode::OK, Json(active_passes)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn add_purchase<S, G, Pur, A, Pas, T>(
    State(state): State<Arc<StudentRoutesState<S, G, Pur, A, Pas, T>>>,
    subject: AuthSubject,
    Path(student_id): Path<Uuid>,
    Json(insert_purchase_model): Json<InsertPurchaseModel>,
) -> impl IntoResponse
where
    S: StudentRepository + Send + Sync + 'static,
    G: GroupRepository + Send + Sync + 'static,
    Pur: PurchaseRepository + Send + Sync + 'static,
    A: AttendanceRepository + Send + Sync + 'static,
    Pas: PassRepository + Send + Sync + 'static,
    T: TeacherRepository + Send + Sync + 'static,
{
    match state
        .purchase_usecase
        .add_purchase(subject, student_id, insert_purchase_model)
        .await
    {
        Ok(purchase) => (StatusCode::CREATED, Json(purchase)).into_response(),
        Err(e) => e.into_response(),
    }
}
