use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use uuid::Uuid;

use crate::{
    application::usecases::{
        attendance::{AttendanceUseCase, parse_lesson_date},
        identity::IdentityResolver,
    },
    domain::{
        repositories::{
            attendance::AttendanceRepository, groups::GroupRepository,
            students::StudentRepository, teachers::TeacherRepository,
        },
        value_objects::{attendance::RecordAttendanceModel, iam::AuthSubject},
    },
    infrastructure::postgres::{
        postgres_connection::PgPoolSquad,
        repositories::{
            attendance::AttendancePostgres, groups::GroupPostgres, students::StudentPostgres,
            teachers::TeacherPostgres,
        },
    },
};

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let teacher_repository = Arc::new(TeacherPostgres::new(Arc::clone(&db_pool)));
    let attendance_usecase = AttendanceUseCase::new(
        Arc::new(AttendancePostgres::new(Arc::clone(&db_pool))),
        Arc::new(GroupPostgres::new(Arc::clone(&db_pool))),
        Arc::new(StudentPostgres::new(Arc::clone(&db_pool))),
        Arc::new(IdentityResolver::new(teacher_repository)),
    );

    Router::new()
        .route(
            "/:group_id/:lesson_date",
            get(lesson_attendance).put(record_attendance),
        )
        .with_state(Arc::new(attendance_usecase))
}

pub async fn lesson_attendance<A, G, S, T>(
    State(attendance_usecase): State<Arc<AttendanceUseCase<A, G, S, T>>>,
    subject: AuthSubject,
    Path((group_id, lesson_date)): Path<(Uuid, String)>,
) -> impl IntoResponse
where
    A: AttendanceRepository + Send + Sync + 'static,
    G: GroupRepository + Send + Sync + 'static,
    S: StudentRepository + Send + Sync + 'static,
    T: TeacherRepository + Send + Sync + 'static,
{
    let lesson_date = match parse_lesson_date(&lesson_date) {
        Ok(date) => date,
        Err(e) => return e.into_response(),
    };

    match attendance_usecase
        .lesson_attendance(subject, group_id, lesson_date)
        .await
    {
        Ok(lesson) => (StatusCode::OK, Json(lesson)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn record_attendance<A, G, S, T>(
    State(attendance_usecase): State<Arc<AttendanceUseCase<A, G, S, T>>>,
    subject: AuthSubject,
    Path((group_id, lesson_date)): Path<(Uuid, String)>,
    Json(record_attendance_model): Json<RecordAttendanceModel>,
) -> impl IntoResponse
where
    A: AttendanceRepository + Send + Sync + 'static,
    G: GroupRepository + Send + Sync + 'static,
    S: StudentRepository + Send + Sync + 'static,
    T: TeacherRepository + Send + Sync + 'static,
{
    let lesson_date = match parse_lesson_date(&lesson_date) {
        Ok(date) => date,
        Err(e) => return e.into_response(),
    };

    match attendance_usecase
        .record_attendance(subject, group_id, lesson_date, record_attendance_model)
        .await
    {
        Ok(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
        Err(e) => e.into_response(),
    }
}
