use actix_web::{HttpResponse, Result, web};
use chrono::Utc;
use uuid::Uuid;

use crate::database::Store;
use crate::database::models::{
    AttendanceCorrectionInput, AttendanceQuery, MarkAttendanceInput, RequestQuery, ReviewInput,
};
use crate::handlers::shared::{ApiResponse, remarks};
use crate::services::{UserContext, attendance};

/// Attendance records for an employee, the caller by default
pub async fn get_attendance(
    ctx: UserContext,
    store: web::Data<Store>,
    query: web::Query<AttendanceQuery>,
) -> Result<HttpResponse> {
    let tables = store.read().await;
    let records = attendance::list(&tables, &ctx, &query)?;

    Ok(ApiResponse::success(records))
}

pub async fn punch_in(ctx: UserContext, store: web::Data<Store>) -> Result<HttpResponse> {
    let punch = store
        .transaction(|tx| attendance::punch_in(tx, &ctx, Utc::now()))
        .await?;

    Ok(ApiResponse::success(punch))
}

pub async fn punch_out(ctx: UserContext, store: web::Data<Store>) -> Result<HttpResponse> {
    let punch = store
        .transaction(|tx| attendance::punch_out(tx, &ctx, Utc::now()))
        .await?;

    Ok(ApiResponse::success(punch))
}

/// HR sets the day's status directly
pub async fn mark_attendance(
    ctx: UserContext,
    store: web::Data<Store>,
    input: web::Json<MarkAttendanceInput>,
) -> Result<HttpResponse> {
    let record = store
        .transaction(|tx| attendance::mark(tx, &ctx, input.into_inner()))
        .await?;

    Ok(ApiResponse::success(record))
}

// Corrections

pub async fn create_correction(
    ctx: UserContext,
    store: web::Data<Store>,
    input: web::Json<AttendanceCorrectionInput>,
) -> Result<HttpResponse> {
    let request = store
        .transaction(|tx| attendance::submit_correction(tx, &ctx, input.into_inner()))
        .await?;

    Ok(ApiResponse::created(request))
}

pub async fn get_corrections(
    ctx: UserContext,
    store: web::Data<Store>,
    query: web::Query<RequestQuery>,
) -> Result<HttpResponse> {
    let tables = store.read().await;

    Ok(ApiResponse::success(attendance::list_corrections(
        &tables, &ctx, &query,
    )))
}

pub async fn approve_correction(
    ctx: UserContext,
    store: web::Data<Store>,
    path: web::Path<Uuid>,
    body: Option<web::Json<ReviewInput>>,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    let remarks = remarks(body);
    let request = store
        .transaction(|tx| attendance::approve_correction(tx, &ctx, id, remarks))
        .await?;

    Ok(ApiResponse::success(request))
}

pub async fn reject_correction(
    ctx: UserContext,
    store: web::Data<Store>,
    path: web::Path<Uuid>,
    body: Option<web::Json<ReviewInput>>,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    let remarks = remarks(body);
    let request = store
        .transaction(|tx| attendance::reject_correction(tx, &ctx, id, remarks))
        .await?;

    Ok(ApiResponse::success(request))
}
