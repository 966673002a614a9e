use actix_web::{HttpResponse, Result, web};
use uuid::Uuid;

use crate::database::Store;
use crate::database::models::{LeaveRequestInput, RequestQuery, ReviewInput};
use crate::handlers::shared::{ApiResponse, remarks};
use crate::services::{UserContext, leave};

/// Submit a leave request for the caller
pub async fn create_leave_request(
    ctx: UserContext,
    store: web::Data<Store>,
    input: web::Json<LeaveRequestInput>,
) -> Result<HttpResponse> {
    let request = store
        .transaction(|tx| leave::submit(tx, &ctx, input.into_inner()))
        .await?;

    Ok(ApiResponse::created(request))
}

pub async fn get_leave_requests(
    ctx: UserContext,
    store: web::Data<Store>,
    query: web::Query<RequestQuery>,
) -> Result<HttpResponse> {
    let tables = store.read().await;

    Ok(ApiResponse::success(leave::list(&tables, &ctx, &query)))
}

/// Approve the stage the request is waiting on
pub async fn approve_leave_request(
    ctx: UserContext,
    store: web::Data<Store>,
    path: web::Path<Uuid>,
    body: Option<web::Json<ReviewInput>>,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    let remarks = remarks(body);
    let request = store
        .transaction(|tx| leave::approve(tx, &ctx, id, remarks))
        .await?;

    Ok(ApiResponse::success(request))
}

pub async fn reject_leave_request(
    ctx: UserContext,
    store: web::Data<Store>,
    path: web::Path<Uuid>,
    body: Option<web::Json<ReviewInput>>,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    let remarks = remarks(body);
    let request = store
        .transaction(|tx| leave::reject(tx, &ctx, id, remarks))
        .await?;

    Ok(ApiResponse::success(request))
}

pub async fn cancel_leave_request(
    ctx: UserContext,
    store: web::Data<Store>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    let request = store
        .transaction(|tx| leave::cancel(tx, &ctx, id))
        .await?;

    Ok(ApiResponse::success(request))
}
