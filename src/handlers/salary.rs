use actix_web::{HttpResponse, Result, web};
use uuid::Uuid;

use crate::database::Store;
use crate::database::models::{RequestQuery, ReviewInput, SalaryChangeInput};
use crate::handlers::shared::{ApiResponse, remarks};
use crate::services::{UserContext, salary};

pub async fn create_salary_change(
    ctx: UserContext,
    store: web::Data<Store>,
    input: web::Json<SalaryChangeInput>,
) -> Result<HttpResponse> {
    let request = store
        .transaction(|tx| salary::submit(tx, &ctx, input.into_inner()))
        .await?;

    Ok(ApiResponse::created(request))
}

pub async fn get_salary_changes(
    ctx: UserContext,
    store: web::Data<Store>,
    query: web::Query<RequestQuery>,
) -> Result<HttpResponse> {
    let tables = store.read().await;

    Ok(ApiResponse::success(salary::list(&tables, &ctx, &query)))
}

/// Approve and apply the proposed CTC
pub async fn approve_salary_change(
    ctx: UserContext,
    store: web::Data<Store>,
    path: web::Path<Uuid>,
    body: Option<web::Json<ReviewInput>>,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    let remarks = remarks(body);
    let request = store
        .transaction(|tx| salary::approve(tx, &ctx, id, remarks))
        .await?;

    Ok(ApiResponse::success(request))
}

pub async fn reject_salary_change(
    ctx: UserContext,
    store: web::Data<Store>,
    path: web::Path<Uuid>,
    body: Option<web::Json<ReviewInput>>,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    let remarks = remarks(body);
    let request = store
        .transaction(|tx| salary::reject(tx, &ctx, id, remarks))
        .await?;

    Ok(ApiResponse::success(request))
}
