use actix_web::{HttpResponse, Result, web};
use uuid::Uuid;

use crate::database::Store;
use crate::database::models::{
    ExpenseRequestInput, RequestQuery, ReviewInput, TravelRequestInput,
};
use crate::handlers::shared::{ApiResponse, remarks};
use crate::services::approval::ApprovalAction;
use crate::services::{UserContext, claims};

// Travel

pub async fn create_travel_request(
    ctx: UserContext,
    store: web::Data<Store>,
    input: web::Json<TravelRequestInput>,
) -> Result<HttpResponse> {
    let request = store
        .transaction(|tx| claims::submit_travel(tx, &ctx, input.into_inner()))
        .await?;

    Ok(ApiResponse::created(request))
}

pub async fn get_travel_requests(
    ctx: UserContext,
    store: web::Data<Store>,
    query: web::Query<RequestQuery>,
) -> Result<HttpResponse> {
    let tables = store.read().await;

    Ok(ApiResponse::success(claims::list_travel(&tables, &ctx, &query)))
}

async fn decide_travel(
    ctx: UserContext,
    store: web::Data<Store>,
    id: Uuid,
    action: ApprovalAction,
    remarks: Option<String>,
) -> Result<HttpResponse> {
    let request = store
        .transaction(|tx| claims::decide_travel(tx, &ctx, id, action, remarks))
        .await?;

    Ok(ApiResponse::success(request))
}

pub async fn approve_travel_request(
    ctx: UserContext,
    store: web::Data<Store>,
    path: web::Path<Uuid>,
    body: Option<web::Json<ReviewInput>>,
) -> Result<HttpResponse> {
    decide_travel(
        ctx,
        store,
        path.into_inner(),
        ApprovalAction::Approve,
        remarks(body),
    )
    .await
}

pub async fn reject_travel_request(
    ctx: UserContext,
    store: web::Data<Store>,
    path: web::Path<Uuid>,
    body: Option<web::Json<ReviewInput>>,
) -> Result<HttpResponse> {
    decide_travel(
        ctx,
        store,
        path.into_inner(),
        ApprovalAction::Reject,
        remarks(body),
    )
    .await
}

pub async fn cancel_travel_request(
    ctx: UserContext,
    store: web::Data<Store>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    decide_travel(ctx, store, path.into_inner(), ApprovalAction::Cancel, None).await
}

// Expenses

pub async fn create_expense(
    ctx: UserContext,
    store: web::Data<Store>,
    input: web::Json<ExpenseRequestInput>,
) -> Result<HttpResponse> {
    let request = store
        .transaction(|tx| claims::submit_expense(tx, &ctx, input.into_inner()))
        .await?;

    Ok(ApiResponse::created(request))
}

pub async fn get_expenses(
    ctx: UserContext,
    store: web::Data<Store>,
    query: web::Query<RequestQuery>,
) -> Result<HttpResponse> {
    let tables = store.read().await;

    Ok(ApiResponse::success(claims::list_expenses(&tables, &ctx, &query)))
}

async fn decide_expense(
    ctx: UserContext,
    store: web::Data<Store>,
    id: Uuid,
    action: ApprovalAction,
    remarks: Option<String>,
) -> Result<HttpResponse> {
    let request = store
        .transaction(|tx| claims::decide_expense(tx, &ctx, id, action, remarks))
        .await?;

    Ok(ApiResponse::success(request))
}

pub async fn approve_expense(
    ctx: UserContext,
    store: web::Data<Store>,
    path: web::Path<Uuid>,
    body: Option<web::Json<ReviewInput>>,
) -> Result<HttpResponse> {
    decide_expense(
        ctx,
        store,
        path.into_inner(),
        ApprovalAction::Approve,
        remarks(body),
    )
    .await
}

pub async fn reject_expense(
    ctx: UserContext,
    store: web::Data<Store>,
    path: web::Path<Uuid>,
    body: Option<web::Json<ReviewInput>>,
) -> Result<HttpResponse> {
    decide_expense(
        ctx,
        store,
        path.into_inner(),
        ApprovalAction::Reject,
        remarks(body),
    )
    .await
}

pub async fn cancel_expense(
    ctx: UserContext,
    store: web::Data<Store>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    decide_expense(ctx, store, path.into_inner(), ApprovalAction::Cancel, None).await
}
