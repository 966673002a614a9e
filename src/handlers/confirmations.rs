use actix_web::{HttpResponse, Result, web};
use uuid::Uuid;

use crate::database::Store;
use crate::database::models::{ConfirmationRequestInput, RequestQuery, ReviewInput};
use crate::handlers::shared::{ApiResponse, remarks};
use crate::services::{UserContext, confirmation};

pub async fn create_confirmation_request(
    ctx: UserContext,
    store: web::Data<Store>,
    input: web::Json<ConfirmationRequestInput>,
) -> Result<HttpResponse> {
    let request = store
        .transaction(|tx| confirmation::submit(tx, &ctx, input.into_inner()))
        .await?;

    Ok(ApiResponse::created(request))
}

pub async fn get_confirmation_requests(
    ctx: UserContext,
    store: web::Data<Store>,
    query: web::Query<RequestQuery>,
) -> Result<HttpResponse> {
    let tables = store.read().await;

    Ok(ApiResponse::success(confirmation::list(&tables, &ctx, &query)))
}

pub async fn approve_confirmation_request(
    ctx: UserContext,
    store: web::Data<Store>,
    path: web::Path<Uuid>,
    body: Option<web::Json<ReviewInput>>,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    let remarks = remarks(body);
    let request = store
        .transaction(|tx| confirmation::approve(tx, &ctx, id, remarks))
        .await?;

    Ok(ApiResponse::success(request))
}

pub async fn reject_confirmation_request(
    ctx: UserContext,
    store: web::Data<Store>,
    path: web::Path<Uuid>,
    body: Option<web::Json<ReviewInput>>,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    let remarks = remarks(body);
    let request = store
        .transaction(|tx| confirmation::reject(tx, &ctx, id, remarks))
        .await?;

    Ok(ApiResponse::success(request))
}
