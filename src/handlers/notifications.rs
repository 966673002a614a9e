use actix_web::{HttpResponse, Result, web};
use serde_json::json;
use uuid::Uuid;

use crate::database::Store;
use crate::database::models::NotificationQuery;
use crate::handlers::shared::ApiResponse;
use crate::services::{UserContext, notifications};

/// The caller's notifications, newest first
pub async fn get_notifications(
    ctx: UserContext,
    store: web::Data<Store>,
    query: web::Query<NotificationQuery>,
) -> Result<HttpResponse> {
    let tables = store.read().await;
    let unread_only = query.unread_only.unwrap_or(false);

    Ok(ApiResponse::success(notifications::list_for(
        &tables,
        ctx.user_id(),
        unread_only,
    )))
}

pub async fn get_unread_count(ctx: UserContext, store: web::Data<Store>) -> Result<HttpResponse> {
    let tables = store.read().await;

    Ok(ApiResponse::success(notifications::unread_count(
        &tables,
        ctx.user_id(),
    )))
}

pub async fn mark_read(
    ctx: UserContext,
    store: web::Data<Store>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    let notification = store
        .transaction(|tx| notifications::mark_read(tx, &ctx, id))
        .await?;

    Ok(ApiResponse::success(notification))
}

pub async fn mark_all_read(ctx: UserContext, store: web::Data<Store>) -> Result<HttpResponse> {
    let updated = store
        .transaction(|tx| Ok(notifications::mark_all_read(tx, &ctx)))
        .await?;

    Ok(ApiResponse::success(json!({ "updated": updated })))
}
