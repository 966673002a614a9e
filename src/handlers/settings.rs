use actix_web::{HttpResponse, Result, web};

use crate::config::Config;
use crate::database::Store;
use crate::database::models::LogoInput;
use crate::handlers::shared::ApiResponse;
use crate::services::{UserContext, settings};

pub async fn get_settings(_ctx: UserContext, store: web::Data<Store>) -> Result<HttpResponse> {
    let tables = store.read().await;

    Ok(ApiResponse::success(tables.settings.clone()))
}

pub async fn update_logo(
    ctx: UserContext,
    store: web::Data<Store>,
    config: web::Data<Config>,
    input: web::Json<LogoInput>,
) -> Result<HttpResponse> {
    let max_bytes = config.logo_max_bytes;
    let updated = store
        .transaction(|tx| settings::set_logo(tx, &ctx, input.into_inner().logo, max_bytes))
        .await?;

    Ok(ApiResponse::success(updated))
}

pub async fn delete_logo(ctx: UserContext, store: web::Data<Store>) -> Result<HttpResponse> {
    let updated = store
        .transaction(|tx| settings::clear_logo(tx, &ctx))
        .await?;

    Ok(ApiResponse::success(updated))
}
