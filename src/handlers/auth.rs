use actix_web::{HttpResponse, Result, web};

use crate::database::Store;
use crate::database::models::LoginInput;
use crate::handlers::shared::ApiResponse;
use crate::services::{AuthService, UserContext};

pub async fn login(
    auth: web::Data<AuthService>,
    store: web::Data<Store>,
    request: web::Json<LoginInput>,
) -> Result<HttpResponse> {
    let response = auth.login(&store, request.into_inner()).await?;

    Ok(ApiResponse::success(response))
}

/// Ends the session behind the caller's token
pub async fn logout(
    ctx: UserContext,
    auth: web::Data<AuthService>,
    store: web::Data<Store>,
) -> Result<HttpResponse> {
    auth.logout(&store, ctx.session_id).await?;
    log::info!("Employee {} logged out", ctx.user_id());

    Ok(ApiResponse::<()>::success_with_message(None, "Logged out"))
}

pub async fn me(ctx: UserContext) -> Result<HttpResponse> {
    Ok(ApiResponse::success(ctx.employee))
}
