use actix_web::{HttpResponse, Result, web};

use crate::database::Store;
use crate::handlers::shared::ApiResponse;
use crate::services::{UserContext, payroll};

/// Payslips for every active employee for one month
pub async fn run_payroll(
    ctx: UserContext,
    store: web::Data<Store>,
    path: web::Path<(i32, u32)>,
) -> Result<HttpResponse> {
    let (year, month) = path.into_inner();
    let tables = store.read().await;
    let payslips = payroll::run(&tables, &ctx, year, month)?;

    Ok(ApiResponse::success(payslips))
}
