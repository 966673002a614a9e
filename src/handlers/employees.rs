use actix_web::{HttpResponse, Result, web};
use uuid::Uuid;

use crate::config::Config;
use crate::database::Store;
use crate::database::models::{CreateEmployeeInput, EmployeeQuery, UpdateEmployeeInput};
use crate::handlers::shared::ApiResponse;
use crate::services::{AuthService, UserContext, directory, lifecycle};

/// Add an employee; onboarding starts immediately
pub async fn create_employee(
    ctx: UserContext,
    store: web::Data<Store>,
    auth: web::Data<AuthService>,
    config: web::Data<Config>,
    input: web::Json<CreateEmployeeInput>,
) -> Result<HttpResponse> {
    ctx.requires_hr_or_admin()?;
    let input = input.into_inner();
    // Hash before taking the write lock.
    let password_hash = auth.hash_password(&input.password)?;
    let default_balance = config.default_leave_balance;

    let employee = store
        .transaction(|tx| directory::add_employee(tx, &ctx, input, password_hash, default_balance))
        .await?;

    Ok(ApiResponse::created(employee))
}

/// List employees within the caller's scope
pub async fn get_employees(
    ctx: UserContext,
    store: web::Data<Store>,
    query: web::Query<EmployeeQuery>,
) -> Result<HttpResponse> {
    let tables = store.read().await;
    let employees = directory::list(&tables, &ctx, &query);

    Ok(ApiResponse::success(employees))
}

pub async fn get_employee(
    ctx: UserContext,
    store: web::Data<Store>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let tables = store.read().await;
    let employee = directory::get(&tables, &ctx, path.into_inner())?;

    Ok(ApiResponse::success(employee))
}

pub async fn update_employee(
    ctx: UserContext,
    store: web::Data<Store>,
    path: web::Path<Uuid>,
    input: web::Json<UpdateEmployeeInput>,
) -> Result<HttpResponse> {
    let employee_id = path.into_inner();
    let employee = store
        .transaction(|tx| directory::update_employee(tx, &ctx, employee_id, input.into_inner()))
        .await?;

    Ok(ApiResponse::success(employee))
}

/// Transitive reporting-line subordinates
pub async fn get_subordinates(
    ctx: UserContext,
    store: web::Data<Store>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let tables = store.read().await;
    let subordinates = directory::subordinates(&tables, &ctx, path.into_inner())?;

    Ok(ApiResponse::success(subordinates))
}

/// Start offboarding; the employee exits once every task is done
pub async fn offboard_employee(
    ctx: UserContext,
    store: web::Data<Store>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let employee_id = path.into_inner();
    let workflow = store
        .transaction(|tx| lifecycle::start_offboarding(tx, &ctx, employee_id))
        .await?;

    Ok(ApiResponse::created(workflow))
}
