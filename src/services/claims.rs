//! Travel and expense requests: single-stage review by the reporting
//! manager, cancellable by the requester while pending.

use bigdecimal::BigDecimal;
use chrono::Utc;
use uuid::Uuid;

use crate::database::Tables;
use crate::database::models::{
    Employee, ExpenseRequest, ExpenseRequestInput, RequestQuery, RequestStatus, TravelRequest,
    TravelRequestInput,
};
use crate::database::repositories::employee as employee_repo;
use crate::error::AppError;
use crate::services::approval::{self, ApprovalAction};
use crate::services::notifications;
use crate::services::user_context::UserContext;

fn requester<'a>(tx: &'a Tables, ctx: &UserContext) -> Result<(&'a Employee, Uuid), AppError> {
    let employee = employee_repo::find_by_id(&tx.employees, ctx.user_id())?;
    let reviewer_id = employee_repo::active_manager(&tx.employees, employee.reporting_manager_id)
        .ok_or_else(|| {
            AppError::MissingReference("No active reporting manager to review the request".to_string())
        })?;
    Ok((employee, reviewer_id))
}

fn ensure_positive(amount: &BigDecimal, field: &str) -> Result<(), AppError> {
    if *amount <= BigDecimal::from(0) {
        return Err(AppError::BadRequest(format!("{} must be positive", field)));
    }
    Ok(())
}

pub fn submit_travel(
    tx: &mut Tables,
    ctx: &UserContext,
    input: TravelRequestInput,
) -> Result<TravelRequest, AppError> {
    ensure_positive(&input.estimated_cost, "Estimated cost")?;
    if input.end_date < input.start_date {
        return Err(AppError::BadRequest(
            "End date cannot be before start date".to_string(),
        ));
    }
    if input.destination.trim().is_empty() {
        return Err(AppError::BadRequest("Destination is required".to_string()));
    }

    let (employee, reviewer_id) = requester(tx, ctx)?;
    let now = Utc::now();
    let request = TravelRequest {
        id: Uuid::new_v4(),
        employee_id: employee.id,
        reviewer_id,
        destination: input.destination,
        purpose: input.purpose,
        start_date: input.start_date,
        end_date: input.end_date,
        estimated_cost: input.estimated_cost,
        status: RequestStatus::Pending,
        reviewer_remarks: None,
        created_at: now,
        updated_at: now,
    };
    let message = format!(
        "{} requested travel to {}",
        employee.full_name(),
        request.destination
    );

    tx.travel_requests.push(request.clone());
    notifications::notify(tx, reviewer_id, Some(ctx.user_id()), message);
    Ok(request)
}

pub fn decide_travel(
    tx: &mut Tables,
    ctx: &UserContext,
    id: Uuid,
    action: ApprovalAction,
    remarks: Option<String>,
) -> Result<TravelRequest, AppError> {
    let (request, _) = approval::decide(&mut tx.travel_requests, ctx, id, action, remarks)?;

    notifications::notify_all(
        tx,
        &[request.employee_id, request.reviewer_id],
        Some(ctx.user_id()),
        &format!(
            "Travel request to {} was {}",
            request.destination, request.status
        ),
    );
    Ok(request)
}

pub fn list_travel(tables: &Tables, ctx: &UserContext, query: &RequestQuery) -> Vec<TravelRequest> {
    let scope = ctx.visible_ids(&tables.employees);
    approval::visible_requests(&tables.travel_requests, ctx, &scope, query)
}

pub fn submit_expense(
    tx: &mut Tables,
    ctx: &UserContext,
    input: ExpenseRequestInput,
) -> Result<ExpenseRequest, AppError> {
    ensure_positive(&input.amount, "Amount")?;
    if input.category.trim().is_empty() {
        return Err(AppError::BadRequest("Category is required".to_string()));
    }

    let (employee, reviewer_id) = requester(tx, ctx)?;
    let now = Utc::now();
    let request = ExpenseRequest {
        id: Uuid::new_v4(),
        employee_id: employee.id,
        reviewer_id,
        category: input.category,
        amount: input.amount,
        expense_date: input.expense_date,
        description: input.description,
        status: RequestStatus::Pending,
        reviewer_remarks: None,
        created_at: now,
        updated_at: now,
    };
    let message = format!(
        "{} submitted a {} expense of {}",
        employee.full_name(),
        request.category,
        request.amount
    );

    tx.expense_requests.push(request.clone());
    notifications::notify(tx, reviewer_id, Some(ctx.user_id()), message);
    Ok(request)
}

pub fn decide_expense(
    tx: &mut Tables,
    ctx: &UserContext,
    id: Uuid,
    action: ApprovalAction,
    remarks: Option<String>,
) -> Result<ExpenseRequest, AppError> {
    let (request, _) = approval::decide(&mut tx.expense_requests, ctx, id, action, remarks)?;

    notifications::notify_all(
        tx,
        &[request.employee_id, request.reviewer_id],
        Some(ctx.user_id()),
        &format!("Expense claim of {} was {}", request.amount, request.status),
    );
    Ok(request)
}

pub fn list_expenses(
    tables: &Tables,
    ctx: &UserContext,
    query: &RequestQuery,
) -> Vec<ExpenseRequest> {
    let scope = ctx.visible_ids(&tables.employees);
    approval::visible_requests(&tables.expense_requests, ctx, &scope, query)
}
