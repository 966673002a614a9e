use bigdecimal::BigDecimal;
use chrono::Utc;
use uuid::Uuid;

use crate::database::Tables;
use crate::database::models::{RequestQuery, RequestStatus, SalaryChangeInput, SalaryChangeRequest};
use crate::database::repositories::{self, employee as employee_repo};
use crate::error::AppError;
use crate::services::approval::{self, ApprovalAction};
use crate::services::notifications;
use crate::services::user_context::UserContext;

/// Proposes a new CTC. The approver is fixed now: the functional manager,
/// or the reporting manager when there is none.
pub fn submit(
    tx: &mut Tables,
    ctx: &UserContext,
    input: SalaryChangeInput,
) -> Result<SalaryChangeRequest, AppError> {
    if input.proposed_ctc <= BigDecimal::from(0) {
        return Err(AppError::BadRequest(
            "Proposed CTC must be positive".to_string(),
        ));
    }

    let employee = employee_repo::find_by_id(&tx.employees, input.employee_id)?;
    if !ctx.is_hr_or_admin() && employee.reporting_manager_id != Some(ctx.user_id()) {
        return Err(AppError::PermissionDenied(
            "Only HR or the reporting manager can propose a salary change".to_string(),
        ));
    }

    let approver_id = employee_repo::active_manager(&tx.employees, employee.functional_manager_id)
        .or_else(|| employee_repo::active_manager(&tx.employees, employee.reporting_manager_id))
        .ok_or_else(|| {
            AppError::MissingReference("Employee has no manager to approve the change".to_string())
        })?;
    if approver_id == ctx.user_id() {
        return Err(AppError::BadRequest(
            "Requester cannot be the approver of a salary change".to_string(),
        ));
    }

    let now = Utc::now();
    let request = SalaryChangeRequest {
        id: Uuid::new_v4(),
        employee_id: employee.id,
        requested_by: ctx.user_id(),
        approver_id,
        current_ctc: employee.ctc.clone(),
        proposed_ctc: input.proposed_ctc,
        effective_date: input.effective_date,
        reason: input.reason,
        status: RequestStatus::Pending,
        reviewer_remarks: None,
        created_at: now,
        updated_at: now,
    };
    let message = format!(
        "Salary change for {} from {} to {} awaits your approval",
        employee.full_name(),
        request.current_ctc,
        request.proposed_ctc
    );

    tx.salary_change_requests.push(request.clone());
    notifications::notify(tx, approver_id, Some(ctx.user_id()), message);

    Ok(request)
}

fn decide(
    tx: &mut Tables,
    ctx: &UserContext,
    id: Uuid,
    action: ApprovalAction,
    remarks: Option<String>,
) -> Result<SalaryChangeRequest, AppError> {
    let pending = repositories::find(&tx.salary_change_requests, id)?;
    if pending.requested_by == ctx.user_id() {
        return Err(AppError::PermissionDenied(
            "You cannot decide a salary change you requested".to_string(),
        ));
    }

    let (request, _) =
        approval::decide(&mut tx.salary_change_requests, ctx, id, action, remarks)?;

    notifications::notify_all(
        tx,
        &[request.requested_by, request.employee_id],
        Some(ctx.user_id()),
        &format!("Salary change to {} was {}", request.proposed_ctc, request.status),
    );
    Ok(request)
}

pub fn approve(
    tx: &mut Tables,
    ctx: &UserContext,
    id: Uuid,
    remarks: Option<String>,
) -> Result<SalaryChangeRequest, AppError> {
    let request = decide(tx, ctx, id, ApprovalAction::Approve, remarks)?;

    let employee = employee_repo::find_by_id_mut(&mut tx.employees, request.employee_id)?;
    employee.ctc = request.proposed_ctc.clone();
    employee.updated_at = Utc::now();
    log::info!(
        "Applied CTC {} to employee {}",
        request.proposed_ctc,
        request.employee_id
    );

    Ok(request)
}

pub fn reject(
    tx: &mut Tables,
    ctx: &UserContext,
    id: Uuid,
    remarks: Option<String>,
) -> Result<SalaryChangeRequest, AppError> {
    decide(tx, ctx, id, ApprovalAction::Reject, remarks)
}

pub fn list(tables: &Tables, ctx: &UserContext, query: &RequestQuery) -> Vec<SalaryChangeRequest> {
    let scope = ctx.visible_ids(&tables.employees);
    approval::visible_requests(&tables.salary_change_requests, ctx, &scope, query)
}
