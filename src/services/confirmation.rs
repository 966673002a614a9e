use chrono::Utc;
use uuid::Uuid;

use crate::database::Tables;
use crate::database::models::{
    ConfirmationRequest, ConfirmationRequestInput, ConfirmationRequestStatus, ConfirmationStatus,
    EmploymentType, RequestQuery,
};
use crate::database::repositories::employee as employee_repo;
use crate::error::AppError;
use crate::services::approval::{self, ApprovalAction, ApprovalState, Stage};
use crate::services::notifications;
use crate::services::user_context::UserContext;

/// Opens a confirmation review for an employee still on probation or in
/// training. Only HR/admin or the employee's reporting manager may ask.
pub fn submit(
    tx: &mut Tables,
    ctx: &UserContext,
    input: ConfirmationRequestInput,
) -> Result<ConfirmationRequest, AppError> {
    let employee = employee_repo::find_by_id(&tx.employees, input.employee_id)?;

    if !ctx.is_hr_or_admin() && employee.reporting_manager_id != Some(ctx.user_id()) {
        return Err(AppError::PermissionDenied(
            "Only HR or the reporting manager can request confirmation".to_string(),
        ));
    }
    if tx
        .confirmation_requests
        .iter()
        .any(|r| r.employee_id == employee.id && !r.status.is_terminal())
    {
        return Err(AppError::Conflict(format!(
            "A confirmation request for {} is already pending",
            employee.full_name()
        )));
    }
    if !employee.confirmation_status.is_awaiting_confirmation() {
        return Err(AppError::BadRequest(format!(
            "{} is not awaiting confirmation (status: {})",
            employee.full_name(),
            employee.confirmation_status
        )));
    }

    let reporting_manager_id =
        employee_repo::active_manager(&tx.employees, employee.reporting_manager_id).ok_or_else(
            || AppError::MissingReference("Employee has no active reporting manager".to_string()),
        )?;
    let functional_manager_id =
        employee_repo::active_manager(&tx.employees, employee.functional_manager_id)
            .unwrap_or(reporting_manager_id);

    let now = Utc::now();
    let request = ConfirmationRequest {
        id: Uuid::new_v4(),
        employee_id: employee.id,
        requested_by: ctx.user_id(),
        previous_status: employee.confirmation_status,
        status: ConfirmationRequestStatus::PendingReportingManagerApproval,
        reporting_manager_id,
        functional_manager_id,
        remarks: input.remarks,
        reviewer_remarks: None,
        created_at: now,
        updated_at: now,
    };
    let message = format!("Confirmation review opened for {}", employee.full_name());

    let employee = employee_repo::find_by_id_mut(&mut tx.employees, request.employee_id)?;
    employee.confirmation_status = ConfirmationStatus::PendingConfirmation;
    employee.updated_at = now;

    tx.confirmation_requests.push(request.clone());
    notifications::notify_all(
        tx,
        &[reporting_manager_id, request.employee_id],
        Some(ctx.user_id()),
        &message,
    );

    Ok(request)
}

pub fn approve(
    tx: &mut Tables,
    ctx: &UserContext,
    id: Uuid,
    remarks: Option<String>,
) -> Result<ConfirmationRequest, AppError> {
    let (request, stage) = approval::decide(
        &mut tx.confirmation_requests,
        ctx,
        id,
        ApprovalAction::Approve,
        remarks,
    )?;

    if stage == Stage::ReportingManager {
        notifications::notify_all(
            tx,
            &[request.functional_manager_id],
            Some(ctx.user_id()),
            "A confirmation request awaits your approval",
        );
        return Ok(request);
    }

    let now = Utc::now();
    let employee = employee_repo::find_by_id_mut(&mut tx.employees, request.employee_id)?;
    employee.confirmation_status = ConfirmationStatus::Confirmed;
    employee.employment_type = EmploymentType::Permanent;
    employee.confirmation_date = Some(now.date_naive());
    employee.updated_at = now;

    notifications::notify_all(
        tx,
        &[request.employee_id, request.requested_by],
        Some(ctx.user_id()),
        "Employment confirmed",
    );
    log::info!("Employee {} confirmed", request.employee_id);

    Ok(request)
}

pub fn reject(
    tx: &mut Tables,
    ctx: &UserContext,
    id: Uuid,
    remarks: Option<String>,
) -> Result<ConfirmationRequest, AppError> {
    let (request, _) = approval::decide(
        &mut tx.confirmation_requests,
        ctx,
        id,
        ApprovalAction::Reject,
        remarks,
    )?;

    let employee = employee_repo::find_by_id_mut(&mut tx.employees, request.employee_id)?;
    employee.confirmation_status = employee.employment_type.pre_confirmation_status();
    employee.confirmation_date = None;
    employee.updated_at = Utc::now();

    notifications::notify_all(
        tx,
        &[request.employee_id, request.requested_by],
        Some(ctx.user_id()),
        "Confirmation request was rejected",
    );

    Ok(request)
}

pub fn list(tables: &Tables, ctx: &UserContext, query: &RequestQuery) -> Vec<ConfirmationRequest> {
    let scope = ctx.visible_ids(&tables.employees);
    approval::visible_requests(&tables.confirmation_requests, ctx, &scope, query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::{Employee, Role};
    use crate::services::test_support::{context, employee, reload, staff, tables};
    use pretty_assertions::assert_eq;

    fn trainee(manager: &Employee) -> Employee {
        let mut e = employee("Tina", Some(manager.id));
        e.employment_type = EmploymentType::Trainee;
        e.confirmation_status = ConfirmationStatus::Training;
        e
    }

    fn input(employee: &Employee) -> ConfirmationRequestInput {
        ConfirmationRequestInput {
            employee_id: employee.id,
            remarks: Some("Ready".to_string()),
        }
    }

    #[test]
    fn final_approval_confirms_with_date() {
        let manager = employee("Mona", None);
        let hr = staff("Hana", Role::Hr);
        let target = trainee(&manager);
        let mut tx = tables(&[&manager, &hr, &target]);

        let request = submit(&mut tx, &context(&hr), input(&target)).unwrap();
        assert_eq!(request.previous_status, ConfirmationStatus::Training);
        assert_eq!(
            reload(&tx, target.id).confirmation_status,
            ConfirmationStatus::PendingConfirmation
        );

        approve(&mut tx, &context(&manager), request.id, None).unwrap();
        let done = approve(&mut tx, &context(&manager), request.id, None).unwrap();

        assert_eq!(done.status, ConfirmationRequestStatus::Approved);
        let confirmed = reload(&tx, target.id);
        assert_eq!(confirmed.confirmation_status, ConfirmationStatus::Confirmed);
        assert_eq!(confirmed.employment_type, EmploymentType::Permanent);
        assert!(confirmed.confirmation_date.is_some());
    }

    #[test]
    fn rejection_reverts_to_training_at_either_stage() {
        let manager = employee("Mona", None);
        let target = trainee(&manager);
        let mut tx = tables(&[&manager, &target]);

        let first = submit(&mut tx, &context(&manager), input(&target)).unwrap();
        reject(&mut tx, &context(&manager), first.id, None).unwrap();
        let after_first = reload(&tx, target.id);
        assert_eq!(after_first.confirmation_status, ConfirmationStatus::Training);
        assert_eq!(after_first.confirmation_date, None);

        let second = submit(&mut tx, &context(&manager), input(&target)).unwrap();
        approve(&mut tx, &context(&manager), second.id, None).unwrap();
        reject(&mut tx, &context(&manager), second.id, None).unwrap();
        let after_second = reload(&tx, target.id);
        assert_eq!(after_second.confirmation_status, ConfirmationStatus::Training);
        assert_eq!(after_second.confirmation_date, None);
    }

    #[test]
    fn duplicate_and_ineligible_requests_are_refused() {
        let manager = employee("Mona", None);
        let target = trainee(&manager);
        let confirmed = employee("Carl", Some(manager.id));
        let mut tx = tables(&[&manager, &target, &confirmed]);

        submit(&mut tx, &context(&manager), input(&target)).unwrap();

        assert!(matches!(
            submit(&mut tx, &context(&manager), input(&target)),
            Err(AppError::Conflict(_))
        ));
        assert!(matches!(
            submit(&mut tx, &context(&manager), input(&confirmed)),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn peers_cannot_request_confirmation() {
        let manager = employee("Mona", None);
        let target = trainee(&manager);
        let peer = employee("Pete", Some(manager.id));
        let mut tx = tables(&[&manager, &target, &peer]);

        assert!(matches!(
            submit(&mut tx, &context(&peer), input(&target)),
            Err(AppError::PermissionDenied(_))
        ));
    }
}
