//! Two-stage leave approval: reporting manager, then functional manager.
//! The balance is checked at submission and deducted once, on final approval.

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::database::Tables;
use crate::database::models::{
    AttendanceStatus, LeaveRequest, LeaveRequestInput, LeaveStatus, RequestQuery,
};
use crate::database::repositories::{attendance as attendance_repo, employee as employee_repo};
use crate::error::AppError;
use crate::services::approval::{self, ApprovalAction, Reviewable, Stage};
use crate::services::notifications;
use crate::services::user_context::UserContext;

/// Calendar days from `start` to `end`, both included.
pub fn inclusive_days(start: NaiveDate, end: NaiveDate) -> Result<i32, AppError> {
    if end < start {
        return Err(AppError::BadRequest(
            "End date cannot be before start date".to_string(),
        ));
    }
    let days = (end - start).num_days() + 1;
    i32::try_from(days).map_err(|_| AppError::BadRequest("Leave range is too long".to_string()))
}

pub fn submit(
    tx: &mut Tables,
    ctx: &UserContext,
    input: LeaveRequestInput,
) -> Result<LeaveRequest, AppError> {
    let employee = employee_repo::find_by_id(&tx.employees, ctx.user_id())?;
    let duration = inclusive_days(input.start_date, input.end_date)?;

    let available = employee.balance_for(input.leave_type);
    if duration > available {
        return Err(AppError::InsufficientBalance {
            leave_type: input.leave_type.to_string(),
            requested: duration,
            available,
        });
    }

    let reporting_manager_id =
        employee_repo::active_manager(&tx.employees, employee.reporting_manager_id).ok_or_else(
            || {
                AppError::MissingReference(
                    "No active reporting manager to route the request".to_string(),
                )
            },
        )?;
    // Without a functional manager the reporting manager decides both stages.
    let functional_manager_id =
        employee_repo::active_manager(&tx.employees, employee.functional_manager_id)
            .unwrap_or(reporting_manager_id);

    let now = Utc::now();
    let request = LeaveRequest {
        id: Uuid::new_v4(),
        employee_id: employee.id,
        leave_type: input.leave_type,
        start_date: input.start_date,
        end_date: input.end_date,
        duration_in_days: duration,
        reason: input.reason,
        status: LeaveStatus::PendingReportingManagerApproval,
        reporting_manager_id,
        functional_manager_id,
        reporting_manager_remarks: None,
        functional_manager_remarks: None,
        created_at: now,
        updated_at: now,
    };

    let message = format!(
        "{} requested {} day(s) of {} leave from {} to {}",
        employee.full_name(),
        duration,
        request.leave_type,
        request.start_date,
        request.end_date
    );
    tx.leave_requests.push(request.clone());
    notifications::notify(tx, reporting_manager_id, Some(ctx.user_id()), message);

    log::info!("Leave request {} submitted by {}", request.id, ctx.user_id());
    Ok(request)
}

pub fn approve(
    tx: &mut Tables,
    ctx: &UserContext,
    id: Uuid,
    remarks: Option<String>,
) -> Result<LeaveRequest, AppError> {
    let (request, stage) =
        approval::decide(&mut tx.leave_requests, ctx, id, ApprovalAction::Approve, remarks)?;

    match stage {
        Stage::ReportingManager => {
            notifications::notify(
                tx,
                request.employee_id,
                Some(ctx.user_id()),
                format!(
                    "Your leave from {} to {} was approved by your reporting manager",
                    request.start_date, request.end_date
                ),
            );
            notifications::notify_all(
                tx,
                &[request.functional_manager_id],
                Some(ctx.user_id()),
                &format!(
                    "Leave request from {} to {} awaits your approval",
                    request.start_date, request.end_date
                ),
            );
        }
        _ => {
            let employee = employee_repo::find_by_id_mut(&mut tx.employees, request.employee_id)?;
            employee
                .leave_balance
                .deduct(request.leave_type, request.duration_in_days);
            employee.updated_at = Utc::now();

            let now = Utc::now();
            for day in request.start_date.iter_days().take_while(|d| *d <= request.end_date) {
                attendance_repo::upsert_status(
                    &mut tx.attendance,
                    request.employee_id,
                    day,
                    AttendanceStatus::OnLeave,
                    now,
                );
            }

            notifications::notify(
                tx,
                request.employee_id,
                Some(ctx.user_id()),
                format!(
                    "Your leave from {} to {} has been approved",
                    request.start_date, request.end_date
                ),
            );
        }
    }

    Ok(request)
}

pub fn reject(
    tx: &mut Tables,
    ctx: &UserContext,
    id: Uuid,
    remarks: Option<String>,
) -> Result<LeaveRequest, AppError> {
    let (request, _) =
        approval::decide(&mut tx.leave_requests, ctx, id, ApprovalAction::Reject, remarks)?;

    notifications::notify(
        tx,
        request.employee_id,
        Some(ctx.user_id()),
        format!(
            "Your leave from {} to {} was rejected",
            request.start_date, request.end_date
        ),
    );
    Ok(request)
}

pub fn cancel(tx: &mut Tables, ctx: &UserContext, id: Uuid) -> Result<LeaveRequest, AppError> {
    let (request, stage) =
        approval::decide(&mut tx.leave_requests, ctx, id, ApprovalAction::Cancel, None)?;

    let reviewer = request.reviewer_for(stage);
    notifications::notify(
        tx,
        request.employee_id,
        Some(ctx.user_id()),
        format!(
            "Your leave from {} to {} was cancelled",
            request.start_date, request.end_date
        ),
    );
    notifications::notify_all(
        tx,
        &[reviewer],
        Some(ctx.user_id()),
        "A leave request awaiting your review was cancelled",
    );
    Ok(request)
}

pub fn list(tables: &Tables, ctx: &UserContext, query: &RequestQuery) -> Vec<LeaveRequest> {
    let scope = ctx.visible_ids(&tables.employees);
    approval::visible_requests(&tables.leave_requests, ctx, &scope, query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::{EmployeeStatus, LeaveType, Role};
    use crate::services::test_support::{context, date, employee, manager, reload, staff, tables};
    use pretty_assertions::assert_eq;

    fn input(start: NaiveDate, end: NaiveDate) -> LeaveRequestInput {
        LeaveRequestInput {
            leave_type: LeaveType::Casual,
            start_date: start,
            end_date: end,
            reason: "Family trip".to_string(),
        }
    }

    #[test]
    fn inclusive_day_count() {
        assert_eq!(inclusive_days(date(2024, 1, 1), date(2024, 1, 3)).unwrap(), 3);
        assert_eq!(inclusive_days(date(2024, 1, 1), date(2024, 1, 1)).unwrap(), 1);
        assert!(matches!(
            inclusive_days(date(2024, 1, 3), date(2024, 1, 1)),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn insufficient_balance_changes_nothing() {
        let manager = employee("Mona", None);
        let mut worker = employee("Will", Some(manager.id));
        worker.leave_balance.casual = 2;
        let mut tx = tables(&[&manager, &worker]);

        let result = submit(
            &mut tx,
            &context(&worker),
            input(date(2024, 1, 1), date(2024, 1, 3)),
        );

        assert_eq!(
            result.unwrap_err(),
            AppError::InsufficientBalance {
                leave_type: "casual".to_string(),
                requested: 3,
                available: 2,
            }
        );
        assert!(tx.leave_requests.is_empty());
        assert!(tx.notifications.is_empty());
    }

    #[test]
    fn employee_without_manager_cannot_submit() {
        let worker = employee("Will", None);
        let mut tx = tables(&[&worker]);

        let result = submit(
            &mut tx,
            &context(&worker),
            input(date(2024, 1, 1), date(2024, 1, 1)),
        );

        assert!(matches!(result, Err(AppError::MissingReference(_))));
    }

    #[test]
    fn exited_reporting_manager_cannot_receive_requests() {
        let mut manager = employee("Mona", None);
        manager.status = EmployeeStatus::Exited;
        let worker = employee("Will", Some(manager.id));
        let mut tx = tables(&[&manager, &worker]);

        let result = submit(
            &mut tx,
            &context(&worker),
            input(date(2024, 1, 1), date(2024, 1, 1)),
        );

        assert!(matches!(result, Err(AppError::MissingReference(_))));
        assert!(tx.leave_requests.is_empty());
        assert!(tx.notifications.is_empty());
    }

    #[test]
    fn exited_functional_manager_falls_back_to_reporting_manager() {
        let manager = employee("Mona", None);
        let mut functional = employee("Fred", None);
        functional.status = EmployeeStatus::Exited;
        let mut worker = employee("Will", Some(manager.id));
        worker.functional_manager_id = Some(functional.id);
        let mut tx = tables(&[&manager, &functional, &worker]);

        let request = submit(
            &mut tx,
            &context(&worker),
            input(date(2024, 3, 4), date(2024, 3, 4)),
        )
        .unwrap();

        assert_eq!(request.reporting_manager_id, manager.id);
        assert_eq!(request.functional_manager_id, manager.id);
    }

    #[test]
    fn balance_is_deducted_once_at_final_stage() {
        let manager = employee("Mona", None);
        let functional = employee("Fred", None);
        let mut worker = employee("Will", Some(manager.id));
        worker.functional_manager_id = Some(functional.id);
        let mut tx = tables(&[&manager, &functional, &worker]);

        let request = submit(
            &mut tx,
            &context(&worker),
            input(date(2024, 3, 4), date(2024, 3, 6)),
        )
        .unwrap();
        assert_eq!(tx.notifications[0].recipient_id, manager.id);

        let first = approve(&mut tx, &context(&manager), request.id, None).unwrap();
        assert_eq!(first.status, LeaveStatus::PendingFunctionalManagerApproval);
        assert_eq!(reload(&tx, worker.id).leave_balance.casual, 12);

        // Reporting manager cannot decide the functional stage.
        assert!(matches!(
            approve(&mut tx, &context(&manager), request.id, None),
            Err(AppError::PermissionDenied(_))
        ));

        let second = approve(
            &mut tx,
            &context(&functional),
            request.id,
            Some("Enjoy".to_string()),
        )
        .unwrap();
        assert_eq!(second.status, LeaveStatus::Approved);
        assert_eq!(second.functional_manager_remarks.as_deref(), Some("Enjoy"));
        assert_eq!(reload(&tx, worker.id).leave_balance.casual, 9);
        assert_eq!(tx.attendance.len(), 3);
        assert!(
            tx.attendance
                .iter()
                .all(|r| r.status == AttendanceStatus::OnLeave)
        );

        assert!(matches!(
            approve(&mut tx, &context(&functional), request.id, None),
            Err(AppError::InvalidTransition(_))
        ));
        assert_eq!(reload(&tx, worker.id).leave_balance.casual, 9);
    }

    #[test]
    fn missing_functional_manager_routes_back_to_reporting_manager() {
        let manager = employee("Mona", None);
        let worker = employee("Will", Some(manager.id));
        let mut tx = tables(&[&manager, &worker]);

        let request = submit(
            &mut tx,
            &context(&worker),
            input(date(2024, 3, 4), date(2024, 3, 4)),
        )
        .unwrap();
        assert_eq!(request.functional_manager_id, manager.id);

        approve(&mut tx, &context(&manager), request.id, None).unwrap();
        let done = approve(&mut tx, &context(&manager), request.id, None).unwrap();

        assert_eq!(done.status, LeaveStatus::Approved);
    }

    #[test]
    fn rejection_leaves_balance_untouched() {
        let manager = employee("Mona", None);
        let worker = employee("Will", Some(manager.id));
        let mut tx = tables(&[&manager, &worker]);
        let request = submit(
            &mut tx,
            &context(&worker),
            input(date(2024, 3, 4), date(2024, 3, 5)),
        )
        .unwrap();

        approve(&mut tx, &context(&manager), request.id, None).unwrap();
        let rejected = reject(
            &mut tx,
            &context(&manager),
            request.id,
            Some("Busy week".to_string()),
        )
        .unwrap();

        assert_eq!(rejected.status, LeaveStatus::Rejected);
        assert_eq!(reload(&tx, worker.id).leave_balance.casual, 12);
        assert!(tx.attendance.is_empty());
    }

    #[test]
    fn only_requester_cancels_and_hr_can_review() {
        let manager = employee("Mona", None);
        let worker = employee("Will", Some(manager.id));
        let hr = staff("Hana", Role::Hr);
        let mut tx = tables(&[&manager, &worker, &hr]);
        let first = submit(
            &mut tx,
            &context(&worker),
            input(date(2024, 5, 1), date(2024, 5, 1)),
        )
        .unwrap();

        assert!(matches!(
            cancel(&mut tx, &context(&manager), first.id),
            Err(AppError::PermissionDenied(_))
        ));
        let cancelled = cancel(&mut tx, &context(&worker), first.id).unwrap();
        assert_eq!(cancelled.status, LeaveStatus::Cancelled);

        let second = submit(
            &mut tx,
            &context(&worker),
            input(date(2024, 6, 1), date(2024, 6, 1)),
        )
        .unwrap();
        assert!(matches!(
            approve(&mut tx, &context(&worker), second.id, None),
            Err(AppError::PermissionDenied(_))
        ));
        let approved = approve(&mut tx, &context(&hr), second.id, None).unwrap();
        assert_eq!(approved.status, LeaveStatus::PendingFunctionalManagerApproval);
    }

    #[test]
    fn listing_is_scoped() {
        let manager = manager("Mona", None);
        let worker = employee("Will", Some(manager.id));
        let stranger = employee("Sam", Some(manager.id));
        let mut tx = tables(&[&manager, &worker, &stranger]);
        submit(
            &mut tx,
            &context(&worker),
            input(date(2024, 5, 1), date(2024, 5, 1)),
        )
        .unwrap();

        let query = RequestQuery::default();
        assert_eq!(list(&tx, &context(&manager), &query).len(), 1);
        assert_eq!(list(&tx, &context(&worker), &query).len(), 1);
        assert!(list(&tx, &context(&stranger), &query).is_empty());

        let approved_only = RequestQuery {
            status: Some("approved".to_string()),
            ..RequestQuery::default()
        };
        assert!(list(&tx, &context(&manager), &approved_only).is_empty());
    }

    #[test]
    fn reviewer_without_manager_role_sees_only_assigned_requests() {
        let lead = employee("Lena", None);
        let worker = employee("Will", Some(lead.id));
        let mut tx = tables(&[&lead, &worker]);
        submit(
            &mut tx,
            &context(&worker),
            input(date(2024, 5, 1), date(2024, 5, 1)),
        )
        .unwrap();

        assert_eq!(list(&tx, &context(&lead), &RequestQuery::default()).len(), 1);
        assert!(!context(&lead).visible_ids(&tx.employees).contains(&worker.id));
    }
}
