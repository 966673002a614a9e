//! Punches, daily attendance status and attendance corrections.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::database::Tables;
use crate::database::models::{
    AttendanceCorrectionInput, AttendanceCorrectionRequest, AttendanceQuery, AttendanceRecord,
    AttendanceStatus, MarkAttendanceInput, PunchRecord, RequestQuery, RequestStatus,
};
use crate::database::repositories::{attendance as attendance_repo, employee as employee_repo};
use crate::error::AppError;
use crate::services::approval::{self, ApprovalAction};
use crate::services::notifications;
use crate::services::user_context::UserContext;

pub fn punch_in(
    tx: &mut Tables,
    ctx: &UserContext,
    now: DateTime<Utc>,
) -> Result<PunchRecord, AppError> {
    let today = now.date_naive();
    if attendance_repo::find_punch(&tx.punches, ctx.user_id(), today)
        .is_some_and(|p| p.punch_in.is_some())
    {
        return Err(AppError::Conflict(format!(
            "Already punched in on {}",
            today
        )));
    }

    let punch = attendance_repo::upsert_punch(&mut tx.punches, ctx.user_id(), today, Some(now), None);
    attendance_repo::upsert_status(
        &mut tx.attendance,
        ctx.user_id(),
        today,
        AttendanceStatus::Present,
        now,
    );
    Ok(punch)
}

pub fn punch_out(
    tx: &mut Tables,
    ctx: &UserContext,
    now: DateTime<Utc>,
) -> Result<PunchRecord, AppError> {
    let today = now.date_naive();
    let existing = attendance_repo::find_punch(&tx.punches, ctx.user_id(), today)
        .cloned()
        .ok_or_else(|| AppError::BadRequest("Punch in before punching out".to_string()))?;

    let punched_in = existing
        .punch_in
        .ok_or_else(|| AppError::BadRequest("Punch in before punching out".to_string()))?;
    if existing.punch_out.is_some() {
        return Err(AppError::Conflict(format!(
            "Already punched out on {}",
            today
        )));
    }
    if now <= punched_in {
        return Err(AppError::BadRequest(
            "Punch out must be after punch in".to_string(),
        ));
    }

    Ok(attendance_repo::upsert_punch(
        &mut tx.punches,
        ctx.user_id(),
        today,
        Some(punched_in),
        Some(now),
    ))
}

pub fn mark(
    tx: &mut Tables,
    ctx: &UserContext,
    input: MarkAttendanceInput,
) -> Result<AttendanceRecord, AppError> {
    ctx.requires_hr_or_admin()?;
    employee_repo::find_by_id(&tx.employees, input.employee_id)?;

    let record = attendance_repo::upsert_status(
        &mut tx.attendance,
        input.employee_id,
        input.date,
        input.status,
        Utc::now(),
    );
    log::info!(
        "Attendance for {} on {} marked {} by {}",
        input.employee_id,
        input.date,
        input.status,
        ctx.user_id()
    );
    Ok(record)
}

/// Defaults to the caller's own records.
pub fn list(
    tables: &Tables,
    ctx: &UserContext,
    query: &AttendanceQuery,
) -> Result<Vec<AttendanceRecord>, AppError> {
    let employee_id = query.employee_id.unwrap_or(ctx.user_id());
    ctx.requires_visibility(&tables.employees, employee_id)?;

    Ok(attendance_repo::records_between(
        &tables.attendance,
        employee_id,
        query.from,
        query.to,
    ))
}

pub fn submit_correction(
    tx: &mut Tables,
    ctx: &UserContext,
    input: AttendanceCorrectionInput,
) -> Result<AttendanceCorrectionRequest, AppError> {
    match (input.requested_punch_in, input.requested_punch_out) {
        (None, None) => {
            return Err(AppError::BadRequest(
                "Request a punch-in or punch-out time".to_string(),
            ));
        }
        (Some(punch_in), Some(punch_out)) if punch_out <= punch_in => {
            return Err(AppError::BadRequest(
                "Punch out must be after punch in".to_string(),
            ));
        }
        _ => {}
    }
    if [input.requested_punch_in, input.requested_punch_out]
        .into_iter()
        .flatten()
        .any(|t| t.date_naive() != input.date)
    {
        return Err(AppError::BadRequest(format!(
            "Requested punch times must fall on {}",
            input.date
        )));
    }

    let employee = employee_repo::find_by_id(&tx.employees, ctx.user_id())?;
    let reviewer_id = employee_repo::active_manager(&tx.employees, employee.reporting_manager_id)
        .ok_or_else(|| {
            AppError::MissingReference(
                "No active reporting manager to review the correction".to_string(),
            )
        })?;

    let now = Utc::now();
    let request = AttendanceCorrectionRequest {
        id: Uuid::new_v4(),
        employee_id: employee.id,
        reviewer_id,
        date: input.date,
        requested_punch_in: input.requested_punch_in,
        requested_punch_out: input.requested_punch_out,
        reason: input.reason,
        status: RequestStatus::Pending,
        reviewer_remarks: None,
        created_at: now,
        updated_at: now,
    };
    let message = format!(
        "{} requested an attendance correction for {}",
        employee.full_name(),
        request.date
    );

    tx.attendance_corrections.push(request.clone());
    notifications::notify(tx, reviewer_id, Some(ctx.user_id()), message);
    Ok(request)
}

/// Approval rewrites the punch for that day, keeping whichever side was not
/// requested, and forces the day to present.
pub fn approve_correction(
    tx: &mut Tables,
    ctx: &UserContext,
    id: Uuid,
    remarks: Option<String>,
) -> Result<AttendanceCorrectionRequest, AppError> {
    let (request, _) = approval::decide(
        &mut tx.attendance_corrections,
        ctx,
        id,
        ApprovalAction::Approve,
        remarks,
    )?;

    let existing = attendance_repo::find_punch(&tx.punches, request.employee_id, request.date);
    let punch_in = request
        .requested_punch_in
        .or_else(|| existing.and_then(|p| p.punch_in));
    let punch_out = request
        .requested_punch_out
        .or_else(|| existing.and_then(|p| p.punch_out));

    if let (Some(i), Some(o)) = (punch_in, punch_out) {
        if o <= i {
            return Err(AppError::BadRequest(
                "Corrected punch out would precede punch in".to_string(),
            ));
        }
    }

    attendance_repo::upsert_punch(
        &mut tx.punches,
        request.employee_id,
        request.date,
        punch_in,
        punch_out,
    );
    attendance_repo::upsert_status(
        &mut tx.attendance,
        request.employee_id,
        request.date,
        AttendanceStatus::Present,
        Utc::now(),
    );

    notifications::notify(
        tx,
        request.employee_id,
        Some(ctx.user_id()),
        format!("Your attendance correction for {} was approved", request.date),
    );
    Ok(request)
}

pub fn reject_correction(
    tx: &mut Tables,
    ctx: &UserContext,
    id: Uuid,
    remarks: Option<String>,
) -> Result<AttendanceCorrectionRequest, AppError> {
    let (request, _) = approval::decide(
        &mut tx.attendance_corrections,
        ctx,
        id,
        ApprovalAction::Reject,
        remarks,
    )?;

    notifications::notify(
        tx,
        request.employee_id,
        Some(ctx.user_id()),
        format!("Your attendance correction for {} was rejected", request.date),
    );
    Ok(request)
}

pub fn list_corrections(
    tables: &Tables,
    ctx: &UserContext,
    query: &RequestQuery,
) -> Vec<AttendanceCorrectionRequest> {
    let scope = ctx.visible_ids(&tables.employees);
    approval::visible_requests(&tables.attendance_corrections, ctx, &scope, query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::Role;
    use crate::services::test_support::{context, date, employee, manager, staff, tables};
    use chrono::{Duration, TimeZone};
    use pretty_assertions::assert_eq;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 4, hour, 0, 0).unwrap()
    }

    fn correction(
        punch_in: Option<DateTime<Utc>>,
        punch_out: Option<DateTime<Utc>>,
    ) -> AttendanceCorrectionInput {
        AttendanceCorrectionInput {
            date: date(2024, 3, 4),
            requested_punch_in: punch_in,
            requested_punch_out: punch_out,
            reason: "Forgot to punch".to_string(),
        }
    }

    #[test]
    fn punch_in_once_then_out_after() {
        let worker = employee("Will", None);
        let ctx = context(&worker);
        let mut tx = tables(&[&worker]);

        assert!(matches!(
            punch_out(&mut tx, &ctx, at(9)),
            Err(AppError::BadRequest(_))
        ));

        punch_in(&mut tx, &ctx, at(9)).unwrap();
        assert_eq!(tx.attendance[0].status, AttendanceStatus::Present);
        assert!(matches!(
            punch_in(&mut tx, &ctx, at(10)),
            Err(AppError::Conflict(_))
        ));

        let punch = punch_out(&mut tx, &ctx, at(18)).unwrap();
        assert_eq!(punch.punch_in, Some(at(9)));
        assert_eq!(punch.punch_out, Some(at(18)));
        assert!(matches!(
            punch_out(&mut tx, &ctx, at(19)),
            Err(AppError::Conflict(_))
        ));
    }

    #[test]
    fn only_hr_marks_attendance_and_it_upserts() {
        let hr = staff("Hana", Role::Hr);
        let worker = employee("Will", None);
        let mut tx = tables(&[&hr, &worker]);
        let mark_as = |status| MarkAttendanceInput {
            employee_id: worker.id,
            date: date(2024, 3, 4),
            status,
        };

        assert!(matches!(
            mark(&mut tx, &context(&worker), mark_as(AttendanceStatus::Present)),
            Err(AppError::PermissionDenied(_))
        ));
        mark(&mut tx, &context(&hr), mark_as(AttendanceStatus::Absent)).unwrap();
        mark(&mut tx, &context(&hr), mark_as(AttendanceStatus::HalfDay)).unwrap();

        assert_eq!(tx.attendance.len(), 1);
        assert_eq!(tx.attendance[0].status, AttendanceStatus::HalfDay);
    }

    #[test]
    fn approved_correction_keeps_existing_punch_out() {
        let manager = employee("Mona", None);
        let worker = employee("Will", Some(manager.id));
        let mut tx = tables(&[&manager, &worker]);
        attendance_repo::upsert_punch(
            &mut tx.punches,
            worker.id,
            date(2024, 3, 4),
            Some(at(11)),
            Some(at(18)),
        );

        let request = submit_correction(&mut tx, &context(&worker), correction(Some(at(9)), None))
            .unwrap();
        approve_correction(&mut tx, &context(&manager), request.id, None).unwrap();

        let punch = attendance_repo::find_punch(&tx.punches, worker.id, date(2024, 3, 4)).unwrap();
        assert_eq!(punch.punch_in, Some(at(9)));
        assert_eq!(punch.punch_out, Some(at(18)));
        assert_eq!(tx.attendance[0].status, AttendanceStatus::Present);
    }

    #[test]
    fn correction_requires_a_valid_time() {
        let manager = employee("Mona", None);
        let worker = employee("Will", Some(manager.id));
        let mut tx = tables(&[&manager, &worker]);

        assert!(matches!(
            submit_correction(&mut tx, &context(&worker), correction(None, None)),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            submit_correction(
                &mut tx,
                &context(&worker),
                correction(Some(at(18)), Some(at(18) - Duration::hours(1)))
            ),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn correction_times_must_fall_on_the_requested_date() {
        let manager = employee("Mona", None);
        let worker = employee("Will", Some(manager.id));
        let mut tx = tables(&[&manager, &worker]);
        let elsewhere =
            |day: u32, hour: u32| Utc.with_ymd_and_hms(2025, 7, day, hour, 0, 0).unwrap();

        assert!(matches!(
            submit_correction(
                &mut tx,
                &context(&worker),
                correction(Some(elsewhere(1, 9)), Some(elsewhere(9, 18)))
            ),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            submit_correction(
                &mut tx,
                &context(&worker),
                correction(None, Some(elsewhere(9, 18)))
            ),
            Err(AppError::BadRequest(_))
        ));
        assert!(tx.attendance_corrections.is_empty());
        assert!(tx.punches.is_empty());

        submit_correction(&mut tx, &context(&worker), correction(Some(at(9)), None)).unwrap();
        assert_eq!(tx.attendance_corrections.len(), 1);
    }

    #[test]
    fn rejected_correction_leaves_punches_alone() {
        let manager = employee("Mona", None);
        let worker = employee("Will", Some(manager.id));
        let mut tx = tables(&[&manager, &worker]);

        let request = submit_correction(
            &mut tx,
            &context(&worker),
            correction(Some(at(9)), Some(at(17))),
        )
        .unwrap();
        let rejected = reject_correction(&mut tx, &context(&manager), request.id, None).unwrap();

        assert_eq!(rejected.status, RequestStatus::Rejected);
        assert!(tx.punches.is_empty());
        assert!(tx.attendance.is_empty());
    }

    #[test]
    fn attendance_listing_respects_scope() {
        let manager = manager("Mona", None);
        let worker = employee("Will", Some(manager.id));
        let mut tx = tables(&[&manager, &worker]);
        punch_in(&mut tx, &context(&worker), at(9)).unwrap();

        let query = AttendanceQuery {
            employee_id: Some(worker.id),
            ..AttendanceQuery::default()
        };
        assert_eq!(list(&tx, &context(&manager), &query).unwrap().len(), 1);

        let upward = AttendanceQuery {
            employee_id: Some(manager.id),
            ..AttendanceQuery::default()
        };
        assert!(matches!(
            list(&tx, &context(&worker), &upward),
            Err(AppError::PermissionDenied(_))
        ));
    }
}
