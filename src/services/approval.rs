//! Transition tables for every request type.
//!
//! Each status enum declares which `(state, action)` pairs are legal through
//! [`ApprovalState::next`]; [`advance`] is the single place where a
//! transition is validated, so no call site compares status strings itself.

use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::database::models::{
    AttendanceCorrectionRequest, ConfirmationRequest, ConfirmationRequestStatus, ExpenseRequest,
    LeaveRequest, LeaveStatus, RequestQuery, RequestStatus, SalaryChangeRequest, TravelRequest,
};
use crate::database::repositories::{self, Record};
use crate::error::AppError;
use crate::services::user_context::UserContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalAction {
    Approve,
    Reject,
    Cancel,
}

impl fmt::Display for ApprovalAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ApprovalAction::Approve => "approve",
            ApprovalAction::Reject => "reject",
            ApprovalAction::Cancel => "cancel",
        })
    }
}

/// Review stage a pending request is waiting on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    ReportingManager,
    FunctionalManager,
    Single,
}

pub trait ApprovalState: Copy + PartialEq + fmt::Display {
    /// Next state for `action`, or `None` when the transition is illegal.
    fn next(self, action: ApprovalAction) -> Option<Self>;

    /// Stage awaiting review, `None` once the request is terminal.
    fn stage(self) -> Option<Stage>;

    fn is_terminal(self) -> bool {
        self.stage().is_none()
    }
}

pub fn advance<S: ApprovalState>(current: S, action: ApprovalAction) -> Result<S, AppError> {
    current.next(action).ok_or_else(|| {
        AppError::InvalidTransition(format!(
            "cannot {} a request that is {}",
            action, current
        ))
    })
}

impl ApprovalState for LeaveStatus {
    fn next(self, action: ApprovalAction) -> Option<Self> {
        use ApprovalAction::*;
        use LeaveStatus::*;

        match (self, action) {
            (PendingReportingManagerApproval, Approve) => Some(PendingFunctionalManagerApproval),
            (PendingFunctionalManagerApproval, Approve) => Some(Approved),
            (PendingReportingManagerApproval | PendingFunctionalManagerApproval, Reject) => {
                Some(Rejected)
            }
            (PendingReportingManagerApproval | PendingFunctionalManagerApproval, Cancel) => {
                Some(Cancelled)
            }
            _ => None,
        }
    }

    fn stage(self) -> Option<Stage> {
        match self {
            LeaveStatus::PendingReportingManagerApproval => Some(Stage::ReportingManager),
            LeaveStatus::PendingFunctionalManagerApproval => Some(Stage::FunctionalManager),
            _ => None,
        }
    }
}

impl ApprovalState for ConfirmationRequestStatus {
    fn next(self, action: ApprovalAction) -> Option<Self> {
        use ApprovalAction::*;
        use ConfirmationRequestStatus::*;

        match (self, action) {
            (PendingReportingManagerApproval, Approve) => Some(PendingFunctionalManagerApproval),
            (PendingFunctionalManagerApproval, Approve) => Some(Approved),
            (PendingReportingManagerApproval | PendingFunctionalManagerApproval, Reject) => {
                Some(Rejected)
            }
            _ => None,
        }
    }

    fn stage(self) -> Option<Stage> {
        match self {
            ConfirmationRequestStatus::PendingReportingManagerApproval => {
                Some(Stage::ReportingManager)
            }
            ConfirmationRequestStatus::PendingFunctionalManagerApproval => {
                Some(Stage::FunctionalManager)
            }
            _ => None,
        }
    }
}

impl ApprovalState for RequestStatus {
    fn next(self, action: ApprovalAction) -> Option<Self> {
        match (self, action) {
            (RequestStatus::Pending, ApprovalAction::Approve) => Some(RequestStatus::Approved),
            (RequestStatus::Pending, ApprovalAction::Reject) => Some(RequestStatus::Rejected),
            (RequestStatus::Pending, ApprovalAction::Cancel) => Some(RequestStatus::Cancelled),
            _ => None,
        }
    }

    fn stage(self) -> Option<Stage> {
        match self {
            RequestStatus::Pending => Some(Stage::Single),
            _ => None,
        }
    }
}

/// A request that moves through an [`ApprovalState`] machine and names a
/// reviewer for each pending stage.
pub trait Reviewable: Record + Clone {
    type Status: ApprovalState;

    fn status(&self) -> Self::Status;

    fn reviewer_for(&self, stage: Stage) -> Uuid;

    /// Every id that reviews this request at some stage.
    fn reviewer_ids(&self) -> Vec<Uuid>;

    fn record_decision(
        &mut self,
        stage: Stage,
        next: Self::Status,
        remarks: Option<String>,
        now: DateTime<Utc>,
    );
}

fn authorize<R: Reviewable>(
    request: &R,
    ctx: &UserContext,
    stage: Stage,
    action: ApprovalAction,
) -> Result<(), AppError> {
    let caller = ctx.user_id();

    if action == ApprovalAction::Cancel {
        return if caller == request.owner_id() {
            Ok(())
        } else {
            Err(AppError::PermissionDenied(format!(
                "Only the requester can cancel a {}",
                R::LABEL.to_lowercase()
            )))
        };
    }

    if caller == request.owner_id() {
        return Err(AppError::PermissionDenied(
            "You cannot review your own request".to_string(),
        ));
    }
    if caller == request.reviewer_for(stage) || ctx.is_hr_or_admin() {
        Ok(())
    } else {
        Err(AppError::PermissionDenied(format!(
            "You are not the reviewer of {} {}",
            R::LABEL.to_lowercase(),
            request.id()
        )))
    }
}

/// Applies `action` to the request with `id`: checks the caller's
/// authority for the current stage, validates the transition, and records
/// it. Returns the updated request and the stage that was decided.
pub fn decide<'a, R, I>(
    rows: I,
    ctx: &UserContext,
    id: Uuid,
    action: ApprovalAction,
    remarks: Option<String>,
) -> Result<(R, Stage), AppError>
where
    R: Reviewable + 'a,
    I: IntoIterator<Item = &'a mut R>,
{
    let request = repositories::find_mut(rows, id)?;
    let current = request.status();
    let next = advance(current, action)?;
    let stage = current.stage().unwrap_or(Stage::Single);

    authorize(request, ctx, stage, action)?;
    request.record_decision(stage, next, remarks, Utc::now());

    log::info!(
        "{} {} moved from {} to {} by {}",
        R::LABEL,
        id,
        current,
        next,
        ctx.user_id()
    );

    Ok((request.clone(), stage))
}

/// Requests the caller may see: their own, those they review, and those of
/// employees inside their scope. `query` narrows by employee and status.
pub fn visible_requests<'a, R, I>(
    rows: I,
    ctx: &UserContext,
    scope: &HashSet<Uuid>,
    query: &RequestQuery,
) -> Vec<R>
where
    R: Reviewable + 'a,
    I: IntoIterator<Item = &'a R>,
{
    rows.into_iter()
        .filter(|r| {
            scope.contains(&r.owner_id()) || r.reviewer_ids().contains(&ctx.user_id())
        })
        .filter(|r| query.employee_id.is_none_or(|id| r.owner_id() == id))
        .filter(|r| {
            query
                .status
                .as_deref()
                .is_none_or(|s| r.status().to_string().eq_ignore_ascii_case(s))
        })
        .cloned()
        .collect()
}

impl Reviewable for LeaveRequest {
    type Status = LeaveStatus;

    fn status(&self) -> LeaveStatus {
        self.status
    }

    fn reviewer_for(&self, stage: Stage) -> Uuid {
        match stage {
            Stage::FunctionalManager => self.functional_manager_id,
            _ => self.reporting_manager_id,
        }
    }

    fn reviewer_ids(&self) -> Vec<Uuid> {
        vec![self.reporting_manager_id, self.functional_manager_id]
    }

    fn record_decision(
        &mut self,
        stage: Stage,
        next: LeaveStatus,
        remarks: Option<String>,
        now: DateTime<Utc>,
    ) {
        match stage {
            Stage::FunctionalManager => self.functional_manager_remarks = remarks,
            _ if remarks.is_some() => self.reporting_manager_remarks = remarks,
            _ => {}
        }
        self.status = next;
        self.updated_at = now;
    }
}

impl Reviewable for ConfirmationRequest {
    type Status = ConfirmationRequestStatus;

    fn status(&self) -> ConfirmationRequestStatus {
        self.status
    }

    fn reviewer_for(&self, stage: Stage) -> Uuid {
        match stage {
            Stage::FunctionalManager => self.functional_manager_id,
            _ => self.reporting_manager_id,
        }
    }

    fn reviewer_ids(&self) -> Vec<Uuid> {
        vec![self.reporting_manager_id, self.functional_manager_id]
    }

    fn record_decision(
        &mut self,
        _stage: Stage,
        next: ConfirmationRequestStatus,
        remarks: Option<String>,
        now: DateTime<Utc>,
    ) {
        if remarks.is_some() {
            self.reviewer_remarks = remarks;
        }
        self.status = next;
        self.updated_at = now;
    }
}

macro_rules! single_stage {
    ($ty:ty, $reviewer:ident) => {
        impl Reviewable for $ty {
            type Status = RequestStatus;

            fn status(&self) -> RequestStatus {
                self.status
            }

            fn reviewer_for(&self, _stage: Stage) -> Uuid {
                self.$reviewer
            }

            fn reviewer_ids(&self) -> Vec<Uuid> {
                vec![self.$reviewer]
            }

            fn record_decision(
                &mut self,
                _stage: Stage,
                next: RequestStatus,
                remarks: Option<String>,
                now: DateTime<Utc>,
            ) {
                self.status = next;
                self.reviewer_remarks = remarks;
                self.updated_at = now;
            }
        }
    };
}

single_stage!(SalaryChangeRequest, approver_id);
single_stage!(AttendanceCorrectionRequest, reviewer_id);
single_stage!(TravelRequest, reviewer_id);
single_stage!(ExpenseRequest, reviewer_id);
