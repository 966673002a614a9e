use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::macros::string_enum;

/// Per-type leave counters, in days.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LeaveBalance {
    pub casual: i32,
    pub sick: i32,
    pub earned: i32,
}

impl LeaveBalance {
    pub fn get(&self, leave_type: LeaveType) -> i32 {
        match leave_type {
            LeaveType::Casual => self.casual,
            LeaveType::Sick => self.sick,
            LeaveType::Earned => self.earned,
        }
    }

    /// Deducts `days` from the matching bucket, flooring at zero.
    pub fn deduct(&mut self, leave_type: LeaveType, days: i32) {
        let bucket = match leave_type {
            LeaveType::Casual => &mut self.casual,
            LeaveType::Sick => &mut self.sick,
            LeaveType::Earned => &mut self.earned,
        };
        *bucket = (*bucket - days).max(0);
    }
}

string_enum! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum LeaveType {
        Casual => "casual",
        Sick => "sick",
        Earned => "earned",
    }
}

string_enum! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum LeaveStatus {
        PendingReportingManagerApproval => "pending_reporting_manager_approval",
        PendingFunctionalManagerApproval => "pending_functional_manager_approval",
        Approved => "approved",
        Rejected => "rejected",
        Cancelled => "cancelled",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LeaveRequest {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub leave_type: LeaveType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub duration_in_days: i32,
    pub reason: String,
    pub status: LeaveStatus,
    pub reporting_manager_id: Uuid,
    pub functional_manager_id: Uuid,
    pub reporting_manager_remarks: Option<String>,
    pub functional_manager_remarks: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveRequestInput {
    pub leave_type: LeaveType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub reason: String,
}
