use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::employee::ConfirmationStatus;
use super::macros::string_enum;

string_enum! {
    /// Status of the single-stage requests (salary change, attendance
    /// correction, travel, expense).
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum RequestStatus {
        Pending => "pending",
        Approved => "approved",
        Rejected => "rejected",
        Cancelled => "cancelled",
    }
}

string_enum! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum ConfirmationRequestStatus {
        PendingReportingManagerApproval => "pending_reporting_manager_approval",
        PendingFunctionalManagerApproval => "pending_functional_manager_approval",
        Approved => "approved",
        Rejected => "rejected",
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewInput {
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmationRequest {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub requested_by: Uuid,
    pub previous_status: ConfirmationStatus,
    pub status: ConfirmationRequestStatus,
    pub reporting_manager_id: Uuid,
    pub functional_manager_id: Uuid,
    pub remarks: Option<String>,
    pub reviewer_remarks: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmationRequestInput {
    pub employee_id: Uuid,
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SalaryChangeRequest {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub requested_by: Uuid,
    pub approver_id: Uuid,
    pub current_ctc: BigDecimal,
    pub proposed_ctc: BigDecimal,
    pub effective_date: NaiveDate,
    pub reason: String,
    pub status: RequestStatus,
    pub reviewer_remarks: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalaryChangeInput {
    pub employee_id: Uuid,
    pub proposed_ctc: BigDecimal,
    pub effective_date: NaiveDate,
    #[serde(default)]
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TravelRequest {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub reviewer_id: Uuid,
    pub destination: String,
    pub purpose: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub estimated_cost: BigDecimal,
    pub status: RequestStatus,
    pub reviewer_remarks: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelRequestInput {
    pub destination: String,
    pub purpose: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub estimated_cost: BigDecimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseRequest {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub reviewer_id: Uuid,
    pub category: String,
    pub amount: BigDecimal,
    pub expense_date: NaiveDate,
    pub description: String,
    pub status: RequestStatus,
    pub reviewer_remarks: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseRequestInput {
    pub category: String,
    pub amount: BigDecimal,
    pub expense_date: NaiveDate,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestQuery {
    pub employee_id: Option<Uuid>,
    pub status: Option<String>,
}
