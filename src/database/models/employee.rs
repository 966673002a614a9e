use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use super::leave::{LeaveBalance, LeaveType};
use super::macros::string_enum;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: Uuid,
    pub employee_code: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default, skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub department: String,
    pub designation: String,
    pub reporting_manager_id: Option<Uuid>,
    pub functional_manager_id: Option<Uuid>,
    pub leave_balance: LeaveBalance,
    pub employment_type: EmploymentType,
    pub confirmation_status: ConfirmationStatus,
    pub confirmation_date: Option<NaiveDate>,
    pub ctc: BigDecimal,
    pub date_of_joining: NaiveDate,
    pub status: EmployeeStatus,
    pub function_access: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Employee {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn is_active(&self) -> bool {
        self.status != EmployeeStatus::Exited
    }

    pub fn balance_for(&self, leave_type: LeaveType) -> i32 {
        self.leave_balance.get(leave_type)
    }

    pub fn summary(&self) -> EmployeeSummary {
        EmployeeSummary {
            id: self.id,
            employee_code: self.employee_code.clone(),
            name: self.full_name(),
            designation: self.designation.clone(),
            department: self.department.clone(),
        }
    }
}

string_enum! {
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub enum Role {
        Admin => "admin",
        Hr => "hr",
        Manager => "manager",
        #[default]
        Employee => "employee",
    }
}

impl Role {
    /// Navigation features granted when no explicit list is supplied.
    pub fn default_function_access(&self) -> Vec<String> {
        let features: &[&str] = match self {
            Role::Admin | Role::Hr => &[
                "dashboard",
                "employees",
                "attendance",
                "leave",
                "payroll",
                "recruitment",
                "performance",
                "workflows",
                "hierarchy",
                "settings",
            ],
            Role::Manager => &["dashboard", "attendance", "leave", "team", "hierarchy"],
            Role::Employee => &["dashboard", "attendance", "leave", "profile"],
        };
        features.iter().map(|f| f.to_string()).collect()
    }
}

string_enum! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum EmploymentType {
        Permanent => "permanent",
        Probation => "probation",
        Trainee => "trainee",
        Contract => "contract",
        Intern => "intern",
    }
}

impl EmploymentType {
    /// Status an employee of this type holds before being confirmed.
    pub fn pre_confirmation_status(&self) -> ConfirmationStatus {
        match self {
            EmploymentType::Trainee | EmploymentType::Intern => ConfirmationStatus::Training,
            _ => ConfirmationStatus::Probation,
        }
    }

    pub fn initial_confirmation_status(&self) -> ConfirmationStatus {
        match self {
            EmploymentType::Permanent => ConfirmationStatus::Confirmed,
            EmploymentType::Contract => ConfirmationStatus::NotApplicable,
            other => other.pre_confirmation_status(),
        }
    }
}

string_enum! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum ConfirmationStatus {
        Confirmed => "confirmed",
        Probation => "probation",
        Training => "training",
        PendingConfirmation => "pending_confirmation",
        NotApplicable => "not_applicable",
    }
}

impl ConfirmationStatus {
    pub fn is_awaiting_confirmation(&self) -> bool {
        matches!(
            self,
            ConfirmationStatus::Probation | ConfirmationStatus::Training
        )
    }
}

string_enum! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum EmployeeStatus {
        Active => "active",
        Offboarding => "offboarding",
        Exited => "exited",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeSummary {
    pub id: Uuid,
    pub employee_code: String,
    pub name: String,
    pub designation: String,
    pub department: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEmployeeInput {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: Role,
    pub department: String,
    pub designation: String,
    pub reporting_manager_id: Option<Uuid>,
    pub functional_manager_id: Option<Uuid>,
    pub employment_type: EmploymentType,
    pub ctc: BigDecimal,
    pub date_of_joining: NaiveDate,
    pub function_access: Option<Vec<String>>,
    pub leave_balance: Option<LeaveBalance>,
}

/// Partial update of an employee's placement. For the manager fields an
/// explicit `null` clears the reference while an absent key leaves it alone.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEmployeeInput {
    #[serde(default, deserialize_with = "double_option")]
    pub reporting_manager_id: Option<Option<Uuid>>,
    #[serde(default, deserialize_with = "double_option")]
    pub functional_manager_id: Option<Option<Uuid>>,
    pub role: Option<Role>,
    pub department: Option<String>,
    pub designation: Option<String>,
    pub function_access: Option<Vec<String>>,
}

fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeQuery {
    pub department: Option<String>,
    pub status: Option<EmployeeStatus>,
}
