use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::macros::string_enum;

string_enum! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum WorkflowKind {
        Onboarding => "onboarding",
        Offboarding => "offboarding",
    }
}

string_enum! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum WorkflowStatus {
        InProgress => "in_progress",
        Completed => "completed",
    }
}

string_enum! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum TaskStatus {
        Pending => "pending",
        Completed => "completed",
    }
}

string_enum! {
    /// Who a template task is handed to, resolved per employee.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum AssigneeRole {
        Employee => "employee",
        ReportingManager => "reporting_manager",
        Hr => "hr",
        It => "it",
    }
}

/// One entry of a static lifecycle checklist.
#[derive(Debug, Clone, Copy)]
pub struct TaskTemplate {
    pub name: &'static str,
    pub assignee_role: AssigneeRole,
    pub due_in_days: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub name: String,
    pub assignee_id: Uuid,
    pub assignee_role: AssigneeRole,
    pub due_date: NaiveDate,
    pub status: TaskStatus,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Workflow {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub kind: WorkflowKind,
    pub status: WorkflowStatus,
    pub tasks: Vec<Task>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Workflow {
    pub fn is_complete(&self) -> bool {
        self.tasks.iter().all(|t| t.status == TaskStatus::Completed)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowQuery {
    pub employee_id: Option<Uuid>,
    pub kind: Option<WorkflowKind>,
    pub assigned_to_me: Option<bool>,
}
